// src/emit/mod.rs

//! Output writers for a finished run: the C header and the PNG preview sheet.
//!
//! Both take already-packed glyphs; neither touches the font.

pub mod header;
pub mod preview;

pub use header::{header_file_name, render_header, write_header, HeaderInfo};
pub use preview::{compose_preview, preview_file_name, save_preview};
