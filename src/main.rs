// In src/main.rs

// Declare modules
pub mod cli;
pub mod compositor;
pub mod config;
pub mod emit;
pub mod glyph;
pub mod outline;
pub mod pipeline;
pub mod quantize;
pub mod rasterizer;
pub mod search;

use crate::{
    cli::Args,
    config::Config,
    pipeline::GlyphPipeline,
    rasterizer::{swash_font_driver::SwashFontDriver, FontDriver},
    search::{find_best_axis_coords, small_canvas_override, FitTarget, FontPlan},
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};

/// Main entry point for `osd-fontgen`.
fn main() -> anyhow::Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    run(Args::parse())
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => {
            if args.width.is_none() || args.height.is_none() {
                bail!("--width and --height are required without --config");
            }
            Config::default()
        }
    };
    args.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    let Some(font_path) = config.font.path.clone() else {
        bail!("no font given; pass --font or set font.path in the config file");
    };
    let mut driver = SwashFontDriver::load(&font_path)?;

    info!(
        "Canvas {}x{}, outline {} ({:?}), centering {:?}, charset {:?}",
        config.canvas.width,
        config.canvas.height,
        config.outline.radius,
        config.outline.method,
        config.placement.centering,
        config.export.charset
    );

    if args.is_batch() {
        run_batch(&mut driver, &config, &args.sizes)
    } else {
        run_single(&mut driver, &config)
    }
}

fn fit_target(config: &Config) -> FitTarget {
    FitTarget::new(
        config.canvas.width,
        config.canvas.height,
        config.outline.radius,
    )
}

fn pipeline_for(config: &Config, plan: FontPlan) -> Result<GlyphPipeline> {
    Ok(GlyphPipeline::new(
        plan,
        config.compositor(),
        config.outline.radius,
        config.outline.method,
        config.quantize.build_profile()?,
    ))
}

/// Resolve one plan, then write the header and a preview.
fn run_single<D: FontDriver>(driver: &mut D, config: &Config) -> Result<()> {
    let plan = search::resolve_plan(
        driver,
        &fit_target(config),
        &config.search,
        config.font.pixel_size,
    );
    let pipeline = pipeline_for(config, plan)?;
    let glyphs = pipeline.render_all(driver, &config.export.charset)?;

    if config.export.emit_header {
        let header = emit::HeaderInfo {
            width: config.canvas.width,
            height: config.canvas.height,
            plan,
            outline_radius: config.outline.radius,
            palette: pipeline.profile().describe(),
        };
        emit::write_header(&config.export.output_dir, &header, &glyphs)?;
    }
    if config.export.emit_preview {
        emit::save_preview(
            &config.export.preview_dir,
            &plan,
            &glyphs,
            config.canvas.width,
            config.canvas.height,
        )?;
    }
    info!("Exported {} glyphs", glyphs.len());
    Ok(())
}

/// One preview per explicit pixel size; axes are resolved per size.
fn run_batch<D: FontDriver>(driver: &mut D, config: &Config, sizes: &[u32]) -> Result<()> {
    if !config.export.emit_preview {
        warn!("Batch mode only writes previews, but previews are disabled; nothing to do");
        return Ok(());
    }
    let target = fit_target(config);
    let variable = driver.has_variable_axes();
    let search = &config.search;

    for &pixel_size in sizes {
        info!("===> Rendering pixel size {}", pixel_size);
        let override_axes = if search.small_canvas_override && variable {
            small_canvas_override(target.width, target.height)
        } else {
            None
        };
        let axes = override_axes.or_else(|| {
            find_best_axis_coords(
                driver,
                &target,
                pixel_size,
                &search.width_axis,
                &search.weight_axis,
                search.tie_break,
                search.test_char,
            )
        });
        let plan = FontPlan { pixel_size, axes };
        let glyphs = pipeline_for(config, plan)?.render_all(driver, &config.export.charset)?;
        emit::save_preview(
            &config.export.preview_dir,
            &plan,
            &glyphs,
            config.canvas.width,
            config.canvas.height,
        )?;
    }
    Ok(())
}
