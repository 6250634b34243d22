//! Headless replay: render the demo at a given scale, feed it pointer
//! moves, and write the on-screen surface to a PNG.
//!
//! ```text
//! crisp-snapshot --scale 2 --pointer 100,100 --out frame.png
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use crisp_core::{PointerMove, SceneConfig, start};
use crisp_raster::RasterHost;
use std::path::PathBuf;

const SURFACE_ID: &str = "screen";

#[derive(Parser, Debug)]
#[command(about = "Render a Crisp Lines frame to PNG without a browser")]
struct Args {
    /// Logical width of the on-screen surface.
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Logical height of the on-screen surface.
    #[arg(long, default_value_t = 600)]
    height: u32,
    /// Device pixel ratio to simulate.
    #[arg(short, long, default_value_t = 2.0)]
    scale: f64,
    /// Pointer position `x,y` in logical pixels. Repeat to replay a path.
    #[arg(short, long, value_parser = parse_pointer)]
    pointer: Vec<PointerMove>,
    /// JSON scene overrides.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Where to write the PNG.
    #[arg(short, long, default_value = "crisp.png")]
    out: PathBuf,
}

fn parse_pointer(val: &str) -> Result<PointerMove, String> {
    let (x, y) = val
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{val}`"))?;
    let x = x.trim().parse().map_err(|_| format!("bad x in `{val}`"))?;
    let y = y.trim().parse().map_err(|_| format!("bad y in `{val}`"))?;
    Ok(PointerMove::new(x, y))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            SceneConfig::from_json(&json).with_context(|| format!("parsing {}", path.display()))?
        }
        None => SceneConfig::default(),
    };

    let host = RasterHost::new(args.scale);
    host.add_surface(SURFACE_ID, args.width, args.height)?;
    let renderer = start(&host, SURFACE_ID, config)?;

    for event in &args.pointer {
        host.dispatch_pointer_move(*event);
    }

    renderer
        .borrow()
        .onscreen()
        .save_png(&args.out)
        .with_context(|| format!("writing {}", args.out.display()))?;
    log::info!(
        "wrote {} ({} pointer moves)",
        args.out.display(),
        args.pointer.len()
    );
    Ok(())
}
