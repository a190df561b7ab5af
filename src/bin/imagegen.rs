use std::path::PathBuf;
use std::process;

use structopt::StructOpt;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mandelstrip::{Completion, Palette, RenderSettings, Renderer, Viewport, DEFAULT_TILES};

#[derive(Debug, StructOpt)]
#[structopt(name = "mandelstrip-imagegen", about = "Render the Mandelbrot set to a PNG.")]
struct Opt {
    #[structopt(long, default_value = "800")]
    width: u32,

    #[structopt(long, default_value = "600")]
    height: u32,

    #[structopt(short = "i", long, default_value = "100")]
    max_iterations: u32,

    #[structopt(long, default_value = "2.0")]
    escape_radius: f64,

    #[structopt(long, default_value = "-2.5", allow_hyphen_values = true)]
    x_min: f64,

    #[structopt(long, default_value = "1.5", allow_hyphen_values = true)]
    x_max: f64,

    #[structopt(long, default_value = "-2.0", allow_hyphen_values = true)]
    y_min: f64,

    #[structopt(long, default_value = "2.0", allow_hyphen_values = true)]
    y_max: f64,

    /// Number of row strips to compute in parallel [default: 8]
    #[structopt(short, long, parse(try_from_str = parse_tiles))]
    tiles: Option<usize>,

    /// Worker threads; defaults to the number of physical CPUs
    #[structopt(long)]
    threads: Option<usize>,

    /// rainbow or greyscale
    #[structopt(short, long, default_value = "rainbow")]
    palette: Palette,

    #[structopt(short, long, parse(from_os_str), default_value = "out.png")]
    output: PathBuf,
}

fn parse_tiles(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("tile count must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let opt = Opt::from_args();
    let viewport = Viewport::new(opt.x_min, opt.x_max, opt.y_min, opt.y_max);
    let settings = RenderSettings::new(opt.width, opt.height, opt.max_iterations, opt.escape_radius);
    let renderer = match opt.threads {
        Some(n) => Renderer::new(n),
        None => Renderer::default(),
    }
    .with_palette(opt.palette);

    let tiles = opt.tiles.unwrap_or(DEFAULT_TILES);
    info!(
        width = settings.width,
        height = settings.height,
        tiles,
        threads = renderer.threads(),
        palette = %renderer.palette(),
        "rendering"
    );

    let result = match renderer.render(viewport, settings, tiles) {
        Completion::Value(result) => result,
        Completion::Error(e) => {
            error!(error = %e, "render failed");
            process::exit(1);
        }
        Completion::Stopped => {
            error!("render stopped");
            process::exit(1);
        }
    };

    if let Err(e) = result.to_image().save(&opt.output) {
        error!(error = %e, path = %opt.output.display(), "failed to save image");
        process::exit(1);
    }
    info!(
        path = %opt.output.display(),
        elapsed_ms = result.elapsed.as_millis() as u64,
        "image written"
    );
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_tile_count_flag() {
        assert_eq!(parse_tiles("12"), Ok(12));
        assert!(parse_tiles("0").is_err());
        assert!(parse_tiles("-3").is_err());

        let opt = Opt::from_iter(["mandelstrip-imagegen"]);
        assert_eq!(opt.tiles, None);
        assert!(Opt::from_iter_safe(["mandelstrip-imagegen", "--tiles", "0"]).is_err());
        let opt = Opt::from_iter(["mandelstrip-imagegen", "-t", "3", "--x-min", "-1.5"]);
        assert_eq!(opt.tiles, Some(3));
        assert_eq!(opt.x_min, -1.5);
    }
}
