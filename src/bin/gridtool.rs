use bitgrid::tools::{grid_stats, load_image, parse_rect, save_mask};
use bitgrid::{BitGrid, DEFAULT_ALPHA_THRESHOLD, Rect};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "gridtool", version, about = "bitgrid CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Threshold an image's alpha and print grid stats
    Stats {
        #[arg(long)]
        image: PathBuf,
        #[arg(long, default_value_t = DEFAULT_ALPHA_THRESHOLD)]
        threshold: f32,
    },
    /// Print the collision polygons of an image's opaque regions
    Polygons {
        #[arg(long)]
        image: PathBuf,
        #[arg(long, default_value_t = DEFAULT_ALPHA_THRESHOLD)]
        threshold: f32,
        /// Clip rectangle as `x,y,w,h`; defaults to the whole image
        #[arg(long)]
        rect: Option<String>,
        /// Douglas-Peucker tolerance
        #[arg(long, default_value_t = 0.0)]
        epsilon: f32,
        /// Grow (positive) or shrink (negative) before tracing
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        grow: i32,
    },
    /// Write the thresholded (and optionally grown) mask as an image
    Mask {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = DEFAULT_ALPHA_THRESHOLD)]
        threshold: f32,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        grow: i32,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Stats { image, threshold } => stats_cmd(&image, threshold),
        Command::Polygons {
            image,
            threshold,
            rect,
            epsilon,
            grow,
        } => polygons_cmd(&image, threshold, rect.as_deref(), epsilon, grow),
        Command::Mask {
            image,
            out,
            threshold,
            grow,
        } => mask_cmd(&image, &out, threshold, grow),
    }
}

fn load_grid(image: &Path, threshold: f32) -> Option<BitGrid> {
    let img = match load_image(image) {
        Ok(img) => img,
        Err(err) => {
            eprintln!("Failed to load image {}: {}", image.display(), err);
            return None;
        }
    };
    let mut grid = BitGrid::new();
    if let Err(err) = grid.try_create_from_image_alpha(Some(&img), threshold) {
        eprintln!("Cannot threshold {}: {}", image.display(), err);
        return None;
    }
    println!(
        "Image: {} ({}x{}) threshold={}",
        image.display(),
        grid.width(),
        grid.height(),
        threshold
    );
    Some(grid)
}

fn full_rect(grid: &BitGrid) -> Rect {
    Rect::new(0.0, 0.0, grid.width() as f32, grid.height() as f32)
}

fn stats_cmd(image: &Path, threshold: f32) {
    let Some(grid) = load_grid(image, threshold) else {
        return;
    };
    let stats = grid_stats(&grid);
    println!(
        "Grid: true_bits={} total={} fill_ratio={:.2}% regions={}",
        stats.true_bits,
        stats.total_cells,
        stats.fill_ratio * 100.0,
        stats.regions
    );
}

fn polygons_cmd(image: &Path, threshold: f32, rect: Option<&str>, epsilon: f32, grow: i32) {
    let Some(mut grid) = load_grid(image, threshold) else {
        return;
    };
    let clip = match rect {
        Some(text) => match parse_rect(text) {
            Some(r) => r,
            None => {
                eprintln!("Invalid --rect '{}', expected x,y,w,h", text);
                return;
            }
        },
        None => full_rect(&grid),
    };

    if grow != 0 {
        grid.grow_mask(grow, clip);
    }

    let start = Instant::now();
    let polygons = grid.clip_opaque_to_polygons_with_epsilon(clip, epsilon);
    let elapsed = start.elapsed();
    println!(
        "Found {} polygons in {:.2}ms",
        polygons.len(),
        elapsed.as_secs_f64() * 1000.0
    );
    for (i, polygon) in polygons.iter().enumerate() {
        let vertices: Vec<String> = polygon
            .iter()
            .map(|p| format!("({}, {})", p.x, p.y))
            .collect();
        println!(
            "  Polygon {}: {} vertices: {}",
            i,
            polygon.len(),
            vertices.join(" ")
        );
    }
}

fn mask_cmd(image: &Path, output: &Path, threshold: f32, grow: i32) {
    let Some(mut grid) = load_grid(image, threshold) else {
        return;
    };
    if grow != 0 {
        let bound = full_rect(&grid);
        grid.grow_mask(grow, bound);
    }
    match save_mask(&grid, output) {
        Ok(()) => println!(
            "Wrote {} ({} true bits)",
            output.display(),
            grid.true_bit_count()
        ),
        Err(err) => eprintln!("Failed to write {}: {}", output.display(), err),
    }
}
