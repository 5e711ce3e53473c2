use clap::{Args, Parser, Subcommand};
use image_points::config::{debug_enabled, env_margin, env_threshold};
use image_points::tools::{
    dataset_iter, load_image, parse_path, read_points, state_stats, write_points,
};
use image_points::{
    BackgroundDifference, ExactColorMatch, MatchStrategy, PointSearcher, PointsError,
    ResultImage, SearchConfig,
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{Level, debug, error, info};

#[derive(Parser)]
#[command(name = "points", version, about = "Find points of interest in images")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone)]
struct MatchArgs {
    /// Suppression margin in pixels (default: POINTS_MARGIN or 15)
    #[arg(long, allow_hyphen_values = true)]
    margin: Option<isize>,
    /// Search for one exact color, given as R,G,B
    #[arg(long, conflicts_with = "threshold")]
    color: Option<String>,
    /// Background percentage threshold (default: POINTS_THRESHOLD or 90)
    #[arg(long)]
    threshold: Option<f64>,
}

#[derive(Subcommand)]
enum Command {
    /// Search one image and print the points found
    Search {
        #[arg(long)]
        image: PathBuf,
        #[command(flatten)]
        matching: MatchArgs,
        /// Replace the found points with the ones in this file before drawing
        #[arg(long)]
        points_in: Option<PathBuf>,
        /// Write the points to this file
        #[arg(long)]
        points_out: Option<PathBuf>,
        /// Write an annotated copy of the image here
        #[arg(long)]
        out: Option<PathBuf>,
        /// Draw point labels on the annotated image
        #[arg(long)]
        labels: bool,
        /// Draw suppression window edges on the annotated image
        #[arg(long)]
        margins: bool,
        /// Connect points by index, e.g. 0,2,1
        #[arg(long)]
        path: Option<String>,
        /// Draw path lines one pixel wide instead of two
        #[arg(long)]
        single: bool,
        /// Skip path segments with unknown indices instead of failing
        #[arg(long)]
        tolerant: bool,
    },
    /// Search every image under a directory in parallel
    Batch {
        #[arg(long)]
        root: PathBuf,
        #[arg(long)]
        limit: Option<usize>,
        #[command(flatten)]
        matching: MatchArgs,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Search {
            image,
            matching,
            points_in,
            points_out,
            out,
            labels,
            margins,
            path,
            single,
            tolerant,
        } => search_cmd(
            &image,
            &matching,
            SearchOutput {
                points_in,
                points_out,
                out,
                labels,
                margins,
                path,
                double: !single,
                guard: !tolerant,
            },
        ),
        Command::Batch {
            root,
            limit,
            matching,
        } => batch_cmd(&root, limit, &matching),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 if debug_enabled() => Level::DEBUG,
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(args: &MatchArgs) -> Result<SearchConfig, PointsError> {
    let strategy: MatchStrategy = match &args.color {
        Some(spec) => parse_color(spec)?.into(),
        None => BackgroundDifference::with_threshold(args.threshold.unwrap_or_else(env_threshold))?
            .into(),
    };
    Ok(SearchConfig::default()
        .with_margin(args.margin.unwrap_or_else(env_margin))
        .with_strategy(strategy))
}

fn parse_color(spec: &str) -> Result<ExactColorMatch, PointsError> {
    let channels: Vec<i32> = spec
        .split(',')
        .map(|t| t.trim().parse::<i32>())
        .collect::<Result<_, _>>()
        .map_err(|_| PointsError::InvalidInput(format!("bad color '{}'", spec)))?;
    match channels.as_slice() {
        [r, g, b] => ExactColorMatch::new(*r, *g, *b),
        _ => Err(PointsError::InvalidInput(format!(
            "color needs three channels R,G,B, got '{}'",
            spec
        ))),
    }
}

struct SearchOutput {
    points_in: Option<PathBuf>,
    points_out: Option<PathBuf>,
    out: Option<PathBuf>,
    labels: bool,
    margins: bool,
    path: Option<String>,
    double: bool,
    guard: bool,
}

fn search_cmd(image: &Path, matching: &MatchArgs, output: SearchOutput) -> Result<(), PointsError> {
    let config = build_config(matching)?;
    let pixels = load_image(image)?;
    let mut searcher = PointSearcher::with_config(pixels, &config);

    let start = Instant::now();
    let count = searcher.run();
    let elapsed = start.elapsed();
    println!(
        "Image: {} ({}x{})",
        image.display(),
        searcher.width(),
        searcher.height()
    );
    println!(
        "Found {} points with {} strategy, margin {} in {:.2?}",
        count,
        config.strategy.name(),
        config.margin,
        elapsed
    );

    let stats = state_stats(searcher.states());
    debug!(
        "states: found={} within_margin={} border={} coverage={:.2}%",
        stats.found,
        stats.within_margin,
        stats.border,
        stats.coverage() * 100.0
    );

    if let Some(points_in) = &output.points_in {
        let points = read_points(points_in)?;
        info!("replacing points with {} from {}", points.len(), points_in.display());
        searcher.set_points(points);
    }

    for (i, point) in searcher.points().iter().enumerate() {
        println!("  t-{}: ({}, {})", i, point.x, point.y);
    }

    if let Some(points_out) = &output.points_out {
        write_points(points_out, searcher.points())?;
        info!("points written to {}", points_out.display());
    }

    if let Some(out) = &output.out {
        let mut result = ResultImage::new(&searcher);
        if output.margins {
            result.draw_margins();
        }
        if let Some(path) = &output.path {
            let path = parse_path(path)?;
            result.draw_path(&path, output.double, output.guard)?;
        }
        if output.labels {
            result.draw_labels();
        }
        result.save(out)?;
        info!("annotated image written to {}", out.display());
    } else if output.labels || output.margins || output.path.is_some() {
        debug!("drawing options ignored without --out");
    }

    Ok(())
}

fn batch_cmd(root: &Path, limit: Option<usize>, matching: &MatchArgs) -> Result<(), PointsError> {
    let config = build_config(matching)?;
    let images: Vec<PathBuf> = dataset_iter(root, limit).collect();
    info!("searching {} images under {}", images.len(), root.display());

    let start = Instant::now();
    let results: Vec<(PathBuf, Result<usize, PointsError>)> = images
        .into_par_iter()
        .map(|path| {
            let found = load_image(&path).map(|pixels| {
                let mut searcher = PointSearcher::with_config(pixels, &config);
                searcher.run()
            });
            (path, found)
        })
        .collect();

    let mut failures = 0usize;
    let mut total = 0usize;
    for (path, found) in &results {
        match found {
            Ok(count) => {
                total += count;
                println!("{}: {} points", path.display(), count);
            }
            Err(err) => {
                failures += 1;
                error!("{}: {}", path.display(), err);
            }
        }
    }
    println!(
        "{} images, {} points, {} failed in {:.2?}",
        results.len(),
        total,
        failures,
        start.elapsed()
    );
    for (path, _) in results.iter().filter(|(_, found)| matches!(found, Ok(0))) {
        debug!("no points in {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_color_accepts_three_channels() {
        let exact = parse_color("1, 2,3").unwrap();
        assert_eq!(exact.target(), image_points::Color::rgb(1, 2, 3));
    }

    #[test]
    fn parse_color_rejects_bad_input() {
        assert!(parse_color("1,2").unwrap_err().is_invalid_input());
        assert!(parse_color("1,2,300").unwrap_err().is_invalid_input());
        assert!(parse_color("red").unwrap_err().is_invalid_input());
    }

    #[test]
    fn cli_parses_search() {
        let cli = Cli::try_parse_from([
            "points", "search", "--image", "a.png", "--margin", "-1", "--color", "0,0,0",
        ])
        .unwrap();
        match cli.command {
            Command::Search { matching, .. } => {
                let config = build_config(&matching).unwrap();
                assert_eq!(config.margin, -1);
                assert_eq!(config.strategy.name(), "exact-color");
            }
            _ => panic!("expected search"),
        }
    }
}
