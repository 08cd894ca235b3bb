use anyhow::{Context, Result};
use clap::Parser;
use jigsaw_reassembler::{parse_tiles, render, solve, Config, InputKind, PatternScanner};
use simplelog::{ColorChoice, CombinedLogger, SharedLogger, TermLogger, TerminalMode, WriteLogger};
use std::fs::{self, File};

/// Reassemble a shuffled tile picture and measure its roughness
#[derive(Parser, Debug)]
struct Args {
    /// Which input file to read from the data directory
    #[arg(value_enum, default_value_t = InputKind::Real)]
    input: InputKind,
}

fn init_logging(config: &Config) -> Result<()> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        config.log_level,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = &config.log_file {
        let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
        loggers.push(WriteLogger::new(config.log_level, simplelog::Config::default(), file));
    }
    CombinedLogger::init(loggers).context("initializing logger")?;
    return Ok(());
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_env()?;
    init_logging(&config)?;

    let path = config.input_path(args.input);
    log::info!("reading {}", path.display());
    let input = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let tiles = parse_tiles(&input)?;
    let solution = solve(tiles)?;

    println!("Part 1: product of corner ids is {}", solution.corner_product);
    println!("Part 2: water roughness is {}", solution.roughness);

    if let Some(render_path) = &config.render_path {
        let highlight = PatternScanner::default().matched_cells(&solution.composite);
        render::save_png(render_path, &solution.composite, &highlight, config.render_scale)?;
    }
    return Ok(());
}
