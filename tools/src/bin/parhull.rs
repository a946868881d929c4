use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context as _, Result};
use parhull::{HullBuilder, ParallelHull};
use parhull_tools::logger::LogLevel;
use parhull_tools::{io, logger};

const USAGE: &str = "Usage: parhull -f FILE [options]";

fn main() -> Result<()> {
    let mut options = getopts::Options::new();
    options.optflag("h", "help", "print this help menu");
    options.optopt(
        "f",
        "file",
        "binary point file: all X coordinates then all Y coordinates, little-endian f32",
        "PATH",
    );
    options.optopt("j", "threads", "number of worker threads (default 1)", "UINT");
    options.optopt(
        "l",
        "loglvl",
        "log level: error|critical|warning|notice|info|debug|trace (default info)",
        "LEVEL",
    );
    options.optopt(
        "o",
        "out",
        "write the hull as `x y` lines, counter-clockwise",
        "PATH",
    );

    let matches = options.parse(std::env::args().skip(1))?;
    if matches.opt_present("h") {
        eprintln!("{}", options.usage(USAGE));
        return Ok(());
    }

    let level = match matches.opt_str("l") {
        Some(name) => name.parse::<LogLevel>().map_err(anyhow::Error::msg)?,
        None => LogLevel::default(),
    };
    logger::init(level);

    let file = PathBuf::from(
        matches
            .opt_str("f")
            .context("missing required option 'file'")?,
    );
    let threads: usize = matches
        .opt_get("j")
        .context("invalid value for option 'threads'")?
        .unwrap_or(1);
    if threads == 0 {
        anyhow::bail!("the number of threads cannot be zero");
    }

    let start = Instant::now();
    let mut points = io::read_points(&file)?;
    if points.is_empty() {
        anyhow::bail!("{} holds no points", file.display());
    }
    tracing::info!("read {} points in {:?}", points.len(), start.elapsed());

    let solve = Instant::now();
    let hull = ParallelHull {
        workers: threads,
        ..Default::default()
    }
    .build(&mut points);
    tracing::info!(
        "hull of {} vertices found in {:?}",
        hull.len(),
        solve.elapsed()
    );

    if let Some(out) = matches.opt_str("o") {
        let out = PathBuf::from(out);
        io::write_hull(&out, &hull)?;
        tracing::info!("hull written to {}", out.display());
    }

    Ok(())
}
