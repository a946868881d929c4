use std::path::PathBuf;

use anyhow::{Context as _, Result};
use parhull::{Point, PointSet};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

const USAGE: &str = "Usage: gen-points -n COUNT -o FILE [options]";

fn main() -> Result<()> {
    let mut options = getopts::Options::new();
    options.optflag("h", "help", "print this help menu");
    options.optopt("n", "count", "number of points to generate", "UINT");
    options.optopt("o", "out", "output file", "PATH");
    options.optopt(
        "d",
        "distribution",
        "square or disk (default disk)",
        "NAME",
    );
    options.optopt("s", "seed", "PRNG seed (default 0)", "UINT");

    let matches = options.parse(std::env::args().skip(1))?;
    if matches.opt_present("h") {
        eprintln!("{}", options.usage(USAGE));
        return Ok(());
    }

    let count: usize = matches
        .opt_get("n")
        .context("invalid value for option 'count'")?
        .context("missing required option 'count'")?;
    let out = PathBuf::from(
        matches
            .opt_str("o")
            .context("missing required option 'out'")?,
    );
    let distribution = matches
        .opt_str("d")
        .unwrap_or_else(|| "disk".to_owned());
    let seed: u64 = matches
        .opt_get("s")
        .context("invalid value for option 'seed'")?
        .unwrap_or(0);

    let mut rng = Pcg64::seed_from_u64(seed);
    let mut points = PointSet::with_capacity(count);
    match distribution.as_str() {
        "square" => {
            for _ in 0..count {
                points.push(Point::new(
                    rng.gen_range(-1.0f32..1.0),
                    rng.gen_range(-1.0f32..1.0),
                ));
            }
        }
        "disk" => {
            while points.len() < count {
                let x = rng.gen_range(-1.0f32..1.0);
                let y = rng.gen_range(-1.0f32..1.0);
                if x * x + y * y <= 1.0 {
                    points.push(Point::new(x, y));
                }
            }
        }
        other => anyhow::bail!("unknown distribution {other:?}, expected square or disk"),
    }

    parhull_tools::io::write_points(&out, &points)?;
    println!("wrote {count} points to {}", out.display());
    Ok(())
}
