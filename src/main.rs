//! sightline - per-tick look-at target resolution
//!
//! Headless driver: sweeps an observer across a demo scene and logs what it targets.

mod headless;

use anyhow::Result;
use headless::HeadlessConfig;
use sightline_targeting::TargetingConfig;
use std::{env, path::PathBuf};
use tracing::info;

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting sightline v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));
    if cli.help {
        print_usage();
        return Ok(());
    }

    let targeting = match &cli.config {
        Some(path) => TargetingConfig::load_from_path(path),
        None => TargetingConfig::default(),
    };
    if let Some(path) = &cli.write_config {
        targeting.save_to_path(path)?;
        info!(path = %path.display(), "Wrote targeting config");
    }

    let summary = headless::run(HeadlessConfig {
        targeting,
        ticks: cli.ticks,
        seed: cli.seed,
    })?;
    info!(
        ticks = summary.ticks,
        blocks = summary.blocks,
        entities = summary.entities,
        misses = summary.misses,
        "Sweep finished"
    );
    Ok(())
}

fn print_usage() {
    println!(
        "usage: sightline [--config <path>] [--write-config <path>] [--ticks <n>] [--seed <n>]"
    );
}

struct CliOptions {
    config: Option<PathBuf>,
    write_config: Option<PathBuf>,
    ticks: u64,
    seed: u64,
    help: bool,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions {
            config: None,
            write_config: None,
            ticks: 200,
            seed: 0,
            help: false,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    if let Some(path) = args.next() {
                        opts.config = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--config requires a file path");
                    }
                }
                "--write-config" => {
                    if let Some(path) = args.next() {
                        opts.write_config = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--write-config requires a file path");
                    }
                }
                "--ticks" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<u64>() {
                            Ok(value) => opts.ticks = value,
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--ticks must be an integer");
                            }
                        }
                    } else {
                        tracing::error!("--ticks requires an integer");
                    }
                }
                "--seed" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<u64>() {
                            Ok(value) => opts.seed = value,
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--seed must be an integer");
                            }
                        }
                    } else {
                        tracing::error!("--seed requires an integer");
                    }
                }
                "--help" | "-h" => opts.help = true,
                other => {
                    tracing::warn!(arg = other, "Ignoring unknown argument");
                }
            }
        }

        opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliOptions {
        CliOptions::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults_without_arguments() {
        let opts = parse(&[]);
        assert!(opts.config.is_none());
        assert_eq!(opts.ticks, 200);
        assert_eq!(opts.seed, 0);
    }

    #[test]
    fn parses_known_flags_and_skips_bad_values() {
        let opts = parse(&["--config", "t.toml", "--ticks", "12", "--seed", "nope"]);
        assert_eq!(opts.config, Some(PathBuf::from("t.toml")));
        assert_eq!(opts.ticks, 12);
        assert_eq!(opts.seed, 0);
    }
}
