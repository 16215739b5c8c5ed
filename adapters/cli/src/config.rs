//! Command-line flags and the optional TOML file that configure a session.

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use grid_chase_core::Legend;
use grid_chase_system_bootstrap::Config;
use serde::Deserialize;

/// Delay between ticks when none is configured.
pub(crate) const DEFAULT_TICK_INTERVAL_MS: u64 = 300;

/// Flags accepted by the `grid-chase` binary. Flags win over the file.
#[derive(Debug, Default, Parser)]
#[command(name = "grid-chase", about = "Turn-based grid chase in the terminal")]
pub(crate) struct Args {
    /// TOML file with session settings.
    #[arg(long, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,
    /// Side length of the field, wall ring included.
    #[arg(long)]
    pub(crate) field_size: Option<u32>,
    /// Number of adversaries.
    #[arg(long)]
    pub(crate) adversaries: Option<u32>,
    /// Number of consumables.
    #[arg(long)]
    pub(crate) consumables: Option<u32>,
    /// Seed for placement and adversary movement.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Milliseconds to wait after each tick.
    #[arg(long)]
    pub(crate) tick_interval_ms: Option<u64>,
}

/// Shape of the configuration file. Every key is optional.
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    field_size: Option<u32>,
    adversary_count: Option<u32>,
    consumable_count: Option<u32>,
    seed: Option<u64>,
    tick_interval_ms: Option<u64>,
    glyphs: Option<Legend>,
}

impl FileConfig {
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse configuration toml contents")
    }
}

/// Everything the driver needs to start a session.
#[derive(Debug)]
pub(crate) struct Settings {
    pub(crate) config: Config,
    pub(crate) tick_interval: Duration,
}

/// Reads the file named by `--config`, if any, and layers the flags on top.
pub(crate) fn load(args: &Args) -> Result<Settings> {
    let file = match &args.config {
        Some(path) => {
            let contents = fs::read_to_string(path).with_context(|| {
                format!("failed to read configuration file at {}", path.display())
            })?;
            FileConfig::parse(&contents)
                .with_context(|| format!("invalid configuration file {}", path.display()))?
        }
        None => FileConfig::default(),
    };

    Ok(resolve(args, file, rand::random))
}

/// Merges flags over file values over defaults. `entropy` supplies a seed
/// when neither source names one.
pub(crate) fn resolve(args: &Args, file: FileConfig, entropy: impl FnOnce() -> u64) -> Settings {
    let seed = args.seed.or(file.seed).unwrap_or_else(entropy);

    let mut config = Config::new(seed)
        .with_field_size(
            args.field_size
                .or(file.field_size)
                .unwrap_or(Config::DEFAULT_FIELD_SIZE),
        )
        .with_adversary_count(
            args.adversaries
                .or(file.adversary_count)
                .unwrap_or(Config::DEFAULT_ADVERSARY_COUNT),
        )
        .with_consumable_count(
            args.consumables
                .or(file.consumable_count)
                .unwrap_or(Config::DEFAULT_CONSUMABLE_COUNT),
        );
    if let Some(legend) = file.glyphs {
        config = config.with_legend(legend);
    }

    let tick_interval_ms = args
        .tick_interval_ms
        .or(file.tick_interval_ms)
        .unwrap_or(DEFAULT_TICK_INTERVAL_MS);

    Settings {
        config,
        tick_interval: Duration::from_millis(tick_interval_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_chase_core::Glyph;

    #[test]
    fn defaults_apply_without_flags_or_file() {
        let settings = resolve(&Args::default(), FileConfig::default(), || 17);

        assert_eq!(settings.config, Config::new(17));
        assert_eq!(settings.tick_interval, Duration::from_millis(300));
    }

    #[test]
    fn file_values_fill_in_and_flags_override() {
        let file = FileConfig::parse(
            r#"
            field_size = 9
            adversary_count = 4
            seed = 5
            tick_interval_ms = 50

            [glyphs]
            wall = "X"
            "#,
        )
        .expect("valid toml");
        let args = Args::try_parse_from(["grid-chase", "--field-size", "12", "--seed", "8"])
            .expect("valid flags");

        let settings = resolve(&args, file, || unreachable!("seed is configured"));

        assert_eq!(settings.config.field_size(), 12);
        assert_eq!(settings.config.adversary_count(), 4);
        assert_eq!(settings.config.consumable_count(), Config::DEFAULT_CONSUMABLE_COUNT);
        assert_eq!(settings.config.rng_seed(), 8);
        assert_eq!(settings.config.legend().wall, Glyph::new("X"));
        assert_eq!(settings.config.legend().player, Legend::default().player);
        assert_eq!(settings.tick_interval, Duration::from_millis(50));
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let error = FileConfig::parse("enemy_num = 3").expect_err("unknown key");

        assert!(error.to_string().contains("configuration toml"));
    }

    #[test]
    fn unknown_glyph_keys_are_rejected() {
        let error = FileConfig::parse("[glyphs]\nenemy = \"G\"").expect_err("unknown glyph key");

        assert!(format!("{error:#}").contains("enemy"));
    }

    #[test]
    fn missing_file_reports_path() {
        let args = Args {
            config: Some(PathBuf::from("/nonexistent/grid-chase.toml")),
            ..Args::default()
        };

        let error = load(&args).expect_err("file does not exist");

        assert!(format!("{error:#}").contains("/nonexistent/grid-chase.toml"));
    }
}
