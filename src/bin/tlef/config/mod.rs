use std::fs;

use anyhow::{Context, Result};
use tle_fluence::{FluenceConfig, TabulatedStoppingPower};

use crate::cli::{ScoreArgs, StoppingOptions};

/// Builds the run configuration from the optional TOML file, then applies
/// command-line overrides on top.
pub fn build_fluence_config(args: &ScoreArgs) -> Result<FluenceConfig> {
    let mut config = match &args.io.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            FluenceConfig::from_toml(&text)
                .with_context(|| format!("Invalid config file: {}", path.display()))?
        }
        None => FluenceConfig::default(),
    };

    let binning = &args.binning;
    if let Some(min) = binning.min_energy {
        config.min_energy = min;
    }
    if let Some(max) = binning.max_energy {
        config.max_energy = max;
    }
    if let Some(n) = binning.bin_count {
        config.bin_count = n;
    }
    if binning.linear {
        config.log_scale = false;
    }

    if args.output.text {
        config.save_as_text = true;
    }
    if args.output.no_binary {
        config.save_as_binary = false;
    }
    if let Some(output) = &args.io.output {
        config.output = output.clone();
    }

    config.validate().context("Invalid run configuration")?;
    Ok(config)
}

pub fn load_stopping_power(opts: &StoppingOptions) -> Result<TabulatedStoppingPower> {
    let custom = opts
        .tables
        .as_ref()
        .map(|path| {
            fs::read_to_string(path).with_context(|| {
                format!("Failed to read stopping-power tables: {}", path.display())
            })
        })
        .transpose()?;

    TabulatedStoppingPower::load(custom.as_deref()).context("Failed to load stopping-power tables")
}
