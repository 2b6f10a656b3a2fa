//! Run configuration for the track-length estimator.
//!
//! [`FluenceConfig`] gathers the energy binning and the output settings. It
//! can be built in code, starting from [`FluenceConfig::default`], or parsed
//! from TOML with every key optional.

use super::binning::EnergyBinTable;
use super::error::Error;
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration of a fluence run.
///
/// Energies are in MeV.
///
/// # Examples
///
/// ```
/// use tle_fluence::FluenceConfig;
///
/// let config = FluenceConfig::from_toml(r#"
///     max_energy = 20.0
///     bin_count = 40
///     save_as_text = true
/// "#)?;
/// assert_eq!(config.bin_count, 40);
/// assert!(config.log_scale);
/// # Ok::<(), tle_fluence::FluenceError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FluenceConfig {
    /// Lower edge of the first energy bin.
    pub min_energy: f64,

    /// Upper edge of the last energy bin; steps entering above it abort the run.
    pub max_energy: f64,

    /// Number of energy bins.
    pub bin_count: usize,

    /// Logarithmic (`true`) or linear bin spacing.
    pub log_scale: bool,

    /// Write the binary histogram container at run end.
    pub save_as_binary: bool,

    /// Write one text file per spectrum at run end.
    pub save_as_text: bool,

    /// Output path. The binary container is written here; text files use the
    /// path without its extension as a stem.
    pub output: PathBuf,
}

impl Default for FluenceConfig {
    fn default() -> Self {
        Self {
            min_energy: 0.001,
            max_energy: 100.0,
            bin_count: 100,
            log_scale: true,
            save_as_binary: true,
            save_as_text: false,
            output: PathBuf::from("tle-fluence.tlef"),
        }
    }
}

impl FluenceConfig {
    /// Parses a configuration from TOML; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the TOML is malformed or contains
    /// unknown keys.
    pub fn from_toml(toml: &str) -> Result<Self, Error> {
        toml::from_str(toml).map_err(|e| Error::configuration(e.to_string()))
    }

    /// Checks the settings without keeping the bin table.
    ///
    /// # Errors
    ///
    /// See [`FluenceConfig::bin_table`].
    pub fn validate(&self) -> Result<(), Error> {
        self.bin_table().map(|_| ())
    }

    /// Validates the settings and builds the energy bin table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for an invalid energy range, a zero
    /// bin count, or an empty output path while a sink is enabled.
    pub fn bin_table(&self) -> Result<EnergyBinTable, Error> {
        if (self.save_as_binary || self.save_as_text) && self.output.as_os_str().is_empty() {
            return Err(Error::configuration(
                "an output path is required when saving is enabled",
            ));
        }
        self.energy_bins()
    }

    /// Builds the bin table from the energy settings alone, for runs whose
    /// sinks are supplied by the caller.
    pub(crate) fn energy_bins(&self) -> Result<EnergyBinTable, Error> {
        EnergyBinTable::build(
            self.min_energy,
            self.max_energy,
            self.bin_count,
            self.log_scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = FluenceConfig::default();
        assert_eq!(config.min_energy, 0.001);
        assert_eq!(config.max_energy, 100.0);
        assert_eq!(config.bin_count, 100);
        assert!(config.log_scale);
        assert!(config.save_as_binary);
        assert!(!config.save_as_text);
        assert_eq!(config.output, PathBuf::from("tle-fluence.tlef"));
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(
            FluenceConfig::from_toml("").unwrap(),
            FluenceConfig::default()
        );
    }

    #[test]
    fn toml_overrides_selected_keys() {
        let config = FluenceConfig::from_toml(
            r#"
            min_energy = 0.01
            log_scale = false
            output = "runs/water.tlef"
            "#,
        )
        .unwrap();
        assert_eq!(config.min_energy, 0.01);
        assert!(!config.log_scale);
        assert_eq!(config.output, PathBuf::from("runs/water.tlef"));
        assert_eq!(config.bin_count, 100);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            FluenceConfig::from_toml("bins = 3"),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            FluenceConfig::from_toml("bin_count = -3"),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn bin_table_validates_range() {
        let config = FluenceConfig {
            min_energy: 2.0,
            max_energy: 1.0,
            ..Default::default()
        };
        assert!(matches!(config.bin_table(), Err(Error::Configuration(_))));
        assert!(config.validate().is_err());

        let table = FluenceConfig::default().bin_table().unwrap();
        assert_eq!(table.bin_count(), 100);
        assert_eq!(table.max_energy(), 100.0);
    }

    #[test]
    fn empty_output_needs_disabled_sinks() {
        let config = FluenceConfig {
            output: PathBuf::new(),
            ..Default::default()
        };
        assert!(matches!(config.bin_table(), Err(Error::Configuration(_))));

        let in_memory = FluenceConfig {
            output: PathBuf::new(),
            save_as_binary: false,
            save_as_text: false,
            ..Default::default()
        };
        assert!(in_memory.bin_table().is_ok());
    }

    #[test]
    fn energy_bins_ignore_output_path() {
        let config = FluenceConfig {
            output: PathBuf::new(),
            ..Default::default()
        };
        assert!(config.bin_table().is_err());
        assert_eq!(config.energy_bins().unwrap().bin_count(), 100);

        let inverted = FluenceConfig {
            min_energy: 5.0,
            max_energy: 5.0,
            ..config
        };
        assert!(matches!(
            inverted.energy_bins(),
            Err(Error::Configuration(_))
        ));
    }
}
