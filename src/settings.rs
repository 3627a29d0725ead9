//! # Settings Module
//!
//! ## Purpose
//! Holds the reaction configuration of the RT planner: final reaction volume, the fixed
//! reagent set, the pipetting floor and the pre-dilution preferences. The values are
//! fixed for the life of a calculation and are passed explicitly into the planner, so
//! the whole core can be exercised with alternative configurations.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "final_volume": 20.0,
//!   "min_pipette_volume": 0.5,
//!   "reagents": [
//!     { "name": "10x buffer", "volume": 2.0 },
//!     { "name": "dNTPs", "volume": 0.8 },
//!     { "name": "Random primers", "volume": 2.0 },
//!     { "name": "Enzyme", "volume": 1.0 }
//!   ],
//!   "preferred_dilutions": [2, 3, 4, 5, 10, 20, 50],
//!   "prep_volume": 10.0
//! }
//! ```
//! Missing keys fall back to the defaults above.
//!
//! ## Usage Pattern
//! ```rust
//! use rt_mix::settings::RtConfig;
//!
//! let config = RtConfig::default();
//! assert!((config.available_rna_h2o() - 14.2).abs() < 1e-9);
//! ```

use crate::RTplanner::planner_api::PlannerError;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// default location of the configuration file
pub const CONFIG_FILE: &str = "rt_mix_config.json";

/// one fixed per-reaction reagent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reagent {
    pub name: String,
    /// volume per reaction, µl
    pub volume: f64,
}

impl Reagent {
    pub fn new(name: &str, volume: f64) -> Self {
        Self {
            name: name.to_string(),
            volume,
        }
    }
}

/// Reaction configuration shared by every sample of a batch.
///
/// # Fields
/// * `final_volume` - total reaction volume, µl
/// * `min_pipette_volume` - smallest volume that can be pipetted accurately, µl
/// * `reagents` - fixed reagents in master-mix order
/// * `preferred_dilutions` - "clean" pre-dilution factors, tried in ascending order
/// * `prep_volume` - volume of diluted RNA suggested in the recipe text, µl
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RtConfig {
    pub final_volume: f64,
    pub min_pipette_volume: f64,
    pub reagents: Vec<Reagent>,
    pub preferred_dilutions: Vec<u32>,
    pub prep_volume: f64,
}

impl Default for RtConfig {
    fn default() -> Self {
        Self {
            final_volume: 20.0,
            min_pipette_volume: 0.5,
            reagents: vec![
                Reagent::new("10x buffer", 2.0),
                Reagent::new("dNTPs", 0.8),
                Reagent::new("Random primers", 2.0),
                Reagent::new("Enzyme", 1.0),
            ],
            preferred_dilutions: vec![2, 3, 4, 5, 10, 20, 50],
            prep_volume: 10.0,
        }
    }
}

impl RtConfig {
    /// sum of the fixed reagent volumes, summed in list order
    pub fn total_fixed(&self) -> f64 {
        self.reagents.iter().map(|r| r.volume).sum()
    }

    /// volume left for RNA and water in every reaction
    pub fn available_rna_h2o(&self) -> f64 {
        self.final_volume - self.total_fixed()
    }

    pub fn reagent_volume(&self, name: &str) -> Option<f64> {
        self.reagents.iter().find(|r| r.name == name).map(|r| r.volume)
    }

    /// Checks that the configuration leaves room for RNA and can be pipetted at all.
    ///
    /// # Returns
    /// * `Ok(())` - if the budget and the pipetting floor are positive and every reagent volume is non-negative
    /// * `Err(PlannerError::InvalidConfig)` - otherwise
    pub fn validate(&self) -> Result<(), PlannerError> {
        if !(self.min_pipette_volume > 0.0) {
            return Err(PlannerError::InvalidConfig(format!(
                "minimum pipette volume must be positive, got {}",
                self.min_pipette_volume
            )));
        }
        if let Some(r) = self.reagents.iter().find(|r| !(r.volume >= 0.0)) {
            return Err(PlannerError::InvalidConfig(format!(
                "reagent '{}' has invalid volume {}",
                r.name, r.volume
            )));
        }
        if !(self.available_rna_h2o() > 0.0) {
            return Err(PlannerError::InvalidConfig(format!(
                "fixed reagents ({} µl) leave no room for RNA in {} µl",
                self.total_fixed(),
                self.final_volume
            )));
        }
        if !(self.prep_volume > 0.0) {
            return Err(PlannerError::InvalidConfig(format!(
                "dilution prep volume must be positive, got {}",
                self.prep_volume
            )));
        }
        Ok(())
    }
}

/// Loads, validates and stores the reaction configuration.
///
/// # Fields
/// * `config` - current configuration
/// * `config_file` - path used by `save_config`
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: RtConfig,
    config_file: String,
}

impl ConfigManager {
    /// Reads `rt_mix_config.json` from the working directory, or uses the defaults
    /// when the file is absent or unusable.
    pub fn new() -> Self {
        Self::with_config_file(CONFIG_FILE)
    }

    pub fn with_config_file(config_file: &str) -> Self {
        let config = match Self::load_config(config_file) {
            Ok(config) => config,
            Err(e) => {
                warn!("{}; using default reaction configuration", e);
                RtConfig::default()
            }
        };
        Self {
            config,
            config_file: config_file.to_string(),
        }
    }

    /// Loads configuration from a JSON file.
    ///
    /// # Returns
    /// * `Ok(RtConfig)` - parsed and validated configuration, or the default one if the file does not exist
    /// * `Err(PlannerError)` - on I/O, JSON or validation failure
    pub fn load_config(config_file: &str) -> Result<RtConfig, PlannerError> {
        if !Path::new(config_file).exists() {
            return Ok(RtConfig::default());
        }
        let content = fs::read_to_string(config_file)?;
        let config: RtConfig = serde_json::from_str(&content)?;
        config.validate()?;
        info!("Loaded reaction configuration from '{}'", config_file);
        Ok(config)
    }

    pub fn save_config(&self) -> Result<(), PlannerError> {
        let content = serde_json::to_string_pretty(&self.config)?;
        fs::write(&self.config_file, content)?;
        info!("Saved reaction configuration to '{}'", self.config_file);
        Ok(())
    }

    pub fn get_config(&self) -> &RtConfig {
        &self.config
    }

    /// Replaces the configuration after validating it. The old one is kept on error.
    pub fn set_config(&mut self, config: RtConfig) -> Result<(), PlannerError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn reset_to_defaults(&mut self) {
        self.config = RtConfig::default();
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
