//! # Planner API
//!
//! Request/response transform around the planner: a `CalcRequest` (as read from JSON)
//! goes in, a `CalcResponse` with sorted rows, the master mix and the effective
//! settings comes out. Errors of the boundary layer live here as well; the planner
//! itself never fails.
//!
//! ```json
//! { "target_ng": 200.0, "overage_pct": 10.0,
//!   "samples": [ { "sample": "RNA_01", "conc": 50.0 } ],
//!   "use_example": false }
//! ```
use crate::RTplanner::master_mix::MasterMix;
use crate::RTplanner::rt_planner::{PlanOutput, PlanRow, calc_rows};
use crate::RTplanner::volume_calculator::Sample;
use crate::Utils::load_from_file::load_samples_from_csv;
use crate::settings::RtConfig;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_TARGET_NG: f64 = 200.0;
pub const DEFAULT_OVERAGE_PCT: f64 = 10.0;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("File '{0}' does not exist")]
    MissingFile(String),
    #[error("Bad sample at line {line}: '{content}'")]
    BadSampleLine { line: u64, content: String },
    #[error("No samples provided.")]
    NoSamples,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

fn default_target_ng() -> f64 {
    DEFAULT_TARGET_NG
}

fn default_overage_pct() -> f64 {
    DEFAULT_OVERAGE_PCT
}

/// per-request settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalcSettings {
    #[serde(default = "default_target_ng")]
    pub target_ng: f64,
    #[serde(default = "default_overage_pct")]
    pub overage_pct: f64,
}

impl Default for CalcSettings {
    fn default() -> Self {
        Self {
            target_ng: DEFAULT_TARGET_NG,
            overage_pct: DEFAULT_OVERAGE_PCT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalcRequest {
    #[serde(default = "default_target_ng")]
    pub target_ng: f64,
    #[serde(default = "default_overage_pct")]
    pub overage_pct: f64,
    #[serde(default)]
    pub samples: Vec<Sample>,
    /// plan the bundled example samples instead of `samples`
    #[serde(default)]
    pub use_example: bool,
}

impl Default for CalcRequest {
    fn default() -> Self {
        Self {
            target_ng: DEFAULT_TARGET_NG,
            overage_pct: DEFAULT_OVERAGE_PCT,
            samples: Vec::new(),
            use_example: false,
        }
    }
}

impl CalcRequest {
    pub fn new(samples: Vec<Sample>, settings: CalcSettings) -> Self {
        Self {
            target_ng: settings.target_ng,
            overage_pct: settings.overage_pct,
            samples,
            use_example: false,
        }
    }

    pub fn settings(&self) -> CalcSettings {
        CalcSettings {
            target_ng: self.target_ng,
            overage_pct: self.overage_pct,
        }
    }

    pub fn from_json_file(file_name: &str) -> Result<Self, PlannerError> {
        if !Path::new(file_name).exists() {
            return Err(PlannerError::MissingFile(file_name.to_string()));
        }
        let content = fs::read_to_string(file_name)?;
        let request: CalcRequest = serde_json::from_str(&content)?;
        info!(
            "Read request with {} samples from '{}'",
            request.samples.len(),
            file_name
        );
        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalcResponse {
    pub rows: Vec<PlanRow>,
    pub master_mix: MasterMix,
    pub settings: CalcSettings,
}

impl CalcResponse {
    pub fn plan(&self) -> PlanOutput {
        PlanOutput {
            rows: self.rows.clone(),
            master_mix: self.master_mix.clone(),
        }
    }
}

/// Samples and default settings of the bundled example.
pub fn example_request(example_path: &Path) -> Result<CalcRequest, PlannerError> {
    let samples = load_samples_from_csv(&example_path.to_string_lossy())?;
    Ok(CalcRequest::new(samples, CalcSettings::default()))
}

/// Runs the planner for one request.
///
/// # Arguments
/// * `request` - settings and samples; empty samples or `use_example` switch to the example file
/// * `config` - reaction configuration
/// * `example_path` - CSV with the example samples
///
/// # Returns
/// * `Ok(CalcResponse)` - rows sorted by order key, master mix, settings used
/// * `Err(PlannerError::NoSamples)` - if there is nothing to plan, or a loading error of the example file
pub fn handle_request(
    request: &CalcRequest,
    config: &RtConfig,
    example_path: &Path,
) -> Result<CalcResponse, PlannerError> {
    let samples = if request.use_example || request.samples.is_empty() {
        info!("Using example samples from '{}'", example_path.display());
        load_samples_from_csv(&example_path.to_string_lossy())?
    } else {
        request.samples.clone()
    };
    if samples.is_empty() {
        return Err(PlannerError::NoSamples);
    }

    let plan = calc_rows(request.target_ng, &samples, request.overage_pct, config);
    let infeasible = plan.infeasible_count();
    if infeasible > 0 {
        warn!(
            "{} of {} samples cannot reach {} ng",
            infeasible,
            samples.len(),
            request.target_ng
        );
    }
    info!(
        "Planned {} samples, master mix for {} reactions",
        samples.len(),
        plan.master_mix.n_total
    );

    Ok(CalcResponse {
        rows: plan.rows,
        master_mix: plan.master_mix,
        settings: request.settings(),
    })
}

pub fn response_to_json(response: &CalcResponse) -> Result<String, PlannerError> {
    Ok(serde_json::to_string_pretty(response)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Utils::load_from_file::example_path;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_request_defaults() {
        let request: CalcRequest =
            serde_json::from_str(r#"{ "samples": [ { "sample": "A", "conc": 50.0 } ] }"#).unwrap();
        assert_eq!(request.target_ng, 200.0);
        assert_eq!(request.overage_pct, 10.0);
        assert!(!request.use_example);
        assert_eq!(request.samples, vec![Sample::new("A", 50.0)]);

        let empty: CalcRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, CalcRequest::default());
    }

    #[test]
    fn test_handle_request() {
        let request = CalcRequest::new(
            vec![Sample::new("A", 50.0), Sample::new("B", 0.0)],
            CalcSettings {
                target_ng: 100.0,
                overage_pct: 0.0,
            },
        );
        let response =
            handle_request(&request, &RtConfig::default(), Path::new("unused.csv")).unwrap();
        assert_eq!(response.rows.len(), 3);
        assert_eq!(response.master_mix.n_total, 2);
        assert_eq!(response.settings.target_ng, 100.0);
        let first = response.rows[0].as_sample().unwrap();
        assert_eq!(first.rna_volume, Some(2.0));
        assert_eq!(response.plan().infeasible_count(), 1);
    }

    #[test]
    fn test_empty_request_uses_example_file() {
        let file = csv_file("Sample,Conc\nX1,50\nX2,100\n");
        let response =
            handle_request(&CalcRequest::default(), &RtConfig::default(), file.path()).unwrap();
        assert_eq!(response.master_mix.n_samples, 2);
        assert_eq!(response.rows[1].as_sample().unwrap().sample, "X2");
    }

    #[test]
    fn test_use_example_overrides_samples() {
        let file = csv_file("E1,25\n");
        let request = CalcRequest {
            use_example: true,
            samples: vec![Sample::new("ignored", 10.0)],
            ..CalcRequest::default()
        };
        let response = handle_request(&request, &RtConfig::default(), file.path()).unwrap();
        assert_eq!(response.master_mix.n_samples, 1);
        assert_eq!(response.rows[0].as_sample().unwrap().sample, "E1");
    }

    #[test]
    fn test_no_samples_anywhere() {
        let file = csv_file("Sample,Conc\n");
        let result = handle_request(&CalcRequest::default(), &RtConfig::default(), file.path());
        assert!(matches!(result, Err(PlannerError::NoSamples)));
        assert_eq!(
            result.unwrap_err().to_string(),
            "No samples provided."
        );
    }

    #[test]
    fn test_missing_example_file() {
        let result = handle_request(
            &CalcRequest::default(),
            &RtConfig::default(),
            Path::new("definitely/missing/samples.csv"),
        );
        assert!(matches!(result, Err(PlannerError::MissingFile(_))));
    }

    #[test]
    fn test_bundled_example() {
        let request = example_request(&example_path()).unwrap();
        assert!(!request.samples.is_empty());
        assert_eq!(request.settings(), CalcSettings::default());
    }

    #[test]
    fn test_request_file_and_json_response() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"{ "target_ng": 200, "overage_pct": 10,
                  "samples": [ { "sample": "A", "conc": 2000 } ] }"#,
        )
        .unwrap();
        let request = CalcRequest::from_json_file(file.path().to_str().unwrap()).unwrap();
        let response = handle_request(&request, &RtConfig::default(), Path::new("unused")).unwrap();
        let json = response_to_json(&response).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rows"][0]["dilution_factor"], 5);
        assert_eq!(value["settings"]["overage_pct"], 10.0);
        assert_eq!(value["rows"][1]["label"], "MASTER MIX (10% overage) - 2 rxns");

        assert!(matches!(
            CalcRequest::from_json_file("no_such_request.json"),
            Err(PlannerError::MissingFile(_))
        ));
    }
}
