//! Per-sample RNA/water volumes for one RT reaction.
//!
//! For a sample of concentration `c` and a target mass `T` the stock volume is `T / c`.
//! It is used directly when it fits the RNA+water budget and can be pipetted, routed
//! through the dilution advisor when it is too small, and reported as infeasible (with
//! the achievable mass) when it is too large. Nothing here fails: every outcome is a row.
use crate::RTplanner::dilution_advisor::{round_dp, suggest_dilution};
use crate::settings::RtConfig;
use serde::{Deserialize, Serialize};

/// RNA sample as supplied by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// sample name, not required to be unique
    pub sample: String,
    /// concentration, ng/µl
    pub conc: f64,
}

impl Sample {
    pub fn new(sample: &str, conc: f64) -> Self {
        Self {
            sample: sample.to_string(),
            conc,
        }
    }
}

/// reagent name with a volume in µl
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReagentVolume {
    pub name: String,
    pub volume: f64,
}

/// Computed reaction setup of one sample. Values are rounded for display:
/// volumes to 3 decimals, masses to 1 decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRow {
    /// position of the sample in the input
    pub order: usize,
    pub sample: String,
    /// ng/µl
    pub conc: f64,
    /// RNA (stock or pre-diluted) to add, µl; `None` if no feasible recipe exists
    pub rna_volume: Option<f64>,
    /// pre-dilution factor, if the RNA must be diluted first
    pub dilution_factor: Option<u32>,
    pub reagents: Vec<ReagentVolume>,
    /// µl; `None` together with `rna_volume`
    pub h2o: Option<f64>,
    pub final_volume: f64,
    /// ng of RNA that ends up in the reaction
    pub achievable_ng: f64,
    pub note: String,
}

impl SampleRow {
    pub fn is_feasible(&self) -> bool {
        self.rna_volume.is_some()
    }
}

/// Computes the reaction setup of one sample.
///
/// # Arguments
/// * `order` - input index of the sample, used as the sort key
/// * `sample` - name and concentration
/// * `target_ng` - RNA mass wanted in the reaction
/// * `config` - reaction volumes and pipetting floor
pub fn calc_sample_row(
    order: usize,
    sample: &Sample,
    target_ng: f64,
    config: &RtConfig,
) -> SampleRow {
    let conc = sample.conc;
    let avail = config.available_rna_h2o();
    let min_pip = config.min_pipette_volume;

    let req_rna_vol = if conc > 0.0 { target_ng / conc } else { f64::NAN };
    // NaN compares false
    let feasible_by_space = req_rna_vol <= avail;

    let mut rna_vol_to_add: Option<f64> = None;
    let mut dilution_factor: Option<u32> = None;
    let mut achievable = if conc > 0.0 { (conc * avail).max(0.0) } else { 0.0 };
    let note;

    if feasible_by_space {
        if req_rna_vol >= min_pip {
            rna_vol_to_add = Some(req_rna_vol);
            achievable = target_ng;
            note = String::new();
        } else if let Some(s) = suggest_dilution(req_rna_vol, config) {
            rna_vol_to_add = Some(s.aliquot);
            dilution_factor = Some(s.factor);
            achievable = target_ng;
            note = format!(
                "Required stock volume {:.3} µl < {:?} µl. {} Then add {:.3} µl of the diluted RNA.",
                req_rna_vol, min_pip, s.recipe, s.aliquot
            );
        } else {
            note = format!(
                "Required stock volume {:.3} µl is too small to pipette and no suitable pre-dilution fits within {:.1} µl.",
                req_rna_vol, avail
            );
        }
    } else {
        note = format!("Conc too low: max {:.1} ng in {:.1} µl.", achievable, avail);
    }

    let h2o = rna_vol_to_add.map(|rna| avail - rna);

    SampleRow {
        order,
        sample: sample.sample.clone(),
        conc: round_dp(conc, 3),
        rna_volume: rna_vol_to_add.map(|v| round_dp(v, 3)),
        dilution_factor,
        reagents: config
            .reagents
            .iter()
            .map(|r| ReagentVolume {
                name: r.name.clone(),
                volume: r.volume,
            })
            .collect(),
        h2o: h2o.map(|v| round_dp(v, 3)),
        final_volume: config.final_volume,
        achievable_ng: round_dp(achievable, 1),
        note,
    }
}
