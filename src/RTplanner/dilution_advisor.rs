//! Pre-dilution advice for samples so concentrated that the stock volume needed for
//! the target mass is below the pipetting floor.
//!
//! Clean, bench-friendly factors from `RtConfig::preferred_dilutions` are tried first
//! (smallest that works wins); only if none of them fits the minimal integer factor is used.
use crate::settings::RtConfig;
use log::debug;

/// added before truncation to turn `m / req` into a ceiling
const CEIL_FUDGE: f64 = 0.9999;

/// chosen pre-dilution of one sample
#[derive(Debug, Clone, PartialEq)]
pub struct DilutionSuggestion {
    /// dilution factor D (1 part RNA in D parts total)
    pub factor: u32,
    /// volume of the diluted RNA to add to the reaction, µl (exactly `factor * req`)
    pub aliquot: f64,
    /// human readable recipe for the pre-dilution
    pub recipe: String,
}

/// Rounds to a given number of decimal places, half away from zero.
pub fn round_dp(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Recipe for making `prep_total_ul` µl of a D× dilution.
pub fn dilution_recipe_text(factor: u32, prep_total_ul: f64) -> String {
    if factor <= 1 {
        return "No pre-dilution needed.".to_string();
    }
    let rna_ul = round_dp(prep_total_ul / factor as f64, 3);
    let h2o_ul = round_dp(prep_total_ul - rna_ul, 3);
    format!(
        "Pre-dilute {}× (1:{}). For example, make {} µl by mixing {:?} µl RNA + {:?} µl nuclease-free H₂O.",
        factor,
        factor - 1,
        prep_total_ul,
        rna_ul,
        h2o_ul
    )
}

/// Finds a dilution factor D such that `min_pipette_volume <= D * req <= available_rna_h2o`.
///
/// # Arguments
/// * `req_rna_vol` - stock volume needed for the target mass, µl
/// * `config` - supplies the budget, the pipetting floor, preferred factors and prep volume
///
/// # Returns
/// * `Some(DilutionSuggestion)` - first preferred factor that fits, else the minimal factor if it fits
/// * `None` - if `req_rna_vol <= 0` or no factor fits the budget
pub fn suggest_dilution(req_rna_vol: f64, config: &RtConfig) -> Option<DilutionSuggestion> {
    if !(req_rna_vol > 0.0) {
        return None;
    }
    let avail = config.available_rna_h2o();
    let min_pip = config.min_pipette_volume;

    let d_needed_min = (min_pip / req_rna_vol + CEIL_FUDGE).trunc();
    let d_needed_max = (avail / req_rna_vol).floor();
    if d_needed_max < 1.0 {
        return None;
    }

    let suggestion = |factor: u32| DilutionSuggestion {
        factor,
        aliquot: factor as f64 * req_rna_vol,
        recipe: dilution_recipe_text(factor, config.prep_volume),
    };

    for &factor in &config.preferred_dilutions {
        let aliquot = factor as f64 * req_rna_vol;
        if min_pip <= aliquot && aliquot <= avail {
            debug!("preferred dilution {}x gives aliquot {:.3} µl", factor, aliquot);
            return Some(suggestion(factor));
        }
    }

    let mut factor = d_needed_min.max(1.0);
    // the fudge can land one below the true ceiling
    if factor * req_rna_vol < min_pip {
        factor += 1.0;
    }
    let aliquot = factor * req_rna_vol;
    if factor > u32::MAX as f64 || aliquot < min_pip || aliquot > avail {
        return None;
    }
    let factor = factor as u32;
    debug!("fallback dilution {}x for stock volume {:.4} µl", factor, req_rna_vol);
    Some(suggestion(factor))
}
