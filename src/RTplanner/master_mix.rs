//! Master mix for a whole batch: every fixed reagent scaled by the number of samples
//! plus a percentage overage, prepared once in a single tube.
use crate::RTplanner::dilution_advisor::round_dp;
use crate::RTplanner::volume_calculator::ReagentVolume;
use crate::settings::RtConfig;
use serde::{Deserialize, Serialize};

/// added before truncation so that fractional reaction counts round up
const CEIL_FUDGE: f64 = 0.9999;
/// sort key of the master-mix row, never smaller than a sample index
pub const MASTER_MIX_ORDER: usize = usize::MAX;

/// batch-wide master mix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterMix {
    pub n_samples: usize,
    /// reactions the mix is made for, overage included (at least 1)
    pub n_total: usize,
    /// total volume of each fixed reagent, µl
    pub reagents: Vec<ReagentVolume>,
}

impl MasterMix {
    pub fn volume_of(&self, name: &str) -> Option<f64> {
        self.reagents.iter().find(|r| r.name == name).map(|r| r.volume)
    }

    pub fn total_volume(&self) -> f64 {
        round_dp(self.reagents.iter().map(|r| r.volume).sum(), 3)
    }
}

/// master mix as the last row of the plan table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterMixRow {
    pub order: usize,
    pub label: String,
    pub reagents: Vec<ReagentVolume>,
    pub note: String,
}

/// Number of reactions to prepare mix for: `max(1, trunc(n * (1 + p/100) + 0.9999))`.
///
/// The conversion is a fudged truncation rather than a true ceiling, so e.g. 10 samples
/// with 10 % overage (11.000000000000002) give 11 reactions, not 12.
pub fn reaction_count(n_samples: usize, overage_pct: f64) -> usize {
    let scaled = n_samples as f64 * (1.0 + overage_pct / 100.0) + CEIL_FUDGE;
    // negative or NaN saturate to 0
    (scaled as usize).max(1)
}

pub fn calc_master_mix(n_samples: usize, overage_pct: f64, config: &RtConfig) -> MasterMix {
    let n_total = reaction_count(n_samples, overage_pct);
    MasterMix {
        n_samples,
        n_total,
        reagents: config
            .reagents
            .iter()
            .map(|r| ReagentVolume {
                name: r.name.clone(),
                volume: round_dp(r.volume * n_total as f64, 3),
            })
            .collect(),
    }
}

pub fn master_mix_row(mm: &MasterMix, overage_pct: f64) -> MasterMixRow {
    MasterMixRow {
        order: MASTER_MIX_ORDER,
        label: format!("MASTER MIX ({:.0}% overage) - {} rxns", overage_pct, mm.n_total),
        reagents: mm.reagents.clone(),
        note: format!(
            "Make in one tube; covers {} samples + {:.0}% overage.",
            mm.n_samples, overage_pct
        ),
    }
}
