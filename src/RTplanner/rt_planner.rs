//! Batch planning: one row per sample in input order, then the master-mix row.
use crate::RTplanner::master_mix::{MasterMix, MasterMixRow, calc_master_mix, master_mix_row};
use crate::RTplanner::volume_calculator::{Sample, SampleRow, calc_sample_row};
use crate::settings::RtConfig;
use log::debug;
use serde::{Deserialize, Serialize};

/// row of the plan table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanRow {
    Sample(SampleRow),
    MasterMix(MasterMixRow),
}

impl PlanRow {
    /// explicit sort key: input index for samples, `MASTER_MIX_ORDER` for the mix
    pub fn order(&self) -> usize {
        match self {
            PlanRow::Sample(row) => row.order,
            PlanRow::MasterMix(row) => row.order,
        }
    }

    pub fn as_sample(&self) -> Option<&SampleRow> {
        match self {
            PlanRow::Sample(row) => Some(row),
            PlanRow::MasterMix(_) => None,
        }
    }

    pub fn as_master_mix(&self) -> Option<&MasterMixRow> {
        match self {
            PlanRow::MasterMix(row) => Some(row),
            PlanRow::Sample(_) => None,
        }
    }
}

/// result of planning a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanOutput {
    /// sample rows followed by the master-mix row, always `samples + 1` long
    pub rows: Vec<PlanRow>,
    pub master_mix: MasterMix,
}

impl PlanOutput {
    pub fn sample_rows(&self) -> impl Iterator<Item = &SampleRow> {
        self.rows.iter().filter_map(PlanRow::as_sample)
    }

    /// number of samples with no feasible recipe
    pub fn infeasible_count(&self) -> usize {
        self.sample_rows().filter(|r| !r.is_feasible()).count()
    }
}

/// Plans RT reactions for a batch of samples.
///
/// # Arguments
/// * `target_ng` - RNA mass per reaction, ng
/// * `samples` - samples in the order they should appear
/// * `overage_pct` - extra master mix, percent of the sample count
/// * `config` - reaction configuration
///
/// # Returns
/// `PlanOutput` with one row per sample plus the master-mix row, sorted by order key.
/// Infeasible samples are reported in their rows and never stop the batch.
pub fn calc_rows(
    target_ng: f64,
    samples: &[Sample],
    overage_pct: f64,
    config: &RtConfig,
) -> PlanOutput {
    let mut rows: Vec<PlanRow> = samples
        .iter()
        .enumerate()
        .map(|(idx, s)| PlanRow::Sample(calc_sample_row(idx, s, target_ng, config)))
        .collect();

    let master_mix = calc_master_mix(samples.len(), overage_pct, config);
    rows.push(PlanRow::MasterMix(master_mix_row(&master_mix, overage_pct)));
    rows.sort_by_key(PlanRow::order);

    let output = PlanOutput { rows, master_mix };
    debug!(
        "planned {} samples ({} infeasible) at {} ng, {} reactions of master mix",
        samples.len(),
        output.infeasible_count(),
        target_ng,
        output.master_mix.n_total
    );
    output
}
