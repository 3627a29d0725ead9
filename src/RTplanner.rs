/// RNA volume, water volume and achievable mass of a single RT reaction
/// # Examples
/// ```
/// use rt_mix::RTplanner::volume_calculator::{Sample, calc_sample_row};
/// use rt_mix::settings::RtConfig;
/// let config = RtConfig::default();
/// let row = calc_sample_row(0, &Sample::new("RNA_01", 50.0), 200.0, &config);
/// assert_eq!(row.rna_volume, Some(4.0));
/// assert_eq!(row.h2o, Some(10.2));
/// ```
pub mod volume_calculator;
/// pre-dilution factors for samples too concentrated to pipette directly
pub mod dilution_advisor;
/// batch master mix with overage
pub mod master_mix;
/// the batch planner: sample rows plus the master-mix row, in a fixed order
/// # Examples
/// ```
/// use rt_mix::RTplanner::rt_planner::calc_rows;
/// use rt_mix::RTplanner::volume_calculator::Sample;
/// use rt_mix::settings::RtConfig;
/// let samples = vec![Sample::new("A", 50.0), Sample::new("B", 2000.0), Sample::new("C", 1.0)];
/// let plan = calc_rows(200.0, &samples, 10.0, &RtConfig::default());
/// assert_eq!(plan.rows.len(), 4);
/// assert_eq!(plan.master_mix.n_total, 4);
/// assert_eq!(plan.infeasible_count(), 1);
/// ```
pub mod rt_planner;
/// requests, responses and boundary errors
pub mod planner_api;
/// terminal table and CSV export
pub mod planner_output;
