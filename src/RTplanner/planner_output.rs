//! Terminal table and CSV export of a plan. Both use the same columns:
//! sample, concentration, RNA volume, one column per fixed reagent, water,
//! final volume, achievable mass and note.
use crate::RTplanner::planner_api::PlannerError;
use crate::RTplanner::rt_planner::{PlanOutput, PlanRow};
use log::info;
use prettytable::{Cell, Row, Table};

/// numbers always keep a decimal point: `4.0`, `10.2`
fn num_cell(value: f64) -> String {
    format!("{:?}", value)
}

fn opt_cell(value: Option<f64>) -> String {
    value.map(num_cell).unwrap_or_default()
}

/// column headers; reagent columns follow the master-mix reagent order
pub fn table_headers(plan: &PlanOutput) -> Vec<String> {
    let mut headers = vec![
        "Sample".to_string(),
        "RNA Conc (ng/µl)".to_string(),
        "RNA Volume (µl)".to_string(),
    ];
    headers.extend(plan.master_mix.reagents.iter().map(|r| r.name.clone()));
    headers.extend([
        "H2O (µl)".to_string(),
        "final volume (µl)".to_string(),
        "Achievable RNA (ng)".to_string(),
        "Note".to_string(),
    ]);
    headers
}

/// cells of one row; absent values are empty strings
pub fn row_cells(row: &PlanRow) -> Vec<String> {
    match row {
        PlanRow::Sample(r) => {
            let mut cells = vec![r.sample.clone(), num_cell(r.conc), opt_cell(r.rna_volume)];
            cells.extend(r.reagents.iter().map(|v| num_cell(v.volume)));
            cells.extend([
                opt_cell(r.h2o),
                num_cell(r.final_volume),
                num_cell(r.achievable_ng),
                r.note.clone(),
            ]);
            cells
        }
        PlanRow::MasterMix(r) => {
            let mut cells = vec![r.label.clone(), String::new(), String::new()];
            cells.extend(r.reagents.iter().map(|v| num_cell(v.volume)));
            cells.extend([String::new(), String::new(), String::new(), r.note.clone()]);
            cells
        }
    }
}

pub fn render_table(plan: &PlanOutput) -> Table {
    let mut table = Table::new();
    let header: Vec<Cell> = table_headers(plan).iter().map(|h| Cell::new(h)).collect();
    table.set_titles(Row::new(header));
    for row in &plan.rows {
        let cells: Vec<Cell> = row_cells(row).iter().map(|c| Cell::new(c)).collect();
        table.add_row(Row::new(cells));
    }
    table
}

pub fn print_plan(plan: &PlanOutput) {
    render_table(plan).printstd();
}

/// Writes the plan table to a CSV file.
pub fn export_csv(plan: &PlanOutput, file_name: &str) -> Result<(), PlannerError> {
    let mut wtr = csv::Writer::from_path(file_name)?;
    wtr.write_record(table_headers(plan))?;
    for row in &plan.rows {
        wtr.write_record(row_cells(row))?;
    }
    wtr.flush()?;
    info!("Plan with {} rows written to '{}'", plan.rows.len(), file_name);
    Ok(())
}
