use super::cli_main::get_user_input;
use crate::RTplanner::planner_api::{
    CalcRequest, CalcResponse, CalcSettings, DEFAULT_OVERAGE_PCT, DEFAULT_TARGET_NG,
    PlannerError, example_request, handle_request, response_to_json,
};
use crate::RTplanner::planner_output::{export_csv, print_plan};
use crate::Utils::load_from_file::{example_path, load_samples_from_csv};
use crate::settings::RtConfig;
use log::error;
use std::io::{self, Write};
use std::path::Path;

fn prompt(text: &str) -> String {
    print!("{}", text);
    let _ = io::stdout().flush();
    get_user_input().trim().to_string()
}

/// Parses a number typed by the user; empty input or garbage gives the default.
pub fn parse_or_default(input: &str, default: f64) -> f64 {
    let input = input.trim();
    if input.is_empty() {
        return default;
    }
    match input.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            println!("'{}' is not a number, using {}", input, default);
            default
        }
    }
}

fn prompt_settings() -> CalcSettings {
    let target_ng = parse_or_default(
        &prompt(&format!("Target RNA per reaction, ng [{}]: ", DEFAULT_TARGET_NG)),
        DEFAULT_TARGET_NG,
    );
    let overage_pct = parse_or_default(
        &prompt(&format!("Master mix overage, % [{}]: ", DEFAULT_OVERAGE_PCT)),
        DEFAULT_OVERAGE_PCT,
    );
    CalcSettings {
        target_ng,
        overage_pct,
    }
}

/// Plans a request, prints the table and offers a CSV export.
fn run_and_report(
    request: &CalcRequest,
    config: &RtConfig,
    interactive: bool,
) -> Result<CalcResponse, PlannerError> {
    let response = handle_request(request, config, &example_path())?;
    let plan = response.plan();
    println!(
        "\nTarget {} ng per reaction, {}% overage",
        response.settings.target_ng, response.settings.overage_pct
    );
    print_plan(&plan);
    if interactive {
        let out = prompt("Export to CSV (file name, empty to skip): ");
        if !out.is_empty() {
            export_csv(&plan, &out)?;
            println!("Written to {}", out);
        }
    }
    Ok(response)
}

fn report_error(result: Result<(), PlannerError>) {
    if let Err(e) = result {
        error!("{}", e);
        println!("\x1b[31mError: {}\x1b[0m", e);
    }
}

pub fn plan_from_csv_menu(config: &RtConfig) {
    let file_name = prompt("CSV file with sample,concentration lines: ");
    let result = load_samples_from_csv(&file_name).and_then(|samples| {
        let request = CalcRequest::new(samples, prompt_settings());
        if request.samples.is_empty() {
            return Err(PlannerError::NoSamples);
        }
        run_and_report(&request, config, true)
    });
    report_error(result.map(|_| ()));
}

pub fn plan_example(config: &RtConfig) {
    let result = example_request(&example_path()).and_then(|example| {
        let request = CalcRequest::new(example.samples, prompt_settings());
        run_and_report(&request, config, true)
    });
    report_error(result.map(|_| ()));
}

pub fn plan_from_json_menu(config: &RtConfig) {
    let file_name = prompt("JSON request file: ");
    let result = CalcRequest::from_json_file(&file_name)
        .and_then(|request| run_and_report(&request, config, true));
    report_error(result.map(|_| ()));
}

pub fn show_config(config: &RtConfig) {
    println!("\nFinal volume: {} µl", config.final_volume);
    for r in &config.reagents {
        println!("  {:<16} {} µl", r.name, r.volume);
    }
    println!("RNA + H2O budget: {:.1} µl", config.available_rna_h2o());
    println!("Minimum pipette volume: {} µl", config.min_pipette_volume);
    println!("Preferred dilutions: {:?}", config.preferred_dilutions);
}

/// Plans a file given on the command line: `.json` as a request, anything else as sample CSV
/// with default settings. Prints the plan table; a JSON request also gets the JSON response.
pub fn run_with_path(file_name: &str, config: &RtConfig) -> Result<(), PlannerError> {
    let is_json = Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let request = if is_json {
        CalcRequest::from_json_file(file_name)?
    } else {
        let samples = load_samples_from_csv(file_name)?;
        if samples.is_empty() {
            return Err(PlannerError::NoSamples);
        }
        CalcRequest::new(samples, CalcSettings::default())
    };
    let response = run_and_report(&request, config, false)?;
    if is_json {
        println!("{}", response_to_json(&response)?);
    }
    Ok(())
}
