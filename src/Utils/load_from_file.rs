use crate::RTplanner::planner_api::PlannerError;
use crate::RTplanner::volume_calculator::Sample;
use csv::{ReaderBuilder, Trim};
use log::{info, warn};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// bundled example samples, relative to the crate root
pub const EXAMPLE_FILE: &str = "example_data/samples.csv";

/// Location of the example samples: the working directory first, then the crate root.
pub fn example_path() -> PathBuf {
    let local = Path::new(EXAMPLE_FILE);
    if local.exists() {
        local.to_path_buf()
    } else {
        Path::new(env!("CARGO_MANIFEST_DIR")).join(EXAMPLE_FILE)
    }
}

/// Loads `name,concentration` pairs from a CSV file.
/// Header lines (first field starting with "sample" and a non-numeric second field)
/// and lines with fewer than two fields are skipped. There is no comment syntax:
/// `#A1,75` is a sample named `#A1`.
pub fn load_samples_from_csv(file_name: &str) -> Result<Vec<Sample>, PlannerError> {
    let path = Path::new(file_name);
    if !path.exists() {
        return Err(PlannerError::MissingFile(file_name.to_string()));
    }
    let file = File::open(path)?;
    let samples = load_samples_from_reader(file)?;
    if samples.is_empty() {
        warn!("No samples found in '{}'", file_name);
    }
    info!("Loaded {} samples from '{}'", samples.len(), file_name);
    Ok(samples)
}

pub fn load_samples_from_reader<R: Read>(reader: R) -> Result<Vec<Sample>, PlannerError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut samples = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        if record.len() < 2 {
            warn!(
                "Skipping line {} without a concentration: '{}'",
                i + 1,
                record.get(0).unwrap_or("")
            );
            continue;
        }
        let name = &record[0];
        let conc_field = &record[1];
        match conc_field.parse::<f64>() {
            Ok(conc) => samples.push(Sample::new(name, conc)),
            Err(_) if name.to_lowercase().starts_with("sample") => continue,
            Err(_) => {
                let line = record
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(i as u64 + 1);
                return Err(PlannerError::BadSampleLine {
                    line,
                    content: record.iter().collect::<Vec<_>>().join(","),
                });
            }
        }
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_with_header_and_blanks() {
        let data = "Sample, Conc (ng/ul)\n\nRNA_01, 50.5\n# bad well\nRNA_02,  1200\nlonely\n";
        let samples = load_samples_from_reader(data.as_bytes()).unwrap();
        assert_eq!(
            samples,
            vec![Sample::new("RNA_01", 50.5), Sample::new("RNA_02", 1200.0)]
        );
    }

    #[test]
    fn test_hash_prefixed_name_is_a_sample() {
        let data = "#A1,75
#A2, 12.5
";
        let samples = load_samples_from_reader(data.as_bytes()).unwrap();
        assert_eq!(
            samples,
            vec![Sample::new("#A1", 75.0), Sample::new("#A2", 12.5)]
        );
    }

    #[test]
    fn test_sample_named_sample_is_kept() {
        let data = "sample,conc\nSample1,80\n";
        let samples = load_samples_from_reader(data.as_bytes()).unwrap();
        assert_eq!(samples, vec![Sample::new("Sample1", 80.0)]);
    }

    #[test]
    fn test_extra_columns_and_negative_values() {
        let data = "A,10,extra,columns\nB,-4\nC,0\n";
        let samples = load_samples_from_reader(data.as_bytes()).unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[1].conc, -4.0);
        assert_eq!(samples[2].conc, 0.0);
    }

    #[test]
    fn test_bad_concentration_reports_line() {
        let data = "A,10\nB,lots\n";
        match load_samples_from_reader(data.as_bytes()) {
            Err(PlannerError::BadSampleLine { line, content }) => {
                assert_eq!(line, 2);
                assert_eq!(content, "B,lots");
            }
            other => panic!("expected BadSampleLine, got {:?}", other),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"S1,100\nS2,2.5\n").unwrap();
        let samples = load_samples_from_csv(file.path().to_str().unwrap()).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1], Sample::new("S2", 2.5));
    }

    #[test]
    fn test_missing_file() {
        let result = load_samples_from_csv("no/such/samples.csv");
        assert!(matches!(result, Err(PlannerError::MissingFile(_))));
    }

    #[test]
    fn test_example_samples_load() {
        let samples = load_samples_from_csv(&example_path().to_string_lossy()).unwrap();
        assert_eq!(samples.len(), 8);
        assert_eq!(samples[0].sample, "RNA_01");
    }
}
