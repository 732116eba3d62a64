use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::catalog::FlagCatalog;
use super::config::Config;
use super::constants::MaskWord;
use super::decoder::{and_channels, extract_flag};
use super::error::{DecodeError, ProcessorError};
use super::hdf_reader::HDFReader;
use super::segment::{extract_segments, gate_strain, livetime, Segment};
use super::time_base::TimeBase;

/// How often a single flag was good over the span of a file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagSummary {
    pub bit: usize,
    pub name: String,
    pub description: String,
    pub good_seconds: u64,
    pub fraction: f64,
}

/// The result of decoding a single file. Written to disk as YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqReport {
    pub file: PathBuf,
    pub detector: Option<String>,
    pub time_base: TimeBase,
    pub utc_start: String,
    pub flags: Vec<String>,
    pub injection_flags: Vec<String>,
    pub livetime: u64,
    pub segments: Vec<Segment>,
    pub strain_ranges: Vec<[usize; 2]>,
    pub dq_summary: Vec<FlagSummary>,
    pub injection_summary: Vec<FlagSummary>,
}

impl DqReport {
    /// Write the report as YAML
    pub fn write(&self, path: &Path) -> Result<(), ProcessorError> {
        let mut report_file = std::fs::File::create(path)?;
        report_file.write_all(serde_yaml::to_string(self)?.as_bytes())?;
        Ok(())
    }
}

/// Count the good seconds of every flag in a catalog
pub fn summarize_flags(
    catalog: &FlagCatalog,
    mask: &[MaskWord],
) -> Result<Vec<FlagSummary>, DecodeError> {
    let total = mask.len();
    catalog
        .iter()
        .map(|flag| {
            let good_seconds = extract_flag(mask, flag.bit)?.count_ones();
            let fraction = if total == 0 {
                0.0
            } else {
                good_seconds as f64 / total as f64
            };
            Ok(FlagSummary {
                bit: flag.bit,
                name: flag.name.clone(),
                description: flag.description.clone(),
                good_seconds: good_seconds as u64,
                fraction,
            })
        })
        .collect()
}

fn log_summary(label: &str, summary: &[FlagSummary]) {
    for flag in summary.iter() {
        log::info!(
            "{} bit {:>2} {:<20} good {:>6} s ({:.1}%)",
            label,
            flag.bit,
            flag.name,
            flag.good_seconds,
            flag.fraction * 100.0
        );
    }
}

/// Decode a single file.
///
/// Reads the masks and catalogs, ANDs the selected flags together (data quality and, if asked for,
/// injections), and finds the good-time segments. Does not write anything.
pub fn decode_file(config: &Config, input_path: &Path) -> Result<DqReport, ProcessorError> {
    let reader = HDFReader::open(input_path)?;
    let time_base = reader.read_time_base(config.strain_rate)?;
    let detector = reader.read_detector()?;
    let utc_start = time_base.utc_start()?;
    log::info!(
        "Detector: {} GPS start: {} ({}) Duration: {} s",
        detector.as_deref().unwrap_or("unknown"),
        time_base.gps_start,
        utc_start,
        time_base.duration
    );

    let dq = reader.read_dq(&time_base)?;
    let dq_summary = summarize_flags(&dq.catalog, &dq.mask)?;
    log_summary("DQ", &dq_summary);

    let mut good = dq.good_channel(&config.flags)?;

    let injections = reader.read_injections(&time_base)?;
    let injection_summary = match &injections {
        Some(inj) => {
            let summary = summarize_flags(&inj.catalog, &inj.mask)?;
            log_summary("INJ", &summary);
            summary
        }
        None => vec![],
    };
    if config.has_injection_selection() {
        match &injections {
            Some(inj) => {
                let inj_good = inj.good_channel(&config.injection_flags)?;
                good = and_channels(&good, &inj_good)?;
            }
            None => log::warn!(
                "Injection flags were selected but {} has no injection mask; ignoring them",
                input_path.display()
            ),
        }
    }

    let segments: Vec<Segment> = extract_segments(&good, time_base.gps_start).collect();
    let total_livetime = livetime(&segments);
    log::info!(
        "Found {} good segments with {} s of livetime out of {} s",
        segments.len(),
        total_livetime,
        time_base.duration
    );

    let mut strain_ranges = Vec::with_capacity(segments.len());
    for segment in segments.iter() {
        let range =
            segment.sample_range(time_base.gps_start, time_base.strain_per_mask_sample())?;
        strain_ranges.push([range.start, range.end]);
    }

    if config.gate_strain {
        let strain = reader.read_strain()?;
        let view = strain.view();
        let gated = gate_strain(
            &view,
            &segments,
            time_base.gps_start,
            time_base.strain_per_mask_sample(),
        )?;
        let n_samples: usize = gated.iter().map(|slice| slice.len()).sum();
        log::info!(
            "Gated strain keeps {} of {} samples",
            n_samples,
            strain.len()
        );
    }

    Ok(DqReport {
        file: input_path.to_path_buf(),
        detector,
        time_base,
        utc_start: utc_start.to_string(),
        flags: config.flags.clone(),
        injection_flags: config.injection_flags.clone(),
        livetime: total_livetime,
        segments,
        strain_ranges,
        dq_summary,
        injection_summary,
    })
}

/// Decode a single file and write its report
pub fn process_file(config: &Config, input_path: &Path) -> Result<DqReport, ProcessorError> {
    let report_path = config.get_report_file_name(input_path)?;
    let report = decode_file(config, input_path)?;
    report.write(&report_path)?;
    log::info!("Report written to {}", report_path.display());
    Ok(report)
}

/// The main loop of dq_decoder.
///
/// Each input file is decoded and reported on its own. `on_file` is called with the number of
/// files handled so far after each one, so that the caller can show progress.
pub fn process<F: FnMut(usize)>(config: &Config, mut on_file: F) -> Result<(), ProcessorError> {
    for (idx, input) in config.input_files.iter().enumerate() {
        if config.does_input_exist(input) {
            log::info!("Processing file {}...", input.display());
            process_file(config, input)?;
            log::info!("Finished processing file {}.", input.display());
        } else {
            log::info!("File {} does not exist, skipping...", input.display());
        }
        on_file(idx + 1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::hdf_reader::tests::write_test_file;

    fn test_config(flags: &[&str], injection_flags: &[&str]) -> Config {
        Config {
            input_files: vec![],
            report_path: std::env::temp_dir(),
            flags: flags.iter().map(|s| s.to_string()).collect(),
            injection_flags: injection_flags.iter().map(|s| s.to_string()).collect(),
            strain_rate: None,
            gate_strain: true,
        }
    }

    #[test]
    fn test_summarize_flags() {
        let catalog = FlagCatalog::new(
            vec![String::from("DATA"), String::from("CAT1")],
            vec![String::from("data"), String::from("cat1")],
        )
        .unwrap();
        let summary = summarize_flags(&catalog, &[3, 1, 1, 0]).unwrap();
        assert_eq!(summary[0].good_seconds, 3);
        assert_eq!(summary[0].fraction, 0.75);
        assert_eq!(summary[1].good_seconds, 1);
        assert_eq!(summary[1].name, "CAT1");
    }

    #[test]
    fn test_decode_file() {
        // DQ mask [7, 7, 3, 1, 0, 7, 7, 5], injections [3, 3, 3, 3, 3, 3, 2, 3]
        let test_file = write_test_file("dq_process_decode", true);
        let config = test_config(&["DATA", "CBC_CAT1"], &[]);
        let report = decode_file(&config, &test_file.path).unwrap();
        let start = 1_126_259_456;
        assert_eq!(
            report.segments,
            vec![Segment::new(start, start + 3), Segment::new(start + 5, start + 7)]
        );
        assert_eq!(report.livetime, 5);
        assert_eq!(report.strain_ranges, vec![[0, 48], [80, 112]]);
        assert_eq!(report.detector, Some(String::from("H1")));
        assert!(report.utc_start.starts_with("2015-09-14 9:50:39"));
        assert_eq!(report.dq_summary.len(), 3);
        assert_eq!(report.injection_summary[0].good_seconds, 7);
    }

    #[test]
    fn test_decode_with_injections() {
        let test_file = write_test_file("dq_process_inj", true);
        let config = test_config(&["DATA", "CBC_CAT1"], &["NO_CBC_HW_INJ"]);
        let report = decode_file(&config, &test_file.path).unwrap();
        let start = 1_126_259_456;
        assert_eq!(
            report.segments,
            vec![Segment::new(start, start + 3), Segment::new(start + 5, start + 6)]
        );
    }

    #[test]
    fn test_bad_selection() {
        let test_file = write_test_file("dq_process_bad", false);
        let config = test_config(&["DATA", "CW_CAT1"], &[]);
        match decode_file(&config, &test_file.path) {
            Err(ProcessorError::CatalogError(CatalogError::UnknownFlag(name))) => {
                assert_eq!(name, "CW_CAT1")
            }
            _ => panic!(),
        }

        let empty = test_config(&[], &[]);
        match decode_file(&empty, &test_file.path) {
            Err(ProcessorError::CatalogError(CatalogError::DecodeError(
                DecodeError::EmptySelection,
            ))) => (),
            _ => panic!(),
        }
    }

    #[test]
    fn test_zero_strain_rate() {
        let test_file = write_test_file("dq_process_zero_rate", false);
        let mut config = test_config(&["DATA"], &[]);
        config.strain_rate = Some(0);
        match decode_file(&config, &test_file.path) {
            Err(ProcessorError::DecodeError(DecodeError::ZeroSampleRate)) => (),
            _ => panic!(),
        }
    }

    #[test]
    fn test_process_writes_report() {
        let test_file = write_test_file("dq_process_report", false);
        let mut config = test_config(&["DATA"], &[]);
        config.input_files = vec![test_file.path.clone(), PathBuf::from("/no/such/file.hdf5")];
        let mut seen = 0;
        process(&config, |n| seen = n).unwrap();
        assert_eq!(seen, 2);

        let report_path = config.get_report_file_name(&test_file.path).unwrap();
        let yaml = std::fs::read_to_string(&report_path).unwrap();
        let report: DqReport = serde_yaml::from_str(&yaml).unwrap();
        let start = 1_126_259_456;
        assert_eq!(
            report.segments,
            vec![Segment::new(start, start + 4), Segment::new(start + 5, start + 8)]
        );
        std::fs::remove_file(report_path).unwrap();
    }
}
