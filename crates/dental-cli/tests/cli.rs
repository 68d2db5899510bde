//! End-to-end tests for the report command.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;

use dental_cli::cli::{Cli, Command, ReportArgs};
use dental_cli::commands::{CSV_FILE_NAME, PDF_FILE_NAME, run_report};
use dental_ingest::load_dataset;
use dental_model::DEFAULT_DELIMITER;

const SAMPLE: &str = "\
PatientId;NumberOfTeeth;SetupDuration(sec);TreatmentDuration(sec);Interruptions;Errors;PatientRating;DoctorRating
p-01;4;120;900;0;0;4.5;4
p-02;12;300;2400;2;1;3;3.5
p-03;1;90;600;1;0;5;4.5
p-04;7;200;1800;0;2;4;4
";

fn write_sample(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("input.csv");
    fs::write(&path, contents).expect("write sample");
    path
}

fn report_args(args: &[&str]) -> ReportArgs {
    let mut argv = vec!["dental-report", "report"];
    argv.extend_from_slice(args);
    match Cli::try_parse_from(argv).expect("parse").command {
        Command::Report(args) => args,
        _ => panic!("expected report command"),
    }
}

#[test]
fn report_writes_pdf_and_raw_export() {
    let dir = tempfile::tempdir().expect("temp dir");
    let data = write_sample(dir.path(), SAMPLE);
    let args = report_args(&[data.to_str().expect("utf-8 path")]);

    let outcome = run_report(&args).expect("report");
    assert_eq!(outcome.records, 4);
    assert_eq!(outcome.output_dir, dir.path().join("report"));

    let document = outcome.pdf.as_ref().expect("pdf written");
    assert_eq!(document.path, outcome.output_dir.join(PDF_FILE_NAME));
    assert_eq!(document.pages, 18);
    assert!(document.failures.is_empty());
    let bytes = fs::read(&document.path).expect("read pdf");
    assert!(bytes.starts_with(b"%PDF"));

    let csv = outcome.csv.as_ref().expect("csv written");
    assert_eq!(csv, &outcome.output_dir.join(CSV_FILE_NAME));
    let original = load_dataset(&data, DEFAULT_DELIMITER).expect("load input");
    let exported = load_dataset(csv, DEFAULT_DELIMITER).expect("load export");
    assert_eq!(exported.records(), original.records());
}

#[test]
fn skip_flags_suppress_outputs() {
    let dir = tempfile::tempdir().expect("temp dir");
    let data = write_sample(dir.path(), SAMPLE);
    let output = dir.path().join("out");
    let args = report_args(&[
        data.to_str().expect("utf-8 path"),
        "--output-dir",
        output.to_str().expect("utf-8 path"),
        "--no-pdf",
        "--no-csv",
    ]);

    let outcome = run_report(&args).expect("report");
    assert!(outcome.pdf.is_none());
    assert!(outcome.csv.is_none());
    assert!(!output.exists());
    assert_eq!(outcome.view.kpis.len(), 5);
}

#[test]
fn all_variants_coverage_adds_pages() {
    let dir = tempfile::tempdir().expect("temp dir");
    let data = write_sample(dir.path(), SAMPLE);
    let args = report_args(&[data.to_str().expect("utf-8 path"), "--coverage", "all", "--no-csv"]);

    let outcome = run_report(&args).expect("report");
    let document = outcome.pdf.expect("pdf written");
    assert!(document.pages > 18);
}

#[test]
fn invalid_input_reports_context() {
    let dir = tempfile::tempdir().expect("temp dir");
    let data = write_sample(dir.path(), &SAMPLE.replace("p-03;1;", "p-03;x;"));
    let args = report_args(&[data.to_str().expect("utf-8 path")]);

    let error = run_report(&args).expect_err("invalid input");
    let message = format!("{error:#}");
    assert!(message.starts_with("load "), "{message}");
    assert!(message.contains("NumberOfTeeth"), "{message}");
    assert!(!dir.path().join("report").exists());
}

#[test]
fn refuses_to_overwrite_input() {
    let dir = tempfile::tempdir().expect("temp dir");
    let data = dir.path().join(CSV_FILE_NAME);
    fs::write(&data, SAMPLE).expect("write sample");
    let args = report_args(&[
        data.to_str().expect("utf-8 path"),
        "--output-dir",
        dir.path().to_str().expect("utf-8 path"),
        "--no-pdf",
    ]);

    let error = run_report(&args).expect_err("would overwrite");
    assert!(error.to_string().contains("overwrite"));
    assert_eq!(fs::read_to_string(&data).expect("read"), SAMPLE);
}
