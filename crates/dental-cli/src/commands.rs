use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{SecondsFormat, Utc};
use comfy_table::{Cell, CellAlignment, Table};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, info_span};

use dental_ingest::{dataset_frame, load_dataset, preview, write_delimited};
use dental_model::{Dataset, Field, Report, ReportOptions};
use dental_render::{
    DEFAULT_PREVIEW_ROWS, DocumentUpdate, InteractiveSession, spawn_document_export,
};
use dental_report::all_recipes;

use crate::cli::{InputArgs, ReportArgs, ViewArgs};
use crate::summary::{align_column, apply_table_style, dim_cell, header_cell, print_view};
use crate::types::{DocumentOutcome, ReportOutcome};

/// File name of the exported PDF document.
pub const PDF_FILE_NAME: &str = "report.pdf";
/// File name of the raw data export.
pub const CSV_FILE_NAME: &str = "treatments.csv";

pub fn run_report(args: &ReportArgs) -> Result<ReportOutcome> {
    let dataset = load_input(&args.input)?;
    let selectors = args.selectors.state();
    let mut options = ReportOptions::new()
        .with_delimiter(args.input.delimiter_byte())
        .with_coverage(args.coverage.into())
        .with_selectors(selectors)
        .with_page_size(args.page_size.into())
        .with_generated_at(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
    if let Some(title) = &args.title {
        options.title.clone_from(title);
    }

    let session = InteractiveSession::new(
        Arc::clone(&dataset),
        selectors,
        &options.title,
        DEFAULT_PREVIEW_ROWS,
    )
    .context("build interactive view")?;

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(&args.input.data));
    if !args.no_csv && same_file(&output_dir.join(CSV_FILE_NAME), &args.input.data) {
        bail!(
            "raw data export would overwrite the input {}",
            args.input.data.display()
        );
    }
    if !(args.no_csv && args.no_pdf) {
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("create {}", output_dir.display()))?;
    }

    let span = info_span!("outputs", output_dir = %output_dir.display());
    let _guard = span.enter();
    let csv = if args.no_csv {
        None
    } else {
        Some(write_raw_export(&dataset, &output_dir, options.delimiter)?)
    };
    let pdf = if args.no_pdf {
        None
    } else {
        Some(export_document(
            session.report().clone(),
            Arc::clone(&dataset),
            options,
            &output_dir,
        )?)
    };

    Ok(ReportOutcome {
        data: args.input.data.clone(),
        output_dir,
        records: dataset.len(),
        view: session.view().clone(),
        csv,
        pdf,
    })
}

/// Print the interactive view of a dataset as tables or JSON.
pub fn run_view(args: &ViewArgs) -> Result<()> {
    let dataset = load_input(&args.input)?;
    let session = InteractiveSession::new(
        Arc::clone(&dataset),
        args.selectors.state(),
        &ReportOptions::default().title,
        args.rows,
    )
    .context("build interactive view")?;
    if args.json {
        let json = session.view().to_json().context("serialize view")?;
        println!("{json}");
    } else {
        print_view(session.view());
        let frame = dataset_frame(&dataset).context("build data frame")?;
        println!();
        println!("{}", preview(&frame, args.rows));
    }
    Ok(())
}

pub fn run_charts() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Chart"),
        header_cell("Kind"),
        header_cell("Title"),
        header_cell("Fields"),
        header_cell("Selectors"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for spec in all_recipes() {
        let mut fields: Vec<&str> = spec.x_fields().into_iter().map(Field::label).collect();
        fields.extend(spec.y_field.map(Field::label));
        let selectors = if spec.binding.is_empty() {
            dim_cell("-")
        } else {
            let keys: Vec<String> = spec.binding.iter().map(ToString::to_string).collect();
            Cell::new(keys.join(", "))
        };
        table.add_row(vec![
            Cell::new(&spec.id),
            Cell::new(spec.kind.as_str()),
            Cell::new(&spec.title),
            Cell::new(fields.join(", ")),
            selectors,
        ]);
    }
    println!("{table}");
    Ok(())
}

fn load_input(input: &InputArgs) -> Result<Arc<Dataset>> {
    let dataset = load_dataset(&input.data, input.delimiter_byte())
        .with_context(|| format!("load {}", input.data.display()))?;
    Ok(Arc::new(dataset))
}

fn default_output_dir(data: &Path) -> PathBuf {
    data.parent()
        .map_or_else(|| PathBuf::from("report"), |parent| parent.join("report"))
}

fn same_file(left: &Path, right: &Path) -> bool {
    match (fs::canonicalize(left), fs::canonicalize(right)) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}

fn write_raw_export(dataset: &Dataset, output_dir: &Path, delimiter: u8) -> Result<PathBuf> {
    let path = output_dir.join(CSV_FILE_NAME);
    let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_delimited(dataset, &mut writer, delimiter)
        .and_then(|()| writer.flush())
        .with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), rows = dataset.len(), "raw data exported");
    Ok(path)
}

/// Compile the PDF on a background thread while a spinner reports progress.
fn export_document(
    report: Report,
    dataset: Arc<Dataset>,
    options: ReportOptions,
    output_dir: &Path,
) -> Result<DocumentOutcome> {
    let (sender, receiver) = mpsc::channel();
    let handle = spawn_document_export(report, dataset, options, sender);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Rendering PDF");

    let outcome = loop {
        match receiver.recv() {
            Ok(DocumentUpdate::Progress { page, total }) => {
                spinner.set_message(format!("Rendering PDF page {page}/{total}"));
            }
            Ok(DocumentUpdate::Complete(document)) => break Ok(document),
            Ok(DocumentUpdate::Cancelled) => break Err(anyhow!("document export cancelled")),
            Ok(DocumentUpdate::Error(message)) => {
                break Err(anyhow!("document export failed: {message}"));
            }
            Err(_) => {
                handle.cancel();
                break Err(anyhow!("document export stopped without a result"));
            }
        }
    };
    spinner.finish_and_clear();
    let document = outcome?;

    let path = output_dir.join(PDF_FILE_NAME);
    document
        .write_to(&path)
        .with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), pages = document.page_count(), "document written");
    Ok(DocumentOutcome {
        path,
        pages: document.page_count(),
        failures: document.failures,
    })
}
