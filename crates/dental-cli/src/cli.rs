//! CLI argument definitions for the dental treatment report.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use dental_model::{
    Coverage, DEFAULT_DELIMITER, PageSize, ProblemType, RatingType, SelectorState,
};
use dental_render::DEFAULT_PREVIEW_ROWS;

#[derive(Parser)]
#[command(
    name = "dental-report",
    version,
    about = "Dental treatment analytics - KPIs, charts and PDF reports",
    long_about = "Analyse a delimited table of dental treatments.\n\n\
                  Builds headline KPIs, temporal, problem and satisfaction charts,\n\
                  and compiles them into an interactive view and a PDF document."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build the report, export the PDF and the raw data table.
    Report(ReportArgs),

    /// Print the interactive view of a dataset.
    View(ViewArgs),

    /// List every chart the report can contain.
    Charts,
}

#[derive(Args)]
pub struct InputArgs {
    /// Delimited treatment table.
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Single-byte field delimiter of the input table.
    #[arg(
        long = "delimiter",
        value_name = "CHAR",
        default_value_t = DEFAULT_DELIMITER as char,
        value_parser = parse_delimiter
    )]
    pub delimiter: char,
}

impl InputArgs {
    pub fn delimiter_byte(&self) -> u8 {
        // parse_delimiter only accepts ASCII.
        self.delimiter as u8
    }
}

#[derive(Args, Clone, Copy)]
pub struct SelectorArgs {
    /// Problem type plotted against total duration.
    #[arg(long = "duration-problem", value_enum, default_value = "interruptions")]
    pub duration_problem: ProblemArg,

    /// Problem type plotted against satisfaction.
    #[arg(
        long = "satisfaction-problem",
        value_enum,
        default_value = "interruptions"
    )]
    pub satisfaction_problem: ProblemArg,

    /// Rating plotted against the satisfaction problem type.
    #[arg(long = "rating", value_enum, default_value = "patient")]
    pub rating: RatingArg,
}

impl SelectorArgs {
    pub fn state(&self) -> SelectorState {
        SelectorState::default()
            .with_duration_problem(self.duration_problem.into())
            .with_satisfaction_problem(self.satisfaction_problem.into())
            .with_rating(self.rating.into())
    }
}

#[derive(Parser)]
pub struct ReportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub selectors: SelectorArgs,

    /// Output directory for generated files (default: <DATA parent>/report).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Charts included in the PDF document.
    #[arg(long = "coverage", value_enum, default_value = "active")]
    pub coverage: CoverageArg,

    /// Page size of the PDF document.
    #[arg(long = "page-size", value_enum, default_value = "a4-landscape")]
    pub page_size: PageSizeArg,

    /// Title printed on the document title page.
    #[arg(long = "title", value_name = "TEXT")]
    pub title: Option<String>,

    /// Skip the PDF document.
    #[arg(long = "no-pdf")]
    pub no_pdf: bool,

    /// Skip the raw data export.
    #[arg(long = "no-csv")]
    pub no_csv: bool,
}

#[derive(Parser)]
pub struct ViewArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub selectors: SelectorArgs,

    /// Rows shown in the raw data preview.
    #[arg(long = "rows", value_name = "N", default_value_t = DEFAULT_PREVIEW_ROWS)]
    pub rows: usize,

    /// Print the view model as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum ProblemArg {
    Interruptions,
    Errors,
}

impl From<ProblemArg> for ProblemType {
    fn from(value: ProblemArg) -> Self {
        match value {
            ProblemArg::Interruptions => ProblemType::Interruptions,
            ProblemArg::Errors => ProblemType::Errors,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum RatingArg {
    Patient,
    Doctor,
}

impl From<RatingArg> for RatingType {
    fn from(value: RatingArg) -> Self {
        match value {
            RatingArg::Patient => RatingType::Patient,
            RatingArg::Doctor => RatingType::Doctor,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum CoverageArg {
    /// The charts of the current selector state.
    Active,
    /// Every selector-bound chart in every variant.
    All,
}

impl From<CoverageArg> for Coverage {
    fn from(value: CoverageArg) -> Self {
        match value {
            CoverageArg::Active => Coverage::ActiveSelection,
            CoverageArg::All => Coverage::AllVariants,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum PageSizeArg {
    A4Landscape,
    A4Portrait,
    LetterLandscape,
}

impl From<PageSizeArg> for PageSize {
    fn from(value: PageSizeArg) -> Self {
        match value {
            PageSizeArg::A4Landscape => PageSize::A4Landscape,
            PageSizeArg::A4Portrait => PageSize::A4Portrait,
            PageSizeArg::LetterLandscape => PageSize::LetterLandscape,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_delimiter(raw: &str) -> Result<char, String> {
    let value = match raw {
        "\\t" | "tab" => '\t',
        _ => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(value), None) => value,
                _ => return Err(format!("expected a single character, got {raw:?}")),
            }
        }
    };
    if value.is_ascii() && value != '"' && value != '\n' && value != '\r' {
        Ok(value)
    } else {
        Err(format!("unsupported delimiter {value:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_accepts_tab_alias() {
        assert_eq!(parse_delimiter("tab"), Ok('\t'));
        assert_eq!(parse_delimiter(","), Ok(','));
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("é").is_err());
        assert!(parse_delimiter("\"").is_err());
    }

    #[test]
    fn report_flags_map_to_options() {
        let cli = Cli::try_parse_from([
            "dental-report",
            "report",
            "data.csv",
            "--delimiter",
            ",",
            "--coverage",
            "all",
            "--rating",
            "doctor",
            "--satisfaction-problem",
            "errors",
            "--no-csv",
        ])
        .expect("parse");
        let Command::Report(args) = cli.command else {
            panic!("expected report command");
        };
        assert_eq!(args.input.delimiter_byte(), b',');
        assert_eq!(Coverage::from(args.coverage), Coverage::AllVariants);
        assert!(args.no_csv);
        assert!(!args.no_pdf);
        let state = args.selectors.state();
        assert_eq!(state.duration_problem, ProblemType::Interruptions);
        assert_eq!(state.satisfaction_problem, ProblemType::Errors);
        assert_eq!(state.rating, RatingType::Doctor);
    }

    #[test]
    fn view_defaults() {
        let cli = Cli::try_parse_from(["dental-report", "view", "data.csv"]).expect("parse");
        let Command::View(args) = cli.command else {
            panic!("expected view command");
        };
        assert_eq!(args.rows, DEFAULT_PREVIEW_ROWS);
        assert_eq!(args.input.delimiter_byte(), b';');
        assert_eq!(args.selectors.state(), SelectorState::default());
        assert!(!args.json);
    }
}
