
use clap::Args;
use log::info;
use std::path::PathBuf;

use crate::cli::core::check_required_filename;

#[derive(Clone, Args)]
#[clap(author, about)]
pub struct QcSettings {
    /// Input patient table (CSV/TSV)
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input")]
    #[clap(value_name = "CSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub input_table: PathBuf,

    /// Output CSV with per-column completeness percentages
    #[clap(required = true)]
    #[clap(short = 'c')]
    #[clap(long = "completeness-out")]
    #[clap(value_name = "CSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub completeness_out: PathBuf,

    /// Output CSV with the metadata rule-check findings
    #[clap(required = true)]
    #[clap(short = 'r')]
    #[clap(long = "report-out")]
    #[clap(value_name = "CSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub report_out: PathBuf,

    /// Output CSV with the rows that failed a rule, tagged per rule
    #[clap(required = true)]
    #[clap(short = 'e')]
    #[clap(long = "errors-out")]
    #[clap(value_name = "CSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub errors_out: PathBuf,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_qc_settings(settings: QcSettings) -> QcSettings {
    check_required_filename(&settings.input_table, "Input table");

    info!("Input table: {:?}", settings.input_table);
    info!("Completeness output: {:?}", settings.completeness_out);
    info!("QC report output: {:?}", settings.report_out);
    info!("Error rows output: {:?}", settings.errors_out);

    settings
}
