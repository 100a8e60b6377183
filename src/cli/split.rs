
use clap::Args;
use log::info;
use std::path::PathBuf;

use crate::cli::core::check_required_filename;

#[derive(Clone, Args)]
#[clap(author, about)]
pub struct SplitSettings {
    /// Input merged patient table (CSV/TSV) with a 'tipo_de_muestra' column
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input")]
    #[clap(value_name = "CSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub input_table: PathBuf,

    /// Output CSV for the tumor-origin (somatic) rows
    #[clap(required = true)]
    #[clap(short = 's')]
    #[clap(long = "somatic-out")]
    #[clap(value_name = "CSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub somatic_out: PathBuf,

    /// Output CSV for the blood-origin (germline) rows
    #[clap(required = true)]
    #[clap(short = 'g')]
    #[clap(long = "germline-out")]
    #[clap(value_name = "CSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub germline_out: PathBuf,

    /// Output CSV with the per-cohort QC summary
    #[clap(required = true)]
    #[clap(short = 'q')]
    #[clap(long = "qc-out")]
    #[clap(value_name = "CSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub qc_out: PathBuf,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_split_settings(settings: SplitSettings) -> SplitSettings {
    check_required_filename(&settings.input_table, "Input table");

    info!("Input table: {:?}", settings.input_table);
    info!("Somatic output: {:?}", settings.somatic_out);
    info!("Germline output: {:?}", settings.germline_out);
    info!("QC summary output: {:?}", settings.qc_out);

    settings
}
