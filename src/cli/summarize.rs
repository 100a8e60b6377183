
use clap::Args;
use log::info;
use std::path::PathBuf;

use crate::cli::core::check_required_filename;

#[derive(Clone, Args)]
#[clap(author, about)]
pub struct SummarizeSettings {
    /// Annotated somatic cohort table (CSV/TSV)
    #[clap(required = true)]
    #[clap(short = 's')]
    #[clap(long = "somatic")]
    #[clap(value_name = "CSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub somatic_table: PathBuf,

    /// Annotated germline cohort table (CSV/TSV)
    #[clap(required = true)]
    #[clap(short = 'g')]
    #[clap(long = "germline")]
    #[clap(value_name = "CSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub germline_table: PathBuf,

    /// Directory receiving the four summary CSVs
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-dir")]
    #[clap(value_name = "DIR")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_dir: PathBuf,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_summarize_settings(settings: SummarizeSettings) -> SummarizeSettings {
    check_required_filename(&settings.somatic_table, "Somatic table");
    check_required_filename(&settings.germline_table, "Germline table");

    info!("Somatic table: {:?}", settings.somatic_table);
    info!("Germline table: {:?}", settings.germline_table);
    info!("Output directory: {:?}", settings.output_dir);

    settings
}
