
use clap::Args;
use log::info;
use std::path::PathBuf;

use crate::cli::core::{check_optional_filename, check_required_filename};

#[derive(Clone, Args)]
#[clap(author, about)]
pub struct GnomadApiSettings {
    /// Somatic cohort summary TSV (headerless, 8 fixed columns)
    #[clap(required = true)]
    #[clap(short = 's')]
    #[clap(long = "somatic-summary")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub somatic_summary: PathBuf,

    /// Germline cohort summary TSV (headerless, 8 fixed columns)
    #[clap(required = true)]
    #[clap(short = 'g')]
    #[clap(long = "germline-summary")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub germline_summary: PathBuf,

    /// Output TSV for the somatic summary with frequency columns
    #[clap(required = true)]
    #[clap(long = "somatic-out")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub somatic_out: PathBuf,

    /// Output TSV for the germline summary with frequency columns
    #[clap(required = true)]
    #[clap(long = "germline-out")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub germline_out: PathBuf,

    /// Pipeline configuration file (JSON); defaults are used when absent
    #[clap(short = 'c')]
    #[clap(long = "config")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub config_filename: Option<PathBuf>,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_gnomad_api_settings(settings: GnomadApiSettings) -> GnomadApiSettings {
    check_required_filename(&settings.somatic_summary, "Somatic summary TSV");
    check_required_filename(&settings.germline_summary, "Germline summary TSV");
    check_optional_filename(settings.config_filename.as_deref(), "Config JSON");

    info!("Somatic summary: {:?}", settings.somatic_summary);
    info!("Germline summary: {:?}", settings.germline_summary);
    info!("Somatic output: {:?}", settings.somatic_out);
    info!("Germline output: {:?}", settings.germline_out);

    settings
}
