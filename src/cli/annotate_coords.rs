
use clap::Args;
use log::info;
use std::path::PathBuf;

use crate::cli::core::{check_optional_filename, check_required_filename};

#[derive(Clone, Args)]
#[clap(author, about)]
pub struct AnnotateCoordsSettings {
    /// Input patient table (CSV/TSV) with a 'variante' column
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input")]
    #[clap(value_name = "CSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub input_table: PathBuf,

    /// Output table with the coordinate columns appended
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(value_name = "CSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_table: PathBuf,

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

pub fn check_annotate_coords_settings(settings: AnnotateCoordsSettings) -> AnnotateCoordsSettings {
    check_required_filename(&settings.input_table, "Input table");
    check_optional_filename(settings.config_filename.as_deref(), "Config JSON");

    info!("Input table: {:?}", settings.input_table);
    info!("Output table: {:?}", settings.output_table);

    settings
}
