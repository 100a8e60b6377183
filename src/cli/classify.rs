
use clap::Args;
use log::info;
use std::path::PathBuf;

use crate::cli::core::check_required_filename;

#[derive(Clone, Args)]
#[clap(author, about)]
pub struct ClassifySettings {
    /// Input patient table (CSV/TSV) with 'id', 'variante', 'tipo_de_muestra'
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input")]
    #[clap(value_name = "CSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub input_table: PathBuf,

    /// COSMIC mutation export TSV (plain or gzipped)
    #[clap(required = true)]
    #[clap(short = 'k')]
    #[clap(long = "cosmic-tsv")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub cosmic_tsv: PathBuf,

    /// Output table with evidence and classification columns appended
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(value_name = "CSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_table: PathBuf,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_classify_settings(settings: ClassifySettings) -> ClassifySettings {
    check_required_filename(&settings.input_table, "Input table");
    check_required_filename(&settings.cosmic_tsv, "COSMIC TSV");

    info!("Input table: {:?}", settings.input_table);
    info!("COSMIC TSV: {:?}", settings.cosmic_tsv);
    info!("Output table: {:?}", settings.output_table);

    settings
}
