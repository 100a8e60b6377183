
use clap::Args;
use log::info;
use std::path::PathBuf;

use crate::cli::core::check_required_filename;

#[derive(Clone, Args)]
#[clap(author, about)]
pub struct AnnotateClinvarSettings {
    /// Input patient table (CSV/TSV) with coordinate or genomic-HGVS columns
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input")]
    #[clap(value_name = "CSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub input_table: PathBuf,

    /// Parsed ClinVar TSV (output of parse-clinvar)
    #[clap(required = true)]
    #[clap(short = 'r')]
    #[clap(long = "clinvar-tsv")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub clinvar_tsv: PathBuf,

    /// Output table with 'clinvar_match' and the INFO payload appended
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

pub fn check_annotate_clinvar_settings(settings: AnnotateClinvarSettings) -> AnnotateClinvarSettings {
    check_required_filename(&settings.input_table, "Input table");
    check_required_filename(&settings.clinvar_tsv, "ClinVar TSV");

    info!("Input table: {:?}", settings.input_table);
    info!("ClinVar TSV: {:?}", settings.clinvar_tsv);
    info!("Output table: {:?}", settings.output_table);

    settings
}
