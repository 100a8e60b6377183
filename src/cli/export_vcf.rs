
use clap::Args;
use log::info;
use std::path::PathBuf;

use crate::cli::core::check_required_filename;
use crate::vcf_export::CohortSource;

#[derive(Clone, Args)]
#[clap(author, about)]
pub struct ExportVcfSettings {
    /// Input cohort table (CSV/TSV) with coordinate columns
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input")]
    #[clap(value_name = "CSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub input_table: PathBuf,

    /// Output VCF file
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-vcf")]
    #[clap(value_name = "VCF")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_vcf: PathBuf,

    /// Cohort label written into the SOURCE INFO key
    #[clap(required = true)]
    #[clap(short = 's')]
    #[clap(long = "source")]
    #[clap(value_name = "LABEL")]
    pub source: CohortSource,

    /// Keep only single-base ACGT substitutions
    #[clap(long = "snv-only")]
    pub snv_only: bool,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_export_vcf_settings(settings: ExportVcfSettings) -> ExportVcfSettings {
    check_required_filename(&settings.input_table, "Input table");

    info!("Input table: {:?}", settings.input_table);
    info!("Output VCF: {:?}", settings.output_vcf);
    info!("Cohort label: {}", settings.source);
    info!("SNV-only: {}", settings.snv_only);

    settings
}
