
use clap::Args;
use log::info;
use std::path::PathBuf;

use crate::cli::core::check_required_filename;

#[derive(Clone, Args)]
#[clap(author, about)]
pub struct ParseClinvarSettings {
    /// Input ClinVar VCF file (.vcf or .vcf.gz)
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input-vcf")]
    #[clap(value_name = "VCF")]
    #[clap(help_heading = Some("Input/Output"))]
    pub input_vcf: PathBuf,

    /// Output TSV file with the parsed records
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-tsv")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_tsv: PathBuf,

    /// Stop after this many records (for trial runs on the full release file)
    #[clap(short = 'm')]
    #[clap(long = "max-records")]
    #[clap(value_name = "COUNT")]
    pub max_records: Option<usize>,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_parse_clinvar_settings(settings: ParseClinvarSettings) -> ParseClinvarSettings {
    check_required_filename(&settings.input_vcf, "ClinVar VCF");

    info!("Input VCF: {:?}", settings.input_vcf);
    info!("Output TSV: {:?}", settings.output_tsv);
    if let Some(max_records) = settings.max_records {
        info!("Max records: {max_records}");
    }

    settings
}
