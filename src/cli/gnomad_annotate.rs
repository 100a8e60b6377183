
use clap::Args;
use log::info;
use std::path::PathBuf;

use crate::cli::core::check_required_filename;

#[derive(Clone, Args)]
#[clap(author, about)]
pub struct GnomadAnnotateSettings {
    /// Input cohort summary TSV (headerless, 8 fixed columns)
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "summary")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub summary_tsv: PathBuf,

    /// Local gnomAD sites VCF (plain or gzipped)
    #[clap(required = true)]
    #[clap(short = 'g')]
    #[clap(long = "gnomad-vcf")]
    #[clap(value_name = "VCF")]
    #[clap(help_heading = Some("Input/Output"))]
    pub gnomad_vcf: PathBuf,

    /// Output TSV with the 'gnomad_af' column appended
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_tsv: PathBuf,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_gnomad_annotate_settings(settings: GnomadAnnotateSettings) -> GnomadAnnotateSettings {
    check_required_filename(&settings.summary_tsv, "Summary TSV");
    check_required_filename(&settings.gnomad_vcf, "gnomAD VCF");

    info!("Summary TSV: {:?}", settings.summary_tsv);
    info!("gnomAD VCF: {:?}", settings.gnomad_vcf);
    info!("Output TSV: {:?}", settings.output_tsv);

    settings
}
