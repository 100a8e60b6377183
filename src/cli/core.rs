
use clap::{Parser, Subcommand};
use log::error;
use std::path::Path;

use crate::cli::annotate_clinvar::AnnotateClinvarSettings;
use crate::cli::annotate_coords::AnnotateCoordsSettings;
use crate::cli::classify::ClassifySettings;
use crate::cli::export_vcf::ExportVcfSettings;
use crate::cli::gnomad_annotate::GnomadAnnotateSettings;
use crate::cli::gnomad_api::GnomadApiSettings;
use crate::cli::parse_clinvar::ParseClinvarSettings;
use crate::cli::qc::QcSettings;
use crate::cli::split::SplitSettings;
use crate::cli::summarize::SummarizeSettings;

#[derive(Parser)]
#[clap(author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

/// varloom, a pipeline for normalizing, cross-referencing, and classifying
/// clinical variant reports. Select a subcommand to see more usage information:
#[derive(Subcommand)]
pub enum Commands {
    /// Extract a ClinVar VCF into the TSV form the join steps consume
    ParseClinvar(Box<ParseClinvarSettings>),
    /// Resolve free-text HGVS descriptions to genomic coordinates via API
    AnnotateCoords(Box<AnnotateCoordsSettings>),
    /// Join patient rows against a parsed ClinVar TSV
    AnnotateClinvar(Box<AnnotateClinvarSettings>),
    /// Cross-reference COSMIC and assign somatic/germline labels
    Classify(Box<ClassifySettings>),
    /// Report per-column completeness and metadata rule violations
    Qc(Box<QcSettings>),
    /// Split the cohort into somatic/germline CSVs by sample origin
    Split(Box<SplitSettings>),
    /// Export a cohort CSV as a VCFv4.2 file
    ExportVcf(Box<ExportVcfSettings>),
    /// Annotate cohort summaries with frequencies from a local gnomAD VCF
    GnomadAnnotate(Box<GnomadAnnotateSettings>),
    /// Annotate cohort summaries through the gnomAD GraphQL API
    GnomadApi(Box<GnomadApiSettings>),
    /// Build the final top-genes / actionability summary tables
    Summarize(Box<SummarizeSettings>),
}

pub fn get_cli() -> Cli {
    Cli::parse()
}

/// Checks if a file exists and will otherwise exit
/// # Arguments
/// * `filename` - the file path to check for
/// * `label` - the label to use for error messages
pub fn check_required_filename(filename: &Path, label: &str) {
    if !filename.exists() {
        error!("{} does not exist: \"{}\"", label, filename.display());
        std::process::exit(exitcode::NOINPUT);
    } else {
        // file exists, we're good
    }
}

/// Checks if a file exists and will otherwise exit
/// # Arguments
/// * `filename` - the file path to check for
/// * `label` - the label to use for error messages
pub fn check_optional_filename(opt_filename: Option<&Path>, label: &str) {
    if let Some(filename) = opt_filename {
        if !filename.exists() {
            error!("{} does not exist: \"{}\"", label, filename.display());
            std::process::exit(exitcode::NOINPUT);
        } else {
            // file exists, we're good
        }
    }
}
