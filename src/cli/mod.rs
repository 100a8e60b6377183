
/// the main CLI module
pub mod core;
/// subcommand extracting a ClinVar VCF into the joinable TSV form
pub mod parse_clinvar;
/// subcommand resolving free-text descriptions to genomic coordinates
pub mod annotate_coords;
/// subcommand joining patient rows against the parsed ClinVar TSV
pub mod annotate_clinvar;
/// subcommand for the COSMIC cross-reference and somatic/germline call
pub mod classify;
/// subcommand running the completeness and metadata quality checks
pub mod qc;
/// subcommand splitting the cohort by sample origin
pub mod split;
/// subcommand exporting a cohort CSV as VCF text
pub mod export_vcf;
/// subcommand annotating summaries from a local gnomAD VCF
pub mod gnomad_annotate;
/// subcommand annotating summaries through the gnomAD GraphQL API
pub mod gnomad_api;
/// subcommand building the final gene/actionability summary tables
pub mod summarize;
