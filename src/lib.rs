
/// Contains the chromosome token normalizer and the fixed contig ordering
pub mod chrom;
/// Contains all the CLI related functionality
pub mod cli;
/// Contains functionality for parsing ClinVar VCFs and joining against them
pub mod clinvar;
/// Contains the pipeline configuration that is passed into the API clients
pub mod config;
/// Contains the client for the HGVS normalization API
pub mod coords_api;
/// Contains functionality for streaming a COSMIC TSV and scoring somatic evidence
pub mod cosmic;
/// Contains any specialized data types that are shared across the tooling
pub mod data_types;
/// Contains the gnomAD annotation functionality, both local VCF and GraphQL API
pub mod gnomad;
/// Contains the generic distinct-then-broadcast join
pub mod join;
/// Contains the cohort completeness and metadata quality checks
pub mod qc;
/// Contains the somatic/germline origin split
pub mod split;
/// Contains the final cohort summary tables
pub mod summaries;
/// Contains generic utilities that are handy wrappers
pub mod util;
/// Contains the VCF export functionality
pub mod vcf_export;
