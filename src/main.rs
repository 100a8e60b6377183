
use log::{LevelFilter, error, info};
use rustc_hash::FxHashMap;
use std::path::Path;

use varloom::cli::annotate_clinvar::{AnnotateClinvarSettings, check_annotate_clinvar_settings};
use varloom::cli::annotate_coords::{AnnotateCoordsSettings, check_annotate_coords_settings};
use varloom::cli::classify::{ClassifySettings, check_classify_settings};
use varloom::cli::core::{Commands, get_cli};
use varloom::cli::export_vcf::{ExportVcfSettings, check_export_vcf_settings};
use varloom::cli::gnomad_annotate::{GnomadAnnotateSettings, check_gnomad_annotate_settings};
use varloom::cli::gnomad_api::{GnomadApiSettings, check_gnomad_api_settings};
use varloom::cli::parse_clinvar::{ParseClinvarSettings, check_parse_clinvar_settings};
use varloom::cli::qc::{QcSettings, check_qc_settings};
use varloom::cli::split::{SplitSettings, check_split_settings};
use varloom::cli::summarize::{SummarizeSettings, check_summarize_settings};
use varloom::config::PipelineConfig;
use varloom::coords_api::HgvsNormalizerClient;
use varloom::gnomad::api::{GnomadApiClient, GnomadFrequency, distinct_variant_ids, write_summary_with_frequencies};
use varloom::gnomad::local::annotate_summary_with_af;
use varloom::gnomad::{SummaryRow, load_summary};
use varloom::util::file_io::load_json;
use varloom::util::table::{CsvTable, delimiter_for_path};

/// Logging comes up before anything else so settings checks can report
/// # Arguments
/// * `verbosity` - count of -v flags on the command line
fn setup_logging(verbosity: u8) {
    let filter_level: LevelFilter = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };

    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();
}

/// Loads a delimited table, exiting on failure; the delimiter follows the
/// file extension
fn load_table(filename: &Path) -> CsvTable {
    info!("Loading table from {filename:?}...");
    match CsvTable::load(filename, delimiter_for_path(filename)) {
        Ok(table) => {
            info!("Loaded {} rows", table.len());
            table
        },
        Err(e) => {
            error!("Error while loading {filename:?}: {e}");
            std::process::exit(exitcode::IOERR);
        }
    }
}

fn save_table(table: &CsvTable, filename: &Path) {
    info!("Saving {} rows to {filename:?}", table.len());
    match table.save(filename, delimiter_for_path(filename)) {
        Ok(()) => {},
        Err(e) => {
            error!("Error while writing {filename:?}: {e}");
            std::process::exit(exitcode::IOERR);
        }
    };
}

/// Loads the pipeline configuration, falling back to the defaults when no file
/// was given; an invalid configuration is a usage error
fn load_config(config_filename: Option<&Path>) -> PipelineConfig {
    let config: PipelineConfig = if let Some(filename) = config_filename {
        match load_json(filename) {
            Ok(c) => c,
            Err(e) => {
                error!("Error while loading pipeline config: {e}");
                std::process::exit(exitcode::IOERR);
            }
        }
    } else {
        PipelineConfig::default()
    };
    if let Err(e) = config.validate() {
        error!("Error while validating pipeline config: {e}");
        std::process::exit(exitcode::USAGE);
    }
    config
}

fn load_summary_or_exit(filename: &Path) -> Vec<SummaryRow> {
    info!("Loading summary from {filename:?}...");
    match load_summary(filename) {
        Ok(rows) => rows,
        Err(e) => {
            error!("Error while loading summary {filename:?}: {e}");
            std::process::exit(exitcode::IOERR);
        }
    }
}

/// This will run the "parse-clinvar" mode of the tool
/// # Arguments
/// * `settings` - the ParseClinvarSettings object
fn run_parse_clinvar(settings: ParseClinvarSettings) {
    setup_logging(settings.verbosity);
    let cli_settings: ParseClinvarSettings = check_parse_clinvar_settings(settings);

    let records = match varloom::clinvar::parse_clinvar_vcf(&cli_settings.input_vcf, cli_settings.max_records) {
        Ok(records) => records,
        Err(e) => {
            error!("Error while parsing ClinVar VCF: {e}");
            std::process::exit(exitcode::IOERR);
        }
    };
    info!("Parsed {} ClinVar records", records.len());

    match varloom::clinvar::write_parsed_tsv(&records, &cli_settings.output_tsv) {
        Ok(()) => {},
        Err(e) => {
            error!("Error while writing parsed TSV: {e}");
            std::process::exit(exitcode::IOERR);
        }
    };
}

/// This will run the "annotate-coords" mode of the tool
/// # Arguments
/// * `settings` - the AnnotateCoordsSettings object
fn run_annotate_coords(settings: AnnotateCoordsSettings) {
    setup_logging(settings.verbosity);
    let cli_settings: AnnotateCoordsSettings = check_annotate_coords_settings(settings);
    let config: PipelineConfig = load_config(cli_settings.config_filename.as_deref());

    let client: HgvsNormalizerClient = match HgvsNormalizerClient::new(&config) {
        Ok(c) => c,
        Err(e) => {
            error!("Error while building the normalization API client: {e}");
            std::process::exit(exitcode::SOFTWARE);
        }
    };

    let mut table = load_table(&cli_settings.input_table);
    match varloom::coords_api::annotate_coordinates(&mut table, |description| client.resolve(description)) {
        Ok(()) => {},
        Err(e) => {
            error!("Error while annotating coordinates: {e}");
            std::process::exit(exitcode::DATAERR);
        }
    };

    save_table(&table, &cli_settings.output_table);
}

/// This will run the "annotate-clinvar" mode of the tool
/// # Arguments
/// * `settings` - the AnnotateClinvarSettings object
fn run_annotate_clinvar(settings: AnnotateClinvarSettings) {
    setup_logging(settings.verbosity);
    let cli_settings: AnnotateClinvarSettings = check_annotate_clinvar_settings(settings);

    info!("Loading ClinVar reference from {:?}...", cli_settings.clinvar_tsv);
    let reference = match varloom::clinvar::load_reference_tsv(&cli_settings.clinvar_tsv) {
        Ok(r) => r,
        Err(e) => {
            error!("Error while loading ClinVar reference: {e}");
            std::process::exit(exitcode::IOERR);
        }
    };
    info!("Loaded {} reference variants", reference.len());

    let mut table = load_table(&cli_settings.input_table);
    let matched = match varloom::clinvar::annotate_with_clinvar(&mut table, &reference) {
        Ok(m) => m,
        Err(e) => {
            error!("Error while joining against ClinVar: {e}");
            std::process::exit(exitcode::DATAERR);
        }
    };
    info!("Matched {matched} of {} rows", table.len());

    save_table(&table, &cli_settings.output_table);
}

/// This will run the "classify" mode of the tool
/// # Arguments
/// * `settings` - the ClassifySettings object
fn run_classify(settings: ClassifySettings) {
    setup_logging(settings.verbosity);
    let cli_settings: ClassifySettings = check_classify_settings(settings);

    let mut table = load_table(&cli_settings.input_table);
    match varloom::cosmic::classify_cohort(&mut table, &cli_settings.cosmic_tsv) {
        Ok(()) => {},
        Err(e) => {
            error!("Error while classifying against COSMIC: {e}");
            std::process::exit(exitcode::DATAERR);
        }
    };

    save_table(&table, &cli_settings.output_table);
}

/// This will run the "qc" mode of the tool
/// # Arguments
/// * `settings` - the QcSettings object
fn run_qc(settings: QcSettings) {
    setup_logging(settings.verbosity);
    let cli_settings: QcSettings = check_qc_settings(settings);

    let table = load_table(&cli_settings.input_table);
    let completeness = varloom::qc::completeness_report(&table);
    save_table(&completeness, &cli_settings.completeness_out);

    let report = match varloom::qc::metadata_qc(&table, &cli_settings.errors_out) {
        Ok(r) => r,
        Err(e) => {
            error!("Error while running metadata QC: {e}");
            std::process::exit(exitcode::IOERR);
        }
    };
    save_table(&report, &cli_settings.report_out);
}

/// This will run the "split" mode of the tool
/// # Arguments
/// * `settings` - the SplitSettings object
fn run_split(settings: SplitSettings) {
    setup_logging(settings.verbosity);
    let cli_settings: SplitSettings = check_split_settings(settings);

    let table = load_table(&cli_settings.input_table);
    match varloom::split::split_by_origin(
        &table,
        &cli_settings.somatic_out,
        &cli_settings.germline_out,
        &cli_settings.qc_out
    ) {
        Ok(counts) => {
            info!("Somatic rows: {}", counts.somatic);
            info!("Germline rows: {}", counts.germline);
            info!("Unknown-origin rows: {}", counts.unknown);
        },
        Err(e) => {
            error!("Error while splitting by origin: {e}");
            std::process::exit(exitcode::DATAERR);
        }
    };
}

/// This will run the "export-vcf" mode of the tool
/// # Arguments
/// * `settings` - the ExportVcfSettings object
fn run_export_vcf(settings: ExportVcfSettings) {
    setup_logging(settings.verbosity);
    let cli_settings: ExportVcfSettings = check_export_vcf_settings(settings);

    let table = load_table(&cli_settings.input_table);
    match varloom::vcf_export::export_vcf(
        &table,
        cli_settings.source,
        cli_settings.snv_only,
        &cli_settings.output_vcf
    ) {
        Ok(written) => info!("Wrote {written} variants"),
        Err(e) => {
            error!("Error while exporting VCF: {e}");
            std::process::exit(exitcode::IOERR);
        }
    };
}

/// This will run the "gnomad-annotate" mode of the tool
/// # Arguments
/// * `settings` - the GnomadAnnotateSettings object
fn run_gnomad_annotate(settings: GnomadAnnotateSettings) {
    setup_logging(settings.verbosity);
    let cli_settings: GnomadAnnotateSettings = check_gnomad_annotate_settings(settings);

    let rows = load_summary_or_exit(&cli_settings.summary_tsv);
    match annotate_summary_with_af(&rows, &cli_settings.gnomad_vcf, &cli_settings.output_tsv) {
        Ok(found) => info!("Annotated {found} of {} rows", rows.len()),
        Err(e) => {
            error!("Error while annotating from local gnomAD: {e}");
            std::process::exit(exitcode::IOERR);
        }
    };
}

/// This will run the "gnomad-api" mode of the tool
/// # Arguments
/// * `settings` - the GnomadApiSettings object
fn run_gnomad_api(settings: GnomadApiSettings) {
    setup_logging(settings.verbosity);
    let cli_settings: GnomadApiSettings = check_gnomad_api_settings(settings);
    let config: PipelineConfig = load_config(cli_settings.config_filename.as_deref());

    let somatic_rows = load_summary_or_exit(&cli_settings.somatic_summary);
    let germline_rows = load_summary_or_exit(&cli_settings.germline_summary);

    let combined: Vec<SummaryRow> = somatic_rows.iter().chain(germline_rows.iter()).cloned().collect();
    let variant_ids = distinct_variant_ids(&combined);
    info!("Querying gnomAD for {} distinct variants...", variant_ids.len());

    let client: GnomadApiClient = match GnomadApiClient::new(&config) {
        Ok(c) => c,
        Err(e) => {
            error!("Error while building the gnomAD API client: {e}");
            std::process::exit(exitcode::SOFTWARE);
        }
    };
    let mut frequencies: FxHashMap<String, GnomadFrequency> = Default::default();
    for variant_id in variant_ids.iter() {
        frequencies.insert(variant_id.clone(), client.frequency(variant_id));
    }

    for (rows, filename) in [
        (&somatic_rows, &cli_settings.somatic_out),
        (&germline_rows, &cli_settings.germline_out)
    ] {
        info!("Saving annotated summary to {filename:?}");
        match write_summary_with_frequencies(rows, &frequencies, filename) {
            Ok(()) => {},
            Err(e) => {
                error!("Error while writing annotated summary: {e}");
                std::process::exit(exitcode::IOERR);
            }
        };
    }
}

/// This will run the "summarize" mode of the tool
/// # Arguments
/// * `settings` - the SummarizeSettings object
fn run_summarize(settings: SummarizeSettings) {
    setup_logging(settings.verbosity);
    let cli_settings: SummarizeSettings = check_summarize_settings(settings);

    match std::fs::create_dir_all(&cli_settings.output_dir) {
        Ok(()) => {},
        Err(e) => {
            error!("Error while creating output directory: {e}");
            std::process::exit(exitcode::IOERR);
        }
    };

    let somatic = load_table(&cli_settings.somatic_table);
    let germline = load_table(&cli_settings.germline_table);

    let outputs = [
        (varloom::summaries::top_genes_table(&somatic, "somatic"), "top_genes_somatic.csv"),
        (varloom::summaries::top_genes_table(&germline, "germline"), "top_genes_germline.csv"),
        (varloom::summaries::actionable_table(&somatic), "actionable_somatic.csv"),
        (varloom::summaries::tumor_gene_table(&somatic), "somatic_tumor_gene.csv")
    ];
    for (table, basename) in outputs.iter() {
        save_table(table, &cli_settings.output_dir.join(basename));
    }
}

fn main() {
    let cli = get_cli();
    match cli.command {
        Commands::ParseClinvar(settings) => run_parse_clinvar(*settings),
        Commands::AnnotateCoords(settings) => run_annotate_coords(*settings),
        Commands::AnnotateClinvar(settings) => run_annotate_clinvar(*settings),
        Commands::Classify(settings) => run_classify(*settings),
        Commands::Qc(settings) => run_qc(*settings),
        Commands::Split(settings) => run_split(*settings),
        Commands::ExportVcf(settings) => run_export_vcf(*settings),
        Commands::GnomadAnnotate(settings) => run_gnomad_annotate(*settings),
        Commands::GnomadApi(settings) => run_gnomad_api(*settings),
        Commands::Summarize(settings) => run_summarize(*settings),
    };
    info!("Process finished successfully.");
}
