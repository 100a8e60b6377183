
use log::{debug, info};
use rustc_hash::FxHashMap as HashMap;
use std::io::BufRead;
use std::path::Path;

use crate::chrom::normalize_chrom;
use crate::data_types::variant::VariantRecord;
use crate::gnomad::{SummaryRow, SUMMARY_COLUMNS};
use crate::util::file_io::open_text_reader;

/// Annotates a cohort summary with allele frequencies from a local gnomAD VCF
/// and writes it back out as a TSV with a header and a trailing `gnomad_af`
/// column. Rows without a parseable variant or without a gnomAD hit keep an
/// empty frequency cell.
/// # Errors
/// * if the gnomAD file does not open or read
/// * if the output fails to write
pub fn annotate_summary_with_af(
    rows: &[SummaryRow],
    gnomad_fn: &Path,
    out_fn: &Path
) -> Result<usize, Box<dyn std::error::Error>> {
    // only the parseable rows become queries; remember where each came from
    let mut query_rows: Vec<usize> = vec![];
    let mut queries: Vec<VariantRecord> = vec![];
    for (i, row) in rows.iter().enumerate() {
        if let Some(variant) = row.variant() {
            query_rows.push(i);
            queries.push(variant);
        }
    }
    let frequencies = lookup_frequencies(gnomad_fn, &queries)?;

    let mut af_by_row: Vec<Option<String>> = vec![None; rows.len()];
    for (&row, af) in query_rows.iter().zip(frequencies) {
        af_by_row[row] = af;
    }
    let found = af_by_row.iter().filter(|af| af.is_some()).count();
    info!("Found frequencies for {found} of {} rows", rows.len());

    let mut writer = std::io::BufWriter::new(std::fs::File::create(out_fn)?);
    use std::io::Write;
    writeln!(writer, "{}\tgnomad_af", SUMMARY_COLUMNS.join("\t"))?;
    for (row, af) in rows.iter().zip(af_by_row) {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            row.chrom, row.pos, row.ref_allele, row.alt_allele,
            row.sample_count, row.clinvar_match, row.clinvar_info, row.source,
            af.unwrap_or_default()
        )?;
    }
    writer.flush()?;
    Ok(found)
}

/// Looks up allele frequencies for a batch of variants in a local gnomAD
/// VCF(.gz) with a single streaming pass, so peak memory is bounded by the
/// query set rather than the (very large) reference file.
///
/// A site can carry multiple ALT alleles as a comma-separated list; the
/// requested ALT is located in that list and the parallel `AF=` list in INFO is
/// indexed at the same offset. Variants with no match come back as None.
/// # Arguments
/// * `filename` - the gnomAD VCF, plain or gzipped
/// * `queries` - the variants to look up
/// # Errors
/// * if the file does not open or read
pub fn lookup_frequencies(filename: &Path, queries: &[VariantRecord]) -> Result<Vec<Option<String>>, Box<dyn std::error::Error>> {
    // index the queries by (chrom, pos) so each VCF line is one hash lookup
    let mut wanted: HashMap<(String, u64), Vec<usize>> = Default::default();
    for (i, query) in queries.iter().enumerate() {
        wanted.entry((query.chrom().to_string(), query.pos())).or_default().push(i);
    }
    info!("Scanning {filename:?} for {} variants at {} distinct sites...", queries.len(), wanted.len());

    let mut results: Vec<Option<String>> = vec![None; queries.len()];
    let reader = open_text_reader(filename)?;
    for line in reader.lines() {
        let line = line?;
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 8 {
            continue;
        }
        let chrom = match normalize_chrom(fields[0]) {
            Some(c) => c,
            None => continue
        };
        let pos: u64 = match fields[1].parse() {
            Ok(p) => p,
            Err(_) => continue
        };
        let candidates = match wanted.get(&(chrom, pos)) {
            Some(c) => c,
            None => continue
        };

        let site_ref = fields[3];
        let alts: Vec<&str> = fields[4].split(',').collect();
        for &query_idx in candidates.iter() {
            let query = &queries[query_idx];
            if results[query_idx].is_some() || query.ref_allele() != site_ref {
                continue;
            }
            let alt_index = match alts.iter().position(|&a| a == query.alt_allele()) {
                Some(idx) => idx,
                None => continue
            };
            if let Some(af) = extract_af(fields[7], alt_index) {
                debug!("AF for {query} is {af}");
                results[query_idx] = Some(af);
            }
        }
    }
    Ok(results)
}

/// Pulls the AF value for one ALT index out of a VCF INFO field.
/// AF is comma-separated in the same order as the ALT list.
fn extract_af(info: &str, alt_index: usize) -> Option<String> {
    let af_list = info.split(';')
        .find_map(|kv| kv.strip_prefix("AF="))?;
    af_list.split(',').nth(alt_index).map(|af| af.to_string())
}
