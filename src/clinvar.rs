
use log::{debug, info};
use rustc_hash::FxHashMap as HashMap;
use simple_error::bail;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use crate::chrom::normalize_chrom;
use crate::data_types::hgvs::explode_genomic_snv;
use crate::join::{distinct_then_broadcast, ReferenceHit};
use crate::util::file_io::open_text_reader;
use crate::util::table::CsvTable;

/// Normalized-key form used to join patient variants against the reference
pub type VariantKey = (String, u64, String, String);

/// One data row pulled out of a ClinVar VCF. The chromosome is kept in the
/// spelling the VCF used; ALT may be a comma-separated allele list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClinvarRecord {
    pub chrom: String,
    pub pos: u64,
    pub ref_allele: String,
    pub alt_allele: String,
    /// the complete INFO field, kept whole for downstream substring joins
    pub info: String
}

/// Reads a ClinVar VCF (`.vcf` or `.vcf.gz`) into records, skipping headers and
/// any data line that is short or carries an unparseable POS.
/// # Arguments
/// * `filename` - the VCF to read
/// * `max_records` - optional cap on the number of data rows kept
/// # Errors
/// * if the file does not open or read
pub fn parse_clinvar_vcf(filename: &Path, max_records: Option<usize>) -> Result<Vec<ClinvarRecord>, Box<dyn std::error::Error>> {
    let reader = open_text_reader(filename)?;
    let mut records: Vec<ClinvarRecord> = vec![];
    for line in reader.lines() {
        let line = line?;
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 8 {
            debug!("Skipping short VCF line: {line:?}");
            continue;
        }
        let pos: u64 = match fields[1].parse() {
            Ok(p) => p,
            Err(_) => {
                debug!("Skipping VCF line with unparseable POS: {line:?}");
                continue;
            }
        };
        records.push(ClinvarRecord {
            chrom: fields[0].to_string(),
            pos,
            ref_allele: fields[3].to_string(),
            alt_allele: fields[4].to_string(),
            info: fields[7].to_string()
        });
        if let Some(cap) = max_records {
            if records.len() >= cap {
                info!("Reached record cap of {cap}, stopping early.");
                break;
            }
        }
    }
    Ok(records)
}

/// Writes the parsed records as the 5-column TSV consumed by the join step.
/// # Errors
/// * if the file cannot be created or written
pub fn write_parsed_tsv(records: &[ClinvarRecord], filename: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = BufWriter::new(std::fs::File::create(filename)?);
    writeln!(writer, "#CHROM\tPOS\tREF\tALT\tINFO_STRING")?;
    for r in records.iter() {
        writeln!(writer, "{}\t{}\t{}\t{}\t{}", r.chrom, r.pos, r.ref_allele, r.alt_allele, r.info)?;
    }
    writer.flush()?;
    Ok(())
}

/// Loads the parsed ClinVar TSV into a lookup keyed by normalized coordinates.
/// # Errors
/// * if the file does not open or parse
/// * if a required column is missing, naming the column
pub fn load_reference_tsv(filename: &Path) -> Result<HashMap<VariantKey, String>, Box<dyn std::error::Error>> {
    let table = CsvTable::load(filename, b'\t')?;
    let chrom_idx = table.require_column("#CHROM")?;
    let pos_idx = table.require_column("POS")?;
    let ref_idx = table.require_column("REF")?;
    let alt_idx = table.require_column("ALT")?;
    let info_idx = table.require_column("INFO_STRING")?;

    let mut reference: HashMap<VariantKey, String> = Default::default();
    for row in 0..table.len() {
        let chrom = match table.cell(row, chrom_idx).and_then(normalize_chrom) {
            Some(c) => c,
            None => continue
        };
        let pos: u64 = match table.cell(row, pos_idx).and_then(|p| p.parse().ok()) {
            Some(p) => p,
            None => continue
        };
        let (ref_allele, alt_allele) = match (table.cell(row, ref_idx), table.cell(row, alt_idx)) {
            (Some(r), Some(a)) => (r.to_string(), a.to_string()),
            _ => continue
        };
        let info = table.cell(row, info_idx).unwrap_or("").to_string();
        // first entry wins for exact duplicate keys; later payloads are dropped
        let key = (chrom, pos, ref_allele, alt_allele);
        if reference.contains_key(&key) {
            debug!("Discarding duplicate reference entry for {}:{} {}>{}", key.0, key.1, key.2, key.3);
        } else {
            reference.insert(key, info);
        }
    }
    Ok(reference)
}

/// Column aliases accepted for patient-side coordinates, canonical spelling first
pub const CHROM_ALIASES: [&str; 4] = ["chrom_norm", "CHROM_from_hgvs", "#CHROM", "chrom"];
pub const POS_ALIASES: [&str; 3] = ["pos_norm", "POS_from_hgvs", "POS"];
pub const REF_ALIASES: [&str; 3] = ["ref_norm", "REF_from_hgvs", "REF"];
pub const ALT_ALIASES: [&str; 3] = ["alt_norm", "ALT_from_hgvs", "ALT"];

/// Column holding a genomic HGVS string when no coordinate columns exist
const HGVS_G_COLUMN: &str = "HGVS_G_GRCh38";

/// Builds the per-row normalized join key from whichever coordinate columns the
/// table carries. If none are present, falls back to exploding the genomic HGVS
/// column (simple SNVs only); rows that fail stay keyless.
/// # Errors
/// * if neither coordinate columns nor the genomic HGVS column exist
pub fn row_variant_keys(table: &CsvTable) -> Result<Vec<Option<VariantKey>>, Box<dyn std::error::Error>> {
    let coord_cols = (
        table.resolve_alias(&CHROM_ALIASES),
        table.resolve_alias(&POS_ALIASES),
        table.resolve_alias(&REF_ALIASES),
        table.resolve_alias(&ALT_ALIASES)
    );

    if let (Some(chrom_idx), Some(pos_idx), Some(ref_idx), Some(alt_idx)) = coord_cols {
        let keys = (0..table.len())
            .map(|row| {
                let chrom = table.cell(row, chrom_idx).and_then(normalize_chrom)?;
                let pos: u64 = table.cell(row, pos_idx)?.parse().ok()?;
                let ref_allele = table.cell(row, ref_idx)?.to_string();
                let alt_allele = table.cell(row, alt_idx)?.to_string();
                Some((chrom, pos, ref_allele, alt_allele))
            })
            .collect();
        return Ok(keys);
    }

    let hgvs_idx = match table.column_index(HGVS_G_COLUMN) {
        Some(idx) => idx,
        None => bail!("input has neither coordinate columns ({}/{}/{}/{}) nor a '{HGVS_G_COLUMN}' column",
            CHROM_ALIASES[0], POS_ALIASES[0], REF_ALIASES[0], ALT_ALIASES[0])
    };
    let keys = (0..table.len())
        .map(|row| {
            let variant = table.cell(row, hgvs_idx).and_then(explode_genomic_snv)?;
            Some((
                variant.chrom().to_string(),
                variant.pos(),
                variant.ref_allele().to_string(),
                variant.alt_allele().to_string()
            ))
        })
        .collect();
    Ok(keys)
}

/// Annotates every patient row with ClinVar evidence using the two-phase join:
/// the distinct key set is resolved against the reference once, then broadcast
/// back to all rows. Adds `clinvar_match` and `INFO_STRING` columns.
/// # Errors
/// * if no usable coordinate source exists in the table
pub fn annotate_with_clinvar(table: &mut CsvTable, reference: &HashMap<VariantKey, String>) -> Result<usize, Box<dyn std::error::Error>> {
    let keys = row_variant_keys(table)?;
    let hits = distinct_then_broadcast(&keys, ReferenceHit::miss(), |key| {
        match reference.get(key) {
            Some(info) => ReferenceHit::hit(Some(info.clone())),
            None => ReferenceHit::miss()
        }
    });

    let match_count = hits.iter().filter(|h| h.matched).count();
    let match_col: Vec<String> = hits.iter().map(|h| h.matched.to_string()).collect();
    let info_col: Vec<String> = hits.into_iter().map(|h| h.info.unwrap_or_default()).collect();
    table.push_column("clinvar_match", match_col);
    table.push_column("INFO_STRING", info_col);
    Ok(match_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_reference() -> HashMap<VariantKey, String> {
        let mut reference: HashMap<VariantKey, String> = Default::default();
        reference.insert(
            ("18".to_string(), 63637928, "C".to_string(), "T".to_string()),
            "ALLELEID=12345;CLNSIG=Pathogenic".to_string()
        );
        reference
    }

    #[test]
    fn test_parse_and_write_vcf() {
        let temp_dir = tempfile::tempdir().unwrap();
        let vcf_fn = temp_dir.path().join("subset.vcf");
        std::fs::write(&vcf_fn, "\
##fileformat=VCFv4.2\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
17\t7668407\tCV_1\tG\tC\t.\t.\tCLNSIG=Benign\n\
short\tline\n\
12\tnot_a_number\tCV_9\tA\tG\t.\t.\tCLNSIG=Benign\n\
18\t63637928\tCV_2\tC\tT\t.\t.\tCLNSIG=Pathogenic\n").unwrap();

        // the short line and the bad-POS line are skipped, not fatal
        let records = parse_clinvar_vcf(&vcf_fn, None).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].chrom, "17");
        assert_eq!(records[0].info, "CLNSIG=Benign");
        assert_eq!(records[1].chrom, "18");

        let capped = parse_clinvar_vcf(&vcf_fn, Some(1)).unwrap();
        assert_eq!(capped.len(), 1);

        let tsv_fn = temp_dir.path().join("subset.tsv");
        write_parsed_tsv(&records, &tsv_fn).unwrap();
        let reference = load_reference_tsv(&tsv_fn).unwrap();
        assert_eq!(reference.len(), 2);
        assert_eq!(
            reference.get(&("18".to_string(), 63637928, "C".to_string(), "T".to_string())).unwrap(),
            "CLNSIG=Pathogenic"
        );
    }

    #[test]
    fn test_duplicate_reference_keys() {
        let temp_dir = tempfile::tempdir().unwrap();
        let tsv_fn = temp_dir.path().join("dup.tsv");
        std::fs::write(&tsv_fn, "\
#CHROM\tPOS\tREF\tALT\tINFO_STRING\n\
17\t7668407\tG\tC\tCLNSIG=Benign\n\
chr17\t7668407\tG\tC\tCLNSIG=Pathogenic\n").unwrap();

        // both rows normalize to the same key; the first payload wins
        let reference = load_reference_tsv(&tsv_fn).unwrap();
        assert_eq!(reference.len(), 1);
        assert_eq!(
            reference.get(&("17".to_string(), 7668407, "G".to_string(), "C".to_string())).unwrap(),
            "CLNSIG=Benign"
        );
    }

    #[test]
    fn test_annotate_from_coordinate_columns() {
        let mut table = CsvTable::new(
            ["id", "CHROM_from_hgvs", "POS_from_hgvs", "REF_from_hgvs", "ALT_from_hgvs"]
                .iter().map(|s| s.to_string()).collect()
        );
        table.push_row(vec!["1".into(), "chr18".into(), "63637928".into(), "C".into(), "T".into()]);
        table.push_row(vec!["2".into(), "18".into(), "63637928".into(), "C".into(), "T".into()]);
        table.push_row(vec!["3".into(), "1".into(), "500".into(), "A".into(), "G".into()]);
        table.push_row(vec!["4".into(), "".into(), "".into(), "".into(), "".into()]);

        let matches = annotate_with_clinvar(&mut table, &mock_reference()).unwrap();
        // rows 1 and 2 normalize to the same key and both match
        assert_eq!(matches, 2);
        let match_idx = table.column_index("clinvar_match").unwrap();
        let info_idx = table.column_index("INFO_STRING").unwrap();
        assert_eq!(table.cell(0, match_idx), Some("true"));
        assert_eq!(table.cell(1, match_idx), Some("true"));
        assert_eq!(table.cell(2, match_idx), Some("false"));
        assert_eq!(table.cell(3, match_idx), Some("false"));
        assert_eq!(table.cell(0, info_idx), Some("ALLELEID=12345;CLNSIG=Pathogenic"));
        assert_eq!(table.cell(2, info_idx), None);
    }

    #[test]
    fn test_annotate_from_hgvs_fallback() {
        let mut table = CsvTable::new(vec!["id".to_string(), "HGVS_G_GRCh38".to_string()]);
        table.push_row(vec!["1".into(), "NC_000018.10:g.63637928C>T".into()]);
        table.push_row(vec!["2".into(), "NC_000019.10:g.40843713_40843714del".into()]);

        let matches = annotate_with_clinvar(&mut table, &mock_reference()).unwrap();
        assert_eq!(matches, 1);
        let match_idx = table.column_index("clinvar_match").unwrap();
        assert_eq!(table.cell(0, match_idx), Some("true"));
        assert_eq!(table.cell(1, match_idx), Some("false"));
    }

    #[test]
    fn test_missing_coordinate_source() {
        let mut table = CsvTable::new(vec!["id".to_string(), "variante".to_string()]);
        table.push_row(vec!["1".into(), "NM_177438.3(DICER1):c.5540C>T".into()]);
        assert!(annotate_with_clinvar(&mut table, &mock_reference()).is_err());
    }
}
