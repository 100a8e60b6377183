
use log::info;
use rustc_hash::FxHashMap as HashMap;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::chrom::{vcf_contig, CHROM_ORDER};
use crate::clinvar::row_variant_keys;
use crate::data_types::variant::VariantRecord;
use crate::util::table::CsvTable;

/// Cohort label written into the SOURCE INFO key
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum, strum_macros::Display)]
pub enum CohortSource {
    #[strum(to_string = "SOMATIC")]
    Somatic,
    #[strum(to_string = "GERMLINE")]
    Germline
}

/// Aliases for the optional per-row columns feeding the INFO field
const CLINVAR_MATCH_ALIASES: [&str; 2] = ["clinvar_match", "CLINVAR_MATCH"];
const CLINVAR_INFO_ALIASES: [&str; 3] = ["INFO_STRING", "CLINVAR_INFO", "ClinVar_INFO"];
const CLINVAR_ID_ALIASES: [&str; 2] = ["Id_clinvar", "clinvar_id"];
const ROW_ID_ALIASES: [&str; 1] = ["id"];

/// One fully assembled VCF data record
#[derive(Clone, Debug)]
struct VcfRecord {
    variant: VariantRecord,
    id: String,
    info: String
}

/// Exports a cohort table as VCFv4.2 text: rows are grouped into unique
/// (chrom,pos,ref,alt) records, sorted by the fixed chromosome order then
/// position and alleles, with one `;`-joined INFO string per record.
/// # Arguments
/// * `table` - the cohort table; coordinates are located via the alias table
/// * `source` - cohort label written as `SOURCE=`
/// * `snv_only` - restrict output to single-base ACGT substitutions
/// * `filename` - the VCF path to write
/// # Errors
/// * if no usable coordinate columns exist
/// * if every row lacks complete coordinates
/// * if the file cannot be written
pub fn export_vcf(table: &CsvTable, source: CohortSource, snv_only: bool, filename: &Path) -> Result<usize, Box<dyn std::error::Error>> {
    let records = collect_records(table, source, snv_only)?;
    info!("Writing {} unique variants to {filename:?}", records.len());

    let mut writer = BufWriter::new(std::fs::File::create(filename)?);
    write_header(&mut writer)?;
    for record in records.iter() {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t.\tPASS\t{}",
            record.variant.contig(),
            record.variant.pos(),
            record.id,
            record.variant.ref_allele(),
            record.variant.alt_allele(),
            record.info
        )?;
    }
    writer.flush()?;
    Ok(records.len())
}

/// Groups the table rows into deduplicated, sorted VCF records
fn collect_records(table: &CsvTable, source: CohortSource, snv_only: bool) -> Result<Vec<VcfRecord>, Box<dyn std::error::Error>> {
    let keys = row_variant_keys(table)?;

    // group row indices by coordinate key; exact duplicates collapse here
    let mut groups: HashMap<VariantRecord, Vec<usize>> = Default::default();
    for (row, key) in keys.iter().enumerate() {
        let (chrom, pos, ref_allele, alt_allele) = match key {
            Some(k) => k,
            None => continue
        };
        let variant = match VariantRecord::new(chrom, *pos, ref_allele, alt_allele) {
            Ok(v) => v,
            Err(_) => continue
        };
        let valid = if snv_only { variant.is_snv() } else { variant.is_acgt_alleles() };
        if valid {
            groups.entry(variant).or_default().push(row);
        }
    }
    if groups.is_empty() {
        simple_error::bail!("no row with complete coordinates is available for VCF export");
    }

    let match_idx = table.resolve_alias(&CLINVAR_MATCH_ALIASES);
    let info_idx = table.resolve_alias(&CLINVAR_INFO_ALIASES);
    let clinvar_id_idx = table.resolve_alias(&CLINVAR_ID_ALIASES);
    let row_id_idx = table.resolve_alias(&ROW_ID_ALIASES);

    let mut records: Vec<VcfRecord> = groups.into_iter()
        .map(|(variant, rows)| {
            let info = build_info(table, &rows, source, match_idx, info_idx);
            let id = pick_id(table, rows[0], clinvar_id_idx, row_id_idx);
            VcfRecord { variant, id, info }
        })
        .collect();
    records.sort_by(|a, b| a.variant.cmp(&b.variant));
    Ok(records)
}

/// Builds the INFO string for one variant group: only present fields are
/// emitted, joined with `;`
fn build_info(table: &CsvTable, rows: &[usize], source: CohortSource, match_idx: Option<usize>, info_idx: Option<usize>) -> String {
    let clinvar_any = match_idx.map(|idx| {
        rows.iter().any(|&row| {
            matches!(table.cell(row, idx), Some(v) if v.eq_ignore_ascii_case("true") || v == "1")
        })
    }).unwrap_or(false);

    let mut parts: Vec<String> = vec![
        format!("SAMPLE_COUNT={}", rows.len()),
        format!("CLINVAR_MATCH={}", if clinvar_any { 1 } else { 0 }),
        format!("SOURCE={source}")
    ];
    if clinvar_any {
        if let Some(idx) = info_idx {
            // first ClinVar payload in the group wins
            if let Some(payload) = rows.iter().find_map(|&row| table.cell(row, idx)) {
                parts.push(format!("CLINVAR_INFO={}", sanitize_info(payload)));
            }
        }
    }
    parts.join(";")
}

/// VCF INFO must stay one-record-per-line; tabs and newlines become spaces
fn sanitize_info(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}

/// Prefers the ClinVar accession of the representative row, then a synthetic
/// id from the internal row id, then the missing marker
fn pick_id(table: &CsvTable, row: usize, clinvar_id_idx: Option<usize>, row_id_idx: Option<usize>) -> String {
    if let Some(id) = clinvar_id_idx.and_then(|idx| table.cell(row, idx)) {
        return id.to_string();
    }
    if let Some(id) = row_id_idx.and_then(|idx| table.cell(row, idx)) {
        return format!("var_{id}");
    }
    ".".to_string()
}

fn write_header(writer: &mut impl Write) -> std::io::Result<()> {
    writeln!(writer, "##fileformat=VCFv4.2")?;
    writeln!(writer, "##fileDate={}", chrono::Utc::now().format("%Y%m%d"))?;
    writeln!(writer, "##FILTER=<ID=PASS,Description=\"All filters passed\">")?;
    writeln!(writer, "##reference=GRCh38")?;
    writeln!(writer, "##source=varloom")?;
    writeln!(writer, "##INFO=<ID=SAMPLE_COUNT,Number=1,Type=Integer,Description=\"How many patient-level rows carried this variant in this cohort\">")?;
    writeln!(writer, "##INFO=<ID=CLINVAR_MATCH,Number=1,Type=Integer,Description=\"1 if the variant matched a ClinVar entry in the join step\">")?;
    writeln!(writer, "##INFO=<ID=SOURCE,Number=1,Type=String,Description=\"SOMATIC or GERMLINE cohort label\">")?;
    writeln!(writer, "##INFO=<ID=CLINVAR_INFO,Number=1,Type=String,Description=\"ClinVar INFO subset for this variant (first hit)\">")?;
    for chrom in CHROM_ORDER.iter() {
        // vcf_contig cannot fail on the fixed order table
        if let Some(contig) = vcf_contig(chrom) {
            writeln!(writer, "##contig=<ID={contig}>")?;
        }
    }
    writeln!(writer, "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinate_table(rows: &[(&str, &str, &str, &str)]) -> CsvTable {
        let mut table = CsvTable::new(
            ["id", "chrom_norm", "pos_norm", "ref_norm", "alt_norm"]
                .iter().map(|s| s.to_string()).collect()
        );
        for (i, (chrom, pos, ref_allele, alt_allele)) in rows.iter().enumerate() {
            table.push_row(vec![
                (i + 1).to_string(),
                chrom.to_string(), pos.to_string(), ref_allele.to_string(), alt_allele.to_string()
            ]);
        }
        table
    }

    #[test]
    fn test_dedup_and_sort() {
        let table = coordinate_table(&[
            ("chr2", "100", "A", "G"),
            ("chr1", "50", "C", "T"),
            ("chr1", "50", "C", "T"),
        ]);
        let records = collect_records(&table, CohortSource::Somatic, true).unwrap();
        // exactly 2 records, chr1:50 before chr2:100
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].variant.contig(), "chr1");
        assert_eq!(records[0].variant.pos(), 50);
        assert_eq!(records[1].variant.contig(), "chr2");
        // the duplicated row contributes to SAMPLE_COUNT
        assert_eq!(records[0].info, "SAMPLE_COUNT=2;CLINVAR_MATCH=0;SOURCE=SOMATIC");
        assert_eq!(records[0].id, "var_2");
    }

    #[test]
    fn test_snv_filter() {
        let table = coordinate_table(&[
            ("chr1", "50", "C", "T"),
            ("chr1", "60", "CA", "C"),
        ]);
        let snv_only = collect_records(&table, CohortSource::Germline, true).unwrap();
        assert_eq!(snv_only.len(), 1);
        let all = collect_records(&table, CohortSource::Germline, false).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_clinvar_info_and_sanitization() {
        let mut table = coordinate_table(&[("chr1", "50", "C", "T"), ("chr1", "50", "C", "T")]);
        table.push_column("clinvar_match", vec!["false".to_string(), "true".to_string()]);
        table.push_column("INFO_STRING", vec![String::new(), "ALLELEID=1\tCLNSIG=Pathogenic\nX".to_string()]);

        let records = collect_records(&table, CohortSource::Somatic, true).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].info,
            "SAMPLE_COUNT=2;CLINVAR_MATCH=1;SOURCE=SOMATIC;CLINVAR_INFO=ALLELEID=1 CLNSIG=Pathogenic X"
        );
    }

    #[test]
    fn test_export_file_shape() {
        let table = coordinate_table(&[("17", "7668407", "G", "C")]);
        let temp_dir = tempfile::tempdir().unwrap();
        let vcf_fn = temp_dir.path().join("cohort.vcf");
        let written = export_vcf(&table, CohortSource::Somatic, true, &vcf_fn).unwrap();
        assert_eq!(written, 1);

        let content = std::fs::read_to_string(&vcf_fn).unwrap();
        assert!(content.starts_with("##fileformat=VCFv4.2\n"));
        assert!(content.contains("##contig=<ID=chrM>"));
        assert!(content.contains("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n"));
        let data_line = content.lines().find(|l| !l.starts_with('#')).unwrap();
        assert_eq!(data_line, "chr17\t7668407\tvar_1\tG\tC\t.\tPASS\tSAMPLE_COUNT=1;CLINVAR_MATCH=0;SOURCE=SOMATIC");
    }

    #[test]
    fn test_no_usable_rows() {
        let table = coordinate_table(&[("chr1", "junk", "C", "T")]);
        assert!(collect_records(&table, CohortSource::Somatic, true).is_err());
    }
}
