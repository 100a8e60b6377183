
use serde::Serialize;
use std::path::Path;

use crate::data_types::variant::VariantRecord;

/// Contains the GraphQL API client and the merge-back of its frequencies
pub mod api;
/// Contains the single-pass local gnomAD VCF lookup
pub mod local;

/// Fixed column order of the headerless cohort summary TSVs
pub const SUMMARY_COLUMNS: [&str; 8] = [
    "CHROM", "POS", "REF", "ALT", "SAMPLE_COUNT", "CLINVAR_MATCH", "CLINVAR_INFO", "SOURCE"
];

/// One row of a cohort summary TSV, kept as the raw strings it arrived with
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct SummaryRow {
    pub chrom: String,
    pub pos: String,
    pub ref_allele: String,
    pub alt_allele: String,
    pub sample_count: String,
    pub clinvar_match: String,
    pub clinvar_info: String,
    pub source: String
}

impl SummaryRow {
    /// The normalized coordinate key for this row, if its fields parse
    pub fn variant(&self) -> Option<VariantRecord> {
        let pos: u64 = self.pos.trim().parse().ok()?;
        VariantRecord::new(&self.chrom, pos, self.ref_allele.trim(), self.alt_allele.trim()).ok()
    }
}

/// Loads a headerless summary TSV; rows with fewer than the 8 fixed columns are
/// skipped rather than failing the batch.
/// # Errors
/// * if the file does not open or parse
pub fn load_summary(filename: &Path) -> Result<Vec<SummaryRow>, Box<dyn std::error::Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(filename)?;
    let mut rows: Vec<SummaryRow> = vec![];
    for record in reader.records() {
        let record = record?;
        if record.len() < SUMMARY_COLUMNS.len() {
            continue;
        }
        rows.push(SummaryRow {
            chrom: record[0].to_string(),
            pos: record[1].to_string(),
            ref_allele: record[2].to_string(),
            alt_allele: record[3].to_string(),
            sample_count: record[4].to_string(),
            clinvar_match: record[5].to_string(),
            clinvar_info: record[6].to_string(),
            source: record[7].to_string()
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_summary() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("somatic_summary.tsv");
        std::fs::write(&path, "chr17\t7668407\tG\tC\t3\t1\tCLNSIG=Pathogenic\tSOMATIC\nshort\trow\n").unwrap();
        let rows = load_summary(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].chrom, "chr17");
        assert_eq!(rows[0].source, "SOMATIC");

        let variant = rows[0].variant().unwrap();
        assert_eq!(variant.variant_id(), "17-7668407-G-C");
    }

    #[test]
    fn test_unparseable_variant() {
        let row = SummaryRow { chrom: "chr1".into(), pos: "not_a_number".into(), ..Default::default() };
        assert!(row.variant().is_none());
    }
}
