
use log::info;
use std::path::Path;

use crate::data_types::classification::SampleType;
use crate::util::table::CsvTable;

/// Cohort label derived from the sample origin alone
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum_macros::Display)]
pub enum OriginLabel {
    #[strum(to_string = "somatic")]
    Somatic,
    #[strum(to_string = "germline")]
    Germline,
    #[strum(to_string = "unknown")]
    Unknown
}

impl From<SampleType> for OriginLabel {
    fn from(sample_type: SampleType) -> OriginLabel {
        match sample_type {
            SampleType::Tumor => OriginLabel::Somatic,
            SampleType::Blood => OriginLabel::Germline,
            SampleType::Unknown => OriginLabel::Unknown
        }
    }
}

/// Row counts per cohort after a split
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SplitCounts {
    pub somatic: usize,
    pub germline: usize,
    pub unknown: usize
}

const QUAL_ALIASES: [&str; 2] = ["qual", "QUAL"];
const AF_ALIASES: [&str; 3] = ["frec_alelica", "allele_frequency", "af"];

/// Labels every row by sample origin and writes the somatic and germline
/// cohorts to separate CSVs along with a per-cohort QC summary. Unknown-origin
/// rows are counted but belong to neither output cohort.
/// # Arguments
/// * `table` - the merged patient table, must carry a `tipo_de_muestra` column
/// * `somatic_fn` - output CSV for tumor-origin rows
/// * `germline_fn` - output CSV for blood-origin rows
/// * `qc_fn` - output CSV with per-cohort counts and means
/// # Errors
/// * if the sample type column is missing
/// * if any output fails to write
pub fn split_by_origin(
    table: &CsvTable,
    somatic_fn: &Path,
    germline_fn: &Path,
    qc_fn: &Path
) -> Result<SplitCounts, Box<dyn std::error::Error>> {
    let sample_idx = table.require_column("tipo_de_muestra")?;

    let labels: Vec<OriginLabel> = (0..table.len())
        .map(|row| {
            let raw = table.cell(row, sample_idx).unwrap_or("");
            OriginLabel::from(SampleType::from_raw(raw))
        })
        .collect();

    let mut labeled = table.clone();
    labeled.push_column("origin_label", labels.iter().map(|l| l.to_string()).collect());

    let counts = SplitCounts {
        somatic: labels.iter().filter(|&&l| l == OriginLabel::Somatic).count(),
        germline: labels.iter().filter(|&&l| l == OriginLabel::Germline).count(),
        unknown: labels.iter().filter(|&&l| l == OriginLabel::Unknown).count()
    };
    info!(
        "Origin split: {} somatic, {} germline, {} unknown",
        counts.somatic, counts.germline, counts.unknown
    );

    write_cohort(&labeled, &labels, OriginLabel::Somatic, somatic_fn)?;
    write_cohort(&labeled, &labels, OriginLabel::Germline, germline_fn)?;
    write_qc_summary(&labeled, &labels, qc_fn)?;
    Ok(counts)
}

fn write_cohort(labeled: &CsvTable, labels: &[OriginLabel], keep: OriginLabel, filename: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut cohort = labeled.clone();
    cohort.retain_rows(|row| labels[row] == keep);
    cohort.save(filename, b',')?;
    Ok(())
}

/// One QC line per non-empty cohort: row count plus the mean of the QUAL and
/// allele frequency columns when those columns exist.
fn write_qc_summary(labeled: &CsvTable, labels: &[OriginLabel], filename: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let qual_idx = labeled.resolve_alias(&QUAL_ALIASES);
    let af_idx = labeled.resolve_alias(&AF_ALIASES);

    let mut summary = CsvTable::new(
        ["origin_label", "total", "mean_qual", "mean_allele_frequency"]
            .iter().map(|s| s.to_string()).collect()
    );
    for label in [OriginLabel::Somatic, OriginLabel::Germline, OriginLabel::Unknown] {
        let rows: Vec<usize> = (0..labeled.len()).filter(|&row| labels[row] == label).collect();
        if rows.is_empty() {
            continue;
        }
        summary.push_row(vec![
            label.to_string(),
            rows.len().to_string(),
            column_mean(labeled, &rows, qual_idx).map(|m| format!("{m:.2}")).unwrap_or_default(),
            column_mean(labeled, &rows, af_idx).map(|m| format!("{m:.4}")).unwrap_or_default()
        ]);
    }
    summary.save(filename, b',')?;
    Ok(())
}

/// Mean over the parseable cells of one column; None when the column is absent
/// or no cell parses
fn column_mean(table: &CsvTable, rows: &[usize], column: Option<usize>) -> Option<f64> {
    let idx = column?;
    let values: Vec<f64> = rows.iter()
        .filter_map(|&row| table.cell(row, idx))
        .filter_map(|v| v.trim().parse::<f64>().ok())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> CsvTable {
        let mut table = CsvTable::new(
            ["id", "tipo_de_muestra", "qual", "frec_alelica"]
                .iter().map(|s| s.to_string()).collect()
        );
        table.push_row(vec!["1".into(), "Sangre".into(), "30".into(), "0.5".into()]);
        table.push_row(vec!["2".into(), "tumor".into(), "40".into(), "0.25".into()]);
        table.push_row(vec!["3".into(), "Tumor en parafina (FFPE)".into(), "60".into(), "".into()]);
        table.push_row(vec!["4".into(), "saliva".into(), "".into(), "".into()]);
        table
    }

    #[test]
    fn test_split_by_origin() {
        let temp_dir = tempfile::tempdir().unwrap();
        let somatic_fn = temp_dir.path().join("somatic.csv");
        let germline_fn = temp_dir.path().join("germline.csv");
        let qc_fn = temp_dir.path().join("qc.csv");

        let counts = split_by_origin(&sample_table(), &somatic_fn, &germline_fn, &qc_fn).unwrap();
        assert_eq!(counts, SplitCounts { somatic: 2, germline: 1, unknown: 1 });

        let somatic = CsvTable::load(&somatic_fn, b',').unwrap();
        assert_eq!(somatic.len(), 2);
        let label_idx = somatic.column_index("origin_label").unwrap();
        assert_eq!(somatic.cell(0, label_idx), Some("somatic"));

        let germline = CsvTable::load(&germline_fn, b',').unwrap();
        assert_eq!(germline.len(), 1);
        let id_idx = germline.column_index("id").unwrap();
        assert_eq!(germline.cell(0, id_idx), Some("1"));
    }

    #[test]
    fn test_qc_summary_means() {
        let temp_dir = tempfile::tempdir().unwrap();
        let qc_fn = temp_dir.path().join("qc.csv");
        split_by_origin(
            &sample_table(),
            &temp_dir.path().join("s.csv"),
            &temp_dir.path().join("g.csv"),
            &qc_fn
        ).unwrap();

        let qc = CsvTable::load(&qc_fn, b',').unwrap();
        assert_eq!(qc.len(), 3);
        let label_idx = qc.column_index("origin_label").unwrap();
        let qual_idx = qc.column_index("mean_qual").unwrap();
        let af_idx = qc.column_index("mean_allele_frequency").unwrap();
        // somatic qual mean is (40+60)/2; the blank frequency cell is skipped
        assert_eq!(qc.cell(0, label_idx), Some("somatic"));
        assert_eq!(qc.cell(0, qual_idx), Some("50.00"));
        assert_eq!(qc.cell(0, af_idx), Some("0.2500"));
        // the unknown cohort has no parseable numbers at all
        assert_eq!(qc.cell(2, label_idx), Some("unknown"));
        assert_eq!(qc.cell(2, qual_idx), None);
    }

    #[test]
    fn test_missing_sample_column() {
        let table = CsvTable::new(vec!["id".to_string()]);
        let temp_dir = tempfile::tempdir().unwrap();
        let out = temp_dir.path().join("x.csv");
        assert!(split_by_origin(&table, &out, &out, &out).is_err());
    }
}
