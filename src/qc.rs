
use log::{info, warn};
use rustc_hash::FxHashMap as HashMap;
use std::path::Path;

use crate::util::table::CsvTable;

/// Metadata columns subject to the rule checks
const QC_COLUMNS: [&str; 4] = ["tipo_tumor", "sexo", "edad", "barrio"];

/// Accepted sex categories, compared lowercase
const VALID_SEX: [&str; 2] = ["m", "f"];

/// Logical age bounds in years
const AGE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=100.0;

/// Per-column completeness report over an extracted cohort table.
/// Output columns: `column`, `missing_rows`, `completeness_pct`; sorted with the
/// least complete columns first so they lead the review.
pub fn completeness_report(table: &CsvTable) -> CsvTable {
    let total = table.len();
    let mut entries: Vec<(String, usize, f64)> = table.headers().iter().enumerate()
        .map(|(col, name)| {
            let missing = (0..total).filter(|&row| table.cell(row, col).is_none()).count();
            let pct = if total == 0 {
                100.0
            } else {
                100.0 * (1.0 - missing as f64 / total as f64)
            };
            (name.clone(), missing, pct)
        })
        .collect();
    entries.sort_by(|(n1, _, p1), (n2, _, p2)| {
        p1.partial_cmp(p2).unwrap_or(std::cmp::Ordering::Equal).then_with(|| n1.cmp(n2))
    });

    let mut report = CsvTable::new(
        ["column", "missing_rows", "completeness_pct"].iter().map(|s| s.to_string()).collect()
    );
    for (name, missing, pct) in entries {
        if pct < 80.0 {
            warn!("Column '{name}' is below 80% completeness ({pct:.2}%)");
        }
        report.push_row(vec![name, missing.to_string(), format!("{pct:.2}")]);
    }
    report
}

/// One finding of the metadata rule checks
struct QcFinding {
    field: &'static str,
    check: &'static str,
    n_errors: usize,
    detail: String
}

/// Runs the metadata rule checks over the key cohort columns and writes the
/// offending rows (with a `qc_error` tag) to a review CSV. A row can appear
/// once per rule it breaks. The review file is written even when empty.
///
/// Rules: missing key column, null cells, sex outside M/F, age outside 0-100,
/// and neighborhood categories seen fewer than twice.
/// # Arguments
/// * `table` - the extracted cohort table
/// * `errors_fn` - CSV receiving the rows that failed a rule
/// # Errors
/// * if the review CSV fails to write
pub fn metadata_qc(table: &CsvTable, errors_fn: &Path) -> Result<CsvTable, Box<dyn std::error::Error>> {
    let mut findings: Vec<QcFinding> = vec![];
    let mut error_rows: Vec<(usize, String)> = vec![];

    for field in QC_COLUMNS {
        let col = match table.column_index(field) {
            Some(c) => c,
            None => {
                findings.push(QcFinding {
                    field,
                    check: "missing_column",
                    n_errors: table.len(),
                    detail: format!("key column '{field}' is not present")
                });
                continue;
            }
        };
        let null_rows: Vec<usize> = (0..table.len())
            .filter(|&row| table.cell(row, col).is_none())
            .collect();
        findings.push(QcFinding {
            field,
            check: "null_values",
            n_errors: null_rows.len(),
            detail: format!("{} null/empty cells", null_rows.len())
        });
        for row in null_rows {
            error_rows.push((row, format!("null in {field}")));
        }
    }

    if let Some(col) = table.column_index("sexo") {
        let invalid: Vec<usize> = (0..table.len())
            .filter(|&row| {
                matches!(table.cell(row, col), Some(v) if !VALID_SEX.contains(&v.to_lowercase().as_str()))
            })
            .collect();
        findings.push(QcFinding {
            field: "sexo",
            check: "invalid_category",
            n_errors: invalid.len(),
            detail: format!("{} values outside M/F", invalid.len())
        });
        for row in invalid {
            error_rows.push((row, "invalid sex category".to_string()));
        }
    }

    if let Some(col) = table.column_index("edad") {
        // non-numeric cells fall through here; the null check already covers blanks
        let out_of_range: Vec<usize> = (0..table.len())
            .filter(|&row| {
                table.cell(row, col)
                    .and_then(|v| v.parse::<f64>().ok())
                    .map(|age| !AGE_RANGE.contains(&age))
                    .unwrap_or(false)
            })
            .collect();
        findings.push(QcFinding {
            field: "edad",
            check: "age_out_of_range",
            n_errors: out_of_range.len(),
            detail: "ages outside the logical 0-100 range".to_string()
        });
        for row in out_of_range {
            error_rows.push((row, "age outside 0-100".to_string()));
        }
    }

    if let Some(col) = table.column_index("barrio") {
        let mut counts: HashMap<&str, usize> = Default::default();
        for row in 0..table.len() {
            if let Some(barrio) = table.cell(row, col) {
                *counts.entry(barrio).or_insert(0) += 1;
            }
        }
        let rare_categories = counts.values().filter(|&&n| n < 2).count();
        findings.push(QcFinding {
            field: "barrio",
            check: "rare_category",
            n_errors: rare_categories,
            detail: format!("{rare_categories} neighborhoods seen fewer than twice")
        });
    }

    write_error_rows(table, &error_rows, errors_fn)?;
    let total_errors: usize = findings.iter().map(|f| f.n_errors).sum();
    info!("Metadata QC found {total_errors} problems across {} checks", findings.len());

    let mut report = CsvTable::new(
        ["field", "check", "n_errors", "detail"].iter().map(|s| s.to_string()).collect()
    );
    for finding in findings {
        report.push_row(vec![
            finding.field.to_string(),
            finding.check.to_string(),
            finding.n_errors.to_string(),
            finding.detail
        ]);
    }
    Ok(report)
}

/// The review CSV is the original table restricted to offending rows, with a
/// trailing `qc_error` column naming the broken rule
fn write_error_rows(table: &CsvTable, error_rows: &[(usize, String)], filename: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut headers: Vec<String> = table.headers().to_vec();
    headers.push("qc_error".to_string());
    let mut out = CsvTable::new(headers);
    for (row, error) in error_rows.iter() {
        let mut cells = table.rows()[*row].clone();
        cells.push(error.clone());
        out.push_row(cells);
    }
    out.save(filename, b',')?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cohort_table() -> CsvTable {
        let mut table = CsvTable::new(
            ["id", "tipo_tumor", "sexo", "edad", "barrio"]
                .iter().map(|s| s.to_string()).collect()
        );
        table.push_row(vec!["1".into(), "pulmon".into(), "M".into(), "55".into(), "centro".into()]);
        table.push_row(vec!["2".into(), "mama".into(), "f".into(), "140".into(), "centro".into()]);
        table.push_row(vec!["3".into(), "".into(), "desconocido".into(), "40".into(), "norte".into()]);
        table
    }

    #[test]
    fn test_completeness_report() {
        let report = completeness_report(&cohort_table());
        assert_eq!(report.len(), 5);
        // the one column with a hole sorts first
        assert_eq!(report.rows()[0], vec!["tipo_tumor", "1", "66.67"]);
        assert_eq!(report.rows()[1], vec!["barrio", "0", "100.00"]);
    }

    #[test]
    fn test_completeness_empty_table() {
        let report = completeness_report(&CsvTable::new(vec!["id".to_string()]));
        assert_eq!(report.rows()[0], vec!["id", "0", "100.00"]);
    }

    #[test]
    fn test_metadata_qc_findings() {
        let temp_dir = tempfile::tempdir().unwrap();
        let errors_fn = temp_dir.path().join("qc_errors.csv");
        let report = metadata_qc(&cohort_table(), &errors_fn).unwrap();

        let by_check = |field: &str, check: &str| -> String {
            report.rows().iter()
                .find(|r| r[0] == field && r[1] == check)
                .map(|r| r[2].clone())
                .unwrap()
        };
        assert_eq!(by_check("tipo_tumor", "null_values"), "1");
        assert_eq!(by_check("sexo", "invalid_category"), "1");
        assert_eq!(by_check("edad", "age_out_of_range"), "1");
        assert_eq!(by_check("barrio", "rare_category"), "1");

        // one review row per broken rule, tagged with the rule
        let errors = CsvTable::load(&errors_fn, b',').unwrap();
        assert_eq!(errors.len(), 3);
        let tag_idx = errors.column_index("qc_error").unwrap();
        let tags: Vec<&str> = (0..errors.len()).map(|r| errors.cell(r, tag_idx).unwrap()).collect();
        assert!(tags.contains(&"null in tipo_tumor"));
        assert!(tags.contains(&"invalid sex category"));
        assert!(tags.contains(&"age outside 0-100"));
    }

    #[test]
    fn test_metadata_qc_missing_column() {
        let mut table = CsvTable::new(vec!["id".to_string(), "sexo".to_string()]);
        table.push_row(vec!["1".into(), "F".into()]);

        let temp_dir = tempfile::tempdir().unwrap();
        let errors_fn = temp_dir.path().join("qc_errors.csv");
        let report = metadata_qc(&table, &errors_fn).unwrap();

        let missing: Vec<&str> = report.rows().iter()
            .filter(|r| r[1] == "missing_column")
            .map(|r| r[0].as_str())
            .collect();
        assert_eq!(missing, vec!["tipo_tumor", "edad", "barrio"]);

        // clean run still writes the (empty) review file
        let errors = CsvTable::load(&errors_fn, b',').unwrap();
        assert!(errors.is_empty());
    }
}
