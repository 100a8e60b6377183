
use std::path::Path;

/// Errors raised while resolving required structure in an input table
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TableError {
    #[error("input is missing the required column '{name}'")]
    MissingColumn { name: String }
}

/// Picks the field delimiter from the file extension: `.tsv`/`.tab` are
/// tab-delimited, everything else is comma-delimited.
pub fn delimiter_for_path(filename: &Path) -> u8 {
    match filename.extension().and_then(|e| e.to_str()) {
        Some("tsv") | Some("tab") => b'\t',
        _ => b','
    }
}

/// An in-memory delimited table holding every cell as a string.
/// The inputs this tool consumes have column sets that vary per upstream script
/// version, so columns are resolved case-insensitively through explicit alias
/// lists instead of ad hoc per-call guessing.
#[derive(Clone, Debug, Default)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>
}

impl CsvTable {
    pub fn new(headers: Vec<String>) -> CsvTable {
        CsvTable { headers, rows: vec![] }
    }

    /// Loads a delimited file with a header row. Short rows are padded so every
    /// row has one cell per header.
    /// # Arguments
    /// * `filename` - the file to load
    /// * `delimiter` - b',' or b'\t'
    /// # Errors
    /// * if the file does not open or parse
    pub fn load(filename: &Path, delimiter: u8) -> Result<CsvTable, Box<dyn std::error::Error>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_path(filename)?;
        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        let mut rows: Vec<Vec<String>> = vec![];
        for record in reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(|c| c.to_string()).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }
        Ok(CsvTable { headers, rows })
    }

    /// Saves the table with the given delimiter.
    /// # Errors
    /// * if the file cannot be created or written
    pub fn save(&self, filename: &Path, delimiter: u8) -> Result<(), Box<dyn std::error::Error>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_path(filename)?;
        writer.write_record(&self.headers)?;
        for row in self.rows.iter() {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Case-insensitive exact header lookup
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    /// Resolves the first alias that names an existing column
    pub fn resolve_alias(&self, aliases: &[&str]) -> Option<usize> {
        aliases.iter().find_map(|a| self.column_index(a))
    }

    /// Like `column_index`, but missing columns are a fatal data error
    /// # Errors
    /// * if none of the headers matches, naming the offending column
    pub fn require_column(&self, name: &str) -> Result<usize, Box<dyn std::error::Error>> {
        match self.column_index(name) {
            Some(idx) => Ok(idx),
            None => Err(Box::new(TableError::MissingColumn { name: name.to_string() }))
        }
    }

    /// Cell accessor; empty cells and missing columns both come back as None
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        let value = self.rows.get(row)?.get(col)?.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("na") {
            None
        } else {
            Some(value)
        }
    }

    /// Appends a column; the values list must be one per row.
    pub fn push_column(&mut self, name: &str, values: Vec<String>) {
        assert_eq!(values.len(), self.rows.len());
        self.headers.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Keeps only the rows whose index passes the predicate
    pub fn retain_rows(&mut self, mut keep: impl FnMut(usize) -> bool) {
        let mut index = 0;
        self.rows.retain(|_| {
            let result = keep(index);
            index += 1;
            result
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_table() -> CsvTable {
        let mut table = CsvTable::new(vec!["id".to_string(), "Variante".to_string(), "frec_alelica".to_string()]);
        table.push_row(vec!["1".to_string(), "NM_1.1(TP53):c.1A>G".to_string(), "0.5".to_string()]);
        table.push_row(vec!["2".to_string(), "NA".to_string()]);
        table
    }

    #[test]
    fn test_delimiter_for_path() {
        assert_eq!(delimiter_for_path(Path::new("x.tsv")), b'\t');
        assert_eq!(delimiter_for_path(Path::new("x.tab")), b'\t');
        assert_eq!(delimiter_for_path(Path::new("x.csv")), b',');
        assert_eq!(delimiter_for_path(Path::new("no_extension")), b',');
    }

    #[test]
    fn test_alias_resolution() {
        let table = mock_table();
        assert_eq!(table.column_index("variante"), Some(1));
        assert_eq!(table.resolve_alias(&["AF_Alelica", "Frec_alelica"]), Some(2));
        assert_eq!(table.resolve_alias(&["missing", "also_missing"]), None);
        assert!(table.require_column("id").is_ok());
        let err = table.require_column("tipo_de_muestra").unwrap_err();
        assert!(err.to_string().contains("tipo_de_muestra"));
    }

    #[test]
    fn test_cells_and_padding() {
        let table = mock_table();
        assert_eq!(table.cell(0, 0), Some("1"));
        // "NA" and padded-empty cells are both missing
        assert_eq!(table.cell(1, 1), None);
        assert_eq!(table.cell(1, 2), None);
        assert_eq!(table.cell(5, 0), None);
    }

    #[test]
    fn test_round_trip() {
        let table = mock_table();
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("table.tsv");
        table.save(&path, b'\t').unwrap();
        let loaded = CsvTable::load(&path, b'\t').unwrap();
        assert_eq!(loaded.headers(), table.headers());
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.cell(0, 1), Some("NM_1.1(TP53):c.1A>G"));
    }

    #[test]
    fn test_push_column_and_retain() {
        let mut table = mock_table();
        table.push_column("final_label", vec!["somatic".to_string(), "germline".to_string()]);
        assert_eq!(table.cell(1, 3), Some("germline"));
        table.retain_rows(|i| i == 1);
        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, 0), Some("2"));
    }
}
