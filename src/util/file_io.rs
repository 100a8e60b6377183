
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Opens a text file for buffered line reading, transparently decoding `.gz`.
/// # Arguments
/// * `filename` - the file path to open
/// # Errors
/// * if the file does not open properly
pub fn open_text_reader(filename: &Path) -> Result<Box<dyn BufRead>, Box<dyn std::error::Error>> {
    let file = File::open(filename)?;
    if filename.extension().unwrap_or_default() == "gz" {
        Ok(Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Helper function that loads a file into some type, helpful generic
/// # Arguments
/// * `filename` - the file path to open and parse
/// # Errors
/// * if the file does not open properly
/// * if the deserialization throws errors
pub fn load_json<T: serde::de::DeserializeOwned>(filename: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let fp: Box<dyn std::io::Read> = if filename.extension().unwrap_or_default() == "gz" {
        Box::new(
            flate2::read::MultiGzDecoder::new(
                File::open(filename)?
            )
        )
    } else {
        Box::new(File::open(filename)?)
    };
    let result: T = serde_json::from_reader(fp)?;
    Ok(result)
}

/// This will save a generic serializable struct to JSON.
/// # Arguments
/// * `data` - the data in memory
/// * `out_filename` - user provided path to write to
/// # Errors
/// * if opening or writing to the file throw errors
/// * if JSON serialization throws errors
pub fn save_json<T: serde::Serialize>(data: &T, out_filename: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file: Box<dyn std::io::Write> = if out_filename.extension().unwrap_or_default() == "gz" {
        Box::new(
            flate2::write::GzEncoder::new(
                File::create(out_filename)?,
                flate2::Compression::best()
            )
        )
    } else {
        Box::new(File::create(out_filename)?)
    };
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Deserialize, PartialEq, Serialize)]
    struct MockData {
        name: String,
        count: u64
    }

    #[test]
    fn test_json_round_trip() {
        let data = MockData { name: "clinvar_subset".to_string(), count: 42 };
        let temp_dir = tempfile::tempdir().unwrap();
        let fn_plain = temp_dir.path().join("data.json");
        let fn_gz = temp_dir.path().join("data.json.gz");

        save_json(&data, &fn_plain).unwrap();
        save_json(&data, &fn_gz).unwrap();
        let loaded_plain: MockData = load_json(&fn_plain).unwrap();
        let loaded_gz: MockData = load_json(&fn_gz).unwrap();
        assert_eq!(loaded_plain, data);
        assert_eq!(loaded_gz, data);
    }

    #[test]
    fn test_open_text_reader() {
        let temp_dir = tempfile::tempdir().unwrap();
        let fn_plain = temp_dir.path().join("lines.txt");
        std::fs::write(&fn_plain, "a\nb\n").unwrap();
        let reader = open_text_reader(&fn_plain).unwrap();
        let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["a".to_string(), "b".to_string()]);
    }
}
