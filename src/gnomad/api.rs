
use log::{debug, warn};
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use crate::config::PipelineConfig;
use crate::gnomad::{SummaryRow, SUMMARY_COLUMNS};

/// The GraphQL document sent for every variant id; the dataset is substituted
/// from the pipeline configuration
const GRAPHQL_QUERY: &str = "\
query ($variantId: String!, $datasetId: DatasetId!) {
  variant(variantId: $variantId, dataset: $datasetId) {
    variantId
    genome { ac an af }
  }
}";

/// Genome-wide frequency numbers for one variant; all fields absent when the
/// variant is unknown to gnomAD or the request failed
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct GnomadFrequency {
    pub ac: Option<u64>,
    pub an: Option<u64>,
    pub af: Option<f64>
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<GraphqlData>
}

#[derive(Debug, Deserialize)]
struct GraphqlData {
    variant: Option<GraphqlVariant>
}

#[derive(Debug, Deserialize)]
struct GraphqlVariant {
    genome: Option<GnomadFrequency>
}

/// Blocking client for the gnomAD GraphQL API. Strictly sequential with a
/// fixed inter-call delay and fixed timeout; no retry.
pub struct GnomadApiClient {
    client: reqwest::blocking::Client,
    url: String,
    dataset: String,
    delay: std::time::Duration
}

impl GnomadApiClient {
    /// Builds the client from the validated pipeline configuration.
    /// # Errors
    /// * if the underlying HTTP client cannot be constructed
    pub fn new(config: &PipelineConfig) -> Result<GnomadApiClient, Box<dyn std::error::Error>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(GnomadApiClient {
            client,
            url: config.gnomad_api_url.clone(),
            dataset: config.gnomad_dataset.clone(),
            delay: config.delay()
        })
    }

    /// Queries the genome frequency for one `CHROM-POS-REF-ALT` variant id.
    /// Any failure degrades to an empty frequency, the batch continues.
    pub fn frequency(&self, variant_id: &str) -> GnomadFrequency {
        std::thread::sleep(self.delay);
        debug!("Querying gnomAD for {variant_id}");
        let payload = serde_json::json!({
            "query": GRAPHQL_QUERY,
            "variables": { "variantId": variant_id, "datasetId": self.dataset }
        });

        let response = self.client.post(&self.url)
            .json(&payload)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json::<GraphqlResponse>());
        match response {
            Ok(body) => body.data
                .and_then(|d| d.variant)
                .and_then(|v| v.genome)
                .unwrap_or_default(),
            Err(e) => {
                warn!("gnomAD query failed for {variant_id}: {e}");
                GnomadFrequency::default()
            }
        }
    }
}

/// Collects the distinct variant ids out of the combined summaries, preserving
/// first-seen order. Rows whose coordinates do not parse contribute no id.
pub fn distinct_variant_ids(rows: &[SummaryRow]) -> Vec<String> {
    let mut seen: HashSet<String> = Default::default();
    let mut ids: Vec<String> = vec![];
    for row in rows.iter() {
        if let Some(variant) = row.variant() {
            let id = variant.variant_id();
            if seen.insert(id.clone()) {
                ids.push(id);
            }
        }
    }
    ids
}

/// Writes a summary TSV (now with a header row) extended with the gnomAD
/// frequency columns merged back by variant id.
/// # Errors
/// * if the file cannot be created or written
pub fn write_summary_with_frequencies(
    rows: &[SummaryRow],
    frequencies: &HashMap<String, GnomadFrequency>,
    filename: &Path
) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = std::io::BufWriter::new(std::fs::File::create(filename)?);
    writeln!(writer, "{}\tgnomad_ac\tgnomad_an\tgnomad_af", SUMMARY_COLUMNS.join("\t"))?;
    for row in rows.iter() {
        let frequency = row.variant()
            .and_then(|v| frequencies.get(&v.variant_id()).copied())
            .unwrap_or_default();
        let fmt_u64 = |v: Option<u64>| v.map(|x| x.to_string()).unwrap_or_default();
        let af = frequency.af.map(|x| x.to_string()).unwrap_or_default();
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            row.chrom, row.pos, row.ref_allele, row.alt_allele,
            row.sample_count, row.clinvar_match, row.clinvar_info, row.source,
            fmt_u64(frequency.ac), fmt_u64(frequency.an), af
        )?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_row(chrom: &str, pos: &str, ref_allele: &str, alt_allele: &str) -> SummaryRow {
        SummaryRow {
            chrom: chrom.to_string(),
            pos: pos.to_string(),
            ref_allele: ref_allele.to_string(),
            alt_allele: alt_allele.to_string(),
            sample_count: "1".to_string(),
            clinvar_match: "0".to_string(),
            clinvar_info: String::new(),
            source: "SOMATIC".to_string()
        }
    }

    #[test]
    fn test_distinct_variant_ids() {
        let rows = vec![
            mock_row("chr17", "100", "A", "G"),
            mock_row("17", "100", "A", "G"),
            mock_row("chr2", "50", "C", "T"),
            mock_row("chr2", "junk", "C", "T"),
        ];
        // chr17 and 17 normalize to the same id; the junk row contributes nothing
        assert_eq!(distinct_variant_ids(&rows), vec!["17-100-A-G".to_string(), "2-50-C-T".to_string()]);
    }

    #[test]
    fn test_graphql_response_parsing() {
        let body = r#"{"data":{"variant":{"variantId":"17-100-A-G","genome":{"ac":5,"an":251000,"af":0.00002}}}}"#;
        let parsed: GraphqlResponse = serde_json::from_str(body).unwrap();
        let frequency = parsed.data.unwrap().variant.unwrap().genome.unwrap();
        assert_eq!(frequency.ac, Some(5));
        assert_eq!(frequency.af, Some(0.00002));

        // unknown variant comes back as null
        let body = r#"{"data":{"variant":null}}"#;
        let parsed: GraphqlResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.data.unwrap().variant.is_none());
    }

    #[test]
    fn test_write_summary_with_frequencies() {
        let rows = vec![mock_row("chr17", "100", "A", "G"), mock_row("chr2", "50", "C", "T")];
        let mut frequencies: HashMap<String, GnomadFrequency> = Default::default();
        frequencies.insert("17-100-A-G".to_string(), GnomadFrequency { ac: Some(5), an: Some(251000), af: Some(0.00002) });

        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("with_gnomad.tsv");
        write_summary_with_frequencies(&rows, &frequencies, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("CHROM\tPOS"));
        assert!(lines[0].ends_with("gnomad_ac\tgnomad_an\tgnomad_af"));
        assert!(lines[1].ends_with("5\t251000\t0.00002"));
        // unmatched row keeps empty frequency cells
        assert!(lines[2].ends_with("SOMATIC\t\t\t"));
    }
}
