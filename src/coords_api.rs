
use log::{debug, warn};
use serde_json::Value;

use crate::config::PipelineConfig;
use crate::data_types::hgvs::explode_genomic_snv;
use crate::data_types::resolution::CoordinateResolution;
use crate::join::distinct_then_broadcast;
use crate::util::table::CsvTable;

/// Blocking client for the HGVS normalization API. Calls are strictly
/// sequential with a fixed inter-call delay; there is no retry or backoff, a
/// failed call degrades that description to a typed non-resolved outcome.
pub struct HgvsNormalizerClient {
    client: reqwest::blocking::Client,
    url: String,
    delay: std::time::Duration
}

impl HgvsNormalizerClient {
    /// Builds the client from the validated pipeline configuration.
    /// # Errors
    /// * if the underlying HTTP client cannot be constructed
    pub fn new(config: &PipelineConfig) -> Result<HgvsNormalizerClient, Box<dyn std::error::Error>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(HgvsNormalizerClient {
            client,
            url: config.hgvs_api_url.clone(),
            delay: config.delay()
        })
    }

    /// Resolves one free-text description to genomic coordinates.
    /// The description is trimmed to its first whitespace token, which is the
    /// transcript-scoped HGVS the API accepts (`NM_001162498.3:c.105T>C`).
    pub fn resolve(&self, description: &str) -> CoordinateResolution {
        std::thread::sleep(self.delay);
        let clean = description.split_whitespace().next().unwrap_or(description);
        debug!("Querying normalization API for {clean:?}");

        let response = self.client.post(&self.url)
            .json(&serde_json::json!({ "descriptions": [clean] }))
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json::<Value>());
        let body = match response {
            Ok(b) => b,
            Err(e) => {
                warn!("Normalization request failed for {clean:?}: {e}");
                return CoordinateResolution::RequestFailed;
            }
        };

        parse_normalizer_response(&body)
    }
}

/// Pulls the gDNA mapping out of one API response and parses it into coordinates.
/// The response is an array with one entry per submitted description.
fn parse_normalizer_response(body: &Value) -> CoordinateResolution {
    let entry = match body.as_array().and_then(|a| a.first()) {
        Some(e) => e,
        None => return CoordinateResolution::NoMapping
    };
    if entry.get("error").is_some() {
        return CoordinateResolution::NoMapping;
    }
    let g_notation = match entry.get("gDNA").and_then(|g| g.as_str()) {
        Some(g) => g,
        None => return CoordinateResolution::NoMapping
    };

    // e.g. 'NC_000017.11:g.7668407G>C'; anything fancier than a simple SNV
    // is a mapping we cannot express as coordinates
    match explode_genomic_snv(g_notation) {
        Some(variant) => CoordinateResolution::Resolved(variant),
        None => CoordinateResolution::ParseFailed
    }
}

/// Names of the coordinate columns this step appends, canonical spellings
pub const COORD_COLUMNS: [&str; 5] = ["coord_status", "chrom_norm", "pos_norm", "ref_norm", "alt_norm"];

/// Annotates every row of the patient table with resolved coordinates. Distinct
/// descriptions are resolved once through the API and broadcast back to all rows.
/// Appends a status column plus four coordinate columns; non-resolved rows get
/// the status token and empty coordinate cells, never a sentinel in a data cell.
/// # Arguments
/// * `table` - the patient cohort, must carry a `variante` column
/// * `resolve` - resolver for one distinct description (the API client in production)
/// # Errors
/// * if the required description column is missing
pub fn annotate_coordinates(
    table: &mut CsvTable,
    mut resolve: impl FnMut(&str) -> CoordinateResolution
) -> Result<(), Box<dyn std::error::Error>> {
    let variant_idx = table.require_column("variante")?;

    let descriptions: Vec<Option<String>> = (0..table.len())
        .map(|row| table.cell(row, variant_idx).map(|t| t.to_string()))
        .collect();
    let resolutions = distinct_then_broadcast(
        &descriptions,
        CoordinateResolution::NoMapping,
        |d| resolve(d)
    );

    let mut status_col: Vec<String> = Vec::with_capacity(table.len());
    let mut chrom_col: Vec<String> = Vec::with_capacity(table.len());
    let mut pos_col: Vec<String> = Vec::with_capacity(table.len());
    let mut ref_col: Vec<String> = Vec::with_capacity(table.len());
    let mut alt_col: Vec<String> = Vec::with_capacity(table.len());
    for resolution in resolutions.iter() {
        status_col.push(resolution.status().to_string());
        match resolution.variant() {
            Some(v) => {
                chrom_col.push(v.chrom().to_string());
                pos_col.push(v.pos().to_string());
                ref_col.push(v.ref_allele().to_string());
                alt_col.push(v.alt_allele().to_string());
            },
            None => {
                chrom_col.push(String::new());
                pos_col.push(String::new());
                ref_col.push(String::new());
                alt_col.push(String::new());
            }
        }
    }
    table.push_column(COORD_COLUMNS[0], status_col);
    table.push_column(COORD_COLUMNS[1], chrom_col);
    table.push_column(COORD_COLUMNS[2], pos_col);
    table.push_column(COORD_COLUMNS[3], ref_col);
    table.push_column(COORD_COLUMNS[4], alt_col);
    Ok(())
}
