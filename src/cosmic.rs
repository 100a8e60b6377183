
use log::{debug, info};
use rustc_hash::FxHashMap as HashMap;
use std::path::Path;

use crate::data_types::classification::{classify, Evidence, SampleType};
use crate::data_types::hgvs::HgvsDescriptor;
use crate::util::file_io::open_text_reader;
use crate::util::table::{CsvTable, TableError};

/// The join key used against COSMIC: gene symbol plus whichever change
/// representations the descriptor yielded
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CosmicKey {
    pub gene: String,
    /// coding change, e.g. `c.5540C>T`
    pub cds: Option<String>,
    /// 3-letter amino-acid change, e.g. `Ala1847Val`
    pub aa3: Option<String>,
    /// 1-letter amino-acid change, e.g. `A1847V`
    pub aa1: Option<String>
}

impl CosmicKey {
    /// Builds a queryable key from a parsed descriptor. A key needs a gene plus
    /// at least one amino-acid form; anything less cannot be matched in COSMIC
    /// and stays un-queryable (evidence Unknown).
    pub fn from_descriptor(descriptor: &HgvsDescriptor) -> Option<CosmicKey> {
        let gene = descriptor.gene_symbol.clone()?;
        let aa3 = descriptor.aa_change_3();
        let aa1 = descriptor.aa_change_1();
        if aa3.is_none() && aa1.is_none() {
            return None;
        }
        Some(CosmicKey {
            gene,
            cds: descriptor.coding_change.clone(),
            aa3,
            aa1
        })
    }
}

/// Per-key hit counters accumulated during the streaming scan
#[derive(Clone, Copy, Debug, Default)]
struct HitCounts {
    total: u64,
    somatic: u64
}

/// Required COSMIC column headers
const COSMIC_COLUMNS: [&str; 6] = [
    "GENE_SYMBOL", "HGVSC", "HGVSP", "MUTATION_CDS", "MUTATION_AA", "MUTATION_SOMATIC_STATUS"
];

/// Streams the COSMIC TSV once and scores every distinct key against it.
/// The file is scanned row-by-row so peak memory stays bounded no matter how
/// large the reference is; cost is O(file) + O(distinct keys), not O(patient rows).
///
/// A key matches a COSMIC row when the gene symbol agrees and any of the change
/// representations line up (amino-acid change against MUTATION_AA or the
/// HGVSP suffix, coding change against MUTATION_CDS or the HGVSC suffix).
/// Evidence per key: any matching row flagged somatic -> True; matched rows but
/// none somatic -> False (treated as a non-match for somatic purposes).
/// # Arguments
/// * `filename` - the COSMIC TSV, tab-delimited with a header row, plain or gzipped
/// * `keys` - the distinct key set to score
/// # Errors
/// * if the file does not open or parse
/// * if a required COSMIC column is missing, naming the column
pub fn scan_cosmic(filename: &Path, keys: &[CosmicKey]) -> Result<Vec<Evidence>, Box<dyn std::error::Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(open_text_reader(filename)?);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let mut column_indices: [usize; 6] = [0; 6];
    for (slot, name) in column_indices.iter_mut().zip(COSMIC_COLUMNS.iter()) {
        *slot = match headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name)) {
            Some(idx) => idx,
            None => return Err(Box::new(TableError::MissingColumn { name: name.to_string() }))
        };
    }
    let [gene_idx, hgvsc_idx, hgvsp_idx, cds_idx, aa_idx, status_idx] = column_indices;

    // index the distinct keys by gene so each COSMIC row only tests its own gene
    let mut keys_by_gene: HashMap<&str, Vec<usize>> = Default::default();
    for (i, key) in keys.iter().enumerate() {
        keys_by_gene.entry(key.gene.as_str()).or_default().push(i);
    }

    let mut counts: Vec<HitCounts> = vec![HitCounts::default(); keys.len()];
    let mut scanned: u64 = 0;
    for record in reader.records() {
        let record = record?;
        scanned += 1;
        let gene = record.get(gene_idx).unwrap_or("").trim();
        let candidates = match keys_by_gene.get(gene) {
            Some(c) => c,
            None => continue
        };

        let hgvsc = record.get(hgvsc_idx).unwrap_or("").trim();
        let hgvsp = record.get(hgvsp_idx).unwrap_or("").trim();
        let mutation_cds = record.get(cds_idx).unwrap_or("").trim();
        let mutation_aa = record.get(aa_idx).unwrap_or("").trim();
        let somatic = record.get(status_idx).unwrap_or("").to_lowercase().contains("somatic");

        // HGVSP comes as ENSP...:p.Xxx; strip the accession and the p. prefix
        let hgvsp_clean = hgvsp.split(':').nth(1).unwrap_or(hgvsp).trim_start_matches("p.");
        let mutaa_clean = mutation_aa.trim_start_matches("p.");

        for &key_idx in candidates.iter() {
            let key = &keys[key_idx];
            let aa_match = [key.aa3.as_deref(), key.aa1.as_deref()]
                .into_iter()
                .flatten()
                .any(|aa| !aa.is_empty() && (aa == mutaa_clean || aa == hgvsp_clean));
            let cds_match = match key.cds.as_deref() {
                Some(cds) => cds == mutation_cds || (!cds.is_empty() && hgvsc.ends_with(&format!(":{cds}"))),
                None => false
            };
            if aa_match || cds_match {
                counts[key_idx].total += 1;
                if somatic {
                    counts[key_idx].somatic += 1;
                }
            }
        }
    }
    debug!("Scanned {scanned} COSMIC rows against {} distinct keys.", keys.len());

    Ok(counts.iter()
        .map(|c| if c.somatic > 0 { Evidence::True } else { Evidence::False })
        .collect())
}

/// Required patient-table columns for classification
const ID_COLUMN: &str = "id";
const VARIANT_COLUMN: &str = "variante";
const SAMPLE_TYPE_COLUMN: &str = "tipo_de_muestra";

/// Runs the whole somatic/germline classification over a patient cohort table:
/// parse descriptors from the free-text variant column, score the distinct
/// COSMIC keys with one streaming pass, reduce evidence per patient-variant id,
/// then apply the rule table row by row. Appends `somatic_evidence`,
/// `sample_type_norm`, `final_label`, and `reason` columns.
/// # Errors
/// * if a required column is missing
/// * if the COSMIC scan fails
pub fn classify_cohort(table: &mut CsvTable, cosmic_tsv: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let id_idx = table.require_column(ID_COLUMN)?;
    let variant_idx = table.require_column(VARIANT_COLUMN)?;
    let sample_idx = table.require_column(SAMPLE_TYPE_COLUMN)?;

    // per-row keys, then the distinct queryable subset
    let row_keys: Vec<Option<CosmicKey>> = (0..table.len())
        .map(|row| {
            let text = table.cell(row, variant_idx)?;
            CosmicKey::from_descriptor(&HgvsDescriptor::from_text(text))
        })
        .collect();

    let mut distinct: Vec<CosmicKey> = vec![];
    let mut key_slots: HashMap<CosmicKey, usize> = Default::default();
    for key in row_keys.iter().flatten() {
        if !key_slots.contains_key(key) {
            key_slots.insert(key.clone(), distinct.len());
            distinct.push(key.clone());
        }
    }
    info!("Classifying {} rows via {} distinct COSMIC keys.", table.len(), distinct.len());

    let key_evidence = scan_cosmic(cosmic_tsv, &distinct)?;

    // broadcast per-key evidence back to rows; keyless rows stay Unknown
    let row_evidence: Vec<Evidence> = row_keys.iter()
        .map(|key| match key {
            Some(k) => key_evidence[key_slots[k]],
            None => Evidence::Unknown
        })
        .collect();

    // reduce across all rows sharing one patient-variant id
    let mut by_id: HashMap<String, Vec<Evidence>> = Default::default();
    for row in 0..table.len() {
        let id = table.cell(row, id_idx).unwrap_or("").to_string();
        by_id.entry(id).or_default().push(row_evidence[row]);
    }
    let reduced: HashMap<String, Evidence> = by_id.into_iter()
        .map(|(id, values)| (id, Evidence::reduce(values)))
        .collect();

    let mut evidence_col: Vec<String> = Vec::with_capacity(table.len());
    let mut sample_col: Vec<String> = Vec::with_capacity(table.len());
    let mut label_col: Vec<String> = Vec::with_capacity(table.len());
    let mut reason_col: Vec<String> = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let id = table.cell(row, id_idx).unwrap_or("");
        let evidence = reduced.get(id).copied().unwrap_or(Evidence::Unknown);
        let sample_type = SampleType::from_raw(table.cell(row, sample_idx).unwrap_or(""));
        let (label, reason) = classify(sample_type, evidence);
        evidence_col.push(evidence.to_string());
        sample_col.push(sample_type.to_string());
        label_col.push(label.to_string());
        reason_col.push(reason.to_string());
    }
    table.push_column("somatic_evidence", evidence_col);
    table.push_column("sample_type_norm", sample_col);
    table.push_column("final_label", label_col);
    table.push_column("reason", reason_col);
    Ok(())
}
