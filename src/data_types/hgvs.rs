
use lazy_static::lazy_static;
use regex::Regex;
use rustc_hash::FxHashMap as HashMap;
use serde::Serialize;

use crate::data_types::variant::VariantRecord;

lazy_static! {
    /// First parenthesized group, which is the gene symbol in clinical annotation text
    static ref GENE_REGEX: Regex = Regex::new(r"\(([^)]+)\)").unwrap();
    /// Coding change: `c.` prefix up to the next space or closing paren
    static ref CODING_REGEX: Regex = Regex::new(r"(c\.[^ )]+)").unwrap();
    /// Protein change: `p.` clause inside parentheses
    static ref PROTEIN_REGEX: Regex = Regex::new(r"\((p\.[^)]+)\)").unwrap();
    /// Transcript + coding change in the annotated form `NM_177438.3(DICER1):c.5540C>T`
    static ref TX_ANNOTATED_REGEX: Regex = Regex::new(r"(N[MR]_\d+\.\d+)\([A-Za-z0-9_-]+\):((?:c|n)\.[^ )]+)").unwrap();
    /// Transcript + coding change already in the clean form `NM_177438.3:c.5540C>T`
    static ref TX_CLEAN_REGEX: Regex = Regex::new(r"(N[MR]_\d+\.\d+):(c\.[^ )]+)").unwrap();
    /// Simple genomic SNV change after the `:g.` split, e.g. `63637928C>T`
    static ref GENOMIC_SNV_REGEX: Regex = Regex::new(r"^(\d+)([ACGT])>([ACGT])").unwrap();
    /// Amino-acid change shape accepted by the 3-to-1 letter normalizer
    static ref AA_CHANGE_REGEX: Regex = Regex::new(r"^[A-Za-z]{3}[0-9]+[A-Za-z=*]{0,3}$").unwrap();

    /// Fixed 3-letter to 1-letter amino acid table, including the Ter stop codon
    static ref AA3_TO_AA1: HashMap<&'static str, &'static str> = {
        let mut m: HashMap<&'static str, &'static str> = Default::default();
        for (three, one) in [
            ("Ala", "A"), ("Arg", "R"), ("Asn", "N"), ("Asp", "D"), ("Cys", "C"),
            ("Gln", "Q"), ("Glu", "E"), ("Gly", "G"), ("His", "H"), ("Ile", "I"),
            ("Leu", "L"), ("Lys", "K"), ("Met", "M"), ("Phe", "F"), ("Pro", "P"),
            ("Ser", "S"), ("Thr", "T"), ("Trp", "W"), ("Tyr", "Y"), ("Val", "V"),
            ("Ter", "*")
        ] {
            m.insert(three, one);
        }
        m
    };
}

/// A partially parsed HGVS description pulled out of free annotation text.
/// Any subset of fields can be absent; absence of a match is not a failure.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct HgvsDescriptor {
    /// e.g. `NM_177438.3`
    pub transcript_accession: Option<String>,
    /// e.g. `DICER1`
    pub gene_symbol: Option<String>,
    /// e.g. `c.5540C>T`
    pub coding_change: Option<String>,
    /// e.g. `p.Ala1847Val`
    pub protein_change: Option<String>
}

impl HgvsDescriptor {
    /// Parses free text such as `NM_177438.3(DICER1):c.5540C>T (p.Ala1847Val)`.
    /// Each regex is applied independently; a miss yields a missing field.
    pub fn from_text(text: &str) -> HgvsDescriptor {
        let transcript_accession = TX_ANNOTATED_REGEX.captures(text)
            .or_else(|| TX_CLEAN_REGEX.captures(text))
            .map(|c| c[1].to_string());
        let gene_symbol = GENE_REGEX.captures(text).map(|c| c[1].to_string());
        let coding_change = CODING_REGEX.captures(text).map(|c| c[1].to_string());
        let protein_change = PROTEIN_REGEX.captures(text).map(|c| c[1].to_string());

        HgvsDescriptor {
            transcript_accession,
            gene_symbol,
            coding_change,
            protein_change
        }
    }

    /// The protein change with the `p.` prefix removed, still 3-letter form
    pub fn aa_change_3(&self) -> Option<String> {
        self.protein_change.as_ref()
            .map(|p| p.strip_prefix("p.").unwrap_or(p).to_string())
    }

    /// The protein change in 1-letter form, if it conforms to the accepted shape
    pub fn aa_change_1(&self) -> Option<String> {
        self.aa_change_3().as_deref().and_then(aa3_to_aa1)
    }

    /// Rebuilds the transcript-scoped coding change, `NM_177438.3:c.5540C>T`
    pub fn transcript_coding(&self) -> Option<String> {
        match (self.transcript_accession.as_ref(), self.coding_change.as_ref()) {
            (Some(tx), Some(c)) => Some(format!("{tx}:{c}")),
            _ => None
        }
    }
}

/// Maps a 3-letter amino-acid change like `Ala1847Val` to the 1-letter form `A1847V`.
/// Input not matching the accepted shape yields None, never an error.
/// Unknown 3-letter codes are left in place so the rest of the change survives.
pub fn aa3_to_aa1(change: &str) -> Option<String> {
    if !AA_CHANGE_REGEX.is_match(change) {
        return None;
    }
    let (three, rest) = change.split_at(3);
    let one = AA3_TO_AA1.get(three).copied().unwrap_or(three);
    Some(format!("{one}{rest}"))
}

/// Explodes a simple genomic HGVS SNV like `NC_000018.10:g.63637928C>T` into a
/// VariantRecord with normalized chromosome `18`. Anything that is not this exact
/// shape (indels, repeats, non-NC accessions) yields None.
pub fn explode_genomic_snv(hgvs_g: &str) -> Option<VariantRecord> {
    if !hgvs_g.starts_with("NC_") {
        return None;
    }
    let (accession, change) = hgvs_g.split_once(":g.")?;
    let captures = GENOMIC_SNV_REGEX.captures(change)?;
    let pos: u64 = captures[1].parse().ok()?;
    VariantRecord::new(accession, pos, &captures[2], &captures[3]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_extraction() {
        let d = HgvsDescriptor::from_text("NM_177438.3(DICER1):c.5540C>T (p.Ala1847Val)");
        assert_eq!(d.transcript_accession.as_deref(), Some("NM_177438.3"));
        assert_eq!(d.gene_symbol.as_deref(), Some("DICER1"));
        assert_eq!(d.coding_change.as_deref(), Some("c.5540C>T"));
        assert_eq!(d.protein_change.as_deref(), Some("p.Ala1847Val"));
        assert_eq!(d.aa_change_3().as_deref(), Some("Ala1847Val"));
        assert_eq!(d.aa_change_1().as_deref(), Some("A1847V"));
        assert_eq!(d.transcript_coding().as_deref(), Some("NM_177438.3:c.5540C>T"));
    }

    #[test]
    fn test_partial_extraction() {
        // no p. clause: protein change is absent, nothing fails
        let d = HgvsDescriptor::from_text("NM_001162498.3:c.105T>C");
        assert_eq!(d.transcript_accession.as_deref(), Some("NM_001162498.3"));
        assert_eq!(d.gene_symbol, None);
        assert_eq!(d.coding_change.as_deref(), Some("c.105T>C"));
        assert_eq!(d.protein_change, None);
        assert_eq!(d.aa_change_1(), None);

        // gene not at the start still resolves via the first parens group
        let d = HgvsDescriptor::from_text("c.2098A>G (SF3B1) (p.Lys700Glu)");
        assert_eq!(d.gene_symbol.as_deref(), Some("SF3B1"));
        assert_eq!(d.protein_change.as_deref(), Some("p.Lys700Glu"));

        let d = HgvsDescriptor::from_text("not an hgvs string");
        assert_eq!(d, HgvsDescriptor::default());
    }

    #[test]
    fn test_aa3_to_aa1() {
        assert_eq!(aa3_to_aa1("Ala1847Val").as_deref(), Some("A1847V"));
        assert_eq!(aa3_to_aa1("Lys700Glu").as_deref(), Some("K700E"));
        assert_eq!(aa3_to_aa1("Trp26Ter").as_deref(), Some("W26Ter"));
        assert_eq!(aa3_to_aa1("Arg130=").as_deref(), Some("R130="));
        // unknown prefix is left in place
        assert_eq!(aa3_to_aa1("Xyz100Ala").as_deref(), Some("Xyz100Ala"));
        // non-conforming input yields a missing value, never a panic
        assert_eq!(aa3_to_aa1("1847Val"), None);
        assert_eq!(aa3_to_aa1("Ala1847ValExtra"), None);
        assert_eq!(aa3_to_aa1(""), None);
    }

    #[test]
    fn test_explode_genomic_snv() {
        let v = explode_genomic_snv("NC_000018.10:g.63637928C>T").unwrap();
        assert_eq!(v.chrom(), "18");
        assert_eq!(v.pos(), 63637928);
        assert_eq!(v.ref_allele(), "C");
        assert_eq!(v.alt_allele(), "T");

        // non-SNV and malformed shapes are rejected quietly
        assert!(explode_genomic_snv("NC_000019.10:g.40843713_40843714del").is_none());
        assert!(explode_genomic_snv("NM_177438.3:c.5540C>T").is_none());
        assert!(explode_genomic_snv("").is_none());
    }
}
