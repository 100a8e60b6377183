
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::chrom::{chrom_rank, normalize_chrom, vcf_contig};

/// The canonical genomic coordinate key for a variant.
/// Chromosome is stored in normalized form (no `chr` prefix, `X`/`Y`/`MT` aliases resolved).
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct VariantRecord {
    /// normalized chromosome token
    chrom: String,
    /// 1-based position
    pos: u64,
    /// reference allele, IUPAC bases, not necessarily single-base
    ref_allele: String,
    /// alternate allele
    alt_allele: String
}

impl VariantRecord {
    /// Typical constructor; normalizes the chromosome token on the way in.
    /// # Arguments
    /// * `chrom` - chromosome in any accepted spelling
    /// * `pos` - 1-based position
    /// * `ref_allele` - reference allele string
    /// * `alt_allele` - alternate allele string
    /// # Errors
    /// * if the chromosome token is empty
    /// * if either allele is empty
    pub fn new(chrom: &str, pos: u64, ref_allele: &str, alt_allele: &str) -> Result<VariantRecord, Box<dyn std::error::Error>> {
        let chrom = match normalize_chrom(chrom) {
            Some(c) => c,
            None => simple_error::bail!("empty chromosome token")
        };
        if ref_allele.is_empty() || alt_allele.is_empty() {
            simple_error::bail!("REF and ALT cannot be empty");
        }
        Ok(VariantRecord {
            chrom,
            pos,
            ref_allele: ref_allele.to_string(),
            alt_allele: alt_allele.to_string()
        })
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn pos(&self) -> u64 {
        self.pos
    }

    pub fn ref_allele(&self) -> &str {
        &self.ref_allele
    }

    pub fn alt_allele(&self) -> &str {
        &self.alt_allele
    }

    /// The `chr`-prefixed contig name for VCF output
    pub fn contig(&self) -> String {
        // normalized chrom is always non-empty, so this cannot be None
        vcf_contig(&self.chrom).unwrap_or_else(|| format!("chr{}", self.chrom))
    }

    /// The `CHROM-POS-REF-ALT` identifier used by the gnomAD API
    pub fn variant_id(&self) -> String {
        format!("{}-{}-{}-{}", self.chrom, self.pos, self.ref_allele, self.alt_allele)
    }

    /// True if this is a single-base substitution over ACGT
    pub fn is_snv(&self) -> bool {
        is_acgt(&self.ref_allele) && self.ref_allele.len() == 1 &&
            is_acgt(&self.alt_allele) && self.alt_allele.len() == 1
    }

    /// True if both alleles are non-empty ACGT strings of any length
    pub fn is_acgt_alleles(&self) -> bool {
        is_acgt(&self.ref_allele) && is_acgt(&self.alt_allele)
    }
}

fn is_acgt(allele: &str) -> bool {
    !allele.is_empty() && allele.chars().all(|c| matches!(c, 'A' | 'C' | 'G' | 'T'))
}

impl Ord for VariantRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        // fixed chromosome order table first, then position, then alleles
        (chrom_rank(&self.chrom), &self.chrom, self.pos, &self.ref_allele, &self.alt_allele)
            .cmp(&(chrom_rank(&other.chrom), &other.chrom, other.pos, &other.ref_allele, &other.alt_allele))
    }
}

impl PartialOrd for VariantRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for VariantRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}{}>{}", self.chrom, self.pos, self.ref_allele, self.alt_allele)
    }
}
