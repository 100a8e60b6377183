
/// The canonical contig ordering used when sorting VCF output.
/// Anything not in this list sorts after everything that is.
pub const CHROM_ORDER: [&str; 25] = [
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "10",
    "11", "12", "13", "14", "15", "16", "17", "18", "19", "20",
    "21", "22", "X", "Y", "MT"
];

/// Rank assigned to chromosome tokens we do not recognize
pub const UNKNOWN_CHROM_RANK: usize = 99;

/// Normalizes a chromosome token into the canonical comparable form.
/// Rules are applied in order:
/// 1. strip surrounding whitespace
/// 2. strip a `chr` prefix (any case)
/// 3. strip an `NC_` accession prefix along with its version suffix
/// 4. strip leading zeros from numeric cores
/// 5. map `23` -> `X`, `24` -> `Y`, `{M, MT, MTDNA}` -> `MT`
///
/// Unrecognized input is echoed back unchanged; callers must treat that as
/// "unverified" rather than an error.
/// # Examples
/// * `"17"`, `"chr17"`, `"NC_000017.11"` all normalize to `"17"`
/// * `"X"` and `"23"` both normalize to `"X"`
/// * `"M"`, `"MT"`, `"mtDNA"` all normalize to `"MT"`
pub fn normalize_chrom(token: &str) -> Option<String> {
    let mut s: &str = token.trim();
    if s.is_empty() {
        return None;
    }

    // strip the chr prefix if present
    if s.len() >= 3 && s[..3].eq_ignore_ascii_case("chr") {
        s = &s[3..];
    }

    // NC_000018.10 -> 000018
    let stripped: String = if s.len() >= 3 && s[..3].eq_ignore_ascii_case("nc_") {
        let core = &s[3..];
        match core.split('.').next() {
            Some(c) => c.to_string(),
            None => core.to_string()
        }
    } else {
        s.to_string()
    };

    // strip leading zeros from numeric cores
    let mut s: String = if !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit()) {
        let no_zeros = stripped.trim_start_matches('0');
        if no_zeros.is_empty() { "0".to_string() } else { no_zeros.to_string() }
    } else {
        stripped
    };

    // sex chromosome numeric aliases
    if s == "23" {
        s = "X".to_string();
    } else if s == "24" {
        s = "Y".to_string();
    }

    // mitochondrial aliases
    if matches!(s.to_ascii_uppercase().as_str(), "M" | "MT" | "MTDNA") {
        s = "MT".to_string();
    }

    Some(s)
}

/// Converts a chromosome token into the `chr`-prefixed contig name used in VCF output.
/// Mitochondrial tokens become `chrM` per the GRCh38 primary assembly naming.
pub fn vcf_contig(token: &str) -> Option<String> {
    let canonical = normalize_chrom(token)?;
    if canonical == "MT" {
        Some("chrM".to_string())
    } else {
        Some(format!("chr{canonical}"))
    }
}

/// Returns the sort rank of a chromosome token, accepting any form the normalizer does.
pub fn chrom_rank(token: &str) -> usize {
    let canonical = match normalize_chrom(token) {
        Some(c) => c,
        None => return UNKNOWN_CHROM_RANK
    };
    CHROM_ORDER.iter()
        .position(|&c| c == canonical)
        .map(|p| p + 1)
        .unwrap_or(UNKNOWN_CHROM_RANK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_prefix_noise() {
        // all spellings of chromosome 17 collapse to the same token
        for token in ["17", "chr17", "Chr17", "NC_000017.11", " 17 "] {
            assert_eq!(normalize_chrom(token).unwrap(), "17");
        }
    }

    #[test]
    fn test_normalize_sex_and_mito() {
        assert_eq!(normalize_chrom("X").unwrap(), "X");
        assert_eq!(normalize_chrom("23").unwrap(), "X");
        assert_eq!(normalize_chrom("chr23").unwrap(), "X");
        assert_eq!(normalize_chrom("24").unwrap(), "Y");
        assert_eq!(normalize_chrom("M").unwrap(), "MT");
        assert_eq!(normalize_chrom("MT").unwrap(), "MT");
        assert_eq!(normalize_chrom("mtDNA").unwrap(), "MT");
        assert_eq!(normalize_chrom("chrM").unwrap(), "MT");
    }

    #[test]
    fn test_normalize_passthrough() {
        // unrecognized input is echoed back, never an error
        assert_eq!(normalize_chrom("GL000219.1").unwrap(), "GL000219.1");
        assert_eq!(normalize_chrom(""), None);
        assert_eq!(normalize_chrom("   "), None);
    }

    #[test]
    fn test_vcf_round_trip() {
        // a well-formed VCF token survives normalize + re-prefix unchanged
        for token in ["chr17", "chrX", "chrY"] {
            let canonical = normalize_chrom(token).unwrap();
            assert_eq!(vcf_contig(&canonical).unwrap(), token);
        }
        assert_eq!(vcf_contig("MT").unwrap(), "chrM");
        assert_eq!(vcf_contig("chrM").unwrap(), "chrM");
    }

    #[test]
    fn test_chrom_rank() {
        assert_eq!(chrom_rank("chr1"), 1);
        assert_eq!(chrom_rank("22"), 22);
        assert_eq!(chrom_rank("X"), 23);
        assert_eq!(chrom_rank("chr23"), 23);
        assert_eq!(chrom_rank("Y"), 24);
        assert_eq!(chrom_rank("M"), 25);
        assert_eq!(chrom_rank("weird_contig"), UNKNOWN_CHROM_RANK);
    }
}
