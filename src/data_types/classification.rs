
use serde::Serialize;

/// Canonical sample origin, normalized from the free-text `tipo_de_muestra` labels
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, strum_macros::Display)]
pub enum SampleType {
    #[strum(to_string = "sangre")]
    Blood,
    #[strum(to_string = "tumor")]
    Tumor,
    #[strum(to_string = "desconocida")]
    Unknown
}

impl SampleType {
    /// Normalizes a raw sample-type label. Matching is lowercase and trimmed;
    /// the mojibake spelling of "líquido" coming out of the source database is
    /// folded back before matching.
    pub fn from_raw(raw: &str) -> SampleType {
        let lowered = raw.trim().to_lowercase().replace("lÃ­quido", "líquido");
        match lowered.as_str() {
            "sangre" => SampleType::Blood,
            "tumor"
            | "tumor en parafina (ffpe)"
            | "tumor en parafina"
            | "líquido pleural"
            | "liquido pleural" => SampleType::Tumor,
            _ => SampleType::Unknown
        }
    }
}

/// Tri-state somatic evidence; Unknown means no reference key could be queried at all
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, strum_macros::Display)]
pub enum Evidence {
    #[strum(to_string = "true")]
    True,
    #[strum(to_string = "false")]
    False,
    #[default]
    #[strum(to_string = "unknown")]
    Unknown
}

impl Evidence {
    /// Reduces the evidence for one patient-variant identifier across all of its
    /// parsed descriptors:
    /// * any True -> True
    /// * all Unknown -> Unknown
    /// * otherwise -> False
    ///
    /// Note the asymmetry: a single Unknown among Trues does not demote the result,
    /// but a single False among Unknowns does resolve to False.
    pub fn reduce(values: impl IntoIterator<Item = Evidence>) -> Evidence {
        let mut any_false = false;
        let mut seen_any = false;
        for v in values {
            seen_any = true;
            match v {
                Evidence::True => return Evidence::True,
                Evidence::False => any_false = true,
                Evidence::Unknown => {}
            }
        }
        if !seen_any || !any_false {
            Evidence::Unknown
        } else {
            Evidence::False
        }
    }
}

/// Final classification label; always resolves to exactly one of these, never null
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, strum_macros::Display)]
pub enum FinalLabel {
    #[strum(to_string = "somatic")]
    Somatic,
    #[strum(to_string = "somatic_by_origin")]
    SomaticByOrigin,
    #[strum(to_string = "germline")]
    Germline,
    #[strum(to_string = "indeterminate")]
    Indeterminate
}

/// Applies the combined clinical rule table. Pure function, no state retained.
/// Returns the label plus a short human-readable reason for the report.
pub fn classify(sample_type: SampleType, evidence: Evidence) -> (FinalLabel, &'static str) {
    match (sample_type, evidence) {
        (SampleType::Tumor, Evidence::True) => (FinalLabel::Somatic, "tumor sample with somatic reference evidence"),
        (SampleType::Tumor, _) => (FinalLabel::SomaticByOrigin, "tumor sample without somatic reference evidence"),
        (SampleType::Blood, Evidence::True) => (FinalLabel::Somatic, "blood sample with somatic reference evidence"),
        (SampleType::Blood, _) => (FinalLabel::Germline, "blood sample without somatic reference evidence"),
        (SampleType::Unknown, Evidence::True) => (FinalLabel::Somatic, "unknown sample origin with somatic reference evidence"),
        (SampleType::Unknown, _) => (FinalLabel::Indeterminate, "unknown sample origin and no somatic reference evidence")
    }
}
