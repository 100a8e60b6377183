
use serde::Serialize;

use crate::data_types::variant::VariantRecord;

/// Typed outcome of resolving a free-text description to genomic coordinates.
/// This replaces the old habit of writing failure sentinels into data columns:
/// downstream consumers can no longer mistake a failure marker for a real allele.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum CoordinateResolution {
    /// The API returned a genomic mapping we could parse
    Resolved(VariantRecord),
    /// The API answered but had no genomic mapping for this description
    NoMapping,
    /// The API answered with a mapping we could not parse
    ParseFailed,
    /// The request itself failed (network error, timeout, non-2xx status)
    RequestFailed
}

impl CoordinateResolution {
    /// Short status token written to the CSV status column
    pub fn status(&self) -> &'static str {
        match self {
            CoordinateResolution::Resolved(_) => "ok",
            CoordinateResolution::NoMapping => "no_mapping",
            CoordinateResolution::ParseFailed => "parse_failed",
            CoordinateResolution::RequestFailed => "request_failed"
        }
    }

    pub fn variant(&self) -> Option<&VariantRecord> {
        match self {
            CoordinateResolution::Resolved(v) => Some(v),
            _ => None
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, CoordinateResolution::Resolved(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tokens() {
        let v = VariantRecord::new("17", 7668407, "G", "C").unwrap();
        let resolved = CoordinateResolution::Resolved(v.clone());
        assert_eq!(resolved.status(), "ok");
        assert_eq!(resolved.variant(), Some(&v));
        assert!(resolved.is_resolved());

        assert_eq!(CoordinateResolution::NoMapping.status(), "no_mapping");
        assert_eq!(CoordinateResolution::ParseFailed.status(), "parse_failed");
        assert_eq!(CoordinateResolution::RequestFailed.status(), "request_failed");
        assert!(CoordinateResolution::RequestFailed.variant().is_none());
    }
}
