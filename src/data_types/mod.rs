
/// Contains the classification rule table and evidence reduction
pub mod classification;
/// Contains the HGVS descriptor and the regex-based free-text extractor
pub mod hgvs;
/// Contains the typed outcomes of coordinate resolution
pub mod resolution;
/// Contains the canonical genomic variant key
pub mod variant;
