
/// Contains gz-aware file helpers and JSON load/save
pub mod file_io;
/// Contains the in-memory CSV/TSV table with alias-based column resolution
pub mod table;
