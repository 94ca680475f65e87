//! Label processing and the conversion pipeline.

pub mod encoding;
pub mod labels;
pub mod pipeline;

// Re-export key types for convenience
pub use encoding::{encode_labels, EncodedLabels, LabelError};
pub use labels::{canonicalize_labels, largest_word, split_camel_case, CanonicalLabels, LabelGroups};
pub use pipeline::{convert_directory, find_scan_files, ConversionSummary, ScanAccumulator};
