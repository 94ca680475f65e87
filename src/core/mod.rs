//! Core data types and I/O operations.

pub mod cloud;
pub mod loaders;
pub mod writers;

pub use cloud::{assemble, AssembleError, LabeledCloud, LabeledPoint};
pub use loaders::{load_ply, load_scan, parse_scan, LoaderError, Scan};
pub use writers::{save_point_cloud, write_json, write_ply, PlyOptions, WriteError};
