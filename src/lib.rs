//! Annotated scan to labelled PLY point cloud pipeline.
//!
//! This crate provides tools for:
//! - Parsing `KEY=VALUE` scan annotation files into positions, colours and labels
//! - Reducing raw labels to canonical classes by their largest meaningful word
//! - Encoding classes as dense integer codes
//! - Writing per-scan and merged PLY clouds and viewing the result
//!
//! # Example
//!
//! ```no_run
//! use scan_label_pipeline::{processors::pipeline::convert_directory, PipelineConfig};
//!
//! let summary = convert_directory(&PipelineConfig::default()).unwrap();
//! println!("{} points", summary.global_points);
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod processors;
pub mod visualization;

pub use config::{InputConfig, OutputConfig, PipelineConfig, ViewerConfig};
pub use core::cloud::{LabeledCloud, LabeledPoint};
pub use core::loaders::Scan;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
