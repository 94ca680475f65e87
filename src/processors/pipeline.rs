//! End-to-end conversion of a scan directory into labelled PLY clouds.
//!
//! Every scan file is written to its own cloud with labels encoded per scan;
//! all scans are then merged into one global cloud whose labels are
//! canonicalised and encoded again over the merged sequence.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::config::{OutputConfig, PipelineConfig};
use crate::core::loaders::{load_scan, Scan};
use crate::core::writers::{save_point_cloud, write_json, PlyOptions};
use crate::processors::encoding::{encode_labels, EncodedLabels};
use crate::processors::labels::{canonicalize_labels, LabelGroups};
use crate::visualization::Viewer;

/// Positions, colours and raw labels of all scans processed so far.
///
/// Sequences are concatenated in processing order.
#[derive(Debug, Clone, Default)]
pub struct ScanAccumulator {
    pub positions: Vec<[f64; 3]>,
    pub colors: Vec<[f64; 3]>,
    pub labels: Vec<String>,
}

impl ScanAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the sequences of one scan.
    pub fn extend(&mut self, scan: &Scan) {
        self.positions.extend_from_slice(&scan.positions);
        self.colors.extend_from_slice(&scan.colors);
        self.labels.extend(scan.labels.iter().cloned());
    }

    /// Number of accumulated positions.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Canonicalised and encoded labels of one sequence.
#[derive(Debug, Clone)]
pub struct LabelEncoding {
    pub groups: LabelGroups,
    pub encoded: EncodedLabels,
}

/// Canonicalise raw labels and encode the result.
pub fn encode_raw_labels(raw_labels: &[String]) -> Result<LabelEncoding> {
    let canonical = canonicalize_labels(raw_labels);
    for (key, members) in canonical.groups.iter() {
        debug!("label group '{}': {:?}", key, members);
    }

    let encoded = encode_labels(&canonical.labels)?;
    Ok(LabelEncoding {
        groups: canonical.groups,
        encoded,
    })
}

/// Result of writing one per-scan cloud.
#[derive(Debug, Clone)]
pub struct ScanOutput {
    /// Processing index, also used in the output file name.
    pub index: usize,
    pub source: PathBuf,
    pub output: PathBuf,
    pub points: usize,
    pub classes: Vec<String>,
}

/// Outcome of a full conversion run.
#[derive(Debug, Clone)]
pub struct ConversionSummary {
    pub scans: Vec<ScanOutput>,
    pub global_output: PathBuf,
    pub global_points: usize,
    pub global_classes: Vec<String>,
    /// JSON report of the global label groups, if one was written.
    pub groups_report: Option<PathBuf>,
}

impl ConversionSummary {
    /// Sum of the per-scan point counts.
    pub fn scan_points(&self) -> usize {
        self.scans.iter().map(|s| s.points).sum()
    }
}

/// List the scan files of a directory.
///
/// Only regular files are returned; subdirectories are not traversed. With
/// `sort` the files come back in file-name order, otherwise in the
/// platform-dependent listing order.
pub fn find_scan_files(directory: &Path, sort: bool) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(directory)
        .with_context(|| format!("Failed to read scan directory {}", directory.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to list scan directory {}", directory.display()))?
            .path();
        if path.is_file() {
            files.push(path);
        }
    }

    if sort {
        files.sort();
    }

    Ok(files)
}

fn ply_options(output: &OutputConfig) -> PlyOptions {
    PlyOptions {
        encoding: output.encoding,
        class_comments: output.class_comments,
    }
}

/// Canonicalise, encode and write the labels of one point set.
fn write_labeled(
    path: &Path,
    positions: &[[f64; 3]],
    raw_labels: &[String],
    colors: &[[f64; 3]],
    output: &OutputConfig,
) -> Result<LabelEncoding> {
    let labels = encode_raw_labels(raw_labels)?;
    save_point_cloud(
        path,
        positions,
        &labels.encoded.codes,
        colors,
        &labels.encoded.classes,
        ply_options(output),
    )
    .with_context(|| format!("Failed to write point cloud {}", path.display()))?;
    Ok(labels)
}

/// Convert every scan in the input directory and write the merged cloud.
///
/// Writes `<scan_prefix>_<i>.ply` per scan file and the global cloud into the
/// output directory, creating it if needed. Any parse or length error aborts
/// the run.
pub fn convert_directory(config: &PipelineConfig) -> Result<ConversionSummary> {
    let input = &config.input;
    let output = &config.output;

    fs::create_dir_all(&output.directory).with_context(|| {
        format!(
            "Failed to create output directory {}",
            output.directory.display()
        )
    })?;

    let files = find_scan_files(&input.directory, input.sort_files)?;
    if files.is_empty() {
        warn!("No scan files found in {}", input.directory.display());
    }

    let mut accumulator = ScanAccumulator::new();
    let mut scans = Vec::with_capacity(files.len());

    for (index, path) in files.iter().enumerate() {
        let scan = load_scan(path, &input.record_separator)
            .with_context(|| format!("Failed to parse scan {}", path.display()))?;

        if scan.is_empty() {
            warn!("Scan {} contains no positions", path.display());
        }
        if !scan.is_aligned() {
            warn!(
                "Scan {} has {} positions, {} colors and {} labels",
                path.display(),
                scan.positions.len(),
                scan.colors.len(),
                scan.labels.len()
            );
        }

        let out_path = output.scan_path(index);
        let labels = write_labeled(
            &out_path,
            &scan.positions,
            &scan.labels,
            &scan.colors,
            output,
        )?;

        info!(
            "[{}] {} -> {} ({} points, {} classes)",
            index,
            path.display(),
            out_path.display(),
            scan.len(),
            labels.encoded.num_classes()
        );

        accumulator.extend(&scan);
        scans.push(ScanOutput {
            index,
            source: path.clone(),
            output: out_path,
            points: scan.len(),
            classes: labels.encoded.classes,
        });
    }

    let global_path = output.global_path();
    let global = write_labeled(
        &global_path,
        &accumulator.positions,
        &accumulator.labels,
        &accumulator.colors,
        output,
    )?;
    info!(
        "Global cloud -> {} ({} points, {} classes)",
        global_path.display(),
        accumulator.len(),
        global.encoded.num_classes()
    );

    let groups_report = match &output.label_groups_file {
        Some(name) => {
            let path = output.directory.join(name);
            write_json(&path, &global.groups)
                .with_context(|| format!("Failed to write label groups {}", path.display()))?;
            Some(path)
        }
        None => None,
    };

    Ok(ConversionSummary {
        scans,
        global_output: global_path,
        global_points: accumulator.len(),
        global_classes: global.encoded.classes,
        groups_report,
    })
}

/// Convert the input directory, then show the global cloud.
///
/// The viewer call is the last step and may block until the user closes it.
pub fn run(config: &PipelineConfig, viewer: Option<&dyn Viewer>) -> Result<ConversionSummary> {
    let summary = convert_directory(config)?;

    if let Some(viewer) = viewer {
        info!("Opening {}", summary.global_output.display());
        viewer
            .show(&summary.global_output)
            .with_context(|| format!("Failed to view {}", summary.global_output.display()))?;
    }

    Ok(summary)
}

/// Parse all scans and group their labels without writing any cloud.
pub fn inspect_labels(directory: &Path, separator: &str, sort: bool) -> Result<LabelEncoding> {
    let mut accumulator = ScanAccumulator::new();
    for path in find_scan_files(directory, sort)? {
        let scan = load_scan(&path, separator)
            .with_context(|| format!("Failed to parse scan {}", path.display()))?;
        accumulator.extend(&scan);
    }
    encode_raw_labels(&accumulator.labels)
}
