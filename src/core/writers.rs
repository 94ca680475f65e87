//! Data writers for labelled PLY clouds and JSON reports.
//!
//! This module provides functions for writing point cloud data:
//! - PLY with one `vertex` element (x, y, z, label, red, green, blue), binary
//!   little-endian or ASCII
//! - Pretty-printed JSON for diagnostic reports such as label groups

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use log::debug;
use serde::Serialize;
use thiserror::Error;

use super::cloud::{assemble, AssembleError, LabeledCloud};
use crate::config::PlyEncoding;

/// Errors that can occur during write operations.
#[derive(Error, Debug)]
pub enum WriteError {
    /// Failed to create parent directories.
    #[error("failed to create parent directories for '{path}': {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or open file for writing.
    #[error("failed to create file '{path}': {source}")]
    CreateFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write data to file.
    #[error("failed to write to file '{path}': {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error.
    #[error("JSON write error for '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Inputs could not be assembled into a cloud.
    #[error(transparent)]
    Assemble(#[from] AssembleError),
}

/// Result type for write operations.
pub type Result<T> = std::result::Result<T, WriteError>;

/// Layout options for written PLY files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlyOptions {
    pub encoding: PlyEncoding,
    /// Emit `comment label <code> <name>` header lines for the cloud's classes.
    pub class_comments: bool,
}

impl Default for PlyOptions {
    fn default() -> Self {
        Self {
            encoding: PlyEncoding::BinaryLittleEndian,
            class_comments: true,
        }
    }
}

/// Creates parent directories for a file path if they don't exist.
fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| WriteError::CreateDirectory {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Creates a buffered writer for the given path.
fn create_buffered_writer(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| WriteError::CreateFile {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(BufWriter::new(file))
}

fn write_header<W: Write>(
    writer: &mut W,
    cloud: &LabeledCloud,
    options: PlyOptions,
) -> std::io::Result<()> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format {} 1.0", options.encoding.header_keyword())?;
    if options.class_comments {
        for (code, name) in cloud.classes.iter().enumerate() {
            writeln!(writer, "comment label {} {}", code, name)?;
        }
    }
    writeln!(writer, "element vertex {}", cloud.len())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "property int label")?;
    writeln!(writer, "property uchar red")?;
    writeln!(writer, "property uchar green")?;
    writeln!(writer, "property uchar blue")?;
    writeln!(writer, "end_header")
}

fn write_vertices<W: Write>(
    writer: &mut W,
    cloud: &LabeledCloud,
    encoding: PlyEncoding,
) -> std::io::Result<()> {
    match encoding {
        PlyEncoding::BinaryLittleEndian => {
            for p in &cloud.points {
                writer.write_f32::<LittleEndian>(p.x)?;
                writer.write_f32::<LittleEndian>(p.y)?;
                writer.write_f32::<LittleEndian>(p.z)?;
                writer.write_i32::<LittleEndian>(p.label)?;
                writer.write_u8(p.red)?;
                writer.write_u8(p.green)?;
                writer.write_u8(p.blue)?;
            }
        }
        PlyEncoding::Ascii => {
            for p in &cloud.points {
                writeln!(
                    writer,
                    "{:.6} {:.6} {:.6} {} {} {} {}",
                    p.x, p.y, p.z, p.label, p.red, p.green, p.blue
                )?;
            }
        }
    }
    Ok(())
}

/// Write a labelled point cloud to a PLY file.
///
/// The file holds a single `vertex` element with the properties
/// `float x, float y, float z, int label, uchar red, uchar green, uchar blue`
/// in that order.
///
/// # Arguments
///
/// * `path` - Output file path (parent directories will be created if needed)
/// * `cloud` - Labelled points and their class names
/// * `options` - Payload encoding and whether to record class names
///
/// # Errors
///
/// Returns an error if:
/// - Parent directories cannot be created
/// - File cannot be created or written to
///
/// # Example
///
/// ```no_run
/// use scan_label_pipeline::core::cloud::LabeledCloud;
/// use scan_label_pipeline::core::writers::{write_ply, PlyOptions};
/// use std::path::Path;
///
/// let cloud = LabeledCloud::default();
/// write_ply(Path::new("output.ply"), &cloud, PlyOptions::default()).unwrap();
/// ```
pub fn write_ply(path: &Path, cloud: &LabeledCloud, options: PlyOptions) -> Result<()> {
    ensure_parent_dirs(path)?;
    let mut writer = create_buffered_writer(path)?;

    let write_err = |source: std::io::Error| WriteError::WriteFile {
        path: path.display().to_string(),
        source,
    };

    write_header(&mut writer, cloud, options).map_err(write_err)?;
    write_vertices(&mut writer, cloud, options.encoding).map_err(write_err)?;
    writer.flush().map_err(write_err)?;

    debug!("wrote {} points to {}", cloud.len(), path.display());
    Ok(())
}

/// Assemble positions, label codes and colours and write them as a PLY file.
///
/// `classes[code]` names each label code and is recorded in the header when
/// `options.class_comments` is set.
///
/// # Errors
///
/// Returns [`WriteError::Assemble`] without touching the file system when the
/// three inputs differ in length, otherwise any error of [`write_ply`].
pub fn save_point_cloud(
    path: &Path,
    positions: &[[f64; 3]],
    labels: &[i32],
    colors: &[[f64; 3]],
    classes: &[String],
    options: PlyOptions,
) -> Result<LabeledCloud> {
    let cloud = assemble(positions, labels, colors)?.with_classes(classes.to_vec());
    write_ply(path, &cloud, options)?;
    Ok(cloud)
}

/// Write any serializable value as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be created or serialization fails.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dirs(path)?;
    let mut writer = create_buffered_writer(path)?;

    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| WriteError::Json {
        path: path.display().to_string(),
        source: e,
    })?;

    writer.flush().map_err(|e| WriteError::WriteFile {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
