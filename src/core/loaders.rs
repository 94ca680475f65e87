//! Loaders for annotated scan files and labelled PLY point clouds.
//!
//! This module provides parsers for:
//! - Scan annotation files (`KEY=VALUE` records carrying positions, colours or labels)
//! - PLY point clouds written by this crate (ASCII or binary little-endian)

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt};
use log::debug;
use thiserror::Error;

use super::cloud::{LabeledCloud, LabeledPoint};

/// Errors that can occur during file loading.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed token '{token}' in record {record}: expected KEY=VALUE")]
    MalformedRecord { record: usize, token: String },

    #[error("invalid number '{value}' for key {key} in record {record}")]
    InvalidNumber {
        record: usize,
        key: &'static str,
        value: String,
    },

    #[error("Invalid PLY file: {0}")]
    InvalidPly(String),

    #[error("Missing required properties: {0}")]
    MissingProperties(String),
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// A single annotation record. Each record carries exactly one kind of payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    Position([f64; 3]),
    Color([f64; 3]),
    Label(String),
    /// No `X`, `R` or `Label` key present.
    Empty,
}

/// Positions, colours and raw labels collected from one scan file.
///
/// The three sequences are appended independently while parsing. They are
/// paired by index only when the scan is assembled into a cloud.
#[derive(Debug, Clone, Default)]
pub struct Scan {
    pub positions: Vec<[f64; 3]>,
    pub colors: Vec<[f64; 3]>,
    pub labels: Vec<String>,
    /// Source file path.
    pub source_path: Option<PathBuf>,
}

impl Scan {
    /// Creates a new empty scan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of position records, i.e. points of the assembled cloud.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Appends a record to the matching sequence.
    pub fn push(&mut self, record: RawRecord) {
        match record {
            RawRecord::Position(p) => self.positions.push(p),
            RawRecord::Color(c) => self.colors.push(c),
            RawRecord::Label(l) => self.labels.push(l),
            RawRecord::Empty => {}
        }
    }

    /// True when positions, colours and labels have equal lengths.
    pub fn is_aligned(&self) -> bool {
        self.positions.len() == self.colors.len() && self.positions.len() == self.labels.len()
    }
}

fn parse_float(record: usize, key: &'static str, value: &str) -> Result<f64> {
    value.parse().map_err(|_| LoaderError::InvalidNumber {
        record,
        key,
        value: value.to_string(),
    })
}

/// Parse one record of whitespace-separated `KEY=VALUE` tokens.
///
/// Recognised keys are `X`, `Y`, `Z`, `R`, `G`, `B` and `Label`; others are
/// ignored and a repeated key overwrites the earlier value. A record with `X`
/// is a position, otherwise one with `R` is a colour, otherwise one with
/// `Label` is a label. Missing companion coordinates or channels read as 0.0.
///
/// `record` is the 0-based record index, used in error messages.
///
/// # Errors
///
/// Returns [`LoaderError::MalformedRecord`] for a token that is not exactly
/// one key and one value joined by `=`, and [`LoaderError::InvalidNumber`]
/// when a numeric key does not hold a float.
pub fn parse_record(record: usize, text: &str) -> Result<RawRecord> {
    let mut x = None;
    let mut y = None;
    let mut z = None;
    let mut r = None;
    let mut g = None;
    let mut b = None;
    let mut label = None;

    for token in text.split_whitespace() {
        let mut parts = token.split('=');
        let (key, value) = match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(value), None) => (key, value),
            _ => {
                return Err(LoaderError::MalformedRecord {
                    record,
                    token: token.to_string(),
                })
            }
        };

        match key {
            "X" => x = Some(parse_float(record, "X", value)?),
            "Y" => y = Some(parse_float(record, "Y", value)?),
            "Z" => z = Some(parse_float(record, "Z", value)?),
            "R" => r = Some(parse_float(record, "R", value)?),
            "G" => g = Some(parse_float(record, "G", value)?),
            "B" => b = Some(parse_float(record, "B", value)?),
            "Label" => label = Some(value.to_string()),
            _ => {}
        }
    }

    let parsed = if let Some(x) = x {
        RawRecord::Position([x, y.unwrap_or(0.0), z.unwrap_or(0.0)])
    } else if let Some(r) = r {
        RawRecord::Color([r, g.unwrap_or(0.0), b.unwrap_or(0.0)])
    } else if let Some(label) = label {
        RawRecord::Label(label)
    } else {
        RawRecord::Empty
    };

    Ok(parsed)
}

/// Parse the full text of a scan file.
///
/// Records are separated by `separator`, which for exported scans is the
/// literal two-character sequence `\n` rather than a line break.
pub fn parse_scan(text: &str, separator: &str) -> Result<Scan> {
    let mut scan = Scan::new();

    let records: Box<dyn Iterator<Item = &str>> = if separator.is_empty() {
        Box::new(std::iter::once(text))
    } else {
        Box::new(text.split(separator))
    };

    for (idx, record) in records.enumerate() {
        scan.push(parse_record(idx, record)?);
    }

    debug!(
        "parsed scan: {} positions, {} colors, {} labels",
        scan.positions.len(),
        scan.colors.len(),
        scan.labels.len()
    );

    Ok(scan)
}

/// Load and parse one scan annotation file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any record is malformed.
pub fn load_scan<P: AsRef<Path>>(path: P, separator: &str) -> Result<Scan> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let mut scan = parse_scan(&text, separator)?;
    scan.source_path = Some(path.to_path_buf());
    Ok(scan)
}

/// Scalar property types understood by the PLY reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlyScalar {
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Float,
    Double,
}

impl PlyScalar {
    fn from_name(name: &str) -> Option<Self> {
        let scalar = match name {
            "char" | "int8" => PlyScalar::Char,
            "uchar" | "uint8" => PlyScalar::UChar,
            "short" | "int16" => PlyScalar::Short,
            "ushort" | "uint16" => PlyScalar::UShort,
            "int" | "int32" => PlyScalar::Int,
            "uint" | "uint32" => PlyScalar::UInt,
            "float" | "float32" => PlyScalar::Float,
            "double" | "float64" => PlyScalar::Double,
            _ => return None,
        };
        Some(scalar)
    }

    fn read_le<R: Read>(self, reader: &mut R) -> std::io::Result<f64> {
        let value = match self {
            PlyScalar::Char => reader.read_i8()? as f64,
            PlyScalar::UChar => reader.read_u8()? as f64,
            PlyScalar::Short => reader.read_i16::<LittleEndian>()? as f64,
            PlyScalar::UShort => reader.read_u16::<LittleEndian>()? as f64,
            PlyScalar::Int => reader.read_i32::<LittleEndian>()? as f64,
            PlyScalar::UInt => reader.read_u32::<LittleEndian>()? as f64,
            PlyScalar::Float => reader.read_f32::<LittleEndian>()? as f64,
            PlyScalar::Double => reader.read_f64::<LittleEndian>()?,
        };
        Ok(value)
    }
}

/// Parsed PLY header.
#[derive(Debug)]
struct PlyHeader {
    binary: bool,
    num_vertices: usize,
    properties: Vec<(String, PlyScalar)>,
    classes: Vec<(usize, String)>,
}

fn read_header<R: BufRead>(reader: &mut R, path: &Path) -> Result<PlyHeader> {
    let mut line = String::new();

    reader.read_line(&mut line)?;
    if line.trim() != "ply" {
        return Err(LoaderError::InvalidPly(format!(
            "{} is not a PLY file",
            path.display()
        )));
    }

    let mut binary = None;
    let mut num_vertices = None;
    let mut properties = Vec::new();
    let mut classes = Vec::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(LoaderError::InvalidPly("Missing end_header".to_string()));
        }
        let stripped = line.trim_end_matches(['\r', '\n']);

        if let Some(rest) = stripped.strip_prefix("comment label ") {
            let mut parts = rest.splitn(2, ' ');
            let code = parts
                .next()
                .and_then(|c| c.parse::<usize>().ok())
                .ok_or_else(|| LoaderError::InvalidPly(format!("Bad label comment: {stripped}")))?;
            classes.push((code, parts.next().unwrap_or_default().to_string()));
            continue;
        }

        let parts: Vec<&str> = stripped.split_whitespace().collect();
        match parts.as_slice() {
            ["format", "ascii", _] => binary = Some(false),
            ["format", "binary_little_endian", _] => binary = Some(true),
            ["format", other, _] => {
                return Err(LoaderError::InvalidPly(format!(
                    "Unsupported format: {other}"
                )))
            }
            ["element", "vertex", count] => {
                num_vertices = Some(count.parse().map_err(|_| {
                    LoaderError::InvalidPly(format!("Invalid vertex count: {count}"))
                })?);
            }
            ["element", other, ..] => {
                return Err(LoaderError::InvalidPly(format!(
                    "Unsupported element: {other}"
                )))
            }
            ["property", ty, name] => {
                let scalar = PlyScalar::from_name(ty).ok_or_else(|| {
                    LoaderError::InvalidPly(format!("Unsupported property type: {ty}"))
                })?;
                properties.push((name.to_string(), scalar));
            }
            ["end_header"] => break,
            _ => {}
        }
    }

    Ok(PlyHeader {
        binary: binary.ok_or_else(|| LoaderError::InvalidPly("No format line".to_string()))?,
        num_vertices: num_vertices
            .ok_or_else(|| LoaderError::InvalidPly("No vertex count in header".to_string()))?,
        properties,
        classes,
    })
}

/// Property positions of the fields a `LabeledPoint` is built from.
struct VertexLayout {
    x: usize,
    y: usize,
    z: usize,
    label: Option<usize>,
    rgb: Option<(usize, usize, usize)>,
    width: usize,
}

impl VertexLayout {
    fn from_properties(properties: &[(String, PlyScalar)]) -> Result<Self> {
        let prop_idx: HashMap<&str, usize> = properties
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.as_str(), i))
            .collect();

        let missing: Vec<&str> = ["x", "y", "z"]
            .into_iter()
            .filter(|name| !prop_idx.contains_key(name))
            .collect();
        if !missing.is_empty() {
            return Err(LoaderError::MissingProperties(missing.join(", ")));
        }

        let rgb = match (
            prop_idx.get("red"),
            prop_idx.get("green"),
            prop_idx.get("blue"),
        ) {
            (Some(&r), Some(&g), Some(&b)) => Some((r, g, b)),
            _ => None,
        };

        Ok(Self {
            x: prop_idx["x"],
            y: prop_idx["y"],
            z: prop_idx["z"],
            label: prop_idx.get("label").copied(),
            rgb,
            width: properties.len(),
        })
    }

    fn point(&self, values: &[f64]) -> LabeledPoint {
        let [red, green, blue] = self
            .rgb
            .map(|(r, g, b)| [values[r] as u8, values[g] as u8, values[b] as u8])
            .unwrap_or([180, 180, 180]);

        LabeledPoint {
            x: values[self.x] as f32,
            y: values[self.y] as f32,
            z: values[self.z] as f32,
            label: self.label.map_or(0, |i| values[i] as i32),
            red,
            green,
            blue,
        }
    }
}

/// Upper bound on vertices reserved up front; the header count is untrusted.
const MAX_PREALLOCATED_VERTICES: usize = 1 << 20;

fn short_read(expected: usize, found: usize) -> LoaderError {
    LoaderError::InvalidPly(format!("Expected {expected} vertices, found {found}"))
}

fn read_ascii_vertices<R: BufRead>(
    reader: R,
    header: &PlyHeader,
    layout: &VertexLayout,
) -> Result<Vec<LabeledPoint>> {
    let mut points = Vec::with_capacity(header.num_vertices.min(MAX_PREALLOCATED_VERTICES));
    let mut values = vec![0.0f64; layout.width];
    let mut lines = reader.lines();

    for vertex in 0..header.num_vertices {
        let line = lines
            .next()
            .transpose()?
            .ok_or_else(|| short_read(header.num_vertices, vertex))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < layout.width {
            return Err(LoaderError::InvalidPly(format!(
                "Vertex {vertex} has {} values, expected {}",
                tokens.len(),
                layout.width
            )));
        }

        for (slot, token) in values.iter_mut().zip(&tokens) {
            *slot = token.parse().map_err(|_| {
                LoaderError::InvalidPly(format!("Invalid value '{token}' in vertex {vertex}"))
            })?;
        }
        points.push(layout.point(&values));
    }

    Ok(points)
}

fn read_binary_vertices<R: Read>(
    reader: &mut R,
    header: &PlyHeader,
    layout: &VertexLayout,
) -> Result<Vec<LabeledPoint>> {
    let mut points = Vec::with_capacity(header.num_vertices.min(MAX_PREALLOCATED_VERTICES));
    let mut values = vec![0.0f64; layout.width];

    for vertex in 0..header.num_vertices {
        for (slot, (_, scalar)) in values.iter_mut().zip(&header.properties) {
            *slot = scalar.read_le(reader).map_err(|e| {
                if e.kind() == std::io::ErrorKind::UnexpectedEof {
                    short_read(header.num_vertices, vertex)
                } else {
                    LoaderError::Io(e)
                }
            })?;
        }
        points.push(layout.point(&values));
    }

    Ok(points)
}

/// Load a labelled point cloud from a PLY file.
///
/// Supports ASCII and binary little-endian files with one `vertex` element:
/// - Required: x, y, z properties
/// - Optional: label (defaults to 0) and red, green, blue (default gray)
///
/// Class names are read back from `comment label <code> <name>` header lines.
///
/// # Errors
///
/// Returns an error if the file is not a supported PLY, lacks coordinates, or
/// holds fewer vertices than its header announces.
pub fn load_ply<P: AsRef<Path>>(path: P) -> Result<LabeledCloud> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let header = read_header(&mut reader, path)?;

    let layout = VertexLayout::from_properties(&header.properties)?;
    let points = if header.binary {
        read_binary_vertices(&mut reader, &header, &layout)?
    } else {
        read_ascii_vertices(reader, &header, &layout)?
    };

    let mut class_entries = header.classes;
    class_entries.sort_by_key(|(code, _)| *code);
    let classes = class_entries.into_iter().map(|(_, name)| name).collect();

    Ok(LabeledCloud { points, classes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_record_kinds() -> Result<()> {
        assert_eq!(
            parse_record(0, "X=1.5 Y=-2 Z=3e2")?,
            RawRecord::Position([1.5, -2.0, 300.0])
        );
        assert_eq!(
            parse_record(1, "R=0.5 G=0.25 B=1")?,
            RawRecord::Color([0.5, 0.25, 1.0])
        );
        assert_eq!(
            parse_record(2, "Label=Scan_CameraBase01")?,
            RawRecord::Label("Scan_CameraBase01".to_string())
        );
        assert_eq!(parse_record(3, "")?, RawRecord::Empty);
        assert_eq!(parse_record(4, "Foo=bar")?, RawRecord::Empty);
        Ok(())
    }

    #[test]
    fn test_parse_record_position_wins_over_color_and_label() -> Result<()> {
        let record = parse_record(0, "Label=a R=1 G=1 B=1 X=1 Y=2 Z=3")?;
        assert_eq!(record, RawRecord::Position([1.0, 2.0, 3.0]));
        Ok(())
    }

    #[test]
    fn test_parse_record_partial_and_duplicate_keys() -> Result<()> {
        assert_eq!(parse_record(0, "X=4")?, RawRecord::Position([4.0, 0.0, 0.0]));
        assert_eq!(
            parse_record(0, "R=0.1 R=0.9 G=0 B=0")?,
            RawRecord::Color([0.9, 0.0, 0.0])
        );
        Ok(())
    }

    #[test]
    fn test_parse_record_malformed_token() {
        let err = parse_record(7, "X=1 Y2 Z=3").unwrap_err();
        match err {
            LoaderError::MalformedRecord { record, token } => {
                assert_eq!(record, 7);
                assert_eq!(token, "Y2");
            }
            other => panic!("Expected MalformedRecord, got {other:?}"),
        }

        assert!(matches!(
            parse_record(0, "Label=a=b"),
            Err(LoaderError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_parse_record_invalid_number() {
        let err = parse_record(2, "X=abc").unwrap_err();
        assert!(matches!(
            err,
            LoaderError::InvalidNumber { record: 2, key: "X", .. }
        ));
    }

    #[test]
    fn test_parse_scan_splits_on_literal_backslash_n() -> Result<()> {
        let text = "X=1 Y=2 Z=3\\nR=1 G=0 B=0\\nLabel=Cam_A\\nX=4 Y=5 Z=6\\nR=0 G=1 B=0\\nLabel=Cam_B\\n";
        let scan = parse_scan(text, "\\n")?;

        assert_eq!(scan.positions, vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(scan.colors, vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        assert_eq!(scan.labels, vec!["Cam_A", "Cam_B"]);
        assert!(scan.is_aligned());
        Ok(())
    }

    #[test]
    fn test_parse_scan_unaligned_sequences() -> Result<()> {
        let scan = parse_scan("X=1 Y=1 Z=1\\nX=2 Y=2 Z=2\\nR=0 G=0 B=0\\nLabel=A", "\\n")?;
        assert_eq!(scan.len(), 2);
        assert_eq!(scan.colors.len(), 1);
        assert!(!scan.is_aligned());
        Ok(())
    }

    #[test]
    fn test_parse_scan_real_line_breaks_stay_inside_one_record() -> Result<()> {
        // A real newline is only whitespace when the separator is `\n` literal.
        let scan = parse_scan("X=1 Y=1 Z=1\nX=2 Y=2 Z=2", "\\n")?;
        assert_eq!(scan.positions, vec![[2.0, 2.0, 2.0]]);

        let scan = parse_scan("X=1 Y=1 Z=1\nX=2 Y=2 Z=2", "\n")?;
        assert_eq!(scan.len(), 2);
        Ok(())
    }

    #[test]
    fn test_load_scan_records_source_path() -> Result<()> {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "X=0 Y=0 Z=0\\nR=0 G=0 B=0\\nLabel=Floor").unwrap();
        file.flush().unwrap();

        let scan = load_scan(file.path(), "\\n")?;
        assert_eq!(scan.len(), 1);
        assert_eq!(scan.labels, vec!["Floor"]);
        assert_eq!(scan.source_path.as_deref(), Some(file.path()));
        Ok(())
    }

    #[test]
    fn test_load_ascii_ply() -> Result<()> {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "ply").unwrap();
        writeln!(file, "format ascii 1.0").unwrap();
        writeln!(file, "comment label 1 Wall").unwrap();
        writeln!(file, "comment label 0 Camera").unwrap();
        writeln!(file, "element vertex 2").unwrap();
        writeln!(file, "property float x").unwrap();
        writeln!(file, "property float y").unwrap();
        writeln!(file, "property float z").unwrap();
        writeln!(file, "property int label").unwrap();
        writeln!(file, "property uchar red").unwrap();
        writeln!(file, "property uchar green").unwrap();
        writeln!(file, "property uchar blue").unwrap();
        writeln!(file, "end_header").unwrap();
        writeln!(file, "1.0 2.0 3.0 0 255 0 0").unwrap();
        writeln!(file, "4.0 5.0 6.0 1 0 255 0").unwrap();
        file.flush().unwrap();

        let cloud = load_ply(file.path())?;
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.points[0].x, 1.0);
        assert_eq!(cloud.points[1].y, 5.0);
        assert_eq!(cloud.points[1].label, 1);
        assert_eq!(cloud.points[0].color(), [255, 0, 0]);
        assert_eq!(cloud.classes, vec!["Camera", "Wall"]);
        Ok(())
    }

    #[test]
    fn test_load_ply_without_labels_or_colors() -> Result<()> {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "ply").unwrap();
        writeln!(file, "format ascii 1.0").unwrap();
        writeln!(file, "element vertex 1").unwrap();
        writeln!(file, "property float x").unwrap();
        writeln!(file, "property float y").unwrap();
        writeln!(file, "property float z").unwrap();
        writeln!(file, "end_header").unwrap();
        writeln!(file, "1 2 3").unwrap();
        file.flush().unwrap();

        let cloud = load_ply(file.path())?;
        assert_eq!(cloud.points[0].label, 0);
        assert_eq!(cloud.points[0].color(), [180, 180, 180]);
        assert!(cloud.classes.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_ply_truncated() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "ply").unwrap();
        writeln!(file, "format ascii 1.0").unwrap();
        writeln!(file, "element vertex 3").unwrap();
        writeln!(file, "property float x").unwrap();
        writeln!(file, "property float y").unwrap();
        writeln!(file, "property float z").unwrap();
        writeln!(file, "end_header").unwrap();
        writeln!(file, "1 2 3").unwrap();
        file.flush().unwrap();

        assert!(matches!(
            load_ply(file.path()),
            Err(LoaderError::InvalidPly(_))
        ));
    }

    #[test]
    fn test_load_ply_oversized_vertex_count() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "ply").unwrap();
        writeln!(file, "format ascii 1.0").unwrap();
        writeln!(file, "element vertex {}", usize::MAX).unwrap();
        writeln!(file, "property float x").unwrap();
        writeln!(file, "property float y").unwrap();
        writeln!(file, "property float z").unwrap();
        writeln!(file, "end_header").unwrap();
        writeln!(file, "1 2 3").unwrap();
        file.flush().unwrap();

        assert!(matches!(
            load_ply(file.path()),
            Err(LoaderError::InvalidPly(_))
        ));
    }

    #[test]
    fn test_load_binary_ply_oversized_vertex_count() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "ply").unwrap();
        writeln!(file, "format binary_little_endian 1.0").unwrap();
        writeln!(file, "element vertex {}", usize::MAX).unwrap();
        writeln!(file, "property float x").unwrap();
        writeln!(file, "property float y").unwrap();
        writeln!(file, "property float z").unwrap();
        writeln!(file, "end_header").unwrap();
        file.write_all(&[0u8; 12]).unwrap();
        file.flush().unwrap();

        assert!(matches!(
            load_ply(file.path()),
            Err(LoaderError::InvalidPly(_))
        ));
    }

    #[test]
    fn test_load_ply_missing_coordinates() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "ply").unwrap();
        writeln!(file, "format ascii 1.0").unwrap();
        writeln!(file, "element vertex 0").unwrap();
        writeln!(file, "property float x").unwrap();
        writeln!(file, "end_header").unwrap();
        file.flush().unwrap();

        match load_ply(file.path()) {
            Err(LoaderError::MissingProperties(names)) => assert_eq!(names, "y, z"),
            other => panic!("Expected MissingProperties, got {other:?}"),
        }
    }

    #[test]
    fn test_load_ply_rejects_non_ply() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "x,y,z").unwrap();
        file.flush().unwrap();

        assert!(matches!(
            load_ply(file.path()),
            Err(LoaderError::InvalidPly(_))
        ));
    }
}
