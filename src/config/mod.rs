//! Configuration types for the scan label pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for reading annotated scan files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory holding one annotation file per scan
    #[serde(default = "default_input_dir")]
    pub directory: PathBuf,

    /// Token separating records inside a scan file. The exporter escapes line
    /// breaks, so the default is the two characters `\` and `n`.
    #[serde(default = "default_record_separator")]
    pub record_separator: String,

    /// Process scan files in file-name order instead of directory listing order
    #[serde(default = "default_sort_files")]
    pub sort_files: bool,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("CameraMatrix")
}

fn default_record_separator() -> String {
    "\\n".to_string()
}

fn default_sort_files() -> bool {
    true
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            directory: default_input_dir(),
            record_separator: default_record_separator(),
            sort_files: default_sort_files(),
        }
    }
}

/// Byte layout of the vertex payload in written PLY files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlyEncoding {
    /// `format binary_little_endian 1.0`
    #[default]
    BinaryLittleEndian,
    /// `format ascii 1.0`
    Ascii,
}

impl PlyEncoding {
    /// Format keyword used on the PLY `format` header line.
    pub fn header_keyword(self) -> &'static str {
        match self {
            PlyEncoding::BinaryLittleEndian => "binary_little_endian",
            PlyEncoding::Ascii => "ascii",
        }
    }
}

/// Configuration for the generated point clouds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving all output files (created if absent)
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// File name prefix for per-scan clouds, followed by `_<index>.ply`
    #[serde(default = "default_scan_prefix")]
    pub scan_prefix: String,

    /// File name of the merged cloud
    #[serde(default = "default_global_name")]
    pub global_name: String,

    #[serde(default)]
    pub encoding: PlyEncoding,

    /// Write one `comment label <code> <name>` header line per class
    #[serde(default = "default_class_comments")]
    pub class_comments: bool,

    /// JSON report of the global label groups, written next to the clouds
    #[serde(default = "default_label_groups_file")]
    pub label_groups_file: Option<String>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("CameraMatrixOutput")
}

fn default_scan_prefix() -> String {
    "pointcloud".to_string()
}

fn default_global_name() -> String {
    "global.ply".to_string()
}

fn default_class_comments() -> bool {
    true
}

fn default_label_groups_file() -> Option<String> {
    Some("groups.json".to_string())
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            scan_prefix: default_scan_prefix(),
            global_name: default_global_name(),
            encoding: PlyEncoding::default(),
            class_comments: default_class_comments(),
            label_groups_file: default_label_groups_file(),
        }
    }
}

impl OutputConfig {
    /// Path of the per-scan cloud with the given processing index.
    pub fn scan_path(&self, index: usize) -> PathBuf {
        self.directory
            .join(format!("{}_{}.ply", self.scan_prefix, index))
    }

    /// Path of the merged cloud.
    pub fn global_path(&self) -> PathBuf {
        self.directory.join(&self.global_name)
    }
}

/// How the merged cloud is displayed at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerMode {
    /// Render a scatter plot PNG next to the cloud
    #[default]
    Plot,
    /// Launch an external program and wait until it exits
    Command,
    /// Skip viewing
    None,
}

/// Point colouring used by the plot viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorBy {
    /// RGB values stored in the cloud
    #[default]
    Stored,
    /// Fixed palette indexed by label code
    Label,
}

/// Configuration for the viewer collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Viewer kind. When unset, `command` is used if `program` is given and
    /// `plot` otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ViewerMode>,

    /// Program launched in `command` mode; the PLY path is appended to `args`
    #[serde(default)]
    pub program: Option<String>,

    #[serde(default)]
    pub args: Vec<String>,

    /// PNG file name written by the plot viewer, next to the viewed cloud
    #[serde(default = "default_image_name")]
    pub image_name: String,

    /// Maximum points to plot
    #[serde(default = "default_viewer_max_points")]
    pub max_points: usize,

    /// Point alpha for the plot viewer (0.0 to 1.0)
    #[serde(default = "default_alpha")]
    pub alpha: f32,

    #[serde(default)]
    pub color_by: ColorBy,
}

fn default_image_name() -> String {
    "global.png".to_string()
}

fn default_viewer_max_points() -> usize {
    1_000_000
}

fn default_alpha() -> f32 {
    0.5
}

impl ViewerConfig {
    /// The mode in effect after applying the `program` fallback.
    pub fn effective_mode(&self) -> ViewerMode {
        match (self.mode, &self.program) {
            (Some(mode), _) => mode,
            (None, Some(_)) => ViewerMode::Command,
            (None, None) => ViewerMode::default(),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            mode: None,
            program: None,
            args: Vec::new(),
            image_name: default_image_name(),
            max_points: default_viewer_max_points(),
            alpha: default_alpha(),
            color_by: ColorBy::default(),
        }
    }
}

/// Main pipeline configuration combining all sub-configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub viewer: ViewerConfig,
}

impl PipelineConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
