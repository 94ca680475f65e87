//! Viewers for the generated point clouds.
//!
//! The pipeline hands the global PLY file to a [`Viewer`] as its final step.
//! [`PlotViewer`] renders a top-down scatter plot (x vs y) to PNG with
//! plotters; [`CommandViewer`] opens the file in an external program and waits
//! for it to exit.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use log::{debug, info};
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use thiserror::Error;

use crate::config::{ColorBy, PipelineConfig, ViewerMode};
use crate::core::cloud::{LabeledCloud, LabeledPoint};
use crate::core::loaders::{load_ply, LoaderError};

/// Errors that can occur while viewing a point cloud.
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("failed to load point cloud: {0}")]
    Load(#[from] LoaderError),

    #[error("Plotting error: {0}")]
    PlottingError(String),

    #[error("Empty point cloud")]
    EmptyPointCloud,

    #[error("viewer mode 'command' requires viewer.program to be set")]
    MissingProgram,

    #[error("failed to start viewer '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("viewer '{program}' exited with {status}")]
    CommandFailed { program: String, status: ExitStatus },
}

/// Result type for viewer operations.
pub type Result<T> = std::result::Result<T, ViewerError>;

/// Something that can present a PLY file to the user.
pub trait Viewer {
    /// Show the point cloud stored at `ply_path`. May block.
    fn show(&self, ply_path: &Path) -> Result<()>;
}

/// Default plot width in pixels.
const DEFAULT_WIDTH: u32 = 1920;

/// Default plot height in pixels.
const DEFAULT_HEIGHT: u32 = 1080;

/// Color palette for label visualization.
const LABEL_COLORS: &[(u8, u8, u8)] = &[
    (228, 26, 28),   // Red
    (55, 126, 184),  // Blue
    (77, 175, 74),   // Green
    (152, 78, 163),  // Purple
    (255, 127, 0),   // Orange
    (255, 255, 51),  // Yellow
    (166, 86, 40),   // Brown
    (247, 129, 191), // Pink
    (153, 153, 153), // Gray
    (0, 206, 209),   // Turquoise
    (138, 43, 226),  // Blue Violet
    (50, 205, 50),   // Lime Green
    (255, 20, 147),  // Deep Pink
    (0, 191, 255),   // Deep Sky Blue
    (255, 215, 0),   // Gold
];

/// Color for negative label codes.
const UNLABELED_COLOR: (u8, u8, u8) = (128, 128, 128);

/// Palette color of a label code.
pub fn label_color(label: i32) -> (u8, u8, u8) {
    if label < 0 {
        UNLABELED_COLOR
    } else {
        LABEL_COLORS[label as usize % LABEL_COLORS.len()]
    }
}

/// One legend entry: label code, class name and palette color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub label: i32,
    /// Class name from the PLY header, or the code itself when unnamed.
    pub name: String,
    pub color: (u8, u8, u8),
}

/// Legend of the label codes present in a cloud, in code order.
pub fn label_legend(cloud: &LabeledCloud) -> Vec<LegendEntry> {
    let mut codes: Vec<i32> = cloud.points.iter().map(|p| p.label).collect();
    codes.sort_unstable();
    codes.dedup();

    codes
        .into_iter()
        .map(|label| LegendEntry {
            label,
            name: cloud
                .class_name(label)
                .map_or_else(|| label.to_string(), str::to_string),
            color: label_color(label),
        })
        .collect()
}

fn point_color(point: &LabeledPoint, color_by: ColorBy, alpha: f64) -> RGBAColor {
    match color_by {
        ColorBy::Stored => RGBAColor(point.red, point.green, point.blue, alpha),
        ColorBy::Label => {
            let (r, g, b) = label_color(point.label);
            RGBAColor(r, g, b, alpha)
        }
    }
}

/// Project the cloud onto the xy plane, keeping at most about `max_points`.
fn select_points(
    cloud: &LabeledCloud,
    max_points: usize,
    alpha: f32,
    color_by: ColorBy,
) -> Vec<(f32, f32, RGBAColor)> {
    let n = cloud.len();
    let max_points = max_points.max(1);

    // Compute subsampling step
    let step = if n > max_points { n / max_points } else { 1 };
    let alpha = alpha.clamp(0.0, 1.0) as f64;

    cloud
        .points
        .iter()
        .step_by(step)
        .map(|p| (p.x, p.y, point_color(p, color_by, alpha)))
        .collect()
}

/// Plot a 2D scatter plot (x vs y) of a labelled cloud and save as PNG.
///
/// # Arguments
///
/// * `output_path` - Path to save the PNG image
/// * `cloud` - The point cloud to visualize
/// * `max_points` - Maximum number of points to plot (subsamples if exceeded)
/// * `alpha` - Alpha/transparency value for points (0.0 to 1.0)
/// * `color_by` - Use the stored RGB or the label palette
pub fn plot_cloud(
    output_path: &Path,
    cloud: &LabeledCloud,
    max_points: usize,
    alpha: f32,
    color_by: ColorBy,
) -> Result<()> {
    if cloud.is_empty() {
        return Err(ViewerError::EmptyPointCloud);
    }

    let points = select_points(cloud, max_points, alpha, color_by);
    debug!("Plotting {} of {} points", points.len(), cloud.len());
    if color_by == ColorBy::Label {
        for entry in label_legend(cloud) {
            info!(
                "label {} '{}' -> rgb{:?}",
                entry.label, entry.name, entry.color
            );
        }
    }

    // Compute bounds with padding
    let (x_min, x_max, y_min, y_max) = compute_bounds(&points);
    let x_padding = (x_max - x_min) * 0.05;
    let y_padding = (y_max - y_min) * 0.05;

    let root = BitMapBackend::new(output_path, (DEFAULT_WIDTH, DEFAULT_HEIGHT))
        .into_drawing_area();

    root.fill(&WHITE)
        .map_err(|e| ViewerError::PlottingError(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .build_cartesian_2d(
            (x_min - x_padding)..(x_max + x_padding),
            (y_min - y_padding)..(y_max + y_padding),
        )
        .map_err(|e| ViewerError::PlottingError(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .draw()
        .map_err(|e| ViewerError::PlottingError(e.to_string()))?;

    chart
        .draw_series(
            points
                .iter()
                .map(|(x, y, color)| Circle::new((*x, *y), 2, color.filled())),
        )
        .map_err(|e| ViewerError::PlottingError(e.to_string()))?;

    root.present()
        .map_err(|e| ViewerError::PlottingError(e.to_string()))?;

    Ok(())
}

/// Compute the bounds (min/max) for x and y coordinates.
fn compute_bounds(points: &[(f32, f32, RGBAColor)]) -> (f32, f32, f32, f32) {
    let mut x_min = f32::MAX;
    let mut x_max = f32::MIN;
    let mut y_min = f32::MAX;
    let mut y_max = f32::MIN;

    for (x, y, _) in points {
        x_min = x_min.min(*x);
        x_max = x_max.max(*x);
        y_min = y_min.min(*y);
        y_max = y_max.max(*y);
    }

    if (x_max - x_min).abs() < f32::EPSILON {
        x_min -= 1.0;
        x_max += 1.0;
    }
    if (y_max - y_min).abs() < f32::EPSILON {
        y_min -= 1.0;
        y_max += 1.0;
    }

    (x_min, x_max, y_min, y_max)
}

/// Renders the cloud to a PNG scatter plot.
#[derive(Debug, Clone)]
pub struct PlotViewer {
    /// Image path; defaults to the PLY path with a `.png` extension.
    pub image_path: Option<PathBuf>,
    pub max_points: usize,
    pub alpha: f32,
    pub color_by: ColorBy,
}

impl PlotViewer {
    /// Output image for a given PLY file.
    pub fn image_for(&self, ply_path: &Path) -> PathBuf {
        self.image_path
            .clone()
            .unwrap_or_else(|| ply_path.with_extension("png"))
    }
}

impl Viewer for PlotViewer {
    fn show(&self, ply_path: &Path) -> Result<()> {
        let cloud = load_ply(ply_path)?;
        let image = self.image_for(ply_path);
        plot_cloud(&image, &cloud, self.max_points, self.alpha, self.color_by)?;
        info!("Wrote plot of {} to {}", ply_path.display(), image.display());
        Ok(())
    }
}

/// Opens the cloud in an external program and waits for it to exit.
#[derive(Debug, Clone)]
pub struct CommandViewer {
    pub program: String,
    /// Arguments passed before the PLY path.
    pub args: Vec<String>,
}

impl Viewer for CommandViewer {
    fn show(&self, ply_path: &Path) -> Result<()> {
        debug!("Running {} {:?} {}", self.program, self.args, ply_path.display());

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(ply_path)
            .status()
            .map_err(|source| ViewerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(ViewerError::CommandFailed {
                program: self.program.clone(),
                status,
            });
        }
        Ok(())
    }
}

/// Build the viewer selected by the configuration, `None` when viewing is off.
pub fn viewer_from_config(config: &PipelineConfig) -> Result<Option<Box<dyn Viewer>>> {
    let viewer = &config.viewer;
    match viewer.effective_mode() {
        ViewerMode::None => Ok(None),
        ViewerMode::Plot => Ok(Some(Box::new(PlotViewer {
            image_path: Some(config.output.directory.join(&viewer.image_name)),
            max_points: viewer.max_points,
            alpha: viewer.alpha,
            color_by: viewer.color_by,
        }))),
        ViewerMode::Command => {
            let program = viewer.program.clone().ok_or(ViewerError::MissingProgram)?;
            Ok(Some(Box::new(CommandViewer {
                program,
                args: viewer.args.clone(),
            })))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f32, y: f32, label: i32, rgb: [u8; 3]) -> LabeledPoint {
        LabeledPoint {
            x,
            y,
            z: 0.0,
            label,
            red: rgb[0],
            green: rgb[1],
            blue: rgb[2],
        }
    }

    fn cloud(n: usize) -> LabeledCloud {
        let mut cloud = LabeledCloud::new();
        for i in 0..n {
            cloud
                .points
                .push(point(i as f32, (2 * i) as f32, i as i32, [10, 20, 30]));
        }
        cloud
    }

    #[test]
    fn test_label_color_wraps_palette() {
        assert_eq!(label_color(0), LABEL_COLORS[0]);
        assert_eq!(label_color(LABEL_COLORS.len() as i32 + 1), LABEL_COLORS[1]);
        assert_eq!(label_color(-1), UNLABELED_COLOR);
    }

    #[test]
    fn test_label_legend_names_present_codes() {
        let mut cloud = LabeledCloud::new().with_classes(vec![
            "Camera".to_string(),
            "Floor".to_string(),
        ]);
        for label in [1, 0, 1, 7] {
            cloud.points.push(point(0.0, 0.0, label, [0, 0, 0]));
        }

        let legend = label_legend(&cloud);

        let names: Vec<(i32, &str)> = legend
            .iter()
            .map(|e| (e.label, e.name.as_str()))
            .collect();
        assert_eq!(names, vec![(0, "Camera"), (1, "Floor"), (7, "7")]);
        assert_eq!(legend[1].color, LABEL_COLORS[1]);
    }

    #[test]
    fn test_select_points_subsamples() {
        let points = select_points(&cloud(100), 10, 0.5, ColorBy::Stored);
        assert_eq!(points.len(), 10);
        assert_eq!((points[1].0, points[1].1), (10.0, 20.0));

        let all = select_points(&cloud(5), 10, 0.5, ColorBy::Stored);
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn test_select_points_colors() {
        let c = cloud(2);

        let stored = select_points(&c, 10, 2.0, ColorBy::Stored);
        let RGBAColor(r, g, b, a) = stored[1].2;
        assert_eq!((r, g, b), (10, 20, 30));
        assert_eq!(a, 1.0);

        let by_label = select_points(&c, 10, 0.5, ColorBy::Label);
        let RGBAColor(r, g, b, _) = by_label[1].2;
        assert_eq!((r, g, b), LABEL_COLORS[1]);
    }

    #[test]
    fn test_compute_bounds_widens_degenerate_axes() {
        let black = RGBAColor(0, 0, 0, 1.0);
        let bounds = compute_bounds(&[(1.0, 5.0, black), (3.0, 5.0, black)]);
        assert_eq!(bounds, (1.0, 3.0, 4.0, 6.0));
    }

    #[test]
    fn test_plot_rejects_empty_cloud() {
        let dir = tempfile::tempdir().unwrap();
        let result = plot_cloud(
            &dir.path().join("empty.png"),
            &LabeledCloud::new(),
            10,
            0.5,
            ColorBy::Stored,
        );
        assert!(matches!(result, Err(ViewerError::EmptyPointCloud)));
    }

    #[test]
    fn test_plot_viewer_image_path() {
        let viewer = PlotViewer {
            image_path: None,
            max_points: 10,
            alpha: 0.5,
            color_by: ColorBy::Stored,
        };
        assert_eq!(
            viewer.image_for(Path::new("out/global.ply")),
            PathBuf::from("out/global.png")
        );
    }

    #[test]
    fn test_viewer_from_config_modes() {
        let mut config = PipelineConfig::default();
        assert!(viewer_from_config(&config).unwrap().is_some());

        config.viewer.mode = Some(ViewerMode::None);
        assert!(viewer_from_config(&config).unwrap().is_none());

        config.viewer.mode = Some(ViewerMode::Command);
        assert!(matches!(
            viewer_from_config(&config),
            Err(ViewerError::MissingProgram)
        ));

        config.viewer.program = Some("meshlab".to_string());
        assert!(viewer_from_config(&config).unwrap().is_some());

        // A program alone selects the command viewer.
        config.viewer.mode = None;
        config.viewer.program = None;
        assert!(viewer_from_config(&config).unwrap().is_some());
        config.viewer.program = Some("meshlab".to_string());
        assert_eq!(config.viewer.effective_mode(), ViewerMode::Command);
        assert!(viewer_from_config(&config).unwrap().is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_command_viewer_waits_for_exit_status() {
        let ok = CommandViewer {
            program: "true".to_string(),
            args: Vec::new(),
        };
        assert!(ok.show(Path::new("global.ply")).is_ok());

        let failing = CommandViewer {
            program: "false".to_string(),
            args: Vec::new(),
        };
        assert!(matches!(
            failing.show(Path::new("global.ply")),
            Err(ViewerError::CommandFailed { .. })
        ));
    }

    #[test]
    fn test_command_viewer_missing_program() {
        let viewer = CommandViewer {
            program: "definitely-not-a-real-viewer-binary".to_string(),
            args: Vec::new(),
        };
        assert!(matches!(
            viewer.show(Path::new("global.ply")),
            Err(ViewerError::Spawn { .. })
        ));
    }
}
