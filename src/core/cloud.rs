//! Labelled point records and their assembly from parsed scan data.

use thiserror::Error;

/// Errors raised while assembling a labelled cloud.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssembleError {
    /// Positions, labels and colours must describe the same number of points.
    #[error(
        "length mismatch: {positions} positions, {labels} labels, {colors} colors"
    )]
    LengthMismatch {
        positions: usize,
        labels: usize,
        colors: usize,
    },
}

/// Result type for assembly operations.
pub type Result<T> = std::result::Result<T, AssembleError>;

/// One vertex of an output cloud, in PLY property order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabeledPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub label: i32,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl LabeledPoint {
    #[inline]
    pub fn color(&self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

/// Container for a labelled point cloud.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledCloud {
    /// Vertex records in emission order.
    pub points: Vec<LabeledPoint>,
    /// Class name for each label code (`classes[code]`). May be empty when the
    /// names are unknown, e.g. for clouds read from files without comments.
    pub classes: Vec<String>,
}

impl LabeledCloud {
    /// Creates a new empty cloud.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of points in the cloud.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the cloud has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Attaches class names for the label codes.
    pub fn with_classes(mut self, classes: Vec<String>) -> Self {
        self.classes = classes;
        self
    }

    /// Returns the class name of a label code, if known.
    pub fn class_name(&self, label: i32) -> Option<&str> {
        usize::try_from(label)
            .ok()
            .and_then(|idx| self.classes.get(idx))
            .map(String::as_str)
    }
}

/// Scale a `[0, 1]` colour channel to 8 bits.
///
/// Truncates toward zero; values outside the unit range saturate at 0 or 255
/// and NaN maps to 0.
#[inline]
pub fn color_channel(value: f64) -> u8 {
    (value * 255.0) as u8
}

/// Zip positions, label codes and colours into labelled points.
///
/// Index `i` of each input contributes to point `i`. Positions are narrowed to
/// `f32` and colour channels scaled with [`color_channel`].
///
/// # Errors
///
/// Returns [`AssembleError::LengthMismatch`] with all three lengths when the
/// inputs differ in length. Nothing is produced in that case.
pub fn assemble(
    positions: &[[f64; 3]],
    labels: &[i32],
    colors: &[[f64; 3]],
) -> Result<LabeledCloud> {
    if positions.len() != labels.len() || positions.len() != colors.len() {
        return Err(AssembleError::LengthMismatch {
            positions: positions.len(),
            labels: labels.len(),
            colors: colors.len(),
        });
    }

    let points = positions
        .iter()
        .zip(labels)
        .zip(colors)
        .map(|((pos, &label), rgb)| LabeledPoint {
            x: pos[0] as f32,
            y: pos[1] as f32,
            z: pos[2] as f32,
            label,
            red: color_channel(rgb[0]),
            green: color_channel(rgb[1]),
            blue: color_channel(rgb[2]),
        })
        .collect();

    Ok(LabeledCloud {
        points,
        classes: Vec::new(),
    })
}
