//! Dense integer codes for canonical labels.

use std::collections::HashMap;

use thiserror::Error;

/// Errors that can occur while encoding labels.
#[derive(Debug, Error)]
pub enum LabelError {
    #[error("too many distinct labels ({0}) for 32-bit codes")]
    TooManyClasses(usize),
}

/// Integer codes for a label sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedLabels {
    /// One code per input label, in input order.
    pub codes: Vec<i32>,
    /// Distinct labels in first-seen order; `classes[code]` is the label of `code`.
    pub classes: Vec<String>,
}

impl EncodedLabels {
    /// Number of distinct classes.
    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }
}

/// Assign each distinct label a code in `[0, K)` in order of first appearance.
///
/// Every call builds its own mapping, so codes from different sequences are
/// not comparable.
///
/// # Errors
///
/// Returns [`LabelError::TooManyClasses`] if the number of distinct labels does
/// not fit an `i32`.
pub fn encode_labels<S: AsRef<str>>(labels: &[S]) -> Result<EncodedLabels, LabelError> {
    let mut lookup: HashMap<&str, i32> = HashMap::new();
    let mut classes = Vec::new();
    let mut codes = Vec::with_capacity(labels.len());

    for label in labels {
        let label: &str = AsRef::<str>::as_ref(label);
        let code = match lookup.get(label) {
            Some(&code) => code,
            None => {
                let code = i32::try_from(classes.len())
                    .map_err(|_| LabelError::TooManyClasses(classes.len() + 1))?;
                lookup.insert(label, code);
                classes.push(label.to_string());
                code
            }
        };
        codes.push(code);
    }

    Ok(EncodedLabels { codes, classes })
}
