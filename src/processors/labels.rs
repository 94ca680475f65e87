//! Label canonicalisation by largest meaningful word.
//!
//! Raw scan labels are derived from camera and object names such as
//! `Scan_CameraBase01` or `LIDAR_TopMount_2`. They are reduced to a canonical
//! class by splitting on underscores and CamelCase boundaries, dropping
//! sub-words that contain digits and keeping the longest remaining one.
//!
//! # Example
//!
//! ```
//! use scan_label_pipeline::processors::labels::{canonicalize_labels, largest_word};
//!
//! assert_eq!(largest_word("Scan_CameraBase01"), "Camera");
//!
//! let raw = vec!["Scan_CameraBase01".to_string(), "Scan_CameraMount02".to_string()];
//! let canonical = canonicalize_labels(&raw);
//! assert_eq!(canonical.labels, vec!["Camera", "Camera"]);
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    /// A capital followed by lowercase letters marks a CamelCase segment.
    static ref CAMEL_CASE_SIGNAL: Regex = Regex::new(r"[A-Z][a-z]+").unwrap();
    static ref DIGIT: Regex = Regex::new(r"\d").unwrap();
}

/// Split a CamelCase string into its capitalised words.
///
/// A word is either a capital followed by lowercase letters (`Camera`), or a
/// run of capitals that ends right before another capital or at the end of the
/// string (`LIDARMount` gives `LIDAR` and `Mount`). Characters outside any
/// word, such as digits or a leading lowercase prefix, are dropped.
pub fn split_camel_case(s: &str) -> Vec<&str> {
    // The `regex` crate has no lookahead, so the capital-run rule is scanned by hand.
    let bytes = s.as_bytes();
    let n = bytes.len();
    let mut words = Vec::new();
    let mut i = 0;

    while i < n {
        if !bytes[i].is_ascii_uppercase() {
            i += 1;
            continue;
        }

        let mut end = i + 1;
        while end < n && bytes[end].is_ascii_lowercase() {
            end += 1;
        }
        if end > i + 1 {
            words.push(&s[i..end]);
            i = end;
            continue;
        }

        let mut run_end = i + 1;
        while run_end < n && bytes[run_end].is_ascii_uppercase() {
            run_end += 1;
        }
        if run_end == n {
            words.push(&s[i..n]);
            i = n;
        } else if run_end > i + 1 {
            // Leave the last capital of the run to open the next word.
            words.push(&s[i..run_end - 1]);
            i = run_end - 1;
        } else {
            i += 1;
        }
    }

    words
}

/// Return the longest digit-free word of a label.
///
/// The label is split on `_`; segments containing a CamelCase word are further
/// split with [`split_camel_case`], other segments are kept whole. Words that
/// contain a digit are discarded and the longest remaining word wins, the
/// first one on ties. Returns `""` if no word survives.
pub fn largest_word(s: &str) -> &str {
    let mut best: Option<&str> = None;

    for segment in s.split('_') {
        let words = if CAMEL_CASE_SIGNAL.is_match(segment) {
            split_camel_case(segment)
        } else {
            vec![segment]
        };

        for word in words {
            if DIGIT.is_match(word) {
                continue;
            }
            if best.map_or(true, |b| word.chars().count() > b.chars().count()) {
                best = Some(word);
            }
        }
    }

    best.unwrap_or("")
}

/// Raw labels bucketed by their canonical key, keys in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LabelGroups {
    groups: BTreeMap<String, Vec<String>>,
}

impl LabelGroups {
    /// True if `key` is the canonical key of at least one grouped label.
    pub fn contains_key(&self, key: &str) -> bool {
        self.groups.contains_key(key)
    }

    /// Raw labels sharing `key`.
    pub fn members(&self, key: &str) -> Option<&[String]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Iterate over `(key, members)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Distinct labels in first-seen order.
pub fn distinct_labels<S: AsRef<str>>(labels: &[S]) -> Vec<&str> {
    let mut seen = HashSet::with_capacity(labels.len());
    labels
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|label| seen.insert(*label))
        .collect()
}

/// Group labels by their [`largest_word`].
///
/// Duplicates are collapsed first, so every distinct input appears in exactly
/// one group. Members keep their first-seen order inside a group.
pub fn group_by_largest_word<S: AsRef<str>>(labels: &[S]) -> LabelGroups {
    let mut keyed: Vec<(&str, &str)> = distinct_labels(labels)
        .into_iter()
        .map(|label| (largest_word(label), label))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(b.0));

    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, label) in keyed {
        groups
            .entry(key.to_string())
            .or_default()
            .push(label.to_string());
    }

    LabelGroups { groups }
}

/// Canonicalised labels of one sequence along with the grouping that produced them.
#[derive(Debug, Clone, Default)]
pub struct CanonicalLabels {
    /// One canonical label per input label, in input order.
    pub labels: Vec<String>,
    pub groups: LabelGroups,
}

/// Replace each label by its canonical key when `groups` knows the key.
pub fn rewrite_labels(labels: &mut [String], groups: &LabelGroups) {
    let mut cache: HashMap<String, Option<String>> = HashMap::new();

    for label in labels.iter_mut() {
        let replacement = cache
            .entry(label.clone())
            .or_insert_with(|| {
                let key = largest_word(label);
                groups.contains_key(key).then(|| key.to_string())
            })
            .clone();

        if let Some(key) = replacement {
            *label = key;
        }
    }
}

/// Canonicalise a label sequence.
///
/// Builds the [`LabelGroups`] of the distinct labels, then rewrites every
/// label of the full sequence to its group key. The output has the same
/// length and order as the input.
pub fn canonicalize_labels<S: AsRef<str>>(labels: &[S]) -> CanonicalLabels {
    let groups = group_by_largest_word(labels);
    let mut rewritten: Vec<String> = labels
        .iter()
        .map(|l| AsRef::<str>::as_ref(l).to_string())
        .collect();
    rewrite_labels(&mut rewritten, &groups);

    CanonicalLabels {
        labels: rewritten,
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_camel_case_words() {
        assert_eq!(split_camel_case("CameraBase"), vec!["Camera", "Base"]);
        assert_eq!(split_camel_case("CameraBase01"), vec!["Camera", "Base"]);
        assert_eq!(split_camel_case("cameraBase"), vec!["Base"]);
    }

    #[test]
    fn test_split_camel_case_acronym_runs() {
        assert_eq!(split_camel_case("LIDARMount"), vec!["LIDAR", "Mount"]);
        assert_eq!(split_camel_case("TopLIDAR"), vec!["Top", "LIDAR"]);
        assert_eq!(split_camel_case("ABCdef"), vec!["AB", "Cdef"]);
        assert_eq!(split_camel_case("HDCam2X"), vec!["HD", "Cam", "X"]);
        // A capital run followed by a digit gives up its last capital.
        assert_eq!(split_camel_case("ABC1"), vec!["AB"]);
        assert_eq!(split_camel_case("X1"), Vec::<&str>::new());
    }

    #[test]
    fn test_largest_word_drops_numeric_parts() {
        assert_eq!(largest_word("Cam_Base01"), "Base");
        assert_eq!(largest_word("cam_base01"), "cam");
        assert_eq!(largest_word("CameraBase"), "Camera");
        assert_eq!(largest_word("Scan_CameraBase01"), "Camera");
        assert_eq!(largest_word("Scan_CameraMount02"), "Camera");
    }

    #[test]
    fn test_largest_word_lowercase_segment_kept_whole() {
        assert_eq!(largest_word("AB_cd"), "AB");
        assert_eq!(largest_word("ab_cde"), "cde");
        assert_eq!(largest_word("lidar_top"), "lidar");
    }

    #[test]
    fn test_largest_word_ties_go_to_first() {
        assert_eq!(largest_word("Door_Wall"), "Door");
        assert_eq!(largest_word("DoorWall"), "Door");
    }

    #[test]
    fn test_largest_word_empty_when_all_numeric() {
        assert_eq!(largest_word("12_34"), "");
        assert_eq!(largest_word("cam01_02"), "");
        assert_eq!(largest_word(""), "");
    }

    #[test]
    fn test_group_by_largest_word_partitions_inputs() {
        let labels = vec![
            "Scan_CameraBase01",
            "Floor_2",
            "Scan_CameraMount02",
            "Scan_CameraBase01",
            "7_8",
            "floor",
        ];
        let groups = group_by_largest_word(&labels);

        let keys: Vec<&str> = groups.keys().collect();
        assert_eq!(keys, vec!["", "Camera", "Floor", "floor"]);
        assert_eq!(
            groups.members("Camera").unwrap(),
            &["Scan_CameraBase01".to_string(), "Scan_CameraMount02".to_string()]
        );
        assert_eq!(groups.members("").unwrap(), &["7_8".to_string()]);

        let mut members: Vec<&str> = groups
            .iter()
            .flat_map(|(_, m)| m.iter().map(String::as_str))
            .collect();
        members.sort_unstable();
        let mut expected = distinct_labels(&labels);
        expected.sort_unstable();
        assert_eq!(members, expected);
    }

    #[test]
    fn test_canonicalize_preserves_length_and_order() {
        let raw = vec![
            "Scan_CameraBase01".to_string(),
            "Wall_North".to_string(),
            "Scan_CameraMount02".to_string(),
            "99".to_string(),
        ];
        let canonical = canonicalize_labels(&raw);

        assert_eq!(canonical.labels, vec!["Camera", "North", "Camera", ""]);
        assert_eq!(canonical.groups.len(), 3);
    }

    #[test]
    fn test_canonicalize_is_stable_on_canonical_values() {
        let raw = vec![
            "Scan_CameraBase01",
            "LIDAR_TopMount_2",
            "Wall_North",
            "DoorFrame_7",
            "12_34",
        ];
        let first = canonicalize_labels(&raw);
        let second = canonicalize_labels(&first.labels);

        let first_set: HashSet<&String> = first.labels.iter().collect();
        let second_set: HashSet<&String> = second.labels.iter().collect();
        assert_eq!(first_set, second_set);
        assert_eq!(first.labels, second.labels);
    }

    #[test]
    fn test_rewrite_labels_in_place() {
        let mut labels = vec!["Cam_Base01".to_string(), "Cam_Base01".to_string()];
        let groups = group_by_largest_word(&labels);
        rewrite_labels(&mut labels, &groups);
        assert_eq!(labels, vec!["Base", "Base"]);
    }

    #[test]
    fn test_rewrite_labels_leaves_unknown_keys() {
        let mut labels = vec!["Door_7".to_string()];
        rewrite_labels(&mut labels, &LabelGroups::default());
        assert_eq!(labels, vec!["Door_7"]);
    }

    #[test]
    fn test_label_groups_serialize_as_map() {
        let groups = group_by_largest_word(&["Cam_Base01", "Cam_Base02"]);
        let json = serde_json::to_string(&groups).unwrap();
        assert_eq!(json, r#"{"Base":["Cam_Base01","Cam_Base02"]}"#);
    }
}
