//! Emotion labels derived from JAFFE-style sample identifiers
//!
//! Identifiers follow `SUBJECT.CODE#.ID` (e.g. `KA.HA1.29.jpg`): the first two
//! characters of the second `.`-segment select the emotion.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Categorical ground-truth emotion of a sample
///
/// Variants are declared alphabetically so the derived `Ord` matches the
/// grouping order used in the summary artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Anger,
    Disgust,
    Fear,
    Happy,
    Neutral,
    Sad,
    Surprise,
    Unknown,
}

/// The two groups compared by the analysis, in (group_a, group_b) order
pub const COMPARISON_GROUPS: [EmotionLabel; 2] = [EmotionLabel::Happy, EmotionLabel::Sad];

/// Two-letter emotion codes used by the JAFFE naming scheme
pub const EMOTION_CODES: [(&str, EmotionLabel); 7] = [
    ("HA", EmotionLabel::Happy),
    ("SA", EmotionLabel::Sad),
    ("NE", EmotionLabel::Neutral),
    ("AN", EmotionLabel::Anger),
    ("DI", EmotionLabel::Disgust),
    ("FE", EmotionLabel::Fear),
    ("SU", EmotionLabel::Surprise),
];

/// Why an identifier could not be mapped to a known emotion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("identifier '{0}' has no emotion code segment")]
    MissingCodeSegment(String),

    #[error("unknown emotion code '{code}' in identifier '{identifier}'")]
    UnknownCode { identifier: String, code: String },
}

impl EmotionLabel {
    /// Every label, in grouping order
    pub const ALL: [EmotionLabel; 8] = [
        EmotionLabel::Anger,
        EmotionLabel::Disgust,
        EmotionLabel::Fear,
        EmotionLabel::Happy,
        EmotionLabel::Neutral,
        EmotionLabel::Sad,
        EmotionLabel::Surprise,
        EmotionLabel::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Anger => "anger",
            EmotionLabel::Disgust => "disgust",
            EmotionLabel::Fear => "fear",
            EmotionLabel::Happy => "happy",
            EmotionLabel::Neutral => "neutral",
            EmotionLabel::Sad => "sad",
            EmotionLabel::Surprise => "surprise",
            EmotionLabel::Unknown => "unknown",
        }
    }

    /// Whether this label takes part in the happy/sad comparison
    pub fn is_compared(&self) -> bool {
        COMPARISON_GROUPS.contains(self)
    }

    /// Look up a two-letter emotion code (case-sensitive, as emitted by JAFFE)
    pub fn from_code(code: &str) -> Option<EmotionLabel> {
        EMOTION_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, label)| *label)
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmotionLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmotionLabel::ALL
            .iter()
            .find(|label| label.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown emotion label: '{}'", s))
    }
}

/// Resolve an identifier, reporting why resolution fell back
///
/// # Example
/// ```
/// use auscope::emotion::{resolve_code, EmotionLabel, LabelError};
///
/// assert_eq!(resolve_code("KA.HA1.29.jpg"), Ok(EmotionLabel::Happy));
/// assert!(matches!(resolve_code("noperiods"), Err(LabelError::MissingCodeSegment(_))));
/// ```
pub fn resolve_code(identifier: &str) -> Result<EmotionLabel, LabelError> {
    let segment = identifier
        .split('.')
        .nth(1)
        .ok_or_else(|| LabelError::MissingCodeSegment(identifier.to_string()))?;

    let code: String = segment.chars().take(2).collect();

    EmotionLabel::from_code(&code).ok_or_else(|| LabelError::UnknownCode {
        identifier: identifier.to_string(),
        code,
    })
}

/// Resolve an identifier to its emotion label, degrading to `Unknown`
pub fn resolve(identifier: &str) -> EmotionLabel {
    resolve_code(identifier).unwrap_or(EmotionLabel::Unknown)
}
