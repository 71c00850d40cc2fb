//! The closed set of pipeline types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A registered pipeline type.
///
/// The set is closed: unknown `modelType` values are rejected at the
/// validation boundary rather than dispatched by string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineKind {
    /// Object detection with bounding boxes.
    BoundingBox,
    /// Named entity recognition.
    Ner,
    /// Single-label image classification.
    ImageSingleClassification,
    /// Multi-label image classification.
    ImageMultiClassification,
    /// Single-label text classification.
    TextSingleClassification,
    /// Multi-label text classification.
    TextMultiClassification,
    /// KNN-based custom image classification.
    ImageKnnClassification,
}

/// Error returned when a string names no pipeline kind.
#[derive(Debug, Clone, Error)]
#[error("unknown pipeline kind `{0}`")]
pub struct UnknownPipelineKind(pub String);

impl PipelineKind {
    /// Every kind, in registration order.
    pub const ALL: [Self; 7] = [
        Self::BoundingBox,
        Self::Ner,
        Self::ImageSingleClassification,
        Self::ImageMultiClassification,
        Self::TextSingleClassification,
        Self::TextMultiClassification,
        Self::ImageKnnClassification,
    ];

    /// The wire name used in webhook payloads (`modelType`).
    #[must_use]
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::BoundingBox => "bounding_box",
            Self::Ner => "ner",
            Self::ImageSingleClassification => "image_single_classification",
            Self::ImageMultiClassification => "image_multi_classification",
            Self::TextSingleClassification => "text_single_classification",
            Self::TextMultiClassification => "text_multi_classification",
            Self::ImageKnnClassification => "image_knn_classification",
        }
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for PipelineKind {
    type Err = UnknownPipelineKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|kind| kind.wire_name() == s)
            .copied()
            .ok_or_else(|| UnknownPipelineKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip() {
        for kind in PipelineKind::ALL {
            assert_eq!(kind.wire_name().parse::<PipelineKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind() {
        let err = "sentiment".parse::<PipelineKind>().unwrap_err();
        assert!(err.to_string().contains("sentiment"));
    }

    #[test]
    fn test_display_matches_serde() {
        let json = serde_json::to_string(&PipelineKind::ImageMultiClassification).unwrap();
        assert_eq!(json, r#""image_multi_classification""#);
        assert_eq!(
            PipelineKind::ImageMultiClassification.to_string(),
            "image_multi_classification"
        );
    }
}
