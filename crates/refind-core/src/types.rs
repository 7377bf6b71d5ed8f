//! Shared domain types for the re-identification pipeline.
//!
//! All types use `#[serde(rename_all = "camelCase")]` to match the JSON wire
//! format consumed by the app shell.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::ItemId;

/// A physical object the pipeline has been taught to recognize.
///
/// Created when a teaching session completes and immutable afterwards.
/// Re-teaching the same name produces a new item with a fresh [`ItemId`];
/// the old item survives until explicitly deleted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnedItem {
    /// Opaque unique identifier.
    pub id: ItemId,
    /// User-facing label.
    pub name: String,
    /// One reference vector per captured teaching photo, in capture order.
    /// All vectors share one dimensionality within a model version.
    pub embeddings: Vec<Vec<f32>>,
    /// When the teaching session completed.
    pub created_at: DateTime<Utc>,
    /// Number of photos that contributed to `embeddings`.
    pub photo_count: usize,
}

impl LearnedItem {
    /// Build a completed item from captured embeddings.
    ///
    /// `photo_count` is derived from the embedding count; the two can never
    /// disagree on a freshly built item.
    #[must_use]
    pub fn new(name: impl Into<String>, embeddings: Vec<Vec<f32>>) -> Self {
        let photo_count = embeddings.len();
        Self {
            id: ItemId::new(),
            name: name.into(),
            embeddings,
            created_at: Utc::now(),
            photo_count,
        }
    }

    /// Dimensionality of the reference vectors, or `None` for an item with
    /// no embeddings (only possible mid-teach, never after completion).
    #[must_use]
    pub fn dimensions(&self) -> Option<usize> {
        self.embeddings.first().map(Vec::len)
    }
}

/// Normalized bounding box, all coordinates in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl BoundingBox {
    /// Horizontal center of the box.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// Horizontal direction of a detection relative to the camera frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Detection is in the left third-ish of the frame.
    Left,
    /// Detection is near the horizontal center.
    Center,
    /// Detection is in the right third-ish of the frame.
    Right,
}

/// Categorical distance band derived from proximity to the frame center.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distance {
    /// Within ±0.1 of center.
    VeryClose,
    /// Within ±0.2 of center.
    Close,
    /// Within ±0.3 of center.
    Medium,
    /// Everything further out.
    Far,
}

/// One detection produced by a search tick.
///
/// Transient: recomputed every processing tick, never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Similarity-derived confidence in `[0, 1]`.
    pub confidence: f32,
    /// Where the item was detected.
    pub bounding_box: BoundingBox,
    /// Distance band.
    pub distance: Distance,
    /// Horizontal direction.
    pub direction: Direction,
}

/// The session controller's mode. Single-writer: only the controller
/// transitions this value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// No camera processing in progress.
    #[default]
    Idle,
    /// Capturing reference photos for a new item.
    Teach,
    /// Re-identifying a learned item in the live stream.
    Search,
}
