//! # refind-core
//!
//! Foundation types and shared vocabulary for the refind pipeline.
//!
//! This crate provides what every other refind crate depends on:
//!
//! - **Branded IDs**: [`ItemId`] and [`SearchSessionId`] as newtypes for type safety
//! - **Domain types**: [`LearnedItem`], [`SearchResult`], [`BoundingBox`]
//! - **Classifications**: [`Direction`] and [`Distance`] categories
//! - **Session modes**: the [`SessionMode`] state vocabulary
//! - **Constants**: match/confidence thresholds and session timing
//! - **Logging**: `tracing` subscriber initialization helpers

#![deny(unsafe_code)]

pub mod constants;
pub mod ids;
pub mod logging;
pub mod types;

pub use constants::*;
pub use ids::{ItemId, SearchSessionId};
pub use types::{
    BoundingBox, Direction, Distance, LearnedItem, SearchResult, SessionMode,
};
