//! # refind-session
//!
//! The teach/search session controller and learned-item storage.
//!
//! - [`SessionController`] — mode state machine (idle/teach/search), the
//!   recurring search tick at the configured rate, the session duration
//!   ceiling, and degrade-to-no-detection error handling
//! - [`FrameSource`] — the camera collaborator interface
//! - [`ItemStore`] — persistence seam, with [`MemoryItemStore`] and
//!   [`SqliteItemStore`] implementations
//!
//! One session at a time: entering `search` or `teach` requires `idle`, and
//! there is no direct transition between the two active modes.

#![deny(unsafe_code)]

pub mod controller;
pub mod errors;
pub mod store;

pub use controller::{FrameSource, SessionConfig, SessionController};
pub use errors::{Result, SessionError};
pub use store::{ItemStore, MemoryItemStore, SqliteItemStore};
