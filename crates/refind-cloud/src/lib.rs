//! # refind-cloud
//!
//! Guarded client for the cloud multimodal vision endpoint.
//!
//! Requests pass through `refind-guard` validation and the local
//! sliding-window rate limiter before any network traffic. Remote failures
//! map onto a fixed set of local codes (`RATE_LIMITED`, `PAYMENT_REQUIRED`,
//! `SERVICE_ERROR`) — raw gateway responses are logged, never surfaced.
//! Response text is TTS-sanitized because it is destined for speech.

#![deny(unsafe_code)]

pub mod client;
pub mod errors;
pub mod prompts;

pub use client::{CloudVisionClient, encode_image_base64};
pub use errors::{CloudError, Result};
pub use prompts::{SYSTEM_PROMPT, prompt_for};
