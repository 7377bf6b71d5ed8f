//! The teach/search session controller.
//!
//! Owns the mode state machine and the recurring search tick. At most one
//! session is active at a time; while searching, a timer-driven tick runs
//! the frame pipeline (capture → detect → classify → announce) at the
//! configured rate. Ticks are serialized by construction — the loop awaits
//! each tick before the next interval fires, so pipeline invocations never
//! overlap a shared frame buffer.
//!
//! Sessions end on explicit stop or at the fixed duration ceiling; both
//! paths clear the current result and selected item and announce the stop.
//! Results that arrive after a session ended are discarded, not applied.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use refind_core::{ItemId, LearnedItem, SearchResult, SessionMode};
use refind_embeddings::{FrameRegion, ItemDetector, VisionEmbedder};
use refind_guard::is_illegal_item_label;
use refind_guidance::{GuidanceDispatcher, GuidancePrefs, classify};
use refind_settings::SessionSettings;

use crate::errors::{Result, SessionError};
use crate::store::ItemStore;

/// Session timing and quota configuration.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Frame-processing rate while searching.
    pub tick_rate_hz: u32,
    /// Hard ceiling on one search session.
    pub timeout: Duration,
    /// Maximum learned items before teaching is blocked.
    pub item_quota: usize,
    /// Suggested number of teaching photos per item.
    pub teach_photo_target: usize,
}

impl SessionConfig {
    /// Build from loaded settings.
    #[must_use]
    pub fn from_settings(s: &SessionSettings) -> Self {
        Self {
            tick_rate_hz: s.tick_rate_hz,
            timeout: Duration::from_secs(s.timeout_secs),
            item_quota: s.item_quota,
            teach_photo_target: s.teach_photo_target,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_settings(&SessionSettings::default())
    }
}

/// Supplies camera frames to the search loop.
///
/// The camera is an external collaborator; `None` means no frame was
/// available this tick, which the pipeline treats as no detection.
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// The most recent frame, if any.
    async fn capture(&self) -> Option<FrameRegion>;
}

struct TeachState {
    name: String,
    embeddings: Vec<Vec<f32>>,
}

struct SearchState {
    item_id: ItemId,
    cancel: CancellationToken,
    generation: u64,
}

/// Orchestrates the teach/search lifecycle.
pub struct SessionController {
    config: SessionConfig,
    embedder: Arc<dyn VisionEmbedder>,
    detector: Arc<dyn ItemDetector>,
    store: Arc<dyn ItemStore>,
    dispatcher: Arc<GuidanceDispatcher>,
    prefs: Mutex<GuidancePrefs>,
    mode: Mutex<SessionMode>,
    teach: Mutex<Option<TeachState>>,
    search: Mutex<Option<SearchState>>,
    current_result: Mutex<Option<SearchResult>>,
    generation: AtomicU64,
    consecutive_failures: AtomicU32,
}

impl SessionController {
    /// Create an idle controller over the injected collaborators.
    #[must_use]
    pub fn new(
        config: SessionConfig,
        embedder: Arc<dyn VisionEmbedder>,
        detector: Arc<dyn ItemDetector>,
        store: Arc<dyn ItemStore>,
        dispatcher: Arc<GuidanceDispatcher>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            embedder,
            detector,
            store,
            dispatcher,
            prefs: Mutex::new(GuidancePrefs::default()),
            mode: Mutex::new(SessionMode::Idle),
            teach: Mutex::new(None),
            search: Mutex::new(None),
            current_result: Mutex::new(None),
            generation: AtomicU64::new(0),
            consecutive_failures: AtomicU32::new(0),
        })
    }

    /// Current mode.
    pub fn mode(&self) -> SessionMode {
        *self.mode.lock()
    }

    /// The most recent tick's detection, if any.
    pub fn current_result(&self) -> Option<SearchResult> {
        self.current_result.lock().clone()
    }

    /// ID of the item being searched for, while a search is active.
    pub fn selected_item(&self) -> Option<ItemId> {
        self.search.lock().as_ref().map(|s| s.item_id.clone())
    }

    /// Photos captured so far in the active teaching session.
    pub fn teach_photo_count(&self) -> usize {
        self.teach.lock().as_ref().map_or(0, |t| t.embeddings.len())
    }

    /// Consecutive failed ticks in the active search (observability only;
    /// failures never terminate the session).
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures.load(Ordering::SeqCst)
    }

    /// Replace the guidance toggles.
    pub fn set_prefs(&self, prefs: GuidancePrefs) {
        *self.prefs.lock() = prefs;
    }

    /// Current guidance toggles.
    pub fn prefs(&self) -> GuidancePrefs {
        *self.prefs.lock()
    }

    /// All learned items.
    pub async fn list_items(&self) -> Result<Vec<LearnedItem>> {
        self.store.list().await
    }

    /// Delete a learned item, freeing quota.
    pub async fn delete_item(&self, id: &ItemId) -> Result<()> {
        self.store.delete(id).await
    }

    // ── Teaching ────────────────────────────────────────────────────

    /// Enter teach mode for a new item.
    ///
    /// Blocked when not idle, when the embedder is unavailable, when the
    /// label names contraband, or when the item quota is reached (the quota
    /// case additionally announces the block).
    pub async fn start_teaching(&self, name: &str) -> Result<()> {
        if !self.embedder.is_ready() {
            return Err(SessionError::EmbedderUnavailable);
        }
        if is_illegal_item_label(name) {
            return Err(SessionError::DisallowedLabel { label: name.into() });
        }

        let count = self.store.count().await?;

        let mut mode = self.mode.lock();
        if *mode != SessionMode::Idle {
            return Err(SessionError::InvalidTransition {
                current: *mode,
                attempted: "start teaching",
            });
        }
        if count >= self.config.item_quota {
            drop(mode);
            self.dispatcher.announce_quota_exceeded(&self.prefs());
            return Err(SessionError::QuotaExceeded {
                quota: self.config.item_quota,
            });
        }

        *mode = SessionMode::Teach;
        drop(mode);
        *self.teach.lock() = Some(TeachState {
            name: name.to_owned(),
            embeddings: Vec::new(),
        });
        info!(name, "teaching started");
        Ok(())
    }

    /// Embed one teaching photo and append it to the reference set.
    ///
    /// Returns the number of photos captured so far.
    pub async fn capture_teach_photo(&self, frame: &FrameRegion) -> Result<usize> {
        if self.mode() != SessionMode::Teach {
            return Err(SessionError::InvalidTransition {
                current: self.mode(),
                attempted: "capture a teaching photo",
            });
        }

        let output = self.embedder.embed(frame).await?;

        let mut teach = self.teach.lock();
        let state = teach.as_mut().ok_or(SessionError::InvalidTransition {
            current: SessionMode::Idle,
            attempted: "capture a teaching photo",
        })?;
        state.embeddings.push(output.vector);
        let count = state.embeddings.len();
        debug!(count, "teaching photo captured");
        Ok(count)
    }

    /// Complete teaching: build the immutable item and persist it.
    ///
    /// Requires at least one captured photo; an empty session stays in
    /// teach mode so more photos can be captured.
    pub async fn finish_teaching(&self) -> Result<LearnedItem> {
        if self.mode() != SessionMode::Teach {
            return Err(SessionError::InvalidTransition {
                current: self.mode(),
                attempted: "finish teaching",
            });
        }

        let state = {
            let mut teach = self.teach.lock();
            match teach.as_ref() {
                Some(t) if !t.embeddings.is_empty() => teach.take(),
                _ => None,
            }
        };
        let Some(state) = state else {
            return Err(SessionError::TeachIncomplete);
        };
        let item = LearnedItem::new(state.name, state.embeddings);
        self.store.save(&item).await?;

        *self.mode.lock() = SessionMode::Idle;
        info!(item = %item.id, photos = item.photo_count, "teaching completed");
        Ok(item)
    }

    /// Abandon the active teaching session, discarding captured photos.
    pub fn cancel_teaching(&self) {
        let mut mode = self.mode.lock();
        if *mode == SessionMode::Teach {
            *mode = SessionMode::Idle;
            *self.teach.lock() = None;
            info!("teaching cancelled");
        }
    }

    // ── Searching ───────────────────────────────────────────────────

    /// Start searching for a learned item.
    ///
    /// Spawns the recurring tick loop; the session ends on [`Self::stop_search`]
    /// or automatically at the configured duration ceiling.
    pub async fn start_search(
        self: &Arc<Self>,
        item_id: &ItemId,
        frames: Arc<dyn FrameSource>,
    ) -> Result<()> {
        if !self.embedder.is_ready() {
            return Err(SessionError::EmbedderUnavailable);
        }

        let item = self
            .store
            .get(item_id)
            .await?
            .ok_or_else(|| SessionError::UnknownItem {
                id: item_id.as_str().to_owned(),
            })?;

        let cancel = CancellationToken::new();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut mode = self.mode.lock();
            if *mode != SessionMode::Idle {
                return Err(SessionError::InvalidTransition {
                    current: *mode,
                    attempted: "start searching",
                });
            }
            *mode = SessionMode::Search;
            *self.search.lock() = Some(SearchState {
                item_id: item.id.clone(),
                cancel: cancel.clone(),
                generation,
            });
            *self.current_result.lock() = None;
        }
        self.consecutive_failures.store(0, Ordering::SeqCst);

        self.dispatcher
            .announce_search_started(&item.name, &self.prefs());
        info!(item = %item.id, name = %item.name, "search started");

        let controller = Arc::clone(self);
        drop(tokio::spawn(async move {
            controller
                .run_search_loop(item, frames, cancel, generation)
                .await;
        }));
        Ok(())
    }

    /// Stop the active search, cancelling any in-flight tick.
    pub fn stop_search(&self) {
        let generation = self.search.lock().as_ref().map(|s| s.generation);
        if let Some(generation) = generation {
            self.finalize_search(generation, "explicit stop");
        }
    }

    /// Tear down the search session identified by `generation`.
    ///
    /// Idempotent: both the explicit-stop and timeout paths funnel here and
    /// only the first caller for a given generation does the work.
    fn finalize_search(&self, generation: u64, reason: &str) {
        let state = {
            let mut mode = self.mode.lock();
            let mut search = self.search.lock();
            match search.as_ref() {
                Some(s) if s.generation == generation => {}
                _ => return,
            }
            *mode = SessionMode::Idle;
            *self.current_result.lock() = None;
            search.take()
        };

        if let Some(state) = state {
            state.cancel.cancel();
            info!(item = %state.item_id, reason, "search stopped");
            self.dispatcher.announce_search_stopped(&self.prefs());
        }
    }

    async fn run_search_loop(
        self: Arc<Self>,
        item: LearnedItem,
        frames: Arc<dyn FrameSource>,
        cancel: CancellationToken,
        generation: u64,
    ) {
        let rate = self.config.tick_rate_hz.max(1);
        let period = Duration::from_secs_f64(1.0 / f64::from(rate));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let deadline = tokio::time::sleep(self.config.timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!("search loop cancelled");
                    break;
                }
                () = &mut deadline => {
                    self.finalize_search(generation, "timeout");
                    break;
                }
                _ = ticker.tick() => {
                    self.process_tick(&item, frames.as_ref(), &cancel, generation).await;
                }
            }
        }
    }

    /// Run one pipeline tick. Errors degrade to "no detection" and never
    /// abort the session.
    async fn process_tick(
        &self,
        item: &LearnedItem,
        frames: &dyn FrameSource,
        cancel: &CancellationToken,
        generation: u64,
    ) {
        let outcome = self.run_pipeline(item, frames).await;

        // a result arriving after the session stopped is discarded
        if cancel.is_cancelled() || self.generation.load(Ordering::SeqCst) != generation {
            debug!("discarding stale tick result");
            return;
        }

        match outcome {
            Ok(Some(result)) => {
                self.consecutive_failures.store(0, Ordering::SeqCst);
                *self.current_result.lock() = Some(result.clone());
                self.dispatcher
                    .announce(&result, Some(&item.name), &self.prefs());
            }
            Ok(None) => {
                self.consecutive_failures.store(0, Ordering::SeqCst);
                *self.current_result.lock() = None;
            }
            Err(e) => {
                let failures = self.consecutive_failures.fetch_add(1, Ordering::SeqCst) + 1;
                warn!(error = %e, failures, "tick failed; treating as no detection");
                *self.current_result.lock() = None;
            }
        }
    }

    async fn run_pipeline(
        &self,
        item: &LearnedItem,
        frames: &dyn FrameSource,
    ) -> Result<Option<SearchResult>> {
        let Some(frame) = frames.capture().await else {
            return Ok(None);
        };

        let detection = self.detector.detect(&frame, &item.embeddings).await?;

        Ok(detection.map(|d| {
            let placement = classify(d.bounding_box.center_x());
            SearchResult {
                confidence: d.confidence,
                bounding_box: d.bounding_box,
                distance: placement.distance,
                direction: placement.direction,
            }
        }))
    }
}
