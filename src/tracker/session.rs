//! Per-tab visitor session tracking
//!
//! One `VisitorSession` owns the behavioral snapshot for one browser tab. It
//! is constructed explicitly and passed by reference to whatever needs it
//! (capture triggers, dashboard), so tests can run any number of independent
//! sessions without global state.
//!
//! Event handlers never fail: storage problems are logged and the session
//! keeps accumulating in memory for the rest of the page lifetime.

use crate::store::local::{self, LocalStorage};
use crate::tracker::engagement::{engagement_score, EngagementScore};
use crate::tracker::flush::FlushDebounce;
use crate::tracker::types::{DeviceClass, ExitIntent, SessionContext, VisitorSnapshot};
use chrono::{DateTime, Utc};

/// Tracker for a single browser tab's visit
#[derive(Debug)]
pub struct VisitorSession {
    snapshot: VisitorSnapshot,
    debounce: FlushDebounce,
}

impl VisitorSession {
    /// Begin a session from signals sampled at page load.
    ///
    /// Mints a fresh session id, and reuses (or creates) the per-browser
    /// visitor id to detect returning visitors. Never fails: if storage is
    /// unavailable the visitor simply won't be recognized next time.
    pub fn begin(
        context: SessionContext,
        storage: &mut dyn LocalStorage,
        now: DateTime<Utc>,
    ) -> Self {
        let (visitor_id, is_returning) = local::visitor_identity(storage);

        let snapshot = VisitorSnapshot {
            session_id: uuid::Uuid::new_v4().to_string(),
            visitor_id,
            started_at: now,
            time_on_page_seconds: 0,
            scroll_depth_percent: 0,
            click_count: 0,
            pages_visited: vec![context.entry_page.clone()],
            current_page: context.entry_page.clone(),
            device_class: DeviceClass::from_viewport_width(context.viewport_width),
            browser: context.browser().to_string(),
            os: context.os().to_string(),
            referrer: context.referrer,
            user_agent: context.user_agent,
            screen_resolution: context.screen_resolution,
            exit_intent_fired: false,
            is_returning_visitor: is_returning,
        };

        Self {
            snapshot,
            debounce: FlushDebounce::default(),
        }
    }

    /// Handle a scroll event.
    ///
    /// The scroll fraction is `scroll_top / (scroll_height - viewport_height)`
    /// clamped to 0..=100; the snapshot keeps the running maximum. Persistence
    /// is debounced: only the final maximum needs to be durable.
    pub fn record_scroll(
        &mut self,
        scroll_top: f64,
        scroll_height: f64,
        viewport_height: f64,
        now: DateTime<Utc>,
    ) {
        let scrollable = scroll_height - viewport_height;
        let percent = if scrollable > 0.0 {
            ((scroll_top / scrollable) * 100.0).round().clamp(0.0, 100.0) as u8
        } else {
            0
        };
        if percent > self.snapshot.scroll_depth_percent {
            self.snapshot.scroll_depth_percent = percent;
        }
        self.debounce.mark(now);
    }

    /// Handle a click event
    pub fn record_click(&mut self, now: DateTime<Utc>) {
        self.snapshot.click_count += 1;
        self.debounce.mark(now);
    }

    /// Handle the pointer leaving the viewport.
    ///
    /// Returns a notification on the first upward exit (`pointer_y <= 0`)
    /// only; later exits set nothing and return `None`.
    pub fn record_exit_intent(
        &mut self,
        pointer_y: i32,
        now: DateTime<Utc>,
    ) -> Option<ExitIntent> {
        if pointer_y > 0 || self.snapshot.exit_intent_fired {
            return None;
        }
        self.snapshot.exit_intent_fired = true;
        Some(ExitIntent {
            session_id: self.snapshot.session_id.clone(),
            fired_at: now,
        })
    }

    /// Handle an in-app navigation. `pages_visited` records distinct pages
    /// only, so a revisit never appends; `current_page` always updates.
    /// Persists immediately.
    pub fn record_page_change(
        &mut self,
        path: &str,
        storage: &mut dyn LocalStorage,
        now: DateTime<Utc>,
    ) {
        if !self.snapshot.pages_visited.iter().any(|p| p == path) {
            self.snapshot.pages_visited.push(path.to_string());
        }
        self.snapshot.current_page = path.to_string();
        self.flush(storage, now);
    }

    /// Run the debounced flush if it has come due
    pub fn poll_flush(&mut self, storage: &mut dyn LocalStorage, now: DateTime<Utc>) {
        if self.debounce.poll(now) {
            self.flush(storage, now);
            self.debounce.complete();
        }
    }

    /// Persist the snapshot now (visibility loss, unload). Upsert by session
    /// id, so calling this repeatedly is harmless. Storage failures are
    /// logged and the session continues in memory only.
    pub fn flush(&mut self, storage: &mut dyn LocalStorage, now: DateTime<Utc>) {
        self.refresh_time(now);
        if let Err(e) = local::upsert_snapshot(storage, &self.snapshot) {
            log::warn!(
                "could not persist visitor snapshot {}: {e}",
                self.snapshot.session_id
            );
        }
    }

    /// An up-to-date copy of the snapshot
    pub fn snapshot(&mut self, now: DateTime<Utc>) -> VisitorSnapshot {
        self.refresh_time(now);
        self.snapshot.clone()
    }

    /// Engagement score for the current snapshot
    pub fn engagement(&mut self, now: DateTime<Utc>) -> EngagementScore {
        let snapshot = self.snapshot(now);
        engagement_score(&snapshot)
    }

    pub fn session_id(&self) -> &str {
        &self.snapshot.session_id
    }

    fn refresh_time(&mut self, now: DateTime<Utc>) {
        let elapsed = (now - self.snapshot.started_at).num_seconds().max(0) as u32;
        // Monotone even if the caller hands us an earlier clock
        if elapsed > self.snapshot.time_on_page_seconds {
            self.snapshot.time_on_page_seconds = elapsed;
        }
    }
}
