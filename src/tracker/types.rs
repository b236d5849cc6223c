//! Visitor tracking types
//!
//! This module defines the per-tab behavioral snapshot and the signals that
//! are sampled once at session start.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Device class derived from viewport width at session start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceClass {
    /// Classify a viewport width in CSS pixels (<=768 mobile, <=1024 tablet)
    pub fn from_viewport_width(width: u32) -> Self {
        if width <= 768 {
            DeviceClass::Mobile
        } else if width <= 1024 {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }
}

/// Signals sampled once when a session begins.
///
/// Everything here is immutable for the lifetime of the session; the snapshot
/// copies these fields verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    /// Document referrer, empty string for direct traffic
    #[serde(default)]
    pub referrer: String,
    /// Raw user agent string
    #[serde(default)]
    pub user_agent: String,
    /// Path of the page the session started on
    pub entry_page: String,
    /// Viewport width in CSS pixels
    pub viewport_width: u32,
    /// Screen resolution, e.g. "1920x1080"
    #[serde(default)]
    pub screen_resolution: String,
}

impl SessionContext {
    /// Best-effort browser name from the user agent
    pub fn browser(&self) -> &'static str {
        let ua = &self.user_agent;
        if ua.contains("Edge") {
            "Edge"
        } else if ua.contains("Chrome") {
            "Chrome"
        } else if ua.contains("Firefox") {
            "Firefox"
        } else if ua.contains("Safari") {
            "Safari"
        } else {
            "Unknown"
        }
    }

    /// Best-effort operating system from the user agent
    pub fn os(&self) -> &'static str {
        let ua = &self.user_agent;
        if ua.contains("Windows") {
            "Windows"
        } else if ua.contains("Android") {
            "Android"
        } else if ua.contains("iOS") || ua.contains("iPhone") || ua.contains("iPad") {
            "iOS"
        } else if ua.contains("Mac") {
            "macOS"
        } else if ua.contains("Linux") {
            "Linux"
        } else {
            "Unknown"
        }
    }
}

/// The authoritative behavioral record for one browser tab's visit.
///
/// Counters are monotonically non-decreasing; `pages_visited` is append-only
/// with consecutive duplicates suppressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitorSnapshot {
    /// Stable for the tab's lifetime
    pub session_id: String,
    /// Persists across sessions, identifies a returning visitor
    pub visitor_id: String,
    /// When the session began
    pub started_at: DateTime<Utc>,
    /// Seconds elapsed since session start, recomputed on read
    pub time_on_page_seconds: u32,
    /// Maximum scroll fraction ever observed, 0-100
    pub scroll_depth_percent: u8,
    /// Total clicks this session
    pub click_count: u32,
    /// Ordered paths, consecutive duplicates suppressed
    pub pages_visited: Vec<String>,
    /// Path currently being viewed
    pub current_page: String,
    pub device_class: DeviceClass,
    pub referrer: String,
    pub browser: String,
    pub os: String,
    pub user_agent: String,
    pub screen_resolution: String,
    /// True once the pointer has left the top viewport edge
    pub exit_intent_fired: bool,
    /// True iff the visitor id existed before this session began
    pub is_returning_visitor: bool,
}

/// Notification emitted on the first exit intent of a session.
///
/// Consumers (the capture-trigger policy) react to this once; subsequent
/// upward pointer exits produce nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitIntent {
    pub session_id: String,
    pub fired_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_class_thresholds() {
        assert_eq!(DeviceClass::from_viewport_width(375), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_viewport_width(768), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_viewport_width(769), DeviceClass::Tablet);
        assert_eq!(DeviceClass::from_viewport_width(1024), DeviceClass::Tablet);
        assert_eq!(DeviceClass::from_viewport_width(1440), DeviceClass::Desktop);
    }

    #[test]
    fn browser_detection_prefers_edge_over_chrome() {
        let ctx = SessionContext {
            referrer: String::new(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0) Chrome/120.0 Edge/120.0".to_string(),
            entry_page: "/".to_string(),
            viewport_width: 1920,
            screen_resolution: "1920x1080".to_string(),
        };
        assert_eq!(ctx.browser(), "Edge");
        assert_eq!(ctx.os(), "Windows");
    }

    #[test]
    fn unknown_user_agent_falls_back() {
        let ctx = SessionContext {
            referrer: String::new(),
            user_agent: "curl/8.0".to_string(),
            entry_page: "/".to_string(),
            viewport_width: 800,
            screen_resolution: String::new(),
        };
        assert_eq!(ctx.browser(), "Unknown");
        assert_eq!(ctx.os(), "Unknown");
    }

    #[test]
    fn snapshot_serialization_round_trip() {
        let snapshot = VisitorSnapshot {
            session_id: "sess-1".to_string(),
            visitor_id: "vis-1".to_string(),
            started_at: Utc::now(),
            time_on_page_seconds: 42,
            scroll_depth_percent: 55,
            click_count: 3,
            pages_visited: vec!["/".to_string(), "/pricing".to_string()],
            current_page: "/pricing".to_string(),
            device_class: DeviceClass::Desktop,
            referrer: "https://www.google.com/".to_string(),
            browser: "Chrome".to_string(),
            os: "Linux".to_string(),
            user_agent: "test".to_string(),
            screen_resolution: "1920x1080".to_string(),
            exit_intent_fired: false,
            is_returning_visitor: true,
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: VisitorSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.session_id, "sess-1");
        assert_eq!(parsed.scroll_depth_percent, 55);
        assert_eq!(parsed.device_class, DeviceClass::Desktop);
    }
}
