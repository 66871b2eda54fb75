use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::{LocationError, ValidationError};

pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_millis(3000);

pub const FIELD_REQUIRED: &str = "This field is required";
pub const DETECTION_PENDING_OR_FAILED: &str = "Location detection failed. Please try again.";
pub const SERVICE_NOT_CONFIGURED: &str =
    "Location service not configured. Please contact administrator.";
pub const LOCATION_NOT_FOUND: &str = "Location not found. Please try a different address.";
pub const LOCATION_LOOKUP_FAILED: &str = "Unable to find location. Please check the address.";
pub const DETECTION_FALLBACK: &str = "Unable to auto-detect location. Please enter manually.";

/// Form field a notice is anchored to. One notice per target at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NoticeTarget {
    Keyword,
    Location,
}

impl NoticeTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            NoticeTarget::Keyword => "keyword-tooltip",
            NoticeTarget::Location => "location-tooltip",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub target: NoticeTarget,
    pub message: String,
}

impl Notice {
    fn new(target: NoticeTarget, message: &str) -> Self {
        Self {
            target,
            message: message.to_string(),
        }
    }
}

pub fn validation_notice(err: &ValidationError) -> Notice {
    match err {
        ValidationError::MissingKeyword => Notice::new(NoticeTarget::Keyword, FIELD_REQUIRED),
        ValidationError::MissingLocation { auto_detect: false } => {
            Notice::new(NoticeTarget::Location, FIELD_REQUIRED)
        }
        ValidationError::MissingLocation { auto_detect: true } => {
            Notice::new(NoticeTarget::Location, DETECTION_PENDING_OR_FAILED)
        }
    }
}

pub fn location_notice(err: &LocationError) -> Notice {
    let message = match err {
        LocationError::NotConfigured | LocationError::InvalidCredentials => SERVICE_NOT_CONFIGURED,
        LocationError::ZeroResults => LOCATION_NOT_FOUND,
        LocationError::ServiceError(_) => LOCATION_LOOKUP_FAILED,
        LocationError::DetectionFailed(_) => DETECTION_FALLBACK,
    };
    Notice::new(NoticeTarget::Location, message)
}

/// Ephemeral message display. `show` is fire-and-forget; the surface hides
/// each notice on its own once `duration` has passed.
#[async_trait]
pub trait NotificationSurface: Send + Sync {
    async fn show(&self, target: NoticeTarget, message: &str, duration: Duration);
    async fn hide_all(&self);
}

/// Surface that only logs.
pub struct LogOnlyNotifications;

#[async_trait]
impl NotificationSurface for LogOnlyNotifications {
    async fn show(&self, target: NoticeTarget, message: &str, _duration: Duration) {
        info!(anchor = target.as_str(), %message, "notice");
    }

    async fn hide_all(&self) {}
}

struct ActiveNotice {
    message: String,
    expires_at: Instant,
}

/// In-memory surface for front ends that poll what is currently visible.
#[derive(Default)]
pub struct NotificationBoard {
    notices: Mutex<HashMap<NoticeTarget, ActiveNotice>>,
}

impl NotificationBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices still within their display window, ordered by target.
    pub async fn visible(&self) -> Vec<Notice> {
        self.visible_at(Instant::now()).await
    }

    pub async fn visible_at(&self, now: Instant) -> Vec<Notice> {
        let mut guard = self.notices.lock().await;
        guard.retain(|_, notice| notice.expires_at > now);
        let mut visible: Vec<Notice> = guard
            .iter()
            .map(|(target, notice)| Notice {
                target: *target,
                message: notice.message.clone(),
            })
            .collect();
        visible.sort_by_key(|notice| notice.target);
        visible
    }
}

#[async_trait]
impl NotificationSurface for NotificationBoard {
    async fn show(&self, target: NoticeTarget, message: &str, duration: Duration) {
        self.notices.lock().await.insert(
            target,
            ActiveNotice {
                message: message.to_string(),
                expires_at: Instant::now() + duration,
            },
        );
    }

    async fn hide_all(&self) {
        self.notices.lock().await.clear();
    }
}

#[cfg(test)]
#[path = "tests/notify_tests.rs"]
mod tests;
