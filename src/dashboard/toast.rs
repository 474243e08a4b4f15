use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// How long a toast stays on screen.
pub const TOAST_LIFETIME_MS: i64 = 5000;

/// Visual style of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Info,
    Error,
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub level: ToastLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub lifetime: Duration,
}

impl Toast {
    pub fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            created_at: Utc::now(),
            lifetime: Duration::milliseconds(TOAST_LIFETIME_MS),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.created_at + self.lifetime
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_expiry() {
        let toast = Toast::new(ToastLevel::Info, "hello");
        assert!(!toast.is_expired(toast.created_at));
        assert!(toast.is_expired(toast.created_at + Duration::milliseconds(TOAST_LIFETIME_MS)));
    }

    #[test]
    fn test_toast_ids_are_unique() {
        let a = Toast::new(ToastLevel::Error, "a");
        let b = Toast::new(ToastLevel::Error, "a");
        assert_ne!(a.id, b.id);
    }
}
