use async_trait::async_trait;
use tracing::{info, warn};

use crate::model::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    Created,
    Updated,
    Deleted,
}

impl std::fmt::Display for NotificationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NotificationAction::Created => "Created",
            NotificationAction::Updated => "Updated",
            NotificationAction::Deleted => "Deleted",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("Notification delivery failed: {0}")]
    Delivery(String),
}

/// Side channel told about every successful write.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, action: NotificationAction, user: &User) -> Result<(), NotifierError>;
}

/// Notifier that only records the event in the log.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, action: NotificationAction, user: &User) -> Result<(), NotifierError> {
        info!(
            action = %action,
            user_id = %user.id.map(|id| id.to_hex()).unwrap_or_default(),
            nickname = %user.nickname,
            "User notification"
        );
        Ok(())
    }
}

/// Sends a notification; a failure is logged and otherwise dropped.
pub async fn notify_best_effort(notifier: &dyn Notifier, action: NotificationAction, user: &User) {
    if let Err(e) = notifier.notify(action, user).await {
        warn!(action = %action, "Ignoring notification failure: {}", e);
    }
}
