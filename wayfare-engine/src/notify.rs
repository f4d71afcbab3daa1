use std::sync::Arc;
use uuid::Uuid;

use tracing::debug;
use wayfare_domain::repository::NotificationRepository;
use wayfare_domain::{ActorRef, DomainError, Notification, NotificationKind, RelatedEntityKind};

/// Downstream-only fanout: persists one notification per triggering event
/// and never causes further business mutations.
pub struct NotificationService {
    notifications: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }

    /// Persists a notification addressed to `recipient`. Self-actions are
    /// skipped: when sender and recipient are the same identity nothing is
    /// written and `None` is returned.
    pub async fn notify(
        &self,
        sender: ActorRef,
        recipient: ActorRef,
        kind: NotificationKind,
        related_entity: Uuid,
        related_entity_kind: RelatedEntityKind,
        message: String,
    ) -> Result<Option<Notification>, DomainError> {
        if sender == recipient {
            debug!(actor = %sender, ?kind, "skipping self-notification");
            return Ok(None);
        }

        let notification = Notification::new(
            recipient,
            sender,
            kind,
            related_entity,
            related_entity_kind,
            message,
        );
        self.notifications.insert(&notification).await?;
        Ok(Some(notification))
    }

    /// Notifications addressed to `recipient`, newest first, optionally
    /// filtered by read state.
    pub async fn list(
        &self,
        recipient: ActorRef,
        is_read: Option<bool>,
    ) -> Result<Vec<Notification>, DomainError> {
        self.notifications.list(&recipient, is_read).await
    }

    /// Only the addressed recipient may mark a notification read; a wrong
    /// recipient gets the same error as a missing id.
    pub async fn mark_read(
        &self,
        id: Uuid,
        recipient: ActorRef,
    ) -> Result<Notification, DomainError> {
        self.notifications
            .mark_read(id, &recipient)
            .await?
            .ok_or_else(DomainError::notification_not_found)
    }

    pub async fn delete(&self, id: Uuid, recipient: ActorRef) -> Result<(), DomainError> {
        let removed = self.notifications.delete(id, &recipient).await?;
        if !removed {
            return Err(DomainError::notification_not_found());
        }
        Ok(())
    }
}
