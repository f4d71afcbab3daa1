use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use wayfare_domain::repository::NotificationRepository;
use wayfare_domain::{ActorRef, DomainError, Notification};

pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    recipient_type: String,
    recipient_id: Uuid,
    sender_type: String,
    sender_id: Uuid,
    kind: String,
    related_entity: Uuid,
    related_entity_kind: String,
    message: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = DomainError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Notification {
            id: row.id,
            recipient: ActorRef {
                actor_type: row.recipient_type.parse()?,
                actor_id: row.recipient_id,
            },
            sender: ActorRef {
                actor_type: row.sender_type.parse()?,
                actor_id: row.sender_id,
            },
            kind: row.kind.parse()?,
            related_entity: row.related_entity,
            related_entity_kind: row.related_entity_kind.parse()?,
            message: row.message,
            is_read: row.is_read,
            created_at: row.created_at,
        })
    }
}

const NOTIFICATION_COLUMNS: &str = "id, recipient_type, recipient_id, sender_type, sender_id, \
     kind, related_entity, related_entity_kind, message, is_read, created_at";

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn insert(&self, notification: &Notification) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, recipient_type, recipient_id, sender_type, sender_id,
                                       kind, related_entity, related_entity_kind, message,
                                       is_read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(notification.id)
        .bind(notification.recipient.actor_type.to_string())
        .bind(notification.recipient.actor_id)
        .bind(notification.sender.actor_type.to_string())
        .bind(notification.sender.actor_id)
        .bind(notification.kind.to_string())
        .bind(notification.related_entity)
        .bind(notification.related_entity_kind.to_string())
        .bind(&notification.message)
        .bind(notification.is_read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await
        .map_err(DomainError::storage)?;

        Ok(())
    }

    async fn list(
        &self,
        recipient: &ActorRef,
        is_read: Option<bool>,
    ) -> Result<Vec<Notification>, DomainError> {
        let rows = match is_read {
            Some(is_read) => {
                sqlx::query_as::<_, NotificationRow>(&format!(
                    "SELECT {} FROM notifications \
                     WHERE recipient_type = $1 AND recipient_id = $2 AND is_read = $3 \
                     ORDER BY created_at DESC",
                    NOTIFICATION_COLUMNS
                ))
                .bind(recipient.actor_type.to_string())
                .bind(recipient.actor_id)
                .bind(is_read)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, NotificationRow>(&format!(
                    "SELECT {} FROM notifications \
                     WHERE recipient_type = $1 AND recipient_id = $2 \
                     ORDER BY created_at DESC",
                    NOTIFICATION_COLUMNS
                ))
                .bind(recipient.actor_type.to_string())
                .bind(recipient.actor_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(DomainError::storage)?;

        rows.into_iter().map(Notification::try_from).collect()
    }

    async fn mark_read(
        &self,
        id: Uuid,
        recipient: &ActorRef,
    ) -> Result<Option<Notification>, DomainError> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            "UPDATE notifications SET is_read = TRUE \
             WHERE id = $1 AND recipient_type = $2 AND recipient_id = $3 \
             RETURNING {}",
            NOTIFICATION_COLUMNS
        ))
        .bind(id)
        .bind(recipient.actor_type.to_string())
        .bind(recipient.actor_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DomainError::storage)?;

        row.map(Notification::try_from).transpose()
    }

    async fn delete(&self, id: Uuid, recipient: &ActorRef) -> Result<bool, DomainError> {
        let deleted = sqlx::query(
            "DELETE FROM notifications \
             WHERE id = $1 AND recipient_type = $2 AND recipient_id = $3",
        )
        .bind(id)
        .bind(recipient.actor_type.to_string())
        .bind(recipient.actor_id)
        .execute(&self.pool)
        .await
        .map_err(DomainError::storage)?;

        Ok(deleted.rows_affected() > 0)
    }
}
