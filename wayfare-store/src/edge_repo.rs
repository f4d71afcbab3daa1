use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use wayfare_domain::repository::EdgeRepository;
use wayfare_domain::{ActorProfile, ActorRef, DomainError, FollowEdge, LikeTarget, TargetKind};

const FOLLOW: &str = "follow";
const LIKE: &str = "like";

/// Unified presence-set table for follow and like edges, discriminated by
/// `kind`. For follows the target columns hold an actor reference; for
/// likes they hold a content reference.
pub struct PgEdgeRepository {
    pool: PgPool,
}

impl PgEdgeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    actor_type: String,
    actor_id: Uuid,
    user_name: String,
    display_name: String,
    avatar_url: Option<String>,
}

impl TryFrom<ProfileRow> for ActorProfile {
    type Error = DomainError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        Ok(ActorProfile {
            actor: ActorRef {
                actor_type: row.actor_type.parse()?,
                actor_id: row.actor_id,
            },
            user_name: row.user_name,
            display_name: row.display_name,
            avatar_url: row.avatar_url,
        })
    }
}

fn conflict_on_duplicate(err: sqlx::Error, what: &str) -> DomainError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return DomainError::Conflict(format!("{} already exists", what));
        }
    }
    DomainError::storage(err)
}

#[async_trait]
impl EdgeRepository for PgEdgeRepository {
    async fn delete_follow(
        &self,
        follower: &ActorRef,
        following: &ActorRef,
    ) -> Result<bool, DomainError> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM edges
            WHERE kind = $1 AND actor_type = $2 AND actor_id = $3
              AND target_kind = $4 AND target_id = $5
            "#,
        )
        .bind(FOLLOW)
        .bind(follower.actor_type.to_string())
        .bind(follower.actor_id)
        .bind(following.actor_type.to_string())
        .bind(following.actor_id)
        .execute(&self.pool)
        .await
        .map_err(DomainError::storage)?;

        Ok(deleted.rows_affected() > 0)
    }

    async fn insert_follow(&self, edge: &FollowEdge) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO edges (id, kind, actor_type, actor_id, target_kind, target_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(edge.id)
        .bind(FOLLOW)
        .bind(edge.follower.actor_type.to_string())
        .bind(edge.follower.actor_id)
        .bind(edge.following.actor_type.to_string())
        .bind(edge.following.actor_id)
        .bind(edge.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_duplicate(e, "follow edge"))?;

        Ok(())
    }

    async fn followers(&self, of: &ActorRef) -> Result<Vec<ActorProfile>, DomainError> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT e.actor_type, e.actor_id,
                   COALESCE(t.user_name, a.user_name) AS user_name,
                   COALESCE(t.display_name, a.display_name) AS display_name,
                   COALESCE(t.avatar_url, a.avatar_url) AS avatar_url
            FROM edges e
            LEFT JOIN travelers t ON e.actor_type = 'Traveler' AND t.id = e.actor_id
            LEFT JOIN agencies a ON e.actor_type = 'Agency' AND a.id = e.actor_id
            WHERE e.kind = $1 AND e.target_kind = $2 AND e.target_id = $3
              AND (t.id IS NOT NULL OR a.id IS NOT NULL)
            ORDER BY e.created_at DESC
            "#,
        )
        .bind(FOLLOW)
        .bind(of.actor_type.to_string())
        .bind(of.actor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DomainError::storage)?;

        rows.into_iter().map(ActorProfile::try_from).collect()
    }

    async fn following(&self, actor: &ActorRef) -> Result<Vec<ActorProfile>, DomainError> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT e.target_kind AS actor_type, e.target_id AS actor_id,
                   COALESCE(t.user_name, a.user_name) AS user_name,
                   COALESCE(t.display_name, a.display_name) AS display_name,
                   COALESCE(t.avatar_url, a.avatar_url) AS avatar_url
            FROM edges e
            LEFT JOIN travelers t ON e.target_kind = 'Traveler' AND t.id = e.target_id
            LEFT JOIN agencies a ON e.target_kind = 'Agency' AND a.id = e.target_id
            WHERE e.kind = $1 AND e.actor_type = $2 AND e.actor_id = $3
              AND (t.id IS NOT NULL OR a.id IS NOT NULL)
            ORDER BY e.created_at DESC
            "#,
        )
        .bind(FOLLOW)
        .bind(actor.actor_type.to_string())
        .bind(actor.actor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DomainError::storage)?;

        rows.into_iter().map(ActorProfile::try_from).collect()
    }

    async fn delete_like(
        &self,
        target: &LikeTarget,
        liked_by: &ActorRef,
    ) -> Result<bool, DomainError> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM edges
            WHERE kind = $1 AND actor_type = $2 AND actor_id = $3
              AND target_kind = $4 AND target_id = $5
            "#,
        )
        .bind(LIKE)
        .bind(liked_by.actor_type.to_string())
        .bind(liked_by.actor_id)
        .bind(target.kind.to_string())
        .bind(target.id)
        .execute(&self.pool)
        .await
        .map_err(DomainError::storage)?;

        Ok(deleted.rows_affected() > 0)
    }

    async fn insert_like(
        &self,
        target: &LikeTarget,
        liked_by: &ActorRef,
    ) -> Result<Uuid, DomainError> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO edges (id, kind, actor_type, actor_id, target_kind, target_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(id)
        .bind(LIKE)
        .bind(liked_by.actor_type.to_string())
        .bind(liked_by.actor_id)
        .bind(target.kind.to_string())
        .bind(target.id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_duplicate(e, "like edge"))?;

        Ok(id)
    }

    async fn like_count(&self, target: &LikeTarget) -> Result<i64, DomainError> {
        // Deduplicated by actor identity, not by edge row, so a duplicate
        // insert can never inflate the count.
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(DISTINCT (actor_type, actor_id))
            FROM edges
            WHERE kind = $1 AND target_kind = $2 AND target_id = $3
            "#,
        )
        .bind(LIKE)
        .bind(target.kind.to_string())
        .bind(target.id)
        .fetch_one(&self.pool)
        .await
        .map_err(DomainError::storage)
    }

    async fn liked_targets(
        &self,
        liked_by: &ActorRef,
        kind: TargetKind,
    ) -> Result<Vec<Uuid>, DomainError> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT target_id FROM edges
            WHERE kind = $1 AND actor_type = $2 AND actor_id = $3 AND target_kind = $4
            ORDER BY created_at DESC
            "#,
        )
        .bind(LIKE)
        .bind(liked_by.actor_type.to_string())
        .bind(liked_by.actor_id)
        .bind(kind.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(DomainError::storage)
    }
}
