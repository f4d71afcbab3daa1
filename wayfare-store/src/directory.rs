use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use wayfare_domain::repository::{ActorDirectory, ContentResolver};
use wayfare_domain::{ActorProfile, ActorRef, ActorType, DomainError, LikeTarget, TargetKind};

/// Resolves the two actor tables behind one lookup surface. Every feature
/// that needs "which table is this user in" goes through here.
pub struct PgActorDirectory {
    pool: PgPool,
}

impl PgActorDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_in(
        &self,
        actor_type: ActorType,
        user_name: &str,
    ) -> Result<Option<ActorProfile>, DomainError> {
        let table = table_for(actor_type);
        let row = sqlx::query_as::<_, (Uuid, String, String, Option<String>)>(&format!(
            "SELECT id, user_name, display_name, avatar_url FROM {} WHERE user_name = $1",
            table
        ))
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(DomainError::storage)?;

        Ok(row.map(|(id, user_name, display_name, avatar_url)| ActorProfile {
            actor: ActorRef {
                actor_type,
                actor_id: id,
            },
            user_name,
            display_name,
            avatar_url,
        }))
    }
}

fn table_for(actor_type: ActorType) -> &'static str {
    match actor_type {
        ActorType::Traveler => "travelers",
        ActorType::Agency => "agencies",
    }
}

#[async_trait]
impl ActorDirectory for PgActorDirectory {
    async fn find_by_user_name(
        &self,
        user_name: &str,
    ) -> Result<Option<ActorProfile>, DomainError> {
        let user_name = user_name.to_lowercase();
        if let Some(profile) = self.find_in(ActorType::Traveler, &user_name).await? {
            return Ok(Some(profile));
        }
        self.find_in(ActorType::Agency, &user_name).await
    }

    async fn resolve(&self, actor: &ActorRef) -> Result<Option<ActorProfile>, DomainError> {
        let row = sqlx::query_as::<_, (String, String, Option<String>)>(&format!(
            "SELECT user_name, display_name, avatar_url FROM {} WHERE id = $1",
            table_for(actor.actor_type)
        ))
        .bind(actor.actor_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DomainError::storage)?;

        Ok(row.map(|(user_name, display_name, avatar_url)| ActorProfile {
            actor: *actor,
            user_name,
            display_name,
            avatar_url,
        }))
    }
}

/// Per-kind ownership lookups for likeable content.
pub struct PgContentResolver {
    pool: PgPool,
}

impl PgContentResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentResolver for PgContentResolver {
    async fn owner_of(&self, target: &LikeTarget) -> Result<Option<ActorRef>, DomainError> {
        // Packages are always agency-owned; the content tables carry an
        // explicit discriminated owner pair.
        if target.kind == TargetKind::Package {
            let agency_id =
                sqlx::query_scalar::<_, Uuid>("SELECT agency_id FROM packages WHERE id = $1")
                    .bind(target.id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(DomainError::storage)?;
            return Ok(agency_id.map(ActorRef::agency));
        }

        let table = match target.kind {
            TargetKind::Post => "posts",
            TargetKind::Comment => "comments",
            TargetKind::Tweet => "tweets",
            TargetKind::Package => unreachable!(),
        };

        let row = sqlx::query_as::<_, (String, Uuid)>(&format!(
            "SELECT owner_type, owner_id FROM {} WHERE id = $1",
            table
        ))
        .bind(target.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DomainError::storage)?;

        row.map(|(owner_type, owner_id)| {
            Ok(ActorRef {
                actor_type: owner_type.parse()?,
                actor_id: owner_id,
            })
        })
        .transpose()
    }
}
