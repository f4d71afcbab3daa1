use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::notify::NotificationService;
use wayfare_domain::repository::{ActorDirectory, ContentResolver, EdgeRepository};
use wayfare_domain::{
    ActorProfile, ActorRef, DomainError, FollowEdge, LikeTarget, NotificationKind,
    RelatedEntityKind, TargetKind, ToggleState,
};

/// Idempotent presence toggles over the follow/like edge set. Insertion
/// fans out a notification to the target's owner; removal never notifies.
pub struct SocialService {
    edges: Arc<dyn EdgeRepository>,
    directory: Arc<dyn ActorDirectory>,
    content: Arc<dyn ContentResolver>,
    notifier: Arc<NotificationService>,
}

impl SocialService {
    pub fn new(
        edges: Arc<dyn EdgeRepository>,
        directory: Arc<dyn ActorDirectory>,
        content: Arc<dyn ContentResolver>,
        notifier: Arc<NotificationService>,
    ) -> Self {
        Self {
            edges,
            directory,
            content,
            notifier,
        }
    }

    /// Follow when no edge exists, unfollow when one does. Self-follow is
    /// rejected before any mutation.
    pub async fn toggle_follow(
        &self,
        actor: ActorRef,
        user_name: &str,
    ) -> Result<ToggleState, DomainError> {
        let target = self
            .directory
            .find_by_user_name(user_name)
            .await?
            .ok_or(DomainError::NotFound("user"))?;

        if target.actor == actor {
            return Err(DomainError::Validation(
                "You cannot follow yourself".to_string(),
            ));
        }

        if self.edges.delete_follow(&actor, &target.actor).await? {
            info!(actor = %actor, target = %target.actor, "unfollowed");
            return Ok(ToggleState::Removed);
        }

        let edge = FollowEdge {
            id: Uuid::new_v4(),
            follower: actor,
            following: target.actor,
            created_at: Utc::now(),
        };
        self.edges.insert_follow(&edge).await?;
        info!(actor = %actor, target = %target.actor, "followed");

        let sender = self.sender_profile(actor).await?;
        self.notifier
            .notify(
                actor,
                target.actor,
                NotificationKind::Follow,
                edge.id,
                RelatedEntityKind::Follow,
                format!("{} started following you.", sender.user_name),
            )
            .await?;

        Ok(ToggleState::Added)
    }

    /// Like when no edge exists, unlike when one does. Returns the toggle
    /// outcome together with the deduplicated like count for the target.
    /// Liking your own content is allowed; the notifier suppresses the
    /// self-notification.
    pub async fn toggle_like(
        &self,
        actor: ActorRef,
        target: LikeTarget,
    ) -> Result<(ToggleState, i64), DomainError> {
        let owner = self
            .content
            .owner_of(&target)
            .await?
            .ok_or_else(|| DomainError::NotFound(target_noun(target.kind)))?;

        if self.edges.delete_like(&target, &actor).await? {
            let count = self.edges.like_count(&target).await?;
            return Ok((ToggleState::Removed, count));
        }

        self.edges.insert_like(&target, &actor).await?;
        let count = self.edges.like_count(&target).await?;

        let sender = self.sender_profile(actor).await?;
        self.notifier
            .notify(
                actor,
                owner,
                NotificationKind::Like,
                target.id,
                related_kind(target.kind),
                format!("{} liked your {}.", sender.user_name, target.kind),
            )
            .await?;

        Ok((ToggleState::Added, count))
    }

    pub async fn followers(&self, user_name: &str) -> Result<Vec<ActorProfile>, DomainError> {
        let target = self
            .directory
            .find_by_user_name(user_name)
            .await?
            .ok_or(DomainError::NotFound("user"))?;
        self.edges.followers(&target.actor).await
    }

    pub async fn following(&self, user_name: &str) -> Result<Vec<ActorProfile>, DomainError> {
        let actor = self
            .directory
            .find_by_user_name(user_name)
            .await?
            .ok_or(DomainError::NotFound("user"))?;
        self.edges.following(&actor.actor).await
    }

    /// Ids of every target of `kind` the actor has liked.
    pub async fn liked(
        &self,
        actor: ActorRef,
        kind: TargetKind,
    ) -> Result<Vec<Uuid>, DomainError> {
        self.edges.liked_targets(&actor, kind).await
    }

    pub async fn like_count(&self, target: LikeTarget) -> Result<i64, DomainError> {
        self.edges.like_count(&target).await
    }

    async fn sender_profile(&self, actor: ActorRef) -> Result<ActorProfile, DomainError> {
        self.directory
            .resolve(&actor)
            .await?
            .ok_or(DomainError::NotFound("acting user"))
    }
}

fn related_kind(kind: TargetKind) -> RelatedEntityKind {
    match kind {
        TargetKind::Post => RelatedEntityKind::Post,
        TargetKind::Comment => RelatedEntityKind::Comment,
        TargetKind::Tweet => RelatedEntityKind::Tweet,
        TargetKind::Package => RelatedEntityKind::Package,
    }
}

fn target_noun(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::Post => "post",
        TargetKind::Comment => "comment",
        TargetKind::Tweet => "tweet",
        TargetKind::Package => "package",
    }
}
