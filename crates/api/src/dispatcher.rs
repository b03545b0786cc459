//! Secondary-effect dispatcher.
//!
//! Subscribes to the [`campus_events::EventBus`] and performs everything the
//! write path fires and forgets: mention rows, notifications of every kind,
//! and view-count increments. Any failure here is logged and dropped — the
//! primary operation already succeeded and must stay that way.

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use tokio_util::sync::CancellationToken;

use campus_core::forum::NotificationKind;
use campus_core::mentions::extract_mentions;
use campus_core::slug;
use campus_core::types::DbId;
use campus_db::models::notification::CreateNotification;
use campus_db::repositories::{MentionRepo, NotificationRepo, TopicRepo, UserRepo};
use campus_db::DbPool;
use campus_events::bus::{
    EVENT_POST_CREATED, EVENT_REACTION_ADDED, EVENT_SOLUTION_MARKED, EVENT_TOPIC_VIEWED,
    EVENT_WIKI_EDITED,
};
use campus_events::ForumEvent;

/// Consumes forum events and materializes their secondary effects.
pub struct Dispatcher {
    pool: DbPool,
    /// Mention candidates processed per post.
    mention_cap: usize,
}

impl Dispatcher {
    pub fn new(pool: DbPool, mention_cap: usize) -> Self {
        Self { pool, mention_cap }
    }

    /// Run until the bus closes or `cancel` fires.
    ///
    /// A lagged receiver drops the missed events and keeps going; losing a
    /// best-effort side effect is preferable to blocking the bus.
    pub async fn run(self, mut rx: Receiver<ForumEvent>, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                received = rx.recv() => match received {
                    Ok(event) => self.handle(event).await,
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "Dispatcher lagged; events dropped");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
        tracing::info!("Dispatcher stopped");
    }

    /// Dispatch one event; errors are logged and swallowed here and nowhere
    /// else, so every `on_*` handler can use `?` freely.
    async fn handle(&self, event: ForumEvent) {
        let result = match event.event_type.as_str() {
            EVENT_POST_CREATED => self.on_post_created(&event).await,
            EVENT_TOPIC_VIEWED => self.on_topic_viewed(&event).await,
            EVENT_REACTION_ADDED => self.on_reaction_added(&event).await,
            EVENT_SOLUTION_MARKED => self.on_solution_marked(&event).await,
            EVENT_WIKI_EDITED => self.on_wiki_edited(&event).await,
            other => {
                tracing::debug!(event_type = other, "Ignoring unknown event");
                Ok(())
            }
        };

        if let Err(err) = result {
            tracing::warn!(
                event_type = %event.event_type,
                error = %err,
                "Secondary effect failed; dropped"
            );
        }
    }

    /// Display name of the acting user, for notification titles.
    async fn actor_name(&self, actor_id: DbId) -> Result<String, sqlx::Error> {
        Ok(UserRepo::find_by_id(&self.pool, actor_id)
            .await?
            .map(|u| u.username)
            .unwrap_or_else(|| "Someone".to_string()))
    }

    /// Mentions and reply notifications for a new post.
    async fn on_post_created(&self, event: &ForumEvent) -> Result<(), sqlx::Error> {
        let (Some(topic_id), Some(post_id), Some(actor_id)) =
            (event.topic_id, event.post_id, event.actor_id)
        else {
            return Ok(());
        };

        let content = event.payload["content"].as_str().unwrap_or_default();
        let topic_title = event.payload["topic_title"].as_str().unwrap_or_default();
        let topic_author_id = event.payload["topic_author_id"].as_i64();
        let parent_author_id = event.payload["parent_author_id"].as_i64();

        let actor_name = self.actor_name(actor_id).await?;
        let snippet = slug::preview(content);

        // Mentions: case-insensitive resolution, self-mentions skipped,
        // inserts idempotent. A candidate that resolves to nobody is simply
        // ignored.
        for candidate in extract_mentions(content, self.mention_cap) {
            let Some(user) = UserRepo::find_by_username_ci(&self.pool, &candidate).await? else {
                continue;
            };
            if user.id == actor_id {
                continue;
            }
            let inserted = MentionRepo::insert(&self.pool, post_id, user.id, actor_id).await?;
            if inserted {
                NotificationRepo::create(
                    &self.pool,
                    &CreateNotification {
                        user_id: user.id,
                        kind: NotificationKind::Mention.as_str(),
                        topic_id: Some(topic_id),
                        post_id: Some(post_id),
                        actor_id: Some(actor_id),
                        title: format!("{actor_name} mentioned you in \"{topic_title}\""),
                        message: snippet.clone(),
                    },
                )
                .await?;
            }
        }

        // Reply notification to the topic author.
        if let Some(author_id) = topic_author_id {
            if author_id != actor_id {
                NotificationRepo::create(
                    &self.pool,
                    &CreateNotification {
                        user_id: author_id,
                        kind: NotificationKind::Reply.as_str(),
                        topic_id: Some(topic_id),
                        post_id: Some(post_id),
                        actor_id: Some(actor_id),
                        title: format!("{actor_name} replied to \"{topic_title}\""),
                        message: snippet.clone(),
                    },
                )
                .await?;
            }
        }

        // Threaded reply: the parent post's author, unless already covered.
        if let Some(parent_id) = parent_author_id {
            if parent_id != actor_id && Some(parent_id) != topic_author_id {
                NotificationRepo::create(
                    &self.pool,
                    &CreateNotification {
                        user_id: parent_id,
                        kind: NotificationKind::Reply.as_str(),
                        topic_id: Some(topic_id),
                        post_id: Some(post_id),
                        actor_id: Some(actor_id),
                        title: format!("{actor_name} replied to your post in \"{topic_title}\""),
                        message: snippet,
                    },
                )
                .await?;
            }
        }

        Ok(())
    }

    async fn on_topic_viewed(&self, event: &ForumEvent) -> Result<(), sqlx::Error> {
        let Some(topic_id) = event.topic_id else {
            return Ok(());
        };
        TopicRepo::increment_view_count(&self.pool, topic_id).await
    }

    async fn on_reaction_added(&self, event: &ForumEvent) -> Result<(), sqlx::Error> {
        let Some(actor_id) = event.actor_id else {
            return Ok(());
        };
        let Some(target_author_id) = event.payload["target_author_id"].as_i64() else {
            return Ok(());
        };
        if target_author_id == actor_id {
            return Ok(());
        }

        let kind = event.payload["kind"].as_str().unwrap_or("like");
        let actor_name = self.actor_name(actor_id).await?;
        let topic_title = self.topic_title(event.topic_id).await?;

        NotificationRepo::create(
            &self.pool,
            &CreateNotification {
                user_id: target_author_id,
                kind: NotificationKind::Reaction.as_str(),
                topic_id: event.topic_id,
                post_id: event.post_id,
                actor_id: Some(actor_id),
                title: format!("{actor_name} reacted with {kind} in \"{topic_title}\""),
                message: String::new(),
            },
        )
        .await?;
        Ok(())
    }

    async fn on_solution_marked(&self, event: &ForumEvent) -> Result<(), sqlx::Error> {
        let Some(actor_id) = event.actor_id else {
            return Ok(());
        };
        let Some(post_author_id) = event.payload["post_author_id"].as_i64() else {
            return Ok(());
        };
        if post_author_id == actor_id {
            return Ok(());
        }

        let topic_title = event.payload["topic_title"].as_str().unwrap_or_default();

        NotificationRepo::create(
            &self.pool,
            &CreateNotification {
                user_id: post_author_id,
                kind: NotificationKind::Solution.as_str(),
                topic_id: event.topic_id,
                post_id: event.post_id,
                actor_id: Some(actor_id),
                title: format!("Your reply was marked as the solution in \"{topic_title}\""),
                message: String::new(),
            },
        )
        .await?;
        Ok(())
    }

    async fn on_wiki_edited(&self, event: &ForumEvent) -> Result<(), sqlx::Error> {
        let Some(actor_id) = event.actor_id else {
            return Ok(());
        };
        let Some(topic_author_id) = event.payload["topic_author_id"].as_i64() else {
            return Ok(());
        };
        if topic_author_id == actor_id {
            return Ok(());
        }

        let topic_title = event.payload["topic_title"].as_str().unwrap_or_default();
        let actor_name = self.actor_name(actor_id).await?;

        NotificationRepo::create(
            &self.pool,
            &CreateNotification {
                user_id: topic_author_id,
                kind: NotificationKind::WikiEdit.as_str(),
                topic_id: event.topic_id,
                post_id: None,
                actor_id: Some(actor_id),
                title: format!("{actor_name} edited \"{topic_title}\""),
                message: String::new(),
            },
        )
        .await?;
        Ok(())
    }

    async fn topic_title(&self, topic_id: Option<DbId>) -> Result<String, sqlx::Error> {
        let Some(topic_id) = topic_id else {
            return Ok(String::new());
        };
        Ok(TopicRepo::find_by_id(&self.pool, topic_id)
            .await?
            .map(|t| t.title)
            .unwrap_or_default())
    }
}
