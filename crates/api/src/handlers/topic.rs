//! Handlers for the `/topics` resource: create, list, detail, patch, delete.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};

use campus_core::error::CoreError;
use campus_core::reactions::{self, ReactionKind, ReactionRow, ReactionSummary, ALL_KINDS};
use campus_core::trust::{TopicPermissions, TrustTier};
use campus_core::types::DbId;
use campus_core::{forum, slug};
use campus_db::models::category::Category;
use campus_db::models::post::PostWithAuthor;
use campus_db::models::reaction::{Reaction, TARGET_POST, TARGET_TOPIC};
use campus_db::models::tag::Tag;
use campus_db::models::topic::{CreateTopic, Topic, TopicListItem, TopicPatch, TopicSort};
use campus_db::repositories::{
    CategoryRepo, PostRepo, ReactionRepo, TagRepo, TopicListFilter, TopicRepo,
};
use campus_events::bus::EVENT_TOPIC_VIEWED;
use campus_events::ForumEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::permissions::{permissions_on, viewer_for};
use crate::query::clamp_limit;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

/* --------------------------------------------------------------------------
Query param and response types
-------------------------------------------------------------------------- */

#[derive(Debug, serde::Deserialize)]
pub struct ListTopicsParams {
    /// `last_activity_at` of the previous page's last item, RFC 3339.
    pub cursor: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, serde::Deserialize)]
pub struct GetTopicParams {
    /// Set to `false` to skip the view-count side effect.
    pub track_view: Option<bool>,
}

/// A created or patched topic together with its tags.
#[derive(Debug, serde::Serialize)]
pub struct TopicWithTags {
    #[serde(flatten)]
    pub topic: Topic,
    pub tags: Vec<Tag>,
}

/// One listing entry with its tags resolved.
#[derive(Debug, serde::Serialize)]
pub struct TopicListEntry {
    #[serde(flatten)]
    pub item: TopicListItem,
    pub tags: Vec<Tag>,
}

/// A post in a topic detail response.
#[derive(Debug, serde::Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: PostWithAuthor,
    pub author_tier: TrustTier,
    pub reactions: Vec<ReactionSummary>,
}

/// Full topic detail: topic, category, tags, posts, and the viewer's
/// per-request permissions.
#[derive(Debug, serde::Serialize)]
pub struct TopicDetail {
    #[serde(flatten)]
    pub topic: Topic,
    pub category: Option<Category>,
    pub tags: Vec<Tag>,
    pub reactions: Vec<ReactionSummary>,
    pub posts: Vec<PostDetail>,
    pub permissions: TopicPermissions,
}

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

/// An all-zero summary for targets with no reactions.
fn zero_summaries() -> Vec<ReactionSummary> {
    ALL_KINDS
        .iter()
        .map(|&kind| ReactionSummary {
            kind,
            count: 0,
            reacted: false,
        })
        .collect()
}

/// Convert raw reaction rows into summarizable form, dropping rows whose
/// kind is no longer recognized.
fn to_reaction_rows(rows: Vec<Reaction>) -> Vec<ReactionRow> {
    rows.into_iter()
        .filter_map(|r| {
            ReactionKind::parse(&r.kind).map(|kind| ReactionRow {
                user_id: r.user_id,
                target_id: r.target_id,
                kind,
            })
        })
        .collect()
}

/* --------------------------------------------------------------------------
Handlers
-------------------------------------------------------------------------- */

/// POST /topics
///
/// Create a topic. Tier-1 accounts are throttled; the slug is derived from
/// the title plus the creation instant, so no existence check is needed.
pub async fn create_topic(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTopic>,
) -> AppResult<impl IntoResponse> {
    forum::validate_title(&input.title).map_err(AppError::Core)?;
    forum::validate_content(&input.content).map_err(AppError::Core)?;
    forum::validate_tags(&input.tags).map_err(AppError::Core)?;

    if CategoryRepo::find_by_id(&state.pool, input.category_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown category {}",
            input.category_id
        ))));
    }

    let policy = &state.config.forum;
    let viewer = viewer_for(&state.pool, &policy.trust, &auth).await?;

    // Count-then-insert: a concurrent request from the same account can
    // slip one extra topic through the window. Accepted.
    let since = Utc::now() - policy.rate_limit.window();
    let recent = TopicRepo::count_recent_by_author(&state.pool, auth.user_id, since).await?;
    policy
        .rate_limit
        .check_topic(viewer.tier, recent)
        .map_err(AppError::Core)?;

    let now = Utc::now();
    let topic_slug = slug::unique_slug(&input.title, now);
    let preview = slug::preview(&input.content);

    let topic = TopicRepo::create(&state.pool, auth.user_id, &input, &topic_slug, &preview).await?;

    let mut tags = Vec::new();
    for name in &input.tags {
        let tag_slug = slug::slugify(name);
        if tag_slug.is_empty() {
            continue;
        }
        let tag = TagRepo::get_or_create(&state.pool, name.trim(), &tag_slug).await?;
        TagRepo::attach(&state.pool, topic.id, tag.id).await?;
        tags.push(tag);
    }

    tracing::info!(
        user_id = auth.user_id,
        topic_id = topic.id,
        slug = %topic.slug,
        "Topic created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: TopicWithTags { topic, tags },
        }),
    ))
}

/// GET /topics
///
/// Cursor-paginated listing. The cursor is the `last_activity_at` of the
/// previous page's last item; one extra row is fetched to answer has-more
/// without a count query. Public read.
pub async fn list_topics(
    State(state): State<AppState>,
    Query(params): Query<ListTopicsParams>,
) -> AppResult<impl IntoResponse> {
    let policy = &state.config.forum;

    let sort = match params.sort.as_deref() {
        None => TopicSort::default(),
        Some(raw) => TopicSort::parse(raw).ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!("Unknown sort '{raw}'")))
        })?,
    };

    let cursor = match params.cursor.as_deref() {
        None => None,
        Some(raw) => Some(
            DateTime::parse_from_rfc3339(raw)
                .map_err(|_| AppError::Core(CoreError::Validation("Invalid cursor".into())))?
                .with_timezone(&Utc),
        ),
    };

    let limit = clamp_limit(params.limit, policy.default_page_size, policy.max_page_size);
    let filter = TopicListFilter {
        cursor,
        category: params.category,
        tag: params.tag,
        sort,
        limit,
    };

    let mut rows = TopicRepo::list(&state.pool, &filter).await?;
    let has_more = rows.len() as i64 > limit;
    if has_more {
        rows.truncate(limit as usize);
    }
    let next_cursor = if has_more {
        rows.last().map(|t| t.last_activity_at.to_rfc3339())
    } else {
        None
    };

    // One batch query covers the whole page's tags.
    let ids: Vec<DbId> = rows.iter().map(|t| t.id).collect();
    let mut tags_by_topic: HashMap<DbId, Vec<Tag>> = HashMap::new();
    for tt in TagRepo::list_for_topics(&state.pool, &ids).await? {
        tags_by_topic.entry(tt.topic_id).or_default().push(Tag {
            id: tt.id,
            name: tt.name,
            slug: tt.slug,
        });
    }

    let data = rows
        .into_iter()
        .map(|item| {
            let tags = tags_by_topic.remove(&item.id).unwrap_or_default();
            TopicListEntry { item, tags }
        })
        .collect();

    Ok(Json(PageResponse { data, next_cursor }))
}

/// GET /topics/{id_or_slug}
///
/// Topic detail with posts, per-post reaction summaries, author trust
/// tiers, and the viewer's permissions. The view counter increments as a
/// fire-and-forget side effect unless `?track_view=false`.
pub async fn get_topic(
    OptionalAuthUser(auth): OptionalAuthUser,
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
    Query(params): Query<GetTopicParams>,
) -> AppResult<impl IntoResponse> {
    let topic = TopicRepo::find_by_id_or_slug(&state.pool, &id_or_slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Topic '{id_or_slug}' not found")))?;

    let policy = &state.config.forum;
    let viewer = match &auth {
        Some(a) => Some(viewer_for(&state.pool, &policy.trust, a).await?),
        None => None,
    };
    let permissions = permissions_on(viewer.as_ref(), &topic);
    let viewer_id = viewer.as_ref().map(|v| v.user_id);

    let category = CategoryRepo::find_by_id(&state.pool, topic.category_id).await?;
    let tags = TagRepo::list_for_topic(&state.pool, topic.id).await?;
    let posts = PostRepo::list_by_topic(&state.pool, topic.id).await?;

    // Single batch fetch covering all posts, partitioned in memory.
    let post_ids: Vec<DbId> = posts.iter().map(|p| p.id).collect();
    let post_rows =
        to_reaction_rows(ReactionRepo::list_for_targets(&state.pool, TARGET_POST, &post_ids).await?);
    let mut post_summaries = reactions::summarize(&post_rows, viewer_id);

    let topic_rows = to_reaction_rows(
        ReactionRepo::list_for_targets(&state.pool, TARGET_TOPIC, &[topic.id]).await?,
    );
    let mut topic_summaries = reactions::summarize(&topic_rows, viewer_id);

    let posts: Vec<PostDetail> = posts
        .into_iter()
        .map(|p| PostDetail {
            author_tier: policy.trust.tier_for_level(p.author_level),
            reactions: post_summaries.remove(&p.id).unwrap_or_else(zero_summaries),
            post: p,
        })
        .collect();

    if params.track_view.unwrap_or(true) {
        state
            .events
            .publish(ForumEvent::new(EVENT_TOPIC_VIEWED).with_topic(topic.id));
    }

    Ok(Json(DataResponse {
        data: TopicDetail {
            reactions: topic_summaries
                .remove(&topic.id)
                .unwrap_or_else(zero_summaries),
            topic,
            category,
            tags,
            posts,
            permissions,
        },
    }))
}

/// PATCH /topics/{id}
///
/// Patch title/content (author) or moderation flags (moderator). Rejects a
/// patch carrying no recognized field.
pub async fn update_topic(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<TopicPatch>,
) -> AppResult<impl IntoResponse> {
    if patch.is_empty() {
        return Err(AppError::BadRequest("No valid fields to update".into()));
    }

    let topic = TopicRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Topic",
            id,
        }))?;

    let policy = &state.config.forum;
    let viewer = viewer_for(&state.pool, &policy.trust, &auth).await?;
    let perms = permissions_on(Some(&viewer), &topic);

    if patch.has_content_fields() && !perms.can_edit {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the topic author can edit title or content".into(),
        )));
    }
    if patch.has_moderation_fields() && !perms.can_moderate {
        return Err(AppError::Core(CoreError::Forbidden(
            "Moderation flags require moderator privileges".into(),
        )));
    }

    if let Some(ref title) = patch.title {
        forum::validate_title(title).map_err(AppError::Core)?;
    }
    if let Some(ref content) = patch.content {
        forum::validate_content(content).map_err(AppError::Core)?;
    }

    // The preview is stored, not recomputed on reads, so a content change
    // regenerates it here. The slug never changes on title edits.
    let preview = patch.content.as_deref().map(slug::preview);

    let updated = TopicRepo::update(&state.pool, id, &patch, preview.as_deref())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Topic",
            id,
        }))?;

    tracing::info!(user_id = auth.user_id, topic_id = id, "Topic updated");

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /topics/{id}
///
/// Delete a topic and every dependent row. Author or moderator only.
pub async fn delete_topic(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let topic = TopicRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Topic",
            id,
        }))?;

    let policy = &state.config.forum;
    let viewer = viewer_for(&state.pool, &policy.trust, &auth).await?;
    let perms = permissions_on(Some(&viewer), &topic);

    if viewer.user_id != topic.author_id && !perms.can_moderate {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the topic author or a moderator can delete a topic".into(),
        )));
    }

    TopicRepo::delete(&state.pool, id).await?;

    tracing::info!(user_id = auth.user_id, topic_id = id, "Topic deleted");

    Ok(StatusCode::NO_CONTENT)
}
