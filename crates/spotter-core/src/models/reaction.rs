//! Session reaction model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{SessionId, User, UserId};

record_id!(
    /// A unique identifier for a reaction
    ReactionId
);

/// What the reaction picker hands back once a GIF is chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionPayload {
    /// Category label or free-text search term
    pub category: String,
    pub emoji: String,
    pub gif_url: String,
    pub gif_id: String,
}

/// An emoji + GIF reaction attached to a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub id: ReactionId,
    pub session_id: SessionId,
    pub user_id: UserId,
    pub user_name: String,
    #[serde(default)]
    pub user_avatar: String,
    pub category: String,
    pub emoji: String,
    pub gif_url: String,
    pub gif_id: String,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    /// Build a reaction from `reactor` for `session_id`
    #[must_use]
    pub fn new(session_id: SessionId, reactor: &User, payload: ReactionPayload) -> Self {
        Self {
            id: ReactionId::new(),
            session_id,
            user_id: reactor.id.clone(),
            user_name: reactor.name.clone(),
            user_avatar: reactor.avatar.clone(),
            category: payload.category,
            emoji: payload.emoji,
            gif_url: payload.gif_url,
            gif_id: payload.gif_id,
            created_at: Utc::now(),
        }
    }
}
