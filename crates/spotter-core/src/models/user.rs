//! User profile model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::is_http_url;

record_id!(
    /// A unique identifier for a user profile
    UserId
);

/// Avatar shown when a stored reference cannot be rendered.
pub const DEFAULT_AVATAR: &str = "/avatars/02e5ef8fa00e64c8881597fbf765ca2f.jpg";

/// Bundled avatar images offered during profile creation.
pub const AVATAR_PLACEHOLDERS: [&str; 11] = [
    "/avatars/02e5ef8fa00e64c8881597fbf765ca2f.jpg",
    "/avatars/299fc28ae92e1e843e4319083363e825.jpg",
    "/avatars/2a5f4eaede1285174c0cb0b249df1c98.jpg",
    "/avatars/3cf0aa86f56b7bcfddc362644d4ef210.jpg",
    "/avatars/40cff3ed-476f-4ce6-b872-fd1b30f45069.png",
    "/avatars/40f998422473229a7c81b590e807c92c.jpg",
    "/avatars/628c3490149109d308a446e326af4383.jpg",
    "/avatars/73189e5aa31ee8c27a4f8fc9797d1169.jpg",
    "/avatars/77f4329db91657a6bee5f5b7f1219abd.jpg",
    "/avatars/942159ec2ebd07dc6b8c9b9322087769.jpg",
    "/avatars/af11e634321a9c85671bc1fd0d55da60.jpg",
];

/// A member of a sync group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Image reference (local path or absolute URL)
    #[serde(default)]
    pub avatar: String,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh id
    #[must_use]
    pub fn new(name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            avatar: avatar.into(),
            created_at: Utc::now(),
        }
    }

    /// Avatar reference safe to render
    #[must_use]
    pub fn display_avatar(&self) -> &str {
        display_avatar(&self.avatar)
    }
}

/// Returns true when `src` is a local path or an absolute http(s) URL.
///
/// Protocol-relative references (`//host/...`) are not local paths.
pub fn is_valid_image_ref(src: &str) -> bool {
    let local_path = src.starts_with('/') && !src.starts_with("//");
    local_path || is_http_url(src)
}

/// Substitutes [`DEFAULT_AVATAR`] for references that cannot be rendered.
pub fn display_avatar(src: &str) -> &str {
    if is_valid_image_ref(src) {
        src
    } else {
        DEFAULT_AVATAR
    }
}
