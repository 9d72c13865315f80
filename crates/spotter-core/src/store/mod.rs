//! Record store seam shared by the hosted and local backends

mod supabase;

pub use supabase::SupabaseRecordStore;

use std::fmt;

use crate::error::Result;
use crate::models::{CustomExerciseRow, Reaction, Session, SessionId, User, UserId};

/// A collection of the record store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    Users,
    Sessions,
    CustomExercises,
    Reactions,
}

impl Resource {
    pub const ALL: [Self; 4] = [
        Self::Users,
        Self::Sessions,
        Self::CustomExercises,
        Self::Reactions,
    ];

    /// Logical collection name, also used for change channels
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Sessions => "sessions",
            Self::CustomExercises => "custom_exercises",
            Self::Reactions => "reactions",
        }
    }

    /// Table name in the hosted database
    pub const fn remote_table(self) -> &'static str {
        match self {
            Self::Users => "shared_users",
            Self::Sessions => "shared_sessions",
            Self::CustomExercises => "shared_custom_exercises",
            Self::Reactions => "shared_reactions",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

impl std::str::FromStr for Resource {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|resource| resource.collection() == s.trim())
            .ok_or_else(|| crate::Error::InvalidInput(format!("unknown resource: {s}")))
    }
}

/// Async access to the shared collections.
///
/// Every call is scoped by sync code. Writes are not retried; a failed write
/// leaves the store unchanged from the caller's point of view.
#[allow(async_fn_in_trait)]
pub trait RecordStore {
    async fn list_users(&self, sync_code: &str) -> Result<Vec<User>>;

    async fn insert_user(&self, sync_code: &str, user: &User) -> Result<()>;

    /// Replace a user's name and avatar
    async fn update_user(&self, sync_code: &str, user: &User) -> Result<()>;

    async fn delete_user(&self, sync_code: &str, id: &UserId) -> Result<()>;

    /// Sessions newest first: by date, then by creation time
    async fn list_sessions(&self, sync_code: &str) -> Result<Vec<Session>>;

    async fn insert_session(&self, session: &Session) -> Result<()>;

    async fn delete_session(&self, sync_code: &str, id: &SessionId) -> Result<()>;

    async fn list_custom_exercises(&self, sync_code: &str) -> Result<Vec<CustomExerciseRow>>;

    async fn insert_custom_exercise(&self, sync_code: &str, row: &CustomExerciseRow) -> Result<()>;

    /// Reactions oldest first, optionally for one session only
    async fn list_reactions(
        &self,
        sync_code: &str,
        session_id: Option<&SessionId>,
    ) -> Result<Vec<Reaction>>;

    async fn insert_reaction(&self, sync_code: &str, reaction: &Reaction) -> Result<()>;
}
