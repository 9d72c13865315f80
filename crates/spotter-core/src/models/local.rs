//! Device-local profile state

use serde::{Deserialize, Serialize};

use super::{CustomExerciseRegistry, User, UserId};

/// Sync code used until the device joins another group
pub const DEFAULT_SYNC_CODE: &str = "SHARED";

/// What this device remembers between runs.
///
/// The roster and custom exercises are caches; the record store holds the
/// authoritative copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalProfile {
    pub sync_code: String,
    /// The profile this device is acting as
    pub current_user: Option<User>,
    pub users: Vec<User>,
    pub custom_exercises: CustomExerciseRegistry,
}

impl Default for LocalProfile {
    fn default() -> Self {
        Self {
            sync_code: DEFAULT_SYNC_CODE.to_string(),
            current_user: None,
            users: Vec::new(),
            custom_exercises: CustomExerciseRegistry::default(),
        }
    }
}

impl LocalProfile {
    /// Look up a cached user
    #[must_use]
    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|user| &user.id == id)
    }

    /// Insert or replace a cached user, keeping the active pointer current
    pub fn upsert_user(&mut self, user: User) {
        if let Some(current) = self.current_user.as_mut() {
            if current.id == user.id {
                *current = user.clone();
            }
        }
        match self.users.iter_mut().find(|existing| existing.id == user.id) {
            Some(existing) => *existing = user,
            None => self.users.push(user),
        }
    }

    /// Drop a cached user; clears the active pointer if it referenced them.
    ///
    /// Returns true if the user was present in the roster.
    pub fn remove_user(&mut self, id: &UserId) -> bool {
        if self
            .current_user
            .as_ref()
            .is_some_and(|current| &current.id == id)
        {
            self.current_user = None;
        }
        let before = self.users.len();
        self.users.retain(|user| &user.id != id);
        before != self.users.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sync_code() {
        let profile = LocalProfile::default();
        assert_eq!(profile.sync_code, "SHARED");
        assert!(profile.current_user.is_none());
    }

    #[test]
    fn test_remove_current_user_clears_pointer() {
        let sam = User::new("Sam", "/avatars/a.jpg");
        let alex = User::new("Alex", "/avatars/b.jpg");
        let mut profile = LocalProfile {
            current_user: Some(sam.clone()),
            users: vec![sam.clone(), alex.clone()],
            ..LocalProfile::default()
        };

        assert!(profile.remove_user(&alex.id));
        assert_eq!(profile.current_user.as_ref(), Some(&sam));

        assert!(profile.remove_user(&sam.id));
        assert!(profile.current_user.is_none());
        assert!(profile.users.is_empty());
        assert!(!profile.remove_user(&sam.id));
    }

    #[test]
    fn test_upsert_refreshes_active_user() {
        let mut sam = User::new("Sam", "/avatars/a.jpg");
        let mut profile = LocalProfile {
            current_user: Some(sam.clone()),
            users: vec![sam.clone()],
            ..LocalProfile::default()
        };
        sam.name = "Samantha".to_string();
        profile.upsert_user(sam.clone());
        assert_eq!(profile.users.len(), 1);
        assert_eq!(profile.current_user.unwrap().name, "Samantha");
    }
}
