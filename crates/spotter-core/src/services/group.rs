//! The sync group as seen from one device.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::db::LocalStateRepository;
use crate::editor::SessionDraft;
use crate::error::{Error, Result, ValidationError};
use crate::models::{
    available_exercises, catalog_exercises, CustomExerciseRegistry, CustomExerciseRow,
    LocalProfile, Reaction, ReactionPayload, Session, SessionId, User, UserId, AVATAR_PLACEHOLDERS,
};
use crate::store::{RecordStore, Resource};
use crate::sync::{
    ChangeEvent, ChangeHub, ChangeKind, RefreshGuard, RefreshOutcome, RefreshTicket, Subscription,
};
use crate::util::normalize_text_option;

/// Sessions fetched by [`GroupService::fetch_sessions`], not yet applied
#[derive(Debug)]
pub struct SessionBatch {
    ticket: RefreshTicket,
    sessions: Vec<Session>,
}

impl SessionBatch {
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Owns the device profile and the cached group data, and routes every write
/// through the record store before touching local state.
pub struct GroupService<S, L> {
    store: S,
    local: L,
    profile: LocalProfile,
    sessions: Vec<Session>,
    hub: ChangeHub,
    guard: RefreshGuard,
}

impl<S: RecordStore, L: LocalStateRepository> GroupService<S, L> {
    /// Start from the device profile saved in `local`
    pub async fn load(store: S, local: L) -> Result<Self> {
        let profile = local.load().await?;
        tracing::debug!(
            "Loaded local profile for {} ({} cached users)",
            profile.sync_code,
            profile.users.len()
        );
        Ok(Self::new(store, local, profile))
    }

    pub fn new(store: S, local: L, profile: LocalProfile) -> Self {
        Self {
            store,
            local,
            profile,
            sessions: Vec::new(),
            hub: ChangeHub::new(),
            guard: RefreshGuard::new(),
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn profile(&self) -> &LocalProfile {
        &self.profile
    }

    pub fn sync_code(&self) -> &str {
        &self.profile.sync_code
    }

    pub const fn current_user(&self) -> Option<&User> {
        self.profile.current_user.as_ref()
    }

    pub fn users(&self) -> &[User] {
        &self.profile.users
    }

    /// Cached sessions, newest first
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn session(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.iter().find(|session| &session.id == id)
    }

    pub const fn custom_exercises(&self) -> &CustomExerciseRegistry {
        &self.profile.custom_exercises
    }

    /// Guard shared with whoever owns the view; unmount it on teardown
    pub fn refresh_guard(&self) -> RefreshGuard {
        self.guard.clone()
    }

    /// Listen for this device's own writes to `resources`
    pub fn subscribe(&self, resources: &[Resource]) -> Subscription {
        self.hub.subscribe(self.profile.sync_code.clone(), resources)
    }

    fn require_user(&self) -> Result<&User> {
        self.profile
            .current_user
            .as_ref()
            .ok_or_else(|| ValidationError::NoActiveUser.into())
    }

    fn publish(&self, resource: Resource, kind: ChangeKind) {
        self.hub.publish(ChangeEvent::new(
            resource,
            self.profile.sync_code.clone(),
            kind,
        ));
    }

    async fn save_roster(&self) -> Result<()> {
        self.local.set_users(&self.profile.users).await?;
        self.local
            .set_current_user(self.profile.current_user.as_ref())
            .await
    }

    // Refetching

    /// Refetch users, sessions and custom exercises
    pub async fn refresh_all(&mut self) -> Result<RefreshOutcome<usize>> {
        self.refresh_users().await?;
        self.refresh_custom_exercises().await?;
        self.refresh_sessions().await
    }

    /// Replace the cached roster with the store's copy
    pub async fn refresh_users(&mut self) -> Result<usize> {
        let users = self.store.list_users(&self.profile.sync_code).await?;
        let count = users.len();
        if let Some(current) = self.profile.current_user.take() {
            // Pick up edits made elsewhere; keep the pointer if the roster lost them
            self.profile.current_user = Some(
                users
                    .iter()
                    .find(|user| user.id == current.id)
                    .cloned()
                    .unwrap_or(current),
            );
        }
        self.profile.users = users;
        self.save_roster().await?;
        tracing::debug!("Refreshed {count} users for {}", self.profile.sync_code);
        Ok(count)
    }

    pub async fn refresh_custom_exercises(&mut self) -> Result<usize> {
        let rows = self
            .store
            .list_custom_exercises(&self.profile.sync_code)
            .await?;
        let count = rows.len();
        self.profile.custom_exercises = CustomExerciseRegistry::from_rows(rows);
        self.local
            .set_custom_exercises(&self.profile.custom_exercises)
            .await?;
        Ok(count)
    }

    /// Fetch sessions with their reactions attached, without applying them
    pub async fn fetch_sessions(&self) -> Result<SessionBatch> {
        let ticket = self.guard.begin();
        let sync_code = &self.profile.sync_code;
        let mut sessions = self.store.list_sessions(sync_code).await?;
        let reactions = self.store.list_reactions(sync_code, None).await?;

        let mut by_session: HashMap<SessionId, Vec<Reaction>> = HashMap::new();
        for reaction in reactions {
            by_session
                .entry(reaction.session_id.clone())
                .or_default()
                .push(reaction);
        }
        for session in &mut sessions {
            session.reactions = by_session.remove(&session.id).unwrap_or_default();
        }

        Ok(SessionBatch { ticket, sessions })
    }

    /// Apply a fetched batch unless a newer refresh started or the view is gone
    pub fn apply_sessions(&mut self, batch: SessionBatch) -> RefreshOutcome<usize> {
        if !self.guard.is_current(batch.ticket) {
            tracing::warn!("Dropping stale session refresh ({} sessions)", batch.len());
            return RefreshOutcome::Stale;
        }
        let count = batch.sessions.len();
        self.sessions = batch.sessions;
        RefreshOutcome::Applied(count)
    }

    pub async fn refresh_sessions(&mut self) -> Result<RefreshOutcome<usize>> {
        let batch = self.fetch_sessions().await?;
        Ok(self.apply_sessions(batch))
    }

    /// Refetch whatever collection `event` names
    pub async fn handle_change(&mut self, event: &ChangeEvent) -> Result<()> {
        if event.channel.sync_code != self.profile.sync_code {
            return Ok(());
        }
        match event.resource() {
            Resource::Users => {
                self.refresh_users().await?;
            }
            Resource::CustomExercises => {
                self.refresh_custom_exercises().await?;
            }
            Resource::Sessions | Resource::Reactions => {
                if self.refresh_sessions().await?.is_stale() {
                    tracing::debug!("Ignored change on {} after unmount", event.channel);
                }
            }
        }
        Ok(())
    }

    // Profiles

    /// Create a profile in the group and act as it on this device
    pub async fn create_profile(&mut self, name: &str, avatar: Option<&str>) -> Result<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("profile name must not be empty".to_string()));
        }
        let avatar = normalize_text_option(avatar.map(ToString::to_string))
            .unwrap_or_else(|| AVATAR_PLACEHOLDERS[0].to_string());

        let user = User::new(name, avatar);
        self.store
            .insert_user(&self.profile.sync_code, &user)
            .await?;
        tracing::info!("Created profile {} ({})", user.name, user.id);

        self.profile.upsert_user(user.clone());
        self.profile.current_user = Some(user.clone());
        self.save_roster().await?;
        self.publish(Resource::Users, ChangeKind::Insert);
        Ok(user)
    }

    /// Act as an existing member of the group
    pub async fn select_profile(&mut self, id: &UserId) -> Result<&User> {
        let user = self
            .profile
            .user(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("user {id}")))?;
        self.local.set_current_user(Some(&user)).await?;
        tracing::info!("Acting as {} ({})", user.name, user.id);
        let user = &*self.profile.current_user.insert(user);
        Ok(user)
    }

    /// Rename a profile or change its avatar; `None` keeps the current avatar
    pub async fn edit_profile(
        &mut self,
        id: &UserId,
        name: &str,
        avatar: Option<&str>,
    ) -> Result<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("profile name must not be empty".to_string()));
        }
        let mut user = self
            .profile
            .user(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("user {id}")))?;
        user.name = name.to_string();
        if let Some(avatar) = normalize_text_option(avatar.map(ToString::to_string)) {
            user.avatar = avatar;
        }

        self.store
            .update_user(&self.profile.sync_code, &user)
            .await?;
        self.profile.upsert_user(user.clone());
        self.save_roster().await?;
        self.publish(Resource::Users, ChangeKind::Update);
        Ok(user)
    }

    /// Remove a profile from the group; past sessions keep their snapshots
    pub async fn delete_profile(&mut self, id: &UserId, confirmed: bool) -> Result<()> {
        if !confirmed {
            return Err(Error::ConfirmationRequired(format!("delete profile {id}")));
        }
        self.store
            .delete_user(&self.profile.sync_code, id)
            .await?;
        self.profile.remove_user(id);
        self.save_roster().await?;
        tracing::info!("Deleted profile {id}");
        self.publish(Resource::Users, ChangeKind::Delete);
        Ok(())
    }

    /// Stop acting as the current profile; the roster stays cached
    pub async fn switch_user(&mut self) -> Result<()> {
        self.profile.current_user = None;
        self.local.set_current_user(None).await
    }

    /// Join another sync group.
    ///
    /// Cached users, custom exercises and sessions belong to the old group and
    /// are dropped, as is the current profile. Returns false if already joined.
    pub async fn set_sync_code(&mut self, sync_code: &str) -> Result<bool> {
        let sync_code = sync_code.trim();
        if sync_code.is_empty() {
            return Err(Error::InvalidInput("sync code must not be empty".to_string()));
        }
        if sync_code == self.profile.sync_code {
            return Ok(false);
        }

        tracing::info!(
            "Switching sync group from {} to {sync_code}",
            self.profile.sync_code
        );
        self.profile = LocalProfile {
            sync_code: sync_code.to_string(),
            ..LocalProfile::default()
        };
        self.sessions.clear();
        // Results still in flight belong to the old group
        self.guard.begin();
        self.local.save(&self.profile).await?;
        Ok(true)
    }

    // Sessions

    /// Fresh draft dated `today` with the current profile as first participant
    pub fn new_draft(&self, today: NaiveDate) -> Result<SessionDraft> {
        Ok(SessionDraft::for_user(self.require_user()?, today))
    }

    /// Validate and store a draft; the cache only changes once the write succeeds
    pub async fn commit_session(&mut self, draft: &SessionDraft) -> Result<Session> {
        let session = draft.commit(&self.profile.sync_code, self.require_user()?)?;
        self.store.insert_session(&session).await?;
        tracing::info!(
            "Logged {} session {} on {}",
            session.body_part,
            session.id,
            session.date
        );

        let position = self
            .sessions
            .iter()
            .position(|existing| existing.date <= session.date)
            .unwrap_or(self.sessions.len());
        self.sessions.insert(position, session.clone());
        self.publish(Resource::Sessions, ChangeKind::Insert);
        Ok(session)
    }

    /// Delete a session created by the current profile
    pub async fn delete_session(&mut self, id: &SessionId, confirmed: bool) -> Result<()> {
        if !confirmed {
            return Err(Error::ConfirmationRequired(format!("delete session {id}")));
        }
        let actor = self.require_user()?;
        let session = self
            .session(id)
            .ok_or_else(|| Error::NotFound(format!("session {id}")))?;
        if !session.can_delete(&actor.id) {
            return Err(Error::PermissionDenied(format!(
                "session {id} was logged by {}",
                session.creator_name
            )));
        }

        self.store
            .delete_session(&self.profile.sync_code, id)
            .await?;
        self.sessions.retain(|session| &session.id != id);
        tracing::info!("Deleted session {id}");
        self.publish(Resource::Sessions, ChangeKind::Delete);
        Ok(())
    }

    // Exercises

    /// Catalog plus custom exercises for `body_part`
    pub fn available_exercises(&self, body_part: &str) -> Vec<String> {
        available_exercises(body_part, &self.profile.custom_exercises)
    }

    /// Register a custom exercise; returns false if the name already exists
    pub async fn add_custom_exercise(&mut self, body_part: &str, name: &str) -> Result<bool> {
        let body_part = body_part.trim();
        let name = name.trim();
        if body_part.is_empty() || name.is_empty() {
            return Err(Error::InvalidInput(
                "body part and exercise name are required".to_string(),
            ));
        }
        if catalog_exercises(body_part).contains(&name)
            || self.profile.custom_exercises.contains(body_part, name)
        {
            return Ok(false);
        }

        let row = CustomExerciseRow {
            body_part: body_part.to_string(),
            exercise_name: name.to_string(),
        };
        self.store
            .insert_custom_exercise(&self.profile.sync_code, &row)
            .await?;
        self.profile.custom_exercises.register(body_part, name);
        self.local
            .set_custom_exercises(&self.profile.custom_exercises)
            .await?;
        self.publish(Resource::CustomExercises, ChangeKind::Insert);
        Ok(true)
    }

    // Reactions

    /// Store a reaction from the current profile, then show it on the cached session
    pub async fn attach_reaction(
        &mut self,
        session_id: &SessionId,
        payload: ReactionPayload,
    ) -> Result<Reaction> {
        let reaction = Reaction::new(session_id.clone(), self.require_user()?, payload);
        self.store
            .insert_reaction(&self.profile.sync_code, &reaction)
            .await?;

        if let Some(session) = self
            .sessions
            .iter_mut()
            .find(|session| &session.id == session_id)
        {
            session.reactions.push(reaction.clone());
        }
        self.publish(Resource::Reactions, ChangeKind::Insert);
        Ok(reaction)
    }
}
