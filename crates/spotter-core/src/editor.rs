//! Draft builder for a new gym session.
//!
//! A [`SessionDraft`] keeps one list of shared exercise names and one entry
//! per participant. Every participant always holds exactly one exercise
//! entry per shared name, in the same order, and every exercise keeps at
//! least one set numbered contiguously from 1.

use chrono::{NaiveDate, Utc};

use crate::error::{Error, Result, ValidationError};
use crate::models::{
    Exercise, ExerciseSet, ParticipantData, Session, SessionId, User, UserId, DEFAULT_AVATAR,
};
use crate::util::normalize_text_option;

/// A participant row of a draft; identity stays empty until a user is picked
#[derive(Debug, Clone, PartialEq)]
pub struct DraftParticipant {
    pub user_id: Option<UserId>,
    pub user_name: String,
    pub user_avatar: String,
    pub exercises: Vec<Exercise>,
    pub notes: String,
}

impl DraftParticipant {
    fn blank(exercise_names: &[String]) -> Self {
        Self {
            user_id: None,
            user_name: String::new(),
            user_avatar: DEFAULT_AVATAR.to_string(),
            exercises: exercise_names.iter().map(Exercise::new).collect(),
            notes: String::new(),
        }
    }

    fn assign(&mut self, user: &User) {
        self.user_id = Some(user.id.clone());
        self.user_name.clone_from(&user.name);
        self.user_avatar.clone_from(&user.avatar);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionDraft {
    date: Option<NaiveDate>,
    body_part: String,
    exercise_names: Vec<String>,
    participants: Vec<DraftParticipant>,
}

impl SessionDraft {
    /// A fresh draft dated `date` whose first participant is `user`
    pub fn for_user(user: &User, date: NaiveDate) -> Self {
        let mut first = DraftParticipant::blank(&[]);
        first.assign(user);
        Self {
            date: Some(date),
            body_part: String::new(),
            exercise_names: Vec::new(),
            participants: vec![first],
        }
    }

    pub const fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn body_part(&self) -> &str {
        &self.body_part
    }

    /// Shared exercise names in insertion order
    pub fn exercise_names(&self) -> &[String] {
        &self.exercise_names
    }

    pub fn participants(&self) -> &[DraftParticipant] {
        &self.participants
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = Some(date);
    }

    pub fn set_body_part(&mut self, body_part: &str) {
        body_part.trim().clone_into(&mut self.body_part);
    }

    /// Append a participant with no identity and one blank set per shared
    /// exercise. Returns its index.
    pub fn add_participant(&mut self) -> usize {
        self.participants
            .push(DraftParticipant::blank(&self.exercise_names));
        self.participants.len() - 1
    }

    /// Copy `user`'s identity into the participant at `index`
    pub fn select_participant(&mut self, index: usize, user: &User) -> Result<()> {
        self.participant_mut(index)?.assign(user);
        Ok(())
    }

    /// Remove the participant at `index`.
    ///
    /// Returns false without changing anything when the index is out of range
    /// or the participant is the only one left.
    pub fn remove_participant(&mut self, index: usize) -> bool {
        if self.participants.len() <= 1 || index >= self.participants.len() {
            return false;
        }
        self.participants.remove(index);
        true
    }

    /// Add `name` to the shared list and a blank entry for it to every
    /// participant. Empty and already-present names are ignored.
    pub fn add_exercise(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.exercise_names.iter().any(|n| n == name) {
            return false;
        }
        self.exercise_names.push(name.to_string());
        for participant in &mut self.participants {
            participant.exercises.push(Exercise::new(name));
        }
        true
    }

    /// Drop `name` from the shared list and from every participant
    pub fn remove_exercise(&mut self, name: &str) -> bool {
        let before = self.exercise_names.len();
        self.exercise_names.retain(|n| n != name);
        if self.exercise_names.len() == before {
            return false;
        }
        for participant in &mut self.participants {
            participant
                .exercises
                .retain(|exercise| exercise.exercise_name != name);
        }
        true
    }

    /// Append a blank set and return its set number
    pub fn add_set(&mut self, participant: usize, exercise: usize) -> Result<u32> {
        let exercise = self.exercise_mut(participant, exercise)?;
        let set_number = u32::try_from(exercise.sets.len() + 1).unwrap_or(u32::MAX);
        exercise.sets.push(ExerciseSet::blank(set_number));
        Ok(set_number)
    }

    /// Remove one set and renumber the rest.
    ///
    /// Removing the last remaining set leaves a single blank set behind.
    pub fn remove_set(&mut self, participant: usize, exercise: usize, set: usize) -> Result<()> {
        let exercise = self.exercise_mut(participant, exercise)?;
        if set >= exercise.sets.len() {
            return Err(Error::InvalidInput(format!("no set at index {set}")));
        }
        exercise.sets.remove(set);
        if exercise.sets.is_empty() {
            exercise.sets.push(ExerciseSet::blank(1));
        }
        exercise.renumber_sets();
        Ok(())
    }

    pub fn update_set(
        &mut self,
        participant: usize,
        exercise: usize,
        set: usize,
        weight: f64,
        reps: u32,
    ) -> Result<()> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidInput(format!(
                "weight must be a non-negative number, got {weight}"
            )));
        }
        let entry = self
            .exercise_mut(participant, exercise)?
            .sets
            .get_mut(set)
            .ok_or_else(|| Error::InvalidInput(format!("no set at index {set}")))?;
        entry.weight = weight;
        entry.reps = reps;
        Ok(())
    }

    pub fn set_notes(&mut self, participant: usize, notes: &str) -> Result<()> {
        notes.clone_into(&mut self.participant_mut(participant)?.notes);
        Ok(())
    }

    /// Validate the draft and stamp it into a [`Session`] created by `creator`.
    ///
    /// The draft is left untouched so a failed write can be retried.
    pub fn commit(&self, sync_code: &str, creator: &User) -> Result<Session> {
        let date = self.date.ok_or(ValidationError::MissingDate)?;
        if self.body_part.is_empty() {
            return Err(ValidationError::MissingBodyPart.into());
        }
        if self.participants.is_empty() {
            return Err(ValidationError::NoParticipants.into());
        }

        let participants = self
            .participants
            .iter()
            .enumerate()
            .map(|(index, participant)| -> Result<ParticipantData> {
                let user_id = participant
                    .user_id
                    .clone()
                    .ok_or(ValidationError::MissingParticipant(index + 1))?;
                Ok(ParticipantData {
                    user_id,
                    user_name: participant.user_name.clone(),
                    user_avatar: participant.user_avatar.clone(),
                    exercises: participant.exercises.clone(),
                    notes: normalize_text_option(Some(participant.notes.clone())),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Session {
            id: SessionId::new(),
            sync_code: sync_code.to_string(),
            created_by: creator.id.clone(),
            creator_name: creator.name.clone(),
            creator_avatar: creator.avatar.clone(),
            date,
            body_part: self.body_part.clone(),
            participants,
            reactions: Vec::new(),
            created_at: Utc::now(),
        })
    }

    fn participant_mut(&mut self, index: usize) -> Result<&mut DraftParticipant> {
        self.participants
            .get_mut(index)
            .ok_or_else(|| Error::InvalidInput(format!("no participant at index {index}")))
    }

    fn exercise_mut(&mut self, participant: usize, exercise: usize) -> Result<&mut Exercise> {
        self.participant_mut(participant)?
            .exercises
            .get_mut(exercise)
            .ok_or_else(|| Error::InvalidInput(format!("no exercise at index {exercise}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::exercises_for_user;
    use pretty_assertions::assert_eq;

    fn user(id: &str, name: &str) -> User {
        User {
            id: id.parse().unwrap(),
            name: name.to_string(),
            avatar: format!("/avatars/{id}.jpg"),
            created_at: Utc::now(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn assert_symmetric(draft: &SessionDraft) {
        for participant in draft.participants() {
            let names: Vec<&str> = participant
                .exercises
                .iter()
                .map(|e| e.exercise_name.as_str())
                .collect();
            let shared: Vec<&str> = draft.exercise_names().iter().map(String::as_str).collect();
            assert_eq!(names, shared);
        }
    }

    fn set_numbers(draft: &SessionDraft, participant: usize, exercise: usize) -> Vec<u32> {
        draft.participants()[participant].exercises[exercise]
            .sets
            .iter()
            .map(|s| s.set_number)
            .collect()
    }

    #[test]
    fn fresh_draft_starts_with_active_user() {
        let sam = user("sam", "Sam");
        let draft = SessionDraft::for_user(&sam, today());
        assert_eq!(draft.participants().len(), 1);
        assert_eq!(draft.participants()[0].user_id, Some(sam.id));
        assert_eq!(draft.date(), Some(today()));
    }

    #[test]
    fn exercises_stay_in_sync_across_participants() {
        let sam = user("sam", "Sam");
        let mut draft = SessionDraft::for_user(&sam, today());
        assert!(draft.add_exercise("Bench Press"));
        draft.add_participant();
        assert!(draft.add_exercise(" Chest Fly "));
        assert_symmetric(&draft);
        assert_eq!(draft.participants()[1].exercises[0].sets.len(), 1);

        assert!(!draft.add_exercise("Bench Press"));
        assert!(!draft.add_exercise("  "));
        assert!(draft.remove_exercise("Bench Press"));
        assert!(!draft.remove_exercise("Bench Press"));
        assert_symmetric(&draft);
        assert_eq!(draft.exercise_names(), ["Chest Fly".to_string()]);
    }

    #[test]
    fn removing_a_set_renumbers_the_rest() {
        let sam = user("sam", "Sam");
        let mut draft = SessionDraft::for_user(&sam, today());
        draft.add_exercise("Squat");
        assert_eq!(draft.add_set(0, 0).unwrap(), 2);
        assert_eq!(draft.add_set(0, 0).unwrap(), 3);

        draft.remove_set(0, 0, 0).unwrap();
        assert_eq!(set_numbers(&draft, 0, 0), vec![1, 2]);
    }

    #[test]
    fn removing_the_only_set_leaves_a_blank_one() {
        let sam = user("sam", "Sam");
        let mut draft = SessionDraft::for_user(&sam, today());
        draft.add_exercise("Squat");
        draft.update_set(0, 0, 0, 100.0, 5).unwrap();
        draft.remove_set(0, 0, 0).unwrap();

        let sets = &draft.participants()[0].exercises[0].sets;
        assert_eq!(sets, &vec![ExerciseSet::blank(1)]);
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let sam = user("sam", "Sam");
        let mut draft = SessionDraft::for_user(&sam, today());
        draft.add_exercise("Squat");
        assert!(matches!(draft.add_set(3, 0), Err(Error::InvalidInput(_))));
        assert!(matches!(draft.remove_set(0, 0, 4), Err(Error::InvalidInput(_))));
        assert!(matches!(
            draft.update_set(0, 0, 0, -5.0, 1),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            draft.update_set(0, 0, 0, f64::NAN, 1),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn last_participant_cannot_be_removed() {
        let sam = user("sam", "Sam");
        let mut draft = SessionDraft::for_user(&sam, today());
        assert!(!draft.remove_participant(0));
        draft.add_participant();
        assert!(!draft.remove_participant(5));
        assert!(draft.remove_participant(1));
        assert_eq!(draft.participants().len(), 1);
    }

    #[test]
    fn commit_requires_body_part_and_identities() {
        let sam = user("sam", "Sam");
        let mut draft = SessionDraft::for_user(&sam, today());
        assert!(matches!(
            draft.commit("SHARED", &sam),
            Err(Error::Validation(ValidationError::MissingBodyPart))
        ));

        draft.set_body_part("Legs");
        draft.add_participant();
        assert!(matches!(
            draft.commit("SHARED", &sam),
            Err(Error::Validation(ValidationError::MissingParticipant(2)))
        ));

        let empty = SessionDraft::default();
        assert!(matches!(
            empty.commit("SHARED", &sam),
            Err(Error::Validation(ValidationError::MissingDate))
        ));
    }

    #[test]
    fn committed_session_round_trips_through_analytics() {
        let sam = user("sam", "Sam");
        let alex = user("alex", "Alex");
        let mut draft = SessionDraft::for_user(&sam, today());
        draft.set_body_part("Legs");
        draft.add_exercise("Squat");
        draft.add_exercise("Lunges");
        let second = draft.add_participant();
        draft.select_participant(second, &alex).unwrap();
        draft.update_set(second, 0, 0, 140.0, 3).unwrap();
        draft.set_notes(0, "  felt strong ").unwrap();

        let session = draft.commit("SHARED", &sam).unwrap();
        assert_eq!(session.created_by, sam.id);
        assert_eq!(session.creator_name, "Sam");
        assert_eq!(session.participants[1].user_name, "Alex");
        assert_eq!(session.participants[0].notes.as_deref(), Some("felt strong"));
        assert_eq!(session.participants[1].notes, None);

        let sessions = vec![session];
        for who in [&sam.id, &alex.id] {
            let names: Vec<String> = exercises_for_user(&sessions, who).into_iter().collect();
            assert_eq!(names, vec!["Lunges".to_string(), "Squat".to_string()]);
        }
    }
}
