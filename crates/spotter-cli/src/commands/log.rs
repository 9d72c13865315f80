use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use spotter_core::editor::SessionDraft;
use spotter_core::User;

use crate::commands::common::{format_weight, open_app, parse_date, resolve_user, short_id};
use crate::error::CliError;

/// One `--set` argument: `[PROFILE@]EXERCISE=WEIGHTxREPS[,WEIGHTxREPS...]`
#[derive(Debug, Clone, PartialEq)]
pub struct SetSpec {
    pub participant: Option<String>,
    pub exercise: String,
    pub sets: Vec<(f64, u32)>,
}

pub fn parse_set_spec(raw: &str) -> Result<SetSpec, CliError> {
    let invalid = || CliError::InvalidSetSpec(raw.to_string());
    let (target, sets) = raw.split_once('=').ok_or_else(invalid)?;
    let (participant, exercise) = match target.split_once('@') {
        Some((participant, exercise)) => (Some(participant.trim()), exercise.trim()),
        None => (None, target.trim()),
    };
    if exercise.is_empty() || participant.is_some_and(str::is_empty) {
        return Err(invalid());
    }

    let sets = sets
        .split(',')
        .map(|set| {
            let (weight, reps) = set
                .trim()
                .split_once(['x', 'X', '×'])
                .ok_or_else(invalid)?;
            let weight = weight.trim().parse::<f64>().map_err(|_| invalid())?;
            let reps = reps.trim().parse::<u32>().map_err(|_| invalid())?;
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid());
            }
            Ok((weight, reps))
        })
        .collect::<Result<Vec<_>, CliError>>()?;

    Ok(SetSpec {
        participant: participant.map(ToString::to_string),
        exercise: exercise.to_string(),
        sets,
    })
}

/// Parsed `spotter log` arguments
#[derive(Debug, Clone)]
pub struct LogRequest {
    pub date: NaiveDate,
    pub body_part: String,
    pub exercises: Vec<String>,
    pub sets: Vec<SetSpec>,
    pub partners: Vec<String>,
    pub notes: Option<String>,
}

/// Fill a draft for `active` from the command line.
///
/// Participants are the active profile followed by each partner; sets
/// without a `PROFILE@` prefix belong to the active profile.
pub fn build_draft(
    active: &User,
    roster: &[User],
    request: &LogRequest,
) -> Result<SessionDraft, CliError> {
    let mut draft = SessionDraft::for_user(active, request.date);
    draft.set_body_part(&request.body_part);

    let mut participants = vec![active.clone()];
    for partner in &request.partners {
        let user = resolve_user(roster, partner)?;
        if participants.iter().any(|existing| existing.id == user.id) {
            continue;
        }
        let index = draft.add_participant();
        draft.select_participant(index, &user)?;
        participants.push(user);
    }

    for name in request
        .exercises
        .iter()
        .chain(request.sets.iter().map(|spec| &spec.exercise))
    {
        draft.add_exercise(name);
    }

    let mut filled: HashMap<(usize, usize), usize> = HashMap::new();
    for spec in &request.sets {
        let participant = match &spec.participant {
            None => 0,
            Some(name) => {
                let user = resolve_user(&participants, name)
                    .map_err(|_| CliError::UnknownParticipant(name.clone()))?;
                participants
                    .iter()
                    .position(|existing| existing.id == user.id)
                    .unwrap_or_default()
            }
        };
        let exercise = draft
            .exercise_names()
            .iter()
            .position(|name| name == &spec.exercise)
            .ok_or_else(|| CliError::InvalidSetSpec(spec.exercise.clone()))?;

        let used = filled.entry((participant, exercise)).or_insert(0);
        for &(weight, reps) in &spec.sets {
            // Every exercise starts with one blank set
            if *used > 0 {
                draft.add_set(participant, exercise)?;
            }
            draft.update_set(participant, exercise, *used, weight, reps)?;
            *used += 1;
        }
    }

    if let Some(notes) = &request.notes {
        draft.set_notes(0, notes)?;
    }
    Ok(draft)
}

pub async fn run_log(
    request: LogRequest,
    db_path: &Path,
    config_path: &Path,
) -> Result<(), CliError> {
    let mut app = open_app(db_path, config_path).await?;
    let active = app.active_user()?.clone();
    let draft = build_draft(&active, app.service.users(), &request)?;
    let session = app
        .service
        .commit_session(&draft)
        .await
        .map_err(CliError::from_core)?;

    println!(
        "Logged {} session {} on {}",
        session.body_part,
        short_id(session.id.as_str()),
        session.date
    );
    for participant in &session.participants {
        for exercise in &participant.exercises {
            println!(
                "  {:<12} {:<20} max {} kg, volume {} kg",
                participant.user_name,
                exercise.exercise_name,
                format_weight(exercise.max_weight()),
                format_weight(exercise.total_volume())
            );
        }
    }
    Ok(())
}

pub fn log_request(
    date: Option<&str>,
    today: NaiveDate,
    body_part: String,
    exercises: Vec<String>,
    sets: &[String],
    partners: Vec<String>,
    notes: Option<String>,
) -> Result<LogRequest, CliError> {
    Ok(LogRequest {
        date: parse_date(date, today)?,
        body_part,
        exercises,
        sets: sets
            .iter()
            .map(|raw| parse_set_spec(raw))
            .collect::<Result<_, _>>()?,
        partners,
        notes,
    })
}
