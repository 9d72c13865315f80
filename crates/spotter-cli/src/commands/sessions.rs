use std::path::Path;

use spotter_core::Session;

use crate::cli::SessionCommands;
use crate::commands::common::{
    format_session_line, format_weight, open_app, print_json, resolve_session, short_id,
};
use crate::error::CliError;

pub async fn run_sessions(
    command: SessionCommands,
    db_path: &Path,
    config_path: &Path,
) -> Result<(), CliError> {
    let mut app = open_app(db_path, config_path).await?;

    match command {
        SessionCommands::List { limit, mine, json } => {
            let active = if mine {
                Some(app.active_user()?.id.clone())
            } else {
                None
            };
            let sessions = app
                .service
                .sessions()
                .iter()
                .filter(|session| active.as_ref().map_or(true, |id| session.includes(id)))
                .take(limit)
                .collect::<Vec<_>>();

            if json {
                return print_json(&sessions);
            }
            if sessions.is_empty() {
                println!("No sessions logged yet.");
            }
            for session in sessions {
                println!("{}", format_session_line(session));
            }
        }
        SessionCommands::Show { id, json } => {
            let session = resolve_session(app.service.sessions(), &id)?;
            if json {
                return print_json(session);
            }
            for line in format_session_detail(session) {
                println!("{line}");
            }
        }
        SessionCommands::Delete { id, yes } => {
            let session_id = resolve_session(app.service.sessions(), &id)?.id.clone();
            app.service
                .delete_session(&session_id, yes)
                .await
                .map_err(CliError::from_core)?;
            println!("{session_id}");
        }
    }

    Ok(())
}

pub fn format_session_detail(session: &Session) -> Vec<String> {
    let mut lines = vec![format!(
        "{} session on {} ({}), logged by {}",
        session.body_part,
        session.date,
        short_id(session.id.as_str()),
        session.creator_name
    )];

    for participant in &session.participants {
        lines.push(format!("  {}", participant.user_name));
        for exercise in &participant.exercises {
            let sets = exercise
                .sets
                .iter()
                .map(|set| format!("{}x{}", format_weight(set.weight), set.reps))
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!("    {:<22} {sets}", exercise.exercise_name));
        }
        if let Some(notes) = &participant.notes {
            lines.push(format!("    notes: {notes}"));
        }
    }

    for reaction in &session.reactions {
        lines.push(format!(
            "  {} {} from {}: {}",
            reaction.emoji, reaction.category, reaction.user_name, reaction.gif_url
        ));
    }
    lines
}
