use std::path::Path;

use spotter_core::models::BODY_PARTS;

use crate::cli::ExerciseCommands;
use crate::commands::common::{open_app, Service};
use crate::error::CliError;

pub async fn run_exercises(
    command: ExerciseCommands,
    db_path: &Path,
    config_path: &Path,
) -> Result<(), CliError> {
    let mut app = open_app(db_path, config_path).await?;

    match command {
        ExerciseCommands::List { body_part } => {
            for line in format_exercise_lines(&app.service, body_part.as_deref()) {
                println!("{line}");
            }
        }
        ExerciseCommands::Add { body_part, name } => {
            let added = app
                .service
                .add_custom_exercise(&body_part, &name)
                .await
                .map_err(CliError::from_core)?;
            if added {
                println!("Added {} to {}", name.trim(), body_part.trim());
            } else {
                println!("{} already exists for {}", name.trim(), body_part.trim());
            }
        }
    }
    Ok(())
}

fn format_exercise_lines(service: &Service, body_part: Option<&str>) -> Vec<String> {
    let custom = service.custom_exercises();
    let body_parts: Vec<String> = match body_part {
        Some(part) => vec![part.trim().to_string()],
        None => BODY_PARTS
            .iter()
            .map(ToString::to_string)
            .chain(
                custom
                    .iter()
                    .map(|(part, _)| part)
                    .filter(|part| !BODY_PARTS.iter().any(|known| known == part))
                    .map(ToString::to_string),
            )
            .collect(),
    };

    let mut lines = Vec::new();
    for part in &body_parts {
        lines.push(format!("{part}:"));
        for name in service.available_exercises(part) {
            let marker = if custom.contains(part, &name) {
                " (custom)"
            } else {
                ""
            };
            lines.push(format!("  {name}{marker}"));
        }
    }
    lines
}
