use std::path::Path;
use std::time::Duration;

use spotter_core::store::Resource;
use spotter_core::sync::{ChangeEvent, ChangeWatcher};

use crate::commands::common::{format_session_line, open_app, Service};
use crate::error::CliError;

pub async fn run_watch(
    interval_secs: u64,
    db_path: &Path,
    config_path: &Path,
) -> Result<(), CliError> {
    let mut app = open_app(db_path, config_path).await?;
    let store = app.service.store().clone();
    let mut watcher = ChangeWatcher::new(app.service.sync_code(), &Resource::ALL)
        .with_interval(Duration::from_secs(interval_secs.max(1)));

    println!(
        "Watching sync group {} (Ctrl+C to stop)",
        app.service.sync_code()
    );
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            events = watcher.next(&store) => match events {
                Ok(events) => {
                    for line in apply_changes(&mut app.service, &events).await {
                        println!("{line}");
                    }
                }
                Err(error) => tracing::warn!("Polling {} failed: {error}", app.service.sync_code()),
            },
        }
    }
    Ok(())
}

/// Refetch for each event and describe the result; failed refetches are
/// logged and skipped
pub async fn apply_changes(service: &mut Service, events: &[ChangeEvent]) -> Vec<String> {
    let mut lines = Vec::new();
    for event in events {
        match service.handle_change(event).await {
            Ok(()) => lines.push(describe_change(event, service)),
            Err(error) => tracing::warn!("Refetching {} failed: {error}", event.channel),
        }
    }
    lines
}

pub fn describe_change(event: &ChangeEvent, service: &Service) -> String {
    match event.resource() {
        Resource::Users => format!("{}: {} profiles", event.channel, service.users().len()),
        Resource::CustomExercises => {
            let count = service
                .custom_exercises()
                .iter()
                .map(|(_, names)| names.len())
                .sum::<usize>();
            format!("{}: {count} custom exercises", event.channel)
        }
        Resource::Sessions | Resource::Reactions => {
            let latest = service
                .sessions()
                .first()
                .map(format_session_line)
                .unwrap_or_default();
            format!(
                "{}: {} sessions\n  latest {latest}",
                event.channel,
                service.sessions().len()
            )
        }
    }
}
