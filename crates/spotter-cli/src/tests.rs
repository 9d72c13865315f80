use std::sync::Mutex;

use chrono::{NaiveDate, Utc};
use pretty_assertions::assert_eq;
use spotter_core::config::ClientConfig;
use spotter_core::editor::SessionDraft;
use spotter_core::models::ReactionPayload;
use spotter_core::db::Database;
use spotter_core::reactions::{GifCatalog, ReactionGif, ReactionPicker, SEARCH_EMOJI};
use spotter_core::services::{AnyRecordStore, GroupService};
use spotter_core::store::{RecordStore, Resource, SupabaseRecordStore};
use spotter_core::sync::{ChangeEvent, ChangeKind};
use spotter_core::{Session, User};

use crate::cli::CompletionShell;
use crate::commands::common::{
    format_session_line, format_weight, parse_date, resolve_session, resolve_user, short_id,
};
use crate::commands::completions::{completion_script, run_completions};
use crate::commands::config::{merge_config, summarize, ConfigUpdates};
use crate::commands::log::{build_draft, log_request, parse_set_spec, SetSpec};
use crate::commands::react::{category_lines, choose_gif, GifChoice, ReactionTopic};
use crate::commands::sessions::format_session_detail;
use crate::commands::stats::StatsReport;
use crate::commands::watch::apply_changes;
use crate::config_file::redact_secret;
use crate::error::CliError;

fn user(id: &str, name: &str) -> User {
    User {
        id: id.parse().unwrap(),
        name: name.to_string(),
        avatar: format!("/avatars/{id}.jpg"),
        created_at: Utc::now(),
    }
}

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

fn logged_session(creator: &User, on: &str, body_part: &str, sets: &[&str]) -> Session {
    let request = log_request(
        Some(on),
        date("2024-03-10"),
        body_part.to_string(),
        Vec::new(),
        &sets.iter().map(ToString::to_string).collect::<Vec<_>>(),
        Vec::new(),
        None,
    )
    .unwrap();
    build_draft(creator, &[creator.clone()], &request)
        .unwrap()
        .commit("CREW", creator)
        .unwrap()
}

#[test]
fn parse_set_spec_reads_participant_and_sets() {
    assert_eq!(
        parse_set_spec(" sam @ Bench Press = 60x10, 62.5X8 ,65×6").unwrap(),
        SetSpec {
            participant: Some("sam".to_string()),
            exercise: "Bench Press".to_string(),
            sets: vec![(60.0, 10), (62.5, 8), (65.0, 6)],
        }
    );
    assert_eq!(
        parse_set_spec("Squat=100x5").unwrap().participant,
        None
    );
}

#[test]
fn parse_set_spec_rejects_malformed_input() {
    for raw in ["Squat", "=100x5", "@Squat=100x5", "Squat=100", "Squat=heavyx5", "Squat=-5x5"] {
        assert!(
            matches!(parse_set_spec(raw), Err(CliError::InvalidSetSpec(_))),
            "{raw} should be rejected"
        );
    }
}

#[test]
fn parse_date_accepts_keywords_and_iso_dates() {
    let today = date("2024-03-10");
    assert_eq!(parse_date(None, today).unwrap(), today);
    assert_eq!(parse_date(Some("today"), today).unwrap(), today);
    assert_eq!(parse_date(Some("yesterday"), today).unwrap(), date("2024-03-09"));
    assert_eq!(parse_date(Some(" 2024-01-31 "), today).unwrap(), date("2024-01-31"));
    assert!(matches!(
        parse_date(Some("31/01/2024"), today),
        Err(CliError::InvalidDate(_))
    ));
}

#[test]
fn format_weight_drops_trailing_zeroes() {
    assert_eq!(format_weight(60.0), "60");
    assert_eq!(format_weight(62.5), "62.5");
    assert_eq!(format_weight(0.0), "0");
}

#[test]
fn resolve_user_matches_id_name_and_prefix() {
    let users = vec![
        user("0192-aaaa-1111", "Sam"),
        user("0192-aaaa-2222", "Alex"),
        user("0193-bbbb-3333", "Jordan"),
    ];

    assert_eq!(resolve_user(&users, "0192-aaaa-2222").unwrap().name, "Alex");
    assert_eq!(resolve_user(&users, "  sam ").unwrap().name, "Sam");
    assert_eq!(resolve_user(&users, "0193").unwrap().name, "Jordan");
    assert!(matches!(
        resolve_user(&users, "0192-aaaa"),
        Err(CliError::Ambiguous(_))
    ));
    assert!(matches!(
        resolve_user(&users, "Taylor"),
        Err(CliError::ProfileNotFound(_))
    ));
}

#[test]
fn resolve_session_requires_a_unique_prefix() {
    let sam = user("sam", "Sam");
    let mut first = logged_session(&sam, "2024-03-01", "Chest", &["Bench Press=60x10"]);
    let mut second = logged_session(&sam, "2024-03-02", "Legs", &["Squat=100x5"]);
    first.id = "0192aaaa-0001".parse().unwrap();
    second.id = "0192aaaa-0002".parse().unwrap();
    let sessions = vec![second, first];

    assert_eq!(
        resolve_session(&sessions, "0192aaaa-0001").unwrap().body_part,
        "Chest"
    );
    assert_eq!(resolve_session(&sessions, "0192aaaa-0002").unwrap().body_part, "Legs");
    assert!(matches!(
        resolve_session(&sessions, "0192aaaa"),
        Err(CliError::Ambiguous(_))
    ));
    assert!(matches!(
        resolve_session(&sessions, "ffff"),
        Err(CliError::SessionNotFound(_))
    ));
}

#[test]
fn short_id_keeps_thirteen_characters() {
    assert_eq!(
        short_id("01929f3e-7c1a-7def-8000-000000000000"),
        "01929f3e-7c1a"
    );
    assert_eq!(short_id("abc"), "abc");
}

#[test]
fn build_draft_fills_sets_for_every_participant() {
    let sam = user("sam", "Sam");
    let alex = user("alex", "Alex");
    let roster = vec![sam.clone(), alex.clone()];
    let request = log_request(
        None,
        date("2024-03-10"),
        "Chest".to_string(),
        vec!["Dips".to_string()],
        &[
            "Bench Press=60x10,65x8".to_string(),
            "alex@Bench Press=50x12".to_string(),
            "Bench Press=70x5".to_string(),
        ],
        vec!["Alex".to_string(), "sam".to_string()],
        Some("felt strong".to_string()),
    )
    .unwrap();

    let draft: SessionDraft = build_draft(&sam, &roster, &request).unwrap();
    assert_eq!(draft.exercise_names(), ["Dips", "Bench Press"]);
    assert_eq!(draft.participants().len(), 2);

    let session = draft.commit("CREW", &sam).unwrap();
    assert_eq!(session.date, date("2024-03-10"));
    assert_eq!(session.body_part, "Chest");

    let sam_bench = session.participants[0].exercise("Bench Press").unwrap();
    let reps = sam_bench.sets.iter().map(|set| (set.set_number, set.reps)).collect::<Vec<_>>();
    assert_eq!(reps, vec![(1, 10), (2, 8), (3, 5)]);
    assert_eq!(sam_bench.max_weight(), 70.0);

    let alex_entry = &session.participants[1];
    assert_eq!(alex_entry.user_name, "Alex");
    assert_eq!(alex_entry.exercise("Bench Press").unwrap().total_volume(), 600.0);
    assert_eq!(alex_entry.exercise("Dips").unwrap().sets.len(), 1);
    assert_eq!(session.participants[0].notes.as_deref(), Some("felt strong"));
    assert_eq!(alex_entry.notes, None);
}

#[test]
fn build_draft_rejects_sets_for_non_participants() {
    let sam = user("sam", "Sam");
    let alex = user("alex", "Alex");
    let request = log_request(
        None,
        date("2024-03-10"),
        "Legs".to_string(),
        Vec::new(),
        &["alex@Squat=80x5".to_string()],
        Vec::new(),
        None,
    )
    .unwrap();

    let error = build_draft(&sam, &[sam.clone(), alex], &request).unwrap_err();
    assert!(matches!(error, CliError::UnknownParticipant(name) if name == "alex"));
}

#[test]
fn build_draft_rejects_partners_outside_the_group() {
    let sam = user("sam", "Sam");
    let request = log_request(
        None,
        date("2024-03-10"),
        "Legs".to_string(),
        Vec::new(),
        &[],
        vec!["Taylor".to_string()],
        None,
    )
    .unwrap();

    assert!(matches!(
        build_draft(&sam, &[sam.clone()], &request),
        Err(CliError::ProfileNotFound(_))
    ));
}

#[test]
fn session_output_lists_participants_and_sets() {
    let sam = user("sam", "Sam");
    let session = logged_session(&sam, "2024-03-01", "Chest", &["Bench Press=62.5x8,60x10"]);

    let line = format_session_line(&session);
    assert!(line.contains("2024-03-01"));
    assert!(line.contains("Chest"));
    assert!(line.ends_with("Sam"));

    let detail = format_session_detail(&session);
    assert!(detail[0].starts_with("Chest session on 2024-03-01"));
    assert_eq!(detail[1], "  Sam");
    assert!(detail[2].ends_with("62.5x8, 60x10"));
}

#[test]
fn stats_report_summarizes_recent_training() {
    let sam = user("sam", "Sam");
    let sessions = vec![
        logged_session(&sam, "2024-03-10", "Chest", &["Bench Press=60x10"]),
        logged_session(&sam, "2024-03-09", "Legs", &["Squat=100x5"]),
        logged_session(&sam, "2024-03-08", "Chest", &["Bench Press=62.5x8"]),
    ];

    let report = StatsReport::build(&sessions, &sam, date("2024-03-10"));
    assert_eq!(report.dashboard.total_workouts, 3);
    assert_eq!(report.dashboard.sessions_this_month, 3);
    assert_eq!(report.achievements.streak_days, 3);
    assert_eq!(report.top_exercises[0].exercise_name, "Bench Press");
    assert_eq!(report.top_exercises[0].sessions, 2);

    let lines = report.lines();
    assert_eq!(lines[0], "Sam");
    assert!(lines.iter().any(|line| line == "  Streak: 3 days"));
    assert!(lines.iter().any(|line| line.contains("Top exercises")));
}

#[test]
fn reaction_topic_prefers_category_then_search() {
    assert_eq!(
        ReactionTopic::from_args(Some("Fire".to_string()), None, false).unwrap(),
        ReactionTopic::Category("Fire".to_string())
    );
    assert_eq!(
        ReactionTopic::from_args(None, Some("flex".to_string()), true).unwrap(),
        ReactionTopic::Search("flex".to_string())
    );
    assert_eq!(
        ReactionTopic::from_args(None, None, true).unwrap(),
        ReactionTopic::Trending
    );
    assert!(matches!(
        ReactionTopic::from_args(None, None, false),
        Err(CliError::MissingReactionTopic)
    ));
}

#[derive(Default)]
struct CannedCatalog {
    queries: Mutex<Vec<String>>,
}

impl GifCatalog for CannedCatalog {
    async fn search(&self, query: &str, limit: usize) -> Vec<ReactionGif> {
        self.queries.lock().unwrap().push(query.to_string());
        (0..limit.min(2))
            .map(|n| ReactionGif {
                id: format!("{query}-{n}"),
                url: format!("https://media.giphy.com/{query}-{n}.gif"),
                title: format!("{query} {n}"),
            })
            .collect()
    }

    async fn trending(&self, _limit: usize) -> Vec<ReactionGif> {
        Vec::new()
    }
}

#[tokio::test(flavor = "current_thread")]
async fn choose_gif_lists_candidates_without_a_pick() {
    let mut picker = ReactionPicker::new(CannedCatalog::default());
    let choice = choose_gif(&mut picker, &ReactionTopic::Category("fire".to_string()), None)
        .await
        .unwrap();

    let GifChoice::Candidates(gifs) = choice else {
        panic!("expected candidates");
    };
    assert_eq!(gifs.len(), 2);
    assert_eq!(gifs[0].id, "fire-0");
}

#[tokio::test(flavor = "current_thread")]
async fn choose_gif_picks_by_one_based_position() {
    let mut picker = ReactionPicker::new(CannedCatalog::default());
    let choice = choose_gif(&mut picker, &ReactionTopic::Search("flex".to_string()), Some(2))
        .await
        .unwrap();

    assert_eq!(
        choice,
        GifChoice::Picked(ReactionPayload {
            category: "flex".to_string(),
            emoji: SEARCH_EMOJI.to_string(),
            gif_url: "https://media.giphy.com/flex-1.gif".to_string(),
            gif_id: "flex-1".to_string(),
        })
    );
}

#[tokio::test(flavor = "current_thread")]
async fn choose_gif_rejects_out_of_range_positions() {
    let mut picker = ReactionPicker::new(CannedCatalog::default());
    let result = choose_gif(&mut picker, &ReactionTopic::Trending, Some(1)).await;
    assert!(matches!(result, Err(CliError::GifNotFound(1))));

    let mut picker = ReactionPicker::new(CannedCatalog::default());
    let result = choose_gif(&mut picker, &ReactionTopic::Search("wow".to_string()), Some(0)).await;
    assert!(matches!(result, Err(CliError::GifNotFound(0))));
}

#[tokio::test(flavor = "current_thread")]
async fn choose_gif_rejects_unknown_categories() {
    let mut picker = ReactionPicker::new(CannedCatalog::default());
    let result = choose_gif(&mut picker, &ReactionTopic::Category("Sleepy".to_string()), None).await;
    assert!(matches!(result, Err(CliError::Core(_))));
    assert!(picker.gifs().is_empty());
}

#[test]
fn category_lines_end_with_suggested_searches() {
    let lines = category_lines();
    assert_eq!(lines[0], "🔥 Fire");
    assert!(lines
        .last()
        .unwrap()
        .starts_with("Suggested searches: fire, strong"));
}

#[test]
fn redact_secret_hides_most_of_the_key() {
    assert_eq!(redact_secret(None), "(not set)");
    assert_eq!(redact_secret(Some("short")), "********");
    assert_eq!(redact_secret(Some("abcdefghijkl")), "abcd********");
}

#[test]
fn merge_config_keeps_values_that_were_not_passed() {
    let existing = ClientConfig {
        sync_code: "CREW".to_string(),
        supabase_url: Some("https://project.supabase.co".to_string()),
        supabase_anon_key: Some("anon-key-123456".to_string()),
        giphy_api_key: None,
    };
    let merged = merge_config(
        existing,
        ConfigUpdates {
            giphy_api_key: Some(" giphy-key ".to_string()),
            sync_code: Some("  ".to_string()),
            ..ConfigUpdates::default()
        },
    );

    assert_eq!(merged.sync_code, "CREW");
    assert_eq!(merged.giphy_api_key.as_deref(), Some("giphy-key"));
    assert_eq!(
        merged.supabase_url.as_deref(),
        Some("https://project.supabase.co")
    );

    let summary = summarize(&merged, std::path::Path::new("/tmp/cli-config.json"));
    assert_eq!(summary.backend, "supabase");
    assert_eq!(summary.supabase_anon_key, "anon********");
    assert_eq!(summary.giphy_api_key, "giph********");
}

#[test]
fn completion_scripts_mention_the_binary() {
    for shell in [CompletionShell::Bash, CompletionShell::Zsh, CompletionShell::Fish] {
        let script = String::from_utf8(completion_script(shell)).unwrap();
        assert!(script.contains("spotter"), "{shell:?} script");
    }
}

#[test]
fn completions_can_be_written_to_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spotter.bash");
    run_completions(CompletionShell::Bash, Some(&path)).unwrap();
    assert!(std::fs::read_to_string(&path).unwrap().contains("spotter"));
}

#[tokio::test(flavor = "multi_thread")]
async fn watch_refetches_sessions_on_change() {
    let db = Database::open_in_memory().await.unwrap();
    let sam = user("sam", "Sam");
    let request = log_request(
        Some("2024-03-01"),
        date("2024-03-10"),
        "Legs".to_string(),
        Vec::new(),
        &["Squat=100x5".to_string()],
        Vec::new(),
        None,
    )
    .unwrap();
    let session = build_draft(&sam, &[sam.clone()], &request)
        .unwrap()
        .commit("SHARED", &sam)
        .unwrap();
    db.record_store().insert_session(&session).await.unwrap();

    let store = AnyRecordStore::Local(db.record_store());
    let mut service = GroupService::load(store, db.local_state()).await.unwrap();
    assert!(service.sessions().is_empty());

    let events = [ChangeEvent::new(Resource::Sessions, "SHARED", ChangeKind::Changed)];
    let lines = apply_changes(&mut service, &events).await;
    assert_eq!(service.sessions().len(), 1);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("sessions_SHARED: 1 sessions"));
}

#[tokio::test(flavor = "multi_thread")]
async fn watch_keeps_going_when_a_refetch_fails() {
    let db = Database::open_in_memory().await.unwrap();
    let unreachable = SupabaseRecordStore::new("http://127.0.0.1:9", "anon-key").unwrap();
    let mut service = GroupService::load(AnyRecordStore::Supabase(unreachable), db.local_state())
        .await
        .unwrap();

    let events = [
        ChangeEvent::new(Resource::Users, "SHARED", ChangeKind::Changed),
        ChangeEvent::new(Resource::Users, "OTHER", ChangeKind::Changed),
    ];
    let lines = apply_changes(&mut service, &events).await;
    assert_eq!(lines, vec!["users_OTHER: 0 profiles".to_string()]);
}
