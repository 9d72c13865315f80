use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "spotter")]
#[command(about = "Log gym sessions with your training group")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Optional path to the CLI config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage profiles in the sync group
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Log a session as the active profile
    Log {
        /// Body part trained (e.g. Chest, Legs)
        #[arg(short, long)]
        body_part: String,
        /// Session date as YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Exercise to include, even without sets
        #[arg(short, long = "exercise", value_name = "NAME")]
        exercises: Vec<String>,
        /// Sets as [PARTICIPANT@]EXERCISE=WEIGHTxREPS[,WEIGHTxREPS...]
        #[arg(short, long = "set", value_name = "SPEC")]
        sets: Vec<String>,
        /// Another profile who trained in this session
        #[arg(short = 'w', long = "with", value_name = "PROFILE")]
        partners: Vec<String>,
        /// Notes for the active profile
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Browse or delete logged sessions
    Sessions {
        #[command(subcommand)]
        command: SessionCommands,
    },
    /// Dashboard stats, achievements and training balance
    Stats {
        /// Profile to report on (defaults to the active profile)
        #[arg(long, value_name = "PROFILE")]
        user: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Heaviest lift per member for one exercise
    Leaderboard {
        /// Exercise name
        exercise: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Personal records of a profile
    Records {
        /// Profile to report on (defaults to the active profile)
        #[arg(long, value_name = "PROFILE")]
        user: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Max weight and volume per session for one exercise
    Progress {
        /// Exercise name
        exercise: String,
        /// Profile to report on (defaults to the active profile)
        #[arg(long, value_name = "PROFILE")]
        user: Option<String>,
        /// Number of most recent sessions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Show every session, ignoring --limit
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compare several profiles on one exercise
    Compare {
        /// Exercise name
        exercise: String,
        /// Profiles to compare
        #[arg(required = true)]
        users: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Built-in and custom exercises
    Exercises {
        #[command(subcommand)]
        command: ExerciseCommands,
    },
    /// React to a session with an emoji and a GIF
    React {
        #[command(subcommand)]
        command: ReactCommands,
    },
    /// Print changes made by other devices until interrupted
    Watch {
        /// Seconds between polls of the record store
        #[arg(long, default_value = "5")]
        interval: u64,
    },
    /// Configure the sync group and backends
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// List profiles in the sync group
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a profile and act as it
    Create {
        /// Display name
        name: String,
        /// Avatar path or URL
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Act as an existing profile
    Select {
        /// Profile name, ID or unique ID prefix
        profile: String,
    },
    /// Rename a profile or change its avatar
    Edit {
        /// Profile name, ID or unique ID prefix
        profile: String,
        /// New display name
        #[arg(long)]
        name: Option<String>,
        /// New avatar path or URL
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Delete a profile from the sync group
    Delete {
        /// Profile name, ID or unique ID prefix
        profile: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Show the active profile
    Whoami,
    /// Stop acting as the active profile
    Logout,
}

#[derive(Subcommand)]
pub enum SessionCommands {
    /// List recent sessions
    List {
        /// Number of sessions to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Only sessions the active profile took part in
        #[arg(long)]
        mine: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show every set of a session
    Show {
        /// Session ID or unique ID prefix
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a session you logged
    Delete {
        /// Session ID or unique ID prefix
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ExerciseCommands {
    /// List exercises for one or every body part
    List {
        /// Body part to list
        #[arg(short, long)]
        body_part: Option<String>,
    },
    /// Add a custom exercise for the sync group
    Add {
        /// Body part the exercise belongs to
        body_part: String,
        /// Exercise name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ReactCommands {
    /// Show reaction categories and suggested searches
    Categories,
    /// List reactions on a session
    List {
        /// Session ID or unique ID prefix
        id: String,
    },
    /// Find GIFs and attach one to a session
    Add {
        /// Session ID or unique ID prefix
        id: String,
        /// Reaction category (e.g. Fire, Strong)
        #[arg(short, long, conflicts_with_all = ["search", "trending"])]
        category: Option<String>,
        /// Free-text GIF search
        #[arg(short, long, conflicts_with = "trending")]
        search: Option<String>,
        /// Pick from trending GIFs
        #[arg(short, long)]
        trending: bool,
        /// Position of the GIF to attach (lists candidates when omitted)
        #[arg(short, long)]
        pick: Option<usize>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Create or update the config file
    Init {
        /// Sync code shared by the training group
        #[arg(long, value_name = "CODE")]
        sync_code: Option<String>,
        /// Supabase project URL
        #[arg(long, value_name = "URL")]
        supabase_url: Option<String>,
        /// Supabase anon/public key
        #[arg(long, value_name = "KEY")]
        supabase_anon_key: Option<String>,
        /// Giphy API key for GIF reactions
        #[arg(long, value_name = "KEY")]
        giphy_api_key: Option<String>,
    },
    /// Print the effective configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
