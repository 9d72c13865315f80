use std::path::Path;

use spotter_core::reactions::{
    GifCatalog, GiphyClient, ReactionGif, ReactionPicker, REACTION_CATEGORIES, SUGGESTED_SEARCHES,
};
use spotter_core::models::ReactionPayload;

use crate::cli::ReactCommands;
use crate::commands::common::{open_app, resolve_session, short_id};
use crate::error::CliError;

/// Which GIFs `react add` looks at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionTopic {
    Category(String),
    Search(String),
    Trending,
}

impl ReactionTopic {
    pub fn from_args(
        category: Option<String>,
        search: Option<String>,
        trending: bool,
    ) -> Result<Self, CliError> {
        match (category, search, trending) {
            (Some(category), _, _) => Ok(Self::Category(category)),
            (None, Some(search), _) => Ok(Self::Search(search)),
            (None, None, true) => Ok(Self::Trending),
            (None, None, false) => Err(CliError::MissingReactionTopic),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum GifChoice {
    Picked(ReactionPayload),
    Candidates(Vec<ReactionGif>),
}

/// Load candidates for `topic`, then pick one if `pick` (1-based) is given
pub async fn choose_gif<C: GifCatalog>(
    picker: &mut ReactionPicker<C>,
    topic: &ReactionTopic,
    pick: Option<usize>,
) -> Result<GifChoice, CliError> {
    match topic {
        ReactionTopic::Category(name) => {
            picker.select_category(name).await?;
        }
        ReactionTopic::Search(query) => {
            picker.search(query).await;
        }
        ReactionTopic::Trending => {
            picker.trending().await;
        }
    }

    match pick {
        None => Ok(GifChoice::Candidates(picker.gifs().to_vec())),
        Some(position) => position
            .checked_sub(1)
            .and_then(|index| picker.pick(index))
            .map(GifChoice::Picked)
            .ok_or(CliError::GifNotFound(position)),
    }
}

pub async fn run_react(
    command: ReactCommands,
    db_path: &Path,
    config_path: &Path,
) -> Result<(), CliError> {
    match command {
        ReactCommands::Categories => {
            for line in category_lines() {
                println!("{line}");
            }
            Ok(())
        }
        ReactCommands::List { id } => run_react_list(&id, db_path, config_path).await,
        ReactCommands::Add {
            id,
            category,
            search,
            trending,
            pick,
        } => {
            let topic = ReactionTopic::from_args(category, search, trending)?;
            run_react_add(&id, &topic, pick, db_path, config_path).await
        }
    }
}

async fn run_react_list(id: &str, db_path: &Path, config_path: &Path) -> Result<(), CliError> {
    let app = open_app(db_path, config_path).await?;
    let session = resolve_session(app.service.sessions(), id)?;
    if session.reactions.is_empty() {
        println!("No reactions on {} yet.", short_id(session.id.as_str()));
    }
    for reaction in &session.reactions {
        println!(
            "{} {:<12} {:<14} {}",
            reaction.emoji, reaction.category, reaction.user_name, reaction.gif_url
        );
    }
    Ok(())
}

async fn run_react_add(
    id: &str,
    topic: &ReactionTopic,
    pick: Option<usize>,
    db_path: &Path,
    config_path: &Path,
) -> Result<(), CliError> {
    let mut app = open_app(db_path, config_path).await?;
    let session_id = resolve_session(app.service.sessions(), id)?.id.clone();
    let api_key = app
        .config
        .giphy_api_key
        .clone()
        .ok_or(CliError::GiphyNotConfigured)?;
    let mut picker = ReactionPicker::new(GiphyClient::new(api_key)?);

    match choose_gif(&mut picker, topic, pick).await? {
        GifChoice::Picked(payload) => {
            let reaction = app
                .service
                .attach_reaction(&session_id, payload)
                .await
                .map_err(CliError::from_core)?;
            println!("{} {} {}", reaction.emoji, reaction.category, reaction.gif_url);
        }
        GifChoice::Candidates(gifs) => {
            if gifs.is_empty() {
                println!("No GIFs found.");
            }
            for (index, gif) in gifs.iter().enumerate() {
                println!("{:>2}. {:<40} {}", index + 1, gif.title, gif.url);
            }
        }
    }
    Ok(())
}

pub fn category_lines() -> Vec<String> {
    let mut lines = REACTION_CATEGORIES
        .iter()
        .map(|category| format!("{} {}", category.emoji, category.label))
        .collect::<Vec<_>>();
    lines.push(format!("Suggested searches: {}", SUGGESTED_SEARCHES.join(", ")));
    lines
}
