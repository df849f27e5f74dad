//! Interactive menu for zanza.
//!
//! Keeps one [`SearchSession`] for the whole run, so each new route search
//! replaces the previous one.

use std::sync::Arc;

use dialoguer::{Input, Password, Select};
use zanza_community::{FileReviewSource, ReviewSource, SummaryOptions};
use zanza_community_models::AuthToken;
use zanza_config::AppConfig;
use zanza_routing::SearchSession;
use zanza_server::AppState;

use crate::commands;

/// Top-level actions in the interactive menu.
enum Action {
    Routes,
    Resolve,
    Community,
    Server,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Routes,
        Self::Resolve,
        Self::Community,
        Self::Server,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Routes => "Find routes",
            Self::Resolve => "Look up an address",
            Self::Community => "Community safety rankings",
            Self::Server => "Start server",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the interactive menu until the user quits.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, a prompt fails, or
/// the server fails to start.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    let state = AppState::from_config(&config)?;
    let session = SearchSession::new();

    println!("Zanza ({})", config.city.name);
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::Routes => {
                let origin: String = Input::new().with_prompt("From").interact_text()?;
                let destination: String = Input::new().with_prompt("To").interact_text()?;
                commands::routes(&state, &session, &origin, &destination).await;
            }
            Action::Resolve => {
                let address: String = Input::new().with_prompt("Address").interact_text()?;
                commands::resolve(&state, &address).await;
            }
            Action::Community => handle_community(&state).await?,
            Action::Server => {
                tokio::task::spawn_blocking(|| {
                    actix_web::rt::System::new().block_on(zanza_server::interactive::run())
                })
                .await??;
                return Ok(());
            }
            Action::Quit => return Ok(()),
        }

        println!();
    }
}

/// Prompts for the review source, credential and list sizes, then prints
/// the community summary.
async fn handle_community(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let file: String = Input::new()
        .with_prompt("Reviews file (empty for backend)")
        .allow_empty(true)
        .interact_text()?;

    let (source, token): (Arc<dyn ReviewSource>, Option<AuthToken>) = if file.trim().is_empty() {
        let token: String = Password::new()
            .with_prompt("Backend token (empty for none)")
            .allow_empty_password(true)
            .interact()?;
        (state.reviews.clone(), AuthToken::new(&token))
    } else {
        (Arc::new(FileReviewSource::new(file.trim())), None)
    };

    let defaults = SummaryOptions::default();
    let neighborhoods: usize = Input::new()
        .with_prompt("Neighborhoods to show")
        .default(defaults.neighborhoods)
        .interact_text()?;
    let streets: usize = Input::new()
        .with_prompt("Street hazards to show")
        .default(defaults.streets)
        .interact_text()?;

    commands::community(
        source.as_ref(),
        token.as_ref(),
        SummaryOptions {
            neighborhoods,
            streets,
            ..defaults
        },
    )
    .await;

    Ok(())
}
