//! Subcommand handlers.
//!
//! Each handler maps clap arguments onto core parameters, calls the matching
//! session entry point and renders the outcome. A failed outcome renders its
//! payload, if any, and becomes the process error.

use std::fmt::Display;

use anyhow::{bail, Result};
use mender_core::{models::Outcome, params::Id, Session};

use crate::{args::Commands, renderer::TerminalRenderer};

/// Runs one subcommand against a session.
pub struct Cli {
    session: Session,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(session: Session, renderer: TerminalRenderer) -> Self {
        Self { session, renderer }
    }

    /// Handles every subcommand except `serve`.
    pub async fn handle(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Plan(args) => self.finish(self.session.generate_plan(&args.into()).await),
            Commands::Code(args) => self.finish(self.session.generate_code(&args.into()).await),
            Commands::Exec(args) => self.finish(self.session.execute_plan(&args.into()).await),
            Commands::Run(args) => self.finish(self.session.run(&args.into()).await),
            Commands::History => self.finish(self.session.list_plans().await),
            Commands::Show(args) => {
                let params: Id = args.into();
                self.finish(self.session.show_plan(&params).await)
            }
            Commands::Serve => bail!("serve is handled by the MCP server"),
        }
    }

    fn finish<T: Display>(&self, outcome: Outcome<T>) -> Result<()> {
        if outcome.is_success() {
            self.renderer.render(&outcome.to_string());
            return Ok(());
        }
        if let Some(value) = &outcome.value {
            self.renderer.render(&value.to_string());
        }
        bail!("{}", outcome.description)
    }
}
