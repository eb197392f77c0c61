//! concorsi-tracker - keep track of competitive-exam postings and their deadlines
//!
//! This crate provides a single-user web form with:
//! - SQLite storage for postings, listed by deadline
//! - Managed copies of PDF attachments, re-openable with the host's default application
//! - Urgency highlighting for deadlines in the next three days

pub mod attachments;
pub mod config;
pub mod session;
pub mod storage;
#[cfg(test)]
pub mod testutil;
pub mod ui;
pub mod urgency;

use std::sync::Arc;

use attachments::{Launcher, ManagedDir};
use config::Config;
use session::Session;
use storage::Database;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub attachments: ManagedDir,
    pub launcher: Arc<dyn Launcher>,
    /// The one user's form and staged selection
    pub session: tokio::sync::Mutex<Session>,
}

impl AppState {
    pub fn new(
        config: Config,
        db: Database,
        attachments: ManagedDir,
        launcher: Arc<dyn Launcher>,
    ) -> Self {
        Self {
            config,
            db,
            attachments,
            launcher,
            session: tokio::sync::Mutex::new(Session::new(urgency::today())),
        }
    }
}
