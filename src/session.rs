//! Presentation state and the command handler that mutates it.
//!
//! Every user action becomes a [`Command`] applied to the single [`Session`]; the
//! result tells the page whether the table has to be reloaded.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::attachments::open_all;
use crate::storage::models::{AttachmentList, NewExamPosting};
use crate::urgency;
use crate::AppState;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Errore: Ente e Scadenza obbligatori!")]
    MissingRequired,
}

/// Current values of the entry form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues {
    pub institution: String,
    pub description: String,
    pub deadline: String,
    pub link: String,
    pub note: String,
}

impl FormValues {
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            deadline: urgency::format_date(today),
            ..Default::default()
        }
    }

    /// Only institution and deadline are required.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.institution.trim().is_empty() || self.deadline.trim().is_empty() {
            return Err(ValidationError::MissingRequired);
        }
        Ok(())
    }

    fn to_posting(&self, attachments: Vec<PathBuf>) -> NewExamPosting {
        NewExamPosting {
            institution: self.institution.trim().to_string(),
            description: self.description.trim().to_string(),
            deadline: self.deadline.trim().to_string(),
            link: self.link.trim().to_string(),
            note: self.note.clone(),
            attachments: AttachmentList::new(attachments),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Info,
}

/// Transient message shown once on the next render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub form: FormValues,
    /// Source paths selected since the last save or reset
    pub staged: Vec<PathBuf>,
    notice: Option<Notice>,
}

impl Session {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            form: FormValues::blank(today),
            staged: Vec::new(),
            notice: None,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    fn reset(&mut self, today: NaiveDate) {
        self.form = FormValues::blank(today);
        self.staged.clear();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Keep draft form values without saving
    Edit(FormValues),
    Stage(Vec<PathBuf>),
    ResetSelection,
    Submit(FormValues),
    Delete(i64),
    OpenAttachments(i64),
}

/// What the page has to do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Render {
    Refresh,
    Unchanged,
}

pub async fn dispatch(state: &AppState, session: &mut Session, command: Command) -> Render {
    match command {
        Command::Edit(form) => {
            session.form = form;
            Render::Unchanged
        }
        Command::Stage(paths) => {
            session.staged.extend(paths);
            Render::Unchanged
        }
        Command::ResetSelection => {
            let staged = std::mem::take(&mut session.staged);
            state.attachments.discard_staged(&staged).await;
            Render::Unchanged
        }
        Command::Submit(form) => submit(state, session, form).await,
        Command::Delete(id) => delete(state, session, id).await,
        Command::OpenAttachments(id) => {
            open_attachments(state, session, id);
            Render::Unchanged
        }
    }
}

async fn submit(state: &AppState, session: &mut Session, form: FormValues) -> Render {
    if let Err(e) = form.validate() {
        session.form = form;
        session.notify(Notice::error(e.to_string()));
        return Render::Unchanged;
    }

    let staged = session.staged.clone();
    let report = state.attachments.commit(&staged).await;
    let posting = form.to_posting(report.persisted.clone());

    match state.db.create(&posting) {
        Ok(id) => {
            tracing::debug!(
                posting_id = id,
                attachments = report.persisted.len(),
                "Created posting"
            );
            state.attachments.discard_staged(&staged).await;
            session.reset(urgency::today());

            if report.is_complete() {
                session.notify(Notice::info("Concorso salvato"));
            } else {
                let skipped: Vec<String> = report
                    .failures
                    .iter()
                    .map(|f| f.source.display().to_string())
                    .collect();
                session.notify(Notice::error(format!(
                    "Concorso salvato, ma {} allegati non copiati: {}",
                    skipped.len(),
                    skipped.join(", ")
                )));
            }
            Render::Refresh
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to store posting");
            state.attachments.remove(&report.persisted).await;
            session.form = form;
            session.notify(Notice::error(format!("Errore di salvataggio: {e}")));
            Render::Unchanged
        }
    }
}

async fn delete(state: &AppState, session: &mut Session, id: i64) -> Render {
    let prune = if state.config.storage.prune_attachments_on_delete {
        match state.db.get(id) {
            Ok(posting) => posting.map(|p| p.attachments),
            Err(e) => {
                tracing::error!(posting_id = id, error = %e, "Failed to load posting");
                session.notify(Notice::error(format!("Errore di eliminazione: {e}")));
                return Render::Unchanged;
            }
        }
    } else {
        None
    };

    match state.db.delete(id) {
        Ok(true) => {
            tracing::debug!(posting_id = id, "Deleted posting");
            if let Some(attachments) = prune {
                let removed = state.attachments.remove(attachments.paths()).await;
                tracing::debug!(posting_id = id, removed, "Pruned attachments");
            }
        }
        Ok(false) => tracing::debug!(posting_id = id, "Posting already gone"),
        Err(e) => {
            tracing::error!(posting_id = id, error = %e, "Failed to delete posting");
            session.notify(Notice::error(format!("Errore di eliminazione: {e}")));
            return Render::Unchanged;
        }
    }

    Render::Refresh
}

fn open_attachments(state: &AppState, session: &mut Session, id: i64) {
    match state.db.get(id) {
        Ok(Some(posting)) => {
            let report = open_all(&posting.attachments.to_joined(), state.launcher.as_ref());
            tracing::debug!(
                posting_id = id,
                opened = report.opened.len(),
                missing = report.missing.len(),
                "Opened attachments"
            );
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(posting_id = id, error = %e, "Failed to load posting");
            session.notify(Notice::error(format!("Errore di lettura: {e}")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_form_defaults_deadline_to_today() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        let form = FormValues::blank(today);
        assert_eq!(form.deadline, "2024-01-07");
        assert!(form.institution.is_empty());
    }

    #[test]
    fn test_validate_requires_institution_and_deadline() {
        let mut form = FormValues {
            institution: "Comune di Bari".to_string(),
            deadline: "2024-01-10".to_string(),
            ..Default::default()
        };
        assert!(form.validate().is_ok());

        form.institution = "   ".to_string();
        assert_eq!(form.validate(), Err(ValidationError::MissingRequired));

        form.institution = "Comune di Bari".to_string();
        form.deadline.clear();
        assert_eq!(form.validate(), Err(ValidationError::MissingRequired));
    }

    #[test]
    fn test_take_notice_clears_it() {
        let mut session = Session::new(urgency::today());
        session.notify(Notice::info("ok"));
        assert_eq!(session.take_notice(), Some(Notice::info("ok")));
        assert!(session.notice().is_none());
    }
}
