use std::path::PathBuf;
use std::sync::Arc;

use askama::Template;
use axum::extract::{Multipart, Path, State};
use axum::response::{Html, Redirect};

use super::redirect_after;
use crate::session::{dispatch, Command, FormValues, Notice};
use crate::ui::response::ApiError;
use crate::ui::views::{IndexPage, NoticeView, RowView};
use crate::urgency;
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormAction {
    Stage,
    Save,
}

/// Everything a single post of the entry form carries
struct FormSubmission {
    action: FormAction,
    form: FormValues,
    staged: Vec<PathBuf>,
    rejected: Vec<String>,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let mut session = state.session.lock().await;
    let mut notice = session.take_notice();

    let today = urgency::today();
    let rows: Vec<RowView> = match state.db.list_all() {
        Ok(postings) => postings.iter().map(|p| RowView::new(p, today)).collect(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load postings");
            notice = Some(Notice::error(format!("Errore di lettura: {e}")));
            Vec::new()
        }
    };

    let page = IndexPage {
        form: session.form.clone(),
        staged_count: session.staged.len(),
        notice: notice.map(NoticeView::from),
        rows,
    };

    Ok(Html(page.render()?))
}

/// Route: POST /concorsi (multipart)
///
/// `action=stage` only adds the selected files; `action=save` also submits the form.
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Redirect, ApiError> {
    let submission = read_submission(&state, multipart).await?;

    let mut session = state.session.lock().await;
    if !submission.staged.is_empty() {
        dispatch(&state, &mut session, Command::Stage(submission.staged)).await;
    }

    let render = match submission.action {
        FormAction::Stage => dispatch(&state, &mut session, Command::Edit(submission.form)).await,
        FormAction::Save => dispatch(&state, &mut session, Command::Submit(submission.form)).await,
    };

    // Rejected uploads take precedence over the save notice
    if !submission.rejected.is_empty() {
        session.notify(Notice::error(format!(
            "File non caricati: {}",
            submission.rejected.join(", ")
        )));
    }

    Ok(redirect_after(render))
}

/// Route: POST /selection/reset
pub async fn reset_selection(State(state): State<Arc<AppState>>) -> Redirect {
    let mut session = state.session.lock().await;
    redirect_after(dispatch(&state, &mut session, Command::ResetSelection).await)
}

/// Route: POST /concorsi/:id/delete
pub async fn delete_posting(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Redirect {
    let mut session = state.session.lock().await;
    redirect_after(dispatch(&state, &mut session, Command::Delete(id)).await)
}

/// Route: POST /concorsi/:id/open
pub async fn open_attachments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Redirect {
    let mut session = state.session.lock().await;
    redirect_after(dispatch(&state, &mut session, Command::OpenAttachments(id)).await)
}

// ============================================================================
// Helpers
// ============================================================================

async fn read_submission(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<FormSubmission, ApiError> {
    let mut submission = FormSubmission {
        action: FormAction::Save,
        form: FormValues::default(),
        staged: Vec::new(),
        rejected: Vec::new(),
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart data: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "files" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file: {e}")))?;

                // An empty file input still sends one nameless part
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }

                if data.len() as u64 > state.config.max_upload_size {
                    return Err(ApiError::payload_too_large(format!(
                        "File exceeds maximum upload size of {} bytes",
                        state.config.max_upload_size
                    )));
                }

                match state.attachments.stage_upload(&file_name, data).await {
                    Ok(path) => submission.staged.push(path),
                    Err(e) => {
                        tracing::warn!(file_name = %file_name, error = %e, "Rejected upload");
                        submission.rejected.push(file_name);
                    }
                }
            }
            "path" => {
                let path = read_text(field, "path").await?;
                let path = path.trim();
                if !path.is_empty() {
                    submission.staged.push(PathBuf::from(path));
                }
            }
            "action" => {
                submission.action = match read_text(field, "action").await?.as_str() {
                    "stage" => FormAction::Stage,
                    _ => FormAction::Save,
                };
            }
            "institution" => submission.form.institution = read_text(field, "institution").await?,
            "description" => submission.form.description = read_text(field, "description").await?,
            "deadline" => submission.form.deadline = read_text(field, "deadline").await?,
            "link" => submission.form.link = read_text(field, "link").await?,
            "note" => submission.form.note = read_text(field, "note").await?,
            _ => {
                // Ignore unknown fields
            }
        }
    }

    Ok(submission)
}

async fn read_text(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid {name}: {e}")))
}
