use askama::Template;
use chrono::NaiveDate;
use url::Url;

use crate::session::{FormValues, Notice, NoticeKind};
use crate::storage::models::ExamPosting;
use crate::urgency;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub form: FormValues,
    pub staged_count: usize,
    pub notice: Option<NoticeView>,
    pub rows: Vec<RowView>,
}

pub struct NoticeView {
    pub class: &'static str,
    pub message: String,
}

impl From<Notice> for NoticeView {
    fn from(notice: Notice) -> Self {
        let class = match notice.kind {
            NoticeKind::Error => "notice notice-error",
            NoticeKind::Info => "notice notice-info",
        };
        Self {
            class,
            message: notice.message,
        }
    }
}

pub struct AttachmentLink {
    pub name: String,
    pub href: String,
}

/// One table row, annotated with urgency at render time
pub struct RowView {
    pub id: i64,
    pub deadline: String,
    pub days_remaining: i64,
    pub urgent: bool,
    pub institution: String,
    pub description: String,
    pub note: String,
    pub link: String,
    pub attachments: Vec<AttachmentLink>,
}

impl RowView {
    pub fn new(posting: &ExamPosting, today: NaiveDate) -> Self {
        let days_remaining = urgency::days_remaining(&posting.deadline, today);
        let attachments = posting
            .attachments
            .iter()
            .filter_map(|path| path.file_name()?.to_str())
            .map(|name| AttachmentLink {
                name: name.to_string(),
                href: attachment_href(name),
            })
            .collect();

        Self {
            id: posting.id,
            deadline: posting.deadline.clone(),
            days_remaining,
            urgent: urgency::is_urgent(days_remaining),
            institution: posting.institution.clone(),
            description: posting.description.clone(),
            note: posting.note.clone(),
            link: posting.link.clone(),
            attachments,
        }
    }

    pub fn row_class(&self) -> &'static str {
        if self.urgent {
            "urgent"
        } else {
            ""
        }
    }
}

/// Download path for a managed copy, percent-encoded as a single path segment.
fn attachment_href(name: &str) -> String {
    let mut url = Url::parse("http://localhost/attachments/").expect("static base URL");
    url.path_segments_mut()
        .expect("http URLs have a path")
        .pop_if_empty()
        .push(name);
    url.path().to_string()
}
