mod attachments;
mod health;
mod postings;

pub use attachments::serve_attachment;
pub use health::health;
pub use postings::{delete_posting, index, open_attachments, reset_selection, submit_form};

use axum::response::Redirect;

use crate::session::Render;

/// Every form post answers with a redirect back to the page.
fn redirect_after(render: Render) -> Redirect {
    match render {
        Render::Refresh => Redirect::to("/#elenco"),
        Render::Unchanged => Redirect::to("/"),
    }
}
