//! Home feed.

use kidsdiy_core::ViewController;
use kidsdiy_core::pages::{FeedView, PostCard};
use tabled::Tabled;

use crate::cli::GlobalOpts;
use crate::config::Session;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PostRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Likes")]
    likes: u64,
    #[tabled(rename = "Posted")]
    posted: String,
    #[tabled(rename = "Images")]
    images: usize,
}

impl From<&PostCard> for PostRow {
    fn from(p: &PostCard) -> Self {
        let author = match p.organization {
            Some(ref org) => format!("{} ({org})", p.author),
            None => p.author.clone(),
        };
        Self {
            id: p.id,
            title: p.title.clone(),
            author,
            likes: p.likes,
            posted: p.created_since.clone(),
            images: p.image_urls.len(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    let page = ViewController::new(session.gateway.clone(), FeedView::new(session.media_base()));
    let posts = util::load(&page, "Loading feed", global).await?;

    let out = output::render_list(&global.output, &posts, |p| PostRow::from(p), |p| p.id.to_string());
    output::print_output(&out, global.quiet);
    Ok(())
}
