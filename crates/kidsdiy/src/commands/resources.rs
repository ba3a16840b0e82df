//! Learning resources.

use kidsdiy_core::ViewController;
use kidsdiy_core::pages::{ResourceCard, ResourceDetailView, ResourcesView};
use tabled::Tabled;

use crate::cli::{GlobalOpts, ResourcesArgs, ResourcesCommand};
use crate::config::Session;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Attachment")]
    attachment: String,
}

impl From<&ResourceCard> for ResourceRow {
    fn from(r: &ResourceCard) -> Self {
        let attachment = match (&r.attachment_name, &r.attachment_size) {
            (Some(name), Some(size)) => format!("{name} ({size})"),
            (Some(name), None) => name.clone(),
            (None, _) => String::new(),
        };
        Self {
            id: r.id,
            title: r.title.clone(),
            kind: r.kind.clone().unwrap_or_default(),
            author: r.author.clone(),
            attachment,
        }
    }
}

fn detail(r: &ResourceCard) -> String {
    let header = output::detail_lines(&[
        ("Title", Some(r.title.as_str())),
        ("Type", r.kind.as_deref()),
        ("Author", Some(r.author.as_str())),
        ("Organization", r.organization.as_deref()),
        ("Role", r.role.as_deref()),
        ("Attachment", r.attachment_name.as_deref()),
        ("Size", r.attachment_size.as_deref()),
        ("Download", r.attachment_url.as_deref()),
    ]);
    if r.content.is_empty() {
        header
    } else {
        format!("{header}\n\n{}", r.content)
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: ResourcesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ResourcesCommand::List { search } => {
            let page =
                ViewController::new(session.gateway.clone(), ResourcesView::new(session.media_base()));
            let all = util::load(&page, "Loading resources", global).await?;
            let shown = match search {
                Some(ref query) => page.search(query),
                None => all,
            };

            let out = output::render_list(&global.output, &shown, |r| ResourceRow::from(r), |r| {
                r.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ResourcesCommand::Show { id } => {
            let page = ViewController::new(
                session.gateway.clone(),
                ResourceDetailView::new(id, session.media_base()),
            );
            let resource = util::load(&page, "Loading resource", global).await?;

            let out = output::render_single(&global.output, &resource, detail, |r| r.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
