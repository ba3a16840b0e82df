//! Profile show, edit, avatar.

use kidsdiy_api::MediaFile;
use kidsdiy_core::pages::{ProfileCard, ProfileEditView, ProfileForm, ProfileView};
use kidsdiy_core::{AfterPatch, CoreError, ProfileUpdate, ViewController};

use crate::cli::{AvatarArgs, GlobalOpts, ProfileArgs, ProfileCommand, ProfileEditArgs};
use crate::config::Session;
use crate::error::CliError;
use crate::output;

use super::util;

fn card_detail(p: &ProfileCard) -> String {
    output::detail_lines(&[
        ("Name", Some(p.full_name.as_str())),
        ("Username", Some(p.username.as_str())),
        ("Email", p.email.as_deref()),
        ("Phone", p.phone_number.as_deref()),
        ("Born", p.date_of_birth.as_deref()),
        ("Organization", p.organization.as_deref()),
        ("Role", p.role.as_deref()),
        ("Interests", Some(p.interests.as_str())),
        ("Bio", p.biography.as_deref()),
        ("Picture", p.avatar_url.as_deref()),
    ])
}

fn form_detail(f: &ProfileForm) -> String {
    let interests = f.interest_names().join(", ");
    output::detail_lines(&[
        ("Username", Some(f.record.username.as_str())),
        ("First name", Some(f.record.first_name.as_str())),
        ("Last name", Some(f.record.last_name.as_str())),
        ("Email", f.record.email.as_deref()),
        ("Organization", f.organization_name()),
        ("Role", f.role_name()),
        ("Interests", Some(interests.as_str())),
        ("Picture", f.avatar_url.as_deref()),
    ])
}

impl From<ProfileEditArgs> for ProfileUpdate {
    fn from(args: ProfileEditArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            biography: args.bio,
            phone_number: args.phone,
            date_of_birth: args.date_of_birth,
            organization: args.organization,
            role: args.role,
            interests: args.interests,
        }
    }
}

/// `--id`, or the signed-in user's own profile id.
async fn own_id(session: &Session, id: Option<u64>, global: &GlobalOpts) -> Result<u64, CliError> {
    if let Some(id) = id {
        return Ok(id);
    }
    let page = ViewController::new(session.gateway.clone(), ProfileView::new(session.media_base()));
    Ok(util::load(&page, "Loading profile", global).await?.id)
}

/// Mount the edit page for `id` (record joined with its lookups).
async fn edit_page(
    session: &Session,
    id: u64,
    global: &GlobalOpts,
) -> Result<ViewController<kidsdiy_api::ProxyRoute, ProfileEditView>, CliError> {
    let page = ViewController::new(
        session.gateway.clone(),
        ProfileEditView::new(id, session.media_base()),
    );
    util::load(&page, "Loading profile", global).await?;
    Ok(page)
}

pub async fn handle(session: &Session, args: ProfileArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ProfileCommand::Show => {
            let page =
                ViewController::new(session.gateway.clone(), ProfileView::new(session.media_base()));
            let card = util::load(&page, "Loading profile", global).await?;

            let out = output::render_single(&global.output, &card, card_detail, |p| p.username.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProfileCommand::Edit(edit) => {
            let id = own_id(session, edit.id, global).await?;
            let page = edit_page(session, id, global).await?;

            let pb = util::spinner("Saving profile", global.quiet);
            let result = page.submit(ProfileUpdate::from(edit)).await;
            pb.finish_and_clear();
            result?;

            let form = util::settled(&page)?;
            util::note(global, "✓ Profile updated");
            let out = output::render_single(&global.output, &form, form_detail, |f| f.record.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProfileCommand::Avatar(avatar) => change_avatar(session, avatar, global).await,
    }
}

async fn change_avatar(session: &Session, args: AvatarArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let file = MediaFile::from_path(&args.path).await.map_err(CoreError::from)?;
    let id = own_id(session, args.id, global).await?;
    let page = edit_page(session, id, global).await?;

    let after = if args.no_reload {
        AfterPatch::Optimistic
    } else {
        AfterPatch::Reload
    };

    let pb = util::spinner("Uploading picture", global.quiet);
    let result = page.change_avatar(vec![file], after).await;
    pb.finish_and_clear();
    let outcome = result?;
    tracing::debug!(media = %outcome.upload.id.as_value(), "profile picture replaced");

    let form = util::settled(&page)?;
    util::note(global, "✓ Profile picture updated");
    let out = output::render_single(&global.output, &form, form_detail, |f| {
        f.avatar_url.clone().unwrap_or_default()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
