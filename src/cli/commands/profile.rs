//! Profile command handlers

use crate::args::ProfileSubcommand;
use crate::commands::CommandResult;
use campus_records::core::models::Profile;
use campus_records::core::profile::{update_profile, ProfileEdit};
use campus_records::core::session::AppState;

/// Dispatch profile subcommands
pub async fn run(subcommand: Option<ProfileSubcommand>, state: &mut AppState) -> CommandResult {
    match subcommand {
        None | Some(ProfileSubcommand::Show) => {
            print_profile(state.require_profile()?);
            Ok(())
        }
        Some(ProfileSubcommand::Edit { name, email }) => handle_edit(state, name, email).await,
    }
}

fn print_profile(profile: &Profile) {
    println!("\n=== Profile ===\n");
    println!("Name:           {}", profile.full_name);
    println!("Email:          {}", profile.email);
    println!("Role:           {}", profile.role);
    if let Some(level) = profile.faculty_level {
        println!("Faculty level:  {level}");
    }
    if let Some(number) = &profile.student_id_number {
        println!("Student number: {number}");
    }
    println!("Profile id:     {}", profile.id);
}

async fn handle_edit(
    state: &mut AppState,
    name: Option<String>,
    email: Option<String>,
) -> CommandResult {
    if name.is_none() && email.is_none() {
        return Err("nothing to change (pass --name and/or --email)".into());
    }
    let profile = state.require_profile()?;
    let mut edit = ProfileEdit::from_profile(profile);
    if let Some(name) = name {
        edit.full_name = name;
    }
    if let Some(email) = email {
        edit.email = email;
    }
    let updated = update_profile(state.gateway(), profile, edit).await?;
    println!("✓ Profile updated: {} <{}>", updated.full_name, updated.email);
    state.refresh_profile(updated);
    Ok(())
}
