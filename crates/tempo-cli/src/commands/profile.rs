/// Profile management command handler
use anyhow::Result;
use clap::Subcommand;
use tabled::{Table, Tabled};
use tempo_storage::Database;

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    /// Create a new profile
    Add {
        /// Profile name
        name: String,
    },
    /// List all profiles
    List,
    /// Delete a profile together with its history and settings
    Remove {
        /// Profile name
        name: String,
    },
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Created")]
    created: String,
}

pub fn handle_profile_command(db: &Database, action: ProfileAction) -> Result<()> {
    match action {
        ProfileAction::Add { name } => {
            let profile = db.create_profile(&name)?;
            println!("Created profile '{}'", profile.name);
            println!("Start a session with: tempo run --profile {}", profile.name);
        }
        ProfileAction::List => {
            let profiles = db.list_profiles()?;
            if profiles.is_empty() {
                println!("No profiles yet.");
                println!("Create one with: tempo profile add <name>");
                return Ok(());
            }

            let rows: Vec<ProfileRow> = profiles
                .into_iter()
                .map(|p| ProfileRow {
                    name: p.name,
                    created: p.created_at.format("%Y-%m-%d").to_string(),
                })
                .collect();
            println!("{}", Table::new(rows));
        }
        ProfileAction::Remove { name } => {
            let Some(profile) = db.get_profile_by_name(&name)? else {
                println!("Profile not found: {name}");
                return Ok(());
            };
            if db.delete_profile(profile.id)? {
                println!("Removed profile '{}' and its history", profile.name);
            }
        }
    }
    Ok(())
}
