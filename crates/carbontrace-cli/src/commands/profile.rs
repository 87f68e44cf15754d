//! Profile command implementation.

use crate::cli::{ProfileAction, ProfileArgs};
use crate::config::{Config, Profile};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::validation;
use std::path::PathBuf;

/// Execute the profile command.
pub fn execute_profile(args: ProfileArgs, config: &mut Config, formatter: &Formatter) -> Result<()> {
    match args.action {
        ProfileAction::List => list_profiles(config, formatter),
        ProfileAction::Show => show_active_profile(config, formatter),
        ProfileAction::Switch { name } => switch_profile(config, name, formatter),
        ProfileAction::Set {
            name,
            database,
            owner,
        } => set_profile(config, name, database, owner, formatter),
        ProfileAction::Delete { name } => delete_profile(config, name, formatter),
    }
}

/// List all profiles.
fn list_profiles(config: &Config, formatter: &Formatter) -> Result<()> {
    if config.profiles.is_empty() {
        println!("{}", formatter.info("No profiles configured"));
        return Ok(());
    }

    let mut names: Vec<&String> = config.profiles.keys().collect();
    names.sort();

    println!("Available profiles:");
    for name in names {
        let profile = &config.profiles[name];
        if name == &config.active_profile {
            println!("* {}", formatter.success(name));
        } else {
            println!("  {}", name);
        }
        print_profile(profile, "    ");
    }

    Ok(())
}

/// Show the active profile.
fn show_active_profile(config: &Config, formatter: &Formatter) -> Result<()> {
    let profile = config.get_active_profile()?;

    println!("Active profile: {}", formatter.success(&config.active_profile));
    print_profile(profile, "  ");

    Ok(())
}

fn print_profile(profile: &Profile, indent: &str) {
    println!("{}Database: {}", indent, profile.database.display());
    if let Some(owner) = &profile.owner {
        println!("{}Owner: {}", indent, owner);
    }
}

/// Switch to a different profile.
fn switch_profile(config: &mut Config, name: String, formatter: &Formatter) -> Result<()> {
    config.switch_profile(name.clone())?;
    config.save()?;
    println!(
        "{}",
        formatter.success(&format!("Switched to profile '{}'", name))
    );
    Ok(())
}

/// Create or update a profile.
fn set_profile(
    config: &mut Config,
    name: String,
    database: PathBuf,
    owner: Option<String>,
    formatter: &Formatter,
) -> Result<()> {
    let owner = owner
        .map(|raw| validation::address(&raw).map(|a| a.to_string()))
        .transpose()?;

    let action = if config.profiles.contains_key(&name) {
        "Updated"
    } else {
        "Created"
    };

    config.set_profile(name.clone(), Profile { database, owner });
    config.save()?;

    println!(
        "{}",
        formatter.success(&format!("{} profile '{}'", action, name))
    );

    Ok(())
}

/// Delete a profile.
fn delete_profile(config: &mut Config, name: String, formatter: &Formatter) -> Result<()> {
    if name == config.active_profile {
        return Err(CliError::NotPermitted(
            "Cannot delete the active profile".to_string(),
        ));
    }

    if config.profiles.remove(&name).is_some() {
        config.save()?;
        println!(
            "{}",
            formatter.success(&format!("Deleted profile '{}'", name))
        );
    } else {
        println!(
            "{}",
            formatter.warning(&format!("Profile '{}' does not exist", name))
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> Config {
        Config::load(Some(&dir.path().join("config.toml"))).unwrap()
    }

    #[test]
    fn test_set_and_switch_profile() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        let formatter = Formatter::new(OutputFormat::Table, false);

        set_profile(
            &mut config,
            "mill".to_string(),
            PathBuf::from("mill.db"),
            Some("0xBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB".to_string()),
            &formatter,
        )
        .unwrap();

        assert_eq!(
            config.profiles["mill"].owner.as_deref(),
            Some("0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb")
        );

        switch_profile(&mut config, "mill".to_string(), &formatter).unwrap();
        assert_eq!(config.active_profile, "mill");

        let reloaded = config_in(&dir);
        assert_eq!(reloaded.active_profile, "mill");
    }

    #[test]
    fn test_set_profile_rejects_bad_owner() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        let formatter = Formatter::new(OutputFormat::Table, false);

        let result = set_profile(
            &mut config,
            "bad".to_string(),
            PathBuf::from("bad.db"),
            Some("owner".to_string()),
            &formatter,
        );
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
        assert!(!config.profiles.contains_key("bad"));
    }

    #[test]
    fn test_delete_active_profile() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        let formatter = Formatter::new(OutputFormat::Table, false);

        let result = delete_profile(&mut config, "default".to_string(), &formatter);
        assert!(matches!(result, Err(CliError::NotPermitted(_))));
    }
}
