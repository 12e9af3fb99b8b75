//! Status command implementation

use colored::Colorize;

use transip_dns::store::{StoreLocation, open_store};
use transip_dns::{AuthConfig, Result};

use crate::cli::GlobalOptions;
use crate::cli::context::load_config;

/// Display configuration and token cache status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "TransIP DNS Status".bold());

    let (path, config) = match load_config(opts) {
        Ok(loaded) => loaded,
        Err(e) => {
            println!("{} Configuration not usable: {}", "✗".red(), e);
            println!();
            println!(
                "Create {} with at least {} and {}.",
                "~/.transip-dns/config.yaml".cyan(),
                "login".bold(),
                "private_key".bold()
            );
            println!();
            return Ok(());
        }
    };

    println!("Config file: {}", path.display().to_string().cyan());
    println!("Login: {}", config.login.bold());
    println!();

    let scope = if config.read_only() {
        "read only".yellow()
    } else {
        "read/write".green()
    };
    println!("{} Token scope: {}", "✓".green(), scope);
    if config.global_key() {
        println!("{} Key usable from any IP", "✓".green());
    } else {
        println!("{} Key restricted to whitelisted IPs", "○".dimmed());
    }
    println!(
        "{} Token lifetime: {}",
        "✓".green(),
        config.resolved_expiration()
    );
    println!(
        "{} Zone control: {}",
        "✓".green(),
        config.client_control_mode.as_str()
    );

    if config.private_key().is_err() {
        println!("{} Private key cannot be loaded", "✗".red());
    }

    println!();

    let location = config.store_location();
    let key = config.storage_key();
    match &location {
        StoreLocation::Memory => println!("Token storage: {}", "memory".cyan()),
        StoreLocation::Directory(dir) => {
            println!("Token storage: {}", dir.display().to_string().cyan())
        }
    }
    println!("Storage key: {}", key.dimmed());

    // Reading must not create the token directory.
    let cached = match &location {
        StoreLocation::Directory(dir) if !dir.is_dir() => None,
        _ => open_store(&location).get(&key)?,
    };

    match cached {
        Some(token) if !token.is_expired() => match token.expires_at() {
            Some(expires) => {
                let remaining = expires.signed_duration_since(chrono::Utc::now());
                println!(
                    "{} Token valid (expires in {}h {}m)",
                    "✓".green(),
                    remaining.num_hours(),
                    remaining.num_minutes() % 60
                );
            }
            None => println!("{} Token cached", "✓".green()),
        },
        Some(_) => println!(
            "{} Token expired (will refresh on next command)",
            "⚠".yellow()
        ),
        None => println!(
            "{} Token not cached (will authenticate on next command)",
            "○".dimmed()
        ),
    }

    println!();
    Ok(())
}
