//! Configuration management commands.

use std::path::Path;

use anyhow::{Context, Result};
use brickvault::EncryptionKey;
use brickvault_config::{BrickvaultConfig, ConfigLoader, ConfigSource};

use crate::style::{
    colors::SemanticStyle, print_error, print_heading, print_hint, print_info_table,
    print_success, print_warn,
};

fn load(project: &str) -> Result<BrickvaultConfig> {
    ConfigLoader::new()
        .with_project_dir(project)
        .load()
        .context("Failed to load configuration")
}

fn sources(project: &str) -> Vec<ConfigSource> {
    ConfigLoader::new().with_project_dir(project).sources()
}

/// Show the effective configuration.
pub fn show(project: &str, format: &str) -> Result<()> {
    let config = load(project)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&config)?),
        "toml" => println!("{}", config.to_toml()?),
        "text" => print_text(&config, &sources(project)),
        other => anyhow::bail!("Unknown format '{other}'. Expected text, toml or json."),
    }

    Ok(())
}

fn print_text(config: &BrickvaultConfig, sources: &[ConfigSource]) {
    print_heading("Sources");
    if sources.is_empty() {
        println!("  {}", "defaults only".muted());
    }
    for source in sources {
        println!("  {source}");
    }

    print_heading("Platform");
    print_info_table(&[
        ("Name", config.platform.name.clone()),
        ("Environment", format!("{:?}", config.platform.environment)),
        ("Log level", config.logging.level.clone()),
        ("Log format", format!("{:?}", config.logging.format)),
    ]);

    print_heading("Protection");
    let key_state = if std::env::var_os(&config.protection.key_env).is_some() {
        "set".success()
    } else {
        "missing".error()
    };
    print_info_table(&[
        ("Key variable", config.protection.key_env.clone()),
        ("Key present", key_state),
    ]);

    print_heading("KYC");
    print_info_table(&[
        ("Minimum age", config.kyc.minimum_age.to_string()),
        ("Allow resubmission", config.kyc.allow_resubmission.to_string()),
    ]);

    print_heading("Vendors");
    for (name, vendor) in config.vendors.iter() {
        let url = if vendor.is_enabled() {
            vendor.base_url.clone()
        } else {
            "disabled".muted()
        };
        println!("  {} {} ({})", name.code(), url, vendor.credential_env);
    }
}

/// Validate the effective configuration and the presence of the key.
pub fn validate(project: &str) -> Result<()> {
    let project_path = Path::new(project);
    println!("Validating configuration in {}...", project_path.display());

    let sources = sources(project);
    if sources.is_empty() {
        print_hint("No brickvault.toml found, validating defaults and environment");
    }
    for source in &sources {
        println!("  layer {source}");
    }

    let config = load(project)?;
    if let Err(e) = config.validate() {
        print_error(&format!("Configuration validation failed: {e}"));
        return Err(e.into());
    }

    let secret = match config.encryption_secret() {
        Ok(secret) => secret,
        Err(e) => {
            print_error(&e.to_string());
            return Err(e.into());
        }
    };
    if let Err(e) = EncryptionKey::from_secret(&secret) {
        print_error(&format!("{} is unusable: {e}", config.protection.key_env));
        return Err(e.into());
    }

    for (name, vendor) in config.vendors.iter() {
        if vendor.is_enabled() && std::env::var_os(&vendor.credential_env).is_none() {
            print_warn(&format!("vendors.{name}: {} is not set", vendor.credential_env));
        }
    }

    print_success("Configuration is valid");
    Ok(())
}
