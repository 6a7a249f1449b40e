//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use shop_core::{generate_default_config, StorefrontConfig};

use super::{ConfigArgs, ConfigCommand};
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let config = &ctx.config;

    ctx.output.info("[banner]");
    ctx.output.kv("country", &config.banner.country);
    ctx.output.kv("vat_percent", &config.banner.vat_percent.to_string());

    ctx.output.info("[catalog]");
    ctx.output.kv("endpoint", &config.catalog.endpoint);

    ctx.output.info("[workload]");
    ctx.output
        .kv("total_units", &config.workload.total_units.to_string());
    ctx.output
        .kv("chunk_size", &config.workload.chunk_size.to_string());

    ctx.output.info("[errors]");
    let mode = match config.errors.mode {
        shop_core::ErrorMode::Silent => "silent",
        shop_core::ErrorMode::Visible => "visible",
    };
    ctx.output.kv("mode", mode);

    Ok(())
}

fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(path) = &ctx.config_path else {
        bail!("No config file found. Run `storefront config init` to create one.");
    };

    let mut config = ctx.config.clone();
    set_config_value(&mut config, key, value)?;
    config.validate()?;
    config.save(path)?;

    ctx.output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    ctx.config.validate()?;

    let warnings = config_warnings(&ctx.config);
    if warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }
    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

fn set_config_value(config: &mut StorefrontConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["banner", "country"] => config.banner.country = value.to_string(),
        ["banner", "vat_percent"] => config.banner.vat_percent = value.parse()?,
        ["catalog", "endpoint"] => config.catalog.endpoint = value.to_string(),
        ["workload", "total_units"] => config.workload.total_units = value.parse()?,
        ["workload", "chunk_size"] => config.workload.chunk_size = value.parse()?,
        ["errors", "mode"] => config.errors.mode = value.parse()?,
        _ => bail!("Unknown config key: {}", key),
    }

    Ok(())
}

fn config_warnings(config: &StorefrontConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if !config.catalog.endpoint.starts_with("https://") {
        warnings.push(format!(
            "catalog.endpoint '{}' is not an https URL",
            config.catalog.endpoint
        ));
    }

    if config.workload.chunk_size > config.workload.total_units {
        warnings.push(
            "workload.chunk_size exceeds workload.total_units; the calculation runs in one chunk"
                .to_string(),
        );
    }

    if config.banner.vat_percent > 100 {
        warnings.push(format!(
            "banner.vat_percent {} is above 100",
            config.banner.vat_percent
        ));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_warnings() {
        assert!(config_warnings(&StorefrontConfig::default()).is_empty());
    }

    #[test]
    fn test_set_config_value() {
        let mut config = StorefrontConfig::default();
        set_config_value(&mut config, "banner.country", "Spain").unwrap();
        set_config_value(&mut config, "banner.vat_percent", "21").unwrap();
        set_config_value(&mut config, "errors.mode", "silent").unwrap();

        assert_eq!(config.banner.country, "Spain");
        assert_eq!(config.banner.vat_percent, 21);
        assert_eq!(config.errors.mode, shop_core::ErrorMode::Silent);

        assert!(set_config_value(&mut config, "workload.chunk_size", "lots").is_err());
        assert!(set_config_value(&mut config, "banner.flag", "x").is_err());
    }

    #[test]
    fn test_warnings() {
        let mut config = StorefrontConfig::default();
        config.catalog.endpoint = "http://localhost:8080/products".to_string();
        config.workload.chunk_size = config.workload.total_units + 1;

        let warnings = config_warnings(&config);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("https"));
        assert!(warnings[1].contains("one chunk"));
    }
}
