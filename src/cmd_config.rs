//! `check-config` command.

use std::path::Path;

use tabflow_config::{ConfigLoader, ConfigValidator};

pub(crate) fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigLoader::load_or_default(config_path)?;
    let validation = ConfigValidator::validate(&config);

    for warning in &validation.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for e in &validation.errors {
        println!("error: {}: {}", e.path, e.message);
    }

    if !validation.is_valid() {
        return Err(format!("{} error(s) in configuration", validation.errors.len()).into());
    }
    println!(
        "Configuration OK (server {}:{}, {} credential(s))",
        config.server.host,
        config.server.port,
        config.credentials.api_keys.len()
    );
    Ok(())
}
