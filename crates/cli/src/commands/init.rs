//! Initialize .textpro.toml configuration

use anyhow::Result;
use std::path::Path;
use textpro_core::config::CONFIG_FILENAME;
use textpro_core::TextProConfig;

pub fn run(path: Option<&Path>) -> Result<()> {
    let target_path = path.unwrap_or_else(|| Path::new("."));
    let config_path = target_path.join(CONFIG_FILENAME);

    if config_path.exists() {
        println!("⚠️  {} already exists at {:?}", CONFIG_FILENAME, config_path);
        return Ok(());
    }

    let config = TextProConfig::default();
    config.save(&config_path)?;

    println!("✅ Created {} at {:?}", CONFIG_FILENAME, config_path);
    println!("\nActivate your license with:");
    println!("  textpro activate <KEY>");

    Ok(())
}
