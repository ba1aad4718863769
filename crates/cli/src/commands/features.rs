//! Features command — list free and premium features

use anyhow::Result;
use textpro_core::TextProConfig;

use super::open_service;
use crate::output;
use crate::OutputFormat;

pub fn run(config: &TextProConfig, format: OutputFormat) -> Result<()> {
    let (service, _) = open_service(config)?;
    let premium = service.is_premium_enabled();

    match format {
        OutputFormat::Terminal => output::terminal::print_features(premium),
        OutputFormat::Json => output::json::print(&output::json::features(premium)),
    }
    Ok(())
}
