//! Run command — execute a text feature through the license gate

use anyhow::{bail, Result};
use std::path::Path;
use textpro_core::TextProConfig;

use super::open_service;
use crate::buffer::DocumentBuffer;
use crate::output::terminal::print_feature_result;

pub fn run(config: &TextProConfig, feature: &str, file: Option<&Path>) -> Result<()> {
    let mut buffer = match file {
        Some(path) => DocumentBuffer::from_file(path)?,
        None => DocumentBuffer::from_reader(std::io::stdin().lock())?,
    };

    let (service, _) = open_service(config)?;
    let result = service.execute_feature(feature, &mut buffer);
    if !result.success {
        bail!("{}", result.message);
    }
    print_feature_result(&result);

    // stdin mode: the transformed document goes to stdout
    if buffer.path().is_none() && buffer.is_modified() {
        print!("{}", buffer.as_str());
    }
    Ok(())
}
