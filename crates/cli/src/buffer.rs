//! File- or stdin-backed document for text features

use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use textpro_core::features::{FeatureError, TextBuffer};

/// The document a `textpro run` invocation operates on.
///
/// With a path, `replace_all` rewrites the file in place. Without one the
/// text comes from stdin and edits stay in memory for the caller to print.
#[derive(Debug)]
pub struct DocumentBuffer {
    path: Option<PathBuf>,
    text: String,
    modified: bool,
}

impl DocumentBuffer {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            text,
            modified: false,
        })
    }

    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        Ok(Self::from_text(text))
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            path: None,
            text: text.into(),
            modified: false,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl TextBuffer for DocumentBuffer {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn replace_all(&mut self, text: String) -> Result<(), FeatureError> {
        if let Some(path) = &self.path {
            std::fs::write(path, &text)
                .map_err(|e| FeatureError::Write(format!("{}: {}", path.display(), e)))?;
        }
        self.text = text;
        self.modified = true;
        Ok(())
    }
}
