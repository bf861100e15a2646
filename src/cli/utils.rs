//! Utility functions for CLI commands

use crate::PatternCatalog;
use std::borrow::Cow;
use std::io::{self, Read};

/// Get input text from positional words, or stdin when there are none
pub fn get_input_text(positional: &[String]) -> Result<String, String> {
    if !positional.is_empty() {
        Ok(positional.join(" "))
    } else {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        Ok(buffer.trim().to_string())
    }
}

/// The built-in catalog, or one loaded from a TOML file
pub fn load_catalog(path: Option<&str>) -> Result<Cow<'static, PatternCatalog>, String> {
    match path {
        Some(path) => PatternCatalog::from_path(path)
            .map(Cow::Owned)
            .map_err(|e| format!("Failed to load catalog: {}", e)),
        None => Ok(Cow::Borrowed(PatternCatalog::e2e())),
    }
}
