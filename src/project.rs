//! Reads metadata fields out of a Godot `project.godot` descriptor.
//!
//! One fixed extraction pattern per field name, applied to the raw file text.
//! This is lookup, not parsing: the descriptor's ini-like format is stable
//! enough that a regex per field is what the upstream tool relies on.

use std::fs;
use std::path::Path;

use regex::Regex;

use crate::error::{Error, Result};

pub const PROJECT_FILE: &str = "project.godot";

fn pattern_for(field: &str) -> Result<&'static str> {
    match field {
        "project_name" => Ok(r#"config/name="([^"]+)""#),
        "project_version" => Ok(r#"config/version="([^"]+)""#),
        "description" => Ok(r#"config/description="([^"]+)""#),
        "godot_version" => Ok(r#"config/features=PackedStringArray\("([^"]+)""#),
        "icon" => Ok(r#"config/icon="res:/([^"]+)""#),
        _ => Err(Error::UnknownField {
            field: field.to_string(),
        }),
    }
}

/// Extracts a named field from descriptor text. `Ok(None)` when the field has
/// a pattern but the descriptor does not define it; the caller decides the
/// fallback.
pub fn field_in(content: &str, field: &str) -> Result<Option<String>> {
    let pattern = Regex::new(pattern_for(field)?).expect("static pattern");
    Ok(pattern
        .captures(content)
        .map(|captures| captures[1].to_string()))
}

/// Reads a named field from `project.godot` in the working directory.
pub fn read_field(field: &str) -> Result<Option<String>> {
    if !Path::new(PROJECT_FILE).exists() {
        tracing::debug!(field, "No project.godot found, field left unset");
        return Ok(None);
    }
    let content = fs::read_to_string(PROJECT_FILE)?;
    field_in(&content, field)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTOR: &str = r#"
; Engine configuration file.

[application]

config/name="My Plugin"
config/description="Does useful things"
config/version="1.2.3"
config/features=PackedStringArray("4.2", "GL Compatibility")
config/icon="res://icon.svg"
"#;

    #[test]
    fn extracts_each_known_field() {
        assert_eq!(
            field_in(DESCRIPTOR, "project_name").unwrap().as_deref(),
            Some("My Plugin")
        );
        assert_eq!(
            field_in(DESCRIPTOR, "project_version").unwrap().as_deref(),
            Some("1.2.3")
        );
        assert_eq!(
            field_in(DESCRIPTOR, "description").unwrap().as_deref(),
            Some("Does useful things")
        );
        assert_eq!(
            field_in(DESCRIPTOR, "godot_version").unwrap().as_deref(),
            Some("4.2")
        );
        assert_eq!(
            field_in(DESCRIPTOR, "icon").unwrap().as_deref(),
            Some("/icon.svg")
        );
    }

    #[test]
    fn absent_field_yields_none() {
        assert_eq!(field_in("[application]\n", "project_name").unwrap(), None);
    }

    #[test]
    fn unknown_field_name_is_an_error() {
        let result = field_in(DESCRIPTOR, "no_such_field");
        assert!(matches!(result, Err(Error::UnknownField { field }) if field == "no_such_field"));
    }
}
