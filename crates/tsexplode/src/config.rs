//! Configuration types for flattening runs.
//!
//! All types implement [`serde::Deserialize`] so a run can be configured from
//! an external file. Every field has a default, so an empty document is a
//! valid configuration.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the two sections.
//! - [`ExplodeConfig`] - Controls how entries are selected and flattened.
//! - [`OutputConfig`] - Controls how output units are laid out and written.
//!
//! # Example
//!
//! ```
//! # use tsexplode::config::{AppConfig, EnumMode};
//! let config = AppConfig::default();
//! assert_eq!(config.explode().enum_mode(), EnumMode::Value);
//! assert_eq!(config.explode().marker_tag(), "document");
//! assert!(config.output().overwrite());
//! ```

use std::{fmt, str::FromStr};

use serde::Deserialize;

/// Top-level configuration combining the flattening and output sections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Flattening configuration section.
    #[serde(default)]
    explode: ExplodeConfig,

    /// Output configuration section.
    #[serde(default)]
    output: OutputConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its two sections.
    pub fn new(explode: ExplodeConfig, output: OutputConfig) -> Self {
        Self { explode, output }
    }

    /// Returns the flattening configuration.
    pub fn explode(&self) -> &ExplodeConfig {
        &self.explode
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }
}

/// How enum member literals are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumMode {
    /// The member identifier, e.g. `CELL`.
    #[serde(alias = "NAME", alias = "Name")]
    Name,
    /// The member value: a double-quoted string or bare numeric text.
    #[default]
    #[serde(alias = "VALUE", alias = "Value")]
    Value,
}

impl fmt::Display for EnumMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => f.write_str("name"),
            Self::Value => f.write_str("value"),
        }
    }
}

impl FromStr for EnumMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "value" => Ok(Self::Value),
            _ => Err(format!(
                "invalid enum mode `{s}`, expected `name` or `value`"
            )),
        }
    }
}

/// Controls entry selection and flattening.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExplodeConfig {
    /// Rendering of enum member literals.
    enum_mode: EnumMode,

    /// Carry entry and property doc comments into the output.
    include_doc_comments: bool,

    /// Doc tag that marks an interface as an entry, without the `@`.
    marker_tag: String,
}

impl Default for ExplodeConfig {
    fn default() -> Self {
        Self {
            enum_mode: EnumMode::default(),
            include_doc_comments: false,
            marker_tag: "document".to_string(),
        }
    }
}

impl ExplodeConfig {
    pub fn with_enum_mode(mut self, enum_mode: EnumMode) -> Self {
        self.enum_mode = enum_mode;
        self
    }

    pub fn with_doc_comments(mut self, include: bool) -> Self {
        self.include_doc_comments = include;
        self
    }

    pub fn with_marker_tag(mut self, marker_tag: impl Into<String>) -> Self {
        self.marker_tag = marker_tag.into();
        self
    }

    pub fn enum_mode(&self) -> EnumMode {
        self.enum_mode
    }

    pub fn include_doc_comments(&self) -> bool {
        self.include_doc_comments
    }

    pub fn marker_tag(&self) -> &str {
        &self.marker_tag
    }
}

/// Controls the layout and naming of output units.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Replace output units that already exist in the sink.
    overwrite: bool,

    /// Spaces per nesting level.
    indent_width: usize,

    /// Appended to the entry name to form the sink name.
    file_suffix: String,

    /// Extension of files written by the file emitter, without the dot.
    file_extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            overwrite: true,
            indent_width: 4,
            file_suffix: "-doc".to_string(),
            file_extension: "ts".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_indent_width(mut self, indent_width: usize) -> Self {
        self.indent_width = indent_width;
        self
    }

    pub fn with_file_suffix(mut self, file_suffix: impl Into<String>) -> Self {
        self.file_suffix = file_suffix.into();
        self
    }

    pub fn with_file_extension(mut self, file_extension: impl Into<String>) -> Self {
        self.file_extension = file_extension.into();
        self
    }

    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    pub fn indent_width(&self) -> usize {
        self.indent_width
    }

    pub fn file_suffix(&self) -> &str {
        &self.file_suffix
    }

    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    /// Returns the sink name of the output unit for `entry`.
    pub fn unit_name(&self, entry: &str) -> String {
        format!("{entry}{}", self.file_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: AppConfig = toml::from_str("").expect("empty config should parse");

        assert_eq!(config.explode().enum_mode(), EnumMode::Value);
        assert!(!config.explode().include_doc_comments());
        assert_eq!(config.output().indent_width(), 4);
        assert_eq!(config.output().unit_name("Contact"), "Contact-doc");
        assert_eq!(config.output().file_extension(), "ts");
    }

    #[test]
    fn test_partial_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [explode]
            enum_mode = "NAME"

            [output]
            overwrite = false
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.explode().enum_mode(), EnumMode::Name);
        assert_eq!(config.explode().marker_tag(), "document");
        assert!(!config.output().overwrite());
        assert_eq!(config.output().file_suffix(), "-doc");
    }

    #[test]
    fn test_unknown_enum_mode_is_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[explode]\nenum_mode = \"ordinal\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_enum_mode_from_str() {
        assert_eq!("Value".parse::<EnumMode>(), Ok(EnumMode::Value));
        assert_eq!("name".parse::<EnumMode>(), Ok(EnumMode::Name));
        assert!("both".parse::<EnumMode>().is_err());
    }
}
