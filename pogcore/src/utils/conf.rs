use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    magic::ENV_CONFIG_PATH,
    utils::error::{PogError, PogResult},
};

/// Options controlling how strictly documents are read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Reject unknown children of `Proof_Obligations`, `Proof_Obligation` and
    /// `Simple_Goal` instead of skipping them.
    pub strict_elements: bool,

    /// Require every `Ref_Hyp` index to address an existing local hypothesis of the
    /// enclosing group. Off by default: indices are stored as found.
    pub check_local_hyp_refs: bool,
}

/// Options controlling the layout of written documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Number of spaces per nesting level. `0` writes everything on one line.
    pub indent: usize,

    /// Emit an `<?xml version="1.0" encoding="UTF-8"?>` header.
    pub xml_declaration: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            indent: 4,
            xml_declaration: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub reader: ReaderConfig,
    pub writer: WriterConfig,
}

impl CodecConfig {
    /// Get the default path to the configuration file.
    pub fn default_path() -> PathBuf {
        if let Ok(config_path) = std::env::var(ENV_CONFIG_PATH) {
            return config_path.into();
        }

        let mut path = PathBuf::new();

        #[cfg(target_os = "windows")]
        {
            if let Ok(appdata) = std::env::var("APPDATA") {
                path.push(appdata);
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
                path.push(xdg_config_home);
            } else if let Ok(home) = std::env::var("HOME") {
                path.push(home);
                path.push(".config");
            }
        }

        path.push("pogcore");
        path.push("config.toml");
        path
    }

    /// Parse a configuration from TOML text. `origin` names the source in error messages.
    pub fn from_toml_str(toml_str: &str, origin: &str) -> PogResult<Self> {
        toml::from_str(toml_str).map_err(|e| PogError::Config {
            source: e,
            file: origin.to_string(),
        })
    }

    /// Load a configuration from a TOML file.
    pub fn load_from_toml(path: &Path) -> PogResult<Self> {
        let toml_str = std::fs::read_to_string(path).map_err(|e| PogError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_toml_str(&toml_str, &path.display().to_string())
    }

    /// Load the configuration at [`Self::default_path`], falling back to defaults when
    /// no file exists there.
    pub fn load_default() -> PogResult<Self> {
        let path = Self::default_path();
        if path.is_file() {
            Self::load_from_toml(&path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let conf = CodecConfig::from_toml_str("[reader]\ncheck_local_hyp_refs = true\n", "inline")
            .unwrap();
        assert!(conf.reader.check_local_hyp_refs);
        assert!(!conf.reader.strict_elements);
        assert_eq!(conf.writer, WriterConfig::default());
    }

    #[test]
    fn invalid_toml_names_origin() {
        let err = CodecConfig::from_toml_str("[writer]\nindent = \"wide\"\n", "conf.toml")
            .unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("conf.toml"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[writer]\nindent = 2\nxml_declaration = true\n").unwrap();

        let conf = CodecConfig::load_from_toml(&path).unwrap();
        assert_eq!(conf.writer.indent, 2);
        assert!(conf.writer.xml_declaration);
    }
}
