//! Configuration source locations
//!
//! Rule files are looked up in tiers, searched in order:
//!
//! 1. An explicit override: `$SYNTAXKIT_CONFIG_DIR` (or `--config-dir`)
//! 2. The user config directory:
//!    - Unix/macOS: `$XDG_CONFIG_HOME/syntaxkit/syntaxes` or `~/.config/syntaxkit/syntaxes`
//!    - Windows: `%APPDATA%\syntaxkit\syntaxes`
//! 3. The bundled rule files compiled into the binary
//!
//! An earlier tier shadows a later one for any extension both claim.

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming an override directory
pub const CONFIG_DIR_ENV: &str = "SYNTAXKIT_CONFIG_DIR";

const APP_DIR: &str = "syntaxkit";

/// One place configuration sources are loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceTier {
    /// Explicitly requested directory
    Override(PathBuf),
    /// Per-user config directory
    User(PathBuf),
    /// Rule files embedded in the binary
    Bundled,
}

impl SourceTier {
    /// Directory backing this tier, if it has one
    pub fn dir(&self) -> Option<&Path> {
        match self {
            SourceTier::Override(dir) | SourceTier::User(dir) => Some(dir.as_path()),
            SourceTier::Bundled => None,
        }
    }
}

/// Ordered list of tiers to search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
    tiers: Vec<SourceTier>,
}

impl SearchPath {
    /// Search exactly the given tiers, in order
    pub fn new(tiers: Vec<SourceTier>) -> Self {
        Self { tiers }
    }

    /// Override (if set) → user directory (if known) → bundled
    pub fn from_env() -> Self {
        let mut tiers = Vec::new();
        if let Some(dir) = env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
            tiers.push(SourceTier::Override(PathBuf::from(dir)));
        }
        if let Some(dir) = user_syntaxes_dir() {
            tiers.push(SourceTier::User(dir));
        }
        tiers.push(SourceTier::Bundled);
        Self { tiers }
    }

    /// Only the bundled rule files
    pub fn bundled_only() -> Self {
        Self {
            tiers: vec![SourceTier::Bundled],
        }
    }

    /// Put `dir` first, replacing any existing override
    pub fn with_override(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tiers.retain(|t| !matches!(t, SourceTier::Override(_)));
        self.tiers.insert(0, SourceTier::Override(dir.into()));
        self
    }

    /// Tiers in search order
    pub fn tiers(&self) -> &[SourceTier] {
        &self.tiers
    }
}

impl Default for SearchPath {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Base config directory for syntaxkit
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/syntaxkit`
///   - Else: `~/.config/syntaxkit`
///
/// Windows:
///   - `%APPDATA%\syntaxkit`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        // XDG-style on macOS too: dirs::config_dir() would give ~/Library/Application Support
        env::var_os("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/syntaxkit/syntaxes/`
pub fn user_syntaxes_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("syntaxes"))
}
