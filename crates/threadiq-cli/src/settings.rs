//! Configuration for the `threadiq` binary.
//!
//! Values come from an optional TOML file layered with `THREADIQ_*`
//! environment variables, e.g. `THREADIQ_STORE_PATH=/tmp/w.db`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;
use threadiq_core::view::{SortBy, ViewMode};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub store_path: PathBuf,
  /// Sort order for `list` when `--sort` is not given.
  pub sort_by:    SortBy,
  pub view_mode:  ViewMode,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      store_path: PathBuf::from("~/.local/share/threadiq/wardrobe.db"),
      sort_by:    SortBy::Recent,
      view_mode:  ViewMode::List,
    }
  }
}

impl Settings {
  /// Read `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("THREADIQ"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise Settings")
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_falls_back_to_defaults() {
    let s = Settings::load(Path::new("/nonexistent/threadiq.toml")).unwrap();
    assert_eq!(s.sort_by, SortBy::Recent);
    assert_eq!(s.view_mode, ViewMode::List);
  }

  #[test]
  fn tilde_is_expanded_against_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    let expanded = expand_tilde(Path::new("~/w.db"));
    assert_eq!(expanded, PathBuf::from(home).join("w.db"));
    assert_eq!(expand_tilde(Path::new("/abs/w.db")), PathBuf::from("/abs/w.db"));
  }
}
