//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Directory name under the user config root.
const APP_DIR: &str = "moviefind";

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Resolves the config file path.
///
/// Lookup order:
/// 1. `{dir}/config.toml` when `--dir` is given
/// 2. `$XDG_CONFIG_HOME/moviefind/config.toml` when set to an absolute path
/// 3. `$HOME/.config/moviefind/config.toml`
///
/// # Errors
///
/// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is usable
/// (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    config_path_from(
        dir.map(PathBuf::as_path),
        std::env::var("XDG_CONFIG_HOME").ok(),
        std::env::var("HOME").ok(),
    )
}

/// Picks the config path from already-read environment values.
fn config_path_from(
    dir: Option<&Path>,
    xdg_config_home: Option<String>,
    home: Option<String>,
) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }

    // Relative XDG paths are invalid and ignored.
    let config_root = xdg_config_home
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .or_else(|| {
            home.filter(|h| !h.is_empty())
                .map(|h| PathBuf::from(h).join(".config"))
        });
    let Some(root) = config_root else {
        bail!("cannot locate the config directory: neither XDG_CONFIG_HOME nor HOME is set");
    };
    Ok(root.join(APP_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_dir_overrides_environment() {
        // Arrange
        let dir = PathBuf::from("/tmp/moviefind-work");

        // Act
        let path = config_path_from(
            Some(&dir),
            Some(String::from("/xdg")),
            Some(String::from("/home/u")),
        )
        .unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/tmp/moviefind-work/config.toml"));
    }

    #[test]
    fn test_xdg_config_home_preferred_over_home() {
        // Arrange & Act
        let path = config_path_from(
            None,
            Some(String::from("/xdg")),
            Some(String::from("/home/u")),
        )
        .unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/xdg/moviefind/config.toml"));
    }

    #[test]
    fn test_relative_or_empty_xdg_falls_back_to_home() {
        // Arrange & Act
        let relative = config_path_from(
            None,
            Some(String::from("xdg")),
            Some(String::from("/home/u")),
        )
        .unwrap();
        let empty =
            config_path_from(None, Some(String::new()), Some(String::from("/home/u"))).unwrap();

        // Assert
        let expected = PathBuf::from("/home/u/.config/moviefind/config.toml");
        assert_eq!(relative, expected);
        assert_eq!(empty, expected);
    }

    #[test]
    fn test_no_config_root_fails() {
        // Arrange & Act
        let result = config_path_from(None, None, Some(String::new()));

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("cannot locate the config directory")
        );
    }

    #[test]
    fn test_resolve_with_dir() {
        // Arrange
        let dir = PathBuf::from("/tmp/moviefind-work");

        // Act
        let path = resolve_config_path(Some(&dir)).unwrap();

        // Assert
        assert!(path.ends_with("moviefind-work/config.toml"));
    }
}
