/// Config file location.
///
/// The config lives in the platform config directory under `surface-ruler/`.
/// Setting `SURFACE_RULER_CONFIG_DIR` points it somewhere else, which is how
/// development runs keep their config next to the checkout.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "surface-ruler";
const CONFIG_FILE: &str = "config.toml";
const CONFIG_DIR_ENV: &str = "SURFACE_RULER_CONFIG_DIR";

/// Directory holding `config.toml`.
pub fn config_dir() -> PathBuf {
    resolve_config_dir(std::env::var_os(CONFIG_DIR_ENV).map(PathBuf::from))
}

/// Full path of the config file.
pub fn config_file() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

/// Pick the override when set, otherwise the platform directory. Falls back
/// to the working directory when the platform has no config dir.
fn resolve_config_dir(override_dir: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = override_dir.filter(|d| !d.as_os_str().is_empty()) {
        return dir;
    }
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Ensure a directory exists, creating it and all parents if necessary.
/// Returns the path unchanged for chaining.
pub fn ensure_dir(path: &Path) -> &Path {
    let _ = std::fs::create_dir_all(path);
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins() {
        let dir = resolve_config_dir(Some(PathBuf::from("/tmp/ruler-test")));
        assert_eq!(dir, PathBuf::from("/tmp/ruler-test"));
    }

    #[test]
    fn empty_override_is_ignored() {
        let dir = resolve_config_dir(Some(PathBuf::new()));
        assert_eq!(dir, resolve_config_dir(None));
    }

    #[test]
    fn platform_dir_is_namespaced() {
        if dirs::config_dir().is_some() {
            assert!(resolve_config_dir(None).ends_with(APP_DIR));
        }
    }

    #[test]
    fn ensure_dir_returns_input() {
        let tmp = std::env::temp_dir().join("surface-ruler-ensure-dir-test");
        assert_eq!(ensure_dir(&tmp), tmp.as_path());
        assert!(tmp.is_dir());
    }
}
