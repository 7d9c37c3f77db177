use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::ConfigError;

const APP_DIR: &str = "skanda";
const CONFIG_FILE: &str = "config.json";

/// Runtime settings
///
/// Every field is optional in the file; anything missing falls back to
/// the defaults below, which reproduce the stock behaviour.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory holding one sub-directory per folder
    pub asset_root: PathBuf,
    /// The fixed folder set, in menu order. The first one is selected on launch.
    pub folders: Vec<String>,
    /// Lower zoom bound in full-screen mode
    pub min_scale: f32,
    /// Upper zoom bound in full-screen mode
    pub max_scale: f32,
    /// Rotation the full-screen viewer starts at
    pub fullscreen_rotation_degrees: f32,
    /// Rotation of the preview on the browsing screen
    pub preview_rotation_degrees: f32,
    /// Max delay between the two taps of a double-tap
    pub double_tap_timeout_ms: u64,
    /// Zoom factor per wheel line
    pub wheel_zoom_base: f32,
    /// Rotation per wheel line while Shift is held
    pub wheel_rotation_step_degrees: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            folders: vec!["level1".into(), "lunar".into(), "solar".into()],
            min_scale: 0.5,
            max_scale: 5.0,
            fullscreen_rotation_degrees: 90.0,
            preview_rotation_degrees: 90.0,
            double_tap_timeout_ms: 300,
            wheel_zoom_base: 1.1,
            wheel_rotation_step_degrees: 15.0,
        }
    }
}

impl Config {
    /// Load settings from the user config directory.
    ///
    /// A missing file yields the defaults silently. An unreadable or invalid
    /// file is logged and also yields the defaults, so a bad edit never keeps
    /// the app from starting.
    pub fn load() -> Self {
        let Some(path) = default_path() else {
            debug!("No config directory on this platform, using defaults");
            return Self::default();
        };

        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load_from_path(&path) {
            Ok(config) => {
                info!("⚙️  Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load and validate settings from a specific file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the rest of the app relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.folders.is_empty() {
            return Err(ConfigError::Invalid("folder list is empty".into()));
        }

        let mut seen = HashSet::new();
        for folder in &self.folders {
            if !is_single_component(folder) {
                return Err(ConfigError::Invalid(format!(
                    "folder {folder:?} must be a plain directory name"
                )));
            }
            if !seen.insert(folder.as_str()) {
                return Err(ConfigError::Invalid(format!("folder {folder:?} listed twice")));
            }
        }

        if !(self.min_scale > 0.0 && self.min_scale <= 1.0 && self.max_scale >= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "scale bounds must satisfy 0 < min <= 1 <= max (got {}..{})",
                self.min_scale, self.max_scale
            )));
        }

        if !(self.wheel_zoom_base > 1.0) {
            return Err(ConfigError::Invalid("wheel_zoom_base must be greater than 1".into()));
        }

        Ok(())
    }

    /// Where to actually read assets from.
    ///
    /// A relative `asset_root` is tried against the working directory first,
    /// then next to the executable, so the bundled `assets/` is found no
    /// matter where the app is launched from.
    pub fn resolved_asset_root(&self) -> PathBuf {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        resolve_asset_root(&self.asset_root, exe_dir.as_deref())
    }
}

fn resolve_asset_root(root: &Path, exe_dir: Option<&Path>) -> PathBuf {
    if root.is_absolute() || root.is_dir() {
        return root.to_path_buf();
    }

    if let Some(beside_exe) = exe_dir.map(|dir| dir.join(root)).filter(|p| p.is_dir()) {
        return beside_exe;
    }

    warn!(
        "Asset root {} not found in the working directory or next to the executable",
        root.display()
    );
    root.to_path_buf()
}

/// `true` when `name` is one normal path component (no separators, no `..`)
pub fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(std::path::Component::Normal(_)), None)
    )
}

fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_DIR);
        path.push(CONFIG_FILE);
        path
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.folders, vec!["level1", "lunar", "solar"]);
        assert_eq!(config.min_scale, 0.5);
        assert_eq!(config.max_scale, 5.0);
        assert_eq!(config.fullscreen_rotation_degrees, 90.0);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_json(r#"{ "folders": ["mars"], "max_scale": 8.0 }"#).unwrap();
        assert_eq!(config.folders, vec!["mars"]);
        assert_eq!(config.max_scale, 8.0);
        assert_eq!(config.min_scale, 0.5);
        assert_eq!(config.asset_root, PathBuf::from("assets"));
    }

    #[test]
    fn test_rejects_bad_folders() {
        assert!(matches!(
            Config::from_json(r#"{ "folders": [] }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{ "folders": ["a", "a"] }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{ "folders": ["../etc"] }"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_bad_scale_bounds() {
        assert!(Config::from_json(r#"{ "min_scale": 0.0 }"#).is_err());
        assert!(Config::from_json(r#"{ "min_scale": 2.0 }"#).is_err());
        assert!(Config::from_json(r#"{ "max_scale": 0.9 }"#).is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(Config::from_json("{ nope"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "asset_root": "/srv/pictures" }"#).unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.asset_root, PathBuf::from("/srv/pictures"));

        let missing = Config::load_from_path(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_asset_root_found_beside_executable() {
        let exe_dir = tempfile::tempdir().unwrap();
        let root = Path::new("skanda-test-assets-beside-exe");
        std::fs::create_dir(exe_dir.path().join(root)).unwrap();

        assert_eq!(
            resolve_asset_root(root, Some(exe_dir.path())),
            exe_dir.path().join(root)
        );
    }

    #[test]
    fn test_asset_root_absolute_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve_asset_root(dir.path(), None), dir.path());

        let missing = Path::new("skanda-test-assets-nowhere");
        let exe_dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve_asset_root(missing, Some(exe_dir.path())), missing);
    }

    #[test]
    fn test_single_component() {
        assert!(is_single_component("lunar"));
        assert!(is_single_component("moon.png"));
        assert!(!is_single_component(""));
        assert!(!is_single_component(".."));
        assert!(!is_single_component("a/b"));
        assert!(!is_single_component("/abs"));
    }
}
