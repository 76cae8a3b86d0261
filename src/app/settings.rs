use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::controller::ControllerConfig;
use crate::error::Result;
use crate::model::AspectConstraint;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub default_quality: u8,
    /// Last used aspect, as `"W:H"` or `"free"`.
    pub aspect: String,
    pub aspect_presets: Vec<String>,
    pub corner_tolerance: f32,
    pub min_selection_size: f32,
    pub handle_size: f32,
    pub outline_width: f32,
    pub overlay_alpha: u8,
    pub window_size: [f32; 2],
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_quality: 100,
            aspect: "free".to_string(),
            aspect_presets: ["1:1", "4:3", "16:9", "3:2"]
                .into_iter()
                .map(String::from)
                .collect(),
            corner_tolerance: 10.0,
            min_selection_size: 10.0,
            handle_size: 8.0,
            outline_width: 2.0,
            overlay_alpha: 128,
            window_size: [1200.0, 800.0],
        }
    }
}

impl AppSettings {
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            corner_tolerance: self.corner_tolerance,
            min_size: self.min_selection_size,
        }
    }

    pub fn initial_aspect(&self) -> AspectConstraint {
        self.aspect.parse().unwrap_or_else(|e| {
            warn!("Ignoring configured aspect: {e}");
            AspectConstraint::Free
        })
    }

    /// Presets that parse as ratios; malformed entries are skipped.
    pub fn presets(&self) -> Vec<(String, AspectConstraint)> {
        self.aspect_presets
            .iter()
            .filter_map(|s| match s.parse::<AspectConstraint>() {
                Ok(c @ AspectConstraint::Ratio { .. }) => Some((s.trim().to_string(), c)),
                Ok(AspectConstraint::Free) => None,
                Err(e) => {
                    warn!("Skipping aspect preset: {e}");
                    None
                }
            })
            .collect()
    }
}

/// First settings file that exists: `~/.config/cropper.toml`, then
/// `./settings.toml`.
pub fn config_path() -> Option<PathBuf> {
    let user = std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".config").join("cropper.toml"));
    user.into_iter()
        .chain([PathBuf::from("settings.toml")])
        .find(|path| path.exists())
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

/// Either format is accepted; the extension only decides which is tried first.
fn parse(text: &str, prefer_toml: bool) -> Option<AppSettings> {
    let from_toml = || toml::from_str::<AppSettings>(text).ok();
    let from_json = || serde_json::from_str::<AppSettings>(text).ok();
    if prefer_toml {
        from_toml().or_else(from_json)
    } else {
        from_json().or_else(from_toml)
    }
}

pub fn load_settings(path: &Path) -> Option<AppSettings> {
    let text = std::fs::read_to_string(path).ok()?;
    let settings = parse(&text, is_toml(path));
    if settings.is_none() {
        warn!("Ignoring unreadable settings in {}", path.display());
    }
    settings
}

pub fn save_settings(path: &Path, settings: &AppSettings) -> Result<()> {
    let text = if is_toml(path) {
        toml::to_string_pretty(settings)?
    } else {
        serde_json::to_string_pretty(settings)?
    };
    std::fs::write(path, text)?;
    Ok(())
}
