//! Player settings and visual themes
//!
//! Persisted as `settings.json` next to the profile store. Game rules are not
//! settings; they live in `consts` and the difficulty table.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::{StoreError, data_dir};

/// Body colors for obstacle buildings, indexed by `BuildingDetails::body_color`
pub const BUILDING_PALETTE: [&str; 12] = [
    "#1e293b", "#334155", "#475569", "#3f3f46", "#27272a", "#18181b", "#44403c", "#292524",
    "#1c1917", "#374151", "#1f2937", "#111827",
];

/// Window colors, indexed by `BuildingDetails::window_color`
pub const WINDOW_PALETTE: [&str; 4] = [
    "rgba(253, 224, 71, 0.4)",
    "rgba(255, 255, 255, 0.3)",
    "rgba(186, 230, 253, 0.4)",
    "rgba(254, 240, 138, 0.2)",
];

/// Visual theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    NightFlight,
    DayFlight,
    Cyberpunk,
    Industrial,
}

impl Theme {
    pub const ALL: [Theme; 4] = [
        Theme::NightFlight,
        Theme::DayFlight,
        Theme::Cyberpunk,
        Theme::Industrial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::NightFlight => "Night Flight",
            Theme::DayFlight => "Day Flight",
            Theme::Cyberpunk => "Cyberpunk",
            Theme::Industrial => "Industrial",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace([' ', '-', '_'], "").as_str() {
            "nightflight" | "night" => Some(Theme::NightFlight),
            "dayflight" | "day" => Some(Theme::DayFlight),
            "cyberpunk" => Some(Theme::Cyberpunk),
            "industrial" => Some(Theme::Industrial),
            _ => None,
        }
    }

    /// Next theme in picker order
    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn background(&self) -> &'static str {
        match self {
            Theme::NightFlight => "#020617",
            Theme::DayFlight => "#bae6fd",
            Theme::Cyberpunk => "#2e1065",
            Theme::Industrial => "#292524",
        }
    }

    pub fn obstacle_color(&self) -> &'static str {
        match self {
            Theme::NightFlight => "#1e293b",
            Theme::DayFlight => "#64748b",
            Theme::Cyberpunk => "#4c1d95",
            Theme::Industrial => "#1c1917",
        }
    }

    pub fn flyer_color(&self) -> &'static str {
        match self {
            Theme::NightFlight => "#f8fafc",
            Theme::DayFlight => "#ef4444",
            Theme::Cyberpunk => "#22d3ee",
            Theme::Industrial => "#fbbf24",
        }
    }

    pub fn window_color(&self) -> &'static str {
        match self {
            Theme::NightFlight => "rgba(253, 224, 71, 0.4)",
            Theme::DayFlight => "rgba(255, 255, 255, 0.6)",
            Theme::Cyberpunk => "rgba(34, 211, 238, 0.5)",
            Theme::Industrial => "rgba(245, 158, 11, 0.3)",
        }
    }

    /// Whether the background gets a starfield
    pub fn starfield(&self) -> bool {
        matches!(self, Theme::NightFlight | Theme::Cyberpunk)
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Visual theme
    pub theme: Theme,

    // === Commentary ===
    /// Endpoint for round-over commentary (None = offline fallback lines only)
    pub commentary_url: Option<String>,
    /// Give up on the endpoint after this long
    pub commentary_timeout_ms: u64,

    // === Debug ===
    /// Fixed obstacle seed (None = time based)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::NightFlight,
            commentary_url: None,
            commentary_timeout_ms: 4000,
            seed: None,
        }
    }
}

impl Settings {
    /// File name inside the data directory
    const FILE_NAME: &'static str = "settings.json";

    /// Environment override for the commentary endpoint
    pub const COMMENTARY_URL_ENV: &'static str = "SKYLINE_COMMENTARY_URL";

    /// Apply environment overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(Self::COMMENTARY_URL_ENV) {
            let url = url.trim();
            self.commentary_url = (!url.is_empty()).then(|| url.to_string());
        }
        self
    }

    /// Load settings from the data directory with environment overrides applied
    pub fn load() -> Self {
        Self::load_saved().with_env_overrides()
    }

    /// Load only what is on disk, falling back to defaults
    pub fn load_saved() -> Self {
        match data_dir() {
            Ok(dir) => Self::load_from(&dir.join(Self::FILE_NAME)),
            Err(e) => {
                log::warn!("No data directory ({}), using default settings", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings ({}), using defaults", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to the data directory
    pub fn save(&self) {
        let path = match data_dir() {
            Ok(dir) => dir.join(Self::FILE_NAME),
            Err(e) => {
                log::warn!("No data directory ({}), settings not saved", e);
                return;
            }
        };
        match self.save_to(&path) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
