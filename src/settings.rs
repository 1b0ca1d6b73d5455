//! Game settings
//!
//! Persisted as JSON: LocalStorage in the browser, a file named by
//! `SPOKE_SETTINGS` natively.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::AppError;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Timing ===
    /// Redraw timer period (milliseconds)
    pub tick_interval_ms: u64,

    // === Player ===
    /// Distance covered by one forward/backward key press
    pub move_distance: i32,
    /// Player bounding box width and height
    pub player_size: i32,
    /// Heading line length before scaling by 1/radius
    pub heading_line_length: f64,
    /// Draw the heading line
    pub show_heading_line: bool,

    // === Terminal ===
    /// Virtual pixels covered by one terminal column
    pub terminal_cell_width: u16,
    /// Virtual pixels covered by one terminal row
    pub terminal_cell_height: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,

            move_distance: MOVE_DISTANCE,
            player_size: PLAYER_SIZE,
            heading_line_length: HEADING_LINE_LENGTH,
            show_heading_line: true,

            // Roughly the glyph box of a common monospace font
            terminal_cell_width: 8,
            terminal_cell_height: 16,
        }
    }
}

impl Settings {
    /// Environment variable naming the native settings file
    pub const PATH_ENV: &'static str = "SPOKE_SETTINGS";

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "spoke_settings";

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Clamp every field into a playable range
    pub fn sanitized(mut self) -> Self {
        self.tick_interval_ms = self.tick_interval_ms.clamp(16, 5_000);
        self.player_size = self.player_size.clamp(2, 1024);
        // Zero would make the forward/backward keys dead
        if self.move_distance == 0 {
            self.move_distance = MOVE_DISTANCE;
        }
        self.move_distance = self.move_distance.clamp(-1024, 1024);
        if !self.heading_line_length.is_finite() || self.heading_line_length < 0.0 {
            self.heading_line_length = HEADING_LINE_LENGTH;
        }
        self.terminal_cell_width = self.terminal_cell_width.max(1);
        self.terminal_cell_height = self.terminal_cell_height.max(1);
        self
    }

    /// Timer period as a duration
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        let settings = Self::default();
        if let Err(e) = settings.save() {
            log::warn!("Could not store default settings: {}", e);
        }
        settings
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), AppError> {
        let json = serde_json::to_string(self)?;
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::STORAGE_KEY, &json);
            log::info!("Settings saved");
        }
        Ok(())
    }

    /// Load settings from the file named by `SPOKE_SETTINGS`, defaults otherwise
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self, AppError> {
        match std::env::var_os(Self::PATH_ENV) {
            Some(path) => Self::load_from(std::path::Path::new(&path)),
            None => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
        }
    }

    /// Load settings from `path`; a missing file is created with the defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self, AppError> {
        if !path.exists() {
            let settings = Self::default();
            settings.save_to(path)?;
            return Ok(settings);
        }
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings to the file named by `SPOKE_SETTINGS` (no-op when unset)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), AppError> {
        match std::env::var_os(Self::PATH_ENV) {
            Some(path) => self.save_to(std::path::Path::new(&path)),
            None => Ok(()),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), AppError> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "move_distance": 32 }"#).unwrap();
        assert_eq!(settings.move_distance, 32);
        assert_eq!(settings.player_size, PLAYER_SIZE);
        assert_eq!(settings.tick_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let settings = Settings::from_json(
            r#"{ "tick_interval_ms": 0, "player_size": -5, "move_distance": 0, "terminal_cell_width": 0 }"#,
        )
        .unwrap();
        assert_eq!(settings.tick_interval_ms, 16);
        assert_eq!(settings.player_size, 2);
        assert_eq!(settings.move_distance, MOVE_DISTANCE);
        assert_eq!(settings.terminal_cell_width, 1);
    }

    #[test]
    fn test_bad_json_is_settings_error() {
        let err = Settings::from_json("{ nope").unwrap_err();
        assert!(matches!(err, AppError::Settings(_)));
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn temp_path(name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "spoke-settings-{}-{}.json",
            std::process::id(),
            name
        ));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_load_from_missing_file_writes_defaults() {
        let path = temp_path("missing");
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(path.exists());

        // The written file reads back as the same settings
        assert_eq!(Settings::load_from(&path).unwrap(), Settings::default());
        let _ = std::fs::remove_file(&path);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_load_from_existing_file_is_sanitized() {
        let path = temp_path("existing");
        std::fs::write(&path, r#"{"move_distance":5000,"heading_line_length":-1}"#).unwrap();
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.move_distance, 1024);
        assert_eq!(settings.heading_line_length, HEADING_LINE_LENGTH);
        assert_eq!(settings.player_size, PLAYER_SIZE);
        let _ = std::fs::remove_file(&path);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_load_from_bad_file_is_settings_error() {
        let path = temp_path("empty");
        std::fs::write(&path, "").unwrap();
        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, AppError::Settings(_)));
        let _ = std::fs::remove_file(&path);
    }
}
