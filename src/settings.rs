use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::angle::AngleUnit;
use crate::engine::Evaluator;

/// Rounding precision applied when nothing is stored.
const DEFAULT_PRECISION: u32 = 10;

/// The session settings that survive restarts: the angle unit and the
/// rounding precision. The answer and memory registers are deliberately not
/// part of this; every session starts them at zero.
///
/// On disk both values are kept as plain strings:
///
/// ```json
/// {
///   "angle_unit": "Deg",
///   "precision": "10"
/// }
/// ```
///
/// Loading is forgiving: a missing file or an unreadable value falls back
/// to the defaults with a logged warning, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Angle interpretation for the circular functions
    pub angle_unit: AngleUnit,
    /// Result rounding precision in decimal digits
    pub precision: u32,
}

/// On-disk shape of [`Settings`].
#[derive(Serialize, Deserialize)]
struct RawSettings {
    angle_unit: String,
    precision: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            angle_unit: AngleUnit::Degrees,
            precision: DEFAULT_PRECISION,
        }
    }
}

impl Settings {
    /// Bundle an angle unit and a precision for saving.
    pub fn new(angle_unit: AngleUnit, precision: u32) -> Self {
        Self {
            angle_unit,
            precision,
        }
    }

    /// Push these settings into an evaluator. The evaluator may clamp the
    /// precision; see [`Evaluator::set_precision`].
    pub fn apply(&self, eval: &mut Evaluator) {
        eval.set_angle_unit(self.angle_unit);
        eval.set_precision(self.precision);
    }

    /// Read settings from `path`, falling back to defaults field by field.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Self::default(),
            Err(err) => {
                log::warn!("could not read settings from {}: {}", path.display(), err);
                return Self::default();
            }
        };
        let raw: RawSettings = match serde_json::from_str(&text) {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("malformed settings in {}: {}", path.display(), err);
                return Self::default();
            }
        };
        let defaults = Self::default();
        let angle_unit = raw.angle_unit.parse().unwrap_or_else(|_| {
            log::warn!(
                "stored angle unit '{}' is unknown, using {}",
                raw.angle_unit,
                defaults.angle_unit
            );
            defaults.angle_unit
        });
        let precision = raw.precision.parse().unwrap_or_else(|_| {
            log::warn!(
                "stored precision '{}' is not a number, using {}",
                raw.precision,
                DEFAULT_PRECISION
            );
            DEFAULT_PRECISION
        });
        Self {
            angle_unit,
            precision,
        }
    }

    /// Write the settings to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = RawSettings {
            angle_unit: self.angle_unit.to_string(),
            precision: self.precision.to_string(),
        };
        let text = serde_json::to_string_pretty(&raw).map_err(io::Error::other)?;
        fs::write(path, text)
    }

    /// The settings file location: `$RECKONER_CONFIG_DIR/settings.json` if
    /// the variable is set, otherwise `reckoner/settings.json` under the
    /// platform configuration directory. `None` when the platform has no
    /// such directory.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(dir) = std::env::var("RECKONER_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("settings.json"));
        }
        dirs::config_dir().map(|dir| dir.join("reckoner").join("settings.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings::new(AngleUnit::Gradians, 4);
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("down").join("settings.json");
        Settings::default().save(&path).unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("absent.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn values_are_stored_as_strings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        Settings::new(AngleUnit::Radians, 6).save(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"Rad\""));
        assert!(text.contains("\"6\""));
    }

    #[test]
    fn unknown_values_fall_back_individually() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"angle_unit": "Turns", "precision": "7"}"#).unwrap();
        let settings = Settings::load(&path);
        assert_eq!(settings.angle_unit, AngleUnit::Degrees);
        assert_eq!(settings.precision, 7);
    }

    #[test]
    fn garbage_files_yield_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json at all").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn apply_clamps_oversized_precision() {
        let mut eval = Evaluator::new();
        Settings::new(AngleUnit::Radians, 99).apply(&mut eval);
        assert_eq!(eval.angle_unit(), AngleUnit::Radians);
        assert_eq!(eval.precision(), 15);
    }
}
