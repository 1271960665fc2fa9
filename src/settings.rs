//! # Settings File
//!
//! Optional JSON file holding the printer address and print defaults. Every
//! field may be omitted; command-line flags override what the file says.
//!
//! ```json
//! {
//!   "address": "00:15:83:12:34:56",
//!   "density": 75,
//!   "feed": 2,
//!   "hooks_dir": "/etc/paperang/hooks"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{PaperangError, Result};
use crate::printer::PrinterConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Printer MAC address, `XX:XX:XX:XX:XX:XX`
    pub address: Option<String>,
    /// Print width in dots
    pub width: u16,
    /// Heat density; `None` leaves the printer's setting alone
    pub density: Option<u8>,
    pub paper_type: u8,
    /// Idle time before auto power-off; `None` leaves it alone
    pub power_off: Option<u16>,
    /// Lines fed after each print
    pub feed: u16,
    /// Directory of executables run after each print
    pub hooks_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            address: None,
            width: PrinterConfig::P1.width_dots,
            density: None,
            paper_type: 0,
            power_off: None,
            feed: 1,
            hooks_dir: None,
        }
    }
}

impl Settings {
    /// Read and parse a settings file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| PaperangError::Settings(format!("{}: {}", path.display(), e)))?;
        let settings = serde_json::from_str(&text)
            .map_err(|e| PaperangError::Settings(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Device geometry for the configured width.
    pub fn printer_config(&self) -> PrinterConfig {
        PrinterConfig::P1.with_width(self.width)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("paperang-{}-{}.json", name, std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.width, 384);
        assert_eq!(settings.feed, 1);
        assert_eq!(settings.paper_type, 0);
        assert_eq!(settings.address, None);
        assert_eq!(settings.printer_config(), PrinterConfig::P1);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = write_temp("partial", r#"{"address": "00:11:22:33:44:55", "density": 80}"#);
        let settings = Settings::load(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(
            settings,
            Settings {
                address: Some("00:11:22:33:44:55".to_string()),
                density: Some(80),
                ..Settings::default()
            }
        );
    }

    #[test]
    fn test_load_or_default_without_path() {
        assert_eq!(Settings::load_or_default(None).unwrap(), Settings::default());
    }

    #[test]
    fn test_missing_file() {
        let result = Settings::load("/nonexistent/paperang.json");
        assert!(matches!(result, Err(PaperangError::Settings(_))));
    }

    #[test]
    fn test_malformed_file() {
        let path = write_temp("malformed", "{ width: ");
        let result = Settings::load(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(PaperangError::Settings(_))));
    }

    #[test]
    fn test_custom_width() {
        let settings = Settings {
            width: 576,
            ..Settings::default()
        };
        let config = settings.printer_config();
        assert_eq!(config.width_dots, 576);
        assert_eq!(config.width_bytes, 72);
    }
}
