use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::ColorPolicy;
use crate::data::filter::CleanerConfig;
use crate::error::{Result, ViewerError};
use crate::render::{CurveSelection, RenderSettings, EXPORT_FILE_NAME};

/// Config file looked up in the working directory at start-up.
pub const CONFIG_FILE_NAME: &str = "lis-curves.json";

// ---------------------------------------------------------------------------
// Viewer configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Crop the white margin around the chart.
    pub tight: bool,
    pub file_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            tight: true,
            file_name: EXPORT_FILE_NAME.to_string(),
        }
    }
}

/// Everything that shapes a rendered chart. Any field missing from the
/// config file takes its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Worksheet to read; the first one when `None`.
    pub sheet: Option<String>,
    pub cleaner: CleanerConfig,
    pub color_policy: ColorPolicy,
    pub selection: CurveSelection,
    pub render: RenderSettings,
    pub export: ExportSettings,
    /// Rows shown in the preview table.
    pub preview_rows: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            sheet: None,
            cleaner: CleanerConfig::default(),
            color_policy: ColorPolicy::default(),
            selection: CurveSelection::default(),
            render: RenderSettings::default(),
            export: ExportSettings::default(),
            preview_rows: 5,
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: ViewerConfig =
            serde_json::from_str(text).map_err(|e| ViewerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Load `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            let config = Self::load(path)?;
            log::info!("loaded configuration from {}", path.display());
            Ok(config)
        } else {
            log::debug!("no {} found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.render.validate().map_err(ViewerError::Config)?;
        if self.export.file_name.trim().is_empty() {
            return Err(ViewerError::Config("export file name is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ViewerConfig::from_json_str(
            r#"{ "sheet": "record", "cleaner": { "cc_start_step": 5 }, "selection": "ChargeOnly" }"#,
        )
        .unwrap();
        assert_eq!(config.sheet.as_deref(), Some("record"));
        assert_eq!(config.cleaner.cc_start_step, 5);
        assert_eq!(config.cleaner.dropped_columns, CleanerConfig::default().dropped_columns);
        assert_eq!(config.selection, CurveSelection::ChargeOnly);
        assert_eq!(config.render, RenderSettings::default());
    }

    #[test]
    fn bad_render_settings_are_rejected() {
        let err = ViewerConfig::from_json_str(r#"{ "render": { "dpi": 0 } }"#).unwrap_err();
        assert!(matches!(err, ViewerError::Config(_)));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(
            ViewerConfig::from_json_str("{ sheet: "),
            Err(ViewerError::Config(_))
        ));
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ViewerConfig::load_or_default(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, ViewerConfig::default());
    }
}
