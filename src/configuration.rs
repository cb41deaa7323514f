use std::cell::RefCell;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::info;
use serde::{
    Deserialize,
    Serialize
};

use crate::manager::managererror::{
    parse_json_value,
    ManagerError
};
use crate::manager::manager::{
    IManager,
    Manager
};
use crate::math::curve::keyframe::keyframecurve::MoveOptions;
use crate::preset::curvepreset::CurvePreset;
use crate::preset::curvepresetmanager::CurvePresetManager;

pub const DEFAULT_SAMPLE_COUNT: usize = 256;

/// Knobs of an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Lookup tables hold `sample_count + 1` entries.
    pub sample_count: usize,
    pub clamp_boundary_value: bool,
    /// Preset the session starts from and resets to.
    pub default_preset: Option<String>
}

impl EditorSettings {
    pub fn move_options(&self) -> MoveOptions {
        MoveOptions { clamp_boundary_value: self.clamp_boundary_value }
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        EditorSettings {
            sample_count: DEFAULT_SAMPLE_COUNT,
            clamp_boundary_value: true,
            default_preset: None
        }
    }
}

#[derive(Deserialize)]
struct ConfigurationJsonProp {
    #[serde(default)]
    curve_presets: Vec<serde_json::Value>,
    #[serde(default)]
    editor: Option<EditorSettings>
}

pub struct Configuration {
    curve_preset_manager: Manager<CurvePreset>,
    editor_settings_cell: RefCell<EditorSettings>
}

impl Configuration {
    pub fn new() -> Configuration {
        Configuration {
            curve_preset_manager: CurvePresetManager::new(),
            editor_settings_cell: RefCell::new(EditorSettings::default())
        }
    }

    pub fn curve_preset_manager(&self) -> &Manager<CurvePreset> {
        &self.curve_preset_manager
    }

    pub fn editor_settings(&self) -> EditorSettings {
        self.editor_settings_cell.borrow().clone()
    }

    /// Preset named by `editor.default_preset`, if one is configured.
    pub fn default_curve_preset(&self) -> Result<Option<CurvePreset>, ManagerError> {
        match &self.editor_settings_cell.borrow().default_preset {
            Some(name) => self.curve_preset_manager.get(name).map(Some),
            None => Ok(None)
        }
    }

    pub fn from_reader(&self, file_path: &Path) -> Result<(), ManagerError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let json_value: serde_json::Value = serde_json::from_reader(reader)?;
        info!("loading configuration from {}", file_path.display());
        self.from_json_value(json_value)
    }

    /// Merges presets into the registry and replaces the editor settings when
    /// the document has an `editor` section.
    pub fn from_json_value(&self, json_value: serde_json::Value) -> Result<(), ManagerError> {
        let json_prop: ConfigurationJsonProp = parse_json_value(json_value)?;
        self.curve_preset_manager.insert_obj_from_json_vec(&json_prop.curve_presets)?;
        info!("{} curve presets loaded", json_prop.curve_presets.len());
        if let Some(settings) = json_prop.editor {
            *self.editor_settings_cell.borrow_mut() = settings;
        }
        Ok(())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Configuration::new();
        assert_eq!(config.editor_settings(), EditorSettings::default());
        assert_eq!(config.editor_settings().move_options(), MoveOptions::clamped());
        assert_eq!(config.default_curve_preset().expect("no preset configured"), None);
        assert!(config.curve_preset_manager().contains("Linear"));
    }

    #[test]
    fn test_from_json_value() {
        let config = Configuration::new();
        config.from_json_value(json!({
            "curve_presets": [
                { "name": "Window", "keyframes": [
                    { "time": 0.0, "value": 0.0 },
                    { "time": 0.4, "value": 1.0 },
                    { "time": 1.0, "value": 0.0 }
                ] }
            ],
            "editor": { "sample_count": 64, "default_preset": "Window" }
        })).expect("valid configuration");

        let settings = config.editor_settings();
        assert_eq!(settings.sample_count, 64);
        assert!(settings.clamp_boundary_value);
        let preset = config.default_curve_preset().expect("registered").expect("configured");
        assert_eq!(preset.name(), "Window");
    }

    #[test]
    fn test_unknown_default_preset() {
        let config = Configuration::new();
        config.from_json_value(json!({ "editor": { "default_preset": "Missing" } })).expect("valid");
        assert!(matches!(config.default_curve_preset(), Err(ManagerError::NameNotFoundError(_))));
    }

    #[test]
    fn test_from_reader() {
        let path = std::env::temp_dir().join(format!("transfercurve-config-{}.json", std::process::id()));
        fs::write(&path, r#"{ "editor": { "sample_count": 8, "clamp_boundary_value": false } }"#)
            .expect("temp file writable");
        let config = Configuration::new();
        let result = config.from_reader(&path);
        let _ = fs::remove_file(&path);

        result.expect("valid file");
        assert_eq!(config.editor_settings().sample_count, 8);
        assert_eq!(config.editor_settings().move_options(), MoveOptions::unclamped());
    }

    #[test]
    fn test_from_reader_bad_json() {
        let path = std::env::temp_dir().join(format!("transfercurve-bad-{}.json", std::process::id()));
        fs::write(&path, "{ not json").expect("temp file writable");
        let config = Configuration::new();
        let result = config.from_reader(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(result, Err(ManagerError::JsonParseError(_))));
    }
}
