use crate::manager::manager::Manager;
use crate::manager::managererror::{
    parse_json_value,
    ManagerError
};
use crate::preset::curvepreset::CurvePreset;

fn get_curve_preset_from_json(json_value: serde_json::Value) -> Result<CurvePreset, ManagerError> {
    parse_json_value(json_value)
}

pub struct CurvePresetManager;

impl CurvePresetManager {
    /// Registry holding the built-in `Linear` and `Flat` presets.
    pub fn new() -> Manager<CurvePreset> {
        let manager = Manager::new(get_curve_preset_from_json);
        for preset in [CurvePreset::linear(), CurvePreset::flat()] {
            manager.insert(preset.name().to_owned(), preset);
        }
        manager
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::manager::manager::IManager;
    use crate::preset::curvepreset::{
        FLAT_PRESET_NAME,
        LINEAR_PRESET_NAME
    };

    use super::*;

    #[test]
    fn test_builtins_registered() {
        let manager = CurvePresetManager::new();
        assert_eq!(manager.names(), vec![FLAT_PRESET_NAME.to_owned(), LINEAR_PRESET_NAME.to_owned()]);
        assert_eq!(manager.get(LINEAR_PRESET_NAME).expect("builtin"), CurvePreset::linear());
    }

    #[test]
    fn test_json_presets_override_by_name() {
        let manager = CurvePresetManager::new();
        manager.insert_obj_from_json_vec(&[
            json!({ "name": "Ramp", "keyframes": [
                { "time": 0.0, "value": 0.0 },
                { "time": 0.5, "value": 0.0 },
                { "time": 1.0, "value": 1.0, "in_tangent": 2.0 }
            ] }),
            json!({ "name": "Linear", "keyframes": [
                { "time": 0.0, "value": 1.0 },
                { "time": 1.0, "value": 0.0 }
            ] }),
        ]).expect("valid presets");

        let ramp = manager.get("Ramp").expect("loaded");
        assert_eq!(ramp.keyframes().len(), 3);
        assert_eq!(ramp.keyframes()[2].in_tangent, 2.0);
        assert_eq!(manager.get("Linear").expect("overridden").keyframes()[0].value, 1.0);
    }
}
