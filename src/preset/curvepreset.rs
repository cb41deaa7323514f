use std::sync::Arc;

use serde::{
    Deserialize,
    Serialize
};

use crate::math::curve::keyframe::keyframecurve::KeyframeCurve;
use crate::math::curve::keyframe::keyframeid::KeyframeIdAllocator;
use crate::math::curve::keyframe::keyframejson::{
    KeyframeCurveJsonProp,
    KeyframeJsonProp
};

pub const LINEAR_PRESET_NAME: &str = "Linear";
pub const FLAT_PRESET_NAME: &str = "Flat";

/// Named, id-free description of a curve.
///
/// Presets are plain data so they can be cloned freely out of a registry; a
/// live [`KeyframeCurve`] is only created by [`CurvePreset::build`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePreset {
    name: String,
    keyframes: Vec<KeyframeJsonProp>
}

impl CurvePreset {
    pub fn new(name: String, keyframes: Vec<KeyframeJsonProp>) -> CurvePreset {
        CurvePreset { name, keyframes }
    }

    /// (0, 0) → (1, 1) with flat tangents.
    pub fn linear() -> CurvePreset {
        CurvePreset::new(
            LINEAR_PRESET_NAME.to_owned(),
            vec![KeyframeJsonProp::new(0.0, 0.0), KeyframeJsonProp::new(1.0, 1.0)]
        )
    }

    /// Constant zero.
    pub fn flat() -> CurvePreset {
        CurvePreset::new(
            FLAT_PRESET_NAME.to_owned(),
            vec![KeyframeJsonProp::new(0.0, 0.0), KeyframeJsonProp::new(1.0, 0.0)]
        )
    }

    pub fn from_curve(name: String, curve: &KeyframeCurve) -> CurvePreset {
        CurvePreset::new(name, KeyframeCurveJsonProp::from_curve(curve).keyframes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keyframes(&self) -> &[KeyframeJsonProp] {
        &self.keyframes
    }

    pub fn build(&self, ids: Arc<KeyframeIdAllocator>) -> KeyframeCurve {
        KeyframeCurveJsonProp { keyframes: self.keyframes.clone() }.build(ids)
    }
}
