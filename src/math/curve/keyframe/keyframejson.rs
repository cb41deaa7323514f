use std::sync::Arc;

use serde::{
    Deserialize,
    Serialize
};

use crate::manager::managererror::{
    parse_json_value,
    ManagerError
};
use crate::math::curve::keyframe::keyframe::{
    Keyframe,
    DEFAULT_IN_MAGNITUDE,
    DEFAULT_OUT_MAGNITUDE
};
use crate::math::curve::keyframe::keyframecurve::KeyframeCurve;
use crate::math::curve::keyframe::keyframeid::KeyframeIdAllocator;

fn default_in_magnitude() -> f64 {
    DEFAULT_IN_MAGNITUDE
}

fn default_out_magnitude() -> f64 {
    DEFAULT_OUT_MAGNITUDE
}

/// Stored form of a keyframe. Ids are runtime identities and are never
/// written; reading assigns fresh ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeJsonProp {
    pub time: f64,
    pub value: f64,
    #[serde(default)]
    pub in_tangent: f64,
    #[serde(default)]
    pub out_tangent: f64,
    #[serde(default = "default_in_magnitude")]
    pub in_magnitude: f64,
    #[serde(default = "default_out_magnitude")]
    pub out_magnitude: f64
}

impl KeyframeJsonProp {
    pub fn new(time: f64, value: f64) -> KeyframeJsonProp {
        KeyframeJsonProp {
            time,
            value,
            in_tangent: 0.0,
            out_tangent: 0.0,
            in_magnitude: DEFAULT_IN_MAGNITUDE,
            out_magnitude: DEFAULT_OUT_MAGNITUDE
        }
    }

    pub fn from_keyframe(keyframe: &Keyframe) -> KeyframeJsonProp {
        KeyframeJsonProp {
            time: keyframe.time(),
            value: keyframe.value(),
            in_tangent: keyframe.in_tangent(),
            out_tangent: keyframe.out_tangent(),
            in_magnitude: keyframe.in_magnitude(),
            out_magnitude: keyframe.out_magnitude()
        }
    }

    pub fn build(&self, ids: &KeyframeIdAllocator) -> Keyframe {
        let mut keyframe = Keyframe::with_tangents(ids, self.time, self.value, self.in_tangent, self.out_tangent);
        keyframe.set_magnitudes(self.in_magnitude, self.out_magnitude);
        keyframe
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeCurveJsonProp {
    pub keyframes: Vec<KeyframeJsonProp>
}

impl KeyframeCurveJsonProp {
    pub fn from_curve(curve: &KeyframeCurve) -> KeyframeCurveJsonProp {
        KeyframeCurveJsonProp {
            keyframes: curve.keyframes().iter().map(KeyframeJsonProp::from_keyframe).collect()
        }
    }

    /// Goes through [`KeyframeCurve::from_keyframes`], so short or unsorted
    /// lists are repaired the same way.
    pub fn build(&self, ids: Arc<KeyframeIdAllocator>) -> KeyframeCurve {
        let keyframes = self.keyframes.iter().map(|prop| prop.build(&ids)).collect();
        KeyframeCurve::from_keyframes(ids, keyframes)
    }
}

impl KeyframeCurve {
    pub fn to_json_value(&self) -> Result<serde_json::Value, ManagerError> {
        let json_value = serde_json::to_value(KeyframeCurveJsonProp::from_curve(self))?;
        Ok(json_value)
    }

    pub fn from_json_value(ids: Arc<KeyframeIdAllocator>,
                           json_value: serde_json::Value) -> Result<KeyframeCurve, ManagerError> {
        let json_prop: KeyframeCurveJsonProp = parse_json_value(json_value)?;
        Ok(json_prop.build(ids))
    }
}
