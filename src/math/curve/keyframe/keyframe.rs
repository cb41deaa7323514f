use log::trace;

use crate::math::curve::keyframe::keyframeid::{
    KeyframeId,
    KeyframeIdAllocator
};
use crate::math::curve::nonparametriccurve::nonparametriccurve::Point2D;

pub const DEFAULT_IN_MAGNITUDE: f64 = -0.1;
pub const DEFAULT_OUT_MAGNITUDE: f64 = 0.1;

/// Clamps into [0, 1]. NaN maps to 0 and -0.0 is normalised to 0.0, so exact
/// time comparisons between keyframes behave.
pub(crate) fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0) + 0.0
    }
}

fn zero_if_nan(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x }
}

/// Both draggable handle positions of a keyframe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyframeHandles {
    pub input: Point2D,
    pub output: Point2D
}

/// A control point of a [`KeyframeCurve`](super::keyframecurve::KeyframeCurve).
///
/// `in_tangent` / `out_tangent` are the slopes (dy/dt) used on the segment to
/// the left / right. The magnitudes are signed horizontal offsets that only
/// place the handles an editor shows; evaluation never reads them.
///
/// Not `Clone`: ids stay unique per allocator. Use [`Keyframe::duplicate`].
#[derive(Debug, PartialEq)]
pub struct Keyframe {
    id: KeyframeId,
    time: f64,
    value: f64,
    in_tangent: f64,
    out_tangent: f64,
    in_magnitude: f64,
    out_magnitude: f64
}

impl Keyframe {
    pub fn new(ids: &KeyframeIdAllocator, time: f64, value: f64) -> Keyframe {
        Keyframe::with_tangents(ids, time, value, 0.0, 0.0)
    }

    pub fn with_tangents(ids: &KeyframeIdAllocator,
                         time: f64,
                         value: f64,
                         in_tangent: f64,
                         out_tangent: f64) -> Keyframe {
        Keyframe {
            id: ids.allocate(),
            time: clamp_unit(time),
            value: clamp_unit(value),
            in_tangent: zero_if_nan(in_tangent),
            out_tangent: zero_if_nan(out_tangent),
            in_magnitude: DEFAULT_IN_MAGNITUDE,
            out_magnitude: DEFAULT_OUT_MAGNITUDE
        }
    }

    /// Same control point under a fresh id.
    pub fn duplicate(&self, ids: &KeyframeIdAllocator) -> Keyframe {
        Keyframe {
            id: ids.allocate(),
            ..*self
        }
    }

    pub fn id(&self) -> KeyframeId {
        self.id
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn in_tangent(&self) -> f64 {
        self.in_tangent
    }

    pub fn out_tangent(&self) -> f64 {
        self.out_tangent
    }

    pub fn in_magnitude(&self) -> f64 {
        self.in_magnitude
    }

    pub fn out_magnitude(&self) -> f64 {
        self.out_magnitude
    }

    /// The keyframe itself as a (time, value) point.
    pub fn point(&self) -> Point2D {
        Point2D::new(self.time, self.value)
    }

    pub fn in_handle(&self) -> Point2D {
        Point2D::new(
            self.time + self.in_magnitude,
            self.value + self.in_magnitude * self.in_tangent
        )
    }

    pub fn out_handle(&self) -> Point2D {
        Point2D::new(
            self.time + self.out_magnitude,
            self.value + self.out_magnitude * self.out_tangent
        )
    }

    pub fn handles(&self) -> KeyframeHandles {
        KeyframeHandles {
            input: self.in_handle(),
            output: self.out_handle()
        }
    }

    /// Applies both handles independently. Returns whether anything changed.
    pub fn set_tangents_from_handles(&mut self, handles: &KeyframeHandles) -> bool {
        let input_applied = self.set_in_tangent_from_handle(handles.input.x(), handles.input.y());
        let output_applied = self.set_out_tangent_from_handle(handles.output.x(), handles.output.y());
        input_applied || output_applied
    }

    /// Re-derives the in-tangent from a dragged handle at (`x`, `y`).
    ///
    /// The in-handle has to stay strictly left of the keyframe; a position with
    /// `x >= time` (or any NaN coordinate) is ignored and `false` is returned.
    pub fn set_in_tangent_from_handle(&mut self, x: f64, y: f64) -> bool {
        if !(x < self.time) || y.is_nan() {
            trace!("keyframe {}: in-handle at ({}, {}) rejected", self.id, x, y);
            return false;
        }
        self.in_magnitude = x - self.time;
        self.in_tangent = Point2D::slope(&Point2D::new(x, y), &self.point());
        true
    }

    /// Mirror image of [`Keyframe::set_in_tangent_from_handle`]: rejects
    /// `x <= time`.
    pub fn set_out_tangent_from_handle(&mut self, x: f64, y: f64) -> bool {
        if !(x > self.time) || y.is_nan() {
            trace!("keyframe {}: out-handle at ({}, {}) rejected", self.id, x, y);
            return false;
        }
        self.out_magnitude = x - self.time;
        self.out_tangent = Point2D::slope(&self.point(), &Point2D::new(x, y));
        true
    }

    /// Like [`Keyframe::set_in_tangent_from_handle`], then mirrors the result
    /// onto the out side so a single smooth tangent passes through the point.
    pub fn set_in_tangent_from_handle_sync(&mut self, x: f64, y: f64) -> bool {
        if !self.set_in_tangent_from_handle(x, y) {
            return false;
        }
        self.out_magnitude = -self.in_magnitude;
        self.out_tangent = self.in_tangent;
        true
    }

    pub fn set_out_tangent_from_handle_sync(&mut self, x: f64, y: f64) -> bool {
        if !self.set_out_tangent_from_handle(x, y) {
            return false;
        }
        self.in_magnitude = -self.out_magnitude;
        self.in_tangent = self.out_tangent;
        true
    }

    pub(crate) fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    pub(crate) fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// Restores stored handle offsets. Offsets on the wrong side of the
    /// keyframe (or NaN) fall back to the defaults.
    pub(crate) fn set_magnitudes(&mut self, in_magnitude: f64, out_magnitude: f64) {
        self.in_magnitude = if in_magnitude < 0.0 { in_magnitude } else { DEFAULT_IN_MAGNITUDE };
        self.out_magnitude = if out_magnitude > 0.0 { out_magnitude } else { DEFAULT_OUT_MAGNITUDE };
    }
}
