use std::collections::HashSet;
use std::sync::Arc;

use log::{
    debug,
    trace
};

use crate::math::curve::curve::Curve;
use crate::math::curve::hermite::HermiteSegment;
use crate::math::curve::keyframe::keyframe::{
    clamp_unit,
    Keyframe,
    KeyframeHandles
};
use crate::math::curve::keyframe::keyframeid::{
    KeyframeId,
    KeyframeIdAllocator
};
use crate::math::curve::nonparametriccurve::nonparametriccurve::{
    NonparametricCurve,
    Point2D
};

/// Interior keyframes are kept strictly inside the unit interval; the exact
/// ends belong to the boundary keyframes.
pub const INTERIOR_TIME_MIN: f64 = 0.001;
pub const INTERIOR_TIME_MAX: f64 = 0.999;

/// How [`KeyframeCurve::move_key`] treats the first and last keyframe.
///
/// Boundary keyframes never change time. Their value is always updated and is
/// clamped into [0, 1] only when `clamp_boundary_value` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOptions {
    pub clamp_boundary_value: bool
}

impl MoveOptions {
    pub fn clamped() -> MoveOptions {
        MoveOptions { clamp_boundary_value: true }
    }

    pub fn unclamped() -> MoveOptions {
        MoveOptions { clamp_boundary_value: false }
    }
}

impl Default for MoveOptions {
    fn default() -> Self {
        MoveOptions::clamped()
    }
}

/// Piecewise cubic Hermite function over [0, 1], defined by keyframes.
///
/// # Invariants
/// After every public call:
/// - at least two keyframes,
/// - keyframes sorted by ascending time, no two with the same time,
/// - no two keyframes with the same id,
/// - the first and last keyframe (by time) were neither removed nor moved in
///   time by an edit.
///
/// Time matching in [`add_key`](Self::add_key) and
/// [`remove_key_at`](Self::remove_key_at) is exact floating-point equality.
///
/// Keyframes only change through the curve's own methods, so callers never
/// hold a `&mut Keyframe` that could reorder the sequence.
///
/// Not synchronised: a mutation must not overlap with reads of the same
/// curve. Take a [`copy`](Self::copy) to hand a snapshot elsewhere.
#[derive(Debug)]
pub struct KeyframeCurve {
    ids: Arc<KeyframeIdAllocator>,
    keyframes: Vec<Keyframe>
}

impl KeyframeCurve {
    /// Linear curve (0, 0) → (1, 1) with flat tangents.
    pub fn new(ids: Arc<KeyframeIdAllocator>) -> KeyframeCurve {
        KeyframeCurve::from_keyframes(ids, Vec::new())
    }

    /// Builds a curve from caller keyframes.
    ///
    /// The list is sorted; keyframes sharing an exact time collapse to the one
    /// given last. Fewer than two keyframes are padded with the boundary
    /// keyframes of the linear curve. A keyframe whose id is already taken by
    /// an earlier one is given a fresh id from `ids`.
    pub fn from_keyframes(ids: Arc<KeyframeIdAllocator>, keyframes: Vec<Keyframe>) -> KeyframeCurve {
        let mut keyframes = keyframes;
        keyframes.sort_by(|a, b| a.time().total_cmp(&b.time()));
        let mut keyframes = collapse_equal_times(keyframes);

        match keyframes.len() {
            0 => {
                keyframes.push(Keyframe::new(&ids, 0.0, 0.0));
                keyframes.push(Keyframe::new(&ids, 1.0, 1.0));
            },
            1 => {
                let padding = if keyframes[0].time() == 1.0 {
                    Keyframe::new(&ids, 0.0, 0.0)
                } else {
                    Keyframe::new(&ids, 1.0, 1.0)
                };
                keyframes.push(padding);
            },
            _ => {}
        }

        let mut seen = HashSet::with_capacity(keyframes.len());
        let keyframes = keyframes
            .into_iter()
            .map(|keyframe| {
                let mut keyframe = keyframe;
                while !seen.insert(keyframe.id()) {
                    keyframe = keyframe.duplicate(&ids);
                }
                keyframe
            })
            .collect();

        let mut curve = KeyframeCurve { ids, keyframes };
        curve.sort_keyframes();
        curve
    }

    /// New keyframe whose id comes from this curve's allocator. It is not
    /// inserted; pass it to [`add_key`](Self::add_key).
    pub fn create_keyframe(&self, time: f64, value: f64) -> Keyframe {
        Keyframe::new(&self.ids, time, value)
    }

    pub fn id_allocator(&self) -> &Arc<KeyframeIdAllocator> {
        &self.ids
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn first_keyframe(&self) -> &Keyframe {
        &self.keyframes[0]
    }

    pub fn last_keyframe(&self) -> &Keyframe {
        &self.keyframes[self.keyframes.len() - 1]
    }

    pub fn index_of(&self, id: KeyframeId) -> Option<usize> {
        self.keyframes.iter().position(|k| k.id() == id)
    }

    pub fn keyframe(&self, id: KeyframeId) -> Option<&Keyframe> {
        self.keyframes.iter().find(|k| k.id() == id)
    }

    pub fn is_boundary(&self, index: usize) -> bool {
        index == 0 || index == self.keyframes.len() - 1
    }

    /// Inserts one keyframe, see [`add_keyframes`](Self::add_keyframes).
    ///
    /// Returns the id the keyframe is stored under, or `None` when it was
    /// dropped on a boundary time.
    pub fn add_key(&mut self, keyframe: Keyframe) -> Option<KeyframeId> {
        let id = self.insert_keyframe(keyframe);
        self.sort_keyframes();
        id
    }

    /// Inserts keyframes one by one.
    ///
    /// A keyframe whose time equals an interior keyframe's time replaces it.
    /// One that lands exactly on the first or last keyframe's time is dropped.
    /// A keyframe carrying an id already used in this curve, for example one
    /// made by another allocator, is stored under a fresh id.
    pub fn add_keyframes<I>(&mut self, keyframes: I) where
        I: IntoIterator<Item = Keyframe> {
        for keyframe in keyframes {
            self.insert_keyframe(keyframe);
        }
        self.sort_keyframes();
    }

    /// Removes the keyframe at the same time as `keyframe`; see
    /// [`remove_key_at`](Self::remove_key_at).
    pub fn remove_key(&mut self, keyframe: &Keyframe) -> Option<Keyframe> {
        self.remove_key_at(keyframe.time())
    }

    /// Removes the interior keyframe at exactly `time`. Boundary keyframes
    /// and unmatched times leave the curve unchanged and return `None`.
    pub fn remove_key_at(&mut self, time: f64) -> Option<Keyframe> {
        match self.find_time(time) {
            Ok(index) if !self.is_boundary(index) => {
                let removed = self.keyframes.remove(index);
                trace!("keyframe {} removed from t={}", removed.id(), time);
                Some(removed)
            },
            Ok(_) => {
                debug!("remove at t={} ignored: boundary keyframe", time);
                None
            },
            Err(_) => {
                debug!("remove at t={} ignored: no keyframe", time);
                None
            }
        }
    }

    /// Indices `(lo, hi)` of the keyframes bracketing `t`.
    ///
    /// `t` is clamped into [0, 1]. The result always satisfies
    /// `lo < hi <= len - 1` with `hi - lo == 1`. When `t` sits exactly on a
    /// keyframe the bracket is the segment ending there (the first segment for
    /// the first keyframe). A `t` before the first keyframe yields the first
    /// segment, one after the last keyframe the last segment.
    pub fn closest_keyframes(&self, t: f64) -> (usize, usize) {
        let t = clamp_unit(t);
        let n = self.keyframes.len();
        let upper = self.keyframes.partition_point(|k| k.time() <= t);
        if upper == 0 {
            return (0, (n - 1).min(1));
        }

        let mut lo = upper - 1;
        let mut hi = upper;
        if hi == n || self.keyframes[lo].time() == t {
            hi = lo;
        }
        if lo == hi {
            if lo == 0 {
                hi = (n - 1).min(1);
            } else {
                lo -= 1;
            }
        }
        (lo, hi)
    }

    /// Curve value at `t`, clamped into [0, 1] first.
    ///
    /// Outside the span of the keyframes the curve holds the nearest boundary
    /// value. The result itself is not clamped.
    ///
    /// # Panics
    /// Only if the two-keyframe invariant has been broken, which no public
    /// operation allows.
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = clamp_unit(t);
        let (i0, i1) = self.closest_keyframes(t);
        let k0 = &self.keyframes[i0];
        let k1 = &self.keyframes[i1];
        if t <= k0.time() {
            return k0.value();
        }
        if t >= k1.time() {
            return k1.value();
        }
        self.segment(i0, i1).value(t)
    }

    /// `n + 1` values at `i / n`, the lookup table downstream rendering
    /// uploads.
    pub fn sample(&self, n: usize) -> Vec<f64> {
        Curve::sample(self, n)
    }

    /// [`sample`](Self::sample) with every value clamped into [0, 1], as the
    /// editor draws it.
    pub fn sample_clamped(&self, n: usize) -> Vec<f64> {
        self.sample(n).into_iter().map(clamp_unit).collect()
    }

    /// Single precision lookup table.
    pub fn sample_f32(&self, n: usize) -> Vec<f32> {
        self.sample(n).into_iter().map(|v| v as f32).collect()
    }

    /// Moves keyframe `id` to (`time`, `value`) and returns its new index.
    ///
    /// Interior keyframes get `value` clamped into [0, 1] and `time` into
    /// [[`INTERIOR_TIME_MIN`], [`INTERIOR_TIME_MAX`]], then the curve is
    /// re-sorted, so dragging past a neighbour reorders the two. A time that
    /// would coincide exactly with another keyframe is not applied.
    ///
    /// Boundary keyframes only take the value, see [`MoveOptions`]. NaN
    /// coordinates are ignored; an unknown id returns `None`.
    pub fn move_key(&mut self,
                    id: KeyframeId,
                    time: f64,
                    value: f64,
                    options: MoveOptions) -> Option<usize> {
        let index = match self.index_of(id) {
            Some(index) => index,
            None => {
                debug!("move of unknown keyframe {} ignored", id);
                return None;
            }
        };

        if self.is_boundary(index) {
            if !value.is_nan() {
                let value = if options.clamp_boundary_value { clamp_unit(value) } else { value };
                self.keyframes[index].set_value(value);
            }
            return Some(index);
        }

        if !value.is_nan() {
            self.keyframes[index].set_value(clamp_unit(value));
        }
        if !time.is_nan() {
            let time = time.clamp(INTERIOR_TIME_MIN, INTERIOR_TIME_MAX);
            let occupied = self.keyframes
                .iter()
                .enumerate()
                .any(|(i, k)| i != index && k.time() == time);
            if occupied {
                debug!("keyframe {} not moved to t={}: time taken", id, time);
            } else {
                self.keyframes[index].set_time(time);
            }
        }

        self.sort_keyframes();
        self.index_of(id)
    }

    /// Drags the in-handle of keyframe `id` to (`x`, `y`). With `sync` the
    /// out side mirrors the result. Returns whether the tangent changed; a
    /// handle on the wrong side of the keyframe or an unknown id changes
    /// nothing.
    pub fn set_in_tangent_from_handle(&mut self, id: KeyframeId, x: f64, y: f64, sync: bool) -> bool {
        match self.find_id_mut(id) {
            Some(keyframe) if sync => keyframe.set_in_tangent_from_handle_sync(x, y),
            Some(keyframe) => keyframe.set_in_tangent_from_handle(x, y),
            None => false
        }
    }

    pub fn set_out_tangent_from_handle(&mut self, id: KeyframeId, x: f64, y: f64, sync: bool) -> bool {
        match self.find_id_mut(id) {
            Some(keyframe) if sync => keyframe.set_out_tangent_from_handle_sync(x, y),
            Some(keyframe) => keyframe.set_out_tangent_from_handle(x, y),
            None => false
        }
    }

    /// Applies both handles of keyframe `id` independently.
    pub fn set_tangents_from_handles(&mut self, id: KeyframeId, handles: &KeyframeHandles) -> bool {
        self.find_id_mut(id)
            .map(|keyframe| keyframe.set_tangents_from_handles(handles))
            .unwrap_or(false)
    }

    /// Deep copy. Every keyframe of the copy has a fresh id from the shared
    /// allocator, so the copy is not identity-equivalent to `self`.
    pub fn copy(&self) -> KeyframeCurve {
        let keyframes = self.keyframes
            .iter()
            .map(|k| k.duplicate(&self.ids))
            .collect();
        KeyframeCurve {
            ids: Arc::clone(&self.ids),
            keyframes
        }
    }

    fn find_id_mut(&mut self, id: KeyframeId) -> Option<&mut Keyframe> {
        let keyframe = self.keyframes.iter_mut().find(|k| k.id() == id);
        if keyframe.is_none() {
            debug!("handle drag on unknown keyframe {} ignored", id);
        }
        keyframe
    }

    fn insert_keyframe(&mut self, keyframe: Keyframe) -> Option<KeyframeId> {
        match self.find_time(keyframe.time()) {
            Ok(index) if self.is_boundary(index) => {
                debug!("keyframe {} at t={} dropped: boundary time", keyframe.id(), keyframe.time());
                None
            },
            Ok(index) => {
                let keyframe = self.with_unused_id(keyframe, Some(index));
                let id = keyframe.id();
                trace!("keyframe {} replaces {} at t={}", id, self.keyframes[index].id(), keyframe.time());
                self.keyframes[index] = keyframe;
                Some(id)
            },
            Err(index) => {
                let keyframe = self.with_unused_id(keyframe, None);
                let id = keyframe.id();
                trace!("keyframe {} inserted at t={}", id, keyframe.time());
                self.keyframes.insert(index, keyframe);
                Some(id)
            }
        }
    }

    /// `keyframe` as is, or under a fresh id when another keyframe than the
    /// one at `replacing` already carries its id.
    fn with_unused_id(&self, keyframe: Keyframe, replacing: Option<usize>) -> Keyframe {
        let mut keyframe = keyframe;
        while self.keyframes
            .iter()
            .enumerate()
            .any(|(i, k)| Some(i) != replacing && k.id() == keyframe.id()) {
            let fresh = keyframe.duplicate(&self.ids);
            debug!("keyframe id {} already in use, stored as {}", keyframe.id(), fresh.id());
            keyframe = fresh;
        }
        keyframe
    }

    fn segment(&self, i0: usize, i1: usize) -> HermiteSegment {
        let k0 = &self.keyframes[i0];
        let k1 = &self.keyframes[i1];
        HermiteSegment::new(
            k0.time(), k0.value(), k0.out_tangent(),
            k1.time(), k1.value(), k1.in_tangent()
        )
    }

    fn find_time(&self, time: f64) -> Result<usize, usize> {
        // -0.0 + 0.0 == +0.0; stored times never carry a negative zero
        let time = time + 0.0;
        self.keyframes.binary_search_by(|k| k.time().total_cmp(&time))
    }

    fn sort_keyframes(&mut self) {
        self.keyframes.sort_by(|a, b| a.time().total_cmp(&b.time()));
    }
}

fn collapse_equal_times(keyframes: Vec<Keyframe>) -> Vec<Keyframe> {
    let mut result: Vec<Keyframe> = Vec::with_capacity(keyframes.len());
    for keyframe in keyframes {
        match result.last_mut() {
            Some(last) if last.time() == keyframe.time() => *last = keyframe,
            _ => result.push(keyframe)
        }
    }
    result
}

impl Curve for KeyframeCurve {
    fn value(&self, x: f64) -> f64 {
        self.evaluate(x)
    }

    /// Slope of the active segment; 0 where the curve holds a boundary value.
    fn derivative(&self, x: f64) -> f64 {
        let t = clamp_unit(x);
        let (i0, i1) = self.closest_keyframes(t);
        if t < self.keyframes[i0].time() || t > self.keyframes[i1].time() {
            return 0.0;
        }
        self.segment(i0, i1).derivative(t)
    }
}

impl NonparametricCurve for KeyframeCurve {
    fn points(&self) -> Vec<Point2D> {
        self.keyframes
            .iter()
            .map(|k| Point2D::new(k.time(), k.value()))
            .collect()
    }

    fn min_x(&self) -> f64 {
        self.first_keyframe().time()
    }

    fn max_x(&self) -> f64 {
        self.last_keyframe().time()
    }
}
