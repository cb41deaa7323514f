use std::sync::Arc;

use log::{
    debug,
    info
};

use crate::configuration::{
    Configuration,
    EditorSettings
};
use crate::manager::managererror::ManagerError;
use crate::math::curve::keyframe::keyframecurve::KeyframeCurve;
use crate::math::curve::keyframe::keyframeid::{
    KeyframeId,
    KeyframeIdAllocator
};
use crate::preset::curvepreset::CurvePreset;

/// Interaction state of one transfer-function editor, without any drawing.
///
/// Hosts translate pointer events into the curve's [0, 1] × [0, 1] space and
/// call the matching method. Every call that changed the curve bumps
/// [`revision`](Self::revision); hosts compare revisions to decide when to
/// rebuild their lookup table.
///
/// The session owns the id allocator of its curves, so two sessions hand out
/// independent, reproducible id sequences.
#[derive(Debug)]
pub struct CurveEditSession {
    ids: Arc<KeyframeIdAllocator>,
    settings: EditorSettings,
    default_curve: Option<KeyframeCurve>,
    curve: KeyframeCurve,
    revision: u64
}

impl CurveEditSession {
    pub fn new(settings: EditorSettings) -> CurveEditSession {
        let ids = Arc::new(KeyframeIdAllocator::new());
        let curve = KeyframeCurve::new(Arc::clone(&ids));
        CurveEditSession { ids, settings, default_curve: None, curve, revision: 0 }
    }

    pub fn with_default_curve(settings: EditorSettings, preset: &CurvePreset) -> CurveEditSession {
        let ids = Arc::new(KeyframeIdAllocator::new());
        let default_curve = preset.build(Arc::clone(&ids));
        let curve = default_curve.copy();
        CurveEditSession { ids, settings, default_curve: Some(default_curve), curve, revision: 0 }
    }

    /// Session using the configuration's editor settings and default preset.
    pub fn from_configuration(config: &Configuration) -> Result<CurveEditSession, ManagerError> {
        let settings = config.editor_settings();
        match config.default_curve_preset()? {
            Some(preset) => {
                info!("edit session starts from preset '{}'", preset.name());
                Ok(CurveEditSession::with_default_curve(settings, &preset))
            },
            None => Ok(CurveEditSession::new(settings))
        }
    }

    pub fn curve(&self) -> &KeyframeCurve {
        &self.curve
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn id_allocator(&self) -> &Arc<KeyframeIdAllocator> {
        &self.ids
    }

    /// Independent copy of the current curve, safe to read while the session
    /// keeps editing.
    pub fn snapshot(&self) -> KeyframeCurve {
        self.curve.copy()
    }

    /// Back to a fresh copy of the default curve, or the linear curve.
    pub fn reset(&mut self) {
        self.curve = match &self.default_curve {
            Some(default_curve) => default_curve.copy(),
            None => KeyframeCurve::new(Arc::clone(&self.ids))
        };
        self.bump();
    }

    /// Replaces the current curve with one built from `preset`.
    pub fn load_preset(&mut self, preset: &CurvePreset) {
        self.curve = preset.build(Arc::clone(&self.ids));
        self.bump();
    }

    /// Click-to-insert. Returns the id of the inserted keyframe, or `None`
    /// when the click landed exactly on a boundary keyframe's time.
    pub fn insert_at(&mut self, time: f64, value: f64) -> Option<KeyframeId> {
        let keyframe = self.curve.create_keyframe(time, value);
        let inserted = self.curve.add_key(keyframe);
        if inserted.is_some() {
            self.bump();
        }
        inserted
    }

    /// Removes an interior keyframe. Boundary keyframes stay.
    pub fn remove(&mut self, id: KeyframeId) -> bool {
        let time = match self.curve.keyframe(id) {
            Some(keyframe) => keyframe.time(),
            None => {
                debug!("remove of unknown keyframe {} ignored", id);
                return false;
            }
        };
        let removed = self.curve.remove_key_at(time).is_some();
        if removed {
            self.bump();
        }
        removed
    }

    /// One drag step of a keyframe. Returns its index after re-sorting.
    pub fn drag_keyframe(&mut self, id: KeyframeId, time: f64, value: f64) -> Option<usize> {
        let index = self.curve.move_key(id, time, value, self.settings.move_options());
        if index.is_some() {
            self.bump();
        }
        index
    }

    /// One drag step of an in-handle. `sync` (the modifier key) mirrors the
    /// tangent onto the out side.
    pub fn drag_in_handle(&mut self, id: KeyframeId, x: f64, y: f64, sync: bool) -> bool {
        let applied = self.curve.set_in_tangent_from_handle(id, x, y, sync);
        if applied {
            self.bump();
        }
        applied
    }

    pub fn drag_out_handle(&mut self, id: KeyframeId, x: f64, y: f64, sync: bool) -> bool {
        let applied = self.curve.set_out_tangent_from_handle(id, x, y, sync);
        if applied {
            self.bump();
        }
        applied
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        self.curve.evaluate(t)
    }

    /// Lookup table of `settings.sample_count + 1` values.
    pub fn sample(&self) -> Vec<f64> {
        self.curve.sample(self.settings.sample_count)
    }

    /// [`sample`](Self::sample) clamped into [0, 1], the polyline an editor
    /// draws over its plot area.
    pub fn display_samples(&self) -> Vec<f64> {
        self.curve.sample_clamped(self.settings.sample_count)
    }

    /// [`sample`](Self::sample) in the `f32` layout textures take.
    pub fn lookup_table(&self) -> Vec<f32> {
        self.curve.sample_f32(self.settings.sample_count)
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn session() -> CurveEditSession {
        CurveEditSession::new(EditorSettings::default())
    }

    #[test]
    fn test_new_session_is_linear() {
        let session = session();
        assert_eq!(session.curve().len(), 2);
        assert_eq!(session.evaluate(0.5), 0.5);
        assert_eq!(session.sample().len(), 257);
        assert_eq!(session.lookup_table().len(), 257);
        assert_eq!(session.revision(), 0);
    }

    #[test]
    fn test_insert_and_remove() {
        let mut session = session();
        let id = session.insert_at(0.5, 0.9).expect("interior click");
        assert_eq!(session.curve().len(), 3);
        assert_eq!(session.revision(), 1);

        assert!(session.insert_at(0.0, 0.5).is_none());
        assert_eq!(session.revision(), 1);

        let first = session.curve().first_keyframe().id();
        assert!(!session.remove(first));
        assert!(session.remove(id));
        assert!(!session.remove(id));
        assert_eq!(session.curve().len(), 2);
        assert_eq!(session.revision(), 2);
    }

    #[test]
    fn test_drag_keyframe_reorders() {
        let mut session = session();
        let a = session.insert_at(0.3, 0.2).expect("inserted");
        let b = session.insert_at(0.6, 0.8).expect("inserted");
        assert_eq!(session.drag_keyframe(a, 0.7, 0.5), Some(2));
        assert_eq!(session.curve().index_of(b), Some(1));
    }

    #[test]
    fn test_boundary_drag_uses_settings() {
        let settings = EditorSettings { clamp_boundary_value: false, ..EditorSettings::default() };
        let mut session = CurveEditSession::new(settings);
        let last = session.curve().last_keyframe().id();
        session.drag_keyframe(last, 0.5, 1.5);
        assert_eq!(session.curve().last_keyframe().value(), 1.5);
        assert_eq!(session.curve().last_keyframe().time(), 1.0);
    }

    #[test]
    fn test_handle_drags() {
        let mut session = session();
        let id = session.insert_at(0.5, 0.5).expect("inserted");

        assert!(!session.drag_in_handle(id, 0.6, 0.6, false));
        assert_eq!(session.revision(), 1);

        assert!(session.drag_in_handle(id, 0.4, 0.3, true));
        let kf = session.curve().keyframe(id).expect("present");
        assert_eq!(kf.in_tangent(), kf.out_tangent());
        assert_eq!(kf.in_magnitude(), -kf.out_magnitude());

        assert!(session.drag_out_handle(id, 0.7, 0.5, false));
        let kf = session.curve().keyframe(id).expect("present");
        assert_eq!(kf.out_tangent(), 0.0);
        assert_ne!(kf.in_tangent(), 0.0);
        assert_eq!(session.revision(), 3);
    }

    #[test]
    fn test_display_samples_stay_in_unit_range() {
        let settings = EditorSettings { sample_count: 32, ..EditorSettings::default() };
        let mut session = CurveEditSession::new(settings);
        let last = session.curve().last_keyframe().id();
        let first = session.curve().first_keyframe().id();
        assert!(session.drag_out_handle(first, 0.1, 2.0, false));
        assert!(session.drag_in_handle(last, 0.9, -1.0, false));

        assert!(session.sample().iter().any(|&v| v > 1.0));
        let display = session.display_samples();
        assert_eq!(display.len(), 33);
        assert!(display.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_reset_restores_default_with_fresh_ids() {
        let preset = CurvePreset::flat();
        let mut session = CurveEditSession::with_default_curve(EditorSettings::default(), &preset);
        let previous_ids: Vec<KeyframeId> = session.curve().keyframes().iter().map(|k| k.id()).collect();
        session.insert_at(0.5, 1.0);
        session.reset();

        assert_eq!(session.curve().len(), 2);
        assert!(session.sample().iter().all(|&v| v == 0.0));
        for kf in session.curve().keyframes() {
            assert!(!previous_ids.contains(&kf.id()));
        }
    }

    #[test]
    fn test_reset_without_default_is_linear() {
        let mut session = session();
        session.insert_at(0.25, 1.0);
        session.reset();
        assert_eq!(session.curve().len(), 2);
        assert_eq!(session.evaluate(0.5), 0.5);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut session = session();
        let snapshot = session.snapshot();
        session.insert_at(0.5, 1.0);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.evaluate(0.5), 0.5);
    }

    #[test]
    fn test_from_configuration() {
        let config = Configuration::new();
        config.from_json_value(json!({
            "editor": { "sample_count": 4, "default_preset": "Flat" }
        })).expect("valid");
        let session = CurveEditSession::from_configuration(&config).expect("preset exists");
        assert_eq!(session.sample(), vec![0.0; 5]);
    }
}
