use std::{collections::HashMap, rc::Rc};

use derive_more::Constructor;
use itertools::Itertools;

use crate::{PointerEvent, SensitiveArea, TouchPhase, TouchSnapshot};

/// The kinds of pointing devices a binding can listen for.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// The raw channel names of the four gesture phases for one pointer kind. A phase without a name
/// is never subscribed for that kind (e.g. mouse has no cancel channel).
#[derive(Clone, Debug, Default, Constructor)]
pub struct PhaseChannels {
    pub start: Option<String>,
    pub move_: Option<String>,
    pub end: Option<String>,
    pub cancel: Option<String>,
}

impl PhaseChannels {
    pub fn channel(&self, phase: TouchPhase) -> Option<&str> {
        match phase {
            TouchPhase::Start => self.start.as_deref(),
            TouchPhase::Move => self.move_.as_deref(),
            TouchPhase::End => self.end.as_deref(),
            TouchPhase::Cancel => self.cancel.as_deref(),
        }
    }
}

/// Per-event gate applied to move and end snapshots.
pub type ValidPredicate = Rc<dyn Fn(&TouchSnapshot, &PointerEvent) -> bool>;

/// Process-wide tracker defaults. Constructed once and threaded into every bind call; per-call
/// [`BindingOptions`] overlay it without mutating shared state.
#[derive(Clone)]
pub struct TrackerConfig {
    /// Pointer kind to phase-channel-name table.
    pub pointer_events: HashMap<PointerKind, PhaseChannels>,
    /// The kinds a binding listens for, in subscription order.
    pub pointer_kinds: Vec<PointerKind>,
    /// Minimum cumulative per-axis travel in pixels before move snapshots are dispatched.
    pub movement_threshold: f64,
    pub valid: ValidPredicate,
    pub sensitive_area: SensitiveArea,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let pointer_events = HashMap::from([
            (
                PointerKind::Mouse,
                PhaseChannels::new(
                    Some("mousedown".into()),
                    Some("mousemove".into()),
                    Some("mouseup".into()),
                    None,
                ),
            ),
            (
                PointerKind::Touch,
                PhaseChannels::new(
                    Some("touchstart".into()),
                    Some("touchmove".into()),
                    Some("touchend".into()),
                    Some("touchcancel".into()),
                ),
            ),
        ]);

        Self {
            pointer_events,
            pointer_kinds: vec![PointerKind::Mouse, PointerKind::Touch],
            movement_threshold: 1.0,
            valid: Rc::new(|_, _| true),
            sensitive_area: SensitiveArea::default(),
        }
    }
}

impl TrackerConfig {
    /// The space-joined channel names for `phase` over the configured pointer kinds, in
    /// `pointer_kinds` order. `None` when no kind maps the phase.
    pub fn channels(&self, phase: TouchPhase) -> Option<String> {
        let joined = self
            .pointer_kinds
            .iter()
            .filter_map(|kind| self.pointer_events.get(kind))
            .filter_map(|channels| channels.channel(phase))
            .join(" ");
        (!joined.is_empty()).then_some(joined)
    }
}

/// Per-bind overrides. Every option overlays its [`TrackerConfig`] counterpart independently.
#[derive(Clone, Default)]
pub struct BindingOptions {
    pub pointer_events: Option<HashMap<PointerKind, PhaseChannels>>,
    pub pointer_kinds: Option<Vec<PointerKind>>,
    pub movement_threshold: Option<f64>,
    pub valid: Option<ValidPredicate>,
    pub sensitive_area: Option<SensitiveArea>,
}

impl BindingOptions {
    /// The effective configuration for one binding.
    pub fn overlay(self, defaults: &TrackerConfig) -> TrackerConfig {
        TrackerConfig {
            pointer_events: self
                .pointer_events
                .unwrap_or_else(|| defaults.pointer_events.clone()),
            pointer_kinds: self
                .pointer_kinds
                .unwrap_or_else(|| defaults.pointer_kinds.clone()),
            movement_threshold: self
                .movement_threshold
                .unwrap_or(defaults.movement_threshold),
            valid: self.valid.unwrap_or_else(|| defaults.valid.clone()),
            sensitive_area: self
                .sensitive_area
                .unwrap_or_else(|| defaults.sensitive_area.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_channels_join_in_kind_order() {
        let config = TrackerConfig::default();
        assert_eq!(
            config.channels(TouchPhase::Start).as_deref(),
            Some("mousedown touchstart")
        );
        assert_eq!(
            config.channels(TouchPhase::Move).as_deref(),
            Some("mousemove touchmove")
        );
        // Mouse contributes nothing to the cancel phase.
        assert_eq!(
            config.channels(TouchPhase::Cancel).as_deref(),
            Some("touchcancel")
        );
    }

    #[test]
    fn kinds_without_mappings_produce_no_channels() {
        let config = TrackerConfig {
            pointer_kinds: vec![PointerKind::Mouse],
            ..Default::default()
        };
        assert_eq!(config.channels(TouchPhase::Cancel), None);
        assert_eq!(config.channels(TouchPhase::End).as_deref(), Some("mouseup"));
    }

    #[test]
    fn overlay_resolves_each_option_independently() {
        let defaults = TrackerConfig {
            movement_threshold: 4.0,
            ..Default::default()
        };

        let resolved = BindingOptions {
            pointer_kinds: Some(vec![PointerKind::Touch]),
            valid: Some(Rc::new(|_, _| false)),
            ..Default::default()
        }
        .overlay(&defaults);

        assert_eq!(resolved.pointer_kinds, vec![PointerKind::Touch]);
        // The threshold falls back to the threshold default, not to any other option.
        assert_eq!(resolved.movement_threshold, 4.0);
        assert_eq!(
            resolved.channels(TouchPhase::Start).as_deref(),
            Some("touchstart")
        );
    }

    #[test]
    fn overlay_swaps_the_channel_table() {
        let pointer_events = HashMap::from([(
            PointerKind::Touch,
            PhaseChannels::new(
                Some("pointerdown".into()),
                Some("pointermove".into()),
                Some("pointerup".into()),
                Some("pointercancel".into()),
            ),
        )]);

        let resolved = BindingOptions {
            pointer_events: Some(pointer_events),
            ..Default::default()
        }
        .overlay(&TrackerConfig::default());

        // Mouse stays configured but has no entry in the swapped table.
        assert_eq!(
            resolved.channels(TouchPhase::Start).as_deref(),
            Some("pointerdown")
        );
        assert_eq!(
            resolved.channels(TouchPhase::Cancel).as_deref(),
            Some("pointercancel")
        );
    }

    #[test]
    fn overlay_overrides_the_threshold() {
        let resolved = BindingOptions {
            movement_threshold: Some(10.0),
            ..Default::default()
        }
        .overlay(&TrackerConfig::default());
        assert_eq!(resolved.movement_threshold, 10.0);
    }
}
