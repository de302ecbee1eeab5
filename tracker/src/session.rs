use std::rc::Rc;

use log::trace;
use unitouch_geometry::Contains;

use crate::{EventTarget, PointerEvent, TouchPhase, TouchSnapshot, TrackerConfig};

/// The mutable per-binding gesture state: inactive while `first` is unset, active between a start
/// and the matching end/cancel. The first snapshot is immutable for the session's lifetime; the
/// last snapshot is replaced on every accepted move.
#[derive(Default, Debug)]
pub struct GestureSession {
    first: Option<TouchSnapshot>,
    last: Option<TouchSnapshot>,
}

/// What a move transition decided.
#[derive(Clone, Debug)]
pub enum MoveOutcome {
    /// Snapshot recorded and to be dispatched to the move callback.
    Dispatch(TouchSnapshot),
    /// Snapshot recorded, dispatch suppressed by the movement threshold or the validity gate.
    Suppressed,
    /// Coordinates fell outside the sensitive area; nothing was recorded.
    OutsideArea,
    /// No gesture in progress.
    Inactive,
}

impl GestureSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.first.is_some()
    }

    pub fn first(&self) -> Option<&TouchSnapshot> {
        self.first.as_ref()
    }

    pub fn last(&self) -> Option<&TouchSnapshot> {
        self.last.as_ref()
    }

    /// Start transition. The inaugural snapshot becomes both first and last. `None` when a
    /// gesture is already in progress.
    pub fn begin(&mut self, event: &PointerEvent) -> Option<TouchSnapshot> {
        if self.is_active() {
            return None;
        }
        let snapshot = TouchSnapshot::build(TouchPhase::Start, event.pos(), event.time(), None, None);
        self.first = Some(snapshot.clone());
        self.last = Some(snapshot.clone());
        Some(snapshot)
    }

    /// Move transition. Clips against the sensitive area resolved at this very event, then
    /// records the snapshot and gates dispatch on the movement threshold and the validity
    /// predicate. Sub-threshold and invalid snapshots still advance the last snapshot, so
    /// accumulated totals survive suppressed movement.
    pub fn update(
        &mut self,
        config: &TrackerConfig,
        bound: &Rc<dyn EventTarget>,
        event: &PointerEvent,
    ) -> MoveOutcome {
        if !self.is_active() {
            return MoveOutcome::Inactive;
        }

        let pos = event.pos();
        let area = config.sensitive_area.resolve(bound);
        if !area.contains(pos) {
            trace!("move at {pos:?} outside sensitive area {area:?}, ignored");
            return MoveOutcome::OutsideArea;
        }

        let snapshot = TouchSnapshot::build(
            TouchPhase::Move,
            pos,
            event.time(),
            self.first.as_ref(),
            self.last.as_ref(),
        );
        self.last = Some(snapshot.clone());

        if snapshot.total_axes.x < config.movement_threshold
            && snapshot.total_axes.y < config.movement_threshold
        {
            return MoveOutcome::Suppressed;
        }
        if !(config.valid)(&snapshot, event) {
            return MoveOutcome::Suppressed;
        }

        event.prevent_default();
        MoveOutcome::Dispatch(snapshot)
    }

    /// End transition. The end snapshot clones the last recorded metrics under the end phase; no
    /// new kinematics are computed. The session always deactivates, and the snapshot is returned
    /// only when it passes the validity gate.
    pub fn finish(&mut self, config: &TrackerConfig, event: &PointerEvent) -> Option<TouchSnapshot> {
        let last = self.last.take()?;
        self.reset();

        let snapshot = last.with_phase(TouchPhase::End);
        if !(config.valid)(&snapshot, event) {
            return None;
        }
        event.prevent_default();
        Some(snapshot)
    }

    /// Cancel transition. Builds a cancel snapshot from the current coordinates and always
    /// deactivates. There is no validity gate on cancellation.
    pub fn cancel(&mut self, event: &PointerEvent) -> Option<TouchSnapshot> {
        if !self.is_active() {
            return None;
        }
        let snapshot = TouchSnapshot::build(
            TouchPhase::Cancel,
            event.pos(),
            event.time(),
            self.first.as_ref(),
            self.last.as_ref(),
        );
        self.reset();
        Some(snapshot)
    }

    pub fn reset(&mut self) {
        self.first = None;
        self.last = None;
    }
}
