use std::{cell::Cell, time::Instant};

use unitouch_geometry::Point;

/// A normalized raw pointer event. Hosts adapt their native mouse/touch events into this shape
/// before emitting them on a channel.
///
/// Coordinates are extracted in priority order: the changed-touch list, then the changed-touch
/// list of a wrapped native event, then a single synthetic point, then client coordinates carried
/// on the event itself. Events without any source are not validated; [`Self::pos`] yields NaN
/// coordinates which propagate through the kinematics math.
#[derive(Clone, Debug)]
pub struct PointerEvent {
    time: Instant,
    touches: Vec<Point>,
    wrapped_touches: Vec<Point>,
    point: Option<Point>,
    client: Option<Point>,
    cancelable: Option<bool>,
    default_prevented: Cell<bool>,
}

impl PointerEvent {
    pub fn new(time: Instant) -> Self {
        Self {
            time,
            touches: Vec::new(),
            wrapped_touches: Vec::new(),
            point: None,
            client: None,
            cancelable: None,
            default_prevented: Cell::new(false),
        }
    }

    /// A mouse-shaped event: client coordinates only.
    pub fn mouse(time: Instant, pos: impl Into<Point>) -> Self {
        Self::new(time).with_client(pos)
    }

    /// A touch-shaped event: a single changed touch point.
    pub fn touch(time: Instant, pos: impl Into<Point>) -> Self {
        Self::new(time).with_touches([pos.into()])
    }

    #[must_use]
    pub fn with_touches(mut self, touches: impl IntoIterator<Item = Point>) -> Self {
        self.touches = touches.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_wrapped_touches(mut self, touches: impl IntoIterator<Item = Point>) -> Self {
        self.wrapped_touches = touches.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_point(mut self, pos: impl Into<Point>) -> Self {
        self.point = Some(pos.into());
        self
    }

    #[must_use]
    pub fn with_client(mut self, pos: impl Into<Point>) -> Self {
        self.client = Some(pos.into());
        self
    }

    #[must_use]
    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = Some(cancelable);
        self
    }

    pub fn time(&self) -> Instant {
        self.time
    }

    /// The event's screen coordinates, following the source priority chain.
    pub fn pos(&self) -> Point {
        self.touches
            .first()
            .or(self.wrapped_touches.first())
            .copied()
            .or(self.point)
            .or(self.client)
            .unwrap_or(Point::new(f64::NAN, f64::NAN))
    }

    pub fn cancelable(&self) -> Option<bool> {
        self.cancelable
    }

    /// Marks the event's default action as prevented. A no-op when the event is known to be
    /// non-cancelable.
    pub fn prevent_default(&self) {
        if self.cancelable != Some(false) {
            self.default_prevented.set(true);
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_list_wins_over_every_other_source() {
        let e = PointerEvent::new(Instant::now())
            .with_touches([Point::new(1.0, 1.0)])
            .with_wrapped_touches([Point::new(2.0, 2.0)])
            .with_point(Point::new(3.0, 3.0))
            .with_client(Point::new(4.0, 4.0));
        assert_eq!(e.pos(), Point::new(1.0, 1.0));
    }

    #[test]
    fn sources_fall_through_in_order() {
        let now = Instant::now();
        let wrapped = PointerEvent::new(now)
            .with_wrapped_touches([Point::new(2.0, 2.0)])
            .with_point(Point::new(3.0, 3.0));
        assert_eq!(wrapped.pos(), Point::new(2.0, 2.0));

        let synthetic = PointerEvent::new(now)
            .with_point(Point::new(3.0, 3.0))
            .with_client(Point::new(4.0, 4.0));
        assert_eq!(synthetic.pos(), Point::new(3.0, 3.0));

        assert_eq!(PointerEvent::mouse(now, (4.0, 4.0)).pos(), Point::new(4.0, 4.0));
    }

    #[test]
    fn missing_sources_yield_nan() {
        let pos = PointerEvent::new(Instant::now()).pos();
        assert!(pos.x.is_nan() && pos.y.is_nan());
    }

    #[test]
    fn prevent_default_respects_cancelable() {
        let e = PointerEvent::mouse(Instant::now(), (0.0, 0.0));
        e.prevent_default();
        assert!(e.default_prevented());

        let non_cancelable =
            PointerEvent::mouse(Instant::now(), (0.0, 0.0)).with_cancelable(false);
        non_cancelable.prevent_default();
        assert!(!non_cancelable.default_prevented());
    }
}
