use std::time::{Duration, Instant};

use unitouch_geometry::{Point, Vector};

/// The normalized lifecycle phase of a snapshot, independent of the device that produced the raw
/// event.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// The dominant axis direction of the most recent step.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Direction {
    Left,
    Right,
    Top,
    Bottom,
}

impl Direction {
    /// The horizontal axis wins only when its absolute delta is strictly greater, so ties (and the
    /// zero step) resolve vertically.
    fn of_step(step: Vector) -> Self {
        if step.x.abs() > step.y.abs() {
            if step.x < 0.0 { Self::Left } else { Self::Right }
        } else if step.y < 0.0 {
            Self::Top
        } else {
            Self::Bottom
        }
    }
}

/// An enriched touch-state snapshot. One is produced per processed raw event.
///
/// Straight-line metrics are derived from `start` and `pos` ([`Self::displacement`],
/// [`Self::distance`]), while `total` and `total_axes` accumulate the actual path traveled, so
/// back-and-forth movement keeps `total >= distance()`.
#[derive(Clone, Debug)]
pub struct TouchSnapshot {
    pub phase: TouchPhase,
    /// The instant the raw event reported.
    pub timestamp: Instant,
    /// Elapsed time since the session's first snapshot.
    pub duration: Duration,
    /// Coordinates of the first snapshot of the session.
    pub start: Point,
    /// Coordinates of the immediately preceding snapshot.
    pub prev: Point,
    /// Current coordinates.
    pub pos: Point,
    /// Per-axis delta since `prev`.
    pub step: Vector,
    /// Instantaneous speed in pixels per second. 0 when no time passed since `prev`.
    pub velocity: f64,
    /// Accumulated path length over `duration`, pixels per second. 0 when `duration` is zero.
    pub average_velocity: f64,
    /// Accumulated path length since `start`. Monotonically non-decreasing.
    pub total: f64,
    /// Accumulated per-axis absolute travel since `start`.
    pub total_axes: Vector,
    pub direction: Direction,
    /// Angle in degrees of the vector `start` -> `pos` relative to the x-axis, with y growing
    /// downward, in `(-180, 180]`. `None` when there is no net movement.
    pub angle: Option<f64>,
}

impl TouchSnapshot {
    /// Derives a new snapshot from the current coordinates and the session's first and previous
    /// snapshots.
    ///
    /// When `first` / `last` are absent the snapshot becomes its own origin: zero deltas, zero
    /// rates, and no angle. Rate denominators of zero yield 0, never NaN or infinity.
    pub fn build(
        phase: TouchPhase,
        pos: Point,
        at: Instant,
        first: Option<&TouchSnapshot>,
        last: Option<&TouchSnapshot>,
    ) -> Self {
        let start = first.map(|f| f.start).unwrap_or(pos);
        let started = first.map(|f| f.timestamp).unwrap_or(at);
        let prev = last.map(|l| l.pos).unwrap_or(pos);
        let prev_at = last.map(|l| l.timestamp).unwrap_or(at);

        let step = pos - prev;
        let step_distance = step.length();
        let duration = at.saturating_duration_since(started);
        let total = last.map(|l| l.total).unwrap_or(0.0) + step_distance;
        let total_axes = last.map(|l| l.total_axes).unwrap_or_default() + step.abs();

        Self {
            phase,
            timestamp: at,
            duration,
            start,
            prev,
            pos,
            step,
            velocity: rate(step_distance, at.saturating_duration_since(prev_at)),
            average_velocity: rate(total, duration),
            total,
            total_axes,
            direction: Direction::of_step(step),
            angle: angle_of(pos - start),
        }
    }

    /// The same snapshot under another phase. Used to synthesize the end snapshot, which reuses
    /// the last accepted metrics verbatim.
    #[must_use]
    pub fn with_phase(mut self, phase: TouchPhase) -> Self {
        self.phase = phase;
        self
    }

    /// Straight-line offset from `start` to `pos`.
    pub fn displacement(&self) -> Vector {
        self.pos - self.start
    }

    /// Straight-line distance from `start` to `pos`.
    pub fn distance(&self) -> f64 {
        self.displacement().length()
    }

    /// Euclidean length of the most recent step.
    pub fn step_distance(&self) -> f64 {
        self.step.length()
    }
}

fn rate(distance: f64, elapsed: Duration) -> f64 {
    if elapsed.is_zero() {
        0.0
    } else {
        distance / elapsed.as_secs_f64()
    }
}

/// `None` for the zero vector. An angle of exactly -180 is normalized to +180 to keep the range
/// at `(-180, 180]`.
fn angle_of(d: Vector) -> Option<f64> {
    if d.x == 0.0 && d.y == 0.0 {
        return None;
    }
    // Screen coordinates grow downward; negate y so that "up" is +90.
    let degrees = (-d.y).atan2(d.x).to_degrees();
    Some(if degrees <= -180.0 {
        degrees + 360.0
    } else {
        degrees
    })
}
