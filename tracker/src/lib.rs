//! Device-agnostic single-pointer gesture tracking.
//!
//! Raw mouse/touch events arrive as [`PointerEvent`]s on named channels of an [`EventTarget`];
//! each processed event is turned into an enriched [`TouchSnapshot`] (velocity, distance,
//! direction, angle) and run through a small start -> move* -> end/cancel state machine that
//! dispatches to caller-supplied callbacks. Gestures are clipped to a [`SensitiveArea`] and a
//! movement threshold suppresses jitter.
//!
//! [`GestureTracker::bind`] is the entry point; the returned [`Binding`] detaches via its
//! idempotent `unbind`.

mod area;
mod binding;
mod config;
mod raw;
mod session;
mod snapshot;
mod target;
#[cfg(test)]
mod testing;

pub use area::*;
pub use binding::*;
pub use config::*;
pub use raw::*;
pub use session::*;
pub use snapshot::*;
pub use target::*;
