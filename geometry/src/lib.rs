//! 2D geometry primitives for pointer tracking.

mod point;
mod rect;

pub use point::*;
pub use rect::*;

pub trait Contains<Other> {
    fn contains(&self, other: Other) -> bool;
}
