use std::{fmt, rc::Rc};

use unitouch_geometry::Rect;

use crate::EventTarget;

/// The area a gesture is clipped to, resolved against the bound target on every move event so
/// that geometry changes (scroll, resize) are picked up without caching.
#[derive(Clone, Default)]
pub enum SensitiveArea {
    /// The bounding rectangle of the document owning the bound target.
    #[default]
    Document,
    /// A fixed rectangle.
    Rect(Rect),
    /// The current bounding rectangle of another element.
    Element(Rc<dyn EventTarget>),
    /// Computed from the bound target at move time. The result is resolved recursively, so the
    /// function may return any other variant.
    Resolve(Rc<dyn Fn(&Rc<dyn EventTarget>) -> SensitiveArea>),
}

impl SensitiveArea {
    pub fn resolve(&self, bound: &Rc<dyn EventTarget>) -> Rect {
        match self {
            Self::Document => bound.document_rect(),
            Self::Rect(rect) => *rect,
            Self::Element(element) => element.bounding_rect(),
            Self::Resolve(f) => f(bound).resolve(bound),
        }
    }
}

impl fmt::Debug for SensitiveArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document => write!(f, "Document"),
            Self::Rect(rect) => f.debug_tuple("Rect").field(rect).finish(),
            Self::Element(_) => write!(f, "Element(..)"),
            Self::Resolve(_) => write!(f, "Resolve(..)"),
        }
    }
}
