use std::rc::Rc;

use unitouch_geometry::Rect;

use crate::PointerEvent;

/// A raw event handler. Subscription identity is the `Rc` allocation, compared with
/// [`Rc::ptr_eq`].
pub type Handler = Rc<dyn Fn(&PointerEvent)>;

/// Deferred work submitted through [`EventTarget::defer`].
pub type Task = Box<dyn FnOnce()>;

/// The surface a bindable element or document must provide.
///
/// Channel names are passed as a single space-separated list, so multi-device phases subscribe in
/// one call (e.g. `"mousedown touchstart"`).
pub trait EventTarget {
    /// Attach `handler` to every channel in the space-separated `channels` list.
    fn subscribe(&self, channels: &str, handler: &Handler);

    /// Detach a previously attached handler from every channel in the list. Detaching a handler
    /// that was never attached is a no-op.
    fn unsubscribe(&self, channels: &str, handler: &Handler);

    /// The bounding rectangle of the document owning this target. The default sensitive area.
    fn document_rect(&self) -> Rect;

    /// The target's own current bounding rectangle.
    fn bounding_rect(&self) -> Rect;

    /// Submit `task` to run after the current dispatch turn. Tasks run in submission order.
    fn defer(&self, task: Task);
}
