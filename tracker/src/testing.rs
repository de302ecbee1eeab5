//! In-memory event target for exercising bindings without a host runtime.

use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, VecDeque},
    rc::Rc,
};

use unitouch_geometry::Rect;

use crate::{EventTarget, Handler, PointerEvent, Task};

/// An [`EventTarget`] with a named-channel registry and an explicit deferred-task queue, drained
/// by the test via [`Self::run_deferred`].
pub struct TestTarget {
    channels: RefCell<HashMap<String, Vec<Handler>>>,
    deferred: RefCell<VecDeque<Task>>,
    pub document: Cell<Rect>,
    pub bounds: Cell<Rect>,
}

impl TestTarget {
    pub fn new() -> Rc<Self> {
        let _ = env_logger::builder().is_test(true).try_init();
        Rc::new(Self {
            channels: RefCell::new(HashMap::new()),
            deferred: RefCell::new(VecDeque::new()),
            document: Cell::new(Rect::new(-1000.0, -1000.0, 1000.0, 1000.0)),
            bounds: Cell::new(Rect::new(0.0, 0.0, 100.0, 100.0)),
        })
    }

    /// Dispatches `event` to every handler currently attached to `channel`. The handler list is
    /// snapshotted first, so handlers may (un)subscribe during dispatch.
    pub fn emit(&self, channel: &str, event: &PointerEvent) {
        let handlers = self
            .channels
            .borrow()
            .get(channel)
            .cloned()
            .unwrap_or_default();
        for handler in handlers {
            handler(event);
        }
    }

    /// Runs queued deferred tasks in submission order, including tasks queued while draining.
    pub fn run_deferred(&self) {
        loop {
            let task = self.deferred.borrow_mut().pop_front();
            match task {
                Some(task) => task(),
                None => break,
            }
        }
    }

    pub fn deferred_len(&self) -> usize {
        self.deferred.borrow().len()
    }

    pub fn handler_count(&self, channel: &str) -> usize {
        self.channels
            .borrow()
            .get(channel)
            .map(|handlers| handlers.len())
            .unwrap_or(0)
    }

    pub fn total_handlers(&self) -> usize {
        self.channels
            .borrow()
            .values()
            .map(|handlers| handlers.len())
            .sum()
    }
}

impl EventTarget for TestTarget {
    fn subscribe(&self, channels: &str, handler: &Handler) {
        let mut map = self.channels.borrow_mut();
        for name in channels.split_whitespace() {
            map.entry(name.to_string())
                .or_default()
                .push(handler.clone());
        }
    }

    fn unsubscribe(&self, channels: &str, handler: &Handler) {
        let mut map = self.channels.borrow_mut();
        for name in channels.split_whitespace() {
            if let Some(handlers) = map.get_mut(name) {
                handlers.retain(|attached| !Rc::ptr_eq(attached, handler));
            }
        }
    }

    fn document_rect(&self) -> Rect {
        self.document.get()
    }

    fn bounding_rect(&self) -> Rect {
        self.bounds.get()
    }

    fn defer(&self, task: Task) {
        self.deferred.borrow_mut().push_back(task);
    }
}
