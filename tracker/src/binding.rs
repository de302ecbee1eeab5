use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use derive_more::Constructor;
use log::debug;

use crate::{
    BindingOptions, EventTarget, GestureSession, Handler, MoveOutcome, PointerEvent, TouchPhase,
    TouchSnapshot, TrackerConfig,
};

/// A gesture lifecycle callback, invoked with the snapshot and the raw event that produced it.
pub type GestureCallback = Rc<dyn Fn(&TouchSnapshot, &PointerEvent)>;

/// The four lifecycle callbacks of a binding. All optional.
#[derive(Clone, Default)]
pub struct GestureCallbacks {
    pub start: Option<GestureCallback>,
    pub move_: Option<GestureCallback>,
    pub end: Option<GestureCallback>,
    pub cancel: Option<GestureCallback>,
}

impl GestureCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_start(mut self, f: impl Fn(&TouchSnapshot, &PointerEvent) + 'static) -> Self {
        self.start = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn on_move(mut self, f: impl Fn(&TouchSnapshot, &PointerEvent) + 'static) -> Self {
        self.move_ = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn on_end(mut self, f: impl Fn(&TouchSnapshot, &PointerEvent) + 'static) -> Self {
        self.end = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn on_cancel(mut self, f: impl Fn(&TouchSnapshot, &PointerEvent) + 'static) -> Self {
        self.cancel = Some(Rc::new(f));
        self
    }
}

/// The explicit defaults object threaded into every bind call.
#[derive(Default)]
pub struct GestureTracker {
    config: TrackerConfig,
}

impl GestureTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Wires a fresh gesture session to `target`'s raw event channels. Only the start channels
    /// are subscribed while idle; move/end/cancel channels come and go with the gesture.
    ///
    /// Every call owns an independent session, so binding the same target twice tracks two
    /// gestures side by side.
    pub fn bind(
        &self,
        target: Rc<dyn EventTarget>,
        callbacks: GestureCallbacks,
        options: BindingOptions,
    ) -> Binding {
        let config = options.overlay(&self.config);
        let channels = ChannelSet {
            start: config.channels(TouchPhase::Start),
            move_: config.channels(TouchPhase::Move),
            end: config.channels(TouchPhase::End),
            cancel: config.channels(TouchPhase::Cancel),
        };

        let state = Rc::new(RefCell::new(BindingState {
            config,
            target: target.clone(),
            callbacks,
            channels,
            session: GestureSession::new(),
            handlers: None,
            tracking: false,
            unbound: false,
        }));

        let handlers = Handlers::new(
            handler(&state, on_start),
            handler(&state, on_move),
            handler(&state, on_end),
            handler(&state, on_cancel),
        );
        if let Some(start) = &state.borrow().channels.start {
            target.subscribe(start, &handlers.start);
        }
        state.borrow_mut().handlers = Some(handlers);

        Binding { state }
    }
}

/// A live binding. [`Self::unbind`] detaches everything; it is idempotent and the only teardown
/// mechanism (dropping the handle does not detach).
#[derive(Clone)]
pub struct Binding {
    state: Rc<RefCell<BindingState>>,
}

impl Binding {
    pub fn unbind(&self) {
        let (target, handlers, channels, was_tracking) = {
            let mut state = self.state.borrow_mut();
            if state.unbound {
                return;
            }
            state.unbound = true;
            state.session.reset();
            let was_tracking = state.tracking;
            state.tracking = false;
            state.callbacks = GestureCallbacks::default();
            (
                state.target.clone(),
                state.handlers.take(),
                state.channels.clone(),
                was_tracking,
            )
        };

        let Some(handlers) = handlers else { return };
        if let Some(start) = &channels.start {
            target.unsubscribe(start, &handlers.start);
        }
        if was_tracking {
            unsubscribe_tracking(&*target, &channels, &handlers);
        }
        debug!("gesture binding released");
    }
}

struct BindingState {
    config: TrackerConfig,
    target: Rc<dyn EventTarget>,
    callbacks: GestureCallbacks,
    channels: ChannelSet,
    session: GestureSession,
    /// Set once right after construction; taken on unbind.
    handlers: Option<Handlers>,
    /// Whether the move/end/cancel channels are currently subscribed.
    tracking: bool,
    unbound: bool,
}

/// Resolved per-phase channel-name lists of one binding.
#[derive(Clone, Debug, Default)]
struct ChannelSet {
    start: Option<String>,
    move_: Option<String>,
    end: Option<String>,
    cancel: Option<String>,
}

#[derive(Clone, Constructor)]
struct Handlers {
    start: Handler,
    move_: Handler,
    end: Handler,
    cancel: Handler,
}

/// Wraps a transition behind a weak reference, so handlers left in a target's channel registry
/// cannot keep an unbound binding alive or dispatch into it.
fn handler(
    state: &Rc<RefCell<BindingState>>,
    transition: fn(&Rc<RefCell<BindingState>>, &PointerEvent),
) -> Handler {
    let weak: Weak<RefCell<BindingState>> = Rc::downgrade(state);
    Rc::new(move |event| {
        if let Some(state) = weak.upgrade() {
            transition(&state, event);
        }
    })
}

fn subscribe_tracking(target: &dyn EventTarget, channels: &ChannelSet, handlers: &Handlers) {
    if let Some(move_) = &channels.move_ {
        target.subscribe(move_, &handlers.move_);
    }
    if let Some(end) = &channels.end {
        target.subscribe(end, &handlers.end);
    }
    if let Some(cancel) = &channels.cancel {
        target.subscribe(cancel, &handlers.cancel);
    }
}

fn unsubscribe_tracking(target: &dyn EventTarget, channels: &ChannelSet, handlers: &Handlers) {
    if let Some(move_) = &channels.move_ {
        target.unsubscribe(move_, &handlers.move_);
    }
    if let Some(end) = &channels.end {
        target.unsubscribe(end, &handlers.end);
    }
    if let Some(cancel) = &channels.cancel {
        target.unsubscribe(cancel, &handlers.cancel);
    }
}

// The transition handlers below never hold the state borrow across a callback invocation, so
// callbacks may re-enter the binding (e.g. call unbind).

fn on_start(state: &Rc<RefCell<BindingState>>, event: &PointerEvent) {
    let (snapshot, callback, target, channels, handlers) = {
        let mut s = state.borrow_mut();
        if s.unbound {
            return;
        }
        let Some(snapshot) = s.session.begin(event) else {
            return;
        };
        s.tracking = true;
        (
            snapshot,
            s.callbacks.start.clone(),
            s.target.clone(),
            s.channels.clone(),
            s.handlers.clone().expect("handlers set at bind time"),
        )
    };

    subscribe_tracking(&*target, &channels, &handlers);
    if let Some(callback) = callback {
        callback(&snapshot, event);
    }
}

fn on_move(state: &Rc<RefCell<BindingState>>, event: &PointerEvent) {
    let (outcome, callback) = {
        let mut s = state.borrow_mut();
        if s.unbound {
            return;
        }
        let BindingState {
            config,
            target,
            session,
            ..
        } = &mut *s;
        let outcome = session.update(config, target, event);
        (outcome, s.callbacks.move_.clone())
    };

    if let (MoveOutcome::Dispatch(snapshot), Some(callback)) = (outcome, callback) {
        callback(&snapshot, event);
    }
}

fn on_end(state: &Rc<RefCell<BindingState>>, event: &PointerEvent) {
    let (snapshot, callback, target, channels, handlers) = {
        let mut s = state.borrow_mut();
        if s.unbound || !s.session.is_active() {
            return;
        }
        let BindingState {
            config, session, ..
        } = &mut *s;
        let snapshot = session.finish(config, event);
        s.tracking = false;
        (
            snapshot,
            s.callbacks.end.clone(),
            s.target.clone(),
            s.channels.clone(),
            s.handlers.clone().expect("handlers set at bind time"),
        )
    };

    unsubscribe_tracking(&*target, &channels, &handlers);
    if let (Some(snapshot), Some(_)) = (snapshot, callback) {
        // The end callback runs on the next tick, decoupled from the in-flight raw event
        // propagation, so it can mutate the UI safely. The callback is re-fetched when the task
        // runs: unbind in the meantime must suppress the dispatch.
        let weak = Rc::downgrade(state);
        let event = event.clone();
        target.defer(Box::new(move || {
            let Some(state) = weak.upgrade() else { return };
            let callback = {
                let s = state.borrow();
                if s.unbound {
                    return;
                }
                s.callbacks.end.clone()
            };
            if let Some(callback) = callback {
                callback(&snapshot, &event);
            }
        }));
    }
}

fn on_cancel(state: &Rc<RefCell<BindingState>>, event: &PointerEvent) {
    let (snapshot, callback, target, channels, handlers) = {
        let mut s = state.borrow_mut();
        if s.unbound {
            return;
        }
        let Some(snapshot) = s.session.cancel(event) else {
            return;
        };
        s.tracking = false;
        (
            snapshot,
            s.callbacks.cancel.clone(),
            s.target.clone(),
            s.channels.clone(),
            s.handlers.clone().expect("handlers set at bind time"),
        )
    };

    unsubscribe_tracking(&*target, &channels, &handlers);
    if let Some(callback) = callback {
        callback(&snapshot, event);
    }
}
