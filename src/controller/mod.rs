// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Interaction-mode controllers.
//!
//! A controller is a small state machine (inactive <-> active) that turns
//! raw pointer events into geometry operations and reports domain events
//! (create/update/delete/selection) to the hosting application through an
//! [`EventSink`]. The sink is injected at construction, so a host can
//! aggregate events from several controllers without subclassing anything.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::models::ShapeData;
use crate::render::{PointerEvent, Surface, Viewport};

pub mod create;
pub mod edit;
pub mod select;

pub use create::PolygonCreateController;
pub use edit::PolygonEditController;
pub use select::SelectController;

/// Domain event kinds a controller can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Create,
    Update,
    Delete,
    Selection,
}

/// A domain event with its detail payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// A newly built shape descriptor.
    Create(ShapeData),
    /// Identifiers of updated shapes.
    Update(Vec<String>),
    /// Identifiers of deleted shapes.
    Delete(Vec<String>),
    /// Identifiers of the current selection.
    Selection(Vec<String>),
}

impl ControllerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ControllerEvent::Create(_) => EventKind::Create,
            ControllerEvent::Update(_) => EventKind::Update,
            ControllerEvent::Delete(_) => EventKind::Delete,
            ControllerEvent::Selection(_) => EventKind::Selection,
        }
    }
}

type Listener = Rc<dyn Fn(&ControllerEvent)>;

/// Shared listener registry controllers dispatch their events on.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct EventSink {
    listeners: Rc<RefCell<HashMap<EventKind, Vec<Listener>>>>,
}

impl EventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one event kind.
    pub fn add_listener(&self, kind: EventKind, listener: impl Fn(&ControllerEvent) + 'static) {
        self.listeners
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push(Rc::new(listener));
    }

    /// Deliver an event to every listener registered for its kind.
    pub fn dispatch(&self, event: &ControllerEvent) {
        // Snapshot first so listeners may register further listeners.
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .get(&event.kind())
            .map(|l| l.to_vec())
            .unwrap_or_default();
        for listener in listeners {
            listener(event);
        }
    }
}

/// Activation state machine and event emission shared by every interaction
/// mode.
pub struct ControllerBase {
    activated: bool,
    sink: EventSink,
}

impl ControllerBase {
    /// Build a base dispatching on `sink`, or on a fresh private sink when
    /// none is given. Starts inactive.
    pub fn new(sink: Option<EventSink>) -> Self {
        Self {
            activated: false,
            sink: sink.unwrap_or_default(),
        }
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn activate(&mut self) {
        self.activated = true;
    }

    pub fn deactivate(&mut self) {
        self.activated = false;
    }

    /// Deactivate then activate, clearing any transient gesture state a
    /// concrete mode may hold.
    pub fn reset(&mut self) {
        self.deactivate();
        self.activate();
    }

    pub fn sink(&self) -> &EventSink {
        &self.sink
    }

    pub fn emit(&self, event: ControllerEvent) {
        self.sink.dispatch(&event);
    }
}

/// External capabilities an interaction mode operates on.
pub struct ModeContext<'a> {
    pub surface: &'a mut dyn Surface,
    pub viewport: &'a Viewport,
}

/// Shared interface of concrete interaction modes.
pub trait InteractionMode {
    fn activate(&mut self, ctx: &mut ModeContext<'_>);
    fn deactivate(&mut self, ctx: &mut ModeContext<'_>);
    /// Cancellation primitive for an in-progress multi-step gesture.
    fn reset(&mut self, ctx: &mut ModeContext<'_>) {
        self.deactivate(ctx);
        self.activate(ctx);
    }
    fn handle_pointer_event(&mut self, ctx: &mut ModeContext<'_>, event: &PointerEvent);
}
