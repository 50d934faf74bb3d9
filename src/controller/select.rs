// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Select mode: report which shapes the user picked.
//!
//! Hit-testing lives with the host (it owns the surface's hit areas), so
//! the host resolves a pointer press to shape identifiers and feeds them
//! in through [`SelectController::select`]. A press that resolves to
//! nothing clears the selection. Every change is reported as a
//! `Selection` event.

use crate::render::{PointerEvent, PointerEventKind};

use super::{ControllerBase, ControllerEvent, EventSink, InteractionMode, ModeContext};

/// Interaction mode tracking the selected shape identifiers.
pub struct SelectController {
    base: ControllerBase,
    selection: Vec<String>,
}

impl SelectController {
    pub fn new(sink: Option<EventSink>) -> Self {
        Self {
            base: ControllerBase::new(sink),
            selection: Vec::new(),
        }
    }

    pub fn is_activated(&self) -> bool {
        self.base.is_activated()
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    /// Replace the selection with the shapes the host's hit-test resolved.
    pub fn select(&mut self, ids: Vec<String>) {
        if !self.base.is_activated() || ids == self.selection {
            return;
        }
        self.selection = ids.clone();
        self.base.emit(ControllerEvent::Selection(ids));
    }

    pub fn clear_selection(&mut self) {
        if !self.base.is_activated() || self.selection.is_empty() {
            return;
        }
        self.selection.clear();
        self.base.emit(ControllerEvent::Selection(Vec::new()));
    }
}

impl InteractionMode for SelectController {
    fn activate(&mut self, _ctx: &mut ModeContext<'_>) {
        self.base.activate();
    }

    fn deactivate(&mut self, _ctx: &mut ModeContext<'_>) {
        self.selection.clear();
        self.base.deactivate();
    }

    /// A press the host did not resolve to any shape deselects.
    fn handle_pointer_event(&mut self, _ctx: &mut ModeContext<'_>, event: &PointerEvent) {
        if event.kind == PointerEventKind::PointerDown {
            self.clear_selection();
        }
    }
}
