// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Edit mode: reshape an existing polygon through its handles.
//!
//! On activation the target shape switches to the `Nodes` display state
//! and gets node/midnode pointer listeners bound. The listeners only
//! record which handle was hit; the geometry work happens in
//! `handle_pointer_event`, so a mutation and its redraw stay atomic from
//! the host's perspective. Pressing a node starts a vertex drag, pressing
//! a midnode inserts the edge midpoint as a new vertex, double-clicking a
//! node deletes it unless the shape would become degenerate.

use std::cell::RefCell;
use std::rc::Rc;

use crate::render::{PointerEvent, PointerEventKind};
use crate::shapes::{DisplayState, PolygonShape};

use super::{ControllerBase, ControllerEvent, EventSink, InteractionMode, ModeContext};

/// Which handle a pointer press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HandleHit {
    Node(usize),
    MidNode(usize),
}

/// Interaction mode that edits one polygon's vertices.
pub struct PolygonEditController {
    base: ControllerBase,
    shape: Rc<RefCell<PolygonShape>>,
    hit: Rc<RefCell<Option<HandleHit>>>,
    drag: Option<usize>,
    moved: bool,
}

impl PolygonEditController {
    pub fn new(sink: Option<EventSink>, shape: Rc<RefCell<PolygonShape>>) -> Self {
        Self {
            base: ControllerBase::new(sink),
            shape,
            hit: Rc::new(RefCell::new(None)),
            drag: None,
            moved: false,
        }
    }

    pub fn is_activated(&self) -> bool {
        self.base.is_activated()
    }

    /// Index of the vertex currently being dragged, if any.
    pub fn dragged_node(&self) -> Option<usize> {
        self.drag
    }

    fn emit_update(&self) {
        let id = self.shape.borrow().id().to_string();
        self.base.emit(ControllerEvent::Update(vec![id]));
    }

    fn remove_hit_node(&mut self, ctx: &mut ModeContext<'_>, idx: usize) {
        let mut shape = self.shape.borrow_mut();
        let min_points = if shape.is_open() { 2 } else { 3 };
        if shape.num_points() <= min_points {
            log::warn!(
                "edit: refusing to remove node {} from shape {}, {} points is the minimum",
                idx,
                shape.id(),
                min_points
            );
            return;
        }
        shape.remove_node(idx);
        shape.draw(ctx.surface, ctx.viewport);
        drop(shape);
        self.emit_update();
    }
}

impl InteractionMode for PolygonEditController {
    fn activate(&mut self, ctx: &mut ModeContext<'_>) {
        self.base.activate();
        let mut shape = self.shape.borrow_mut();
        shape.set_display_state(DisplayState::Nodes);
        for kind in [PointerEventKind::PointerDown, PointerEventKind::DoubleClick] {
            let hit = Rc::clone(&self.hit);
            shape.add_node_listener(
                ctx.surface,
                kind,
                Rc::new(move |evt| {
                    *hit.borrow_mut() = Some(HandleHit::Node(evt.node_idx));
                }),
            );
        }
        let hit = Rc::clone(&self.hit);
        shape.add_midnode_listener(
            ctx.surface,
            PointerEventKind::PointerDown,
            Rc::new(move |evt| {
                *hit.borrow_mut() = Some(HandleHit::MidNode(evt.node_idx));
            }),
        );
        shape.draw(ctx.surface, ctx.viewport);
    }

    fn deactivate(&mut self, ctx: &mut ModeContext<'_>) {
        self.base.deactivate();
        self.drag = None;
        self.moved = false;
        self.hit.borrow_mut().take();
        let mut shape = self.shape.borrow_mut();
        shape.remove_node_listeners(ctx.surface);
        shape.set_display_state(DisplayState::Contour);
        shape.draw(ctx.surface, ctx.viewport);
    }

    fn handle_pointer_event(&mut self, ctx: &mut ModeContext<'_>, event: &PointerEvent) {
        if !self.base.is_activated() {
            return;
        }
        match event.kind {
            PointerEventKind::PointerDown => {
                let hit = self.hit.borrow_mut().take();
                match hit {
                    Some(HandleHit::Node(idx)) => {
                        self.drag = Some(idx);
                        self.moved = false;
                    }
                    Some(HandleHit::MidNode(idx)) => {
                        let mut shape = self.shape.borrow_mut();
                        shape.insert_mid_node(idx);
                        shape.draw(ctx.surface, ctx.viewport);
                        drop(shape);
                        self.emit_update();
                    }
                    None => {}
                }
            }
            PointerEventKind::PointerMove => {
                if let Some(idx) = self.drag {
                    let mut shape = self.shape.borrow_mut();
                    shape.set_node(idx, event.x, event.y);
                    shape.draw(ctx.surface, ctx.viewport);
                    self.moved = true;
                }
            }
            PointerEventKind::PointerUp => {
                if self.drag.take().is_some() && self.moved {
                    self.moved = false;
                    self.emit_update();
                }
            }
            PointerEventKind::DoubleClick => {
                let hit = self.hit.borrow_mut().take();
                if let Some(HandleHit::Node(idx)) = hit {
                    self.remove_hit_node(ctx, idx);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::EventKind;
    use crate::models::ShapeData;
    use crate::render::recording::RecordingSurface;
    use crate::render::{Cursor, Viewport};

    struct Fixture {
        surface: RecordingSurface,
        viewport: Viewport,
        shape: Rc<RefCell<PolygonShape>>,
        mode: PolygonEditController,
        updates: Rc<RefCell<Vec<Vec<String>>>>,
    }

    fn fixture() -> Fixture {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut surface = RecordingSurface::new();
        let data = ShapeData::polygon(
            "s1",
            0xff0000,
            vec![0.1, 0.1, 0.9, 0.1, 0.9, 0.9, 0.1, 0.9],
            false,
        );
        let shape = Rc::new(RefCell::new(PolygonShape::new(data, &mut surface, None)));
        let sink = EventSink::new();
        let updates: Rc<RefCell<Vec<Vec<String>>>> = Rc::new(RefCell::new(Vec::new()));
        let out = Rc::clone(&updates);
        sink.add_listener(EventKind::Update, move |e| {
            if let ControllerEvent::Update(ids) = e {
                out.borrow_mut().push(ids.clone());
            }
        });
        let mut mode = PolygonEditController::new(Some(sink), Rc::clone(&shape));
        let viewport = Viewport::new(100.0, 100.0);
        let mut ctx = ModeContext {
            surface: &mut surface,
            viewport: &viewport,
        };
        mode.activate(&mut ctx);
        Fixture {
            surface,
            viewport,
            shape,
            mode,
            updates,
        }
    }

    fn ev(kind: PointerEventKind, x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(kind, x, y)
    }

    #[test]
    fn test_activate_binds_handle_listeners() {
        let f = fixture();
        let shape = f.shape.borrow();
        assert_eq!(shape.display_state(), DisplayState::Nodes);
        for &node in shape.nodes() {
            // PointerDown plus DoubleClick.
            assert_eq!(f.surface.listener_count(node), 2);
            assert_eq!(f.surface.node(node).unwrap().cursor, Cursor::Grab);
        }
        for &node in shape.midnodes() {
            assert_eq!(f.surface.listener_count(node), 1);
        }
    }

    #[test]
    fn test_midnode_press_inserts_vertex() {
        let mut f = fixture();
        let midnode = f.shape.borrow().midnodes()[0];
        f.surface
            .fire(midnode, ev(PointerEventKind::PointerDown, 0.5, 0.1));
        let mut ctx = ModeContext {
            surface: &mut f.surface,
            viewport: &f.viewport,
        };
        f.mode
            .handle_pointer_event(&mut ctx, &ev(PointerEventKind::PointerDown, 0.5, 0.1));

        let shape = f.shape.borrow();
        assert_eq!(shape.num_points(), 5);
        assert_eq!(&shape.vertices()[2..4], &[0.5, 0.1]);
        // Handle arenas were resynchronized before the redraw returned.
        assert_eq!(shape.nodes().len(), 5);
        assert_eq!(shape.midnodes().len(), 5);
        assert_eq!(*f.updates.borrow(), vec![vec!["s1".to_string()]]);
    }

    #[test]
    fn test_node_drag_moves_vertex() {
        let mut f = fixture();
        let node = f.shape.borrow().nodes()[1];
        f.surface
            .fire(node, ev(PointerEventKind::PointerDown, 0.9, 0.1));
        let mut ctx = ModeContext {
            surface: &mut f.surface,
            viewport: &f.viewport,
        };
        f.mode
            .handle_pointer_event(&mut ctx, &ev(PointerEventKind::PointerDown, 0.9, 0.1));
        assert_eq!(f.mode.dragged_node(), Some(1));

        f.mode
            .handle_pointer_event(&mut ctx, &ev(PointerEventKind::PointerMove, 0.7, 0.2));
        f.mode
            .handle_pointer_event(&mut ctx, &ev(PointerEventKind::PointerUp, 0.7, 0.2));

        assert_eq!(f.mode.dragged_node(), None);
        assert_eq!(&f.shape.borrow().vertices()[2..4], &[0.7, 0.2]);
        assert_eq!(f.updates.borrow().len(), 1);
    }

    #[test]
    fn test_click_without_move_emits_nothing() {
        let mut f = fixture();
        let node = f.shape.borrow().nodes()[0];
        f.surface
            .fire(node, ev(PointerEventKind::PointerDown, 0.1, 0.1));
        let mut ctx = ModeContext {
            surface: &mut f.surface,
            viewport: &f.viewport,
        };
        f.mode
            .handle_pointer_event(&mut ctx, &ev(PointerEventKind::PointerDown, 0.1, 0.1));
        f.mode
            .handle_pointer_event(&mut ctx, &ev(PointerEventKind::PointerUp, 0.1, 0.1));
        assert!(f.updates.borrow().is_empty());
    }

    #[test]
    fn test_double_click_removes_node_until_minimum() {
        let mut f = fixture();
        let node = f.shape.borrow().nodes()[0];
        f.surface
            .fire(node, ev(PointerEventKind::DoubleClick, 0.1, 0.1));
        let mut ctx = ModeContext {
            surface: &mut f.surface,
            viewport: &f.viewport,
        };
        f.mode
            .handle_pointer_event(&mut ctx, &ev(PointerEventKind::DoubleClick, 0.1, 0.1));
        assert_eq!(f.shape.borrow().num_points(), 3);
        assert_eq!(f.updates.borrow().len(), 1);

        // A closed polygon keeps at least three points.
        let node = f.shape.borrow().nodes()[0];
        f.surface
            .fire(node, ev(PointerEventKind::DoubleClick, 0.9, 0.1));
        let mut ctx = ModeContext {
            surface: &mut f.surface,
            viewport: &f.viewport,
        };
        f.mode
            .handle_pointer_event(&mut ctx, &ev(PointerEventKind::DoubleClick, 0.9, 0.1));
        assert_eq!(f.shape.borrow().num_points(), 3);
        assert_eq!(f.updates.borrow().len(), 1);
    }

    #[test]
    fn test_deactivate_unbinds_and_drops_to_contour() {
        let mut f = fixture();
        let mut ctx = ModeContext {
            surface: &mut f.surface,
            viewport: &f.viewport,
        };
        f.mode.deactivate(&mut ctx);

        let shape = f.shape.borrow();
        assert_eq!(shape.display_state(), DisplayState::Contour);
        for &node in shape.nodes() {
            assert_eq!(f.surface.listener_count(node), 0);
        }
        assert!(!f.mode.is_activated());
    }

    #[test]
    fn test_inactive_mode_ignores_events() {
        let mut f = fixture();
        let mut ctx = ModeContext {
            surface: &mut f.surface,
            viewport: &f.viewport,
        };
        f.mode.deactivate(&mut ctx);

        let node = f.shape.borrow().nodes()[0];
        f.surface
            .fire(node, ev(PointerEventKind::PointerDown, 0.1, 0.1));
        let mut ctx = ModeContext {
            surface: &mut f.surface,
            viewport: &f.viewport,
        };
        f.mode
            .handle_pointer_event(&mut ctx, &ev(PointerEventKind::PointerDown, 0.1, 0.1));
        assert_eq!(f.mode.dragged_node(), None);
    }
}
