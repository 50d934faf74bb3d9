// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Create mode: accumulate clicked points into a new shape.
//!
//! The first click anchors a new shape with a live preview point that
//! follows the cursor; each further click commits the preview and starts a
//! new one. A click on the first node or a double-click attempts to commit
//! the shape: if it is not valid yet the edit session stays open, otherwise
//! a `Create` event carrying the shape descriptor is emitted and the
//! working shape is torn down (the host owns the persistent copy).

use crate::models::ShapeData;
use crate::render::{Cursor, NodeId, PointerEvent, PointerEventKind, Viewport};
use crate::shapes::{DisplayState, PolygonShape};

use super::{ControllerBase, ControllerEvent, EventSink, InteractionMode, ModeContext};

/// Screen distance, in device pixels, under which a click counts as
/// hitting the first node and closes the polygon.
const CLOSE_THRESHOLD: f64 = 6.0;

/// Interaction mode that draws a new polygon or polyline.
pub struct PolygonCreateController {
    base: ControllerBase,
    is_open: bool,
    color: u32,
    parent: Option<NodeId>,
    shape: Option<PolygonShape>,
    created: u64,
}

impl PolygonCreateController {
    /// `is_open` selects polyline mode; new shapes are parented under
    /// `parent` and drawn in `color`.
    pub fn new(sink: Option<EventSink>, is_open: bool, color: u32, parent: Option<NodeId>) -> Self {
        Self {
            base: ControllerBase::new(sink),
            is_open,
            color,
            parent,
            shape: None,
            created: 0,
        }
    }

    pub fn is_activated(&self) -> bool {
        self.base.is_activated()
    }

    /// Is a multi-click gesture in progress?
    pub fn in_progress(&self) -> bool {
        self.shape.is_some()
    }

    /// The shape being drawn, if any.
    pub fn shape(&self) -> Option<&PolygonShape> {
        self.shape.as_ref()
    }

    fn next_id(&mut self) -> String {
        self.created += 1;
        if self.is_open {
            format!("line-{}", self.created)
        } else {
            format!("poly-{}", self.created)
        }
    }

    fn closes_on_first_node(&self, x: f64, y: f64, viewport: &Viewport) -> bool {
        let Some(shape) = &self.shape else {
            return false;
        };
        // Anchor, at least two committed points, plus the preview.
        if self.is_open || shape.num_points() < 4 {
            return false;
        }
        let v = shape.vertices();
        let dx = (x * viewport.scale_x).round() - (v[0] * viewport.scale_x).round();
        let dy = (y * viewport.scale_y).round() - (v[1] * viewport.scale_y).round();
        dx * dx + dy * dy <= CLOSE_THRESHOLD * CLOSE_THRESHOLD
    }

    fn on_pointer_down(&mut self, ctx: &mut ModeContext<'_>, x: f64, y: f64) {
        if self.shape.is_none() {
            let id = self.next_id();
            // Anchor plus the live preview point.
            let data = ShapeData::polygon(id, self.color, vec![x, y, x, y], self.is_open);
            let mut shape = PolygonShape::new(data, ctx.surface, self.parent);
            shape.set_display_state(DisplayState::Nodes);
            shape.draw(ctx.surface, ctx.viewport);
            self.shape = Some(shape);
            return;
        }
        if self.closes_on_first_node(x, y, ctx.viewport) {
            self.try_finalize(ctx);
            return;
        }
        if let Some(shape) = &mut self.shape {
            shape.push_node(x, y, ctx.viewport);
            shape.draw(ctx.surface, ctx.viewport);
        }
    }

    fn on_pointer_move(&mut self, ctx: &mut ModeContext<'_>, x: f64, y: f64) {
        if let Some(shape) = &mut self.shape {
            let last = shape.num_points() - 1;
            shape.set_node(last, x, y);
            shape.draw(ctx.surface, ctx.viewport);
        }
    }

    /// Commit the shape being drawn, refusing (and keeping the session
    /// open) when it is not valid.
    fn try_finalize(&mut self, ctx: &mut ModeContext<'_>) {
        let Some(mut shape) = self.shape.take() else {
            return;
        };
        let saved = shape.vertices().to_vec();
        shape.pop_node(true); // drop the live preview point
        if !shape.is_valid(ctx.viewport) {
            log::warn!(
                "create: shape {} is not valid yet, keeping the edit session open",
                shape.id()
            );
            shape.set_geometry(saved);
            shape.draw(ctx.surface, ctx.viewport);
            self.shape = Some(shape);
            return;
        }
        let data = shape.to_data();
        shape.destroy(ctx.surface);
        self.base.emit(ControllerEvent::Create(data));
    }

    fn cancel(&mut self, ctx: &mut ModeContext<'_>) {
        if let Some(mut shape) = self.shape.take() {
            log::info!("create: gesture on shape {} cancelled", shape.id());
            shape.destroy(ctx.surface);
        }
    }
}

impl InteractionMode for PolygonCreateController {
    /// While active the parent layer shows a crosshair cursor.
    fn activate(&mut self, ctx: &mut ModeContext<'_>) {
        self.base.activate();
        if let Some(parent) = self.parent {
            ctx.surface.set_interactive(parent, true, Cursor::Crosshair);
        }
    }

    fn deactivate(&mut self, ctx: &mut ModeContext<'_>) {
        self.cancel(ctx);
        if let Some(parent) = self.parent {
            ctx.surface.set_interactive(parent, false, Cursor::Default);
        }
        self.base.deactivate();
    }

    fn handle_pointer_event(&mut self, ctx: &mut ModeContext<'_>, event: &PointerEvent) {
        if !self.base.is_activated() {
            return;
        }
        match event.kind {
            PointerEventKind::PointerDown => self.on_pointer_down(ctx, event.x, event.y),
            PointerEventKind::PointerMove => self.on_pointer_move(ctx, event.x, event.y),
            PointerEventKind::DoubleClick => self.try_finalize(ctx),
            PointerEventKind::PointerUp => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::EventKind;
    use crate::render::recording::RecordingSurface;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(PointerEventKind::PointerDown, x, y)
    }

    fn mv(x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(PointerEventKind::PointerMove, x, y)
    }

    fn dblclick(x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(PointerEventKind::DoubleClick, x, y)
    }

    fn collect_created(sink: &EventSink) -> Rc<RefCell<Vec<ShapeData>>> {
        let created: Rc<RefCell<Vec<ShapeData>>> = Rc::new(RefCell::new(Vec::new()));
        let out = Rc::clone(&created);
        sink.add_listener(EventKind::Create, move |e| {
            if let ControllerEvent::Create(data) = e {
                out.borrow_mut().push(data.clone());
            }
        });
        created
    }

    fn click_path(mode: &mut PolygonCreateController, ctx: &mut ModeContext<'_>, path: &[(f64, f64)]) {
        for &(x, y) in path {
            mode.handle_pointer_event(ctx, &mv(x, y));
            mode.handle_pointer_event(ctx, &down(x, y));
        }
    }

    #[test]
    fn test_double_click_commits_polygon() {
        let mut surface = RecordingSurface::new();
        let vp = Viewport::new(100.0, 100.0);
        let sink = EventSink::new();
        let created = collect_created(&sink);
        let mut mode = PolygonCreateController::new(Some(sink), false, 0xff0000, None);

        let mut ctx = ModeContext {
            surface: &mut surface,
            viewport: &vp,
        };
        mode.activate(&mut ctx);
        mode.handle_pointer_event(&mut ctx, &down(0.1, 0.1));
        click_path(&mut mode, &mut ctx, &[(0.9, 0.1), (0.9, 0.9), (0.1, 0.9)]);
        mode.handle_pointer_event(&mut ctx, &dblclick(0.1, 0.9));

        let created = created.borrow();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].id, "poly-1");
        assert!(!created[0].geometry.is_opened);
        assert_eq!(
            created[0].geometry.vertices,
            vec![0.1, 0.1, 0.9, 0.1, 0.9, 0.9, 0.1, 0.9]
        );
        assert!(!mode.in_progress());
        // The working shape was torn down.
        assert_eq!(surface.live_count(), 0);
    }

    #[test]
    fn test_closing_click_on_first_node() {
        let mut surface = RecordingSurface::new();
        let vp = Viewport::new(100.0, 100.0);
        let sink = EventSink::new();
        let created = collect_created(&sink);
        let mut mode = PolygonCreateController::new(Some(sink), false, 0xff0000, None);

        let mut ctx = ModeContext {
            surface: &mut surface,
            viewport: &vp,
        };
        mode.activate(&mut ctx);
        mode.handle_pointer_event(&mut ctx, &down(0.1, 0.1));
        click_path(&mut mode, &mut ctx, &[(0.9, 0.1), (0.5, 0.9)]);
        // Click back on the first node (within the close threshold).
        mode.handle_pointer_event(&mut ctx, &mv(0.11, 0.1));
        mode.handle_pointer_event(&mut ctx, &down(0.11, 0.1));

        let created = created.borrow();
        assert_eq!(created.len(), 1);
        assert_eq!(
            created[0].geometry.vertices,
            vec![0.1, 0.1, 0.9, 0.1, 0.5, 0.9]
        );
    }

    #[test]
    fn test_invalid_polygon_keeps_session_open() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut surface = RecordingSurface::new();
        let vp = Viewport::new(100.0, 100.0);
        let sink = EventSink::new();
        let created = collect_created(&sink);
        let mut mode = PolygonCreateController::new(Some(sink), false, 0xff0000, None);

        let mut ctx = ModeContext {
            surface: &mut surface,
            viewport: &vp,
        };
        mode.activate(&mut ctx);
        // Bowtie: crossing edges.
        mode.handle_pointer_event(&mut ctx, &down(0.0, 0.0));
        click_path(&mut mode, &mut ctx, &[(0.9, 0.9), (0.9, 0.0), (0.0, 0.9)]);
        mode.handle_pointer_event(&mut ctx, &dblclick(0.0, 0.9));

        assert!(created.borrow().is_empty());
        assert!(mode.in_progress());
        // Preview point included, nothing was lost.
        assert_eq!(mode.shape().unwrap().num_points(), 5);
    }

    #[test]
    fn test_polyline_mode() {
        let mut surface = RecordingSurface::new();
        let vp = Viewport::new(100.0, 100.0);
        let sink = EventSink::new();
        let created = collect_created(&sink);
        let mut mode = PolygonCreateController::new(Some(sink), true, 0x00ff00, None);

        let mut ctx = ModeContext {
            surface: &mut surface,
            viewport: &vp,
        };
        mode.activate(&mut ctx);
        mode.handle_pointer_event(&mut ctx, &down(0.1, 0.1));
        click_path(&mut mode, &mut ctx, &[(0.5, 0.5)]);
        mode.handle_pointer_event(&mut ctx, &dblclick(0.5, 0.5));

        let created = created.borrow();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].id, "line-1");
        assert!(created[0].geometry.is_opened);
        assert_eq!(created[0].geometry.vertices, vec![0.1, 0.1, 0.5, 0.5]);
    }

    #[test]
    fn test_reset_cancels_gesture() {
        let mut surface = RecordingSurface::new();
        let vp = Viewport::new(100.0, 100.0);
        let sink = EventSink::new();
        let created = collect_created(&sink);
        let mut mode = PolygonCreateController::new(Some(sink), false, 0xff0000, None);

        let mut ctx = ModeContext {
            surface: &mut surface,
            viewport: &vp,
        };
        mode.activate(&mut ctx);
        mode.handle_pointer_event(&mut ctx, &down(0.1, 0.1));
        click_path(&mut mode, &mut ctx, &[(0.9, 0.1)]);
        assert!(mode.in_progress());

        mode.reset(&mut ctx);
        assert!(mode.is_activated());
        assert!(!mode.in_progress());
        assert!(created.borrow().is_empty());
        assert_eq!(surface.live_count(), 0);
    }

    #[test]
    fn test_activation_toggles_crosshair_on_parent() {
        use crate::render::Surface;

        let mut surface = RecordingSurface::new();
        let parent = surface.create_node(None);
        let vp = Viewport::new(100.0, 100.0);
        let mut mode = PolygonCreateController::new(None, false, 0xff0000, Some(parent));

        let mut ctx = ModeContext {
            surface: &mut surface,
            viewport: &vp,
        };
        mode.activate(&mut ctx);
        assert!(surface.node(parent).unwrap().interactive);
        assert_eq!(surface.node(parent).unwrap().cursor, Cursor::Crosshair);

        let mut ctx = ModeContext {
            surface: &mut surface,
            viewport: &vp,
        };
        mode.deactivate(&mut ctx);
        assert!(!surface.node(parent).unwrap().interactive);
        assert_eq!(surface.node(parent).unwrap().cursor, Cursor::Default);
    }

    #[test]
    fn test_ignores_events_while_inactive() {
        let mut surface = RecordingSurface::new();
        let vp = Viewport::new(100.0, 100.0);
        let mut mode = PolygonCreateController::new(None, false, 0xff0000, None);
        let mut ctx = ModeContext {
            surface: &mut surface,
            viewport: &vp,
        };
        mode.handle_pointer_event(&mut ctx, &down(0.1, 0.1));
        assert!(!mode.in_progress());
    }
}
