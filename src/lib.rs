// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! polyedit - interactive polygon editing engine for image annotation
//! tools.
//!
//! The crate owns the geometry and interaction core of a vector-shape
//! annotation editor: flat-vertex polygon and multi-polygon shapes, the
//! protocol keeping their interactive node/midnode handles in sync with
//! geometry edits, a self-intersection validity check, and the
//! interaction-mode controllers that turn raw pointer events into geometry
//! operations and domain events.
//!
//! Rendering is external: shapes issue declarative draw calls against the
//! [`render::Surface`] trait, and hosts receive domain events through a
//! [`controller::EventSink`]. Everything runs synchronously on the caller's
//! thread in direct response to pointer events.

pub mod controller;
pub mod models;
pub mod render;
pub mod shapes;
pub mod util;

pub use controller::{
    ControllerBase, ControllerEvent, EventKind, EventSink, InteractionMode, ModeContext,
    PolygonCreateController, PolygonEditController, SelectController,
};
pub use models::{Geometry, GeometryData, GeometryError, ShapeData};
pub use render::{
    Cursor, HitArea, NodeEvent, NodeId, PointerEvent, PointerEventKind, Surface, Viewport,
};
pub use shapes::{DisplayState, MultiPolygonShape, PolygonShape};
