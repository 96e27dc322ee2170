//! Pointer-driven drawing state machine.
//!
//! Pointer positions arrive already translated to canvas-local coordinates.
//! The machine decides whether each one becomes a stroke segment for the
//! participant's side.

use tracing::debug;
use uuid::Uuid;

use crate::boundary::Boundary;
use crate::{Point, SegmentKind, Side, StrokeSegment};

pub const MIN_BRUSH_WIDTH: f64 = 1.0;
pub const MAX_BRUSH_WIDTH: f64 = 20.0;
pub const DEFAULT_BRUSH_WIDTH: f64 = 4.0;
const FALLBACK_COLOR: &str = "#ffffff";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawPhase {
    Idle,
    Drawing,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Brush {
    pub color: String,
    pub width: f64,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: FALLBACK_COLOR.to_string(),
            width: DEFAULT_BRUSH_WIDTH,
        }
    }
}

pub fn sanitize_width(width: f64) -> f64 {
    let width = if width.is_finite() {
        width
    } else {
        DEFAULT_BRUSH_WIDTH
    };
    width.max(MIN_BRUSH_WIDTH).min(MAX_BRUSH_WIDTH)
}

pub fn sanitize_color(mut color: String) -> String {
    if color.is_empty() {
        return FALLBACK_COLOR.to_string();
    }
    if let Some((end, _)) = color.char_indices().nth(32) {
        color.truncate(end);
    }
    color
}

fn make_id() -> String {
    Uuid::new_v4().simple().to_string()
}

pub struct DrawingMachine {
    side: Option<Side>,
    phase: DrawPhase,
    brush: Brush,
    boundary: Boundary,
}

impl Default for DrawingMachine {
    fn default() -> Self {
        Self::new(Boundary::default())
    }
}

impl DrawingMachine {
    pub fn new(boundary: Boundary) -> Self {
        Self {
            side: None,
            phase: DrawPhase::Idle,
            brush: Brush::default(),
            boundary,
        }
    }

    pub fn side(&self) -> Option<Side> {
        self.side
    }

    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    /// Joins a side and switches the brush to that side's default color.
    pub fn select_side(&mut self, side: Side) {
        self.side = Some(side);
        self.phase = DrawPhase::Idle;
        self.brush.color = side.default_color().to_string();
    }

    /// Leaves the current side; a new `select_side` is needed before drawing.
    pub fn reselect(&mut self) {
        self.side = None;
        self.phase = DrawPhase::Idle;
    }

    pub fn set_color(&mut self, color: String) {
        self.brush.color = sanitize_color(color);
    }

    pub fn set_width(&mut self, width: f64) {
        self.brush.width = sanitize_width(width);
    }

    pub fn pointer_down(&mut self, point: Point, canvas_width: f64) -> Option<StrokeSegment> {
        let side = self.side?;
        if !self.boundary.permits(side, point.x, canvas_width) {
            debug!(?side, x = point.x, "pointer down outside territory");
            return None;
        }
        self.phase = DrawPhase::Drawing;
        Some(self.segment(side, SegmentKind::Start, point))
    }

    /// Extends the current stroke. A position across the boundary is dropped
    /// without leaving the `Drawing` phase.
    pub fn pointer_move(&mut self, point: Point, canvas_width: f64) -> Option<StrokeSegment> {
        if self.phase != DrawPhase::Drawing {
            return None;
        }
        let side = self.side?;
        if !self.boundary.permits(side, point.x, canvas_width) {
            debug!(?side, x = point.x, "move dropped at boundary");
            return None;
        }
        Some(self.segment(side, SegmentKind::Move, point))
    }

    pub fn pointer_up(&mut self) {
        self.phase = DrawPhase::Idle;
    }

    pub fn pointer_leave(&mut self) {
        self.phase = DrawPhase::Idle;
    }

    fn segment(&self, side: Side, kind: SegmentKind, point: Point) -> StrokeSegment {
        StrokeSegment {
            x: point.x,
            y: point.y,
            color: self.brush.color.clone(),
            width: self.brush.width,
            side,
            kind,
            id: make_id(),
        }
    }
}
