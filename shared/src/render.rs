//! Applying stroke segments to a drawing surface.

use crate::{Point, SegmentKind, Side, StrokeSegment};

pub const GRID_COLOR: &str = "rgba(255,255,255,0.1)";
pub const GRID_WIDTH: f64 = 1.0;
pub const GRID_DASH: [f64; 2] = [10.0, 10.0];

/// Stroke style for one line. Caps and joins are always round.
#[derive(Clone, Debug, PartialEq)]
pub struct Pen {
    pub color: String,
    pub width: f64,
    pub dash: Option<[f64; 2]>,
}

impl Pen {
    pub fn solid(color: &str, width: f64) -> Self {
        Self {
            color: color.to_string(),
            width,
            dash: None,
        }
    }

    pub fn grid() -> Self {
        Self {
            color: GRID_COLOR.to_string(),
            width: GRID_WIDTH,
            dash: Some(GRID_DASH),
        }
    }
}

/// A pixel buffer the renderer can draw on.
pub trait Surface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    /// Erases every pixel.
    fn clear(&mut self);
    fn stroke_line(&mut self, from: Point, to: Point, pen: &Pen);
}

pub fn draw_grid<S: Surface + ?Sized>(surface: &mut S) {
    let x = surface.width() / 2.0;
    let height = surface.height();
    surface.stroke_line(Point::new(x, 0.0), Point::new(x, height), &Pen::grid());
}

/// Tracks where each side's pen currently rests.
///
/// A `start` only moves the pen. A `move` strokes from the pen to the new
/// point and leaves the pen there, so each move is committed on its own.
#[derive(Debug, Default)]
pub struct StrokeRenderer {
    cursors: [Option<Point>; 2],
}

impl StrokeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self, side: Side) -> Option<Point> {
        self.cursors[side.index()]
    }

    pub fn apply<S: Surface + ?Sized>(&mut self, surface: &mut S, segment: &StrokeSegment) {
        let point = segment.point();
        if !point.x.is_finite() || !point.y.is_finite() {
            return;
        }
        let slot = &mut self.cursors[segment.side.index()];
        match segment.kind {
            SegmentKind::Start => {
                *slot = Some(point);
            }
            SegmentKind::Move => {
                // A move without a start behaves like a fresh path origin.
                if let Some(from) = slot.replace(point) {
                    let pen = Pen::solid(&segment.color, segment.width);
                    surface.stroke_line(from, point, &pen);
                }
            }
        }
    }

    /// Wipes the surface, redraws the midpoint grid and forgets open paths.
    pub fn reset<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.cursors = [None, None];
        surface.clear();
        draw_grid(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSurface {
        lines: Vec<(Point, Point, Pen)>,
        clears: usize,
    }

    impl Surface for RecordingSurface {
        fn width(&self) -> f64 {
            800.0
        }

        fn height(&self) -> f64 {
            600.0
        }

        fn clear(&mut self) {
            self.clears += 1;
            self.lines.clear();
        }

        fn stroke_line(&mut self, from: Point, to: Point, pen: &Pen) {
            self.lines.push((from, to, pen.clone()));
        }
    }

    fn segment(side: Side, kind: SegmentKind, x: f64, y: f64) -> StrokeSegment {
        StrokeSegment {
            x,
            y,
            color: "#f43f5e".into(),
            width: 6.0,
            side,
            kind,
            id: "s".into(),
        }
    }

    #[test]
    fn test_start_leaves_no_mark() {
        let mut surface = RecordingSurface::default();
        let mut renderer = StrokeRenderer::new();
        renderer.apply(&mut surface, &segment(Side::Left, SegmentKind::Start, 10.0, 10.0));
        assert!(surface.lines.is_empty());
        assert_eq!(renderer.cursor(Side::Left), Some(Point::new(10.0, 10.0)));
    }

    #[test]
    fn test_each_move_is_stroked() {
        let mut surface = RecordingSurface::default();
        let mut renderer = StrokeRenderer::new();
        renderer.apply(&mut surface, &segment(Side::Left, SegmentKind::Start, 10.0, 10.0));
        renderer.apply(&mut surface, &segment(Side::Left, SegmentKind::Move, 20.0, 15.0));
        renderer.apply(&mut surface, &segment(Side::Left, SegmentKind::Move, 30.0, 25.0));
        assert_eq!(surface.lines.len(), 2);
        let (from, to, pen) = &surface.lines[1];
        assert_eq!(*from, Point::new(20.0, 15.0));
        assert_eq!(*to, Point::new(30.0, 25.0));
        assert_eq!(pen.width, 6.0);
        assert_eq!(pen.color, "#f43f5e");
        assert!(pen.dash.is_none());
    }

    #[test]
    fn test_sides_keep_separate_paths() {
        let mut surface = RecordingSurface::default();
        let mut renderer = StrokeRenderer::new();
        renderer.apply(&mut surface, &segment(Side::Left, SegmentKind::Start, 10.0, 10.0));
        renderer.apply(&mut surface, &segment(Side::Right, SegmentKind::Start, 700.0, 10.0));
        renderer.apply(&mut surface, &segment(Side::Left, SegmentKind::Move, 20.0, 10.0));
        renderer.apply(&mut surface, &segment(Side::Right, SegmentKind::Move, 710.0, 10.0));
        assert_eq!(surface.lines[0].0, Point::new(10.0, 10.0));
        assert_eq!(surface.lines[0].1, Point::new(20.0, 10.0));
        assert_eq!(surface.lines[1].0, Point::new(700.0, 10.0));
    }

    #[test]
    fn test_move_without_start_only_positions() {
        let mut surface = RecordingSurface::default();
        let mut renderer = StrokeRenderer::new();
        renderer.apply(&mut surface, &segment(Side::Right, SegmentKind::Move, 600.0, 10.0));
        assert!(surface.lines.is_empty());
        renderer.apply(&mut surface, &segment(Side::Right, SegmentKind::Move, 610.0, 10.0));
        assert_eq!(surface.lines.len(), 1);
    }

    #[test]
    fn test_reset_clears_and_draws_grid() {
        let mut surface = RecordingSurface::default();
        let mut renderer = StrokeRenderer::new();
        renderer.apply(&mut surface, &segment(Side::Left, SegmentKind::Start, 10.0, 10.0));
        renderer.apply(&mut surface, &segment(Side::Left, SegmentKind::Move, 20.0, 10.0));
        renderer.reset(&mut surface);
        assert_eq!(surface.clears, 1);
        assert_eq!(surface.lines.len(), 1);
        let (from, to, pen) = &surface.lines[0];
        assert_eq!(*from, Point::new(400.0, 0.0));
        assert_eq!(*to, Point::new(400.0, 600.0));
        assert_eq!(pen, &Pen::grid());
        assert_eq!(renderer.cursor(Side::Left), None);
    }
}
