//! Shapes for custom widgets: circles, rounded rects, paths.
//!
//! A [`Painter`] wraps the frame's draw list and works in local coordinates
//! relative to an origin, usually the widget's top-left corner. Everything
//! is tessellated into triangles on the CPU; curved outlines get more
//! segments the larger they are.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use ember_core::draw::{DrawList, GlyphQuad, TextureId};
use ember_core::{Color, Rect, Vec2};
use smallvec::SmallVec;

const CURVE_STEPS: usize = 16;

type Points = SmallVec<[Vec2; 64]>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaintStyle {
    Fill,
    Stroke(f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    pub color: Color,
    pub style: PaintStyle,
}

impl Paint {
    pub fn fill(color: Color) -> Self {
        Self {
            color,
            style: PaintStyle::Fill,
        }
    }

    pub fn stroke(color: Color, width: f32) -> Self {
        Self {
            color,
            style: PaintStyle::Stroke(width),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathSegment {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo(Vec2, Vec2),
    CubicTo(Vec2, Vec2, Vec2),
    Close,
}

/// Sequence of segments, flattened to polylines when drawn.
#[derive(Clone, Debug, Default)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, p: Vec2) -> Self {
        self.segments.push(PathSegment::MoveTo(p));
        self
    }

    pub fn line_to(mut self, p: Vec2) -> Self {
        self.segments.push(PathSegment::LineTo(p));
        self
    }

    pub fn quad_to(mut self, c: Vec2, p: Vec2) -> Self {
        self.segments.push(PathSegment::QuadTo(c, p));
        self
    }

    pub fn cubic_to(mut self, c1: Vec2, c2: Vec2, p: Vec2) -> Self {
        self.segments.push(PathSegment::CubicTo(c1, c2, p));
        self
    }

    pub fn close(mut self) -> Self {
        self.segments.push(PathSegment::Close);
        self
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// One `(points, closed)` polyline per subpath.
    pub fn flatten(&self) -> Vec<(Vec<Vec2>, bool)> {
        let mut out = Vec::new();
        let mut cur: Vec<Vec2> = Vec::new();
        for seg in &self.segments {
            match *seg {
                PathSegment::MoveTo(p) => {
                    if cur.len() > 1 {
                        out.push((std::mem::take(&mut cur), false));
                    }
                    cur.clear();
                    cur.push(p);
                }
                PathSegment::LineTo(p) => cur.push(p),
                PathSegment::QuadTo(c, p) => {
                    let p0 = cur.last().copied().unwrap_or(c);
                    for i in 1..=CURVE_STEPS {
                        let t = i as f32 / CURVE_STEPS as f32;
                        let u = 1.0 - t;
                        cur.push(p0 * (u * u) + c * (2.0 * u * t) + p * (t * t));
                    }
                }
                PathSegment::CubicTo(c1, c2, p) => {
                    let p0 = cur.last().copied().unwrap_or(c1);
                    for i in 1..=CURVE_STEPS {
                        let t = i as f32 / CURVE_STEPS as f32;
                        let u = 1.0 - t;
                        cur.push(
                            p0 * (u * u * u)
                                + c1 * (3.0 * u * u * t)
                                + c2 * (3.0 * u * t * t)
                                + p * (t * t * t),
                        );
                    }
                }
                PathSegment::Close => {
                    if cur.len() > 1 {
                        out.push((std::mem::take(&mut cur), true));
                    }
                }
            }
        }
        if cur.len() > 1 {
            out.push((cur, false));
        }
        out
    }
}

pub struct Painter<'a> {
    draw: &'a mut DrawList,
    origin: Vec2,
}

impl<'a> Painter<'a> {
    pub fn new(draw: &'a mut DrawList, origin: Vec2) -> Self {
        Self { draw, origin }
    }

    /// Painter whose local (0, 0) is the top-left of `rect`, clipped to it.
    /// The clip is popped when the closure returns.
    pub fn within<R>(draw: &mut DrawList, rect: Rect, f: impl FnOnce(&mut Painter<'_>) -> R) -> R {
        draw.push_clip(rect);
        let out = f(&mut Painter::new(draw, rect.min()));
        draw.pop_clip();
        out
    }

    fn to_global(&self, p: Vec2) -> Vec2 {
        p + self.origin
    }

    fn global_rect(&self, r: Rect) -> Rect {
        r.translate(self.origin)
    }

    pub fn draw_rect(&mut self, rect: Rect, color: Color, radius: f32) {
        if radius <= 0.0 {
            let r = self.global_rect(rect);
            self.draw.add_rect(r, color);
        } else {
            let pts = self.rounded_rect_points(rect, radius);
            self.draw.add_convex(&pts, color);
        }
    }

    pub fn draw_rect_stroke(&mut self, rect: Rect, color: Color, radius: f32, width: f32) {
        if width <= 0.0 || rect.is_empty() {
            return;
        }
        if radius <= 0.0 {
            let r = self.global_rect(rect);
            let w = width.min(r.w * 0.5).min(r.h * 0.5);
            self.draw.add_rect(Rect::new(r.x, r.y, r.w, w), color);
            self.draw.add_rect(Rect::new(r.x, r.bottom() - w, r.w, w), color);
            self.draw.add_rect(Rect::new(r.x, r.y + w, w, r.h - 2.0 * w), color);
            self.draw
                .add_rect(Rect::new(r.right() - w, r.y + w, w, r.h - 2.0 * w), color);
        } else {
            let pts = self.rounded_rect_points(rect, radius);
            self.stroke_polyline(&pts, true, width, color);
        }
    }

    pub fn draw_ellipse(&mut self, center: Vec2, rx: f32, ry: f32, color: Color) {
        let pts = self.ellipse_points(center, rx.max(0.0), ry.max(0.0));
        self.draw.add_convex(&pts, color);
    }

    pub fn draw_ellipse_stroke(&mut self, center: Vec2, rx: f32, ry: f32, color: Color, width: f32) {
        let pts = self.ellipse_points(center, rx.max(0.0), ry.max(0.0));
        self.stroke_polyline(&pts, true, width.max(0.0), color);
    }

    pub fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.draw_ellipse(center, radius, radius, color);
    }

    pub fn draw_circle_stroke(&mut self, center: Vec2, radius: f32, color: Color, width: f32) {
        self.draw_ellipse_stroke(center, radius, radius, color, width);
    }

    pub fn draw_polyline(&mut self, points: &[Vec2], closed: bool, color: Color, width: f32) {
        let pts: Points = points.iter().map(|p| self.to_global(*p)).collect();
        self.stroke_polyline(&pts, closed, width, color);
    }

    /// Fill a convex polygon given in winding order.
    pub fn fill_convex(&mut self, points: &[Vec2], color: Color) {
        let pts: Points = points.iter().map(|p| self.to_global(*p)).collect();
        self.draw.add_convex(&pts, color);
    }

    /// Fill assumes every closed subpath is convex.
    pub fn draw_path(&mut self, path: &Path, paint: Paint) {
        for (pts, closed) in path.flatten() {
            match paint.style {
                PaintStyle::Fill if closed => self.fill_convex(&pts, paint.color),
                PaintStyle::Fill => {}
                PaintStyle::Stroke(w) => self.draw_polyline(&pts, closed, paint.color, w),
            }
        }
    }

    /// Pre-shaped glyph quads in local coordinates.
    pub fn draw_glyphs(&mut self, texture: TextureId, glyphs: &[GlyphQuad], color: Color) {
        let placed: SmallVec<[GlyphQuad; 32]> = glyphs
            .iter()
            .map(|g| GlyphQuad {
                rect: self.global_rect(g.rect),
                ..*g
            })
            .collect();
        self.draw.add_glyphs(texture, &placed, color);
    }

    fn stroke_polyline(&mut self, pts: &[Vec2], closed: bool, width: f32, color: Color) {
        if pts.len() < 2 {
            return;
        }
        for pair in pts.windows(2) {
            self.draw.add_line(pair[0], pair[1], width, color);
        }
        if closed && pts.len() > 2 {
            self.draw.add_line(pts[pts.len() - 1], pts[0], width, color);
        }
    }

    fn ellipse_points(&self, center: Vec2, rx: f32, ry: f32) -> Points {
        let c = self.to_global(center);
        let n = arc_segments(rx.max(ry), TAU);
        (0..n)
            .map(|i| {
                let a = i as f32 / n as f32 * TAU;
                Vec2::new(c.x + rx * a.cos(), c.y + ry * a.sin())
            })
            .collect()
    }

    fn rounded_rect_points(&self, rect: Rect, radius: f32) -> Points {
        let r = self.global_rect(rect);
        let rad = radius.min(r.w * 0.5).min(r.h * 0.5).max(0.0);
        // Corner centres clockwise from top-left, each with its start angle.
        let corners = [
            (Vec2::new(r.x + rad, r.y + rad), PI),
            (Vec2::new(r.right() - rad, r.y + rad), PI + FRAC_PI_2),
            (Vec2::new(r.right() - rad, r.bottom() - rad), 0.0),
            (Vec2::new(r.x + rad, r.bottom() - rad), FRAC_PI_2),
        ];
        let n = arc_segments(rad, FRAC_PI_2);
        let mut pts = Points::new();
        for (c, start) in corners {
            for i in 0..=n {
                let a = start + i as f32 / n as f32 * FRAC_PI_2;
                pts.push(Vec2::new(c.x + rad * a.cos(), c.y + rad * a.sin()));
            }
        }
        pts
    }
}

/// Segments for an arc of `sweep` radians at radius `r`.
fn arc_segments(r: f32, sweep: f32) -> usize {
    let full = (r.max(0.0).sqrt() * 6.0).ceil().clamp(12.0, 96.0);
    ((full * sweep / TAU).ceil() as usize).max(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> DrawList {
        DrawList::new(Rect::new(0.0, 0.0, 400.0, 400.0))
    }

    #[test]
    fn local_coordinates_are_offset_by_origin() {
        let mut dl = list();
        Painter::new(&mut dl, Vec2::new(100.0, 50.0)).draw_rect(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Color::WHITE,
            0.0,
        );
        assert_eq!(dl.vertices()[0].pos, [100.0, 50.0]);
    }

    #[test]
    fn circle_is_one_fan() {
        let mut dl = list();
        Painter::new(&mut dl, Vec2::ZERO).draw_circle(Vec2::new(50.0, 50.0), 16.0, Color::WHITE);
        let n = dl.vertices().len();
        assert_eq!(n, arc_segments(16.0, TAU));
        assert_eq!(dl.indices().len(), 3 * (n - 2));
        let data = dl.finalize();
        assert_eq!(data.commands.len(), 1);
    }

    #[test]
    fn zero_size_shapes_draw_nothing() {
        let mut dl = list();
        let mut p = Painter::new(&mut dl, Vec2::ZERO);
        p.draw_circle(Vec2::new(10.0, 10.0), 0.0, Color::WHITE);
        p.draw_rect(Rect::new(0.0, 0.0, 0.0, 5.0), Color::WHITE, 3.0);
        p.draw_rect_stroke(Rect::new(0.0, 0.0, 5.0, 5.0), Color::WHITE, 0.0, 0.0);
        p.draw_polyline(&[Vec2::new(1.0, 1.0)], false, Color::WHITE, 1.0);
        assert!(dl.vertices().is_empty());
    }

    #[test]
    fn rounded_rect_stays_inside_bounds() {
        let mut dl = list();
        let rect = Rect::new(10.0, 10.0, 100.0, 40.0);
        Painter::new(&mut dl, Vec2::ZERO).draw_rect(rect, Color::BLACK, 50.0);
        assert!(!dl.vertices().is_empty());
        for v in dl.vertices() {
            assert!(v.pos[0] >= 10.0 - 1e-3 && v.pos[0] <= 110.0 + 1e-3);
            assert!(v.pos[1] >= 10.0 - 1e-3 && v.pos[1] <= 50.0 + 1e-3);
        }
    }

    #[test]
    fn path_flattening() {
        let path = Path::new()
            .move_to(Vec2::new(0.0, 0.0))
            .line_to(Vec2::new(10.0, 0.0))
            .quad_to(Vec2::new(10.0, 10.0), Vec2::new(0.0, 10.0))
            .close()
            .move_to(Vec2::new(50.0, 50.0))
            .line_to(Vec2::new(60.0, 60.0));
        let polys = path.flatten();
        assert_eq!(polys.len(), 2);
        assert!(polys[0].1);
        assert_eq!(polys[0].0.len(), 2 + CURVE_STEPS);
        assert_eq!(polys[0].0.last(), Some(&Vec2::new(0.0, 10.0)));
        assert!(!polys[1].1);
    }

    #[test]
    fn within_clips_and_restores() {
        let mut dl = list();
        let area = Rect::new(20.0, 20.0, 50.0, 50.0);
        Painter::within(&mut dl, area, |p| {
            p.draw_path(
                &Path::new()
                    .move_to(Vec2::new(0.0, 0.0))
                    .line_to(Vec2::new(30.0, 0.0))
                    .line_to(Vec2::new(0.0, 30.0))
                    .close(),
                Paint::fill(Color::WHITE),
            );
        });
        assert_eq!(dl.clip(), dl.viewport());
        let data = dl.finalize();
        let summary: Vec<String> = data
            .commands
            .iter()
            .map(|c| format!("{:?} {}", c.clip, c.elem_count))
            .collect();
        insta::assert_snapshot!(summary.join("\n"), @"Rect { x: 20.0, y: 20.0, w: 50.0, h: 50.0 } 3");
    }
}
