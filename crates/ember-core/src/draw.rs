//! # Draw lists
//!
//! Widgets emit thousands of tiny primitives per frame. [`DrawList`] packs them
//! into one vertex buffer, one index buffer and a short list of
//! [`DrawCmd`]s, one per run of primitives sharing a texture and a clip
//! rectangle. The render backend issues one draw call per command.
//!
//! Commands are opened lazily: the first primitive after a texture or clip
//! change opens a new command; the change itself only closes the open one.
//! If nothing was drawn between a change and its reversal, the trailing
//! command is reopened instead, so a round trip that draws nothing does not
//! split a batch.
//!
//! Index values are relative to their command's `vtx_offset`. That is what
//! lets [`DrawList::insert_at_front`] prepend geometry by renumbering command
//! offsets only.
//!
//! ```rust
//! use ember_core::{Color, Rect};
//! use ember_core::draw::DrawList;
//!
//! let mut dl = DrawList::new(Rect::new(0.0, 0.0, 640.0, 480.0));
//! for i in 0..10 {
//!     dl.add_rect(Rect::new(0.0, i as f32 * 20.0, 100.0, 18.0), Color::WHITE);
//! }
//! let data = dl.finalize();
//! assert_eq!(data.commands.len(), 1);
//! assert_eq!(data.commands[0].elem_count, 60);
//! ```

use bytemuck::{Pod, Zeroable};
use smallvec::SmallVec;

use crate::{Color, Rect, Vec2};

/// Backend-defined texture handle. `TextureId::DEFAULT` is a white texel
/// used for solid fills.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

impl TextureId {
    pub const DEFAULT: TextureId = TextureId(0);
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
    pub color: [u8; 4],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCmd {
    pub clip: Rect,
    pub texture: TextureId,
    pub vtx_offset: u32,
    pub idx_offset: u32,
    pub elem_count: u32,
}

/// One textured quad of a glyph run, in screen space.
#[derive(Clone, Copy, Debug)]
pub struct GlyphQuad {
    pub rect: Rect,
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
}

/// Finalized output handed to the render backend.
#[derive(Clone, Copy, Debug)]
pub struct DrawData<'a> {
    pub viewport: Rect,
    pub vertices: &'a [Vertex],
    pub indices: &'a [u32],
    pub commands: &'a [DrawCmd],
}

impl DrawData<'_> {
    pub fn stats(&self) -> DrawStats {
        DrawStats {
            commands: self.commands.len(),
            vertices: self.vertices.len(),
            indices: self.indices.len(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub commands: usize,
    pub vertices: usize,
    pub indices: usize,
}

/// Free list of cleared vectors.
pub struct Pool<T> {
    free: Vec<Vec<T>>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self { free: Vec::new() }
    }
}

impl<T> Pool<T> {
    pub fn acquire(&mut self) -> Vec<T> {
        self.free.pop().unwrap_or_default()
    }

    pub fn release(&mut self, mut v: Vec<T>) {
        v.clear();
        if v.capacity() > 0 {
            self.free.push(v);
        }
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }
}

/// Recycled draw buffers, so steady-state frames do not allocate.
#[derive(Default)]
pub struct BufferPool {
    pub vertices: Pool<Vertex>,
    pub indices: Pool<u32>,
    pub commands: Pool<DrawCmd>,
}

pub struct DrawList {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    commands: Vec<DrawCmd>,
    // The last command accepts primitives.
    open: bool,
    viewport: Rect,
    clip_stack: SmallVec<[Rect; 8]>,
    texture: TextureId,
    pool: BufferPool,
}

impl DrawList {
    pub fn new(viewport: Rect) -> Self {
        Self::from_parts(viewport, Vec::new(), Vec::new(), Vec::new())
    }

    /// Build a list on buffers taken from `pool`.
    pub fn with_pool(viewport: Rect, pool: &mut BufferPool) -> Self {
        Self::from_parts(
            viewport,
            pool.vertices.acquire(),
            pool.indices.acquire(),
            pool.commands.acquire(),
        )
    }

    fn from_parts(
        viewport: Rect,
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        commands: Vec<DrawCmd>,
    ) -> Self {
        let mut clip_stack = SmallVec::new();
        clip_stack.push(viewport);
        Self {
            vertices,
            indices,
            commands,
            open: false,
            viewport,
            clip_stack,
            texture: TextureId::DEFAULT,
            pool: BufferPool::default(),
        }
    }

    /// Hand the buffers back to `pool`.
    pub fn release_into(self, pool: &mut BufferPool) {
        pool.vertices.release(self.vertices);
        pool.indices.release(self.indices);
        pool.commands.release(self.commands);
    }

    /// Drop all geometry. Capacity is kept.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.commands.clear();
        self.open = false;
        self.clip_stack.clear();
        self.clip_stack.push(self.viewport);
        self.texture = TextureId::DEFAULT;
    }

    /// Takes effect from the next `clear()`.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn clip(&self) -> Rect {
        self.clip_stack.last().copied().unwrap_or(self.viewport)
    }

    pub fn texture(&self) -> TextureId {
        self.texture
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Commands so far. The last one's `elem_count` is only final after
    /// [`DrawList::finalize`].
    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    pub fn stats(&self) -> DrawStats {
        DrawStats {
            commands: self.commands.len(),
            vertices: self.vertices.len(),
            indices: self.indices.len(),
        }
    }

    pub fn push_clip(&mut self, rect: Rect) {
        let next = self.clip().intersect(&rect);
        if next != self.clip() {
            self.close_cmd();
        }
        self.clip_stack.push(next);
    }

    pub fn pop_clip(&mut self) {
        if self.clip_stack.len() <= 1 {
            log::warn!("DrawList::pop_clip with empty stack");
            return;
        }
        let prev = self.clip();
        self.clip_stack.pop();
        if prev != self.clip() {
            self.close_cmd();
        }
    }

    pub fn set_texture(&mut self, texture: TextureId) {
        if texture != self.texture {
            self.close_cmd();
            self.texture = texture;
        }
    }

    pub fn add_rect(&mut self, rect: Rect, color: Color) {
        self.add_rect_uv(rect, [0.0, 0.0], [0.0, 0.0], color);
    }

    pub fn add_rect_uv(&mut self, rect: Rect, uv_min: [f32; 2], uv_max: [f32; 2], color: Color) {
        if rect.is_empty() || color.is_invisible() {
            return;
        }
        let c = color.to_rgba8();
        let base = self.reserve();
        self.vertices.extend_from_slice(&[
            Vertex {
                pos: [rect.x, rect.y],
                uv: uv_min,
                color: c,
            },
            Vertex {
                pos: [rect.right(), rect.y],
                uv: [uv_max[0], uv_min[1]],
                color: c,
            },
            Vertex {
                pos: [rect.right(), rect.bottom()],
                uv: uv_max,
                color: c,
            },
            Vertex {
                pos: [rect.x, rect.bottom()],
                uv: [uv_min[0], uv_max[1]],
                color: c,
            },
        ]);
        self.push_quad_indices(base);
    }

    /// Arbitrary quad, corners in winding order.
    pub fn add_quad(&mut self, corners: [Vec2; 4], color: Color) {
        if color.is_invisible() || quad_area(&corners) <= f32::EPSILON {
            return;
        }
        let c = color.to_rgba8();
        let base = self.reserve();
        self.vertices.extend(corners.iter().map(|p| Vertex {
            pos: [p.x, p.y],
            uv: [0.0, 0.0],
            color: c,
        }));
        self.push_quad_indices(base);
    }

    pub fn add_line(&mut self, a: Vec2, b: Vec2, thickness: f32, color: Color) {
        let d = b - a;
        let len = d.length();
        if len <= f32::EPSILON || thickness <= 0.0 || color.is_invisible() {
            return;
        }
        let n = Vec2::new(-d.y / len, d.x / len) * (thickness * 0.5);
        self.add_quad([a + n, b + n, b - n, a - n], color);
    }

    pub fn add_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color) {
        if color.is_invisible() || triangle_area(a, b, c) <= f32::EPSILON {
            return;
        }
        let rgba = color.to_rgba8();
        let base = self.reserve();
        for p in [a, b, c] {
            self.vertices.push(Vertex {
                pos: [p.x, p.y],
                uv: [0.0, 0.0],
                color: rgba,
            });
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    /// Convex polygon as a triangle fan sharing its vertices. Points must
    /// be in winding order; concave input draws garbage.
    pub fn add_convex(&mut self, points: &[Vec2], color: Color) {
        if points.len() < 3 || color.is_invisible() || polygon_area(points) <= f32::EPSILON {
            return;
        }
        let rgba = color.to_rgba8();
        let base = self.reserve();
        self.vertices.extend(points.iter().map(|p| Vertex {
            pos: [p.x, p.y],
            uv: [0.0, 0.0],
            color: rgba,
        }));
        for i in 1..points.len() as u32 - 1 {
            self.indices.extend_from_slice(&[base, base + i, base + i + 1]);
        }
    }

    /// Glyph quads sampled from `texture` (usually the backend's font atlas).
    /// The previously selected texture is restored afterwards.
    pub fn add_glyphs(&mut self, texture: TextureId, glyphs: &[GlyphQuad], color: Color) {
        if glyphs.is_empty() || color.is_invisible() {
            return;
        }
        let prev = self.texture;
        self.set_texture(texture);
        for g in glyphs {
            self.add_rect_uv(g.rect, g.uv_min, g.uv_max, color);
        }
        self.set_texture(prev);
    }

    /// Draw something *behind* everything recorded so far.
    ///
    /// `build` records into a pooled scratch list clipped to the current
    /// clip rect. Its geometry is prepended and every existing command's
    /// offsets are shifted by the inserted vertex/index counts; existing
    /// index values are left alone since they are command-relative.
    pub fn insert_at_front(&mut self, build: impl FnOnce(&mut DrawList)) {
        let mut scratch = DrawList::with_pool(self.clip(), &mut self.pool);
        build(&mut scratch);
        scratch.close_cmd();
        scratch.commands.retain(|c| c.elem_count > 0);

        if !scratch.commands.is_empty() {
            let nv = scratch.vertices.len() as u32;
            let ni = scratch.indices.len() as u32;
            for c in &mut self.commands {
                c.vtx_offset += nv;
                c.idx_offset += ni;
            }
            self.vertices.splice(0..0, scratch.vertices.drain(..));
            self.indices.splice(0..0, scratch.indices.drain(..));
            self.commands.splice(0..0, scratch.commands.drain(..));
        }

        scratch.release_into(&mut self.pool);
    }

    /// Close the open command and drop empty ones.
    pub fn finalize(&mut self) -> DrawData<'_> {
        self.close_cmd();
        self.commands.retain(|c| c.elem_count > 0);
        if self.clip_stack.len() > 1 {
            log::warn!(
                "DrawList::finalize with {} unbalanced push_clip(s)",
                self.clip_stack.len() - 1
            );
        }
        DrawData {
            viewport: self.viewport,
            vertices: &self.vertices,
            indices: &self.indices,
            commands: &self.commands,
        }
    }

    /// Make sure a command is open for the current clip/texture and return
    /// the command-relative index of the next vertex.
    fn reserve(&mut self) -> u32 {
        if !self.open {
            let clip = self.clip();
            let texture = self.texture;
            let reopen = self
                .commands
                .last()
                .is_some_and(|c| c.clip == clip && c.texture == texture);
            if !reopen {
                self.commands.push(DrawCmd {
                    clip,
                    texture,
                    vtx_offset: self.vertices.len() as u32,
                    idx_offset: self.indices.len() as u32,
                    elem_count: 0,
                });
            }
            self.open = true;
        }
        let vtx_offset = self.commands.last().map_or(0, |c| c.vtx_offset);
        self.vertices.len() as u32 - vtx_offset
    }

    fn close_cmd(&mut self) {
        if !self.open {
            return;
        }
        if let Some(c) = self.commands.last_mut() {
            c.elem_count = self.indices.len() as u32 - c.idx_offset;
        }
        self.open = false;
    }

    fn push_quad_indices(&mut self, b: u32) {
        self.indices
            .extend_from_slice(&[b, b + 1, b + 2, b, b + 2, b + 3]);
    }
}

fn triangle_area(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs() * 0.5
}

fn quad_area(p: &[Vec2; 4]) -> f32 {
    triangle_area(p[0], p[1], p[2]) + triangle_area(p[0], p[2], p[3])
}

// Shoelace; absolute value so either winding works.
fn polygon_area(points: &[Vec2]) -> f32 {
    let mut twice = 0.0;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        twice += a.x * b.y - b.x * a.y;
    }
    (twice * 0.5_f32).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp() -> Rect {
        Rect::new(0.0, 0.0, 800.0, 600.0)
    }

    fn quad(dl: &mut DrawList, i: usize) {
        dl.add_rect(Rect::new(i as f32 * 10.0, 0.0, 8.0, 8.0), Color::WHITE);
    }

    #[test]
    fn same_texture_quads_batch_into_one_command() {
        let mut dl = DrawList::new(vp());
        for i in 0..25 {
            quad(&mut dl, i);
        }
        let data = dl.finalize();
        assert_eq!(data.commands.len(), 1);
        assert_eq!(data.commands[0].elem_count, 6 * 25);
        assert_eq!(data.vertices.len(), 4 * 25);
    }

    #[test]
    fn texture_switch_starts_new_command() {
        let mut dl = DrawList::new(vp());
        quad(&mut dl, 0);
        quad(&mut dl, 1);
        dl.set_texture(TextureId(3));
        quad(&mut dl, 2);
        let data = dl.finalize();
        assert_eq!(data.commands.len(), 2);
        assert_eq!(data.commands[0].elem_count, 12);
        assert_eq!(data.commands[1].elem_count, 6);
        assert_eq!(data.commands[1].texture, TextureId(3));
        assert_eq!(data.commands[1].vtx_offset, 8);
        assert_eq!(data.commands[1].idx_offset, 12);
    }

    #[test]
    fn indices_are_relative_to_command_base() {
        let mut dl = DrawList::new(vp());
        quad(&mut dl, 0);
        dl.set_texture(TextureId(1));
        quad(&mut dl, 1);
        let data = dl.finalize();
        let second = data.commands[1];
        let idx = &data.indices[second.idx_offset as usize..];
        assert_eq!(idx, &[0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn empty_clip_round_trip_reuses_trailing_command() {
        let mut dl = DrawList::new(vp());
        quad(&mut dl, 0);
        dl.push_clip(Rect::new(0.0, 0.0, 50.0, 50.0));
        dl.pop_clip();
        quad(&mut dl, 1);
        dl.set_texture(TextureId(2));
        dl.set_texture(TextureId::DEFAULT);
        quad(&mut dl, 2);
        let data = dl.finalize();
        assert_eq!(data.commands.len(), 1);
        assert_eq!(data.commands[0].elem_count, 18);
    }

    #[test]
    fn nested_clips_intersect() {
        let mut dl = DrawList::new(vp());
        dl.push_clip(Rect::new(10.0, 10.0, 100.0, 100.0));
        dl.push_clip(Rect::new(50.0, 50.0, 200.0, 200.0));
        quad(&mut dl, 6);
        assert_eq!(dl.clip(), Rect::new(50.0, 50.0, 60.0, 60.0));
        dl.pop_clip();
        dl.pop_clip();
        dl.pop_clip();
        assert_eq!(dl.clip(), vp());
        let data = dl.finalize();
        assert_eq!(data.commands[0].clip, Rect::new(50.0, 50.0, 60.0, 60.0));
    }

    #[test]
    fn degenerate_primitives_are_skipped() {
        let mut dl = DrawList::new(vp());
        dl.add_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::TRANSPARENT);
        dl.add_rect(Rect::new(0.0, 0.0, 0.0, 10.0), Color::WHITE);
        dl.add_line(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0), 2.0, Color::WHITE);
        dl.add_triangle(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(2.0, 2.0),
            Color::WHITE,
        );
        let data = dl.finalize();
        assert!(data.commands.is_empty());
        assert!(data.vertices.is_empty());
    }

    #[test]
    fn line_and_triangle_counts() {
        let mut dl = DrawList::new(vp());
        dl.add_line(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), 2.0, Color::BLACK);
        dl.add_triangle(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
            Color::BLACK,
        );
        let data = dl.finalize();
        assert_eq!(data.commands.len(), 1);
        assert_eq!(data.commands[0].elem_count, 9);
        assert_eq!(data.vertices[0].pos, [0.0, 1.0]);
    }

    #[test]
    fn convex_fan_shares_vertices() {
        let mut dl = DrawList::new(vp());
        let hexagon: Vec<Vec2> = (0..6)
            .map(|i| {
                let a = i as f32 * std::f32::consts::TAU / 6.0;
                Vec2::new(50.0 + 10.0 * a.cos(), 50.0 + 10.0 * a.sin())
            })
            .collect();
        dl.add_convex(&hexagon, Color::WHITE);
        dl.add_convex(&hexagon[..2], Color::WHITE);
        let data = dl.finalize();
        assert_eq!(data.vertices.len(), 6);
        assert_eq!(data.indices.len(), 12);
        assert_eq!(&data.indices[..3], &[0, 1, 2]);
        assert_eq!(&data.indices[9..], &[0, 4, 5]);
    }

    #[test]
    fn glyphs_restore_previous_texture() {
        let mut dl = DrawList::new(vp());
        let glyph = GlyphQuad {
            rect: Rect::new(0.0, 0.0, 7.0, 12.0),
            uv_min: [0.0, 0.0],
            uv_max: [0.1, 0.2],
        };
        dl.add_glyphs(TextureId(9), &[glyph, glyph], Color::WHITE);
        assert_eq!(dl.texture(), TextureId::DEFAULT);
        quad(&mut dl, 0);
        let data = dl.finalize();
        assert_eq!(data.commands.len(), 2);
        assert_eq!(data.commands[0].texture, TextureId(9));
        assert_eq!(data.commands[0].elem_count, 12);
    }

    #[test]
    fn insert_at_front_shifts_offsets_not_indices() {
        let mut dl = DrawList::new(vp());
        quad(&mut dl, 0);
        dl.set_texture(TextureId(4));
        quad(&mut dl, 1);
        quad(&mut dl, 2);
        let before: Vec<DrawCmd> = dl.finalize().commands.to_vec();
        let indices_before = dl.indices().to_vec();

        dl.insert_at_front(|bg| bg.add_rect(Rect::new(0.0, 0.0, 300.0, 40.0), Color::BLACK));

        let data = dl.finalize();
        assert_eq!(data.commands.len(), 3);
        assert_eq!(data.commands[0].vtx_offset, 0);
        assert_eq!(data.commands[0].elem_count, 6);
        for (old, new) in before.iter().zip(&data.commands[1..]) {
            assert_eq!(new.vtx_offset, old.vtx_offset + 4);
            assert_eq!(new.idx_offset, old.idx_offset + 6);
            assert_eq!(new.elem_count, old.elem_count);
        }
        assert_eq!(&data.indices[6..], &indices_before[..]);
        assert_eq!(data.vertices[0].color, [0, 0, 0, 255]);
    }

    #[test]
    fn insert_at_front_with_nothing_drawn_is_noop() {
        let mut dl = DrawList::new(vp());
        quad(&mut dl, 0);
        dl.insert_at_front(|_| {});
        let data = dl.finalize();
        assert_eq!(data.commands.len(), 1);
        assert_eq!(data.commands[0].vtx_offset, 0);
    }

    #[test]
    fn clear_keeps_capacity_and_scratch_is_pooled() {
        let mut dl = DrawList::new(vp());
        for i in 0..64 {
            quad(&mut dl, i);
        }
        dl.insert_at_front(|bg| quad(bg, 0));
        let cap = dl.vertices.capacity();
        dl.clear();
        assert!(dl.vertices().is_empty());
        assert_eq!(dl.vertices.capacity(), cap);
        assert!(dl.pool.vertices.available() >= 1);
    }
}
