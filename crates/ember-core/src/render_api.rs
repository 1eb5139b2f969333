use thiserror::Error;

use crate::draw::{DrawData, TextureId};

/// Failures reported by a backend. The core never produces these.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("render surface lost")]
    SurfaceLost,

    #[error("GPU out of memory")]
    OutOfMemory,

    #[error("shader compilation failed: {0}")]
    ShaderCompile(String),

    #[error("unknown texture {0:?}")]
    UnknownTexture(TextureId),
}

pub trait RenderBackend {
    fn configure_surface(&mut self, width: u32, height: u32);

    /// Texture holding the built-in font atlas; `TextureId::DEFAULT` unless
    /// the backend says otherwise.
    fn default_font_texture(&self) -> TextureId {
        TextureId::DEFAULT
    }

    /// Submit one finalized frame. Commands must be drawn in order, each with
    /// its clip as scissor and indices relative to its vertex offset.
    fn render(&mut self, data: &DrawData<'_>) -> Result<(), RenderError>;
}
