use glium::{
    index,
    texture::{RawImage2d, SrgbTexture2d, TextureCreationError},
    vertex, Display, IndexBuffer, Vertex, VertexBuffer,
};
use glutin::surface::WindowSurface;

use crate::{geometry::Shape, texture::TextureImage};

#[derive(thiserror::Error, Debug)]
pub enum BufferError {
    #[error("failed to create vertex buffer: {0}")]
    Vertex(#[from] vertex::BufferCreationError),
    #[error("failed to create index buffer: {0}")]
    Index(#[from] index::BufferCreationError),
}

/// A `Shape` uploaded to the GPU
pub struct GpuShape<V: Copy> {
    pub vertices: VertexBuffer<V>,
    pub indices: IndexBuffer<u32>,
}

pub struct DisplayShape<'a, V>(pub &'a Shape<V>, pub &'a Display<WindowSurface>);

impl<V: Vertex> TryFrom<DisplayShape<'_, V>> for GpuShape<V> {
    type Error = BufferError;
    fn try_from(d_shape: DisplayShape<V>) -> Result<GpuShape<V>, BufferError> {
        let DisplayShape(shape, display) = d_shape;
        Ok(GpuShape {
            vertices: VertexBuffer::new(display, &shape.vertices)?,
            indices: IndexBuffer::new(display, shape.primitive, &shape.indices)?,
        })
    }
}

/// `image` has already been flipped bottom row first, so it goes up as is.
///
/// # Errors
///
/// Whatever glium reports when the texture can't be created.
pub fn upload_texture(
    image: &TextureImage,
    display: &Display<WindowSurface>,
) -> Result<SrgbTexture2d, TextureCreationError> {
    let raw = RawImage2d::from_raw_rgba(image.rgba.clone(), (image.width, image.height));
    SrgbTexture2d::new(display, raw)
}
