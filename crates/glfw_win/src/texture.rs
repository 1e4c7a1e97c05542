//! Images uploaded to the GPU for drawing onto the window

use std::rc::{Rc, Weak};

use crate::error::{Result, WinError};
use crate::geometry::{Point, Rect};
use crate::image_data::ImageData;
use crate::renderer::{source_uv, Renderer, UvRect};

/// An image stored as an OpenGL texture
///
/// Created through [`Window::open_image`](crate::Window::open_image) and
/// friends. The texture is deleted when the image is dropped. Drawing after
/// the window was closed fails with [`WinError::WindowClosed`].
pub struct Image {
    width: u32,
    height: u32,
    texture: glow::Texture,
    renderer: Weak<Renderer>,
}

impl Image {
    pub(crate) fn upload(renderer: &Rc<Renderer>, data: &ImageData) -> Result<Self> {
        let texture = renderer.create_texture(data)?;
        Ok(Self {
            width: data.width,
            height: data.height,
            texture,
            renderer: Rc::downgrade(renderer),
        })
    }

    /// Width in pixels
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Bounds of the image with its top-left corner at the origin
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(Point::ZERO, self.width as i32, self.height as i32)
    }

    /// Draw the entire image with its top-left corner at `dp`
    pub fn draw(&self, dp: Point) -> Result<()> {
        let renderer = self.renderer()?;
        renderer.draw_quad(self.texture, self.bounds().translate(dp), UvRect::FULL);
        Ok(())
    }

    /// Fill the destination rectangle `dr` with pixels of this image,
    /// starting at the source point `sp`
    pub fn draw_rect(&self, dr: Rect, sp: Point) -> Result<()> {
        if dr.is_empty() {
            return Ok(());
        }
        let renderer = self.renderer()?;
        let uv = source_uv(dr, sp, self.width, self.height);
        renderer.draw_quad(self.texture, dr, uv);
        Ok(())
    }

    fn renderer(&self) -> Result<Rc<Renderer>> {
        self.renderer.upgrade().ok_or(WinError::WindowClosed)
    }
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Drop for Image {
    fn drop(&mut self) {
        // Textures die with the context, nothing to do once the window is gone.
        if let Some(renderer) = self.renderer.upgrade() {
            renderer.delete_texture(self.texture);
        }
    }
}
