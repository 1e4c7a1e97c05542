//! OpenGL state for 2D texture blits
//!
//! Everything is drawn as textured quads in window coordinates: the origin is
//! the top-left corner of the client area and one unit is one screen
//! coordinate. Shaders target GLSL 1.20 (OpenGL 2.1).

use std::cell::Cell;

use glow::{HasContext, PixelUnpackData};
use image::Rgba;

use crate::error::{Result, WinError};
use crate::geometry::{Point, Rect};
use crate::image_data::ImageData;

/// GL internal format for RGBA8 textures, pre-cast for `tex_image_2d`
const RGBA8_INTERNAL_FORMAT: i32 = glow::RGBA8 as i32;

/// Floats per vertex: position (x, y) followed by texture coordinate (u, v)
const VERTEX_FLOATS: usize = 4;

const BLIT_VERTEX_SRC: &str = r"#version 120

attribute vec2 a_position;
attribute vec2 a_uv;

// Client area size; maps window coordinates to NDC with Y pointing down.
uniform vec2 u_resolution;

varying vec2 v_uv;

void main() {
    v_uv = a_uv;
    vec2 ndc = (a_position / u_resolution) * 2.0 - 1.0;
    gl_Position = vec4(ndc.x, -ndc.y, 0.0, 1.0);
}
";

const BLIT_FRAGMENT_SRC: &str = r"#version 120

uniform sampler2D u_texture;

varying vec2 v_uv;

void main() {
    gl_FragColor = texture2D(u_texture, v_uv);
}
";

/// Texture coordinate rectangle, normalized to `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    /// Left
    pub u0: f32,
    /// Top
    pub v0: f32,
    /// Right
    pub u1: f32,
    /// Bottom
    pub v1: f32,
}

impl UvRect {
    /// The whole texture
    pub const FULL: Self = Self {
        u0: 0.0,
        v0: 0.0,
        u1: 1.0,
        v1: 1.0,
    };
}

/// Texture coordinates covering a `dr`-sized region starting at `sp`
///
/// Regions reaching past the image edge produce coordinates above 1.0 and
/// sample clamped edge pixels.
pub fn source_uv(dr: Rect, sp: Point, width: u32, height: u32) -> UvRect {
    let w = width as f32;
    let h = height as f32;
    UvRect {
        u0: sp.x as f32 / w,
        v0: sp.y as f32 / h,
        u1: (sp.x + dr.dx()) as f32 / w,
        v1: (sp.y + dr.dy()) as f32 / h,
    }
}

/// Triangle fan for a textured quad: top-left, top-right, bottom-right,
/// bottom-left
pub fn quad_vertices(dst: Rect, uv: UvRect) -> [f32; 4 * VERTEX_FLOATS] {
    let (x0, y0) = (dst.min.x as f32, dst.min.y as f32);
    let (x1, y1) = (dst.max.x as f32, dst.max.y as f32);
    [
        x0, y0, uv.u0, uv.v0, //
        x1, y0, uv.u1, uv.v0, //
        x1, y1, uv.u1, uv.v1, //
        x0, y1, uv.u0, uv.v1,
    ]
}

/// Normalize an 8-bit color for `glClearColor`
pub fn gl_color(color: Rgba<u8>) -> [f32; 4] {
    color.0.map(|c| f32::from(c) / 255.0)
}

fn gl_size(value: u32) -> Result<i32> {
    i32::try_from(value).map_err(|_| WinError::Gl(format!("dimension {value} exceeds i32::MAX")))
}

/// Owns the GL context and the blit program
pub struct Renderer {
    gl: glow::Context,
    program: glow::Program,
    vertex_buffer: glow::Buffer,
    resolution: Option<glow::UniformLocation>,
    a_position: u32,
    a_uv: u32,
    // Binding a texture is expensive; skip it when nothing changes.
    bound: Cell<Option<glow::Texture>>,
}

impl Renderer {
    /// Compile the blit program and set up blending and projection
    ///
    /// The context must be current on the calling thread.
    pub(crate) fn new(gl: glow::Context, width: i32, height: i32) -> Result<Self> {
        let program = compile_program(&gl, BLIT_VERTEX_SRC, BLIT_FRAGMENT_SRC)?;

        let attrib = |name: &str| unsafe {
            gl.get_attrib_location(program, name)
                .ok_or_else(|| WinError::Gl(format!("attribute {name} not found")))
        };
        let a_position = attrib("a_position")?;
        let a_uv = attrib("a_uv")?;

        let (vertex_buffer, resolution) = unsafe {
            let vertex_buffer = gl.create_buffer().map_err(WinError::Gl)?;
            let resolution = gl.get_uniform_location(program, "u_resolution");
            let texture = gl.get_uniform_location(program, "u_texture");

            gl.use_program(Some(program));
            gl.uniform_1_i32(texture.as_ref(), 0);

            gl.enable(glow::BLEND);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            gl.disable(glow::DEPTH_TEST);
            gl.disable(glow::DITHER);
            (vertex_buffer, resolution)
        };

        let renderer = Self {
            gl,
            program,
            vertex_buffer,
            resolution,
            a_position,
            a_uv,
            bound: Cell::new(None),
        };
        renderer.set_resolution(width, height);
        log::debug!("Blit renderer ready for {}x{}", width, height);
        Ok(renderer)
    }

    /// Map window coordinates `0..width` and `0..height` onto the viewport
    pub(crate) fn set_resolution(&self, width: i32, height: i32) {
        unsafe {
            self.gl.use_program(Some(self.program));
            self.gl.uniform_2_f32(
                self.resolution.as_ref(),
                width.max(1) as f32,
                height.max(1) as f32,
            );
        }
    }

    /// Set the viewport to the framebuffer size in pixels
    pub(crate) fn set_viewport(&self, width: i32, height: i32) {
        unsafe { self.gl.viewport(0, 0, width, height) };
    }

    /// Clear the whole framebuffer with `color`
    pub fn fill(&self, color: Rgba<u8>) {
        let [r, g, b, a] = gl_color(color);
        unsafe {
            self.gl.clear_color(r, g, b, a);
            self.gl.clear(glow::COLOR_BUFFER_BIT);
        }
    }

    /// Upload pixels into a new nearest-filtered texture
    pub(crate) fn create_texture(&self, image: &ImageData) -> Result<glow::Texture> {
        let width = gl_size(image.width)?;
        let height = gl_size(image.height)?;
        let gl = &self.gl;

        let texture = unsafe { gl.create_texture() }.map_err(WinError::Gl)?;
        self.bind(Some(texture));
        // Images are mostly drawn unscaled, so nearest filtering keeps them crisp.
        unsafe {
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::NEAREST as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::NEAREST as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                RGBA8_INTERNAL_FORMAT,
                width,
                height,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                PixelUnpackData::Slice(Some(&image.data)),
            );
        }
        log::trace!("Uploaded {}x{} texture", image.width, image.height);
        Ok(texture)
    }

    pub(crate) fn delete_texture(&self, texture: glow::Texture) {
        if self.bound.get() == Some(texture) {
            self.bind(None);
        }
        unsafe { self.gl.delete_texture(texture) };
    }

    /// Bind `texture` unless it is already bound
    fn bind(&self, texture: Option<glow::Texture>) {
        if self.bound.get() == texture {
            return;
        }
        self.bound.set(texture);
        unsafe { self.gl.bind_texture(glow::TEXTURE_2D, texture) };
    }

    /// Draw `texture` into `dst` using the `uv` region of the texture
    pub(crate) fn draw_quad(&self, texture: glow::Texture, dst: Rect, uv: UvRect) {
        let vertices = quad_vertices(dst, uv);
        let stride = (VERTEX_FLOATS * std::mem::size_of::<f32>()) as i32;
        let uv_offset = (2 * std::mem::size_of::<f32>()) as i32;
        let gl = &self.gl;

        self.bind(Some(texture));
        unsafe {
            gl.use_program(Some(self.program));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vertex_buffer));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&vertices),
                glow::STREAM_DRAW,
            );
            gl.enable_vertex_attrib_array(self.a_position);
            gl.vertex_attrib_pointer_f32(self.a_position, 2, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(self.a_uv);
            gl.vertex_attrib_pointer_f32(self.a_uv, 2, glow::FLOAT, false, stride, uv_offset);
            gl.draw_arrays(glow::TRIANGLE_FAN, 0, 4);
        }
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.vertex_buffer);
            self.gl.delete_program(self.program);
        }
    }
}

/// Compile and link a vertex + fragment shader pair
fn compile_program(gl: &glow::Context, vertex: &str, fragment: &str) -> Result<glow::Program> {
    let program = unsafe { gl.create_program() }.map_err(WinError::Gl)?;
    let sources = [(glow::VERTEX_SHADER, vertex), (glow::FRAGMENT_SHADER, fragment)];

    let mut shaders = Vec::with_capacity(sources.len());
    for (kind, source) in sources {
        let shader = unsafe { gl.create_shader(kind) }.map_err(WinError::Gl)?;
        unsafe {
            gl.shader_source(shader, source);
            gl.compile_shader(shader);
            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                gl.delete_program(program);
                return Err(WinError::Gl(format!("shader compilation failed: {log}")));
            }
            gl.attach_shader(program, shader);
        }
        shaders.push(shader);
    }

    unsafe {
        gl.link_program(program);
        let linked = gl.get_program_link_status(program);
        for shader in shaders {
            gl.detach_shader(program, shader);
            gl.delete_shader(shader);
        }
        if !linked {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            return Err(WinError::Gl(format!("program link failed: {log}")));
        }
    }
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_uv_whole_image() {
        let uv = source_uv(Rect::new(0, 0, 64, 32), Point::ZERO, 64, 32);
        assert_eq!(uv, UvRect::FULL);
    }

    #[test]
    fn test_source_uv_uses_both_dimensions() {
        // A wide destination over a tall image: V must follow the height.
        let uv = source_uv(Rect::new(100, 100, 116, 104), Point::new(8, 4), 32, 16);
        assert_eq!(uv, UvRect { u0: 0.25, v0: 0.25, u1: 0.75, v1: 0.5 });
    }

    #[test]
    fn test_quad_vertex_order() {
        let v = quad_vertices(Rect::new(1, 2, 3, 4), UvRect::FULL);
        assert_eq!(&v[0..4], &[1.0, 2.0, 0.0, 0.0]);
        assert_eq!(&v[4..8], &[3.0, 2.0, 1.0, 0.0]);
        assert_eq!(&v[8..12], &[3.0, 4.0, 1.0, 1.0]);
        assert_eq!(&v[12..16], &[1.0, 4.0, 0.0, 1.0]);
    }

    #[test]
    fn test_gl_color_normalizes() {
        assert_eq!(gl_color(Rgba([255, 0, 51, 255])), [1.0, 0.0, 0.2, 1.0]);
    }
}
