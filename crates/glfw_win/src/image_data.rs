//! Decoded image pixels ready for texture upload
//!
//! PNG and JPEG are supported. Everything is converted to tightly packed
//! RGBA8.

use std::io::{BufRead, Seek};
use std::path::Path;

use image::{DynamicImage, ImageReader, RgbaImage};

use crate::error::Result;

/// RGBA8 pixel data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Raw RGBA pixel data, row-major from the top-left corner
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageData {
    /// Load an image from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading image from: {:?}", path);

        let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        let data = Self::from_dynamic(img);
        log::info!("Loaded image {}x{} from {:?}", data.width, data.height, path);
        Ok(data)
    }

    /// Decode an image from a reader, guessing the format from its contents
    pub fn from_reader<R: BufRead + Seek>(reader: R) -> Result<Self> {
        let img = ImageReader::new(reader).with_guessed_format()?.decode()?;
        Ok(Self::from_dynamic(img))
    }

    /// Decode an image held in memory
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes)?;
        let data = Self::from_dynamic(img);
        log::debug!("Loaded image {}x{} from memory", data.width, data.height);
        Ok(data)
    }

    /// Wrap an already decoded RGBA image
    pub fn from_rgba(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            data: img.into_raw(),
            width,
            height,
        }
    }

    /// Create a solid color image
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = (width * height) as usize;
        Self {
            data: color.repeat(pixel_count),
            width,
            height,
        }
    }

    fn from_dynamic(img: DynamicImage) -> Self {
        match img {
            DynamicImage::ImageRgba8(rgba) => Self::from_rgba(rgba),
            other => {
                log::debug!("No fast path for {:?} images, converting to RGBA8", other.color());
                Self::from_rgba(other.to_rgba8())
            }
        }
    }

    /// Size of the pixel data in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba};
    use std::io::Cursor;

    fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
        bytes
    }

    #[test]
    fn test_solid_color_image() {
        let img = ImageData::solid_color(4, 4, [255, 0, 0, 255]);
        assert_eq!(img.width, 4);
        assert_eq!(img.height, 4);
        assert_eq!(img.size_bytes(), 4 * 4 * 4);
        assert_eq!(&img.data[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_png_rgba_keeps_pixels() {
        let mut rgba = RgbaImage::new(2, 1);
        rgba.put_pixel(0, 0, Rgba([1, 2, 3, 4]));
        rgba.put_pixel(1, 0, Rgba([5, 6, 7, 8]));
        let bytes = encode(DynamicImage::ImageRgba8(rgba), ImageFormat::Png);

        let img = ImageData::from_bytes(&bytes).unwrap();
        assert_eq!((img.width, img.height), (2, 1));
        assert_eq!(img.data, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_rgb_is_converted_to_opaque_rgba() {
        let rgb = RgbImage::from_pixel(3, 2, Rgb([10, 20, 30]));
        let bytes = encode(DynamicImage::ImageRgb8(rgb), ImageFormat::Png);

        let img = ImageData::from_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(img.size_bytes(), 3 * 2 * 4);
        assert!(img.data.chunks(4).all(|px| px == [10, 20, 30, 255]));
    }

    #[test]
    fn test_jpeg_decodes() {
        let rgb = RgbImage::from_pixel(8, 8, Rgb([200, 200, 200]));
        let bytes = encode(DynamicImage::ImageRgb8(rgb), ImageFormat::Jpeg);

        let img = ImageData::from_bytes(&bytes).unwrap();
        assert_eq!((img.width, img.height), (8, 8));
        assert_eq!(img.data[3], 255);
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(ImageData::from_bytes(b"definitely not an image").is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(ImageData::from_file("/nonexistent/glfw_win/a.png").is_err());
    }
}
