//! Synthetic source images for testing and demos (no image files needed).

use image::{DynamicImage, Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform image of a single color
pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(rgb)))
}

/// Gray ramp from black on the left to white on the right
pub fn horizontal_gradient(width: u32, height: u32) -> DynamicImage {
    let span = width.saturating_sub(1).max(1);
    let image = RgbImage::from_fn(width, height, |x, _| {
        let v = (x * 255 / span) as u8;
        Rgb([v, v, v])
    });
    DynamicImage::ImageRgb8(image)
}

/// Alternating squares of `cell` pixels in colors `a` and `b`
pub fn checkerboard(width: u32, height: u32, cell: u32, a: [u8; 3], b: [u8; 3]) -> DynamicImage {
    let cell = cell.max(1);
    let image = RgbImage::from_fn(width, height, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            Rgb(a)
        } else {
            Rgb(b)
        }
    });
    DynamicImage::ImageRgb8(image)
}

/// Random colors, reproducible for a given seed
pub fn noise(width: u32, height: u32, seed: u64) -> DynamicImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let image = RgbImage::from_fn(width, height, |_, _| Rgb([rng.gen(), rng.gen(), rng.gen()]));
    DynamicImage::ImageRgb8(image)
}

/// Encode an image to PNG bytes, for exercising the decode path
pub fn to_png_bytes(image: &DynamicImage) -> image::ImageResult<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_endpoints() {
        let image = horizontal_gradient(16, 2).to_rgb8();
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(image.get_pixel(15, 1).0, [255, 255, 255]);
    }

    #[test]
    fn test_checkerboard_alternates() {
        let image = checkerboard(4, 4, 2, [0, 0, 0], [255, 255, 255]).to_rgb8();
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(image.get_pixel(2, 0).0, [255, 255, 255]);
        assert_eq!(image.get_pixel(2, 2).0, [0, 0, 0]);
    }

    #[test]
    fn test_noise_is_seeded() {
        assert_eq!(noise(8, 8, 1), noise(8, 8, 1));
        assert_ne!(noise(8, 8, 1), noise(8, 8, 2));
    }

    #[test]
    fn test_png_bytes_decode() {
        let image = solid(3, 2, [10, 20, 30]);
        let bytes = to_png_bytes(&image).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.to_rgb8().get_pixel(2, 1).0, [10, 20, 30]);
    }
}
