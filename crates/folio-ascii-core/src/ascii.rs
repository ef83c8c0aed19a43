use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{char_for_level, safe_char, AsciiCell, AsciiGrid, CharsetMode, DensityLevel};

pub const MIN_COLS: u32 = 8;
pub const MAX_COLS: u32 = 200;
pub const MIN_ROWS: u32 = 4;
pub const MAX_ROWS: u32 = 200;

/// Each pixelperfect cell aggregates a SUPERSAMPLE_FACTOR x SUPERSAMPLE_FACTOR block
pub const SUPERSAMPLE_FACTOR: u32 = 16;

/// Options for a single conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConvertOptions {
    #[serde(default)]
    pub charset_mode: CharsetMode,

    /// Replace glyphs that may not render single-width with ASCII stand-ins
    #[serde(default = "default_true")]
    pub use_safe_char: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            charset_mode: CharsetMode::Full,
            use_safe_char: true,
        }
    }
}

impl ConvertOptions {
    pub fn new(charset_mode: CharsetMode) -> Self {
        Self {
            charset_mode,
            ..Self::default()
        }
    }
}

/// ITU-R BT.601 luminance of an RGB triple (0-255)
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
}

/// Density level of an RGB triple: bright regions map low, dark regions high
pub fn rgb_to_level(r: u8, g: u8, b: u8) -> DensityLevel {
    DensityLevel::from_luminance(luminance(r, g, b))
}

/// Clamp requested grid dimensions to the supported range
pub fn clamp_dimensions(cols: u32, rows: u32) -> (u32, u32) {
    (cols.clamp(MIN_COLS, MAX_COLS), rows.clamp(MIN_ROWS, MAX_ROWS))
}

/// Produces a pixel buffer of exact target dimensions from an arbitrary source image
pub trait PixelSampler: Send + Sync {
    fn resample(&self, image: &DynamicImage, width: u32, height: u32) -> RgbaImage;
}

/// Default sampler backed by `image::imageops::resize`
#[derive(Debug, Clone, Copy)]
pub struct ResizeSampler {
    filter: FilterType,
}

impl ResizeSampler {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Default for ResizeSampler {
    fn default() -> Self {
        // Bilinear
        Self::new(FilterType::Triangle)
    }
}

impl PixelSampler for ResizeSampler {
    fn resample(&self, image: &DynamicImage, width: u32, height: u32) -> RgbaImage {
        imageops::resize(image, width, height, self.filter)
    }
}

/// Image to colored ASCII grid converter
pub struct AsciiConverter<S = ResizeSampler> {
    sampler: S,
}

impl AsciiConverter<ResizeSampler> {
    pub fn new() -> Self {
        Self::with_sampler(ResizeSampler::default())
    }
}

impl Default for AsciiConverter<ResizeSampler> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PixelSampler> AsciiConverter<S> {
    pub fn with_sampler(sampler: S) -> Self {
        Self { sampler }
    }

    /// Convert a decoded image into a `rows x cols` grid
    ///
    /// Dimensions outside [8,200] x [4,200] are clamped. The image is not
    /// modified, and identical inputs always produce identical grids.
    pub fn convert(&self, image: &DynamicImage, cols: u32, rows: u32, options: &ConvertOptions) -> AsciiGrid {
        let (cols, rows) = clamp_dimensions(cols, rows);

        let colors = if options.charset_mode.is_supersampled() {
            self.sample_supersampled(image, cols, rows)
        } else {
            self.sample_direct(image, cols, rows)
        };

        let cells = colors
            .into_iter()
            .enumerate()
            .map(|(index, [r, g, b])| {
                // variety = row * cols + col, which is the linear cell index
                let level = rgb_to_level(r, g, b);
                let mut ch = char_for_level(options.charset_mode, level.value() as i64, Some(index as i64));
                if options.use_safe_char {
                    ch = safe_char(ch);
                }
                AsciiCell::new(ch, r, g, b)
            })
            .collect();

        debug!(
            "Converted {}x{} image to {}x{} grid ({} mode)",
            image.width(),
            image.height(),
            cols,
            rows,
            options.charset_mode
        );

        AsciiGrid::from_cells(cols, rows, cells)
    }

    /// One resampled pixel per cell
    fn sample_direct(&self, image: &DynamicImage, cols: u32, rows: u32) -> Vec<[u8; 3]> {
        let resized = self.sampler.resample(image, cols, rows);

        let mut colors = Vec::with_capacity((cols * rows) as usize);
        for y in 0..rows {
            for x in 0..cols {
                let pixel = resized.get_pixel_checked(x, y).map_or([0, 0, 0], |p| [p[0], p[1], p[2]]);
                colors.push(pixel);
            }
        }
        colors
    }

    /// Average each cell's SUPERSAMPLE_FACTOR x SUPERSAMPLE_FACTOR block, channel by channel
    fn sample_supersampled(&self, image: &DynamicImage, cols: u32, rows: u32) -> Vec<[u8; 3]> {
        let sample_w = cols * SUPERSAMPLE_FACTOR;
        let sample_h = rows * SUPERSAMPLE_FACTOR;
        let resized = self.sampler.resample(image, sample_w, sample_h);
        let (actual_w, actual_h) = resized.dimensions();

        let mut colors = Vec::with_capacity((cols * rows) as usize);
        for row in 0..rows {
            for col in 0..cols {
                let x0 = col * SUPERSAMPLE_FACTOR;
                let y0 = row * SUPERSAMPLE_FACTOR;
                let x1 = (x0 + SUPERSAMPLE_FACTOR).min(actual_w);
                let y1 = (y0 + SUPERSAMPLE_FACTOR).min(actual_h);

                let mut sums = [0u64; 3];
                let mut n = 0u64;
                for py in y0..y1 {
                    for px in x0..x1 {
                        let p = resized.get_pixel(px, py);
                        sums[0] += p[0] as u64;
                        sums[1] += p[1] as u64;
                        sums[2] += p[2] as u64;
                        n += 1;
                    }
                }

                colors.push(if n == 0 {
                    [0, 0, 0]
                } else {
                    // Round half up
                    sums.map(|sum| ((sum * 2 + n) / (n * 2)) as u8)
                });
            }
        }
        colors
    }
}

/// Convert with the default sampler
pub fn convert(image: &DynamicImage, cols: u32, rows: u32, options: &ConvertOptions) -> AsciiGrid {
    AsciiConverter::new().convert(image, cols, rows, options)
}
