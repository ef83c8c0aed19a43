//! Image loading with a single extension-swap retry and a placeholder on failure.
//!
//! A load never fails from the caller's point of view: if the URL and its
//! `.png`/`.jpg` sibling both fail to fetch or decode, the caller gets the
//! fixed placeholder grid so the visual slot stays renderable.

use std::fmt;
use std::future::Future;

use image::DynamicImage;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{clamp_dimensions, AsciiCell, AsciiConverter, AsciiGrid, ConvertOptions, PixelSampler};

/// Gray used for every placeholder cell
pub const PLACEHOLDER_GRAY: u8 = 80;

/// Extensions that have a retry sibling
const RETRY_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("I/O error reading {url}: {source}")]
    Io {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },
}

/// Async byte fetcher for a URL or path
pub trait ImageSource: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, LoadError>> + Send;
}

/// Which URL produced a loaded grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridOrigin {
    Primary,
    Alternate(String),
    Placeholder,
}

impl fmt::Display for GridOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("primary"),
            Self::Alternate(url) => write!(f, "alternate {}", url),
            Self::Placeholder => f.write_str("placeholder"),
        }
    }
}

/// A decoded image and the URL it actually came from
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub image: DynamicImage,
    pub origin: GridOrigin,
}

/// Result of `load_and_convert`: always a grid, plus where it came from
#[derive(Debug, Clone)]
pub struct LoadedGrid {
    pub grid: AsciiGrid,
    pub origin: GridOrigin,
}

impl LoadedGrid {
    pub fn is_placeholder(&self) -> bool {
        self.origin == GridOrigin::Placeholder
    }
}

/// Sibling URL tried after a failed load
///
/// A trailing `.png` becomes `.jpg`; `.jpg`, `.jpeg` and `.webp` become
/// `.png`. Any other URL has no alternate.
pub fn alternate_url(url: &str) -> Option<String> {
    let dot = url.rfind('.')?;
    let extension = &url[dot + 1..];
    let lower = extension.to_ascii_lowercase();
    if !RETRY_EXTENSIONS.contains(&lower.as_str()) {
        return None;
    }

    let replacement = if lower == "png" { ".jpg" } else { ".png" };
    Some(format!("{}{}", &url[..dot], replacement))
}

async fn fetch_and_decode<S: ImageSource>(source: &S, url: &str) -> Result<DynamicImage, LoadError> {
    let bytes = source.fetch(url).await?;
    image::load_from_memory(&bytes).map_err(|e| LoadError::Decode {
        url: url.to_string(),
        source: e,
    })
}

/// Fetch and decode `url`, retrying once against its alternate extension
pub async fn load_image<S: ImageSource>(source: &S, url: &str) -> Result<LoadedImage, LoadError> {
    let first_error = match fetch_and_decode(source, url).await {
        Ok(image) => {
            return Ok(LoadedImage {
                image,
                origin: GridOrigin::Primary,
            })
        }
        Err(e) => e,
    };

    let Some(alternate) = alternate_url(url) else {
        return Err(first_error);
    };

    warn!("{}; retrying with {}", first_error, alternate);

    let image = fetch_and_decode(source, &alternate).await?;
    Ok(LoadedImage {
        image,
        origin: GridOrigin::Alternate(alternate),
    })
}

/// Load `url` and convert it, falling back to the placeholder grid
pub async fn load_and_convert<S, P>(
    source: &S,
    converter: &AsciiConverter<P>,
    url: &str,
    cols: u32,
    rows: u32,
    options: &ConvertOptions,
) -> LoadedGrid
where
    S: ImageSource,
    P: PixelSampler,
{
    match load_image(source, url).await {
        Ok(loaded) => {
            debug!("Loaded {} ({:?})", url, loaded.origin);
            LoadedGrid {
                grid: converter.convert(&loaded.image, cols, rows, options),
                origin: loaded.origin,
            }
        }
        Err(e) => {
            warn!("Giving up on {}: {}", url, e);
            LoadedGrid {
                grid: placeholder_grid(cols, rows),
                origin: GridOrigin::Placeholder,
            }
        }
    }
}

/// Blank gray grid with a small bracket motif in the middle
///
/// The row above the middle carries a run of `.`; the middle row reads
/// `f[[[...[[[]`, centered on the grid.
pub fn placeholder_grid(cols: u32, rows: u32) -> AsciiGrid {
    let (cols, rows) = clamp_dimensions(cols, rows);
    let mid_row = rows / 2;
    let mid_col = (cols / 2) as i64;
    // Doubled coordinates keep the half-column center exact for odd widths
    let width2 = cols as i64;

    let mut cells = Vec::with_capacity((cols * rows) as usize);
    for r in 0..rows {
        for c in 0..cols {
            let c = c as i64;
            let c2 = c * 2;
            let mut ch = ' ';
            if r + 1 == mid_row && c2 >= width2 - 10 && c2 <= width2 + 10 {
                ch = '.';
            }
            if r == mid_row {
                if c2 >= width2 - 12 && c2 <= width2 + 12 {
                    ch = '[';
                }
                if c == mid_col - 7 {
                    ch = 'f';
                }
                if c == mid_col + 7 {
                    ch = ']';
                }
            }
            cells.push(AsciiCell::new(ch, PLACEHOLDER_GRAY, PLACEHOLDER_GRAY, PLACEHOLDER_GRAY));
        }
    }

    AsciiGrid::from_cells(cols, rows, cells)
}
