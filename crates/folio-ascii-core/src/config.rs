use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use crate::{CharsetMode, ConvertOptions, OutputFormat};

/// Complete configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub converter: ConverterConfig,

    #[serde(default)]
    pub loader: LoaderConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Grid conversion settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConverterConfig {
    /// Grid width in characters (clamped to 8-200 at conversion time)
    #[serde(default = "default_cols")]
    pub cols: u32,

    /// Grid height in characters (clamped to 4-200 at conversion time)
    #[serde(default = "default_rows")]
    pub rows: u32,

    /// Glyph palette
    #[serde(default)]
    pub charset_mode: CharsetMode,

    /// Substitute glyphs that may not render single-width
    #[serde(default = "default_true")]
    pub use_safe_char: bool,

    /// Resampling filter used to scale the source image
    #[serde(default)]
    pub filter: SampleFilter,
}

/// Image loading settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoaderConfig {
    /// Maximum number of images loaded and converted at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Timeout for remote image requests
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

/// Output settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Resampling filters exposed through configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFilter {
    Nearest,
    /// Bilinear
    #[default]
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl SampleFilter {
    pub fn filter_type(&self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

fn default_cols() -> u32 {
    80
}

fn default_rows() -> u32 {
    48
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    4
}

fn default_http_timeout_secs() -> u64 {
    10
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            cols: default_cols(),
            rows: default_rows(),
            charset_mode: CharsetMode::default(),
            use_safe_char: true,
            filter: SampleFilter::default(),
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl ConverterConfig {
    pub fn options(&self) -> ConvertOptions {
        ConvertOptions {
            charset_mode: self.charset_mode,
            use_safe_char: self.use_safe_char,
        }
    }
}

impl Config {
    /// Load configuration from file, with FOLIO_ASCII_* environment overrides
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("FOLIO_ASCII").prefix_separator("_").separator("__"))
            .build()?;

        settings.try_deserialize().map_err(|e| anyhow::anyhow!("Failed to parse config: {}", e))
    }

    /// Load from `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &str) -> anyhow::Result<Self> {
        if std::path::Path::new(path).exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration
    ///
    /// Out-of-range grid dimensions are not errors; conversion clamps them.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.loader.concurrency < 1 {
            anyhow::bail!("Loader concurrency must be at least 1");
        }

        if self.loader.http_timeout_secs < 1 {
            anyhow::bail!("HTTP timeout must be at least 1 second");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.converter.cols, 80);
        assert_eq!(config.converter.rows, 48);
        assert_eq!(config.converter.charset_mode, CharsetMode::Full);
        assert!(config.converter.use_safe_char);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[converter]
cols = 108
rows = 108
charset_mode = "pixelperfect"
use_safe_char = false
filter = "lanczos3"

[output]
format = "ansi"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.converter.cols, 108);
        assert_eq!(config.converter.charset_mode, CharsetMode::PixelPerfect);
        assert_eq!(config.converter.filter, SampleFilter::Lanczos3);
        assert!(!config.converter.options().use_safe_char);
        assert_eq!(config.output.format, OutputFormat::Ansi);
        // untouched section keeps its defaults
        assert_eq!(config.loader.concurrency, 4);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load_or_default("/nonexistent/folio-ascii.toml").unwrap();
        assert_eq!(config.converter.cols, 80);
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.loader.concurrency = 0;
        assert!(config.validate().is_err());
    }
}
