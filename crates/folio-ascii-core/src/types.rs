use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of density buckets a luminance value is partitioned into
pub const NUM_LEVELS: u8 = 15;

/// Perceived darkness of a pixel region: 0 is brightest, 14 is darkest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DensityLevel(u8);

impl DensityLevel {
    pub const BRIGHTEST: DensityLevel = DensityLevel(0);
    pub const DARKEST: DensityLevel = DensityLevel(NUM_LEVELS - 1);

    /// Build a level, clamping anything outside [0, 14]
    pub fn new(level: i64) -> Self {
        Self(level.clamp(0, (NUM_LEVELS - 1) as i64) as u8)
    }

    /// Map a luminance value (0-255) to its bucket, bright to low, dark to high
    pub fn from_luminance(luminance: f64) -> Self {
        let normalized = luminance.clamp(0.0, 255.0) / 255.0;
        Self::new(((1.0 - normalized) * NUM_LEVELS as f64).floor() as i64)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Glyph palettes used for density-to-character mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CharsetMode {
    /// International multi-script palette
    #[default]
    Full,

    /// Printable ASCII only
    English,

    /// Pure density ramp (flat palette for external callers)
    Density,

    /// Square/block glyphs for gapless fill at small cell sizes
    #[value(name = "pixelperfect")]
    #[serde(rename = "pixelperfect")]
    PixelPerfect,
}

impl CharsetMode {
    pub const ALL: [CharsetMode; 4] = [
        CharsetMode::Full,
        CharsetMode::English,
        CharsetMode::Density,
        CharsetMode::PixelPerfect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::English => "english",
            Self::Density => "density",
            Self::PixelPerfect => "pixelperfect",
        }
    }

    /// Whether conversion averages supersampled blocks instead of scaling directly
    pub fn is_supersampled(&self) -> bool {
        matches!(self, Self::PixelPerfect)
    }
}

impl fmt::Display for CharsetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CharsetMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "english" => Ok(Self::English),
            "density" => Ok(Self::Density),
            "pixelperfect" => Ok(Self::PixelPerfect),
            other => anyhow::bail!("Unknown charset mode: {}", other),
        }
    }
}

/// One grid position: a glyph plus the average color of its source region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsciiCell {
    pub character: char,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl AsciiCell {
    pub fn new(character: char, red: u8, green: u8, blue: u8) -> Self {
        Self {
            character,
            red,
            green,
            blue,
        }
    }

    pub fn rgb(&self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

/// Rectangular row-major matrix of cells
///
/// Fields are private: a grid never changes after the converter (or the
/// placeholder builder) produces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiGrid {
    cols: u32,
    rows: u32,
    cells: Vec<AsciiCell>,
}

impl AsciiGrid {
    /// Caller guarantees `cells.len() == cols * rows`
    pub(crate) fn from_cells(cols: u32, rows: u32, cells: Vec<AsciiCell>) -> Self {
        debug_assert_eq!(cells.len(), (cols * rows) as usize);
        Self { cols, rows, cells }
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&AsciiCell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get((row * self.cols + col) as usize)
    }

    /// Cells of one row, left to right
    pub fn row(&self, row: u32) -> Option<&[AsciiCell]> {
        if row >= self.rows {
            return None;
        }
        let start = (row * self.cols) as usize;
        self.cells.get(start..start + self.cols as usize)
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[AsciiCell]> {
        self.cells.chunks(self.cols.max(1) as usize)
    }

    pub fn cells(&self) -> &[AsciiCell] {
        &self.cells
    }
}

impl Serialize for AsciiGrid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        // Flat storage, nested on the wire: one array per row
        let rows: Vec<&[AsciiCell]> = self.iter_rows().collect();
        let mut state = serializer.serialize_struct("AsciiGrid", 3)?;
        state.serialize_field("cols", &self.cols)?;
        state.serialize_field("rows", &self.rows)?;
        state.serialize_field("cells", &rows)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_level_clamps() {
        assert_eq!(DensityLevel::new(-3), DensityLevel::BRIGHTEST);
        assert_eq!(DensityLevel::new(99), DensityLevel::DARKEST);
        assert_eq!(DensityLevel::new(7).value(), 7);
    }

    #[test]
    fn test_density_level_from_luminance() {
        assert_eq!(DensityLevel::from_luminance(255.0), DensityLevel::BRIGHTEST);
        assert_eq!(DensityLevel::from_luminance(0.0), DensityLevel::DARKEST);
        // (1 - 128/255) * 15 = 7.47
        assert_eq!(DensityLevel::from_luminance(128.0).value(), 7);
    }

    #[test]
    fn test_charset_mode_parsing() {
        assert_eq!("full".parse::<CharsetMode>().unwrap(), CharsetMode::Full);
        assert_eq!("PixelPerfect".parse::<CharsetMode>().unwrap(), CharsetMode::PixelPerfect);
        assert!("klingon".parse::<CharsetMode>().is_err());
        for mode in CharsetMode::ALL {
            assert_eq!(mode.to_string().parse::<CharsetMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_grid_accessors() {
        let cells = (0..6).map(|i| AsciiCell::new('a', i, 0, 0)).collect();
        let grid = AsciiGrid::from_cells(3, 2, cells);

        assert_eq!(grid.get(1, 2).map(|c| c.red), Some(5));
        assert!(grid.get(2, 0).is_none());
        assert!(grid.get(0, 3).is_none());
        assert_eq!(grid.row(1).map(|r| r.len()), Some(3));
        assert_eq!(grid.iter_rows().count(), 2);
    }
}
