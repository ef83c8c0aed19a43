use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::AsciiGrid;

/// Output formats for a converted grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Glyphs only, one line per row
    #[default]
    Text,

    /// Glyphs painted with 24-bit ANSI foreground colors
    Ansi,

    /// Full cell data as JSON
    Json,
}

/// Trait for grid output strategies
pub trait GridEncoder: Send + Sync {
    fn encode(&self, grid: &AsciiGrid) -> Result<String>;

    fn format(&self) -> OutputFormat;
}

/// Plain glyph text; rows joined by newlines, no trailing newline
pub struct TextEncoder;

impl GridEncoder for TextEncoder {
    fn encode(&self, grid: &AsciiGrid) -> Result<String> {
        let mut result = String::with_capacity(grid.cells().len() + grid.rows() as usize);

        for (y, row) in grid.iter_rows().enumerate() {
            if y > 0 {
                result.push('\n');
            }
            result.extend(row.iter().map(|cell| cell.character));
        }

        Ok(result)
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Text
    }
}

/// Truecolor terminal output: every glyph in its cell's color
pub struct AnsiEncoder;

impl GridEncoder for AnsiEncoder {
    fn encode(&self, grid: &AsciiGrid) -> Result<String> {
        // Extra space for ANSI codes
        let mut result = String::with_capacity(grid.cells().len() * 20);

        for (y, row) in grid.iter_rows().enumerate() {
            if y > 0 {
                result.push('\n');
            }
            for cell in row {
                write!(
                    result,
                    "\x1b[38;2;{};{};{}m{}\x1b[0m",
                    cell.red, cell.green, cell.blue, cell.character
                )
                .map_err(|e| anyhow!("ANSI encode error: {}", e))?;
            }
        }

        Ok(result)
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Ansi
    }
}

/// Structured output for other tools
pub struct JsonEncoder {
    pub pretty: bool,
}

impl GridEncoder for JsonEncoder {
    fn encode(&self, grid: &AsciiGrid) -> Result<String> {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(grid)
        } else {
            serde_json::to_string(grid)
        };
        encoded.map_err(|e| anyhow!("JSON encode error: {}", e))
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

/// Get an encoder for the specified output format
pub fn get_encoder(format: OutputFormat) -> Box<dyn GridEncoder> {
    match format {
        OutputFormat::Text => Box::new(TextEncoder),
        OutputFormat::Ansi => Box::new(AnsiEncoder),
        OutputFormat::Json => Box::new(JsonEncoder { pretty: false }),
    }
}
