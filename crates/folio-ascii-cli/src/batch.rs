use folio_ascii_core::{
    load_image, placeholder_grid, AsciiConverter, AsciiGrid, ConvertOptions, GridCache, GridOrigin, ImageSource,
    LoadedGrid,
};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{info, warn};

/// How a batch entry's grid was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
    /// Already in the cache before this run
    Cached,
    /// Loaded (or replaced by the placeholder) during this run
    Loaded(GridOrigin),
}

#[derive(Debug, Clone)]
pub struct BatchEntry {
    pub source: String,
    pub grid: Arc<AsciiGrid>,
    pub status: BatchStatus,
}

/// Loads and converts many sources with bounded concurrency, filling a cache
pub struct BatchConverter<S> {
    source: Arc<S>,
    converter: Arc<AsciiConverter>,
    cols: u32,
    rows: u32,
    options: ConvertOptions,
    concurrency: usize,
}

impl<S: ImageSource + 'static> BatchConverter<S> {
    pub fn new(
        source: S,
        converter: AsciiConverter,
        cols: u32,
        rows: u32,
        options: ConvertOptions,
        concurrency: usize,
    ) -> Self {
        info!(
            "Initializing batch converter: {}x{} chars, mode: {}, safe chars: {}, concurrency: {}",
            cols, rows, options.charset_mode, options.use_safe_char, concurrency
        );

        Self {
            source: Arc::new(source),
            converter: Arc::new(converter),
            cols,
            rows,
            options,
            concurrency: concurrency.max(1),
        }
    }

    /// Load one source, converting on the blocking pool
    async fn load_one(&self, url: String) -> (String, LoadedGrid) {
        let loaded = match load_image(self.source.as_ref(), &url).await {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!("Giving up on {}: {}", url, e);
                let grid = placeholder_grid(self.cols, self.rows);
                return (url, LoadedGrid { grid, origin: GridOrigin::Placeholder });
            }
        };

        let converter = Arc::clone(&self.converter);
        let (cols, rows, options) = (self.cols, self.rows, self.options);
        let image = loaded.image;

        match tokio::task::spawn_blocking(move || converter.convert(&image, cols, rows, &options)).await {
            Ok(grid) => (url, LoadedGrid { grid, origin: loaded.origin }),
            Err(e) => {
                warn!("Conversion task for {} failed: {}", url, e);
                let grid = placeholder_grid(cols, rows);
                (url, LoadedGrid { grid, origin: GridOrigin::Placeholder })
            }
        }
    }

    /// Convert every source not already cached, then return entries in input order
    ///
    /// Repeated sources are converted once.
    pub async fn run(&self, sources: &[String], cache: &mut GridCache) -> Vec<BatchEntry> {
        let mode = self.options.charset_mode;

        let mut pending: Vec<String> = Vec::new();
        for source in sources {
            if !cache.contains(source, mode) && !pending.contains(source) {
                pending.push(source.clone());
            }
        }

        info!(
            "Batch of {} sources: {} cached, {} to load",
            sources.len(),
            sources.len() - pending.len(),
            pending.len()
        );

        let results: Vec<(String, LoadedGrid)> = stream::iter(pending)
            .map(|url| self.load_one(url))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut fresh = std::collections::HashMap::new();
        let mut placeholders = 0usize;
        for (url, loaded) in results {
            if loaded.is_placeholder() {
                placeholders += 1;
            }
            cache.insert(url.clone(), mode, loaded.grid);
            fresh.insert(url, loaded.origin);
        }

        if placeholders > 0 {
            warn!("{} sources fell back to the placeholder", placeholders);
        }

        sources
            .iter()
            .filter_map(|source| {
                let grid = cache.get(source, mode)?;
                let status = match fresh.remove(source) {
                    Some(origin) => BatchStatus::Loaded(origin),
                    None => BatchStatus::Cached,
                };
                Some(BatchEntry {
                    source: source.clone(),
                    grid,
                    status,
                })
            })
            .collect()
    }
}
