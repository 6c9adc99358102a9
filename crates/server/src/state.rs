use crate::config::ServerConfig;
use crate::error::ServerResult;
use chrono::{DateTime, Utc};
use ingest::{load_catalog, CsvOptions};
use matcher::{Catalog, DefaultMatcher, MatchConfig};
use planet_finder::PlanetFinderConfig;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

/// Shared application state
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Bulk upload parsing options
    pub csv_options: CsvOptions,

    /// Current matcher; reload swaps the whole value
    matcher: RwLock<Arc<DefaultMatcher>>,

    /// Where reloads read from; `None` for catalogs supplied in memory
    catalog_source: Option<PathBuf>,

    loaded_at: RwLock<DateTime<Utc>>,
}

/// What a catalog swap replaced.
#[derive(Debug, Clone, Copy)]
pub struct CatalogSwap {
    pub previous_records: usize,
    pub records: usize,
    pub loaded_at: DateTime<Utc>,
}

impl ServerState {
    /// Create server state, loading the catalog and optional pipeline config
    /// named in `config`.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let (match_cfg, csv_options) = match &config.pipeline_config {
            Some(path) => {
                let pipeline = PlanetFinderConfig::from_file(path)?;
                (pipeline.match_config(), pipeline.csv_options()?)
            }
            None => (MatchConfig::default(), CsvOptions::default()),
        };

        let catalog = load_catalog(&config.catalog_path)?;
        let source = config.catalog_path.clone();
        let mut state = Self::with_catalog(config, catalog, match_cfg, csv_options)?;
        state.catalog_source = Some(source);
        Ok(state)
    }

    /// Create server state over an in-memory catalog. Reload is unavailable.
    pub fn with_catalog(
        config: ServerConfig,
        catalog: Catalog,
        match_cfg: MatchConfig,
        csv_options: CsvOptions,
    ) -> ServerResult<Self> {
        csv_options.validate()?;
        let matcher = DefaultMatcher::new(catalog, match_cfg)?;

        Ok(Self {
            config: Arc::new(config),
            csv_options,
            matcher: RwLock::new(Arc::new(matcher)),
            catalog_source: None,
            loaded_at: RwLock::new(Utc::now()),
        })
    }

    /// Snapshot of the current matcher. Held across a request so a concurrent
    /// reload never changes the catalog mid-match.
    pub fn matcher(&self) -> Arc<DefaultMatcher> {
        self.matcher
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn catalog_source(&self) -> Option<&PathBuf> {
        self.catalog_source.as_ref()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        *self.loaded_at.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the catalog wholesale, keeping the matcher configuration.
    pub fn replace_catalog(&self, catalog: Catalog) -> CatalogSwap {
        let records = catalog.len();
        let now = Utc::now();

        let mut guard = self.matcher.write().unwrap_or_else(PoisonError::into_inner);
        let previous_records = guard.catalog().len();
        let replaced = guard.with_replaced_catalog(Arc::new(catalog));
        *guard = Arc::new(replaced);
        drop(guard);

        *self.loaded_at.write().unwrap_or_else(PoisonError::into_inner) = now;

        CatalogSwap {
            previous_records,
            records,
            loaded_at: now,
        }
    }
}
