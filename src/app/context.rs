use std::path::PathBuf;

use crate::app::{Result, SkimmerError};
use crate::config::Config;
use crate::engine::EngineOptions;
use crate::store::SqliteStore;

pub struct AppContext {
    pub config: Config,
    pub store: SqliteStore,
}

impl AppContext {
    pub fn new(config: Config, db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let store = SqliteStore::new(&db_path)?;
        Ok(Self { config, store })
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let store = SqliteStore::in_memory()?;
        Ok(Self { config, store })
    }

    /// Engine options derived from the loaded configuration.
    pub fn engine_options(&self) -> Result<EngineOptions> {
        Ok(EngineOptions {
            parser: self.config.parser.clone(),
            policy: self.config.engine.clone(),
            formatter: self.config.output.formatter()?,
        })
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| SkimmerError::Config("Could not find data directory".into()))?;
        let skimmer_dir = data_dir.join("skimmer");
        std::fs::create_dir_all(&skimmer_dir)?;
        Ok(skimmer_dir.join("skimmer.db"))
    }
}
