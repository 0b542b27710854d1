//! Runtime context for CLI commands

use anyhow::{Context, Result};
use sf_core::{Config, DatabaseConfig};
use sf_db::{Database, DuckDbBackend};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// Loaded configuration plus the project root it is relative to
pub struct Project {
    pub config: Config,
    pub root: PathBuf,
}

impl Project {
    /// Load from `--config` if given, otherwise from the project directory
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let root = PathBuf::from(&global.project_dir);
        let config = if let Some(config_path) = &global.config {
            Config::load(Path::new(config_path)).context("Failed to load configuration file")?
        } else {
            Config::load_from_dir(&root).context("Failed to load project configuration")?
        };
        Ok(Self { config, root })
    }

    pub fn target_dir(&self) -> PathBuf {
        self.config.target_path_absolute(&self.root)
    }
}

/// Storage session for one CLI invocation.
///
/// The connection is opened and `on_run_start` executed in [`new`], and
/// closed when the context is dropped.
///
/// [`new`]: RuntimeContext::new
pub struct RuntimeContext {
    pub project: Project,

    /// Active target name, if any
    pub target: Option<String>,

    pub db: Arc<dyn Database>,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub async fn new(global: &GlobalArgs) -> Result<Self> {
        let project = Project::load(global)?;
        let target = Config::resolve_target(global.target.as_deref());

        let db_config = project
            .config
            .get_database_config(target.as_deref())
            .context("Failed to resolve database target")?;
        let db_path = database_path(&db_config, &project.root);
        log::info!("Connecting to {} database at {}", db_config.db_type, db_path);
        let db: Arc<dyn Database> =
            Arc::new(DuckDbBackend::new(&db_path).context("Failed to connect to database")?);

        let on_run_start = project
            .config
            .get_on_run_start(target.as_deref())
            .context("Failed to resolve on_run_start")?;
        for statement in &on_run_start {
            db.execute(statement)
                .await
                .with_context(|| format!("on_run_start statement failed: {}", statement))?;
        }

        Ok(Self {
            project,
            target,
            db,
        })
    }
}

/// File paths are relative to the project root; `:memory:` passes through.
fn database_path(config: &DatabaseConfig, root: &Path) -> String {
    let path = Path::new(&config.path);
    if config.path == ":memory:" || path.is_absolute() {
        config.path.clone()
    } else {
        root.join(path).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path_memory_passthrough() {
        let config = DatabaseConfig::default();
        assert_eq!(database_path(&config, Path::new("/proj")), ":memory:");
    }

    #[test]
    fn test_database_path_relative_to_root() {
        let config = DatabaseConfig {
            path: "dev.duckdb".to_string(),
            ..DatabaseConfig::default()
        };
        assert_eq!(
            database_path(&config, Path::new("/proj")),
            Path::new("/proj").join("dev.duckdb").display().to_string()
        );
    }
}
