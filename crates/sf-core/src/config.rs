//! Configuration types and parsing for swapflow.yml

use crate::error::{CoreError, CoreResult};
use crate::identifier::{DatabaseName, SchemaName, TableName};
use crate::relation::RelationRef;
use crate::validation::{EmptyPolicy, PrimaryKeyConfig, ValidationSpec};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Environment variable consulted when `--target` is not given
pub const TARGET_ENV_VAR: &str = "SF_TARGET";

/// Main project configuration from swapflow.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// SQL dialect used to pre-flight job queries
    #[serde(default)]
    pub dialect: Dialect,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Session statements executed once after connecting, before any job runs
    #[serde(default)]
    pub on_run_start: Vec<String>,

    /// Named target configurations (e.g., dev, prod)
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,

    /// Output directory for run results
    #[serde(default = "default_target_path")]
    pub target_path: String,

    /// Table replacement jobs, run in declaration order
    #[serde(default)]
    pub jobs: Vec<JobConfig>,
}

/// Target-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Database configuration override
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Session statements override
    #[serde(default)]
    pub on_run_start: Option<Vec<String>>,
}

/// Database type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB (default)
    #[default]
    DuckDb,
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database type
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Database path (for DuckDB file-based or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DbType::default(),
            path: default_db_path(),
        }
    }
}

/// SQL dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// DuckDB SQL dialect
    #[default]
    DuckDb,
    /// Snowflake SQL dialect
    Snowflake,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::DuckDb => write!(f, "duckdb"),
            Dialect::Snowflake => write!(f, "snowflake"),
        }
    }
}

/// One table replacement job
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    /// Job name (defaults to the table name)
    #[serde(default)]
    pub name: Option<String>,

    /// Target database
    pub database: DatabaseName,

    /// Target schema
    pub schema: SchemaName,

    /// Target table
    pub table: TableName,

    /// Inline query producing the new table contents
    #[serde(default)]
    pub select_sql: Option<String>,

    /// Path (relative to the project root) of a file holding the query
    #[serde(default)]
    pub sql_file: Option<String>,

    /// Primary-key column(s) to check for uniqueness
    #[serde(default)]
    pub primary_key: Option<PrimaryKeyConfig>,

    /// What to do when the query returns no rows
    #[serde(default)]
    pub on_empty: EmptyPolicy,

    /// Statements to execute before the staging relation is built
    #[serde(default)]
    pub pre_hook: Vec<String>,
}

impl JobConfig {
    /// Job name, falling back to the target table name
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.table.as_str())
    }

    /// Relation the job replaces
    pub fn target(&self) -> RelationRef {
        RelationRef::new(
            self.database.clone(),
            self.schema.clone(),
            self.table.clone(),
        )
    }

    /// Validation rules for the job's staged relation
    pub fn validation_spec(&self) -> ValidationSpec {
        let spec = ValidationSpec::new().with_on_empty(self.on_empty);
        match &self.primary_key {
            Some(pk) => spec.with_primary_key(pk.columns()),
            None => spec,
        }
    }

    /// Load the job's query, reading `sql_file` relative to `root` if needed
    pub fn resolve_sql(&self, root: &Path) -> CoreResult<String> {
        match (&self.select_sql, &self.sql_file) {
            (Some(sql), None) => Ok(sql.trim().to_string()),
            (None, Some(file)) => {
                let path = root.join(file);
                let content =
                    std::fs::read_to_string(&path).map_err(|e| CoreError::IoWithPath {
                        path: path.display().to_string(),
                        source: e,
                    })?;
                Ok(content.trim().to_string())
            }
            _ => Err(CoreError::ConfigInvalid {
                message: format!(
                    "Job '{}' must set exactly one of 'select_sql' or 'sql_file'",
                    self.name()
                ),
            }),
        }
    }

    fn validate(&self) -> CoreResult<()> {
        if self.name.as_deref() == Some("") {
            return Err(CoreError::ConfigInvalid {
                message: format!("Job for table '{}' has an empty name", self.table),
            });
        }

        match (&self.select_sql, &self.sql_file) {
            (Some(sql), None) if sql.trim().is_empty() => {
                return Err(CoreError::ConfigInvalid {
                    message: format!("Job '{}' has an empty 'select_sql'", self.name()),
                });
            }
            (Some(_), None) | (None, Some(_)) => {}
            _ => {
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "Job '{}' must set exactly one of 'select_sql' or 'sql_file'",
                        self.name()
                    ),
                });
            }
        }

        if let Some(pk) = &self.primary_key {
            let columns = pk.columns();
            if columns.is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("Job '{}' has an empty 'primary_key' list", self.name()),
                });
            }
            let mut seen = HashSet::new();
            for column in &columns {
                if !seen.insert(column.as_str()) {
                    return Err(CoreError::ConfigInvalid {
                        message: format!(
                            "Job '{}' lists primary key column '{}' more than once",
                            self.name(),
                            column
                        ),
                    });
                }
            }
        }

        Ok(())
    }
}

fn default_target_path() -> String {
    "target".to_string()
}

const DEFAULT_DB_PATH: &str = ":memory:";

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content).map_err(|e| match e {
            CoreError::ConfigParseError { message } => CoreError::ConfigParseError {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        let config: Config =
            serde_yaml::from_str(content).map_err(|e| CoreError::ConfigParseError {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for swapflow.yml or swapflow.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("swapflow.yml");
        let yaml_path = dir.join("swapflow.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        let mut names = HashSet::new();
        for job in &self.jobs {
            job.validate()?;
            if !names.insert(job.name()) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("Duplicate job name '{}'", job.name()),
                });
            }
        }

        self.check_relation_collisions()
    }

    /// Every target and every staging relation must belong to exactly one job.
    fn check_relation_collisions(&self) -> CoreResult<()> {
        let mut owners: HashMap<RelationRef, &str> = HashMap::new();
        for job in &self.jobs {
            if let Some(first) = owners.insert(job.target(), job.name()) {
                return Err(CoreError::RelationCollision {
                    relation: job.target().to_string(),
                    first: first.to_string(),
                    second: job.name().to_string(),
                });
            }
        }
        for job in &self.jobs {
            let staging = job.target().staging();
            if let Some(owner) = owners.get(&staging) {
                return Err(CoreError::RelationCollision {
                    relation: staging.to_string(),
                    first: owner.to_string(),
                    second: job.name().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Select jobs by a comma-separated list of names, or all jobs when `None`.
    ///
    /// Selected jobs keep their declaration order.
    pub fn select_jobs(&self, filter: Option<&str>) -> CoreResult<Vec<&JobConfig>> {
        let Some(filter) = filter else {
            return Ok(self.jobs.iter().collect());
        };

        let wanted: Vec<&str> = filter
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        for name in &wanted {
            if !self.jobs.iter().any(|j| j.name() == *name) {
                return Err(CoreError::JobNotFound {
                    name: name.to_string(),
                    available: self.job_names().join(", "),
                });
            }
        }

        Ok(self
            .jobs
            .iter()
            .filter(|j| wanted.contains(&j.name()))
            .collect())
    }

    /// Names of all configured jobs
    pub fn job_names(&self) -> Vec<&str> {
        self.jobs.iter().map(JobConfig::name).collect()
    }

    /// Get absolute target path relative to a project root
    pub fn target_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.target_path)
    }

    /// Get the database configuration, applying target overrides if specified
    pub fn get_database_config(&self, target: Option<&str>) -> CoreResult<DatabaseConfig> {
        match target {
            Some(name) => Ok(self
                .get_target(name)?
                .database
                .clone()
                .unwrap_or_else(|| self.database.clone())),
            None => Ok(self.database.clone()),
        }
    }

    /// Get the session statements, applying target overrides if specified
    pub fn get_on_run_start(&self, target: Option<&str>) -> CoreResult<Vec<String>> {
        match target {
            Some(name) => Ok(self
                .get_target(name)?
                .on_run_start
                .clone()
                .unwrap_or_else(|| self.on_run_start.clone())),
            None => Ok(self.on_run_start.clone()),
        }
    }

    fn get_target(&self, name: &str) -> CoreResult<&TargetConfig> {
        self.targets.get(name).ok_or_else(|| {
            let mut available: Vec<&str> = self.targets.keys().map(|k| k.as_str()).collect();
            available.sort_unstable();
            CoreError::ConfigInvalid {
                message: format!(
                    "Target '{}' not found. Available targets: {}",
                    name,
                    available.join(", ")
                ),
            }
        })
    }

    /// Resolve the active target from the CLI flag or the SF_TARGET env var
    pub fn resolve_target(cli_target: Option<&str>) -> Option<String> {
        cli_target
            .map(String::from)
            .or_else(|| std::env::var(TARGET_ENV_VAR).ok())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
