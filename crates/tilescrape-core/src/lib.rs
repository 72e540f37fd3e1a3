pub mod app_config;
pub mod config;
pub mod product_type;
pub mod records;
pub mod run;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use product_type::{ProductType, TypeAllowList};
pub use records::{MergedRecord, RawTileRecord};
pub use run::{load_job, ListingMode, RunConfiguration, ScrollPolicy, TriggerInput};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown product type: {0}")]
    UnknownProductType(String),

    #[error("invalid run configuration: {0}")]
    InvalidRun(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read job file {path}: {source}")]
    JobFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse job file: {0}")]
    JobFileParse(#[from] serde_yaml::Error),

    #[error(transparent)]
    InvalidJob(#[from] CoreError),
}
