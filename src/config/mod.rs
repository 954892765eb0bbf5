mod builder;
mod settings;

pub use builder::{
    ConfigBuilder, ConfigSchema, Credentials, FetchOptions, FetcherConfig, Location, LocationRule,
    StoreConfig,
};
pub use settings::{DeploymentConfig, Settings};
