pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::storage::LocalStorage;
pub use crate::core::{markup::MarkupCodec, record::RecordCodec, store::VehicleStorage};
pub use domain::model::{Engine, Transmission, Vehicle, VehicleKind, Wheel};
pub use domain::ports::{ConfigProvider, DecodePolicy, Storage, VehicleCodec};
pub use utils::error::{Result, StoreError};
