pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

#[cfg(feature = "lambda")]
pub use adapters::storage::S3Storage;
#[cfg(feature = "lambda")]
pub use config::lambda::LambdaConfig;

pub use adapters::{hibp::HibpClient, storage::LocalStorage};
pub use config::Settings;
pub use crate::core::{
    breach_table::BreachTable, payment_hook::PaymentHookHandler,
    register_order::RegisterOrderHandler,
};
pub use utils::error::{HimayaError, Result};
