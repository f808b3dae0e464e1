pub mod api;
pub mod chain;
pub mod config;
pub mod error;
pub mod model;
pub mod registry;
pub mod state;
pub mod units;

pub use error::SupplyError;
pub use state::AppState;
