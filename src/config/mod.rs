//! Configuration: path resolution and persisted user settings

pub mod paths;
pub mod settings;

pub use paths::ExpensePaths;
pub use settings::Settings;
