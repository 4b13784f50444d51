//! Configuration: per-vault settings and default vault location.

pub mod paths;
pub mod settings;

pub use paths::default_vault_path;
pub use settings::Settings;
