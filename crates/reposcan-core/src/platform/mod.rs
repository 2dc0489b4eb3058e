//! Platform checks used while validating a run's configuration.

pub mod permissions;

pub use permissions::check_writable_dir;
