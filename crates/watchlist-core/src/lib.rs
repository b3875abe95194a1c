pub mod config;
pub mod logging;

pub mod fetch;
pub mod profile_store;
pub mod project;
pub mod settings;
