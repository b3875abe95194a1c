//! CLI command handlers.

mod fetch;
mod profiles;

pub use fetch::run_fetch;
pub use profiles::run_list_profiles;
