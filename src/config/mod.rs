pub use mirrors::*;
pub use sources_list_config::*;

mod mirrors;
mod sources_list_config;
