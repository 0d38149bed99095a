//! Renders the apt `sources.list` of a target root filesystem.
//!
//! The existing list can have its mirrors rewritten (`apt_mirror`, `apt_primary_mirror`,
//! `apt_security_mirror`), or it can be replaced by a custom template
//! (`apt_custom_sources_list`) with `$MIRROR`, `$PRIMARY`, `$SECURITY` and `$RELEASE`
//! substituted. See [`SourcesListRenderer`].

pub mod config;
pub mod debian;
mod errors;
pub mod host;
mod render_sources_list;
pub mod template;

pub use errors::*;
pub use render_sources_list::*;
