pub use release_info::*;
pub use repository_uri::*;
pub use source_entry::*;
pub use sources_list::*;

mod release_info;
mod repository_uri;
mod source_entry;
mod sources_list;
