pub use content_reader::*;
pub use file_writer::*;
pub use release_detector::*;

mod content_reader;
mod file_writer;
mod release_detector;
