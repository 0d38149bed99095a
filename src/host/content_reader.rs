use std::fs;
use std::path::Path;

pub trait ContentReader {
    fn read_source(&self, path: &Path) -> std::io::Result<Vec<u8>>;
}

impl<T: ContentReader + ?Sized> ContentReader for &T {
    fn read_source(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        (**self).read_source(path)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FsContentReader;

impl ContentReader for FsContentReader {
    fn read_source(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        fs::read(path)
    }
}
