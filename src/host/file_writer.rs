use std::fs::{self, Permissions};
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tempfile::NamedTempFile;

pub trait FileWriter {
    fn write_file(&self, path: &Path, content: &str, mode: u32) -> std::io::Result<()>;
}

impl<T: FileWriter + ?Sized> FileWriter for &T {
    fn write_file(&self, path: &Path, content: &str, mode: u32) -> std::io::Result<()> {
        (**self).write_file(path, content, mode)
    }
}

/// Writes through a temporary file in the destination directory that is renamed over the
/// destination once complete. Readers see either the old file or the new one, never a partial
/// write. Missing parent directories are created.
#[derive(Debug, Default, Clone, Copy)]
pub struct AtomicFileWriter;

impl FileWriter for AtomicFileWriter {
    fn write_file(&self, path: &Path, content: &str, mode: u32) -> std::io::Result<()> {
        let parent_dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent_dir)?;

        let mut temp_file = NamedTempFile::new_in(parent_dir)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.as_file().sync_all()?;
        fs::set_permissions(temp_file.path(), Permissions::from_mode(mode))?;
        temp_file.persist(path).map_err(|e| e.error)?;

        Ok(())
    }
}
