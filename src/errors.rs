use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::string::FromUtf8Error;

use crate::config::ConfigError;
use crate::host::LookupError;

#[derive(Debug)]
pub enum RenderError {
    Config(ConfigError),
    Lookup(LookupError),
    ReadSourcesList(PathBuf, std::io::Error),
    DecodeSourcesList(PathBuf, FromUtf8Error),
    WriteSourcesList(PathBuf, std::io::Error),
    Template(TemplateError),
}

/// Custom templates are not validated yet, so nothing produces this error. Tokens without a
/// value render as empty strings and are reported in the build output instead.
#[derive(Debug)]
pub enum TemplateError {}

impl Display for TemplateError {
    fn fmt(&self, _: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {}
    }
}

impl std::error::Error for TemplateError {}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Config(e) => write!(f, "invalid apt configuration: {e}"),
            RenderError::Lookup(e) => write!(f, "release lookup failed: {e}"),
            RenderError::ReadSourcesList(path, _) => {
                write!(f, "could not read {}", path.display())
            }
            RenderError::DecodeSourcesList(path, _) => {
                write!(f, "{} is not valid UTF-8", path.display())
            }
            RenderError::WriteSourcesList(path, _) => {
                write!(f, "could not write {}", path.display())
            }
            RenderError::Template(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Config(e) => Some(e),
            RenderError::Lookup(e) => Some(e),
            RenderError::ReadSourcesList(_, e) | RenderError::WriteSourcesList(_, e) => Some(e),
            RenderError::DecodeSourcesList(_, e) => Some(e),
            RenderError::Template(e) => Some(e),
        }
    }
}

impl From<ConfigError> for RenderError {
    fn from(value: ConfigError) -> Self {
        RenderError::Config(value)
    }
}

impl From<LookupError> for RenderError {
    fn from(value: LookupError) -> Self {
        RenderError::Lookup(value)
    }
}

impl From<TemplateError> for RenderError {
    fn from(value: TemplateError) -> Self {
        RenderError::Template(value)
    }
}
