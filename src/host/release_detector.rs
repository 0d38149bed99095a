use std::fmt::{Display, Formatter};
use std::process::{Command, ExitStatus};
use std::str::FromStr;

use crate::debian::{ParseReleaseInfoError, ReleaseInfo};

pub trait ReleaseDetector {
    fn detect_release(&self) -> Result<ReleaseInfo, LookupError>;
}

impl<T: ReleaseDetector + ?Sized> ReleaseDetector for &T {
    fn detect_release(&self) -> Result<ReleaseInfo, LookupError> {
        (**self).detect_release()
    }
}

impl<T: ReleaseDetector + ?Sized> ReleaseDetector for Box<T> {
    fn detect_release(&self) -> Result<ReleaseInfo, LookupError> {
        (**self).detect_release()
    }
}

/// Asks `lsb_release` on the running host for the distribution release.
#[derive(Debug, Default, Clone, Copy)]
pub struct LsbRelease;

impl ReleaseDetector for LsbRelease {
    fn detect_release(&self) -> Result<ReleaseInfo, LookupError> {
        let output = Command::new("lsb_release")
            .arg("--all")
            .output()
            .map_err(LookupError::SpawnCommand)?;

        if !output.status.success() {
            return Err(LookupError::CommandFailed(
                output.status,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        ReleaseInfo::from_str(&String::from_utf8_lossy(&output.stdout))
            .map_err(LookupError::ParseRelease)
    }
}

/// A release codename supplied up front instead of being detected.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FixedRelease(pub String);

impl ReleaseDetector for FixedRelease {
    fn detect_release(&self) -> Result<ReleaseInfo, LookupError> {
        let codename = self.0.trim();
        if codename.is_empty() {
            Err(LookupError::ParseRelease(
                ParseReleaseInfoError::MissingCodename,
            ))
        } else {
            Ok(ReleaseInfo::from_codename(codename))
        }
    }
}

#[derive(Debug)]
pub enum LookupError {
    SpawnCommand(std::io::Error),
    CommandFailed(ExitStatus, String),
    ParseRelease(ParseReleaseInfoError),
}

impl Display for LookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::SpawnCommand(_) => write!(f, "could not run `lsb_release`"),
            LookupError::CommandFailed(status, stderr) => {
                write!(f, "`lsb_release` failed ({status}): {stderr}")
            }
            LookupError::ParseRelease(_) => write!(f, "could not determine the release codename"),
        }
    }
}

impl std::error::Error for LookupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LookupError::SpawnCommand(e) => Some(e),
            LookupError::ParseRelease(e) => Some(e),
            LookupError::CommandFailed(..) => None,
        }
    }
}
