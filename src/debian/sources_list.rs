use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::config::ResolvedMirrors;
use crate::debian::SourceEntry;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SourceLine {
    Blank(String),
    Comment(String),
    Entry(SourceEntry),
    Unrecognized(String),
}

impl SourceLine {
    fn parse(line: &str) -> SourceLine {
        let content = line.trim_start();
        if content.trim_end().is_empty() {
            SourceLine::Blank(line.to_string())
        } else if content.starts_with('#') {
            SourceLine::Comment(line.to_string())
        } else {
            SourceEntry::from_str(line).map_or_else(
                |_| SourceLine::Unrecognized(line.to_string()),
                SourceLine::Entry,
            )
        }
    }
}

impl Display for SourceLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceLine::Blank(line)
            | SourceLine::Comment(line)
            | SourceLine::Unrecognized(line) => write!(f, "{line}"),
            SourceLine::Entry(entry) => write!(f, "{entry}"),
        }
    }
}

/// The contents of a one-line-style `sources.list` file.
///
/// Parsing never fails. Lines that don't look like a `deb` or `deb-src` entry are kept as
/// [`SourceLine::Unrecognized`] so that writing the list back out reproduces the original text.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SourcesList {
    lines: Vec<SourceLine>,
}

impl SourcesList {
    #[must_use]
    pub fn parse(value: &str) -> SourcesList {
        SourcesList {
            lines: value.split('\n').map(SourceLine::parse).collect(),
        }
    }

    #[must_use]
    pub fn lines(&self) -> &[SourceLine] {
        &self.lines
    }

    pub fn entries(&self) -> impl Iterator<Item = &SourceEntry> {
        self.lines.iter().filter_map(|line| match line {
            SourceLine::Entry(entry) => Some(entry),
            _ => None,
        })
    }

    /// Points every entry at the resolved mirrors. Security entries take the security mirror,
    /// everything else takes the primary mirror. Entries with no matching mirror are left as-is.
    #[must_use]
    pub fn rewrite_mirrors(self, mirrors: &ResolvedMirrors) -> SourcesList {
        let lines = self
            .lines
            .into_iter()
            .map(|line| match line {
                SourceLine::Entry(entry) => {
                    let mirror = if entry.is_security() {
                        mirrors.security.as_ref()
                    } else {
                        mirrors.primary.as_ref()
                    };
                    match mirror {
                        Some(mirror) => {
                            let uri = entry.uri().replace_with(mirror);
                            SourceLine::Entry(entry.with_uri(uri))
                        }
                        None => SourceLine::Entry(entry),
                    }
                }
                other => other,
            })
            .collect();
        SourcesList { lines }
    }
}

impl FromStr for SourcesList {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(SourcesList::parse(value))
    }
}

impl Display for SourcesList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, line) in self.lines.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{line}")?;
        }
        Ok(())
    }
}
