use std::fmt::{Display, Formatter};
use std::iter;
use std::str::FromStr;

use crate::debian::RepositoryUri;

const SECURITY_SUITE_MARKER: &str = "-security";

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SourceKind {
    Deb,
    DebSrc,
}

impl SourceKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Deb => "deb",
            SourceKind::DebSrc => "deb-src",
        }
    }
}

impl FromStr for SourceKind {
    type Err = ParseSourceEntryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "deb" => Ok(SourceKind::Deb),
            "deb-src" => Ok(SourceKind::DebSrc),
            _ => Err(ParseSourceEntryError::UnknownKind(value.to_string())),
        }
    }
}

impl Display for SourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// NOTE: This follows the one-line-style format described at
//       https://manpages.ubuntu.com/manpages/jammy/man5/sources.list.5.html#one-line-style%20format
//
//       deb [ option1=value1 option2=value2 ] uri suite [component1] [component2] [...]
//
//       The whitespace around every field is recorded while parsing so an entry that isn't
//       modified serializes back to exactly the line it was read from.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SourceEntry {
    kind: SourceKind,
    options: Option<String>,
    uri: RepositoryUri,
    suite: String,
    components: Vec<String>,
    comment: Option<String>,
    separators: Vec<String>,
    trailing: String,
}

impl SourceEntry {
    #[must_use]
    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    #[must_use]
    pub fn options(&self) -> Option<&str> {
        self.options.as_deref()
    }

    #[must_use]
    pub fn uri(&self) -> &RepositoryUri {
        &self.uri
    }

    #[must_use]
    pub fn suite(&self) -> &str {
        &self.suite
    }

    #[must_use]
    pub fn components(&self) -> &[String] {
        &self.components
    }

    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Entries whose suite names a security pocket (e.g.; `jammy-security`).
    #[must_use]
    pub fn is_security(&self) -> bool {
        self.suite.contains(SECURITY_SUITE_MARKER)
    }

    #[must_use]
    pub fn with_uri(self, uri: RepositoryUri) -> SourceEntry {
        SourceEntry { uri, ..self }
    }

    fn fields(&self) -> impl Iterator<Item = &str> {
        iter::once(self.kind.as_str())
            .chain(self.options.as_deref())
            .chain([self.uri.as_str(), self.suite.as_str()])
            .chain(self.components.iter().map(String::as_str))
            .chain(self.comment.as_deref())
    }
}

impl FromStr for SourceEntry {
    type Err = ParseSourceEntryError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (fields, trailing) = split_fields(line)?;
        let mut separators = Vec::with_capacity(fields.len());
        let mut fields = fields.into_iter().peekable();

        let (separator, kind) = fields.next().ok_or(ParseSourceEntryError::MissingKind)?;
        separators.push(separator);
        let kind = SourceKind::from_str(&kind)?;

        let options = match fields.next_if(|(_, field)| field.starts_with('[')) {
            Some((separator, options)) => {
                separators.push(separator);
                Some(options)
            }
            None => None,
        };

        let (separator, uri) = fields
            .next_if(|(_, field)| !field.starts_with('#'))
            .ok_or(ParseSourceEntryError::MissingUri)?;
        separators.push(separator);

        let (separator, suite) = fields
            .next_if(|(_, field)| !field.starts_with('#'))
            .ok_or(ParseSourceEntryError::MissingSuite)?;
        separators.push(separator);

        let mut components = vec![];
        let mut comment = None;
        for (separator, field) in fields {
            separators.push(separator);
            if field.starts_with('#') {
                comment = Some(field);
            } else {
                components.push(field);
            }
        }

        Ok(SourceEntry {
            kind,
            options,
            uri: RepositoryUri::from(uri),
            suite,
            components,
            comment,
            separators,
            trailing,
        })
    }
}

impl Display for SourceEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (separator, field) in self.separators.iter().zip(self.fields()) {
            write!(f, "{separator}{field}")?;
        }
        write!(f, "{}", self.trailing)
    }
}

// Splits a line into `(leading whitespace, field)` pairs plus whitespace trailing the last
// field. Bracketed option lists and trailing comments are kept as single fields even though
// they can contain whitespace.
fn split_fields(line: &str) -> Result<(Vec<(String, String)>, String), ParseSourceEntryError> {
    let mut fields = vec![];
    let mut rest = line;
    loop {
        let field_start = rest.trim_start();
        let separator = &rest[..rest.len() - field_start.len()];
        if field_start.is_empty() {
            return Ok((fields, separator.to_string()));
        }

        let field_len = if field_start.starts_with('#') {
            field_start.trim_end().len()
        } else if field_start.starts_with('[') {
            field_start
                .find(']')
                .map(|end| end + 1)
                .ok_or(ParseSourceEntryError::UnterminatedOptions)?
        } else {
            field_start
                .find(char::is_whitespace)
                .unwrap_or(field_start.len())
        };

        fields.push((
            separator.to_string(),
            field_start[..field_len].to_string(),
        ));
        rest = &field_start[field_len..];
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum ParseSourceEntryError {
    MissingKind,
    UnknownKind(String),
    UnterminatedOptions,
    MissingUri,
    MissingSuite,
}

impl Display for ParseSourceEntryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseSourceEntryError::MissingKind => write!(f, "empty source entry"),
            ParseSourceEntryError::UnknownKind(kind) => {
                write!(f, "unknown source type `{kind}`, expected `deb` or `deb-src`")
            }
            ParseSourceEntryError::UnterminatedOptions => {
                write!(f, "option list is missing a closing `]`")
            }
            ParseSourceEntryError::MissingUri => write!(f, "source entry has no uri"),
            ParseSourceEntryError::MissingSuite => write!(f, "source entry has no suite"),
        }
    }
}

impl std::error::Error for ParseSourceEntryError {}
