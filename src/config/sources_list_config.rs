use std::fmt::{Display, Formatter};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use toml_edit::{DocumentMut, Item, TableLike};

use crate::config::ConfigError::{
    EmptyValue, InvalidToml, InvalidValueType, ReadConfig, WrongConfigType,
};
use crate::config::ResolvedMirrors;
use crate::debian::RepositoryUri;

const APT_MIRROR_KEY: &str = "apt_mirror";
const APT_PRIMARY_MIRROR_KEY: &str = "apt_primary_mirror";
const APT_SECURITY_MIRROR_KEY: &str = "apt_security_mirror";
const APT_CUSTOM_SOURCES_LIST_KEY: &str = "apt_custom_sources_list";

#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct SourcesListConfig {
    pub apt_mirror: Option<String>,
    pub apt_primary_mirror: Option<String>,
    pub apt_security_mirror: Option<String>,
    pub apt_custom_sources_list: Option<String>,
}

impl SourcesListConfig {
    /// `apt_mirror` is the fallback for both the primary and the security mirror.
    #[must_use]
    pub fn mirrors(&self) -> ResolvedMirrors {
        let mirror = self.apt_mirror.as_deref();
        ResolvedMirrors {
            primary: self
                .apt_primary_mirror
                .as_deref()
                .or(mirror)
                .map(RepositoryUri::from),
            security: self
                .apt_security_mirror
                .as_deref()
                .or(mirror)
                .map(RepositoryUri::from),
        }
    }
}

impl TryFrom<PathBuf> for SourcesListConfig {
    type Error = ConfigError;

    fn try_from(value: PathBuf) -> Result<Self, Self::Error> {
        fs::read_to_string(&value)
            .map_err(|e| ReadConfig(value, e))
            .and_then(|contents| SourcesListConfig::from_str(&contents))
    }
}

impl FromStr for SourcesListConfig {
    type Err = ConfigError;

    fn from_str(contents: &str) -> Result<Self, Self::Err> {
        let doc = DocumentMut::from_str(contents).map_err(InvalidToml)?;
        SourcesListConfig::try_from(doc.as_table() as &dyn TableLike)
    }
}

impl TryFrom<&Item> for SourcesListConfig {
    type Error = ConfigError;

    fn try_from(config_item: &Item) -> Result<Self, Self::Error> {
        config_item
            .as_table_like()
            .ok_or(WrongConfigType(config_item.type_name()))
            .and_then(SourcesListConfig::try_from)
    }
}

// Keys other than the ones read here are ignored so the same document can carry
// configuration for other installer stages.
impl TryFrom<&dyn TableLike> for SourcesListConfig {
    type Error = ConfigError;

    fn try_from(config_item: &dyn TableLike) -> Result<Self, Self::Error> {
        Ok(SourcesListConfig {
            apt_mirror: mirror_value(config_item, APT_MIRROR_KEY)?,
            apt_primary_mirror: mirror_value(config_item, APT_PRIMARY_MIRROR_KEY)?,
            apt_security_mirror: mirror_value(config_item, APT_SECURITY_MIRROR_KEY)?,
            apt_custom_sources_list: string_value(config_item, APT_CUSTOM_SOURCES_LIST_KEY)?,
        })
    }
}

fn string_value(
    config_item: &dyn TableLike,
    key: &'static str,
) -> Result<Option<String>, ConfigError> {
    match config_item.get(key) {
        None | Some(Item::None) => Ok(None),
        Some(item) => item
            .as_str()
            .map(|value| Some(value.to_string()))
            .ok_or(InvalidValueType {
                key,
                found: item.type_name(),
            }),
    }
}

// A blank mirror would rewrite every entry to an empty URI.
fn mirror_value(
    config_item: &dyn TableLike,
    key: &'static str,
) -> Result<Option<String>, ConfigError> {
    match string_value(config_item, key)? {
        Some(value) if value.trim().is_empty() => Err(EmptyValue { key }),
        value => Ok(value),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadConfig(PathBuf, std::io::Error),
    InvalidToml(toml_edit::TomlError),
    WrongConfigType(&'static str),
    InvalidValueType {
        key: &'static str,
        found: &'static str,
    },
    EmptyValue {
        key: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadConfig(path, _) => write!(f, "could not read config file {}", path.display()),
            InvalidToml(_) => write!(f, "config is not valid TOML"),
            WrongConfigType(found) => write!(f, "expected config to be a table, found {found}"),
            InvalidValueType { key, found } => {
                write!(f, "expected `{key}` to be a string, found {found}")
            }
            EmptyValue { key } => write!(f, "expected `{key}` to be a URL, found an empty string"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadConfig(_, e) => Some(e),
            InvalidToml(e) => Some(e),
            WrongConfigType(_) | InvalidValueType { .. } | EmptyValue { .. } => None,
        }
    }
}
