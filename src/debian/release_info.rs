use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ReleaseInfo {
    pub codename: String,
    pub distributor_id: Option<String>,
    pub description: Option<String>,
    pub release: Option<String>,
}

impl ReleaseInfo {
    #[must_use]
    pub fn from_codename(codename: impl Into<String>) -> Self {
        ReleaseInfo {
            codename: codename.into(),
            distributor_id: None,
            description: None,
            release: None,
        }
    }
}

impl Display for ReleaseInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.codename)
    }
}

// Parses the `Key:<tab>Value` report printed by `lsb_release --all`, e.g.;
//
//   Distributor ID: Ubuntu
//   Description:    Ubuntu 16.04 LTS
//   Release:        16.04
//   Codename:       xenial
impl FromStr for ReleaseInfo {
    type Err = ParseReleaseInfoError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut codename = None;
        let mut distributor_id = None;
        let mut description = None;
        let mut release = None;

        for (key, field_value) in value.lines().filter_map(|line| line.split_once(':')) {
            let field_value = field_value.trim();
            // `lsb_release` prints `n/a` for fields the distribution doesn't set.
            if field_value.is_empty() || field_value.eq_ignore_ascii_case("n/a") {
                continue;
            }
            let field_value = Some(field_value.to_string());
            match key.trim() {
                "Codename" => codename = field_value,
                "Distributor ID" => distributor_id = field_value,
                "Description" => description = field_value,
                "Release" => release = field_value,
                _ => {}
            }
        }

        codename
            .map(|codename| ReleaseInfo {
                codename,
                distributor_id,
                description,
                release,
            })
            .ok_or(ParseReleaseInfoError::MissingCodename)
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum ParseReleaseInfoError {
    MissingCodename,
}

impl Display for ParseReleaseInfoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseReleaseInfoError::MissingCodename => write!(f, "no release codename reported"),
        }
    }
}

impl std::error::Error for ParseReleaseInfoError {}
