use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RepositoryUri(String);

impl RepositoryUri {
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Swaps this URI for `mirror`, keeping the trailing slash of the original URI so
    /// that `http://archive.ubuntu.com/ubuntu/` rewritten to a mirror given without one
    /// still reads `http://mirror.example.com/ubuntu/`.
    #[must_use]
    pub fn replace_with(&self, mirror: &RepositoryUri) -> RepositoryUri {
        if self.0.ends_with('/') && !mirror.0.ends_with('/') {
            RepositoryUri(format!("{}/", mirror.0))
        } else {
            mirror.clone()
        }
    }
}

impl From<&str> for RepositoryUri {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RepositoryUri {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for RepositoryUri {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
