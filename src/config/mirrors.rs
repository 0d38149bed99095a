use crate::debian::RepositoryUri;

/// Mirrors to substitute into a sources list. Either may be absent, in which case entries of
/// that kind keep their current uri.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ResolvedMirrors {
    pub primary: Option<RepositoryUri>,
    pub security: Option<RepositoryUri>,
}

impl ResolvedMirrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.security.is_none()
    }
}
