use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::config::ResolvedMirrors;
use crate::debian::{ReleaseInfo, RepositoryUri};

// `\b` keeps `$MIRROR` from matching the front of a longer name like `$MIRRORED`.
const TOKEN_PATTERN: &str = r"\$(MIRROR|PRIMARY|SECURITY|RELEASE)\b";

fn token_regex() -> &'static Regex {
    static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
    TOKEN_REGEX.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("token pattern should compile"))
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TemplateToken {
    Mirror,
    Primary,
    Security,
    Release,
}

impl TemplateToken {
    // Only ever called with a name captured by `TOKEN_PATTERN`.
    fn from_capture(name: &str) -> Self {
        match name {
            "MIRROR" => TemplateToken::Mirror,
            "PRIMARY" => TemplateToken::Primary,
            "SECURITY" => TemplateToken::Security,
            _ => TemplateToken::Release,
        }
    }

    fn resolve<'a>(
        self,
        mirrors: &'a ResolvedMirrors,
        release: &'a ReleaseInfo,
    ) -> Option<&'a str> {
        match self {
            TemplateToken::Mirror | TemplateToken::Primary => {
                mirrors.primary.as_ref().map(RepositoryUri::as_str)
            }
            TemplateToken::Security => mirrors.security.as_ref().map(RepositoryUri::as_str),
            TemplateToken::Release => Some(release.codename.as_str()),
        }
    }
}

impl Display for TemplateToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateToken::Mirror => write!(f, "$MIRROR"),
            TemplateToken::Primary => write!(f, "$PRIMARY"),
            TemplateToken::Security => write!(f, "$SECURITY"),
            TemplateToken::Release => write!(f, "$RELEASE"),
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
pub struct RenderedTemplate {
    pub text: String,
    /// Tokens that appeared in the template but had no value, in order of first use.
    pub empty_tokens: Vec<TemplateToken>,
}

/// Substitutes `$MIRROR`, `$PRIMARY`, `$SECURITY` and `$RELEASE` in a custom sources list.
///
/// `$MIRROR` and `$PRIMARY` both expand to the primary mirror. A token without a value expands
/// to an empty string and is reported in [`RenderedTemplate::empty_tokens`]. Anything else that
/// looks like a token (e.g.; `$MIRRORED`, `$ARCH`) is left exactly as written.
#[must_use]
pub fn render_template(
    template: &str,
    mirrors: &ResolvedMirrors,
    release: &ReleaseInfo,
) -> RenderedTemplate {
    let mut empty_tokens = vec![];
    let text = token_regex()
        .replace_all(template, |captures: &Captures<'_>| {
            let token = TemplateToken::from_capture(&captures[1]);
            match token.resolve(mirrors, release) {
                Some(value) => value.to_string(),
                None => {
                    if !empty_tokens.contains(&token) {
                        empty_tokens.push(token);
                    }
                    String::new()
                }
            }
        })
        .into_owned();

    RenderedTemplate { text, empty_tokens }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn archive_mirrors() -> ResolvedMirrors {
        let mirror = RepositoryUri::from("http://archive.ubuntu.com/ubuntu");
        ResolvedMirrors {
            primary: Some(mirror.clone()),
            security: Some(mirror),
        }
    }

    #[test]
    fn substitutes_mirror_and_release() {
        let rendered = render_template(
            "deb $MIRROR $RELEASE main",
            &archive_mirrors(),
            &ReleaseInfo::from_codename("fakerel"),
        );
        assert_eq!(
            rendered.text,
            "deb http://archive.ubuntu.com/ubuntu fakerel main"
        );
        assert!(rendered.empty_tokens.is_empty());
    }

    #[test]
    fn substitutes_full_template_and_keeps_comments() {
        let template = indoc! { "

            ## Note, this file is written by the installer at install time. It should not end
            ## up on the installed system itself.
            #
            # See http://help.ubuntu.com/community/UpgradeNotes for how to upgrade to
            # newer versions of the distribution.
            deb $MIRROR $RELEASE main restricted
            deb-src $MIRROR $RELEASE main restricted
            deb $PRIMARY $RELEASE universe restricted
            deb $SECURITY $RELEASE-security multiverse
            # FIND_SOMETHING_SPECIAL
        " };
        let rendered = render_template(
            template,
            &archive_mirrors(),
            &ReleaseInfo::from_codename("fakerel"),
        );
        assert_eq!(
            rendered.text,
            indoc! { "

                ## Note, this file is written by the installer at install time. It should not end
                ## up on the installed system itself.
                #
                # See http://help.ubuntu.com/community/UpgradeNotes for how to upgrade to
                # newer versions of the distribution.
                deb http://archive.ubuntu.com/ubuntu fakerel main restricted
                deb-src http://archive.ubuntu.com/ubuntu fakerel main restricted
                deb http://archive.ubuntu.com/ubuntu fakerel universe restricted
                deb http://archive.ubuntu.com/ubuntu fakerel-security multiverse
                # FIND_SOMETHING_SPECIAL
            " }
        );
    }

    #[test]
    fn tokens_do_not_match_inside_longer_names() {
        let rendered = render_template(
            "$MIRRORED $MIRROR_URL $RELEASES $ARCH $MIRROR/ubuntu",
            &archive_mirrors(),
            &ReleaseInfo::from_codename("jammy"),
        );
        assert_eq!(
            rendered.text,
            "$MIRRORED $MIRROR_URL $RELEASES $ARCH http://archive.ubuntu.com/ubuntu/ubuntu"
        );
    }

    #[test]
    fn missing_mirrors_render_empty() {
        let rendered = render_template(
            indoc! { "
                deb $MIRROR $RELEASE main
                deb $SECURITY $RELEASE-security main
                deb $PRIMARY $RELEASE universe
            " },
            &ResolvedMirrors::default(),
            &ReleaseInfo::from_codename("jammy"),
        );
        assert_eq!(
            rendered.text,
            "deb  jammy main\ndeb  jammy-security main\ndeb  jammy universe\n"
        );
        assert_eq!(
            rendered.empty_tokens,
            [
                TemplateToken::Mirror,
                TemplateToken::Security,
                TemplateToken::Primary
            ]
        );
    }

    #[test]
    fn substitution_is_not_recursive() {
        let mirrors = ResolvedMirrors {
            primary: Some(RepositoryUri::from("http://example.com/$RELEASE")),
            security: None,
        };
        let rendered = render_template(
            "deb $MIRROR $RELEASE main",
            &mirrors,
            &ReleaseInfo::from_codename("jammy"),
        );
        assert_eq!(rendered.text, "deb http://example.com/$RELEASE jammy main");
    }

    #[test]
    fn every_captured_name_maps_to_its_token() {
        let tokens: Vec<TemplateToken> = token_regex()
            .captures_iter("$MIRROR $PRIMARY $SECURITY $RELEASE")
            .map(|captures| TemplateToken::from_capture(&captures[1]))
            .collect();
        assert_eq!(
            tokens,
            [
                TemplateToken::Mirror,
                TemplateToken::Primary,
                TemplateToken::Security,
                TemplateToken::Release
            ]
        );
    }

    #[test]
    fn display_template_token() {
        assert_eq!(TemplateToken::Security.to_string(), "$SECURITY");
    }
}
