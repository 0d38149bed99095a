//! Renders into a scratch target root with the filesystem reader and the atomic writer.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::str::FromStr;

use bullet_stream::state::Bullet;
use bullet_stream::Print;
use indoc::indoc;
use sources_list_renderer::config::SourcesListConfig;
use sources_list_renderer::host::{AtomicFileWriter, FixedRelease, FsContentReader};
use sources_list_renderer::{RenderError, SourcesListRenderer, SOURCES_LIST_PATH};
use tempfile::TempDir;

const EXISTING_SOURCES: &str = indoc! { "

    deb http://archive.ubuntu.com/ubuntu/ notouched main restricted
    deb-src http://archive.ubuntu.com/ubuntu/ notouched main restricted
    deb http://archive.ubuntu.com/ubuntu/ notouched-updates main restricted
    deb http://security.ubuntu.com/ubuntu notouched-security main restricted
" };

fn target_with_sources(contents: &str) -> TempDir {
    let target = tempfile::tempdir().unwrap();
    let sources_list = target.path().join(SOURCES_LIST_PATH);
    fs::create_dir_all(sources_list.parent().unwrap()).unwrap();
    fs::write(sources_list, contents).unwrap();
    target
}

fn render(config: &str, target: &Path) -> Result<String, RenderError> {
    let renderer = SourcesListRenderer::builder()
        .release_detector(FixedRelease("fakerel".to_string()))
        .content_reader(FsContentReader)
        .file_writer(AtomicFileWriter)
        .build();
    let log: Print<Bullet<Vec<u8>>> = Print::new(Vec::new()).h2("Apt sources list");

    renderer.render(
        &SourcesListConfig::from_str(config).unwrap(),
        target,
        log,
    )?;

    let sources_list = target.join(SOURCES_LIST_PATH);
    assert_eq!(
        fs::metadata(&sources_list).unwrap().permissions().mode() & 0o777,
        0o644
    );
    Ok(fs::read_to_string(sources_list).unwrap())
}

#[test]
fn test_empty_config_keeps_sources() {
    let target = target_with_sources(EXISTING_SOURCES);
    assert_eq!(render("", target.path()).unwrap(), EXISTING_SOURCES);
}

#[test]
fn test_primary_and_security_mirrors() {
    let target = target_with_sources(EXISTING_SOURCES);
    let config = indoc! { r#"
        apt_primary_mirror = "http://test.archive.ubuntu.com/ubuntu"
        apt_security_mirror = "http://test.security.ubuntu.com/ubuntu"
    "# };
    assert_eq!(
        render(config, target.path()).unwrap(),
        indoc! { "

            deb http://test.archive.ubuntu.com/ubuntu/ notouched main restricted
            deb-src http://test.archive.ubuntu.com/ubuntu/ notouched main restricted
            deb http://test.archive.ubuntu.com/ubuntu/ notouched-updates main restricted
            deb http://test.security.ubuntu.com/ubuntu notouched-security main restricted
        " }
    );
}

#[test]
fn test_custom_sources_list() {
    let target = tempfile::tempdir().unwrap();
    let config = indoc! { r#"
        apt_mirror = "http://archive.ubuntu.com/ubuntu"
        apt_custom_sources_list = """

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
        """
    "# };
    assert_eq!(
        render(config, target.path()).unwrap(),
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
fn test_missing_sources_list() {
    let target = tempfile::tempdir().unwrap();
    match render(r#"apt_mirror = "http://test.archive.ubuntu.com/ubuntu""#, target.path()) {
        Err(RenderError::ReadSourcesList(path, _)) => {
            assert_eq!(path, target.path().join(SOURCES_LIST_PATH));
        }
        Err(e) => panic!("Not the expected error - {e:?}"),
        Ok(_) => panic!("Expected reading the sources list to fail"),
    }
    assert!(!target.path().join(SOURCES_LIST_PATH).exists());
}
