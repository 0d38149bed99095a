use std::io::Write;
use std::path::Path;

use bon::Builder;
use bullet_stream::state::Bullet;
use bullet_stream::{style, Print};
use toml_edit::Item;

use crate::config::{ResolvedMirrors, SourcesListConfig};
use crate::debian::SourcesList;
use crate::host::{
    AtomicFileWriter, ContentReader, FileWriter, FsContentReader, LsbRelease, ReleaseDetector,
};
use crate::template::render_template;
use crate::RenderError;

/// Location of the sources list, relative to the target root.
pub const SOURCES_LIST_PATH: &str = "etc/apt/sources.list";

pub const SOURCES_LIST_MODE: u32 = 0o644;

type Result<T> = std::result::Result<T, RenderError>;

/// Renders `<target_root>/etc/apt/sources.list`.
///
/// With `apt_custom_sources_list` configured the template is rendered and the existing file is
/// never read. Otherwise the existing file is read, its entries are pointed at the configured
/// mirrors, and the result is written back. The file is written exactly once either way, even
/// when nothing changed.
#[derive(Debug, Builder)]
pub struct SourcesListRenderer<D, R, W> {
    release_detector: D,
    content_reader: R,
    file_writer: W,
}

impl SourcesListRenderer<LsbRelease, FsContentReader, AtomicFileWriter> {
    #[must_use]
    pub fn system() -> Self {
        SourcesListRenderer::builder()
            .release_detector(LsbRelease)
            .content_reader(FsContentReader)
            .file_writer(AtomicFileWriter)
            .build()
    }
}

impl<D, R, W> SourcesListRenderer<D, R, W>
where
    D: ReleaseDetector,
    R: ContentReader,
    W: FileWriter,
{
    /// Validates a raw config item before rendering. A config that isn't a table, or has a
    /// non-string mirror value, fails before any file is touched.
    pub fn render_item<O>(
        &self,
        config: &Item,
        target_root: &Path,
        log: Print<Bullet<O>>,
    ) -> Result<Print<Bullet<O>>>
    where
        O: Write + Send + Sync + 'static,
    {
        let config = SourcesListConfig::try_from(config)?;
        self.render(&config, target_root, log)
    }

    pub fn render<O>(
        &self,
        config: &SourcesListConfig,
        target_root: &Path,
        log: Print<Bullet<O>>,
    ) -> Result<Print<Bullet<O>>>
    where
        O: Write + Send + Sync + 'static,
    {
        let sources_list_path = target_root.join(SOURCES_LIST_PATH);
        let mirrors = config.mirrors();

        let (contents, log) = match &config.apt_custom_sources_list {
            Some(template) => self.render_custom_sources_list(template, &mirrors, log)?,
            None => self.rewrite_sources_list(&sources_list_path, &mirrors, log)?,
        };

        let write_log = log.bullet(format!(
            "Writing {path}",
            path = style::value(sources_list_path.to_string_lossy())
        ));
        self.file_writer
            .write_file(&sources_list_path, &contents, SOURCES_LIST_MODE)
            .map_err(|e| RenderError::WriteSourcesList(sources_list_path.clone(), e))?;

        Ok(write_log
            .sub_bullet(format!("Mode {SOURCES_LIST_MODE:o}"))
            .done())
    }

    fn render_custom_sources_list<O>(
        &self,
        template: &str,
        mirrors: &ResolvedMirrors,
        log: Print<Bullet<O>>,
    ) -> Result<(String, Print<Bullet<O>>)>
    where
        O: Write + Send + Sync + 'static,
    {
        let mut template_log = log.bullet("Rendering custom sources list");

        let release = self.release_detector.detect_release()?;
        template_log = template_log.sub_bullet(format!(
            "Release {release}",
            release = style::value(release.to_string())
        ));

        let rendered = render_template(template, mirrors, &release);
        for token in &rendered.empty_tokens {
            template_log = template_log.sub_bullet(format!(
                "No mirror configured for {token}, it was rendered as an empty string",
                token = style::value(token.to_string())
            ));
        }

        Ok((rendered.text, template_log.done()))
    }

    fn rewrite_sources_list<O>(
        &self,
        sources_list_path: &Path,
        mirrors: &ResolvedMirrors,
        log: Print<Bullet<O>>,
    ) -> Result<(String, Print<Bullet<O>>)>
    where
        O: Write + Send + Sync + 'static,
    {
        let mut rewrite_log = log.bullet(format!(
            "Reading {path}",
            path = style::value(sources_list_path.to_string_lossy())
        ));

        let contents = self
            .content_reader
            .read_source(sources_list_path)
            .map_err(|e| RenderError::ReadSourcesList(sources_list_path.to_path_buf(), e))
            .and_then(|bytes| {
                String::from_utf8(bytes)
                    .map_err(|e| RenderError::DecodeSourcesList(sources_list_path.to_path_buf(), e))
            })?;

        if mirrors.is_empty() {
            rewrite_log = rewrite_log.sub_bullet("No mirrors configured, keeping sources as-is");
            return Ok((contents, rewrite_log.done()));
        }

        for (label, mirror) in [("Primary", &mirrors.primary), ("Security", &mirrors.security)] {
            if let Some(mirror) = mirror {
                rewrite_log = rewrite_log.sub_bullet(format!(
                    "{label} mirror {url}",
                    url = style::url(mirror.as_str())
                ));
            }
        }

        let sources_list = SourcesList::parse(&contents);
        let rewritten = sources_list.clone().rewrite_mirrors(mirrors);
        let updated_entries = sources_list
            .entries()
            .zip(rewritten.entries())
            .filter(|(before, after)| before.uri() != after.uri())
            .count();
        rewrite_log = rewrite_log.sub_bullet(format!("Updated {updated_entries} source entries"));

        Ok((rewritten.to_string(), rewrite_log.done()))
    }
}
