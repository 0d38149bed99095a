use std::io::stdout;
use std::path::PathBuf;

use anyhow::Context;
use bullet_stream::{style, Print};
use clap::Parser;
use sources_list_renderer::config::SourcesListConfig;
use sources_list_renderer::host::{
    AtomicFileWriter, FixedRelease, FsContentReader, LsbRelease, ReleaseDetector,
};
use sources_list_renderer::SourcesListRenderer;

/// Render the apt sources list of a target root filesystem.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML file with `apt_mirror`, `apt_primary_mirror`, `apt_security_mirror` and
    /// `apt_custom_sources_list` keys. Without it the sources list is written back unchanged.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Root of the filesystem whose `etc/apt/sources.list` is rendered.
    #[arg(long, value_name = "DIR", default_value = "/")]
    target: PathBuf,

    /// Release codename to use instead of asking `lsb_release`.
    #[arg(long, value_name = "CODENAME")]
    release: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match args.config {
        Some(path) => SourcesListConfig::try_from(path.clone())
            .with_context(|| format!("Loading config from {}", path.display()))?,
        None => SourcesListConfig::default(),
    };

    let renderer = SourcesListRenderer::builder()
        .release_detector(release_detector(args.release))
        .content_reader(FsContentReader)
        .file_writer(AtomicFileWriter)
        .build();

    let log = Print::new(stdout()).h2("Apt sources list");
    let log = log
        .bullet(format!(
            "Target {target}",
            target = style::value(args.target.to_string_lossy())
        ))
        .done();

    renderer
        .render(&config, &args.target, log)
        .with_context(|| format!("Rendering sources list under {}", args.target.display()))?;

    Ok(())
}

fn release_detector(release: Option<String>) -> Box<dyn ReleaseDetector> {
    match release {
        Some(codename) => Box::new(FixedRelease(codename)),
        None => Box::new(LsbRelease),
    }
}
