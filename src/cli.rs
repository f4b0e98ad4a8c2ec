use std::{io::{BufWriter, Write}, path::PathBuf};

use anyhow::Result;
use clap::{Args, Parser};

use crate::{
    manifest::{
        release::{Release, DEFAULT_BIN, DEFAULT_REPOSITORY},
        CheckverUrl, ManifestDocument, ScoopManifest,
    },
    metadata::{Metadata, PackageFinder},
};

#[derive(Debug, Parser)]
#[command(name = "cargo")]
#[command(bin_name = "cargo")]
#[command(styles = clap_cargo::style::CLAP_STYLING)]
pub enum Command {
    ScoopManifest(ScoopManifestOption),
}

/// Print a Scoop manifest for the Windows release of the package's current version
#[derive(Debug, Args)]
#[command(version)]
pub struct ScoopManifestOption {
    /// Path to Cargo.toml
    #[arg(long, value_name = "PATH")]
    manifest_path: Option<PathBuf>,

    /// Package to describe (defaults to the first package in the metadata)
    #[arg(long, short = 'p', value_name = "SPEC")]
    package: Option<String>,

    /// Repository whose GitHub releases host the executable, also used as the homepage
    #[arg(long, value_name = "URL", default_value = DEFAULT_REPOSITORY)]
    repository: String,

    /// Base name of the release executable
    #[arg(long, value_name = "NAME", default_value = DEFAULT_BIN)]
    bin: String,

    /// Write the release's manifest URL to checkver.url instead of the literal `{scoop_manifest}`
    #[arg(long)]
    interpolate_checkver: bool,

    /// Write the manifest to a file instead of stdout
    #[arg(long, short = 'o', value_name = "PATH")]
    output: Option<PathBuf>,
}

pub(crate) trait ScoopManifestOptionManifest {
    fn manifest_path(&self) -> Option<&PathBuf>;
}

pub(crate) trait ScoopManifestOptionPackage {
    fn package(&self) -> Option<&str>;
}

pub(crate) trait ScoopManifestOptionRelease {
    fn repository(&self) -> &str;
    fn bin(&self) -> &str;
    fn checkver(&self) -> CheckverUrl;
}

pub(crate) trait ScoopManifestOptionOutput {
    fn output(&self) -> Option<&PathBuf>;
}

impl ScoopManifestOptionManifest for ScoopManifestOption {
    fn manifest_path(&self) -> Option<&PathBuf> {
        self.manifest_path.as_ref()
    }
}

impl ScoopManifestOptionPackage for ScoopManifestOption {
    fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }
}

impl ScoopManifestOptionRelease for ScoopManifestOption {
    fn repository(&self) -> &str {
        &self.repository
    }

    fn bin(&self) -> &str {
        &self.bin
    }

    fn checkver(&self) -> CheckverUrl {
        if self.interpolate_checkver {
            CheckverUrl::Interpolated
        } else {
            CheckverUrl::Literal
        }
    }
}

impl ScoopManifestOptionOutput for ScoopManifestOption {
    fn output(&self) -> Option<&PathBuf> {
        self.output.as_ref()
    }
}

pub(crate) fn execute() -> Result<()> {
    let Command::ScoopManifest(ref option) = Command::parse();

    let metadata = Metadata::build(option.manifest_path())?;
    let package = metadata.get_package(option)?;

    let release = Release::new(option.repository(), option.bin(), &package.version);
    let manifest = ScoopManifest::build(package, &release, option.checkver());

    match option.output() {
        Some(path) => manifest.write(path)?,
        None => manifest.print()?,
    }

    Ok(())
}

pub(crate) fn bufwrite(inner: impl Write, content: impl Into<String>) -> Result<()> {
    let mut buffer = BufWriter::new(inner);
    write!(buffer, "{}", content.into())?;
    buffer.flush()?;

    Ok(())
}
