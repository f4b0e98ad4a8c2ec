use std::{fs::File, io::stdout, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use self::release::Release;
use crate::{cli::bufwrite, metadata::PackageRecord};

pub(crate) mod release;

pub(crate) const CHECKVER_JSONPATH: &str = "$.version";
pub(crate) const CHECKVER_URL_TEMPLATE: &str = "{scoop_manifest}";

/// What goes into `architecture.checkver.url`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum CheckverUrl {
    /// The uninterpolated `{scoop_manifest}` template, as the release scripts have always emitted it.
    #[default]
    Literal,
    Interpolated,
}

/// Scoop app manifest. Field order is the order keys are written in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ScoopManifest {
    pub(crate) version: String,
    pub(crate) architecture: Architecture,
    pub(crate) description: Option<String>,
    pub(crate) homepage: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Architecture {
    #[serde(rename = "64bit")]
    pub(crate) x86_64: Download,
    pub(crate) checkver: Checkver,
    pub(crate) autoupdate: AutoUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Download {
    pub(crate) url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Checkver {
    pub(crate) url: String,
    pub(crate) jsonpath: String,
}

// Serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct AutoUpdate {}

pub(crate) trait ManifestDocument {
    fn render(&self) -> Result<String>;
    fn print(&self) -> Result<()>;
    fn write(&self, path: &Path) -> Result<()>;
}

impl ScoopManifest {
    pub(crate) fn build(package: &PackageRecord, release: &Release, checkver: CheckverUrl) -> Self {
        let download_url = release.download_url();
        let scoop_manifest = release.scoop_manifest_url();
        debug!(%download_url, %scoop_manifest, "building manifest");

        let checkver_url = match checkver {
            CheckverUrl::Literal => CHECKVER_URL_TEMPLATE.to_string(),
            CheckverUrl::Interpolated => scoop_manifest,
        };

        Self {
            version: release.version().to_string(),
            architecture: Architecture {
                x86_64: Download { url: download_url },
                checkver: Checkver {
                    url: checkver_url,
                    jsonpath: CHECKVER_JSONPATH.to_string(),
                },
                autoupdate: AutoUpdate::default(),
            },
            description: package.description.clone(),
            homepage: release.repository().to_string(),
        }
    }
}

impl ManifestDocument for ScoopManifest {
    fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer).context("failed to serialize manifest")?;

        let mut text = escape_non_ascii(&String::from_utf8(buffer)?);
        text.push('\n');
        Ok(text)
    }

    fn print(&self) -> Result<()> {
        let stdout = stdout();
        bufwrite(stdout, self.render()?)?;
        Ok(())
    }

    fn write(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("failed to create {:?}", path))?;
        bufwrite(file, self.render()?)?;
        Ok(())
    }
}

/// Writes every non-ASCII character as a `\uXXXX` escape (surrogate pairs outside the BMP).
/// Only string contents can hold such characters, so the document stays valid JSON.
fn escape_non_ascii(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii() {
            escaped.push(ch);
            continue;
        }

        let mut units = [0; 2];
        for unit in ch.encode_utf16(&mut units) {
            escaped.push_str(&format!("\\u{unit:04x}"));
        }
    }
    escaped
}
