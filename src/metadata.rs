use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::cli::ScoopManifestOptionPackage;

/// Output of `cargo metadata --format-version 1 --no-deps`, reduced to what the manifest needs.
#[derive(Debug, Deserialize)]
pub(crate) struct Metadata {
    packages: Vec<PackageRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct PackageRecord {
    #[serde(default)]
    pub(crate) name: String,
    pub(crate) version: String,
    // `null` when the package sets no description, but the key itself must be present
    #[serde(deserialize_with = "Option::deserialize")]
    pub(crate) description: Option<String>,
}

pub(crate) trait PackageFinder<Option>
where
    Option: ScoopManifestOptionPackage,
{
    fn get_package(&self, option: &Option) -> Result<&PackageRecord>;
}

impl Metadata {
    pub(crate) fn build(manifest_path: Option<&PathBuf>) -> Result<Self> {
        let mut command = cargo_metadata::MetadataCommand::new();
        if let Some(manifest_path) = manifest_path {
            command.manifest_path(manifest_path);
        }
        command.no_deps();

        let mut cargo = command.cargo_command();
        debug!(command = ?cargo, "running cargo metadata");

        let output = cargo.output().context("failed to run `cargo metadata`")?;
        if !output.status.success() {
            bail!(
                "`cargo metadata` exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let stdout = String::from_utf8(output.stdout).context("`cargo metadata` printed invalid UTF-8")?;
        Self::parse(&stdout)
    }

    pub(crate) fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("failed to parse `cargo metadata` output")
    }
}

impl<Option> PackageFinder<Option> for Metadata
where
    Option: ScoopManifestOptionPackage,
{
    fn get_package(&self, option: &Option) -> Result<&PackageRecord> {
        let package = match option.package() {
            Some(name) => self
                .packages
                .iter()
                .find(|package| package.name == name)
                .with_context(|| format!("package {name:?} not found in `cargo metadata` output"))?,
            None => self
                .packages
                .first()
                .context("`cargo metadata` output lists no packages")?,
        };

        debug!(name = %package.name, version = %package.version, "selected package");
        Ok(package)
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    struct Select(Option<&'static str>);

    impl ScoopManifestOptionPackage for Select {
        fn package(&self) -> Option<&str> {
            self.0
        }
    }

    const WORKSPACE: &str = indoc! {r#"
        {
            "packages": [
                {
                    "name": "tmaze",
                    "version": "1.15.0",
                    "description": "Simple multiplatform maze solving game for terminal written entirely in Rust",
                    "license": "GPL-3.0-or-later",
                    "targets": []
                },
                {
                    "name": "cmaze",
                    "version": "0.8.0",
                    "description": "Core of tmaze game"
                }
            ],
            "workspace_members": [],
            "version": 1
        }
    "#};

    #[test]
    fn parses_minimal_document() {
        let metadata = Metadata::parse(r#"{"packages":[{"version":"1.2.3","description":"d"}]}"#).unwrap();
        let package = metadata.get_package(&Select(None)).unwrap();

        assert_eq!(package.version, "1.2.3");
        assert_eq!(package.description.as_deref(), Some("d"));
        assert_eq!(package.name, "");
    }

    #[test]
    fn selects_first_package_by_default() {
        let metadata = Metadata::parse(WORKSPACE).unwrap();
        let package = metadata.get_package(&Select(None)).unwrap();

        assert_eq!(package.name, "tmaze");
        assert_eq!(package.version, "1.15.0");
    }

    #[test]
    fn selects_package_by_name() {
        let metadata = Metadata::parse(WORKSPACE).unwrap();
        let package = metadata.get_package(&Select(Some("cmaze"))).unwrap();

        assert_eq!(package.version, "0.8.0");
        assert_eq!(package.description.as_deref(), Some("Core of tmaze game"));
    }

    #[test]
    fn unknown_package_is_an_error() {
        let metadata = Metadata::parse(WORKSPACE).unwrap();
        let error = metadata.get_package(&Select(Some("tlua"))).unwrap_err();

        assert!(error.to_string().contains("\"tlua\""));
    }

    #[test]
    fn empty_package_list_is_an_error() {
        let metadata = Metadata::parse(r#"{"packages":[]}"#).unwrap();

        assert!(metadata.get_package(&Select(None)).is_err());
    }

    #[test]
    fn missing_description_is_an_error() {
        assert!(Metadata::parse(r#"{"packages":[{"version":"1.2.3"}]}"#).is_err());
    }

    #[test]
    fn null_description_is_accepted() {
        let metadata =
            Metadata::parse(r#"{"packages":[{"name":"x","version":"1.2.3","description":null}]}"#).unwrap();
        let package = metadata.get_package(&Select(None)).unwrap();

        assert_eq!(package.description, None);
    }

    #[test]
    fn malformed_output_is_an_error() {
        assert!(Metadata::parse("error: could not find `Cargo.toml`").is_err());
        assert!(Metadata::parse(r#"{"workspace_members":[]}"#).is_err());
    }
}
