pub(crate) const DEFAULT_REPOSITORY: &str = "https://github.com/ur-fault/tmaze";
pub(crate) const DEFAULT_BIN: &str = "tmaze";

/// A tagged release on the repository's GitHub releases page.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Release<'a> {
    repository: &'a str,
    bin: &'a str,
    version: &'a str,
}

impl<'a> Release<'a> {
    pub(crate) fn new(repository: &'a str, bin: &'a str, version: &'a str) -> Self {
        Self {
            repository: repository.trim_end_matches('/'),
            bin,
            version,
        }
    }

    pub(crate) fn repository(&self) -> &'a str {
        self.repository
    }

    pub(crate) fn version(&self) -> &'a str {
        self.version
    }

    pub(crate) fn assets_url(&self) -> String {
        format!("{}/releases/download/{}", self.repository, self.version)
    }

    /// Windows executable asset. The fragment tells Scoop the name to save it under.
    pub(crate) fn download_url(&self) -> String {
        format!(
            "{}/{bin}-{}-win-x86_64.exe#/{bin}.exe",
            self.assets_url(),
            self.version,
            bin = self.bin
        )
    }

    pub(crate) fn scoop_manifest_url(&self) -> String {
        format!("{}/{}.json", self.assets_url(), self.bin)
    }
}
