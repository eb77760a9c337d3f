//! Build metadata reported by `multirouted` at startup.

/// Crate version, as published.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

const UNKNOWN: &str = "unknown";

/// Git state captured by `build.rs`.
///
/// Source tarballs carry no repository, so `branch` and `sha` read
/// `"unknown"` there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BuildInfo {
    pub branch: &'static str,
    pub sha: &'static str,
    pub dirty: bool,
}

impl BuildInfo {
    /// Metadata of the running binary.
    pub fn current() -> Self {
        Self {
            branch: option_env!("VERGEN_GIT_BRANCH").unwrap_or(UNKNOWN),
            sha: option_env!("VERGEN_GIT_SHA").unwrap_or(UNKNOWN),
            dirty: option_env!("VERGEN_GIT_DIRTY") == Some("true"),
        }
    }

    /// First seven characters of the commit.
    fn short_sha(&self) -> &'static str {
        self.sha.get(..7).unwrap_or(self.sha)
    }

    /// `{version}+{branch}.{sha}`, with `.dirty` appended for modified trees.
    fn render(&self, version: &str) -> String {
        let dirty = if self.dirty { ".dirty" } else { "" };
        format!("{version}+{}.{}{dirty}", self.branch, self.short_sha())
    }
}

/// Version line logged by the daemon, e.g. `0.1.0+main.abc1234`.
pub fn version_string() -> String {
    BuildInfo::current().render(PKG_VERSION)
}
