//! Build identification for the `mt799` binary and log lines.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Short commit the crate was built from, when built inside a git checkout.
pub fn build_commit() -> Option<&'static str> {
    option_env!("VERGEN_GIT_SHA")
        .filter(|sha| !sha.is_empty())
        .map(|sha| &sha[..7.min(sha.len())])
}

/// Version shown by `mt799 --version`: `0.1.0`, `0.1.0 (abc1234)` or
/// `0.1.0 (abc1234, dirty)`.
pub fn version_string() -> String {
    let dirty = option_env!("VERGEN_GIT_DIRTY") == Some("true");
    format_version(PKG_VERSION, build_commit(), dirty)
}

fn format_version(version: &str, commit: Option<&str>, dirty: bool) -> String {
    match (commit, dirty) {
        (None, _) => version.to_string(),
        (Some(sha), false) => format!("{version} ({sha})"),
        (Some(sha), true) => format!("{version} ({sha}, dirty)"),
    }
}
