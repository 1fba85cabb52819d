/// Build-time git commit SHA stamped by build.rs when available.
pub fn git_sha() -> Option<&'static str> {
    option_env!("AGENDA_BUILD_GIT_SHA")
}

/// Long version string for `agenda --version`: crate version plus commit.
pub fn long_version() -> String {
    match git_sha() {
        Some(sha) => format!("{} ({})", env!("CARGO_PKG_VERSION"), sha),
        None => env!("CARGO_PKG_VERSION").to_string(),
    }
}
