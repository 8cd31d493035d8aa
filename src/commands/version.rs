// src/commands/version.rs

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEBUG: &str = env!("VERGEN_CARGO_DEBUG");
const TARGET_TRIPLE: &str = env!("VERGEN_CARGO_TARGET_TRIPLE");
const BUILD_DATE: &str = env!("VERGEN_BUILD_DATE");

fn simplify_target(target: &str) -> String {
    target
        .replace("unknown-", "")
        .replace("-gnu", "")
        .replace("-musl", "")
}

fn make_version_string() -> String {
    let profile = if DEBUG == "true" { "debug" } else { "release" };
    let target = simplify_target(TARGET_TRIPLE);
    // 0.1.0 (release linux-x86_64, built 2026-10-16)
    format!("{VERSION} ({profile} {target}, built {BUILD_DATE})")
}

pub fn version_string() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(make_version_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_is_shortened() {
        assert_eq!(simplify_target("x86_64-unknown-linux-gnu"), "x86_64-linux");
        assert_eq!(simplify_target("aarch64-apple-darwin"), "aarch64-apple-darwin");
    }

    #[test]
    fn version_starts_with_package_version() {
        assert!(version_string().starts_with(VERSION));
    }
}
