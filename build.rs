use std::env;
use std::process::Command;
use time::OffsetDateTime;

// Exposes APP_VERSION_DISPLAY (shown by --version and the GUI header) and APP_BUILD_DATE.
fn main() {
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");
    println!("cargo:rerun-if-env-changed=CARGO_PKG_VERSION");

    let version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());
    let profile = env::var("PROFILE").unwrap_or_default();

    let display = if profile == "release" || on_release_tag(&version) {
        version.clone()
    } else {
        format!("{version}-dev")
    };

    println!("cargo:rustc-env=APP_VERSION_DISPLAY={display}");
    println!("cargo:rustc-env=APP_BUILD_DATE={}", build_date());
}

/// Reproducible builds pin the date through SOURCE_DATE_EPOCH.
fn build_date() -> String {
    let built = env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|raw| raw.parse::<i64>().ok())
        .and_then(|epoch| OffsetDateTime::from_unix_timestamp(epoch).ok())
        .unwrap_or_else(OffsetDateTime::now_utc);
    let date = built.date();
    format!("{}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day())
}

fn on_release_tag(version: &str) -> bool {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/tags");

    Command::new("git")
        .args(["describe", "--tags", "--exact-match"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .is_some_and(|tag| tag.trim() == format!("v{version}"))
}
