//! Integration Test: Blocking Sleep Prohibition
//!
//! **Policy**: Reply timing is the one piece of real machinery in this
//! system, and it lives on the tokio clock. Production code MUST NOT use
//! `std::thread::sleep` - it would stall the event loop, freeze rendering,
//! and make the timing contract untestable under a paused clock.
//! **Required**: `tokio::time::sleep(...).await`

use std::fs;
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// Test that production code contains no blocking sleeps
#[test]
fn test_no_blocking_sleep_in_production_code() {
    let mut violations = Vec::new();

    for dir in ["core/src", "tui/src"] {
        check_directory(&workspace_root().join(dir), &mut violations);
    }

    if !violations.is_empty() {
        for violation in &violations {
            eprintln!("  blocking sleep: {violation}");
        }
        panic!(
            "Found {} blocking sleep call(s) in production code. Use tokio::time::sleep instead.",
            violations.len()
        );
    }
}

fn check_directory(dir: &Path, violations: &mut Vec<String>) {
    for entry in walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
    {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("rs") {
            continue;
        }
        let content = match fs::read_to_string(entry.path()) {
            Ok(c) => c,
            Err(_) => continue,
        };

        for (idx, line) in content.lines().enumerate() {
            // Skip comments
            let code_part = line.split("//").next().unwrap_or(line);

            if code_part.contains("std::thread::sleep") || code_part.contains("thread::sleep(") {
                violations.push(format!("{}:{}", entry.path().display(), idx + 1));
            }
        }
    }
}
