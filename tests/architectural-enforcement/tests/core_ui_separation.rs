//! Integration Test: Core/Surface Separation
//!
//! **Policy**: `nextgen-core` is a headless conversation core. It MUST NOT
//! depend on ratatui, crossterm, or any other rendering machinery - that is
//! what makes it reusable from a TUI, a web surface, or a headless test
//! harness alike.

use std::fs;
use std::path::{Path, PathBuf};

/// UI crates the core must never reference
const FORBIDDEN_IN_CORE: &[&str] = &["ratatui", "crossterm"];

fn workspace_root() -> PathBuf {
    // tests/architectural-enforcement -> workspace root
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// Test that the core crate has no UI-framework dependencies
#[test]
fn test_core_has_no_ui_dependencies() {
    let mut violations = Vec::new();

    // Manifest: no UI crates in any dependency table
    let manifest = fs::read_to_string(workspace_root().join("core/Cargo.toml"))
        .expect("core/Cargo.toml is readable");
    for forbidden in FORBIDDEN_IN_CORE {
        if manifest.contains(forbidden) {
            violations.push(format!("core/Cargo.toml mentions `{forbidden}`"));
        }
    }

    // Sources: no UI imports snuck in behind a feature or cfg
    for entry in walkdir::WalkDir::new(workspace_root().join("core/src"))
        .into_iter()
        .filter_map(Result::ok)
    {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("rs") {
            continue;
        }
        let content = fs::read_to_string(entry.path()).expect("source file is readable");
        for (idx, line) in content.lines().enumerate() {
            let code_part = line.split("//").next().unwrap_or(line);
            for forbidden in FORBIDDEN_IN_CORE {
                if code_part.contains(&format!("{forbidden}::"))
                    || code_part.contains(&format!("use {forbidden}"))
                {
                    violations.push(format!(
                        "{}:{}: references `{}`",
                        entry.path().display(),
                        idx + 1,
                        forbidden
                    ));
                }
            }
        }
    }

    assert!(
        violations.is_empty(),
        "UI dependencies found in the conversation core:\n  {}",
        violations.join("\n  ")
    );
}
