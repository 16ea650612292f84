//! Enforces the synchronous-core boundary.
//!
//! The engine modules are plain synchronous state machines so they can
//! be tested without a runtime. Only the cadence driver and the binary
//! are allowed to reference tokio.

use std::fs;

use architectural_enforcement::core_src;

const ASYNC_ALLOWED: &[&str] = &["driver.rs", "deskpet-headless.rs"];

#[test]
fn engine_core_does_not_reference_the_async_runtime() {
    let root = core_src();
    assert!(root.exists(), "engine source tree not found at {root:?}");

    let mut violations = Vec::new();
    for entry in walkdir::WalkDir::new(&root)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("rs") {
            continue;
        }
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        if ASYNC_ALLOWED.contains(&name) {
            continue;
        }
        let Ok(content) = fs::read_to_string(path) else {
            continue;
        };
        for (idx, line) in content.lines().enumerate() {
            let code = line.split("//").next().unwrap_or(line);
            if code.contains("tokio::") || code.contains("use tokio") {
                violations.push(format!("{}:{}: {}", path.display(), idx + 1, line.trim()));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "async runtime referenced outside the driver:\n  {}",
        violations.join("\n  ")
    );
}
