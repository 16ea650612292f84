//! Enforces the no-blocking-sleep rule.
//!
//! The engine is cooperatively scheduled: every cadence is a timer in
//! the driver's select loop, and every deadline is an `Instant`
//! comparison. A blocking sleep anywhere in production code would stall
//! all of them at once.

use std::fs;
use std::path::Path;

use architectural_enforcement::core_src;

#[test]
fn no_sleep_in_production_code() {
    let root = core_src();
    assert!(root.exists(), "engine source tree not found at {root:?}");

    let mut violations = Vec::new();
    for entry in walkdir::WalkDir::new(&root)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.path().extension().and_then(|s| s.to_str()) == Some("rs") {
            check_file(entry.path(), &mut violations);
        }
    }

    assert!(
        violations.is_empty(),
        "blocking sleep found in production code:\n  {}",
        violations.join("\n  ")
    );
}

fn check_file(path: &Path, violations: &mut Vec<String>) {
    let Ok(content) = fs::read_to_string(path) else {
        return;
    };
    let lines: Vec<&str> = content.lines().collect();

    for (idx, line) in lines.iter().enumerate() {
        let code = line.split("//").next().unwrap_or(line);
        if !(code.contains("::sleep(") || code.contains(".sleep(")) {
            continue;
        }
        // tokio::time::sleep is cooperative, not blocking.
        if code.contains("tokio::time::sleep") {
            continue;
        }
        if in_test_code(&lines, idx) {
            continue;
        }
        violations.push(format!("{}:{}: {}", path.display(), idx + 1, line.trim()));
    }
}

/// Whether the line sits below a `#[cfg(test)]` module header
fn in_test_code(lines: &[&str], idx: usize) -> bool {
    lines[..idx]
        .iter()
        .any(|l| l.trim_start().starts_with("#[cfg(test)]"))
}
