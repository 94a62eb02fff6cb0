//! Deletion of rotated log files past their retention window.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use crate::error::Result;

/// Turn a strftime file pattern into a wildcard glob (`demo.%Y%m%d.log` -> `demo.*.log`)
pub fn pattern_to_glob(pattern: &str) -> String {
    let mut glob = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            glob.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => glob.push('%'),
            // modifiers like %-d, %:z or %.3f
            Some('-') | Some('_') | Some('0') | Some(':') | Some('.') => {
                while chars.peek().is_some_and(|c| c.is_ascii_digit()) {
                    chars.next();
                }
                chars.next();
                push_star(&mut glob);
            }
            Some(_) => push_star(&mut glob),
            None => glob.push('%'),
        }
    }
    glob
}

fn push_star(glob: &mut String) {
    if !glob.ends_with('*') {
        glob.push('*');
    }
}

/// Match a name against a glob where `*` is the only wildcard
pub fn glob_matches(glob: &str, name: &str) -> bool {
    let parts: Vec<&str> = glob.split('*').collect();
    if parts.len() == 1 {
        return glob == name;
    }

    let first = parts[0];
    let last = parts[parts.len() - 1];
    if !name.starts_with(first) || name.len() < first.len() + last.len() {
        return false;
    }
    if !name[first.len()..].ends_with(last) {
        return false;
    }

    let mut rest = &name[first.len()..name.len() - last.len()];
    for part in &parts[1..parts.len() - 1] {
        match rest.find(part) {
            Some(pos) => rest = &rest[pos + part.len()..],
            None => return false,
        }
    }
    true
}

/// Remove files in `dir` whose name matches `glob` and whose modification
/// time is before `cutoff`. `keep` is never removed.
///
/// Returns the number of files deleted.
pub fn cleanup_expired(dir: &Path, glob: &str, cutoff: SystemTime, keep: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut deleted_count = 0;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path == keep {
            continue;
        }

        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if glob_matches(glob, name) => {}
            _ => continue,
        }

        if let Ok(metadata) = entry.metadata() {
            if !metadata.is_file() {
                continue;
            }
            if let Ok(modified) = metadata.modified() {
                if modified < cutoff && fs::remove_file(&path).is_ok() {
                    deleted_count += 1;
                }
            }
        }
    }

    Ok(deleted_count)
}
