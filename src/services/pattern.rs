//! Report Pattern Resolution
//!
//! Turns a tool's raw include pattern into concrete files:
//! 1. runs of tabs and line breaks collapse to one space
//! 2. `$VAR` / `${VAR}` are expanded from the run environment
//! 3. the result is split into includes on commas and whitespace
//! 4. each include is globbed relative to the workspace

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};

use xunit_core::{CoreError, CoreResult};

static MACRO_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
static BREAKS_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

fn compiled(
    cell: &'static OnceLock<Result<Regex, regex::Error>>,
    pattern: &str,
) -> CoreResult<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern))
        .as_ref()
        .map_err(|e| CoreError::internal(format!("Invalid built-in pattern: {}", e)))
}

/// Collapse runs of `\t`, `\r` and `\n` into a single space.
pub fn normalize(raw: &str) -> CoreResult<String> {
    let re = compiled(&BREAKS_RE, r"[\t\r\n]+")?;
    Ok(re.replace_all(raw, " ").into_owned())
}

/// Replace `$VAR` and `${VAR}` with values from `env`.
///
/// Unknown variables are left as written.
pub fn expand_macros(input: &str, env: &HashMap<String, String>) -> CoreResult<String> {
    let re = compiled(
        &MACRO_RE,
        r"\$\{([A-Za-z_][A-Za-z0-9_.]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)",
    )?;
    let expanded = re.replace_all(input, |caps: &Captures<'_>| {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();
        match env.get(name) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        }
    });
    Ok(expanded.into_owned())
}

/// Normalize then expand a raw tool pattern.
pub fn resolve_pattern(raw: &str, env: &HashMap<String, String>) -> CoreResult<String> {
    let normalized = normalize(raw)?;
    expand_macros(&normalized, env)
}

/// Split a resolved pattern into its includes.
pub fn split_includes(pattern: &str) -> Vec<String> {
    pattern
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Every regular file matching any include, sorted and de-duplicated.
pub fn find_files(base: &Path, pattern: &str) -> CoreResult<Vec<PathBuf>> {
    let mut found = BTreeSet::new();
    for include in split_includes(pattern) {
        let include_path = Path::new(&include);
        let pattern_str = if include_path.is_absolute() {
            include.clone()
        } else {
            // The base is a literal path, only the include is a pattern
            let escaped = glob::Pattern::escape(&base.to_string_lossy());
            Path::new(&escaped).join(include_path).to_string_lossy().into_owned()
        };
        let paths = glob::glob(&pattern_str).map_err(|e| {
            CoreError::config(format!("Invalid glob pattern '{}': {}", include, e))
        })?;
        for path in paths.filter_map(|r| r.ok()) {
            if path.is_file() {
                found.insert(path);
            }
        }
    }
    Ok(found.into_iter().collect())
}
