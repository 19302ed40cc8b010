//! Gradle settings script reading
//!
//! Extracts `include` directives and `rootProject.name` from
//! `settings.gradle.kts` or `settings.gradle`. This is pattern matching over
//! the script text, not an evaluation of it: includes computed at runtime
//! (e.g. by the Flutter plugin loader) are invisible here and have to be
//! listed in `[project].modules`.

use once_cell::sync::Lazy;
use outdir_core::error::{Error, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings script names, Kotlin DSL first
pub const SETTINGS_FILES: [&str; 2] = ["settings.gradle.kts", "settings.gradle"];

/// `include(":a", ":b")`, possibly spanning lines
static INCLUDE_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\binclude\s*\(([^)]*)\)").unwrap());

/// Groovy `include ':a', ':b'`
static INCLUDE_BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)\binclude[ \t]+((?:["'][^"'\n]*["'][ \t]*,?[ \t]*)+)"#).unwrap());

static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#"["']([^"'\n]*)["']"#).unwrap());

static ROOT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\brootProject\.name\s*=\s*["']([^"'\n]+)["']"#).unwrap());

/// What a settings script declares
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Script the values came from
    pub path: Option<PathBuf>,
    /// `rootProject.name`, when set
    pub root_name: Option<String>,
    /// Included project paths in declaration order, without duplicates
    pub includes: Vec<String>,
}

impl Settings {
    /// Parse script text
    pub fn parse(source: &str) -> Self {
        let source = strip_comments(source);

        let mut found: Vec<(usize, String)> = Vec::new();
        for caps in INCLUDE_CALL.captures_iter(&source) {
            let args = caps.get(1).map_or("", |m| m.as_str());
            let start = caps.get(0).map_or(0, |m| m.start());
            found.extend(quoted(args).map(|p| (start, p)));
        }
        for caps in INCLUDE_BARE.captures_iter(&source) {
            let args = caps.get(1).map_or("", |m| m.as_str());
            let start = caps.get(0).map_or(0, |m| m.start());
            found.extend(quoted(args).map(|p| (start, p)));
        }
        found.sort_by_key(|(start, _)| *start);

        let mut includes: Vec<String> = Vec::new();
        for (_, path) in found {
            if !includes.contains(&path) {
                includes.push(path);
            }
        }

        let root_name = ROOT_NAME
            .captures(&source)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());

        Self {
            path: None,
            root_name,
            includes,
        }
    }

    /// Read and parse a settings script
    pub fn load(path: &Path) -> Result<Self> {
        let source =
            std::fs::read_to_string(path).map_err(|e| Error::settings_parse(path, e.to_string()))?;
        let mut settings = Self::parse(&source);
        settings.path = Some(path.to_path_buf());
        debug!(
            path = %path.display(),
            includes = settings.includes.len(),
            "parsed gradle settings"
        );
        Ok(settings)
    }
}

/// First settings script present in `project_dir`
pub fn find_settings_file(project_dir: &Path) -> Option<PathBuf> {
    SETTINGS_FILES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|path| path.is_file())
}

fn quoted(args: &str) -> impl Iterator<Item = String> + '_ {
    QUOTED
        .captures_iter(args)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|p| !p.is_empty())
}

/// Drop `//` and `/* */` comments, leaving string literals alone
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
            }
            _ => out.push(c),
        }
    }
    out
}
