//! Reading, merging and writing `setup.cfg` documents
//!
//! The reader and writer follow Python's `configparser` conventions closely
//! enough that a document produced here reads back identically: `key = value`
//! pairs, continuation lines for multi-line values, and a blank line between
//! sections.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use cow_utils::CowUtils;
use log::{debug, trace};

use crate::errors::{Result, UpgradeError};
use crate::types::RenderedSections;

/// An ordered INI document: sections of ordered `key -> value`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    sections: RenderedSections,
}

impl ConfigDocument {
    pub fn new(sections: RenderedSections) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &RenderedSections {
        &self.sections
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections.get(section)?.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.values().all(|section| section.is_empty())
    }

    /// Read a document from disk, `None` when the file does not exist
    pub fn read(path: &Path) -> Result<Option<Self>> {
        match fs::read_to_string(path) {
            Ok(source) => Self::parse(&source, path).map(Some),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No existing {} to merge", path.display());
                Ok(None)
            }
            Err(err) => Err(UpgradeError::io(path, err)),
        }
    }

    /// Parse INI text. `path` is only used for error messages.
    pub fn parse(source: &str, path: &Path) -> Result<Self> {
        let mut sections = RenderedSections::default();
        let mut current_section: Option<String> = None;
        // Option being read and the indentation of its first line
        let mut current_option: Option<(String, usize)> = None;
        let mut blank_lines = 0usize;

        let malformed = |line: usize, message: &str| UpgradeError::MalformedConfig {
            path: path.to_path_buf(),
            line,
            message: message.to_string(),
        };

        for (index, raw_line) in source.lines().enumerate() {
            let line_number = index + 1;
            let line = raw_line.trim();
            if line.is_empty() {
                if current_option.is_some() {
                    blank_lines += 1;
                }
                continue;
            }
            if line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            let indent = raw_line.len() - raw_line.trim_start().len();
            if let (Some(section), Some((key, option_indent))) = (&current_section, &current_option)
                && indent > *option_indent
                && let Some(value) = sections.get_mut(section).and_then(|s| s.get_mut(key))
            {
                // Blank lines inside a value are kept, trailing ones are not
                for _ in 0..blank_lines {
                    value.push('\n');
                }
                value.push('\n');
                value.push_str(line);
                blank_lines = 0;
                continue;
            }
            blank_lines = 0;
            current_option = None;

            if line.starts_with('[') {
                let Some(end) = line.rfind(']') else {
                    return Err(malformed(line_number, "unterminated section header"));
                };
                let name = &line[1..end];
                if name.is_empty() {
                    return Err(malformed(line_number, "empty section name"));
                }
                trace!("[{name}] at line {line_number}");
                sections.entry(name.to_string()).or_default();
                current_section = Some(name.to_string());
                continue;
            }

            let Some(section) = &current_section else {
                return Err(malformed(line_number, "option found before any section header"));
            };
            let Some(split) = line.find(['=', ':']) else {
                return Err(malformed(line_number, "expected `key = value`"));
            };
            let key = line[..split].trim_end();
            if key.is_empty() {
                return Err(malformed(line_number, "missing option name"));
            }
            let value = line[split + 1..].trim_start();

            sections
                .entry(section.clone())
                .or_default()
                .insert(key.to_string(), value.to_string());
            current_option = Some((key.to_string(), indent));
        }

        Ok(Self { sections })
    }

    /// Carry over every key of `existing` that this document does not set.
    ///
    /// Sections missing here are appended in their original order; keys set
    /// here win over stale values on disk.
    pub fn merge_existing(&mut self, existing: &Self) {
        for (name, section) in &existing.sections {
            for (key, value) in section {
                let target = self.sections.entry(name.clone()).or_default();
                if target.contains_key(key) {
                    debug!("Keeping extracted [{name}] {key}, dropping existing value");
                    continue;
                }
                target.insert(key.clone(), value.clone());
            }
        }
    }

    /// Render the document the way `configparser` writes it, then normalize
    /// whitespace
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, section) in &self.sections {
            if section.is_empty() {
                continue;
            }
            out.push('[');
            out.push_str(name);
            out.push_str("]\n");
            for (key, value) in section {
                out.push_str(key);
                out.push_str(" = ");
                out.push_str(&value.cow_replace('\n', "\n\t"));
                out.push('\n');
            }
            out.push('\n');
        }
        normalize_whitespace(&out)
    }
}

/// Tabs become four spaces, trailing whitespace is stripped from every line,
/// and the document ends with exactly one newline
pub fn normalize_whitespace(text: &str) -> String {
    let expanded = text.cow_replace('\t', "    ");
    let lines: Vec<&str> = expanded.lines().map(str::trim_end).collect();
    let joined = lines.join("\n");
    format!("{}\n", joined.trim())
}
