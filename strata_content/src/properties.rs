//! Ordered `key=value` property files as used by materials and skyboxes.
//!
//! Each line holds one entry. Lines starting with `#` or `!` are comments. In keys and values the
//! characters `\`, `=`, `:`, `#`, `!`, tabs and line breaks are escaped with a backslash. Spaces
//! are escaped in keys and at the start of values.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: Vec<(String, String)>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of `key`. A new key is appended, an existing key keeps its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses the property format. Lines without a separator are keys with an empty value.
    pub fn parse(content: &str) -> Self {
        let mut properties = Self::new();
        for line in content.lines() {
            let line = line.trim_start();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let (key, value) = split_entry(line);
            properties.set(unescape(trim_unescaped_end(key)), unescape(value.trim_start()));
        }
        properties
    }

    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        for (key, value) in &self.entries {
            writeln!(writer, "{}={}", escape(key, true), escape(value, false))?;
        }
        Ok(())
    }

    /// Reads a property file. Fails with [`Error::InvalidAssetData`] when the file isn't UTF-8.
    pub fn read_from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let content = String::from_utf8(bytes).map_err(|_| Error::InvalidAssetData(path.to_owned()))?;
        Ok(Self::parse(&content))
    }

    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Splits at the first unescaped `=` or `:`.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (index, c) in line.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '=' | ':' => return (&line[..index], &line[index + 1..]),
            _ => {}
        }
    }
    (line, "")
}

/// Trims trailing whitespace that isn't escaped.
fn trim_unescaped_end(s: &str) -> &str {
    let mut end = 0;
    let mut escaped = false;
    for (index, c) in s.char_indices() {
        if escaped || !c.is_whitespace() {
            end = index + c.len_utf8();
        }
        escaped = !escaped && c == '\\';
    }
    &s[..end]
}

fn escape(s: &str, is_key: bool) -> String {
    let mut escaped = String::with_capacity(s.len());
    for (index, c) in s.chars().enumerate() {
        match c {
            ' ' if is_key || index == 0 => escaped.push_str("\\ "),
            '\\' => escaped.push_str("\\\\"),
            '=' => escaped.push_str("\\="),
            ':' => escaped.push_str("\\:"),
            '#' => escaped.push_str("\\#"),
            '!' => escaped.push_str("\\!"),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn unescape(s: &str) -> String {
    let mut unescaped = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => unescaped.push('\n'),
            Some('r') => unescaped.push('\r'),
            Some('t') => unescaped.push('\t'),
            Some(other) => unescaped.push(other),
            None => {}
        }
    }
    unescaped
}
