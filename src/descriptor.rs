//! Build descriptor patching
//!
//! Locates the registration block of one suite inside the build descriptor
//! and replaces its lines with the freshly extracted test case names.

use regex::Regex;

use crate::config::{render_template, DescriptorLayout, DescriptorPatchConfig};
use crate::error::{RegistrarError, Result};
use crate::lines::{LineBuffer, LineRange};

/// Result of patching one suite's block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorEdit {
    /// Range now holding the suite's entries
    pub block: LineRange,
    /// A registration block was appended for a previously absent suite
    pub inserted: bool,
    /// The descriptor content differs from before
    pub changed: bool,
}

fn whole_word(stem: &str) -> Result<Regex> {
    Regex::new(&format!(
        r"(?:^|[^A-Za-z0-9_]){}(?:$|[^A-Za-z0-9_])",
        regex::escape(stem)
    ))
    .map_err(|e| RegistrarError::Config {
        message: format!("Invalid suite name {:?}: {}", stem, e),
    })
}

/// Index of the suite's registration anchor.
///
/// The anchor line holds the suite marker and the stem as a whole word. Lines
/// that only mention the stem (source lists, comments) never count.
pub fn find_anchor(buffer: &LineBuffer, stem: &str, suite_marker: &str) -> Result<Option<usize>> {
    let word = whole_word(stem)?;
    Ok(buffer.find(|line| line.contains(suite_marker) && word.is_match(line)))
}

/// Entries strictly between the anchor and the next `)` line
fn inline_block(
    buffer: &LineBuffer,
    anchor: usize,
    config: &DescriptorPatchConfig,
    file: &str,
) -> Result<LineRange> {
    for i in anchor + 1..buffer.len() {
        let line = buffer.line(i);
        if line.contains(config.suite_marker.as_str()) {
            break;
        }
        if line.contains(')') {
            return Ok(LineRange::between(anchor, i));
        }
    }
    Err(RegistrarError::pattern_not_found(")", file))
}

/// Entries strictly between the list marker and the `)` preceding the anchor
fn list_append_block(
    buffer: &LineBuffer,
    anchor: usize,
    config: &DescriptorPatchConfig,
    file: &str,
) -> Result<LineRange> {
    let mut close = None;
    for i in (0..anchor).rev() {
        let line = buffer.line(i);
        if line.contains(config.list_marker.as_str()) {
            return close
                .map(|c| LineRange::between(i, c))
                .ok_or_else(|| RegistrarError::pattern_not_found(")", file));
        }
        if line.contains(config.suite_marker.as_str()) {
            break;
        }
        if close.is_none() && line.contains(')') {
            close = Some(i);
        }
    }
    Err(RegistrarError::pattern_not_found(
        config.list_marker.as_str(),
        file,
    ))
}

/// Range of the suite's entries, if the suite is registered
pub fn locate_block(
    buffer: &LineBuffer,
    stem: &str,
    config: &DescriptorPatchConfig,
    file: &str,
) -> Result<LineRange> {
    let anchor = find_anchor(buffer, stem, &config.suite_marker)?
        .ok_or_else(|| RegistrarError::pattern_not_found(stem, file))?;
    match config.layout {
        DescriptorLayout::Inline => inline_block(buffer, anchor, config, file),
        DescriptorLayout::ListAppend => list_append_block(buffer, anchor, config, file),
    }
}

/// Descriptor lines for `names`
pub fn render_entries(names: &[String], config: &DescriptorPatchConfig) -> Vec<String> {
    names
        .iter()
        .map(|name| format!("{}{}", config.indent, render_template(&config.entry_template, name)))
        .collect()
}

/// Append an empty inline registration block for `stem`
fn append_registration(buffer: &mut LineBuffer, stem: &str, config: &DescriptorPatchConfig) {
    let mut block = Vec::new();
    if buffer
        .lines()
        .last()
        .is_some_and(|last| !last.trim().is_empty())
    {
        block.push(String::new());
    }
    block.push(format!("{}({}", config.suite_marker, stem));
    block.push(")".to_string());
    buffer.insert_lines(buffer.len(), block);
}

/// Replace the suite's registration entries with `names`.
///
/// On error `buffer` is left untouched.
pub fn patch_descriptor(
    buffer: &mut LineBuffer,
    stem: &str,
    names: &[String],
    config: &DescriptorPatchConfig,
    file: &str,
) -> Result<DescriptorEdit> {
    let mut working = buffer.clone();
    let mut inserted = false;

    let registered = find_anchor(&working, stem, &config.suite_marker)?.is_some();
    if !registered && config.insert_missing && config.layout == DescriptorLayout::Inline {
        tracing::info!("Registering new suite {} in {}", stem, file);
        append_registration(&mut working, stem, config);
        inserted = true;
    }

    let block = locate_block(&working, stem, config, file)?;
    let entries = render_entries(names, config);

    let current = working.slice(block);
    let same = current.len() == entries.len()
        && current.iter().zip(&entries).all(|(a, b)| *a == b.as_str());
    if same && !inserted {
        return Ok(DescriptorEdit {
            block,
            inserted,
            changed: false,
        });
    }

    let block = working.splice(block, entries);
    *buffer = working;
    Ok(DescriptorEdit {
        block,
        inserted,
        changed: true,
    })
}
