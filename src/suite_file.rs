//! Test suite file patching
//!
//! Each suite file carries a dispatch function mapping a command-line test
//! name to the matching test function. The lines between the dispatch
//! function's signature and its terminating `return` are regenerated.

use crate::config::{render_template, DispatchStyle, SuitePatchConfig, TEST_PLACEHOLDER};
use crate::error::{RegistrarError, Result};
use crate::extract::{find_anonymous_namespace, find_function_definition, tokenize};
use crate::lines::{LineBuffer, LineRange};

/// Result of patching one suite file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuiteFileEdit {
    /// Range now holding the dispatch lines
    pub block: LineRange,
    /// Dispatch scaffolding was generated because the file had none
    pub synthesized: bool,
    /// The file content differs from before
    pub changed: bool,
}

/// Lines strictly between the entry point and its terminating return
pub fn locate_dispatch_block(
    buffer: &LineBuffer,
    style: DispatchStyle,
    file: &str,
) -> Result<LineRange> {
    let entry = buffer
        .find(|line| line.contains(style.entry_marker()))
        .ok_or_else(|| RegistrarError::pattern_not_found(style.entry_marker(), file))?;
    let terminator = buffer
        .find_in(LineRange::new(entry + 1, buffer.len()), |line| {
            line.contains(style.terminator())
        })
        .ok_or_else(|| RegistrarError::pattern_not_found(style.terminator(), file))?;
    Ok(LineRange::between(entry, terminator))
}

/// Dispatch lines for `names`
pub fn render_dispatch(names: &[String], config: &SuitePatchConfig) -> Vec<String> {
    names
        .iter()
        .map(|name| format!("{}{}", config.indent, render_template(&config.dispatch_template, name)))
        .collect()
}

/// Test names currently dispatched by the suite file, in order
pub fn parse_dispatch_block(
    buffer: &LineBuffer,
    config: &SuitePatchConfig,
    file: &str,
) -> Result<Vec<String>> {
    let block = locate_dispatch_block(buffer, config.style, file)?;
    let (before, after) = config
        .dispatch_template
        .split_once(TEST_PLACEHOLDER)
        .unwrap_or((config.dispatch_template.as_str(), ""));

    Ok(buffer
        .slice(block)
        .into_iter()
        .filter_map(|line| {
            line.trim()
                .strip_prefix(before.trim_start())?
                .strip_suffix(after.trim_end())
                .map(str::to_string)
        })
        .collect())
}

fn default_dispatch_function(config: &SuitePatchConfig) -> Vec<String> {
    vec![
        format!("{} -> bool {{", DispatchStyle::ByName.entry_marker()),
        format!("{}{};", config.indent, DispatchStyle::ByName.terminator()),
        "}".to_string(),
        String::new(),
    ]
}

fn suite_entry_point(stem: &str, config: &SuitePatchConfig) -> Vec<String> {
    let indent = &config.indent;
    vec![
        String::new(),
        format!("auto {}(std::string const& test_case) -> int {{", stem),
        format!("{}if (run_tests(test_case)) {{", indent),
        format!("{}{}return 1;", indent, indent),
        format!("{}}}", indent),
        format!("{}return 0;", indent),
        "}".to_string(),
    ]
}

/// Generate the namespace anchor, default dispatch function and per-suite
/// entry point for a file that has no dispatch function yet
fn synthesize(
    buffer: &mut LineBuffer,
    stem: &str,
    config: &SuitePatchConfig,
    file: &str,
) -> Result<()> {
    let text = buffer.to_text();
    let tokens = tokenize(&text);
    let anchor = config.namespace_anchor.as_str();

    let namespace_close = match buffer.find(|line| line.trim() == anchor.trim()) {
        Some(index) => index,
        None => {
            let (_, close_line) = find_anonymous_namespace(&tokens)
                .ok_or_else(|| RegistrarError::pattern_not_found("namespace {", file))?;
            let index = close_line - 1;
            if buffer.line(index).trim() != "}" {
                return Err(RegistrarError::pattern_not_found(anchor, file));
            }
            buffer.replace_line(index, anchor);
            index
        }
    };

    // The generated entry point replaces a standalone main()
    if let Some((first, last)) = find_function_definition(&tokens, "int", "main") {
        let mut start = first - 1;
        if start > namespace_close {
            while start > namespace_close + 1 && buffer.line(start - 1).trim().is_empty() {
                start -= 1;
            }
            tracing::debug!("Removing legacy main() from {}", file);
            buffer.splice(LineRange::new(start, last), Vec::new());
        }
    }

    let entry_prefix = format!("auto {}(", stem);
    if buffer
        .find(|line| line.trim_start().starts_with(&entry_prefix))
        .is_none()
    {
        buffer.insert_lines(namespace_close + 1, suite_entry_point(stem, config));
    }

    buffer.insert_lines(namespace_close, default_dispatch_function(config));
    Ok(())
}

/// Replace the suite file's dispatch lines with one line per name.
///
/// On error `buffer` is left untouched.
pub fn patch_suite_file(
    buffer: &mut LineBuffer,
    stem: &str,
    names: &[String],
    config: &SuitePatchConfig,
    file: &str,
) -> Result<SuiteFileEdit> {
    let mut working = buffer.clone();
    let mut synthesized = false;

    if config.synthesize
        && config.style == DispatchStyle::ByName
        && working.find(|line| line.contains(config.style.entry_marker())).is_none()
    {
        tracing::info!("Generating dispatch scaffolding in {}", file);
        synthesize(&mut working, stem, config, file)?;
        synthesized = true;
    }

    let block = locate_dispatch_block(&working, config.style, file)?;
    let lines = render_dispatch(names, config);

    let current = working.slice(block);
    let same = current.len() == lines.len()
        && current.iter().zip(&lines).all(|(a, b)| *a == b.as_str());
    if same && !synthesized {
        return Ok(SuiteFileEdit {
            block,
            synthesized,
            changed: false,
        });
    }

    let block = working.splice(block, lines);
    *buffer = working;
    Ok(SuiteFileEdit {
        block,
        synthesized,
        changed: true,
    })
}
