//! Line buffer with half-open ranges
//!
//! Both the build descriptor and the suite files are patched as ordered line
//! sequences. Lines keep their original terminators so that every line outside
//! a patched range is written back byte-for-byte.

use std::ops::Range;

/// Line terminator used for generated lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }

    /// Detect from the first terminated line, defaulting to `\n`
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(pos) if pos > 0 && text.as_bytes()[pos - 1] == b'\r' => LineEnding::CrLf,
            _ => LineEnding::Lf,
        }
    }
}

/// Half-open `[start, end)` range of line indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted line range {}..{}", start, end);
        Self { start, end }
    }

    /// Lines strictly between two boundary lines
    pub fn between(open: usize, close: usize) -> Self {
        Self::new(open + 1, close)
    }

    /// Empty range positioned at `index`
    pub fn at(index: usize) -> Self {
        Self::new(index, index)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Ordered lines of a text file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    /// Raw lines including their terminators
    raw: Vec<String>,
    ending: LineEnding,
}

impl LineBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            raw: text.split_inclusive('\n').map(str::to_string).collect(),
            ending: LineEnding::detect(text),
        }
    }

    pub fn to_text(&self) -> String {
        self.raw.concat()
    }

    pub fn ending(&self) -> LineEnding {
        self.ending
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Line content without its terminator
    pub fn line(&self, index: usize) -> &str {
        strip_terminator(&self.raw[index])
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.raw.iter().map(|l| strip_terminator(l))
    }

    /// Range covering the whole buffer
    pub fn full_range(&self) -> LineRange {
        LineRange::new(0, self.len())
    }

    /// Contents of the lines in `range`
    pub fn slice(&self, range: LineRange) -> Vec<&str> {
        self.raw[range.as_range()]
            .iter()
            .map(|l| strip_terminator(l))
            .collect()
    }

    /// First index in `range` whose line satisfies `pred`
    pub fn find_in<P>(&self, range: LineRange, mut pred: P) -> Option<usize>
    where
        P: FnMut(&str) -> bool,
    {
        range.as_range().find(|&i| pred(self.line(i)))
    }

    /// Last index in `range` whose line satisfies `pred`
    pub fn rfind_in<P>(&self, range: LineRange, mut pred: P) -> Option<usize>
    where
        P: FnMut(&str) -> bool,
    {
        range.as_range().rev().find(|&i| pred(self.line(i)))
    }

    pub fn find<P>(&self, pred: P) -> Option<usize>
    where
        P: FnMut(&str) -> bool,
    {
        self.find_in(self.full_range(), pred)
    }

    /// Replace the lines in `range` with `replacement`, each terminated with
    /// the buffer's line ending. Returns the range now holding the new lines.
    pub fn splice<I>(&mut self, range: LineRange, replacement: I) -> LineRange
    where
        I: IntoIterator<Item = String>,
    {
        let ending = self.ending.as_str();

        // Appending after an unterminated last line would glue the two together
        if range.start == self.raw.len() {
            if let Some(last) = self.raw.last_mut() {
                if !last.ends_with('\n') {
                    last.push_str(ending);
                }
            }
        }

        let new_lines: Vec<String> = replacement
            .into_iter()
            .map(|content| format!("{}{}", content, ending))
            .collect();
        let inserted = new_lines.len();
        self.raw.splice(range.as_range(), new_lines);
        LineRange::new(range.start, range.start + inserted)
    }

    pub fn insert_lines<I>(&mut self, index: usize, lines: I) -> LineRange
    where
        I: IntoIterator<Item = String>,
    {
        self.splice(LineRange::at(index), lines)
    }

    /// Replace one line's content, keeping its terminator
    pub fn replace_line(&mut self, index: usize, content: &str) {
        let terminator = &self.raw[index][strip_terminator(&self.raw[index]).len()..];
        self.raw[index] = format!("{}{}", content, terminator);
    }
}

fn strip_terminator(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
}
