//! `print`/`puts`/`p` for level scripts, all built on a single
//! `printstr` primitive so output can go to the in-game console.

use std::collections::VecDeque;
use std::fmt::{self, Debug, Display, Write as _};

pub const MAX_OUTPUT_LINES: usize = 256;

pub trait PrintSink {
    fn printstr(&mut self, text: &str);
}

impl PrintSink for String {
    fn printstr(&mut self, text: &str) {
        self.push_str(text);
    }
}

/// Script console output. Complete lines are kept in a bounded buffer;
/// text after the last newline stays pending until the line is finished.
#[derive(Debug, Default)]
pub struct ConsoleOutput {
    lines: VecDeque<String>,
    partial_line: String,
}

impl ConsoleOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn partial_line(&self) -> &str {
        &self.partial_line
    }

    pub fn drain_lines_into(&mut self, out: &mut Vec<String>) {
        out.extend(self.lines.drain(..));
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.partial_line.clear();
    }

    fn push_line(&mut self, line: String) {
        if self.lines.len() == MAX_OUTPUT_LINES {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }
}

impl PrintSink for ConsoleOutput {
    fn printstr(&mut self, text: &str) {
        let mut segments = text.split('\n');
        if let Some(first) = segments.next() {
            self.partial_line.push_str(first);
        }
        for segment in segments {
            let finished = std::mem::replace(&mut self.partial_line, segment.to_string());
            self.push_line(finished);
        }
    }
}

/// Writes each argument's display text, with no separator or newline.
pub fn print(sink: &mut impl PrintSink, args: &[&dyn Display]) {
    for arg in args {
        sink.printstr(&arg.to_string());
    }
}

/// Writes each argument on its own line. An argument already ending in a
/// newline gets no second one; no arguments writes a bare newline.
pub fn puts(sink: &mut impl PrintSink, args: &[&dyn Display]) {
    if args.is_empty() {
        sink.printstr("\n");
        return;
    }
    for arg in args {
        let text = arg.to_string();
        sink.printstr(&text);
        if !text.ends_with('\n') {
            sink.printstr("\n");
        }
    }
}

/// Writes the inspect form of each argument followed by a newline and
/// hands back the first argument.
pub fn p<'a, T: Debug>(sink: &mut impl PrintSink, args: &'a [T]) -> Option<&'a T> {
    for arg in args {
        sink.printstr(&format!("{arg:?}"));
        sink.printstr("\n");
    }
    args.first()
}

pub fn printf(sink: &mut impl PrintSink, args: fmt::Arguments<'_>) {
    let mut text = String::new();
    // Writing into a String cannot fail.
    let _ = text.write_fmt(args);
    sink.printstr(&text);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_concatenates_without_newline() {
        let mut out = String::new();
        print(&mut out, &[&"score: ", &1200, &'!']);
        assert_eq!(out, "score: 1200!");
    }

    #[test]
    fn puts_adds_missing_newlines_only() {
        let mut out = String::new();
        puts(&mut out, &[&"one", &"two\n", &3]);
        assert_eq!(out, "one\ntwo\n3\n");

        let mut bare = String::new();
        puts(&mut bare, &[]);
        assert_eq!(bare, "\n");
    }

    #[test]
    fn p_writes_inspect_form_and_returns_first() {
        let mut out = String::new();
        let first = p(&mut out, &["jewel", "box"]);
        assert_eq!(out, "\"jewel\"\n\"box\"\n");
        assert_eq!(first, Some(&"jewel"));

        let none: Option<&u8> = p(&mut out, &[]);
        assert!(none.is_none());
    }

    #[test]
    fn printf_formats_without_newline() {
        let mut out = String::new();
        printf(&mut out, format_args!("{:03}|{}", 7, "x"));
        assert_eq!(out, "007|x");
    }

    #[test]
    fn console_splits_lines_and_keeps_partial() {
        let mut console = ConsoleOutput::new();
        print(&mut console, &[&"hel", &"lo\nwor"]);
        assert_eq!(console.lines().collect::<Vec<_>>(), vec!["hello"]);
        assert_eq!(console.partial_line(), "wor");

        puts(&mut console, &[&"ld"]);
        assert_eq!(console.lines().collect::<Vec<_>>(), vec!["hello", "world"]);
        assert_eq!(console.partial_line(), "");

        let mut drained = Vec::new();
        console.drain_lines_into(&mut drained);
        assert_eq!(drained, vec!["hello", "world"]);
        assert_eq!(console.lines().count(), 0);
    }

    #[test]
    fn console_drops_oldest_lines_when_full() {
        let mut console = ConsoleOutput::new();
        for index in 0..(MAX_OUTPUT_LINES + 5) {
            puts(&mut console, &[&index]);
        }
        let lines: Vec<_> = console.lines().collect();
        assert_eq!(lines.len(), MAX_OUTPUT_LINES);
        assert_eq!(lines[0], "5");

        console.clear();
        assert_eq!(console.lines().count(), 0);
    }
}
