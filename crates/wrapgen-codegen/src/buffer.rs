//! Line-oriented text buffer for generated C++.

/// Accumulates generated source, one line at a time.
///
/// Lines written with [`CodeBuffer::writeln`] are prefixed with four spaces
/// per indentation level; [`CodeBuffer::push_str`] appends text verbatim.
#[derive(Debug, Default)]
pub struct CodeBuffer {
    output: String,
    indent: usize,
}

impl CodeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Write one line at the current indentation. Empty lines stay empty.
    pub fn writeln(&mut self, line: &str) {
        if !line.is_empty() {
            for _ in 0..self.indent {
                self.output.push_str("    ");
            }
            self.output.push_str(line);
        }
        self.output.push('\n');
    }

    pub fn blank_line(&mut self) {
        self.output.push('\n');
    }

    /// Append already formatted text.
    pub fn push_str(&mut self, text: &str) {
        self.output.push_str(text);
    }

    /// Append `text` as its own line when it is set; used for banners.
    pub fn write_prefix(&mut self, text: Option<&str>) {
        if let Some(text) = text {
            self.output.push_str(text);
            self.output.push('\n');
        }
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    pub fn finish(self) -> String {
        self.output
    }
}
