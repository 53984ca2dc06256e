//! Append-only program text buffer.

/// Growable G-code text, one command or comment per line.
#[derive(Debug, Clone, Default)]
pub struct ProgramBuffer {
    text: String,
}

impl ProgramBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text; embedded newlines become separate lines.
    ///
    /// Blank lines inside the text are kept, so `line("")` writes an empty
    /// line. A single trailing line break does not add one.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        let text = text.strip_suffix('\n').unwrap_or(text);
        for line in text.split('\n') {
            self.text.push_str(line.strip_suffix('\r').unwrap_or(line));
            self.text.push('\n');
        }
    }

    /// Append text produced by a state change, if any
    pub fn push(&mut self, text: Option<String>) {
        if let Some(text) = text {
            self.line(text);
        }
    }

    /// Append a `;` comment line. Line breaks in `text` become spaces.
    pub fn comment(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref().replace(['\r', '\n'], " ");
        self.line(format!("; {}", text));
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Finished program, with every non-ASCII character replaced by `?`
    pub fn into_ascii(self) -> String {
        if self.text.is_ascii() {
            return self.text;
        }
        self.text
            .chars()
            .map(|c| if c.is_ascii() { c } else { '?' })
            .collect()
    }
}
