//! Rebuilds the block structure of a multi-line macro from trimmed lines.

const INDENT_UNIT: usize = 4;

/// Nesting depth of `if`/`while`/`sub` blocks inside a macro.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndentTracker {
    depth: usize,
}

impl IndentTracker {
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn open_block(&mut self) {
        self.depth += 1;
    }

    /// Closing at depth zero is a no-op.
    pub fn close_block(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.depth = 0;
    }

    pub fn prefix(&self) -> String {
        " ".repeat(self.depth * INDENT_UNIT)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MacroAccumulator {
    body: String,
    indent: IndentTracker,
}

impl MacroAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn depth(&self) -> usize {
        self.indent.depth()
    }

    /// Appends one trimmed, non-empty line.
    pub fn push_line(&mut self, line: &str) {
        let Some(line) = strip_quotes(line) else {
            return;
        };

        if line.starts_with("end") {
            self.indent.close_block();
        }

        if !self.body.is_empty() {
            self.body.push('\n');
        }
        self.body.push_str(&self.indent.prefix());
        self.body.push_str(line);

        if ["if", "while", "sub"].iter().any(|kw| line.starts_with(kw)) {
            self.indent.open_block();
        }
    }

    /// Hands back the finished body and resets for the next macro.
    pub fn take(&mut self) -> String {
        self.indent.reset();
        std::mem::take(&mut self.body)
    }
}

/// Quotes around macro lines are optional, so one leading and one trailing
/// quote are dropped. `None` when nothing is left.
fn strip_quotes(line: &str) -> Option<&str> {
    let Some(rest) = line.strip_prefix('"') else {
        return Some(line);
    };
    let rest = rest.trim();
    if rest.is_empty() {
        return None;
    }
    Some(rest.strip_suffix('"').unwrap_or(rest))
}
