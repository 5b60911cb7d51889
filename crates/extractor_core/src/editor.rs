//! Keystroke-level editing rules for the schema text area.
//!
//! Everything here is a pure function of `(text, selection, key)`: the new
//! buffer and the new caret are computed together, so the host applies both
//! in one step. Offsets are byte offsets into the buffer; callers holding
//! offsets from elsewhere get them clamped onto char boundaries.

/// Indentation unit inserted by Tab and removed by Shift+Tab.
pub const INDENT: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Collapsed selection (a plain caret).
    pub fn caret(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Orders the endpoints and pulls them into `[0, text.len()]`, snapping
    /// down to the nearest char boundary.
    pub fn clamped(self, text: &str) -> Self {
        let (lo, hi) = if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        };
        Self::new(floor_char_boundary(text, lo), floor_char_boundary(text, hi))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Enter,
    /// Any key the editor does not intercept.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub shift: bool,
}

impl KeyEvent {
    pub const fn tab() -> Self {
        Self {
            key: Key::Tab,
            shift: false,
        }
    }

    pub const fn shift_tab() -> Self {
        Self {
            key: Key::Tab,
            shift: true,
        }
    }

    pub const fn enter() -> Self {
        Self {
            key: Key::Enter,
            shift: false,
        }
    }

    pub const fn other() -> Self {
        Self {
            key: Key::Other,
            shift: false,
        }
    }
}

/// New buffer contents plus the collapsed caret position inside them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub text: String,
    pub cursor: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The key was handled: replace the buffer and collapse the selection.
    Replace(TextEdit),
    /// The key was handled but leaves buffer and selection untouched
    /// (Shift+Tab on a line without indentation).
    Consumed,
    /// Not an editor key; the host text input applies its default behaviour.
    PassThrough,
}

/// Applies one key press to `text` with the given selection.
pub fn apply_key(text: &str, selection: Selection, key: KeyEvent) -> EditOutcome {
    let selection = selection.clamped(text);
    match key.key {
        Key::Tab if key.shift => outdent(text, selection.start)
            .map(EditOutcome::Replace)
            .unwrap_or(EditOutcome::Consumed),
        Key::Tab => EditOutcome::Replace(replace_selection(text, selection, INDENT)),
        Key::Enter => EditOutcome::Replace(newline_keeping_indent(text, selection.start)),
        Key::Other => EditOutcome::PassThrough,
    }
}

/// Replaces the selected range with `insert`, leaving the caret after it.
///
/// This is also the host's default input behaviour for printable text.
pub fn replace_selection(text: &str, selection: Selection, insert: &str) -> TextEdit {
    let selection = selection.clamped(text);
    let mut out = String::with_capacity(text.len() + insert.len());
    out.push_str(&text[..selection.start]);
    out.push_str(insert);
    out.push_str(&text[selection.end..]);
    TextEdit {
        text: out,
        cursor: selection.start + insert.len(),
    }
}

/// Number of lines shown in the editor gutter. An empty buffer has one line.
pub fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

fn outdent(text: &str, at: usize) -> Option<TextEdit> {
    let start = line_start(text, at);
    if !text[start..].starts_with(INDENT) {
        return None;
    }

    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..start]);
    out.push_str(&text[start + INDENT.len()..]);
    Some(TextEdit {
        text: out,
        cursor: at.saturating_sub(INDENT.len()).max(start),
    })
}

fn newline_keeping_indent(text: &str, at: usize) -> TextEdit {
    let start = line_start(text, at);
    let indent_len = text[start..at]
        .bytes()
        .take_while(|byte| matches!(byte, b' ' | b'\t'))
        .count();
    let indent = &text[start..start + indent_len];

    let mut out = String::with_capacity(text.len() + 1 + indent_len);
    out.push_str(&text[..at]);
    out.push('\n');
    out.push_str(indent);
    out.push_str(&text[at..]);
    TextEdit {
        text: out,
        cursor: at + 1 + indent_len,
    }
}

fn line_start(text: &str, at: usize) -> usize {
    text[..at].rfind('\n').map_or(0, |idx| idx + 1)
}

fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Schema text plus the host's current selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaBuffer {
    text: String,
    selection: Selection,
}

impl SchemaBuffer {
    /// Creates a buffer with the caret at the end of `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let selection = Selection::caret(text.len());
        Self { text, selection }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn line_count(&self) -> usize {
        line_count(&self.text)
    }

    /// Replaces the whole buffer, as the host does after its own default edit.
    pub fn replace(&mut self, text: impl Into<String>, selection: Selection) {
        self.text = text.into();
        self.selection = selection.clamped(&self.text);
    }

    pub fn select(&mut self, selection: Selection) {
        self.selection = selection.clamped(&self.text);
    }

    /// Default text input: replaces the selection with `insert`.
    pub fn insert(&mut self, insert: &str) {
        let edit = replace_selection(&self.text, self.selection, insert);
        self.apply(edit);
    }

    /// Runs `key` through the editing rules at `selection`.
    ///
    /// Returns `false` when the key is not an editor key and should be left
    /// to the host.
    pub fn handle_key(&mut self, selection: Selection, key: KeyEvent) -> bool {
        self.select(selection);
        match apply_key(&self.text, self.selection, key) {
            EditOutcome::Replace(edit) => {
                self.apply(edit);
                true
            }
            EditOutcome::Consumed => true,
            EditOutcome::PassThrough => false,
        }
    }

    fn apply(&mut self, edit: TextEdit) {
        self.text = edit.text;
        self.selection = Selection::caret(edit.cursor);
    }
}
