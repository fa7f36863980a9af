/// Character cursor over the expression text.
///
/// The cursor owns its character buffer so it can live inside a pooled evaluator:
/// `load` refills the buffer in place and, once warmed up, allocates nothing.
#[derive(Debug, Default)]
pub struct Cursor {
    chars: Vec<char>,
    i: usize,
}

impl Cursor {
    pub fn load(&mut self, s: &str) {
        self.chars.clear();
        self.chars.extend(s.chars());
        self.i = 0;
    }

    /// Drops the text but keeps the buffer's capacity.
    pub fn clear(&mut self) {
        self.chars.clear();
        self.i = 0;
    }

    /// The character under the cursor, `None` at end of input.
    pub fn current(&self) -> Option<char> {
        self.chars.get(self.i).copied()
    }

    /// One character past the current one.
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.i + 1).copied()
    }

    pub fn bump(&mut self) {
        if self.i < self.chars.len() {
            self.i += 1;
        }
    }

    pub fn consume_char(&mut self, c: char) -> bool {
        if self.current() == Some(c) {
            self.i += 1;
            true
        } else {
            false
        }
    }

    pub fn skip_ws(&mut self) {
        while let Some(c) = self.current() {
            if c.is_whitespace() {
                self.i += 1;
            } else {
                break;
            }
        }
    }

    pub fn position(&self) -> usize {
        self.i
    }
}
