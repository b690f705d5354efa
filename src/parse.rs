use std::{fmt, ops::Range};

/// Control operator (or end of input) that halted the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `<`
    Input,
    /// `>`
    Output,
    /// `|`
    Pipe,
    /// `&`, recognized as a terminator but never executed
    Background,
    /// End of the buffer or a NUL byte
    End,
}

impl Operator {
    pub fn is_redirect(self) -> bool {
        matches!(self, Operator::Input | Operator::Output)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Input => write!(f, "<"),
            Operator::Output => write!(f, ">"),
            Operator::Pipe => write!(f, "|"),
            Operator::Background => write!(f, "&"),
            Operator::End => write!(f, "end of input"),
        }
    }
}

/// One subcommand as found by [`LineBuffer::parse`].
///
/// `args` are spans into the buffer the segment was parsed from; resolve them
/// with [`LineBuffer::word`] or [`LineBuffer::words`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub args: Vec<Range<usize>>,
    /// Position of the byte that halted scanning.
    pub next: usize,
    pub operator: Operator,
}

impl Segment {
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

fn is_token_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'-' | b'.' | b'"' | b'/' | b'_')
}

/// The bytes of one input line.
///
/// Parsing is destructive: separators are overwritten with NUL as the cursor
/// passes them, so a buffer is only good for a single line.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    bytes: Vec<u8>,
}

impl LineBuffer {
    pub fn new(line: &str) -> Self {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let line = line.strip_suffix('\r').unwrap_or(line);
        Self {
            bytes: line.as_bytes().to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Classifies the byte at `pos`. Anything that is not an operator and not
    /// the end of input yields `None`.
    pub fn operator_at(&self, pos: usize) -> Option<Operator> {
        match self.bytes.get(pos) {
            None | Some(b'\0') => Some(Operator::End),
            Some(b'<') => Some(Operator::Input),
            Some(b'>') => Some(Operator::Output),
            Some(b'|') => Some(Operator::Pipe),
            Some(b'&') => Some(Operator::Background),
            Some(_) => None,
        }
    }

    /// Scans the next subcommand starting at `pos`.
    ///
    /// Stops at the first control operator or at the end of input; the
    /// returned segment points at that byte.
    pub fn parse(&mut self, mut pos: usize) -> Segment {
        let mut args = Vec::new();

        let operator = loop {
            // skip separators, terminating each one in place
            while let Some(&c) = self.bytes.get(pos) {
                if is_token_char(c) || self.operator_at(pos).is_some() {
                    break;
                }
                self.bytes[pos] = b'\0';
                pos += 1;
            }

            if let Some(op) = self.operator_at(pos) {
                break op;
            }

            let start = pos;
            while self.bytes.get(pos).is_some_and(|&c| is_token_char(c)) {
                pos += 1;
            }
            args.push(start..pos);
        };

        Segment {
            args,
            next: pos,
            operator,
        }
    }

    /// Token characters are ASCII, so every span is valid UTF-8.
    pub fn word(&self, span: &Range<usize>) -> &str {
        std::str::from_utf8(&self.bytes[span.clone()]).unwrap_or_default()
    }

    pub fn words<'a>(&'a self, spans: &[Range<usize>]) -> Vec<&'a str> {
        spans.iter().map(|span| self.word(span)).collect()
    }
}
