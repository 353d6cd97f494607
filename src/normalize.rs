// WHY: extracted document text scatters sentences randomly across file
// lines; reflowing to one sentence per line is what makes a line-based diff
// viewer usable on it

use std::io::{self, BufRead, Write};
use tracing::debug;

/// When the buffered sentence is at least this many characters, any
/// punctuation counts as a sentence end, not just `.!?`.
///
/// Extraction frequently yields long unbroken runs with sparse terminal
/// punctuation (lists, headers); without this cap a one-word edit makes a
/// diff viewer treat the whole run as different.
const LONG_SENTENCE_LEN: usize = 50;

/// Characters that terminate a sentence outright.
fn is_sentence_end(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Characters allowed to break a sentence that has grown past
/// [`LONG_SENTENCE_LEN`].
fn is_sentence_break(c: char) -> bool {
    c.is_ascii_punctuation()
}

/// Expand the ligature glyphs that text extraction leaves behind for "ff"
/// combinations. A font substitution artifact, not ours, but trivially
/// reverted here so diffs don't churn on it.
pub fn fix_ligatures(sentence: &str) -> String {
    sentence
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace('\u{FB00}', "ff")
}

/// Streaming sentence-per-line reflow.
///
/// Consumes plain-text lines top to bottom and writes one heuristically
/// delimited sentence per output line; runs of blank input lines collapse to
/// a single blank output line marking the paragraph break.
///
/// All state is per-instance, so independent documents can be normalized
/// concurrently with separate normalizers.
#[derive(Debug, Default)]
pub struct SentenceNormalizer {
    /// The sentence currently being assembled.
    buf: String,
    /// Character count of `buf`, tracked so the long-sentence test stays
    /// O(1) per input character.
    buf_chars: usize,
    /// Length of the alphabetic run ending at the current position.
    word_len: usize,
    /// Length of the most recently completed alphabetic run; a value of 1
    /// at a sentence-end mark reads as an initial or enumeration label, so
    /// the punctuation is treated as non-terminal.
    last_word_len: usize,
    /// True right after a paragraph separator was emitted, collapsing any
    /// further consecutive blank source lines.
    suppress_blank: bool,
}

impl SentenceNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reflow `input` into `output`, one sentence per line.
    ///
    /// One-pass and non-restartable: the normalizer is reset by the final
    /// flush, and a fresh instance should be used per document.
    pub fn normalize<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> io::Result<()> {
        let mut lines_in = 0u64;

        for line in input.lines() {
            let line = line?;
            lines_in += 1;
            let trimmed = line.trim();

            if trimmed.is_empty() {
                // Paragraph boundary: flush whatever is buffered, then one
                // forced blank line. Further blanks are swallowed until the
                // next non-blank source line.
                if !self.suppress_blank {
                    self.flush(output, false)?;
                    self.flush(output, true)?;
                    self.suppress_blank = true;
                }
                continue;
            }

            self.suppress_blank = false;

            // Re-join a sentence that was wrapped across source lines.
            if let Some(last) = self.buf.chars().next_back() {
                if !last.is_whitespace() {
                    self.push(' ');
                }
            }

            for c in trimmed.chars() {
                self.push(c);

                if c.is_ascii_alphabetic() {
                    self.word_len += 1;
                    self.last_word_len = self.word_len;
                } else {
                    self.word_len = 0;
                }

                if self.sentence_done(c) && self.last_word_len != 1 {
                    self.flush(output, false)?;
                }
            }
        }

        self.flush(output, false)?;
        output.flush()?;

        debug!(lines_in, "normalization pass complete");
        Ok(())
    }

    fn push(&mut self, c: char) {
        self.buf.push(c);
        self.buf_chars += 1;
    }

    /// Sentence-done predicate, evaluated against `last`, the character
    /// just appended to the buffer.
    fn sentence_done(&self, last: char) -> bool {
        if is_sentence_end(last) {
            return true;
        }
        self.buf_chars >= LONG_SENTENCE_LEN && is_sentence_break(last)
    }

    /// Emit the buffer as one output line and reset all sentence state.
    ///
    /// The newline is written only when the buffer is non-empty, unless
    /// `force_newline` asks for the explicit paragraph separator.
    fn flush<W: Write>(&mut self, output: &mut W, force_newline: bool) -> io::Result<()> {
        let flushed = fix_ligatures(self.buf.trim_start());
        output.write_all(flushed.as_bytes())?;
        if force_newline || !self.buf.is_empty() {
            output.write_all(b"\n")?;
        }
        self.buf.clear();
        self.buf_chars = 0;
        self.word_len = 0;
        self.last_word_len = 0;
        Ok(())
    }
}
