/*!
 * Greedy line wrapping of timed words.
 *
 * Words are packed one pass, left to right, with no lookahead: a new line is
 * started only before a word that would push the current line past the
 * budget. Lines are never rebalanced and words are never split, so a word
 * longer than the budget sits alone on its own line.
 */

use log::{debug, error};

use crate::transcript::Word;

/// Default maximum characters per display line
pub const DEFAULT_MAX_CHARS_PER_LINE: usize = 60;

/// One display line of words
pub type Line = Vec<Word>;

/// Split words into display lines under `max_chars` characters
pub fn wrap(words: &[Word], max_chars: usize) -> Vec<Line> {
    let total_words = words.len();

    let mut lines = Vec::new();
    let mut current_line: Line = Vec::new();
    let mut current_chars = 0;

    for word in words {
        let word_chars = word.char_len();

        if current_chars + word_chars > max_chars && !current_line.is_empty() {
            lines.push(std::mem::take(&mut current_line));
            current_chars = 0;
        }

        current_line.push(word.clone());
        // Each word carries one trailing separator in the running count
        current_chars += word_chars + 1;
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    let wrapped_words: usize = lines.iter().map(|line| line.len()).sum();
    if wrapped_words != total_words {
        error!(
            "Lost words during line wrapping! Original: {}, after wrapping: {}",
            total_words, wrapped_words
        );
    } else {
        debug!("Wrapped {} words into {} lines", total_words, lines.len());
    }

    lines
}

/// Rendered width of a line: word characters plus single separators
pub fn line_width(line: &[Word]) -> usize {
    let chars: usize = line.iter().map(Word::char_len).sum();
    chars + line.len().saturating_sub(1)
}
