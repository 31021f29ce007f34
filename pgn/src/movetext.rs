//! Splitting movetext into the parts that matter for rebuilding the game

use crate::{Error, GameResult, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// A move in algebraic notation, with any `!`/`?` annotation removed
    Move(&'a str),
    StartVariation,
    EndVariation,
    Termination(GameResult),
}

/// The tokens of some movetext, skipping move numbers, comments, and NAGs
pub(crate) struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(movetext: &'a str) -> Self {
        Self { rest: movetext }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.rest = self.rest.trim_start();
            match self.rest.chars().next()? {
                '{' => {
                    let Some(end) = self.rest.find('}') else {
                        self.rest = "";
                        return Some(Err(Error::UnterminatedComment));
                    };
                    self.rest = &self.rest[end + 1..];
                    continue;
                }
                ';' => {
                    let rest = self.rest;
                    self.rest = rest.find('\n').map_or("", |end| &rest[end + 1..]);
                    continue;
                }
                '(' => {
                    self.rest = &self.rest[1..];
                    return Some(Ok(Token::StartVariation));
                }
                ')' => {
                    self.rest = &self.rest[1..];
                    return Some(Ok(Token::EndVariation));
                }
                _ => {}
            }

            let end = self
                .rest
                .find(|c: char| c.is_whitespace() || "(){};".contains(c))
                .unwrap_or(self.rest.len());
            let (word, rest) = self.rest.split_at(end);
            self.rest = rest;

            if let Some(nag) = word.strip_prefix('$') {
                if nag.is_empty() || !nag.bytes().all(|b| b.is_ascii_digit()) {
                    return Some(Err(Error::MalformedMove(word.to_string())));
                }
                continue;
            }
            if let Some(result) = GameResult::from_token(word) {
                return Some(Ok(Token::Termination(result)));
            }
            match strip_move_number(word) {
                Some("") => continue,
                Some(san) => return Some(Ok(Token::Move(san.trim_end_matches(['!', '?'])))),
                None => return Some(Err(Error::MalformedMove(word.to_string()))),
            }
        }
    }
}

/// Remove a leading move number indication (`12.`, `12...`) from the word
///
/// Returns `None` for digits without the dot after them.
fn strip_move_number(word: &str) -> Option<&str> {
    if word.starts_with("0-0") {
        return Some(word);
    }
    let after_digits = word.trim_start_matches(|c: char| c.is_ascii_digit());
    let after_dots = after_digits.trim_start_matches('.');
    if after_digits.len() != word.len() && after_dots.len() == after_digits.len() {
        return None;
    }
    Some(after_dots)
}
