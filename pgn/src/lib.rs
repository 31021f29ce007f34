//! Reading and writing games in Portable Game Notation

use core::{fmt, str::FromStr};
use std::{io, mem};

use board::Color;
use game::{GameTree, NodeId};
use mailbox::{AlgebraicNotationError, Board, FenError};

mod movetext;
mod write;

use movetext::{Token, Tokens};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("error reading PGN: {0}")]
    Io(#[from] io::Error),
    #[error("malformed tag pair: {0}")]
    MalformedTag(String),
    #[error("malformed movetext at `{0}`")]
    MalformedMove(String),
    #[error("illegal move `{san}`: {source}")]
    IllegalMove {
        san: String,
        #[source]
        source: AlgebraicNotationError,
    },
    #[error("comment is never closed")]
    UnterminatedComment,
    #[error("unbalanced variation parentheses")]
    UnbalancedVariation,
    #[error("variation started before any move")]
    VariationWithoutMove,
    #[error("invalid FEN tag: {0}")]
    InvalidFen(#[from] FenError),
    #[error("FEN tag has no {0:?} king")]
    MissingKing(Color),
    #[error("no game found")]
    NoGame,
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// How a game ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    /// Still going, abandoned, or unknown
    Other,
}
impl GameResult {
    /// Parse a game termination marker
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "1-0" => Self::WhiteWins,
            "0-1" => Self::BlackWins,
            "1/2-1/2" => Self::Draw,
            "*" => Self::Other,
            _ => return None,
        })
    }
}
impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::WhiteWins => "1-0",
            Self::BlackWins => "0-1",
            Self::Draw => "1/2-1/2",
            Self::Other => "*",
        })
    }
}

/// A game read from (or to be written to) a PGN file
#[derive(Clone, Debug)]
pub struct PgnGame {
    /// Tag pairs, in the order they appear in the file
    tags: Vec<(String, String)>,
    /// This overrides any `Result` tag when writing
    pub result: GameResult,
    pub tree: GameTree,
}

impl PgnGame {
    /// A game with no moves yet and the seven required tags left unknown
    ///
    /// A starting position other than the usual one is recorded in `SetUp` and `FEN` tags.
    pub fn new(initial: Board) -> Self {
        let mut tags = ["Event", "Site", "Date", "Round", "White", "Black"]
            .map(|key| (key.to_string(), "?".to_string()))
            .to_vec();
        tags.push(("Result".to_string(), GameResult::Other.to_string()));
        if initial != Board::INITIAL {
            tags.push(("SetUp".to_string(), "1".to_string()));
            tags.push(("FEN".to_string(), initial.to_fen()));
        }
        Self {
            tags,
            result: GameResult::Other,
            tree: GameTree::new(initial),
        }
    }

    pub fn tags(&self) -> &[(String, String)] {
        &self.tags
    }

    /// The value of the first tag with this key
    pub fn tag(&self, key: &str) -> Option<&str> {
        find_tag(&self.tags, key)
    }

    /// Change the value of a tag, adding it at the end if it isn't there yet
    ///
    /// Setting `Result` to a termination marker also sets [`PgnGame::result`].
    pub fn set_tag(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if key == "Result" {
            if let Some(result) = GameResult::from_token(&value) {
                self.result = result;
            }
        }
        match self.tags.iter_mut().find(|(existing, _)| existing == key) {
            Some((_, existing)) => *existing = value,
            None => self.tags.push((key.to_string(), value)),
        }
    }

    /// Write the tags and the line from the root to `node` as PGN text
    pub fn write(&self, node: NodeId) -> String {
        self.display(node).to_string()
    }
}

impl Default for PgnGame {
    fn default() -> Self {
        Self::new(Board::INITIAL)
    }
}

/// Parses the first game in the text
impl FromStr for PgnGame {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        read_pgn(s.as_bytes())?.into_iter().next().ok_or(Error::NoGame)
    }
}

/// Read every game from a PGN file
///
/// A game's tags start at a line beginning with `[`; everything between the tags and the next
/// game's tags is movetext. Variations become extra children in the game tree, after the main
/// line. Reading stops at the first malformed game.
pub fn read_pgn(reader: impl io::BufRead) -> Result<Vec<PgnGame>> {
    let mut games = Vec::new();
    let mut tags = Vec::new();
    let mut movetext = String::new();
    let mut in_comment = false;
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !in_comment && trimmed.starts_with('[') {
            if !movetext.trim().is_empty() {
                games.push(build_game(mem::take(&mut tags), &movetext)?);
                movetext.clear();
            }
            tags.push(parse_tag(trimmed)?);
            continue;
        }
        // Escaped lines are for other programs
        if !in_comment && trimmed.starts_with('%') {
            continue;
        }
        in_comment = ends_in_comment(in_comment, &line);
        movetext.push_str(&line);
        movetext.push('\n');
    }
    if !tags.is_empty() || !movetext.trim().is_empty() {
        games.push(build_game(tags, &movetext)?);
    }
    Ok(games)
}

fn find_tag<'a>(tags: &'a [(String, String)], key: &str) -> Option<&'a str> {
    tags.iter()
        .find(|(existing, _)| existing == key)
        .map(|(_, value)| value.as_str())
}

/// Parse a `[Key "Value"]` line, undoing the `\"` and `\\` escapes in the value
fn parse_tag(line: &str) -> Result<(String, String)> {
    let malformed = || Error::MalformedTag(line.to_string());
    let inside = line
        .strip_prefix('[')
        .and_then(|line| line.strip_suffix(']'))
        .ok_or_else(malformed)?;
    let (key, quoted) = inside
        .trim()
        .split_once(char::is_whitespace)
        .ok_or_else(malformed)?;
    if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(malformed());
    }
    let quoted = quoted
        .trim()
        .strip_prefix('"')
        .and_then(|quoted| quoted.strip_suffix('"'))
        .ok_or_else(malformed)?;
    let mut value = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => value.push(chars.next().ok_or_else(malformed)?),
            '"' => return Err(malformed()),
            c => value.push(c),
        }
    }
    Ok((key.to_string(), value))
}

/// Whether a `{` comment is still open at the end of the line
fn ends_in_comment(mut in_comment: bool, line: &str) -> bool {
    for c in line.chars() {
        match (in_comment, c) {
            (true, '}') => in_comment = false,
            (false, '{') => in_comment = true,
            (false, ';') => break,
            _ => {}
        }
    }
    in_comment
}

fn build_game(tags: Vec<(String, String)>, movetext: &str) -> Result<PgnGame> {
    let initial = match find_tag(&tags, "FEN") {
        Some(fen) => Board::from_fen(fen)?,
        None => Board::INITIAL,
    };
    if let Some(color) = [Color::White, Color::Black]
        .into_iter()
        .find(|&color| initial.king_square(color).is_none())
    {
        return Err(Error::MissingKing(color));
    }
    let mut result = find_tag(&tags, "Result")
        .and_then(GameResult::from_token)
        .unwrap_or(GameResult::Other);
    let mut tree = GameTree::new(initial);
    let mut current = tree.root();
    // Where to pick up again once each open variation closes
    let mut resume = Vec::new();
    let mut terminated = false;
    for token in Tokens::new(movetext) {
        let token = token?;
        if terminated {
            let text = match token {
                Token::Move(san) => san.to_string(),
                Token::StartVariation => "(".to_string(),
                Token::EndVariation => ")".to_string(),
                Token::Termination(result) => result.to_string(),
            };
            return Err(Error::MalformedMove(text));
        }
        match token {
            Token::Move(san) => {
                let mv = tree
                    .board(current)
                    .parse_algebraic(san)
                    .map_err(|source| Error::IllegalMove {
                        san: san.to_string(),
                        source,
                    })?;
                current = tree
                    .play(current, mv)
                    .ok_or_else(|| Error::MalformedMove(san.to_string()))?;
            }
            Token::StartVariation => {
                let parent = tree.parent(current).ok_or(Error::VariationWithoutMove)?;
                resume.push(current);
                current = parent;
            }
            Token::EndVariation => {
                current = resume.pop().ok_or(Error::UnbalancedVariation)?;
            }
            Token::Termination(token) => {
                result = token;
                terminated = true;
            }
        }
    }
    if !resume.is_empty() {
        return Err(Error::UnbalancedVariation);
    }
    Ok(PgnGame { tags, result, tree })
}

#[cfg(test)]
mod tests {
    use super::*;

    use board::Move;
    use quickcheck::{quickcheck, TestResult};

    const EVERGREEN: &str = r#"[Event "Casual Game"]
[Site "Berlin GER"]
[Date "1852.??.??"]
[Round "?"]
[White "Adolf Anderssen"]
[Black "Jean Dufresne"]
[Result "1-0"]

1.e4 e5 2.Nf3 Nc6 3.Bc4 Bc5 4.b4 Bxb4 5.c3 Ba5 6.d4 exd4 7.O-O
d3 8.Qb3 Qf6 9.e5 Qg6 10.Re1 Nge7 11.Ba3 b5 12.Qxb5 Rb8 13.Qa4
Bb6 14.Nbd2 Bb7 15.Ne4 Qf5 16.Bxd3 Qh5 17.Nf6+ gxf6 18.exf6
Rg8 19.Rad1 Qxf3 20.Rxe7+ Nxe7 21.Qxd7+ Kxd7 22.Bf5+ Ke8
23.Bd7+ Kf8 24.Bxe7# 1-0
"#;

    #[track_caller]
    fn mv(text: &str) -> Move {
        text.parse().expect("test move should parse")
    }

    #[test]
    fn test_read_game() {
        let game: PgnGame = EVERGREEN.parse().unwrap();
        assert_eq!(game.tags().len(), 7);
        assert_eq!(game.tag("White"), Some("Adolf Anderssen"));
        assert_eq!(game.tag("Opening"), None);
        assert_eq!(game.result, GameResult::WhiteWins);

        let tree = &game.tree;
        let last = tree.last_node(tree.root());
        let line = tree.line_to(last);
        assert_eq!(line.len(), 47);
        assert_eq!(line[12], mv("e1g1"));
        assert!(tree.board(last).is_checkmate(Color::Black));
    }

    #[test]
    fn test_write_game() {
        let game: PgnGame = EVERGREEN.parse().unwrap();
        let last = game.tree.last_node(game.tree.root());
        let written = game.write(last);
        assert!(written.starts_with("[Event \"Casual Game\"]\n[Site \"Berlin GER\"]\n"));
        assert!(written.contains("[Result \"1-0\"]\n\n1. e4 e5 2. Nf3 Nc6"));
        for notated in ["O-O", "Nge7", "Nbd2", "Rad1", "Rxe7+", "Bxe7#"] {
            assert!(written.contains(notated), "{notated} missing from\n{written}");
        }
        assert!(written.trim_end().ends_with("1-0"));
        assert!(written.lines().all(|line| line.len() < 80));

        let reread: PgnGame = written.parse().unwrap();
        let reread_last = reread.tree.last_node(reread.tree.root());
        assert_eq!(reread.tree.line_to(reread_last), game.tree.line_to(last));
        assert_eq!(reread.tags(), game.tags());
    }

    #[test]
    fn test_write_partial_line() {
        let game: PgnGame = EVERGREEN.parse().unwrap();
        let third = game.tree.path_to(game.tree.last_node(game.tree.root()))[3];
        let written = game.write(third);
        assert!(written.ends_with("\n\n1. e4 e5 2. Nf3 1-0\n"), "{written}");
    }

    #[test]
    fn test_variations() {
        let text = "1. e4 (1. d4 d5 (1... Nf6 2. c4) 2. c4) 1... e5 2. Nf3 {the usual} $1 Nc6 ; and so on\n*";
        let game: PgnGame = text.parse().unwrap();
        let tree = &game.tree;
        let root = tree.root();
        assert_eq!(game.result, GameResult::Other);
        assert_eq!(tree.children(root).len(), 2);

        let main = tree.line_to(tree.last_node(root));
        assert_eq!(main, vec![mv("e2e4"), mv("e7e5"), mv("g1f3"), mv("b8c6")]);

        let d4 = tree.children(root)[1];
        assert_eq!(tree.node(d4).mv(), Some(mv("d2d4")));
        let replies = tree
            .children(d4)
            .iter()
            .map(|&reply| tree.node(reply).mv())
            .collect::<Vec<_>>();
        assert_eq!(replies, vec![Some(mv("d7d5")), Some(mv("g8f6"))]);
        for &reply in tree.children(d4) {
            assert_eq!(tree.node(tree.first_child(reply).unwrap()).mv(), Some(mv("c2c4")));
        }
    }

    #[test]
    fn test_set_up_position() {
        let text = r#"[SetUp "1"]
[FEN "4k3/8/8/8/8/8/8/4K2R b K - 0 12"]

12... Kd7 13. O-O *
"#;
        let game: PgnGame = text.parse().unwrap();
        let last = game.tree.last_node(game.tree.root());
        assert_eq!(game.tree.line_to(last), vec![mv("e8d7"), mv("e1g1")]);
        let written = game.write(last);
        assert!(written.ends_with("\n\n12... Kd7 13. O-O *\n"), "{written}");
    }

    #[test]
    fn test_several_games() {
        let text = "[Event \"one\"]\n\n1. e4 1-0\n\n[Event \"two\"]\n\n1. d4 d5 0-1\n";
        let games = read_pgn(text.as_bytes()).unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].tag("Event"), Some("one"));
        assert_eq!(games[0].result, GameResult::WhiteWins);
        assert_eq!(games[1].tag("Event"), Some("two"));
        assert_eq!(games[1].result, GameResult::BlackWins);
        assert_eq!(games[1].tree.len(), 3);
    }

    #[test]
    fn test_new_game() {
        let mut game = PgnGame::default();
        assert_eq!(game.tags().len(), 7);
        assert_eq!(game.tag("Result"), Some("*"));
        game.set_tag("White", "Me");
        game.set_tag("Result", "1/2-1/2");
        game.set_tag("Annotator", "Nobody");
        assert_eq!(game.result, GameResult::Draw);
        assert_eq!(game.tag("White"), Some("Me"));
        assert_eq!(game.tags().last().map(|(key, _)| key.as_str()), Some("Annotator"));
        let written = game.write(game.tree.root());
        assert!(written.ends_with("\n\n1/2-1/2\n"), "{written}");

        let set_up = PgnGame::new(Board::EMPTY);
        assert_eq!(set_up.tag("SetUp"), Some("1"));
        assert_eq!(set_up.tag("FEN"), Some("8/8/8/8/8/8/8/8 w - - 0 1"));
    }

    #[test]
    fn test_errors() {
        assert!(matches!("".parse::<PgnGame>(), Err(Error::NoGame)));
        assert!(matches!(
            "1. e4 e4".parse::<PgnGame>(),
            Err(Error::IllegalMove { ref san, .. }) if san == "e4"
        ));
        assert!(matches!(
            "1. e4 (1. d4".parse::<PgnGame>(),
            Err(Error::UnbalancedVariation)
        ));
        assert!(matches!(
            "1. e4 ) e5".parse::<PgnGame>(),
            Err(Error::UnbalancedVariation)
        ));
        assert!(matches!(
            "(1. e4) 1. d4".parse::<PgnGame>(),
            Err(Error::VariationWithoutMove)
        ));
        assert!(matches!(
            "[Event \"unclosed]\n1. e4".parse::<PgnGame>(),
            Err(Error::MalformedTag(_))
        ));
        assert!(matches!(
            "[FEN \"not a position\"]\n1. e4".parse::<PgnGame>(),
            Err(Error::InvalidFen(_))
        ));
        assert!(matches!(
            "1. e4 {forever".parse::<PgnGame>(),
            Err(Error::UnterminatedComment)
        ));
        assert!(matches!(
            "1. e4 e5 1-0 2. Nf3".parse::<PgnGame>(),
            Err(Error::MalformedMove(ref text)) if text == "Nf3"
        ));
        assert!(matches!(
            "1. e4 * *".parse::<PgnGame>(),
            Err(Error::MalformedMove(ref text)) if text == "*"
        ));
        assert!(matches!(
            "[FEN \"4k3/8/8/8/8/8/8/8 w - - 0 1\"]\n\n*".parse::<PgnGame>(),
            Err(Error::MissingKing(Color::White))
        ));
    }

    #[test]
    fn test_termination_after_comment() {
        let game: PgnGame = "1. e4 e5 0-1 {resigned}\n".parse().unwrap();
        assert_eq!(game.result, GameResult::BlackWins);
        assert_eq!(game.tree.len(), 3);
    }

    #[test]
    fn test_tag_escapes() {
        let (key, value) = parse_tag(r#"[Event "The \"Big\" one \\ here"]"#).unwrap();
        assert_eq!(key, "Event");
        assert_eq!(value, r#"The "Big" one \ here"#);
        assert!(parse_tag(r#"[Event "dangling \"]"#).is_err());
        assert!(parse_tag(r#"[Event "bare " quote"]"#).is_err());
        assert!(parse_tag("[Event]").is_err());
    }

    quickcheck! {
        fn test_tag_value_round_trip(value: String) -> TestResult {
            if value.contains(['\n', '\r']) {
                return TestResult::discard();
            }
            let mut game = PgnGame::default();
            game.set_tag("Event", value.clone());
            let Ok(reread) = game.write(game.tree.root()).parse::<PgnGame>() else {
                return TestResult::failed();
            };
            TestResult::from_bool(reread.tag("Event") == Some(value.as_str()))
        }
    }
}
