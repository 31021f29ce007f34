use std::io;

use board::{CheckStatus, Color, Move};
use game::Session;
use mailbox::{AlgebraicNotationError, Board, FenError};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Fen(#[from] FenError),
    #[error(transparent)]
    Pgn(#[from] pgn::Error),
    #[error("error reading input: {0}")]
    Io(#[from] io::Error),
    #[error("could not play `{text}`: {source}")]
    Notation {
        text: String,
        #[source]
        source: AlgebraicNotationError,
    },
    #[error("illegal move `{0}`")]
    IllegalMove(String),
    #[error("the position has no {0:?} king")]
    MissingKing(Color),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// A game being played out from the command line
pub struct Backend {
    session: Session,
}

impl Backend {
    /// Start from the given position, or the usual one
    pub fn new(fen: Option<&str>) -> Result<Self> {
        let board = match fen {
            Some(fen) => Board::from_fen(fen)?,
            None => Board::INITIAL,
        };
        require_kings(&board)?;
        Ok(Self {
            session: Session::new(board),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Play a move given in coordinates (`e2e4`) or algebraic notation (`Nf3`)
    ///
    /// Returns the move in algebraic notation. An illegal move changes nothing.
    pub fn play(&mut self, text: &str) -> Result<String> {
        let board = self.session.board();
        let mv = match text.parse::<Move>() {
            Ok(mv) => mv,
            Err(_) => board
                .parse_algebraic(text)
                .map_err(|source| Error::Notation {
                    text: text.to_string(),
                    source,
                })?,
        };
        let Some(notated) = board.algebraic(mv) else {
            return Err(Error::IllegalMove(text.to_string()));
        };
        self.session
            .play(mv)
            .ok_or_else(|| Error::IllegalMove(text.to_string()))?;
        Ok(notated.to_string())
    }

    /// Describe whose move it is and whether they're in check
    pub fn status(&self) -> Result<String> {
        status(self.session.board())
    }
}

/// Describe whose move it is on the board and whether they're in check
pub fn status(board: &Board) -> Result<String> {
    require_kings(board)?;
    let side = board.side_to_move;
    Ok(match board.check_status(side) {
        CheckStatus::None => format!("{side:?} to move"),
        CheckStatus::Check => format!("{side:?} to move, in check"),
        CheckStatus::Checkmate => format!("{side:?} is checkmated"),
    })
}

/// Check and mate queries need both kings on the board
fn require_kings(board: &Board) -> Result<()> {
    for color in [Color::White, Color::Black] {
        if board.king_square(color).is_none() {
            return Err(Error::MissingKing(color));
        }
    }
    Ok(())
}

/// Play the moves in order, reporting each one's notation, then the final position
pub fn play_moves(fen: Option<&str>, moves: &[String]) -> Result<String> {
    let mut backend = Backend::new(fen)?;
    let mut report = String::new();
    for text in moves {
        report.push_str(&backend.play(text)?);
        report.push('\n');
    }
    report.push_str(&backend.session().board().to_fen());
    report.push('\n');
    report.push_str(&backend.status()?);
    Ok(report)
}

/// Parse a position and write it back out with its status
pub fn describe_fen(fen: &str) -> Result<String> {
    let board = Board::from_fen(fen)?;
    Ok(format!("{}\n{}\n{}", board, board.to_fen(), status(&board)?))
}

/// Read every game from a PGN file and write them back out
pub fn normalize_pgn(reader: impl io::BufRead) -> Result<String> {
    let games = pgn::read_pgn(reader)?;
    Ok(games
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<String>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moves(texts: &[&str]) -> Vec<String> {
        texts.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_play_mixed_notation() {
        let report = play_moves(None, &moves(&["e2e4", "e5", "Nf3", "b8c6"])).unwrap();
        let lines = report.lines().collect::<Vec<_>>();
        assert_eq!(&lines[..4], &["e4", "e5", "Nf3", "Nc6"]);
        assert_eq!(
            lines[4],
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3"
        );
        assert_eq!(lines[5], "White to move");
    }

    #[test]
    fn test_play_to_mate() {
        let report = play_moves(None, &moves(&["f3", "e5", "g4", "Qh4#"])).unwrap();
        assert!(report.ends_with("White is checkmated"), "{report}");
        assert!(report.starts_with("f3\ne5\ng4\nQh4#\n"));
    }

    #[test]
    fn test_illegal_moves_stop() {
        assert!(matches!(
            play_moves(None, &moves(&["e2e5"])),
            Err(Error::IllegalMove(text)) if text == "e2e5"
        ));
        assert!(matches!(
            play_moves(None, &moves(&["e4", "Nf6", "Nf6"])),
            Err(Error::Notation { .. })
        ));
    }

    #[test]
    fn test_backend_keeps_state_after_illegal_move() {
        let mut backend = Backend::new(None).unwrap();
        backend.play("e4").unwrap();
        let before = backend.session().current();
        assert!(backend.play("e4").is_err());
        assert_eq!(backend.session().current(), before);
        assert_eq!(backend.status().unwrap(), "Black to move");
    }

    #[test]
    fn test_missing_king_rejected_before_playing() {
        assert!(matches!(
            play_moves(Some("8/8/8/8/8/8/8/4K3 w - - 0 1"), &moves(&["e1e2"])),
            Err(Error::MissingKing(Color::Black))
        ));
        assert!(matches!(
            Backend::new(Some("4k3/8/8/8/8/8/8/8 b - - 0 1")),
            Err(Error::MissingKing(Color::White))
        ));
        let pgn = "[FEN \"8/8/8/8/8/8/8/4K3 w - - 0 1\"]\n\n1. Ke2 *\n";
        assert!(matches!(
            normalize_pgn(pgn.as_bytes()),
            Err(Error::Pgn(pgn::Error::MissingKing(Color::Black)))
        ));
    }

    #[test]
    fn test_describe_fen() {
        let described = describe_fen("4k3/8/8/8/8/8/8/4RK2 b - - 0 1").unwrap();
        assert!(described.ends_with("4k3/8/8/8/8/8/8/4RK2 b - - 0 1\nBlack to move, in check"));
        assert!(matches!(describe_fen("nonsense"), Err(Error::Fen(_))));
        assert!(matches!(
            describe_fen("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(Error::MissingKing(Color::Black))
        ));
    }

    #[test]
    fn test_normalize_pgn() {
        let text = "[Event \"x\"]\n\n1.e4 {comment} e5 2.Nf3 *\n";
        let normalized = normalize_pgn(text.as_bytes()).unwrap();
        assert!(normalized.ends_with("\n\n1. e4 e5 2. Nf3 *\n"), "{normalized}");
    }
}
