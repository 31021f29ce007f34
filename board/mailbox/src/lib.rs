//! A chess position stored as one entry per square, and the rules of the game on top of it.
//!
//! The rules are split by concern:
//!  * [`attacks`](Board::attacks) and check detection,
//!  * [`is_legal`](Board::is_legal), which validates a single candidate move,
//!  * [`apply`](Board::apply), which performs an already-validated move,
//!  * [`is_checkmate`](Board::is_checkmate),
//!  * [`notate`](Board::notate) and [`resolve_algebraic`](Board::resolve_algebraic), which
//!    convert between moves and algebraic notation.

use core::{fmt, str::FromStr};

use board::{BoardSquare, CastleRights, Color, Piece, PieceKind};

mod attacks;
mod execute;
mod legality;
mod mate;
mod notation;

pub use notation::AlgebraicNotationError;

/// The FEN at which a standard game starts
pub const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A position string couldn't be understood
///
/// The reason is for humans only; every malformed position is the same error to code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed FEN: {reason}")]
pub struct FenError {
    reason: &'static str,
}
impl FenError {
    const fn new(reason: &'static str) -> Self {
        Self { reason }
    }

    /// A description of what was wrong with the input
    pub const fn reason(&self) -> &'static str {
        self.reason
    }
}

/// A chess position
///
/// Every square maps to the piece on it, if any. Alongside the pieces this holds everything else
/// FEN does, so that the legality of any move can be decided from the board alone. It does not
/// hold the history needed for repetition draws.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Indexed by `rank * 8 + file`
    squares: [Option<Piece>; 64],

    // flags
    pub side_to_move: Color,
    /// What castles are allowed, given the history of moves
    pub castles: CastleRights,
    /// The square a pawn skipped over on the last move, or [`BoardSquare::INVALID`]
    pub en_passant_target: BoardSquare,

    // clocks
    /// Number of half-moves since a pawn was moved or a piece was captured
    pub halfmove_clock: u32,
    /// The number of the current turn, starting at 1 and increasing after black moves
    pub fullmove_number: u32,
}

impl Board {
    /// A board with no pieces on it and no moves made
    pub const EMPTY: Self = Self {
        squares: [None; 64],
        side_to_move: Color::White,
        castles: CastleRights::empty(),
        en_passant_target: BoardSquare::INVALID,
        halfmove_clock: 0,
        fullmove_number: 1,
    };

    /// The state at the start of a chess game
    pub const INITIAL: Self = {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut board = Self::EMPTY;
        let mut file = 0;
        while file < 8 {
            board.squares[file] = Some(Piece::new(Color::White, BACK_RANK[file]));
            board.squares[8 + file] = Some(Piece::new(Color::White, PieceKind::Pawn));
            board.squares[48 + file] = Some(Piece::new(Color::Black, PieceKind::Pawn));
            board.squares[56 + file] = Some(Piece::new(Color::Black, BACK_RANK[file]));
            file += 1;
        }
        board.castles = CastleRights::all();
        board
    };

    /// Get the state at the start of a chess game
    pub const fn initial() -> Self {
        Self::INITIAL
    }

    const fn index(square: BoardSquare) -> usize {
        (square.rank() * 8 + square.file()) as usize
    }

    /// The piece on the given square, if any
    pub fn get(&self, square: BoardSquare) -> Option<Piece> {
        if square.is_valid() {
            self.squares[Self::index(square)]
        } else {
            None
        }
    }

    /// Put a piece on (or, with `None`, clear) the given square
    pub fn set(&mut self, square: BoardSquare, piece: Option<Piece>) {
        debug_assert!(square.is_valid(), "setting invalid square {square:?}");
        if square.is_valid() {
            self.squares[Self::index(square)] = piece;
        }
    }

    /// Every occupied square with its piece, from a1 to h8
    pub fn pieces(&self) -> impl Iterator<Item = (BoardSquare, Piece)> + '_ {
        BoardSquare::all_squares().filter_map(|square| Some((square, self.get(square)?)))
    }

    /// Get the square on which the given player's king resides
    ///
    /// Returns `None` only on a board missing that king, which no legal play produces.
    pub fn king_square(&self, color: Color) -> Option<BoardSquare> {
        let king = Piece::new(color, PieceKind::King);
        self.pieces()
            .find_map(|(square, piece)| (piece == king).then_some(square))
    }

    /// Parse a board from the given FEN
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut board = Self::EMPTY;
        let mut terms = fen.split_ascii_whitespace();
        {
            let pieces = terms
                .next()
                .ok_or(FenError::new("missing piece placement"))?;
            let mut rank_count = 0;
            for (rank_idx, rank) in pieces.split('/').enumerate() {
                if rank_idx >= 8 {
                    return Err(FenError::new("more than 8 ranks"));
                }
                let rank_idx = 7 - rank_idx as u8;
                let mut file = 0u8;
                for c in rank.chars() {
                    if let Some(skip) = c.to_digit(10) {
                        if skip == 0 {
                            return Err(FenError::new("zero-length run of empty squares"));
                        }
                        file += skip as u8;
                    } else {
                        let piece =
                            Piece::from_fen_letter(c).ok_or(FenError::new("unknown piece letter"))?;
                        if file >= 8 {
                            return Err(FenError::new("rank longer than 8 files"));
                        }
                        board.set(BoardSquare::from_file_rank(file, rank_idx), Some(piece));
                        file += 1;
                    }
                    if file > 8 {
                        return Err(FenError::new("rank longer than 8 files"));
                    }
                }
                if file != 8 {
                    return Err(FenError::new("rank shorter than 8 files"));
                }
                rank_count += 1;
            }
            if rank_count != 8 {
                return Err(FenError::new("fewer than 8 ranks"));
            }
        }
        board.side_to_move = match terms.next() {
            Some("w") => Color::White,
            Some("b") => Color::Black,
            Some(_) => return Err(FenError::new("side to move must be `w` or `b`")),
            None => return Err(FenError::new("missing side to move")),
        };
        board.castles = terms
            .next()
            .and_then(CastleRights::from_fen)
            .ok_or(FenError::new("bad castling availability"))?;
        board.en_passant_target = match terms.next() {
            Some("-") => BoardSquare::INVALID,
            Some(square) => match square.parse::<BoardSquare>() {
                Ok(square) if square.rank() == board.side_to_move.en_passant_rank() => square,
                _ => return Err(FenError::new("bad en passant target")),
            },
            None => return Err(FenError::new("missing en passant target")),
        };
        board.halfmove_clock = terms
            .next()
            .and_then(|term| term.parse().ok())
            .ok_or(FenError::new("bad halfmove clock"))?;
        board.fullmove_number = terms
            .next()
            .and_then(|term| term.parse().ok())
            .ok_or(FenError::new("bad fullmove number"))?;
        if terms.next().is_some() {
            return Err(FenError::new("trailing data after fullmove number"));
        }
        Ok(board)
    }

    /// The piece placement field of this board's FEN
    pub fn placement(&self) -> String {
        let rows = (0..8u8)
            .rev()
            .map(|rank| {
                let mut row = String::with_capacity(8);
                let mut empty_run = 0;
                for file in 0..8 {
                    match self.get(BoardSquare::from_file_rank(file, rank)) {
                        Some(piece) => {
                            if empty_run > 0 {
                                row.push_str(&empty_run.to_string());
                                empty_run = 0;
                            }
                            row.push(piece.fen_letter());
                        }
                        None => empty_run += 1,
                    }
                }
                if empty_run > 0 {
                    row.push_str(&empty_run.to_string());
                }
                row
            })
            .collect::<Vec<String>>();
        rows.join("/")
    }

    /// Convert to a FEN string
    pub fn to_fen(&self) -> String {
        let pieces = self.placement();
        let side_to_move = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };
        let castling = self.castles.to_fen();
        let en_passant_target = self.en_passant_target;
        let halfmove_clock = self.halfmove_clock;
        let fullmove_number = self.fullmove_number;
        format!("{pieces} {side_to_move} {castling} {en_passant_target} {halfmove_clock} {fullmove_number}")
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Board").field(&self.to_fen()).finish()
    }
}

/// Draws the board as text, eighth rank first, with `.` for empty squares
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                let c = self
                    .get(BoardSquare::from_file_rank(file, rank))
                    .map_or('.', Piece::fen_letter);
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        match self.side_to_move {
            Color::White => f.write_str("White to move"),
            Color::Black => f.write_str("Black to move"),
        }
    }
}
