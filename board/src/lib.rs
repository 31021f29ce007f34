//! Value types shared by every part of the rules engine: pieces, squares, moves, castling
//! rights, and the pieces of algebraic notation.

use core::{fmt, str::FromStr};

mod castle;

pub use castle::CastleRights;

/// The types of pieces there are
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
impl PieceKind {
    /// All the kinds of pieces there are
    pub const KINDS: [PieceKind; 6] = [
        Self::Pawn,
        Self::Knight,
        Self::Bishop,
        Self::Rook,
        Self::Queen,
        Self::King,
    ];

    /// The capitalized version of the letter used for this piece in FEN and SAN
    pub const fn letter(self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    /// The kind named by the given capital letter
    pub const fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'P' => Some(Self::Pawn),
            'N' => Some(Self::Knight),
            'B' => Some(Self::Bishop),
            'R' => Some(Self::Rook),
            'Q' => Some(Self::Queen),
            'K' => Some(Self::King),
            _ => None,
        }
    }

    /// Whether a pawn can promote into this kind of piece
    pub const fn is_promotable(self) -> bool {
        match self {
            PieceKind::Pawn | PieceKind::King => false,
            PieceKind::Rook | PieceKind::Queen | PieceKind::Knight | PieceKind::Bishop => true,
        }
    }
}

/// The colors a piece can have
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}
impl Color {
    pub const fn other(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub const fn is_white(self) -> bool {
        matches!(self, Color::White)
    }

    pub const fn is_black(self) -> bool {
        matches!(self, Color::Black)
    }

    /// The rank on which this side's king and rooks start
    pub const fn home_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// The rank on which this side's pawns start
    pub const fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// The rank on which this side's pawns promote
    pub const fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// The rank of the square a pawn of this side lands on when capturing en passant
    pub const fn en_passant_rank(self) -> u8 {
        match self {
            Color::White => 5,
            Color::Black => 2,
        }
    }

    /// The change in rank of a pawn advancing one square
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

/// A piece
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}
impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { kind, color }
    }

    /// The letter for this piece in FEN, uppercase for white and lowercase for black
    pub const fn fen_letter(self) -> char {
        match self.color {
            Color::White => self.kind.letter(),
            Color::Black => self.kind.letter().to_ascii_lowercase(),
        }
    }

    /// Parse a FEN piece letter
    ///
    /// ```
    /// # use board::{Color, Piece, PieceKind};
    /// assert_eq!(Piece::from_fen_letter('n'), Some(Piece::new(Color::Black, PieceKind::Knight)));
    /// assert_eq!(Piece::from_fen_letter('K'), Some(Piece::new(Color::White, PieceKind::King)));
    /// assert_eq!(Piece::from_fen_letter('x'), None);
    /// ```
    pub const fn from_fen_letter(letter: char) -> Option<Self> {
        let color = if letter.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        match PieceKind::from_letter(letter.to_ascii_uppercase()) {
            Some(kind) => Some(Self { kind, color }),
            None => None,
        }
    }
}

/// A square on the board
///
/// Stored in 0x88 form:
/// ```text
/// 0b12345678
///    +-+      Rank
///        +-+  File
///   +   +     Must be zero, invalid square if 1
/// ```
///
/// This keeps a square in one byte and makes it cheap to tell whether arithmetic has walked off
/// the board.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardSquare(pub u8);
impl BoardSquare {
    /// The "no square" sentinel
    ///
    /// Please use this instead of making your own so it's obvious if a deliberately-invalid square
    /// appeared.
    pub const INVALID: Self = Self(0xee);

    pub const A1: Self = Self::from_file_rank(0, 0);
    pub const B1: Self = Self::from_file_rank(1, 0);
    pub const C1: Self = Self::from_file_rank(2, 0);
    pub const D1: Self = Self::from_file_rank(3, 0);
    pub const E1: Self = Self::from_file_rank(4, 0);
    pub const F1: Self = Self::from_file_rank(5, 0);
    pub const G1: Self = Self::from_file_rank(6, 0);
    pub const H1: Self = Self::from_file_rank(7, 0);
    pub const A2: Self = Self::from_file_rank(0, 1);
    pub const B2: Self = Self::from_file_rank(1, 1);
    pub const C2: Self = Self::from_file_rank(2, 1);
    pub const D2: Self = Self::from_file_rank(3, 1);
    pub const E2: Self = Self::from_file_rank(4, 1);
    pub const F2: Self = Self::from_file_rank(5, 1);
    pub const G2: Self = Self::from_file_rank(6, 1);
    pub const H2: Self = Self::from_file_rank(7, 1);
    pub const A3: Self = Self::from_file_rank(0, 2);
    pub const B3: Self = Self::from_file_rank(1, 2);
    pub const C3: Self = Self::from_file_rank(2, 2);
    pub const D3: Self = Self::from_file_rank(3, 2);
    pub const E3: Self = Self::from_file_rank(4, 2);
    pub const F3: Self = Self::from_file_rank(5, 2);
    pub const G3: Self = Self::from_file_rank(6, 2);
    pub const H3: Self = Self::from_file_rank(7, 2);
    pub const A4: Self = Self::from_file_rank(0, 3);
    pub const B4: Self = Self::from_file_rank(1, 3);
    pub const C4: Self = Self::from_file_rank(2, 3);
    pub const D4: Self = Self::from_file_rank(3, 3);
    pub const E4: Self = Self::from_file_rank(4, 3);
    pub const F4: Self = Self::from_file_rank(5, 3);
    pub const G4: Self = Self::from_file_rank(6, 3);
    pub const H4: Self = Self::from_file_rank(7, 3);
    pub const A5: Self = Self::from_file_rank(0, 4);
    pub const B5: Self = Self::from_file_rank(1, 4);
    pub const C5: Self = Self::from_file_rank(2, 4);
    pub const D5: Self = Self::from_file_rank(3, 4);
    pub const E5: Self = Self::from_file_rank(4, 4);
    pub const F5: Self = Self::from_file_rank(5, 4);
    pub const G5: Self = Self::from_file_rank(6, 4);
    pub const H5: Self = Self::from_file_rank(7, 4);
    pub const A6: Self = Self::from_file_rank(0, 5);
    pub const B6: Self = Self::from_file_rank(1, 5);
    pub const C6: Self = Self::from_file_rank(2, 5);
    pub const D6: Self = Self::from_file_rank(3, 5);
    pub const E6: Self = Self::from_file_rank(4, 5);
    pub const F6: Self = Self::from_file_rank(5, 5);
    pub const G6: Self = Self::from_file_rank(6, 5);
    pub const H6: Self = Self::from_file_rank(7, 5);
    pub const A7: Self = Self::from_file_rank(0, 6);
    pub const B7: Self = Self::from_file_rank(1, 6);
    pub const C7: Self = Self::from_file_rank(2, 6);
    pub const D7: Self = Self::from_file_rank(3, 6);
    pub const E7: Self = Self::from_file_rank(4, 6);
    pub const F7: Self = Self::from_file_rank(5, 6);
    pub const G7: Self = Self::from_file_rank(6, 6);
    pub const H7: Self = Self::from_file_rank(7, 6);
    pub const A8: Self = Self::from_file_rank(0, 7);
    pub const B8: Self = Self::from_file_rank(1, 7);
    pub const C8: Self = Self::from_file_rank(2, 7);
    pub const D8: Self = Self::from_file_rank(3, 7);
    pub const E8: Self = Self::from_file_rank(4, 7);
    pub const F8: Self = Self::from_file_rank(5, 7);
    pub const G8: Self = Self::from_file_rank(6, 7);
    pub const H8: Self = Self::from_file_rank(7, 7);

    /// Returns if this square is on the board
    ///
    /// ```
    /// # use board::BoardSquare;
    /// assert!(!BoardSquare::INVALID.is_valid());
    /// assert!(BoardSquare::H8.is_valid());
    /// ```
    pub const fn is_valid(self) -> bool {
        self.0 & 0x88 == 0
    }

    /// Produce a square from the file and rank (both counted from zero), returning
    /// [`Self::INVALID`] if either is off the board.
    pub const fn from_file_rank(file: u8, rank: u8) -> Self {
        if rank < 8 && file < 8 {
            Self(rank << 4 | file)
        } else {
            Self::INVALID
        }
    }

    /// Returns the `(file, rank)` tuple if this square is valid
    pub const fn to_file_rank(self) -> Option<(u8, u8)> {
        if self.is_valid() {
            Some((self.file(), self.rank()))
        } else {
            None
        }
    }

    /// The file of this square, from 0 (the a-file) to 7 (the h-file)
    ///
    /// Meaningless for [`Self::INVALID`].
    pub const fn file(self) -> u8 {
        self.0 & 0x07
    }

    /// The rank of this square, from 0 (the first rank) to 7 (the eighth rank)
    ///
    /// Meaningless for [`Self::INVALID`].
    pub const fn rank(self) -> u8 {
        (self.0 >> 4) & 0x07
    }

    /// The letter naming this square's file
    pub const fn file_char(self) -> char {
        (b'a' + self.file()) as char
    }

    /// The digit naming this square's rank
    pub const fn rank_char(self) -> char {
        (b'1' + self.rank()) as char
    }

    /// Offset the given number of files and ranks.
    ///
    /// Positive files move towards the h-file, positive ranks towards the eighth rank.
    ///
    /// ```rust
    /// use board::BoardSquare;
    /// assert_eq!(BoardSquare::D2, BoardSquare::A1.offset(3, 1));
    /// assert_eq!(BoardSquare::A1, BoardSquare::D2.offset(-3, -1));
    /// assert_eq!(BoardSquare::F7, BoardSquare::F7.offset(0, 0));
    /// assert!(!BoardSquare::D1.offset(0, -1).is_valid());
    /// assert!(!BoardSquare::D8.offset(0, 1).is_valid());
    /// assert!(!BoardSquare::A4.offset(-1, 0).is_valid());
    /// assert!(!BoardSquare::H4.offset(1, 0).is_valid());
    /// ```
    pub const fn offset(self, files: i8, ranks: i8) -> Self {
        let Some((file, rank)) = self.to_file_rank() else {
            return Self::INVALID;
        };
        let file = file as i8 + files;
        let rank = rank as i8 + ranks;
        if 0 <= file && file < 8 && 0 <= rank && rank < 8 {
            Self::from_file_rank(file as u8, rank as u8)
        } else {
            Self::INVALID
        }
    }

    /// An iterator over all valid squares on the board, from a1 to h8 rank by rank
    ///
    /// ```
    /// assert_eq!(board::BoardSquare::all_squares().count(), 64);
    /// ```
    pub fn all_squares() -> impl Iterator<Item = Self> {
        (0..64u8).map(|idx| Self::from_file_rank(idx & 0x07, idx >> 3))
    }
}
impl fmt::Debug for BoardSquare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardSquare")
            .field("repr", &format_args!("{:X}", self.0))
            .field("readable", &format_args!("{self}"))
            .finish()
    }
}
/// Writes the square name (`e4`), or `-` for an invalid square as FEN does
impl fmt::Display for BoardSquare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}{}", self.file_char(), self.rank_char())
        } else {
            f.write_str("-")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("board square string was invalid")]
pub struct BoardSquareFromStrErr;

impl FromStr for BoardSquare {
    type Err = BoardSquareFromStrErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match *s.as_bytes() {
            [file @ b'a'..=b'h', rank @ b'1'..=b'8'] => {
                Ok(Self::from_file_rank(file - b'a', rank - b'1'))
            }
            _ => Err(BoardSquareFromStrErr),
        }
    }
}

/// A move from one square to another
///
/// This doesn't say anything about whether the move is legal; ask the board that.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub source: BoardSquare,
    pub target: BoardSquare,
    /// What a pawn reaching the last rank turns into
    ///
    /// `None` on a promoting move means a queen.
    pub promotion: Option<PieceKind>,
}
impl Move {
    /// The "no move" sentinel
    pub const NULL: Self = Self {
        source: BoardSquare::INVALID,
        target: BoardSquare::INVALID,
        promotion: None,
    };

    pub const fn new(source: BoardSquare, target: BoardSquare) -> Self {
        Self {
            source,
            target,
            promotion: None,
        }
    }

    pub const fn with_promotion(self, kind: PieceKind) -> Self {
        Self {
            promotion: Some(kind),
            ..self
        }
    }

    /// Whether this is the "no move" sentinel (or otherwise touches an invalid square)
    pub const fn is_null(self) -> bool {
        !self.source.is_valid() || !self.target.is_valid()
    }
}
/// Coordinate notation (`e2e4`, `e7e8q`), with `0000` for the null move
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("0000");
        }
        write!(f, "{}{}", self.source, self.target)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.letter().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("move string was invalid")]
pub struct MoveFromStrErr;

impl FromStr for Move {
    type Err = MoveFromStrErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "0000" {
            return Ok(Self::NULL);
        }
        if !s.is_ascii() || !(s.len() == 4 || s.len() == 5) {
            return Err(MoveFromStrErr);
        }
        let source = s[0..2].parse().map_err(|_| MoveFromStrErr)?;
        let target = s[2..4].parse().map_err(|_| MoveFromStrErr)?;
        let promotion = match s[4..].chars().next() {
            Some(c) => match PieceKind::from_letter(c.to_ascii_uppercase()) {
                Some(kind) if kind.is_promotable() => Some(kind),
                _ => return Err(MoveFromStrErr),
            },
            None => None,
        };
        Ok(Self {
            source,
            target,
            promotion,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid algebraic notation")]
pub struct AlgebraicNotationMoveParseError;

/// The data parsed out from a move in algebraic notation
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct AlgebraicNotationMove {
    /// What move happened on the board
    pub move_type: AlgebraicNotationMoveType,
    /// Whether the move leaves the opponent in check(mate)
    pub check: CheckStatus,
}
impl fmt::Display for AlgebraicNotationMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.move_type, self.check)
    }
}
impl FromStr for AlgebraicNotationMove {
    type Err = AlgebraicNotationMoveParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (check, s) = if let Some(s) = s.strip_suffix('#') {
            (CheckStatus::Checkmate, s)
        } else if let Some(s) = s.strip_suffix('+') {
            (CheckStatus::Check, s)
        } else {
            (CheckStatus::None, s)
        };
        Ok(Self {
            move_type: s.parse()?,
            check,
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AlgebraicNotationMoveType {
    /// A move which isn't a castle (because those are notated entirely unrelatedly)
    Normal(AlgebraicNotationNormalMove),
    CastleKingside,
    CastleQueenside,
}
impl fmt::Display for AlgebraicNotationMoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal(mv) => mv.fmt(f),
            Self::CastleKingside => f.write_str("O-O"),
            Self::CastleQueenside => f.write_str("O-O-O"),
        }
    }
}
impl FromStr for AlgebraicNotationMoveType {
    type Err = AlgebraicNotationMoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "O-O" | "0-0" => Self::CastleKingside,
            "O-O-O" | "0-0-0" => Self::CastleQueenside,
            _ => Self::Normal(s.parse()?),
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CheckStatus {
    None,
    Check,
    Checkmate,
}
/// Returns the status as appended to a move in algebraic notation
impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "",
            Self::Check => "+",
            Self::Checkmate => "#",
        })
    }
}

/// All the data from a move that isn't a castle
///
/// This doesn't include the check status after the move, because that is shared with castling in
/// the [`AlgebraicNotationMove`] struct.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct AlgebraicNotationNormalMove {
    pub kind: PieceKind,
    /// The file of the moving piece, when needed to disambiguate (or for a pawn capture)
    pub from_file: Option<u8>,
    /// The rank of the moving piece, when needed to disambiguate
    pub from_rank: Option<u8>,
    pub capture: bool,
    pub target: BoardSquare,
    pub promotion: Option<PieceKind>,
}
impl fmt::Display for AlgebraicNotationNormalMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind != PieceKind::Pawn {
            write!(f, "{}", self.kind.letter())?;
        }
        if let Some(file) = self.from_file {
            write!(f, "{}", (b'a' + file) as char)?;
        }
        if let Some(rank) = self.from_rank {
            write!(f, "{}", (b'1' + rank) as char)?;
        }
        if self.capture {
            f.write_str("x")?;
        }
        write!(f, "{}", self.target)?;
        if let Some(promotion) = self.promotion {
            write!(f, "={}", promotion.letter())?;
        }
        Ok(())
    }
}
impl FromStr for AlgebraicNotationNormalMove {
    type Err = AlgebraicNotationMoveParseError;

    fn from_str(mut s: &str) -> Result<Self, Self::Err> {
        if !s.is_ascii() {
            return Err(AlgebraicNotationMoveParseError);
        }
        let kind = match s.chars().next().and_then(PieceKind::from_letter) {
            Some(kind) => {
                s = &s[1..];
                kind
            }
            None => PieceKind::Pawn,
        };
        // Promotions are written `e8=Q`, though `e8Q` shows up in the wild too
        let promotion = {
            let bytes = s.as_bytes();
            let len = bytes.len();
            let letter = match (len.checked_sub(2).map(|i| bytes[i]), bytes.last().copied()) {
                (Some(b'='), Some(letter)) => {
                    s = &s[..len - 2];
                    Some(letter)
                }
                (Some(b'1'..=b'8'), Some(letter)) if letter.is_ascii_uppercase() => {
                    s = &s[..len - 1];
                    Some(letter)
                }
                _ => None,
            };
            match letter {
                Some(letter) => match PieceKind::from_letter(letter as char) {
                    Some(kind) if kind.is_promotable() => Some(kind),
                    _ => return Err(AlgebraicNotationMoveParseError),
                },
                None => None,
            }
        };
        if s.len() < 2 {
            return Err(AlgebraicNotationMoveParseError);
        }
        let target = BoardSquare::from_str(&s[s.len() - 2..])
            .map_err(|_| AlgebraicNotationMoveParseError)?;
        s = &s[..s.len() - 2];
        let capture = match s.strip_suffix('x') {
            Some(rest) => {
                s = rest;
                true
            }
            None => false,
        };
        let from_file = match s.as_bytes().first().copied() {
            Some(c @ b'a'..=b'h') => {
                s = &s[1..];
                Some(c - b'a')
            }
            _ => None,
        };
        let from_rank = match s.as_bytes().first().copied() {
            Some(c @ b'1'..=b'8') => {
                s = &s[1..];
                Some(c - b'1')
            }
            _ => None,
        };
        if !s.is_empty() {
            return Err(AlgebraicNotationMoveParseError);
        }
        Ok(Self {
            kind,
            from_file,
            from_rank,
            capture,
            target,
            promotion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use quickcheck::{quickcheck, Arbitrary, Gen};

    impl Arbitrary for BoardSquare {
        fn arbitrary(g: &mut Gen) -> Self {
            Self::from_file_rank(u8::arbitrary(g) % 8, u8::arbitrary(g) % 8)
        }
    }

    quickcheck! {
        fn test_square_name_round_trip(square: BoardSquare) -> bool {
            square.to_string().parse::<BoardSquare>() == Ok(square)
        }

        fn test_offset_is_reversible(square: BoardSquare, files: i8, ranks: i8) -> bool {
            let (files, ranks) = (files % 8, ranks % 8);
            let moved = square.offset(files, ranks);
            !moved.is_valid() || moved.offset(-files, -ranks) == square
        }

        fn test_other_color_is_involutive(white: bool) -> bool {
            let color = if white { Color::White } else { Color::Black };
            color.other() != color && color.other().other() == color
        }
    }

    #[test]
    fn test_every_byte_knows_when_valid() {
        for repr in u8::MIN..=u8::MAX {
            let square = BoardSquare(repr);
            assert_eq!(square.is_valid(), square.to_file_rank().is_some());
        }
    }

    #[test]
    fn test_all_squares_are_distinct_and_valid() {
        let squares: Vec<_> = BoardSquare::all_squares().collect();
        assert!(squares.iter().all(|square| square.is_valid()));
        for (idx, square) in squares.iter().enumerate() {
            assert!(!squares[idx + 1..].contains(square), "{square} repeated");
        }
    }

    #[test]
    fn test_invalid_square_strings() {
        for s in ["", "a", "a0", "a9", "i1", "e44", "E4"] {
            assert!(s.parse::<BoardSquare>().is_err(), "{s:?} parsed");
        }
    }

    #[test]
    fn test_move_text() {
        assert_eq!(
            "e2e4".parse::<Move>(),
            Ok(Move::new(BoardSquare::E2, BoardSquare::E4))
        );
        assert_eq!(
            "e7e8n".parse::<Move>(),
            Ok(Move::new(BoardSquare::E7, BoardSquare::E8).with_promotion(PieceKind::Knight))
        );
        assert_eq!("0000".parse::<Move>(), Ok(Move::NULL));
        assert!("e7e8k".parse::<Move>().is_err());
        assert!("e2e".parse::<Move>().is_err());
        assert_eq!(Move::NULL.to_string(), "0000");
        assert_eq!(
            Move::new(BoardSquare::A7, BoardSquare::A8)
                .with_promotion(PieceKind::Rook)
                .to_string(),
            "a7a8r"
        );
    }

    #[test]
    fn test_algebraic_round_trip() {
        #[track_caller]
        fn assert_round_trip(algebraic: &str) {
            let round_trip = AlgebraicNotationMove::from_str(algebraic)
                .expect("Couldn't parse input from string")
                .to_string();
            assert_eq!(algebraic, &round_trip);
        }
        assert_round_trip("e4");
        assert_round_trip("e4#");
        assert_round_trip("exd5");
        assert_round_trip("Qxd5");
        assert_round_trip("Qaxg8");
        assert_round_trip("Nb5xd4");
        assert_round_trip("R1d1+");
        assert_round_trip("exf8=N+");
        assert_round_trip("O-O");
        assert_round_trip("O-O-O");
    }

    #[test]
    fn test_algebraic_parse_fields() {
        let parsed: AlgebraicNotationMove = "Rhd1".parse().unwrap();
        assert_eq!(
            parsed.move_type,
            AlgebraicNotationMoveType::Normal(AlgebraicNotationNormalMove {
                kind: PieceKind::Rook,
                from_file: Some(7),
                from_rank: None,
                capture: false,
                target: BoardSquare::D1,
                promotion: None,
            })
        );
        let promotion: AlgebraicNotationMove = "b1Q".parse().unwrap();
        assert_eq!(promotion.to_string(), "b1=Q");
    }

    #[test]
    fn test_algebraic_rejects_garbage() {
        for s in ["", "x", "Zf3", "e9", "e8=K", "Nf3g", "ééé"] {
            assert!(s.parse::<AlgebraicNotationMove>().is_err(), "{s:?} parsed");
        }
    }
}
