//! Castling availability, as tracked between moves

use crate::{BoardSquare, Color, Piece, PieceKind};

bitflags::bitflags! {
    /// Which castles are allowed (the king and rook haven't moved yet)
    ///
    /// These castles aren't necessarily legal right now, as they may be blocked by intervening
    /// pieces and/or checks.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CastleRights: u8 {
        const WhiteKingside = 0b0000_0001;
        const WhiteQueenside = 0b0000_0010;
        /// A mask for whether white can castle in either direction
        const White = 0b0000_0011;
        const BlackKingside = 0b0000_0100;
        const BlackQueenside = 0b0000_1000;
        /// A mask for whether black can castle in either direction
        const Black = 0b0000_1100;
    }
}

impl CastleRights {
    /// The flag for castling on the given side of the board
    pub const fn flag(color: Color, kingside: bool) -> Self {
        match (kingside, color) {
            (true, Color::White) => Self::WhiteKingside,
            (false, Color::White) => Self::WhiteQueenside,
            (true, Color::Black) => Self::BlackKingside,
            (false, Color::Black) => Self::BlackQueenside,
        }
    }

    /// Both flags belonging to the given side
    pub const fn side(color: Color) -> Self {
        match color {
            Color::White => Self::White,
            Color::Black => Self::Black,
        }
    }

    pub const fn kingside(self, color: Color) -> bool {
        self.contains(Self::flag(color, true))
    }

    pub const fn queenside(self, color: Color) -> bool {
        self.contains(Self::flag(color, false))
    }

    /// The flag lost when something moves off of, or is captured on, the given square
    const fn flag_for_rook_square(square: BoardSquare) -> Self {
        match square {
            BoardSquare::A1 => Self::WhiteQueenside,
            BoardSquare::H1 => Self::WhiteKingside,
            BoardSquare::A8 => Self::BlackQueenside,
            BoardSquare::H8 => Self::BlackKingside,
            _ => Self::empty(),
        }
    }

    /// The rights remaining after `piece` moves from `source` to `target`
    ///
    /// Moving the king gives up both castles for that side, moving a rook off its corner gives up
    /// castling with that rook, and capturing a rook on its corner takes the opponent's castle on
    /// that side away.
    pub fn after_move(self, piece: Piece, source: BoardSquare, target: BoardSquare) -> Self {
        let lost = match piece.kind {
            PieceKind::King => Self::side(piece.color),
            PieceKind::Rook => Self::flag_for_rook_square(source) & Self::side(piece.color),
            _ => Self::empty(),
        };
        let captured = Self::flag_for_rook_square(target) & Self::side(piece.color.other());
        self & !(lost | captured)
    }

    /// Display the rights in FEN format
    ///
    /// ```
    /// # use board::CastleRights;
    /// assert_eq!(CastleRights::all().to_fen(), "KQkq");
    /// assert_eq!((CastleRights::WhiteQueenside | CastleRights::BlackKingside).to_fen(), "Qk");
    /// assert_eq!(CastleRights::empty().to_fen(), "-");
    /// ```
    pub fn to_fen(self) -> String {
        let mut options = String::with_capacity(4);
        for (flag, letter) in [
            (Self::WhiteKingside, 'K'),
            (Self::WhiteQueenside, 'Q'),
            (Self::BlackKingside, 'k'),
            (Self::BlackQueenside, 'q'),
        ] {
            if self.contains(flag) {
                options.push(letter);
            }
        }
        if options.is_empty() {
            options.push('-');
        }
        options
    }

    /// Parse the castling field of a FEN string
    ///
    /// Returns `None` if the field contains anything but `KQkq` letters, or a lone `-`.
    pub fn from_fen(fen: &str) -> Option<Self> {
        if fen == "-" {
            return Some(Self::empty());
        }
        if fen.is_empty() {
            return None;
        }
        fen.chars().try_fold(Self::empty(), |rights, c| {
            Some(
                rights
                    | match c {
                        'K' => Self::WhiteKingside,
                        'Q' => Self::WhiteQueenside,
                        'k' => Self::BlackKingside,
                        'q' => Self::BlackQueenside,
                        _ => return None,
                    },
            )
        })
    }
}
