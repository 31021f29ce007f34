//! Which squares are attacked, and whether kings are in check

use board::{BoardSquare, CastleRights, Color, Move, Piece, PieceKind};

use crate::Board;

impl Board {
    /// Returns `true` if a piece belonging to `attacker` could move onto `square`
    ///
    /// This only considers how the pieces move: an attack by a pinned piece still counts.
    pub fn attacks(&self, square: BoardSquare, attacker: Color) -> bool {
        self.find_attacker(square, attacker).is_some()
    }

    /// Find a piece belonging to `attacker` which could move onto `square`, if any
    ///
    /// The movement rules are only written once, in [`Board::is_legal`], so this asks them on a
    /// scratch copy of the board where it is `attacker`'s move and a defending pawn stands on
    /// `square`. The pawn makes pawn captures count and pawn pushes not count.
    pub fn find_attacker(&self, square: BoardSquare, attacker: Color) -> Option<BoardSquare> {
        if !square.is_valid() {
            return None;
        }
        let mut probe = self.clone();
        probe.set(square, Some(Piece::new(attacker.other(), PieceKind::Pawn)));
        probe.side_to_move = attacker;
        let attacker = probe.sources_reaching(square, None, false).next();
        attacker
    }

    /// Squares of the side to move's pieces which can move onto `target`
    ///
    /// With `kind`, only pieces of that kind are considered. With `check_for_check`, moves leaving
    /// the mover's own king attacked don't count.
    pub(crate) fn sources_reaching(
        &self,
        target: BoardSquare,
        kind: Option<PieceKind>,
        check_for_check: bool,
    ) -> impl Iterator<Item = BoardSquare> + '_ {
        self.pieces()
            .filter(move |(_, piece)| {
                piece.color == self.side_to_move && kind.map_or(true, |kind| piece.kind == kind)
            })
            .map(|(source, _)| source)
            .filter(move |&source| self.is_legal(Move::new(source, target), check_for_check))
    }

    /// Returns `true` if the given color's king is in check
    ///
    /// # Panics
    /// If the board has no king of that color. Boards reached by legal play always have one, so
    /// this means a position was built wrong upstream, and guessing would risk wrong answers about
    /// legality.
    pub fn in_check(&self, color: Color) -> bool {
        self.attacks(self.expect_king(color), color.other())
    }

    /// The square of `color`'s king, for queries which make no sense without one
    #[track_caller]
    pub(crate) fn expect_king(&self, color: Color) -> BoardSquare {
        let Some(king) = self.king_square(color) else {
            panic!("no {color:?} king on board {self:?}");
        };
        king
    }

    pub fn can_castle_kingside(&self, color: Color) -> bool {
        self.can_castle(color, true)
    }

    pub fn can_castle_queenside(&self, color: Color) -> bool {
        self.can_castle(color, false)
    }

    /// Whether the given castle is allowed right now
    ///
    /// The right must not have been lost, the king and rook must be on their starting squares
    /// with nothing between them, and the king may not be in check, pass through check, or land
    /// in check.
    fn can_castle(&self, color: Color, kingside: bool) -> bool {
        let rank = color.home_rank();
        let square = |file| BoardSquare::from_file_rank(file, rank);
        let (rook_file, between, king_path): (u8, &[u8], &[u8]) = if kingside {
            (7, &[5, 6][..], &[5, 6][..])
        } else {
            (0, &[1, 2, 3][..], &[3, 2][..])
        };
        self.castles.contains(CastleRights::flag(color, kingside))
            && self.get(square(4)) == Some(Piece::new(color, PieceKind::King))
            && self.get(square(rook_file)) == Some(Piece::new(color, PieceKind::Rook))
            && between.iter().all(|&file| self.get(square(file)).is_none())
            && !self.in_check(color)
            && king_path
                .iter()
                .all(|&file| !self.attacks(square(file), color.other()))
    }
}
