//! Making moves on the board

use board::{BoardSquare, Move, Piece, PieceKind};

use crate::Board;

impl Board {
    /// Do the move without checking if it's legal
    ///
    /// Callers must have checked the move with [`Board::is_legal`]. An illegal move leaves the
    /// board in some state that no game could reach.
    pub fn apply(&mut self, mv: Move) {
        let Some(piece) = self.get(mv.source) else {
            debug_assert!(false, "no piece to move for {mv} on {self:?}");
            return;
        };
        let captured = self.get(mv.target);
        let file_delta = mv.target.file() as i8 - mv.source.file() as i8;
        let rank_delta = mv.target.rank() as i8 - mv.source.rank() as i8;

        if piece.kind == PieceKind::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        // En passant takes the pawn beside the target, not on it
        if piece.kind == PieceKind::Pawn
            && file_delta != 0
            && self.is_en_passant_square(piece.color, mv.target)
        {
            let passed_pawn = mv.target.offset(0, -piece.color.pawn_direction());
            self.set(passed_pawn, None);
        }

        self.en_passant_target = if piece.kind == PieceKind::Pawn && rank_delta.abs() == 2 {
            mv.source.offset(0, piece.color.pawn_direction())
        } else {
            BoardSquare::INVALID
        };

        if piece.kind == PieceKind::King && file_delta.abs() == 2 {
            let rank = mv.source.rank();
            let (rook_source, rook_target) = if file_delta > 0 {
                (BoardSquare::from_file_rank(7, rank), BoardSquare::from_file_rank(5, rank))
            } else {
                (BoardSquare::from_file_rank(0, rank), BoardSquare::from_file_rank(3, rank))
            };
            let rook = self.get(rook_source);
            self.set(rook_source, None);
            self.set(rook_target, rook);
        }

        self.castles = self.castles.after_move(piece, mv.source, mv.target);

        if piece.color.is_black() {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = piece.color.other();

        let placed = if piece.kind == PieceKind::Pawn
            && mv.target.rank() == piece.color.promotion_rank()
        {
            Piece::new(piece.color, mv.promotion.unwrap_or(PieceKind::Queen))
        } else {
            piece
        };
        self.set(mv.target, Some(placed));
        self.set(mv.source, None);
    }
}
