//! Deciding whether a single candidate move is legal

use board::{BoardSquare, Color, Move, PieceKind};

use crate::Board;

impl Board {
    /// Check if this move is legal to do right now.
    ///
    /// With `check_for_check`, a move which leaves the mover's own king attacked is illegal. Without
    /// it, only how the pieces move is considered, which is what attack detection wants.
    ///
    /// There is no reason given for an illegal move: a blocked path and a move into check look
    /// the same to the caller.
    pub fn is_legal(&self, mv: Move, check_for_check: bool) -> bool {
        if mv.is_null() {
            return false;
        }
        let Some(piece) = self.get(mv.source) else {
            return false;
        };
        if piece.color != self.side_to_move {
            return false;
        }
        let captured = self.get(mv.target);
        if captured.is_some_and(|captured| captured.color == piece.color) {
            return false;
        }
        if mv.source == mv.target {
            return false;
        }

        let file_delta = mv.target.file() as i8 - mv.source.file() as i8;
        let rank_delta = mv.target.rank() as i8 - mv.source.rank() as i8;
        let (file_distance, rank_distance) = (file_delta.unsigned_abs(), rank_delta.unsigned_abs());

        if piece.kind != PieceKind::Knight && !self.path_is_clear(mv.source, mv.target) {
            return false;
        }

        let promotes = piece.kind == PieceKind::Pawn
            && mv.target.rank() == piece.color.promotion_rank();
        match mv.promotion {
            Some(kind) if !promotes || !kind.is_promotable() => return false,
            _ => {}
        }

        let moves_like_piece = match piece.kind {
            PieceKind::Pawn => {
                let forward = rank_delta * piece.color.pawn_direction();
                match (file_distance, forward) {
                    (0, 1) => captured.is_none(),
                    (0, 2) => {
                        captured.is_none() && mv.source.rank() == piece.color.pawn_rank()
                    }
                    (1, 1) => {
                        captured.is_some() || self.is_en_passant_square(piece.color, mv.target)
                    }
                    _ => false,
                }
            }
            PieceKind::Knight => {
                (file_distance, rank_distance) == (1, 2) || (file_distance, rank_distance) == (2, 1)
            }
            PieceKind::Bishop => file_distance == rank_distance,
            PieceKind::Rook => file_delta == 0 || rank_delta == 0,
            PieceKind::Queen => {
                file_distance == rank_distance || file_delta == 0 || rank_delta == 0
            }
            PieceKind::King => {
                if file_distance <= 1 && rank_distance <= 1 {
                    true
                } else {
                    match castle_side(piece.color, mv) {
                        Some(kingside) => {
                            captured.is_none()
                                && if kingside {
                                    self.can_castle_kingside(piece.color)
                                } else {
                                    self.can_castle_queenside(piece.color)
                                }
                        }
                        None => false,
                    }
                }
            }
        };
        if !moves_like_piece {
            return false;
        }

        if check_for_check && self.gives_check(mv, piece.color) {
            return false;
        }
        true
    }

    /// Returns `true` if `color`'s king is in check after making the given move
    ///
    /// The move is made on a scratch copy, so this board is untouched. The move isn't checked for
    /// legality first.
    pub fn gives_check(&self, mv: Move, color: Color) -> bool {
        let mut scratch = self.clone();
        scratch.apply(mv);
        scratch.in_check(color)
    }

    /// Whether every square strictly between `source` and `target` is empty
    ///
    /// Only squares in a straight line or diagonal have anything between them; for any other
    /// pair of squares, this is vacuously true.
    fn path_is_clear(&self, source: BoardSquare, target: BoardSquare) -> bool {
        let file_delta = target.file() as i8 - source.file() as i8;
        let rank_delta = target.rank() as i8 - source.rank() as i8;
        let on_line = file_delta == 0
            || rank_delta == 0
            || file_delta.unsigned_abs() == rank_delta.unsigned_abs();
        if !on_line {
            return true;
        }
        let (file_step, rank_step) = (file_delta.signum(), rank_delta.signum());
        let mut square = source.offset(file_step, rank_step);
        while square != target {
            if !square.is_valid() {
                return true;
            }
            if self.get(square).is_some() {
                return false;
            }
            square = square.offset(file_step, rank_step);
        }
        true
    }
    /// Whether a `color` pawn moving diagonally onto `target` would capture en passant
    pub(crate) fn is_en_passant_square(&self, color: Color, target: BoardSquare) -> bool {
        self.en_passant_target.is_valid()
            && target == self.en_passant_target
            && target.rank() == color.en_passant_rank()
    }
}

/// If this is a king's castling move for `color`, which side it castles on
///
/// `Some(true)` is kingside and `Some(false)` queenside.
pub(crate) fn castle_side(color: Color, mv: Move) -> Option<bool> {
    let rank = color.home_rank();
    if mv.source != BoardSquare::from_file_rank(4, rank) {
        return None;
    }
    if mv.target == BoardSquare::from_file_rank(6, rank) {
        Some(true)
    } else if mv.target == BoardSquare::from_file_rank(2, rank) {
        Some(false)
    } else {
        None
    }
}
