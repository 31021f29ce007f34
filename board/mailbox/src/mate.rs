use board::{BoardSquare, CheckStatus, Color, Move, PieceKind};

use crate::Board;

/// The eight steps a king can take
const KING_STEPS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

impl Board {
    /// Returns `true` if `color` has been checkmated
    ///
    /// A side not in check is never checkmated (so stalemate is `false`). Otherwise, the check is
    /// refuted if the king can step out of it, if the checking piece can be captured, or if a
    /// piece can be put between the checking piece and the king. Each of those is only counted
    /// when the answering move doesn't leave the king attacked, so a pinned defender doesn't
    /// help, and double check falls to the king's steps alone.
    ///
    /// # Panics
    /// If the board has no king of that color.
    pub fn is_checkmate(&self, color: Color) -> bool {
        let king = self.expect_king(color);
        if !self.attacks(king, color.other()) {
            return false;
        }
        let mut defender = self.clone();
        defender.side_to_move = color;

        let escapes = KING_STEPS.iter().any(|&(files, ranks)| {
            let target = king.offset(files, ranks);
            target.is_valid() && defender.is_legal(Move::new(king, target), true)
        });
        if escapes {
            return false;
        }

        let Some(attacker) = self.find_attacker(king, color.other()) else {
            return false;
        };
        if defender.sources_reaching(attacker, None, true).next().is_some() {
            return false;
        }
        if defender.refutes_by_en_passant(attacker) {
            return false;
        }

        let attacking_kind = self.get(attacker).map(|piece| piece.kind);
        if attacking_kind == Some(PieceKind::Knight) {
            return true;
        }
        !defender.can_block(king, attacker)
    }

    /// Whether the checking pawn on `attacker` just made a double step and can be taken en passant
    fn refutes_by_en_passant(&self, attacker: BoardSquare) -> bool {
        let Some(pawn) = self.get(attacker) else {
            return false;
        };
        if pawn.kind != PieceKind::Pawn || !self.en_passant_target.is_valid() {
            return false;
        }
        let skipped = attacker.offset(0, -pawn.color.pawn_direction());
        skipped == self.en_passant_target
            && self
                .sources_reaching(skipped, Some(PieceKind::Pawn), true)
                .next()
                .is_some()
    }

    /// Whether any piece besides the king can legally move between `king` and `attacker`
    fn can_block(&self, king: BoardSquare, attacker: BoardSquare) -> bool {
        let file_step = (attacker.file() as i8 - king.file() as i8).signum();
        let rank_step = (attacker.rank() as i8 - king.rank() as i8).signum();
        let mut square = king.offset(file_step, rank_step);
        while square.is_valid() && square != attacker {
            if self
                .sources_reaching(square, None, true)
                .any(|source| source != king)
            {
                return true;
            }
            square = square.offset(file_step, rank_step);
        }
        false
    }

    /// How the given side's king stands: fine, in check, or checkmated
    pub fn check_status(&self, color: Color) -> CheckStatus {
        if self.is_checkmate(color) {
            CheckStatus::Checkmate
        } else if self.in_check(color) {
            CheckStatus::Check
        } else {
            CheckStatus::None
        }
    }
}
