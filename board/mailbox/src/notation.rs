//! Converting between moves and standard algebraic notation

use board::{
    AlgebraicNotationMove, AlgebraicNotationMoveParseError, AlgebraicNotationMoveType,
    AlgebraicNotationNormalMove, BoardSquare, Move, Piece, PieceKind,
};

use crate::{legality::castle_side, Board};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlgebraicNotationError {
    #[error("invalid algebraic notation given")]
    InvalidAlgebraicNotation(#[from] AlgebraicNotationMoveParseError),
    #[error("no legal move matches {0}")]
    NoSourcePiece(AlgebraicNotationMove),
    #[error("multiple legal moves match {0}, but no disambiguation given")]
    AmbiguousSourcePiece(AlgebraicNotationMove),
}

impl Board {
    /// Describe the given move in algebraic notation, or `None` if it isn't legal here
    ///
    /// The source square is only given when another piece of the same kind could also legally
    /// reach the target: the file if that tells them apart, else the rank, else both. Pawn
    /// captures always give the file they came from.
    pub fn algebraic(&self, mv: Move) -> Option<AlgebraicNotationMove> {
        if !self.is_legal(mv, true) {
            return None;
        }
        let piece = self.get(mv.source)?;
        let move_type = match (piece.kind, castle_side(piece.color, mv)) {
            (PieceKind::King, Some(true)) => AlgebraicNotationMoveType::CastleKingside,
            (PieceKind::King, Some(false)) => AlgebraicNotationMoveType::CastleQueenside,
            _ => AlgebraicNotationMoveType::Normal(self.normal_notation(mv, piece)),
        };

        let mut after = self.clone();
        after.apply(mv);
        Some(AlgebraicNotationMove {
            move_type,
            check: after.check_status(piece.color.other()),
        })
    }

    fn normal_notation(&self, mv: Move, piece: Piece) -> AlgebraicNotationNormalMove {
        let capture = self.get(mv.target).is_some()
            || (piece.kind == PieceKind::Pawn && mv.source.file() != mv.target.file());
        let (file, rank) = (mv.source.file(), mv.source.rank());
        let (from_file, from_rank) = if piece.kind == PieceKind::Pawn {
            (capture.then_some(file), None)
        } else {
            let rivals = self
                .sources_reaching(mv.target, Some(piece.kind), true)
                .filter(|&source| source != mv.source)
                .collect::<Vec<BoardSquare>>();
            if rivals.is_empty() {
                (None, None)
            } else if rivals.iter().all(|rival| rival.file() != file) {
                (Some(file), None)
            } else if rivals.iter().all(|rival| rival.rank() != rank) {
                (None, Some(rank))
            } else {
                (Some(file), Some(rank))
            }
        };
        let promotion = (piece.kind == PieceKind::Pawn
            && mv.target.rank() == piece.color.promotion_rank())
        .then(|| mv.promotion.unwrap_or(PieceKind::Queen));
        AlgebraicNotationNormalMove {
            kind: piece.kind,
            from_file,
            from_rank,
            capture,
            target: mv.target,
            promotion,
        }
    }

    /// The algebraic notation for a move, falling back to coordinates (`e2e4`) for a move which
    /// isn't legal here
    pub fn notate(&self, mv: Move) -> String {
        match self.algebraic(mv) {
            Some(notated) => notated.to_string(),
            None => mv.to_string(),
        }
    }

    /// Find the legal move that the given algebraic notation describes
    ///
    /// The capture marker and check suffix aren't needed to find the move, so they aren't
    /// checked against the board.
    pub fn resolve_algebraic(
        &self,
        notated: &AlgebraicNotationMove,
    ) -> Result<Move, AlgebraicNotationError> {
        let color = self.side_to_move;
        let king = BoardSquare::from_file_rank(4, color.home_rank());
        let normal = match notated.move_type {
            AlgebraicNotationMoveType::CastleKingside => {
                let mv = Move::new(king, king.offset(2, 0));
                return self.legal_castle(mv, notated);
            }
            AlgebraicNotationMoveType::CastleQueenside => {
                let mv = Move::new(king, king.offset(-2, 0));
                return self.legal_castle(mv, notated);
            }
            AlgebraicNotationMoveType::Normal(normal) => normal,
        };

        let piece = Piece::new(color, normal.kind);
        let mut candidates = self
            .pieces()
            .filter(|&(source, found)| {
                found == piece
                    && normal.from_file.map_or(true, |file| source.file() == file)
                    && normal.from_rank.map_or(true, |rank| source.rank() == rank)
            })
            .map(|(source, _)| Move {
                source,
                target: normal.target,
                promotion: normal.promotion,
            })
            .filter(|&mv| self.is_legal(mv, true));
        let Some(mv) = candidates.next() else {
            return Err(AlgebraicNotationError::NoSourcePiece(*notated));
        };
        if candidates.next().is_some() {
            return Err(AlgebraicNotationError::AmbiguousSourcePiece(*notated));
        }
        Ok(mv)
    }

    fn legal_castle(
        &self,
        mv: Move,
        notated: &AlgebraicNotationMove,
    ) -> Result<Move, AlgebraicNotationError> {
        let king = Piece::new(self.side_to_move, PieceKind::King);
        if self.get(mv.source) == Some(king) && self.is_legal(mv, true) {
            Ok(mv)
        } else {
            Err(AlgebraicNotationError::NoSourcePiece(*notated))
        }
    }

    /// Parse algebraic notation text and find the legal move it describes
    pub fn parse_algebraic(&self, text: &str) -> Result<Move, AlgebraicNotationError> {
        let notated = text.parse::<AlgebraicNotationMove>()?;
        self.resolve_algebraic(&notated)
    }
}
