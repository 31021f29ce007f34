use board::{Move, PieceKind};
use mailbox::Board;

/// The handle for a node in a [`GameTree`]
///
/// Handles are only meaningful for the tree which gave them out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);
impl NodeId {
    /// Every tree's root, the position before any moves
    pub const ROOT: Self = Self(0);

    /// The position of the node in its tree's arena
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A position in the game, and how it was reached
#[derive(Clone, Debug)]
pub struct GameNode {
    mv: Option<Move>,
    board: Board,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}
impl GameNode {
    /// The move which led here from the parent, `None` for the root
    pub fn mv(&self) -> Option<Move> {
        self.mv
    }

    /// The position after the move
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Every continuation from here, main line first
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// The tree of moves played in a game
///
/// The first child of every node is its main line; the rest are variations, in the order they
/// were added. Nodes are never removed.
#[derive(Clone, Debug)]
pub struct GameTree {
    nodes: Vec<GameNode>,
}

impl GameTree {
    /// A tree holding only the given starting position
    pub fn new(initial: Board) -> Self {
        Self {
            nodes: vec![GameNode {
                mv: None,
                board: initial,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Whether the handle points at a node of this tree
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Get the node behind the handle
    ///
    /// # Panics
    /// If the handle came from a different, larger tree.
    #[track_caller]
    pub fn node(&self, id: NodeId) -> &GameNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&GameNode> {
        self.nodes.get(id.0)
    }

    /// The position at the given node
    #[track_caller]
    pub fn board(&self, id: NodeId) -> &Board {
        &self.node(id).board
    }

    /// The number of nodes, counting the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`, since every tree has its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a move from `parent`, reaching the given board, and return the new node
    ///
    /// If `parent` already has a child for exactly this move, that child is returned and the tree
    /// is unchanged, so playing the same move twice doesn't make a duplicate variation. The move
    /// isn't checked; use [`GameTree::play`] for that.
    #[track_caller]
    pub fn add_child(&mut self, parent: NodeId, mv: Move, board: Board) -> NodeId {
        if let Some(&existing) = self
            .node(parent)
            .children
            .iter()
            .find(|&&child| self.nodes[child.0].mv == Some(mv))
        {
            return existing;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(GameNode {
            mv: Some(mv),
            board,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Play the move from `parent`, if it's legal there
    ///
    /// Returns the node reached, or `None` (leaving the tree untouched) for an illegal move. A
    /// promotion without a piece given is recorded as a queen promotion.
    #[track_caller]
    pub fn play(&mut self, parent: NodeId, mv: Move) -> Option<NodeId> {
        let board = self.board(parent);
        if !board.is_legal(mv, true) {
            return None;
        }
        let mv = with_default_promotion(board, mv);
        let mut next = board.clone();
        next.apply(mv);
        Some(self.add_child(parent, mv, next))
    }

    #[track_caller]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    #[track_caller]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// The main line continuation from the given node
    #[track_caller]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).children.first().copied()
    }

    #[track_caller]
    pub fn has_children(&self, id: NodeId) -> bool {
        !self.node(id).children.is_empty()
    }

    /// The next variation after this one from the same parent
    #[track_caller]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = &self.node(self.parent(id)?).children;
        let position = siblings.iter().position(|&sibling| sibling == id)?;
        siblings.get(position + 1).copied()
    }

    /// Walk parent links up to the top of the tree
    #[track_caller]
    pub fn root_of(&self, mut id: NodeId) -> NodeId {
        while let Some(parent) = self.parent(id) {
            id = parent;
        }
        id
    }

    /// Follow the main line from the given node to its end
    #[track_caller]
    pub fn last_node(&self, mut id: NodeId) -> NodeId {
        while let Some(child) = self.first_child(id) {
            id = child;
        }
        id
    }

    /// The nodes from the root down to (and including) the given node
    #[track_caller]
    pub fn path_to(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }

    /// The moves played from the root to reach the given node
    #[track_caller]
    pub fn line_to(&self, id: NodeId) -> Vec<Move> {
        self.path_to(id)
            .into_iter()
            .filter_map(|node| self.node(node).mv)
            .collect()
    }
}

impl Default for GameTree {
    fn default() -> Self {
        Self::new(Board::INITIAL)
    }
}

fn with_default_promotion(board: &Board, mv: Move) -> Move {
    let promotes = board.get(mv.source).is_some_and(|piece| {
        piece.kind == PieceKind::Pawn && mv.target.rank() == piece.color.promotion_rank()
    });
    if promotes && mv.promotion.is_none() {
        mv.with_promotion(PieceKind::Queen)
    } else {
        mv
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use board::BoardSquare;
    use quickcheck::quickcheck;
    use rand::{rngs::SmallRng, seq::IteratorRandom, SeedableRng};

    #[track_caller]
    fn mv(text: &str) -> Move {
        text.parse().expect("test move should parse")
    }

    #[test]
    fn test_new_tree() {
        let tree = GameTree::default();
        let root = tree.root();
        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert!(tree.node(root).is_root());
        assert_eq!(tree.node(root).mv(), None);
        assert!(!tree.has_children(root));
        assert_eq!(tree.first_child(root), None);
        assert_eq!(tree.last_node(root), root);
        assert_eq!(tree.board(root), &Board::INITIAL);
    }

    #[test]
    fn test_play_builds_a_line() {
        let mut tree = GameTree::default();
        let e4 = tree.play(tree.root(), mv("e2e4")).unwrap();
        let e5 = tree.play(e4, mv("e7e5")).unwrap();
        assert_eq!(tree.parent(e5), Some(e4));
        assert_eq!(tree.first_child(tree.root()), Some(e4));
        assert_eq!(tree.last_node(tree.root()), e5);
        assert_eq!(tree.root_of(e5), tree.root());
        assert_eq!(tree.line_to(e5), vec![mv("e2e4"), mv("e7e5")]);
        assert_eq!(
            tree.board(e5).to_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
        );
    }

    #[test]
    fn test_illegal_move_is_rejected() {
        let mut tree = GameTree::default();
        assert_eq!(tree.play(tree.root(), mv("e2e5")), None);
        assert_eq!(tree.len(), 1);
        assert!(!tree.has_children(tree.root()));
    }

    #[test]
    fn test_same_move_is_not_duplicated() {
        let mut tree = GameTree::default();
        let first = tree.play(tree.root(), mv("d2d4")).unwrap();
        let again = tree.play(tree.root(), mv("d2d4")).unwrap();
        assert_eq!(first, again);
        assert_eq!(tree.children(tree.root()), &[first]);

        let board = tree.board(first).clone();
        assert_eq!(tree.add_child(tree.root(), mv("d2d4"), board), first);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_variations() {
        let mut tree = GameTree::default();
        let root = tree.root();
        let e4 = tree.play(root, mv("e2e4")).unwrap();
        let d4 = tree.play(root, mv("d2d4")).unwrap();
        let c4 = tree.play(root, mv("c2c4")).unwrap();
        assert_eq!(tree.children(root), &[e4, d4, c4]);
        assert_eq!(tree.first_child(root), Some(e4));
        assert_eq!(tree.next_sibling(e4), Some(d4));
        assert_eq!(tree.next_sibling(d4), Some(c4));
        assert_eq!(tree.next_sibling(c4), None);
        assert_eq!(tree.next_sibling(root), None);
        assert_eq!(tree.last_node(root), e4);
    }

    #[test]
    fn test_promotion_defaults_to_queen() {
        let board = Board::from_fen("8/P6k/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let mut tree = GameTree::new(board);
        let queen = tree.play(tree.root(), mv("a7a8")).unwrap();
        assert_eq!(tree.node(queen).mv(), Some(mv("a7a8q")));
        assert_eq!(tree.play(tree.root(), mv("a7a8q")), Some(queen));
        let knight = tree.play(tree.root(), mv("a7a8n")).unwrap();
        assert_ne!(queen, knight);
    }

    #[test]
    fn test_foreign_ids() {
        let tree = GameTree::default();
        assert!(tree.contains(NodeId::ROOT));
        assert!(!tree.contains(NodeId(3)));
        assert!(tree.get(NodeId(3)).is_none());
    }

    /// Grow a tree by playing random legal moves from random nodes
    fn random_tree(seed: u64, moves: usize) -> GameTree {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut tree = GameTree::default();
        for _ in 0..moves {
            let Some(parent) = (0..tree.len()).map(NodeId).choose(&mut rng) else {
                break;
            };
            let board = tree.board(parent);
            let legal = BoardSquare::all_squares()
                .flat_map(|source| {
                    BoardSquare::all_squares().map(move |target| Move::new(source, target))
                })
                .filter(|&mv| board.is_legal(mv, true))
                .choose(&mut rng);
            if let Some(mv) = legal {
                tree.play(parent, mv);
            }
        }
        tree
    }

    quickcheck! {
        fn test_links_are_consistent(seed: u64) -> bool {
            let tree = random_tree(seed, 20);
            (0..tree.len()).map(NodeId).all(|id| {
                tree.children(id).iter().all(|&child| tree.parent(child) == Some(id))
                    && tree.root_of(id) == tree.root()
            })
        }

        fn test_line_replays_to_board(seed: u64) -> bool {
            let tree = random_tree(seed, 20);
            (0..tree.len()).map(NodeId).all(|id| {
                let mut board = Board::INITIAL;
                for mv in tree.line_to(id) {
                    if !board.is_legal(mv, true) {
                        return false;
                    }
                    board.apply(mv);
                }
                &board == tree.board(id)
            })
        }
    }
}
