use board::{BoardSquare, Move};
use mailbox::Board;

use crate::{GameNode, GameTree, NodeId};

/// One open game: its tree of moves, and the node currently on display
///
/// This is everything a front end needs to show a game and take moves for it, without reaching
/// into the board itself.
#[derive(Clone, Debug)]
pub struct Session {
    tree: GameTree,
    current: NodeId,
}

impl Session {
    /// Start a fresh game from the given position
    pub fn new(initial: Board) -> Self {
        Self::from_tree(GameTree::new(initial))
    }

    /// Open an existing tree, looking at its root
    pub fn from_tree(tree: GameTree) -> Self {
        let current = tree.root();
        Self { tree, current }
    }

    pub fn tree(&self) -> &GameTree {
        &self.tree
    }

    pub fn into_tree(self) -> GameTree {
        self.tree
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn current_node(&self) -> &GameNode {
        self.tree.node(self.current)
    }

    /// The position on display
    pub fn board(&self) -> &Board {
        self.tree.board(self.current)
    }

    /// Whether moving the piece on `source` to `target` is legal right now
    pub fn is_legal(&self, source: BoardSquare, target: BoardSquare) -> bool {
        self.board().is_legal(Move::new(source, target), true)
    }

    /// Play a move at the current node and move onto the result
    ///
    /// Returns `None` without changing anything if the move is illegal.
    pub fn play(&mut self, mv: Move) -> Option<NodeId> {
        let next = self.tree.play(self.current, mv)?;
        self.current = next;
        Some(next)
    }

    /// Step back one move. Returns `false` at the root.
    pub fn back(&mut self) -> bool {
        match self.tree.parent(self.current) {
            Some(parent) => {
                self.current = parent;
                true
            }
            None => false,
        }
    }

    /// Step forward along the main line. Returns `false` at the end of the line.
    pub fn forward(&mut self) -> bool {
        match self.tree.first_child(self.current) {
            Some(child) => {
                self.current = child;
                true
            }
            None => false,
        }
    }

    pub fn to_root(&mut self) {
        self.current = self.tree.root_of(self.current);
    }

    /// Go to the end of the main line from here
    pub fn to_leaf(&mut self) {
        self.current = self.tree.last_node(self.current);
    }

    /// Jump to any node of the tree. Returns `false` for a handle from another tree.
    pub fn goto(&mut self, node: NodeId) -> bool {
        if self.tree.contains(node) {
            self.current = node;
            true
        } else {
            false
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Board::INITIAL)
    }
}
