//! The moves of a game as a tree: the main line plus every variation branching off of it.
//!
//! Nodes live in an arena owned by the [`GameTree`] and refer to each other by [`NodeId`]. A
//! [`Session`] pairs a tree with the node the user is looking at.

mod session;
mod tree;

pub use session::Session;
pub use tree::{GameNode, GameTree, NodeId};
