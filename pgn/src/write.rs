use core::fmt;

use board::Color;
use game::NodeId;

use crate::PgnGame;

/// Export format keeps lines shorter than this
const MAX_LINE_LENGTH: usize = 79;

struct PgnDisplay<'a> {
    game: &'a PgnGame,
    node: NodeId,
}

impl PgnGame {
    /// Display the tags and the line from the root to `node` as PGN text
    pub fn display(&self, node: NodeId) -> impl fmt::Display + '_ {
        PgnDisplay { game: self, node }
    }
}

/// Writes the main line, up to its last move
impl fmt::Display for PgnGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last = self.tree.last_node(self.tree.root());
        fmt::Display::fmt(&self.display(last), f)
    }
}

impl fmt::Display for PgnDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let game = self.game;
        let result = game.result.to_string();
        let mut wrote_result = false;
        for (key, value) in game.tags() {
            let value = if key == "Result" {
                wrote_result = true;
                &result
            } else {
                value
            };
            writeln!(f, "[{key} \"{}\"]", escape(value))?;
        }
        if !wrote_result {
            writeln!(f, "[Result \"{result}\"]")?;
        }
        writeln!(f)?;

        let tree = &game.tree;
        let path = tree.path_to(self.node);
        let mut tokens = Vec::with_capacity(path.len() * 2);
        for pair in path.windows(2) {
            let (parent, child) = (pair[0], pair[1]);
            let Some(mv) = tree.node(child).mv() else {
                continue;
            };
            let board = tree.board(parent);
            match board.side_to_move {
                Color::White => tokens.push(format!("{}.", board.fullmove_number)),
                Color::Black if parent == path[0] => {
                    tokens.push(format!("{}...", board.fullmove_number))
                }
                Color::Black => {}
            }
            tokens.push(board.notate(mv));
        }
        tokens.push(result);

        let mut line_length = 0;
        for token in tokens {
            if line_length > 0 {
                if line_length + 1 + token.len() > MAX_LINE_LENGTH {
                    writeln!(f)?;
                    line_length = 0;
                } else {
                    f.write_str(" ")?;
                    line_length += 1;
                }
            }
            f.write_str(&token)?;
            line_length += token.len();
        }
        writeln!(f)
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
