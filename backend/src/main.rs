use std::{fs::File, io::BufReader, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};

/// Check and replay chess games
#[derive(Parser, Debug)]
#[command(name = "chess-rules", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read a PGN file and write its games back out
    Pgn {
        file: PathBuf,
    },
    /// Play moves, given in coordinates (`e2e4`) or algebraic notation (`Nf3`)
    Play {
        /// Start from this position instead of the usual one
        #[arg(long)]
        fen: Option<String>,
        #[arg(required = true)]
        moves: Vec<String>,
    },
    /// Check a FEN position and show whether the side to move is in check
    Fen {
        fen: String,
    },
}

fn run(command: Command) -> backend::Result<String> {
    match command {
        Command::Pgn { file } => backend::normalize_pgn(BufReader::new(File::open(file)?)),
        Command::Play { fen, moves } => backend::play_moves(fen.as_deref(), &moves),
        Command::Fen { fen } => backend::describe_fen(&fen),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
