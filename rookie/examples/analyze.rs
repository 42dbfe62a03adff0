/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use rookie::{Color, File, Position, Rank, SearchConfig, Searcher, Square};

/// Search a position and report the engine's preferred move.
#[derive(Debug, Parser)]
struct Cli {
    /// The FEN string of the position to analyze. Defaults to the starting position.
    #[arg(required = false)]
    fen: Option<String>,

    /// Maximum depth to search, in plies.
    #[arg(short, long, default_value_t = SearchConfig::default().max_depth)]
    depth: usize,

    /// Time budget for the search, in milliseconds.
    #[arg(short, long, default_value_t = 5_000)]
    time_ms: u64,

    /// Moves to apply to the position before searching.
    #[arg(short, long, num_args = 1..)]
    moves: Vec<String>,
}

/// Prints the board with shaded squares, White at the bottom.
fn print_board(pos: &Position) {
    for rank in Rank::iter().rev() {
        print!("{rank} ");
        for file in File::iter() {
            let square = Square::new(file, rank);
            let text = match pos.piece_at(square) {
                Some(piece) if piece.color() == Color::White => {
                    format!(" {} ", piece.char()).white().bold()
                }
                Some(piece) => format!(" {} ", piece.char()).black().bold(),
                None => "   ".normal(),
            };

            let shaded = if (file.index() + rank.index()) % 2 == 0 {
                text.on_truecolor(181, 136, 99)
            } else {
                text.on_truecolor(240, 217, 181)
            };
            print!("{shaded}");
        }
        println!();
    }

    print!("  ");
    for file in File::iter() {
        print!(" {file} ");
    }
    println!("\n");
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Cli::parse();

    let mut pos = match &args.fen {
        Some(fen) => Position::from_fen(fen).with_context(|| format!("Failed to parse {fen:?}"))?,
        None => Position::default(),
    };

    for mv in &args.moves {
        pos = pos
            .play_uci(mv)
            .with_context(|| format!("Failed to apply {mv:?}"))?;
    }

    print_board(&pos);
    println!("{}\n", pos.to_fen());

    let status = pos.status();
    if status.is_over() {
        println!("{status}");
        return Ok(());
    }

    let config = SearchConfig::default()
        .with_max_depth(args.depth)
        .with_time_budget(Duration::from_millis(args.time_ms));
    let result = Searcher::new(config).search(&pos);

    let best = result
        .best_move
        .context("Search returned no move for a position with legal moves")?;

    println!("    Best Move:\t{best}");
    println!("        Score:\t{}", result.score);
    println!("        Depth:\t{}", result.depth);
    println!("        Nodes:\t{}", result.nodes);
    println!(" Elapsed Time:\t{:.1?}", result.elapsed);

    Ok(())
}
