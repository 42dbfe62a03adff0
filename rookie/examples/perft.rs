/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use rookie::{perft, splitperft, Position};

/// Compute total number of states reachable from a position, given a depth.
#[derive(Debug, Parser)]
struct Cli {
    /// Depth to run the perft.
    depth: usize,

    /// The FEN string of the position to run the perft on. Defaults to the starting position.
    #[arg(required = false)]
    fen: Option<String>,

    /// List of moves to apply to the position before running the perft.
    #[arg(required = false)]
    moves: Vec<String>,

    /// If set, perform a splitperft, displaying the number of nodes reachable after each move available from the root.
    #[arg(short, long, default_value = "false")]
    split: bool,
}

fn main() -> anyhow::Result<()> {
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

    println!(
        "Computing PERFT({}) of the following position:\n{}\n",
        args.depth,
        pos.to_fen()
    );

    let now = Instant::now();
    let total_nodes = if args.split {
        let nodes = splitperft(&pos, args.depth);
        println!("\n{nodes}\n");
        nodes
    } else {
        perft(&pos, args.depth)
    };

    let elapsed = now.elapsed();

    // Compute nodes-per-second metrics
    let nps = total_nodes as f32 / elapsed.as_secs_f32();
    let m_nps = nps / 1_000_000.0;

    println!("  Total Nodes:\t{total_nodes}");
    println!(" Elapsed Time:\t{elapsed:.1?}");
    println!("  Nodes / Sec:\t{nps:.0}");
    println!("M Nodes / Sec:\t{m_nps:.1}");

    Ok(())
}
