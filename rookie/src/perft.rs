/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::Position;

/// Counts the leaf nodes of the legal move tree rooted at `position`, `depth` plies deep.
///
/// At depth 1, the number of legal moves is returned directly instead of making each one.
///
/// # Example
/// ```
/// # use rookie::*;
/// assert_eq!(perft(&Position::default(), 3), 8_902);
/// ```
pub fn perft(position: &Position, depth: usize) -> u64 {
    let mut pos = *position;
    recursive_perft(&mut pos, depth)
}

/// Like [`perft`], printing the number of nodes reachable after each legal move from the root.
///
/// Returns the total across all root moves.
pub fn splitperft(position: &Position, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut pos = *position;
    let mut total = 0;

    for mv in pos.legal_moves() {
        let undo = pos.make_move(mv);
        let nodes = recursive_perft(&mut pos, depth - 1);
        pos.unmake_move(mv, undo);

        println!("{mv}\t{nodes}");
        total += nodes;
    }

    total
}

fn recursive_perft(pos: &mut Position, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = pos.legal_moves();

    // Bulk counting
    if depth == 1 {
        return moves.len() as u64;
    }

    moves.into_iter().fold(0, |nodes, mv| {
        let undo = pos.make_move(mv);
        let count = recursive_perft(pos, depth - 1);
        pos.unmake_move(mv, undo);
        nodes + count
    })
}
