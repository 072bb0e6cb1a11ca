// THEORY:
// The `BlockOrderer` gives blocks their canonical identity. Blocks are read like
// text: top to bottom by the row of their centre, then left to right by its column.
// Position in that order becomes the block's ID, and the ID becomes a
// spreadsheet-style name.
//
// Key principles:
// 1.  **Stable Sort**: Blocks whose centres coincide keep their discovery order, so
//     the output is deterministic and re-ordering an ordered list changes nothing.
// 2.  **Legacy Naming**: IDs 0-25 are `A`-`Z`; from 26 the name is the name of
//     `id / 26 - 1` followed by the letter for `id % 26` (26 = `AA`, 52 = `BA`).
//     Below 702 that is exactly `letters[id / 26 - 1] + letters[id % 26]`; above it
//     the same rule grows a third letter instead of running off the alphabet.

use crate::core_modules::block_extractor::{BlockId, GreenBlock};

const LETTERS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ALPHABET_LEN: usize = LETTERS.len();

/// The display name for a canonical block ID.
pub fn block_name(id: BlockId) -> String {
    let mut name = Vec::new();
    let mut n = id;
    loop {
        name.push(LETTERS[n % ALPHABET_LEN]);
        if n < ALPHABET_LEN {
            break;
        }
        n = n / ALPHABET_LEN - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// Sorts blocks into reading order and assigns canonical IDs and names.
pub fn assign_canonical_order(mut blocks: Vec<GreenBlock>) -> Vec<GreenBlock> {
    // `sort_by_key` is stable.
    blocks.sort_by_key(|block| (block.center.y, block.center.x));
    for (id, block) in blocks.iter_mut().enumerate() {
        block.id = id;
        block.name = block_name(id);
    }
    blocks
}
