//! Position hashing for transposition lookups. A position hash is computed
//! once when a [`crate::position::Position`] is constructed and updated
//! incrementally by XOR-ing per-change terms on every applied move, never
//! rebuilt from scratch during play.
//!
//! The hash mixes per-(player, piece kind, square) keys generated at build
//! time with a side-to-move key. The en passant term deliberately XORs the
//! raw target square index instead of a dedicated random key: this reproduces
//! the hash space of the original board encoding bit-for-bit. It is a weak,
//! non-cryptographic term (indices 0..64 only touch the low six bits), kept
//! as-is rather than silently "fixed".

use crate::bitboard::Board;
use crate::core::{PieceKind, Player, Square};

/// Hash keys are 64-bit unsigned integers.
pub type Key = u64;

pub(crate) const SIDE_TO_MOVE: Key = 0xd255_1e5a_60c3_9b14;

// 6 white tables followed by 6 black tables, indexed by the PieceKind
// ordinal. Generated in build.rs from a fixed seed.
const PIECE_SQUARE_KEYS: [[Key; 64]; 12] =
    include!(concat!(env!("OUT_DIR"), "/piece_square_keys"));

const PLAYER_OFFSET: usize = 6;

pub(crate) fn piece_square(player: Player, kind: PieceKind, square: Square) -> Key {
    let table = match player {
        Player::White => kind as usize,
        Player::Black => PLAYER_OFFSET + kind as usize,
    };
    PIECE_SQUARE_KEYS[table][square as usize]
}

pub(crate) fn en_passant(square: Option<Square>) -> Key {
    square.map_or(0, |square| square as Key)
}

// Whole-board hash for position construction. Apply never calls this: it
// XORs the delta terms instead.
pub(crate) fn compute(board: &Board, side_to_move: Player, en_passant_square: Option<Square>) -> Key {
    let mut hash = 0;
    for player in [Player::White, Player::Black] {
        for (kind, bitboard) in board.pieces(player).kinds() {
            for square in bitboard.iter() {
                hash ^= piece_square(player, kind, square);
            }
        }
    }
    if side_to_move == Player::Black {
        hash ^= SIDE_TO_MOVE;
    }
    hash ^ en_passant(en_passant_square)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn distinct_keys() {
        // Not a proof of quality, but catches degenerate generation: all
        // piece-square keys should be unique.
        let mut keys: Vec<Key> = PIECE_SQUARE_KEYS.iter().flatten().copied().collect();
        keys.push(SIDE_TO_MOVE);
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), total);
    }

    #[test]
    fn en_passant_term() {
        assert_eq!(en_passant(None), 0);
        assert_eq!(en_passant(Some(Square::A1)), 0);
        assert_eq!(en_passant(Some(Square::E6)), Square::E6 as Key);
    }

    #[test]
    fn board_hash() {
        let board = Board::starting();
        let white_to_move = compute(&board, Player::White, None);
        let black_to_move = compute(&board, Player::Black, None);
        assert_ne!(white_to_move, 0);
        assert_eq!(white_to_move ^ SIDE_TO_MOVE, black_to_move);
        assert_eq!(compute(&board, Player::White, None), white_to_move);
    }
}
