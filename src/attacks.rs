//! Mappings of occupied squares to the attacked squares for each piece. The
//! sliding piece attacks are table lookups indexed by [PEXT]-compressed
//! occupancies; the tables themselves are generated by `build.rs`. The
//! calculators are purely geometric: blockers of both colors terminate a ray
//! and are included in the attack set, and masking out friendly-occupied
//! destination squares is the caller's responsibility. Callers that need
//! X-ray vision (e.g. a rook looking through a friendly queen) pass a
//! modified occupancy instead.
//!
//! [PEXT]: https://www.chessprogramming.org/BMI2#PEXTBitboards

use crate::bitboard::{Bitboard, Pieces};
use crate::core::{File, Player, Square, BOARD_SIZE};

const BISHOP_ATTACKS_COUNT: usize = 5248;
const BISHOP_ATTACKS: [Bitboard; BISHOP_ATTACKS_COUNT] =
    include!(concat!(env!("OUT_DIR"), "/bishop_attacks"));
const ROOK_ATTACKS_COUNT: usize = 102_400;
const ROOK_ATTACKS: [Bitboard; ROOK_ATTACKS_COUNT] =
    include!(concat!(env!("OUT_DIR"), "/rook_attacks"));
const BISHOP_RELEVANT_OCCUPANCIES: [u64; BOARD_SIZE as usize] =
    include!(concat!(env!("OUT_DIR"), "/bishop_occupancies"));
const ROOK_RELEVANT_OCCUPANCIES: [u64; BOARD_SIZE as usize] =
    include!(concat!(env!("OUT_DIR"), "/rook_occupancies"));
const BISHOP_OFFSETS: [usize; BOARD_SIZE as usize] =
    include!(concat!(env!("OUT_DIR"), "/bishop_offsets"));
const ROOK_OFFSETS: [usize; BOARD_SIZE as usize] =
    include!(concat!(env!("OUT_DIR"), "/rook_offsets"));

const KNIGHT_ATTACKS: [Bitboard; BOARD_SIZE as usize] =
    include!(concat!(env!("OUT_DIR"), "/knight_attacks"));
const KING_ATTACKS: [Bitboard; BOARD_SIZE as usize] =
    include!(concat!(env!("OUT_DIR"), "/king_attacks"));

#[cfg(all(target_arch = "x86_64", target_feature = "bmi2"))]
fn pext(bits: u64, mask: u64) -> u64 {
    unsafe { core::arch::x86_64::_pext_u64(bits, mask) }
}

// Serial parallel-bits-extract fallback for targets without an efficient PEXT
// instruction.
#[cfg(not(all(target_arch = "x86_64", target_feature = "bmi2")))]
fn pext(bits: u64, mask: u64) -> u64 {
    let mut result = 0u64;
    let mut remaining_mask = mask;
    let mut result_bit = 1u64;
    while remaining_mask != 0 {
        let ls1b = 1u64 << remaining_mask.trailing_zeros();
        if (bits & ls1b) != 0 {
            result |= result_bit;
        }
        remaining_mask ^= ls1b;
        result_bit <<= 1;
    }
    result
}

/// Squares a bishop on `square` attacks given `occupancy` blockers of both
/// colors. The first blocker on each ray is included.
pub(crate) fn bishop_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    BISHOP_ATTACKS[BISHOP_OFFSETS[square as usize]
        + pext(
            occupancy.bits(),
            BISHOP_RELEVANT_OCCUPANCIES[square as usize],
        ) as usize]
}

/// Squares a rook on `square` attacks given `occupancy` blockers of both
/// colors. The first blocker on each ray is included.
pub(crate) fn rook_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    ROOK_ATTACKS[ROOK_OFFSETS[square as usize]
        + pext(occupancy.bits(), ROOK_RELEVANT_OCCUPANCIES[square as usize]) as usize]
}

pub(crate) fn knight_attacks(square: Square) -> Bitboard {
    KNIGHT_ATTACKS[square as usize]
}

pub(crate) fn king_attacks(square: Square) -> Bitboard {
    KING_ATTACKS[square as usize]
}

// Squares attacked by a set of pawns, split into the two capture directions
// (from the moving player's perspective, east is towards the h-file). The
// file guards drop captures that would wrap around the board edge.
pub(crate) fn pawn_spread(pawns: Bitboard, player: Player) -> (Bitboard, Bitboard) {
    match player {
        Player::White => (
            (pawns << 9) - File::A.mask(),
            (pawns << 7) - File::H.mask(),
        ),
        Player::Black => (
            (pawns >> 7) - File::A.mask(),
            (pawns >> 9) - File::H.mask(),
        ),
    }
}

/// Union of all squares attacked by `player`'s pieces against the given
/// occupancy. The occupancy is a parameter rather than read off the board so
/// that callers can query "what if" setups, e.g. king-move safety with the
/// moving king removed from its own square (a king that stays on a checking
/// ray would otherwise shadow the squares behind itself).
pub(crate) fn attacked_squares(pieces: &Pieces, player: Player, occupancy: Bitboard) -> Bitboard {
    let (east, west) = pawn_spread(pieces.pawns, player);
    let mut attacks = east | west;
    for knight in pieces.knights.iter() {
        attacks |= knight_attacks(knight);
    }
    for slider in (pieces.bishops | pieces.queens).iter() {
        attacks |= bishop_attacks(slider, occupancy);
    }
    for slider in (pieces.rooks | pieces.queens).iter() {
        attacks |= rook_attacks(slider, occupancy);
    }
    attacks | king_attacks(pieces.king.as_square())
}
