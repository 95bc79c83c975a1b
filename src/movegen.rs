//! Legal move generation composed around absolute pin detection, plus the
//! per-side square-control aggregation that grounds a future static exchange
//! evaluator.
//!
//! Both paths share the same per-piece geometric primitives from
//! [`crate::attacks`]: the legal path excludes absolutely pinned pieces from
//! the ordinary generators and emits their restricted moves from the pin
//! detector instead, while the control path aggregates unrestricted per-piece
//! destination sets into per-kind bitboards and reports the pinned set
//! alongside.
//!
//! Sliding piece generators query attacks with friendly same-kind and queen
//! pieces removed from the occupancy, so a rook sees through a friendly queen
//! on its line and vice versa: pieces in such batteries support each other
//! for exchange purposes. One known approximation is carried by design: a
//! slider standing behind a pawn does not get counted as a supporting
//! attacker of the pawn's capture squares.

use arrayvec::ArrayVec;

use crate::attacks;
use crate::bitboard::Bitboard;
use crate::core::{CastleRights, Move, PieceKind, Player, Promotion, Rank, Square};
use crate::position::Position;

/// Stack-allocated move container. 256 slots comfortably exceed the densest
/// outputs the generator produces.
pub type MoveList = ArrayVec<Move, 256>;

/// Per-kind unions of the squares the side to move controls, plus the set of
/// its absolutely pinned pieces. Control counts defended squares too: the
/// destination sets are raw attack sets, not masked by own occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlArea {
    #[allow(missing_docs)]
    pub pawns: Bitboard,
    #[allow(missing_docs)]
    pub knights: Bitboard,
    #[allow(missing_docs)]
    pub bishops: Bitboard,
    #[allow(missing_docs)]
    pub rooks: Bitboard,
    #[allow(missing_docs)]
    pub queens: Bitboard,
    #[allow(missing_docs)]
    pub king: Bitboard,
    /// Absolutely pinned pieces of the side to move. Their contributions are
    /// included in the per-kind sets unrestricted; a consumer that cares can
    /// discount them with this mask.
    pub pinned: Bitboard,
}

impl ControlArea {
    /// Union of the control sets of all six piece kinds.
    #[must_use]
    pub fn all(&self) -> Bitboard {
        self.pawns | self.knights | self.bishops | self.rooks | self.queens | self.king
    }
}

// One absolutely pinned piece and the squares it may still move to. The
// targets are empty for pieces that cannot slide along their pin ray at all
// (knights, orthogonally pinned bishops and so on).
struct Pin {
    square: Square,
    kind: PieceKind,
    targets: Bitboard,
}

struct Pins {
    mask: Bitboard,
    // A king has at most eight pin rays.
    list: ArrayVec<Pin, 8>,
}

/// Produces the list of legal moves: pin-restricted moves for absolutely
/// pinned pieces, ordinary per-piece moves for the rest, castling last. See
/// [`Position::generate_moves`] for the caller-facing contract.
pub(crate) fn generate_moves(position: &Position) -> MoveList {
    let mut moves = MoveList::new();
    let pins = absolute_pins(position);
    for pin in &pins.list {
        push_pin_moves(position, pin, &mut moves);
    }
    let nonpinned = !pins.mask;
    pawn_pushes(position, nonpinned, &mut moves);
    pawn_captures(position, nonpinned, &mut moves);
    knight_moves(position, nonpinned, &mut moves);
    bishop_moves(position, nonpinned, &mut moves);
    rook_moves(position, nonpinned, &mut moves);
    queen_moves(position, nonpinned, &mut moves);
    king_moves(position, &mut moves);
    moves
}

/// Builds the per-kind control map of the side to move. Unlike the legal
/// path, every piece contributes its full geometric reach whether pinned or
/// not; the pinned set is reported alongside. Each accumulator starts from
/// the empty set and grows by bitwise OR.
pub(crate) fn control_area(position: &Position) -> ControlArea {
    let us = position.us();
    let our = position.pieces(us);
    let occupied = position.occupied();

    let (east, west) = attacks::pawn_spread(our.pawns, us);
    let pawns = east | west;

    let mut knights = Bitboard::empty();
    for from in our.knights.iter() {
        knights |= attacks::knight_attacks(from);
    }

    let diagonal_occupancy = occupied - (our.bishops | our.queens);
    let orthogonal_occupancy = occupied - (our.rooks | our.queens);

    let mut bishops = Bitboard::empty();
    for from in our.bishops.iter() {
        bishops |= attacks::bishop_attacks(from, diagonal_occupancy);
    }
    let mut rooks = Bitboard::empty();
    for from in our.rooks.iter() {
        rooks |= attacks::rook_attacks(from, orthogonal_occupancy);
    }
    let mut queens = Bitboard::empty();
    for from in our.queens.iter() {
        queens |= attacks::bishop_attacks(from, diagonal_occupancy)
            | attacks::rook_attacks(from, orthogonal_occupancy);
    }

    let king = attacks::king_attacks(our.king.as_square());

    ControlArea {
        pawns,
        knights,
        bishops,
        rooks,
        queens,
        king,
        pinned: absolute_pins(position).mask,
    }
}

// Finds every friendly piece that may not leave the line between our king
// and an enemy slider.
//
// The king pretends to be a slider itself: a candidate is any friendly piece
// standing on both the king's virtual attack rays and an enemy slider's
// attack rays against the full occupancy. The intersection alone is not
// sufficient: two rays can cross on a square without being colinear, so each
// candidate is additionally checked for colinearity with the king and the
// slider.
fn absolute_pins(position: &Position) -> Pins {
    let us = position.us();
    let our = position.pieces(us);
    let their = position.pieces(us.opponent());
    let occupied = position.occupied();
    let king = our.king.as_square();

    let mut pins = Pins {
        mask: Bitboard::empty(),
        list: ArrayVec::new(),
    };

    // Orthogonal pins by enemy rooks and queens.
    let king_rays = attacks::rook_attacks(king, occupied);
    for slider in (their.rooks | their.queens).iter() {
        let slider_rays = attacks::rook_attacks(slider, occupied) - their.all;
        for candidate in (slider_rays & king_rays & our.all).iter() {
            let same_rank =
                candidate.rank() == king.rank() && candidate.rank() == slider.rank();
            let same_file =
                candidate.file() == king.file() && candidate.file() == slider.file();
            if !same_rank && !same_file {
                continue;
            }
            pins.mask |= Bitboard::from(candidate);
            let Some(kind) = our.at(candidate) else {
                continue;
            };
            // Only a rook or a queen can slide along an orthogonal pin ray;
            // everything else is immobilized.
            if kind != PieceKind::Rook && kind != PieceKind::Queen {
                continue;
            }
            let reach = attacks::rook_attacks(candidate, occupied) - our.all;
            pins.list.push(Pin {
                square: candidate,
                kind,
                targets: reach & (slider_rays | king_rays | Bitboard::from(slider)),
            });
        }
    }

    // Diagonal pins by enemy bishops and queens. Diagonals are not
    // axis-aligned, so colinearity becomes slope equality, tested with
    // integer cross multiplication.
    let king_rays = attacks::bishop_attacks(king, occupied);
    for slider in (their.bishops | their.queens).iter() {
        let slider_rays = attacks::bishop_attacks(slider, occupied) - their.all;
        for candidate in (slider_rays & king_rays & our.all).iter() {
            if !colinear(king, candidate, slider) {
                continue;
            }
            pins.mask |= Bitboard::from(candidate);
            let Some(kind) = our.at(candidate) else {
                continue;
            };
            match kind {
                // A diagonally pinned pawn has exactly one candidate move:
                // capturing the pinning piece one step ahead of it.
                PieceKind::Pawn => {
                    let captures_forward = match us {
                        Player::White => candidate.rank() as u8 + 1 == slider.rank() as u8,
                        Player::Black => candidate.rank() as u8 == slider.rank() as u8 + 1,
                    };
                    if captures_forward {
                        pins.list.push(Pin {
                            square: candidate,
                            kind,
                            targets: Bitboard::from(slider),
                        });
                    }
                },
                PieceKind::Bishop | PieceKind::Queen => {
                    let reach = attacks::bishop_attacks(candidate, occupied) - our.all;
                    pins.list.push(Pin {
                        square: candidate,
                        kind,
                        targets: reach & (slider_rays | king_rays | Bitboard::from(slider)),
                    });
                },
                _ => {},
            }
        }
    }
    pins
}

// Slope equality of (slider -> piece) and (slider -> king) via cross
// multiplication; no division, no zero-denominator special case.
fn colinear(king: Square, piece: Square, slider: Square) -> bool {
    let (king_rank, king_file) = (king.rank() as i32, king.file() as i32);
    let (piece_rank, piece_file) = (piece.rank() as i32, piece.file() as i32);
    let (slider_rank, slider_file) = (slider.rank() as i32, slider.file() as i32);
    (piece_rank - slider_rank) * (king_file - slider_file)
        == (king_rank - slider_rank) * (piece_file - slider_file)
}

fn push_pin_moves(position: &Position, pin: &Pin, moves: &mut MoveList) {
    let promotion_rank = Rank::promotion(position.us()).mask();
    for to in pin.targets.iter() {
        if pin.kind == PieceKind::Pawn && promotion_rank.contains(to) {
            // Capturing the pinner on the backrank promotes.
            for promotion in Promotion::ALL {
                moves.push(Move::new(pin.square, to, Some(promotion)));
            }
        } else {
            moves.push(Move::new(pin.square, to, None));
        }
    }
}

fn push_moves(from: Square, targets: Bitboard, moves: &mut MoveList) {
    for to in targets.iter() {
        moves.push(Move::new(from, to, None));
    }
}

fn push_pawn_moves(from: Square, to: Square, promotion_rank: Bitboard, moves: &mut MoveList) {
    if promotion_rank.contains(to) {
        for promotion in Promotion::ALL {
            moves.push(Move::new(from, to, Some(promotion)));
        }
    } else {
        moves.push(Move::new(from, to, None));
    }
}

fn pawn_pushes(position: &Position, nonpinned: Bitboard, moves: &mut MoveList) {
    let us = position.us();
    let occupied = position.occupied();
    let pawns = position.pieces(us).pawns & nonpinned;
    let promotion_rank = Rank::promotion(us).mask();
    // The second push is only available from the rank right after the first
    // one, and only when both squares are free.
    let (single, double, backward) = match us {
        Player::White => {
            let single = (pawns << 8) - occupied;
            let double = ((single & Rank::Three.mask()) << 8) - occupied;
            (single, double, -8i8)
        },
        Player::Black => {
            let single = (pawns >> 8) - occupied;
            let double = ((single & Rank::Six.mask()) >> 8) - occupied;
            (single, double, 8i8)
        },
    };
    for to in single.iter() {
        let from = Square::from_index((to as i8 + backward) as u8);
        push_pawn_moves(from, to, promotion_rank, moves);
    }
    for to in double.iter() {
        // Double pushes never promote.
        moves.push(Move::new(
            Square::from_index((to as i8 + 2 * backward) as u8),
            to,
            None,
        ));
    }
}

fn pawn_captures(position: &Position, nonpinned: Bitboard, moves: &mut MoveList) {
    let us = position.us();
    let their = position.pieces(us.opponent());
    let pawns = position.pieces(us).pawns & nonpinned;
    let promotion_rank = Rank::promotion(us).mask();
    // Generating the en passant destination is the board's responsibility:
    // the capture target mask includes the current en passant square.
    let capture_mask = their.all
        | position
            .en_passant_square()
            .map_or(Bitboard::empty(), Bitboard::from);
    let (east, west) = attacks::pawn_spread(pawns, us);
    let (east_backward, west_backward) = match us {
        Player::White => (-9i8, -7i8),
        Player::Black => (7i8, 9i8),
    };
    for (targets, backward) in [(east & capture_mask, east_backward), (west & capture_mask, west_backward)]
    {
        for to in targets.iter() {
            let from = Square::from_index((to as i8 + backward) as u8);
            push_pawn_moves(from, to, promotion_rank, moves);
        }
    }
}

fn knight_moves(position: &Position, nonpinned: Bitboard, moves: &mut MoveList) {
    let our = position.pieces(position.us());
    for from in (our.knights & nonpinned).iter() {
        push_moves(from, attacks::knight_attacks(from) - our.all, moves);
    }
}

fn bishop_moves(position: &Position, nonpinned: Bitboard, moves: &mut MoveList) {
    let our = position.pieces(position.us());
    // Friendly bishops and queens on the same diagonal are transparent.
    let occupancy = position.occupied() - (our.bishops | our.queens);
    for from in (our.bishops & nonpinned).iter() {
        push_moves(from, attacks::bishop_attacks(from, occupancy) - our.all, moves);
    }
}

fn rook_moves(position: &Position, nonpinned: Bitboard, moves: &mut MoveList) {
    let our = position.pieces(position.us());
    // Friendly rooks and queens on the same rank or file are transparent.
    let occupancy = position.occupied() - (our.rooks | our.queens);
    for from in (our.rooks & nonpinned).iter() {
        push_moves(from, attacks::rook_attacks(from, occupancy) - our.all, moves);
    }
}

fn queen_moves(position: &Position, nonpinned: Bitboard, moves: &mut MoveList) {
    let our = position.pieces(position.us());
    let occupied = position.occupied();
    let diagonal_occupancy = occupied - (our.bishops | our.queens);
    let orthogonal_occupancy = occupied - (our.rooks | our.queens);
    for from in (our.queens & nonpinned).iter() {
        push_moves(
            from,
            attacks::bishop_attacks(from, diagonal_occupancy) - our.all,
            moves,
        );
        push_moves(
            from,
            attacks::rook_attacks(from, orthogonal_occupancy) - our.all,
            moves,
        );
    }
}

const WHITE_SHORT_CASTLE_WALK: Bitboard = Bitboard::from_bits(0x60);
const WHITE_LONG_CASTLE_WALK: Bitboard = Bitboard::from_bits(0x0C);
const WHITE_LONG_CASTLE_BETWEEN: Bitboard = Bitboard::from_bits(0x0E);
const BLACK_SHORT_CASTLE_WALK: Bitboard = Bitboard::from_bits(0x6000_0000_0000_0000);
const BLACK_LONG_CASTLE_WALK: Bitboard = Bitboard::from_bits(0x0C00_0000_0000_0000);
const BLACK_LONG_CASTLE_BETWEEN: Bitboard = Bitboard::from_bits(0x0E00_0000_0000_0000);

fn king_moves(position: &Position, moves: &mut MoveList) {
    let us = position.us();
    let our = position.pieces(us);
    let their = position.pieces(us.opponent());
    let from = our.king.as_square();
    // The king is removed from the occupancy for the danger query so that a
    // king stepping along a checking ray does not see itself as blocking the
    // squares behind it.
    let danger = attacks::attacked_squares(their, us.opponent(), position.occupied() - our.king);
    push_moves(from, attacks::king_attacks(from) - our.all - danger, moves);

    // Castling: the right has to be held, the squares between king and rook
    // free, the king not in check and its walk squares unattacked.
    if danger.contains(from) {
        return;
    }
    let occupied = position.occupied();
    let castling = position.castling();
    let (short_walk, long_walk, long_between, short_to, long_to) = match us {
        Player::White => (
            WHITE_SHORT_CASTLE_WALK,
            WHITE_LONG_CASTLE_WALK,
            WHITE_LONG_CASTLE_BETWEEN,
            Square::G1,
            Square::C1,
        ),
        Player::Black => (
            BLACK_SHORT_CASTLE_WALK,
            BLACK_LONG_CASTLE_WALK,
            BLACK_LONG_CASTLE_BETWEEN,
            Square::G8,
            Square::C8,
        ),
    };
    if castling.contains(CastleRights::short(us))
        && (occupied & short_walk).is_empty()
        && (danger & short_walk).is_empty()
    {
        moves.push(Move::new(from, short_to, None));
    }
    if castling.contains(CastleRights::long(us))
        && (occupied & long_between).is_empty()
        && (danger & long_walk).is_empty()
    {
        moves.push(Move::new(from, long_to, None));
    }
}
