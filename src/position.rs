//! Fully-specified chess position: the board plus side to move, castling
//! rights, en passant target, halfmove/fullmove clocks and the incrementally
//! maintained position hash.
//!
//! A [`Position`] is constructed once (from FEN or the starting setup) and
//! then threaded through alternating [`Position::make_move`] calls, mutating
//! in place. There is no unapply: callers that need to explore keep a copy or
//! reconstruct the inverse externally.

use std::fmt;
use std::num::NonZeroU16;

use anyhow::{bail, Context};

use crate::bitboard::{Bitboard, Board, Pieces};
use crate::core::{
    CastleRights, File, Move, Piece, PieceKind, Player, Rank, Square, BOARD_WIDTH,
};
use crate::movegen::{self, ControlArea, MoveList};
use crate::zobrist;

/// State of the chess game: board, clocks, castling rights and the position
/// hash. It has a 1:1 relationship with [Forsyth-Edwards Notation] (FEN).
///
/// [`Position::try_from()`] provides a convenient interface for creating a
/// position: it cleans up the input and accepts both full FEN and trimmed
/// FEN (EPD-style, without the clock fields).
///
/// Inputs to the mutating operations are trusted: [`Position::make_move`]
/// must only be fed moves produced by [`Position::generate_moves`] on the
/// same position. There is no recoverable-error taxonomy in the core —
/// contract violations are undefined behavior, checked only by debug
/// assertions.
///
/// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    board: Board,
    side_to_move: Player,
    castling: CastleRights,
    en_passant_square: Option<Square>,
    halfmove_clock: u8,
    fullmove_counter: NonZeroU16,
    hash: zobrist::Key,
}

impl Position {
    /// Creates the starting position of the standard chess variant.
    ///
    /// ```
    /// use roque::position::Position;
    ///
    /// assert_eq!(
    ///     Position::starting().to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        let board = Board::starting();
        let hash = zobrist::compute(&board, Player::White, None);
        Self {
            board,
            side_to_move: Player::White,
            castling: CastleRights::ALL,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_counter: NonZeroU16::MIN,
            hash,
        }
    }

    pub(crate) const fn us(&self) -> Player {
        self.side_to_move
    }

    pub(crate) const fn them(&self) -> Player {
        self.us().opponent()
    }

    /// The player who makes the next move.
    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    /// All material of one player, for external search/evaluation/printing
    /// layers.
    #[must_use]
    pub const fn pieces(&self, player: Player) -> &Pieces {
        self.board.pieces(player)
    }

    /// Squares occupied by either player.
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.board.occupied()
    }

    /// Current castling rights of both players.
    #[must_use]
    pub const fn castling(&self) -> CastleRights {
        self.castling
    }

    /// The square a pawn that just double-pushed can be captured on, if any.
    #[must_use]
    pub const fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    /// Number of half-moves since the last capture or pawn move, for the
    /// fifty-move draw rule upstream.
    #[must_use]
    pub const fn halfmove_clock(&self) -> u8 {
        self.halfmove_clock
    }

    /// Full moves played, starting at 1 and incremented after Black's move.
    #[must_use]
    pub const fn fullmove_counter(&self) -> NonZeroU16 {
        self.fullmove_counter
    }

    /// The incrementally maintained position hash for transposition lookups.
    #[must_use]
    pub const fn hash(&self) -> zobrist::Key {
        self.hash
    }

    /// Calculates the list of legal moves in this position.
    ///
    /// The result is finite, unordered (callers must not depend on the
    /// generation order) and recomputed on every call. The position is
    /// assumed not to be in check: check-evasion-restricted generation is
    /// out of this crate's scope and the output for positions in check is
    /// unspecified — callers guard with their own check detection.
    #[must_use]
    pub fn generate_moves(&self) -> MoveList {
        movegen::generate_moves(self)
    }

    /// Aggregates the per-kind square-control map of the side to move; see
    /// [`ControlArea`].
    #[must_use]
    pub fn control_area(&self) -> ControlArea {
        movegen::control_area(self)
    }

    /// Applies a move to the position, mutating it in place and updating the
    /// hash incrementally. `next_move` is trusted to come from
    /// [`Position::generate_moves`] on this very position; anything else is
    /// undefined behavior.
    pub fn make_move(&mut self, next_move: Move) {
        debug_assert!(self.is_legal(), "{self}");
        let us = self.side_to_move;
        let them = us.opponent();
        let from = next_move.from();
        let to = next_move.to();
        let from_bb = Bitboard::from(from);
        let to_bb = Bitboard::from(to);

        // Classify the moving piece by testing the origin square against our
        // piece sets.
        let Some(kind) = self.board.pieces(us).at(from) else {
            // Not a move of ours: the trusted-input contract is broken.
            // Refuse to corrupt the board any further.
            debug_assert!(false, "no piece of {us:?} on {from}");
            return;
        };

        // The halfmove clock resets on any capture or pawn move.
        let is_capture = self.board.pieces(them).all.contains(to)
            || (kind == PieceKind::Pawn && self.en_passant_square == Some(to));
        if is_capture || kind == PieceKind::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        // King moves strip both of our castling rights, set or not. A
        // two-file king move is a castle: the rook jumps over as well.
        if kind == PieceKind::King {
            match to as i8 - from as i8 {
                2 => self.relocate_castle_rook(
                    us,
                    Square::from_index(to as u8 + 1),
                    Square::from_index(to as u8 - 1),
                ),
                -2 => self.relocate_castle_rook(
                    us,
                    Square::from_index(to as u8 - 2),
                    Square::from_index(to as u8 + 1),
                ),
                _ => {},
            }
            self.castling.remove(CastleRights::both(us));
        }

        // A rook departing its original corner square strips the matching
        // right.
        if kind == PieceKind::Rook && from.rank() == Rank::backrank(us) {
            match from.file() {
                File::H => self.castling.remove(CastleRights::short(us)),
                File::A => self.castling.remove(CastleRights::long(us)),
                _ => {},
            }
        }

        // En passant capture: the captured pawn stands one rank behind the
        // target square. This has to happen before the en passant square is
        // overwritten for the new position.
        let old_en_passant = self.en_passant_square;
        // Offset from a square to the one behind it, from our perspective.
        let behind: i8 = match us {
            Player::White => -(BOARD_WIDTH as i8),
            Player::Black => BOARD_WIDTH as i8,
        };
        if kind == PieceKind::Pawn && old_en_passant == Some(to) {
            let captured_square = Square::from_index((to as i8 + behind) as u8);
            let captured_bb = Bitboard::from(captured_square);
            let pieces = self.board.pieces_mut(them);
            pieces.pawns -= captured_bb;
            pieces.all -= captured_bb;
            self.hash ^= zobrist::piece_square(them, PieceKind::Pawn, captured_square);
        }

        // A double push exposes the square behind the pawn to en passant.
        self.en_passant_square = if kind == PieceKind::Pawn
            && (to as i8 - from as i8).abs() == 2 * BOARD_WIDTH as i8
        {
            Some(Square::from_index((to as i8 + behind) as u8))
        } else {
            None
        };

        // Promotions land on a different bitboard than the one the pawn
        // departed from.
        let destination_kind = match next_move.promotion() {
            Some(promotion) => PieceKind::from(promotion),
            None => kind,
        };

        // Remove a captured piece from the destination square. En passant
        // captures were already handled above: their destination square is
        // empty and must not be double-counted here. Capturing a rook on its
        // original corner square strips the opponent's right on that wing.
        if let Some(captured) = self.board.pieces(them).at(to) {
            let pieces = self.board.pieces_mut(them);
            *pieces.bitboard_for(captured) -= to_bb;
            pieces.all -= to_bb;
            self.hash ^= zobrist::piece_square(them, captured, to);
            if captured == PieceKind::Rook && to.rank() == Rank::backrank(them) {
                match to.file() {
                    File::H => self.castling.remove(CastleRights::short(them)),
                    File::A => self.castling.remove(CastleRights::long(them)),
                    _ => {},
                }
            }
        }

        // Move the piece itself.
        let pieces = self.board.pieces_mut(us);
        *pieces.bitboard_for(kind) -= from_bb;
        pieces.all -= from_bb;
        *pieces.bitboard_for(destination_kind) |= to_bb;
        pieces.all |= to_bb;
        self.hash ^= zobrist::piece_square(us, kind, from);
        self.hash ^= zobrist::piece_square(us, destination_kind, to);

        // Toggle the side to move in both the flag and the hash.
        self.hash ^= zobrist::SIDE_TO_MOVE;
        self.side_to_move = them;

        // Swap the en passant hash terms; see crate::zobrist for why this is
        // the raw square index.
        self.hash ^= zobrist::en_passant(old_en_passant);
        self.hash ^= zobrist::en_passant(self.en_passant_square);

        // The fullmove number increments after Black's half-move.
        if us == Player::Black {
            self.fullmove_counter = self.fullmove_counter.saturating_add(1);
        }
    }

    fn relocate_castle_rook(&mut self, us: Player, rook_from: Square, rook_to: Square) {
        let pieces = self.board.pieces_mut(us);
        pieces.rooks -= Bitboard::from(rook_from);
        pieces.all -= Bitboard::from(rook_from);
        pieces.rooks |= Bitboard::from(rook_to);
        pieces.all |= Bitboard::from(rook_to);
        self.hash ^= zobrist::piece_square(us, PieceKind::Rook, rook_from);
        self.hash ^= zobrist::piece_square(us, PieceKind::Rook, rook_to);
    }

    /// Checks the structural board invariants: exactly one king per side,
    /// per-side `all` masks equal to the union of the six piece sets, piece
    /// sets pairwise disjoint, the two sides disjoint and the en passant
    /// square on its only possible rank. Generation and application assume
    /// these hold and only verify them in debug builds.
    #[must_use]
    pub fn is_legal(&self) -> bool {
        for player in [Player::White, Player::Black] {
            let pieces = self.board.pieces(player);
            if pieces.king.count() != 1 {
                return false;
            }
            if pieces.all != pieces.union() {
                return false;
            }
            // Disjoint piece sets: no square counted twice.
            let per_kind: u32 = pieces.kinds().iter().map(|(_, set)| set.count()).sum();
            if per_kind != pieces.all.count() {
                return false;
            }
        }
        if (self.pieces(Player::White).all & self.pieces(Player::Black).all).has_any() {
            return false;
        }
        if let Some(square) = self.en_passant_square {
            let expected_rank = match self.side_to_move {
                Player::White => Rank::Six,
                Player::Black => Rank::Three,
            };
            if square.rank() != expected_rank {
                return false;
            }
        }
        true
    }

    /// Parses a position from Forsyth-Edwards Notation. Also accepts trimmed
    /// FEN (EPD-style, 4 fields): the clocks then default to "0 1".
    ///
    /// # Errors
    ///
    /// Returns an error on malformed input or when the resulting position
    /// violates the structural invariants the move generator relies on
    /// (king counts, pawn counts, pawns on backranks, en passant
    /// consistency).
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let mut parts = input.split(' ');
        let mut board = Board::empty();
        let Some(placement) = parts.next() else {
            bail!("incorrect FEN: missing piece placement");
        };
        let mut rank_id = BOARD_WIDTH;
        for rank_fen in placement.split('/') {
            if rank_id == 0 {
                bail!("incorrect FEN: expected 8 ranks, got {placement}");
            }
            rank_id -= 1;
            let rank = Rank::try_from(rank_id)?;
            let mut file: u8 = 0;
            for symbol in rank_fen.chars() {
                if file > BOARD_WIDTH {
                    bail!("incorrect FEN: rank {rank_fen} is longer than 8 squares");
                }
                match symbol {
                    '0' => bail!("incorrect FEN: empty square runs start at 1"),
                    '1'..='8' => {
                        file += symbol as u8 - b'0';
                        continue;
                    },
                    _ => (),
                }
                let piece = Piece::try_from(symbol)?;
                if file >= BOARD_WIDTH {
                    bail!("incorrect FEN: rank {rank_fen} is longer than 8 squares");
                }
                let square = Square::new(file.try_into()?, rank);
                *board.pieces_mut(piece.owner).bitboard_for(piece.kind) |=
                    Bitboard::from(square);
                file += 1;
            }
            if file != BOARD_WIDTH {
                bail!("incorrect FEN: rank should be exactly 8 squares, got {rank_fen}");
            }
        }
        if rank_id != 0 {
            bail!("incorrect FEN: there should be 8 ranks, got {placement}");
        }
        board.pieces_mut(Player::White).all = board.pieces(Player::White).union();
        board.pieces_mut(Player::Black).all = board.pieces(Player::Black).union();
        let side_to_move: Player = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing side to move"),
        };
        let castling: CastleRights = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing castling rights"),
        };
        let en_passant_square = match parts.next() {
            Some("-") => None,
            Some(value) => Some(Square::try_from(value)?),
            None => bail!("incorrect FEN: missing en passant square"),
        };
        let halfmove_clock = match parts.next() {
            Some(value) => {
                if !value.bytes().all(|c| c.is_ascii_digit()) {
                    bail!("halfmove clock can not contain anything other than digits");
                }
                value
                    .parse::<u8>()
                    .with_context(|| format!("incorrect FEN: bad halfmove clock {value}"))?
            },
            // 4-field EPD: clocks default to zero/one.
            None => 0,
        };
        let fullmove_counter = match parts.next() {
            Some(value) => {
                if !value.bytes().all(|c| c.is_ascii_digit()) {
                    bail!("fullmove counter can not contain anything other than digits");
                }
                value
                    .parse::<NonZeroU16>()
                    .with_context(|| format!("incorrect FEN: bad fullmove counter {value}"))?
            },
            None => NonZeroU16::MIN,
        };
        if parts.next().is_some() {
            bail!("trailing symbols are not allowed in FEN");
        }
        let hash = zobrist::compute(&board, side_to_move, en_passant_square);
        let result = Self {
            board,
            side_to_move,
            castling,
            en_passant_square,
            halfmove_clock,
            fullmove_counter,
            hash,
        };
        result.validate()?;
        Ok(result)
    }

    // Construction-time guarantee of the invariants the generator and the
    // applier rely on (the core itself never re-validates outside debug
    // assertions).
    fn validate(&self) -> anyhow::Result<()> {
        for (player, name) in [(Player::White, "white"), (Player::Black, "black")] {
            let pieces = self.pieces(player);
            let kings = pieces.king.count();
            if kings != 1 {
                bail!("expected 1 {name} king, got {kings}");
            }
            let pawns = pieces.pawns.count();
            if pawns > 8 {
                bail!("expected at most 8 {name} pawns, got {pawns}");
            }
        }
        let pawns = self.pieces(Player::White).pawns | self.pieces(Player::Black).pawns;
        if (pawns & (Rank::One.mask() | Rank::Eight.mask())).has_any() {
            bail!("pawns can not stand on backranks");
        }
        if let Some(square) = self.en_passant_square {
            let expected_rank = match self.side_to_move {
                Player::White => Rank::Six,
                Player::Black => Rank::Three,
            };
            if square.rank() != expected_rank {
                bail!("en passant square {square} is not on rank {expected_rank}");
            }
            // The pawn that was just pushed two squares has to stand right in
            // front of the en passant square.
            let pushed_pawn = match self.side_to_move {
                Player::White => Square::from_index(square as u8 - BOARD_WIDTH),
                Player::Black => Square::from_index(square as u8 + BOARD_WIDTH),
            };
            if !self.pieces(self.them()).pawns.contains(pushed_pawn) {
                bail!("no pawn in front of en passant square {square}");
            }
        }
        Ok(())
    }
}

impl TryFrom<&str> for Position {
    type Error = anyhow::Error;

    /// Cleans up the input (whitespace, optional "fen "/"epd " prefix) and
    /// parses it as [`Position::from_fen`] does.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        for prefix in ["fen ", "epd "] {
            if let Some(stripped) = input.strip_prefix(prefix) {
                return Self::from_fen(stripped);
            }
        }
        Self::from_fen(input)
    }
}

impl fmt::Display for Position {
    /// Prints the position in Forsyth-Edwards Notation.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ", &self.board)?;
        write!(f, "{} ", &self.side_to_move)?;
        write!(f, "{} ", &self.castling)?;
        match self.en_passant_square {
            Some(square) => write!(f, "{square} "),
            None => write!(f, "- "),
        }?;
        write!(f, "{} {}", self.halfmove_clock, self.fullmove_counter)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{:?}", &self.board)?;
        writeln!(f, "Side to move: {:?}", &self.side_to_move)?;
        writeln!(f, "Castling rights: {}", &self.castling)?;
        writeln!(f, "En passant: {:?}", &self.en_passant_square)?;
        writeln!(f, "Hash: {:#018x}", self.hash)?;
        write!(f, "FEN: {self}")
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::Promotion;

    fn setup(fen: &str) -> Position {
        let position = Position::try_from(fen).expect("parsing a legal position");
        assert_eq!(position.to_string(), fen);
        assert!(position.is_legal(), "{position}");
        position
    }

    fn apply(position: &mut Position, moves: &[&str]) {
        for uci in moves {
            let candidates = position.generate_moves();
            let next_move = candidates
                .iter()
                .find(|m| m.to_string() == *uci)
                .copied()
                .unwrap_or_else(|| panic!("move {uci} is not generated in {position}"));
            position.make_move(next_move);
            assert!(position.is_legal(), "{position}");
            // The incremental hash has to agree with a from-scratch
            // recomputation at every step.
            assert_eq!(
                position.hash(),
                zobrist::compute(
                    &position.board,
                    position.side_to_move,
                    position.en_passant_square
                ),
                "incremental hash diverged after {uci}"
            );
        }
    }

    #[test]
    fn correct_fen() {
        setup("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        setup("2r3r1/p3k3/1p3pp1/1B5p/5P2/2P1p1P1/PP4KP/3R4 w - - 0 34");
        setup("rnbqk1nr/p3bppp/1p2p3/2ppP3/3P4/P7/1PP1NPPP/R1BQKBNR w KQkq c6 0 7");
        setup("r2qkb1r/1pp1pp1p/p1np1np1/1B6/3PP1b1/2N1BN2/PPP2PPP/R2QK2R w KQkq - 0 7");
        setup("r3k3/5p2/2p5/p7/P3r3/2N2n2/1PP2P2/2K2B2 w q - 0 24");
        setup("8/8/8/8/2P5/3k4/8/KB6 b - c3 0 1");
    }

    #[test]
    fn correct_epd() {
        let epd = "rnbqkb1r/pp2pppp/3p1n2/8/3NP3/2N5/PPP2PPP/R1BQKB1R b KQkq -";
        let position = Position::try_from(epd).expect("parsing a legal EPD");
        assert_eq!(position.halfmove_clock(), 0);
        assert_eq!(position.fullmove_counter().get(), 1);
    }

    #[test]
    fn cleans_input() {
        assert!(Position::try_from(
            "fen rn1qkb1r/pp3ppp/2p1pn2/3p1b2/2PP4/5NP1/PP2PPBP/RNBQK2R w KQkq - 0 1"
        )
        .is_ok());
        assert!(Position::try_from(
            "epd rnbqkb1r/ppp1pp1p/5np1/3p4/3P1B2/5N2/PPP1PPPP/RN1QKB1R w KQkq -"
        )
        .is_ok());
        assert!(Position::try_from(
            " rnbqkbnr/pp2pppp/8/3p4/3P4/3B4/PPP2PPP/RNBQK1NR b KQkq - 0 1\n"
        )
        .is_ok());
    }

    #[test]
    fn incorrect_fen() {
        assert!(Position::try_from("3k2p1N/82/8/8/7B/6K1/3R4/8 b - - 0 1").is_err());
        assert!(Position::try_from("3kn3/R4N2/8/8/7B/6K1/3R4/8 b - - 0 48 b - -").is_err());
        assert!(Position::try_from("3kn3/R4N2/8/8/7B/6K1/3r4/8 b - - +8 1").is_err());
        assert!(Position::try_from("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1").is_err());
        // No kings.
        assert!(Position::try_from("8/8/8/8/8/8/8/8 w - - 0 1").is_err());
        // Too many kings.
        assert!(Position::try_from("1kkk4/8/8/8/8/8/8/1KKK4 w - - 0 1").is_err());
        // Nine pawns.
        assert!(
            Position::try_from("rnbqkbnr/pppppppp/8/8/8/P7/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
                .is_err()
        );
        // Pawns on a backrank.
        assert!(Position::try_from("3kr3/8/8/8/8/5Q2/8/1KP4P w - - 0 1").is_err());
        // En passant square not behind a pushed pawn.
        assert!(
            Position::try_from("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq d3 0 1")
                .is_err()
        );
        // Wrong en passant rank.
        assert!(
            Position::try_from("rnbqkbnr/pppppppp/8/4P3/8/8/PPPP1PPP/RNBQKBNR b KQkq e4 0 1")
                .is_err()
        );
    }

    #[test]
    fn make_move_basics() {
        let mut position = Position::starting();
        let initial_hash = position.hash();
        apply(&mut position, &["e2e4"]);
        assert_eq!(
            position.to_string(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        assert_ne!(position.hash(), initial_hash);
        apply(&mut position, &["c7c5", "g1f3"]);
        assert_eq!(
            position.to_string(),
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
        );
    }

    #[test]
    fn halfmove_clock_bookkeeping() {
        let mut position = Position::starting();
        apply(&mut position, &["g1f3", "g8f6", "b1c3"]);
        assert_eq!(position.halfmove_clock(), 3);
        // A pawn move resets the clock.
        apply(&mut position, &["e7e5"]);
        assert_eq!(position.halfmove_clock(), 0);
        apply(&mut position, &["c3d5"]);
        assert_eq!(position.halfmove_clock(), 1);
        // A capture resets the clock.
        apply(&mut position, &["f6d5"]);
        assert_eq!(position.halfmove_clock(), 0);
        assert_eq!(position.fullmove_counter().get(), 4);
    }

    #[test]
    fn en_passant_capture_removes_the_pushed_pawn() {
        let mut position = setup("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2");
        apply(&mut position, &["e4e5", "f7f5"]);
        assert_eq!(position.en_passant_square(), Some(Square::F6));
        apply(&mut position, &["e5f6"]);
        // The doubly-pushed pawn is gone, the landing square holds ours.
        assert!(position
            .pieces(Player::White)
            .pawns
            .contains(Square::F6));
        assert!(!position.pieces(Player::Black).pawns.contains(Square::F5));
        assert_eq!(position.en_passant_square(), None);
        assert_eq!(
            position.to_string(),
            "rnbqkbnr/ppp1p1pp/5P2/3p4/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 3"
        );
    }

    #[test]
    fn promotion_switches_bitboards() {
        let mut position = setup("5k2/1P6/8/8/8/8/8/4K3 w - - 0 1");
        let promote = Move::new(Square::B7, Square::B8, Some(Promotion::Queen));
        position.make_move(promote);
        assert!(position.pieces(Player::White).pawns.is_empty());
        assert!(position
            .pieces(Player::White)
            .queens
            .contains(Square::B8));
        assert_eq!(
            position.hash(),
            zobrist::compute(
                &position.board,
                position.side_to_move,
                position.en_passant_square
            )
        );
    }

    #[test]
    fn castling_application_moves_both_pieces() {
        let mut position = setup("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
        apply(&mut position, &["e1g1"]);
        assert!(position.pieces(Player::White).king.contains(Square::G1));
        assert!(position.pieces(Player::White).rooks.contains(Square::F1));
        assert!(!position.pieces(Player::White).rooks.contains(Square::H1));
        assert_eq!(
            position.castling() & CastleRights::WHITE_BOTH,
            CastleRights::NONE
        );
        apply(&mut position, &["e8c8"]);
        assert!(position.pieces(Player::Black).king.contains(Square::C8));
        assert!(position.pieces(Player::Black).rooks.contains(Square::D8));
        assert_eq!(position.castling(), CastleRights::NONE);
    }

    #[test]
    fn rook_moves_and_captures_strip_rights() {
        let mut position = setup("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        // Moving the a1 rook strips only white's long right.
        apply(&mut position, &["a1a2"]);
        assert_eq!(
            position.castling(),
            CastleRights::WHITE_SHORT | CastleRights::BLACK_BOTH
        );
        // Capturing the h8 rook strips only black's short right.
        apply(&mut position, &["h8h2", "a2a1", "h2h1"]);
        assert_eq!(position.castling(), CastleRights::BLACK_LONG);
    }

    #[test]
    fn hash_reversibility() {
        let mut position = Position::starting();
        let initial_hash = position.hash();
        // A knight round-trip by both sides restores the position, and with
        // it the hash. Clocks are not part of the hash.
        apply(&mut position, &["g1f3", "g8f6", "f3g1", "f6g8"]);
        assert_eq!(position.hash(), initial_hash);
        assert_eq!(
            position.to_string(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 4 3"
        );
    }

    #[test]
    fn hash_determinism() {
        let mut first = Position::starting();
        let mut second = Position::starting();
        for position in [&mut first, &mut second] {
            apply(position, &["d2d4", "d7d5", "c1f4"]);
        }
        assert_eq!(first.hash(), second.hash());
        assert_eq!(first, second);
    }
}
