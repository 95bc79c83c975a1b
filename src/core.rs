//! Chess primitives shared by the board representation and move generation:
//! squares, files, ranks, players, piece kinds, castling rights and the packed
//! [`Move`] value.

use std::fmt::{self, Write};
use std::mem;

use anyhow::bail;

use crate::bitboard::Bitboard;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// Board squares, from left to right and from bottom to the top:
///
/// ```
/// use roque::core::Square;
///
/// assert_eq!(Square::A1 as u8, 0);
/// assert_eq!(Square::E1 as u8, 4);
/// assert_eq!(Square::H1 as u8, 7);
/// assert_eq!(Square::A4 as u8, 8 * 3);
/// assert_eq!(Square::H8 as u8, 63);
/// ```
///
/// The square fits into one byte.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// Connects file (column) and rank (row) to form a full square.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        unsafe { mem::transmute(file as u8 + (rank as u8) * BOARD_WIDTH) }
    }

    /// Returns the file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> File {
        unsafe { mem::transmute(self as u8 % BOARD_WIDTH) }
    }

    /// Returns the rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> Rank {
        unsafe { mem::transmute(self as u8 / BOARD_WIDTH) }
    }

    // The caller has to guarantee that the index is in 0..BOARD_SIZE. This is
    // used on hot paths where the index comes from bit arithmetic on valid
    // squares and the range check of TryFrom would be redundant.
    pub(crate) fn from_index(index: u8) -> Self {
        debug_assert!(index < BOARD_SIZE);
        unsafe { mem::transmute(index) }
    }
}

impl TryFrom<u8> for Square {
    type Error = anyhow::Error;

    /// Creates a square given its index on the board.
    ///
    /// # Errors
    ///
    /// The square index should be in `0..BOARD_SIZE` range.
    fn try_from(square_index: u8) -> anyhow::Result<Self> {
        const MAX_INDEX: u8 = BOARD_SIZE - 1;
        match square_index {
            0..=MAX_INDEX => Ok(Self::from_index(square_index)),
            _ => bail!("square index should be in 0..BOARD_SIZE, got {square_index}"),
        }
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    fn try_from(square: &str) -> anyhow::Result<Self> {
        let mut chars = square.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => Ok(Self::new(file.try_into()?, rank.try_into()?)),
            _ => bail!("square should be two chars, got '{square}'"),
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Represents a column (vertical line) of the chessboard. In chess notation it
/// is normally represented with a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[allow(missing_docs)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    /// Returns a bitboard mask with 1s set for all squares of the given file.
    #[must_use]
    pub const fn mask(self) -> Bitboard {
        Bitboard::from_bits(0x0101_0101_0101_0101 << self as u8)
    }
}

impl TryFrom<char> for File {
    type Error = anyhow::Error;

    fn try_from(file: char) -> anyhow::Result<Self> {
        match file {
            'a'..='h' => Ok(unsafe { mem::transmute(file as u8 - b'a') }),
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        }
    }
}

impl TryFrom<u8> for File {
    type Error = anyhow::Error;

    fn try_from(column: u8) -> anyhow::Result<Self> {
        match column {
            0..=7 => Ok(unsafe { mem::transmute(column) }),
            _ => bail!("file should be within 0..BOARD_WIDTH, got {column}"),
        }
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", (b'a' + *self as u8) as char)
    }
}

/// Represents a horizontal line of the chessboard. In chess notation it is
/// represented with a number. The implementation uses zero-based values (rank
/// 1 is 0).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[allow(missing_docs)]
pub enum Rank {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
}

impl Rank {
    /// Returns a bitboard mask with 1s set for all squares of the given rank.
    #[must_use]
    pub const fn mask(self) -> Bitboard {
        Bitboard::from_bits(0xFF << (self as u8 * BOARD_WIDTH))
    }

    /// The rank a player's king and rooks start on.
    #[must_use]
    pub const fn backrank(player: Player) -> Self {
        match player {
            Player::White => Self::One,
            Player::Black => Self::Eight,
        }
    }

    /// The rank where a player's pawns promote.
    #[must_use]
    pub const fn promotion(player: Player) -> Self {
        match player {
            Player::White => Self::Eight,
            Player::Black => Self::One,
        }
    }
}

impl TryFrom<char> for Rank {
    type Error = anyhow::Error;

    fn try_from(rank: char) -> anyhow::Result<Self> {
        match rank {
            '1'..='8' => Ok(unsafe { mem::transmute(rank as u8 - b'1') }),
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = anyhow::Error;

    fn try_from(row: u8) -> anyhow::Result<Self> {
        match row {
            0..=7 => Ok(unsafe { mem::transmute(row) }),
            _ => bail!("rank should be within 0..BOARD_WIDTH, got {row}"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("player should be 'w' or 'b', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(match self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Standard chess piece kinds. The discriminants form a contiguous zero-based
/// range: the piece-square hash table and the packed [`Move`] promotion field
/// index by them directly.
#[repr(u8)]
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl From<Promotion> for PieceKind {
    fn from(promotion: Promotion) -> Self {
        match promotion {
            Promotion::Knight => Self::Knight,
            Promotion::Bishop => Self::Bishop,
            Promotion::Rook => Self::Rook,
            Promotion::Queen => Self::Queen,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
        })
    }
}

/// Represents a specific piece owned by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    #[allow(missing_docs)]
    pub owner: Player,
    #[allow(missing_docs)]
    pub kind: PieceKind,
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        let owner = if symbol.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        let kind = match symbol.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => bail!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'"),
        };
        Ok(Self { owner, kind })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let symbol = match self.kind {
            PieceKind::King => 'k',
            PieceKind::Queen => 'q',
            PieceKind::Rook => 'r',
            PieceKind::Bishop => 'b',
            PieceKind::Knight => 'n',
            PieceKind::Pawn => 'p',
        };
        f.write_char(match self.owner {
            Player::White => symbol.to_ascii_uppercase(),
            Player::Black => symbol,
        })
    }
}

bitflags::bitflags! {
    /// Tracks the ability to [castle] for each player on each wing (kingside
    /// is often referred to as O-O or h-side castle, queenside as O-O-O or
    /// a-side castle). When the king moves, the player loses the ability to
    /// castle on both wings; when a rook moves off (or is captured on) its
    /// original corner square, the player loses the ability to castle on the
    /// corresponding wing only.
    ///
    /// [castle]: https://www.chessprogramming.org/Castling
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CastleRights : u8 {
        #[allow(missing_docs)]
        const NONE = 0;
        #[allow(missing_docs)]
        const WHITE_SHORT = 0b1000;
        #[allow(missing_docs)]
        const WHITE_LONG = 0b0100;
        #[allow(missing_docs)]
        const WHITE_BOTH = Self::WHITE_SHORT.bits() | Self::WHITE_LONG.bits();
        #[allow(missing_docs)]
        const BLACK_SHORT = 0b0010;
        #[allow(missing_docs)]
        const BLACK_LONG = 0b0001;
        #[allow(missing_docs)]
        const BLACK_BOTH = Self::BLACK_SHORT.bits() | Self::BLACK_LONG.bits();
        #[allow(missing_docs)]
        const ALL = Self::WHITE_BOTH.bits() | Self::BLACK_BOTH.bits();
    }
}

impl CastleRights {
    /// Both castling rights of one player.
    #[must_use]
    pub const fn both(player: Player) -> Self {
        match player {
            Player::White => Self::WHITE_BOTH,
            Player::Black => Self::BLACK_BOTH,
        }
    }

    /// The kingside castling right of one player.
    #[must_use]
    pub const fn short(player: Player) -> Self {
        match player {
            Player::White => Self::WHITE_SHORT,
            Player::Black => Self::BLACK_SHORT,
        }
    }

    /// The queenside castling right of one player.
    #[must_use]
    pub const fn long(player: Player) -> Self {
        match player {
            Player::White => Self::WHITE_LONG,
            Player::Black => Self::BLACK_LONG,
        }
    }
}

impl TryFrom<&str> for CastleRights {
    type Error = anyhow::Error;

    /// Parses [`CastleRights`] for both players from the FEN format. The
    /// letters have to appear in the `KQkq` order, each at most once, or the
    /// input has to be a single dash.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        if input == "-" {
            return Ok(Self::NONE);
        }
        if input.is_empty() || input.len() > 4 {
            bail!("castle rights should be '-' or up to 4 symbols, got '{input}'");
        }
        let mut rights = Self::NONE;
        let mut previous = 0u8;
        for symbol in input.chars() {
            let (flag, order) = match symbol {
                'K' => (Self::WHITE_SHORT, 1),
                'Q' => (Self::WHITE_LONG, 2),
                'k' => (Self::BLACK_SHORT, 3),
                'q' => (Self::BLACK_LONG, 4),
                _ => bail!("unknown castle rights symbol '{symbol}' in '{input}'"),
            };
            if order <= previous {
                bail!("castle rights should be listed in KQkq order, got '{input}'");
            }
            previous = order;
            rights |= flag;
        }
        Ok(rights)
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::NONE {
            return f.write_char('-');
        }
        if self.contains(Self::WHITE_SHORT) {
            f.write_char('K')?;
        }
        if self.contains(Self::WHITE_LONG) {
            f.write_char('Q')?;
        }
        if self.contains(Self::BLACK_SHORT) {
            f.write_char('k')?;
        }
        if self.contains(Self::BLACK_LONG) {
            f.write_char('q')?;
        }
        Ok(())
    }
}

/// A pawn reaching the backrank can be promoted to a queen, rook, bishop or a
/// knight.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Promotion {
    Knight,
    Bishop,
    Rook,
    Queen,
}

impl Promotion {
    #[allow(missing_docs)]
    pub const ALL: [Self; 4] = [Self::Knight, Self::Bishop, Self::Rook, Self::Queen];
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(match self {
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
        })
    }
}

/// A chess move packed into 16 bits: 6 bits each for the origin and the
/// destination square and 3 bits for the promotion piece kind (0 when the
/// move does not promote). Moves do not record the captured piece or whether
/// the capture was en passant: [`crate::position::Position::make_move`]
/// re-derives that from the board.
///
/// ```
/// use roque::core::{Move, Promotion, Square};
///
/// let quiet = Move::new(Square::E2, Square::E4, None);
/// assert_eq!(quiet.to_string(), "e2e4");
/// let promotion = Move::new(Square::B7, Square::B8, Some(Promotion::Queen));
/// assert_eq!(promotion.to_string(), "b7b8q");
/// assert_eq!(std::mem::size_of::<Move>(), 2);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u16);

const MOVE_TO_SHIFT: u16 = 6;
const MOVE_PROMOTION_SHIFT: u16 = 12;
const MOVE_SQUARE_MASK: u16 = 0b11_1111;

impl Move {
    /// Packs origin, destination and an optional promotion into a move.
    #[must_use]
    pub const fn new(from: Square, to: Square, promotion: Option<Promotion>) -> Self {
        let promotion_bits = match promotion {
            None => 0,
            Some(Promotion::Knight) => PieceKind::Knight as u16,
            Some(Promotion::Bishop) => PieceKind::Bishop as u16,
            Some(Promotion::Rook) => PieceKind::Rook as u16,
            Some(Promotion::Queen) => PieceKind::Queen as u16,
        };
        Self(from as u16 | (to as u16) << MOVE_TO_SHIFT | promotion_bits << MOVE_PROMOTION_SHIFT)
    }

    /// The square the moving piece departs from.
    #[must_use]
    pub fn from(self) -> Square {
        Square::from_index((self.0 & MOVE_SQUARE_MASK) as u8)
    }

    /// The square the moving piece arrives at.
    #[must_use]
    pub fn to(self) -> Square {
        Square::from_index((self.0 >> MOVE_TO_SHIFT & MOVE_SQUARE_MASK) as u8)
    }

    /// The piece a pawn promotes to, if the move is a promotion.
    #[must_use]
    pub const fn promotion(self) -> Option<Promotion> {
        match self.0 >> MOVE_PROMOTION_SHIFT {
            0 => None,
            1 => Some(Promotion::Knight),
            2 => Some(Promotion::Bishop),
            3 => Some(Promotion::Rook),
            _ => Some(Promotion::Queen),
        }
    }
}

impl fmt::Display for Move {
    /// Serializes the move in UCI coordinate format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(promotion) = self.promotion() {
            write!(f, "{promotion}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self})")
    }
}

#[cfg(test)]
mod test {
    use std::mem::size_of;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn square_roundtrip() {
        let squares: Vec<_> = [
            0u8,
            BOARD_SIZE - 1,
            BOARD_WIDTH - 1,
            BOARD_WIDTH,
            BOARD_WIDTH * 2 + 5,
            BOARD_SIZE,
        ]
        .iter()
        .filter_map(|square| Square::try_from(*square).ok())
        .collect();
        assert_eq!(
            squares,
            vec![Square::A1, Square::H8, Square::H1, Square::A2, Square::F3]
        );
        assert_eq!(Square::new(File::B, Rank::Three), Square::B3);
        assert_eq!(Square::new(File::H, Rank::Eight), Square::H8);
        assert_eq!(Square::try_from("e4").unwrap(), Square::E4);
        assert_eq!(Square::E4.to_string(), "e4");
        assert!(Square::try_from("e9").is_err());
        assert!(Square::try_from("e").is_err());
        assert!(Square::try_from("e44").is_err());
    }

    #[test]
    #[should_panic(expected = "square index should be in 0..BOARD_SIZE, got 64")]
    fn square_from_incorrect_index() {
        let _ = Square::try_from(BOARD_SIZE).unwrap();
    }

    #[test]
    fn file_and_rank_masks() {
        assert_eq!(File::A.mask().bits(), 0x0101_0101_0101_0101);
        assert_eq!(File::H.mask().bits(), 0x8080_8080_8080_8080);
        assert_eq!(Rank::One.mask().bits(), 0xFF);
        assert_eq!(Rank::Eight.mask().bits(), 0xFF00_0000_0000_0000);
        assert_eq!(Rank::backrank(Player::White), Rank::One);
        assert_eq!(Rank::backrank(Player::Black), Rank::Eight);
        assert_eq!(Rank::promotion(Player::White), Rank::Eight);
        assert_eq!(Rank::promotion(Player::Black), Rank::One);
    }

    #[test]
    #[should_panic(expected = "file should be within 'a'..='h', got 'i'")]
    fn file_from_incorrect_char() {
        let _ = File::try_from('i').unwrap();
    }

    #[test]
    #[should_panic(expected = "rank should be within '1'..='8', got '9'")]
    fn rank_from_incorrect_char() {
        let _ = Rank::try_from('9').unwrap();
    }

    #[test]
    fn piece_symbols() {
        let piece = Piece::try_from('N').unwrap();
        assert_eq!(piece.owner, Player::White);
        assert_eq!(piece.kind, PieceKind::Knight);
        assert_eq!(piece.to_string(), "N");
        let piece = Piece::try_from('q').unwrap();
        assert_eq!(piece.owner, Player::Black);
        assert_eq!(piece.kind, PieceKind::Queen);
        assert_eq!(piece.to_string(), "q");
        assert!(Piece::try_from('x').is_err());
    }

    #[test]
    fn castle_rights_parsing() {
        assert_eq!(CastleRights::try_from("-").unwrap(), CastleRights::NONE);
        assert_eq!(CastleRights::try_from("KQkq").unwrap(), CastleRights::ALL);
        assert_eq!(
            CastleRights::try_from("Kq").unwrap(),
            CastleRights::WHITE_SHORT | CastleRights::BLACK_LONG
        );
        assert_eq!(
            CastleRights::try_from("kq").unwrap(),
            CastleRights::BLACK_BOTH
        );
        assert!(CastleRights::try_from("qk").is_err());
        assert!(CastleRights::try_from("KK").is_err());
        assert!(CastleRights::try_from("").is_err());
        assert!(CastleRights::try_from("KQkqK").is_err());
        assert_eq!(CastleRights::ALL.to_string(), "KQkq");
        assert_eq!(CastleRights::NONE.to_string(), "-");
        assert_eq!(
            (CastleRights::WHITE_LONG | CastleRights::BLACK_SHORT).to_string(),
            "Qk"
        );
    }

    #[test]
    fn castle_rights_per_player() {
        assert_eq!(CastleRights::both(Player::White), CastleRights::WHITE_BOTH);
        assert_eq!(
            CastleRights::short(Player::Black),
            CastleRights::BLACK_SHORT
        );
        assert_eq!(CastleRights::long(Player::White), CastleRights::WHITE_LONG);
    }

    #[test]
    fn move_packing() {
        assert_eq!(size_of::<Move>(), 2);
        let m = Move::new(Square::G1, Square::F3, None);
        assert_eq!(m.from(), Square::G1);
        assert_eq!(m.to(), Square::F3);
        assert_eq!(m.promotion(), None);
        assert_eq!(m.to_string(), "g1f3");
        for promotion in Promotion::ALL {
            let m = Move::new(Square::A7, Square::B8, Some(promotion));
            assert_eq!(m.from(), Square::A7);
            assert_eq!(m.to(), Square::B8);
            assert_eq!(m.promotion(), Some(promotion));
        }
        assert_eq!(
            Move::new(Square::A7, Square::A8, Some(Promotion::Queen)).to_string(),
            "a7a8q"
        );
        assert_eq!(
            Move::new(Square::E2, Square::E4, None),
            Move::new(Square::E2, Square::E4, None)
        );
        assert_ne!(
            Move::new(Square::E2, Square::E4, None),
            Move::new(Square::E2, Square::E3, None)
        );
    }
}
