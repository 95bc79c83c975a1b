//! Chess position representation and legal move generation on 64-bit
//! bitboards. The crate answers two questions for an arbitrary legal
//! position: which moves are legal from here, and what does the position look
//! like after a given move — while maintaining an incrementally updated
//! position hash for transposition lookups and aggregating per-side
//! square-control data for exchange evaluation built on top.
//!
//! The library owns no I/O, no search and no protocol surface: it is the
//! board core an engine is built around.
//!
//! ```
//! use roque::position::Position;
//!
//! let mut position =
//!     Position::try_from("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")?;
//! let moves = position.generate_moves();
//! assert_eq!(moves.len(), 20);
//!
//! let first = moves
//!     .iter()
//!     .find(|m| m.to_string() == "e2e4")
//!     .copied()
//!     .expect("e2e4 is legal in the starting position");
//! position.make_move(first);
//! assert_eq!(
//!     position.to_string(),
//!     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
//! );
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod bitboard;
pub mod core;
pub mod movegen;
pub mod perft;
pub mod position;
pub mod zobrist;

mod attacks;

pub use crate::core::{Move, PieceKind, Player, Promotion, Square};
pub use crate::movegen::{ControlArea, MoveList};
pub use crate::position::Position;
