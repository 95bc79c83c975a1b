//! Generates the lookup tables used by move generation: PEXT-indexed sliding
//! attack tables for bishops and rooks, knight and king step tables and the
//! piece-square hash keys. The tables are written to `OUT_DIR` and `include!`d
//! by `src/attacks.rs` and `src/zobrist.rs`.

use std::error::Error;
use std::fmt::Write;
use std::path::Path;
use std::{env, fs};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const BOARD_WIDTH: i32 = 8;
const BOARD_SIZE: i32 = BOARD_WIDTH * BOARD_WIDTH;

const BISHOP_DIRECTIONS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROOK_DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const KNIGHT_STEPS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];
const KING_STEPS: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

// The key tables have to stay stable between builds, otherwise two builds of
// the same crate version would disagree on position hashes.
const HASH_KEY_SEED: u64 = 0x7061_6273_6f6e_6e65;

fn coordinates(square: i32) -> (i32, i32) {
    (square % BOARD_WIDTH, square / BOARD_WIDTH)
}

fn square_mask(column: i32, row: i32) -> u64 {
    1u64 << (row * BOARD_WIDTH + column)
}

fn is_within_board(column: i32, row: i32) -> bool {
    (0..BOARD_WIDTH).contains(&column) && (0..BOARD_WIDTH).contains(&row)
}

// Serial parallel-bits-deposit: scatters the low bits of `index` over the set
// bits of `mask`. The runtime lookup does the inverse extraction, possibly
// through the BMI2 instruction.
fn deposit_bits(index: u64, mask: u64) -> u64 {
    let mut result = 0u64;
    let mut remaining_mask = mask;
    let mut source_bit = 1u64;
    while remaining_mask != 0 {
        let ls1b = 1u64 << remaining_mask.trailing_zeros();
        if (index & source_bit) != 0 {
            result |= ls1b;
        }
        remaining_mask ^= ls1b;
        source_bit <<= 1;
    }
    result
}

fn write_table(filename: &str, contents: &str) {
    let out_dir = env::var_os("OUT_DIR").expect("OUT_DIR is always set for build scripts");
    fs::write(Path::new(&out_dir).join(filename), contents).expect("OUT_DIR is writable");
}

fn serialize_bitboards(table: &[u64]) -> Result<String, Box<dyn Error>> {
    let mut result = String::new();
    result.push('[');
    for element in table {
        writeln!(result, "Bitboard::from_bits({element}),")?;
    }
    result.push(']');
    Ok(result)
}

fn serialize_numbers(table: &[u64]) -> Result<String, Box<dyn Error>> {
    let mut result = String::new();
    result.push('[');
    for element in table {
        writeln!(result, "{element},")?;
    }
    result.push(']');
    Ok(result)
}

fn ray_attacks(square: i32, directions: &[(i32, i32); 4], occupancy: u64) -> u64 {
    let (source_column, source_row) = coordinates(square);
    let mut result = 0u64;
    for (d_column, d_row) in directions {
        let mut column = source_column + d_column;
        let mut row = source_row + d_row;
        while is_within_board(column, row) {
            let attacked = square_mask(column, row);
            result |= attacked;
            if (occupancy & attacked) != 0 {
                break;
            }
            column += d_column;
            row += d_row;
        }
    }
    result
}

// The relevant occupancy excludes the border square of each ray: a blocker on
// the border does not change the attack set.
fn relevant_occupancy(square: i32, directions: &[(i32, i32); 4]) -> u64 {
    let (source_column, source_row) = coordinates(square);
    let mut result = 0u64;
    for (d_column, d_row) in directions {
        let mut column = source_column + d_column;
        let mut row = source_row + d_row;
        while is_within_board(column + d_column, row + d_row) {
            result |= square_mask(column, row);
            column += d_column;
            row += d_row;
        }
    }
    result
}

// Generates the attack table for one slider kind along with the per-square
// relevant occupancies and table offsets, and returns the total table size so
// the caller can check it against the expected constant.
fn generate_slider_tables(
    identifier: &str,
    directions: &[(i32, i32); 4],
) -> Result<usize, Box<dyn Error>> {
    let mut attacks = vec![];
    let mut occupancies = vec![];
    let mut offsets = vec![];
    let mut offset = 0u64;
    for square in 0..BOARD_SIZE {
        let mask = relevant_occupancy(square, directions);
        offsets.push(offset);
        occupancies.push(mask);
        let subsets = 1u64 << mask.count_ones();
        for index in 0..subsets {
            attacks.push(ray_attacks(square, directions, deposit_bits(index, mask)));
        }
        offset += subsets;
    }
    write_table(
        &format!("{identifier}_attacks"),
        &serialize_bitboards(&attacks)?,
    );
    write_table(
        &format!("{identifier}_occupancies"),
        &serialize_numbers(&occupancies)?,
    );
    write_table(&format!("{identifier}_offsets"), &serialize_numbers(&offsets)?);
    Ok(attacks.len())
}

fn generate_step_table(identifier: &str, steps: &[(i32, i32); 8]) -> Result<(), Box<dyn Error>> {
    let mut table = vec![];
    for square in 0..BOARD_SIZE {
        let (source_column, source_row) = coordinates(square);
        let mut mask = 0u64;
        for (d_column, d_row) in steps {
            let column = source_column + d_column;
            let row = source_row + d_row;
            if is_within_board(column, row) {
                mask |= square_mask(column, row);
            }
        }
        table.push(mask);
    }
    write_table(identifier, &serialize_bitboards(&table)?);
    Ok(())
}

// One 64-key table per (side, piece kind) pair: 6 white tables followed by 6
// black tables, indexed by the piece kind ordinal.
fn generate_hash_keys() -> Result<(), Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(HASH_KEY_SEED);
    let mut result = String::new();
    result.push('[');
    for _piece in 0..12 {
        result.push('[');
        for _square in 0..BOARD_SIZE {
            writeln!(result, "{},", rng.r#gen::<u64>())?;
        }
        result.push_str("],\n");
    }
    result.push(']');
    write_table("piece_square_keys", &result);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=build.rs");
    assert_eq!(generate_slider_tables("bishop", &BISHOP_DIRECTIONS)?, 5248);
    assert_eq!(generate_slider_tables("rook", &ROOK_DIRECTIONS)?, 102_400);
    generate_step_table("knight_attacks", &KNIGHT_STEPS)?;
    generate_step_table("king_attacks", &KING_STEPS)?;
    generate_hash_keys()?;
    Ok(())
}
