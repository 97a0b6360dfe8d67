//! Fixed EAN13 encoding tables and symbol geometry.
//!
//! Every digit is four alternating elements whose widths add up to seven
//! modules. The 7-bit tables below are expanded from those widths at compile
//! time; bit 6 is the leftmost module and a set bit is a bar.

/// Modules per encoded digit.
pub const DIGIT_MODULES: usize = 7;

/// Digits in each half of the symbol.
pub const GROUP_DIGITS: usize = 6;

pub const START_GUARD: [bool; 3] = [true, false, true];
pub const CENTER_GUARD: [bool; 5] = [false, true, false, true, false];
pub const END_GUARD: [bool; 3] = [true, false, true];

pub const START_GUARD_OFFSET: usize = 0;
pub const LEFT_GROUP_OFFSET: usize = START_GUARD_OFFSET + START_GUARD.len();
pub const CENTER_GUARD_OFFSET: usize = LEFT_GROUP_OFFSET + GROUP_DIGITS * DIGIT_MODULES;
pub const RIGHT_GROUP_OFFSET: usize = CENTER_GUARD_OFFSET + CENTER_GUARD.len();
pub const END_GUARD_OFFSET: usize = RIGHT_GROUP_OFFSET + GROUP_DIGITS * DIGIT_MODULES;

/// Total modules in a symbol, quiet zones excluded.
pub const TOTAL_MODULES: usize = END_GUARD_OFFSET + END_GUARD.len();

/// Minimum light margins, in modules.
pub const LEFT_QUIET_ZONE: usize = 11;
pub const RIGHT_QUIET_ZONE: usize = 7;

/// Element widths for the odd-parity left set, starting with a space.
const L_WIDTHS: [[u8; 4]; 10] = [
    [3, 2, 1, 1],
    [2, 2, 2, 1],
    [2, 1, 2, 2],
    [1, 4, 1, 1],
    [1, 1, 3, 2],
    [1, 2, 3, 1],
    [1, 1, 1, 4],
    [1, 3, 1, 2],
    [1, 2, 1, 3],
    [3, 1, 1, 2],
];

/// Element widths for the even-parity left set, starting with a space.
const G_WIDTHS: [[u8; 4]; 10] = [
    [1, 1, 2, 3],
    [1, 2, 2, 2],
    [2, 2, 1, 2],
    [1, 1, 4, 1],
    [2, 3, 1, 1],
    [1, 3, 2, 1],
    [4, 1, 1, 1],
    [2, 1, 3, 1],
    [3, 1, 2, 1],
    [2, 1, 1, 3],
];

const fn expand(widths: [u8; 4], starts_with_bar: bool) -> u8 {
    let mut bits = 0u8;
    let mut bar = starts_with_bar;
    let mut element = 0;
    while element < 4 {
        let mut n = 0;
        while n < widths[element] {
            bits = (bits << 1) | (bar as u8);
            n += 1;
        }
        bar = !bar;
        element += 1;
    }
    bits
}

const fn expand_table(widths: [[u8; 4]; 10], starts_with_bar: bool) -> [u8; 10] {
    let mut table = [0u8; 10];
    let mut digit = 0;
    while digit < 10 {
        table[digit] = expand(widths[digit], starts_with_bar);
        digit += 1;
    }
    table
}

pub const L_CODES: [u8; 10] = expand_table(L_WIDTHS, false);
pub const G_CODES: [u8; 10] = expand_table(G_WIDTHS, false);
/// Right-hand codes are the L widths drawn starting with a bar.
pub const R_CODES: [u8; 10] = expand_table(L_WIDTHS, true);

/// Left-group encoding set chosen for one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    /// L-code set (odd parity).
    Odd,
    /// G-code set (even parity).
    Even,
}

/// Parity of the six left digits for each leading digit, bit 5 first.
/// A set bit selects the G-code set.
pub const PARITY_PATTERNS: [u8; 10] = [
    0b000000, 0b001011, 0b001101, 0b001110, 0b010011, 0b011001, 0b011100, 0b010101, 0b010110,
    0b011010,
];

pub fn parity_at(first_digit: u8, position: usize) -> Parity {
    let mask = PARITY_PATTERNS[first_digit as usize];
    if mask & (1 << (GROUP_DIGITS - 1 - position)) != 0 {
        Parity::Even
    } else {
        Parity::Odd
    }
}

/// Leading digit whose parity pattern is `mask`, if any.
pub fn first_digit_for_parity(mask: u8) -> Option<u8> {
    PARITY_PATTERNS
        .iter()
        .position(|&p| p == mask)
        .map(|d| d as u8)
}

pub fn left_code(digit: u8, parity: Parity) -> u8 {
    match parity {
        Parity::Odd => L_CODES[digit as usize],
        Parity::Even => G_CODES[digit as usize],
    }
}

pub fn right_code(digit: u8) -> u8 {
    R_CODES[digit as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_geometry() {
        assert_eq!(LEFT_GROUP_OFFSET, 3);
        assert_eq!(CENTER_GUARD_OFFSET, 45);
        assert_eq!(RIGHT_GROUP_OFFSET, 50);
        assert_eq!(END_GUARD_OFFSET, 92);
        assert_eq!(TOTAL_MODULES, 95);
    }

    #[test]
    fn test_expanded_tables_match_published_values() {
        assert_eq!(L_CODES[0], 0b0001101);
        assert_eq!(L_CODES[9], 0b0001011);
        assert_eq!(G_CODES[0], 0b0100111);
        assert_eq!(G_CODES[6], 0b0000101);
        assert_eq!(R_CODES[0], 0b1110010);
        assert_eq!(R_CODES[7], 0b1000100);
    }

    #[test]
    fn test_widths_sum_to_seven() {
        for widths in L_WIDTHS.iter().chain(G_WIDTHS.iter()) {
            assert_eq!(widths.iter().map(|&w| w as usize).sum::<usize>(), DIGIT_MODULES);
        }
    }

    #[test]
    fn test_r_codes_complement_l_codes_and_g_codes_mirror_them() {
        for digit in 0..10 {
            assert_eq!(R_CODES[digit], !L_CODES[digit] & 0x7f);
            assert_eq!(G_CODES[digit], R_CODES[digit].reverse_bits() >> 1);
        }
    }

    #[test]
    fn test_tables_are_pairwise_disjoint() {
        let mut seen = HashSet::new();
        for code in L_CODES.iter().chain(G_CODES.iter()).chain(R_CODES.iter()) {
            assert!(seen.insert(*code), "code {:07b} appears twice", code);
        }
        assert_eq!(seen.len(), 30);
    }

    #[test]
    fn test_parity_patterns_are_distinct_and_start_odd() {
        let distinct: HashSet<u8> = PARITY_PATTERNS.iter().copied().collect();
        assert_eq!(distinct.len(), 10);
        for first in 0..10u8 {
            assert_eq!(parity_at(first, 0), Parity::Odd);
            assert_eq!(first_digit_for_parity(PARITY_PATTERNS[first as usize]), Some(first));
        }
        assert_eq!(first_digit_for_parity(0b111111), None);
    }

    #[test]
    fn test_parity_for_leading_one() {
        // AABABB
        let parities: Vec<Parity> = (0..6).map(|p| parity_at(1, p)).collect();
        assert_eq!(
            parities,
            vec![
                Parity::Odd,
                Parity::Odd,
                Parity::Even,
                Parity::Odd,
                Parity::Even,
                Parity::Even
            ]
        );
    }
}
