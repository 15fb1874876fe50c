//! Shared helpers for building raw FITS byte streams in tests

use crate::fits::constants::{BLOCK_SIZE, CARD_SIZE};

/// Append one 80-byte card built from its text form
pub fn push_card(buf: &mut Vec<u8>, text: &str) {
    let mut card = [b' '; CARD_SIZE];
    let bytes = text.as_bytes();
    assert!(bytes.len() <= CARD_SIZE, "card text too long: {}", text);
    card[..bytes.len()].copy_from_slice(bytes);
    buf.extend_from_slice(&card);
}

/// Pad the buffer to the next 2880-byte boundary with the given byte
pub fn pad_block(buf: &mut Vec<u8>, fill: u8) {
    let rem = buf.len() % BLOCK_SIZE;
    if rem != 0 {
        buf.extend(std::iter::repeat(fill).take(BLOCK_SIZE - rem));
    }
}

/// A complete primary HDU holding an 8-bit image
///
/// Samples are laid out row-major with value `y * cols + x`, so tests
/// can predict any pixel.
pub fn gradient_primary(rows: usize, cols: usize, extra_cards: &[&str]) -> Vec<u8> {
    let mut buf = Vec::new();

    push_card(&mut buf, "SIMPLE  =                    T");
    push_card(&mut buf, "BITPIX  =                    8");
    push_card(&mut buf, "NAXIS   =                    2");
    push_card(&mut buf, &format!("NAXIS1  = {:>20}", cols));
    push_card(&mut buf, &format!("NAXIS2  = {:>20}", rows));
    for card in extra_cards {
        push_card(&mut buf, card);
    }
    push_card(&mut buf, "END");
    pad_block(&mut buf, b' ');

    for y in 0..rows {
        for x in 0..cols {
            buf.push((y * cols + x) as u8);
        }
    }
    pad_block(&mut buf, 0);

    buf
}
