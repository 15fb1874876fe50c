//! FITS file writer implementation
//!
//! Writes a single primary HDU: a conformed header (structural keywords
//! regenerated from the pixel data), the END card, space padding to the
//! block boundary, then the data array with zero padding.

use log::{info, warn};
use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use crate::fits::constants::{keywords, BLOCK_SIZE, CARD_SIZE};
use crate::fits::errors::{FitsError, FitsResult};
use crate::fits::hdu::PixelData;
use crate::fits::header::{format_card, Card, Header};
use crate::fits::value::Value;

/// How strictly the output header must already conform to the data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Structural keywords that disagree with the data are an error
    Strict,
    /// Disagreements are repaired and logged as warnings
    Fix,
    /// Disagreements are repaired without a word
    SilentFix,
}

/// Writer for FITS files
pub struct FitsWriter;

impl FitsWriter {
    /// Write a primary HDU to disk
    ///
    /// # Arguments
    /// * `path` - Destination file path
    /// * `pixels` - The data array to store
    /// * `header` - Header to write; structural keywords are conformed
    ///   to the data per `mode`
    /// * `overwrite` - Whether an existing file may be replaced
    /// * `mode` - Validation strictness for header/data disagreements
    pub fn write(
        path: &Path,
        pixels: &PixelData,
        header: &Header,
        overwrite: bool,
        mode: ValidationMode,
    ) -> FitsResult<()> {
        if !overwrite && path.exists() {
            return Err(FitsError::IoError(std::io::Error::new(
                ErrorKind::AlreadyExists,
                format!("{} already exists", path.display()),
            )));
        }

        let conformed = Self::conform_header(header, pixels, mode)?;

        let file = File::create(path)?;
        let mut writer = BufWriter::with_capacity(1024 * 1024, file);

        Self::write_header(&mut writer, &conformed)?;
        Self::write_data(&mut writer, pixels)?;

        writer.flush()?;
        info!("Wrote FITS file: {}", path.display());
        Ok(())
    }

    /// Regenerate structural keywords from the pixel data
    ///
    /// The output card order is SIMPLE, BITPIX, NAXIS, NAXISn, then
    /// every remaining input card in its original order. Extension
    /// bookkeeping keywords (XTENSION, PCOUNT, GCOUNT) are dropped
    /// since the output is always a primary HDU.
    fn conform_header(
        header: &Header,
        pixels: &PixelData,
        mode: ValidationMode,
    ) -> FitsResult<Header> {
        let discrepancies = Self::find_discrepancies(header, pixels);
        if !discrepancies.is_empty() {
            match mode {
                ValidationMode::Strict => {
                    return Err(FitsError::InvalidHeader(discrepancies.join("; ")));
                }
                ValidationMode::Fix => {
                    for d in &discrepancies {
                        warn!("Fixing header: {}", d);
                    }
                }
                ValidationMode::SilentFix => {}
            }
        }

        let mut cards = Vec::with_capacity(header.len() + 4);
        cards.push(Card::with_comment(
            keywords::SIMPLE,
            Value::Logical(true),
            "conforms to FITS standard",
        ));
        cards.push(Card::new(keywords::BITPIX, Value::Integer(pixels.bitpix.code())));
        cards.push(Card::new(keywords::NAXIS, Value::Integer(pixels.ndim() as i64)));
        for (n, size) in pixels.shape.iter().rev().enumerate() {
            cards.push(Card::new(
                &format!("NAXIS{}", n + 1),
                Value::Integer(*size as i64),
            ));
        }

        for card in header.cards() {
            if card.is_commentary() {
                cards.push(card.clone());
                continue;
            }
            if is_structural_keyword(&card.keyword)
                || card.keyword.eq_ignore_ascii_case(keywords::XTENSION)
                || card.keyword.eq_ignore_ascii_case(keywords::PCOUNT)
                || card.keyword.eq_ignore_ascii_case(keywords::GCOUNT)
            {
                continue;
            }
            cards.push(card.clone());
        }

        Ok(Header::from_cards(cards))
    }

    /// Structural keywords in the input that disagree with the data
    fn find_discrepancies(header: &Header, pixels: &PixelData) -> Vec<String> {
        let mut found = Vec::new();

        if header.contains(keywords::SIMPLE) && header.get_logical(keywords::SIMPLE) != Some(true) {
            found.push("SIMPLE is not T".to_string());
        }
        if let Some(bitpix) = header.get_integer(keywords::BITPIX) {
            if bitpix != pixels.bitpix.code() {
                found.push(format!(
                    "BITPIX {} does not match data ({})",
                    bitpix,
                    pixels.bitpix.code()
                ));
            }
        }
        if let Some(naxis) = header.get_integer(keywords::NAXIS) {
            if naxis != pixels.ndim() as i64 {
                found.push(format!(
                    "NAXIS {} does not match data dimensionality {}",
                    naxis,
                    pixels.ndim()
                ));
            }
        }
        for (n, size) in pixels.shape.iter().rev().enumerate() {
            let key = format!("NAXIS{}", n + 1);
            if let Some(declared) = header.get_integer(&key) {
                if declared != *size as i64 {
                    found.push(format!(
                        "{} = {} does not match data axis size {}",
                        key, declared, size
                    ));
                }
            }
        }

        found
    }

    /// Serialize cards, the END card and space padding
    fn write_header(writer: &mut impl Write, header: &Header) -> FitsResult<()> {
        let mut written = 0usize;

        for card in header.cards() {
            writer.write_all(&format_card(card))?;
            written += CARD_SIZE;
        }

        let mut end_card = [b' '; CARD_SIZE];
        end_card[..3].copy_from_slice(b"END");
        writer.write_all(&end_card)?;
        written += CARD_SIZE;

        let rem = written % BLOCK_SIZE;
        if rem != 0 {
            writer.write_all(&vec![b' '; BLOCK_SIZE - rem])?;
        }
        Ok(())
    }

    /// Write the data array and zero padding
    fn write_data(writer: &mut impl Write, pixels: &PixelData) -> FitsResult<()> {
        writer.write_all(&pixels.data)?;

        let rem = pixels.data.len() % BLOCK_SIZE;
        if rem != 0 {
            writer.write_all(&vec![0u8; BLOCK_SIZE - rem])?;
        }
        Ok(())
    }
}

/// Returns true for SIMPLE, BITPIX, NAXIS and any NAXISn keyword
fn is_structural_keyword(keyword: &str) -> bool {
    let upper = keyword.to_ascii_uppercase();
    if upper == keywords::SIMPLE || upper == keywords::BITPIX || upper == keywords::NAXIS {
        return true;
    }
    match upper.strip_prefix(keywords::NAXIS) {
        Some(rest) => !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}
