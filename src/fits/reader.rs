//! FITS file reader implementation
//!
//! Reads a FITS container sequentially: header blocks until the END
//! card, then the data array sized from BITPIX/NAXISn, then padding to
//! the next 2880-byte boundary, repeated per HDU until end of file.
//! Table extensions are walked over but their data is not decoded.

use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::fits::constants::{keywords, BLOCK_SIZE, CARDS_PER_BLOCK, CARD_SIZE};
use crate::fits::errors::{FitsError, FitsResult};
use crate::fits::hdu::{Bitpix, FitsFile, Hdu, PixelData};
use crate::fits::header::{parse_card, Card, Header};

/// Reader for FITS files
pub struct FitsReader {
    /// Current file path, for diagnostics
    current_file: Option<String>,
}

impl FitsReader {
    /// Creates a new FITS reader
    pub fn new() -> Self {
        FitsReader { current_file: None }
    }

    /// Loads a FITS file from the given path
    ///
    /// This is the main entry point for opening a container. The file
    /// handle is released when this call returns; the returned
    /// structure owns independent copies of all headers and data.
    ///
    /// # Arguments
    /// * `filepath` - Path to the FITS file to load
    ///
    /// # Returns
    /// A FitsFile holding every HDU in file order
    pub fn load(&mut self, filepath: &Path) -> FitsResult<FitsFile> {
        info!("Loading FITS file: {}", filepath.display());
        self.current_file = Some(filepath.display().to_string());

        let file = File::open(filepath)?;
        let mut reader = BufReader::with_capacity(1024 * 1024, file);

        self.read(&mut reader)
    }

    /// Reads a FITS container from the given reader
    ///
    /// # Arguments
    /// * `reader` - Any byte source positioned at the start of the container
    ///
    /// # Returns
    /// A FitsFile holding every HDU in file order
    pub fn read(&mut self, reader: &mut dyn Read) -> FitsResult<FitsFile> {
        let mut hdus = Vec::new();

        loop {
            let header = match self.read_header(reader, hdus.is_empty())? {
                Some(h) => h,
                None => break, // clean end of file
            };

            let hdu = self.read_data(reader, header, hdus.len())?;
            debug!(
                "Read HDU #{}: {} cards, dimensionality {}",
                hdus.len(),
                hdu.header.len(),
                hdu.dimensionality()
            );
            hdus.push(hdu);
        }

        if hdus.is_empty() {
            return Err(FitsError::InvalidHeader("file holds no HDUs".to_string()));
        }

        info!("Read {} HDUs from FITS file", hdus.len());
        Ok(FitsFile { hdus })
    }

    /// Reads header blocks until the END card
    ///
    /// Returns None on a clean end of file before the first block of a
    /// follow-on HDU.
    fn read_header(&self, reader: &mut dyn Read, primary: bool) -> FitsResult<Option<Header>> {
        let mut cards: Vec<Card> = Vec::new();
        let mut first_block = true;

        loop {
            let block = match read_block(reader)? {
                Some(b) => b,
                None => {
                    if first_block && !primary {
                        return Ok(None);
                    }
                    return Err(FitsError::InvalidHeader(
                        "unexpected end of file inside header".to_string(),
                    ));
                }
            };

            for card_idx in 0..CARDS_PER_BLOCK {
                let start = card_idx * CARD_SIZE;
                let card_bytes: &[u8; CARD_SIZE] =
                    block[start..start + CARD_SIZE].try_into().map_err(|_| {
                        FitsError::InvalidHeader("short card in header block".to_string())
                    })?;

                match parse_card(card_bytes)? {
                    Some(card) => cards.push(card),
                    None => {
                        // END card: remaining cards in the block are padding
                        let header = Header::from_cards(cards);
                        self.check_leading_keyword(&header, primary)?;
                        return Ok(Some(header));
                    }
                }
            }

            first_block = false;
        }
    }

    /// Verify the mandatory leading keyword of an HDU
    fn check_leading_keyword(&self, header: &Header, primary: bool) -> FitsResult<()> {
        if primary {
            if header.get_logical(keywords::SIMPLE) != Some(true) {
                return Err(FitsError::InvalidHeader(
                    "primary HDU lacks SIMPLE = T".to_string(),
                ));
            }
        } else if !header.contains(keywords::XTENSION) {
            return Err(FitsError::InvalidHeader(
                "extension HDU lacks XTENSION".to_string(),
            ));
        }
        Ok(())
    }

    /// Reads (or walks over) the data array following a header
    fn read_data(&self, reader: &mut dyn Read, header: Header, index: usize) -> FitsResult<Hdu> {
        let bitpix_code = header
            .get_integer(keywords::BITPIX)
            .ok_or(FitsError::MissingKeyword(keywords::BITPIX))?;
        let naxis = header
            .get_integer(keywords::NAXIS)
            .ok_or(FitsError::MissingKeyword(keywords::NAXIS))?;

        if naxis < 0 || naxis > 999 {
            return Err(FitsError::InvalidHeader(format!(
                "NAXIS = {} out of range",
                naxis
            )));
        }

        let mut axes = Vec::with_capacity(naxis as usize);
        for n in 1..=naxis {
            let key = format!("NAXIS{}", n);
            let size = header.get_integer(&key).ok_or(FitsError::InvalidHeader(
                format!("missing {} for NAXIS = {}", key, naxis),
            ))?;
            if size < 0 {
                return Err(FitsError::InvalidHeader(format!("{} = {} negative", key, size)));
            }
            axes.push(size as usize);
        }

        // Hostile headers can declare axis sizes whose product overflows
        let element_count = axes
            .iter()
            .try_fold(1usize, |acc, &size| acc.checked_mul(size))
            .ok_or_else(|| {
                FitsError::InvalidHeader(format!("axis sizes {:?} overflow data size", axes))
            })?;
        if naxis == 0 || element_count == 0 {
            return Ok(Hdu { header, data: None });
        }

        let bitpix = Bitpix::from_code(bitpix_code)?;
        let pcount = header.get_integer(keywords::PCOUNT).unwrap_or(0).max(0) as usize;
        let gcount = header.get_integer(keywords::GCOUNT).unwrap_or(1).max(1) as usize;
        let data_len = pcount
            .checked_add(element_count)
            .and_then(|n| n.checked_mul(gcount))
            .and_then(|n| n.checked_mul(bitpix.byte_width()))
            .ok_or_else(|| {
                FitsError::InvalidHeader(format!(
                    "declared data size overflows for {} axes",
                    axes.len()
                ))
            })?;

        // Table extensions are not image data; walk over their bytes
        let is_image = index == 0
            || header
                .get_text(keywords::XTENSION)
                .map(|x| x.trim().eq_ignore_ascii_case("IMAGE"))
                .unwrap_or(false);

        if !is_image {
            debug!("Skipping {} data bytes of non-image HDU #{}", data_len, index);
            skip_data(reader, data_len)?;
            return Ok(Hdu { header, data: None });
        }

        let mut data = vec![0u8; data_len];
        reader.read_exact(&mut data).map_err(|e| {
            warn!("Truncated data array in HDU #{}: {}", index, e);
            FitsError::InvalidHeader(format!("truncated data array in HDU #{}", index))
        })?;
        skip_padding(reader, data_len)?;

        // Shape is stored slowest axis first; NAXIS1 is the fastest
        let shape: Vec<usize> = axes.iter().rev().copied().collect();
        let pixels = PixelData::new(bitpix, shape, data)?;

        Ok(Hdu {
            header,
            data: Some(pixels),
        })
    }
}

impl Default for FitsReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Read one full 2880-byte block
///
/// Returns None on a clean end of file (no bytes at all); a partial
/// block is an error.
fn read_block(reader: &mut dyn Read) -> FitsResult<Option<[u8; BLOCK_SIZE]>> {
    let mut block = [0u8; BLOCK_SIZE];
    let mut filled = 0;

    while filled < BLOCK_SIZE {
        let n = reader.read(&mut block[filled..])?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(FitsError::InvalidHeader(format!(
                "truncated block: {} of {} bytes",
                filled, BLOCK_SIZE
            )));
        }
        filled += n;
    }

    Ok(Some(block))
}

/// Consume a data array without retaining it
fn skip_data(reader: &mut dyn Read, data_len: usize) -> FitsResult<()> {
    let mut remaining = data_len;
    let mut scratch = [0u8; 8192];
    while remaining > 0 {
        let take = remaining.min(scratch.len());
        reader.read_exact(&mut scratch[..take])?;
        remaining -= take;
    }
    skip_padding(reader, data_len)
}

/// Consume the zero padding that aligns a data array to a block boundary
fn skip_padding(reader: &mut dyn Read, data_len: usize) -> FitsResult<()> {
    let rem = data_len % BLOCK_SIZE;
    if rem == 0 {
        return Ok(());
    }
    let mut pad = vec![0u8; BLOCK_SIZE - rem];
    // Padding may be absent at end of file; tolerate a short read
    let mut filled = 0;
    while filled < pad.len() {
        let n = reader.read(&mut pad[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(())
}
