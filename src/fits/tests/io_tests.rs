//! Reader and writer tests over in-memory and on-disk containers

use std::io::Cursor;

use tempfile::TempDir;

use crate::fits::constants::BLOCK_SIZE;
use crate::fits::errors::FitsError;
use crate::fits::hdu::{Bitpix, PixelData};
use crate::fits::header::{Card, Header};
use crate::fits::reader::FitsReader;
use crate::fits::tests::test_utils::{gradient_primary, pad_block, push_card};
use crate::fits::value::Value;
use crate::fits::writer::{FitsWriter, ValidationMode};

#[test]
fn test_read_primary_image() {
    let bytes = gradient_primary(3, 4, &["FILTER  = 'R       '"]);
    let mut reader = FitsReader::new();
    let file = reader.read(&mut Cursor::new(bytes)).unwrap();

    assert_eq!(file.hdu_count(), 1);
    let hdu = &file.hdus[0];
    assert_eq!(hdu.header.get_text("FILTER"), Some("R"));

    let pixels = hdu.data.as_ref().unwrap();
    assert_eq!(pixels.shape, vec![3, 4]);
    assert_eq!(pixels.bitpix, Bitpix::U8);
    assert_eq!(pixels.sample(0, 0).unwrap(), 0.0);
    assert_eq!(pixels.sample(3, 2).unwrap(), 11.0);
}

#[test]
fn test_read_dataless_primary() {
    let mut bytes = Vec::new();
    push_card(&mut bytes, "SIMPLE  =                    T");
    push_card(&mut bytes, "BITPIX  =                    8");
    push_card(&mut bytes, "NAXIS   =                    0");
    push_card(&mut bytes, "END");
    pad_block(&mut bytes, b' ');

    let mut reader = FitsReader::new();
    let file = reader.read(&mut Cursor::new(bytes)).unwrap();
    assert!(file.hdus[0].data.is_none());
}

#[test]
fn test_read_rejects_non_fits() {
    let mut bytes = Vec::new();
    push_card(&mut bytes, "SIMPLE  =                    F");
    push_card(&mut bytes, "END");
    pad_block(&mut bytes, b' ');

    let mut reader = FitsReader::new();
    let result = reader.read(&mut Cursor::new(bytes));
    assert!(matches!(result, Err(FitsError::InvalidHeader(_))));
}

#[test]
fn test_read_rejects_empty_stream() {
    let mut reader = FitsReader::new();
    assert!(reader.read(&mut Cursor::new(Vec::new())).is_err());
}

#[test]
fn test_read_rejects_truncated_data() {
    let mut bytes = gradient_primary(3, 4, &[]);
    // Chop off the final data block
    bytes.truncate(bytes.len() - BLOCK_SIZE);

    let mut reader = FitsReader::new();
    assert!(reader.read(&mut Cursor::new(bytes)).is_err());
}

#[test]
fn test_read_rejects_overflowing_axis_sizes() {
    let mut bytes = Vec::new();
    push_card(&mut bytes, "SIMPLE  =                    T");
    push_card(&mut bytes, "BITPIX  =                    8");
    push_card(&mut bytes, "NAXIS   =                    2");
    push_card(&mut bytes, "NAXIS1  =  9223372036854775807");
    push_card(&mut bytes, "NAXIS2  =  9223372036854775807");
    push_card(&mut bytes, "END");
    pad_block(&mut bytes, b' ');

    let mut reader = FitsReader::new();
    let result = reader.read(&mut Cursor::new(bytes));
    assert!(matches!(result, Err(FitsError::InvalidHeader(_))));
}

#[test]
fn test_table_extension_data_skipped() {
    let mut bytes = gradient_primary(2, 2, &[]);

    push_card(&mut bytes, "XTENSION= 'BINTABLE'");
    push_card(&mut bytes, "BITPIX  =                    8");
    push_card(&mut bytes, "NAXIS   =                    2");
    push_card(&mut bytes, "NAXIS1  =                    8");
    push_card(&mut bytes, "NAXIS2  =                    3");
    push_card(&mut bytes, "PCOUNT  =                    0");
    push_card(&mut bytes, "GCOUNT  =                    1");
    push_card(&mut bytes, "END");
    pad_block(&mut bytes, b' ');
    bytes.extend(std::iter::repeat(7u8).take(24));
    pad_block(&mut bytes, 0);

    let mut reader = FitsReader::new();
    let file = reader.read(&mut Cursor::new(bytes)).unwrap();

    assert_eq!(file.hdu_count(), 2);
    assert!(file.hdus[0].data.is_some());
    assert!(file.hdus[1].data.is_none());
    assert_eq!(file.hdus[1].header.get_text("XTENSION"), Some("BINTABLE"));
}

#[test]
fn test_image_extension_data_read() {
    let mut bytes = gradient_primary(2, 2, &[]);

    push_card(&mut bytes, "XTENSION= 'IMAGE   '");
    push_card(&mut bytes, "BITPIX  =                    8");
    push_card(&mut bytes, "NAXIS   =                    2");
    push_card(&mut bytes, "NAXIS1  =                    2");
    push_card(&mut bytes, "NAXIS2  =                    2");
    push_card(&mut bytes, "PCOUNT  =                    0");
    push_card(&mut bytes, "GCOUNT  =                    1");
    push_card(&mut bytes, "END");
    pad_block(&mut bytes, b' ');
    bytes.extend_from_slice(&[10, 20, 30, 40]);
    pad_block(&mut bytes, 0);

    let mut reader = FitsReader::new();
    let file = reader.read(&mut Cursor::new(bytes)).unwrap();

    let pixels = file.hdus[1].data.as_ref().unwrap();
    assert_eq!(pixels.sample(1, 1).unwrap(), 40.0);
}

#[test]
fn test_read_i16_samples_big_endian() {
    let mut bytes = Vec::new();
    push_card(&mut bytes, "SIMPLE  =                    T");
    push_card(&mut bytes, "BITPIX  =                   16");
    push_card(&mut bytes, "NAXIS   =                    2");
    push_card(&mut bytes, "NAXIS1  =                    2");
    push_card(&mut bytes, "NAXIS2  =                    1");
    push_card(&mut bytes, "END");
    pad_block(&mut bytes, b' ');
    // 0x0102 = 258, 0xFFFF = -1
    bytes.extend_from_slice(&[0x01, 0x02, 0xFF, 0xFF]);
    pad_block(&mut bytes, 0);

    let mut reader = FitsReader::new();
    let file = reader.read(&mut Cursor::new(bytes)).unwrap();
    let pixels = file.hdus[0].data.as_ref().unwrap();
    assert_eq!(pixels.sample(0, 0).unwrap(), 258.0);
    assert_eq!(pixels.sample(1, 0).unwrap(), -1.0);
}

#[test]
fn test_write_read_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.fits");

    let pixels = PixelData::new(Bitpix::U8, vec![2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap();
    let mut header = Header::new();
    header.set("OBJECT", Value::Text("M42".to_string()));
    header.add_history("written by test");

    FitsWriter::write(&path, &pixels, &header, false, ValidationMode::SilentFix).unwrap();

    // File is whole blocks: one header block plus one data block
    let len = std::fs::metadata(&path).unwrap().len() as usize;
    assert_eq!(len % BLOCK_SIZE, 0);
    assert_eq!(len, 2 * BLOCK_SIZE);

    let mut reader = FitsReader::new();
    let file = reader.load(&path).unwrap();
    let hdu = &file.hdus[0];

    assert_eq!(hdu.header.get_logical("SIMPLE"), Some(true));
    assert_eq!(hdu.header.get_integer("NAXIS1"), Some(3));
    assert_eq!(hdu.header.get_integer("NAXIS2"), Some(2));
    assert_eq!(hdu.header.get_text("OBJECT"), Some("M42"));
    assert_eq!(hdu.header.history(), vec!["written by test"]);
    assert_eq!(hdu.data.as_ref().unwrap().data, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_write_refuses_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.fits");
    std::fs::write(&path, b"occupied").unwrap();

    let pixels = PixelData::new(Bitpix::U8, vec![1, 1], vec![9]).unwrap();
    let result = FitsWriter::write(&path, &pixels, &Header::new(), false, ValidationMode::Strict);
    assert!(result.is_err());
    // Existing content untouched
    assert_eq!(std::fs::read(&path).unwrap(), b"occupied");
}

#[test]
fn test_strict_mode_rejects_stale_axis_keywords() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.fits");

    let pixels = PixelData::new(Bitpix::U8, vec![2, 2], vec![0; 4]).unwrap();
    let mut header = Header::new();
    header.set("NAXIS1", Value::Integer(100));

    let result = FitsWriter::write(&path, &pixels, &header, true, ValidationMode::Strict);
    assert!(matches!(result, Err(FitsError::InvalidHeader(_))));
}

#[test]
fn test_fix_mode_conforms_stale_axis_keywords() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.fits");

    let pixels = PixelData::new(Bitpix::U8, vec![2, 2], vec![0; 4]).unwrap();
    let mut header = Header::new();
    header.set("NAXIS", Value::Integer(3));
    header.set("NAXIS1", Value::Integer(100));
    header.set("FILTER", Value::Text("V".to_string()));

    FitsWriter::write(&path, &pixels, &header, true, ValidationMode::Fix).unwrap();

    let mut reader = FitsReader::new();
    let file = reader.load(&path).unwrap();
    let out = &file.hdus[0].header;
    assert_eq!(out.get_integer("NAXIS"), Some(2));
    assert_eq!(out.get_integer("NAXIS1"), Some(2));
    assert_eq!(out.get_text("FILTER"), Some("V"));
}

#[test]
fn test_extension_bookkeeping_dropped_on_write() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.fits");

    let pixels = PixelData::new(Bitpix::U8, vec![1, 1], vec![5]).unwrap();
    let header = Header::from_cards(vec![
        Card::new("XTENSION", Value::Text("IMAGE".to_string())),
        Card::new("PCOUNT", Value::Integer(0)),
        Card::new("GCOUNT", Value::Integer(1)),
        Card::new("FILTER", Value::Text("B".to_string())),
    ]);

    FitsWriter::write(&path, &pixels, &header, true, ValidationMode::SilentFix).unwrap();

    let mut reader = FitsReader::new();
    let file = reader.load(&path).unwrap();
    let out = &file.hdus[0].header;
    assert!(!out.contains("XTENSION"));
    assert!(!out.contains("PCOUNT"));
    assert_eq!(out.get_text("FILTER"), Some("B"));
}
