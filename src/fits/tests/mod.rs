//! Tests for the FITS format module

mod test_utils;
mod io_tests;
