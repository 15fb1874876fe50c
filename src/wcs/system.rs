//! WCS construction, reference-pixel shifting and serialization
//!
//! The transform is read in one of the two common linear forms: a CD
//! matrix (CD1_1..CD2_2) or per-axis scales (CDELT1/2 with an optional
//! CROTA2 rotation). Whichever form was read is the form written back,
//! so a cropped header keeps the vocabulary of its source.

use crate::fits::constants::keywords;
use crate::fits::errors::{FitsError, FitsResult};
use crate::fits::header::{Card, Header};
use crate::fits::value::Value;

/// Returns true if the header carries a recognized reference-pixel pair
pub fn has_reference_pixel(header: &Header) -> bool {
    header.contains(keywords::CRPIX1) && header.contains(keywords::CRPIX2)
}

/// The linear part of the pixel-to-sky transform
#[derive(Debug, Clone, PartialEq)]
enum LinearTransform {
    /// Full CD matrix, row-major: [[CD1_1, CD1_2], [CD2_1, CD2_2]]
    Matrix([[f64; 2]; 2]),
    /// Per-axis scales with optional rotation
    Scale { cdelt: [f64; 2], crota2: Option<f64> },
}

/// A two-axis world coordinate system built from header keywords
///
/// CRPIX values keep the FITS convention: 1-based pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Wcs {
    crpix: [f64; 2],
    crval: [f64; 2],
    ctype: [Option<String>; 2],
    cunit: [Option<String>; 2],
    transform: LinearTransform,
}

impl Wcs {
    /// Build a coordinate system from a header
    ///
    /// # Returns
    /// The parsed system, or `InvalidWcs` when a defining keyword is
    /// present but non-numeric, or the linear transform is singular
    pub fn from_header(header: &Header) -> FitsResult<Wcs> {
        let crpix = [
            require_real(header, keywords::CRPIX1)?,
            require_real(header, keywords::CRPIX2)?,
        ];
        let crval = [
            optional_real(header, keywords::CRVAL1, 0.0)?,
            optional_real(header, keywords::CRVAL2, 0.0)?,
        ];
        let ctype = [
            header.get_text(keywords::CTYPE1).map(str::to_string),
            header.get_text(keywords::CTYPE2).map(str::to_string),
        ];
        let cunit = [
            header.get_text(keywords::CUNIT1).map(str::to_string),
            header.get_text(keywords::CUNIT2).map(str::to_string),
        ];

        let has_cd_matrix = [
            keywords::CD1_1,
            keywords::CD1_2,
            keywords::CD2_1,
            keywords::CD2_2,
        ]
        .iter()
        .any(|k| header.contains(k));

        let transform = if has_cd_matrix {
            let cd = [
                [
                    optional_real(header, keywords::CD1_1, 0.0)?,
                    optional_real(header, keywords::CD1_2, 0.0)?,
                ],
                [
                    optional_real(header, keywords::CD2_1, 0.0)?,
                    optional_real(header, keywords::CD2_2, 0.0)?,
                ],
            ];
            let det = cd[0][0] * cd[1][1] - cd[0][1] * cd[1][0];
            if det == 0.0 {
                return Err(FitsError::InvalidWcs("CD matrix is singular".to_string()));
            }
            LinearTransform::Matrix(cd)
        } else {
            let cdelt = [
                optional_real(header, keywords::CDELT1, 1.0)?,
                optional_real(header, keywords::CDELT2, 1.0)?,
            ];
            if cdelt[0] == 0.0 || cdelt[1] == 0.0 {
                return Err(FitsError::InvalidWcs("zero CDELT scale".to_string()));
            }
            let crota2 = if header.contains(keywords::CROTA2) {
                Some(require_real(header, keywords::CROTA2)?)
            } else {
                None
            };
            LinearTransform::Scale { cdelt, crota2 }
        };

        Ok(Wcs {
            crpix,
            crval,
            ctype,
            cunit,
            transform,
        })
    }

    /// Current reference pixel (1-based, FITS convention)
    pub fn reference_pixel(&self) -> (f64, f64) {
        (self.crpix[0], self.crpix[1])
    }

    /// Shift the reference pixel by a crop offset
    ///
    /// After cropping at offset `(dx, dy)` the sky coordinate that was
    /// anchored at the original reference pixel stays anchored at the
    /// same physical spot in the smaller image.
    pub fn shift_reference_pixel(&mut self, dx: f64, dy: f64) {
        self.crpix[0] -= dx;
        self.crpix[1] -= dy;
    }

    /// Serialize the system's defining keywords
    ///
    /// Only the representation that was read is emitted: a CD-matrix
    /// system writes CD keys, a scale system writes CDELT (and CROTA2
    /// when it had one).
    pub fn to_header_cards(&self) -> Vec<Card> {
        let mut cards = vec![
            Card::new(keywords::CRPIX1, Value::Real(self.crpix[0])),
            Card::new(keywords::CRPIX2, Value::Real(self.crpix[1])),
            Card::new(keywords::CRVAL1, Value::Real(self.crval[0])),
            Card::new(keywords::CRVAL2, Value::Real(self.crval[1])),
        ];

        for (axis, key) in [(0, keywords::CTYPE1), (1, keywords::CTYPE2)] {
            if let Some(ref ctype) = self.ctype[axis] {
                cards.push(Card::new(key, Value::Text(ctype.clone())));
            }
        }
        for (axis, key) in [(0, keywords::CUNIT1), (1, keywords::CUNIT2)] {
            if let Some(ref cunit) = self.cunit[axis] {
                cards.push(Card::new(key, Value::Text(cunit.clone())));
            }
        }

        match &self.transform {
            LinearTransform::Matrix(cd) => {
                cards.push(Card::new(keywords::CD1_1, Value::Real(cd[0][0])));
                cards.push(Card::new(keywords::CD1_2, Value::Real(cd[0][1])));
                cards.push(Card::new(keywords::CD2_1, Value::Real(cd[1][0])));
                cards.push(Card::new(keywords::CD2_2, Value::Real(cd[1][1])));
            }
            LinearTransform::Scale { cdelt, crota2 } => {
                cards.push(Card::new(keywords::CDELT1, Value::Real(cdelt[0])));
                cards.push(Card::new(keywords::CDELT2, Value::Real(cdelt[1])));
                if let Some(rho) = crota2 {
                    cards.push(Card::new(keywords::CROTA2, Value::Real(*rho)));
                }
            }
        }

        cards
    }

    /// The linear transform as a matrix, whichever form was read
    fn matrix(&self) -> [[f64; 2]; 2] {
        match &self.transform {
            LinearTransform::Matrix(cd) => *cd,
            LinearTransform::Scale { cdelt, crota2 } => {
                let rho = crota2.unwrap_or(0.0).to_radians();
                [
                    [cdelt[0] * rho.cos(), -cdelt[1] * rho.sin()],
                    [cdelt[0] * rho.sin(), cdelt[1] * rho.cos()],
                ]
            }
        }
    }

    /// Returns true when axis 1 declares a gnomonic projection
    fn is_tan_projection(&self) -> bool {
        self.ctype[0]
            .as_deref()
            .map(|t| t.trim_end().ends_with("-TAN"))
            .unwrap_or(false)
    }

    /// Map a 0-based pixel coordinate to world coordinates
    ///
    /// Applies the linear transform about the reference pixel, then a
    /// gnomonic de-projection when CTYPE declares `-TAN`; otherwise the
    /// mapping is purely linear about CRVAL.
    pub fn pixel_to_world(&self, x: f64, y: f64) -> (f64, f64) {
        // CRPIX is 1-based
        let u = (x + 1.0) - self.crpix[0];
        let v = (y + 1.0) - self.crpix[1];

        let cd = self.matrix();
        let xi = cd[0][0] * u + cd[0][1] * v;
        let eta = cd[1][0] * u + cd[1][1] * v;

        if self.is_tan_projection() {
            self.deproject_tan(xi, eta)
        } else {
            (self.crval[0] + xi, self.crval[1] + eta)
        }
    }

    /// Inverse gnomonic projection from tangent-plane offsets (degrees)
    fn deproject_tan(&self, xi_deg: f64, eta_deg: f64) -> (f64, f64) {
        let xi = xi_deg.to_radians();
        let eta = eta_deg.to_radians();
        let ra0 = self.crval[0].to_radians();
        let dec0 = self.crval[1].to_radians();

        let denom = dec0.cos() - eta * dec0.sin();
        let ra = ra0 + xi.atan2(denom);
        let dec = (dec0.sin() + eta * dec0.cos()).atan2((xi * xi + denom * denom).sqrt());

        (ra.to_degrees(), dec.to_degrees())
    }
}

/// A keyword that must be present and numeric
fn require_real(header: &Header, keyword: &'static str) -> FitsResult<f64> {
    match header.get(keyword) {
        Some(value) => value
            .as_real()
            .ok_or_else(|| FitsError::InvalidWcs(format!("{} is not numeric", keyword))),
        None => Err(FitsError::InvalidWcs(format!("{} is missing", keyword))),
    }
}

/// A keyword that may be absent, but must be numeric when present
fn optional_real(header: &Header, keyword: &'static str, default: f64) -> FitsResult<f64> {
    match header.get(keyword) {
        Some(value) => value
            .as_real()
            .ok_or_else(|| FitsError::InvalidWcs(format!("{} is not numeric", keyword))),
        None => Ok(default),
    }
}
