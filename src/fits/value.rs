//! FITS header value parsing and formatting
//!
//! A card's value field (bytes 10..80 of the card) holds one scalar in
//! FITS fixed format: a logical `T`/`F`, a right-justified number, or a
//! single-quoted string with `''` escaping. An inline comment may follow
//! after a `/` separator.

/// A scalar value carried by a header card
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Logical value (`T` or `F`)
    Logical(bool),
    /// Integer value
    Integer(i64),
    /// Floating-point value
    Real(f64),
    /// Character string value
    Text(String),
}

impl Value {
    /// Interpret this value as an integer, if it is one
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Interpret this value as a float, coercing integers
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(x) => Some(*x),
            Value::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Interpret this value as a string, if it is one
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret this value as a logical, if it is one
    pub fn as_logical(&self) -> Option<bool> {
        match self {
            Value::Logical(b) => Some(*b),
            _ => None,
        }
    }
}

/// Parse a card's value field into a value and an optional inline comment
///
/// # Arguments
/// * `field` - The raw value field text (everything after the `= ` indicator)
///
/// # Returns
/// The parsed value and trailing comment, or None if the field is empty
/// or not parseable as any FITS value type
pub fn parse_value(field: &str) -> Option<(Value, Option<String>)> {
    let trimmed = field.trim_start();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with('\'') {
        return parse_quoted_string(trimmed);
    }

    // Split off an inline comment at the first '/'
    let (value_part, comment) = match trimmed.find('/') {
        Some(idx) => {
            let comment = trimmed[idx + 1..].trim();
            let comment = if comment.is_empty() {
                None
            } else {
                Some(comment.to_string())
            };
            (trimmed[..idx].trim(), comment)
        }
        None => (trimmed.trim_end(), None),
    };

    if value_part.is_empty() {
        return None;
    }

    let value = match value_part {
        "T" => Value::Logical(true),
        "F" => Value::Logical(false),
        _ => {
            if let Ok(n) = value_part.parse::<i64>() {
                Value::Integer(n)
            } else {
                // FITS allows Fortran-style 'D' exponents for doubles
                let normalized = value_part.replace(['D', 'd'], "E");
                match normalized.parse::<f64>() {
                    Ok(x) => Value::Real(x),
                    Err(_) => return None,
                }
            }
        }
    };

    Some((value, comment))
}

/// Parse a single-quoted string value with `''` escaping
fn parse_quoted_string(field: &str) -> Option<(Value, Option<String>)> {
    let bytes = field.as_bytes();
    let mut content = String::new();
    let mut i = 1;

    loop {
        if i >= bytes.len() {
            // Unterminated string
            return None;
        }
        if bytes[i] == b'\'' {
            if i + 1 < bytes.len() && bytes[i + 1] == b'\'' {
                content.push('\'');
                i += 2;
            } else {
                i += 1;
                break;
            }
        } else {
            content.push(bytes[i] as char);
            i += 1;
        }
    }

    // Trailing spaces inside the quotes are not significant
    let text = content.trim_end().to_string();

    let rest = field[i..].trim_start();
    let comment = rest
        .strip_prefix('/')
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    Some((Value::Text(text), comment))
}

/// Serialize a value into its fixed-format field text
///
/// Logicals and numbers are right-justified to column 30 of the card
/// (20 characters into the value field); strings are left-justified
/// and quoted.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Logical(b) => format!("{:>20}", if *b { "T" } else { "F" }),
        Value::Integer(n) => format!("{:>20}", n),
        Value::Real(x) => {
            let mut text = format!("{}", x);
            // A real must stay distinguishable from an integer on re-read
            if !text.contains('.') && !text.contains('e') && !text.contains('E') {
                text.push_str(".0");
            }
            let text = text.replace('e', "E");
            format!("{:>20}", text)
        }
        Value::Text(s) => {
            let escaped = s.replace('\'', "''");
            // Minimum string field width of 8 per the standard
            format!("'{:<8}'", escaped)
        }
    }
}
