//! FITS header cards and the ordered header mapping
//!
//! A header is an ordered sequence of 80-byte cards. Keyword lookup is
//! case-insensitive; commentary cards (HISTORY, COMMENT, blank) carry
//! free text and are never returned by value lookups.

use crate::fits::constants::{keywords, CARD_SIZE, KEYWORD_SIZE};
use crate::fits::errors::{FitsError, FitsResult};
use crate::fits::value::{format_value, parse_value, Value};

/// One header card: a keyword with an optional value and comment
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Keyword name, trimmed, as stored in the file
    pub keyword: String,
    /// Parsed value, if the card has a `= ` value indicator
    pub value: Option<Value>,
    /// Inline comment, or the free text of a commentary card
    pub comment: Option<String>,
}

impl Card {
    /// Create a value card
    pub fn new(keyword: &str, value: Value) -> Self {
        Card {
            keyword: keyword.to_string(),
            value: Some(value),
            comment: None,
        }
    }

    /// Create a value card with an inline comment
    pub fn with_comment(keyword: &str, value: Value, comment: &str) -> Self {
        Card {
            keyword: keyword.to_string(),
            value: Some(value),
            comment: Some(comment.to_string()),
        }
    }

    /// Create a commentary card (HISTORY or COMMENT)
    pub fn commentary(keyword: &str, text: &str) -> Self {
        Card {
            keyword: keyword.to_string(),
            value: None,
            comment: Some(text.to_string()),
        }
    }

    /// Returns true for HISTORY, COMMENT and blank-keyword cards
    pub fn is_commentary(&self) -> bool {
        self.keyword.eq_ignore_ascii_case(keywords::HISTORY)
            || self.keyword.eq_ignore_ascii_case(keywords::COMMENT)
            || self.keyword.is_empty()
    }
}

/// Parse a single 80-byte card image
///
/// # Arguments
/// * `bytes` - Exactly one card's worth of raw header bytes
///
/// # Returns
/// The parsed card, or None for the END card (which terminates the
/// header and is not stored)
pub fn parse_card(bytes: &[u8; CARD_SIZE]) -> FitsResult<Option<Card>> {
    let keyword_field = &bytes[..KEYWORD_SIZE];
    for &b in keyword_field {
        match b {
            b'A'..=b'Z' | b'0'..=b'9' | b' ' | b'-' | b'_' => {}
            _ => {
                return Err(FitsError::InvalidKeyword(
                    String::from_utf8_lossy(keyword_field).into_owned(),
                ))
            }
        }
    }

    let keyword = std::str::from_utf8(keyword_field)
        .map_err(|_| FitsError::InvalidHeader("non-ASCII keyword".to_string()))?
        .trim_end()
        .to_string();

    if keyword == keywords::END {
        return Ok(None);
    }

    let rest = std::str::from_utf8(&bytes[KEYWORD_SIZE..])
        .map_err(|_| FitsError::InvalidHeader(format!("non-ASCII text in card {}", keyword)))?;

    let card = if rest.starts_with("= ") {
        match parse_value(&rest[2..]) {
            Some((value, comment)) => Card {
                keyword,
                value: Some(value),
                comment,
            },
            None => Card {
                keyword,
                value: None,
                comment: None,
            },
        }
    } else {
        // Commentary card or keyword without a value indicator
        let text = rest.trim_end();
        Card {
            keyword,
            value: None,
            comment: if text.is_empty() {
                None
            } else {
                Some(text.to_string())
            },
        }
    };

    Ok(Some(card))
}

/// Serialize a card into an 80-byte card image
pub fn format_card(card: &Card) -> [u8; CARD_SIZE] {
    let mut buf = [b' '; CARD_SIZE];

    let keyword = card.keyword.to_ascii_uppercase();
    let kw_bytes = keyword.as_bytes();
    let kw_len = kw_bytes.len().min(KEYWORD_SIZE);
    buf[..kw_len].copy_from_slice(&kw_bytes[..kw_len]);

    if let Some(ref value) = card.value {
        buf[8] = b'=';
        buf[9] = b' ';

        let mut field = format_value(value);
        if let Some(ref comment) = card.comment {
            field.push_str(" / ");
            field.push_str(comment);
        }
        let field_bytes = field.as_bytes();
        let len = field_bytes.len().min(CARD_SIZE - 10);
        buf[10..10 + len].copy_from_slice(&field_bytes[..len]);
    } else if let Some(ref text) = card.comment {
        let text_bytes = text.as_bytes();
        let len = text_bytes.len().min(CARD_SIZE - KEYWORD_SIZE);
        buf[KEYWORD_SIZE..KEYWORD_SIZE + len].copy_from_slice(&text_bytes[..len]);
    }

    buf
}

/// An ordered, case-insensitive FITS header
///
/// Cloning a Header is a deep copy: the clone owns its cards and can be
/// mutated without affecting the original.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    cards: Vec<Card>,
}

impl Header {
    /// Create an empty header
    pub fn new() -> Self {
        Header { cards: Vec::new() }
    }

    /// Create a header from an ordered card list
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Header { cards }
    }

    /// All cards in file order
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Number of cards (including commentary)
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns true if the header holds no cards
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Index of the first value card with the given keyword
    fn position(&self, keyword: &str) -> Option<usize> {
        self.cards
            .iter()
            .position(|c| !c.is_commentary() && c.keyword.eq_ignore_ascii_case(keyword))
    }

    /// Returns true if a value card with this keyword exists
    pub fn contains(&self, keyword: &str) -> bool {
        self.position(keyword).is_some()
    }

    /// Look up a keyword's value
    pub fn get(&self, keyword: &str) -> Option<&Value> {
        self.position(keyword)
            .and_then(|i| self.cards[i].value.as_ref())
    }

    /// Look up a keyword as an integer
    pub fn get_integer(&self, keyword: &str) -> Option<i64> {
        self.get(keyword).and_then(Value::as_integer)
    }

    /// Look up a keyword as a float (integers coerce)
    pub fn get_real(&self, keyword: &str) -> Option<f64> {
        self.get(keyword).and_then(Value::as_real)
    }

    /// Look up a keyword as a string
    pub fn get_text(&self, keyword: &str) -> Option<&str> {
        self.get(keyword).and_then(Value::as_text)
    }

    /// Look up a keyword as a logical
    pub fn get_logical(&self, keyword: &str) -> Option<bool> {
        self.get(keyword).and_then(Value::as_logical)
    }

    /// Set a keyword's value, updating in place or appending
    ///
    /// An existing card keeps its position and comment; a new keyword
    /// is appended at the end of the header.
    pub fn set(&mut self, keyword: &str, value: Value) {
        match self.position(keyword) {
            Some(i) => self.cards[i].value = Some(value),
            None => self.cards.push(Card::new(keyword, value)),
        }
    }

    /// Set a keyword's value and inline comment
    pub fn set_with_comment(&mut self, keyword: &str, value: Value, comment: &str) {
        match self.position(keyword) {
            Some(i) => {
                self.cards[i].value = Some(value);
                self.cards[i].comment = Some(comment.to_string());
            }
            None => self.cards.push(Card::with_comment(keyword, value, comment)),
        }
    }

    /// Remove the first value card with this keyword
    ///
    /// # Returns
    /// true if a card was removed
    pub fn remove(&mut self, keyword: &str) -> bool {
        match self.position(keyword) {
            Some(i) => {
                self.cards.remove(i);
                true
            }
            None => false,
        }
    }

    /// Append a HISTORY entry at the end of the header
    pub fn add_history(&mut self, text: &str) {
        self.cards.push(Card::commentary(keywords::HISTORY, text));
    }

    /// All HISTORY entries, in file order
    pub fn history(&self) -> Vec<&str> {
        self.cards
            .iter()
            .filter(|c| c.keyword.eq_ignore_ascii_case(keywords::HISTORY))
            .filter_map(|c| c.comment.as_deref())
            .collect()
    }
}
