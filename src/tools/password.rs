//! Random password generation.

use rand::seq::{IndexedRandom, SliceRandom};

use crate::config::{PASSWORD_DEFAULT_LENGTH, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH};
use crate::error_handling::ApiError;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()-_=+[]{};:,.<>?";

/// Generates a password of `length` characters (default 16, 4..=128).
///
/// Letters are always used; digits and symbols are on unless disabled, and
/// each enabled class appears at least once.
pub fn generate_password(
    length: Option<usize>,
    numbers: bool,
    symbols: bool,
) -> Result<String, ApiError> {
    let length = length.unwrap_or(PASSWORD_DEFAULT_LENGTH);
    if !(PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&length) {
        return Err(ApiError::bad_request(format!(
            "Length must be between {} and {}",
            PASSWORD_MIN_LENGTH, PASSWORD_MAX_LENGTH
        )));
    }

    let mut classes: Vec<&[u8]> = vec![LETTERS];
    if numbers {
        classes.push(DIGITS);
    }
    if symbols {
        classes.push(SYMBOLS);
    }
    let pool: Vec<u8> = classes.concat();

    let mut rng = rand::rng();
    let mut chars: Vec<u8> = classes
        .iter()
        .filter_map(|class| class.choose(&mut rng).copied())
        .collect();
    while chars.len() < length {
        if let Some(c) = pool.choose(&mut rng) {
            chars.push(*c);
        }
    }
    chars.shuffle(&mut rng);

    Ok(chars.into_iter().map(char::from).collect())
}
