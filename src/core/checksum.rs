use crate::domain::error::CodecError;
use crate::domain::model::{Digit, Payload, CODE_LEN, PAYLOAD_LEN};

/// Check digit for a payload.
///
/// Digits are weighted from the right: the last payload digit counts three
/// times, the one before it once, and so on alternately.
pub fn compute(payload: &Payload) -> Digit {
    Digit::new_unchecked(check_digit_of(payload.digits()))
}

/// Whether the 13th digit matches the checksum of the first twelve.
///
/// Fails only when the input is not 13 digits in `0..=9`.
pub fn verify(digits: &[u8]) -> Result<bool, CodecError> {
    if digits.len() != CODE_LEN {
        return Err(CodecError::invalid_digit(format!(
            "code needs exactly {} digits, got {}",
            CODE_LEN,
            digits.len()
        )));
    }
    let payload = Payload::from_values(&digits[..PAYLOAD_LEN])?;
    let found = Digit::new(digits[PAYLOAD_LEN])?;
    Ok(compute(&payload) == found)
}

/// Like [`verify`] but reports the mismatching digits.
pub(crate) fn check(digits: &[Digit; CODE_LEN]) -> Result<(), CodecError> {
    let expected = check_digit_of(&digits[..PAYLOAD_LEN]);
    let found = digits[PAYLOAD_LEN].value();
    if expected != found {
        return Err(CodecError::ChecksumMismatch { expected, found });
    }
    Ok(())
}

fn check_digit_of(payload: &[Digit]) -> u8 {
    let sum: u32 = payload
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| {
            let weight = if i % 2 == 0 { 3 } else { 1 };
            d.value() as u32 * weight
        })
        .sum();
    ((10 - sum % 10) % 10) as u8
}
