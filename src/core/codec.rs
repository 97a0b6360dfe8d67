use crate::core::checksum;
use crate::core::tables::{
    self, Parity, CENTER_GUARD, CENTER_GUARD_OFFSET, DIGIT_MODULES, END_GUARD, END_GUARD_OFFSET,
    GROUP_DIGITS, G_CODES, LEFT_GROUP_OFFSET, L_CODES, RIGHT_GROUP_OFFSET, R_CODES, START_GUARD,
    START_GUARD_OFFSET, TOTAL_MODULES,
};
use crate::domain::error::CodecError;
use crate::domain::model::{
    digits_from_values, parse_digits, Digit, Ean13, Module, ModulePattern, Payload, CODE_LEN,
    PAYLOAD_LEN,
};
use std::str::FromStr;

/// Appends the check digit to a payload.
pub fn encode(payload: &Payload) -> Ean13 {
    let mut digits = [Digit::ZERO; CODE_LEN];
    digits[..PAYLOAD_LEN].copy_from_slice(payload.digits());
    digits[PAYLOAD_LEN] = checksum::compute(payload);
    Ean13::from_verified(digits)
}

/// [`encode`] for raw digit values, rejecting anything but twelve digits in
/// `0..=9`.
pub fn encode_values(values: &[u8]) -> Result<Ean13, CodecError> {
    Ok(encode(&Payload::from_values(values)?))
}

pub fn encode_str(payload: &str) -> Result<Ean13, CodecError> {
    Ok(encode(&payload.parse()?))
}

/// Lays a code out as 95 modules: guards, six left digits in the L/G sets
/// picked by the leading digit, six right digits in the R set.
pub fn to_module_pattern(code: &Ean13) -> ModulePattern {
    let digits = code.digits();
    let first = code.first_digit().value();
    let mut modules = Vec::with_capacity(TOTAL_MODULES);

    push_guard(&mut modules, &START_GUARD);
    for (position, digit) in digits[1..=GROUP_DIGITS].iter().enumerate() {
        let parity = tables::parity_at(first, position);
        push_code(&mut modules, tables::left_code(digit.value(), parity));
    }
    push_guard(&mut modules, &CENTER_GUARD);
    for digit in &digits[GROUP_DIGITS + 1..] {
        push_code(&mut modules, tables::right_code(digit.value()));
    }
    push_guard(&mut modules, &END_GUARD);

    ModulePattern::new(modules)
}

fn push_guard(modules: &mut Vec<Module>, guard: &[bool]) {
    modules.extend(guard.iter().map(|&bit| Module::from_bit(bit)));
}

fn push_code(modules: &mut Vec<Module>, code: u8) {
    for shift in (0..DIGIT_MODULES).rev() {
        modules.push(Module::from_bit(code & (1 << shift) != 0));
    }
}

/// Inverse of [`to_module_pattern`].
///
/// Never guesses: a wrong length, a damaged guard, or a digit group that
/// matches no table entry (or more than one) is a `MalformedPattern`. Digits
/// that decode cleanly but fail the checksum are a `ChecksumMismatch`.
pub fn decode(pattern: &ModulePattern) -> Result<Ean13, CodecError> {
    let modules = pattern.modules();
    if modules.len() != TOTAL_MODULES {
        return Err(CodecError::malformed(format!(
            "expected {} modules, got {}",
            TOTAL_MODULES,
            modules.len()
        )));
    }

    expect_guard(modules, START_GUARD_OFFSET, &START_GUARD, "start")?;
    expect_guard(modules, CENTER_GUARD_OFFSET, &CENTER_GUARD, "center")?;
    expect_guard(modules, END_GUARD_OFFSET, &END_GUARD, "end")?;

    let mut digits = [Digit::ZERO; CODE_LEN];
    let mut parity_mask = 0u8;

    for position in 0..GROUP_DIGITS {
        let offset = LEFT_GROUP_OFFSET + position * DIGIT_MODULES;
        let group = read_group(modules, offset);
        let (digit, parity) = match (lookup(&L_CODES, group), lookup(&G_CODES, group)) {
            (Some(d), None) => (d, Parity::Odd),
            (None, Some(d)) => (d, Parity::Even),
            (Some(_), Some(_)) => {
                return Err(CodecError::malformed(format!(
                    "ambiguous left group {:07b} at module {}",
                    group, offset
                )))
            }
            (None, None) => {
                return Err(CodecError::malformed(format!(
                    "left group {:07b} at module {} matches no L or G code",
                    group, offset
                )))
            }
        };
        if parity == Parity::Even {
            parity_mask |= 1 << (GROUP_DIGITS - 1 - position);
        }
        digits[position + 1] = digit;
    }

    let first = tables::first_digit_for_parity(parity_mask).ok_or_else(|| {
        CodecError::malformed(format!(
            "left parity {:06b} matches no leading digit",
            parity_mask
        ))
    })?;
    digits[0] = Digit::new_unchecked(first);

    for position in 0..GROUP_DIGITS {
        let offset = RIGHT_GROUP_OFFSET + position * DIGIT_MODULES;
        let group = read_group(modules, offset);
        digits[GROUP_DIGITS + 1 + position] = lookup(&R_CODES, group).ok_or_else(|| {
            CodecError::malformed(format!(
                "right group {:07b} at module {} matches no R code",
                group, offset
            ))
        })?;
    }

    checksum::check(&digits)?;
    Ok(Ean13::from_verified(digits))
}

/// Decodes either a 13-digit code or a string of 95 `0`/`1` modules.
pub fn decode_text(input: &str) -> Result<Ean13, CodecError> {
    let input = input.trim();
    let is_binary = !input.is_empty() && input.chars().all(|c| c == '0' || c == '1');
    if is_binary && input.len() != CODE_LEN {
        decode(&input.parse()?)
    } else {
        input.parse()
    }
}

fn expect_guard(
    modules: &[Module],
    offset: usize,
    guard: &[bool],
    name: &str,
) -> Result<(), CodecError> {
    let found = &modules[offset..offset + guard.len()];
    let matches = found
        .iter()
        .zip(guard)
        .all(|(module, &bit)| module.is_bar() == bit);
    if !matches {
        return Err(CodecError::malformed(format!(
            "{} guard at module {} is damaged",
            name, offset
        )));
    }
    Ok(())
}

fn read_group(modules: &[Module], offset: usize) -> u8 {
    modules[offset..offset + DIGIT_MODULES]
        .iter()
        .fold(0u8, |acc, m| (acc << 1) | m.is_bar() as u8)
}

/// Digit whose code is `group`. Table entries are unique, so at most one
/// matches.
fn lookup(table: &[u8; 10], group: u8) -> Option<Digit> {
    table
        .iter()
        .position(|&code| code == group)
        .map(|d| Digit::new_unchecked(d as u8))
}

impl Ean13 {
    /// Validated construction from thirteen raw digit values.
    pub fn from_values(values: &[u8]) -> Result<Self, CodecError> {
        let digits = Ean13::exact_digits(digits_from_values(values)?)?;
        checksum::check(&digits)?;
        Ok(Ean13::from_verified(digits))
    }

    pub fn to_module_pattern(&self) -> ModulePattern {
        to_module_pattern(self)
    }
}

impl FromStr for Ean13 {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = Ean13::exact_digits(parse_digits(s.trim())?)?;
        checksum::check(&digits)?;
        Ok(Ean13::from_verified(digits))
    }
}

impl TryFrom<String> for Ean13 {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN: &str = "4006381333931";
    const KNOWN_PATTERN: &str = concat!(
        "101",
        "0001101", "0100111", "0101111", "0111101", "0001001", "0110011",
        "01010",
        "1000010", "1000010", "1000010", "1110100", "1000010", "1100110",
        "101"
    );

    #[test]
    fn test_encode_appends_check_digit() {
        let code = encode_str("400638133393").unwrap();
        assert_eq!(code.to_string(), KNOWN);
        assert_eq!(code.check_digit().value(), 1);
    }

    #[test]
    fn test_encode_rejects_bad_payloads() {
        assert!(matches!(
            encode_values(&[1, 2, 3]),
            Err(CodecError::InvalidDigit { .. })
        ));
        assert!(matches!(
            encode_values(&[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 12]),
            Err(CodecError::InvalidDigit { .. })
        ));
        assert!(matches!(
            encode_str("40063813339a"),
            Err(CodecError::InvalidDigit { .. })
        ));
    }

    #[test]
    fn test_pattern_of_known_code() {
        let code: Ean13 = KNOWN.parse().unwrap();
        let pattern = to_module_pattern(&code);
        assert_eq!(pattern.len(), TOTAL_MODULES);
        assert_eq!(pattern.to_bit_string(), KNOWN_PATTERN);
    }

    #[test]
    fn test_decode_known_pattern() {
        let pattern: ModulePattern = KNOWN_PATTERN.parse().unwrap();
        assert_eq!(decode(&pattern).unwrap().to_string(), KNOWN);
    }

    #[test]
    fn test_decode_rejects_truncated_pattern() {
        let pattern: ModulePattern = KNOWN_PATTERN[..94].parse().unwrap();
        assert!(matches!(
            decode(&pattern),
            Err(CodecError::MalformedPattern { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_damaged_guards() {
        for index in [0, 1, 2, 45, 47, 49, 92, 94] {
            let mut modules = to_module_pattern(&KNOWN.parse().unwrap()).modules().to_vec();
            modules[index] = if modules[index].is_bar() {
                Module::Space
            } else {
                Module::Bar
            };
            let err = decode(&ModulePattern::new(modules)).unwrap_err();
            assert!(
                matches!(err, CodecError::MalformedPattern { .. }),
                "index {}",
                index
            );
        }
    }

    #[test]
    fn test_decode_rejects_right_code_in_left_half() {
        let mut bits = KNOWN_PATTERN.to_string();
        bits.replace_range(3..10, "1110010");
        let err = decode(&bits.parse().unwrap()).unwrap_err();
        assert!(matches!(err, CodecError::MalformedPattern { .. }));
    }

    #[test]
    fn test_decode_rejects_parity_without_leading_digit() {
        // G0 as the first left digit: no leading digit starts with even parity
        let mut bits = KNOWN_PATTERN.to_string();
        bits.replace_range(3..10, "0100111");
        match decode(&bits.parse().unwrap()) {
            Err(CodecError::MalformedPattern { reason }) => {
                assert!(reason.contains("leading digit"), "{}", reason)
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_decode_reports_checksum_mismatch() {
        // last right digit 1 -> 2
        let mut bits = KNOWN_PATTERN.to_string();
        bits.replace_range(85..92, "1101100");
        let err = decode(&bits.parse().unwrap()).unwrap_err();
        assert_eq!(
            err,
            CodecError::ChecksumMismatch {
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn test_decode_text_accepts_digits_and_modules() {
        assert_eq!(decode_text(KNOWN).unwrap().to_string(), KNOWN);
        assert_eq!(decode_text(KNOWN_PATTERN).unwrap().to_string(), KNOWN);
        assert_eq!(
            decode_text("0000000000000").unwrap().to_string(),
            "0000000000000"
        );
        assert!(matches!(
            decode_text("0101"),
            Err(CodecError::MalformedPattern { .. })
        ));
        assert!(matches!(
            decode_text("12345"),
            Err(CodecError::InvalidDigit { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_wrong_check_digit() {
        assert!(matches!(
            "4006381333932".parse::<Ean13>(),
            Err(CodecError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_serde_uses_digit_string() {
        let code: Ean13 = KNOWN.parse().unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, format!("\"{}\"", KNOWN));
        let back: Ean13 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, code);
        assert!(serde_json::from_str::<Ean13>("\"4006381333932\"").is_err());
    }
}
