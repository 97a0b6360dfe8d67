use crate::domain::error::CodecError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of digits in a payload, before the check digit is appended.
pub const PAYLOAD_LEN: usize = 12;

/// Number of digits in a complete EAN13 code.
pub const CODE_LEN: usize = 13;

/// A decimal digit in `0..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Digit(u8);

impl Digit {
    pub const ZERO: Digit = Digit(0);

    pub fn new(value: u8) -> Result<Self, CodecError> {
        if value > 9 {
            return Err(CodecError::invalid_digit(format!(
                "{} is outside 0..=9",
                value
            )));
        }
        Ok(Self(value))
    }

    /// Callers guarantee `value < 10`.
    pub(crate) const fn new_unchecked(value: u8) -> Self {
        Self(value)
    }

    pub fn from_char(c: char) -> Result<Self, CodecError> {
        c.to_digit(10)
            .map(|v| Self(v as u8))
            .ok_or_else(|| CodecError::invalid_digit(format!("'{}' is not a decimal digit", c)))
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub fn to_char(self) -> char {
        char::from(b'0' + self.0)
    }
}

impl TryFrom<u8> for Digit {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Digit> for u8 {
    fn from(digit: Digit) -> Self {
        digit.0
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub(crate) fn parse_digits(text: &str) -> Result<Vec<Digit>, CodecError> {
    text.chars().map(Digit::from_char).collect()
}

pub(crate) fn digits_from_values(values: &[u8]) -> Result<Vec<Digit>, CodecError> {
    values.iter().map(|&v| Digit::new(v)).collect()
}

fn exact<const N: usize>(digits: Vec<Digit>, what: &str) -> Result<[Digit; N], CodecError> {
    let len = digits.len();
    digits.try_into().map_err(|_| {
        CodecError::invalid_digit(format!("{} needs exactly {} digits, got {}", what, N, len))
    })
}

fn write_digits(f: &mut fmt::Formatter<'_>, digits: &[Digit]) -> fmt::Result {
    for digit in digits {
        write!(f, "{}", digit)?;
    }
    Ok(())
}

/// The twelve identifying digits of a code. The leading digit selects the
/// left-group parity pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Payload([Digit; PAYLOAD_LEN]);

impl Payload {
    pub fn new(digits: [Digit; PAYLOAD_LEN]) -> Self {
        Self(digits)
    }

    pub fn from_values(values: &[u8]) -> Result<Self, CodecError> {
        let digits = digits_from_values(values)?;
        Ok(Self(exact(digits, "payload")?))
    }

    pub fn digits(&self) -> &[Digit; PAYLOAD_LEN] {
        &self.0
    }

    pub fn first(&self) -> Digit {
        self.0[0]
    }
}

impl FromStr for Payload {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = parse_digits(s.trim())?;
        Ok(Self(exact(digits, "payload")?))
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_digits(f, &self.0)
    }
}

/// A complete, checksum-valid EAN13 code.
///
/// Only built by [`crate::core::codec::encode`] or a validated parse
/// (`FromStr`, [`Ean13::from_values`]), so the last digit always matches the
/// checksum of the first twelve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ean13([Digit; CODE_LEN]);

impl Ean13 {
    pub(crate) fn from_verified(digits: [Digit; CODE_LEN]) -> Self {
        Self(digits)
    }

    pub(crate) fn exact_digits(digits: Vec<Digit>) -> Result<[Digit; CODE_LEN], CodecError> {
        exact(digits, "code")
    }

    pub fn digits(&self) -> &[Digit; CODE_LEN] {
        &self.0
    }

    pub fn payload(&self) -> Payload {
        let mut digits = [Digit::ZERO; PAYLOAD_LEN];
        digits.copy_from_slice(&self.0[..PAYLOAD_LEN]);
        Payload(digits)
    }

    pub fn first_digit(&self) -> Digit {
        self.0[0]
    }

    pub fn check_digit(&self) -> Digit {
        self.0[PAYLOAD_LEN]
    }
}

impl fmt::Display for Ean13 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_digits(f, &self.0)
    }
}

impl From<Ean13> for String {
    fn from(code: Ean13) -> Self {
        code.to_string()
    }
}

/// A required leading run of payload digits, shorter than a full payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Prefix(Vec<Digit>);

impl Prefix {
    pub fn new(digits: Vec<Digit>) -> Result<Self, CodecError> {
        if digits.len() >= PAYLOAD_LEN {
            return Err(CodecError::invalid_digit(format!(
                "prefix must be shorter than {} digits, got {}",
                PAYLOAD_LEN,
                digits.len()
            )));
        }
        Ok(Self(digits))
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn digits(&self) -> &[Digit] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of payload positions left free by this prefix.
    pub fn free_positions(&self) -> usize {
        PAYLOAD_LEN - self.0.len()
    }
}

impl FromStr for Prefix {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(parse_digits(s.trim())?)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_digits(f, &self.0)
    }
}

/// One module of a printed symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    Space,
    Bar,
}

impl Module {
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Module::Bar
        } else {
            Module::Space
        }
    }

    pub fn is_bar(self) -> bool {
        self == Module::Bar
    }

    pub fn to_char(self) -> char {
        match self {
            Module::Bar => '1',
            Module::Space => '0',
        }
    }
}

/// A maximal stretch of identical modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Run {
    pub module: Module,
    pub start: usize,
    pub width: usize,
}

/// Ordered bar/space sequence of a symbol.
///
/// Patterns produced by the codec are always 95 modules long. Patterns read
/// from outside can have any length; the decoder rejects the wrong ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModulePattern(Vec<Module>);

impl ModulePattern {
    pub fn new(modules: Vec<Module>) -> Self {
        Self(modules)
    }

    pub fn modules(&self) -> &[Module] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Run-length view of the pattern, left to right.
    pub fn runs(&self) -> Vec<Run> {
        let mut runs: Vec<Run> = Vec::new();
        for (index, &module) in self.0.iter().enumerate() {
            match runs.last_mut() {
                Some(run) if run.module == module => run.width += 1,
                _ => runs.push(Run {
                    module,
                    start: index,
                    width: 1,
                }),
            }
        }
        runs
    }

    pub fn to_bit_string(&self) -> String {
        self.0.iter().map(|m| m.to_char()).collect()
    }
}

impl FromStr for ModulePattern {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .chars()
            .enumerate()
            .map(|(index, c)| match c {
                '1' => Ok(Module::Bar),
                '0' => Ok(Module::Space),
                other => Err(CodecError::malformed(format!(
                    "unexpected character '{}' at module {}",
                    other, index
                ))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl fmt::Display for ModulePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bit_string())
    }
}

/// Output format of a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    Ascii,
    Svg,
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderFormat::Ascii => f.write_str("ascii"),
            RenderFormat::Svg => f.write_str("svg"),
        }
    }
}

/// Renderer settings. Sizes and margins belong here, never to the codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Width of one module in SVG user units.
    pub module_width: u32,
    /// Height of the digit bars in SVG user units.
    pub bar_height: u32,
    /// Bar rows in ASCII output. ASCII always draws one character per module.
    pub ascii_rows: u32,
    pub quiet_zone: bool,
    pub show_text: bool,
    pub bar_glyph: char,
    pub space_glyph: char,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            module_width: 2,
            bar_height: 60,
            ascii_rows: 4,
            quiet_zone: true,
            show_text: true,
            bar_glyph: '█',
            space_glyph: ' ',
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedCode {
    pub code: Ean13,
    pub payload: String,
    pub check_digit: u8,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

impl GeneratedCode {
    pub fn new(code: Ean13, generated_at: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            code,
            payload: code.payload().to_string(),
            check_digit: code.check_digit().value(),
            generated_at,
        }
    }
}

/// A named file produced by a batch run.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub job: String,
    pub prefix: String,
    pub requested: usize,
    pub generated: usize,
    pub existing_codes: usize,
    pub formats: Vec<RenderFormat>,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub finished_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct BatchResult {
    pub codes: Vec<GeneratedCode>,
    pub artifacts: Vec<Artifact>,
    pub manifest_csv: String,
    pub summary: BatchSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_range() {
        assert_eq!(Digit::new(9).unwrap().value(), 9);
        assert!(Digit::new(10).is_err());
        assert!(Digit::from_char('x').is_err());
        assert_eq!(Digit::from_char('7').unwrap().to_char(), '7');
    }

    #[test]
    fn test_payload_length_is_enforced() {
        assert!("12345678901".parse::<Payload>().is_err());
        assert!("1234567890123".parse::<Payload>().is_err());
        let payload: Payload = "400638133393".parse().unwrap();
        assert_eq!(payload.first().value(), 4);
        assert_eq!(payload.to_string(), "400638133393");
    }

    #[test]
    fn test_payload_rejects_out_of_range_values() {
        let err = Payload::from_values(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 0]).unwrap_err();
        assert!(matches!(err, CodecError::InvalidDigit { .. }));
    }

    #[test]
    fn test_prefix_must_leave_free_positions() {
        assert!("12345678901".parse::<Prefix>().is_ok());
        assert!("123456789012".parse::<Prefix>().is_err());
        assert_eq!("400".parse::<Prefix>().unwrap().free_positions(), 9);
        assert!(Prefix::empty().is_empty());
    }

    #[test]
    fn test_pattern_runs() {
        let pattern: ModulePattern = "1010011".parse().unwrap();
        let widths: Vec<usize> = pattern.runs().iter().map(|r| r.width).collect();
        assert_eq!(widths, vec![1, 1, 1, 2, 2]);
        assert_eq!(pattern.runs()[3].start, 3);
        assert_eq!(pattern.to_string(), "1010011");
    }

    #[test]
    fn test_pattern_rejects_foreign_characters() {
        let err = "10201".parse::<ModulePattern>().unwrap_err();
        assert!(matches!(err, CodecError::MalformedPattern { .. }));
    }
}
