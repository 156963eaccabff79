use crate::error::ConvertError;

/// Splits a comma-separated value into its fields.
///
/// Double quotes group text containing commas and are never copied into the output. Each field
/// is trimmed. An unterminated quote simply runs to the end of the value.
#[must_use]
pub fn split_values(value: &str) -> Vec<String> {
    let mut fields = Vec::<String>::new();
    let mut current = String::with_capacity(value.len());
    let mut within_quotes = false;

    for c in value.chars() {
        match c {
            '"' => within_quotes = !within_quotes,
            ',' if !within_quotes => {
                fields.push(current.trim().to_owned());
                current.clear();
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() {
        fields.push(current.trim().to_owned());
    }

    fields
}

/// Parses an integer literal, detecting the base from a `0x`, `0o` or `0b` prefix.
///
/// Literals without a prefix are decimal. A leading `-` is accepted.
pub fn parse_int(literal: &str) -> Result<i64, ConvertError> {
    let invalid = || ConvertError::InvalidInteger(literal.to_owned());

    let trimmed = literal.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let (radix, digits) = match digits.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => (16, &digits[2..]),
        Some("0o") => (8, &digits[2..]),
        Some("0b") => (2, &digits[2..]),
        _ => (10, digits),
    };

    let digits = digits.replace('_', "");
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(invalid());
    }

    let magnitude = i64::from_str_radix(&digits, radix).map_err(|_| invalid())?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Parses a literal in the given base. Base 16 values may be written with or without a single
/// `0x` prefix; any other base defers to [`parse_int`].
pub fn parse_in_base(literal: &str, base: u32) -> Result<i64, ConvertError> {
    if base != 16 {
        return parse_int(literal);
    }

    let trimmed = literal.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if !digits.starts_with(|c: char| c.is_ascii_hexdigit()) {
        return Err(ConvertError::InvalidInteger(literal.to_owned()));
    }

    i64::from_str_radix(digits, 16).map_err(|_| ConvertError::InvalidInteger(literal.to_owned()))
}
