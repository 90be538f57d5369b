use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while1},
    character::complete::{char, digit1, hex_digit1},
    combinator::{opt, recognize},
    sequence::{pair, preceded},
    IResult, Parser,
};

fn numeric_literal(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(preceded(tag_no_case("0x"), hex_digit1)),
        recognize(preceded(
            tag_no_case("0b"),
            take_while1(|c: char| c == '0' || c == '1'),
        )),
        recognize(pair(digit1, opt(pair(char('.'), digit1)))),
    ))
    .parse(input)
}

/// Returns the byte length of the numeric literal starting at `input`, or
/// `None` if `input` does not begin with one.
pub fn scan(input: &str) -> Option<usize> {
    numeric_literal(input).ok().map(|(_rest, matched)| matched.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_hex_and_decimal_and_float() {
        assert_eq!(scan("0x1A2B rest"), Some(6));
        assert_eq!(scan("0b1011,"), Some(6));
        assert_eq!(scan("42;"), Some(2));
        assert_eq!(scan("3.14)"), Some(4));
        assert_eq!(scan("abc"), None);
    }
}
