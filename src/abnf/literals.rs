//! Numeric literal expansion
//!
//! Converts `%b` / `%d` / `%x` numeric character codes into concrete
//! string literals at resolve time. A range (`%x41-43`) expands to the
//! concatenation of every codepoint in the inclusive interval ("ABC"),
//! matching the source behavior of treating a range as a concatenation
//! literal rather than a character class.

use crate::abnf::error::SyntaxError;
use crate::abnf::node::Node;
use crate::abnf::source::Token;

/// Inclusive character-code interval, used only during expansion.
struct CodeRange {
    min: u32,
    max: u32,
}

impl CodeRange {
    fn chars(&self, token: &Token) -> Result<String, SyntaxError> {
        (self.min..=self.max)
            .map(|code| decode(code, token))
            .collect()
    }
}

fn decode(code: u32, token: &Token) -> Result<char, SyntaxError> {
    char::from_u32(code).ok_or_else(|| {
        SyntaxError::at_token(format!("invalid character code {:#x}", code), token)
    })
}

fn radix_for(marker: char) -> Option<u32> {
    match marker.to_ascii_lowercase() {
        'b' => Some(2),
        'd' => Some(10),
        'x' => Some(16),
        _ => None,
    }
}

fn parse_code(group: &str, radix: u32, token: &Token) -> Result<u32, SyntaxError> {
    u32::from_str_radix(group, radix).map_err(|_| {
        SyntaxError::at_token(
            format!("invalid base-{} character code '{}'", radix, group),
            token,
        )
    })
}

/// Expand a numeric-literal token into a case-sensitive literal node.
pub fn expand(token: &Token) -> Result<Node, SyntaxError> {
    let body = token.text.strip_prefix('%').ok_or_else(|| {
        SyntaxError::at_token("malformed numeric literal", token).expected("%")
    })?;
    let mut chars = body.chars();
    let radix = chars
        .next()
        .and_then(radix_for)
        .ok_or_else(|| SyntaxError::at_token("unknown numeric literal base", token))?;
    let digits = chars.as_str();

    let text = if digits.contains('-') {
        // Range form: exactly two endpoints
        let mut parts = digits.split('-');
        let (min, max) = match (parts.next(), parts.next(), parts.next()) {
            (Some(min), Some(max), None) => (
                parse_code(min, radix, token)?,
                parse_code(max, radix, token)?,
            ),
            _ => {
                return Err(SyntaxError::at_token(
                    "a numeric range takes exactly two endpoints",
                    token,
                ))
            }
        };
        if min > max {
            return Err(SyntaxError::at_token(
                format!("empty numeric range {:#x}-{:#x}", min, max),
                token,
            ));
        }
        CodeRange { min, max }.chars(token)?
    } else {
        // Concatenation form: one or more '.'-separated groups
        digits
            .split('.')
            .map(|group| parse_code(group, radix, token).and_then(|c| decode(c, token)))
            .collect::<Result<String, _>>()?
    };

    Ok(Node::Literal {
        text,
        fold_case: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abnf::testing::numeric_token;

    fn expand_text(raw: &str) -> String {
        match expand(&numeric_token(raw)).unwrap() {
            Node::Literal { text, fold_case } => {
                assert!(!fold_case, "numeric literals are case-sensitive");
                text
            }
            other => panic!("expected literal node, got {:?}", other),
        }
    }

    #[test]
    fn hex_range_concatenates_the_interval() {
        assert_eq!(expand_text("%x41-43"), "ABC");
    }

    #[test]
    fn decimal_concatenation() {
        assert_eq!(expand_text("%d72.101.108.108.111"), "Hello");
    }

    #[test]
    fn binary_single_code() {
        assert_eq!(expand_text("%b1000001"), "A");
    }

    #[test]
    fn base_marker_is_case_insensitive() {
        assert_eq!(expand_text("%X41"), "A");
    }

    #[test]
    fn digits_outside_the_base_fail() {
        let err = expand(&numeric_token("%b1012")).unwrap_err();
        assert!(err.to_string().contains("base-2"));
        assert!(expand(&numeric_token("%dff")).is_err());
    }

    #[test]
    fn inverted_range_fails() {
        assert!(expand(&numeric_token("%x43-41")).is_err());
    }

    #[test]
    fn surrogate_codepoint_fails() {
        assert!(expand(&numeric_token("%xd800")).is_err());
    }
}
