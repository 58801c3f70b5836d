//! Testing utilities: verified sample grammars and token factories
//!
//!     Hand-typed ABNF in individual tests tends to drift slightly off
//!     the notation, and a matcher tuned against wrong grammars is worse
//!     than no matcher. Tests should therefore reuse the vetted sample
//!     grammars below instead of improvising their own, and build tokens
//!     through the factories so position bookkeeping stays in one place.

use crate::abnf::lexing::Fragment;
use crate::abnf::source::Token;

/// A small grammar exercising every construct the resolver knows:
/// groups, optionals, bounded and unbounded repetition, and a 4-way
/// top-level alternation.
pub const COMPLEX_GRAMMAR: &str = "\
complex = rule1 rule2 / *rule2 / [rule4-1 rule4-2 / rule4-3] (rule5 / rule6) / 2*5([rule7] (rule8 / rule9) rule10)
rule1 = \"a\"
rule2 = \"b\"
rule4-1 = \"c\"
rule4-2 = \"d\"
rule4-3 = \"e\"
rule5 = \"f\"
rule6 = \"g\"
rule7 = \"h\"
rule8 = \"i\"
rule9 = \"j\"
rule10 = \"k\"
";

/// Continuation-style rendition of `rule = a / b / c`.
pub const CONTINUED_GRAMMAR: &str = "\
rule = a / b
rule =/ c
a = \"x\"
b = \"y\"
c = \"z\"
";

/// The same alternatives written inline.
pub const INLINE_GRAMMAR: &str = "\
rule = a / b / c
a = \"x\"
b = \"y\"
c = \"z\"
";

/// Token factory for resolver-level tests; positions are synthetic.
pub fn mk_token(kind: Fragment, text: &str) -> Token {
    Token {
        kind,
        text: text.to_string(),
        line: 0,
        column: 0,
    }
}

pub fn numeric_token(text: &str) -> Token {
    mk_token(Fragment::Numeric, text)
}

pub fn repeat_token(text: &str) -> Token {
    mk_token(Fragment::Repeat, text)
}
