//! Caret diagnostics for grammar errors
//!
//! Renders a source excerpt pointing at the failing position:
//! `path:line:col` (1-based in display), up to 3 preceding source lines,
//! the offending line, and a caret line. Compilation errors carry
//! zero-based positions; conversion to display form happens here and
//! nowhere else.

use crate::abnf::error::CompileError;

/// Render a caret-pointed excerpt for a position in `text`.
pub fn render(path: &str, text: &str, line: usize, column: usize, message: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();

    let mut excerpt = format!("{}:{}:{}: {}\n", path, line + 1, column + 1, message);

    let first = line.saturating_sub(3);
    for shown in first..=line.min(lines.len().saturating_sub(1)) {
        excerpt.push_str("    ");
        excerpt.push_str(lines[shown]);
        excerpt.push('\n');
    }

    // Caret under the offending column
    excerpt.push_str("    ");
    excerpt.extend(std::iter::repeat(' ').take(column));
    excerpt.push('^');
    excerpt.push('\n');

    excerpt
}

/// Convenience wrapper rendering a compile error against the grammar
/// text it came from.
pub fn render_compile_error(path: &str, text: &str, error: &CompileError) -> String {
    let (line, column) = error.position();
    render(path, text, line, column, &error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_one_based() {
        let excerpt = render("g.abnf", "a = b\n", 0, 4, "rule 'b' is never defined");
        assert!(excerpt.starts_with("g.abnf:1:5: rule 'b' is never defined\n"));
    }

    #[test]
    fn caret_sits_under_the_column() {
        let excerpt = render("g.abnf", "a = b\n", 0, 4, "boom");
        let caret_line = excerpt.lines().last().unwrap();
        assert_eq!(caret_line, "        ^");
    }

    #[test]
    fn shows_at_most_three_preceding_lines() {
        let text = "l1\nl2\nl3\nl4\nl5 bad\n";
        let excerpt = render("g.abnf", text, 4, 3, "boom");
        assert!(excerpt.contains("l2"));
        assert!(excerpt.contains("l5 bad"));
        assert!(!excerpt.contains("l1"));
    }

    #[test]
    fn compile_error_positions_flow_through() {
        let text = "a = missing\n";
        let err = crate::abnf::grammar::Grammar::compile(text, "g.abnf", None).unwrap_err();
        let excerpt = render_compile_error("g.abnf", text, &err);
        assert!(excerpt.starts_with("g.abnf:1:5:"));
        assert!(excerpt.contains("missing"));
    }
}
