//! # Assembly Line Parser
//!
//! Line-level parsing for Hack assembly: comment and whitespace stripping,
//! command classification, and field extraction for the three instruction
//! forms (`@x`, `dest=comp;jump`, `(LABEL)`).

use crate::error::CompileError;

/// The three Hack assembly command forms.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AsmCommandKind {
    /// `@Xxx` where `Xxx` is a symbol or a decimal literal.
    Address,
    /// `dest=comp;jump` with `dest=` and `;jump` each optional.
    Compute,
    /// `(Xxx)` label pseudo-command; emits no code.
    Label,
}

/// Strips the `//` comment and every whitespace character from a raw source
/// line. Returns `None` if nothing remains.
pub fn clean(line: &str) -> Option<String> {
    let code = match line.find("//") {
        Some(pos) => &line[..pos],
        None => line,
    };
    let stripped: String = code.chars().filter(|c| !c.is_whitespace()).collect();
    if stripped.is_empty() { None } else { Some(stripped) }
}

/// Classifies a cleaned, non-empty line by its first byte.
pub fn classify(line: &str) -> AsmCommandKind {
    match line.as_bytes()[0] {
        b'@' => AsmCommandKind::Address,
        b'(' => AsmCommandKind::Label,
        _ => AsmCommandKind::Compute,
    }
}

/// Extracts the symbol or literal of an A-command (`@x` -> `x`).
pub fn address_symbol(line: &str) -> &str {
    &line[1..]
}

/// Extracts the name of an L-command (`(NAME)` -> `NAME`).
///
/// The closing parenthesis must be the final character of the line.
pub fn label_name(line: &str, line_no: usize) -> Result<&str, CompileError> {
    if line.len() < 3 || !line.ends_with(')') {
        return Err(CompileError::syntax(
            line_no,
            format!("malformed label '{line}'"),
        ));
    }
    Ok(&line[1..line.len() - 1])
}

/// Splits a C-command into its `(dest, comp, jump)` fields.
///
/// A missing `dest=` or `;jump` part yields the empty string, which the
/// encoding tables accept as the null field.
pub fn split_compute(line: &str) -> (&str, &str, &str) {
    let (dest, rest) = match line.find('=') {
        Some(pos) => (&line[..pos], &line[pos + 1..]),
        None => ("", line),
    };
    let (comp, jump) = match rest.find(';') {
        Some(pos) => (&rest[..pos], &rest[pos + 1..]),
        None => (rest, ""),
    };
    (dest, comp, jump)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_comments_and_whitespace() {
        assert_eq!(clean("@100 // load"), Some("@100".to_string()));
        assert_eq!(clean("  D = M  "), Some("D=M".to_string()));
        assert_eq!(clean("// only comment"), None);
        assert_eq!(clean("   "), None);
        assert_eq!(clean(""), None);
    }

    #[test]
    fn classify_by_first_byte() {
        assert_eq!(classify("@100"), AsmCommandKind::Address);
        assert_eq!(classify("(LOOP)"), AsmCommandKind::Label);
        assert_eq!(classify("D=M"), AsmCommandKind::Compute);
    }

    #[test]
    fn address_and_label_extraction() {
        assert_eq!(address_symbol("@sum"), "sum");
        assert_eq!(address_symbol("@100"), "100");
        assert_eq!(label_name("(LOOP)", 1).unwrap(), "LOOP");
        assert!(label_name("(LOOP", 1).is_err());
        assert!(label_name("()", 1).is_err());
    }

    #[test]
    fn compute_field_splitting() {
        assert_eq!(split_compute("MD=D+1;JMP"), ("MD", "D+1", "JMP"));
        assert_eq!(split_compute("D=M"), ("D", "M", ""));
        assert_eq!(split_compute("0;JMP"), ("", "0", "JMP"));
        assert_eq!(split_compute("D+1"), ("", "D+1", ""));
    }
}
