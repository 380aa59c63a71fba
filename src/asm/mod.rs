//! # Hack Assembler
//!
//! Translates Hack assembly into 16-bit binary machine code using the
//! classic two-pass design: pass 1 binds labels to instruction addresses,
//! pass 2 resolves symbols (allocating RAM slots for variables on first use)
//! and emits one binary word per instruction.
//!
//! Forward references to labels make the first pass intrinsic; the input
//! fits in memory, so no backpatching is attempted.

pub mod code;
pub mod parser;
pub mod symbols;

use crate::error::CompileError;
use parser::AsmCommandKind;
use symbols::SymbolTable;

/// Assembles a complete `.asm` source into `.hack` text: one 16-bit binary
/// number per line, ASCII `0`/`1`, newline-terminated.
pub fn assemble(source: &str) -> Result<String, CompileError> {
    let mut table = SymbolTable::new();
    first_pass(source, &mut table)?;
    second_pass(source, &mut table)
}

/// Pass 1: scan for labels.
///
/// Each A- or C-instruction advances the ROM counter; each `(NAME)` binds
/// `NAME` to the address of the instruction that follows it. Labels emit no
/// code themselves.
fn first_pass(source: &str, table: &mut SymbolTable) -> Result<(), CompileError> {
    for (idx, raw) in source.lines().enumerate() {
        let Some(line) = parser::clean(raw) else {
            continue;
        };
        match parser::classify(&line) {
            AsmCommandKind::Label => {
                let name = parser::label_name(&line, idx + 1)?;
                table.define_label(name);
            }
            AsmCommandKind::Address | AsmCommandKind::Compute => table.step_rom(),
        }
    }
    Ok(())
}

/// Pass 2: emit machine code.
///
/// A-instructions holding a decimal literal encode directly; symbolic ones
/// are resolved through the table, allocating a fresh variable slot when the
/// symbol is unknown. C-instructions encode their three fields through the
/// mnemonic tables. L-commands are skipped.
fn second_pass(source: &str, table: &mut SymbolTable) -> Result<String, CompileError> {
    let mut out = String::new();
    for (idx, raw) in source.lines().enumerate() {
        let Some(line) = parser::clean(raw) else {
            continue;
        };
        match parser::classify(&line) {
            AsmCommandKind::Address => {
                let symbol = parser::address_symbol(&line);
                if symbol.is_empty() {
                    return Err(CompileError::syntax(idx + 1, format!("empty symbol in '{line}'")));
                }
                let value = match symbol.parse::<u16>() {
                    Ok(literal) => code::encode_a(literal),
                    Err(_) if symbol.chars().next().is_some_and(|c| c.is_ascii_digit()) => {
                        return Err(CompileError::syntax(
                            idx + 1,
                            format!("invalid address literal in '{line}'"),
                        ));
                    }
                    Err(_) => table.resolve(symbol),
                };
                out.push_str(&format!("{value:016b}\n"));
            }
            AsmCommandKind::Compute => {
                let (dest, comp, jump) = parser::split_compute(&line);
                let word = code::encode_c(dest, comp, jump, &line)?;
                out.push_str(&format!("{word:016b}\n"));
            }
            AsmCommandKind::Label => {}
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_literal_and_compute_instructions() {
        let source = "@2\nD=A\n@3\nD=D+A\n@0\nM=D\n";
        let out = assemble(source).unwrap();
        let words: Vec<&str> = out.lines().collect();
        assert_eq!(words.len(), 6);
        assert_eq!(words[0], "0000000000000010");
        assert_eq!(words[1], "1110110000010000");
        assert_eq!(words[3], "1110000010010000");
    }

    #[test]
    fn resolves_forward_label_references() {
        let source = "@R1\nD=M\n@2\nD=D-A\n@END\nD;JGT\n(END)\n0;JMP\n";
        let out = assemble(source).unwrap();
        let words: Vec<&str> = out.lines().collect();
        assert_eq!(words.len(), 7);
        assert_eq!(words[0], "0000000000000001");
        // @END resolves to instruction 6, the halt jump after the label
        assert_eq!(words[4], "0000000000000110");
        assert_eq!(words[6], "1110101010000111");
    }

    #[test]
    fn allocates_variables_in_first_use_order() {
        let source = "@first\nM=1\n@second\nM=1\n@first\nM=0\n";
        let out = assemble(source).unwrap();
        let words: Vec<&str> = out.lines().collect();
        assert_eq!(words[0], "0000000000010000"); // 16
        assert_eq!(words[2], "0000000000010001"); // 17
        assert_eq!(words[4], "0000000000010000"); // still 16
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let source = "// header\n\n  @1  // inline\n  D = A\n";
        let out = assemble(source).unwrap();
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn unknown_mnemonic_aborts() {
        assert!(assemble("D=D+2\n").is_err());
        assert!(assemble("Q=0\n").is_err());
    }

    #[test]
    fn malformed_label_aborts() {
        assert!(assemble("(OPEN\n").is_err());
    }
}
