//! # VM Translator
//!
//! Rewrites the stack-based VM intermediate language into Hack assembly.
//! All `.vm` units of one compilation set translate into a single output
//! buffer sharing one code writer, so comparison and return labels stay
//! unique across files and `static` slots stay bound to their unit's stem.

pub mod command;
pub mod writer;

use crate::error::CompileError;
use writer::CodeWriter;

/// One `.vm` compilation unit: the file stem (used for `static` symbol
/// naming) and its source text.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub name: String,
    pub source: String,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Translates a compilation set into one assembly program.
///
/// The bootstrap prologue sets `SP=256`; when a unit is named `Sys` it also
/// calls `Sys.init 0`. Units are translated in the order given (the driver
/// sorts directory entries by filename).
pub fn translate(units: &[SourceUnit]) -> Result<String, CompileError> {
    let with_init = units.iter().any(|unit| unit.name == "Sys");
    let mut writer = CodeWriter::new();
    writer.write_bootstrap(with_init);

    for unit in units {
        writer.set_file_name(&unit.name);
        for (idx, line) in unit.source.lines().enumerate() {
            if let Some(cmd) = command::parse_line(line, idx + 1)? {
                writer.write(&cmd, idx + 1)?;
            }
        }
    }
    Ok(writer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_stack_arithmetic() {
        let units = [SourceUnit::new(
            "SimpleAdd",
            "push constant 7\npush constant 8\nadd\n",
        )];
        let out = translate(&units).unwrap();
        assert!(out.contains("@7\nD=A\n@SP\nA=M\nM=D\n@SP\nM=M+1\n"));
        assert!(out.contains("@8\n"));
        assert!(out.contains("AM=M-1\nD=M\nA=A-1\nM=D+M\n"));
    }

    #[test]
    fn bootstrap_requires_sys_unit() {
        let plain = [SourceUnit::new("Main", "push constant 1\n")];
        let out = translate(&plain).unwrap();
        assert!(out.starts_with("@256\nD=A\n@SP\nM=D\n"));
        assert!(!out.contains("Sys.init"));

        let with_sys = [
            SourceUnit::new("Main", "push constant 1\n"),
            SourceUnit::new("Sys", "function Sys.init 0\n"),
        ];
        let out = translate(&with_sys).unwrap();
        assert!(out.contains("@RETURN_Sys.init_0\n"));
        assert!(out.contains("@Sys.init\n0;JMP\n"));
    }

    #[test]
    fn static_slots_follow_the_unit_stem() {
        let units = [
            SourceUnit::new("Foo", "pop static 0\n"),
            SourceUnit::new("Bar", "pop static 0\n"),
        ];
        let out = translate(&units).unwrap();
        assert!(out.contains("@Foo.0\n"));
        assert!(out.contains("@Bar.0\n"));
    }

    #[test]
    fn parse_errors_carry_the_line_number() {
        let units = [SourceUnit::new("Bad", "push constant 1\npush nowhere 0\n")];
        let err = translate(&units).unwrap_err();
        match err {
            CompileError::Syntax { position, .. } => assert_eq!(position, 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
