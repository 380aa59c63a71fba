//! # Toolchain Error Definitions
//!
//! This module centralizes the error types shared by all three pipelines
//! (assembler, VM translator, Jack compiler).
//!
//! It leverages the `thiserror` crate to simplify error reporting and provide
//! clear, descriptive messages to the user.

use thiserror::Error;

/// The primary error enumeration for the Hack toolchain.
///
/// Every error is fatal for the file that produced it; no recovery is
/// attempted past the first fault. The `position` field is the token index
/// for Jack diagnostics and the 1-based line number for the line-oriented
/// tools (assembler, VM translator).
#[derive(Error, Debug)]
pub enum CompileError {
    /// Wrapper for standard I/O errors (e.g., file reading/writing).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when an input directory contains no eligible source files.
    #[error("no {extension} source files found in input directory")]
    NoSourceFiles { extension: &'static str },

    /// Bad character, unterminated string constant, or unterminated block
    /// comment caught during scanning.
    #[error("lexical error at {position}: {message}")]
    Lex { position: usize, message: String },

    /// Token mismatch or missing construct caught during parsing.
    #[error("syntax error at {position}: {message}")]
    Syntax { position: usize, message: String },

    /// Unknown variable, unknown mnemonic, or invalid kind/segment use.
    #[error("semantic error: {message}")]
    Semantic { message: String },
}

impl CompileError {
    /// Constructs a `Lex` error for the scanner phase.
    pub fn lexer(position: usize, message: impl Into<String>) -> Self {
        Self::Lex {
            position,
            message: message.into(),
        }
    }

    /// Constructs a `Syntax` error with explicit positional information.
    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Constructs a general `Semantic` error.
    pub fn semantic(message: impl Into<String>) -> Self {
        Self::Semantic {
            message: message.into(),
        }
    }

    /// Constructs a `Semantic` error for an unknown variable at its use site.
    pub fn undefined_variable(name: impl AsRef<str>) -> Self {
        Self::Semantic {
            message: format!("undefined variable '{}'", name.as_ref()),
        }
    }

    /// Constructs a `Semantic` error for an unrecognized assembly mnemonic.
    pub fn unknown_mnemonic(field: &str, mnemonic: impl AsRef<str>, line: impl AsRef<str>) -> Self {
        Self::Semantic {
            message: format!(
                "unknown {field} mnemonic '{}' in '{}'",
                mnemonic.as_ref(),
                line.as_ref()
            ),
        }
    }
}
