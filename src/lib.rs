//! # Hack Toolchain Crate
//!
//! The software toolchain for the Hack platform: an assembler turning Hack
//! assembly into 16-bit binary instructions, a VM translator rewriting the
//! stack-based intermediate language into Hack assembly, and a Jack compiler
//! translating the Jack object language into that same stack VM.
//!
//! All three pipelines share one shape: source text in, target text out.

// --- Core Modules ---
/// The Hack assembler (two-pass, `.asm` to `.hack`).
pub mod asm;
/// Utilities for debugging and introspection of the pipelines.
pub mod debug;
/// Filesystem orchestration for all three tools.
pub mod driver;
/// The shared error type and its constructor helpers.
pub mod error;
/// The Jack compiler (`.jack` to `.vm`).
pub mod jack;
/// The VM translator (`.vm` to `.asm`).
pub mod vm;

// --- Public Re-exports (The Toolchain API) ---
pub use driver::Toolchain;
pub use error::CompileError;

// --- Convenience Functions ---

/// Assembles Hack assembly source into `.hack` binary text.
pub fn assemble(source: &str) -> Result<String, CompileError> {
    asm::assemble(source)
}

/// Translates a single VM compilation unit into Hack assembly.
///
/// `name` is the unit's file stem, used for `static` symbol naming. The
/// `Sys.init` bootstrap call is emitted only when the unit is named `Sys`;
/// multi-unit sets go through [`vm::translate`].
pub fn translate(name: &str, source: &str) -> Result<String, CompileError> {
    let unit = vm::SourceUnit::new(name, source);
    vm::translate(std::slice::from_ref(&unit))
}

/// Compiles one Jack class source into VM text.
pub fn compile(source: &str) -> Result<String, CompileError> {
    jack::compile(source)
}
