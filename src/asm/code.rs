//! # Instruction Encoding Tables
//!
//! Mnemonic-to-field tables for the Hack C-instruction, held in `phf` maps so
//! the perfect hash is computed at compile time, plus the 16-bit encoders for
//! both instruction formats.

use crate::error::CompileError;
use phf::phf_map;

/// Destination mnemonic to the 3-bit `ddd` field. A missing dest encodes as
/// the empty string.
static DEST_MAP: phf::Map<&'static str, u16> = phf_map! {
    "" => 0b000,
    "M" => 0b001,
    "D" => 0b010,
    "MD" => 0b011,
    "A" => 0b100,
    "AM" => 0b101,
    "AD" => 0b110,
    "AMD" => 0b111,
};

/// Computation mnemonic to the 7-bit `a cccccc` field. The leading bit
/// selects the A register (0) or M (1) as the second operand.
static COMP_MAP: phf::Map<&'static str, u16> = phf_map! {
    // a=0
    "0" => 0b0101010,
    "1" => 0b0111111,
    "-1" => 0b0111010,
    "D" => 0b0001100,
    "A" => 0b0110000,
    "!D" => 0b0001101,
    "!A" => 0b0110001,
    "-D" => 0b0001111,
    "-A" => 0b0110011,
    "D+1" => 0b0011111,
    "A+1" => 0b0110111,
    "D-1" => 0b0001110,
    "A-1" => 0b0110010,
    "D+A" => 0b0000010,
    "D-A" => 0b0010011,
    "A-D" => 0b0000111,
    "D&A" => 0b0000000,
    "D|A" => 0b0010101,

    // a=1
    "M" => 0b1110000,
    "!M" => 0b1110001,
    "-M" => 0b1110011,
    "M+1" => 0b1110111,
    "M-1" => 0b1110010,
    "D+M" => 0b1000010,
    "D-M" => 0b1010011,
    "M-D" => 0b1000111,
    "D&M" => 0b1000000,
    "D|M" => 0b1010101,
};

/// Jump mnemonic to the 3-bit `jjj` field. A missing jump encodes as the
/// empty string.
static JUMP_MAP: phf::Map<&'static str, u16> = phf_map! {
    "" => 0b000,
    "JGT" => 0b001,
    "JEQ" => 0b010,
    "JGE" => 0b011,
    "JLT" => 0b100,
    "JNE" => 0b101,
    "JLE" => 0b110,
    "JMP" => 0b111,
};

/// Encodes a complete C-instruction as `111 a cccccc ddd jjj`.
///
/// An unrecognized mnemonic in any field is fatal; the offending line is
/// carried in the error for diagnostics.
pub fn encode_c(dest: &str, comp: &str, jump: &str, line: &str) -> Result<u16, CompileError> {
    let d = DEST_MAP
        .get(dest)
        .ok_or_else(|| CompileError::unknown_mnemonic("dest", dest, line))?;
    let c = COMP_MAP
        .get(comp)
        .ok_or_else(|| CompileError::unknown_mnemonic("comp", comp, line))?;
    let j = JUMP_MAP
        .get(jump)
        .ok_or_else(|| CompileError::unknown_mnemonic("jump", jump, line))?;
    Ok(0b111 << 13 | c << 6 | d << 3 | j)
}

/// Encodes an A-instruction as `0 vvvvvvvvvvvvvvv`.
///
/// The value is masked to 15 bits; the high bit is always 0.
pub fn encode_a(value: u16) -> u16 {
    value & 0x7FFF
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dest_field_values() {
        assert_eq!(DEST_MAP[""], 0b000);
        assert_eq!(DEST_MAP["M"], 0b001);
        assert_eq!(DEST_MAP["D"], 0b010);
        assert_eq!(DEST_MAP["AMD"], 0b111);
    }

    #[test]
    fn comp_field_selects_a_or_m() {
        assert_eq!(COMP_MAP["D+A"], 0b0000010);
        assert_eq!(COMP_MAP["D+M"], 0b1000010);
        assert_eq!(COMP_MAP["0"], 0b0101010);
    }

    #[test]
    fn encode_c_instruction_words() {
        // D=D+1
        assert_eq!(encode_c("D", "D+1", "", "D=D+1").unwrap(), 0b1110011111010000);
        // MD=M-1;JEQ
        assert_eq!(
            encode_c("MD", "M-1", "JEQ", "MD=M-1;JEQ").unwrap(),
            0b1111110010011010
        );
        // 0;JMP
        assert_eq!(encode_c("", "0", "JMP", "0;JMP").unwrap(), 0b1110101010000111);
        // M=1
        assert_eq!(encode_c("M", "1", "", "M=1").unwrap(), 0b1110111111001000);
    }

    #[test]
    fn unknown_mnemonic_is_fatal() {
        assert!(encode_c("Q", "0", "", "Q=0").is_err());
        assert!(encode_c("D", "D+2", "", "D=D+2").is_err());
        assert!(encode_c("", "0", "JXX", "0;JXX").is_err());
    }

    #[test]
    fn encode_a_masks_to_15_bits() {
        assert_eq!(encode_a(0), 0);
        assert_eq!(encode_a(100), 100);
        assert_eq!(encode_a(32767), 32767);
        assert_eq!(encode_a(0x8000), 0);
    }
}
