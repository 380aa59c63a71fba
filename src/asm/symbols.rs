//! # Assembler Symbol Table
//!
//! Maps label and variable names to 15-bit addresses. Predefined platform
//! symbols live in a compile-time `phf` map; user symbols go into a standard
//! `HashMap`. The table also owns the two address counters the two-pass
//! design needs: `rom` (instruction address during pass 1) and `ram` (next
//! free variable slot, starting at 16).

use phf::phf_map;
use std::collections::HashMap;

/// Symbols built into the Hack platform.
static PREDEFINED: phf::Map<&'static str, u16> = phf_map! {
    "SP" => 0,
    "LCL" => 1,
    "ARG" => 2,
    "THIS" => 3,
    "THAT" => 4,

    "R0" => 0,
    "R1" => 1,
    "R2" => 2,
    "R3" => 3,
    "R4" => 4,
    "R5" => 5,
    "R6" => 6,
    "R7" => 7,
    "R8" => 8,
    "R9" => 9,
    "R10" => 10,
    "R11" => 11,
    "R12" => 12,
    "R13" => 13,
    "R14" => 14,
    "R15" => 15,

    "SCREEN" => 16384,
    "KBD" => 24576,
};

/// First RAM slot handed out to a variable symbol.
const FIRST_VARIABLE_SLOT: u16 = 16;

#[derive(Debug)]
pub struct SymbolTable {
    user: HashMap<String, u16>,
    /// Instruction address counter, advanced during pass 1.
    rom: u16,
    /// Next free variable slot, advanced during pass 2.
    ram: u16,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            user: HashMap::new(),
            rom: 0,
            ram: FIRST_VARIABLE_SLOT,
        }
    }

    /// Records that pass 1 saw a code-emitting instruction.
    pub fn step_rom(&mut self) {
        self.rom += 1;
    }

    /// Binds a label to the address of the next instruction.
    pub fn define_label(&mut self, name: &str) {
        self.user.insert(name.to_string(), self.rom);
    }

    /// Resolves a symbol during pass 2.
    ///
    /// Predefined symbols win over user symbols. A symbol seen for the first
    /// time is a variable: it is bound to the next free RAM slot, so
    /// first-seen variables receive 16, 17, 18, … in order of first use.
    pub fn resolve(&mut self, name: &str) -> u16 {
        if let Some(&addr) = PREDEFINED.get(name) {
            return addr;
        }
        match self.user.entry(name.to_string()) {
            std::collections::hash_map::Entry::Occupied(e) => *e.get(),
            std::collections::hash_map::Entry::Vacant(e) => {
                let addr = self.ram;
                self.ram += 1;
                *e.insert(addr)
            }
        }
    }

    /// True if the name is already bound (predefined or user).
    pub fn contains(&self, name: &str) -> bool {
        PREDEFINED.contains_key(name) || self.user.contains_key(name)
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
