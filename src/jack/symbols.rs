//! # Jack Symbol Table
//!
//! Two scopes composed as a lookup chain: class scope (static/field) and
//! subroutine scope (argument/local). Indices are dense per kind, start at
//! zero, and increment on definition. The subroutine scope is discarded at
//! every subroutine entry; lookup consults the subroutine scope first.

use crate::vm::command::Segment;
use std::collections::HashMap;

/// The category of a Jack identifier. Each kind maps 1:1 to the VM segment
/// used to address it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Static,
    Field,
    Arg,
    Var,
}

impl Kind {
    /// The VM segment addressing variables of this kind.
    pub fn segment(self) -> Segment {
        match self {
            Kind::Static => Segment::Static,
            Kind::Field => Segment::This,
            Kind::Arg => Segment::Argument,
            Kind::Var => Segment::Local,
        }
    }

    fn slot(self) -> usize {
        match self {
            Kind::Static => 0,
            Kind::Field => 1,
            Kind::Arg => 2,
            Kind::Var => 3,
        }
    }
}

/// One table entry: declared type, kind, and running index within the kind.
#[derive(Debug, Clone)]
pub struct Entry {
    pub ty: String,
    pub kind: Kind,
    pub index: u16,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    class_scope: HashMap<String, Entry>,
    subroutine_scope: HashMap<String, Entry>,
    counters: [u16; 4],
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards the subroutine scope and resets the Arg/Var counters.
    pub fn start_subroutine(&mut self) {
        self.subroutine_scope.clear();
        self.counters[Kind::Arg.slot()] = 0;
        self.counters[Kind::Var.slot()] = 0;
    }

    /// Defines an identifier, assigning it the next index of its kind.
    pub fn define(&mut self, name: &str, ty: &str, kind: Kind) {
        let index = self.counters[kind.slot()];
        self.counters[kind.slot()] += 1;
        let entry = Entry {
            ty: ty.to_string(),
            kind,
            index,
        };
        match kind {
            Kind::Static | Kind::Field => self.class_scope.insert(name.to_string(), entry),
            Kind::Arg | Kind::Var => self.subroutine_scope.insert(name.to_string(), entry),
        };
    }

    /// Number of identifiers of the given kind defined in the current scope.
    pub fn var_count(&self, kind: Kind) -> u16 {
        self.counters[kind.slot()]
    }

    /// Looks a name up in the subroutine scope, then the class scope.
    pub fn lookup(&self, name: &str) -> Option<&Entry> {
        self.subroutine_scope
            .get(name)
            .or_else(|| self.class_scope.get(name))
    }
}
