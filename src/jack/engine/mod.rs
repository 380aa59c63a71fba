//! # Compilation Engine
//!
//! A recursive-descent parser over the token stream whose productions emit
//! VM code directly; there is no intermediate tree. The grammar is LL(1)
//! with one extra token of lookahead inside `term` to tell array accesses
//! and subroutine calls apart from plain variables.
//!
//! This module holds the engine state, the token-stream helpers, and the
//! class-level productions; statement and expression productions live in
//! the sibling modules.

pub mod expressions;
pub mod statements;

use crate::error::CompileError;
use crate::jack::symbols::{Entry, Kind, SymbolTable};
use crate::jack::tokenizer::{Keyword, Token, TokenKind};
use crate::jack::writer::VmWriter;
use crate::vm::command::Segment;

/// The three subroutine variants; each gets a different prologue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubroutineKind {
    Constructor,
    Function,
    Method,
}

pub struct CompilationEngine {
    tokens: Vec<Token>,
    pos: usize,
    class_name: String,
    subroutine_name: String,
    subroutine_kind: SubroutineKind,
    /// Monotonic per-class counter behind generated control-flow labels.
    /// Never reset within a class; the class-name prefix keeps labels from
    /// colliding across classes.
    label_counter: usize,
    symbols: SymbolTable,
    writer: VmWriter,
}

impl CompilationEngine {
    /// Creates an engine over a token stream ending in the `Eof` sentinel.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            class_name: String::new(),
            subroutine_name: String::new(),
            subroutine_kind: SubroutineKind::Function,
            label_counter: 0,
            symbols: SymbolTable::new(),
            writer: VmWriter::new(),
        }
    }

    /// Compiles the single class the token stream must contain and returns
    /// the generated VM text.
    pub fn compile(mut self) -> Result<String, CompileError> {
        self.compile_class()?;
        Ok(self.writer.finish())
    }

    // --- Token stream helpers ---

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn check_symbol(&self, symbol: char) -> bool {
        self.peek().kind == TokenKind::Symbol(symbol)
    }

    pub(crate) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.peek().kind == TokenKind::Keyword(keyword)
    }

    pub(crate) fn expect_symbol(&mut self, symbol: char) -> Result<(), CompileError> {
        if self.check_symbol(symbol) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{symbol}'")))
        }
    }

    pub(crate) fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), CompileError> {
        if self.check_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{keyword:?}' keyword")))
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, CompileError> {
        if self.peek().kind == TokenKind::Identifier {
            Ok(self.advance().lexeme)
        } else {
            Err(self.unexpected("identifier"))
        }
    }

    /// Builds a syntax error naming the expected construct and the byte
    /// offset of the offending token.
    pub(crate) fn unexpected(&self, expected: &str) -> CompileError {
        let token = self.peek();
        let found = if token.kind == TokenKind::Eof {
            "end of input".to_string()
        } else {
            format!("'{}'", token.lexeme)
        };
        CompileError::syntax(token.offset, format!("expected {expected}, found {found}"))
    }

    /// Resolves a variable through the scope chain, cloning its entry.
    pub(crate) fn resolve_variable(&self, name: &str) -> Result<Entry, CompileError> {
        self.symbols
            .lookup(name)
            .cloned()
            .ok_or_else(|| CompileError::undefined_variable(name))
    }

    pub(crate) fn variable_entry(&self, name: &str) -> Option<Entry> {
        self.symbols.lookup(name).cloned()
    }

    /// Allocates the next `ClassName_N` control-flow label.
    pub(crate) fn next_label(&mut self) -> String {
        let id = self.label_counter;
        self.label_counter += 1;
        format!("{}_{id}", self.class_name)
    }

    // --- Class-level productions ---

    /// class: 'class' className '{' classVarDec* subroutineDec* '}'
    fn compile_class(&mut self) -> Result<(), CompileError> {
        self.expect_keyword(Keyword::Class)?;
        self.class_name = self.expect_identifier()?;
        self.expect_symbol('{')?;

        while self.check_keyword(Keyword::Static) || self.check_keyword(Keyword::Field) {
            self.compile_class_var_dec()?;
        }
        while self.check_keyword(Keyword::Constructor)
            || self.check_keyword(Keyword::Function)
            || self.check_keyword(Keyword::Method)
        {
            self.compile_subroutine()?;
        }
        self.expect_symbol('}')
    }

    /// classVarDec: ('static' | 'field') type varName (',' varName)* ';'
    fn compile_class_var_dec(&mut self) -> Result<(), CompileError> {
        let kind = if self.check_keyword(Keyword::Static) {
            Kind::Static
        } else {
            Kind::Field
        };
        self.advance();
        let ty = self.parse_type()?;

        let name = self.expect_identifier()?;
        self.symbols.define(&name, &ty, kind);
        while self.check_symbol(',') {
            self.advance();
            let name = self.expect_identifier()?;
            self.symbols.define(&name, &ty, kind);
        }
        self.expect_symbol(';')
    }

    /// subroutineDec: ('constructor' | 'function' | 'method')
    ///                ('void' | type) subroutineName '(' parameterList ')'
    ///                '{' varDec* statements '}'
    ///
    /// The function header is emitted only after the local declarations are
    /// parsed, because the local count must be known first. Constructors
    /// then allocate the object and methods bind `this` from argument 0.
    fn compile_subroutine(&mut self) -> Result<(), CompileError> {
        self.subroutine_kind = if self.check_keyword(Keyword::Constructor) {
            SubroutineKind::Constructor
        } else if self.check_keyword(Keyword::Function) {
            SubroutineKind::Function
        } else {
            SubroutineKind::Method
        };
        self.advance();

        // return type: 'void' or a type; only its presence matters here
        if self.check_keyword(Keyword::Void) {
            self.advance();
        } else {
            self.parse_type()?;
        }
        self.subroutine_name = self.expect_identifier()?;
        self.expect_symbol('(')?;

        self.symbols.start_subroutine();
        if self.subroutine_kind == SubroutineKind::Method {
            let class_name = self.class_name.clone();
            self.symbols.define("this", &class_name, Kind::Arg);
        }
        self.compile_parameter_list()?;
        self.expect_symbol(')')?;
        self.expect_symbol('{')?;

        while self.check_keyword(Keyword::Var) {
            self.compile_var_dec()?;
        }

        let locals = self.symbols.var_count(Kind::Var);
        let full_name = format!("{}.{}", self.class_name, self.subroutine_name);
        self.writer.function(&full_name, locals);

        match self.subroutine_kind {
            SubroutineKind::Constructor => {
                let fields = self.symbols.var_count(Kind::Field);
                self.writer.push(Segment::Constant, fields);
                self.writer.call("Memory.alloc", 1);
                self.writer.pop(Segment::Pointer, 0);
            }
            SubroutineKind::Method => {
                self.writer.push(Segment::Argument, 0);
                self.writer.pop(Segment::Pointer, 0);
            }
            SubroutineKind::Function => {}
        }

        self.compile_statements()?;
        self.expect_symbol('}')
    }

    /// parameterList: ((type varName) (',' type varName)*)?
    fn compile_parameter_list(&mut self) -> Result<(), CompileError> {
        if self.check_symbol(')') {
            return Ok(());
        }
        loop {
            let ty = self.parse_type()?;
            let name = self.expect_identifier()?;
            self.symbols.define(&name, &ty, Kind::Arg);
            if self.check_symbol(',') {
                self.advance();
            } else {
                return Ok(());
            }
        }
    }

    /// varDec: 'var' type varName (',' varName)* ';'
    fn compile_var_dec(&mut self) -> Result<(), CompileError> {
        self.expect_keyword(Keyword::Var)?;
        let ty = self.parse_type()?;
        let name = self.expect_identifier()?;
        self.symbols.define(&name, &ty, Kind::Var);
        while self.check_symbol(',') {
            self.advance();
            let name = self.expect_identifier()?;
            self.symbols.define(&name, &ty, Kind::Var);
        }
        self.expect_symbol(';')
    }

    /// type: 'int' | 'char' | 'boolean' | className
    fn parse_type(&mut self) -> Result<String, CompileError> {
        match self.peek().kind {
            TokenKind::Keyword(Keyword::Int)
            | TokenKind::Keyword(Keyword::Char)
            | TokenKind::Keyword(Keyword::Boolean)
            | TokenKind::Identifier => Ok(self.advance().lexeme),
            _ => Err(self.unexpected("type")),
        }
    }
}
