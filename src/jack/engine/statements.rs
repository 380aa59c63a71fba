//! # Statement Productions
//!
//! let / if / while / do / return. Control flow compiles to inverted
//! conditions: the generated code negates the condition and jumps when the
//! original was false, so the then-branch stays on the fall-through path.

use super::CompilationEngine;
use crate::error::CompileError;
use crate::jack::tokenizer::Keyword;
use crate::vm::command::{Segment, VmOp};

impl CompilationEngine {
    /// statements: statement*
    pub(crate) fn compile_statements(&mut self) -> Result<(), CompileError> {
        loop {
            if self.check_keyword(Keyword::Let) {
                self.compile_let()?;
            } else if self.check_keyword(Keyword::If) {
                self.compile_if()?;
            } else if self.check_keyword(Keyword::While) {
                self.compile_while()?;
            } else if self.check_keyword(Keyword::Do) {
                self.compile_do()?;
            } else if self.check_keyword(Keyword::Return) {
                self.compile_return()?;
            } else {
                return Ok(());
            }
        }
    }

    /// letStatement: 'let' varName ('[' expression ']')? '=' expression ';'
    ///
    /// For an indexed store the index and base are folded into an address
    /// before the right-hand side runs, and the value is spilled through
    /// `temp 0` so a right-hand side containing its own array access cannot
    /// clobber `pointer 1`.
    fn compile_let(&mut self) -> Result<(), CompileError> {
        self.expect_keyword(Keyword::Let)?;
        let name = self.expect_identifier()?;
        let entry = self.resolve_variable(&name)?;
        let segment = entry.kind.segment();

        if self.check_symbol('[') {
            self.advance();
            self.compile_expression()?;
            self.expect_symbol(']')?;
            self.writer.push(segment, entry.index);
            self.writer.arithmetic(VmOp::Add);

            self.expect_symbol('=')?;
            self.compile_expression()?;

            self.writer.pop(Segment::Temp, 0);
            self.writer.pop(Segment::Pointer, 1);
            self.writer.push(Segment::Temp, 0);
            self.writer.pop(Segment::That, 0);
        } else {
            self.expect_symbol('=')?;
            self.compile_expression()?;
            self.writer.pop(segment, entry.index);
        }
        self.expect_symbol(';')
    }

    /// ifStatement: 'if' '(' expression ')' '{' statements '}'
    ///              ('else' '{' statements '}')?
    fn compile_if(&mut self) -> Result<(), CompileError> {
        self.expect_keyword(Keyword::If)?;
        let false_label = self.next_label();
        let end_label = self.next_label();

        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;
        self.writer.arithmetic(VmOp::Not);
        self.writer.if_goto(&false_label);

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;

        if self.check_keyword(Keyword::Else) {
            self.advance();
            self.writer.goto(&end_label);
            self.writer.label(&false_label);
            self.expect_symbol('{')?;
            self.compile_statements()?;
            self.expect_symbol('}')?;
            self.writer.label(&end_label);
        } else {
            self.writer.label(&false_label);
        }
        Ok(())
    }

    /// whileStatement: 'while' '(' expression ')' '{' statements '}'
    fn compile_while(&mut self) -> Result<(), CompileError> {
        self.expect_keyword(Keyword::While)?;
        let top_label = self.next_label();
        let end_label = self.next_label();

        self.writer.label(&top_label);
        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;
        self.writer.arithmetic(VmOp::Not);
        self.writer.if_goto(&end_label);

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;
        self.writer.goto(&top_label);
        self.writer.label(&end_label);
        Ok(())
    }

    /// doStatement: 'do' subroutineCall ';'
    ///
    /// The returned value is always discarded into `temp 0`.
    fn compile_do(&mut self) -> Result<(), CompileError> {
        self.expect_keyword(Keyword::Do)?;
        let first = self.expect_identifier()?;
        self.compile_subroutine_call(&first)?;
        self.writer.pop(Segment::Temp, 0);
        self.expect_symbol(';')
    }

    /// returnStatement: 'return' expression? ';'
    ///
    /// A void return still pushes a value; every subroutine leaves exactly
    /// one word for its caller.
    fn compile_return(&mut self) -> Result<(), CompileError> {
        self.expect_keyword(Keyword::Return)?;
        if self.check_symbol(';') {
            self.writer.push(Segment::Constant, 0);
        } else {
            self.compile_expression()?;
        }
        self.writer.ret();
        self.expect_symbol(';')
    }
}
