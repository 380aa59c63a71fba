//! # Expression Productions
//!
//! expression / term / expressionList plus the shared subroutine-call
//! compilation used by both terms and `do` statements.
//!
//! Operators carry no precedence: terms fold strictly left to right as the
//! operators are encountered, so `2 + 3 * 4` computes `(2 + 3) * 4`. This
//! matches the language definition and must not be "fixed".

use super::CompilationEngine;
use crate::error::CompileError;
use crate::jack::tokenizer::{Keyword, TokenKind};
use crate::vm::command::{Segment, VmOp};

/// Binary operator symbols recognized between terms.
const OPS: [char; 9] = ['+', '-', '*', '/', '&', '|', '<', '>', '='];

impl CompilationEngine {
    /// expression: term (op term)*
    pub(crate) fn compile_expression(&mut self) -> Result<(), CompileError> {
        self.compile_term()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Symbol(c) if OPS.contains(&c) => c,
                _ => return Ok(()),
            };
            self.advance();
            self.compile_term()?;
            match op {
                '+' => self.writer.arithmetic(VmOp::Add),
                '-' => self.writer.arithmetic(VmOp::Sub),
                '&' => self.writer.arithmetic(VmOp::And),
                '|' => self.writer.arithmetic(VmOp::Or),
                '<' => self.writer.arithmetic(VmOp::Lt),
                '>' => self.writer.arithmetic(VmOp::Gt),
                '=' => self.writer.arithmetic(VmOp::Eq),
                '*' => self.writer.call("Math.multiply", 2),
                _ => self.writer.call("Math.divide", 2),
            }
        }
    }

    /// term: integerConstant | stringConstant | keywordConstant |
    ///       varName | varName '[' expression ']' | subroutineCall |
    ///       '(' expression ')' | unaryOp term
    pub(crate) fn compile_term(&mut self) -> Result<(), CompileError> {
        let kind = self.peek().kind;
        match kind {
            TokenKind::IntConst => {
                let token = self.advance();
                let value = token
                    .lexeme
                    .parse::<u16>()
                    .ok()
                    .filter(|&v| v <= 32767)
                    .ok_or_else(|| {
                        CompileError::semantic(format!(
                            "integer constant '{}' out of range 0..32767 (offset {})",
                            token.lexeme, token.offset
                        ))
                    })?;
                self.writer.push(Segment::Constant, value);
                Ok(())
            }
            TokenKind::StringConst => {
                let token = self.advance();
                self.writer.push(Segment::Constant, token.lexeme.len() as u16);
                self.writer.call("String.new", 1);
                for c in token.lexeme.chars() {
                    self.writer.push(Segment::Constant, c as u16);
                    self.writer.call("String.appendChar", 2);
                }
                Ok(())
            }
            TokenKind::Keyword(keyword) => match keyword {
                Keyword::True => {
                    self.advance();
                    self.writer.push(Segment::Constant, 0);
                    self.writer.arithmetic(VmOp::Not);
                    Ok(())
                }
                Keyword::False | Keyword::Null => {
                    self.advance();
                    self.writer.push(Segment::Constant, 0);
                    Ok(())
                }
                Keyword::This => {
                    self.advance();
                    self.writer.push(Segment::Pointer, 0);
                    Ok(())
                }
                _ => Err(self.unexpected("term")),
            },
            TokenKind::Symbol('(') => {
                self.advance();
                self.compile_expression()?;
                self.expect_symbol(')')
            }
            TokenKind::Symbol('-') => {
                self.advance();
                self.compile_term()?;
                self.writer.arithmetic(VmOp::Neg);
                Ok(())
            }
            TokenKind::Symbol('~') => {
                self.advance();
                self.compile_term()?;
                self.writer.arithmetic(VmOp::Not);
                Ok(())
            }
            TokenKind::Identifier => {
                let name = self.advance().lexeme;
                if self.check_symbol('[') {
                    // array access: value of *(base + index)
                    self.advance();
                    self.compile_expression()?;
                    self.expect_symbol(']')?;
                    let entry = self.resolve_variable(&name)?;
                    self.writer.push(entry.kind.segment(), entry.index);
                    self.writer.arithmetic(VmOp::Add);
                    self.writer.pop(Segment::Pointer, 1);
                    self.writer.push(Segment::That, 0);
                    Ok(())
                } else if self.check_symbol('(') || self.check_symbol('.') {
                    self.compile_subroutine_call(&name)
                } else {
                    let entry = self.resolve_variable(&name)?;
                    self.writer.push(entry.kind.segment(), entry.index);
                    Ok(())
                }
            }
            _ => Err(self.unexpected("term")),
        }
    }

    /// subroutineCall, after its leading identifier has been consumed:
    ///
    /// - `first(...)` — a method of the current class; the current object
    ///   is pushed as the implicit receiver.
    /// - `first.sub(...)` where `first` names a variable — a method on that
    ///   object; its value is the receiver and its declared type names the
    ///   callee class.
    /// - `first.sub(...)` otherwise — `first` is a class name; a plain
    ///   function or constructor call with no receiver.
    pub(crate) fn compile_subroutine_call(&mut self, first: &str) -> Result<(), CompileError> {
        if self.check_symbol('(') {
            self.advance();
            self.writer.push(Segment::Pointer, 0);
            let args = self.compile_expression_list()?;
            self.expect_symbol(')')?;
            let target = format!("{}.{first}", self.class_name);
            self.writer.call(&target, args + 1);
            return Ok(());
        }

        self.expect_symbol('.')?;
        let method = self.expect_identifier()?;
        self.expect_symbol('(')?;

        match self.variable_entry(first) {
            Some(entry) => {
                self.writer.push(entry.kind.segment(), entry.index);
                let args = self.compile_expression_list()?;
                self.expect_symbol(')')?;
                let target = format!("{}.{method}", entry.ty);
                self.writer.call(&target, args + 1);
            }
            None => {
                let args = self.compile_expression_list()?;
                self.expect_symbol(')')?;
                let target = format!("{first}.{method}");
                self.writer.call(&target, args);
            }
        }
        Ok(())
    }

    /// expressionList: (expression (',' expression)*)?
    ///
    /// Returns the number of expressions compiled, which becomes the call's
    /// argument count.
    pub(crate) fn compile_expression_list(&mut self) -> Result<u16, CompileError> {
        if self.check_symbol(')') {
            return Ok(0);
        }
        let mut count = 1;
        self.compile_expression()?;
        while self.check_symbol(',') {
            self.advance();
            self.compile_expression()?;
            count += 1;
        }
        Ok(count)
    }
}
