//! # VM Command Model
//!
//! The stack-machine command vocabulary shared by the VM-to-assembly
//! translator (which parses it) and the Jack code generator (which emits
//! it), plus the whitespace-tolerant line parser for `.vm` sources.

use crate::error::CompileError;
use std::fmt;

/// The eight VM memory segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Constant,
    Local,
    Argument,
    This,
    That,
    Static,
    Temp,
    Pointer,
}

impl Segment {
    fn from_str(name: &str) -> Option<Self> {
        match name {
            "constant" => Some(Self::Constant),
            "local" => Some(Self::Local),
            "argument" => Some(Self::Argument),
            "this" => Some(Self::This),
            "that" => Some(Self::That),
            "static" => Some(Self::Static),
            "temp" => Some(Self::Temp),
            "pointer" => Some(Self::Pointer),
            _ => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Constant => "constant",
            Self::Local => "local",
            Self::Argument => "argument",
            Self::This => "this",
            Self::That => "that",
            Self::Static => "static",
            Self::Temp => "temp",
            Self::Pointer => "pointer",
        };
        f.write_str(name)
    }
}

/// The nine stack arithmetic/logic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

impl VmOp {
    fn from_str(name: &str) -> Option<Self> {
        match name {
            "add" => Some(Self::Add),
            "sub" => Some(Self::Sub),
            "neg" => Some(Self::Neg),
            "eq" => Some(Self::Eq),
            "gt" => Some(Self::Gt),
            "lt" => Some(Self::Lt),
            "and" => Some(Self::And),
            "or" => Some(Self::Or),
            "not" => Some(Self::Not),
            _ => None,
        }
    }
}

impl fmt::Display for VmOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Neg => "neg",
            Self::Eq => "eq",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
        };
        f.write_str(name)
    }
}

/// One parsed VM command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmCommand {
    Arithmetic(VmOp),
    Push(Segment, u16),
    Pop(Segment, u16),
    Label(String),
    Goto(String),
    IfGoto(String),
    Function(String, u16),
    Call(String, u16),
    Return,
}

/// Parses one `.vm` source line.
///
/// Blank lines and `//` comments yield `Ok(None)`. `line_no` is 1-based and
/// is carried into diagnostics together with the line text.
pub fn parse_line(raw: &str, line_no: usize) -> Result<Option<VmCommand>, CompileError> {
    let code = match raw.find("//") {
        Some(pos) => &raw[..pos],
        None => raw,
    };
    let mut fields = code.split_whitespace();
    let Some(head) = fields.next() else {
        return Ok(None);
    };
    let arg1 = fields.next();
    let arg2 = fields.next();
    if fields.next().is_some() {
        return Err(CompileError::syntax(
            line_no,
            format!("trailing fields in '{}'", code.trim()),
        ));
    }

    if let Some(op) = VmOp::from_str(head) {
        expect_no_args(head, arg1, line_no)?;
        return Ok(Some(VmCommand::Arithmetic(op)));
    }

    let command = match head {
        "push" | "pop" => {
            let segment = arg1
                .and_then(Segment::from_str)
                .ok_or_else(|| bad_command(head, code, line_no))?;
            let index = parse_index(arg2, code, line_no)?;
            if head == "push" {
                VmCommand::Push(segment, index)
            } else {
                VmCommand::Pop(segment, index)
            }
        }
        "label" | "goto" | "if-goto" => {
            let name = arg1.ok_or_else(|| bad_command(head, code, line_no))?;
            if arg2.is_some() {
                return Err(bad_command(head, code, line_no));
            }
            match head {
                "label" => VmCommand::Label(name.to_string()),
                "goto" => VmCommand::Goto(name.to_string()),
                _ => VmCommand::IfGoto(name.to_string()),
            }
        }
        "function" | "call" => {
            let name = arg1.ok_or_else(|| bad_command(head, code, line_no))?;
            let count = parse_index(arg2, code, line_no)?;
            if head == "function" {
                VmCommand::Function(name.to_string(), count)
            } else {
                VmCommand::Call(name.to_string(), count)
            }
        }
        "return" => {
            expect_no_args(head, arg1, line_no)?;
            VmCommand::Return
        }
        other => {
            return Err(CompileError::syntax(
                line_no,
                format!("unknown command '{other}' in '{}'", code.trim()),
            ));
        }
    };
    Ok(Some(command))
}

fn expect_no_args(head: &str, arg1: Option<&str>, line_no: usize) -> Result<(), CompileError> {
    if arg1.is_some() {
        return Err(CompileError::syntax(
            line_no,
            format!("'{head}' takes no arguments"),
        ));
    }
    Ok(())
}

fn bad_command(head: &str, code: &str, line_no: usize) -> CompileError {
    CompileError::syntax(line_no, format!("malformed '{head}' in '{}'", code.trim()))
}

fn parse_index(arg: Option<&str>, code: &str, line_no: usize) -> Result<u16, CompileError> {
    arg.and_then(|a| a.parse::<u16>().ok())
        .filter(|&n| n <= 32767)
        .ok_or_else(|| {
            CompileError::syntax(line_no, format!("bad index in '{}'", code.trim()))
        })
}
