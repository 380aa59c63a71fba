//! # VM-to-Assembly Code Writer
//!
//! Expands each VM command into a fixed Hack assembly template. `SP` points
//! to the next free slot: push writes then increments, pop decrements then
//! reads. Comparison results use -1 for true and 0 for false.
//!
//! The writer is the only place where cross-file state lives: the current
//! file stem (for `static` symbol naming), the current function (for scoped
//! labels), and the monotonic counter behind comparison and return labels.

use super::command::{Segment, VmCommand, VmOp};
use crate::error::CompileError;

/// Appends the D register to the stack.
const PUSH_D: &str = "@SP\n\
                      A=M\n\
                      M=D\n\
                      @SP\n\
                      M=M+1\n";

#[derive(Debug)]
pub struct CodeWriter {
    out: String,
    file_name: String,
    current_function: String,
    label_counter: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            file_name: String::new(),
            current_function: String::new(),
            label_counter: 0,
        }
    }

    /// Emits `SP=256`, then `call Sys.init 0` when the input set defines
    /// `Sys`.
    pub fn write_bootstrap(&mut self, call_init: bool) {
        self.out.push_str(
            "@256\n\
             D=A\n\
             @SP\n\
             M=D\n",
        );
        if call_init {
            self.write_call("Sys.init", 0);
        }
    }

    /// Sets the stem used for `static` symbols. Must be called before
    /// translating each `.vm` unit.
    pub fn set_file_name(&mut self, stem: &str) {
        self.file_name = stem.to_string();
    }

    /// Translates one command, tagging diagnostics with its source line.
    pub fn write(&mut self, command: &VmCommand, line_no: usize) -> Result<(), CompileError> {
        match command {
            VmCommand::Arithmetic(op) => self.write_arithmetic(*op),
            VmCommand::Push(segment, index) => self.write_push(*segment, *index, line_no)?,
            VmCommand::Pop(segment, index) => self.write_pop(*segment, *index, line_no)?,
            VmCommand::Label(name) => self.write_label(name),
            VmCommand::Goto(name) => self.write_goto(name),
            VmCommand::IfGoto(name) => self.write_if_goto(name),
            VmCommand::Function(name, locals) => self.write_function(name, *locals),
            VmCommand::Call(name, args) => self.write_call(name, *args),
            VmCommand::Return => self.write_return(),
        }
        Ok(())
    }

    /// Finishes the output with the safety halt loop and returns it.
    pub fn finish(mut self) -> String {
        self.out.push_str(
            "(END)\n\
             @END\n\
             0;JMP\n",
        );
        self.out
    }

    fn write_arithmetic(&mut self, op: VmOp) {
        match op {
            VmOp::Add => self.binary("M=D+M"),
            VmOp::Sub => self.binary("M=M-D"),
            VmOp::And => self.binary("M=D&M"),
            VmOp::Or => self.binary("M=D|M"),
            VmOp::Neg => self.unary("M=-M"),
            VmOp::Not => self.unary("M=!M"),
            VmOp::Eq => self.comparison("EQ", "JEQ"),
            VmOp::Gt => self.comparison("GT", "JGT"),
            VmOp::Lt => self.comparison("LT", "JLT"),
        }
    }

    /// Pops y, then applies `store` against the new top x.
    fn binary(&mut self, store: &str) {
        self.out.push_str(&format!(
            "@SP\n\
             AM=M-1\n\
             D=M\n\
             A=A-1\n\
             {store}\n"
        ));
    }

    fn unary(&mut self, store: &str) {
        self.out.push_str(&format!(
            "@SP\n\
             A=M-1\n\
             {store}\n"
        ));
    }

    /// Subtracts y from x and branches on the condition: the true branch
    /// stores -1, the fall-through stores 0.
    fn comparison(&mut self, op: &str, jump: &str) {
        let id = self.next_label_id();
        let true_label = format!("{op}_TRUE_{id}");
        let end_label = format!("{op}_END_{id}");
        self.out.push_str(&format!(
            "@SP\n\
             AM=M-1\n\
             D=M\n\
             A=A-1\n\
             D=M-D\n\
             @{true_label}\n\
             D;{jump}\n\
             @SP\n\
             A=M-1\n\
             M=0\n\
             @{end_label}\n\
             0;JMP\n\
             ({true_label})\n\
             @SP\n\
             A=M-1\n\
             M=-1\n\
             ({end_label})\n"
        ));
    }

    fn write_push(&mut self, segment: Segment, index: u16, line_no: usize) -> Result<(), CompileError> {
        match segment {
            Segment::Constant => {
                self.out.push_str(&format!(
                    "@{index}\n\
                     D=A\n\
                     {PUSH_D}"
                ));
            }
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                let base = base_register(segment);
                self.out.push_str(&format!(
                    "@{base}\n\
                     D=M\n\
                     @{index}\n\
                     A=D+A\n\
                     D=M\n\
                     {PUSH_D}"
                ));
            }
            Segment::Static => {
                let symbol = self.static_symbol(index);
                self.out.push_str(&format!(
                    "@{symbol}\n\
                     D=M\n\
                     {PUSH_D}"
                ));
            }
            Segment::Temp => {
                let register = temp_register(index, line_no)?;
                self.out.push_str(&format!(
                    "@{register}\n\
                     D=M\n\
                     {PUSH_D}"
                ));
            }
            Segment::Pointer => {
                let register = pointer_register(index, line_no)?;
                self.out.push_str(&format!(
                    "@{register}\n\
                     D=M\n\
                     {PUSH_D}"
                ));
            }
        }
        Ok(())
    }

    fn write_pop(&mut self, segment: Segment, index: u16, line_no: usize) -> Result<(), CompileError> {
        match segment {
            Segment::Constant => {
                return Err(CompileError::semantic(format!(
                    "cannot pop to constant segment (line {line_no})"
                )));
            }
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                let base = base_register(segment);
                self.out.push_str(&format!(
                    "@{base}\n\
                     D=M\n\
                     @{index}\n\
                     D=D+A\n\
                     @R13\n\
                     M=D\n\
                     @SP\n\
                     AM=M-1\n\
                     D=M\n\
                     @R13\n\
                     A=M\n\
                     M=D\n"
                ));
            }
            Segment::Static => {
                let symbol = self.static_symbol(index);
                self.pop_direct(&symbol);
            }
            Segment::Temp => {
                let register = temp_register(index, line_no)?;
                self.pop_direct(&register);
            }
            Segment::Pointer => {
                let register = pointer_register(index, line_no)?;
                self.pop_direct(register);
            }
        }
        Ok(())
    }

    /// Pops the top of the stack straight into a named location.
    fn pop_direct(&mut self, symbol: &str) {
        self.out.push_str(&format!(
            "@SP\n\
             AM=M-1\n\
             D=M\n\
             @{symbol}\n\
             M=D\n"
        ));
    }

    fn write_label(&mut self, name: &str) {
        let scoped = self.scoped_label(name);
        self.out.push_str(&format!("({scoped})\n"));
    }

    fn write_goto(&mut self, name: &str) {
        let scoped = self.scoped_label(name);
        self.out.push_str(&format!(
            "@{scoped}\n\
             0;JMP\n"
        ));
    }

    /// Pops the top of the stack and jumps when it is non-zero.
    fn write_if_goto(&mut self, name: &str) {
        let scoped = self.scoped_label(name);
        self.out.push_str(&format!(
            "@SP\n\
             AM=M-1\n\
             D=M\n\
             @{scoped}\n\
             D;JNE\n"
        ));
    }

    fn write_call(&mut self, name: &str, args: u16) {
        let id = self.next_label_id();
        let return_label = format!("RETURN_{name}_{id}");

        // push return-address
        self.out.push_str(&format!(
            "@{return_label}\n\
             D=A\n\
             {PUSH_D}"
        ));
        // push the caller's LCL, ARG, THIS, THAT
        for register in ["LCL", "ARG", "THIS", "THAT"] {
            self.out.push_str(&format!(
                "@{register}\n\
                 D=M\n\
                 {PUSH_D}"
            ));
        }
        // ARG = SP - args - 5; LCL = SP; goto callee
        self.out.push_str(&format!(
            "@SP\n\
             D=M\n\
             @{args}\n\
             D=D-A\n\
             @5\n\
             D=D-A\n\
             @ARG\n\
             M=D\n\
             @SP\n\
             D=M\n\
             @LCL\n\
             M=D\n\
             @{name}\n\
             0;JMP\n\
             ({return_label})\n"
        ));
    }

    fn write_function(&mut self, name: &str, locals: u16) {
        let id = self.next_label_id();
        let loop_label = format!("LOOP_{id}");
        let end_label = format!("LOOP_{id}_END");

        // counted jump pushing `locals` zeros, R13 as countdown
        self.out.push_str(&format!(
            "({name})\n\
             @{locals}\n\
             D=A\n\
             @R13\n\
             M=D\n\
             ({loop_label})\n\
             @R13\n\
             D=M\n\
             @{end_label}\n\
             D;JEQ\n\
             @0\n\
             D=A\n\
             {PUSH_D}\
             @R13\n\
             M=M-1\n\
             @{loop_label}\n\
             0;JMP\n\
             ({end_label})\n"
        ));
        self.current_function = name.to_string();
    }

    fn write_return(&mut self) {
        // FRAME = LCL (spilled to R13), RET = *(FRAME-5) (spilled to R14)
        self.out.push_str(
            "@LCL\n\
             D=M\n\
             @R13\n\
             M=D\n\
             @5\n\
             A=D-A\n\
             D=M\n\
             @R14\n\
             M=D\n",
        );
        // *ARG = pop(); SP = ARG + 1
        self.out.push_str(
            "@SP\n\
             AM=M-1\n\
             D=M\n\
             @ARG\n\
             A=M\n\
             M=D\n\
             @ARG\n\
             D=M+1\n\
             @SP\n\
             M=D\n",
        );
        // restore THAT, THIS, ARG, LCL from the saved frame
        for (offset, register) in [(1, "THAT"), (2, "THIS"), (3, "ARG"), (4, "LCL")] {
            self.out.push_str(&format!(
                "@R13\n\
                 D=M\n\
                 @{offset}\n\
                 A=D-A\n\
                 D=M\n\
                 @{register}\n\
                 M=D\n"
            ));
        }
        self.out.push_str(
            "@R14\n\
             A=M\n\
             0;JMP\n",
        );
    }

    fn scoped_label(&self, name: &str) -> String {
        if self.current_function.is_empty() {
            name.to_string()
        } else {
            format!("{}${name}", self.current_function)
        }
    }

    fn static_symbol(&self, index: u16) -> String {
        format!("{}.{index}", self.file_name)
    }

    fn next_label_id(&mut self) -> usize {
        let id = self.label_counter;
        self.label_counter += 1;
        id
    }
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn base_register(segment: Segment) -> &'static str {
    match segment {
        Segment::Local => "LCL",
        Segment::Argument => "ARG",
        Segment::This => "THIS",
        Segment::That => "THAT",
        _ => unreachable!("segment has no base register"),
    }
}

fn temp_register(index: u16, line_no: usize) -> Result<String, CompileError> {
    if index > 7 {
        return Err(CompileError::semantic(format!(
            "temp index {index} out of range 0..=7 (line {line_no})"
        )));
    }
    Ok(format!("R{}", 5 + index))
}

fn pointer_register(index: u16, line_no: usize) -> Result<&'static str, CompileError> {
    match index {
        0 => Ok("THIS"),
        1 => Ok("THAT"),
        _ => Err(CompileError::semantic(format!(
            "pointer index {index} out of range 0..=1 (line {line_no})"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer_for(stem: &str) -> CodeWriter {
        let mut writer = CodeWriter::new();
        writer.set_file_name(stem);
        writer
    }

    #[test]
    fn push_constant_template() {
        let mut writer = writer_for("Test");
        writer.write(&VmCommand::Push(Segment::Constant, 7), 1).unwrap();
        let out = writer.finish();
        assert!(out.starts_with("@7\nD=A\n@SP\nA=M\nM=D\n@SP\nM=M+1\n"));
    }

    #[test]
    fn static_uses_file_stem() {
        let mut writer = writer_for("Foo");
        writer.write(&VmCommand::Push(Segment::Static, 3), 1).unwrap();
        writer.write(&VmCommand::Pop(Segment::Static, 3), 2).unwrap();
        let out = writer.finish();
        assert!(out.contains("@Foo.3\n"));
    }

    #[test]
    fn pointer_maps_to_this_and_that() {
        let mut writer = writer_for("Test");
        writer.write(&VmCommand::Pop(Segment::Pointer, 0), 1).unwrap();
        writer.write(&VmCommand::Pop(Segment::Pointer, 1), 2).unwrap();
        let out = writer.finish();
        assert!(out.contains("@THIS\nM=D\n"));
        assert!(out.contains("@THAT\nM=D\n"));
        let mut writer = writer_for("Test");
        assert!(writer.write(&VmCommand::Pop(Segment::Pointer, 2), 3).is_err());
    }

    #[test]
    fn temp_maps_to_r5_upward() {
        let mut writer = writer_for("Test");
        writer.write(&VmCommand::Push(Segment::Temp, 2), 1).unwrap();
        let out = writer.finish();
        assert!(out.contains("@R7\n"));
        let mut writer = writer_for("Test");
        assert!(writer.write(&VmCommand::Push(Segment::Temp, 8), 2).is_err());
    }

    #[test]
    fn pop_constant_is_rejected() {
        let mut writer = writer_for("Test");
        assert!(writer.write(&VmCommand::Pop(Segment::Constant, 0), 1).is_err());
    }

    #[test]
    fn labels_scope_to_current_function() {
        let mut writer = writer_for("Test");
        writer.write(&VmCommand::Label("TOP".to_string()), 1).unwrap();
        writer
            .write(&VmCommand::Function("Main.main".to_string(), 0), 2)
            .unwrap();
        writer.write(&VmCommand::Label("TOP".to_string()), 3).unwrap();
        writer.write(&VmCommand::Goto("TOP".to_string()), 4).unwrap();
        let out = writer.finish();
        assert!(out.contains("(TOP)\n"));
        assert!(out.contains("(Main.main$TOP)\n"));
        assert!(out.contains("@Main.main$TOP\n0;JMP\n"));
    }

    #[test]
    fn comparison_labels_are_unique() {
        let mut writer = writer_for("Test");
        writer.write(&VmCommand::Arithmetic(VmOp::Eq), 1).unwrap();
        writer.write(&VmCommand::Arithmetic(VmOp::Eq), 2).unwrap();
        writer.write(&VmCommand::Arithmetic(VmOp::Lt), 3).unwrap();
        let out = writer.finish();
        assert!(out.contains("(EQ_TRUE_0)"));
        assert!(out.contains("(EQ_TRUE_1)"));
        assert!(out.contains("(LT_TRUE_2)"));
        assert!(out.contains("D;JEQ"));
        assert!(out.contains("D;JLT"));
    }

    #[test]
    fn call_embeds_callee_in_return_label() {
        let mut writer = writer_for("Test");
        writer
            .write(&VmCommand::Call("Sys.init".to_string(), 0), 1)
            .unwrap();
        let out = writer.finish();
        assert!(out.contains("@RETURN_Sys.init_0\n"));
        assert!(out.contains("(RETURN_Sys.init_0)\n"));
        // frame save order: return address, LCL, ARG, THIS, THAT
        let lcl = out.find("@LCL\nD=M\n").unwrap();
        let arg = out.find("@ARG\nD=M\n").unwrap();
        let this = out.find("@THIS\nD=M\n").unwrap();
        let that = out.find("@THAT\nD=M\n").unwrap();
        assert!(lcl < arg && arg < this && this < that);
    }

    #[test]
    fn bootstrap_is_conditional() {
        let mut writer = CodeWriter::new();
        writer.write_bootstrap(true);
        let out = writer.finish();
        assert!(out.starts_with("@256\nD=A\n@SP\nM=D\n"));
        assert!(out.contains("@Sys.init\n0;JMP\n"));

        let mut writer = CodeWriter::new();
        writer.write_bootstrap(false);
        let out = writer.finish();
        assert!(out.starts_with("@256\nD=A\n@SP\nM=D\n"));
        assert!(!out.contains("Sys.init"));
    }

    #[test]
    fn output_ends_with_halt_loop() {
        let out = CodeWriter::new().finish();
        assert!(out.ends_with("(END)\n@END\n0;JMP\n"));
    }
}
