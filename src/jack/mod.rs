//! # Jack Compiler
//!
//! Front end for the Jack language: a DFA tokenizer, a recursive-descent
//! compilation engine with a two-scope symbol table, and a VM writer. Each
//! `.jack` source holds one class and compiles to one `.vm` text.

pub mod engine;
pub mod symbols;
pub mod tokenizer;
pub mod writer;

use crate::error::CompileError;
use engine::CompilationEngine;

/// Compiles one Jack class source into VM text.
pub fn compile(source: &str) -> Result<String, CompileError> {
    let tokens = tokenizer::tokenize(source)?;
    CompilationEngine::new(tokens).compile()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(source: &str) -> Vec<String> {
        compile(source).unwrap().lines().map(str::to_string).collect()
    }

    #[test]
    fn compiles_a_constant_function() {
        assert_eq!(
            lines("class M { function int seven() { return 7; } }"),
            ["function M.seven 0", "push constant 7", "return"]
        );
    }

    #[test]
    fn constructor_allocates_one_slot_per_field() {
        let out = lines(
            "class Point {
               field int x, y;
               field int tag;
               constructor Point new() { return this; }
             }",
        );
        assert_eq!(out[0], "function Point.new 0");
        assert_eq!(out[1], "push constant 3");
        assert_eq!(out[2], "call Memory.alloc 1");
        assert_eq!(out[3], "pop pointer 0");
        assert_eq!(out[4], "push pointer 0");
        assert_eq!(out[5], "return");
    }

    #[test]
    fn method_binds_this_from_argument_0() {
        let out = lines(
            "class Point {
               field int x;
               method int getx() { return x; }
             }",
        );
        assert_eq!(
            out,
            [
                "function Point.getx 0",
                "push argument 0",
                "pop pointer 0",
                "push this 0",
                "return"
            ]
        );
    }

    #[test]
    fn method_parameters_index_after_implicit_this() {
        let out = lines(
            "class Point {
               method int pick(int a, int b) { return b; }
             }",
        );
        // a is argument 1, b is argument 2; argument 0 is `this`
        assert!(out.contains(&"push argument 2".to_string()));
    }

    #[test]
    fn field_assignment_uses_the_this_segment() {
        let out = lines(
            "class Counter {
               field int x;
               method void bump() { let x = x + 1; return; }
             }",
        );
        let body = &out[3..];
        assert_eq!(
            body[..4],
            [
                "push this 0".to_string(),
                "push constant 1".to_string(),
                "add".to_string(),
                "pop this 0".to_string(),
            ]
        );
    }

    #[test]
    fn do_call_discards_the_result() {
        let out = lines(
            "class Main {
               function void main() { do Output.printInt(42); return; }
             }",
        );
        assert_eq!(
            out,
            [
                "function Main.main 0",
                "push constant 42",
                "call Output.printInt 1",
                "pop temp 0",
                "push constant 0",
                "return"
            ]
        );
    }

    #[test]
    fn qualified_call_on_a_variable_pushes_the_receiver() {
        let out = lines(
            "class Main {
               function void main() {
                 var Point p;
                 do p.draw(1, 2);
                 return;
               }
             }",
        );
        assert_eq!(out[0], "function Main.main 1");
        assert_eq!(out[1], "push local 0");
        assert_eq!(out[4], "call Point.draw 3");
    }

    #[test]
    fn unqualified_call_targets_the_current_class() {
        let out = lines(
            "class Game {
               method void run() { do step(); return; }
             }",
        );
        assert!(out.contains(&"call Game.step 1".to_string()));
        // the receiver push for the inner call
        assert_eq!(
            out.iter().filter(|l| *l == "push pointer 0").count(),
            1
        );
    }

    #[test]
    fn string_constants_expand_char_by_char() {
        let out = lines(
            "class Main {
               function void main() { do Output.printString(\"AB\"); return; }
             }",
        );
        let expected = [
            "push constant 2",
            "call String.new 1",
            "push constant 65",
            "call String.appendChar 2",
            "push constant 66",
            "call String.appendChar 2",
        ];
        let start = out.iter().position(|l| l == "push constant 2").unwrap();
        assert_eq!(&out[start..start + 6], expected);
    }

    #[test]
    fn keyword_constants() {
        let out = lines(
            "class Main {
               function void main() {
                 var boolean b;
                 let b = true;
                 let b = false;
                 return;
               }
             }",
        );
        let body = out.join("\n");
        assert!(body.contains("push constant 0\nnot\npop local 0"));
        assert!(body.contains("push constant 0\npop local 0\npush constant 0\nreturn"));
    }

    #[test]
    fn expressions_fold_left_to_right_without_precedence() {
        let out = lines(
            "class Main {
               function int f() { return 2 + 3 * 4; }
             }",
        );
        assert_eq!(
            out[1..],
            [
                "push constant 2".to_string(),
                "push constant 3".to_string(),
                "add".to_string(),
                "push constant 4".to_string(),
                "call Math.multiply 2".to_string(),
                "return".to_string(),
            ]
        );
    }

    #[test]
    fn array_store_spills_through_temp_0() {
        let out = lines(
            "class Main {
               function void main() {
                 var Array a;
                 var int i, j;
                 let a[i] = a[j];
                 return;
               }
             }",
        );
        let body = out.join("\n");
        // LHS address first, then RHS value via pointer 1, then the spill
        let expected = "push local 1\n\
                        push local 0\n\
                        add\n\
                        push local 2\n\
                        push local 0\n\
                        add\n\
                        pop pointer 1\n\
                        push that 0\n\
                        pop temp 0\n\
                        pop pointer 1\n\
                        push temp 0\n\
                        pop that 0";
        assert!(body.contains(expected), "body was:\n{body}");
    }

    #[test]
    fn if_else_uses_class_prefixed_labels() {
        let out = lines(
            "class Main {
               function int f(int n) {
                 if (n < 0) { return 0; } else { return n; }
               }
             }",
        );
        let body = out.join("\n");
        assert!(body.contains("not\nif-goto Main_0"));
        assert!(body.contains("goto Main_1"));
        assert!(body.contains("label Main_0"));
        assert!(body.contains("label Main_1"));
    }

    #[test]
    fn while_loops_jump_back_to_the_top() {
        let out = lines(
            "class Main {
               function void f() {
                 while (true) { do f(); }
                 return;
               }
             }",
        );
        let body = out.join("\n");
        assert!(body.starts_with("function Main.f 0\nlabel Main_0\n"));
        assert!(body.contains("not\nif-goto Main_1"));
        assert!(body.contains("goto Main_0\nlabel Main_1"));
    }

    #[test]
    fn label_counter_never_resets_within_a_class() {
        let out = lines(
            "class Main {
               function void a() { if (true) { return; } return; }
               function void b() { if (true) { return; } return; }
             }",
        );
        let body = out.join("\n");
        assert!(body.contains("if-goto Main_0"));
        assert!(body.contains("if-goto Main_2"));
    }

    #[test]
    fn undefined_variable_is_a_semantic_error() {
        let err = compile("class M { function void f() { let ghost = 1; return; } }")
            .unwrap_err();
        assert!(matches!(err, CompileError::Semantic { .. }));
    }

    #[test]
    fn token_mismatch_is_a_syntax_error() {
        let err = compile("class M { function void f() { var int x; let x 1; } }").unwrap_err();
        assert!(matches!(err, CompileError::Syntax { .. }));
    }
}
