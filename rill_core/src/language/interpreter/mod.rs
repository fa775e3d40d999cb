mod environment;
mod evaluator;
mod value;

pub use environment::Environment;
pub use value::Value;

use std::io::{self, Write};

use log::debug;

use crate::language::ast::Stmt;
use crate::language::error::Result;

/// Tree-walking statement executor. Owns the global environment, so one
/// instance carries state across successive batches (the interactive prompt
/// feeds every line to the same interpreter). Output from `print` goes to the
/// configured sink, stdout unless a caller substitutes a buffer.
pub struct Interpreter {
    environment: Environment,
    out: Box<dyn Write>,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter::with_output(Box::new(io::stdout()))
    }

    pub fn with_output(out: Box<dyn Write>) -> Self {
        Interpreter {
            environment: Environment::new(),
            out,
        }
    }

    pub(crate) fn out(&mut self) -> &mut dyn Write {
        self.out.as_mut()
    }

    /// Runs one batch. The first runtime error stops the remaining
    /// statements and is handed back to the caller for reporting; side
    /// effects that already happened stay.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<()> {
        debug!("Executing {} statement(s)", statements.len());

        for statement in statements {
            self.execute(statement)?;
        }

        Ok(())
    }

    fn execute(&mut self, statement: &Stmt) -> Result<()> {
        match statement {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(())
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.out, "{value}")?;
                Ok(())
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.environment.define(name, value)
            }
            Stmt::Block(statements) => self.execute_block(statements),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute(body)?;
                }
                Ok(())
            }
        }
    }

    /// Blocks run in a fresh child frame; the frame is discarded on the way
    /// out whether the body finished or failed.
    fn execute_block(&mut self, statements: &[Stmt]) -> Result<()> {
        let enclosing = std::mem::take(&mut self.environment);
        self.environment = Environment::with_parent(enclosing);

        let result = statements
            .iter()
            .try_for_each(|statement| self.execute(statement));

        let frame = std::mem::take(&mut self.environment);
        self.environment = frame.into_parent();

        result
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::language::error::Error;
    use crate::language::lexer::Lexer;
    use crate::language::parser::Parser;

    /// Write sink that stays readable after the interpreter takes a clone.
    #[derive(Clone, Default)]
    struct SharedOutput(Rc<RefCell<Vec<u8>>>);

    impl SharedOutput {
        fn contents(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).expect("output should be UTF-8")
        }
    }

    impl io::Write for SharedOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn interpret(source: &str) -> (String, std::result::Result<(), Error>) {
        let (tokens, scan_errors) = Lexer::new(source).tokenize();
        assert!(scan_errors.is_empty(), "scan errors: {scan_errors:?}");
        let (statements, parse_errors) = Parser::new(tokens).parse();
        assert!(parse_errors.is_empty(), "parse errors: {parse_errors:?}");

        let output = SharedOutput::default();
        let mut interpreter = Interpreter::with_output(Box::new(output.clone()));
        let result = interpreter.interpret(&statements);
        (output.contents(), result)
    }

    fn run(source: &str) -> String {
        let (output, result) = interpret(source);
        result.expect("script should run cleanly");
        output
    }

    fn run_err(source: &str) -> (String, Error) {
        let (output, result) = interpret(source);
        (output, result.expect_err("script should fail"))
    }

    #[test]
    fn prints_literals() {
        assert_eq!(run("print 42;"), "42\n");
        assert_eq!(run("print \"Hello, world!\";"), "Hello, world!\n");
        assert_eq!(run("print nil;"), "nil\n");
    }

    #[test]
    fn booleans_print_capitalized() {
        assert_eq!(run("print true; print false; print 5 > 3;"), "True\nFalse\nTrue\n");
    }

    #[test]
    fn whole_numbers_drop_the_fraction_when_printed() {
        assert_eq!(run("print 4.0;"), "4\n");
        assert_eq!(run("print 4.5;"), "4.5\n");
        assert_eq!(run("print 10 / 4;"), "2.5\n");
        assert_eq!(run("print 8 / 2;"), "4\n");
    }

    #[test]
    fn arithmetic_follows_precedence() {
        assert_eq!(run("print 2 + 3 * 4;"), "14\n");
        assert_eq!(run("print (2 + 3) * 4;"), "20\n");
        assert_eq!(run("print 1 - 2 - 3;"), "-4\n");
    }

    #[test]
    fn plus_concatenates_strings() {
        assert_eq!(
            run("var first = \"Hello\"; var second = \"World\"; print first + \" \" + second;"),
            "Hello World\n"
        );
    }

    #[test]
    fn unary_operators() {
        assert_eq!(run("var positive = 42; print -positive;"), "-42\n");
        assert_eq!(run("print !true; print !nil; print !0;"), "False\nTrue\nFalse\n");
    }

    #[test]
    fn zero_is_truthy() {
        assert_eq!(run("if (0) print \"zero counts\";"), "zero counts\n");
        assert_eq!(run("if (\"\") print \"so does the empty string\";"), "so does the empty string\n");
    }

    #[test]
    fn declarations_default_to_nil() {
        assert_eq!(run("var x; print x;"), "nil\n");
    }

    #[test]
    fn equality_is_typed() {
        assert_eq!(run("print 1 == 1; print 1 == \"1\"; print \"a\" != \"b\";"), "True\nFalse\nTrue\n");
    }

    #[test]
    fn comparisons_require_numbers() {
        let (_, error) = run_err("print 1 < \"a\";");
        assert_eq!(error.to_string(), "[line 1] RuntimeError: Operands must be numbers.");
    }

    #[test]
    fn plus_rejects_mixed_operands() {
        let (_, error) = run_err("print 1 + \"a\";");
        assert_eq!(
            error.to_string(),
            "[line 1] RuntimeError: Operands must be two numbers or two strings."
        );
    }

    #[test]
    fn unary_minus_requires_a_number() {
        let (_, error) = run_err("print -\"a\";");
        assert_eq!(error.to_string(), "[line 1] RuntimeError: Operand must be a number.");
    }

    #[test]
    fn binary_operators_reject_nil_operands_up_front() {
        let (_, error) = run_err("print nil + 1;");
        assert_eq!(error.to_string(), "[line 1] RuntimeError: Operands must be non-null.");

        // Even equality refuses nil operands before its own rule applies.
        let (_, error) = run_err("print nil == nil;");
        assert_eq!(error.to_string(), "[line 1] RuntimeError: Operands must be non-null.");
    }

    #[test]
    fn and_short_circuits_on_a_falsy_left() {
        let output = run(
            "var sideEffect = false;\n\
             var result = false and (sideEffect = true);\n\
             print result;\n\
             print sideEffect;",
        );
        assert_eq!(output, "False\nFalse\n");
    }

    #[test]
    fn or_short_circuits_on_a_truthy_left() {
        let output = run(
            "var sideEffect = false;\n\
             var result = true or (sideEffect = true);\n\
             print result;\n\
             print sideEffect;",
        );
        assert_eq!(output, "True\nFalse\n");
    }

    #[test]
    fn logical_operators_evaluate_the_right_when_needed() {
        let output = run(
            "var sideEffect = false;\n\
             var result = true and (sideEffect = true);\n\
             print result;\n\
             print sideEffect;",
        );
        assert_eq!(output, "True\nTrue\n");
    }

    #[test]
    fn logical_operators_return_operand_values() {
        assert_eq!(run("print \"hello\" or \"world\";"), "hello\n");
        assert_eq!(run("print nil or \"default\";"), "default\n");
        assert_eq!(run("print \"first\" and \"second\";"), "second\n");
        assert_eq!(run("print false and \"never\";"), "False\n");
    }

    #[test]
    fn blocks_shadow_and_restore_variables() {
        let output = run(
            "var x = \"outer\";\n\
             {\n\
                 var x = \"inner\";\n\
                 print x;\n\
             }\n\
             print x;",
        );
        assert_eq!(output, "inner\nouter\n");
    }

    #[test]
    fn nested_blocks_resolve_through_the_whole_chain() {
        let output = run(
            "var a = \"global a\";\n\
             var b = \"global b\";\n\
             var c = \"global c\";\n\
             {\n\
                 var a = \"outer a\";\n\
                 var b = \"outer b\";\n\
                 {\n\
                     var a = \"inner a\";\n\
                     print a; print b; print c;\n\
                 }\n\
                 print a; print b; print c;\n\
             }\n\
             print a; print b; print c;",
        );
        assert_eq!(
            output,
            "inner a\nouter b\nglobal c\nouter a\nouter b\nglobal c\nglobal a\nglobal b\nglobal c\n"
        );
    }

    #[test]
    fn empty_blocks_are_a_no_op() {
        assert_eq!(run("var x = \"before\"; { } print x;"), "before\n");
    }

    #[test]
    fn redefinition_in_the_same_scope_stops_the_batch() {
        let (output, error) = run_err("var x = 10;\nprint x;\nvar x = 20;\nprint x;");
        assert_eq!(output, "10\n");
        assert_eq!(
            error.to_string(),
            "[line 3] RuntimeError: Variable 'x' is already defined at line 1."
        );
    }

    #[test]
    fn shadowing_across_scopes_is_not_a_redefinition() {
        assert_eq!(run("var x = 1; { var x = 2; print x; } print x;"), "2\n1\n");
    }

    #[test]
    fn undefined_variable_reads_fail() {
        let (output, error) = run_err("print undeclared;");
        assert_eq!(output, "");
        assert_eq!(
            error.to_string(),
            "[line 1] RuntimeError: Undefined variable 'undeclared'."
        );
    }

    #[test]
    fn assignment_requires_an_existing_binding() {
        let (_, error) = run_err("ghost = 1;");
        assert_eq!(
            error.to_string(),
            "[line 1] RuntimeError: Undefined variable 'ghost'."
        );
    }

    #[test]
    fn assignment_chains_through_every_target() {
        let output = run("var a; var b; var c; c = b = a = 42; print a; print b; print c;");
        assert_eq!(output, "42\n42\n42\n");
    }

    #[test]
    fn assignment_from_an_inner_block_reaches_the_outer_binding() {
        assert_eq!(run("var x = 1; { x = 2; } print x;"), "2\n");
    }

    #[test]
    fn if_takes_exactly_one_branch() {
        assert_eq!(run("if (1 < 2) print \"then\"; else print \"else\";"), "then\n");
        assert_eq!(run("if (1 > 2) print \"then\"; else print \"else\";"), "else\n");
        assert_eq!(run("if (1 > 2) print \"then\";"), "");
    }

    #[test]
    fn while_loops_run_until_the_condition_turns_falsy() {
        assert_eq!(run("var i = 3; while (i > 0) { print i; i = i - 1; }"), "3\n2\n1\n");
        assert_eq!(run("var i = 1; while (i < 4) i = i + 1; print i;"), "4\n");
        assert_eq!(run("while (false) print \"never\"; print \"after loop\";"), "after loop\n");
    }

    #[test]
    fn for_loops_count_as_expected() {
        assert_eq!(run("for (var i = 0; i < 3; i = i + 1) print i;"), "0\n1\n2\n");
    }

    #[test]
    fn nested_for_loops_cover_the_grid() {
        let output = run(
            "for (var i = 0; i < 2; i = i + 1)\n\
                 for (var j = 0; j < 2; j = j + 1)\n\
                     print i * 2 + j;",
        );
        assert_eq!(output, "0\n1\n2\n3\n");
    }

    #[test]
    fn for_loop_variable_stays_inside_the_loop() {
        let (_, error) = run_err("for (var i = 0; i < 1; i = i + 1) { } print i;");
        assert_eq!(
            error.to_string(),
            "[line 1] RuntimeError: Undefined variable 'i'."
        );
    }

    #[test]
    fn for_loop_over_an_existing_variable() {
        assert_eq!(run("var i; for (i = 5; i < 8; i = i + 1) print i;"), "5\n6\n7\n");
    }

    #[test]
    fn statements_after_a_runtime_error_do_not_run() {
        let (output, _) = run_err("print 1; print undeclared; print 2;");
        assert_eq!(output, "1\n");
    }

    #[test]
    fn a_failed_block_still_drops_its_frame() {
        let output = SharedOutput::default();
        let mut interpreter = Interpreter::with_output(Box::new(output.clone()));

        let parse = |source: &str| {
            let (tokens, _) = Lexer::new(source).tokenize();
            Parser::new(tokens).parse().0
        };

        let failing = parse("var x = \"outer\"; { var x = \"inner\"; print undeclared; }");
        assert!(interpreter.interpret(&failing).is_err());

        // The global frame is intact and the inner shadow is gone.
        let follow_up = parse("print x;");
        assert!(interpreter.interpret(&follow_up).is_ok());
        assert_eq!(output.contents(), "outer\n");
    }
}
