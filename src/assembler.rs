// Program assembler
// Routes translated fragments either into the function region (written as
// they arrive) or into the buffered top-level statements that become `main`.

use std::io::Write;

use tracing::{debug, warn};

use crate::error::Result;
use crate::translator::{translate, Fragment};

const INCLUDE: &str = "#include <stdio.h>";

/// How unpaired block closers and unterminated functions are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlockPolicy {
    /// Stray `ENDFUNCTION` is dropped, a `FUNCTION` inside a function is
    /// written as-is and a function still open at end of input stays open.
    #[default]
    Lenient,
    /// Stray `ENDFUNCTION` and nested `FUNCTION` become diagnostics and an
    /// unterminated function is closed at end of input.
    Strict,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblerOptions {
    pub block_policy: BlockPolicy,
}

/// Cross-line translation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyState {
    pub in_function: bool,
    pub function_count: usize,
    /// Statements seen outside any function, in encounter order.
    pub pending_top_level: Vec<String>,
}

pub struct Assembler<W: Write> {
    out: W,
    options: AssemblerOptions,
    state: AssemblyState,
    line_number: usize,
}

impl<W: Write> Assembler<W> {
    pub fn new(out: W) -> Result<Self> {
        Self::with_options(out, AssemblerOptions::default())
    }

    /// Starts a session and writes the include header.
    pub fn with_options(out: W, options: AssemblerOptions) -> Result<Self> {
        let mut assembler = Assembler {
            out,
            options,
            state: AssemblyState::default(),
            line_number: 0,
        };
        assembler.emit_line(0, INCLUDE)?;
        assembler.emit_newline()?;
        Ok(assembler)
    }

    pub fn state(&self) -> &AssemblyState {
        &self.state
    }

    /// Translate one source line and route the result.
    pub fn push_line(&mut self, line: &str) -> Result<()> {
        self.line_number += 1;
        let fragment = translate(line.trim());
        debug!(
            line = self.line_number,
            in_function = self.state.in_function,
            "processing {:?}",
            fragment
        );
        self.route(fragment)
    }

    fn route(&mut self, fragment: Fragment) -> Result<()> {
        let strict = self.options.block_policy == BlockPolicy::Strict;
        match fragment {
            Fragment::FunctionOpen(_) if self.state.in_function && strict => {
                self.route_statement("// Syntax error: FUNCTION inside function".to_string())
            }
            Fragment::FunctionOpen(signature) => {
                debug!(line = self.line_number, "function definition: {}", signature);
                self.emit_line(0, &signature)?;
                self.state.in_function = true;
                self.state.function_count += 1;
                Ok(())
            }
            Fragment::FunctionClose if self.state.in_function => {
                debug!(line = self.line_number, "function end");
                self.close_function()
            }
            Fragment::FunctionClose if strict => self.route_statement(
                "// Syntax error: ENDFUNCTION outside of function".to_string(),
            ),
            Fragment::FunctionClose => {
                warn!(line = self.line_number, "ENDFUNCTION outside of a function ignored");
                Ok(())
            }
            other => self.route_statement(other.to_string()),
        }
    }

    fn route_statement(&mut self, text: String) -> Result<()> {
        if self.state.in_function {
            debug!(line = self.line_number, "statement in function: {}", text);
            self.emit_line(1, &text)
        } else {
            debug!(line = self.line_number, "statement buffered for main: {}", text);
            self.state.pending_top_level.push(text);
            Ok(())
        }
    }

    fn close_function(&mut self) -> Result<()> {
        self.emit_line(0, "}")?;
        self.emit_newline()?;
        self.state.in_function = false;
        Ok(())
    }

    /// Ends the session: writes the synthesized entry point, flushes and
    /// hands back the sink.
    pub fn finish(mut self) -> Result<W> {
        if self.state.in_function {
            warn!(
                function_count = self.state.function_count,
                "input ended inside a function body"
            );
            if self.options.block_policy == BlockPolicy::Strict {
                self.close_function()?;
            }
        }

        let statements = std::mem::take(&mut self.state.pending_top_level);
        if !statements.is_empty() || self.state.function_count == 0 {
            self.emit_line(0, "int main() {")?;
            for statement in &statements {
                self.emit_line(1, statement)?;
            }
            self.emit_line(1, "return 0;")?;
            self.emit_line(0, "}")?;
        }

        self.out.flush()?;
        Ok(self.out)
    }

    fn emit_line(&mut self, indent: usize, s: &str) -> Result<()> {
        for _ in 0..indent {
            self.out.write_all(b"  ")?;
        }
        self.out.write_all(s.as_bytes())?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn emit_newline(&mut self) -> Result<()> {
        self.out.write_all(b"\n")?;
        Ok(())
    }
}
