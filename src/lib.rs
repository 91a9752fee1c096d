pub mod assembler;
pub mod error;
pub mod translator;

use std::io::{BufRead, Write};

pub use assembler::{Assembler, AssemblerOptions, AssemblyState, BlockPolicy};
pub use error::{Error, Result};
pub use translator::{translate, Fragment, LineError};

/// Translate a whole BASIC program held in memory to C source.
pub fn transpile(source: &str) -> Result<String> {
    transpile_with(source, AssemblerOptions::default())
}

pub fn transpile_with(source: &str, options: AssemblerOptions) -> Result<String> {
    let mut assembler = Assembler::with_options(Vec::new(), options)?;
    for line in source.lines() {
        assembler.push_line(line)?;
    }
    let bytes = assembler.finish()?;
    Ok(String::from_utf8(bytes)?)
}

/// Translate every line of `reader` into `writer`, returning the writer once
/// the entry point has been written.
pub fn assemble<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    options: AssemblerOptions,
) -> Result<W> {
    let mut assembler = Assembler::with_options(writer, options)?;
    for line in reader.lines() {
        assembler.push_line(&line?)?;
    }
    assembler.finish()
}
