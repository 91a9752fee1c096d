// basic-c: BASIC → C translator

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use basic_c::{assemble, Assembler, AssemblerOptions, BlockPolicy};

const PROMPT: &str = "BASIC> ";

#[derive(Parser)]
#[command(
    name = env!("CARGO_BIN_NAME"),
    about = "Translate a line-oriented BASIC program into a C source file",
    version
)]
struct Args {
    /// BASIC source file; standard input is read when omitted
    input: Option<PathBuf>,

    /// Where to write the generated C program ("-" for standard output)
    #[arg(short, long, default_value = "output.c")]
    output: PathBuf,

    /// Report stray ENDFUNCTION and nested FUNCTION lines, and close a
    /// function left open at end of input
    #[arg(long)]
    strict_blocks: bool,

    /// Log every translated line
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let options = AssemblerOptions {
        block_policy: if args.strict_blocks {
            BlockPolicy::Strict
        } else {
            BlockPolicy::Lenient
        },
    };

    let source_name = match &args.input {
        Some(path) => path.display().to_string(),
        None => "standard input".to_string(),
    };
    let reader: Option<Box<dyn BufRead>> = match &args.input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Cannot read '{}'", path.display()))?;
            Some(Box::new(BufReader::new(file)))
        }
        None if io::stdin().is_terminal() => None,
        None => Some(Box::new(io::stdin().lock())),
    };

    let to_stdout = args.output == Path::new("-");
    let writer: Box<dyn Write> = if to_stdout {
        Box::new(io::stdout().lock())
    } else {
        let file = File::create(&args.output)
            .with_context(|| format!("Cannot create '{}'", args.output.display()))?;
        Box::new(BufWriter::new(file))
    };

    let translated = match reader {
        Some(reader) => assemble(reader, writer, options).map(drop),
        None => run_console(io::stdin().lock(), io::stderr(), writer, options).map(drop),
    };
    translated.with_context(|| format!("Failed to translate {}", source_name))?;

    if !to_stdout {
        eprintln!(
            "Translation complete. Output written to {}",
            args.output.display()
        );
    }
    Ok(())
}

/// Interactive loop: prompt, read one line, translate it, until end of input.
/// Prompts go to their own sink so `-o -` output stays clean.
fn run_console<R: BufRead, P: Write, W: Write>(
    mut input: R,
    mut prompts: P,
    writer: W,
    options: AssemblerOptions,
) -> basic_c::Result<W> {
    let mut assembler = Assembler::with_options(writer, options)?;
    let mut line = String::new();
    loop {
        write!(prompts, "{}", PROMPT)?;
        prompts.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        assembler.push_line(&line)?;
    }
    writeln!(prompts)?;
    assembler.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_prompts_stay_out_of_generated_program() {
        let mut prompts = Vec::new();
        let program = run_console(
            "PRINT 1\nPRINT 2\n".as_bytes(),
            &mut prompts,
            Vec::new(),
            AssemblerOptions::default(),
        )
        .unwrap();

        let program = String::from_utf8(program).unwrap();
        assert!(!program.contains(PROMPT));
        assert!(program.contains("  printf(\"%d\\n\", 2);\n"));
        assert_eq!(String::from_utf8(prompts).unwrap(), "BASIC> ".repeat(3) + "\n");
    }
}
