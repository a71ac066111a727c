//! Brio CLI

use brio::ast::Program;
use brio::codegen::{Backend, LlvmBackend, RustBackend};
use brio::error::report_error;
use brio::interp::Interpreter;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "brio", version, about = "Brio - tiny loop language toolchain")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a program with the tree-walking interpreter
    Run {
        /// Source file to run
        file: PathBuf,
        /// Numeric arguments bound to arg1, arg2, ...
        args: Vec<String>,
    },
    /// Generate code for a target backend
    Emit {
        /// Source file to compile
        file: PathBuf,
        /// Backend to emit for
        #[arg(long, value_enum, default_value_t = Target::Llvm)]
        target: Target,
    },
    /// Parse and dump AST (debug)
    Parse {
        /// Source file to parse
        file: PathBuf,
    },
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Target {
    /// Textual LLVM IR calling the brio_* runtime
    Llvm,
    /// Rust source driving the brio library directly
    Rust,
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Llvm => write!(f, "llvm"),
            Target::Rust => write!(f, "rust"),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run { file, args } => run_file(&file, &args),
        Command::Emit { file, target } => emit_file(&file, target),
        Command::Parse { file } => parse_file(&file),
        Command::Tokens { file } => tokenize_file(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Load, tokenize and parse a source file; compile errors are reported
/// with source context and terminate the process.
fn load_program(path: &PathBuf) -> Result<(Program, String), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();

    let tokens = match brio::lexer::tokenize(&source) {
        Ok(tokens) => tokens,
        Err(e) => {
            report_error(&filename, &source, &e);
            std::process::exit(1);
        }
    };

    let ast = match brio::parser::parse(&filename, &source, tokens) {
        Ok(ast) => ast,
        Err(e) => {
            report_error(&filename, &source, &e);
            std::process::exit(1);
        }
    };

    Ok((ast, source))
}

fn run_file(path: &PathBuf, args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let (ast, _) = load_program(path)?;

    let mut interp = Interpreter::new();
    interp.bind_args(args)?;
    interp.run(&ast)?;
    Ok(())
}

fn emit_file(path: &PathBuf, target: Target) -> Result<(), Box<dyn std::error::Error>> {
    let (ast, source) = load_program(path)?;

    let backend: Box<dyn Backend> = match target {
        Target::Llvm => Box::new(LlvmBackend::new()),
        Target::Rust => Box::new(RustBackend),
    };

    match backend.generate(&ast) {
        Ok(output) => {
            print!("{output}");
            Ok(())
        }
        Err(e) => {
            let filename = path.display().to_string();
            let compile_error = match e.span() {
                Some(span) => brio::CompileError::codegen(format!("{e}"), span),
                None => brio::CompileError::io_error(format!("{e}")),
            };
            report_error(&filename, &source, &compile_error);
            std::process::exit(1);
        }
    }
}

fn parse_file(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let (ast, _) = load_program(path)?;
    println!("{}", serde_json::to_string_pretty(&ast)?);
    Ok(())
}

fn tokenize_file(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;

    let tokens = brio::lexer::tokenize(&source)?;
    for (tok, span) in &tokens {
        println!("{:?} @ {}..{}", tok, span.start, span.end);
    }

    Ok(())
}
