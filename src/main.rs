use std::{fs::read_to_string, path::PathBuf, process::ExitCode, rc::Rc, time::Instant};

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sigh::{
    ast::ast::Program, errors::errors::Error, lexer::lexer::tokenize, parser::parser::parse,
    render_error, type_checker::type_checker::{type_check, TypeChecker},
};

/// Semantic analysis for sigh programs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The source file to analyse.
    file: PathBuf,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Print the type of every top-level declaration.
    #[arg(long)]
    dump_types: bool,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report(errors: &[Error], source: &str) -> ExitCode {
    for error in errors {
        println!("{}", render_error(error, source));
    }
    ExitCode::FAILURE
}

fn dump_types(program: &Program, checker: &TypeChecker) {
    for stmt in &program.body {
        let Some(declaration) = checker.declared_by(stmt.id()) else {
            continue;
        };

        let name = &checker.declaration(declaration).name;
        match checker.declaration_type(declaration) {
            Some(ty) => println!("{}: {}", name, ty),
            None => println!("{}: <unknown>", name),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let file_name = cli
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.file.to_string_lossy().into_owned());

    let source = match read_to_string(&cli.file) {
        Ok(source) => source,
        Err(err) => {
            error!(file = %cli.file.display(), %err, "failed to read source file");
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();

    let tokens = match tokenize(source.clone(), Some(file_name.clone())) {
        Ok(tokens) => tokens,
        Err(error) => return report(&[error], &source),
    };
    info!(elapsed = ?start.elapsed(), tokens = tokens.len(), "tokenized");

    let parse_start = Instant::now();
    let program = match parse(tokens, Rc::new(file_name)).1 {
        Ok(program) => program,
        Err(error) => return report(&[error], &source),
    };
    info!(elapsed = ?parse_start.elapsed(), statements = program.body.len(), "parsed");

    let check_start = Instant::now();
    let (checker, errors) = type_check(&program);
    info!(elapsed = ?check_start.elapsed(), errors = errors.len(), "type checked");
    info!(elapsed = ?start.elapsed(), "analysis finished");

    if !errors.is_empty() {
        return report(&errors, &source);
    }

    if cli.dump_types {
        dump_types(&program, &checker);
    }
    println!("ok");

    ExitCode::SUCCESS
}
