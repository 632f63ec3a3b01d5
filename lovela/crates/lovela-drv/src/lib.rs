//! Compiler driver: turns CLI arguments into a `Session`, runs the
//! lex/parse/emit pipeline over a single source, and pretty-prints any
//! diagnostics that came out of it.
//!
//! ```text
//! source text
//!      |
//!      v
//! [ Lexer ]  --> token stream
//!      |
//!      v
//! [ Parser ] --> declaration forest
//!      |
//!      v
//! [ Emitter ] --> program stream + imports/exports headers
//! ```
//!
//! Every stage accumulates diagnostics rather than aborting; the driver is
//! the only place that decides whether the run succeeded.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::{Parser as ClapParser, ValueEnum};
use lovela_gen::Emitter;
use lovela_lex::Lexer;
use lovela_par::Parser;
use lovela_util::diagnostic::Level;
use lovela_util::{Diagnostic, FileId, SourceMap};

/// `lovela` — reads a program from stdin (or a file), emits the generated
/// program to stdout (or a file), and optionally writes out the companion
/// headers.
#[derive(Debug, ClapParser)]
#[command(name = "lovela", version, about = "Compiles lovela source into a C-family target")]
pub struct Cli {
    /// Input source file. Omit, or pass `-`, to read from stdin.
    pub input: Option<PathBuf>,

    /// Where to write the generated program. Defaults to stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Where to write the generated imports header, if at all.
    #[arg(long, value_name = "FILE")]
    pub imports_header: Option<PathBuf>,

    /// Where to write the generated exports header, if at all.
    #[arg(long, value_name = "FILE")]
    pub exports_header: Option<PathBuf>,

    /// Raise the tracing log level: one `-v` is `info`, two is `debug`.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Default dialect hint for diagnostics text; the source's own
    /// api-prefix strings still fully determine the actual dialect.
    #[arg(long, value_enum, default_value_t = Dialect::C)]
    pub dialect: Dialect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Dialect {
    C,
    Cpp,
}

impl Cli {
    /// `0` = basic warn-level logging, `1` = info, `2+` = debug.
    fn tracing_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        }
    }
}

/// Parsed CLI arguments plus the loaded source, ready to run the pipeline.
pub struct Session {
    cli: Cli,
    sources: SourceMap,
    file_id: FileId,
}

impl Session {
    pub fn new(cli: Cli) -> anyhow::Result<Self> {
        let text = read_input(cli.input.as_deref())?;
        let name = cli.input.clone().unwrap_or_else(|| PathBuf::from("<stdin>"));

        let mut sources = SourceMap::new();
        let file_id = sources.add_file(name, text);

        Ok(Session { cli, sources, file_id })
    }

    /// Runs the pipeline end to end, writes every requested output, and
    /// returns whether any `Error`-level diagnostic was recorded (the
    /// driver's sole criterion for a non-zero exit code).
    pub fn run(&self) -> anyhow::Result<bool> {
        let source = &self.sources.file(self.file_id).expect("session always has its one file").text;

        let lexer = Lexer::with_file(source, self.file_id);
        let parser = Parser::from_lexer(lexer, self.file_id);
        let (decls, parse_diagnostics) = parser.parse();

        let mut emitter = Emitter::new();
        emitter.emit_program(&decls);

        let mut had_errors = parse_diagnostics.has_errors();
        for diagnostic in parse_diagnostics {
            self.report(&diagnostic);
        }

        had_errors |= emitter.diagnostics().has_errors();
        for diagnostic in emitter.diagnostics().iter() {
            self.report(diagnostic);
        }

        self.write_output(self.cli.output.as_deref(), &emitter.render_program_file())?;

        if let Some(path) = &self.cli.imports_header {
            fs::write(path, emitter.render_imports_file())?;
        }
        if let Some(path) = &self.cli.exports_header {
            fs::write(path, emitter.render_exports_file())?;
        }

        Ok(had_errors)
    }

    fn write_output(&self, path: Option<&std::path::Path>, content: &str) -> anyhow::Result<()> {
        match path {
            Some(path) => fs::write(path, content).map_err(Into::into),
            None => {
                io::stdout().write_all(content.as_bytes())?;
                Ok(())
            }
        }
    }

    /// Renders one diagnostic to stderr, rustc-style: code, level, message,
    /// then a `-->` location line and the quoted source excerpt with a
    /// caret under the offending column.
    fn report(&self, diagnostic: &Diagnostic) {
        let level = match diagnostic.level {
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Note => "note",
            Level::Help => "help",
        };

        let code = diagnostic
            .code
            .map(|c| format!("[{c}]"))
            .unwrap_or_default();
        eprintln!("{level}{code}: {}", diagnostic.message);

        let span = diagnostic.span;
        let file_name = self
            .sources
            .file(span.file_id)
            .map(|f| f.name.display().to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        eprintln!("  --> {file_name}:{}:{}", span.line, span.column);

        if let Some(line) = self.sources.line(span.file_id, span.line) {
            eprintln!("   |");
            eprintln!("{:>3}| {line}", span.line);
            let caret_offset = (span.column.saturating_sub(1)) as usize;
            eprintln!("   | {}^", " ".repeat(caret_offset));
        }

        for note in &diagnostic.notes {
            eprintln!("   = note: {note}");
        }
        for help in &diagnostic.helps {
            eprintln!("   = help: {help}");
        }
    }
}

fn read_input(path: Option<&std::path::Path>) -> anyhow::Result<String> {
    match path {
        None => read_stdin(),
        Some(path) if path.as_os_str() == "-" => read_stdin(),
        Some(path) => fs::read_to_string(path).map_err(Into::into),
    }
}

fn read_stdin() -> anyhow::Result<String> {
    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;
    Ok(text)
}

/// Entry point shared by `main.rs`: parses arguments, sets up tracing,
/// runs the session, and returns the process exit code.
pub fn run() -> anyhow::Result<i32> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.tracing_level())
        .with_writer(io::stderr)
        .without_time()
        .init();

    let session = Session::new(cli)?;
    let had_errors = session.run()?;

    Ok(if had_errors { 1 } else { 0 })
}
