//! milac-drv - compiler driver
//!
//! ============================================================================
//! PIPELINE
//! ============================================================================
//!
//! ```text
//! Source text (file or stdin)
//!        │
//!        ▼
//!   [milac-par::parse_program] ──▶ AST
//!        │
//!        ▼
//!   [milac-ir::lower_program]  ──▶ IR module
//!        │
//!        ▼
//!   [Display printer]          ──▶ textual IR (file or stdout)
//! ```
//!
//! Single-threaded and synchronous: each phase runs to completion before the
//! next starts, and any diagnostic reported along the way aborts the whole
//! compilation. `--emit-ast` stops after parsing and dumps the AST instead.

use std::io::Read as _;
use std::path::PathBuf;

use clap::Parser as ClapParser;
use thiserror::Error;

use milac_util::diagnostic::Handler;
use milac_util::span::{FileId, SourceMap};

pub use milac_ir::Module;
pub use milac_par::Program;

/// Command-line configuration, parsed with `clap`'s derive API.
#[derive(ClapParser, Debug, Clone)]
#[command(name = "milac", version, about = "Single-pass compiler front end for the Mila language")]
pub struct Config {
    /// Source file to compile; omitted means read from standard input.
    pub input: Option<PathBuf>,

    /// Where to write the lowered IR; omitted means standard output.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Raise log verbosity (repeatable: `-v` is info, `-vv` is debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all but error-level logs.
    #[arg(short, long)]
    pub quiet: bool,

    /// Dump the parsed AST instead of lowering it.
    #[arg(long)]
    pub emit_ast: bool,
}

impl Config {
    /// Default log level implied by `-v`/`-q`, overridden by `MILAC_LOG` if set.
    fn default_filter(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                _ => "debug",
            }
        }
    }

    /// Installs the process-wide `tracing` subscriber. Safe to call more than
    /// once per process (e.g. across integration tests run in one binary).
    pub fn init_logging(&self) -> anyhow::Result<()> {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_env("MILAC_LOG")
            .unwrap_or_else(|_| EnvFilter::new(self.default_filter()));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .try_init();
        Ok(())
    }
}

/// One compilation's state: the loaded source, its source map (for rendering
/// diagnostics), and the diagnostic handler every pipeline stage reports
/// through. There is exactly one source file per session — this front-end
/// does not compile multi-file programs.
pub struct Session {
    source: String,
    handler: Handler,
    source_map: SourceMap,
    file_id: FileId,
}

impl Session {
    /// Loads the session's source text from `input`, or from standard input
    /// when `input` is `None`.
    pub fn from_input(input: Option<&PathBuf>) -> Result<Self, CompileError> {
        let (name, source) = match input {
            Some(path) => {
                tracing::debug!(path = %path.display(), "reading source file");
                let content = std::fs::read_to_string(path)
                    .map_err(|e| CompileError::Io(path.clone(), e))?;
                (path.display().to_string(), content)
            },
            None => {
                tracing::debug!("reading source from stdin");
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .map_err(|e| CompileError::Io(PathBuf::from("<stdin>"), e))?;
                ("<stdin>".to_string(), buf)
            },
        };

        let mut source_map = SourceMap::new();
        let file_id = source_map.add_file(name, source.clone());

        Ok(Self { source, handler: Handler::new(), source_map, file_id })
    }

    /// Parses the session's source, reporting diagnostics but not lowering.
    pub fn parse(&mut self) -> Result<Program, CompileError> {
        match milac_par::parse_program(&self.source, &mut self.handler) {
            Some(program) if !self.handler.has_errors() => Ok(program),
            _ => self.fail(),
        }
    }

    /// Runs the whole pipeline: parse, then lower to IR.
    pub fn compile(&mut self) -> Result<Module, CompileError> {
        let program = milac_par::parse_program(&self.source, &mut self.handler);
        let module = match &program {
            Some(program) if !self.handler.has_errors() => {
                milac_ir::lower_program(program, &mut self.handler)
            },
            _ => None,
        };

        match module {
            Some(module) if !self.handler.has_errors() => Ok(module),
            _ => self.fail(),
        }
    }

    fn fail<T>(&self) -> Result<T, CompileError> {
        self.report_diagnostics();
        Err(CompileError::CompilationFailed(self.handler.error_count()))
    }

    fn report_diagnostics(&self) {
        for diag in self.handler.diagnostics() {
            let mut span = diag.span;
            span.file_id = self.file_id;
            match self.source_map.format_span(span) {
                Some(rendered) => eprintln!("{}: {}\n{}", diag.level, diag.message, rendered),
                None => eprintln!("{}: {}", diag.level, diag.message),
            }
        }
    }
}

/// Top-level driver error.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to read {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("compilation failed with {0} diagnostic(s)")]
    CompilationFailed(usize),
}

/// Runs the compiler for a parsed [`Config`]. Writes the requested artifact
/// (AST or lowered IR) to `output`, or standard output when none is given.
pub fn run(config: Config) -> anyhow::Result<()> {
    config.init_logging()?;

    let mut session = Session::from_input(config.input.as_ref())?;

    let rendered = if config.emit_ast {
        let program = session.parse()?;
        format!("{:#?}", program)
    } else {
        let module = session.compile()?;
        module.to_string()
    };

    write_output(&rendered, config.output.as_ref())?;
    Ok(())
}

fn write_output(text: &str, output: Option<&PathBuf>) -> Result<(), CompileError> {
    match output {
        Some(path) => std::fs::write(path, text).map_err(|e| CompileError::Io(path.clone(), e)),
        None => {
            println!("{}", text);
            Ok(())
        },
    }
}
