//! Manr CLI application entry point
//!
//! Finds manual pages and shows them on standard output or through a pager.
//! The binary behaves as `man`, `apropos`, `whatis` or `mandoc` depending on
//! the name it is invoked as.
//!
//! # Usage
//!
//! ```bash
//! # Show the best page for a name
//! manr ls
//!
//! # Every page, section given positionally
//! manr -a 3 printf
//!
//! # Only the synopsis
//! manr -h cat
//!
//! # Paths of the matching pages
//! manr -w ls
//!
//! # Render a file directly
//! manr -l ./page.1
//! ```
//!
//! # Configuration
//!
//! Settings are read from `~/.config/manr/config.toml` on Linux, or from the
//! file given with `-C`. Log output goes to stderr and is controlled by the
//! `MANR_LOG` environment variable.

use std::io::{self, IsTerminal};
use std::path::Path;
use std::process::ExitCode;

use clap::CommandFactory;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use manr::cli::Cli;
use manr::commands::{self, Context};
use manr::config::ManConfig;
use manr::delivery::Delivery;
use manr::index::NoIndex;
use manr::output;
use manr::query::{self, MatchMode};
use manr::render::{CommandRenderer, Renderer, VerbatimRenderer};
use manr::resolve::{Resolver, XrefContext};
use manr::search_path::{SearchPath, SearchPathSources};
use manr::{ExitLevel, ManrError};

const LOG_ENV: &str = "MANR_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .try_init()
        .ok();
}

/// Name the program was invoked as, for mode selection and messages
fn program_name() -> String {
    std::env::args_os()
        .next()
        .and_then(|arg| {
            Path::new(&arg)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "manr".to_string())
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse_args();
    let program = program_name();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "manr", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    let level = match run(&cli, &program) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("{program}: {e}");
            e.level()
        }
    };
    ExitCode::from(level.code())
}

fn run(cli: &Cli, program: &str) -> Result<ExitLevel, ManrError> {
    let invocation = cli.invocation(program, &query::default_arch())?;
    let config = ManConfig::load(cli.config.as_deref())?;

    let manpath = std::env::var("MANPATH").ok();
    let paths = SearchPath::assemble(&SearchPathSources {
        auxiliary: cli.aux_manpath.as_deref(),
        explicit: cli.manpath.as_deref(),
        environment: manpath.as_deref(),
        configured: &config.manpath,
    });

    let terminal = io::stdout().is_terminal();
    let paging = invocation.paging && terminal;
    let columns = if paging { output::terminal_columns() } else { None };
    let width = output::output_width(invocation.width.or(config.width), columns);

    let renderer: Box<dyn Renderer> = match config.formatter.as_deref().and_then(CommandRenderer::parse) {
        Some(formatter) => Box::new(formatter),
        None => Box::new(VerbatimRenderer),
    };
    let resolver = Resolver::system();
    let xrefs = (invocation.check_xrefs || config.check_xrefs).then(XrefContext::default);
    let context = Context {
        paths: &paths,
        index: &NoIndex,
        resolver: &resolver,
        renderer: renderer.as_ref(),
        xrefs: xrefs.as_ref(),
        width,
        color: terminal,
    };

    let mut delivery = Delivery::stdout(paging, invocation.tag.clone());
    let report = if invocation.query.mode == MatchMode::File {
        commands::file(&context, &invocation, &mut delivery, io::stdin().lock())
    } else {
        commands::lookup(&context, &invocation, &mut delivery)
    };

    for diagnostic in &report.diagnostics {
        eprintln!("{program}: {diagnostic}");
    }
    let mut level = report.level;

    if let Some(e) = report.fatal {
        eprintln!("{program}: {e}");
        if let Err(cleanup) = delivery.abandon() {
            warn!("{cleanup}");
        }
        return Ok(level);
    }

    if let Err(e) = commands::finish(delivery, config.pager.as_deref()) {
        eprintln!("{program}: {e}");
        level.raise(e.level());
    }
    Ok(level)
}
