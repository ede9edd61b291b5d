//! Command-line interface definitions and parsing
//!
//! This module defines the CLI of manr using the `clap` crate and turns the
//! parsed flags into an `Invocation`: the query, the output mode and the
//! delivery settings of one run.
//!
//! # Modes
//!
//! - **man**: look pages up by name (default)
//! - **whatis** (`-f`): match page names as keywords, list the matches
//! - **apropos** (`-k`): match names and descriptions, list the matches
//! - **mandoc** (`-l`): render the named files, or standard input
//!
//! The program name picks the default mode, so the binary can be linked
//! under each of these names.
//!
//! # Examples
//!
//! ```no_run
//! use manr::cli::Cli;
//!
//! let cli = Cli::parse_args();
//! let invocation = cli.invocation("man", "amd64").unwrap();
//! ```

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use clap_complete::Shell;

use crate::ManrError;
use crate::output::OutputMode;
use crate::query::{self, MatchMode, Query};

/// Arguments used when invoked as `help` without any
const HELP_PAGE: &str = "help";

#[derive(Parser, Debug, Default)]
#[command(name = "manr")]
#[command(version, about = "Find and display manual pages", long_about = None)]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// Show every matching page, not just the best one
    #[arg(short = 'a')]
    pub all: bool,

    /// Write to standard output instead of a pager
    #[arg(short = 'c')]
    pub no_pager: bool,

    /// Match page names as keywords (whatis)
    #[arg(short = 'f', conflicts_with = "apropos")]
    pub whatis: bool,

    /// Match names and descriptions (apropos)
    #[arg(short = 'k')]
    pub apropos: bool,

    /// Treat the arguments as files to render
    #[arg(short = 'l')]
    pub local: bool,

    /// Print the paths of the matching pages
    #[arg(short = 'w')]
    pub paths: bool,

    /// Show only the SYNOPSIS of each page
    #[arg(short = 'h')]
    pub synopsis: bool,

    /// Colon-separated manual roots, replacing MANPATH
    #[arg(short = 'M', value_name = "PATH")]
    pub manpath: Option<String>,

    /// Colon-separated manual roots searched first
    #[arg(short = 'm', value_name = "PATH")]
    pub aux_manpath: Option<String>,

    /// Architecture for machine-dependent pages
    #[arg(short = 'S', value_name = "ARCH")]
    pub arch: Option<String>,

    /// Restrict the lookup to one section
    #[arg(short = 's', value_name = "SECTION")]
    pub section: Option<String>,

    /// Output options: tag[=term], width=N
    #[arg(short = 'O', value_name = "OPTIONS", value_delimiter = ',')]
    pub options: Vec<String>,

    /// Configuration file to use instead of the default one
    #[arg(short = 'C', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report cross references to pages that do not exist
    #[arg(long = "check-xrefs")]
    pub check_xrefs: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,

    /// Print help
    #[arg(long = "help", action = ArgAction::Help)]
    pub help: Option<bool>,

    /// Page names, keywords or files
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,
}

/// Output options given with `-O`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// `Some("")` for a bare `tag`, meaning the first query term
    pub tag: Option<String>,
    pub width: Option<usize>,
}

impl OutputOptions {
    /// Parse `-O` values
    ///
    /// # Errors
    /// Returns `ManrError::InvalidInput` for unknown options or a bad width.
    pub fn parse(options: &[String]) -> Result<Self, ManrError> {
        let mut parsed = Self::default();
        for option in options.iter().filter(|o| !o.is_empty()) {
            let (key, value) = option
                .split_once('=')
                .map_or((option.as_str(), None), |(k, v)| (k, Some(v)));
            match (key, value) {
                ("tag", value) => parsed.tag = Some(value.unwrap_or_default().to_string()),
                ("width", Some(value)) => {
                    let width = value
                        .parse::<usize>()
                        .ok()
                        .filter(|w| *w > 0)
                        .ok_or_else(|| ManrError::InvalidInput(format!("-O width={value}: Bad argument")))?;
                    parsed.width = Some(width);
                }
                _ => return Err(ManrError::InvalidInput(format!("-O {option}: Bad argument"))),
            }
        }
        Ok(parsed)
    }
}

/// Everything one run needs to know from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub query: Query,
    pub output: OutputMode,
    /// Whether a pager may be used; standard output must also be a terminal
    pub paging: bool,
    pub synopsis_only: bool,
    pub tag: Option<String>,
    pub width: Option<usize>,
    pub check_xrefs: bool,
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Mode implied by the name the program was invoked as
    #[must_use]
    pub fn mode_for_program(program: &str) -> MatchMode {
        let name = Path::new(program)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(program);
        match name {
            "apropos" => MatchMode::Expression,
            "whatis" => MatchMode::Keyword,
            "mandoc" => MatchMode::File,
            _ => MatchMode::Name,
        }
    }

    /// Build the invocation for this command line
    ///
    /// `program` is the name the binary was invoked as; `default_arch` is
    /// used for name lookups when `-S` is not given.
    ///
    /// # Errors
    /// Returns `ManrError::InvalidInput` for bad `-O` options or a lookup
    /// without any term.
    pub fn invocation(&self, program: &str, default_arch: &str) -> Result<Invocation, ManrError> {
        let program_mode = Self::mode_for_program(program);
        let mode = if self.local {
            MatchMode::File
        } else if self.apropos {
            MatchMode::Expression
        } else if self.whatis {
            MatchMode::Keyword
        } else {
            program_mode
        };

        let mut paging = !self.no_pager && !self.synopsis;
        let output = if self.paths {
            OutputMode::Paths
        } else if self.all || self.synopsis || self.local {
            OutputMode::All
        } else {
            match mode {
                MatchMode::Name => OutputMode::One,
                MatchMode::File => {
                    paging = false;
                    OutputMode::All
                }
                MatchMode::Keyword | MatchMode::Expression => OutputMode::List,
            }
        };
        if !output.renders() {
            paging = false;
        }

        let mut names = self.names.clone();
        let mut section = self.section.clone();
        let mut arch = self.arch.clone();
        if mode == MatchMode::Name {
            let invoked_as_help = Path::new(program)
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('h'));
            if invoked_as_help {
                if names.is_empty() {
                    names.push(HELP_PAGE.to_string());
                }
            } else if names.len() > 1 && query::looks_like_section(&names[0]) {
                section = Some(names.remove(0));
            }
            if arch.is_none() {
                arch = Some(default_arch.to_string());
            }
        }

        if names.is_empty() && mode != MatchMode::File {
            return Err(ManrError::InvalidInput(match mode {
                MatchMode::Name => "What manual page do you want?".to_string(),
                _ => "No search terms given".to_string(),
            }));
        }

        let options = OutputOptions::parse(&self.options)?;
        let tag = options.tag.map(|tag| {
            if tag.is_empty() {
                default_tag(mode, &names)
            } else {
                tag
            }
        });

        let mut query = Query::new(names)
            .with_mode(mode)
            .first_match(mode == MatchMode::Name && output == OutputMode::One);
        if let Some(section) = section {
            query = query.with_section(section);
        }
        if let Some(arch) = arch {
            query = query.with_arch(arch);
        }

        Ok(Invocation {
            query,
            output,
            paging,
            synopsis_only: self.synopsis,
            tag: tag.filter(|t| !t.is_empty()),
            width: options.width,
            check_xrefs: self.check_xrefs,
        })
    }
}

/// Tag term for a bare `-O tag`: the first term, or for expression searches
/// the part of it after `=`
fn default_tag(mode: MatchMode, names: &[String]) -> String {
    let Some(first) = names.first() else {
        return String::new();
    };
    if mode == MatchMode::Expression
        && let Some((_, value)) = first.split_once('=')
    {
        return value.to_string();
    }
    first.clone()
}
