//! Lookup command - find pages by name, keyword or expression

use std::io::Write;

use tracing::debug;

use super::show::{Input, Shower};
use super::{Context, Report};
use crate::cli::Invocation;
use crate::delivery::{Delivery, DeliveryError};
use crate::manpage::Candidate;
use crate::output::{self, OutputMode};
use crate::query::MatchMode;
use crate::resolve::{Diagnostic, ManFs, rank};
use crate::ExitLevel;

/// Execute a lookup
///
/// Asks the index, falls back to probing the manual trees for name
/// lookups, then prints or renders the candidates as the output mode says.
/// A lookup without any candidate ends with `ExitLevel::BadArg`.
pub fn execute<W: Write, F: ManFs>(
    context: &Context<'_, F>,
    invocation: &Invocation,
    delivery: &mut Delivery<W>,
) -> Report {
    let mut report = Report::default();
    let query = &invocation.query;

    let indexed = context.index.search(query, context.paths);
    debug!(found = indexed.candidates.len(), authoritative = indexed.authoritative, "index lookup");
    let resolution = context.resolver.resolve(query, context.paths, indexed);
    report.extend(resolution.diagnostics);
    let candidates = resolution.candidates;

    if candidates.is_empty() {
        if query.mode != MatchMode::Name {
            report.note(Diagnostic::NothingAppropriate);
        }
        report.level.raise(ExitLevel::BadArg);
        return report;
    }

    match invocation.output {
        OutputMode::Paths => print_lines(&candidates, delivery, &mut report, |c| {
            output::path_line(&c.file, context.color)
        }),
        OutputMode::List => print_lines(&candidates, delivery, &mut report, |c| {
            output::list_line(c, context.color)
        }),
        OutputMode::One => {
            let mut shower = Shower::new(context, delivery, &mut report, invocation.synopsis_only);
            if let Some(best) = rank(&candidates, query.section.as_deref()) {
                shower.show_file(input(best));
            }
        }
        OutputMode::All => {
            let mut shower = Shower::new(context, delivery, &mut report, invocation.synopsis_only);
            for candidate in &candidates {
                if !shower.show_file(input(candidate)) {
                    break;
                }
            }
        }
    }
    report
}

fn input(candidate: &Candidate) -> Input<'_> {
    Input {
        path: &candidate.file,
        root: candidate.root.as_deref(),
        form: candidate.form,
    }
}

fn print_lines<W: Write>(
    candidates: &[Candidate],
    delivery: &mut Delivery<W>,
    report: &mut Report,
    line: impl Fn(&Candidate) -> String,
) {
    let destination = delivery.destination();
    let writer = delivery.writer();
    let written = candidates
        .iter()
        .try_for_each(|candidate| writeln!(writer, "{}", line(candidate)))
        .and_then(|()| writer.flush());
    if let Err(source) = written {
        report.fail(DeliveryError::Write {
            path: destination,
            source,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{NoIndex, StaticIndex};
    use crate::query::Query;
    use crate::render::VerbatimRenderer;
    use crate::resolve::Resolver;
    use crate::search_path::SearchPath;
    use crate::testing::MemoryFs;
    use std::fs;
    use tempfile::TempDir;

    fn invocation(query: Query, output: OutputMode) -> Invocation {
        Invocation {
            query,
            output,
            paging: false,
            synopsis_only: false,
            tag: None,
            width: None,
            check_xrefs: false,
        }
    }

    #[test]
    fn test_no_match_is_bad_argument() {
        let fs = MemoryFs::default();
        let resolver = Resolver::new(&fs);
        let paths = SearchPath::new(["/man"]);
        let context = Context {
            paths: &paths,
            index: &NoIndex,
            resolver: &resolver,
            renderer: &VerbatimRenderer,
            xrefs: None,
            width: 78,
            color: false,
        };
        let mut delivery = Delivery::new(Vec::new(), false, None);

        let report = execute(&context, &invocation(Query::new(["nope"]), OutputMode::One), &mut delivery);
        assert_eq!(report.level, ExitLevel::BadArg);
        assert_eq!(report.diagnostics, vec![Diagnostic::NoEntry { name: "nope".into() }]);

        let keyword = Query::new(["nope"]).with_mode(MatchMode::Keyword);
        let report = execute(&context, &invocation(keyword, OutputMode::List), &mut delivery);
        assert_eq!(report.diagnostics, vec![Diagnostic::NothingAppropriate]);
        assert!(delivery.into_direct().is_empty());
    }

    #[test]
    fn test_paths_lists_every_candidate() {
        let fs = MemoryFs::new(["/man/man1/ls.1", "/man/man8/ls.8"]);
        let resolver = Resolver::new(&fs);
        let paths = SearchPath::new(["/man"]);
        let context = Context {
            paths: &paths,
            index: &NoIndex,
            resolver: &resolver,
            renderer: &VerbatimRenderer,
            xrefs: None,
            width: 78,
            color: false,
        };
        let mut delivery = Delivery::new(Vec::new(), false, None);

        let report = execute(&context, &invocation(Query::new(["ls"]), OutputMode::Paths), &mut delivery);
        assert_eq!(report.level, ExitLevel::Ok);
        assert_eq!(
            String::from_utf8(delivery.into_direct()).unwrap(),
            "/man/man1/ls.1\n/man/man8/ls.8\n"
        );
    }

    #[test]
    fn test_list_uses_index_entries() {
        let entry = Candidate::literal("/man/man1/ls.1")
            .with_names(vec!["ls".into()])
            .with_section(1)
            .with_description("list directory contents");
        let index = StaticIndex::new(vec![entry]);
        let fs = MemoryFs::default();
        let resolver = Resolver::new(&fs);
        let paths = SearchPath::new(["/man"]);
        let context = Context {
            paths: &paths,
            index: &index,
            resolver: &resolver,
            renderer: &VerbatimRenderer,
            xrefs: None,
            width: 78,
            color: false,
        };
        let mut delivery = Delivery::new(Vec::new(), false, None);

        let query = Query::new(["directory"]).with_mode(MatchMode::Expression);
        execute(&context, &invocation(query, OutputMode::List), &mut delivery);
        assert_eq!(
            String::from_utf8(delivery.into_direct()).unwrap(),
            "ls(1) - list directory contents\n"
        );
    }

    #[test]
    fn test_one_shows_best_ranked_page() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        for (section, text) in [("8", "eight\n"), ("1", "one\n")] {
            let shelf = root.join(format!("man{section}"));
            fs::create_dir_all(&shelf).unwrap();
            fs::write(shelf.join(format!("ls.{section}")), text).unwrap();
        }
        let index = StaticIndex::new(vec![
            Candidate::literal(root.join("man8/ls.8"))
                .with_names(vec!["ls".into()])
                .with_section(8)
                .in_root(0, &root),
            Candidate::literal(root.join("man1/ls.1"))
                .with_names(vec!["ls".into()])
                .with_section(1)
                .in_root(0, &root),
        ]);
        let resolver = Resolver::system();
        let paths = SearchPath::new([root.clone()]);
        let context = Context {
            paths: &paths,
            index: &index,
            resolver: &resolver,
            renderer: &VerbatimRenderer,
            xrefs: None,
            width: 78,
            color: false,
        };
        let mut delivery = Delivery::new(Vec::new(), false, None);

        let query = Query::new(["ls"]);
        let report = execute(&context, &invocation(query, OutputMode::One), &mut delivery);
        assert_eq!(report.level, ExitLevel::Ok);
        assert_eq!(delivery.into_direct(), b"one\n");
    }
}
