//! Integration tests for manr
//!
//! These tests build real manual trees in temporary directories and run the
//! lookup, ranking, rendering and paging paths end to end.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use manr::cli::Invocation;
use manr::commands::{self, Context};
use manr::delivery::{ChildStatus, Delivery, DeliveryError, JobControl, PagerCommand, PagerSession};
use manr::index::NoIndex;
use manr::manpage::Form;
use manr::output::OutputMode;
use manr::query::{MatchMode, Query};
use manr::render::VerbatimRenderer;
use manr::resolve::{Diagnostic, Resolver, XrefContext, rank};
use manr::search_path::{SearchPath, SearchPathSources};
use manr::ExitLevel;
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use tempfile::TempDir;

/// Helper function to create a page below a manual root
fn create_page(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

/// Helper function to create a manual root with a few pages
fn setup_tree() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path().canonicalize().unwrap();
    create_page(&root, "man1/ls.1", ".Dd\n.Nm ls\n.Xr cat 1\n.Xr nosuch 7\n");
    create_page(&root, "man8/ls.8", ".Nm ls (admin)\n");
    create_page(&root, "man1/cat.1", ".Nm cat\n");
    create_page(&root, "man3p/printf.3p", ".Nm printf (posix)\n");
    create_page(&root, "man3/printf.3", ".Nm printf\n");
    create_page(
        &root,
        "cat1/old.0",
        "OLD(1)\n\nNAME\n     old - legacy\n\nSYNOPSIS\n     old [-x]\n     old -y\n\nDESCRIPTION\n     Old.\n",
    );
    (dir, root)
}

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

/// Runs the lookup command against `root` and returns the report and output
fn run_lookup(root: &Path, invocation: &Invocation, xrefs: Option<&XrefContext>) -> (commands::Report, String) {
    let paths = SearchPath::new([root]);
    let resolver = Resolver::system();
    let context = Context {
        paths: &paths,
        index: &NoIndex,
        resolver: &resolver,
        renderer: &VerbatimRenderer,
        xrefs,
        width: 4,
        color: false,
    };
    let mut delivery = Delivery::new(Vec::new(), false, None);
    let report = commands::lookup(&context, invocation, &mut delivery);
    let output = String::from_utf8(delivery.into_direct()).unwrap();
    (report, output)
}

/// Job control for a terminal this run always holds, whose pager exits at once
struct ImmediateExit {
    spawned: Vec<Vec<OsString>>,
    foreground: Pid,
}

impl JobControl for ImmediateExit {
    fn own_group(&self) -> Result<Pid, DeliveryError> {
        Ok(Pid::from_raw(10))
    }

    fn shell_group(&self) -> Result<Pid, DeliveryError> {
        Ok(Pid::from_raw(1))
    }

    fn foreground_group(&self) -> Result<Pid, DeliveryError> {
        Ok(self.foreground)
    }

    fn set_foreground(&mut self, group: Pid) -> Result<(), DeliveryError> {
        self.foreground = group;
        Ok(())
    }

    fn signal_own_group(&mut self, _signal: Signal) -> Result<(), DeliveryError> {
        Ok(())
    }

    fn spawn_pager(&mut self, argv: &[OsString]) -> Result<Pid, DeliveryError> {
        self.spawned.push(argv.to_vec());
        Ok(Pid::from_raw(20))
    }

    fn resume(&mut self, _pager: Pid) -> Result<(), DeliveryError> {
        Ok(())
    }

    fn wait(&mut self, _pager: Pid) -> Result<ChildStatus, DeliveryError> {
        Ok(ChildStatus::Exited(0))
    }
}

#[test]
fn test_search_path_assembly_order() {
    let aux = TempDir::new().unwrap();
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let explicit = format!(
        "{}:{}:/definitely/not/here:{}",
        first.path().display(),
        second.path().display(),
        first.path().display()
    );
    let aux_path = aux.path().display().to_string();

    let paths = SearchPath::assemble(&SearchPathSources {
        auxiliary: Some(&aux_path),
        explicit: Some(&explicit),
        environment: Some("/ignored"),
        configured: &[],
    });

    assert_eq!(
        paths.roots(),
        &[
            aux.path().canonicalize().unwrap(),
            first.path().canonicalize().unwrap(),
            second.path().canonicalize().unwrap(),
        ]
    );
}

#[test]
fn test_name_lookup_shows_preferred_section() {
    let (_dir, root) = setup_tree();
    let query = Query::new(["ls"]).first_match(true);
    let (report, output) = run_lookup(&root, &invocation(query, OutputMode::One), None);

    assert_eq!(report.level, ExitLevel::Ok);
    assert_eq!(
        report.diagnostics,
        vec![Diagnostic::StaleIndex {
            name: "ls".into(),
            section: "1".into(),
            root: root.clone(),
        }]
    );
    assert_eq!(output, ".Dd\n.Nm ls\n.Xr cat 1\n.Xr nosuch 7\n");
}

#[test]
fn test_all_mode_separates_pages() {
    let (_dir, root) = setup_tree();
    let (report, output) = run_lookup(&root, &invocation(Query::new(["ls"]), OutputMode::All), None);

    assert_eq!(report.level, ExitLevel::Ok);
    let separator = "-\u{8}-".repeat(4);
    assert_eq!(
        output,
        format!(".Dd\n.Nm ls\n.Xr cat 1\n.Xr nosuch 7\n{separator}\n.Nm ls (admin)\n")
    );
}

#[test]
fn test_requested_section_prefers_exact_suffix() {
    let (_dir, root) = setup_tree();
    let paths = SearchPath::new([&root]);
    let query = Query::new(["printf"]).with_section("3p");
    let resolution = Resolver::system().resolve(&query, &paths, Default::default());

    let best = rank(&resolution.candidates, Some("3p")).unwrap();
    assert_eq!(best.file, root.join("man3p/printf.3p"));

    let query = Query::new(["printf"]).with_section("3");
    let resolution = Resolver::system().resolve(&query, &paths, Default::default());
    let best = rank(&resolution.candidates, Some("3")).unwrap();
    assert_eq!(best.file, root.join("man3/printf.3"));
}

#[test]
fn test_first_match_ends_search_in_first_root() {
    let (_first_dir, first) = setup_tree();
    let second_dir = TempDir::new().unwrap();
    let second = second_dir.path().canonicalize().unwrap();
    create_page(&second, "man1/cat.1", ".Nm other cat\n");

    let paths = SearchPath::new([&first, &second]);
    let query = Query::new(["cat"]).first_match(true);
    let resolution = Resolver::system().resolve(&query, &paths, Default::default());

    assert_eq!(resolution.candidates.len(), 1);
    assert_eq!(resolution.candidates[0].file, first.join("man1/cat.1"));
    assert_eq!(resolution.candidates[0].search_index, Some(0));
}

#[test]
fn test_missing_page_reports_and_fails() {
    let (_dir, root) = setup_tree();
    let query = Query::new(["nope"]).with_section("2");
    let (report, output) = run_lookup(&root, &invocation(query, OutputMode::One), None);

    assert_eq!(report.level, ExitLevel::BadArg);
    assert_eq!(report.diagnostics[0].to_string(), "No entry for nope in section 2 of the manual.");
    assert!(output.is_empty());
}

#[test]
fn test_synopsis_of_preformatted_page() {
    let (_dir, root) = setup_tree();
    let mut run = invocation(Query::new(["old"]), OutputMode::All);
    run.synopsis_only = true;
    let (report, output) = run_lookup(&root, &run, None);

    assert_eq!(report.level, ExitLevel::Ok);
    assert_eq!(output, "old [-x]\nold -y\n");
}

#[test]
fn test_paths_mode_lists_files() {
    let (_dir, root) = setup_tree();
    let (_report, output) = run_lookup(&root, &invocation(Query::new(["ls"]), OutputMode::Paths), None);
    assert_eq!(
        output,
        format!(
            "{}\n{}\n",
            root.join("man1/ls.1").display(),
            root.join("man8/ls.8").display()
        )
    );
}

#[test]
fn test_cross_references_checked() {
    let (_dir, root) = setup_tree();
    let xrefs = XrefContext::new(vec![root.clone()]);
    let query = Query::new(["ls"]).first_match(true);
    let (report, _output) = run_lookup(&root, &invocation(query, OutputMode::One), Some(&xrefs));

    assert_eq!(report.level, ExitLevel::Style);
    assert_eq!(report.diagnostics.len(), 2);
    assert!(matches!(report.diagnostics[0], Diagnostic::StaleIndex { .. }));
    match &report.diagnostics[1] {
        Diagnostic::BadCrossReference { name, section, line, .. } => {
            assert_eq!(name, "nosuch");
            assert_eq!(section, "7");
            assert_eq!(*line, 4);
        }
        other => panic!("unexpected diagnostic: {other}"),
    }
}

#[test]
fn test_literal_path_argument() {
    let (_dir, root) = setup_tree();
    let page = root.join("man1/cat.1");
    let query = Query::new([page.display().to_string()]);
    let (report, output) = run_lookup(&root, &invocation(query, OutputMode::All), None);

    assert_eq!(report.level, ExitLevel::Ok);
    assert_eq!(output, ".Nm cat\n");
}

#[test]
fn test_keyword_mode_without_index_finds_nothing() {
    let (_dir, root) = setup_tree();
    let query = Query::new(["ls"]).with_mode(MatchMode::Keyword);
    let (report, _output) = run_lookup(&root, &invocation(query, OutputMode::List), None);

    assert_eq!(report.level, ExitLevel::BadArg);
    assert_eq!(report.diagnostics, vec![Diagnostic::NothingAppropriate]);
}

#[test]
fn test_paged_session_is_cleaned_up() {
    let (_dir, root) = setup_tree();
    let temp = TempDir::new().unwrap();
    let paths = SearchPath::new([&root]);
    let resolver = Resolver::system();
    let context = Context {
        paths: &paths,
        index: &NoIndex,
        resolver: &resolver,
        renderer: &VerbatimRenderer,
        xrefs: None,
        width: 78,
        color: false,
    };
    let mut delivery = Delivery::new(Vec::new(), true, Some("ls".to_string())).with_temp_dir(temp.path());
    let query = Query::new(["ls"]).first_match(true);
    let report = commands::lookup(&context, &invocation(query, OutputMode::One), &mut delivery);
    assert_eq!(report.level, ExitLevel::Ok);
    assert!(delivery.is_paged());

    let session: PagerSession = delivery.into_session().unwrap().unwrap();
    let output = session.output_path().to_path_buf();
    let tags = session.tags_path().to_path_buf();

    let mut control = ImmediateExit {
        spawned: Vec::new(),
        foreground: Pid::from_raw(10),
    };
    let pager = PagerCommand::parse("less").unwrap();
    session.deliver(&mut control, &pager).unwrap();

    assert_eq!(
        control.spawned,
        vec![vec![
            OsString::from("less"),
            OsString::from("-T"),
            tags.clone().into_os_string(),
            OsString::from("-t"),
            OsString::from("ls"),
        ]]
    );
    assert!(!output.exists());
    assert!(!tags.exists());
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    assert_eq!(control.foreground, Pid::from_raw(1));
}

#[test]
fn test_preformatted_form_detected() {
    let (_dir, root) = setup_tree();
    let paths = SearchPath::new([&root]);
    let resolution = Resolver::system().resolve(&Query::new(["old"]), &paths, Default::default());
    assert_eq!(resolution.candidates[0].form, Form::Preformatted);
}
