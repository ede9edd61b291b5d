//! File command - render files named on the command line, or standard input

use std::io::{Read, Write};
use std::path::Path;

use super::show::{Input, Shower};
use super::{Context, Report};
use crate::cli::Invocation;
use crate::delivery::Delivery;
use crate::manpage::Form;
use crate::resolve::ManFs;

/// Name used for standard input in messages
pub const STDIN_NAME: &str = "<stdin>";

/// Execute raw file mode
///
/// Every term is a file to render. Without terms, `stdin` is rendered.
pub fn execute<W: Write, F: ManFs, R: Read>(
    context: &Context<'_, F>,
    invocation: &Invocation,
    delivery: &mut Delivery<W>,
    mut stdin: R,
) -> Report {
    let mut report = Report::default();
    let mut shower = Shower::new(context, delivery, &mut report, invocation.synopsis_only);

    if invocation.query.names.is_empty() {
        let mut content = Vec::new();
        let read = stdin.read_to_end(&mut content).map(|_| content);
        let input = Input {
            path: Path::new(STDIN_NAME),
            root: None,
            form: Form::Source,
        };
        shower.show(input, read);
        return report;
    }

    for name in &invocation.query.names {
        let input = Input {
            path: Path::new(name),
            root: None,
            form: Form::Source,
        };
        if !shower.show_file(input) {
            break;
        }
    }
    report
}
