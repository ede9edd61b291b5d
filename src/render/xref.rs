//! Cross-reference extraction from mdoc source

use std::collections::HashMap;

/// One referenced page, aggregated over a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xref {
    pub name: String,
    pub section: String,
    /// Line of the first reference
    pub line: usize,
    /// Number of references
    pub count: usize,
}

/// Parse `.Xr name section` into its arguments
fn parse_xr(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix(['.', '\''])?.trim_start();
    let mut words = rest.split_whitespace();
    if words.next()? != "Xr" {
        return None;
    }
    let name = words.next()?;
    let section = words.next()?;
    if !section.starts_with(|c: char| c.is_ascii_digit())
        || !section.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some((name, section))
}

/// Collect the `.Xr` references in `source`, in order of first use
#[must_use]
pub fn scan(source: &str) -> Vec<Xref> {
    let mut xrefs: Vec<Xref> = Vec::new();
    let mut seen: HashMap<(String, String), usize> = HashMap::new();

    for (number, line) in source.lines().enumerate() {
        let Some((name, section)) = parse_xr(line) else {
            continue;
        };
        let key = (name.to_string(), section.to_string());
        if let Some(&index) = seen.get(&key) {
            xrefs[index].count += 1;
            continue;
        }
        seen.insert(key.clone(), xrefs.len());
        xrefs.push(Xref {
            name: key.0,
            section: key.1,
            line: number + 1,
            count: 1,
        });
    }
    xrefs
}
