//! Section ranking for single-page lookups
//!
//! When a lookup must show exactly one page, every candidate gets a score
//! and the lowest wins. Ties keep the earlier candidate.
//!
//! The score starts at the position of the page's section in
//! `SECTION_PREFERENCE`. Then:
//!
//! - `+10` when the section in the path is not followed by a directory
//!   separator (a page shelved under `man3p/` when asking for `3`, or any
//!   suffixed directory without a request)
//! - `+20` when a section was requested and the file name does not end
//!   with it

use crate::manpage::Candidate;
use crate::query::section_rank;

const WRONG_DIRECTORY: usize = 10;
const WRONG_SUFFIX: usize = 20;

/// Scores at or above this are never selected
const NO_SCORE: usize = 40;

/// Score one candidate; `None` if its path carries no section digit
#[must_use]
pub fn score(candidate: &Candidate, requested: Option<&str>) -> Option<usize> {
    let path = candidate.shelf_path().to_string_lossy();
    let start = path.find(|c: char| ('1'..='9').contains(&c))?;
    let mut rest = &path[start..];
    let digit = rest.chars().next()?;
    let mut score = section_rank(digit)?;

    match requested {
        Some(section) => {
            if let Some(stripped) = rest.strip_prefix(section) {
                rest = stripped;
            }
        }
        None => rest = &rest[digit.len_utf8()..],
    }

    if !rest.starts_with('/') {
        score += WRONG_DIRECTORY;
    }
    if let Some(section) = requested
        && (rest.len() <= section.len() + 3 || !rest.ends_with(section))
    {
        score += WRONG_SUFFIX;
    }
    Some(score)
}

/// Pick the single page to show
///
/// Falls back to the first candidate when none can be scored. Returns
/// `None` only for an empty list.
#[must_use]
pub fn rank<'a>(candidates: &'a [Candidate], requested: Option<&str>) -> Option<&'a Candidate> {
    let mut best: Option<(usize, &Candidate)> = None;
    for candidate in candidates {
        let Some(score) = score(candidate, requested) else {
            continue;
        };
        let to_beat = best.map_or(NO_SCORE, |(s, _)| s);
        if score < to_beat {
            best = Some((score, candidate));
        }
    }
    best.map(|(_, candidate)| candidate)
        .or_else(|| candidates.first())
}
