//! Modal sessions layered over the browser: incremental search, incremental
//! select and plain prompts. All of them run on [`line_edit::run`].

use std::io;
use std::path::Path;

use regex::Regex;

use crate::browser::Browser;
use crate::column::Column;
use crate::console::Console;
use crate::key::Key;
use crate::line_edit::{self, Flow, LineBuffer};
use crate::marks::MarkSet;

/// Incremental search over the active column.
///
/// The cursor jumps to the first entry after the anchor whose name matches
/// the buffer as a regex. `/` or Right on a matched directory descends,
/// a buffer of `..` ascends; both start over with an empty buffer. Cancel
/// puts the cursor back on the anchor.
pub fn search(browser: &mut Browser, console: &mut dyn Console) -> io::Result<Flow> {
    let mut anchor = browser.stack().active().cursor();
    let (flow, _) = line_edit::run(
        browser,
        console,
        "I-Search: ",
        LineBuffer::default(),
        |browser, buffer, stroke| {
            match stroke.signal {
                Flow::Cancel => {
                    browser.stack_mut().active_mut().set_cursor(anchor);
                    return Flow::Cancel;
                }
                Flow::Accept => return Flow::Accept,
                Flow::Continue => {}
            }

            match stroke.key {
                Key::Char('/') => {
                    buffer.pop();
                    if browser.descend_selected() {
                        buffer.clear();
                        anchor = browser.stack().active().cursor();
                    }
                    return Flow::Continue;
                }
                Key::Right if browser.stack().active().selected().is_dir() => {
                    browser.descend_selected();
                    buffer.clear();
                    anchor = browser.stack().active().cursor();
                    return Flow::Continue;
                }
                key if key.is_navigation() => return Flow::Accept,
                _ => {}
            }

            if buffer.text() == ".." {
                browser.leave();
                buffer.clear();
                anchor = browser.stack().active().cursor();
                return Flow::Continue;
            }

            if stroke.changed {
                seek(browser.stack_mut().active_mut(), anchor, buffer.text());
            }
            Flow::Continue
        },
    )?;
    Ok(flow)
}

/// Move to the first entry after `anchor`, wrapping, whose name matches
/// `pattern`. The anchor itself is tried last. An invalid pattern leaves the
/// cursor alone; no match or an empty pattern returns to the anchor.
pub fn seek(column: &mut Column, anchor: usize, pattern: &str) {
    if pattern.is_empty() {
        column.set_cursor(anchor);
        return;
    }
    let Ok(regex) = Regex::new(pattern) else {
        return;
    };
    let len = column.len();
    let hit = (1..=len)
        .map(|step| (anchor + step) % len)
        .find(|&i| {
            let entry = &column.entries()[i];
            !entry.is_placeholder() && regex.is_match(entry.name())
        });
    column.set_cursor(hit.unwrap_or(anchor));
}

/// Incremental mark selection over the active column.
///
/// Every buffer change replaces the mark set with the matching entries.
/// Cancel, or erasing the buffer, brings back the marks from before the
/// session.
pub fn select(browser: &mut Browser, console: &mut dyn Console) -> io::Result<Flow> {
    let snapshot = browser.marks().clone();
    let (flow, _) = line_edit::run(
        browser,
        console,
        "Select: ",
        LineBuffer::default(),
        |browser, buffer, stroke| {
            match stroke.signal {
                Flow::Cancel => {
                    browser.replace_marks(snapshot.clone());
                    return Flow::Cancel;
                }
                Flow::Accept => return Flow::Accept,
                Flow::Continue => {}
            }
            if !stroke.changed {
                return Flow::Continue;
            }
            if buffer.is_empty() {
                browser.replace_marks(snapshot.clone());
            } else if let Ok(regex) = Regex::new(buffer.text()) {
                let matched = matching(browser.stack().active(), &regex);
                browser.replace_marks(matched);
            }
            Flow::Continue
        },
    )?;
    if flow == Flow::Accept {
        tracing::info!(marked = browser.marks().len(), "selection committed");
    }
    Ok(flow)
}

fn matching(column: &Column, regex: &Regex) -> MarkSet {
    column
        .entries()
        .iter()
        .filter(|e| !e.is_placeholder() && regex.is_match(e.name()))
        .filter_map(|e| e.path().map(Path::to_path_buf))
        .collect()
}

/// Ask for a line of text. `None` when cancelled.
pub fn prompt(
    browser: &mut Browser,
    console: &mut dyn Console,
    label: &str,
    initial: &str,
) -> io::Result<Option<String>> {
    let (flow, text) = line_edit::run(
        browser,
        console,
        label,
        LineBuffer::new(initial),
        |_, _, stroke| stroke.signal,
    )?;
    Ok((flow == Flow::Accept).then_some(text))
}

/// Ask a yes/no question; anything but `y`/`yes` is no.
pub fn confirm(
    browser: &mut Browser,
    console: &mut dyn Console,
    question: &str,
) -> io::Result<bool> {
    let label = format!("{question} (y/N) ");
    let answer = prompt(browser, console, &label, "")?;
    Ok(answer.is_some_and(|a| {
        let a = a.trim();
        a.eq_ignore_ascii_case("y") || a.eq_ignore_ascii_case("yes")
    }))
}
