//! Markdown list continuation on Enter and block indentation on Tab.

use crate::constants::INDENT_UNIT;
use crate::surface::SelectionPolicy;
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// Replacement produced for a line-level key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineEdit {
    /// Char range to replace in the pre-edit text.
    pub range: Range<usize>,
    pub replacement: String,
    pub policy: SelectionPolicy,
}

impl LineEdit {
    fn insert(range: Range<usize>, replacement: String) -> Self {
        Self {
            range,
            replacement,
            policy: SelectionPolicy::CollapseToEnd,
        }
    }
}

/// Line classifiers.
///
/// The `empty_*` patterns are anchored at both ends and detect a bare marker;
/// the others only anchor the start so trailing content survives continuation.
struct ListPatterns {
    empty_task: Regex,
    empty_ordered: Regex,
    empty_unordered: Regex,
    task: Regex,
    ordered: Regex,
    unordered: Regex,
}

fn patterns() -> &'static ListPatterns {
    static PATTERNS: OnceLock<ListPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let compile = |pattern: &str| Regex::new(pattern).expect("list pattern compiles");
        ListPatterns {
            empty_task: compile(r"^\s*[-*+]\s\[[x ]\]\s$"),
            empty_ordered: compile(r"^[0-9]+\.\s$"),
            empty_unordered: compile(r"^\s*[-*+]\s$"),
            task: compile(r"^(\s*)([-*+])\s\[[x ]\]\s"),
            ordered: compile(r"^([0-9]+)\.\s"),
            unordered: compile(r"^(\s*)([-*+])\s"),
        }
    })
}

fn line_start(chars: &[char], offset: usize) -> usize {
    chars[..offset]
        .iter()
        .rposition(|ch| *ch == '\n')
        .map_or(0, |index| index + 1)
}

fn line_end(chars: &[char], offset: usize) -> usize {
    chars[offset..]
        .iter()
        .position(|ch| *ch == '\n')
        .map_or(chars.len(), |index| offset + index)
}

/// Edit for a plain Enter, or `None` to let the host insert a newline.
///
/// The current line is the text between the line start and the selection
/// start. A bare list marker is removed (leaving the list); a populated item
/// continues with a fresh marker of the same kind in place of the selection.
pub fn continue_list(text: &str, selection: Range<usize>) -> Option<LineEdit> {
    let chars: Vec<char> = text.chars().collect();
    let start = selection.start.min(chars.len());
    let end = selection.end.min(chars.len()).max(start);
    let line_start = line_start(&chars, start);
    let current_line: String = chars[line_start..start].iter().collect();
    let patterns = patterns();

    if patterns.empty_task.is_match(&current_line)
        || patterns.empty_ordered.is_match(&current_line)
        || patterns.empty_unordered.is_match(&current_line)
    {
        return Some(LineEdit::insert(line_start..end, String::new()));
    }

    if let Some(caps) = patterns.task.captures(&current_line) {
        let prefix = format!("\n{}{} [ ] ", &caps[1], &caps[2]);
        return Some(LineEdit::insert(start..end, prefix));
    }
    if let Some(next) = patterns
        .ordered
        .captures(&current_line)
        .and_then(|caps| caps[1].parse::<u64>().ok())
        .and_then(|number| number.checked_add(1))
    {
        return Some(LineEdit::insert(start..end, format!("\n{}. ", next)));
    }
    if let Some(caps) = patterns.unordered.captures(&current_line) {
        let prefix = format!("\n{}{} ", &caps[1], &caps[2]);
        return Some(LineEdit::insert(start..end, prefix));
    }
    None
}

fn outdent_line(line: &str) -> &str {
    line.strip_prefix(INDENT_UNIT)
        .or_else(|| line.strip_prefix('\t'))
        .unwrap_or(line)
}

/// Edit for Tab (`outdent == false`) or Shift+Tab (`outdent == true`).
///
/// # Returns
/// `None` when the key leaves the text unchanged (outdenting a line that has
/// no leading indent).
pub fn indent(text: &str, selection: Range<usize>, outdent: bool) -> Option<LineEdit> {
    if text.is_empty() {
        return Some(LineEdit::insert(0..0, INDENT_UNIT.to_string()));
    }
    let chars: Vec<char> = text.chars().collect();
    let start = selection.start.min(chars.len());
    let end = selection.end.min(chars.len()).max(start);
    let line_start = line_start(&chars, start);
    let last = start.max(end.saturating_sub(1));
    let multi_line = chars[start..last].contains(&'\n');

    if multi_line {
        let block_end = line_end(&chars, last);
        let block: String = chars[line_start..block_end].iter().collect();
        let rewritten = block
            .split('\n')
            .map(|line| {
                if outdent {
                    outdent_line(line).to_string()
                } else {
                    format!("{INDENT_UNIT}{line}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        if rewritten == block {
            return None;
        }
        return Some(LineEdit {
            range: line_start..block_end,
            replacement: rewritten,
            policy: SelectionPolicy::Preserve,
        });
    }

    if !outdent {
        return Some(LineEdit::insert(start..start, INDENT_UNIT.to_string()));
    }
    let line: String = chars[line_start..line_end(&chars, line_start)].iter().collect();
    let removed = line.chars().count() - outdent_line(&line).chars().count();
    if removed == 0 {
        return None;
    }
    Some(LineEdit {
        range: line_start..line_start + removed,
        replacement: String::new(),
        policy: SelectionPolicy::Preserve,
    })
}
