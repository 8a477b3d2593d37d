//! Line grammar: classify a single TAP line without any parser state.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::types::Plan;

static PLAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.\.(\d+)$").expect("plan regex"));

static RESULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<not>not\s+)?ok(?:\s+(?P<num>\d+))?(?:\s+(?P<rest>.*))?$")
        .expect("result regex")
});

const BAIL_OUT: &str = "Bail out!";

/// Largest test number accepted in plan and result lines.
///
/// Reconciliation allocates one slot per planned number, so larger values are
/// treated as unrecognized input rather than honored.
pub const MAX_TEST_NUM: u32 = 1_000_000;

/// One classified input line. Borrowed text points into the original line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    Plan(Plan),
    Result(ResultLine<'a>),
    Diagnostic(&'a str),
    BailOut(&'a str),
    Unrecognized,
}

/// Parsed `ok` / `not ok` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLine<'a> {
    pub ok: bool,
    /// Explicit test number, if the line carried a non-zero one.
    pub num: Option<u32>,
    /// Name with `\#` and `\\` escapes resolved.
    pub name: Cow<'a, str>,
    pub directive: Option<Directive<'a>>,
}

/// `# SKIP` / `# TODO` suffix of a result line, with its optional reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    Skip(Option<&'a str>),
    Todo(Option<&'a str>),
}

/// Classify `line`, which must already be stripped of its terminator.
///
/// Trailing whitespace (including a stray `\r`) is ignored.
pub fn classify_line(line: &str) -> Line<'_> {
    let line = line.trim_end();

    if let Some(reason) = line.strip_prefix(BAIL_OUT) {
        return Line::BailOut(reason.trim());
    }
    if let Some(plan) = parse_plan(line) {
        return Line::Plan(plan);
    }
    if let Some(caps) = RESULT_RE.captures(line) {
        return match parse_result(&caps) {
            Some(result) => Line::Result(result),
            None => Line::Unrecognized,
        };
    }
    if let Some(text) = line.strip_prefix('#') {
        return Line::Diagnostic(text.strip_prefix(' ').unwrap_or(text));
    }
    Line::Unrecognized
}

fn parse_plan(line: &str) -> Option<Plan> {
    let caps = PLAN_RE.captures(line)?;
    let min = parse_test_num(&caps[1])?;
    let max = parse_test_num(&caps[2])?;
    Some(Plan::new(min, max))
}

/// Test numbers above [`MAX_TEST_NUM`], or that overflow, make the whole line
/// unrecognized.
fn parse_test_num(digits: &str) -> Option<u32> {
    digits.parse::<u32>().ok().filter(|n| *n <= MAX_TEST_NUM)
}

fn parse_result<'a>(caps: &regex::Captures<'a>) -> Option<ResultLine<'a>> {
    let ok = caps.name("not").is_none();
    let num = match caps.name("num") {
        Some(digits) => Some(parse_test_num(digits.as_str())?).filter(|n| *n > 0),
        None => None,
    };
    let rest = caps.name("rest").map_or("", |m| m.as_str());
    let (name, directive) = split_directive(rest);

    Some(ResultLine {
        ok,
        num,
        name: unescape(strip_dash(name.trim())),
        directive,
    })
}

/// Split `rest` at the first unescaped `#` that introduces a SKIP or TODO
/// directive. Without one, the whole text is the name.
fn split_directive(rest: &str) -> (&str, Option<Directive<'_>>) {
    for idx in unescaped_hashes(rest) {
        if let Some(directive) = parse_directive(&rest[idx + 1..]) {
            return (&rest[..idx], Some(directive));
        }
    }
    (rest, None)
}

/// Byte offsets of `#` characters not preceded by an escaping backslash.
fn unescaped_hashes(text: &str) -> impl Iterator<Item = usize> + '_ {
    let mut escaped = false;
    text.char_indices().filter_map(move |(idx, c)| {
        let hit = c == '#' && !escaped;
        escaped = c == '\\' && !escaped;
        hit.then_some(idx)
    })
}

/// Resolve `\#` and `\\` escapes in a test name.
fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('\\') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next @ ('#' | '\\')) => out.push(next),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    Cow::Owned(out)
}

/// Parse directive text following `#`.
///
/// The first word is the keyword: anything starting with `skip` (any case) is a
/// skip, `todo` (any case) is a todo. The reason is the rest of the text with an
/// optional leading `:` removed.
fn parse_directive(text: &str) -> Option<Directive<'_>> {
    let text = text.trim_start();
    let end = text
        .find(|c: char| c.is_whitespace() || c == ':')
        .unwrap_or(text.len());
    let (keyword, rest) = text.split_at(end);

    let rest = rest.trim_start();
    let reason = rest.strip_prefix(':').unwrap_or(rest).trim();
    let reason = (!reason.is_empty()).then_some(reason);

    if keyword
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("skip"))
    {
        Some(Directive::Skip(reason))
    } else if keyword.eq_ignore_ascii_case("todo") {
        Some(Directive::Todo(reason))
    } else {
        None
    }
}

/// Drop the conventional `- ` separator in `ok 1 - name`.
fn strip_dash(name: &str) -> &str {
    match name.strip_prefix('-') {
        Some(after) if after.is_empty() || after.starts_with(char::is_whitespace) => {
            after.trim_start()
        }
        _ => name,
    }
}
