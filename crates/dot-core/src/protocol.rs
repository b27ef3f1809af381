//! Wire format between the `dot` binary and the shell shims.
//!
//! Requests arrive as `dot __complete <shell> --cur <fragment> -- <tokens...>`
//! and are decoded by [`CompletionRequest::parse`], which never fails: any
//! piece that is missing falls back to an empty value.
//!
//! Results are written as tagged lines by [`encode`]:
//!
//! ```text
//! COLOR\tgreen
//! NOTE\t'bogus' is not a subcommand of 'dot'.
//! HEADER\t dot commands
//! list\x1Flist  -- Discover templates
//! ```
//!
//! Candidate lines carry the insert text, a unit separator, then the padded
//! menu line. Shims split on the first `\x1F`.

use std::io::{self, Write};

use crate::resolve::{CompletionResult, ResolutionContext};

/// First argument that turns an invocation into a completion request.
pub const COMPLETE_MARKER: &str = "__complete";

/// Separates the insert text from the menu line.
pub const UNIT_SEPARATOR: char = '\x1f';

pub const TAG_COLOR: &str = "COLOR";
pub const TAG_NOTE: &str = "NOTE";
pub const TAG_HEADER: &str = "HEADER";

/// A decoded completion request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Shell that issued the request, when given.
    pub shell: Option<String>,
    pub context: ResolutionContext,
}

impl CompletionRequest {
    /// Decode the arguments that follow [`COMPLETE_MARKER`].
    #[must_use]
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Self {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();

        let mut shell = None;
        let mut inline_cur = None;
        let mut spaced_cur = None;
        let mut tokens: &[&str] = &[];
        let mut i = 0;
        while i < args.len() {
            let arg = args[i];
            if arg == "--" {
                tokens = &args[i + 1..];
                break;
            } else if let Some(value) = arg.strip_prefix("--cur=") {
                inline_cur.get_or_insert(value);
            } else if arg == "--cur" {
                // The value is taken verbatim, even when it is `--`.
                if let Some(value) = args.get(i + 1) {
                    spaced_cur.get_or_insert(*value);
                    i += 1;
                }
            } else if shell.is_none() && !arg.starts_with('-') {
                shell = Some(arg.to_string());
            }
            i += 1;
        }

        let fragment = inline_cur.or(spaced_cur).unwrap_or_default();
        Self {
            shell,
            context: ResolutionContext::new(tokens.iter().copied(), fragment),
        }
    }
}

/// Presentation knobs for [`encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Caption for the `HEADER` line; `None` suppresses the line.
    pub header: Option<String>,
    /// Emit the `COLOR` line.
    pub color: bool,
    /// Include candidate annotations.
    pub descriptions: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            header: Some("dot commands".to_string()),
            color: true,
            descriptions: true,
        }
    }
}

/// Write `result` in the tagged line format.
///
/// # Errors
///
/// Returns any error raised by the underlying writer.
pub fn encode(result: &CompletionResult, opts: &EncodeOptions, w: &mut dyn Write) -> io::Result<()> {
    if opts.color {
        if let Some(severity) = result.severity {
            writeln!(w, "{TAG_COLOR}\t{}", severity.color())?;
        }
    }
    if let Some(note) = &result.note {
        writeln!(w, "{TAG_NOTE}\t{}", single_line(note))?;
    }
    if let Some(header) = &opts.header {
        writeln!(w, "{TAG_HEADER}\t {}", single_line(header))?;
    }

    let width = result
        .items
        .iter()
        .map(|c| c.insert.chars().count())
        .max()
        .unwrap_or(0)
        + 2;
    for candidate in &result.items {
        let insert = single_line(&candidate.insert);
        match candidate.display.as_deref().filter(|_| opts.descriptions) {
            Some(display) => writeln!(
                w,
                "{insert}{UNIT_SEPARATOR}{insert:<width$}-- {}",
                single_line(display)
            )?,
            None => writeln!(w, "{insert}{UNIT_SEPARATOR}{insert:<width$}")?,
        }
    }
    Ok(())
}

/// Render `result` into a `String`.
#[must_use]
pub fn encode_to_string(result: &CompletionResult, opts: &EncodeOptions) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = encode(result, opts, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Newlines or separators inside payloads would break line framing.
fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\n' || c == '\r' || c == UNIT_SEPARATOR { ' ' } else { c })
        .collect()
}
