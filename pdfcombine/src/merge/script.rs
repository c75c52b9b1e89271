//! Metadata script synthesis.
//!
//! Ghostscript applies document information and outline entries through
//! `pdfmark` operators in a PostScript program run after the inputs. This
//! module writes that program: one directive per line,
//!
//! ```text
//! [ /Title (Binder) /DOCINFO pdfmark
//! [ /Author (pdfcombine) /DOCINFO pdfmark
//! [ /Page 1 /Title (intro.pdf) /OUT pdfmark
//! [ /Page 5 /Title <FEFF00E9007400E9> /OUT pdfmark
//! ```
//!
//! Text is written as a PostScript literal string when it is printable
//! ASCII and as UTF-16BE hex with a byte order mark otherwise, which PDF
//! readers decode as a Unicode text string.

use serde::Serialize;
use std::fmt;

use crate::error::{PdfCombineError, Result};
use crate::merge::layout::Layout;

/// An outline entry pointing at an absolute page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bookmark {
    /// Text shown in the outline.
    pub label: String,
    /// 1-indexed target page.
    pub page: u32,
}

impl Bookmark {
    /// Create a bookmark.
    pub fn new(label: impl Into<String>, page: u32) -> Self {
        Self {
            label: label.into(),
            page,
        }
    }
}

/// Pair each label with the start page of the document at the same position.
///
/// An empty label list yields no bookmarks.
///
/// # Errors
///
/// Returns [`PdfCombineError::BookmarkCountMismatch`] if there are labels
/// but not exactly one per laid-out document.
pub fn pair_bookmarks(labels: &[String], layout: &Layout) -> Result<Vec<Bookmark>> {
    if labels.is_empty() {
        return Ok(Vec::new());
    }

    if labels.len() != layout.len() {
        return Err(PdfCombineError::BookmarkCountMismatch {
            labels: labels.len(),
            files: layout.len(),
        });
    }

    Ok(labels
        .iter()
        .zip(layout.start_pages())
        .map(|(label, &page)| Bookmark::new(label.clone(), page))
        .collect())
}

/// Generated (or user supplied) pdfmark program.
///
/// An empty script means no script has to be passed to the engine at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MetadataScript(String);

impl MetadataScript {
    /// Wrap script text as-is.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Whether there is nothing to run.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Script text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the script text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MetadataScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

enum Directive<'a> {
    DocInfo { key: &'static str, value: &'a str },
    Outline { page: u32, label: &'a str },
}

impl fmt::Display for Directive<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DocInfo { key, value } => {
                write!(f, "[ /{key} {} /DOCINFO pdfmark", encode_text(value))
            }
            Self::Outline { page, label } => {
                write!(f, "[ /Page {page} /Title {} /OUT pdfmark", encode_text(label))
            }
        }
    }
}

/// Build the metadata script for a title, an author and outline entries.
///
/// Blank title or author are left out. Returns an empty script when there
/// is nothing to set.
///
/// # Examples
///
/// ```
/// use pdfcombine::merge::script::{synthesize, Bookmark};
///
/// let script = synthesize(Some("T"), None, &[Bookmark::new("A", 1), Bookmark::new("B", 5)]);
/// assert_eq!(
///     script.as_str(),
///     "[ /Title (T) /DOCINFO pdfmark\n\
///      [ /Page 1 /Title (A) /OUT pdfmark\n\
///      [ /Page 5 /Title (B) /OUT pdfmark"
/// );
/// ```
pub fn synthesize(
    title: Option<&str>,
    author: Option<&str>,
    bookmarks: &[Bookmark],
) -> MetadataScript {
    let mut directives = Vec::with_capacity(bookmarks.len() + 2);

    if let Some(value) = title.filter(|t| !t.is_empty()) {
        directives.push(Directive::DocInfo {
            key: "Title",
            value,
        });
    }

    if let Some(value) = author.filter(|a| !a.is_empty()) {
        directives.push(Directive::DocInfo {
            key: "Author",
            value,
        });
    }

    directives.extend(bookmarks.iter().map(|b| Directive::Outline {
        page: b.page,
        label: &b.label,
    }));

    let lines: Vec<String> = directives.iter().map(ToString::to_string).collect();
    MetadataScript(lines.join("\n"))
}

/// Apply a user override and append fragment to a generated script.
///
/// The override replaces the generated script entirely; the fragment is
/// added on its own line after whichever script results. Neither is
/// inspected.
pub fn compose(
    generated: MetadataScript,
    override_script: Option<&str>,
    append: Option<&str>,
) -> MetadataScript {
    let mut text = match override_script {
        Some(script) => script.to_string(),
        None => generated.into_string(),
    };

    if let Some(fragment) = append {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(fragment);
    }

    MetadataScript(text)
}

/// Encode text as a PostScript string operand.
///
/// Printable ASCII becomes a literal string with `\`, `(` and `)` escaped.
/// Anything else becomes `<FEFF...>`: the UTF-16BE code units, prefixed by
/// the byte order mark, as uppercase hex.
pub fn encode_text(text: &str) -> String {
    if text.bytes().all(|b| (0x20..=0x7e).contains(&b)) {
        let mut out = String::with_capacity(text.len() + 2);
        out.push('(');
        for c in text.chars() {
            if matches!(c, '\\' | '(' | ')') {
                out.push('\\');
            }
            out.push(c);
        }
        out.push(')');
        out
    } else {
        let hex: String = text
            .encode_utf16()
            .map(|unit| format!("{unit:04X}"))
            .collect();
        format!("<FEFF{hex}>")
    }
}
