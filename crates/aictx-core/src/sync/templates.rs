//! Provider file templates.
//!
//! Templates take typed fields and return whole documents or blocks;
//! interpolated values are stripped of control characters so they cannot
//! break out of their line.

use chrono::{DateTime, Utc};

use crate::types::TIMESTAMP_FORMAT;
use crate::validation::strip_control;

/// Marker identifying documents written by aictx.
pub const MANAGED_MARKER: &str = "aictx:managed";

/// Values substituted into provider templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFields {
    pub project: String,
    pub branch: String,
    pub timestamp: DateTime<Utc>,
    /// Log path relative to the project root.
    pub reference: String,
}

impl TemplateFields {
    pub fn new(
        project: &str,
        branch: &str,
        timestamp: DateTime<Utc>,
        reference: &str,
    ) -> Self {
        Self {
            project: strip_control(project),
            branch: strip_control(branch),
            timestamp,
            reference: strip_control(reference),
        }
    }

    fn synced(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Comment syntax of a shared provider file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `<!-- ... -->`
    Html,
    /// `# ...`
    Hash,
}

impl CommentStyle {
    fn comment(&self, text: &str) -> String {
        match self {
            CommentStyle::Html => format!("<!-- {} -->", text),
            CommentStyle::Hash => format!("# {}", text),
        }
    }

    /// Line opening the managed block.
    pub fn begin_marker(&self) -> String {
        self.comment("aictx:begin")
    }

    /// Line closing the managed block.
    pub fn end_marker(&self) -> String {
        self.comment("aictx:end")
    }
}

/// Block prepended to shared provider files.
///
/// Ends with a blank line so existing content starts on its own paragraph.
pub fn managed_block(style: CommentStyle, fields: &TemplateFields) -> String {
    let meta = style.comment(&format!(
        "Project: {} | Branch: {} | Synced: {}",
        fields.project,
        fields.branch,
        fields.synced()
    ));
    let reference = match style {
        CommentStyle::Html => format!(
            "Project context and decisions are recorded in @{}",
            fields.reference
        ),
        CommentStyle::Hash => format!(
            "# Read {} for project context and decisions.",
            fields.reference
        ),
    };

    format!(
        "{}\n{}\n{}\n{}\n\n",
        style.begin_marker(),
        meta,
        reference,
        style.end_marker()
    )
}

/// Remove the managed block from a shared provider file, leaving user content.
pub fn strip_managed_block(text: &str, style: CommentStyle) -> String {
    let begin = style.begin_marker();
    let end = style.end_marker();

    let mut out = Vec::new();
    let mut inside = false;
    for line in text.lines() {
        let trimmed = line.trim();
        if !inside && trimmed == begin {
            inside = true;
        } else if inside && trimmed == end {
            inside = false;
        } else if !inside {
            out.push(line);
        }
    }

    out.join("\n").trim().to_string()
}

/// The Copilot instructions document, owned entirely by aictx.
///
/// Carries no timestamp, so rewriting it with the same project and branch
/// is byte-identical.
pub fn copilot_document(fields: &TemplateFields) -> String {
    format!(
        "<!-- {marker} -->\n\
         # Copilot Instructions\n\
         \n\
         Project: {project}\n\
         Branch: {branch}\n\
         \n\
         Project context and decisions are recorded in [memory.md](../{reference}).\n\
         Read it before proposing changes.\n",
        marker = MANAGED_MARKER,
        project = fields.project,
        branch = fields.branch,
        reference = fields.reference,
    )
}
