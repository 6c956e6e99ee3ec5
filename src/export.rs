//! Assistant context export: the rendered dashboard as plain text, copied to
//! a clipboard, followed by an attempt to open the assistant.

use std::io::Write;
use std::process::{Child, Command, Stdio};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ClipboardError;
use crate::render::DashboardPage;

const SUGGESTED_QUESTIONS: &[&str] = &[
    "Which cluster needs attention first?",
    "What's growing the fastest?",
    "When should I add more storage?",
    "Analyze the capacity trends",
];

pub fn build_context(page: &DashboardPage) -> String {
    let mut out = String::from("=== COHESITY CAPACITY DASHBOARD CONTEXT ===\n\n");
    let label = if page.last_update.trim().is_empty() {
        "Unknown"
    } else {
        page.last_update.trim()
    };
    out.push_str(&format!("Last Updated: {}\n\n", label));

    let summary = page.executive_summary.plain_text();
    if !summary.trim().is_empty() {
        out.push_str("SYSTEM ANALYSIS:\n");
        out.push_str(summary.trim());
        out.push_str("\n\n");
    }

    if !page.consumers.stats.trim().is_empty() {
        out.push_str("STORAGE CONSUMERS:\n");
        out.push_str(page.consumers.stats.trim());
        out.push_str("\n\n");
    }

    if !page.clusters.is_empty() {
        out.push_str("CLUSTER STATUS:\n");
        for card in &page.clusters.rows {
            out.push_str(&card.plain_text());
            out.push('\n');
        }
        out.push('\n');
    }

    out.push_str("=== END CONTEXT ===\n\n");
    out.push_str("You can now ask Claude AI questions about this data, such as:\n");
    for q in SUGGESTED_QUESTIONS {
        out.push_str(&format!("- \"{}\"\n", q));
    }
    out
}

pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

pub trait Launcher: Send + Sync {
    /// True when the URI was handed to something that opened it.
    fn open(&self, uri: &str) -> bool;
}

/// Pipes the text into a configured program such as `wl-copy` or `xclip`.
pub struct CommandClipboard {
    command: Vec<String>,
}

impl CommandClipboard {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

impl Clipboard for CommandClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let Some((program, args)) = self.command.split_first() else {
            return Err(ClipboardError::Unavailable);
        };
        let io_err = |source| ClipboardError::Io {
            command: program.clone(),
            source,
        };

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(io_err)?;

        feed_stdin(&mut child, text.as_bytes()).map_err(io_err)?;

        let status = child.wait().map_err(io_err)?;
        if !status.success() {
            return Err(ClipboardError::Denied {
                command: program.clone(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

/// Write `bytes` to the child's stdin and close it. On a failed write the
/// child is killed and reaped before the error is returned.
fn feed_stdin(child: &mut Child, bytes: &[u8]) -> std::io::Result<()> {
    let Some(mut stdin) = child.stdin.take() else {
        return Ok(());
    };
    if let Err(e) = stdin.write_all(bytes) {
        drop(stdin);
        let _ = child.kill();
        let _ = child.wait();
        return Err(e);
    }
    Ok(())
}

/// Runs a configured opener (`xdg-open`, `open`) with the URI as last argument.
pub struct CommandLauncher {
    command: Vec<String>,
}

impl CommandLauncher {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

impl Launcher for CommandLauncher {
    fn open(&self, uri: &str) -> bool {
        let Some((program, args)) = self.command.split_first() else {
            return false;
        };
        match Command::new(program)
            .args(args)
            .arg(uri)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) => status.success(),
            Err(e) => {
                debug!(%uri, "launcher {} failed: {}", program, e);
                false
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShareReport {
    pub copied: bool,
    pub opened: Option<String>,
    pub message: String,
}

/// Copy `text`, then try `uris` in order until one opens. Only the copy
/// decides success.
pub fn share_context(
    text: &str,
    clipboard: &dyn Clipboard,
    launcher: &dyn Launcher,
    uris: &[String],
) -> Result<ShareReport, ClipboardError> {
    clipboard.write_text(text)?;

    let opened = uris.iter().find(|uri| launcher.open(uri)).cloned();
    let message = match &opened {
        Some(uri) => {
            info!(%uri, "assistant launched");
            "✅ Context copied to clipboard!\n\nClaude Desktop should open. Paste the context and ask your question."
        }
        None => {
            warn!("no assistant launcher succeeded");
            "✅ Context copied to clipboard!\n\nOpen Claude Desktop manually and paste to get started."
        }
    };

    Ok(ShareReport {
        copied: true,
        opened,
        message: message.to_string(),
    })
}

pub fn failure_report(err: &ClipboardError) -> ShareReport {
    ShareReport {
        copied: false,
        opened: None,
        message: format!("❌ Could not prepare context. Error: {}", err),
    }
}
