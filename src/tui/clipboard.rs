//! System clipboard access for the credentials dialog.

use anyhow::{Context, Result};
use arboard::Clipboard;

/// Put `text` on the system clipboard. Fails without a display server.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    Clipboard::new()
        .context("Failed to open clipboard")?
        .set_text(text)
        .context("Failed to write clipboard")
}
