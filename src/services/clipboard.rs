use anyhow::{Context, Result};

pub fn copy_text(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("opening clipboard")?;
    clipboard
        .set_text(text.to_string())
        .context("writing clipboard")?;
    Ok(())
}
