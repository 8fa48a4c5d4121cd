use std::process::{Command, Stdio};

use crate::error::{DocCovError, Result};

/// Fails unless the nightly toolchain needed for rustdoc JSON is installed.
pub fn ensure_nightly() -> Result<()> {
    let output = Command::new("rustup")
        .args(["run", "nightly", "rustc", "--version"])
        .stderr(Stdio::null())
        .output()
        .map_err(|e| DocCovError::Generate(format!("Failed to run rustup: {e}")))?;

    if !output.status.success() {
        return Err(DocCovError::Generate(
            "rustdoc JSON requires the nightly toolchain. \
            Run: rustup toolchain install nightly"
                .to_string(),
        ));
    }
    Ok(())
}
