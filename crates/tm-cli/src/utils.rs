use anyhow::{Context, Result};
use tokio::fs;
use tokio::io::{self, AsyncReadExt};

/// Read all content from file at `path`, or from stdin if `path` is `None`.
///
/// # Errors
///
/// When failed to read the file or stdin, or content is not utf-8.
pub async fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read input file {path}")),
        None => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .await
                .context("failed to read stdin")?;
            Ok(content)
        }
    }
}
