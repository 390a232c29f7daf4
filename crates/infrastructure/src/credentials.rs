use std::path::PathBuf;

use anyhow::Context;

/// Resolve the hosting-platform access token: a literal token wins,
/// otherwise it is read from the token file.
///
/// The token must have access to the `read:org` and `repo` oauth scopes.
pub fn load_token(literal: Option<&str>, token_path: &str) -> anyhow::Result<String> {
    if let Some(token) = literal {
        return Ok(token.trim().to_string());
    }

    let path = expand_home(token_path);
    let token = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read token file {}", path.display()))?;
    let token = token.trim();
    if token.is_empty() {
        anyhow::bail!("token file {} is empty", path.display());
    }

    Ok(token.to_string())
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
