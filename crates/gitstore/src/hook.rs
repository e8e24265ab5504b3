//! Post-receive hook installation.

use crate::error::GitStoreResult;
use std::path::Path;

/// Template for the post-receive hook installed in every repository.
///
/// `@SIGNAL_URL@` and `@REPOSITORY@` are substituted at install time. The
/// signal endpoint is gated, so the hook forwards a bearer token from
/// `WARDEN_SIGNAL_TOKEN` when the environment provides one.
const POST_RECEIVE_TEMPLATE: &str = r#"#!/bin/sh
# Installed by wardend. Reports pushed commits to the control plane.
while read oldrev newrev refname; do
    case "$refname" in
        refs/heads/*) branch="${refname#refs/heads/}"; tag="" ;;
        refs/tags/*)  branch=""; tag="${refname#refs/tags/}" ;;
        *)            branch=""; tag="" ;;
    esac
    curl -fsS -X POST "@SIGNAL_URL@" \
        -H "Content-Type: application/json" \
        ${WARDEN_SIGNAL_TOKEN:+-H "Authorization: Bearer $WARDEN_SIGNAL_TOKEN"} \
        -d "{\"repository\":\"@REPOSITORY@\",\"commit\":\"$newrev\",\"branch\":\"$branch\",\"tag\":\"$tag\"}" \
        >/dev/null 2>&1 || true
done
"#;

/// Render the hook script for a repository.
pub fn render_post_receive(signal_url: &str, repository: &str) -> String {
    POST_RECEIVE_TEMPLATE
        .replace("@SIGNAL_URL@", signal_url)
        .replace("@REPOSITORY@", repository)
}

/// Write the post-receive hook into `<repo>/hooks` and mark it executable.
pub async fn install_post_receive(
    repo_path: &Path,
    signal_url: &str,
    repository: &str,
) -> GitStoreResult<()> {
    let hooks_dir = repo_path.join("hooks");
    tokio::fs::create_dir_all(&hooks_dir).await?;

    let hook_path = hooks_dir.join("post-receive");
    tokio::fs::write(&hook_path, render_post_receive(signal_url, repository)).await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(&hook_path, std::fs::Permissions::from_mode(0o755)).await?;
    }

    Ok(())
}
