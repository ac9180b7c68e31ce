// ABOUTME: Integration tests for the git-backed content fetcher.
// ABOUTME: Runs GitFetcher against a fake git script to check clone and refresh commands.

mod support;

use docker_nginx::fetch::{ContentFetcher, FetchError, GitFetcher};
use support::{fake_tool, tool_log};
use tempfile::TempDir;

const REPO: &str = "https://example.com/acme/site.git";

#[tokio::test]
async fn fresh_checkout_is_a_shallow_branch_clone() {
    let bin = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let webroot = root.path().join("www");
    let fetcher = GitFetcher::with_binary(fake_tool(bin.path(), "git", "exit 0"));

    let dest = fetcher.fetch(REPO, "main", &webroot).await.unwrap();

    assert_eq!(dest, webroot.join("site"));
    assert!(webroot.is_dir());
    assert_eq!(
        tool_log(bin.path(), "git"),
        vec![format!(
            "clone --depth 1 --branch main -- {} {}",
            REPO,
            dest.display()
        )]
    );
}

#[tokio::test]
async fn existing_checkout_is_refreshed_in_place() {
    let bin = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let dest = root.path().join("site");
    std::fs::create_dir_all(dest.join(".git")).unwrap();
    let fetcher = GitFetcher::with_binary(fake_tool(bin.path(), "git", "exit 0"));

    let fetched = fetcher.fetch(REPO, "gh-pages", root.path()).await.unwrap();

    assert_eq!(fetched, dest);
    assert_eq!(
        tool_log(bin.path(), "git"),
        vec![
            format!("-C {} fetch --depth 1 -- {} gh-pages", dest.display(), REPO),
            format!("-C {} reset --hard FETCH_HEAD", dest.display()),
        ]
    );
}

#[tokio::test]
async fn git_failure_carries_stderr() {
    let bin = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let fetcher = GitFetcher::with_binary(fake_tool(
        bin.path(),
        "git",
        "echo 'Remote branch nope not found' >&2\nexit 128",
    ));

    let err = fetcher.fetch(REPO, "nope", root.path()).await.unwrap_err();

    match err {
        FetchError::Git { command, stderr } => {
            assert_eq!(command, "clone");
            assert!(stderr.contains("nope not found"));
        }
        other => panic!("expected Git error, got {other:?}"),
    }
}

#[tokio::test]
async fn unusable_repository_never_reaches_git() {
    let bin = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let fetcher = GitFetcher::with_binary(fake_tool(bin.path(), "git", "exit 0"));

    let err = fetcher.fetch("https://example.com/.git", "main", root.path()).await;

    assert!(matches!(err, Err(FetchError::InvalidRepository(_))));
    assert!(tool_log(bin.path(), "git").is_empty());
}

#[tokio::test]
async fn refresh_failure_names_the_git_command() {
    let bin = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    std::fs::create_dir_all(root.path().join("site").join(".git")).unwrap();
    let fetcher = GitFetcher::with_binary(fake_tool(
        bin.path(),
        "git",
        "echo 'could not read from remote' >&2\nexit 128",
    ));

    let err = fetcher.fetch(REPO, "main", root.path()).await.unwrap_err();

    assert!(matches!(err, FetchError::Git { ref command, .. } if command == "fetch"));
}

#[tokio::test]
async fn option_like_branch_is_refused_before_git_runs() {
    let bin = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let marker = root.path().join("pwned");
    let dest = root.path().join("site");
    std::fs::create_dir_all(dest.join(".git")).unwrap();
    let fetcher = GitFetcher::with_binary(fake_tool(bin.path(), "git", "exit 0"));

    let branch = format!("--upload-pack=touch {}; git-upload-pack", marker.display());
    let err = fetcher.fetch(REPO, &branch, root.path()).await.unwrap_err();

    assert!(matches!(err, FetchError::InvalidBranch(_)));
    assert!(tool_log(bin.path(), "git").is_empty());
    assert!(!marker.exists());

    let err = fetcher
        .fetch("--upload-pack=touch /tmp/x", "main", root.path())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::InvalidRepository(_)));
    assert!(tool_log(bin.path(), "git").is_empty());
}
