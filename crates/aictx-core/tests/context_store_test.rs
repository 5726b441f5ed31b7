//! Integration tests for the context store.
//!
//! Each test works in its own temporary project directory.

use aictx_core::{
    AppConfig, ContextStore, ErrorCode, FileMetadataProvider, FileStat, ProjectLayout,
    ProviderKind, ProvidersConfig, RepositoryInfo, Retrieval, SecretPolicy, SyncOutcome,
};
use aictx_core::traits::Confirmation;
use chrono::{Duration, TimeZone, Utc};
use mockall::mock;
use std::path::Path;
use tempfile::TempDir;

mock! {
    pub Repo {}
    impl RepositoryInfo for Repo {
        fn project_name(&self, root: &Path) -> Option<String>;
        fn branch(&self, root: &Path) -> Option<String>;
    }
}

mock! {
    pub Metadata {}
    impl FileMetadataProvider for Metadata {
        fn stat(&self, path: &Path) -> Option<FileStat>;
    }
}

mock! {
    pub Confirm {}
    impl Confirmation for Confirm {
        fn confirm(&self, question: &str) -> bool;
    }
}

fn repo(project: &str, branch: &str) -> MockRepo {
    let mut repo = MockRepo::new();
    repo.expect_project_name()
        .return_const(Some(project.to_string()));
    repo.expect_branch().return_const(Some(branch.to_string()));
    repo
}

fn project() -> (TempDir, ContextStore) {
    project_with(AppConfig::builder().audit(false).build())
}

fn project_with(config: AppConfig) -> (TempDir, ContextStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = ContextStore::new(ProjectLayout::new(dir.path()), &config)
        .with_repository(Box::new(repo("demo", "main")));
    (dir, store)
}

fn read(dir: &TempDir, relative: &str) -> String {
    std::fs::read_to_string(dir.path().join(relative)).unwrap()
}

/// Store followed by retrieve yields a block headed by the category with the content verbatim.
#[test]
fn test_store_then_retrieve_round_trip() {
    let (_dir, store) = project();
    let pairs = [
        ("architecture", "Microservices with event sourcing"),
        ("api-design", "Version endpoints under /v2 (see docs/api.md)"),
        ("testing_notes", "Run cargo test --workspace before pushing!"),
    ];

    for (category, content) in pairs {
        store.store(category, content, &SecretPolicy::Deny).unwrap();
    }

    let Retrieval::Full(text) = store.retrieve(None).unwrap() else {
        panic!("expected full log");
    };
    for (category, content) in pairs {
        let header = format!("## [{}] ", category);
        let start = text.find(&header).expect("header present");
        let block = &text[start..];
        let body = block.split_once('\n').unwrap().1;
        assert!(body.starts_with(content), "content for {} stored verbatim", category);
    }
}

/// Example scenario from end to end.
#[test]
fn test_architecture_scenario() {
    let (dir, store) = project();
    let receipt = store
        .store("architecture", "Microservices with event sourcing", &SecretPolicy::Deny)
        .unwrap();
    assert!(receipt.created_log);

    let log = read(&dir, ".ai-context/memory.md");
    let header = receipt.entry.header();
    assert!(header.starts_with("## [architecture] "));
    assert!(log.contains(&format!("{}\nMicroservices with event sourcing\n", header)));

    let claude = read(&dir, "CLAUDE.md");
    assert!(claude.starts_with("<!-- aictx:begin -->\n"));
    assert!(claude.contains("Project: demo | Branch: main"));
    assert!(claude.contains("@.ai-context/memory.md"));

    let Retrieval::Matches(blocks) = store.retrieve(Some("microservices")).unwrap() else {
        panic!("expected matches");
    };
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].category, "architecture");
    assert_eq!(blocks[0].body(), "Microservices with event sourcing");
}

#[test]
fn test_filter_returns_only_matching_blocks() {
    let (_dir, store) = project();
    store.store("backend", "Postgres for storage", &SecretPolicy::Deny).unwrap();
    store.store("frontend", "React with Vite", &SecretPolicy::Deny).unwrap();
    store.store("infra", "Postgres replicas in two regions", &SecretPolicy::Deny).unwrap();

    let Retrieval::Matches(blocks) = store.retrieve(Some("POSTGRES")).unwrap() else {
        panic!("expected matches");
    };
    let categories: Vec<_> = blocks.iter().map(|b| b.category.as_str()).collect();
    assert_eq!(categories, vec!["backend", "infra"]);
    assert!(blocks.iter().all(|b| b.text.to_lowercase().contains("postgres")));

    assert_eq!(store.retrieve(Some("kubernetes")).unwrap(), Retrieval::NoMatches);
}

#[test]
fn test_retrieve_without_log_is_not_found() {
    let (_dir, store) = project();
    let err = store.retrieve(None).unwrap_err();
    assert_eq!(err.code(), ErrorCode::NfLog);
    assert_eq!(store.retrieve(Some("x")).unwrap_err().code(), ErrorCode::NfLog);
}

#[test]
fn test_category_validation() {
    let (dir, store) = project();
    let err = store.store("123invalid", "text", &SecretPolicy::Deny).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValInvalidIdentifier);
    assert!(!dir.path().join(".ai-context").exists());

    assert!(store.store("architecture", "text", &SecretPolicy::Deny).is_ok());
}

#[test]
fn test_secret_rejected_without_writing() {
    let (dir, store) = project();
    store.store("notes", "first entry", &SecretPolicy::Deny).unwrap();
    let before = read(&dir, ".ai-context/memory.md");

    let err = store
        .store("notes", "api_key: abc123", &SecretPolicy::Deny)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::SecPatternMatch);
    assert_eq!(read(&dir, ".ai-context/memory.md"), before);

    let err = store
        .store("credentials", "harmless", &SecretPolicy::Deny)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::SecDeniedCategory);
}

#[test]
fn test_secret_prompt_answers() {
    let (dir, store) = project();

    let mut decline = MockConfirm::new();
    decline.expect_confirm().times(1).return_const(false);
    let err = store
        .store("notes", "token = abc", &SecretPolicy::Prompt(&decline))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::SecPatternMatch);
    assert!(!dir.path().join(".ai-context/memory.md").exists());

    let mut accept = MockConfirm::new();
    accept.expect_confirm().times(1).return_const(true);
    store
        .store("notes", "token = abc", &SecretPolicy::Prompt(&accept))
        .unwrap();
    assert!(read(&dir, ".ai-context/memory.md").contains("token = abc"));

    store
        .store("notes", "password: override", &SecretPolicy::Allow)
        .unwrap();
}

#[test]
fn test_sync_twice_is_idempotent() {
    let (dir, store) = project();
    store.store("notes", "seed", &SecretPolicy::Deny).unwrap();

    let first = store.sync().unwrap();
    let snapshot: Vec<_> = ["CLAUDE.md", ".cursorrules", ".github/copilot-instructions.md"]
        .iter()
        .map(|p| read(&dir, p))
        .collect();

    let second = store.sync().unwrap();
    for (path, before) in ["CLAUDE.md", ".cursorrules", ".github/copilot-instructions.md"]
        .iter()
        .zip(&snapshot)
    {
        assert_eq!(&read(&dir, path), before, "{} changed on resync", path);
    }

    for report in [&first, &second] {
        assert_eq!(report.outcome(ProviderKind::Claude), Some(&SyncOutcome::Unchanged));
        assert_eq!(report.outcome(ProviderKind::Cursor), Some(&SyncOutcome::Unchanged));
        assert_eq!(report.outcome(ProviderKind::Copilot), Some(&SyncOutcome::Unchanged));
    }

    #[cfg(unix)]
    {
        assert_eq!(second.outcome(ProviderKind::Windsurf), Some(&SyncOutcome::Linked));
        let link = dir.path().join(".windsurfrules");
        assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(std::fs::read_to_string(&link).unwrap(), read(&dir, ".ai-context/memory.md"));
    }
}

#[test]
fn test_sync_without_log_fails() {
    let (_dir, store) = project();
    assert_eq!(store.sync().unwrap_err().code(), ErrorCode::NfLog);
}

#[cfg(unix)]
#[test]
fn test_status_after_three_stores() {
    let (_dir, store) = project();
    for i in 0..3 {
        store
            .store("notes", &format!("entry number {}", i), &SecretPolicy::Deny)
            .unwrap();
    }

    let status = store.status().unwrap();
    assert!(status.log_exists);
    assert_eq!(status.entry_count, 3);
    assert!(status.all_providers_present());
    assert!(!status.secrets_suspected);
}

#[test]
fn test_status_flags_secrets_and_ignore() {
    let (dir, store) = project();
    std::fs::create_dir(dir.path().join(".git")).unwrap();
    store.store("notes", "secret: x", &SecretPolicy::Allow).unwrap();

    let status = store.status().unwrap();
    assert!(status.gitignored);
    assert!(status.secrets_suspected);
    assert_eq!(read(&dir, ".gitignore"), "# aictx context log\n.ai-context/\n");
}

#[test]
fn test_existing_ignore_list_gets_entry() {
    let (dir, store) = project();
    std::fs::write(dir.path().join(".gitignore"), "target/\n").unwrap();
    store.store("notes", "hello", &SecretPolicy::Deny).unwrap();
    store.store("notes", "again", &SecretPolicy::Deny).unwrap();

    assert_eq!(read(&dir, ".gitignore"), "target/\n.ai-context/\n");
}

#[test]
fn test_user_content_preserved_and_imported() {
    let (dir, store) = project();
    std::fs::write(dir.path().join("CLAUDE.md"), "# House rules\nAlways write tests.\n").unwrap();

    let receipt = store.store("notes", "first", &SecretPolicy::Deny).unwrap();
    assert_eq!(receipt.imported.imported, vec![ProviderKind::Claude]);
    assert_eq!(
        receipt.sync.unwrap().outcome(ProviderKind::Claude),
        Some(&SyncOutcome::Prepended)
    );

    let claude = read(&dir, "CLAUDE.md");
    assert!(claude.ends_with("<!-- aictx:end -->\n\n# House rules\nAlways write tests.\n"));

    let log = read(&dir, ".ai-context/memory.md");
    assert!(log.contains("<!-- source: CLAUDE.md -->\n# House rules\nAlways write tests."));
    assert_eq!(store.status().unwrap().entry_count, 2);
}

#[test]
fn test_import_command_is_one_shot() {
    let (dir, store) = project();
    std::fs::write(dir.path().join(".cursorrules"), "Prefer small functions\n").unwrap();

    let report = store.import().unwrap();
    assert!(report.created_log);
    assert_eq!(report.stats.imported, vec![ProviderKind::Cursor]);
    assert_eq!(
        report.sync.outcome(ProviderKind::Cursor),
        Some(&SyncOutcome::Prepended)
    );

    let again = store.import().unwrap();
    assert!(!again.created_log);
    assert!(again.stats.imported.is_empty());
    assert_eq!(store.status().unwrap().entry_count, 1);
}

#[test]
fn test_disabled_providers_not_written() {
    let config = AppConfig::builder()
        .audit(false)
        .providers(ProvidersConfig {
            copilot: false,
            windsurf: false,
            ..Default::default()
        })
        .build();
    let (dir, store) = project_with(config);
    store.store("notes", "hello", &SecretPolicy::Deny).unwrap();

    assert!(dir.path().join("CLAUDE.md").exists());
    assert!(!dir.path().join(".github").exists());
    assert!(std::fs::symlink_metadata(dir.path().join(".windsurfrules")).is_err());

    let status = store.status().unwrap();
    assert!(!status.providers[2].enabled);
}

#[test]
fn test_doc_uses_file_metadata() {
    let (dir, store) = project();
    std::fs::create_dir(dir.path().join("docs")).unwrap();
    std::fs::write(dir.path().join("docs/setup.md"), "# Setup").unwrap();

    let mut metadata = MockMetadata::new();
    metadata.expect_stat().returning(|_| {
        Some(FileStat {
            modified: Some(Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap()),
            size: Some(2048),
        })
    });
    let store = store.with_metadata(Box::new(metadata));

    let receipt = store
        .doc(&dir.path().join("docs/setup.md"), Some("Local setup guide"), &SecretPolicy::Deny)
        .unwrap();
    assert_eq!(receipt.entry.category, "documentation");
    assert_eq!(
        receipt.entry.content,
        "Documented docs/setup.md: Local setup guide (modified 2026-04-01T09:00:00Z, 2048 bytes)"
    );

    let err = store
        .doc(Path::new("docs/missing.md"), None, &SecretPolicy::Deny)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NfFile);
}

#[test]
fn test_recent_docs_window() {
    let (dir, store) = project();
    let fresh = dir.path().join("CHANGELOG.md");
    let stale = dir.path().join("OLD.md");
    std::fs::write(&fresh, "new").unwrap();
    std::fs::write(&stale, "old").unwrap();

    let thirty_days_ago = Utc::now() - Duration::days(30);
    filetime::set_file_mtime(
        &stale,
        filetime::FileTime::from_unix_time(thirty_days_ago.timestamp(), 0),
    )
    .unwrap();

    let recent = store.recent_docs(7).unwrap();
    let paths: Vec<_> = recent.iter().map(|d| d.path.to_string_lossy().into_owned()).collect();
    assert_eq!(paths, vec!["CHANGELOG.md"]);

    let wider = store.recent_docs(60).unwrap();
    assert_eq!(wider.len(), 2);
    assert_eq!(wider[0].path, Path::new("CHANGELOG.md"));

    assert_eq!(
        store.recent_docs(0).unwrap_err().code(),
        ErrorCode::ValOutOfRange
    );
}

#[test]
fn test_repository_fallback_in_templates() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = MockRepo::new();
    repo.expect_project_name().return_const(None::<String>);
    repo.expect_branch().return_const(None::<String>);

    let config = AppConfig::builder().audit(false).build();
    let store = ContextStore::new(ProjectLayout::new(dir.path()), &config)
        .with_repository(Box::new(repo));
    store.store("notes", "hello", &SecretPolicy::Deny).unwrap();

    let dir_name = dir.path().file_name().unwrap().to_string_lossy().into_owned();
    let copilot = read(&dir, ".github/copilot-instructions.md");
    assert!(copilot.contains(&format!("Project: {}\n", dir_name)));
    assert!(copilot.contains("Branch: none\n"));
}

#[test]
fn test_header_like_content_counts_once() {
    let (_dir, store) = project();
    store
        .store("notes", "## [architecture] fake entry here", &SecretPolicy::Deny)
        .unwrap();
    store
        .store("notes", "## [architecture] 2026-01-01T00:00:00Z", &SecretPolicy::Deny)
        .unwrap();

    assert_eq!(store.status().unwrap().entry_count, 2);

    let Retrieval::Matches(blocks) = store.retrieve(Some("fake")).unwrap() else {
        panic!("expected matches");
    };
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].category, "notes");
    assert_eq!(blocks[0].body(), "## [architecture] fake entry here");
}

#[test]
fn test_failing_provider_does_not_block_others() {
    let (dir, store) = project();
    std::fs::write(dir.path().join(".windsurfrules"), "my own rules\n").unwrap();

    let receipt = store.store("notes", "hello", &SecretPolicy::Deny).unwrap();
    let report = receipt.sync.expect("sync ran");

    assert!(matches!(
        report.outcome(ProviderKind::Windsurf),
        Some(SyncOutcome::Failed(_))
    ));
    for kind in [ProviderKind::Claude, ProviderKind::Cursor, ProviderKind::Copilot] {
        assert_eq!(report.outcome(kind), Some(&SyncOutcome::Created), "{}", kind);
    }
    assert_eq!(report.failures().count(), 1);
    assert_eq!(read(&dir, ".windsurfrules"), "my own rules\n");
    assert!(read(&dir, ".ai-context/memory.md").contains("\nhello\n"));
}

#[cfg(unix)]
#[test]
fn test_linked_instructions_file_keeps_link() {
    let (dir, store) = project();
    std::fs::write(dir.path().join("AGENTS.md"), "Shared rules\n").unwrap();
    std::os::unix::fs::symlink("AGENTS.md", dir.path().join("CLAUDE.md")).unwrap();

    let receipt = store.store("notes", "hello", &SecretPolicy::Deny).unwrap();
    assert_eq!(receipt.imported.imported, vec![ProviderKind::Claude]);
    assert_eq!(
        receipt.sync.unwrap().outcome(ProviderKind::Claude),
        Some(&SyncOutcome::Prepended)
    );

    let link = dir.path().join("CLAUDE.md");
    assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    let agents = read(&dir, "AGENTS.md");
    assert!(agents.contains("@.ai-context/memory.md"));
    assert!(agents.ends_with("\n\nShared rules\n"));

    let second = store.sync().unwrap();
    assert_eq!(second.outcome(ProviderKind::Claude), Some(&SyncOutcome::Unchanged));
}
