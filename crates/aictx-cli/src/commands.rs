//! Command handlers: run one operation and print its result.

use anyhow::Result;
use std::path::{Path, PathBuf};

use aictx_core::{
    AppConfig, AuditLog, ContextStore, ImportReport, ProjectLayout, Retrieval, SecretPolicy,
    StatusReport, StoreReceipt, SyncOutcome, SyncReport,
};

use crate::cli::Command;
use crate::prompt::TerminalConfirmation;

/// Everything a command needs, built once at startup.
pub struct App {
    config: AppConfig,
    store: ContextStore,
    audit: AuditLog,
    cwd: PathBuf,
}

impl App {
    pub fn new(config: AppConfig, cwd: PathBuf) -> Self {
        let layout = ProjectLayout::discover(&cwd);
        let store = ContextStore::new(layout, &config);
        let audit = open_audit(&config);
        Self {
            config,
            store,
            audit,
            cwd,
        }
    }

    pub fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Store {
                category,
                content,
                allow_secrets,
            } => {
                let receipt =
                    self.store
                        .store(&category, &content.join(" "), &secret_policy(allow_secrets))?;
                self.record("store", &format!("category={}", receipt.entry.category));
                print_receipt(self.store.layout(), &receipt);
            }
            Command::Doc {
                path,
                description,
                allow_secrets,
            } => {
                let path = self.cwd.join(path);
                let receipt = self.store.doc(
                    &path,
                    description.as_deref(),
                    &secret_policy(allow_secrets),
                )?;
                self.record("doc", &format!("file={}", path.display()));
                print_receipt(self.store.layout(), &receipt);
            }
            Command::RecentDocs { days } => {
                let days = days.unwrap_or(self.config.recent_days);
                let docs = self.store.recent_docs(days)?;
                if docs.is_empty() {
                    println!("No documentation modified in the last {} days.", days);
                } else {
                    println!("Documentation modified in the last {} days:", days);
                    for doc in docs {
                        let size = doc
                            .size
                            .map(|s| format!("{} bytes", s))
                            .unwrap_or_else(|| "size unknown".to_string());
                        println!(
                            "  {}  {}  ({})",
                            doc.modified.format("%Y-%m-%d %H:%M"),
                            doc.path.display(),
                            size
                        );
                    }
                }
            }
            Command::Retrieve { filter } => match self.store.retrieve(filter.as_deref())? {
                Retrieval::Full(text) => print!("{}", text),
                Retrieval::Matches(blocks) => {
                    let texts: Vec<_> = blocks.iter().map(|b| b.text.as_str()).collect();
                    println!("{}", texts.join("\n\n"));
                }
                Retrieval::NoMatches => {
                    println!("No entries match '{}'.", filter.unwrap_or_default());
                }
            },
            Command::Status => print_status(&self.store.status()?),
            Command::Sync => {
                let report = self.store.sync()?;
                self.record("sync", "");
                print_sync(&report);
            }
            Command::Import => {
                let report = self.store.import()?;
                self.record(
                    "import",
                    &format!("imported={}", report.stats.imported_count()),
                );
                print_import(&report);
            }
        }
        Ok(())
    }

    fn record(&self, action: &str, detail: &str) {
        if let Err(e) = self.audit.record(action, self.store.layout().root(), detail) {
            tracing::warn!("Audit log not written: {}", e);
        }
    }
}

fn open_audit(config: &AppConfig) -> AuditLog {
    if !config.audit {
        return AuditLog::disabled();
    }
    match config.ensure_dirs() {
        Ok(()) => AuditLog::new(config.audit_log_path()),
        Err(e) => {
            tracing::warn!("Audit log disabled: {}", e);
            AuditLog::disabled()
        }
    }
}

fn secret_policy(allow_secrets: bool) -> SecretPolicy<'static> {
    static TERMINAL: TerminalConfirmation = TerminalConfirmation;

    if allow_secrets {
        SecretPolicy::Allow
    } else if TerminalConfirmation::available() {
        SecretPolicy::Prompt(&TERMINAL)
    } else {
        SecretPolicy::Deny
    }
}

fn print_receipt(layout: &ProjectLayout, receipt: &StoreReceipt) {
    let log = layout.relative(&receipt.log_path);
    if receipt.created_log {
        println!("Created {}", log.display());
    }
    if receipt.imported.imported_count() > 0 {
        println!(
            "Imported existing content from {} provider file(s)",
            receipt.imported.imported_count()
        );
    }
    println!("Stored [{}] entry in {}", receipt.entry.category, log.display());

    match &receipt.sync {
        Some(report) => {
            for (kind, reason) in report.failures() {
                eprintln!("warning: {} not synchronized: {}", kind, reason);
            }
        }
        None => eprintln!("warning: provider files were not synchronized"),
    }
}

fn print_sync(report: &SyncReport) {
    for (kind, outcome) in &report.outcomes {
        let line = format!("  {:<9} {:<34} {}", kind.to_string(), kind.relative_path(), outcome);
        match outcome {
            SyncOutcome::Failed(_) => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }
}

fn print_import(report: &ImportReport) {
    if report.created_log {
        println!("Created context log");
    }
    println!(
        "Imported {} provider file(s)",
        report.stats.imported_count()
    );
    for (kind, reason) in &report.stats.skipped {
        println!("  skipped {}: {}", kind.relative_path(), reason);
    }
    print_sync(&report.sync);
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn print_status(report: &StatusReport) {
    println!("Project:  {}", report.root.display());
    if report.log_exists {
        println!(
            "Log:      {} ({} entries, {} bytes)",
            relative_to(&report.root, &report.log_path).display(),
            report.entry_count,
            report.log_bytes
        );
    } else {
        println!("Log:      not created yet");
    }
    println!("Ignored:  {}", yes_no(report.gitignored));

    println!("Providers:");
    for provider in &report.providers {
        let state = match (provider.enabled, provider.exists) {
            (false, _) => "disabled",
            (true, true) => "present",
            (true, false) => "missing",
        };
        println!(
            "  {:<9} {:<34} {}",
            provider.kind.to_string(),
            provider.kind.relative_path(),
            state
        );
    }

    if report.secrets_suspected {
        println!("Warning:  the log may contain credentials; review it before sharing");
    }
}

fn relative_to<'a>(root: &Path, path: &'a Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}
