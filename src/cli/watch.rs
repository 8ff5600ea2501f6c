//! Watch mode for `docsplice build -w`.
//!
//! ```text
//! notify ─► Debouncer (timing, dedup) ─► plan_changes (paths → actions) ─► Builder
//! ```
//!
//! Besides the docs root, the component sources directory is watched: adding
//! or removing `packages/components/{id}` toggles the contributors section of
//! `{component_docs}/{id}.md`, so that page is re-processed.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use notify::{RecursiveMode, Watcher};
use rustc_hash::FxHashMap;

use super::build::Builder;
use super::common::collect_all_files;
use crate::logger::WatchStatus;
use crate::utils::path::normalize_path;
use crate::utils::plural_count;
use crate::{debug, log};

/// Quiet period before a batch of changes is applied.
const DEBOUNCE_MS: u64 = 300;

/// Editor artifacts and hidden files.
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// Block and re-process changed files until the watcher disconnects.
pub fn watch_docs(builder: &Builder) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = tx.send(res);
    })
    .context("failed to start file watcher")?;

    let config = builder.config();
    for path in [config.docs_root(), config.components_root()] {
        if path.exists() {
            watcher
                .watch(&path, RecursiveMode::Recursive)
                .with_context(|| format!("failed to watch {}", path.display()))?;
            debug!("watch"; "watching {}", path.display());
        }
    }

    let docs = config.project_relative(builder.docs_root());
    log!("watch"; "watching {} for changes", docs.display());

    let mut debouncer = Debouncer::new();
    let mut status = WatchStatus::new();

    loop {
        match rx.recv_timeout(debouncer.sleep_duration()) {
            Ok(Ok(event)) => debouncer.add_event(&event),
            Ok(Err(e)) => log!("watch"; "notify error: {}", e),
            Err(RecvTimeoutError::Timeout) => {
                if let Some(changes) = debouncer.take_if_ready() {
                    let actions = plan_changes(builder, changes);
                    apply_actions(builder, &actions, &mut status);
                }
            }
            Err(RecvTimeoutError::Disconnected) => return Ok(()),
        }
    }
}

// =============================================================================
// Change types
// =============================================================================

/// What happened to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// Work derived from a batch of changes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Action {
    /// Transform or copy the source again.
    Process(PathBuf),
    /// Delete the output of a removed source.
    Remove(PathBuf),
}

// =============================================================================
// Debouncer
// =============================================================================

/// Collects notify events until no new one arrived for [`DEBOUNCE_MS`].
struct Debouncer {
    changes: FxHashMap<PathBuf, ChangeKind>,
    last_event: Option<Instant>,
}

impl Debouncer {
    fn new() -> Self {
        Self {
            changes: FxHashMap::default(),
            last_event: None,
        }
    }

    /// Record a notify event.
    ///
    /// - Removed, then Created/Modified: restored, keep the new kind
    /// - Modified, then Removed: deleted
    /// - Created, then Removed: never existed for us, drop it
    /// - otherwise the first event wins
    fn add_event(&mut self, event: &notify::Event) {
        use notify::EventKind;

        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Remove(_) => ChangeKind::Removed,
            EventKind::Modify(notify::event::ModifyKind::Metadata(_)) => return,
            EventKind::Modify(_) => ChangeKind::Modified,
            _ => return,
        };

        for path in &event.paths {
            if is_temp_file(path) {
                continue;
            }

            let path = normalize_path(path);

            if let Some(&existing) = self.changes.get(&path) {
                match (existing, kind) {
                    (ChangeKind::Removed, ChangeKind::Created | ChangeKind::Modified) => {
                        self.changes.insert(path, kind);
                    }
                    (ChangeKind::Modified, ChangeKind::Removed) => {
                        self.changes.insert(path, ChangeKind::Removed);
                    }
                    (ChangeKind::Created, ChangeKind::Removed) => {
                        self.changes.remove(&path);
                    }
                    _ => continue,
                }
                self.last_event = Some(Instant::now());
                continue;
            }

            debug!("watch"; "{}: {}", kind.label(), path.display());
            self.changes.insert(path, kind);
            self.last_event = Some(Instant::now());
        }
    }

    fn is_ready(&self) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };
        last_event.elapsed() >= Duration::from_millis(DEBOUNCE_MS) && !self.changes.is_empty()
    }

    /// Take the collected changes once the quiet period has passed.
    fn take_if_ready(&mut self) -> Option<FxHashMap<PathBuf, ChangeKind>> {
        if !self.is_ready() {
            // a lone Created+Removed pair leaves nothing to wait for
            if self.changes.is_empty() {
                self.last_event = None;
            }
            return None;
        }

        self.last_event = None;
        Some(std::mem::take(&mut self.changes))
    }

    /// Time until the pending batch could be ready.
    fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return Duration::from_secs(86400);
        };

        Duration::from_millis(DEBOUNCE_MS)
            .saturating_sub(last_event.elapsed())
            .max(Duration::from_millis(1))
    }
}

// =============================================================================
// Planning
// =============================================================================

/// Turn raw changes into build actions.
///
/// Reported kinds are corrected against the file system first: an atomic
/// save can arrive as Removed for a file that still exists.
fn plan_changes(builder: &Builder, changes: FxHashMap<PathBuf, ChangeKind>) -> Vec<Action> {
    let config = builder.config();
    let docs_root = builder.docs_root();
    let components_root = config.components_root();
    let component_docs = builder.transform().component_docs();

    let mut actions = BTreeSet::new();

    for (path, kind) in changes {
        if path.starts_with(config.output_dir()) {
            continue;
        }

        let exists = path.exists();
        let kind = match kind {
            ChangeKind::Removed if exists => ChangeKind::Modified,
            ChangeKind::Created | ChangeKind::Modified if !exists => ChangeKind::Removed,
            kind => kind,
        };

        if path.starts_with(docs_root) {
            match kind {
                ChangeKind::Removed => {
                    actions.insert(Action::Remove(path));
                }
                _ if path.is_dir() => {
                    // directories moved in may not report their files
                    if kind == ChangeKind::Created {
                        actions.extend(
                            collect_all_files(&path)
                                .into_iter()
                                .filter(|f| builder.accepts(f))
                                .map(Action::Process),
                        );
                    }
                }
                _ => {
                    if builder.accepts(&path) {
                        actions.insert(Action::Process(path));
                    }
                }
            }
            continue;
        }

        // a component source directory appeared or vanished
        if kind != ChangeKind::Modified
            && let Ok(rel) = path.strip_prefix(&components_root)
            && rel.components().count() == 1
        {
            let page = component_docs.join(format!("{}.md", rel.display()));
            if page.is_file() {
                actions.insert(Action::Process(page));
            }
        }
    }

    actions.into_iter().collect()
}

fn apply_actions(builder: &Builder, actions: &[Action], status: &mut WatchStatus) {
    if actions.is_empty() {
        return;
    }

    let config = builder.config();
    let mut changed = Vec::new();
    let mut errors = Vec::new();

    for action in actions {
        let result = match action {
            Action::Process(path) => builder.process(path).map(|record| record.written),
            Action::Remove(path) => builder.remove(path),
        };
        let (Action::Process(path) | Action::Remove(path)) = action;
        let display = config.project_relative(path).display().to_string();
        match result {
            Ok(true) => changed.push(display),
            Ok(false) => {}
            Err(e) => errors.push(format!("{display}: {e:#}")),
        }
    }

    if !errors.is_empty() {
        let summary = format!("failed {}", plural_count(errors.len(), "file"));
        status.error(&summary, &errors.join("\n"));
    } else if changed.is_empty() {
        status.unchanged("no output changes");
    } else if let [single] = changed.as_slice() {
        status.success(&format!("updated {single}"));
    } else {
        status.success(&format!("updated {}", plural_count(changed.len(), "file")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SiteConfig, test_config};
    use std::fs;
    use tempfile::TempDir;

    fn make_event(paths: Vec<&str>, kind: notify::EventKind) -> notify::Event {
        notify::Event {
            kind,
            paths: paths.into_iter().map(PathBuf::from).collect(),
            attrs: Default::default(),
        }
    }

    fn modify_kind() -> notify::EventKind {
        notify::EventKind::Modify(notify::event::ModifyKind::Data(
            notify::event::DataChange::Any,
        ))
    }

    fn create_kind() -> notify::EventKind {
        notify::EventKind::Create(notify::event::CreateKind::File)
    }

    fn remove_kind() -> notify::EventKind {
        notify::EventKind::Remove(notify::event::RemoveKind::File)
    }

    #[test]
    fn test_debouncer_routes_by_kind() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&make_event(vec!["/tmp/docs/a.md"], create_kind()));
        debouncer.add_event(&make_event(vec!["/tmp/docs/b.md"], modify_kind()));
        debouncer.add_event(&make_event(vec!["/tmp/docs/c.md"], remove_kind()));

        assert_eq!(debouncer.changes.len(), 3);
        assert_eq!(debouncer.changes[&PathBuf::from("/tmp/docs/a.md")], ChangeKind::Created);
        assert_eq!(debouncer.changes[&PathBuf::from("/tmp/docs/b.md")], ChangeKind::Modified);
        assert_eq!(debouncer.changes[&PathBuf::from("/tmp/docs/c.md")], ChangeKind::Removed);
    }

    #[test]
    fn test_debouncer_ignores_metadata_and_temp_files() {
        let mut debouncer = Debouncer::new();
        let metadata = notify::EventKind::Modify(notify::event::ModifyKind::Metadata(
            notify::event::MetadataKind::Any,
        ));
        debouncer.add_event(&make_event(vec!["/tmp/docs/a.md"], metadata));
        debouncer.add_event(&make_event(vec!["/tmp/docs/.a.md.swp"], modify_kind()));
        debouncer.add_event(&make_event(vec!["/tmp/docs/a.md~"], modify_kind()));

        assert!(debouncer.changes.is_empty());
        assert!(debouncer.last_event.is_none());
    }

    #[test]
    fn test_debouncer_transitions() {
        let mut debouncer = Debouncer::new();

        debouncer.add_event(&make_event(vec!["/tmp/docs/a.md"], remove_kind()));
        debouncer.add_event(&make_event(vec!["/tmp/docs/a.md"], create_kind()));
        assert_eq!(debouncer.changes[&PathBuf::from("/tmp/docs/a.md")], ChangeKind::Created);

        debouncer.add_event(&make_event(vec!["/tmp/docs/b.md"], modify_kind()));
        debouncer.add_event(&make_event(vec!["/tmp/docs/b.md"], remove_kind()));
        assert_eq!(debouncer.changes[&PathBuf::from("/tmp/docs/b.md")], ChangeKind::Removed);

        debouncer.add_event(&make_event(vec!["/tmp/docs/c.md"], create_kind()));
        debouncer.add_event(&make_event(vec!["/tmp/docs/c.md"], modify_kind()));
        assert_eq!(debouncer.changes[&PathBuf::from("/tmp/docs/c.md")], ChangeKind::Created);
        debouncer.add_event(&make_event(vec!["/tmp/docs/c.md"], remove_kind()));
        assert!(!debouncer.changes.contains_key(&PathBuf::from("/tmp/docs/c.md")));
    }

    #[test]
    fn test_debouncer_waits_for_quiet_period() {
        let mut debouncer = Debouncer::new();
        assert!(debouncer.take_if_ready().is_none());
        assert!(debouncer.sleep_duration() >= Duration::from_secs(3600));

        debouncer.add_event(&make_event(vec!["/tmp/docs/a.md"], modify_kind()));
        assert!(debouncer.take_if_ready().is_none());
        assert!(debouncer.sleep_duration() <= Duration::from_millis(DEBOUNCE_MS));

        debouncer.last_event = Some(Instant::now() - Duration::from_millis(DEBOUNCE_MS + 1));
        let changes = debouncer.take_if_ready().unwrap();
        assert_eq!(changes.len(), 1);
        assert!(debouncer.changes.is_empty());
        assert!(debouncer.last_event.is_none());
    }

    fn setup() -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(dir.path());
        config.project.root = normalize_path(dir.path());
        config.build.output = config.project.root.join(".docsplice");
        fs::create_dir_all(config.component_docs_root()).unwrap();
        fs::create_dir_all(config.components_root()).unwrap();
        fs::write(config.docs_root().join("index.md"), "# Home\n").unwrap();
        fs::write(config.component_docs_root().join("button.md"), "# Button\n").unwrap();
        (dir, config)
    }

    fn changes(items: &[(&PathBuf, ChangeKind)]) -> FxHashMap<PathBuf, ChangeKind> {
        items.iter().map(|(p, k)| (p.to_path_buf(), *k)).collect()
    }

    #[test]
    fn test_plan_docs_changes() {
        let (_dir, config) = setup();
        let builder = Builder::new(&config).unwrap();
        let index = config.docs_root().join("index.md");
        let gone = config.docs_root().join("gone.md");
        let output = config.output_dir().join("index.md");

        let actions = plan_changes(
            &builder,
            changes(&[
                (&index, ChangeKind::Modified),
                (&gone, ChangeKind::Modified),
                (&output, ChangeKind::Created),
            ]),
        );
        assert_eq!(actions, vec![Action::Process(index), Action::Remove(gone)]);
    }

    #[test]
    fn test_plan_removed_but_present_is_processed() {
        let (_dir, config) = setup();
        let builder = Builder::new(&config).unwrap();
        let index = config.docs_root().join("index.md");

        let actions = plan_changes(&builder, changes(&[(&index, ChangeKind::Removed)]));
        assert_eq!(actions, vec![Action::Process(index)]);
    }

    #[test]
    fn test_plan_created_directory_expands() {
        let (_dir, config) = setup();
        let builder = Builder::new(&config).unwrap();
        let guide = config.docs_root().join("guide");
        fs::create_dir(&guide).unwrap();
        fs::write(guide.join("intro.md"), "# Intro\n").unwrap();

        let actions = plan_changes(&builder, changes(&[(&guide, ChangeKind::Created)]));
        assert_eq!(actions, vec![Action::Process(guide.join("intro.md"))]);
    }

    #[test]
    fn test_plan_component_dir_toggles_page() {
        let (_dir, config) = setup();
        let builder = Builder::new(&config).unwrap();
        let button_src = config.components_root().join("button");
        fs::create_dir(&button_src).unwrap();
        let page = config.component_docs_root().join("button.md");

        let actions = plan_changes(&builder, changes(&[(&button_src, ChangeKind::Created)]));
        assert_eq!(actions, vec![Action::Process(page.clone())]);

        // files inside the component do not affect the page
        let inner = button_src.join("index.ts");
        fs::write(&inner, "").unwrap();
        let actions = plan_changes(&builder, changes(&[(&inner, ChangeKind::Created)]));
        assert!(actions.is_empty());

        // no docs page, nothing to do
        let select_src = config.components_root().join("select");
        let actions = plan_changes(&builder, changes(&[(&select_src, ChangeKind::Removed)]));
        assert!(actions.is_empty());
    }

    #[test]
    fn test_apply_updates_contributors() {
        let (_dir, config) = setup();
        let builder = Builder::new(&config).unwrap();
        let page = config.component_docs_root().join("button.md");
        let output = config.output_dir().join("en-US/component/button.md");
        let mut status = WatchStatus::new();

        apply_actions(&builder, &[Action::Process(page.clone())], &mut status);
        assert!(!fs::read_to_string(&output).unwrap().contains("Contributors"));

        fs::create_dir(config.components_root().join("button")).unwrap();
        apply_actions(&builder, &[Action::Process(page.clone())], &mut status);
        assert!(fs::read_to_string(&output).unwrap().contains("Contributors"));

        apply_actions(&builder, &[Action::Remove(page)], &mut status);
        assert!(!output.exists());
    }
}
