// Shared helpers for integration tests.
//
// Builds a throwaway rule directory whose manifest targets live paths inside
// the same temporary directory, owned by the user running the tests, so a
// full pass can run without privileges.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use barrow::config::manifest::staging_path;
use barrow::logging::{Log, MemoryLog};
use barrow::rule::Context;

/// Name of the user and group owning newly created files.
pub fn current_owner() -> (String, String) {
    let user = nix::unistd::User::from_uid(nix::unistd::geteuid())
        .expect("lookup current user")
        .expect("current user has a passwd entry");
    let group = nix::unistd::Group::from_gid(nix::unistd::getegid())
        .expect("lookup current group")
        .expect("current group has a group entry");
    (user.name, group.name)
}

/// A system context recording its output in memory.
pub fn context(dry_run: bool) -> (Context, Arc<MemoryLog>) {
    let log = Arc::new(MemoryLog::new());
    let shared: Arc<dyn Log> = log.clone();
    (Context::system(shared, dry_run), log)
}

/// A rule directory plus the live tree it manages.
pub struct TestRule {
    /// Owns both trees.
    pub tmp: tempfile::TempDir,
}

impl TestRule {
    /// The rule directory (`FILES`, `HOOKS`, `ROOT/`).
    pub fn rule_dir(&self) -> PathBuf {
        self.tmp.path().join("rule")
    }

    /// The live tree.
    pub fn live_dir(&self) -> PathBuf {
        self.tmp.path().join("live")
    }

    /// Absolute live path for `rel`, as written in `FILES`.
    pub fn live(&self, rel: &str) -> String {
        self.live_dir().join(rel).display().to_string()
    }

    /// Staged copy of the live path for `rel`.
    pub fn staged(&self, rel: &str) -> PathBuf {
        staging_path(&self.rule_dir().join("ROOT"), &self.live(rel))
    }

    /// Contents of a live file, or `None` if it does not exist.
    pub fn read_live(&self, rel: &str) -> Option<String> {
        std::fs::read_to_string(self.live(rel)).ok()
    }

    /// Lines appended to `hook.log` by hook scripts.
    pub fn hook_log(&self) -> Vec<String> {
        self.read_live("hook.log")
            .map(|s| s.lines().map(String::from).collect())
            .unwrap_or_default()
    }

    /// Overwrite `FILES`.
    pub fn write_manifest(&self, content: &str) {
        std::fs::write(self.rule_dir().join("FILES"), content).expect("write FILES");
    }

    /// Overwrite a staged file.
    pub fn restage(&self, rel: &str, content: &str) {
        std::fs::write(self.staged(rel), content).expect("write staged file");
    }
}

/// Fluent builder for [`TestRule`].
pub struct RuleBuilder {
    rule: TestRule,
    owner: (String, String),
    files: Vec<String>,
    hooks: String,
    hooks_file: &'static str,
}

impl RuleBuilder {
    /// Begin with an empty rule directory and empty live tree.
    pub fn new() -> Self {
        let rule = TestRule {
            tmp: tempfile::tempdir().expect("create temp dir"),
        };
        std::fs::create_dir_all(rule.rule_dir().join("ROOT")).expect("create ROOT");
        std::fs::create_dir_all(rule.live_dir()).expect("create live dir");
        Self {
            rule,
            owner: current_owner(),
            files: Vec::new(),
            hooks: String::new(),
            hooks_file: "HOOKS",
        }
    }

    /// Stage a regular file and declare it with the current owner.
    pub fn file(mut self, rel: &str, mode: u32, content: &str) -> Self {
        let staged = self.rule.staged(rel);
        std::fs::create_dir_all(staged.parent().expect("staged parent"))
            .expect("create staged parent");
        std::fs::write(&staged, content).expect("write staged file");
        let line = format!("{mode:o} {} {} {}", self.owner.0, self.owner.1, self.rule.live(rel));
        self.files.push(line);
        self
    }

    /// Like [`Self::file`], but declared without the leading `/`.
    pub fn relative_file(mut self, rel: &str, mode: u32, content: &str) -> Self {
        self = self.file(rel, mode, content);
        if let Some(line) = self.files.last_mut() {
            let path = self.rule.live(rel);
            *line = line.replace(&path, path.trim_start_matches('/'));
        }
        self
    }

    /// Stage a directory and declare it with the current owner.
    pub fn dir(mut self, rel: &str, mode: u32) -> Self {
        std::fs::create_dir_all(self.rule.staged(rel)).expect("create staged dir");
        let line = format!("{mode:o} {} {} {}", self.owner.0, self.owner.1, self.rule.live(rel));
        self.files.push(line);
        self
    }

    /// Append a raw manifest line.
    pub fn line(mut self, line: &str) -> Self {
        self.files.push(line.to_string());
        self
    }

    /// Set the YAML hook registry. `{live}` expands to the live tree.
    pub fn hooks(mut self, yaml: &str) -> Self {
        self.hooks = yaml.to_string();
        self
    }

    /// Set a TOML hook registry instead. `{live}` expands to the live tree.
    pub fn hooks_toml(mut self, toml: &str) -> Self {
        self.hooks = toml.to_string();
        self.hooks_file = "HOOKS.toml";
        self
    }

    /// Write `FILES` and the hook registry.
    pub fn build(self) -> TestRule {
        let rule_dir = self.rule.rule_dir();
        let mut manifest = self.files.join("\n");
        manifest.push('\n');
        std::fs::write(rule_dir.join("FILES"), manifest).expect("write FILES");
        let live = self.rule.live_dir().display().to_string();
        std::fs::write(
            rule_dir.join(self.hooks_file),
            self.hooks.replace("{live}", &live),
        )
        .expect("write hooks");
        self.rule
    }
}

/// Shell command appending `word` to `<live>/hook.log`.
pub fn append(word: &str) -> String {
    format!("sh -c 'echo {word} >> {{live}}/hook.log'")
}

/// Whether `path` exists.
pub fn exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}
