//! Hook registry parsing.
//!
//! The registry is a mapping document, YAML by default:
//!
//! ```yaml
//! scripts:
//!   reload: { cmd: "systemctl reload nginx", once: true }
//!   notify: { cmd: "logger barrow: config changed" }
//! at_first: [notify]
//! changed:
//!   /etc/nginx/nginx.conf: [reload]
//! at_last: []
//! ```
//!
//! A file with a `.toml` extension is read as TOML with the same fields.
use anyhow::Result;
use serde::de::{Error as _, Unexpected};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::Path;

use crate::config::manifest::rooted;
use crate::error::{ParseError, ScriptError};

/// A named shell command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Script {
    /// Command line, tokenized shell-style at execution time.
    pub cmd: String,
    /// Fire at most once per pass no matter how many paths trigger it.
    #[serde(default, deserialize_with = "flag")]
    pub once: bool,
}

/// A boolean, also accepting the YAML 1.1 words `yes`/`no`, `on`/`off` and
/// `y`/`n` in any case.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Word(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Word(word) => match word.to_ascii_lowercase().as_str() {
            "yes" | "y" | "on" | "true" => Ok(true),
            "no" | "n" | "off" | "false" => Ok(false),
            _ => Err(D::Error::invalid_value(
                Unexpected::Str(&word),
                &"a boolean or yes/no/on/off",
            )),
        },
    }
}

/// Named scripts plus the trigger lists that reference them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HookRegistry {
    /// Script name → definition.
    pub scripts: HashMap<String, Script>,
    /// Scripts run unconditionally before any entry is processed.
    pub at_first: Vec<String>,
    /// Declared path → scripts run when that path changed.
    pub changed: HashMap<String, Vec<String>>,
    /// Scripts run unconditionally after everything else.
    pub at_last: Vec<String>,
}

impl HookRegistry {
    /// Look up a script by name.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Unknown`] if no script has that name.
    pub fn script(&self, name: &str) -> Result<&Script, ScriptError> {
        self.scripts
            .get(name)
            .ok_or_else(|| ScriptError::Unknown(name.to_string()))
    }

    /// Scripts triggered by a change to `path`, in listed order.
    ///
    /// Keys match with or without their leading `/`; an exact key wins.
    #[must_use]
    pub fn triggers_for(&self, path: &str) -> &[String] {
        self.changed
            .get(path)
            .or_else(|| {
                let path = rooted(path);
                self.changed
                    .iter()
                    .find(|(key, _)| rooted(key) == path)
                    .map(|(_, scripts)| scripts)
            })
            .map_or(&[], Vec::as_slice)
    }

    /// Registry-level consistency checks.
    ///
    /// Returns an empty message when everything is consistent.
    ///
    /// # Errors
    ///
    /// Reserved for checks that cannot complete; never fails today.
    #[allow(clippy::unnecessary_wraps)]
    pub fn validate(&self) -> Result<String> {
        // TODO: reject names in at_first/changed/at_last that are missing from `scripts`.
        Ok(String::new())
    }
}

/// Load a hook registry, choosing the format from the file extension.
///
/// # Errors
///
/// Returns [`ParseError::Io`] if the file cannot be read, or
/// [`ParseError::Malformed`] if it does not match the registry structure.
pub fn load(path: &Path) -> Result<HookRegistry> {
    let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let registry = if path.extension().is_some_and(|ext| ext == "toml") {
        parse_toml(&content)?
    } else {
        parse_yaml(&content)?
    };
    Ok(registry)
}

/// Parse a YAML hook registry. An empty document is an empty registry.
///
/// # Errors
///
/// Returns [`ParseError::Malformed`] on invalid YAML or structure.
pub fn parse_yaml(content: &str) -> Result<HookRegistry, ParseError> {
    if content.trim().is_empty() {
        return Ok(HookRegistry::default());
    }
    serde_yaml::from_str(content).map_err(|e| ParseError::Malformed(e.to_string()))
}

/// Parse a TOML hook registry.
///
/// # Errors
///
/// Returns [`ParseError::Malformed`] on invalid TOML or structure.
pub fn parse_toml(content: &str) -> Result<HookRegistry, ParseError> {
    toml::from_str(content).map_err(|e| ParseError::Malformed(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const YAML: &str = r#"
scripts:
  restart:
    cmd: systemctl restart app
    once: true
  notify:
    cmd: "echo hi"
at_first: [notify]
changed:
  /etc/app.conf: [notify, restart]
at_last:
  - restart
"#;

    #[test]
    fn parses_yaml_registry() {
        let hooks = parse_yaml(YAML).unwrap();
        assert_eq!(hooks.scripts.len(), 2);
        assert!(hooks.scripts["restart"].once);
        assert!(!hooks.scripts["notify"].once, "once defaults to false");
        assert_eq!(hooks.at_first, ["notify"]);
        assert_eq!(hooks.triggers_for("/etc/app.conf"), ["notify", "restart"]);
        assert_eq!(hooks.at_last, ["restart"]);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let hooks = parse_yaml("scripts:\n  a: { cmd: 'true' }\n").unwrap();
        assert!(hooks.at_first.is_empty());
        assert!(hooks.changed.is_empty());
        assert!(hooks.at_last.is_empty());
    }

    #[test]
    fn empty_document_is_empty_registry() {
        assert_eq!(parse_yaml("").unwrap(), HookRegistry::default());
        assert_eq!(parse_yaml("\n  \n").unwrap(), HookRegistry::default());
    }

    #[test]
    fn malformed_structure_is_parse_error() {
        let err = parse_yaml("at_first: {not: a list}\n").unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));

        let err = parse_yaml("scripts:\n  a: { once: true }\n").unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)), "cmd is required");
    }

    #[test]
    fn once_accepts_yaml_11_words() {
        let hooks = parse_yaml(
            "
scripts:
  a: { cmd: 'true', once: yes }
  b: { cmd: 'true', once: No }
  c: { cmd: 'true', once: 'on' }
  d: { cmd: 'true', once: off }
",
        )
        .unwrap();
        assert!(hooks.scripts["a"].once);
        assert!(!hooks.scripts["b"].once);
        assert!(hooks.scripts["c"].once);
        assert!(!hooks.scripts["d"].once);
    }

    #[test]
    fn once_rejects_other_words() {
        let err = parse_yaml("scripts:\n  a: { cmd: 'true', once: sometimes }\n").unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));
    }

    #[test]
    fn parses_toml_registry() {
        let hooks = parse_toml(
            r#"
at_first = ["a"]
at_last = ["b"]

[scripts.a]
cmd = "echo a"

[scripts.b]
cmd = "echo b"
once = true

[changed]
"/etc/app.conf" = ["b"]
"#,
        )
        .unwrap();
        assert_eq!(hooks.at_first, ["a"]);
        assert!(hooks.scripts["b"].once);
        assert_eq!(hooks.triggers_for("/etc/app.conf"), ["b"]);
    }

    #[test]
    fn unknown_script_lookup_fails() {
        let hooks = HookRegistry::default();
        assert!(matches!(
            hooks.script("ghost"),
            Err(ScriptError::Unknown(name)) if name == "ghost"
        ));
    }

    #[test]
    fn triggers_match_across_leading_slash() {
        let hooks = parse_yaml(
            "scripts:\n  a: { cmd: 'true' }\n  b: { cmd: 'true' }\n\
             changed:\n  etc/app.conf: [a]\n  /srv/site: [b]\n",
        )
        .unwrap();
        assert_eq!(hooks.triggers_for("/etc/app.conf"), ["a"]);
        assert_eq!(hooks.triggers_for("srv/site"), ["b"]);
        assert_eq!(hooks.triggers_for("etc/app.conf"), ["a"]);
    }

    #[test]
    fn triggers_for_unlisted_path_is_empty() {
        let hooks = parse_yaml(YAML).unwrap();
        assert!(hooks.triggers_for("/nope").is_empty());
    }

    #[test]
    fn validate_accepts_dangling_references() {
        let hooks = parse_yaml("at_first: [ghost]\n").unwrap();
        assert_eq!(hooks.validate().unwrap(), "");
    }

    #[test]
    fn load_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("HOOKS");
        let toml = dir.path().join("HOOKS.toml");
        std::fs::write(&yaml, "at_last: [y]\n").unwrap();
        std::fs::write(&toml, "at_last = [\"t\"]\n").unwrap();
        assert_eq!(load(&yaml).unwrap().at_last, ["y"]);
        assert_eq!(load(&toml).unwrap().at_last, ["t"]);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("HOOKS")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ParseError>(),
            Some(ParseError::Io { .. })
        ));
    }
}
