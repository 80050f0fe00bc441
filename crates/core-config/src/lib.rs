//! Configuration loading for the `stanza` binary.
//!
//! Parses `stanza.toml` (or an override path provided by the binary). Every section and
//! field is optional; unknown fields are ignored so older binaries keep reading newer files.
//! A missing or unparsable file yields the defaults (the parse failure is logged at target
//! `config`), while invalid key names, command names or regexes are reported when the
//! settings are applied to an editor.
//!
//! ```toml
//! [history]
//! cycling = true
//! [prompt]
//! format = "[{n}] "
//! [editor]
//! submit_suffix = ";"
//! [highlight]
//! default_color = "\u001b[0m"
//! reset_color = "\u001b[0m"
//! [[highlight.rules]]
//! pattern = "(?i)\\bselect\\b"
//! color = "\u001b[36m"
//! [keys]
//! "C_O" = "SUBMIT"
//! ```

use anyhow::{Context, Result};
use core_editor::{HighlightRule, MultiLineEditor};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::{fs, path::PathBuf};
use tracing::{debug, info, warn};

pub const FILE_NAME: &str = "stanza.toml";

/// Placeholder in `prompt.format` replaced by the 1-based line number.
pub const LINE_NUMBER: &str = "{n}";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    #[serde(default = "HistoryConfig::default_cycling")]
    pub cycling: bool,
    /// Oldest records are dropped beyond this many.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            cycling: Self::default_cycling(),
            limit: None,
        }
    }
}

impl HistoryConfig {
    const fn default_cycling() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PromptConfig {
    #[serde(default = "PromptConfig::default_format")]
    pub format: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            format: Self::default_format(),
        }
    }
}

impl PromptConfig {
    fn default_format() -> String {
        format!("{LINE_NUMBER}> ")
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Enter submits when the last line ends with this (trailing blanks ignored).
    #[serde(default)]
    pub submit_suffix: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RuleConfig {
    pub pattern: String,
    pub color: String,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct HighlightConfig {
    #[serde(default)]
    pub default_color: String,
    #[serde(default)]
    pub reset_color: String,
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
    /// Key name → command name, applied after the default bindings.
    #[serde(default)]
    pub keys: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // file contents as read
    pub file: ConfigFile,    // parsed (or default) data
    pub path: Option<PathBuf>,
}

/// Best-effort config path: `stanza.toml` in the working directory, then the platform
/// config dir (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("stanza").join(FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        debug!(target: "config", path = %path.display(), "config_missing");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(
                target: "config",
                path = %path.display(),
                rules = file.highlight.rules.len(),
                keys = file.keys.len(),
                "config_loaded"
            );
            Ok(Config {
                raw: Some(content),
                file,
                path: Some(path),
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

/// Prompt text for line `index` (0-based) from a `{n}` template.
pub fn format_prompt(template: &str, index: usize) -> String {
    template.replace(LINE_NUMBER, &(index + 1).to_string())
}

/// True when the last line ends with `suffix`, ignoring trailing blanks.
pub fn ends_with_suffix(lines: &[String], suffix: &str) -> bool {
    lines
        .last()
        .is_some_and(|l| l.trim_end().ends_with(suffix))
}

impl Config {
    pub fn prompt(&self, index: usize) -> String {
        format_prompt(&self.file.prompt.format, index)
    }

    /// Compile the highlight rules, failing on the first bad pattern.
    pub fn highlight_rules(&self) -> Result<Vec<HighlightRule>> {
        self.file
            .highlight
            .rules
            .iter()
            .map(|r| {
                HighlightRule::new(&r.pattern, r.color.as_str())
                    .with_context(|| format!("highlight pattern `{}`", r.pattern))
            })
            .collect()
    }

    /// Install prompt, highlight rules, key bindings and the submit predicate. History
    /// and clipboard stay with the caller, which owns the store.
    pub fn apply<W: Write>(&self, editor: &mut MultiLineEditor<W>) -> Result<()> {
        let template = self.file.prompt.format.clone();
        editor.set_prompt(move |i| format_prompt(&template, i));

        let rules = self.highlight_rules()?;
        let count = rules.len();
        let h = &self.file.highlight;
        editor.set_highlight_rules(rules, &h.default_color, &h.reset_color);

        for (key, command) in &self.file.keys {
            editor
                .bind_key_named(key, command)
                .with_context(|| format!("key binding `{key}` = `{command}`"))?;
        }

        if let Some(suffix) = self.file.editor.submit_suffix.clone()
            && !suffix.is_empty()
        {
            editor.submit_on_enter_when(move |lines, _| ends_with_suffix(lines, &suffix));
        }
        debug!(target: "config", rules = count, keys = self.file.keys.len(), "config_applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> std::io::Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), body).unwrap();
        tmp
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert!(cfg.raw.is_none());
        assert!(cfg.file.history.cycling);
        assert_eq!(cfg.prompt(0), "1> ");
        assert_eq!(cfg.file.editor.submit_suffix, None);
    }

    #[test]
    fn parses_every_section() {
        let tmp = write_config(
            r#"
[history]
cycling = false
limit = 50
[prompt]
format = "[{n}] "
[editor]
submit_suffix = ";"
[highlight]
default_color = "\u001b[0m"
reset_color = "\u001b[0m"
[[highlight.rules]]
pattern = "(?i)\\bselect\\b"
color = "\u001b[36m"
[keys]
"C_O" = "SUBMIT"
"#,
        );
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert!(!cfg.file.history.cycling);
        assert_eq!(cfg.file.history.limit, Some(50));
        assert_eq!(cfg.prompt(2), "[3] ");
        assert_eq!(cfg.file.editor.submit_suffix.as_deref(), Some(";"));
        assert_eq!(cfg.file.highlight.rules.len(), 1);
        assert_eq!(cfg.file.highlight.rules[0].pattern, "(?i)\\bselect\\b");
        assert_eq!(cfg.file.highlight.rules[0].color, "\x1b[36m");
        assert_eq!(cfg.file.keys.get("C_O").map(String::as_str), Some("SUBMIT"));
        assert_eq!(cfg.highlight_rules().unwrap().len(), 1);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = write_config("[editor]\nsubmit_suffix = \"go\"\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.prompt, PromptConfig::default());
        assert!(cfg.file.history.cycling);
        assert!(cfg.file.keys.is_empty());
    }

    #[test]
    fn parse_failure_falls_back_and_logs_under_config_target() {
        let tmp = write_config("[history\ncycling = ");
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        let cfg = with_default(subscriber, || load_from(Some(tmp.path().to_path_buf()))).unwrap();
        assert!(cfg.raw.is_none());
        assert_eq!(cfg.file, ConfigFile::default());

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("WARN config:"));
        assert!(log_output.contains("config_parse_failed"));
    }

    #[test]
    fn bad_pattern_is_an_error() {
        let tmp = write_config("[[highlight.rules]]\npattern = \"(\"\ncolor = \"x\"\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let err = cfg.highlight_rules().unwrap_err();
        assert!(err.to_string().contains("highlight pattern `(`"));
    }

    #[test]
    fn bad_binding_fails_apply() {
        let tmp = write_config("[keys]\n\"C_O\" = \"LAUNCH\"\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let mut editor = MultiLineEditor::new(Vec::new());
        let err = cfg.apply(&mut editor).unwrap_err();
        assert!(err.to_string().contains("key binding `C_O`"));
    }

    #[test]
    fn prompt_and_suffix_helpers() {
        assert_eq!(format_prompt("{n}: ", 9), "10: ");
        assert_eq!(format_prompt("sql> ", 3), "sql> ");
        let lines = vec!["select 1".to_string(), "from t;  ".to_string()];
        assert!(ends_with_suffix(&lines, ";"));
        assert!(!ends_with_suffix(&lines[..1], ";"));
        assert!(!ends_with_suffix(&[], ";"));
    }
}
