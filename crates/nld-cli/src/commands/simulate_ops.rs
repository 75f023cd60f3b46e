//! Replay a key script against an in-memory editor.
//!
//! One step per line, `#` starts a comment:
//!
//! ```text
//! type:meet @date
//! space
//! type:tom
//! hold:shift
//! enter
//! ```

use std::fmt;
use std::fs;
use std::process;
use std::sync::Arc;

use nld_core::dates::BuiltinDates;
use nld_core::keymap::Key;
use nld_core::settings::{settings, Settings};
use nld_session::{Editor, KeyEvent, KeyResponse, MemoryEditor, SuggestionSession};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown step {step:?}")]
    UnknownStep { line: usize, step: String },
    #[error("line {line}: unknown key {key:?}")]
    UnknownKey { line: usize, key: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Type(String),
    Press(Key),
    Hold(Key),
    Release(Key),
    /// Confirm a label directly, as a click on a suggestion row.
    Select(String),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Type(text) => write!(f, "type:{text}"),
            Step::Press(key) => write!(f, "{key:?}"),
            Step::Hold(key) => write!(f, "hold:{key:?}"),
            Step::Release(key) => write!(f, "release:{key:?}"),
            Step::Select(label) => write!(f, "select:{label}"),
        }
    }
}

pub fn parse_script(script: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (n, raw) in script.lines().enumerate() {
        let line = n + 1;
        let entry = raw.trim_end();
        if entry.trim().is_empty() || entry.trim_start().starts_with('#') {
            continue;
        }
        let entry = entry.trim_start();

        if let Some(text) = entry.strip_prefix("type:") {
            steps.push(Step::Type(text.to_string()));
            continue;
        }
        if let Some(label) = entry.strip_prefix("select:") {
            steps.push(Step::Select(label.trim().to_string()));
            continue;
        }
        if let Some((verb, key)) = entry.split_once(':') {
            let parsed = Key::from_name(key.trim()).ok_or_else(|| ScriptError::UnknownKey {
                line,
                key: key.trim().to_string(),
            })?;
            match verb {
                "hold" => steps.push(Step::Hold(parsed)),
                "release" => steps.push(Step::Release(parsed)),
                "press" => steps.push(Step::Press(parsed)),
                _ => {
                    return Err(ScriptError::UnknownStep {
                        line,
                        step: entry.to_string(),
                    })
                }
            }
            continue;
        }
        let key = Key::from_name(entry).ok_or_else(|| ScriptError::UnknownStep {
            line,
            step: entry.to_string(),
        })?;
        steps.push(Step::Press(key));
    }
    Ok(steps)
}

/// Session plus editor, wired the way a host editor wires them.
pub struct Simulator {
    pub session: SuggestionSession,
    pub editor: MemoryEditor,
    /// Text produced by the last confirmed selection.
    pub last_commit: Option<String>,
}

impl Simulator {
    pub fn new(settings: Arc<Settings>, dates: BuiltinDates) -> Self {
        Self {
            session: SuggestionSession::new(settings, Box::new(dates)),
            editor: MemoryEditor::new(""),
            last_commit: None,
        }
    }

    pub fn run(&mut self, step: &Step) {
        match step {
            Step::Type(text) => {
                for c in text.chars() {
                    let key = if c == ' ' { Key::Space } else { Key::Char(c) };
                    self.press(key);
                }
            }
            Step::Press(key) | Step::Hold(key) => {
                self.press(*key);
            }
            Step::Release(key) => {
                self.session.handle_key(&mut self.editor, KeyEvent::Up(*key));
            }
            Step::Select(label) => match self.session.select_suggestion(&mut self.editor, label) {
                Ok(selection) => {
                    self.last_commit = Some(selection.text);
                    self.refresh();
                }
                Err(e) => {
                    eprintln!("select {label:?}: {e}");
                    self.refresh();
                }
            },
        }
    }

    fn press(&mut self, key: Key) -> KeyResponse {
        let before = self.snapshot();
        let resp = self.session.handle_key(&mut self.editor, KeyEvent::Down(key));
        if !resp.handled {
            if let Some(change) = self.editor.apply_default_key(key) {
                self.session.on_document_changed(&[change]);
            }
        }
        if let Some(text) = &resp.commit {
            self.last_commit = Some(text.clone());
        }
        if self.snapshot() != before {
            self.refresh();
        }
        if resp.deferred {
            let before = self.snapshot();
            self.session.run_deferred(&mut self.editor);
            if self.snapshot() != before {
                self.refresh();
            }
        }
        resp
    }

    fn refresh(&mut self) {
        if let Some(ctx) = self.session.on_trigger(&mut self.editor) {
            self.session.get_suggestions(&ctx.query);
        }
    }

    fn snapshot(&self) -> (String, nld_core::Position) {
        (self.editor.text().to_string(), self.editor.cursor())
    }

    /// Document with `|` at the cursor.
    pub fn render(&self) -> String {
        let text = self.editor.text();
        let at = self
            .editor
            .pos_to_offset(self.editor.cursor())
            .and_then(|ch| nld_core::position::byte_index(text, ch))
            .unwrap_or(text.len());
        format!("{}|{}", &text[..at], &text[at..])
    }

    pub fn describe(&self) -> String {
        let Some(ctx) = self.session.context() else {
            return "closed".to_string();
        };
        let items = self.session.suggestions();
        let selected = self
            .session
            .selected()
            .and_then(|i| items.get(i))
            .map(String::as_str)
            .unwrap_or("-");
        format!(
            "open start={} query={:?} [{} items, selected {}]",
            ctx.start,
            ctx.query,
            items.len(),
            selected
        )
    }
}

pub fn simulate(script_file: &str, locale: Option<&str>) {
    let script = die!(fs::read_to_string(script_file), "Error reading {script_file}: {}");
    let steps = die!(parse_script(&script), "Error: {}");

    let s = settings();
    let locale = locale.unwrap_or(&s.dates.locale);
    let dates = die!(BuiltinDates::new(locale), "Error: {}");
    let mut sim = Simulator::new(Arc::new(s.clone()), dates);

    for step in &steps {
        sim.run(step);
        println!("{:<20} {:?}", step.to_string(), sim.render());
        println!("{:<20} {}", "", sim.describe());
        if let Some(text) = sim.last_commit.take() {
            println!("{:<20} commit {text:?}", "");
        }
    }
    if sim.session.is_open() {
        println!("suggestions: {}", sim.session.suggestions().join(", "));
    }
}
