//! Reference data the matcher and parser consult but do not own.
//!
//! Each concern is a trait so callers can plug in their own monster
//! database, preference store or macro dialect. The in-memory versions
//! here back the CLI and the tests.

use std::collections::HashMap;

use indexmap::IndexSet;

/// Preference key holding the most recently visited location.
pub const LAST_ADVENTURE: &str = "lastAdventure";

pub trait MonsterDatabase {
    fn find_monster(&self, name: &str) -> bool;
}

pub trait Preferences {
    /// Missing keys read as the empty string.
    fn get_string(&self, key: &str) -> String;
}

pub trait MacroSyntax {
    /// Whether `line` opens (or is part of) a multi-line macro.
    fn is_macro_action(&self, line: &str) -> bool;

    /// Normalizes the text between `[` and `]` of a section header.
    fn encounter_key(&self, raw: &str) -> String;
}

#[derive(Debug, Clone, Default)]
pub struct MonsterRegistry {
    names: IndexSet<String>,
}

impl MonsterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str) {
        self.names.insert(normalize_name(name));
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl MonsterDatabase for MonsterRegistry {
    fn find_monster(&self, name: &str) -> bool {
        self.names.contains(&normalize_name(name))
    }
}

impl<S: AsRef<str>> FromIterator<S> for MonsterRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut registry = Self::new();
        for name in iter {
            registry.register(name.as_ref());
        }
        registry
    }
}

#[derive(Debug, Clone, Default)]
pub struct PreferenceStore {
    values: HashMap<String, String>,
}

impl PreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl Preferences for PreferenceStore {
    fn get_string(&self, key: &str) -> String {
        self.values.get(key).cloned().unwrap_or_default()
    }
}

const MACRO_PREFIXES: &[&str] = &[
    "\"",
    "#",
    "if ",
    "while ",
    "sub ",
    "call ",
    "goto ",
    "mark ",
    "endif",
    "endwhile",
    "endsub",
    "abort",
    "scrollwhendone",
    "repeat",
];

/// The stock combat-script dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMacroSyntax;

impl MacroSyntax for StandardMacroSyntax {
    fn is_macro_action(&self, line: &str) -> bool {
        MACRO_PREFIXES.iter().any(|p| line.starts_with(p))
    }

    fn encounter_key(&self, raw: &str) -> String {
        normalize_name(raw)
    }
}

fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
