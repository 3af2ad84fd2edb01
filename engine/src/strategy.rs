use std::io::{self, Write};

use serde::{Deserialize, Serialize};

pub const DEFAULT_ACTION: &str = "attack";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum CombatAction {
    /// One directive, e.g. `skill saucy salve` or `item seal tooth`.
    Simple(String),
    /// A script body; lines joined with `\n`, indentation already applied.
    Macro(String),
}

impl CombatAction {
    pub fn simple(text: impl Into<String>) -> Self {
        Self::Simple(text.into())
    }

    pub fn macro_body(body: impl Into<String>) -> Self {
        Self::Macro(body.into())
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Simple(t) | Self::Macro(t) => t,
        }
    }

    pub fn is_macro(&self) -> bool {
        matches!(self, Self::Macro(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundAction {
    pub round: u32,
    /// False when the round was assigned by appending.
    pub explicit: bool,
    pub action: CombatAction,
}

/// Round-indexed actions for one encounter key, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatStrategy {
    key: String,
    actions: Vec<RoundAction>,
}

impl CombatStrategy {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            actions: Vec::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn actions(&self) -> &[RoundAction] {
        &self.actions
    }

    /// `None` appends at round `count + 1`. Duplicate rounds are kept side
    /// by side.
    pub fn add_combat_action(&mut self, round: Option<u32>, action: CombatAction) {
        let entry = match round {
            Some(round) => RoundAction {
                round,
                explicit: true,
                action,
            },
            None => RoundAction {
                round: self.next_round(),
                explicit: false,
                action,
            },
        };
        self.actions.push(entry);
    }

    pub fn remove_all_actions(&mut self) {
        self.actions.clear();
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    fn next_round(&self) -> u32 {
        u32::try_from(self.actions.len()).map_or(u32::MAX, |n| n.saturating_add(1))
    }

    /// The action to run in `round`: the entry with the greatest round not
    /// above it, so rounds past the last entry repeat it. Ties go to the
    /// earliest entry.
    pub fn action_for_round(&self, round: u32) -> Option<&CombatAction> {
        let mut best: Option<&RoundAction> = None;
        for entry in self.actions.iter().filter(|e| e.round <= round) {
            if best.is_none_or(|b| entry.round > b.round) {
                best = Some(entry);
            }
        }
        best.map(|e| &e.action)
    }

    /// Writes the `[key]` header and one entry per action.
    pub fn store(&self, writer: &mut impl Write) -> io::Result<()> {
        writeln!(writer, "[{}]", self.key)?;
        for entry in &self.actions {
            store_entry(writer, entry)?;
        }
        Ok(())
    }
}

fn store_entry(writer: &mut impl Write, entry: &RoundAction) -> io::Result<()> {
    let text = entry.action.text();
    let prefixed = entry.explicit || text.starts_with(|c: char| c.is_ascii_digit());
    if prefixed {
        write!(writer, "{}: ", entry.round)?;
    }
    match &entry.action {
        CombatAction::Simple(text) => writeln!(writer, "{}", text),
        CombatAction::Macro(body) => {
            // Lone quotes open and close the block, so body lines are
            // written untouched whatever they start or end with.
            writeln!(writer, "\"")?;
            writeln!(writer, "{}", body)?;
            writeln!(writer, "\"")
        }
    }
}
