//! The full set of encounter keys and their strategies, plus the script
//! reader and writer.

use std::io::{BufRead, Write};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::collab::{MacroSyntax, MonsterDatabase, Preferences};
use crate::error::{Result, ScriptWarning};
use crate::macro_body::MacroAccumulator;
use crate::matcher::{EncounterMatcher, DEFAULT_KEY};
use crate::strategy::{CombatAction, CombatStrategy, DEFAULT_ACTION};

/// Summary of one [`CombatLookup::load`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub sections: usize,
    pub actions: usize,
    pub warnings: Vec<ScriptWarning>,
}

/// Key order is registration order; it drives match tie-breaks and the
/// order `store` writes sections in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombatLookup {
    strategies: IndexMap<String, CombatStrategy>,
}

impl CombatLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strategy(&self, key: &str) -> Option<&CombatStrategy> {
        self.strategies.get(key)
    }

    pub fn strategy_mut(&mut self, key: &str) -> Option<&mut CombatStrategy> {
        self.strategies.get_mut(key)
    }

    pub fn encounter_keys(&self) -> impl Iterator<Item = &str> + Clone {
        self.strategies.keys().map(String::as_str)
    }

    pub fn strategies(&self) -> impl Iterator<Item = &CombatStrategy> {
        self.strategies.values()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Registers `key`, or empties its strategy if it is already known.
    pub fn add_encounter_key(&mut self, key: &str) {
        match self.strategies.get_mut(key) {
            Some(strategy) => strategy.remove_all_actions(),
            None => {
                self.strategies
                    .insert(key.to_string(), CombatStrategy::new(key));
            }
        }
    }

    /// Unknown keys are registered first.
    pub fn add_encounter_action(&mut self, key: &str, round: Option<u32>, action: CombatAction) {
        self.strategies
            .entry(key.to_string())
            .or_insert_with(|| CombatStrategy::new(key))
            .add_combat_action(round, action);
    }

    /// Drops the key's actions; the key stays registered.
    pub fn clear_encounter_key(&mut self, key: &str) {
        if let Some(strategy) = self.strategies.get_mut(key) {
            strategy.remove_all_actions();
        }
    }

    pub fn remove_encounter_key(&mut self, key: &str) -> Option<CombatStrategy> {
        self.strategies.shift_remove(key)
    }

    pub fn remove_all_children(&mut self) {
        self.strategies.clear();
    }

    pub fn best_encounter_key(
        &self,
        encounter: &str,
        monsters: &dyn MonsterDatabase,
        prefs: &dyn Preferences,
    ) -> &str {
        EncounterMatcher::new(monsters, prefs).best_key_for(self.encounter_keys(), encounter)
    }

    /// The matched key, and its strategy when one is registered.
    pub fn resolve(
        &self,
        encounter: &str,
        monsters: &dyn MonsterDatabase,
        prefs: &dyn Preferences,
    ) -> (&str, Option<&CombatStrategy>) {
        let key = self.best_encounter_key(encounter, monsters, prefs);
        (key, self.strategy(key))
    }

    /// Reads a script. Keys not mentioned in `reader` are left alone; keys
    /// that are mentioned lose whatever they held before.
    pub fn load(&mut self, reader: impl BufRead, syntax: &dyn MacroSyntax) -> Result<LoadReport> {
        let mut parser = ScriptParser::new(self, syntax);
        for (idx, line) in reader.lines().enumerate() {
            parser.feed(idx + 1, &line?);
        }
        Ok(parser.finish())
    }

    pub fn store(&self, writer: &mut impl Write) -> Result<()> {
        for (i, strategy) in self.strategies.values().enumerate() {
            if i > 0 {
                writeln!(writer)?;
            }
            strategy.store(writer)?;
        }
        Ok(())
    }
}

struct PendingMacro {
    round: Option<u32>,
    body: MacroAccumulator,
}

struct ScriptParser<'a> {
    lookup: &'a mut CombatLookup,
    syntax: &'a dyn MacroSyntax,
    key: String,
    pending: Option<PendingMacro>,
    report: LoadReport,
}

impl<'a> ScriptParser<'a> {
    fn new(lookup: &'a mut CombatLookup, syntax: &'a dyn MacroSyntax) -> Self {
        Self {
            lookup,
            syntax,
            key: DEFAULT_KEY.to_string(),
            pending: None,
            report: LoadReport::default(),
        }
    }

    fn feed(&mut self, line_no: usize, raw: &str) {
        let line = raw.trim();
        if line.is_empty() {
            return;
        }

        if line.starts_with('[') {
            self.close_section();
            self.open_section(line);
            return;
        }

        if let Some(pending) = self.pending.as_mut() {
            if line == "\"" {
                self.commit_macro();
            } else {
                pending.body.push_line(line);
            }
            return;
        }

        let (round, text) = self.split_round(line_no, line);

        if self.syntax.is_macro_action(text) {
            debug!(key = %self.key, line = line_no, "macro opened");
            let mut body = MacroAccumulator::new();
            body.push_line(text);
            self.pending = Some(PendingMacro { round, body });
            return;
        }

        self.push_action(round, CombatAction::simple(text));
    }

    fn finish(mut self) -> LoadReport {
        if self.pending.as_ref().is_some_and(|p| !p.body.is_empty()) {
            self.warn(ScriptWarning::UnterminatedMacro {
                key: self.key.clone(),
            });
        }
        self.close_section();
        self.report
    }

    /// `12: item seal tooth` -> (Some(12), "item seal tooth"). A prefix that
    /// is not a number leaves the round unset.
    fn split_round<'l>(&mut self, line_no: usize, line: &'l str) -> (Option<u32>, &'l str) {
        if !line.starts_with(|c: char| c.is_ascii_digit()) {
            return (None, line);
        }
        let Some((prefix, rest)) = line.split_once(':') else {
            return (None, line);
        };
        let rest = rest.trim();
        match prefix.trim().parse::<u32>() {
            Ok(round) => (Some(round), rest),
            Err(_) => {
                self.warn(ScriptWarning::MalformedRoundIndex {
                    line: line_no,
                    prefix: prefix.to_string(),
                });
                (None, rest)
            }
        }
    }

    fn open_section(&mut self, header: &str) {
        let inner = header.strip_prefix('[').unwrap_or(header);
        let inner = inner.strip_suffix(']').unwrap_or(inner);
        self.key = self.syntax.encounter_key(inner);
        self.lookup.add_encounter_key(&self.key);
        self.report.sections += 1;
        debug!(key = %self.key, "section opened");
    }

    fn close_section(&mut self) {
        self.commit_macro();

        // Lines before the first header are the only way `default` gets
        // registered implicitly; with none there is nothing to close.
        let Some(strategy) = self.lookup.strategy_mut(&self.key) else {
            return;
        };
        if strategy.is_empty() {
            strategy.add_combat_action(None, CombatAction::simple(DEFAULT_ACTION));
            self.report.actions += 1;
            let key = self.key.clone();
            self.warn(ScriptWarning::EmptySection { key });
        }
    }

    fn commit_macro(&mut self) {
        let Some(mut pending) = self.pending.take() else {
            return;
        };
        if pending.body.is_empty() {
            return;
        }
        let body = pending.body.take();
        debug!(key = %self.key, lines = body.lines().count(), "macro committed");
        self.push_action(pending.round, CombatAction::Macro(body));
    }

    fn push_action(&mut self, round: Option<u32>, action: CombatAction) {
        self.lookup.add_encounter_action(&self.key, round, action);
        self.report.actions += 1;
    }

    fn warn(&mut self, warning: ScriptWarning) {
        warn!("{}", warning);
        self.report.warnings.push(warning);
    }
}
