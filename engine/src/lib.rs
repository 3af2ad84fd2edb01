pub mod collab;
pub mod config;
pub mod error;
pub mod lookup;
pub mod macro_body;
pub mod matcher;
pub mod strategy;

pub use collab::{
    MacroSyntax, MonsterDatabase, MonsterRegistry, PreferenceStore, Preferences,
    StandardMacroSyntax, LAST_ADVENTURE,
};
pub use config::SessionConfig;
pub use error::{CcsError, Result, ScriptWarning};
pub use lookup::{CombatLookup, LoadReport};
pub use macro_body::{IndentTracker, MacroAccumulator};
pub use matcher::{best_key_for, longest_match, EncounterMatcher, DEFAULT_KEY, UNRECOGNIZED_KEY};
pub use strategy::{CombatAction, CombatStrategy, RoundAction, DEFAULT_ACTION};

/* ---------------- convenience entry points ---------------- */

/// Parse a whole script held in memory with the standard macro dialect.
pub fn parse_script(text: &str) -> Result<(CombatLookup, LoadReport)> {
    let mut lookup = CombatLookup::new();
    let report = lookup.load(text.as_bytes(), &StandardMacroSyntax)?;
    Ok((lookup, report))
}

/// Serialize a lookup back to script text.
pub fn render_script(lookup: &CombatLookup) -> Result<String> {
    let mut out = Vec::new();
    lookup.store(&mut out)?;
    // `store` only ever writes str data.
    Ok(String::from_utf8_lossy(&out).into_owned())
}
