//! Picks the encounter key whose strategy applies to an observed encounter.

use tracing::debug;

use crate::collab::{MonsterDatabase, Preferences, LAST_ADVENTURE};

pub const DEFAULT_KEY: &str = "default";
pub const UNRECOGNIZED_KEY: &str = "unrecognized";

/// Longest registered key occurring in `text`. On equal length the key seen
/// first wins. Empty keys never match.
pub fn longest_match<'k, I>(keys: I, text: &str) -> Option<&'k str>
where
    I: IntoIterator<Item = &'k str>,
{
    let mut best: Option<&'k str> = None;
    let mut best_len = 0;
    for key in keys {
        if key.len() > best_len && text.contains(key) {
            best = Some(key);
            best_len = key.len();
        }
    }
    best
}

/// Three-tier fallback: the encounter text itself, then either
/// `"unrecognized"` (unknown monster) or the lower-cased location, then
/// `"default"`. Always yields a key, registered or not.
pub fn best_key_for<'k, I>(keys: I, encounter: &str, location: &str, known_monster: bool) -> &'k str
where
    I: IntoIterator<Item = &'k str> + Clone,
{
    if let Some(key) = longest_match(keys.clone(), encounter) {
        return key;
    }

    // An unknown monster is likely new to the player and unrelated to the
    // zone's usual residents, so it never takes a zone match.
    let fallback = if known_monster {
        location.to_lowercase()
    } else {
        UNRECOGNIZED_KEY.to_string()
    };

    match longest_match(keys, &fallback) {
        Some(key) => key,
        None => {
            debug!(encounter, fallback = %fallback, "no encounter key matched; using default");
            DEFAULT_KEY
        }
    }
}

/// [`best_key_for`] wired to the reference-data collaborators.
pub struct EncounterMatcher<'a> {
    monsters: &'a dyn MonsterDatabase,
    prefs: &'a dyn Preferences,
}

impl<'a> EncounterMatcher<'a> {
    pub fn new(monsters: &'a dyn MonsterDatabase, prefs: &'a dyn Preferences) -> Self {
        Self { monsters, prefs }
    }

    pub fn best_key_for<'k, I>(&self, keys: I, encounter: &str) -> &'k str
    where
        I: IntoIterator<Item = &'k str> + Clone,
    {
        let location = self.prefs.get_string(LAST_ADVENTURE);
        let known = self.monsters.find_monster(encounter);
        best_key_for(keys, encounter, &location, known)
    }
}
