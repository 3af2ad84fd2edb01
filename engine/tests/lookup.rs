use ccs_engine::{
    parse_script, CombatAction, CombatLookup, MonsterRegistry, PreferenceStore, LAST_ADVENTURE,
};

fn session() -> (MonsterRegistry, PreferenceStore) {
    let monsters: MonsterRegistry = ["angry goblin warrior", "spooky vampire"]
        .into_iter()
        .collect();
    let mut prefs = PreferenceStore::new();
    prefs.set_string(LAST_ADVENTURE, "The Spooky Forest");
    (monsters, prefs)
}

#[test]
fn resolve_prefers_longest_key() {
    let (lookup, _) = parse_script("[gob]\nattack\n[goblin]\nskill lunging thrust-smack\n").unwrap();
    let (monsters, prefs) = session();
    let (key, strategy) = lookup.resolve("angry goblin warrior", &monsters, &prefs);
    assert_eq!(key, "goblin");
    assert_eq!(
        strategy.unwrap().action_for_round(1),
        Some(&CombatAction::simple("skill lunging thrust-smack"))
    );
}

#[test]
fn resolve_uses_location_for_known_monsters() {
    let (lookup, _) = parse_script("[spooky forest]\nattack\n[unrecognized]\nrunaway\n").unwrap();
    let (monsters, prefs) = session();
    assert_eq!(
        lookup.best_encounter_key("spooky vampire", &monsters, &prefs),
        "spooky forest"
    );
    assert_eq!(
        lookup.best_encounter_key("glowing mystery", &monsters, &prefs),
        "unrecognized"
    );
}

#[test]
fn resolve_to_unregistered_default() {
    let (lookup, _) = parse_script("[ogre]\nattack\n").unwrap();
    let (monsters, prefs) = session();
    let (key, strategy) = lookup.resolve("spooky vampire", &monsters, &prefs);
    assert_eq!(key, "default");
    assert!(strategy.is_none());
}

#[test]
fn add_encounter_key_clears_in_place() {
    let mut lookup = CombatLookup::new();
    lookup.add_encounter_action("imp", None, CombatAction::simple("attack"));
    lookup.add_encounter_action("ogre", Some(2), CombatAction::simple("pickpocket"));
    lookup.add_encounter_key("imp");
    let keys: Vec<_> = lookup.encounter_keys().collect();
    assert_eq!(keys, vec!["imp", "ogre"]);
    assert_eq!(lookup.strategy("imp").unwrap().action_count(), 0);
    assert_eq!(lookup.strategy("ogre").unwrap().actions()[0].round, 2);
}

#[test]
fn clear_and_remove_keys() {
    let (mut lookup, _) = parse_script("[imp]\nattack\n[ogre]\nattack\n").unwrap();
    lookup.clear_encounter_key("imp");
    assert_eq!(lookup.strategy("imp").unwrap().action_count(), 0);

    let removed = lookup.remove_encounter_key("ogre").unwrap();
    assert_eq!(removed.key(), "ogre");
    assert!(lookup.strategy("ogre").is_none());
    assert_eq!(lookup.encounter_keys().collect::<Vec<_>>(), vec!["imp"]);

    lookup.clear_encounter_key("nobody");
    lookup.remove_all_children();
    assert!(lookup.is_empty());
}

#[test]
fn dump_as_json() {
    let (lookup, _) = parse_script("[imp]\n2: attack\n").unwrap();
    let json = serde_json::to_value(&lookup).unwrap();
    assert_eq!(json["imp"]["key"], "imp");
    assert_eq!(json["imp"]["actions"][0]["round"], 2);
    assert_eq!(json["imp"]["actions"][0]["action"]["kind"], "simple");
    assert_eq!(json["imp"]["actions"][0]["action"]["text"], "attack");
}
