use ccs_engine::{parse_script, render_script, CombatAction, CombatLookup, RoundAction};

const SCRIPT: &str = r#"
[default]
1: skill lunging thrust-smack
attack

[knob goblin]
"pickpocket"
"
"sub stasis
while !times 5
if hasskill 7061
skill 7061
endif
endwhile
endsub
call stasis
"

[spooky forest]
2: item seal tooth
3: "if hasitem 1234
use 1234
end
"
420 special
[imp]
"#;

fn logical(lookup: &CombatLookup) -> Vec<(String, Vec<(u32, CombatAction)>)> {
    lookup
        .strategies()
        .map(|s| {
            let actions = s
                .actions()
                .iter()
                .map(|RoundAction { round, action, .. }| (*round, action.clone()))
                .collect();
            (s.key().to_string(), actions)
        })
        .collect()
}

#[test]
fn store_then_load_keeps_strategies() {
    let (first, _) = parse_script(SCRIPT).unwrap();
    let text = render_script(&first).unwrap();
    let (second, report) = parse_script(&text).unwrap();
    assert_eq!(logical(&first), logical(&second));
    assert!(report.warnings.is_empty(), "{:?}\n{}", report.warnings, text);
}

#[test]
fn store_is_stable_after_one_pass() {
    let (first, _) = parse_script(SCRIPT).unwrap();
    let once = render_script(&first).unwrap();
    let (second, _) = parse_script(&once).unwrap();
    let twice = render_script(&second).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn store_does_not_mutate() {
    let (lookup, _) = parse_script(SCRIPT).unwrap();
    let before = lookup.clone();
    let _ = render_script(&lookup).unwrap();
    assert_eq!(before, lookup);
}

#[test]
fn sections_written_in_registration_order() {
    let (lookup, _) = parse_script(SCRIPT).unwrap();
    let text = render_script(&lookup).unwrap();
    let headers: Vec<_> = text.lines().filter(|l| l.starts_with('[')).collect();
    assert_eq!(
        headers,
        vec!["[default]", "[knob goblin]", "[spooky forest]", "[imp]"]
    );
}

#[test]
fn nested_macro_survives_round_trip() {
    let (lookup, _) = parse_script(SCRIPT).unwrap();
    let goblin = lookup.strategy("knob goblin").unwrap();
    assert_eq!(goblin.action_count(), 2);
    assert_eq!(
        goblin.actions()[1].action,
        CombatAction::macro_body(
            "sub stasis\n    while !times 5\n        if hasskill 7061\n            skill 7061\n        endif\n    endwhile\nendsub\ncall stasis"
        )
    );
}

#[test]
fn empty_lookup_stores_nothing() {
    assert_eq!(render_script(&CombatLookup::new()).unwrap(), "");
}

#[test]
fn macro_line_ending_in_quote_survives_round_trip() {
    let (first, _) = parse_script("[imp]\nif match \"foo\"\nattack\nend\n\"\n").unwrap();
    assert_eq!(
        first.strategy("imp").unwrap().actions()[0].action,
        CombatAction::macro_body("if match \"foo\"\n    attack\nend")
    );
    let text = render_script(&first).unwrap();
    let (second, _) = parse_script(&text).unwrap();
    assert_eq!(logical(&first), logical(&second));
}
