//! Dialogue trigger tests: conditions, fire-once, catalog order, playback.

use clicker_core::{
    config::parse_dialogue_catalog,
    dialogue::{DialogueCatalog, DialogueEvent, DialoguePlayback, DialogueTriggerEngine},
    event::GameEvent,
    progression::ProgressionState,
};

fn event(event_id: i64, required_gold: i64, required_stage: i64) -> DialogueEvent {
    DialogueEvent {
        event_id,
        required_gold,
        required_stage,
        dialogue_texts: vec![format!("line for {event_id}")],
    }
}

fn fired_ids(engine: &mut DialogueTriggerEngine, state: &ProgressionState) -> Vec<i64> {
    engine.evaluate_all(state).map(|e| e.event_id).collect()
}

#[test]
fn zero_thresholds_are_ignored() {
    let state = ProgressionState::new();
    assert!(event(1, 0, 0).is_condition_met(&state));
    assert!(event(2, -5, 0).is_condition_met(&state));
    assert!(!event(3, 1, 0).is_condition_met(&state));
    assert!(!event(4, 0, 2).is_condition_met(&state));
}

#[test]
fn both_thresholds_must_hold() {
    let mut state = ProgressionState::new();
    let gated = event(1, 100, 3);
    state.set_gold(150);
    assert!(!gated.is_condition_met(&state), "stage gate ignored");
    state.set_stage(3);
    assert!(gated.is_condition_met(&state));
    state.set_gold(99);
    assert!(!gated.is_condition_met(&state), "gold gate ignored");
}

/// Gold 50 -> 150 -> 50 -> 150 fires a 100-gold event exactly once.
#[test]
fn event_fires_only_once_while_gold_oscillates() {
    let mut engine = DialogueTriggerEngine::new(DialogueCatalog::new(vec![event(7, 100, 0)]));
    let mut state = ProgressionState::new();

    let mut fired = Vec::new();
    for gold in [50, 150, 50, 150, 1_000] {
        state.set_gold(gold);
        fired.extend(fired_ids(&mut engine, &state));
    }
    assert_eq!(fired, vec![7]);
    assert!(engine.is_triggered(7));
}

/// One pass fires every satisfied event, in catalog order.
#[test]
fn one_pass_fires_all_satisfied_events_in_order() {
    let catalog = DialogueCatalog::new(vec![event(30, 10, 0), event(10, 0, 0), event(20, 0, 5)]);
    let mut engine = DialogueTriggerEngine::new(catalog);
    let mut state = ProgressionState::new();
    state.set_gold(10);

    assert_eq!(fired_ids(&mut engine, &state), vec![30, 10]);

    state.set_stage(5);
    assert_eq!(fired_ids(&mut engine, &state), vec![20]);
    assert!(fired_ids(&mut engine, &state).is_empty());
}

/// Events are marked only as the iterator yields them.
#[test]
fn evaluation_is_lazy() {
    let catalog = DialogueCatalog::new(vec![event(1, 0, 0), event(2, 0, 0)]);
    let mut engine = DialogueTriggerEngine::new(catalog);
    let state = ProgressionState::new();

    let first = engine.evaluate_all(&state).next().map(|e| e.event_id);
    assert_eq!(first, Some(1));
    assert!(engine.is_triggered(1));
    assert!(!engine.is_triggered(2));

    assert_eq!(fired_ids(&mut engine, &state), vec![2]);
}

#[test]
fn import_replaces_rather_than_merges() {
    let mut engine = DialogueTriggerEngine::new(DialogueCatalog::default());
    engine.import_triggered([1, 2, 3]);
    engine.import_triggered([9]);
    assert_eq!(engine.export_triggered().into_iter().collect::<Vec<_>>(), vec![9]);
}

#[test]
fn only_gold_and_stage_changes_cause_evaluation() {
    assert!(DialogueTriggerEngine::reacts_to(&GameEvent::GoldChanged { gold: 1 }));
    assert!(DialogueTriggerEngine::reacts_to(&GameEvent::StageChanged { stage: 2 }));
    assert!(!DialogueTriggerEngine::reacts_to(&GameEvent::GoldPerClickChanged { gold_per_click: 2 }));
    assert!(!DialogueTriggerEngine::reacts_to(&GameEvent::GoldPerSecondChanged { gold_per_second: 2 }));
    assert!(!DialogueTriggerEngine::reacts_to(&GameEvent::ReviveCountChanged { revive_count: 1 }));
}

#[test]
fn catalog_drops_empty_and_duplicate_events() {
    let json = r#"{
        "events": [
            { "event_id": 1, "dialogue_texts": ["first"] },
            { "event_id": 2, "required_gold": 10, "dialogue_texts": [] },
            { "event_id": 1, "dialogue_texts": ["shadowed"] },
            { "event_id": 3, "required_stage": 2, "dialogue_texts": ["third"] }
        ]
    }"#;
    let catalog = parse_dialogue_catalog(json).expect("catalog parses");
    let ids: Vec<i64> = catalog.events().iter().map(|e| e.event_id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(catalog.get(1).unwrap().dialogue_texts, vec!["first".to_string()]);
    assert_eq!(catalog.get(3).unwrap().required_gold, 0);
}

#[test]
fn playback_pages_lines_and_queues_events() {
    let mut playback = DialoguePlayback::new();
    assert!(!playback.show(1, Vec::new()), "empty dialogue accepted");
    assert!(!playback.is_open());

    assert!(playback.show(1, vec!["a".into(), "b".into()]));
    assert!(playback.show(2, vec!["c".into()]));
    assert_eq!(playback.queued(), 2);

    assert_eq!(playback.current(), Some("a"));
    assert_eq!(playback.advance(), Some("b"));
    assert_eq!(playback.current_event(), Some(1));
    assert_eq!(playback.advance(), Some("c"));
    assert_eq!(playback.current_event(), Some(2));
    assert_eq!(playback.queued(), 1);
    assert_eq!(playback.advance(), None);
    assert!(!playback.is_open());
    assert_eq!(playback.advance(), None);
}
