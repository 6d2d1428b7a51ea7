use super::*;

#[test]
fn staggered_reveal_spaces_items_evenly() {
    let t = staggered_reveal(&["a", "b", "c"], Millis(150));
    let offsets: Vec<_> = t.stages().map(|s| s.offset.get()).collect();
    assert_eq!(offsets, [0, 150, 300]);
    assert_eq!(
        t.get(2).unwrap().effect.changes(),
        &[Change::CompleteNodes(vec!["c"])]
    );
}

#[test]
fn typewriter_types_one_character_per_tick() {
    let t = typewriter("q", "hey", Millis(50), Millis(500));

    // activate, three characters, completion
    assert_eq!(t.len(), 5);
    assert_eq!(t.get(0).unwrap().offset, Millis(50));
    assert_eq!(
        t.get(0).unwrap().effect.changes(),
        &[Change::ActivateNode("q"), Change::Label(String::new())]
    );

    let typed: Vec<_> = t
        .stages()
        .skip(1)
        .take(3)
        .map(|s| (s.offset.get(), s.effect.changes()[0].clone()))
        .collect();
    assert_eq!(
        typed,
        [
            (100, Change::Label("h".into())),
            (150, Change::Label("he".into())),
            (200, Change::Label("hey".into())),
        ]
    );

    let last = t.get(4).unwrap();
    assert_eq!(last.offset, Millis(50 * 5 + 500));
    assert_eq!(last.effect.changes(), &[Change::CompleteNodes(vec!["q"])]);
}

#[test]
fn typewriter_counts_characters_not_bytes() {
    let t = typewriter(0u8, "héllo", Millis(10), Millis::ZERO);
    assert_eq!(t.len(), 1 + 5 + 1);
    assert_eq!(t.duration(), Millis(70));
}
