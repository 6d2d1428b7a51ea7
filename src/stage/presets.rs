//! Stage tables generated from a few parameters instead of authored stage by stage.

use crate::{
    foundation::core::Millis,
    stage::effect::{Change, Effect},
    stage::table::{Stage, StageTable},
};

/// Scroll reveal: item `i` completes at `i * stagger`, in the order given.
pub fn staggered_reveal<I: Clone>(items: &[I], stagger: Millis) -> StageTable<I> {
    let stages = items
        .iter()
        .enumerate()
        .map(|(i, item)| Stage {
            offset: Millis(stagger.0.saturating_mul(i as u64)),
            effect: Effect::new().with(Change::CompleteNodes(vec![item.clone()])),
        })
        .collect();
    // Offsets are generated in increasing order.
    StageTable::new(stages).unwrap_or_default()
}

/// Typed query: the console node activates after one `tick`, the caption then grows by one
/// character per `tick`, and `settle` after the last character plus one idle tick the result
/// node completes.
pub fn typewriter<I: Clone>(node: I, text: &str, tick: Millis, settle: Millis) -> StageTable<I> {
    let mut stages = vec![Stage {
        offset: tick,
        effect: Effect::new()
            .with(Change::ActivateNode(node.clone()))
            .with(Change::Label(String::new())),
    }];

    let mut typed = String::with_capacity(text.len());
    let mut count = 0u64;
    for ch in text.chars() {
        typed.push(ch);
        count += 1;
        stages.push(Stage {
            offset: Millis(tick.0.saturating_mul(count + 1)),
            effect: Effect::new().with(Change::Label(typed.clone())),
        });
    }

    let done = Millis(tick.0.saturating_mul(count + 2)) + settle;
    stages.push(Stage {
        offset: done,
        effect: Effect::new().with(Change::CompleteNodes(vec![node])),
    });

    StageTable::new(stages).unwrap_or_default()
}

#[cfg(test)]
#[path = "../../tests/unit/stage/presets.rs"]
mod tests;
