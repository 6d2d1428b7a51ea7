//! # flowreel guide
//!
//! A standalone walkthrough of how a widget goes from static tables to the statuses a drawing
//! layer reads. For command-line usage, start with the repository `README.md`.
//!
//! ---
//!
//! ## Core concepts
//!
//! - [`Diagram`](crate::Diagram): nodes (id, label, per-viewport position) and directed edges
//! - [`StageTable`](crate::StageTable): ordered `(offset, effect)` pairs making up one pass
//! - [`AnimationState`](crate::AnimationState): the only mutable data of a widget
//! - [`Sequencer`](crate::Sequencer): the engine that owns a widget and reacts to host signals
//! - [`Projection`](crate::Projection): read-only status view for drawing
//!
//! ---
//!
//! ## One pass
//!
//! When the widget becomes visible enough ([`Timing::threshold`](crate::Timing::threshold)),
//! the loop controller asks the scheduler to arm one timer per stage at its offset from now,
//! plus one pass-end timer at the cycle length:
//!
//! - `cycle_ms` if the widget sets it
//! - otherwise the last stage offset plus `cooldown_ms`
//!
//! Each fired stage applies its [`Effect`](crate::Effect). Effects only assign or insert, so
//! replaying a table from a clean state always yields the same state.
//!
//! At pass end the state is reset to empty, the finished pass is cancelled and the next pass
//! is armed from stage zero. The state holds the final frame of a pass through the cooldown
//! and stays empty from the reset until the first stage of the next pass fires.
//!
//! ---
//!
//! ## Cancellation and the epoch guard
//!
//! Host timers cannot always be recalled once they are due. Every timer therefore carries the
//! scheduler [`Epoch`](crate::Epoch) it was armed under, and cancelling a pass bumps the epoch.
//! [`Sequencer::on_timer`](crate::Sequencer::on_timer) drops tokens from older epochs before
//! they can touch the state, so after a cancel no effect of the cancelled pass is ever
//! observed.
//!
//! ---
//!
//! ## Visibility
//!
//! [`VisibilityGate`](crate::VisibilityGate) has two states. It activates on
//! `intersecting && ratio >= threshold` and deactivates only when the widget leaves the
//! viewport entirely. Leaving stops the loop and resets the state, so re-entering always
//! starts over at stage zero. Duplicate notifications are ignored.
//!
//! ---
//!
//! ## Hosts
//!
//! The engine never sleeps. A [`TimerHost`](crate::TimerHost) stores tokens and hands them back
//! through `on_timer`. [`TimerQueue`](crate::TimerQueue) is a deterministic host: tests and
//! [`simulate`](crate::simulate) drive it on a virtual clock, and [`play`](crate::play) drives
//! it in real time with `tokio::time::sleep_until`.
//!
//! ---
//!
//! ## Widgets as data
//!
//! The built-in widgets ([`agent_architecture`](crate::agent_architecture),
//! [`workflow_pipeline`](crate::workflow_pipeline), [`query_console`](crate::query_console),
//! [`section_reveal`](crate::section_reveal)) are plain [`Widget`](crate::Widget) values. The
//! same shape loads from JSON:
//!
//! ```json
//! {
//!   "name": "two-step",
//!   "diagram": {
//!     "nodes": [
//!       { "id": "a", "label": "A", "position": { "wide": { "x": 20.0, "y": 50.0 } } },
//!       { "id": "b", "label": "B", "position": { "wide": { "x": 80.0, "y": 50.0 } } }
//!     ],
//!     "edges": [ { "from": "a", "to": "b" } ]
//!   },
//!   "stages": [
//!     { "offset": 0, "effect": [ { "activate_node": "a" }, { "label": "Start" } ] },
//!     { "offset": 500, "effect": [ { "complete_nodes": ["a"] },
//!                                  { "activate_edges": [ { "from": "a", "to": "b" } ] } ] }
//!   ],
//!   "timing": { "cooldown_ms": 1000 }
//! }
//! ```
//!
//! References to unknown nodes or edges are reported in
//! [`Sequencer::config_report`](crate::Sequencer::config_report), logged as warnings and
//! skipped at draw time.
