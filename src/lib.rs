//! flowreel drives timed storytelling animations over small node/edge diagrams.
//!
//! A widget is pure data: a [`Diagram`] (nodes and connectors), a [`StageTable`] (what changes
//! when, relative to the start of a pass) and [`Timing`] (visibility threshold, cooldown,
//! looping). One generic engine, [`Sequencer`], turns that data into an [`AnimationState`] over
//! time and exposes it to a drawing layer through a [`Projection`].
//!
//! # Pipeline overview
//!
//! 1. **Gate**: viewport-intersection notifications drive a [`VisibilityGate`]
//! 2. **Loop**: the [`LoopController`] arms one pass at a time and restarts after the cooldown
//! 3. **Schedule**: the [`Scheduler`] arms host timers per stage, guarded by an [`Epoch`]
//! 4. **Apply**: fired stages mutate the [`AnimationState`]
//! 5. **Project**: [`Projection`] maps state to node/edge statuses for drawing
//!
//! Timers are an injected capability ([`TimerHost`]). [`TimerQueue`] is the deterministic
//! in-process host used by [`simulate`], [`play`] and the tests.
//!
//! - No unsafe: `unsafe` is forbidden in this crate.
//! - Single-threaded: every input is a `&mut` call on the sequencer.
//!
//! For a walkthrough of the moving parts, see [`crate::guide`].
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod diagram;
mod foundation;
mod gate;
mod playback;
mod projection;
mod render;
mod schedule;
mod sequencer;
mod stage;
mod state;
mod widget;

/// Standalone documentation of flowreel's concepts.
pub mod guide;

pub use diagram::dsl::{DiagramBuilder, NodeBuilder};
pub use diagram::model::{
    Diagram, Edge, EdgeKey, EdgeStyle, Node, NodeKey, NodeKind, NodePosition,
};
pub use foundation::core::{Epoch, Millis, Point, ViewportClass};
pub use foundation::error::{FlowreelError, FlowreelResult};
pub use gate::{GateState, GateTransition, Intersection, VisibilityGate};
pub use playback::{
    PlayOpts, ScriptAction, ScriptEvent, Trace, TraceEntry, TraceEvent, VisibilityScript, play,
    settle, simulate,
};
pub use projection::{
    EdgeStatus, EdgeView, Frame, FrameEdge, FrameNode, NodeStatus, NodeView, Projection,
};
pub use render::raster::{rasterize_png, rasterize_svg};
pub use render::svg::{SvgOpts, render_svg};
pub use schedule::looper::{LoopController, LoopTiming};
pub use schedule::scheduler::{HandleSet, Scheduler};
pub use schedule::timer::{TimerHandle, TimerHost, TimerQueue, TimerSlot, TimerToken};
pub use sequencer::{Sequencer, TimerOutcome};
pub use stage::effect::{Change, Effect, edges};
pub use stage::presets::{staggered_reveal, typewriter};
pub use stage::table::{ConfigIssue, ConfigReport, Stage, StageTable};
pub use state::AnimationState;
pub use widget::builtin::{
    CONSOLE_QUERY, agent_architecture, query_console, section_reveal, workflow_pipeline,
};
pub use widget::model::{Timing, Widget};
