//! The diagrams shown on the marketing site, expressed as widget data.

use crate::{
    diagram::dsl::{DiagramBuilder, NodeBuilder},
    diagram::model::{Diagram, NodeKind},
    foundation::core::Millis,
    foundation::error::FlowreelResult,
    stage::effect::{Change, Effect, edges},
    stage::presets::typewriter,
    stage::table::{Stage, StageTable},
    widget::model::{Timing, Widget},
};

fn s(id: &str) -> String {
    id.to_owned()
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|id| s(id)).collect()
}

fn pairs(list: &[(&str, &str)]) -> Vec<crate::diagram::model::EdgeKey<String>> {
    let owned: Vec<(String, String)> = list.iter().map(|(a, b)| (s(a), s(b))).collect();
    edges(&owned)
}

fn architecture_diagram() -> FlowreelResult<Diagram<String>> {
    DiagramBuilder::new()
        .node(
            NodeBuilder::new(s("trigger"), "Input", 12.0, 25.0)
                .sublabel("User Query")
                .narrow(16.0, 14.0)
                .build(),
        )
        .node(
            NodeBuilder::new(s("agent"), "AI Agent", 50.0, 25.0)
                .kind(NodeKind::Agent)
                .sublabel("Orchestrator")
                .narrow(50.0, 34.0)
                .build(),
        )
        .node(
            NodeBuilder::new(s("output"), "Output", 88.0, 25.0)
                .sublabel("Response")
                .narrow(84.0, 14.0)
                .build(),
        )
        .node(
            NodeBuilder::new(s("llm"), "LLM", 28.0, 62.0)
                .kind(NodeKind::Service)
                .narrow(18.0, 66.0)
                .build(),
        )
        .node(
            NodeBuilder::new(s("memory"), "Memory", 42.0, 75.0)
                .kind(NodeKind::Service)
                .narrow(38.0, 84.0)
                .build(),
        )
        .node(
            NodeBuilder::new(s("vector"), "Vector Store", 58.0, 75.0)
                .kind(NodeKind::Service)
                .narrow(62.0, 84.0)
                .build(),
        )
        .node(
            NodeBuilder::new(s("embeddings"), "Embeddings", 72.0, 62.0)
                .kind(NodeKind::Service)
                .narrow(82.0, 66.0)
                .build(),
        )
        .solid(s("trigger"), s("agent"))
        .solid(s("agent"), s("output"))
        .dashed(s("agent"), s("llm"))
        .dashed(s("agent"), s("memory"))
        .dashed(s("agent"), s("vector"))
        .dashed(s("agent"), s("embeddings"))
        .build()
}

fn architecture_stages() -> FlowreelResult<StageTable<String>> {
    use Change::*;

    StageTable::new(vec![
        Stage::at(
            200,
            Effect::new()
                .with(ActivateNode(s("trigger")))
                .with(Label(s("Receiving input..."))),
        ),
        Stage::at(
            900,
            Effect::new()
                .with(CompleteNodes(ids(&["trigger"])))
                .with(ActivateEdges(pairs(&[("trigger", "agent")]))),
        ),
        Stage::at(
            1300,
            Effect::new()
                .with(CompleteEdges(pairs(&[("trigger", "agent")])))
                .with(ActivateNode(s("agent")))
                .with(Label(s("Agent processing..."))),
        ),
        Stage::at(
            2100,
            Effect::new()
                .with(ActivateEdges(pairs(&[("agent", "llm"), ("agent", "memory")])))
                .with(Label(s("Accessing LLM and memory..."))),
        ),
        Stage::at(
            2600,
            Effect::new()
                .with(CompleteEdges(pairs(&[("agent", "llm"), ("agent", "memory")])))
                .with(ActivateNode(s("llm"))),
        ),
        Stage::at(
            3400,
            Effect::new()
                .with(CompleteNodes(ids(&["llm", "memory"])))
                .with(ActivateNode(s("agent")))
                .with(Label(s("Retrieving knowledge..."))),
        ),
        Stage::at(
            4100,
            Effect::new().with(ActivateEdges(pairs(&[
                ("agent", "vector"),
                ("agent", "embeddings"),
            ]))),
        ),
        Stage::at(
            4600,
            Effect::new()
                .with(CompleteEdges(pairs(&[
                    ("agent", "vector"),
                    ("agent", "embeddings"),
                ])))
                .with(ActivateNode(s("vector"))),
        ),
        Stage::at(
            5400,
            Effect::new()
                .with(CompleteNodes(ids(&["vector", "embeddings"])))
                .with(ActivateNode(s("agent")))
                .with(Label(s("Generating response..."))),
        ),
        Stage::at(
            6200,
            Effect::new().with(ActivateEdges(pairs(&[("agent", "output")]))),
        ),
        Stage::at(
            6600,
            Effect::new()
                .with(CompleteEdges(pairs(&[("agent", "output")])))
                .with(ActivateNode(s("output"))),
        ),
        Stage::at(
            7400,
            Effect::new()
                .with(CompleteNodes(ids(&["agent", "output"])))
                .with(Label(s("Complete!"))),
        ),
        Stage::at(
            8000,
            Effect::new().with(Label(String::new())).with(ClearActiveNode),
        ),
    ])
}

/// Agent architecture diagram: input, orchestrating agent, output and four backing services.
/// 13 stages over 8 s, restarting every 9 s.
pub fn agent_architecture() -> FlowreelResult<Widget<String>> {
    Widget {
        name: s("agent-architecture"),
        diagram: architecture_diagram()?,
        stages: architecture_stages()?,
        timing: Timing {
            threshold: 0.2,
            cooldown_ms: Millis(1000),
            ..Timing::default()
        },
    }
    .prepare()
}

fn pipeline_diagram() -> FlowreelResult<Diagram<u16>> {
    DiagramBuilder::new()
        .node(
            NodeBuilder::new(0, "Start", 8.0, 50.0)
                .sublabel("User Query")
                .narrow(50.0, 6.0)
                .build(),
        )
        .node(
            NodeBuilder::new(1, "Router", 23.0, 50.0)
                .kind(NodeKind::Agent)
                .sublabel("Analyze & Route")
                .narrow(50.0, 20.0)
                .build(),
        )
        .node(
            NodeBuilder::new(2, "SQL Agent", 40.0, 20.0)
                .kind(NodeKind::Agent)
                .sublabel("Query DB")
                .narrow(25.0, 38.0)
                .build(),
        )
        .node(
            NodeBuilder::new(3, "Doc Agent", 40.0, 80.0)
                .kind(NodeKind::Agent)
                .sublabel("Search Docs")
                .narrow(75.0, 38.0)
                .build(),
        )
        .node(
            NodeBuilder::new(4, "Validator", 57.0, 50.0)
                .kind(NodeKind::Service)
                .sublabel("Cross-Check")
                .narrow(50.0, 56.0)
                .build(),
        )
        .node(
            NodeBuilder::new(5, "Synthesizer", 74.0, 50.0)
                .kind(NodeKind::Service)
                .sublabel("Generate Result")
                .narrow(50.0, 74.0)
                .build(),
        )
        .node(
            NodeBuilder::new(6, "Output", 91.0, 50.0)
                .sublabel("Return Answer")
                .narrow(50.0, 92.0)
                .build(),
        )
        .solid(0, 1)
        .solid(1, 2)
        .solid(1, 3)
        .solid(2, 4)
        .solid(3, 4)
        .solid(4, 5)
        .solid(5, 6)
        .build()
}

fn pipeline_stages() -> FlowreelResult<StageTable<u16>> {
    use Change::*;

    StageTable::new(vec![
        Stage::at(
            300,
            Effect::new()
                .with(ActivateNode(0))
                .with(Label(s("Receiving user query...")))
                .with(SetProcessing(vec![0])),
        ),
        Stage::at(
            1200,
            Effect::new()
                .with(CompleteNodes(vec![0]))
                .with(SetProcessing(vec![]))
                .with(ActivateEdges(edges(&[(0, 1)]))),
        ),
        Stage::at(
            1800,
            Effect::new()
                .with(CompleteEdges(edges(&[(0, 1)])))
                .with(ActivateNode(1))
                .with(Label(s("Analyzing query and routing...")))
                .with(SetProcessing(vec![1])),
        ),
        Stage::at(
            2700,
            Effect::new()
                .with(CompleteNodes(vec![1]))
                .with(SetProcessing(vec![]))
                .with(ActivateEdges(edges(&[(1, 2), (1, 3)])))
                .with(Label(s("Dispatching to specialized agents..."))),
        ),
        Stage::at(
            3300,
            Effect::new()
                .with(CompleteEdges(edges(&[(1, 2), (1, 3)])))
                .with(ActivateNode(2))
                .with(SetProcessing(vec![2, 3]))
                .with(Label(s("Agents working in parallel..."))),
        ),
        Stage::at(3400, Effect::new().with(ActivateNode(3))),
        Stage::at(
            4500,
            Effect::new()
                .with(CompleteNodes(vec![2, 3]))
                .with(SetProcessing(vec![]))
                .with(ActivateEdges(edges(&[(2, 4), (3, 4)]))),
        ),
        Stage::at(
            5100,
            Effect::new()
                .with(CompleteEdges(edges(&[(2, 4), (3, 4)])))
                .with(ActivateNode(4))
                .with(Label(s("Cross-checking and validating data...")))
                .with(SetProcessing(vec![4])),
        ),
        Stage::at(
            6200,
            Effect::new()
                .with(CompleteNodes(vec![4]))
                .with(SetProcessing(vec![]))
                .with(ActivateEdges(edges(&[(4, 5)]))),
        ),
        Stage::at(
            6800,
            Effect::new()
                .with(CompleteEdges(edges(&[(4, 5)])))
                .with(ActivateNode(5))
                .with(Label(s("Synthesizing final response...")))
                .with(SetProcessing(vec![5])),
        ),
        Stage::at(
            7900,
            Effect::new()
                .with(CompleteNodes(vec![5]))
                .with(SetProcessing(vec![]))
                .with(ActivateEdges(edges(&[(5, 6)]))),
        ),
        Stage::at(
            8500,
            Effect::new()
                .with(CompleteEdges(edges(&[(5, 6)])))
                .with(ActivateNode(6))
                .with(Label(s("Delivering result!")))
                .with(SetProcessing(vec![6])),
        ),
        Stage::at(
            9600,
            Effect::new()
                .with(CompleteNodes(vec![6]))
                .with(SetProcessing(vec![]))
                .with(ClearActiveNode)
                .with(Label(String::new())),
        ),
    ])
}

/// Multi-agent workflow pipeline: router fans out to two agents, a validator joins them.
/// 9.6 s pass, restarting every 11 s.
pub fn workflow_pipeline() -> FlowreelResult<Widget<u16>> {
    Widget {
        name: s("workflow-pipeline"),
        diagram: pipeline_diagram()?,
        stages: pipeline_stages()?,
        timing: Timing {
            threshold: 0.2,
            cooldown_ms: Millis(1400),
            ..Timing::default()
        },
    }
    .prepare()
}

/// Query typed into the console widget.
pub const CONSOLE_QUERY: &str = "Show me sales trends for Project Alpha in Q4...";

/// Console that types a query and then shows results, every 6.5 s.
pub fn query_console() -> FlowreelResult<Widget<String>> {
    let diagram = DiagramBuilder::new()
        .node(
            NodeBuilder::new(s("query"), "Ask anything", 50.0, 20.0)
                .kind(NodeKind::Agent)
                .build(),
        )
        .node(
            NodeBuilder::new(s("results"), "Key Metrics", 50.0, 70.0)
                .kind(NodeKind::Service)
                .build(),
        )
        .build()?;

    let typed = typewriter(s("query"), CONSOLE_QUERY, Millis(50), Millis(500));
    let mut stages: Vec<Stage<String>> = typed.stages().cloned().collect();
    let done = typed.duration();
    stages.push(Stage {
        offset: done,
        effect: Effect::new().with(Change::CompleteNodes(ids(&["results"]))),
    });

    Widget {
        name: s("query-console"),
        diagram,
        stages: StageTable::new(stages)?,
        timing: Timing {
            threshold: 0.1,
            cycle_ms: Some(Millis(6500)),
            ..Timing::default()
        },
    }
    .prepare()
}

/// "How it works" style section: `count` cards revealed `stagger` apart, once.
pub fn section_reveal(count: u16, stagger: Millis) -> FlowreelResult<Widget<u16>> {
    let columns = count.clamp(1, 4);
    let mut builder = DiagramBuilder::new();
    for i in 0..count {
        let col = f64::from(i % columns);
        let row = f64::from(i / columns);
        let x = (col + 0.5) * 100.0 / f64::from(columns);
        let y = 25.0 + row * 40.0;
        builder = builder.node(
            NodeBuilder::new(i, format!("Step {}", i + 1), x, y)
                .narrow(50.0, 10.0 + f64::from(i) * 20.0)
                .build(),
        );
    }

    Widget {
        name: s("section-reveal"),
        diagram: builder.build()?,
        stages: StageTable::default(),
        timing: Timing {
            threshold: 0.1,
            repeat: false,
            stagger_ms: Some(stagger),
            ..Timing::default()
        },
    }
    .prepare()
}

#[cfg(test)]
#[path = "../../tests/unit/widget/builtin.rs"]
mod tests;
