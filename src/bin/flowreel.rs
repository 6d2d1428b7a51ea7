use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use flowreel::{
    Frame, Millis, NodeKey, NodeStatus, PlayOpts, SvgOpts, TraceEvent, ViewportClass,
    VisibilityScript, Widget,
};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(name = "flowreel", version)]
struct Cli {
    /// Log engine events to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate a widget and print every state change.
    Trace(TraceArgs),
    /// Render the widget at one instant as SVG or PNG.
    Snapshot(SnapshotArgs),
    /// Play a widget in real time and print frames as they happen.
    Play(PlayArgs),
    /// Print a widget's configuration as JSON.
    Dump(DumpArgs),
}

#[derive(Args, Debug)]
struct Source {
    /// Built-in widget.
    #[arg(long, value_enum, required_unless_present = "config", conflicts_with = "config")]
    widget: Option<BuiltinWidget>,

    /// Widget JSON config.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BuiltinWidget {
    AgentArchitecture,
    WorkflowPipeline,
    QueryConsole,
    SectionReveal,
}

#[derive(Args, Debug)]
struct TraceArgs {
    #[command(flatten)]
    source: Source,

    /// Simulated run length in ms.
    #[arg(long, default_value_t = 10_000)]
    until: u64,

    /// Leave the viewport at this time (ms). Repeatable.
    #[arg(long)]
    hide: Vec<u64>,

    /// Re-enter the viewport at this time (ms). Repeatable.
    #[arg(long)]
    show: Vec<u64>,

    /// Use narrow-viewport positions.
    #[arg(long)]
    narrow: bool,

    /// Print the trace as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    #[command(flatten)]
    source: Source,

    /// Instant to capture (ms after the widget became visible).
    #[arg(long)]
    at: u64,

    /// Output path; `.png` rasterizes, anything else writes SVG.
    #[arg(long)]
    out: PathBuf,

    /// Use narrow-viewport positions.
    #[arg(long)]
    narrow: bool,

    /// Canvas width in px.
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Canvas height in px.
    #[arg(long, default_value_t = 460)]
    height: u32,
}

#[derive(Args, Debug)]
struct PlayArgs {
    #[command(flatten)]
    source: Source,

    /// Playback length in ms.
    #[arg(long = "for", default_value_t = 10_000)]
    duration_ms: u64,

    /// Use narrow-viewport positions.
    #[arg(long)]
    narrow: bool,
}

#[derive(Args, Debug)]
struct DumpArgs {
    #[command(flatten)]
    source: Source,
}

enum Loaded {
    Named(Widget<String>),
    Indexed(Widget<u16>),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Trace(args) => match load(&args.source)? {
            Loaded::Named(w) => cmd_trace(w, &args),
            Loaded::Indexed(w) => cmd_trace(w, &args),
        },
        Command::Snapshot(args) => match load(&args.source)? {
            Loaded::Named(w) => cmd_snapshot(w, &args),
            Loaded::Indexed(w) => cmd_snapshot(w, &args),
        },
        Command::Play(args) => match load(&args.source)? {
            Loaded::Named(w) => cmd_play(w, &args),
            Loaded::Indexed(w) => cmd_play(w, &args),
        },
        Command::Dump(args) => match load(&args.source)? {
            Loaded::Named(w) => print_json(&w),
            Loaded::Indexed(w) => print_json(&w),
        },
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "flowreel=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(source: &Source) -> anyhow::Result<Loaded> {
    if let Some(path) = &source.config {
        return Ok(Loaded::Named(read_widget_json(path)?));
    }
    let builtin = source
        .widget
        .context("either --widget or --config is required")?;
    let loaded = match builtin {
        BuiltinWidget::AgentArchitecture => Loaded::Named(flowreel::agent_architecture()?),
        BuiltinWidget::WorkflowPipeline => Loaded::Indexed(flowreel::workflow_pipeline()?),
        BuiltinWidget::QueryConsole => Loaded::Named(flowreel::query_console()?),
        BuiltinWidget::SectionReveal => {
            Loaded::Indexed(flowreel::section_reveal(4, Millis(150))?)
        }
    };
    Ok(loaded)
}

fn read_widget_json(path: &Path) -> anyhow::Result<Widget<String>> {
    Widget::from_path(path).with_context(|| format!("load widget '{}'", path.display()))
}

fn viewport(narrow: bool) -> ViewportClass {
    if narrow {
        ViewportClass::Narrow
    } else {
        ViewportClass::Wide
    }
}

fn script(hide: &[u64], show: &[u64], narrow: bool) -> VisibilityScript {
    let mut script = VisibilityScript::always_visible();
    if narrow {
        script = script.viewport(Millis::ZERO, ViewportClass::Narrow);
    }
    for at in hide {
        script = script.hide(Millis(*at));
    }
    for at in show {
        script = script.show(Millis(*at));
    }
    script
}

fn cmd_trace<I>(widget: Widget<I>, args: &TraceArgs) -> anyhow::Result<()>
where
    I: NodeKey + serde::Serialize,
{
    let script = script(&args.hide, &args.show, args.narrow);
    let trace = flowreel::simulate(widget, &script, Millis(args.until))?;

    if args.json {
        return print_json(&trace);
    }

    for entry in &trace.entries {
        println!(
            "{:>8}  {:<16} {}",
            entry.at.to_string(),
            describe(entry.event),
            summarize(&entry.frame)
        );
    }
    eprintln!(
        "{}: {} stages applied, {} restarts",
        trace.widget,
        trace.applied(),
        trace.restarts()
    );
    Ok(())
}

fn cmd_snapshot<I: NodeKey>(widget: Widget<I>, args: &SnapshotArgs) -> anyhow::Result<()> {
    let script = script(&[], &[], args.narrow);
    let seq = flowreel::settle(widget, &script, Millis(args.at))?;
    let opts = SvgOpts {
        width: args.width,
        height: args.height,
    };
    let svg = flowreel::render_svg(&seq.projection(), opts);

    let is_png = args
        .out
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if is_png {
        flowreel::rasterize_png(&svg, opts, &args.out)?;
    } else {
        if let Some(parent) = args.out.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        std::fs::write(&args.out, svg)
            .with_context(|| format!("write svg '{}'", args.out.display()))?;
    }

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_play<I: NodeKey>(widget: Widget<I>, args: &PlayArgs) -> anyhow::Result<()> {
    let opts = PlayOpts {
        duration: Millis(args.duration_ms),
        viewport: viewport(args.narrow),
    };
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;

    let frames = rt.block_on(flowreel::play(widget, opts, |at, projection| {
        println!("{:>8}  {}", at.to_string(), summarize(&projection.frame()));
    }))?;

    eprintln!("played {frames} frames");
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), value).context("write JSON to stdout")?;
    println!();
    Ok(())
}

fn describe(event: TraceEvent) -> String {
    match event {
        TraceEvent::Timer(outcome) => match outcome {
            flowreel::TimerOutcome::Applied(i) => format!("stage {i}"),
            flowreel::TimerOutcome::PassRestarted => "pass restart".to_string(),
            flowreel::TimerOutcome::Stale => "stale".to_string(),
        },
        TraceEvent::Gate(t) => format!("gate {t:?}").to_lowercase(),
        TraceEvent::Viewport(v) => format!("viewport {v:?}").to_lowercase(),
    }
}

fn summarize<I: NodeKey>(frame: &Frame<I>) -> String {
    let mut parts = Vec::new();
    for node in &frame.nodes {
        let mark = match node.status {
            NodeStatus::Idle => continue,
            NodeStatus::Active => "*",
            NodeStatus::Processing => "~",
            NodeStatus::Completed => "+",
        };
        parts.push(format!("{mark}{}", node.id));
    }
    if frame.label.is_empty() {
        parts.join(" ")
    } else {
        format!("\"{}\" {}", frame.label, parts.join(" "))
    }
}
