//! treeviz - headless driver for the visualization engine
//!
//! Usage:
//!   treeviz --kind avl insert:10 insert:20 insert:30 traverse:pre
//!   treeviz --kind graph --mode manual graph bfs:1
//!
//! In manual mode every line read from stdin advances one step; the line
//! `timed` switches to timed playback.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use treeviz::Key;
use treeviz::config::VisualizerConfig;
use treeviz::error::VisualizerError;
use treeviz::kind::StructureKind;
use treeviz::session::{RunReport, Visualizer};
use treeviz::step::{Playback, Step, StepMode};
use treeviz::tree::TraversalOrder;

#[derive(Parser)]
#[command(name = "treeviz")]
#[command(about = "Steps through data structure algorithms in the terminal")]
struct Cli {
    /// Structure kind to start with
    #[arg(long)]
    kind: Option<StructureKind>,

    /// Step mode
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Playback speed factor
    #[arg(long)]
    speed: Option<f64>,

    /// RNG seed for random fills and graphs
    #[arg(long)]
    seed: Option<u64>,

    /// Commands such as `insert:10`, `delete:10`, `search:10`,
    /// `traverse:in`, `rebuild`, `build:5,3,8`, `random-heap`, `fill`,
    /// `graph`, `bfs:1`, `dfs`, `kind:rbt`, `clear`, `stats`, `list`
    #[arg(required = true)]
    commands: Vec<Action>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Timed,
    Manual,
}

impl From<ModeArg> for StepMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Timed => Self::Timed,
            ModeArg::Manual => Self::Manual,
        }
    }
}

#[derive(Clone, Debug)]
enum Action {
    Insert(Key),
    Delete(Key),
    Search(Key),
    Traverse(TraversalOrder),
    Rebuild,
    Build(Vec<Key>),
    RandomHeap,
    Fill,
    Graph,
    Bfs(Option<Key>),
    Dfs(Option<Key>),
    Kind(StructureKind),
    Clear,
    Stats,
    List,
}

impl FromStr for Action {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (name, argument) = value
            .split_once(':')
            .map_or((value, None), |(name, argument)| (name, Some(argument)));

        let key = || -> Result<Key, String> {
            argument
                .ok_or_else(|| format!("`{name}` needs a key, e.g. `{name}:10`"))?
                .trim()
                .parse()
                .map_err(|error| format!("invalid key in `{value}`: {error}"))
        };
        let optional_key = || argument.map(|_| key()).transpose();

        match name {
            "insert" => key().map(Self::Insert),
            "delete" => key().map(Self::Delete),
            "search" => key().map(Self::Search),
            "traverse" => argument
                .unwrap_or("in")
                .parse()
                .map(Self::Traverse)
                .map_err(|error| error.to_string()),
            "rebuild" => Ok(Self::Rebuild),
            "build" => argument
                .unwrap_or_default()
                .split(',')
                .filter(|part| !part.trim().is_empty())
                .map(|part| part.trim().parse::<Key>().map_err(|error| error.to_string()))
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Build),
            "random-heap" => Ok(Self::RandomHeap),
            "fill" => Ok(Self::Fill),
            "graph" => Ok(Self::Graph),
            "bfs" => optional_key().map(Self::Bfs),
            "dfs" => optional_key().map(Self::Dfs),
            "kind" => argument
                .unwrap_or_default()
                .parse()
                .map(Self::Kind)
                .map_err(|error| error.to_string()),
            "clear" => Ok(Self::Clear),
            "stats" => Ok(Self::Stats),
            "list" => Ok(Self::List),
            _ => Err(format!("unknown command `{value}`")),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{self:?}")
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "treeviz=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = VisualizerConfig::from_env().context("reading TREEVIZ_* variables")?;
    if let Some(kind) = cli.kind {
        config = config.with_kind(kind);
    }
    if let Some(mode) = cli.mode {
        config = config.with_step_mode(mode.into());
    }
    if let Some(speed) = cli.speed {
        config = config.with_speed(speed);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building the runtime")?;
    runtime.block_on(drive(config, cli.commands));
    Ok(())
}

async fn drive(config: VisualizerConfig, actions: Vec<Action>) {
    let visualizer = Arc::new(Visualizer::new(config));
    tracing::info!(kind = %visualizer.kind(), mode = ?visualizer.mode(), "session started");

    let printer = tokio::spawn({
        let mut receiver = visualizer.subscribe();
        async move {
            while receiver.changed().await.is_ok() {
                if let Playback::Step { index, total, step } = &*receiver.borrow_and_update() {
                    println!("  [{}/{total}] {}", index + 1, describe(step));
                }
            }
        }
    });

    let advancer = tokio::spawn({
        let visualizer = Arc::clone(&visualizer);
        async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if line.trim() == "timed" {
                    visualizer.set_mode(StepMode::Timed);
                } else if !visualizer.advance() {
                    tracing::debug!("no step is waiting");
                }
            }
        }
    });

    for action in actions {
        println!("> {action}");
        match execute(&visualizer, &action).await {
            Ok(Some(report)) => print_report(&report),
            Ok(None) => {}
            Err(error) => println!("  error: {error}"),
        }
    }

    advancer.abort();
    printer.abort();
}

async fn execute(
    visualizer: &Visualizer,
    action: &Action,
) -> Result<Option<RunReport>, VisualizerError> {
    let report = match action {
        Action::Insert(key) => visualizer.insert(*key).await?,
        Action::Delete(key) => visualizer.delete(*key).await?,
        Action::Search(key) => visualizer.search(*key).await?,
        Action::Traverse(order) => visualizer.traverse(*order).await?,
        Action::Rebuild => visualizer.rebuild_balanced().await?,
        Action::Build(values) => visualizer.build_heap(values.clone()).await?,
        Action::RandomHeap => visualizer.build_random_heap().await?,
        Action::Fill => visualizer.random_fill().await?,
        Action::Graph => visualizer.generate_graph().await?,
        Action::Bfs(start) => visualizer.bfs(*start).await?,
        Action::Dfs(start) => visualizer.dfs(*start).await?,
        Action::Kind(kind) => {
            visualizer.switch_kind(*kind)?;
            return Ok(None);
        }
        Action::Clear => {
            visualizer.clear()?;
            return Ok(None);
        }
        Action::Stats => {
            match visualizer.statistics()? {
                Some(statistics) => println!("  {statistics}"),
                None => println!("  no statistics for {}", visualizer.kind()),
            }
            return Ok(None);
        }
        Action::List => {
            for (key, neighbors) in visualizer.adjacency_listing()? {
                println!("  {key}: {neighbors:?}");
            }
            return Ok(None);
        }
    };
    Ok(Some(report))
}

fn describe(step: &Step) -> String {
    let focus: Vec<String> = step.focus.iter().map(ToString::to_string).collect();
    let marker = if step.operation.is_rebalancing() {
        " (rebalance)"
    } else {
        ""
    };
    match step.emitted {
        Some(key) => format!("{}{marker} [{}] -> {key}", step.operation, focus.join(", ")),
        None => format!("{}{marker} [{}]", step.operation, focus.join(", ")),
    }
}

fn print_report(report: &RunReport) {
    if !report.output.is_empty() {
        println!("  output: {:?}", report.output);
    }
    if let Some(notice) = report.notice {
        println!("  note: {notice}");
    }
    println!(
        "  {} steps, {}",
        report.steps,
        if report.changed { "changed" } else { "unchanged" }
    );
}
