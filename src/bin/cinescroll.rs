use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use cinescroll::{Dom, InMemoryHost, MemoryDom, PageSpec, Pose, StageConfig, Viewport};

#[derive(Parser, Debug)]
#[command(name = "cinescroll", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,

    /// Log engine decisions to stderr (`-v` debug, `-vv` trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the resolved runtime profile.
    Profile(PageArgs),
    /// Print the assembled master timeline summary.
    Timeline(PageArgs),
    /// Scroll to a fraction of the pinned range and print the resulting state.
    Scroll(ScrollArgs),
}

#[derive(Args, Debug)]
struct PageArgs {
    /// Page description JSON.
    #[arg(long)]
    page: PathBuf,

    /// Stage configuration JSON (selectors, debounce, breakpoints).
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 1440.0)]
    width: f64,

    #[arg(long, default_value_t = 900.0)]
    height: f64,

    /// Simulate a phone-sized viewport (overrides `--width`/`--height`).
    #[arg(long)]
    mobile: bool,

    /// Simulate `prefers-reduced-motion: reduce`.
    #[arg(long)]
    reduced_motion: bool,
}

#[derive(Args, Debug)]
struct ScrollArgs {
    #[command(flatten)]
    page: PageArgs,

    /// Position within the pinned range, `0` to `1`.
    #[arg(long)]
    progress: f64,
}

/// Long enough for any scrub lag to settle.
const SETTLE: Duration = Duration::from_secs(10);

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Profile(args) => cmd_profile(args),
        Command::Timeline(args) => cmd_timeline(args),
        Command::Scroll(args) => cmd_scroll(args),
    }
}

type CliStage = cinescroll::Stage<MemoryDom, InMemoryHost>;

fn read_config(path: Option<&Path>) -> anyhow::Result<StageConfig> {
    match path {
        Some(path) => Ok(StageConfig::load(path)?),
        None => Ok(StageConfig::default()),
    }
}

fn make_stage(args: &PageArgs) -> anyhow::Result<CliStage> {
    let config = read_config(args.config.as_deref())?;
    let page = PageSpec::load(&args.page)?;
    let viewport = if args.mobile {
        Viewport::new(390.0, 844.0)
    } else {
        Viewport::try_new(args.width, args.height)?
    };
    let mut host = InMemoryHost::new(viewport);
    host.reduced_motion = args.reduced_motion;
    let dom = page.build_dom(&config);
    let stage = cinescroll::Stage::init(dom, host, config)
        .with_context(|| format!("initialise stage for '{}'", args.page.display()))?;
    Ok(stage)
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{s}");
    Ok(())
}

fn cmd_profile(args: PageArgs) -> anyhow::Result<()> {
    let stage = make_stage(&args)?;
    let profile = stage
        .profile()
        .with_context(|| "motion engine unavailable, no profile resolved")?;
    print_json(&serde_json::json!({
        "tier": profile.tier(),
        "profile": profile,
    }))
}

fn cmd_timeline(args: PageArgs) -> anyhow::Result<()> {
    let stage = make_stage(&args)?;
    let summary = stage
        .summary()
        .with_context(|| "page has no panels under the scroll root")?;
    print_json(&summary)
}

#[derive(serde::Serialize)]
struct PanelReport {
    id: Option<String>,
    phase: Option<String>,
    active: bool,
    /// Panel transform at the playhead as affine coefficients.
    transform: [f64; 6],
    alpha: f64,
}

#[derive(serde::Serialize)]
struct ScrollReport {
    progress: f64,
    top: f64,
    time: f64,
    active_index: Option<usize>,
    panels: Vec<PanelReport>,
}

fn cmd_scroll(args: ScrollArgs) -> anyhow::Result<()> {
    if !(0.0..=1.0).contains(&args.progress) {
        anyhow::bail!("--progress must be within 0..=1 (got {})", args.progress);
    }
    let mut stage = make_stage(&args.page)?;
    let range = stage
        .scroll_range()
        .with_context(|| "page has no panels under the scroll root")?;
    let top = range.offset_at(args.progress);
    stage.on_scroll(top, Duration::ZERO);
    stage.tick(SETTLE)?;

    let time = stage.timeline().map_or(0.0, |tl| tl.time());
    let size = stage.host().viewport.size();
    let panels = stage
        .panels()
        .iter()
        .map(|&panel| {
            let pose = stage
                .timeline()
                .map(|tl| Pose::from_props(&tl.sample(panel, time)))
                .unwrap_or_default();
            PanelReport {
                id: stage.dom().element_id(panel),
                phase: stage.dom().attribute(panel, "data-scene-phase"),
                active: stage.dom().attribute(panel, "data-active").as_deref() == Some("true"),
                transform: pose.to_affine(size).as_coeffs(),
                alpha: pose.alpha,
            }
        })
        .collect();

    print_json(&ScrollReport {
        progress: args.progress,
        top,
        time,
        active_index: stage.active_index(),
        panels,
    })
}
