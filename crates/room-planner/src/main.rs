use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use room_planner_config::PlannerConfig;
use room_planner_core::history::DedupPolicy;
use room_planner_core::{parse_script, JsonLayoutFile, RoomEditor, RoomLayout};

/// Replays a room editing script and saves the resulting layout.
#[derive(Parser, Debug)]
#[command(name = "room-planner", version, about)]
struct Cli {
    /// JSON file holding an array of edit commands.
    script: PathBuf,

    /// Starting layout. Defaults to a single empty ground floor.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Where to write the final layout. Defaults to `<data dir>/layout.json`.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Config file. Defaults to `room-planner.json` next to the executable.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Record every edit, even ones that leave the layout unchanged.
    #[arg(long)]
    record_all: bool,

    /// Maximum history depth (0 = unbounded). Overrides the config.
    #[arg(long)]
    max_depth: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting room-planner");

    let config_path = cli.config.clone().unwrap_or_else(PlannerConfig::config_path);
    let mut config = PlannerConfig::load_or_create(&config_path);
    if cli.record_all {
        config.history.dedup = DedupPolicy::RecordAll;
    }
    if let Some(depth) = cli.max_depth {
        config.history.max_depth = depth;
    }
    config.sanitize();

    let initial = match &cli.layout {
        Some(path) => JsonLayoutFile::new(path).load()?,
        None => RoomLayout::default_room(),
    };

    let script_text = std::fs::read_to_string(&cli.script)
        .with_context(|| format!("Failed to read script: {}", cli.script.display()))?;
    let script = parse_script(&script_text)?;

    let output = cli
        .output
        .unwrap_or_else(|| config.resolve_data_dir().join("layout.json"));
    let mut sink = JsonLayoutFile::new(&output);
    let mut autosave = config.autosave(Instant::now());

    let mut editor = RoomEditor::new(initial, config.history);
    for (step, command) in script.iter().enumerate() {
        command
            .apply(&mut editor)
            .with_context(|| format!("Script step {} ({}) failed", step + 1, command.name()))?;
        tracing::info!(
            step = step + 1,
            op = command.name(),
            undo = editor.timeline().undo_depth(),
            redo = editor.timeline().redo_depth(),
            "Applied"
        );
        if editor.autosave_tick(&mut autosave, Instant::now(), &mut sink)? {
            tracing::info!("Autosaved layout to {}", output.display());
        }
    }

    // The output is written even when the script left the layout untouched.
    if !editor.checkpoint(&mut sink)? {
        sink.write(editor.layout())?;
    }

    let layout = editor.layout();
    println!(
        "{} floor(s), {} item(s), undo depth {}, redo depth {} -> {}",
        layout.floors.len(),
        layout.item_count(),
        editor.timeline().undo_depth(),
        editor.timeline().redo_depth(),
        output.display()
    );

    Ok(())
}
