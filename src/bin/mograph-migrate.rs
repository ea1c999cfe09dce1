use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "mograph-migrate", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Migrate a scene JSON document to the canonical schema.
    Migrate(MigrateArgs),
    /// Print version and record counts of a scene JSON document.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct MigrateArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Pretty-print the output JSON.
    #[arg(long)]
    pretty: bool,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Migrate(args) => cmd_migrate(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn read_scene_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let f = File::open(path).with_context(|| format!("open scene '{}'", path.display()))?;
    let r = BufReader::new(f);
    let doc = serde_json::from_reader(r).with_context(|| "parse scene JSON")?;
    Ok(doc)
}

fn cmd_migrate(args: MigrateArgs) -> anyhow::Result<()> {
    let mut doc = read_scene_json(&args.in_path)?;
    mograph_migrate::migrate_scene(&mut doc)?;

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&doc)?
    } else {
        serde_json::to_string(&doc)?
    };

    match args.out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(&out, rendered)
                .with_context(|| format!("write scene '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let doc = read_scene_json(&args.in_path)?;

    let version = doc
        .get("version")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("(none)");
    eprintln!("version:      {version}");

    let count = |key: &str| {
        doc.get(key)
            .and_then(serde_json::Value::as_array)
            .map_or(0, Vec::len)
    };
    for key in ["compositions", "items", "components", "textures", "images"] {
        eprintln!("{key}: {}", count(key));
    }
    Ok(())
}
