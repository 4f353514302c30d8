use std::io::Read;

use anyhow::Context;
use colored::Colorize;
use stashe_cache::CacheConfig;
use stashe_store::Value;

use crate::cli::*;
use crate::script::parse_script;
use crate::session::{Outcome, Session};

const DEMO_SCRIPT: &str = "\
# shallow and nested keys
set greeting \"hello\"
set users.alice {\"age\": 30}
get users.alice.age
# a truthy scalar is never turned into a node
set count 1
set count.nested 2
get count.nested
get count
# null is stored, but does not exist
set maybe null
has maybe
exists maybe
stats
dump
flush
stats
";

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => CacheConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => CacheConfig::default(),
    };

    let text = match &cli.command {
        Command::Run(args) => read_script(&args.script)?,
        Command::Demo => DEMO_SCRIPT.to_owned(),
    };

    let ops = parse_script(&text)?;
    let mut session = Session::new(config);
    for op in &ops {
        let outcome = session.execute(op);
        println!("{}", render(&outcome, cli.format)?);
    }
    Ok(())
}

fn read_script(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading script from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(source).with_context(|| format!("reading script {source}"))
}

fn render(outcome: &Outcome, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match outcome {
        Outcome::Switched(id) => format!("{} using {}", "→".cyan(), id.to_string().yellow()),
        Outcome::Stored => format!("{} stored", "✓".green()),
        Outcome::Removed => format!("{} removed", "✓".green()),
        Outcome::Flushed => format!("{} flushed", "✓".green().bold()),
        Outcome::Found(Some(value)) => render_value(value),
        Outcome::Found(None) => "(absent)".dimmed().to_string(),
        Outcome::Answer(true) => "true".green().to_string(),
        Outcome::Answer(false) => "false".red().to_string(),
        Outcome::Size(n) => n.to_string(),
        Outcome::Stats(stats) => match format {
            OutputFormat::Text => stats.to_string(),
            OutputFormat::Json => serde_json::to_string(stats)?,
        },
        Outcome::Dump(snapshot) => match format {
            OutputFormat::Text => serde_json::to_string_pretty(snapshot)?,
            OutputFormat::Json => serde_json::to_string(snapshot)?,
        },
    })
}

fn render_value(value: &Value) -> String {
    match value.to_json() {
        Some(json) => json.to_string(),
        None => format!("<{}>", value.kind()),
    }
}
