//! The nixops4-resource-data-runner executable
//!
//! Reads and writes resource attributes the way a provider would during a
//! reconciliation pass, from plain JSON files. Useful for checking what a
//! provider will see, and what state it will leave behind.

mod inputs;
mod logging;

use anyhow::Result;
use clap::{CommandFactory as _, Parser, Subcommand};
use inputs::Inputs;
use serde_json::json;
use std::process::exit;

fn main() {
    let args = Args::parse();
    handle_result(run_args(args));
}

fn run_args(args: Args) -> Result<()> {
    let mut logger = logging::set_up(logging::Options {
        verbose: args.options.verbose,
        color: args.options.color,
    })?;
    let r = run_command(&args.command);
    logger.tear_down()?;
    r
}

fn run_command(command: &Commands) -> Result<()> {
    match command {
        Commands::Get { inputs, key } => print_json(get(inputs, key.as_deref().unwrap_or(""))?),
        Commands::GetChange { inputs, key } => print_json(get_change(inputs, key)?),
        Commands::State { inputs } => print_json(state(inputs)?),
        Commands::GenerateMan => (|| {
            let cmd = Args::command();
            let man = clap_mangen::Man::new(cmd);
            let mut buffer: Vec<u8> = Default::default();
            man.render(&mut buffer)?;
            println!("{}", String::from_utf8(buffer)?);
            Ok(())
        })(),
        Commands::GenerateMarkdown => {
            let opts = clap_markdown::MarkdownOptions::new().show_footer(false);
            let markdown: String = clap_markdown::help_markdown_custom::<Args>(&opts);
            println!("{}", markdown);
            Ok(())
        }
    }
}

fn print_json(output: serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn get(inputs: &Inputs, key: &str) -> Result<serde_json::Value> {
    inputs.load()?.with_resource_data(|d| {
        let value = d.get(key)?;
        Ok(value.into())
    })
}

fn get_change(inputs: &Inputs, key: &str) -> Result<serde_json::Value> {
    inputs.load()?.with_resource_data(|d| {
        let (old, new) = d.get_change(key)?;
        Ok(json!({
            "changed": old != new,
            "old": serde_json::Value::from(old),
            "new": serde_json::Value::from(new),
            "requires_new": d.requires_new(key),
        }))
    })
}

fn state(inputs: &Inputs) -> Result<serde_json::Value> {
    inputs.load()?.with_resource_data(|d| {
        let state = d.state()?;
        tracing::info!(id = state.id.as_str(), "serialized state");
        Ok(serde_json::to_value(state)?)
    })
}

fn handle_result(r: Result<()>) {
    match r {
        Ok(()) => {}
        Err(e) => {
            eprintln!("error: {:?}", e);
            exit(1);
        }
    }
}

/// Inspect resource attributes through the same layers a provider sees
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    options: Options,
}

#[derive(Parser, Debug, Clone)]
struct Options {
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,

    /// Use colors in log output
    #[arg(long, global = true, default_value = "false")]
    color: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the value at a key-path, or all attributes when no key is given
    Get {
        #[command(flatten)]
        inputs: Inputs,

        /// The key-path to read, e.g. `ingress.0.from`
        key: Option<String>,
    },

    /// Print the old and new value at a key-path, and whether it changed
    GetChange {
        #[command(flatten)]
        inputs: Inputs,

        /// The key-path to compare
        key: String,
    },

    /// Print the state that would be persisted
    State {
        #[command(flatten)]
        inputs: Inputs,
    },

    /// Generate markdown documentation for nixops4-resource-data-runner
    #[command(hide = true)]
    GenerateMarkdown,

    /// Generate a manpage for nixops4-resource-data-runner
    #[command(hide = true)]
    GenerateMan,
}
