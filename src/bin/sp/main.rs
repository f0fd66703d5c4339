use std::{
    backtrace::BacktraceStatus,
    collections::BTreeMap,
    fs,
    io::{self, Read},
    process::exit,
};

use anyhow::{Context, Result};
use clap::Parser;
use spreadsheet_engine::DynTable;

use crate::cli::Cli;

mod cli;

fn handle_err(e: anyhow::Error) {
    e.chain().for_each(|e| eprintln!("Error: {e}"));
    let bt = e.backtrace();
    match bt.status() {
        BacktraceStatus::Captured => eprintln!("Backtrace:\n{bt}"),
        BacktraceStatus::Unsupported => eprintln!("Backtrace is unsupported."),
        BacktraceStatus::Disabled => eprintln!("Backtrace is disabled."),
        _ => eprintln!("Unknown backtrace status: {:?}", bt.status()),
    }
}

fn read_edits(cli: &Cli) -> Result<BTreeMap<String, String>> {
    let text = match &cli.edits {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading edits file {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading edits from stdin")?;
            buf
        }
    };
    serde_json::from_str(&text).context("edits input is not a JSON object of cell-id to text")
}

fn try_main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut table = match &cli.load {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading table file {}", path.display()))?;
            DynTable::from_json(cli.r#type, &json)
                .with_context(|| format!("loading table from {}", path.display()))?
        }
        None => DynTable::new(cli.r#type, cli.columns, cli.rows),
    };

    let edits = read_edits(&cli)?;
    let outcomes = table.apply_edit_batch(&edits);

    if cli.dump {
        println!("{}", table.to_json().context("serialising table")?);
    } else {
        let mut failed = false;
        for (id, outcome) in &outcomes {
            println!("{id}: {outcome}");
            if outcome.starts_with("parse error") || outcome.starts_with("eval error") {
                failed = true;
            }
        }
        if failed {
            anyhow::bail!("one or more cells failed to parse or evaluate");
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    match try_main() {
        Ok(()) => Ok(()),
        Err(e) => {
            handle_err(e);
            exit(1)
        }
    }
}
