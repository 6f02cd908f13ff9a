#![deny(warnings)]

//! Headless CLI: load a scenario, advance days and print market boards.

use anyhow::{Context, Result};
use persistence::{default_save_path, LedgerSnapshot};
use sim_core::{Good, SystemId};
use sim_runtime::{MarketSession, Scenario};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

const DEFAULT_SCENARIO: &str = "assets/scenarios/frontier.yaml";

#[derive(Debug, Default)]
struct Args {
    scenario: Option<String>,
    days: Option<u32>,
    system: Option<u32>,
    load: Option<String>,
    save: Option<String>,
    json: bool,
}

fn parse_args() -> Args {
    parse_args_from(std::env::args().skip(1))
}

fn parse_args_from<I: IntoIterator<Item = String>>(raw: I) -> Args {
    let mut args = Args::default();
    let mut it = raw.into_iter().peekable();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--scenario" => args.scenario = it.next(),
            "--days" => args.days = it.next().and_then(|s| s.parse().ok()),
            "--system" => args.system = it.next().and_then(|s| s.parse().ok()),
            "--load" => args.load = it.next(),
            "--save" => {
                let path = it.next_if(|next| !next.starts_with("--"));
                args.save = Some(path.unwrap_or_else(|| default_save_path().into()));
            }
            "--json" => args.json = true,
            _ => {}
        }
    }
    args
}

fn print_board(session: &MarketSession, id: SystemId, json: bool) -> Result<()> {
    let name = session
        .catalog()
        .get(id)
        .map(|s| s.name.clone())
        .with_context(|| format!("system {id} not in scenario"))?;
    for event in session.active_events(id) {
        info!(system = %id, event = %event.id, kind = ?event.kind, "event in effect");
    }
    if json {
        for good in Good::ALL {
            let b = session.breakdown(id, good)?;
            println!("{}", serde_json::to_string(&b)?);
        }
        return Ok(());
    }
    let cells: Vec<String> = session
        .board(id)?
        .into_iter()
        .map(|(g, p)| format!("{g}={p}"))
        .collect();
    println!("day {:>3} | {:<16} | {}", session.day(), name, cells.join(" "));
    Ok(())
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args();
    info!(?args, build = env!("GIT_SHA"), "starting CLI");

    let path = args.scenario.as_deref().unwrap_or(DEFAULT_SCENARIO);
    let scenario =
        Scenario::load(path).with_context(|| format!("loading scenario {path}"))?;
    let mut session = MarketSession::from_scenario(&scenario)?;
    if let Some(load) = &args.load {
        let snap = LedgerSnapshot::load(load).with_context(|| format!("loading ledger {load}"))?;
        session.restore(snap);
    }

    let targets: Vec<SystemId> = match args.system {
        Some(id) => vec![SystemId(id)],
        None => session.catalog().iter().map(|s| s.id).collect(),
    };

    let days = args.days.unwrap_or(7);
    for _ in 0..days {
        for receipt in session.replay(&scenario.trades)? {
            info!(
                system = %receipt.system,
                good = %receipt.good,
                quantity = receipt.quantity,
                unit_price = receipt.unit_price,
                "scripted trade"
            );
        }
        for &id in &targets {
            print_board(&session, id, args.json)?;
        }
        session.advance_day();
    }

    println!(
        "Ledger | day: {} | open imbalances: {}",
        session.day(),
        session.ledger().len()
    );
    if let Some(save) = &args.save {
        session.snapshot().save(save)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &[&str]) -> Args {
        parse_args_from(raw.iter().map(|s| s.to_string()))
    }

    #[test]
    fn save_without_path_leaves_next_flag_alone() {
        let args = parse(&["--save", "--json", "--days", "3"]);
        assert_eq!(args.save.as_deref(), Some(default_save_path()));
        assert!(args.json);
        assert_eq!(args.days, Some(3));
    }

    #[test]
    fn save_takes_an_explicit_path() {
        let args = parse(&["--save", "out.json", "--system", "2"]);
        assert_eq!(args.save.as_deref(), Some("out.json"));
        assert_eq!(args.system, Some(2));
        assert!(!args.json);
    }

    #[test]
    fn trailing_save_uses_default_path() {
        let args = parse(&["--json", "--save"]);
        assert_eq!(args.save.as_deref(), Some(default_save_path()));
        assert!(args.json);
    }
}
