//! desk-runner: terminal host for the watch desk economy.
//!
//! Usage:
//!   desk-runner --seed 12345 --db desk.db
//!   desk-runner --seed 12345 --save-file save.txt --days 30
//!   desk-runner --ipc-mode --db desk.db

use anyhow::Result;
use std::env;
use std::io::{self, BufRead, Write};
use watchdesk_core::{
    command::PlayerCommand,
    config::EconomyConfig,
    engine::GameEngine,
    event::GameEvent,
    rng::SimRng,
    snapshot::GameSnapshot,
    state::{GameState, Location},
    store::{FileSave, SaveBackend, SaveStore},
};

const DEFAULT_CONFIG: &str = "./data/economy.json";

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Command { command: PlayerCommand },
    Quit,
}

#[derive(serde::Serialize)]
struct IpcReply<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    event: Option<&'a GameEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejection: Option<String>,
    state: GameSnapshot,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let days = parse_arg(&args, "--days", 0u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = string_arg(&args, "--db");
    let save_file = string_arg(&args, "--save-file");
    let config_path = string_arg(&args, "--config");

    let config = match config_path {
        Some(path) => EconomyConfig::load(path)?,
        None if std::path::Path::new(DEFAULT_CONFIG).exists() => EconomyConfig::load(DEFAULT_CONFIG)?,
        None => EconomyConfig::default(),
    };

    let backend: Option<Box<dyn SaveBackend>> = match (db, save_file) {
        (Some(db), _) => {
            let store = SaveStore::open(db)?;
            store.migrate()?;
            Some(Box::new(store))
        }
        (None, Some(path)) => Some(Box::new(FileSave::new(path))),
        (None, None) => None,
    };

    let run_id = format!("run-{seed}-{}", uuid::Uuid::new_v4());
    let state = GameState::start(config, Box::new(SimRng::new(seed)));
    let mut engine = GameEngine::new(run_id.clone(), state, backend);
    let booted = engine.boot();

    if ipc_mode {
        return run_ipc_loop(&mut engine);
    }

    println!("Watch Desk: desk-runner");
    println!("  seed:      {seed}");
    println!("  run_id:    {run_id}");
    println!("  save:      {}", db.or(save_file).unwrap_or("(none)"));
    if let Some(event) = &booted {
        println!("  resumed:   {}", describe(event));
    }
    println!();

    if days > 0 {
        for _ in 0..days {
            engine.execute(PlayerCommand::AdvanceDay)?;
        }
    } else {
        run_interactive(&mut engine)?;
    }
    print_summary(&engine);
    Ok(())
}

fn run_interactive(engine: &mut GameEngine) -> Result<()> {
    print_state(&engine.snapshot());
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let input = line.trim();
        match input {
            "" => continue,
            "quit" | "q" => break,
            "state" => {
                print_state(&engine.snapshot());
                continue;
            }
            _ => {}
        }
        let Some(command) = parse_command(input) else {
            println!("unknown command: {input}");
            continue;
        };
        match engine.execute(command) {
            Ok(event) => {
                println!("{}", describe(&event));
                print_state(&engine.snapshot());
            }
            Err(rejection) => {
                log::info!("rejected: {rejection}");
                println!("can't do that: {rejection}");
            }
        }
    }
    Ok(())
}

/// Map a typed line to a command. Indices are 1-based on screen.
fn parse_command(input: &str) -> Option<PlayerCommand> {
    let mut words = input.split_whitespace();
    let verb = words.next()?;
    let index = words
        .next()
        .and_then(|w| w.parse::<usize>().ok())
        .and_then(|n| n.checked_sub(1));

    let command = match (verb, index) {
        ("r", _)             => PlayerCommand::RefreshMarket,
        ("n", _)             => PlayerCommand::AdvanceDay,
        ("s", _)             => PlayerCommand::Save,
        ("l", _)             => PlayerCommand::Load,
        ("quick", _)         => PlayerCommand::QuickSellAll,
        ("promote", _)       => PlayerCommand::Promote,
        ("break", _)         => PlayerCommand::BreakToParts,
        ("buy", Some(index))    => PlayerCommand::Buy { index },
        ("haggle", Some(index)) => PlayerCommand::Haggle { index },
        ("bid", Some(index))    => PlayerCommand::AuctionBid { index },
        ("drop", Some(index))   => PlayerCommand::BuyDrop { index },
        ("sell", Some(index))   => PlayerCommand::SellOne { index },
        ("travel", Some(index)) => PlayerCommand::SetLocation {
            location: Location::from_index(index)?,
        },
        _ => return None,
    };
    Some(command)
}

fn run_ipc_loop(engine: &mut GameEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let reply = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => serde_json::to_string(&IpcReply {
                event: None,
                rejection: None,
                state: engine.snapshot(),
            })?,
            IpcCommand::Command { command } => {
                let result = engine.execute(command);
                serde_json::to_string(&IpcReply {
                    event: result.as_ref().ok(),
                    rejection: result.as_ref().err().map(ToString::to_string),
                    state: engine.snapshot(),
                })?
            }
        };
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn describe(event: &GameEvent) -> String {
    match event {
        GameEvent::MarketGenerated { listings, .. } => format!("{listings} new listings"),
        GameEvent::MarketRefreshed { drifted, churned, added, .. } => {
            format!("market refreshed: {drifted} repriced, {churned} sold elsewhere, {added} new")
        }
        GameEvent::LocationChanged { location, listings, .. } => {
            format!("arrived at {} ({listings} listings)", location.label())
        }
        GameEvent::DayAdvanced { day, holding_cost, cash, .. } => {
            format!("day {day}: holding cost ${holding_cost}, cash ${cash}")
        }
        GameEvent::ItemPurchased { name, price, resale_ask, .. } => {
            format!("bought {name} for ${price}, listed at ${resale_ask}")
        }
        GameEvent::ItemSold { name, proceeds, profit, .. } => {
            format!("sold {name} for ${proceeds} (profit ${profit})")
        }
        GameEvent::InventoryLiquidated { items, proceeds, .. } => {
            format!("quick-sold {items} items for ${proceeds}")
        }
        GameEvent::Promoted { cost, reputation, .. } => {
            format!("promoted for ${cost}, reputation {reputation}")
        }
        GameEvent::WatchBrokenDown { watch_name, part_ask, part_ids, .. } => {
            format!("broke {watch_name} into {} parts at ${part_ask}", part_ids.len())
        }
        GameEvent::GameSaved { persisted: true, day, .. } => format!("saved day {day}"),
        GameEvent::GameSaved { persisted: false, .. } => "save not written".to_string(),
        GameEvent::GameLoaded { day, items, skipped } => {
            format!("loaded day {day} with {items} items ({skipped} lines skipped)")
        }
        GameEvent::LoadFailed { reason } => format!("load failed: {reason}"),
    }
}

fn print_state(snap: &GameSnapshot) {
    println!(
        "=== DAY {} | {} | cash ${} | rep {} | lvl {} ({}/{} xp) ===",
        snap.day,
        snap.location_label,
        snap.cash,
        snap.reputation,
        snap.level,
        snap.experience,
        snap.experience_to_next
    );
    println!("Market:");
    for (i, item) in snap.market.iter().enumerate() {
        println!(
            "  {:>2}. [{}] {} ({}) ${}{}",
            i + 1,
            item.kind.label(),
            item.name,
            item.condition,
            item.ask_price,
            risk_suffix(&item.risk_note)
        );
    }
    println!("Inventory (book ${}):", snap.book_value);
    for (i, item) in snap.inventory.iter().enumerate() {
        println!(
            "  {:>2}. [{}] {} ({}) ask ${} cost ${}",
            i + 1,
            item.kind.label(),
            item.name,
            item.condition,
            item.ask_price,
            item.acquisition_cost
        );
    }
}

fn risk_suffix(note: &str) -> String {
    if note.is_empty() {
        String::new()
    } else {
        format!("  ! {note}")
    }
}

fn print_summary(engine: &GameEngine) {
    let snap = engine.snapshot();
    println!("=== RUN SUMMARY ===");
    println!("  run_id:      {}", engine.run_id);
    println!("  final day:   {}", snap.day);
    println!("  cash:        ${}", snap.cash);
    println!("  reputation:  {}", snap.reputation);
    println!("  level:       {}", snap.level);
    println!("  inventory:   {} items, book ${}", snap.inventory.len(), snap.book_value);
    println!("  cost basis:  ${}", engine.state().inventory().cost_basis());
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
