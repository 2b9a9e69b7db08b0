use std::io::Write as _;

use tokio::io::{AsyncBufReadExt, BufReader};

use cita::chat::dispatcher::dispatch;
use cita::config::CitaConfig;
use cita::input::{self, Capture};
use cita::sync::{HttpGateway, SyncEngine, SyncError, TaskGateway};

fn main() {
    // Log to the systemd user journal (`journalctl --user -t cita -f`):
    // this crate at info, everything else at warn.
    init_logging();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {e}");
            std::process::exit(1);
        }
    };
    runtime.block_on(run());
}

fn init_logging() {
    struct FilteredJournal {
        inner: systemd_journal_logger::JournalLog,
    }

    impl log::Log for FilteredJournal {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            let max = if metadata.target().starts_with("cita") {
                log::LevelFilter::Info
            } else {
                log::LevelFilter::Warn
            };
            metadata.level() <= max
        }
        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                self.inner.log(record);
            }
        }
        fn flush(&self) {
            self.inner.flush();
        }
    }

    match systemd_journal_logger::JournalLog::new() {
        Ok(journal) => {
            let journal = journal.with_syslog_identifier("cita".to_string());
            if log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })).is_ok() {
                log::set_max_level(log::LevelFilter::Info);
            }
        }
        Err(e) => eprintln!("Journal logging unavailable: {e}"),
    }
}

async fn run() {
    let config = CitaConfig::load();
    log::info!("using task service at {}", config.base_url);

    let gateway = match HttpGateway::new(&config.base_url) {
        Ok(gateway) => gateway,
        Err(e) => {
            eprintln!("Failed to set up the service client: {e}");
            std::process::exit(1);
        }
    };
    let mut engine = SyncEngine::new(gateway);

    if let Err(e) = engine.refresh().await {
        log::error!("initial refresh failed: {e}");
        println!("Could not reach the task service at {}.", config.base_url);
    }

    println!("Hi! I am your agenda assistant. Try things like:");
    println!("  crear reunion manana 15:00 por 60 min prioridad 2 nombre Plan semanal");
    println!("  editar 3 a hoy 16:00 / eliminar 2 / pendientes / conflictos / ayuda");
    println!("Direct commands: /agenda /new /edit /delete /move /resize /pending /summary /suggest /quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::error!("stdin read failed: {e}");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" {
            break;
        }
        if let Some(command) = line.strip_prefix('/') {
            handle_command(&mut engine, command).await;
        } else {
            chat_turn(&mut engine, line).await;
        }
    }
}

/// One assistant round trip: send the text, render the reply, refresh the
/// agenda when the effect asks for it.
async fn chat_turn<G: TaskGateway>(engine: &mut SyncEngine<G>, text: &str) {
    let response = match engine.gateway().interpret(text).await {
        Ok(response) => response,
        Err(e) => {
            log::error!("assistant request failed: {e}");
            println!("Could not process your message.");
            return;
        }
    };
    let effect = dispatch(&response);
    for line in &effect.lines {
        println!("{line}");
    }
    if effect.refresh {
        surface(engine.refresh().await);
    }
}

async fn handle_command<G: TaskGateway>(engine: &mut SyncEngine<G>, command: &str) {
    let (verb, rest) = match command.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (command, ""),
    };

    match verb {
        "agenda" => print_agenda(engine),
        "new" => match input::parse_draft(rest) {
            Capture::Value(draft) => {
                let result = engine.create(draft.into_new_task()).await;
                if result.is_ok() {
                    println!("Task created.");
                }
                surface(result);
            }
            Capture::Aborted => {}
        },
        "edit" => {
            let Some((id, name)) = parse_id_and_rest(rest) else {
                println!("Usage: /edit <id> <new name>");
                return;
            };
            if name.is_empty() {
                return;
            }
            let patch = cita::core::task::TaskPatch {
                name: Some(name.to_string()),
                ..Default::default()
            };
            let result = engine.edit(id, patch).await;
            if result.is_ok() {
                println!("Task #{id} updated.");
            }
            surface(result);
        }
        "delete" => {
            let Ok(id) = rest.parse::<i64>() else {
                println!("Usage: /delete <id>");
                return;
            };
            let result = engine.delete(id).await;
            if result.is_ok() {
                println!("Task #{id} deleted.");
            }
            surface(result);
        }
        "move" => {
            let Some((id, when)) = parse_id_and_rest(rest) else {
                println!("Usage: /move <id> <YYYY-MM-DD HH:MM>");
                return;
            };
            match input::parse_start(when) {
                Capture::Value(start) => surface(engine.move_event(id, start).await),
                Capture::Aborted => {}
            }
        }
        "resize" => {
            let Some((id, minutes)) = parse_id_and_rest(rest) else {
                println!("Usage: /resize <id> <minutes>");
                return;
            };
            let minutes = match input::parse_minutes(minutes) {
                Capture::Value(minutes) => minutes,
                Capture::Aborted => return,
            };
            let Some(start) = engine.view().get(id).map(|e| e.start) else {
                println!("No task #{id} on the agenda.");
                return;
            };
            let new_end = start + chrono::Duration::minutes(i64::from(minutes));
            surface(engine.resize_event(id, new_end).await);
        }
        "pending" => match engine.gateway().pending().await {
            Ok(items) if items.is_empty() => println!("No pending tasks."),
            Ok(items) => {
                println!("Pending:");
                for t in items {
                    println!("- #{} {} ({} {})", t.id, t.name, t.date, t.time.format("%H:%M"));
                }
            }
            Err(e) => {
                log::error!("pending listing failed: {e}");
                println!("Error: {e}");
            }
        },
        "summary" => match engine.gateway().summary().await {
            Ok(counts) => {
                for (status, count) in counts {
                    println!("{status}: {count}");
                }
            }
            Err(e) => {
                log::error!("summary failed: {e}");
                println!("Error: {e}");
            }
        },
        "suggest" => match engine.gateway().suggestions().await {
            Ok(text) => println!("{text}"),
            Err(e) => {
                log::error!("suggestions failed: {e}");
                println!("Error: {e}");
            }
        },
        _ => println!("Unknown command: /{verb}"),
    }
}

fn print_agenda<G: TaskGateway>(engine: &SyncEngine<G>) {
    let events = engine.view().events();
    if events.is_empty() {
        println!("The agenda is empty.");
        return;
    }
    for event in events {
        println!(
            "{} {}-{}  {}",
            event.start.format("%Y-%m-%d"),
            event.start.format("%H:%M"),
            event.end.format("%H:%M"),
            event.title,
        );
    }
}

fn parse_id_and_rest(input: &str) -> Option<(i64, &str)> {
    let (id, rest) = match input.split_once(char::is_whitespace) {
        Some((id, rest)) => (id, rest.trim()),
        None => (input, ""),
    };
    Some((id.parse::<i64>().ok()?, rest))
}

/// Operation boundary: every failed mutation ends here as a logged,
/// user-visible message. Nothing propagates further.
fn surface(result: Result<(), SyncError>) {
    if let Err(e) = result {
        log::error!("operation failed: {e}");
        println!("Error: {e}");
    }
}
