// QuickPrompt - terminal front end
//
// Line-oriented stand-in for the desktop panel: palette lookups, prompt
// rendering and streamed answers on stdout. Logs go to quickprompt.log.

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use quickprompt::services::streaming::{StreamCoordinator, StreamUpdate};
use quickprompt::state::AppState;
use quickprompt::utils::logging::init_file_logging;
use quickprompt::utils::paths::log_path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

const HELP: &str = "\
Commands:
  /p <query>        search prompts (blank query lists recent ones)
  /use [name]       render a prompt (default: top palette match) as the draft
  /clip <text>      set the {clipboard} value
  /provider <name>  switch provider
  /reload           re-read config.toml
  /cancel           stop the current answer
  /quit             exit
An empty line sends the draft; any other line is sent as typed.";

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Palette(&'a str),
    Use(Option<&'a str>),
    Clip(&'a str),
    Provider(&'a str),
    Reload,
    Cancel,
    Help,
    Quit,
    SendDraft,
    Submit(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::SendDraft;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Submit(line);
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match name {
        "p" | "palette" => Command::Palette(arg),
        "use" => Command::Use((!arg.is_empty()).then_some(arg)),
        "clip" => Command::Clip(arg),
        "provider" => Command::Provider(arg),
        "reload" => Command::Reload,
        "cancel" => Command::Cancel,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Submit(line),
    }
}

/// Print each update as the suffix beyond what is already on screen
async fn print_updates(mut rx: mpsc::UnboundedReceiver<StreamUpdate>) {
    let mut shown = String::new();
    while let Some(update) = rx.recv().await {
        let mut stdout = std::io::stdout().lock();
        match update {
            StreamUpdate::Text(text) => {
                match text.strip_prefix(shown.as_str()) {
                    Some(suffix) => {
                        let _ = write!(stdout, "{}", suffix);
                    }
                    None => {
                        let _ = write!(stdout, "\n{}", text);
                    }
                }
                shown = text;
            }
            StreamUpdate::Done => {
                let _ = writeln!(stdout);
                shown.clear();
            }
            StreamUpdate::Failed(err) => {
                let _ = writeln!(stdout, "\n[error] {}", err);
                shown.clear();
            }
        }
        let _ = stdout.flush();
    }
}

fn open_coordinator(state: &AppState, provider: Option<&str>) -> Option<StreamCoordinator> {
    match state.coordinator(provider, Handle::current()) {
        Ok(coordinator) => Some(coordinator),
        Err(err) => {
            eprintln!("[config] {}", err);
            None
        }
    }
}

fn show_palette(state: &mut AppState, query: &str) {
    let (rows, preview) = {
        let mut palette = state.palette();
        palette.set_query(query);
        let rows: Vec<String> = palette
            .items()
            .iter()
            .map(|item| match item.score {
                Some(score) => format!("{:>3}  {}", score, item.name),
                None => format!("     {}", item.name),
            })
            .collect();
        (rows, palette.preview().map(str::to_string))
    };

    if rows.is_empty() {
        println!("(no matching prompts)");
        return;
    }
    for (i, row) in rows.iter().enumerate() {
        println!("{} {}", if i == 0 { ">" } else { " " }, row);
    }
    if let Some(preview) = preview {
        println!("---\n{}\n---", preview.trim_end());
    }
}

fn use_prompt(
    state: &mut AppState,
    name: Option<&str>,
    last_query: &str,
    clipboard: &str,
) -> anyhow::Result<String> {
    let name = {
        let mut palette = state.palette();
        palette.set_query(last_query);
        match name {
            Some(name) => palette.commit_name(name)?,
            None => palette.commit()?,
        }
    };
    state.persist_mru()?;
    Ok(state.render_prompt(&name, clipboard)?)
}

fn submit(
    coordinator: Option<&mut StreamCoordinator>,
    query: &str,
    tx: &mpsc::UnboundedSender<StreamUpdate>,
) {
    if query.trim().is_empty() {
        return;
    }
    match coordinator {
        Some(c) => c.start(query, Arc::new(tx.clone())),
        None => eprintln!("[config] no provider available; see config.toml"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_file = log_path()?;
    init_file_logging(&log_file)?;

    let mut state = AppState::initialize().context("failed to load configuration")?;
    let mut provider: Option<String> = None;
    let mut coordinator = open_coordinator(&state, None);

    let (tx, rx) = mpsc::unbounded_channel::<StreamUpdate>();
    let printer = tokio::spawn(print_updates(rx));

    let mut clipboard = String::new();
    let mut draft = String::new();
    let mut last_query = String::new();

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
            Command::Palette(query) => {
                last_query = query.to_string();
                show_palette(&mut state, query);
            }
            Command::Use(name) => match use_prompt(&mut state, name, &last_query, &clipboard) {
                Ok(text) => {
                    println!("{}", text);
                    println!("(empty line to send)");
                    draft = text;
                }
                Err(err) => eprintln!("[error] {}", err),
            },
            Command::Clip(text) => clipboard = text.to_string(),
            Command::Provider(name) => {
                if let Some(c) = open_coordinator(&state, Some(name)) {
                    coordinator = Some(c);
                    provider = Some(name.to_string());
                    println!("(using {})", name);
                }
            }
            Command::Reload => match state.reload_config() {
                Ok(()) => {
                    // Sessions hold the old keys and endpoints
                    coordinator = open_coordinator(&state, provider.as_deref());
                    println!("(configuration reloaded, {} prompts)", state.prompts().len());
                }
                Err(err) => eprintln!("[config] {}", err),
            },
            Command::Cancel => {
                if let Some(c) = coordinator.as_mut().filter(|c| c.is_active()) {
                    c.cancel();
                    println!("\n(cancelled)");
                }
            }
            Command::SendDraft => {
                let query = std::mem::take(&mut draft);
                submit(coordinator.as_mut(), &query, &tx);
            }
            Command::Submit(query) => submit(coordinator.as_mut(), query, &tx),
        }
    }

    if let Some(mut c) = coordinator.take() {
        c.cancel();
        c.wait().await;
    }
    drop(tx);
    let _ = printer.await;
    state.persist_mru()?;
    Ok(())
}
