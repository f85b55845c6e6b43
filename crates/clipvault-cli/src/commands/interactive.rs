//! Line-driven search session: each stdin line edits the query and the
//! result list is redrawn as fragments stream in.

use std::time::Duration;

use anyhow::Result;
use clipvault_application::SearchUseCase;
use clipvault_core::search::{ConstraintAction, MatchMode};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app::App;
use crate::view;

const MAX_SHOWN: usize = 10;
const REDRAW_INTERVAL: Duration = Duration::from_millis(150);

const HELP: &str = "\
commands:
  text <s>    set the search text (empty clears it)
  mode <m>    contains | regex | fuzzy
  +<label>    require label       -<label>  stop requiring label
  !<label>    exclude label       ~<label>  stop excluding label
  labels      list known labels
  show        redraw the results
  help        this message
  quit        leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Edit(ConstraintAction),
    Labels,
    Show,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim();

    match trimmed {
        "quit" | "q" | "exit" => return Ok(Command::Quit),
        "labels" => return Ok(Command::Labels),
        "show" => return Ok(Command::Show),
        "help" | "?" => return Ok(Command::Help),
        "text" => return Ok(Command::Edit(ConstraintAction::SetSearchText(String::new()))),
        _ => {}
    }

    // Text is taken verbatim after the first space so it may carry spaces.
    if let Some(text) = line.trim_start().strip_prefix("text ") {
        return Ok(Command::Edit(ConstraintAction::SetSearchText(text.to_string())));
    }
    if let Some(mode) = trimmed.strip_prefix("mode ") {
        let mode: MatchMode = mode.trim().parse()?;
        return Ok(Command::Edit(ConstraintAction::SetMatchMode(mode)));
    }

    let mut chars = trimmed.chars();
    let prefix = chars.next();
    let label = chars.as_str().trim().to_string();
    let action = match prefix {
        Some('+') => ConstraintAction::InsertIncludedLabel(label.clone()),
        Some('-') => ConstraintAction::RemoveIncludedLabel(label.clone()),
        Some('!') => ConstraintAction::InsertExcludedLabel(label.clone()),
        Some('~') => ConstraintAction::RemoveExcludedLabel(label.clone()),
        _ => return Err(format!("unknown command: {trimmed} (try `help`)")),
    };
    if label.is_empty() {
        return Err("missing label name".to_string());
    }
    Ok(Command::Edit(action))
}

pub async fn run(app: &App) -> Result<()> {
    let usecase = app.search_usecase(app.initial_constraint(), None);
    let mut rebuild = usecase.subscribe_rebuild();
    let mut status = usecase.subscribe_status();

    let mount = usecase.mount().await;
    println!("{HELP}");
    print_labels(&mount.labels);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut redraw = tokio::time::interval(REDRAW_INTERVAL);
    let mut dirty = true;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(Command::Edit(action)) => {
                        if usecase.dispatch(action).await.is_none() {
                            println!("(query unchanged)");
                        }
                        dirty = true;
                    }
                    Ok(Command::Labels) => print_labels(&usecase.list_labels().await),
                    Ok(Command::Show) => render(&usecase).await,
                    Ok(Command::Help) => println!("{HELP}"),
                    Err(message) => eprintln!("{message}"),
                }
            }
            changed = rebuild.changed() => {
                if changed.is_err() {
                    break;
                }
                dirty = true;
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                dirty = true;
            }
            _ = redraw.tick() => {
                if dirty {
                    render(&usecase).await;
                    dirty = false;
                }
            }
        }
    }

    Ok(())
}

fn print_labels(labels: &[String]) {
    if labels.is_empty() {
        println!("labels: (none)");
    } else {
        println!("labels: {}", labels.join(", "));
    }
}

async fn render(usecase: &SearchUseCase) {
    let items = usecase.current_items().await;
    let constraint = usecase.constraint().await;

    println!(
        "-- {} | {} | {} result(s)",
        view::format_constraint(&constraint),
        view::format_status(&usecase.status()),
        items.len()
    );
    for item in items.iter().take(MAX_SHOWN) {
        println!("{}", view::format_clip(item));
    }
    if items.len() > MAX_SHOWN {
        println!("   ... {} more", items.len() - MAX_SHOWN);
    }
}
