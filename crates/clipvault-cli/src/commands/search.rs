use std::time::Duration;

use anyhow::{Result, bail};
use clap::Args;
use clipvault_application::SearchUseCase;
use clipvault_core::search::{ConstraintAction, MatchMode, QueryConstraint, SearchStatus};

use crate::app::App;
use crate::view;

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Text to search for
    #[arg(short, long, default_value = "")]
    pub text: String,

    /// Match mode: contains, regex or fuzzy (defaults to the configured mode)
    #[arg(short, long)]
    pub mode: Option<MatchMode>,

    /// Only clips carrying this label (repeatable)
    #[arg(short = 'l', long = "include")]
    pub include: Vec<String>,

    /// Skip clips carrying this label (repeatable)
    #[arg(short = 'x', long = "exclude")]
    pub exclude: Vec<String>,

    /// Maximum number of results (defaults to search.result_limit)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Print the final result list as JSON instead of streaming lines
    #[arg(long)]
    pub json: bool,

    /// Stop waiting after this long without any progress
    #[arg(long, default_value_t = 3000)]
    pub idle_timeout_ms: u64,
}

/// Folds the command-line flags into `base` through the reducer.
///
/// A label passed to both `--include` and `--exclude` is rejected: flags carry
/// no order the user chose, so neither one can win.
pub fn build_constraint(base: QueryConstraint, args: &SearchArgs) -> Result<QueryConstraint> {
    if let Some(label) = args.include.iter().find(|l| args.exclude.contains(l)) {
        bail!("Label `{label}` is both included and excluded");
    }

    let mut actions = vec![ConstraintAction::SetSearchText(args.text.clone())];
    if let Some(mode) = args.mode {
        actions.push(ConstraintAction::SetMatchMode(mode));
    }
    actions.extend(args.include.iter().cloned().map(ConstraintAction::InsertIncludedLabel));
    actions.extend(args.exclude.iter().cloned().map(ConstraintAction::InsertExcludedLabel));

    Ok(actions
        .into_iter()
        .fold(base, |constraint, action| constraint.reduce(action)))
}

pub async fn run(app: &App, args: SearchArgs) -> Result<()> {
    let constraint = build_constraint(app.initial_constraint(), &args)?;
    let usecase = app.search_usecase(constraint, args.limit);

    let mut rebuild = usecase.subscribe_rebuild();
    let mut status = usecase.subscribe_status();
    let idle = Duration::from_millis(args.idle_timeout_ms);

    let mount = usecase.mount().await;
    tracing::debug!(session_id = %mount.session, labels = mount.labels.len(), "search mounted");

    let mut printed = 0;
    while !usecase.status().is_settled() {
        tokio::select! {
            changed = rebuild.changed() => {
                if changed.is_err() {
                    break;
                }
                if !args.json {
                    printed = print_new_items(&usecase, printed).await;
                }
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::time::sleep(idle) => {
                tracing::warn!(timeout_ms = args.idle_timeout_ms, "backend went quiet; showing partial results");
                break;
            }
        }
    }

    if args.json {
        let items = usecase.current_items().await;
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        print_new_items(&usecase, printed).await;
    }

    let status = usecase.status();
    eprintln!("{}", view::format_status(&status));
    if let SearchStatus::Failed { message, .. } = status {
        bail!("Search failed: {message}");
    }

    Ok(())
}

/// Prints the items past `printed` and returns the new count.
async fn print_new_items(usecase: &SearchUseCase, printed: usize) -> usize {
    let items = usecase.current_items().await;
    for item in items.iter().skip(printed) {
        println!("{}", view::format_clip(item));
    }
    items.len().max(printed)
}
