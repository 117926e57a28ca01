//! Script replay through a live [`Navigator`].

use super::script::{GestureEnd, Route, Script, ScriptCommand, resolve_app_link};
use crate::navigator::{
    BackOutcome, NavError, NavSnapshot, Navigator, PopOutcome, RecordingErrorHandler,
};
use crate::node::{NodeRef, validate};
use crate::result_channel::{ResultError, ResultHandle};
use anyhow::{Context, Result};
use par_nav_config::NavigatorConfig;
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::Arc;

/// State after one replayed command
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub step: usize,
    pub command: String,
    pub outcome: String,
    pub failed: bool,
    pub version: u64,
    pub current: Option<String>,
    pub destination: Option<Route>,
    pub can_go_back: bool,
    /// Invariant violation of the published tree, if any
    pub invalid: Option<String>,
    pub tree: NodeRef<Route>,
}

/// Final state of a `for_result` request
#[derive(Debug, Clone, Serialize)]
pub struct ResultRecord {
    pub key: String,
    pub status: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepRecord>,
    pub results: Vec<ResultRecord>,
    /// Errors seen by the navigator's error handler
    pub errors: usize,
}

impl ReplayReport {
    pub fn is_clean(&self) -> bool {
        self.errors == 0 && self.steps.iter().all(|step| step.invalid.is_none())
    }

    pub fn final_step(&self) -> Option<&StepRecord> {
        self.steps.last()
    }

    /// Human-readable outline of every step
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            let _ = writeln!(
                out,
                "[{}] {} -> {} (v{})",
                step.step, step.command, step.outcome, step.version
            );
            let _ = write!(out, "{}", step.tree);
            if let Some(reason) = &step.invalid {
                let _ = writeln!(out, "  !! invalid tree: {reason}");
            }
        }
        if !self.results.is_empty() {
            out.push_str("results:\n");
            for result in &self.results {
                match &result.value {
                    Some(value) => {
                        let _ = writeln!(out, "  {}: {} {:?}", result.key, result.status, value);
                    }
                    None => {
                        let _ = writeln!(out, "  {}: {}", result.key, result.status);
                    }
                }
            }
        }
        let _ = writeln!(out, "errors: {}", self.errors);
        out
    }

    pub fn render_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize replay report")
    }
}

/// Run `script` and record every published snapshot.
///
/// Command failures are recorded and the replay continues; only a
/// navigator that cannot be built fails the whole run.
pub fn replay(script: &Script, config: NavigatorConfig) -> Result<ReplayReport> {
    let mut config = script.config.clone().unwrap_or(config);
    // Results are cancelled in-line so every step observes its own cleanup
    config.reconcile_inline = true;

    let recorder = Arc::new(RecordingErrorHandler::new());
    let mut builder = Navigator::<Route>::builder()
        .scopes(script.scope_table())
        .containers(script.container_table())
        .error_handler(Arc::clone(&recorder))
        .config(config);
    if let Some(root) = &script.root {
        builder = builder.root_destination(root.clone());
    }
    let navigator = builder.build().context("failed to build navigator")?;

    let mut steps = vec![record(0, "start".to_string(), Ok("initial tree".to_string()), &navigator.snapshot())];
    let mut handles = Vec::new();

    for (index, command) in script.commands.iter().enumerate() {
        crate::debug_info!("REPLAY", "Step {}: {}", index + 1, command);
        let outcome = execute(&navigator, command, &mut handles);
        steps.push(record(index + 1, command.to_string(), outcome, &navigator.snapshot()));
    }

    let results = handles.into_iter().map(settle).collect();
    let errors = recorder.errors().len();
    navigator.dispose();

    Ok(ReplayReport {
        steps,
        results,
        errors,
    })
}

fn record(
    step: usize,
    command: String,
    outcome: Result<String, NavError>,
    snapshot: &NavSnapshot<Route>,
) -> StepRecord {
    let (outcome, failed) = match outcome {
        Ok(message) => (message, false),
        Err(err) => (format!("error: {err}"), true),
    };
    StepRecord {
        step,
        command,
        outcome,
        failed,
        version: snapshot.version,
        current: snapshot.current_key.clone(),
        destination: snapshot.current_destination.clone(),
        can_go_back: snapshot.can_go_back,
        invalid: validate(&snapshot.root).err().map(|violation| violation.to_string()),
        tree: Arc::clone(&snapshot.root),
    }
}

fn execute(
    navigator: &Navigator<Route>,
    command: &ScriptCommand,
    handles: &mut Vec<ResultHandle<String>>,
) -> Result<String, NavError> {
    match command {
        ScriptCommand::Navigate(route) => navigator.navigate(route.clone()).map(moved_to),
        ScriptCommand::Back => navigator.navigate_back().map(describe_back),
        ScriptCommand::Pop => navigator.pop().map(describe_pop),
        ScriptCommand::Replace(route) => navigator.navigate_and_replace(route.clone()).map(moved_to),
        ScriptCommand::ClearAll(route) => navigator.navigate_and_clear_all(route.clone()).map(moved_to),
        ScriptCommand::ClearTo {
            route,
            target,
            inclusive,
        } => navigator
            .navigate_and_clear_to(route.clone(), |node| node.destination() == Some(target), *inclusive)
            .map(moved_to),
        ScriptCommand::PushTo { stack, route } => {
            navigator.push_to_stack(stack, route.clone()).map(moved_to)
        }
        ScriptCommand::SwitchTab { tab, index } => {
            navigator.switch_tab(tab.as_deref(), *index).map(moved_to)
        }
        ScriptCommand::Pane {
            pane,
            role,
            route,
            focus,
        } => navigator
            .navigate_to_pane(pane, *role, route.clone(), *focus)
            .map(moved_to),
        ScriptCommand::SwitchPane { pane, role } => {
            navigator.switch_active_pane(pane, *role).map(moved_to)
        }
        ScriptCommand::PopPane { pane, role } => {
            navigator.pop_pane(pane, *role).map(describe_pop)
        }
        ScriptCommand::DeepLink(link) => navigator
            .handle_deep_link_uri(link, &resolve_app_link)
            .map(moved_to),
        ScriptCommand::ForResult(route) => {
            let handle = navigator.navigate_for_result::<String>(route.clone())?;
            let message = format!("awaiting result on '{}'", handle.key());
            handles.push(handle);
            Ok(message)
        }
        ScriptCommand::BackWithResult(value) => navigator
            .navigate_back_with_result(value.clone())
            .map(describe_back),
        ScriptCommand::SpeculativeBack(end) => {
            let gesture = navigator.start_speculative_back()?;
            navigator.update_speculative_back(1.0)?;
            match end {
                GestureEnd::Commit => navigator.commit_speculative_back().map(describe_back),
                GestureEnd::Cancel => navigator
                    .cancel_speculative_back()
                    .map(|()| format!("gesture cancelled ({gesture:?})")),
            }
        }
    }
}

fn moved_to(snapshot: Arc<NavSnapshot<Route>>) -> String {
    match &snapshot.current_destination {
        Some(route) => format!("at {route}"),
        None => "at empty tree".to_string(),
    }
}

fn describe_back(outcome: BackOutcome<Route>) -> String {
    match outcome {
        BackOutcome::Handled(snapshot) => format!("back, {}", moved_to(snapshot)),
        BackOutcome::DelegateToHost => "delegated to host".to_string(),
    }
}

fn describe_pop(outcome: PopOutcome<Route>) -> String {
    match outcome {
        PopOutcome::Popped(snapshot) => format!("popped, {}", moved_to(snapshot)),
        PopOutcome::AlreadyEmpty => "already empty".to_string(),
        PopOutcome::AtRoot => "at root".to_string(),
    }
}

fn settle(mut handle: ResultHandle<String>) -> ResultRecord {
    let key = handle.key().to_string();
    let (status, value) = match handle.try_recv() {
        Ok(Some(value)) => ("delivered", Some(value)),
        Ok(None) => ("pending", None),
        Err(ResultError::Cancelled { .. }) => ("cancelled", None),
        Err(err @ ResultError::TypeMismatch { .. }) => {
            log::warn!("Replay result for '{}' failed: {}", key, err);
            ("type mismatch", None)
        }
    };
    ResultRecord {
        key,
        status: status.to_string(),
        value,
    }
}
