//! Replay script format.
//!
//! A script names its routes with plain strings:
//!
//! ```yaml
//! root: home
//! scopes:
//!   shop: [cart, checkout]
//! containers:
//!   mail:
//!     tabs:
//!       branches: [[inbox], [sent]]
//!   split:
//!     pane:
//!       primary: [list]
//!       back_behavior: pop_latest
//! commands:
//!   - navigate: cart
//!   - back
//!   - switch_tab: { index: 1 }
//!   - speculative_back: commit
//! ```

use crate::node::{
    AdaptStrategy, NavNode, PaneBackBehavior, PaneNode, PaneRole, TabMetadata, TabNode,
};
use crate::scope::{ContainerBuilder, KeyGenerator, ScopeId, ScopeResolver};
use anyhow::{Context, Result};
use par_nav_config::NavigatorConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Destination type of replayed scripts
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route(pub String);

impl Route {
    pub fn new(name: impl Into<String>) -> Self {
        Route(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A parsed replay script
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Script {
    /// Route the navigator starts on; an empty tree when absent
    #[serde(default)]
    pub root: Option<Route>,
    /// Scope id → member routes
    #[serde(default)]
    pub scopes: HashMap<ScopeId, Vec<Route>>,
    /// Route → container built when the route is pushed
    #[serde(default, with = "serde_yaml_ng::with::singleton_map_recursive")]
    pub containers: HashMap<Route, ContainerTemplate>,
    /// Overrides the navigator config file
    #[serde(default)]
    pub config: Option<NavigatorConfig>,
    /// Commands written as `- back` or `- navigate: route`
    #[serde(default, with = "serde_yaml_ng::with::singleton_map_recursive")]
    pub commands: Vec<ScriptCommand>,
}

/// Shape of a container route
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerTemplate {
    Tabs {
        /// Initial routes of every branch
        branches: Vec<Vec<Route>>,
        #[serde(default)]
        home: usize,
        #[serde(default)]
        scope: Option<ScopeId>,
    },
    Pane {
        primary: Vec<Route>,
        #[serde(default)]
        secondary: Vec<Route>,
        #[serde(default)]
        extra: Vec<Route>,
        #[serde(default)]
        back_behavior: PaneBackBehavior,
        #[serde(default)]
        adapt_strategy: AdaptStrategy,
        #[serde(default)]
        scope: Option<ScopeId>,
    },
}

/// Speculative gesture ending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureEnd {
    Commit,
    Cancel,
}

/// One step of a script
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptCommand {
    Navigate(Route),
    Back,
    Pop,
    Replace(Route),
    ClearAll(Route),
    ClearTo {
        route: Route,
        /// Route of the entry to pop back to
        target: Route,
        #[serde(default)]
        inclusive: bool,
    },
    PushTo {
        stack: String,
        route: Route,
    },
    SwitchTab {
        #[serde(default)]
        tab: Option<String>,
        index: usize,
    },
    Pane {
        pane: String,
        role: PaneRole,
        route: Route,
        #[serde(default = "default_focus")]
        focus: bool,
    },
    SwitchPane {
        pane: String,
        role: PaneRole,
    },
    PopPane {
        pane: String,
        role: PaneRole,
    },
    /// `app://<route>` link
    DeepLink(String),
    ForResult(Route),
    BackWithResult(String),
    SpeculativeBack(GestureEnd),
}

fn default_focus() -> bool {
    true
}

impl fmt::Display for ScriptCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptCommand::Navigate(route) => write!(f, "navigate {route}"),
            ScriptCommand::Back => write!(f, "back"),
            ScriptCommand::Pop => write!(f, "pop"),
            ScriptCommand::Replace(route) => write!(f, "replace {route}"),
            ScriptCommand::ClearAll(route) => write!(f, "clear_all {route}"),
            ScriptCommand::ClearTo {
                route,
                target,
                inclusive,
            } => write!(f, "clear_to {target} (inclusive={inclusive}) then {route}"),
            ScriptCommand::PushTo { stack, route } => write!(f, "push {route} to '{stack}'"),
            ScriptCommand::SwitchTab { tab: Some(tab), index } => {
                write!(f, "switch_tab '{tab}' {index}")
            }
            ScriptCommand::SwitchTab { tab: None, index } => write!(f, "switch_tab {index}"),
            ScriptCommand::Pane {
                pane,
                role,
                route,
                focus,
            } => write!(f, "pane '{pane}' {role} {route} (focus={focus})"),
            ScriptCommand::SwitchPane { pane, role } => write!(f, "switch_pane '{pane}' {role}"),
            ScriptCommand::PopPane { pane, role } => write!(f, "pop_pane '{pane}' {role}"),
            ScriptCommand::DeepLink(link) => write!(f, "deep_link {link}"),
            ScriptCommand::ForResult(route) => write!(f, "for_result {route}"),
            ScriptCommand::BackWithResult(value) => write!(f, "back_with_result {value:?}"),
            ScriptCommand::SpeculativeBack(GestureEnd::Commit) => {
                write!(f, "speculative_back commit")
            }
            ScriptCommand::SpeculativeBack(GestureEnd::Cancel) => {
                write!(f, "speculative_back cancel")
            }
        }
    }
}

impl Script {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).context("invalid replay script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        Self::from_yaml(&yaml)
    }

    /// Scope lookup built from the `scopes` table
    pub fn scope_table(&self) -> ScriptScopes {
        let mut by_route = HashMap::new();
        for (scope, routes) in &self.scopes {
            for route in routes {
                by_route.insert(route.clone(), scope.clone());
            }
        }
        ScriptScopes { by_route }
    }

    pub fn container_table(&self) -> ScriptContainers {
        ScriptContainers {
            templates: self.containers.clone(),
        }
    }
}

/// Deep links of the form `app://<route>`
pub fn resolve_app_link(raw: &str) -> Option<Route> {
    raw.strip_prefix("app://")
        .filter(|route| !route.is_empty())
        .map(Route::new)
}

#[derive(Debug, Clone, Default)]
pub struct ScriptScopes {
    by_route: HashMap<Route, ScopeId>,
}

impl ScopeResolver<Route> for ScriptScopes {
    fn scope_of(&self, destination: &Route) -> Option<ScopeId> {
        self.by_route.get(destination).cloned()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScriptContainers {
    templates: HashMap<Route, ContainerTemplate>,
}

impl ContainerBuilder<Route> for ScriptContainers {
    fn is_container_root(&self, destination: &Route) -> bool {
        self.templates.contains_key(destination)
    }

    fn build_container(&self, destination: &Route, keys: &dyn KeyGenerator) -> Option<NavNode<Route>> {
        match self.templates.get(destination)? {
            ContainerTemplate::Tabs {
                branches,
                home,
                scope,
            } => {
                let metadata = branches
                    .iter()
                    .map(|routes| match routes.first() {
                        Some(route) => TabMetadata::new(route.name()),
                        None => TabMetadata::default(),
                    })
                    .collect();
                let mut tab = TabNode::new(
                    keys.next_key(),
                    branches.iter().map(|routes| route_stack(routes, keys)).collect(),
                )
                .with_active_index(*home)
                .with_home_index(*home)
                .with_metadata(metadata);
                tab.scope_key = scope.clone();
                Some(tab.into())
            }
            ContainerTemplate::Pane {
                primary,
                secondary,
                extra,
                back_behavior,
                adapt_strategy,
                scope,
            } => {
                let mut pane = PaneNode::new(keys.next_key(), route_stack(primary, keys))
                    .with_back_behavior(*back_behavior);
                for (role, routes) in [(PaneRole::Secondary, secondary), (PaneRole::Extra, extra)] {
                    if !routes.is_empty() {
                        pane = pane.with_pane(role, route_stack(routes, keys), *adapt_strategy);
                    }
                }
                pane.scope_key = scope.clone();
                Some(pane.into())
            }
        }
    }
}

/// A stack holding one screen per route
fn route_stack(routes: &[Route], keys: &dyn KeyGenerator) -> NavNode<Route> {
    NavNode::stack(
        keys.next_key(),
        routes
            .iter()
            .map(|route| NavNode::screen(keys.next_key(), route.clone()))
            .collect(),
    )
}
