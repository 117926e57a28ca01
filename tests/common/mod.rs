//! Shared integration test helpers for par-nav.
//!
//! Provides a small sample application: a login screen, a `Main` tab
//! container (feed and profile branches), a `Mail` pane container and a few
//! scoped leaf destinations.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::{Dest, app_navigator};
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a subset
//! of helpers are used per file.

#![allow(dead_code)]

use par_nav::{
    ContainerBuilder, KeyGenerator, NavNode, NavSnapshot, Navigator, NavigatorConfig,
    RecordingErrorHandler, ScopeId,
};
use par_nav::node::{PaneNode, TabMetadata, TabNode};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dest {
    Login,
    /// Tab container: feed and profile branches, scope `main`
    Main,
    Feed,
    Profile,
    Detail(u32),
    Settings,
    /// Scope nothing on screen declares; always escapes to the root stack
    Checkout,
    /// Pane container, scope `mail`
    Mail,
    Inbox,
    Message(u32),
    Picker,
}

pub fn scope_of(dest: &Dest) -> Option<ScopeId> {
    match dest {
        Dest::Feed | Dest::Profile | Dest::Detail(_) => Some("main".to_string()),
        Dest::Inbox | Dest::Message(_) => Some("mail".to_string()),
        Dest::Checkout => Some("checkout".to_string()),
        _ => None,
    }
}

pub struct AppContainers;

impl ContainerBuilder<Dest> for AppContainers {
    fn is_container_root(&self, destination: &Dest) -> bool {
        matches!(destination, Dest::Main | Dest::Mail)
    }

    fn build_container(&self, destination: &Dest, keys: &dyn KeyGenerator) -> Option<NavNode<Dest>> {
        let branch = |dest: Dest| NavNode::stack(keys.next_key(), vec![NavNode::screen(keys.next_key(), dest)]);
        match destination {
            Dest::Main => Some(
                TabNode::new(keys.next_key(), vec![branch(Dest::Feed), branch(Dest::Profile)])
                    .with_metadata(vec![TabMetadata::new("Feed"), TabMetadata::new("Profile")])
                    .with_scope("main")
                    .into(),
            ),
            Dest::Mail => Some(
                PaneNode::new(keys.next_key(), branch(Dest::Inbox))
                    .with_scope("mail")
                    .into(),
            ),
            _ => None,
        }
    }
}

/// Deterministic keys and in-line result cancellation
pub fn test_config() -> NavigatorConfig {
    NavigatorConfig {
        use_uuid_keys: false,
        key_prefix: "n".to_string(),
        reconcile_inline: true,
        ..NavigatorConfig::default()
    }
}

/// Navigator on the login screen with the sample scopes and containers
pub fn app_navigator() -> (Navigator<Dest>, Arc<RecordingErrorHandler>) {
    app_navigator_with(test_config())
}

pub fn app_navigator_with(config: NavigatorConfig) -> (Navigator<Dest>, Arc<RecordingErrorHandler>) {
    let errors = Arc::new(RecordingErrorHandler::new());
    let navigator = Navigator::builder()
        .root_destination(Dest::Login)
        .scopes(scope_of)
        .containers(AppContainers)
        .error_handler(Arc::clone(&errors))
        .config(config)
        .build()
        .expect("Failed to build navigator");
    (navigator, errors)
}

pub fn current(navigator: &Navigator<Dest>) -> Option<Dest> {
    navigator.current_destination()
}

/// Key of the outermost container pushed onto the root stack
pub fn container_key(snapshot: &NavSnapshot<Dest>) -> String {
    snapshot
        .root
        .as_stack()
        .and_then(|root| root.children.iter().find(|child| !child.is_screen()))
        .map(|child| child.key().to_string())
        .expect("no container on the root stack")
}
