//! Navigator construction.

use super::error::{LogErrorHandler, NavError, NavErrorHandler};
use super::reconcile::Reconciler;
use super::snapshot::{GestureState, NavSnapshot};
use super::{Navigator, WriterState};
use crate::mutator::MutationError;
use crate::node::{Destination, NavNode, validate};
use crate::result_channel::ResultChannel;
use crate::scope::{
    ContainerBuilder, KeyGenerator, NoContainers, NoScopes, ScopeResolver, SequentialKeys, UuidKeys,
};
use arc_swap::ArcSwap;
use par_nav_config::NavigatorConfig;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;

enum InitialTree<D> {
    Tree(NavNode<D>),
    Destination(D),
}

/// Builder for [`Navigator`]
///
/// ```ignore
/// let navigator = Navigator::builder()
///     .root_destination(Route::new("home"))
///     .scopes(|route: &Route| route.scope())
///     .build()?;
/// ```
pub struct NavigatorBuilder<D> {
    initial: Option<InitialTree<D>>,
    scopes: Box<dyn ScopeResolver<D>>,
    containers: Box<dyn ContainerBuilder<D>>,
    keys: Option<Box<dyn KeyGenerator>>,
    error_handler: Box<dyn NavErrorHandler>,
    config: NavigatorConfig,
    runtime: Option<Handle>,
}

impl<D: Destination> Default for NavigatorBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Destination> NavigatorBuilder<D> {
    pub fn new() -> Self {
        Self {
            initial: None,
            scopes: Box::new(NoScopes),
            containers: Box::new(NoContainers),
            keys: None,
            error_handler: Box::new(LogErrorHandler),
            config: NavigatorConfig::default(),
            runtime: None,
        }
    }

    /// Start from an explicit tree; it must pass validation
    pub fn initial_tree(mut self, root: impl Into<NavNode<D>>) -> Self {
        self.initial = Some(InitialTree::Tree(root.into()));
        self
    }

    /// Start from a single destination.
    ///
    /// A container root becomes the root container; anything else is
    /// wrapped in a root stack.
    pub fn root_destination(mut self, destination: D) -> Self {
        self.initial = Some(InitialTree::Destination(destination));
        self
    }

    pub fn scopes(mut self, scopes: impl ScopeResolver<D> + 'static) -> Self {
        self.scopes = Box::new(scopes);
        self
    }

    pub fn containers(mut self, containers: impl ContainerBuilder<D> + 'static) -> Self {
        self.containers = Box::new(containers);
        self
    }

    /// Override the key generator chosen from the config
    pub fn keys(mut self, keys: impl KeyGenerator + 'static) -> Self {
        self.keys = Some(Box::new(keys));
        self
    }

    pub fn error_handler(mut self, handler: impl NavErrorHandler + 'static) -> Self {
        self.error_handler = Box::new(handler);
        self
    }

    pub fn config(mut self, config: NavigatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Runtime for the reconcile task; defaults to the ambient runtime
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn build(self) -> Result<Navigator<D>, NavError> {
        let Self {
            initial,
            scopes,
            containers,
            keys,
            error_handler,
            config,
            runtime,
        } = self;

        if let Err(err) = config.validate() {
            let err = NavError::InvalidConfig(err.to_string());
            error_handler.handle(&err);
            return Err(err);
        }

        let keys: Box<dyn KeyGenerator> = match keys {
            Some(keys) => keys,
            None if config.use_uuid_keys => Box::new(UuidKeys),
            None => {
                let sequential = SequentialKeys::new(config.key_prefix.clone());
                if let Some(InitialTree::Tree(root)) = &initial {
                    sequential.resume_after(root.keys());
                }
                Box::new(sequential)
            }
        };

        let root = match initial_root(initial, &config, containers.as_ref(), keys.as_ref()) {
            Ok(root) => Arc::new(root),
            Err(err) => {
                error_handler.handle(&err);
                return Err(err);
            }
        };

        let runtime = if config.reconcile_inline {
            None
        } else {
            runtime.or_else(|| Handle::try_current().ok())
        };
        let results = Arc::new(ResultChannel::new());
        let reconciler = Reconciler::new(Arc::clone(&results), runtime);

        let snapshot = Arc::new(NavSnapshot::new(0, root));
        let (snapshot_tx, _) = watch::channel(Arc::clone(&snapshot));
        let (gesture_tx, _) = watch::channel(GestureState::Idle);

        log::info!(
            "Navigator created with {} nodes, active screen {:?}",
            snapshot.root.size(),
            snapshot.current_key
        );

        Ok(Navigator {
            writer: Mutex::new(WriterState {
                reconciler,
                speculation: None,
                disposed: false,
            }),
            published: ArcSwap::new(snapshot),
            snapshot_tx,
            gesture_tx,
            results,
            scopes,
            containers,
            keys,
            error_handler,
            config,
        })
    }
}

fn initial_root<D: Destination>(
    initial: Option<InitialTree<D>>,
    config: &NavigatorConfig,
    containers: &dyn ContainerBuilder<D>,
    keys: &dyn KeyGenerator,
) -> Result<NavNode<D>, NavError> {
    let root = match initial {
        Some(InitialTree::Tree(root)) => root.with_parent_key(None),
        Some(InitialTree::Destination(destination)) if containers.is_container_root(&destination) => {
            containers
                .build_container(&destination, keys)
                .ok_or_else(|| MutationError::MissingContainer {
                    destination: format!("{destination:?}"),
                })?
                .with_parent_key(None)
        }
        Some(InitialTree::Destination(destination)) => NavNode::stack(
            config.root_stack_key.clone(),
            vec![NavNode::screen(keys.next_key(), destination)],
        ),
        None => NavNode::stack(config.root_stack_key.clone(), Vec::new()),
    };
    validate(&root)?;
    Ok(root)
}
