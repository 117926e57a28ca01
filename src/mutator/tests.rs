//! Tests for the tree mutator.

use super::*;
use crate::node::{NavNode, PaneBackBehavior, PaneNode, TabNode, validate};
use crate::scope::{ContainerBuilder, KeyGenerator, NoContainers, NoScopes, SequentialKeys};
use std::sync::Arc;

type Tree = NodeRef<&'static str>;

fn tabbed_tree() -> Tree {
    let tabs = TabNode::new(
        "tabs",
        vec![
            NavNode::stack("feed", vec![NavNode::screen("feed-home", "Feed")]),
            NavNode::stack("profile", vec![NavNode::screen("profile-home", "Profile")]),
        ],
    )
    .with_scope("main");
    Arc::new(NavNode::stack(
        "root",
        vec![NavNode::screen("login", "Login"), tabs.into()],
    ))
}

fn pane_tree(behavior: PaneBackBehavior) -> Tree {
    let pane = PaneNode::new(
        "split",
        NavNode::stack("list", vec![NavNode::screen("list-1", "List")]),
    )
    .with_back_behavior(behavior);
    Arc::new(NavNode::stack("root", vec![pane.into()]))
}

fn leaf(tree: &Tree) -> &'static str {
    tree.active_leaf()
        .and_then(|leaf| leaf.destination())
        .copied()
        .unwrap_or("<none>")
}

fn handled(result: BackResult<&'static str>) -> Tree {
    match result {
        BackResult::Handled(tree) => tree,
        other => panic!("expected Handled, got {other:?}"),
    }
}

fn popped(result: Result<PopResult<&'static str>, MutationError>) -> Tree {
    match result {
        Ok(PopResult::Popped(tree)) => tree,
        other => panic!("expected Popped, got {other:?}"),
    }
}

/// Destinations named `Tabs` expand into a two-branch tab container;
/// `Broken` is declared a container root but never built; `Clash` reuses a
/// key that already exists in the sample trees.
struct TestContainers;

impl ContainerBuilder<&'static str> for TestContainers {
    fn is_container_root(&self, destination: &&'static str) -> bool {
        matches!(*destination, "Tabs" | "Broken" | "Clash")
    }

    fn build_container(
        &self,
        destination: &&'static str,
        keys: &dyn KeyGenerator,
    ) -> Option<NavNode<&'static str>> {
        match *destination {
            "Tabs" => Some(
                TabNode::new(
                    keys.next_key(),
                    vec![
                        NavNode::stack(keys.next_key(), vec![NavNode::screen(keys.next_key(), "Inbox")]),
                        NavNode::stack(keys.next_key(), vec![NavNode::screen(keys.next_key(), "Sent")]),
                    ],
                )
                .into(),
            ),
            "Clash" => Some(NavNode::stack(
                keys.next_key(),
                vec![NavNode::screen("login", "Login")],
            )),
            _ => None,
        }
    }
}

// ========================================================================
// Push
// ========================================================================

#[test]
fn test_push_lands_in_innermost_stack_and_shares_siblings() {
    let keys = SequentialKeys::new("k");
    let ctx = PushContext::new(&NoScopes, &NoContainers, &keys);
    let tree = tabbed_tree();

    let next = push(&tree, "Post", &ctx).unwrap();
    assert_eq!(leaf(&next), "Post");
    assert_eq!(next.find("k-1").unwrap().parent_key(), Some("feed"));
    assert!(validate(&next).is_ok());

    // Untouched subtrees keep their allocation
    let old_root = tree.as_stack().unwrap();
    let new_root = next.as_stack().unwrap();
    assert!(Arc::ptr_eq(&old_root.children[0], &new_root.children[0]));
    let old_tabs = old_root.children[1].as_tab().unwrap();
    let new_tabs = new_root.children[1].as_tab().unwrap();
    assert!(Arc::ptr_eq(&old_tabs.stacks[1], &new_tabs.stacks[1]));
    assert!(!Arc::ptr_eq(&old_tabs.stacks[0], &new_tabs.stacks[0]));

    // The input snapshot is unchanged
    assert_eq!(leaf(&tree), "Feed");
}

#[test]
fn test_push_escapes_foreign_scope() {
    let keys = SequentialKeys::new("k");
    let scopes = |d: &&'static str| match *d {
        "Comment" => Some("main".to_string()),
        "Checkout" => Some("shop".to_string()),
        _ => None,
    };
    let ctx = PushContext::new(&scopes, &NoContainers, &keys);
    let tree = tabbed_tree();

    // Branch stacks inherit the tab's scope
    let inside = push(&tree, "Comment", &ctx).unwrap();
    assert_eq!(inside.find("k-1").unwrap().parent_key(), Some("feed"));

    // No stack on the active path belongs to "shop": fall back to the root
    let escaped = push(&tree, "Checkout", &ctx).unwrap();
    assert_eq!(escaped.find("k-2").unwrap().parent_key(), Some("root"));
    assert_eq!(leaf(&escaped), "Checkout");
    assert!(validate(&escaped).is_ok());
}

#[test]
fn test_push_then_pop_restores_tree() {
    let keys = SequentialKeys::new("k");
    let ctx = PushContext::new(&NoScopes, &NoContainers, &keys);
    let tree = tabbed_tree();

    let pushed = push(&tree, "Post", &ctx).unwrap();
    let restored = popped(pop(&pushed, PopPolicy::RemoveEmptyStacks));
    assert_eq!(restored, tree);
    assert!(Arc::ptr_eq(
        &restored.as_stack().unwrap().children[0],
        &tree.as_stack().unwrap().children[0]
    ));
}

#[test]
fn test_push_to_stack_targets_explicit_stack() {
    let keys = SequentialKeys::new("k");
    let ctx = PushContext::new(&NoScopes, &NoContainers, &keys);
    let tree = tabbed_tree();

    let next = push_to_stack(&tree, "profile", "Settings", &ctx).unwrap();
    assert_eq!(next.find("k-1").unwrap().parent_key(), Some("profile"));
    // Active branch is still the feed
    assert_eq!(leaf(&next), "Feed");

    assert_eq!(
        push_to_stack(&tree, "missing", "X", &ctx),
        Err(MutationError::KeyNotFound("missing".to_string()))
    );
    assert!(matches!(
        push_to_stack(&tree, "tabs", "X", &ctx),
        Err(MutationError::WrongKind { expected: NodeKind::Stack, found: NodeKind::Tab, .. })
    ));
}

#[test]
fn test_replace_and_clear() {
    let keys = SequentialKeys::new("k");
    let ctx = PushContext::new(&NoScopes, &NoContainers, &keys);
    let tree = tabbed_tree();

    let replaced = replace_current(&tree, "Trending", &ctx).unwrap();
    assert_eq!(leaf(&replaced), "Trending");
    assert!(!replaced.contains_key("feed-home"));
    assert_eq!(replaced.size(), tree.size());

    let cleared = clear_and_push(&tree, "Welcome", &ctx).unwrap();
    assert_eq!(cleared.as_stack().unwrap().children.len(), 1);
    assert_eq!(leaf(&cleared), "Welcome");
    assert!(!cleared.can_go_back());

    let empty: Tree = Arc::new(NavNode::stack("root", vec![]));
    assert_eq!(replace_current(&empty, "X", &ctx), Err(MutationError::EmptyTree));
    let fresh = clear_and_push(&empty, "Start", &ctx).unwrap();
    assert_eq!(leaf(&fresh), "Start");
}

#[test]
fn test_container_push() {
    let keys = SequentialKeys::new("k");
    let ctx = PushContext::new(&NoScopes, &TestContainers, &keys);
    let tree: Tree = Arc::new(NavNode::stack("root", vec![NavNode::screen("login", "Login")]));

    let next = push(&tree, "Tabs", &ctx).unwrap();
    assert!(validate(&next).is_ok());
    assert_eq!(leaf(&next), "Inbox");
    let tab = next.as_stack().unwrap().children[1].as_tab().unwrap();
    assert_eq!(tab.parent_key.as_deref(), Some("root"));

    let missing = push(&tree, "Broken", &ctx).unwrap_err();
    assert!(matches!(missing, MutationError::MissingContainer { .. }));
    assert!(missing.is_configuration_error());

    let clash = push(&tree, "Clash", &ctx).unwrap_err();
    assert!(matches!(clash, MutationError::InvalidContainer { .. }));
}

// ========================================================================
// Pop
// ========================================================================

#[test]
fn test_pop_outcomes_at_the_edges() {
    let single: Tree = Arc::new(NavNode::stack("root", vec![NavNode::screen("a", "A")]));
    assert_eq!(pop(&single, PopPolicy::RemoveEmptyStacks), Ok(PopResult::AtRoot));
    assert_eq!(pop(&single, PopPolicy::PreserveEmptyStacks), Ok(PopResult::AtRoot));

    let empty: Tree = Arc::new(NavNode::stack("root", vec![]));
    assert_eq!(pop(&empty, PopPolicy::RemoveEmptyStacks), Ok(PopResult::AlreadyEmpty));
}

#[test]
fn test_pop_collapses_tab_then_removes_it() {
    let tree = switch_tab(&tabbed_tree(), "tabs", 1).unwrap();
    assert_eq!(leaf(&tree), "Profile");

    // Single-entry branch: the tab goes home instead of emptying the branch
    let home = popped(pop(&tree, PopPolicy::RemoveEmptyStacks));
    assert_eq!(leaf(&home), "Feed");
    assert!(home.contains_key("profile-home"));

    // Already home: the whole tab leaves the root stack
    let out = popped(pop(&home, PopPolicy::RemoveEmptyStacks));
    assert_eq!(leaf(&out), "Login");
    assert!(!out.contains_key("tabs"));
    assert!(validate(&out).is_ok());
}

#[test]
fn test_preserve_policy_only_pops_leaf_stack() {
    let tree = switch_tab(&tabbed_tree(), "tabs", 1).unwrap();
    assert_eq!(pop(&tree, PopPolicy::PreserveEmptyStacks), Ok(PopResult::AtRoot));

    let keys = SequentialKeys::new("k");
    let ctx = PushContext::new(&NoScopes, &NoContainers, &keys);
    let deeper = push(&tree, "Settings", &ctx).unwrap();
    let back = popped(pop(&deeper, PopPolicy::PreserveEmptyStacks));
    assert_eq!(leaf(&back), "Profile");
}

#[test]
fn test_pop_to() {
    let keys = SequentialKeys::new("k");
    let ctx = PushContext::new(&NoScopes, &NoContainers, &keys);
    let mut tree: Tree = Arc::new(NavNode::stack("root", vec![NavNode::screen("a", "A")]));
    for dest in ["B", "C", "D"] {
        tree = push(&tree, dest, &ctx).unwrap();
    }
    let is_b = |node: &NavNode<&'static str>| node.destination() == Some(&"B");

    let exclusive = pop_to(&tree, is_b, false, 16).unwrap();
    assert_eq!(leaf(&exclusive), "B");
    assert_eq!(exclusive.size(), 3);

    let inclusive = pop_to(&tree, is_b, true, 16).unwrap();
    assert_eq!(leaf(&inclusive), "A");

    let at_match = pop_to(&tree, |node| node.destination() == Some(&"D"), false, 16).unwrap();
    assert!(Arc::ptr_eq(&at_match, &tree));

    assert_eq!(
        pop_to(&tree, |node| node.destination() == Some(&"Z"), false, 16),
        Err(MutationError::NoMatch)
    );
    assert_eq!(pop_to(&tree, is_b, false, 1), Err(MutationError::NoMatch));
}

// ========================================================================
// Tabs
// ========================================================================

#[test]
fn test_switch_tab() {
    let tree = tabbed_tree();

    let same = switch_tab(&tree, "tabs", 0).unwrap();
    assert!(Arc::ptr_eq(&same, &tree));

    let switched = switch_active_tab(&tree, 1).unwrap();
    assert_eq!(leaf(&switched), "Profile");
    let old_tabs = tree.find("tabs").unwrap().as_tab().unwrap();
    let new_tabs = switched.find("tabs").unwrap().as_tab().unwrap();
    assert!(Arc::ptr_eq(&old_tabs.stacks[0], &new_tabs.stacks[0]));

    assert_eq!(
        switch_tab(&tree, "tabs", 2),
        Err(MutationError::TabIndexOutOfRange {
            key: "tabs".to_string(),
            index: 2,
            len: 2
        })
    );

    let no_tabs: Tree = Arc::new(NavNode::stack("root", vec![NavNode::screen("a", "A")]));
    assert_eq!(switch_active_tab(&no_tabs, 0), Err(MutationError::NoTab));
}

// ========================================================================
// Back
// ========================================================================

#[test]
fn test_back_pops_stack_then_delegates() {
    let keys = SequentialKeys::new("k");
    let ctx = PushContext::new(&NoScopes, &NoContainers, &keys);
    let tree: Tree = Arc::new(NavNode::stack("root", vec![NavNode::screen("a", "A")]));

    let pushed = push(&tree, "B", &ctx).unwrap();
    assert!(pushed.can_go_back());

    let back = handled(resolve_back(&pushed));
    assert_eq!(leaf(&back), "A");
    assert!(!back.can_go_back());
    assert_eq!(resolve_back(&back), BackResult::DelegateToHost);
}

#[test]
fn test_back_returns_to_home_tab_before_popping_outer_stack() {
    let keys = SequentialKeys::new("k");
    let ctx = PushContext::new(&NoScopes, &NoContainers, &keys);
    let tree = switch_tab(&tabbed_tree(), "tabs", 1).unwrap();
    let tree = push(&tree, "Settings", &ctx).unwrap();

    // Innermost first: the profile branch pops before the tab moves
    let step1 = handled(resolve_back(&tree));
    assert_eq!(leaf(&step1), "Profile");

    let step2 = handled(resolve_back(&step1));
    assert_eq!(leaf(&step2), "Feed");
    assert!(step2.contains_key("tabs"));

    let step3 = handled(resolve_back(&step2));
    assert_eq!(leaf(&step3), "Login");

    assert_eq!(resolve_back(&step3), BackResult::DelegateToHost);
}

#[test]
fn test_back_on_empty_tree_cannot_handle() {
    let empty: Tree = Arc::new(NavNode::stack("root", vec![]));
    assert_eq!(
        resolve_back(&empty),
        BackResult::CannotHandle(MutationError::EmptyTree)
    );
}

// ========================================================================
// Panes
// ========================================================================

#[test]
fn test_pane_layout_change_idles_secondary() {
    let keys = SequentialKeys::new("k");
    let ctx = PushContext::new(&NoScopes, &NoContainers, &keys);
    let tree = pane_tree(PaneBackBehavior::PopUntilLayoutChange);

    let opened = navigate_to_pane(&tree, "split", PaneRole::Secondary, "Detail", true, &ctx).unwrap();
    let opened = navigate_to_pane(&opened, "split", PaneRole::Secondary, "More", true, &ctx).unwrap();
    assert_eq!(leaf(&opened), "More");
    assert!(validate(&opened).is_ok());

    let back = handled(resolve_back(&opened));
    let pane = back.find("split").unwrap().as_pane().unwrap();
    assert_eq!(pane.active_role, PaneRole::Primary);
    assert!(pane.configurations[&PaneRole::Secondary].is_idle());
    assert_eq!(leaf(&back), "List");
    assert!(validate(&back).is_ok());

    assert_eq!(resolve_back(&back), BackResult::DelegateToHost);
}

#[test]
fn test_pane_pop_latest_steps_one_entry() {
    let keys = SequentialKeys::new("k");
    let ctx = PushContext::new(&NoScopes, &NoContainers, &keys);
    let tree = pane_tree(PaneBackBehavior::PopLatest);
    let tree = navigate_to_pane(&tree, "split", PaneRole::Secondary, "Detail", true, &ctx).unwrap();
    let tree = navigate_to_pane(&tree, "split", PaneRole::Secondary, "More", true, &ctx).unwrap();

    let step1 = handled(resolve_back(&tree));
    assert_eq!(leaf(&step1), "Detail");

    let step2 = handled(resolve_back(&step1));
    assert_eq!(leaf(&step2), "List");
    let pane = step2.find("split").unwrap().as_pane().unwrap();
    assert_eq!(pane.visible_roles(), vec![PaneRole::Primary]);
}

#[test]
fn test_pane_content_change_skips_duplicates() {
    let keys = SequentialKeys::new("k");
    let ctx = PushContext::new(&NoScopes, &NoContainers, &keys);
    let mut tree = pane_tree(PaneBackBehavior::PopUntilContentChange);
    for dest in ["A", "B", "B", "B"] {
        tree = navigate_to_pane(&tree, "split", PaneRole::Secondary, dest, true, &ctx).unwrap();
    }

    let back = handled(resolve_back(&tree));
    assert_eq!(leaf(&back), "A");

    // Nothing different left in the role: it idles
    let idle = handled(resolve_back(&back));
    assert_eq!(leaf(&idle), "List");
}

#[test]
fn test_switch_and_pop_pane() {
    let keys = SequentialKeys::new("k");
    let ctx = PushContext::new(&NoScopes, &NoContainers, &keys);
    let tree = pane_tree(PaneBackBehavior::PopLatest);

    assert_eq!(
        switch_active_pane(&tree, "split", PaneRole::Extra),
        Err(MutationError::PaneRoleMissing {
            key: "split".to_string(),
            role: PaneRole::Extra
        })
    );
    assert_eq!(pop_pane(&tree, "split", PaneRole::Primary), Ok(PopResult::AtRoot));

    // Opened without focus: the primary stays active
    let opened = navigate_to_pane(&tree, "split", PaneRole::Secondary, "Detail", false, &ctx).unwrap();
    assert_eq!(leaf(&opened), "List");
    let focused = switch_active_pane(&opened, "split", PaneRole::Secondary).unwrap();
    assert_eq!(leaf(&focused), "Detail");
    let same = switch_active_pane(&focused, "split", PaneRole::Secondary).unwrap();
    assert!(Arc::ptr_eq(&same, &focused));

    let idled = popped(pop_pane(&focused, "split", PaneRole::Secondary));
    assert_eq!(leaf(&idled), "List");
    assert_eq!(
        pop_pane(&idled, "split", PaneRole::Secondary),
        Ok(PopResult::AlreadyEmpty)
    );
    assert_eq!(
        switch_active_pane(&idled, "split", PaneRole::Secondary),
        Err(MutationError::PaneRoleIdle {
            key: "split".to_string(),
            role: PaneRole::Secondary
        })
    );

    // Reviving an idle role reuses its placeholder stack
    let revived = navigate_to_pane(&idled, "split", PaneRole::Secondary, "Again", true, &ctx).unwrap();
    assert_eq!(leaf(&revived), "Again");
    assert!(validate(&revived).is_ok());
}

#[test]
fn test_pop_idles_focused_secondary_role() {
    let keys = SequentialKeys::new("k");
    let ctx = PushContext::new(&NoScopes, &NoContainers, &keys);
    let tree = pane_tree(PaneBackBehavior::PopLatest);
    let tree = navigate_to_pane(&tree, "split", PaneRole::Secondary, "Detail", true, &ctx).unwrap();

    let out = popped(pop(&tree, PopPolicy::RemoveEmptyStacks));
    assert_eq!(leaf(&out), "List");
    assert!(validate(&out).is_ok());
}

// ========================================================================
// Generated keys
// ========================================================================

/// Always hands out the same key
struct FixedKeys;

impl KeyGenerator for FixedKeys {
    fn next_key(&self) -> String {
        "list-1".to_string()
    }
}

#[test]
fn test_generated_keys_skip_existing_nodes() {
    let keys = SequentialKeys::new("k");
    let ctx = PushContext::new(&NoScopes, &NoContainers, &keys);
    let pane = PaneNode::new("split", NavNode::stack("k-1", vec![NavNode::screen("k-2", "List")]));
    let tree: Tree = Arc::new(NavNode::stack("root", vec![pane.into()]));

    let pushed = push(&tree, "Detail", &ctx).unwrap();
    assert!(validate(&pushed).is_ok());
    assert_eq!(pushed.find("k-3").unwrap().destination(), Some(&"Detail"));

    let opened = navigate_to_pane(&pushed, "split", PaneRole::Secondary, "Side", true, &ctx).unwrap();
    assert!(validate(&opened).is_ok());
    let secondary = opened.find("k-4").unwrap();
    assert!(secondary.as_stack().is_some());
    assert_eq!(secondary.parent_key(), Some("split"));
}

#[test]
fn test_exhausted_key_generator_is_an_error() {
    let ctx = PushContext::new(&NoScopes, &NoContainers, &FixedKeys);
    let tree = pane_tree(PaneBackBehavior::PopLatest);

    let err = push(&tree, "Detail", &ctx).unwrap_err();
    assert_eq!(err, MutationError::KeyCollision("list-1".to_string()));
    assert!(err.is_configuration_error());

    let err = navigate_to_pane(&tree, "split", PaneRole::Secondary, "Side", true, &ctx).unwrap_err();
    assert!(matches!(err, MutationError::KeyCollision(_)));
}
