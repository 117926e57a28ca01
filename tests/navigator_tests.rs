//! End-to-end navigation scenarios
//!
//! Each test drives a `Navigator` through the public API only:
//!
//! ## Tabs
//! - Scoped destinations land in the active branch of the `main` tabs
//! - Foreign scopes escape to the root stack
//! - Back off the home branch switches home before leaving the container
//!
//! ## Panes
//! - Secondary content is cleared in one back step, then the pane is left
//!
//! ## Results and gestures
//! - Removing a screen cancels its pending result
//! - An open speculative gesture rejects every other command

mod common;

use common::{Dest, app_navigator, app_navigator_with, container_key, current, test_config};
use par_nav::{BackOutcome, DeliveryOutcome, NavError, PaneRole, ResultError};
use std::sync::Arc;

// ============================================================================
// Tabs
// ============================================================================

#[test]
fn test_login_to_tabs_and_back_out() {
    let (nav, errors) = app_navigator();
    assert_eq!(current(&nav), Some(Dest::Login));
    assert!(!nav.can_go_back());

    nav.navigate(Dest::Main).unwrap();
    assert_eq!(current(&nav), Some(Dest::Feed));

    nav.navigate(Dest::Detail(1)).unwrap();
    assert_eq!(current(&nav), Some(Dest::Detail(1)));
    // Detail is scoped to the tabs, so the root stack is untouched
    assert_eq!(nav.current().as_stack().unwrap().children.len(), 2);

    nav.switch_active_tab(1).unwrap();
    assert_eq!(current(&nav), Some(Dest::Profile));

    assert!(nav.navigate_back().unwrap().is_handled());
    assert_eq!(current(&nav), Some(Dest::Detail(1)), "back from profile returns home");

    nav.navigate_back().unwrap();
    assert_eq!(current(&nav), Some(Dest::Feed));

    nav.navigate_back().unwrap();
    assert_eq!(current(&nav), Some(Dest::Login));

    assert_eq!(nav.navigate_back().unwrap(), BackOutcome::DelegateToHost);
    assert!(errors.is_empty());
}

#[test]
fn test_foreign_scope_escapes_tabs() {
    let (nav, _) = app_navigator();
    nav.navigate(Dest::Main).unwrap();

    nav.navigate(Dest::Checkout).unwrap();
    let root = nav.current();
    let stack = root.as_stack().unwrap();
    assert_eq!(stack.children.len(), 3);
    assert_eq!(stack.children[2].destination(), Some(&Dest::Checkout));

    nav.navigate_back().unwrap();
    assert_eq!(current(&nav), Some(Dest::Feed));
}

#[test]
fn test_unscoped_destination_stays_in_active_branch() {
    let (nav, _) = app_navigator();
    nav.navigate(Dest::Main).unwrap();
    nav.switch_active_tab(1).unwrap();

    nav.navigate(Dest::Settings).unwrap();
    let snapshot = nav.snapshot();
    let tab_key = container_key(&snapshot);
    let tab = snapshot.root.find(&tab_key).unwrap().as_tab().unwrap();
    assert_eq!(tab.stacks[1].as_stack().unwrap().children.len(), 2);
    assert_eq!(tab.stacks[0].as_stack().unwrap().children.len(), 1);
}

#[test]
fn test_untouched_branches_are_shared_between_snapshots() {
    let (nav, _) = app_navigator();
    nav.navigate(Dest::Main).unwrap();
    let before = nav.snapshot();

    nav.navigate(Dest::Detail(7)).unwrap();
    let after = nav.snapshot();

    let tab_key = container_key(&before);
    let old_tab = before.root.find(&tab_key).unwrap().as_tab().unwrap();
    let new_tab = after.root.find(&tab_key).unwrap().as_tab().unwrap();
    assert!(Arc::ptr_eq(&old_tab.stacks[1], &new_tab.stacks[1]));
    assert!(!Arc::ptr_eq(&old_tab.stacks[0], &new_tab.stacks[0]));
}

#[test]
fn test_switch_tab_by_key_and_out_of_range() {
    let (nav, errors) = app_navigator();
    nav.navigate(Dest::Main).unwrap();
    let tab_key = container_key(&nav.snapshot());

    nav.switch_tab(Some(&tab_key), 1).unwrap();
    assert_eq!(current(&nav), Some(Dest::Profile));

    let version = nav.version();
    let err = nav.switch_tab(Some(&tab_key), 5).unwrap_err();
    assert!(matches!(err, NavError::Mutation(_)));
    assert_eq!(nav.version(), version);
    assert_eq!(errors.errors().len(), 1);
}

// ============================================================================
// Panes
// ============================================================================

#[test]
fn test_pane_secondary_then_leave() {
    let (nav, _) = app_navigator();
    nav.navigate(Dest::Mail).unwrap();
    assert_eq!(current(&nav), Some(Dest::Inbox));
    let pane_key = container_key(&nav.snapshot());

    nav.navigate_to_pane(&pane_key, PaneRole::Secondary, Dest::Message(1), true)
        .unwrap();
    nav.navigate_to_pane(&pane_key, PaneRole::Secondary, Dest::Message(2), true)
        .unwrap();
    assert_eq!(current(&nav), Some(Dest::Message(2)));

    // Default behaviour clears the secondary role in one step
    nav.navigate_back().unwrap();
    assert_eq!(current(&nav), Some(Dest::Inbox));

    nav.navigate_back().unwrap();
    assert_eq!(current(&nav), Some(Dest::Login));
}

#[test]
fn test_pane_focus_switching() {
    let (nav, _) = app_navigator();
    nav.navigate(Dest::Mail).unwrap();
    let pane_key = container_key(&nav.snapshot());

    nav.navigate_to_pane(&pane_key, PaneRole::Secondary, Dest::Message(3), false)
        .unwrap();
    assert_eq!(current(&nav), Some(Dest::Inbox));

    nav.switch_active_pane(&pane_key, PaneRole::Secondary).unwrap();
    assert_eq!(current(&nav), Some(Dest::Message(3)));

    let err = nav
        .switch_active_pane(&pane_key, PaneRole::Extra)
        .unwrap_err();
    assert!(matches!(err, NavError::Mutation(_)));
}

// ============================================================================
// Results
// ============================================================================

#[tokio::test]
async fn test_result_round_trip() {
    let (nav, _) = app_navigator();
    let handle = nav.navigate_for_result::<u32>(Dest::Picker).unwrap();
    assert_eq!(current(&nav), Some(Dest::Picker));

    nav.navigate_back_with_result(42u32).unwrap();
    assert_eq!(current(&nav), Some(Dest::Login));
    assert_eq!(handle.recv().await.unwrap(), 42);
}

#[tokio::test]
async fn test_clear_all_cancels_pending_results() {
    let (nav, _) = app_navigator();
    nav.navigate(Dest::Main).unwrap();
    let handle = nav.navigate_for_result::<u32>(Dest::Picker).unwrap();
    let key = handle.key().to_string();

    nav.navigate_and_clear_all(Dest::Login).unwrap();
    assert!(matches!(
        handle.recv().await,
        Err(ResultError::Cancelled { .. })
    ));
    assert_eq!(nav.deliver_result(&key, 1u32), DeliveryOutcome::NoPendingRequest);
}

#[tokio::test]
async fn test_background_reconcile_cancels_results() {
    let config = par_nav::NavigatorConfig {
        reconcile_inline: false,
        ..test_config()
    };
    let (nav, _) = app_navigator_with(config);
    assert!(nav.is_reconciling_in_background());

    let handle = nav.navigate_for_result::<String>(Dest::Picker).unwrap();
    let key = handle.key().to_string();
    nav.navigate_back().unwrap();

    // Doomed at commit time, so a late delivery cannot land
    assert_ne!(
        nav.deliver_result(&key, "late".to_string()),
        DeliveryOutcome::Delivered
    );
    assert!(matches!(
        handle.recv().await,
        Err(ResultError::Cancelled { .. })
    ));
}

// ============================================================================
// Speculative back
// ============================================================================

#[test]
fn test_gesture_blocks_commands_until_committed() {
    let (nav, errors) = app_navigator();
    nav.navigate(Dest::Settings).unwrap();

    let gesture = nav.start_speculative_back().unwrap();
    assert!(gesture.is_active());
    let version = nav.version();

    assert_eq!(nav.navigate(Dest::Picker).unwrap_err(), NavError::GestureInProgress);
    assert_eq!(nav.start_speculative_back().unwrap_err(), NavError::GestureInProgress);
    nav.update_speculative_back(0.6).unwrap();
    assert_eq!(nav.version(), version, "progress never publishes");
    assert_eq!(current(&nav), Some(Dest::Settings));

    assert!(nav.commit_speculative_back().unwrap().is_handled());
    assert_eq!(current(&nav), Some(Dest::Login));
    assert!(!nav.gesture().is_active());

    nav.navigate(Dest::Picker).unwrap();
    assert_eq!(errors.errors().len(), 2);
}

#[test]
fn test_gesture_matches_plain_back() {
    let (speculative, _) = app_navigator();
    let (plain, _) = app_navigator();
    for nav in [&speculative, &plain] {
        nav.navigate(Dest::Main).unwrap();
        nav.switch_active_tab(1).unwrap();
    }

    speculative.start_speculative_back().unwrap();
    speculative.commit_speculative_back().unwrap();
    plain.navigate_back().unwrap();

    assert_eq!(speculative.current(), plain.current());
    assert_eq!(speculative.version(), plain.version());
}

// ============================================================================
// Observation
// ============================================================================

#[tokio::test]
async fn test_subscribers_see_every_commit() {
    let (nav, _) = app_navigator();
    let mut rx = nav.subscribe();
    assert_eq!(rx.borrow_and_update().version, 0);

    nav.navigate(Dest::Settings).unwrap();
    rx.changed().await.unwrap();
    let snapshot = rx.borrow_and_update().clone();
    assert_eq!(snapshot.version, 1);
    assert_eq!(snapshot.current_destination, Some(Dest::Settings));
    assert!(snapshot.can_go_back);

    // No-op switch publishes nothing
    nav.navigate(Dest::Main).unwrap();
    rx.changed().await.unwrap();
    rx.mark_unchanged();
    nav.switch_active_tab(0).unwrap();
    assert!(!rx.has_changed().unwrap());
}

#[test]
fn test_concurrent_readers_see_monotonic_versions() {
    let (nav, _) = app_navigator();
    std::thread::scope(|scope| {
        let reader = scope.spawn(|| {
            let mut last = 0;
            for _ in 0..2_000 {
                let snapshot = nav.snapshot();
                assert!(snapshot.version >= last);
                assert_eq!(
                    snapshot.current_key,
                    snapshot.root.active_leaf().map(|leaf| leaf.key().to_string())
                );
                last = snapshot.version;
            }
        });
        for i in 0..200 {
            nav.navigate(Dest::Detail(i)).unwrap();
            if i % 3 == 0 {
                nav.navigate_back().unwrap();
            }
        }
        reader.join().unwrap();
    });
    assert!(nav.version() > 200);
}

#[test]
fn test_dispose_rejects_commands() {
    let (nav, _) = app_navigator();
    nav.dispose();
    assert!(nav.is_disposed());
    assert_eq!(nav.navigate(Dest::Settings).unwrap_err(), NavError::Disposed);
    assert_eq!(current(&nav), Some(Dest::Login));
}
