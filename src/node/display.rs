//! Indented outline rendering of a navigation tree.
//!
//! Active children are marked with `*`, idle pane roles with `(idle)`.

use super::nav_node::NavNode;
use std::fmt;

impl<D: fmt::Debug> fmt::Display for NavNode<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self, 0, true, None)
    }
}

fn write_node<D: fmt::Debug>(
    f: &mut fmt::Formatter<'_>,
    node: &NavNode<D>,
    depth: usize,
    active: bool,
    label: Option<String>,
) -> fmt::Result {
    let marker = if active { '*' } else { ' ' };
    let indent = "  ".repeat(depth);
    let label = label.map(|l| format!("{l}: ")).unwrap_or_default();
    let scope = node
        .scope_key()
        .map(|s| format!(" scope={s}"))
        .unwrap_or_default();

    match node {
        NavNode::Screen(screen) => {
            writeln!(f, "{indent}{marker} {label}screen {} {:?}", screen.key, screen.destination)
        }
        NavNode::Stack(stack) => {
            let idle = if stack.children.is_empty() { " (idle)" } else { "" };
            writeln!(f, "{indent}{marker} {label}stack {}{scope}{idle}", stack.key)?;
            let last = stack.children.len().saturating_sub(1);
            for (i, child) in stack.children.iter().enumerate() {
                write_node(f, child, depth + 1, active && i == last, None)?;
            }
            Ok(())
        }
        NavNode::Tab(tab) => {
            writeln!(
                f,
                "{indent}{marker} {label}tab {} active={} home={}{scope}",
                tab.key, tab.active_index, tab.home_index
            )?;
            for (i, branch) in tab.stacks.iter().enumerate() {
                let name = tab
                    .branch_metadata(i)
                    .and_then(|m| m.label.clone())
                    .unwrap_or_else(|| format!("#{i}"));
                write_node(f, branch, depth + 1, active && i == tab.active_index, Some(name))?;
            }
            Ok(())
        }
        NavNode::Pane(pane) => {
            writeln!(
                f,
                "{indent}{marker} {label}pane {} active={} back={:?}{scope}",
                pane.key, pane.active_role, pane.back_behavior
            )?;
            for (role, config) in &pane.configurations {
                write_node(
                    f,
                    &config.content,
                    depth + 1,
                    active && *role == pane.active_role,
                    Some(role.to_string()),
                )?;
            }
            Ok(())
        }
    }
}
