//! Bottleneck detection.
//!
//! Runs before any optimization strategy, independent of the chosen
//! algorithm: resource overloads, coincident critical deadlines,
//! circular dependencies, and budget-cap excess. Each bottleneck
//! carries an impact tier and a resolution cost estimate that feeds the
//! optimization metrics.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::{Criticality, DependencyEdge, Resource, ScheduleItem};

/// Structural constraint classes limiting schedule feasibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BottleneckKind {
    /// A resource carries more items than its capacity.
    Resource,
    /// Several at-risk items share the same deadline.
    Date,
    /// The dependency graph contains a cycle.
    Dependency,
    /// The scheduled amounts exceed the budget cap.
    Budget,
}

/// A detected structural constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bottleneck {
    /// Constraint class.
    pub kind: BottleneckKind,
    /// Human-readable description.
    pub description: String,
    /// How hard the constraint binds.
    pub impact: Criticality,
    /// Items caught in the constraint.
    pub affected_item_ids: Vec<String>,
    /// Suggested ways out.
    pub proposed_fixes: Vec<String>,
    /// Rough cost of resolving it (same currency unit as amounts).
    pub estimated_resolution_cost: f64,
}

/// Overload ratio above which a resource bottleneck is critical.
const CRITICAL_OVERLOAD_RATIO: f64 = 1.5;
/// Coincident at-risk deadlines above which a date bottleneck is critical.
const CRITICAL_COINCIDENT_DATES: usize = 3;

/// Detects every bottleneck class over the given inputs.
pub fn detect_bottlenecks(
    items: &[ScheduleItem],
    resources: &[Resource],
    assignment: &HashMap<String, String>,
    dependencies: &[DependencyEdge],
    budget_cap: Option<f64>,
) -> Vec<Bottleneck> {
    let mut bottlenecks = Vec::new();
    detect_resource_overloads(items, resources, assignment, &mut bottlenecks);
    detect_coincident_dates(items, &mut bottlenecks);
    detect_dependency_cycles(dependencies, &mut bottlenecks);
    detect_budget_excess(items, budget_cap, &mut bottlenecks);
    bottlenecks
}

fn detect_resource_overloads(
    items: &[ScheduleItem],
    resources: &[Resource],
    assignment: &HashMap<String, String>,
    out: &mut Vec<Bottleneck>,
) {
    for resource in resources {
        let assigned: Vec<String> = items
            .iter()
            .filter(|i| assignment.get(&i.id).map(String::as_str) == Some(resource.id.as_str()))
            .map(|i| i.id.clone())
            .collect();
        let capacity = resource.max_capacity as usize;
        if assigned.len() <= capacity {
            continue;
        }

        let ratio = assigned.len() as f64 / capacity.max(1) as f64;
        let impact = if capacity == 0 || ratio > CRITICAL_OVERLOAD_RATIO {
            Criticality::Critical
        } else {
            Criticality::High
        };
        let excess = assigned.len() - capacity;

        out.push(Bottleneck {
            kind: BottleneckKind::Resource,
            description: format!(
                "{} carries {} items against a capacity of {}",
                resource.id,
                assigned.len(),
                resource.max_capacity
            ),
            impact,
            affected_item_ids: assigned,
            proposed_fixes: vec![
                format!("Raise the capacity of {}", resource.id),
                "Move items to a less loaded resource".to_string(),
            ],
            estimated_resolution_cost: excess as f64 * 500.0,
        });
    }
}

fn detect_coincident_dates(items: &[ScheduleItem], out: &mut Vec<Bottleneck>) {
    let mut by_end: HashMap<chrono::NaiveDate, Vec<&ScheduleItem>> = HashMap::new();
    for item in items {
        if item.criticality >= Criticality::High {
            by_end.entry(item.end).or_default().push(item);
        }
    }

    let mut dates: Vec<_> = by_end.into_iter().filter(|(_, v)| v.len() >= 2).collect();
    dates.sort_by_key(|(date, _)| *date);

    for (date, group) in dates {
        let impact = if group.len() > CRITICAL_COINCIDENT_DATES {
            Criticality::Critical
        } else {
            Criticality::High
        };
        out.push(Bottleneck {
            kind: BottleneckKind::Date,
            description: format!("{} at-risk items are all due on {}", group.len(), date),
            impact,
            affected_item_ids: group.iter().map(|i| i.id.clone()).collect(),
            proposed_fixes: vec![
                "Stagger the required dates".to_string(),
                "Expedite part of the group ahead of the shared deadline".to_string(),
            ],
            estimated_resolution_cost: group.len() as f64 * 250.0,
        });
    }
}

/// DFS cycle detection over the dependency edges.
///
/// Reports one bottleneck per distinct cycle found, listing the items on
/// the cycle path.
fn detect_dependency_cycles(dependencies: &[DependencyEdge], out: &mut Vec<Bottleneck>) {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut nodes: Vec<&str> = Vec::new();
    let mut seen_nodes: HashSet<&str> = HashSet::new();

    for edge in dependencies {
        adjacency
            .entry(edge.from.as_str())
            .or_default()
            .push(edge.to.as_str());
        for node in [edge.from.as_str(), edge.to.as_str()] {
            if seen_nodes.insert(node) {
                nodes.push(node);
            }
        }
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut reported: HashSet<Vec<String>> = HashSet::new();

    for &node in &nodes {
        if visited.contains(node) {
            continue;
        }
        let mut stack: Vec<&str> = Vec::new();
        if let Some(cycle) = cycle_dfs(node, &adjacency, &mut visited, &mut stack) {
            let mut normalized = cycle.clone();
            normalized.sort();
            if reported.insert(normalized) {
                out.push(Bottleneck {
                    kind: BottleneckKind::Dependency,
                    description: format!("Circular dependency: {}", cycle.join(" -> ")),
                    impact: Criticality::Critical,
                    affected_item_ids: cycle,
                    proposed_fixes: vec![
                        "Remove one edge to break the cycle".to_string(),
                        "Split an item so its parts can be ordered independently".to_string(),
                    ],
                    estimated_resolution_cost: 1000.0,
                });
            }
        }
    }
}

fn cycle_dfs<'a>(
    node: &'a str,
    adjacency: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    stack: &mut Vec<&'a str>,
) -> Option<Vec<String>> {
    visited.insert(node);
    stack.push(node);

    if let Some(neighbors) = adjacency.get(node) {
        for &next in neighbors {
            if let Some(position) = stack.iter().position(|&n| n == next) {
                // Back edge: the cycle is the stack suffix from `next`.
                return Some(stack[position..].iter().map(|s| s.to_string()).collect());
            }
            if !visited.contains(next) {
                if let Some(cycle) = cycle_dfs(next, adjacency, visited, stack) {
                    return Some(cycle);
                }
            }
        }
    }

    stack.pop();
    None
}

fn detect_budget_excess(items: &[ScheduleItem], budget_cap: Option<f64>, out: &mut Vec<Bottleneck>) {
    let Some(cap) = budget_cap else { return };
    let total: f64 = items.iter().map(|i| i.amount).sum();
    if total <= cap {
        return;
    }

    let impact = if cap <= 0.0 || total > cap * CRITICAL_OVERLOAD_RATIO {
        Criticality::Critical
    } else {
        Criticality::High
    };
    out.push(Bottleneck {
        kind: BottleneckKind::Budget,
        description: format!("Scheduled amounts total {total:.2} against a cap of {cap:.2}"),
        impact,
        affected_item_ids: items.iter().map(|i| i.id.clone()).collect(),
        proposed_fixes: vec![
            "Defer low-criticality items to the next period".to_string(),
            "Raise the budget cap".to_string(),
        ],
        estimated_resolution_cost: total - cap,
    });
}
