use crate::error::SyncError;
use crate::pipeline::context::SyncContext;
use crate::pipeline::phase_trait::SyncPhase;
use crate::project::{ProjectId, ProjectInput};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{btree_set, BTreeMap, BTreeSet};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOrder {
    /// Every project after all of its sub-project dependencies
    pub order: Vec<ProjectId>,
    /// Projects grouped so that each wave depends only on earlier waves
    pub waves: Vec<Vec<ProjectId>>,
}

type Graph = BTreeMap<ProjectId, BTreeSet<ProjectId>>;

fn build_dependency_graph(projects: &[ProjectInput]) -> Result<Graph, SyncError> {
    let mut graph = Graph::new();
    for project in projects {
        if graph.contains_key(&project.path) {
            return Err(SyncError::DuplicateProject(project.path.clone()));
        }
        graph.insert(project.path.clone(), BTreeSet::new());
    }

    for project in projects {
        for dep in project.project_references() {
            if !graph.contains_key(dep) {
                return Err(SyncError::UnknownProject {
                    from: project.path.clone(),
                    to: dep.clone(),
                });
            }
            if let Some(edges) = graph.get_mut(&project.path) {
                edges.insert(dep.clone());
            }
        }
    }

    Ok(graph)
}

/// Cycle through the projects Kahn's algorithm could not order, closed on its
/// starting project. Every such project has at least one unordered
/// dependency, so following those edges always closes a loop. The walk keeps
/// an explicit stack so deep chains cannot exhaust the thread stack.
fn find_cycle<'a>(
    graph: &'a Graph,
    unordered: &BTreeSet<&'a ProjectId>,
) -> Option<Vec<ProjectId>> {
    let mut done: BTreeSet<&ProjectId> = BTreeSet::new();

    for &start in unordered {
        if done.contains(start) {
            continue;
        }
        let Some(edges) = graph.get(start) else {
            continue;
        };
        let mut stack: Vec<(&ProjectId, btree_set::Iter<'a, ProjectId>)> =
            vec![(start, edges.iter())];
        let mut on_path: BTreeMap<&ProjectId, usize> = BTreeMap::from([(start, 0)]);

        while let Some((node, edges)) = stack.last_mut() {
            let current = *node;
            let next = edges.find(|dep| unordered.contains(dep) && !done.contains(dep));

            match next {
                Some(dep) => {
                    if let Some(&position) = on_path.get(dep) {
                        let mut cycle: Vec<ProjectId> =
                            stack[position..].iter().map(|(n, _)| (*n).clone()).collect();
                        cycle.push(dep.clone());
                        return Some(cycle);
                    }
                    if let Some(dep_edges) = graph.get(dep) {
                        on_path.insert(dep, stack.len());
                        stack.push((dep, dep_edges.iter()));
                    }
                }
                None => {
                    done.insert(current);
                    on_path.remove(current);
                    stack.pop();
                }
            }
        }
    }
    None
}

fn topological_sort(graph: &Graph) -> Result<BuildOrder, SyncError> {
    let mut in_degree: BTreeMap<&ProjectId, usize> = BTreeMap::new();
    let mut reverse_graph: BTreeMap<&ProjectId, Vec<&ProjectId>> = BTreeMap::new();
    for (node, deps) in graph {
        in_degree.insert(node, deps.len());
        for dep in deps {
            reverse_graph.entry(dep).or_default().push(node);
        }
    }

    let mut wave: Vec<&ProjectId> = in_degree
        .iter()
        .filter(|(_, &degree)| degree == 0)
        .map(|(node, _)| *node)
        .collect();

    let mut order = Vec::new();
    let mut waves = Vec::new();

    while !wave.is_empty() {
        let mut next = BTreeSet::new();
        for node in &wave {
            for dependent in reverse_graph.get(node).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        next.insert(*dependent);
                    }
                }
            }
        }

        let ids: Vec<ProjectId> = wave.iter().map(|p| (*p).clone()).collect();
        order.extend(ids.iter().cloned());
        waves.push(ids);
        wave = next.into_iter().collect();
    }

    if order.len() < graph.len() {
        let unordered: BTreeSet<&ProjectId> = in_degree
            .iter()
            .filter(|(_, &degree)| degree > 0)
            .map(|(node, _)| *node)
            .collect();
        let path = find_cycle(graph, &unordered)
            .unwrap_or_else(|| unordered.iter().map(|p| (*p).clone()).collect());
        return Err(SyncError::Cycle { path });
    }

    Ok(BuildOrder { order, waves })
}

pub struct BuildOrderPhase;

impl SyncPhase for BuildOrderPhase {
    fn name(&self) -> &'static str {
        "BuildOrderPhase"
    }

    fn execute(&self, context: &mut SyncContext) -> Result<()> {
        let graph = build_dependency_graph(&context.projects)?;
        let build_order = topological_sort(&graph)?;

        debug!(
            projects = build_order.order.len(),
            waves = build_order.waves.len(),
            "Computed build order"
        );

        context.index = context
            .projects
            .iter()
            .enumerate()
            .map(|(i, p)| (p.path.clone(), i))
            .collect();
        context.build_order = Some(build_order);
        Ok(())
    }
}
