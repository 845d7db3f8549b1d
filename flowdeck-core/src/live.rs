//! Live execution state
//!
//! Reconciles asynchronously arriving channel events with the fetched graph
//! shape. `LiveExecution` owns the raw event buffers; `GraphView` derives
//! per-node presentation from them and is recomputed, never mutated.

use std::collections::HashMap;
use std::collections::VecDeque;

use crate::domain::graph::GraphShape;
use crate::domain::log::LogLine;
use crate::domain::status::{PipelineStatusEvent, RunState, StepStatusEvent, StepTiming};
use crate::dto::events::InboundEvent;

/// Upper bound on buffered log lines. Oldest lines are evicted first; the
/// full history stays available from the execution-logs endpoint.
pub const MAX_BUFFERED_LOGS: usize = 10_000;

/// Mutable per-view state for one execution, fed exclusively by inbound
/// channel events. A rerun produces a new execution id and a fresh state.
#[derive(Debug, Default)]
pub struct LiveExecution {
    logs: VecDeque<LogLine>,
    status: Option<PipelineStatusEvent>,
    steps: HashMap<String, StepStatusEvent>,
}

impl LiveExecution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one inbound event in arrival order.
    ///
    /// Logs append; a pipeline status replaces the current one; a step
    /// status fully replaces the prior record for that step name.
    pub fn apply(&mut self, event: InboundEvent) {
        match event {
            InboundEvent::Joined(_) => {}
            InboundEvent::Log(line) => {
                if self.logs.len() == MAX_BUFFERED_LOGS {
                    self.logs.pop_front();
                }
                self.logs.push_back(line);
            }
            InboundEvent::Status(status) => {
                self.status = Some(status);
            }
            InboundEvent::Step(step) => {
                self.steps.insert(step.step_name.clone(), step);
            }
        }
    }

    /// Clear all buffered state. Called when switching to another execution
    /// so no log or status bleeds across subscriptions.
    pub fn reset(&mut self) {
        self.logs.clear();
        self.status = None;
        self.steps.clear();
    }

    pub fn logs(&self) -> impl Iterator<Item = &LogLine> {
        self.logs.iter()
    }

    pub fn pushed_status(&self) -> Option<&PipelineStatusEvent> {
        self.status.as_ref()
    }

    /// Latest status record for a step, if any has arrived.
    pub fn step(&self, step_name: &str) -> Option<&StepStatusEvent> {
        self.steps.get(step_name)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Overall status for the execution.
    ///
    /// A status pushed by the backend wins outright. Otherwise it is derived
    /// from the step map with a fixed precedence: running beats failed beats
    /// all-success; a mix of pending and finished steps counts as running
    /// (the pipeline is assumed to still be working through them).
    pub fn overall_status(&self) -> RunState {
        if let Some(status) = &self.status {
            return status.status;
        }
        if self.steps.is_empty() {
            return RunState::Pending;
        }
        if self.any_step(RunState::Running) {
            return RunState::Running;
        }
        if self.any_step(RunState::Failed) {
            return RunState::Failed;
        }
        if self.steps.values().all(|s| s.status == RunState::Success) {
            return RunState::Success;
        }
        if self.any_step(RunState::Pending) {
            return RunState::Running;
        }
        RunState::Pending
    }

    /// Whether any step is currently running or still pending.
    pub fn has_active_steps(&self) -> bool {
        self.any_step(RunState::Running) || self.any_step(RunState::Pending)
    }

    /// Whether a cancel affordance should be offered.
    ///
    /// Permissive on purpose: shown while the overall status is
    /// running/pending, while any step is active, or before any status has
    /// been pushed at all (unless the derived state is already terminal).
    pub fn should_offer_cancel(&self) -> bool {
        let overall = self.overall_status();
        let active = matches!(overall, RunState::Running | RunState::Pending);
        active || self.has_active_steps() || (self.status.is_none() && !overall.is_terminal())
    }

    /// Step counts per state, for the live stats display.
    pub fn counts(&self) -> StateCounts {
        let mut counts = StateCounts::default();
        for step in self.steps.values() {
            match step.status {
                RunState::Pending => counts.pending += 1,
                RunState::Running => counts.running += 1,
                RunState::Success => counts.success += 1,
                RunState::Failed => counts.failed += 1,
            }
        }
        counts
    }

    fn any_step(&self, state: RunState) -> bool {
        self.steps.values().any(|s| s.status == state)
    }
}

/// Per-state step tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateCounts {
    pub pending: usize,
    pub running: usize,
    pub success: usize,
    pub failed: usize,
}

/// One renderable node: static graph metadata joined with live status
#[derive(Debug, Clone)]
pub struct NodeView {
    pub name: String,
    pub image: String,
    pub commands: Vec<String>,
    pub dependency_count: usize,
    pub level: u32,
    pub is_root: bool,
    pub is_leaf: bool,
    pub status: RunState,
    pub timing: Option<StepTiming>,
}

/// Presentation of a graph shape under the current live state.
///
/// Nodes with no status record yet default to pending. Status records whose
/// step name matches no graph node stay in the map but produce no view.
#[derive(Debug)]
pub struct GraphView {
    pub nodes: Vec<NodeView>,
}

impl GraphView {
    pub fn new(shape: &GraphShape, live: &LiveExecution) -> Self {
        let nodes = shape
            .nodes
            .iter()
            .map(|node| {
                let step = live.step(&node.id);
                NodeView {
                    name: node.id.clone(),
                    image: node.data.image.clone(),
                    commands: node.data.commands.clone(),
                    dependency_count: node.data.dependencies.len(),
                    level: node.data.level,
                    is_root: node.data.is_root,
                    is_leaf: node.data.is_leaf,
                    status: step.map(|s| s.status).unwrap_or(RunState::Pending),
                    timing: step.and_then(|s| s.metadata.clone()),
                }
            })
            .collect();
        Self { nodes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::{GraphNode, NodeData};
    use chrono::Utc;

    fn step_event(name: &str, status: RunState) -> InboundEvent {
        InboundEvent::Step(StepStatusEvent {
            step_name: name.to_string(),
            status,
            metadata: None,
            timestamp: Utc::now(),
        })
    }

    fn log_event(id: &str) -> InboundEvent {
        InboundEvent::Log(LogLine {
            id: id.to_string(),
            level: crate::domain::log::LogLevel::Info,
            message: "line".to_string(),
            step: None,
            timestamp: Utc::now(),
        })
    }

    fn live_with(steps: &[(&str, RunState)]) -> LiveExecution {
        let mut live = LiveExecution::new();
        for (name, status) in steps {
            live.apply(step_event(name, *status));
        }
        live
    }

    fn shape_with(names: &[&str]) -> GraphShape {
        GraphShape {
            execution_id: "exec-1".into(),
            repo_name: "acme/app".to_string(),
            branch: None,
            nodes: names
                .iter()
                .map(|name| GraphNode {
                    id: name.to_string(),
                    data: NodeData {
                        label: name.to_string(),
                        image: "alpine:3".to_string(),
                        commands: vec![],
                        dependencies: vec![],
                        level: 0,
                        is_root: true,
                        is_leaf: true,
                    },
                })
                .collect(),
            edges: vec![],
            total_steps: names.len(),
            stats: None,
        }
    }

    #[test]
    fn running_beats_failed_and_success() {
        let live = live_with(&[
            ("a", RunState::Failed),
            ("b", RunState::Running),
            ("c", RunState::Success),
        ]);
        assert_eq!(live.overall_status(), RunState::Running);
    }

    #[test]
    fn failed_dominates_without_running() {
        let live = live_with(&[("a", RunState::Failed), ("b", RunState::Success)]);
        assert_eq!(live.overall_status(), RunState::Failed);
    }

    #[test]
    fn all_success_yields_success() {
        let live = live_with(&[("a", RunState::Success), ("b", RunState::Success)]);
        assert_eq!(live.overall_status(), RunState::Success);
    }

    #[test]
    fn partial_pending_derives_running() {
        let live = live_with(&[("a", RunState::Success), ("b", RunState::Pending)]);
        assert_eq!(live.overall_status(), RunState::Running);
    }

    #[test]
    fn empty_map_defaults_to_pending() {
        let live = LiveExecution::new();
        assert_eq!(live.overall_status(), RunState::Pending);
    }

    #[test]
    fn pushed_status_wins_over_derivation() {
        let mut live = live_with(&[("a", RunState::Running)]);
        live.apply(InboundEvent::Status(PipelineStatusEvent {
            status: RunState::Failed,
            metadata: None,
            timestamp: Utc::now(),
        }));
        assert_eq!(live.overall_status(), RunState::Failed);
    }

    #[test]
    fn step_record_is_replaced_wholesale() {
        let mut live = LiveExecution::new();
        live.apply(InboundEvent::Step(StepStatusEvent {
            step_name: "a".to_string(),
            status: RunState::Running,
            metadata: Some(StepTiming {
                start_time: Some(Utc::now()),
                ..Default::default()
            }),
            timestamp: Utc::now(),
        }));
        live.apply(step_event("a", RunState::Success));
        let step = live.step("a").unwrap();
        assert_eq!(step.status, RunState::Success);
        // No field-level merge: the new record had no metadata, so none remains.
        assert!(step.metadata.is_none());
    }

    #[test]
    fn unknown_step_is_retained_but_renders_nothing() {
        let live = live_with(&[("build", RunState::Success), ("ghost", RunState::Running)]);
        let view = GraphView::new(&shape_with(&["build"]), &live);
        assert_eq!(view.nodes.len(), 1);
        assert_eq!(view.nodes[0].status, RunState::Success);
        assert!(live.step("ghost").is_some());
        // The map still drives the overall derivation.
        assert_eq!(live.overall_status(), RunState::Running);
    }

    #[test]
    fn nodes_without_status_default_to_pending() {
        let live = live_with(&[("build", RunState::Running)]);
        let view = GraphView::new(&shape_with(&["build", "test"]), &live);
        let test_node = view.nodes.iter().find(|n| n.name == "test").unwrap();
        assert_eq!(test_node.status, RunState::Pending);
    }

    #[test]
    fn reset_clears_everything() {
        let mut live = live_with(&[("a", RunState::Running)]);
        live.apply(log_event("l1"));
        live.apply(InboundEvent::Status(PipelineStatusEvent {
            status: RunState::Running,
            metadata: None,
            timestamp: Utc::now(),
        }));
        live.reset();
        assert_eq!(live.logs().count(), 0);
        assert!(live.pushed_status().is_none());
        assert_eq!(live.step_count(), 0);
        assert_eq!(live.overall_status(), RunState::Pending);
    }

    #[test]
    fn log_buffer_is_bounded() {
        let mut live = LiveExecution::new();
        for i in 0..(MAX_BUFFERED_LOGS + 5) {
            live.apply(log_event(&format!("l{}", i)));
        }
        assert_eq!(live.logs().count(), MAX_BUFFERED_LOGS);
        // Oldest lines were evicted first.
        assert_eq!(live.logs().next().unwrap().id, "l5");
    }

    #[test]
    fn cancel_offered_while_active() {
        assert!(live_with(&[("a", RunState::Running)]).should_offer_cancel());
        assert!(live_with(&[("a", RunState::Pending), ("b", RunState::Success)])
            .should_offer_cancel());
        // No status at all and nothing terminal derived: still offered.
        assert!(LiveExecution::new().should_offer_cancel());
    }

    #[test]
    fn cancel_hidden_once_terminal() {
        assert!(!live_with(&[("a", RunState::Success)]).should_offer_cancel());
        assert!(!live_with(&[("a", RunState::Failed), ("b", RunState::Success)])
            .should_offer_cancel());
    }

    #[test]
    fn counts_tally_each_state() {
        let live = live_with(&[
            ("a", RunState::Pending),
            ("b", RunState::Running),
            ("c", RunState::Success),
            ("d", RunState::Success),
            ("e", RunState::Failed),
        ]);
        let counts = live.counts();
        assert_eq!(
            counts,
            StateCounts { pending: 1, running: 1, success: 2, failed: 1 }
        );
    }
}
