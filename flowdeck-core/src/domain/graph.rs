//! Pipeline graph shape
//!
//! The static DAG description fetched once per execution. The backend builds
//! the graph and guarantees acyclicity; nothing is validated locally.

use serde::{Deserialize, Serialize};

use crate::domain::status::ExecutionId;

/// The directed acyclic structure of one execution's steps
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphShape {
    pub execution_id: ExecutionId,
    pub repo_name: String,
    #[serde(default)]
    pub branch: Option<String>,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub total_steps: usize,
    #[serde(default)]
    pub stats: Option<GraphStats>,
}

impl GraphShape {
    /// Look up a node by step name.
    pub fn node(&self, step_name: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == step_name)
    }

    /// Nodes grouped by topological level, ascending.
    pub fn levels(&self) -> Vec<(u32, Vec<&GraphNode>)> {
        let mut levels: Vec<(u32, Vec<&GraphNode>)> = Vec::new();
        for node in &self.nodes {
            match levels.binary_search_by_key(&node.data.level, |(l, _)| *l) {
                Ok(i) => levels[i].1.push(node),
                Err(i) => levels.insert(i, (node.data.level, vec![node])),
            }
        }
        levels
    }
}

/// One step node; `id` is the step name, unique within the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub data: NodeData,
}

/// Step metadata carried on a graph node
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub label: String,
    pub image: String,
    #[serde(default)]
    pub commands: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub is_root: bool,
    #[serde(default)]
    pub is_leaf: bool,
}

/// Directed dependency edge between two steps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// Aggregate numbers the backend computes for the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub total_steps: usize,
    pub max_level: u32,
    pub root_steps: usize,
    pub leaf_steps: usize,
    pub total_dependencies: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, level: u32) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            data: NodeData {
                label: id.to_string(),
                image: "alpine:3".to_string(),
                commands: vec![],
                dependencies: vec![],
                level,
                is_root: level == 0,
                is_leaf: false,
            },
        }
    }

    #[test]
    fn levels_are_grouped_and_sorted() {
        let shape = GraphShape {
            execution_id: "exec-1".into(),
            repo_name: "acme/app".to_string(),
            branch: None,
            nodes: vec![node("test", 1), node("build", 0), node("lint", 1)],
            edges: vec![],
            total_steps: 3,
            stats: None,
        };
        let levels = shape.levels();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].0, 0);
        assert_eq!(levels[0].1[0].id, "build");
        assert_eq!(levels[1].1.len(), 2);
    }

    #[test]
    fn decodes_backend_shape() {
        let json = r#"{
            "executionId": "exec-42",
            "repoName": "acme/app",
            "branch": "main",
            "nodes": [
                { "id": "build", "data": { "label": "build", "image": "node:20",
                  "commands": ["npm ci"], "dependencies": [], "level": 0,
                  "isRoot": true, "isLeaf": false } }
            ],
            "edges": [ { "id": "e1", "source": "build", "target": "test" } ],
            "totalSteps": 1,
            "stats": { "totalSteps": 1, "maxLevel": 0, "rootSteps": 1,
                       "leafSteps": 1, "totalDependencies": 0 }
        }"#;
        let shape: GraphShape = serde_json::from_str(json).unwrap();
        assert_eq!(shape.node("build").unwrap().data.image, "node:20");
        assert!(shape.node("build").unwrap().data.is_root);
        assert_eq!(shape.stats.unwrap().max_level, 0);
    }
}
