//! The decision tree engine: an immutable arena of questions and a navigator over it.
use crate::catalog::ServiceCatalog;
use crate::error::TreeError;
use crate::i18n::Localized;
use ahash::AHashMap;

mod builder;
pub mod data;
pub mod definition;
mod navigator;

pub use builder::TreeBuilder;
pub use definition::*;
pub use navigator::{ChoiceOutcome, Direction, TreeNavigator};

/// Index of a question inside a `DecisionTree` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// A validated question node.
#[derive(Debug, Clone)]
pub struct QuestionNode {
    pub id: String,
    pub question: Localized,
    pub icon: Option<String>,
    pub choices: Vec<ChoiceOption>,
}

/// A validated choice; question targets are resolved to arena ids.
#[derive(Debug, Clone)]
pub struct ChoiceOption {
    pub label: Localized,
    pub next: Next,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next {
    Question(NodeId),
    Service(String),
}

impl ChoiceOption {
    pub fn is_terminal(&self) -> bool {
        matches!(self.next, Next::Service(_))
    }

    pub fn service_id(&self) -> Option<&str> {
        match &self.next {
            Next::Service(id) => Some(id),
            Next::Question(_) => None,
        }
    }
}

/// One complete route from the root to a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreePath {
    pub labels: Vec<Localized>,
    pub service_id: String,
}

/// An immutable, validated decision tree.
///
/// Built once through `TreeBuilder`; every service reference has been checked
/// against the catalog and the question graph is known to be acyclic.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    pub(crate) nodes: Vec<QuestionNode>,
    pub(crate) index: AHashMap<String, NodeId>,
    pub(crate) root: NodeId,
}

impl DecisionTree {
    pub fn builder<'a>(definition: TreeDefinition, catalog: &'a ServiceCatalog) -> TreeBuilder<'a> {
        TreeBuilder::new(definition, catalog)
    }

    /// The clinic's built-in service selector, validated against `catalog`.
    pub fn clinic(catalog: &ServiceCatalog) -> Result<Self, TreeError> {
        Self::builder(data::clinic_tree(), catalog).build()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> &QuestionNode {
        &self.nodes[self.root.0]
    }

    pub fn node(&self, id: NodeId) -> &QuestionNode {
        &self.nodes[id.0]
    }

    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &QuestionNode> {
        self.nodes.iter()
    }

    /// Every service id referenced by a terminal choice, deduplicated, in first-seen order.
    pub fn terminal_service_ids(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for node in &self.nodes {
            for choice in &node.choices {
                if let Some(id) = choice.service_id() {
                    if !seen.contains(&id) {
                        seen.push(id);
                    }
                }
            }
        }
        seen
    }

    /// Every route from the root to a service, depth first in choice order.
    pub fn paths(&self) -> Vec<TreePath> {
        let mut paths = Vec::new();
        let mut labels = Vec::new();
        self.collect_paths(self.root, &mut labels, &mut paths);
        paths
    }

    /// Routes from the root that resolve to `service_id`.
    pub fn paths_to(&self, service_id: &str) -> Vec<TreePath> {
        self.paths()
            .into_iter()
            .filter(|p| p.service_id == service_id)
            .collect()
    }

    fn collect_paths(&self, id: NodeId, labels: &mut Vec<Localized>, out: &mut Vec<TreePath>) {
        for choice in &self.node(id).choices {
            labels.push(choice.label.clone());
            match &choice.next {
                Next::Question(next) => self.collect_paths(*next, labels, out),
                Next::Service(service_id) => out.push(TreePath {
                    labels: labels.clone(),
                    service_id: service_id.clone(),
                }),
            }
            labels.pop();
        }
    }
}
