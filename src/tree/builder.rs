use super::definition::{NextDefinition, TreeDefinition};
use super::{ChoiceOption, DecisionTree, Next, NodeId, QuestionNode};
use crate::catalog::ServiceCatalog;
use crate::error::TreeError;
use ahash::AHashMap;
use tracing::{debug, warn};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Validates a `TreeDefinition` against a catalog and produces a `DecisionTree`.
pub struct TreeBuilder<'a> {
    definition: TreeDefinition,
    catalog: &'a ServiceCatalog,
    root_override: Option<String>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(definition: TreeDefinition, catalog: &'a ServiceCatalog) -> Self {
        Self {
            definition,
            catalog,
            root_override: None,
        }
    }

    /// Starts the tree at another question, e.g. to deep-link into one branch.
    pub fn with_root(mut self, question_id: &str) -> Self {
        self.root_override = Some(question_id.to_string());
        self
    }

    pub fn build(self) -> Result<DecisionTree, TreeError> {
        let TreeDefinition { root, questions } = self.definition;
        let root_id = self.root_override.unwrap_or(root);

        // 1. Intern question ids
        let mut index: AHashMap<String, NodeId> = AHashMap::with_capacity(questions.len());
        for (position, question) in questions.iter().enumerate() {
            if index.insert(question.id.clone(), NodeId(position)).is_some() {
                return Err(TreeError::DuplicateNode(question.id.clone()));
            }
        }
        let root = *index
            .get(&root_id)
            .ok_or_else(|| TreeError::RootNotFound(root_id.clone()))?;

        // 2. Resolve every choice target
        let mut nodes = Vec::with_capacity(questions.len());
        for question in questions {
            if question.choices.is_empty() {
                return Err(TreeError::EmptyQuestion(question.id));
            }
            let mut choices = Vec::with_capacity(question.choices.len());
            for choice in question.choices {
                let next = match choice.next {
                    NextDefinition::Question(target) => {
                        let id = index.get(&target).ok_or_else(|| TreeError::NodeNotFound {
                            missing_node_id: target.clone(),
                            source_node_id: question.id.clone(),
                        })?;
                        Next::Question(*id)
                    }
                    NextDefinition::Service(service_id) => {
                        if !self.catalog.contains(&service_id) {
                            return Err(TreeError::UnknownService {
                                node_id: question.id.clone(),
                                service_id,
                            });
                        }
                        Next::Service(service_id)
                    }
                };
                choices.push(ChoiceOption {
                    label: choice.label,
                    next,
                });
            }
            nodes.push(QuestionNode {
                id: question.id,
                question: question.question,
                icon: question.icon,
                choices,
            });
        }

        // 3. Reject cycles; shared subtrees are fine
        let mut marks = vec![Mark::Unvisited; nodes.len()];
        for start in 0..nodes.len() {
            if marks[start] == Mark::Unvisited {
                Self::visit(&nodes, NodeId(start), &mut marks)?;
            }
        }

        // 4. Report questions the root cannot reach
        let reachable = Self::reachable_from(&nodes, root);
        for (position, node) in nodes.iter().enumerate() {
            if !reachable[position] {
                warn!(question = %node.id, "question is unreachable from the root");
            }
        }

        debug!(
            questions = nodes.len(),
            root = %nodes[root.0].id,
            "decision tree validated"
        );
        Ok(DecisionTree { nodes, index, root })
    }

    fn visit(nodes: &[QuestionNode], id: NodeId, marks: &mut [Mark]) -> Result<(), TreeError> {
        marks[id.0] = Mark::InProgress;
        for choice in &nodes[id.0].choices {
            if let Next::Question(next) = choice.next {
                match marks[next.0] {
                    Mark::InProgress => return Err(TreeError::Cycle(nodes[next.0].id.clone())),
                    Mark::Unvisited => Self::visit(nodes, next, marks)?,
                    Mark::Done => {}
                }
            }
        }
        marks[id.0] = Mark::Done;
        Ok(())
    }

    fn reachable_from(nodes: &[QuestionNode], root: NodeId) -> Vec<bool> {
        let mut seen = vec![false; nodes.len()];
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut seen[id.0], true) {
                continue;
            }
            for choice in &nodes[id.0].choices {
                if let Next::Question(next) = choice.next {
                    stack.push(next);
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Localized;
    use crate::tree::QuestionDefinition;

    fn text(s: &str) -> Localized {
        Localized::new(s, s)
    }

    fn catalog() -> ServiceCatalog {
        ServiceCatalog::clinic()
    }

    #[test]
    fn test_shared_leaves_are_not_cycles() {
        let definition = TreeDefinition {
            root: "a".to_string(),
            questions: vec![
                QuestionDefinition::new("a", text("A"))
                    .ask(text("to b"), "b")
                    .ask(text("to c"), "c"),
                QuestionDefinition::new("b", text("B")).ask(text("to c"), "c"),
                QuestionDefinition::new("c", text("C")).pick(text("done"), "t-cobre"),
            ],
        };
        let tree = TreeBuilder::new(definition, &catalog()).build().unwrap();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.paths_to("t-cobre").len(), 2);
    }

    #[test]
    fn test_cycle_is_rejected() {
        let definition = TreeDefinition {
            root: "a".to_string(),
            questions: vec![
                QuestionDefinition::new("a", text("A")).ask(text("to b"), "b"),
                QuestionDefinition::new("b", text("B"))
                    .ask(text("back"), "a")
                    .pick(text("done"), "t-cobre"),
            ],
        };
        let result = TreeBuilder::new(definition, &catalog()).build();
        assert!(matches!(result, Err(TreeError::Cycle(_))));
    }

    #[test]
    fn test_with_root_starts_elsewhere() {
        let definition = TreeDefinition {
            root: "a".to_string(),
            questions: vec![
                QuestionDefinition::new("a", text("A")).ask(text("to b"), "b"),
                QuestionDefinition::new("b", text("B")).pick(text("done"), "mirena"),
            ],
        };
        let tree = TreeBuilder::new(definition, &catalog())
            .with_root("b")
            .build()
            .unwrap();
        assert_eq!(tree.root_node().id, "b");
    }
}
