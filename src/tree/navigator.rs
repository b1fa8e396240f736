use super::{ChoiceOption, DecisionTree, Next, NodeId, QuestionNode};
use crate::catalog::{Service, ServiceCatalog};
use crate::error::TreeError;
use crate::i18n::Language;
use std::sync::Arc;
use tracing::{debug, error};

/// Slide direction of the last navigation. Carries no logical state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// What happened when a choice was selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceOutcome {
    /// Moved into another question.
    Advanced(NodeId),
    /// The choice resolved to a service, now the committed selection.
    Resolved(Service),
}

/// Walks a `DecisionTree`, keeping the path taken and the picked service.
///
/// `history` always starts at the root and is never empty; each entry is reachable
/// from the previous one through one of its choices.
#[derive(Debug, Clone)]
pub struct TreeNavigator {
    tree: Arc<DecisionTree>,
    catalog: Arc<ServiceCatalog>,
    history: Vec<NodeId>,
    choice_key: Option<String>,
    selected: Option<Service>,
    hovered: Option<Service>,
    direction: Direction,
}

impl TreeNavigator {
    pub fn new(tree: Arc<DecisionTree>, catalog: Arc<ServiceCatalog>) -> Self {
        let root = tree.root();
        Self {
            tree,
            catalog,
            history: vec![root],
            choice_key: None,
            selected: None,
            hovered: None,
            direction: Direction::Forward,
        }
    }

    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }

    pub fn current_id(&self) -> NodeId {
        // `history` is never empty
        self.history[self.history.len() - 1]
    }

    pub fn current(&self) -> &QuestionNode {
        self.tree.node(self.current_id())
    }

    pub fn history(&self) -> &[NodeId] {
        &self.history
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    pub fn is_at_root(&self) -> bool {
        self.history.len() == 1
    }

    /// `"{currentNodeId}-{choiceIndex}"` of the committed terminal choice, if any.
    pub fn choice_key(&self) -> Option<&str> {
        self.choice_key.as_deref()
    }

    /// The committed selection.
    pub fn selected(&self) -> Option<&Service> {
        self.selected.as_ref()
    }

    /// What the preview panel shows: the hovered service, else the committed one.
    pub fn preview(&self) -> Option<&Service> {
        self.hovered.as_ref().or(self.selected.as_ref())
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn choice(&self, index: usize) -> Result<&ChoiceOption, TreeError> {
        let node = self.current();
        node.choices.get(index).ok_or_else(|| TreeError::InvalidChoice {
            node_id: node.id.clone(),
            index,
        })
    }

    fn resolve(&self, service_id: &str) -> Result<&Service, TreeError> {
        self.catalog.get(service_id).ok_or_else(|| {
            let node_id = self.current().id.clone();
            error!(
                question = %node_id,
                service = %service_id,
                "decision tree choice points to a service missing from the catalog"
            );
            TreeError::UnknownService {
                node_id,
                service_id: service_id.to_string(),
            }
        })
    }

    fn key_for(&self, index: usize) -> String {
        format!("{}-{}", self.current().id, index)
    }

    /// Selects the choice at `index` on the current question.
    ///
    /// A question target is pushed onto the history and clears any pick; a service
    /// target becomes the committed selection. On error the state is unchanged.
    pub fn select_choice(&mut self, index: usize) -> Result<ChoiceOutcome, TreeError> {
        let next = self.choice(index)?.next.clone();
        match next {
            Next::Question(id) => {
                self.history.push(id);
                self.clear_pick();
                self.direction = Direction::Forward;
                debug!(question = %self.current().id, depth = self.depth(), "entered question");
                Ok(ChoiceOutcome::Advanced(id))
            }
            Next::Service(service_id) => {
                let service = self.resolve(&service_id)?.clone();
                self.choice_key = Some(self.key_for(index));
                self.selected = Some(service.clone());
                self.hovered = None;
                debug!(service = %service.id, "service resolved from decision tree");
                Ok(ChoiceOutcome::Resolved(service))
            }
        }
    }

    /// Selects the choice whose label is `label` in `language`, falling back to a
    /// case-insensitive match against either translation.
    pub fn select_by_label(
        &mut self,
        label: &str,
        language: Language,
    ) -> Result<ChoiceOutcome, TreeError> {
        let node = self.current();
        let index = node
            .choices
            .iter()
            .position(|c| c.label.get(language) == label)
            .or_else(|| node.choices.iter().position(|c| c.label.matches(label)))
            .ok_or_else(|| TreeError::LabelNotFound {
                node_id: node.id.clone(),
                label: label.to_string(),
            })?;
        self.select_choice(index)
    }

    /// Steps back one question. Returns false at the root.
    pub fn go_back(&mut self) -> bool {
        if self.is_at_root() {
            return false;
        }
        self.history.pop();
        self.clear_pick();
        self.direction = Direction::Backward;
        true
    }

    /// Returns to the root and forgets any pick.
    pub fn restart(&mut self) {
        self.history.truncate(1);
        self.clear_pick();
        self.direction = Direction::Backward;
    }

    /// Shows a transient preview while an uncommitted terminal choice is hovered.
    ///
    /// Hovering anything else drops the preview, leaving the committed selection.
    pub fn preview_on_hover(&mut self, index: usize) -> Option<&Service> {
        let target = self
            .choice(index)
            .ok()
            .and_then(|c| c.service_id())
            .map(str::to_string);
        let committed = self.choice_key.as_deref() == Some(self.key_for(index).as_str());
        self.hovered = match target {
            Some(service_id) if !committed => self.catalog.get(&service_id).cloned(),
            _ => None,
        };
        self.preview()
    }

    /// Drops the hover preview, reverting to the committed selection.
    pub fn clear_preview(&mut self) {
        self.hovered = None;
    }

    fn clear_pick(&mut self) {
        self.choice_key = None;
        self.selected = None;
        self.hovered = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn navigator() -> TreeNavigator {
        let catalog = Arc::new(ServiceCatalog::clinic());
        let tree = Arc::new(DecisionTree::clinic(&catalog).unwrap());
        TreeNavigator::new(tree, catalog)
    }

    #[test]
    fn test_go_back_at_root_is_noop() {
        let mut nav = navigator();
        assert!(!nav.go_back());
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn test_terminal_choice_sets_choice_key() {
        let mut nav = navigator();
        nav.select_by_label("Anticonceptivos", Language::Es).unwrap();
        nav.select_by_label("Colocar un método", Language::Es).unwrap();
        let outcome = nav.select_by_label("T de cobre", Language::Es).unwrap();

        assert!(matches!(outcome, ChoiceOutcome::Resolved(ref s) if s.id == "t-cobre"));
        assert_eq!(nav.choice_key(), Some("metodo-0"));
        assert_eq!(nav.selected().map(|s| s.id.as_str()), Some("t-cobre"));
        // The current question is unchanged by a resolution
        assert_eq!(nav.current().id, "metodo");
    }

    #[test]
    fn test_hover_preview_reverts_to_selection() {
        let mut nav = navigator();
        nav.select_by_label("Anticonceptivos", Language::Es).unwrap();
        nav.select_by_label("Colocar un método", Language::Es).unwrap();
        nav.select_choice(0).unwrap();

        let hovered = nav.preview_on_hover(1).map(|s| s.id.clone());
        assert_eq!(hovered.as_deref(), Some("mirena"));
        nav.clear_preview();
        assert_eq!(nav.preview().map(|s| s.id.as_str()), Some("t-cobre"));
    }

    #[test]
    fn test_hovering_committed_choice_keeps_selection() {
        let mut nav = navigator();
        nav.select_by_label("Consulta", Language::Es).unwrap();
        nav.select_choice(1).unwrap();
        nav.preview_on_hover(1);
        assert_eq!(nav.preview().map(|s| s.id.as_str()), Some("consulta-prenatal"));
    }

    #[test]
    fn test_hovering_committed_choice_drops_other_preview() {
        let mut nav = navigator();
        nav.select_by_label("Anticonceptivos", Language::Es).unwrap();
        nav.select_by_label("Colocar un método", Language::Es).unwrap();
        nav.select_choice(0).unwrap();

        assert_eq!(nav.preview_on_hover(1).map(|s| s.id.as_str()), Some("mirena"));
        assert_eq!(nav.preview_on_hover(0).map(|s| s.id.as_str()), Some("t-cobre"));
        assert_eq!(nav.preview_on_hover(99).map(|s| s.id.as_str()), Some("t-cobre"));
    }

    #[test]
    fn test_hovering_question_choice_drops_preview() {
        let mut nav = navigator();
        nav.select_by_label("Anticonceptivos", Language::Es).unwrap();

        assert_eq!(
            nav.preview_on_hover(1).map(|s| s.id.as_str()),
            Some("retiro-dispositivo")
        );
        assert!(!nav.current().choices[0].is_terminal());
        assert!(nav.preview_on_hover(0).is_none());
    }

    #[test]
    fn test_label_lookup_ignores_case_and_language() {
        let mut nav = navigator();
        nav.select_by_label("contraception", Language::Es).unwrap();
        assert_eq!(nav.current().id, "anticonceptivos");
        assert!(matches!(
            nav.select_by_label("Nada", Language::Es),
            Err(TreeError::LabelNotFound { .. })
        ));
    }

    #[test]
    fn test_entering_question_clears_pick() {
        let mut nav = navigator();
        nav.select_by_label("Anticonceptivos", Language::Es).unwrap();
        nav.select_by_label("Retirar un dispositivo", Language::Es).unwrap();
        assert!(nav.selected().is_some());

        nav.select_by_label("Colocar un método", Language::Es).unwrap();
        assert!(nav.selected().is_none());
        assert!(nav.choice_key().is_none());
        assert_eq!(nav.direction(), Direction::Forward);
    }

    #[test]
    fn test_invalid_index_leaves_state_alone() {
        let mut nav = navigator();
        let err = nav.select_choice(99).unwrap_err();
        assert!(matches!(err, TreeError::InvalidChoice { index: 99, .. }));
        assert!(nav.is_at_root());
    }
}
