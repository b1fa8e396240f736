use crate::error::TreeError;
use crate::i18n::Localized;
use serde::{Deserialize, Serialize};

/// The authored form of a decision tree, ready for validation.
/// This is the target structure for any custom authoring format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeDefinition {
    pub root: String,
    pub questions: Vec<QuestionDefinition>,
}

/// Defines a single question and its ordered choices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDefinition {
    pub id: String,
    pub question: Localized,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub choices: Vec<ChoiceDefinition>,
}

/// One answer to a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceDefinition {
    pub label: Localized,
    pub next: NextDefinition,
}

/// Where a choice leads: another question, or a terminal service pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NextDefinition {
    Question(String),
    Service(String),
}

impl TreeDefinition {
    /// Parses a tree authored as JSON.
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        serde_json::from_str(json).map_err(|e| TreeError::JsonParseError(e.to_string()))
    }
}

impl QuestionDefinition {
    pub fn new(id: &str, question: Localized) -> Self {
        Self {
            id: id.to_string(),
            question,
            icon: None,
            choices: Vec::new(),
        }
    }

    pub fn icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    /// Adds a choice that continues to another question.
    pub fn ask(mut self, label: Localized, question_id: &str) -> Self {
        self.choices.push(ChoiceDefinition {
            label,
            next: NextDefinition::Question(question_id.to_string()),
        });
        self
    }

    /// Adds a choice that resolves to a service.
    pub fn pick(mut self, label: Localized, service_id: &str) -> Self {
        self.choices.push(ChoiceDefinition {
            label,
            next: NextDefinition::Service(service_id.to_string()),
        });
        self
    }
}

/// A trait for custom authoring models that can be converted into a `TreeDefinition`.
///
/// Implement this on your own structs (a CMS export, a spreadsheet row model, ...)
/// to feed them through `TreeBuilder` and get the same validation as the built-in tree.
pub trait IntoTree {
    /// Consumes the object and converts it into a tree definition.
    fn into_tree(self) -> Result<TreeDefinition, TreeError>;
}

impl IntoTree for TreeDefinition {
    fn into_tree(self) -> Result<TreeDefinition, TreeError> {
        Ok(self)
    }
}
