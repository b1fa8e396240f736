//! Decision tree integrity and navigation tests.
mod common;
use common::*;
use consulta::error::TreeError;
use consulta::prelude::*;
use consulta::tree::{Direction, NextDefinition, QuestionDefinition};

#[cfg(test)]
mod tree_tests {
    use super::*;

    #[test]
    fn test_every_terminal_service_exists_in_catalog() {
        let catalog = catalog();
        let tree = tree(&catalog);

        let ids = tree.terminal_service_ids();
        assert!(!ids.is_empty());
        for id in ids {
            assert!(catalog.contains(id), "terminal '{}' is not in the catalog", id);
        }
    }

    #[test]
    fn test_every_device_service_is_reachable() {
        let catalog = catalog();
        let tree = tree(&catalog);
        let terminals = tree.terminal_service_ids();

        let devices: Vec<&str> = catalog
            .by_category(Category::Dispositivos)
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(devices, vec!["t-cobre", "mirena", "implante", "retiro-dispositivo"]);
        for id in devices {
            assert!(terminals.contains(&id), "'{}' has no path in the tree", id);
        }
    }

    #[test]
    fn test_every_path_ends_in_a_known_service() {
        let catalog = catalog();
        let tree = tree(&catalog);
        for path in tree.paths() {
            assert!(!path.labels.is_empty());
            assert!(catalog.contains(&path.service_id));
        }
    }

    #[test]
    fn test_pregnancy_ultrasound_path() {
        let mut nav = navigator();

        assert!(matches!(
            nav.select_by_label("Ultrasonido", Language::Es).unwrap(),
            ChoiceOutcome::Advanced(_)
        ));
        assert!(matches!(
            nav.select_by_label("Sí, estoy embarazada", Language::Es).unwrap(),
            ChoiceOutcome::Advanced(_)
        ));
        let outcome = nav
            .select_by_label("Ultrasonido de embarazo (normal)", Language::Es)
            .unwrap();

        match outcome {
            ChoiceOutcome::Resolved(service) => assert_eq!(service.id, "us-embarazo"),
            other => panic!("expected a resolved service, got {:?}", other),
        }
        assert_eq!(nav.depth(), 3);
        assert_eq!(nav.selected().map(|s| s.id.as_str()), Some("us-embarazo"));
        assert_eq!(nav.preview().map(|s| s.id.as_str()), Some("us-embarazo"));
    }

    #[test]
    fn test_back_and_restart_keep_root_first() {
        let mut nav = navigator();
        let root = nav.tree().root();

        nav.select_choice(1).unwrap();
        nav.select_choice(0).unwrap();
        assert_eq!(nav.history().len(), 3);
        assert_eq!(nav.history()[0], root);

        assert!(nav.go_back());
        assert_eq!(nav.history().len(), 2);
        assert_eq!(nav.direction(), Direction::Backward);

        nav.restart();
        assert_eq!(nav.history(), &[root]);
        assert!(nav.is_at_root());
        assert!(nav.choice_key().is_none());
        assert!(nav.selected().is_none());
    }

    #[test]
    fn test_choice_key_clears_when_node_changes() {
        let mut nav = navigator();
        nav.select_by_label("Exámenes y procedimientos", Language::Es).unwrap();
        nav.select_choice(0).unwrap();
        assert!(nav.choice_key().is_some());

        nav.go_back();
        assert!(nav.choice_key().is_none());
    }

    #[test]
    fn test_english_labels_navigate_too() {
        let mut nav = navigator();
        nav.select_by_label("Ultrasound", Language::En).unwrap();
        assert_eq!(nav.current().id, "ultrasonido");
    }

    #[test]
    fn test_unknown_service_is_rejected_at_build() {
        let catalog = catalog();
        let definition = TreeDefinition {
            root: "root".to_string(),
            questions: vec![QuestionDefinition::new("root", Localized::new("¿?", "?"))
                .pick(Localized::new("Algo", "Something"), "no-such-service")],
        };

        let err = DecisionTree::builder(definition, &catalog).build().unwrap_err();
        assert_eq!(
            err,
            TreeError::UnknownService {
                node_id: "root".to_string(),
                service_id: "no-such-service".to_string(),
            }
        );
    }

    #[test]
    fn test_dangling_question_is_rejected_at_build() {
        let catalog = catalog();
        let definition = TreeDefinition {
            root: "root".to_string(),
            questions: vec![QuestionDefinition::new("root", Localized::new("¿?", "?"))
                .ask(Localized::new("Más", "More"), "missing")],
        };

        let err = DecisionTree::builder(definition, &catalog).build().unwrap_err();
        assert!(matches!(err, TreeError::NodeNotFound { .. }));
    }

    #[test]
    fn test_tree_definition_from_json() {
        let catalog = catalog();
        let json = r#"{
            "root": "start",
            "questions": [
                {
                    "id": "start",
                    "question": { "es": "¿Qué buscas?", "en": "What are you looking for?" },
                    "choices": [
                        { "label": { "es": "Papanicolaou", "en": "Pap smear" }, "next": { "service": "papanicolaou" } },
                        { "label": { "es": "Otro", "en": "Other" }, "next": { "question": "other" } }
                    ]
                },
                {
                    "id": "other",
                    "question": { "es": "¿Cuál?", "en": "Which one?" },
                    "choices": [
                        { "label": { "es": "VPH", "en": "HPV" }, "next": { "service": "vph" } }
                    ]
                }
            ]
        }"#;

        let definition = TreeDefinition::from_json(json).unwrap();
        assert_eq!(
            definition.questions[0].choices[0].next,
            NextDefinition::Service("papanicolaou".to_string())
        );
        let tree = DecisionTree::builder(definition, &catalog).build().unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.paths().len(), 2);
    }
}
