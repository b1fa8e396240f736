//! Property tests over navigation and phone normalization.
mod common;
use common::*;
use consulta::tree::Next;
use consulta::wizard::{is_valid_phone, normalize_phone};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Action {
    Select(usize),
    Back,
    Restart,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        6 => (0usize..6).prop_map(Action::Select),
        2 => Just(Action::Back),
        1 => Just(Action::Restart),
    ]
}

proptest! {
    #[test]
    fn history_always_starts_at_root(actions in prop::collection::vec(action(), 0..40)) {
        let mut nav = navigator();
        let root = nav.tree().root();

        for action in actions {
            match action {
                Action::Select(i) => { let _ = nav.select_choice(i); }
                Action::Back => { nav.go_back(); }
                Action::Restart => nav.restart(),
            }

            let history = nav.history();
            prop_assert!(!history.is_empty());
            prop_assert_eq!(history[0], root);
            for pair in history.windows(2) {
                let parent = nav.tree().node(pair[0]);
                let linked = parent
                    .choices
                    .iter()
                    .any(|c| matches!(c.next, Next::Question(id) if id == pair[1]));
                prop_assert!(linked);
            }
            if let Some(key) = nav.choice_key() {
                let prefix = format!("{}-", nav.current().id);
                prop_assert!(key.starts_with(&prefix));
            }
        }
    }

    #[test]
    fn eight_digits_are_valid_with_or_without_prefix(digits in "[0-9]{8}") {
        prop_assert!(is_valid_phone(&digits));
        let prefixed = format!("+506 {}", digits);
        prop_assert!(is_valid_phone(&prefixed));
        prop_assert_eq!(normalize_phone(&prefixed), digits);
    }

    #[test]
    fn wrong_digit_counts_are_invalid(digits in "[1-9][0-9]{0,6}|[1-9][0-9]{8,11}") {
        // A leading 506 plus eight digits is a valid prefixed number
        prop_assume!(!(digits.len() == 11 && digits.starts_with("506")));
        prop_assert!(!is_valid_phone(&digits));
    }
}
