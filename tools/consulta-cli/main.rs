use clap::{Parser, Subcommand};
use consulta::error::TreeError;
use consulta::prelude::*;
use consulta::tree::{ChoiceDefinition, NextDefinition, QuestionDefinition};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::sync::Arc;

// --- JSON Deserialization Structs (Input Format Specific) ---
// Trees are often authored as nested objects, one literal per question.
// These structs read that layout and flatten it into a TreeDefinition.

#[derive(Deserialize)]
#[serde(untagged)]
enum TreeFile {
    Flat(TreeDefinition),
    Nested(RawQuestion),
}

#[derive(Deserialize)]
struct RawQuestion {
    id: String,
    question: Localized,
    #[serde(default)]
    icon: Option<String>,
    options: Vec<RawOption>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOption {
    label: Localized,
    #[serde(default)]
    next: Option<RawQuestion>,
    #[serde(default)]
    service_id: Option<String>,
}

// --- Converter Implementation ---

impl IntoTree for TreeFile {
    fn into_tree(self) -> Result<TreeDefinition, TreeError> {
        match self {
            TreeFile::Flat(definition) => Ok(definition),
            TreeFile::Nested(root) => {
                let root_id = root.id.clone();
                let mut questions = Vec::new();
                let mut seen = HashSet::new();
                flatten(root, &mut questions, &mut seen)?;
                Ok(TreeDefinition {
                    root: root_id,
                    questions,
                })
            }
        }
    }
}

fn flatten(
    raw: RawQuestion,
    questions: &mut Vec<QuestionDefinition>,
    seen: &mut HashSet<String>,
) -> Result<(), TreeError> {
    let id = raw.id;
    // A subtree reused under several parents is emitted once
    if !seen.insert(id.clone()) {
        return Ok(());
    }
    let mut choices = Vec::with_capacity(raw.options.len());
    let mut children = Vec::new();
    for option in raw.options {
        let next = match (option.next, option.service_id) {
            (Some(child), None) => {
                let next = NextDefinition::Question(child.id.clone());
                children.push(child);
                next
            }
            (None, Some(service_id)) => NextDefinition::Service(service_id),
            _ => {
                return Err(TreeError::JsonParseError(format!(
                    "an option of question '{}' must have exactly one of 'next' or 'serviceId'",
                    id
                )));
            }
        };
        choices.push(ChoiceDefinition {
            label: option.label,
            next,
        });
    }
    questions.push(QuestionDefinition {
        id,
        question: raw.question,
        icon: raw.icon,
        choices,
    });
    for child in children {
        flatten(child, questions, seen)?;
    }
    Ok(())
}

/// Booking engine CLI for the clinic's service catalog and decision tree
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Language for printed names and questions
    #[arg(short, long, global = true)]
    language: Option<Language>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the service catalog grouped by category
    Services,
    /// Print every path through the decision tree
    Tree,
    /// Validate a decision tree against a service catalog
    Validate {
        /// Path to a catalog JSON file (defaults to the built-in catalog)
        #[arg(long)]
        catalog: Option<String>,
        /// Path to a tree JSON file, flat or nested (defaults to the built-in tree)
        #[arg(long)]
        tree: Option<String>,
    },
    /// Walk through the booking wizard interactively
    Book,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::from_env()
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid settings: {}", e)));
    if let Some(language) = cli.language {
        settings.language = language;
    }

    match cli.command {
        Commands::Services => list_services(settings.language),
        Commands::Tree => print_tree(settings.language),
        Commands::Validate { catalog, tree } => validate(catalog, tree),
        Commands::Book => run_booking(settings).await,
    }
}

fn list_services(language: Language) {
    let catalog = ServiceCatalog::clinic();
    for (category, services) in catalog.grouped() {
        println!("\n{}", category.label(language));
        for service in services {
            println!(
                "  {:<20} {:<40} {:<22} {}",
                service.id,
                service.name(language),
                service.duration,
                SummaryFormatter::format_price(service.price, language)
            );
        }
    }
}

fn print_tree(language: Language) {
    let catalog = ServiceCatalog::clinic();
    let tree = DecisionTree::clinic(&catalog)
        .unwrap_or_else(|e| exit_with_error(&format!("Built-in tree is invalid: {}", e)));
    let paths = tree.paths();
    for path in &paths {
        println!("{}", SummaryFormatter::format_path(path, &catalog, language));
    }
    println!("\n{} questions, {} paths", tree.len(), paths.len());
}

fn validate(catalog_path: Option<String>, tree_path: Option<String>) {
    let catalog = match catalog_path {
        Some(path) => {
            let json = fs::read_to_string(&path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read catalog file '{}': {}", path, e))
            });
            ServiceCatalog::from_json(&json)
                .unwrap_or_else(|e| exit_with_error(&format!("Invalid catalog: {}", e)))
        }
        None => ServiceCatalog::clinic(),
    };

    let definition = match tree_path {
        Some(path) => {
            let json = fs::read_to_string(&path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read tree file '{}': {}", path, e))
            });
            let file: TreeFile = serde_json::from_str(&json)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse tree JSON: {}", e)));
            file.into_tree()
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert tree: {}", e)))
        }
        None => consulta::tree::data::clinic_tree(),
    };

    let tree = DecisionTree::builder(definition, &catalog)
        .build()
        .unwrap_or_else(|e| exit_with_error(&format!("Tree validation failed: {}", e)));

    println!(
        "Tree is valid: {} questions, {} terminal choices, {} services in catalog",
        tree.len(),
        tree.terminal_service_ids().len(),
        catalog.len()
    );
}

/// Runs the four wizard steps against the mock availability.
async fn run_booking(settings: Settings) {
    println!("--- Consulta Booking ---");

    let catalog = Arc::new(ServiceCatalog::clinic());
    let tree = Arc::new(
        DecisionTree::clinic(&catalog)
            .unwrap_or_else(|e| exit_with_error(&format!("Built-in tree is invalid: {}", e))),
    );
    let mut wizard = BookingWizard::new(Arc::clone(&catalog), tree, &settings)
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid settings: {}", e)));
    let lang = wizard.language();

    // --- 1. Service ---
    let direct = loop {
        println!("\nHow would you like to choose a service?");
        println!("  1: Pick from the catalog");
        println!("  2: Answer a few questions");
        match prompt_for_input("Enter choice", Some("2")).as_str() {
            "1" => break true,
            "2" => break false,
            _ => println!("Invalid choice. Please enter 1 or 2."),
        }
    };
    if direct {
        choose_from_catalog(&mut wizard);
    } else {
        walk_tree(&mut wizard);
    }
    advance_or_exit(&mut wizard);

    // --- 2. Patient data ---
    loop {
        for field in PatientField::ALL {
            let current = wizard.patient().get(field).to_string();
            let default = (!current.is_empty()).then_some(current.as_str());
            let value = prompt_for_input(&field.to_string(), default);
            if let Err(e) = wizard.set_patient_field(field, value) {
                exit_with_error(&e.to_string());
            }
        }
        match wizard.advance() {
            Ok(_) => break,
            Err(e) => println!("{}", e),
        }
    }

    // --- 3. Date and time ---
    let availability = MockAvailability::new(wizard.timezone());
    let mut month = (availability.today().year(), availability.today().month());
    loop {
        if let Err(e) = wizard.load_month(&availability, month.0, month.1).await {
            exit_with_error(&format!("Availability could not be loaded: {}", e));
        }
        let has_days = wizard
            .displayed_month()
            .is_some_and(|m| !m.days.is_empty());
        if has_days {
            break;
        }
        month = if month.1 == 12 { (month.0 + 1, 1) } else { (month.0, month.1 + 1) };
    }
    let days: Vec<NaiveDate> = wizard
        .displayed_month()
        .map(|m| m.available_days().collect())
        .unwrap_or_default();
    loop {
        println!("\nAvailable days:");
        for (i, day) in days.iter().enumerate() {
            println!("  {}: {}", i + 1, day.format("%a %d/%m/%Y"));
        }
        let Some(day) = pick_index(&prompt_for_input("Enter day", Some("1")), days.len())
            .map(|i| days[i])
        else {
            println!("Invalid day.");
            continue;
        };
        if let Err(e) = wizard.select_date(day) {
            println!("{}", e);
            continue;
        }
        let slots: Vec<TimeSlot> = wizard
            .availability_for(day)
            .map(|m| m.slots(day).to_vec())
            .unwrap_or_default();
        println!("Available times: {}", itertools::join(&slots, ", "));
        let time = prompt_for_input("Enter time (HH:mm)", slots.first().map(|s| s.to_string()).as_deref());
        match time.parse::<TimeSlot>() {
            Ok(slot) => match wizard.select_time(slot) {
                Ok(()) => break,
                Err(e) => println!("{}", e),
            },
            Err(e) => println!("{}", e),
        }
    }
    advance_or_exit(&mut wizard);

    // --- 4. Confirmation ---
    let payload = wizard
        .payload(chrono::Utc::now())
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));
    println!("\n{}", SummaryFormatter::format_booking(&payload, &catalog));
    let answer = prompt_for_input("Confirm booking? (y/n)", Some("y"));
    if !answer.eq_ignore_ascii_case("y") {
        println!("Booking cancelled.");
        return;
    }

    let backend = WebhookClient::new(&settings)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));
    let store = settings.contact_store_path.clone().map(FileContactStore::new);
    let outcome = wizard
        .confirm(&backend, store.as_ref().map(|s| s as &dyn ContactStore))
        .await
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));

    println!(
        "\n{}",
        match lang {
            Language::Es => "¡Gracias! Tu cita fue agendada.",
            Language::En => "Thank you! Your appointment is booked.",
        }
    );
    if !outcome.is_delivered() {
        tracing::info!("booking was completed locally only");
    }

    // --- Intake form ---
    if let Err(e) = wizard.continue_from_thank_you() {
        exit_with_error(&e.to_string());
    }
    let now = prompt_for_input("Fill in the intake form now? (y/n)", Some("n"));
    if !now.eq_ignore_ascii_case("y") {
        if let Err(e) = wizard.fill_at_clinic() {
            exit_with_error(&e.to_string());
        }
        println!("You can fill in the form at the clinic.");
        return;
    }
    let form = wizard
        .fill_now()
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));
    if let Some(answers) = form.first_time_mut() {
        answers.reason_for_visit = prompt_for_input("Reason for visit", None);
        answers.allergies = prompt_for_input("Allergies", Some(""));
        answers.current_medications = prompt_for_input("Current medications", Some(""));
    } else if let Some(answers) = form.returning_mut() {
        answers.reason_for_visit = prompt_for_input("Reason for visit", None);
        answers.changes_since_last_visit = prompt_for_input("Changes since last visit", Some(""));
    }
    match wizard.submit_intake(&backend).await {
        Ok(_) => println!("Form sent."),
        Err(e) => println!("The form could not be sent: {}", e),
    }
}

fn choose_from_catalog(wizard: &mut BookingWizard) {
    let lang = wizard.language();
    let ids: Vec<String> = wizard.catalog().iter().map(|s| s.id.clone()).collect();
    loop {
        println!();
        for (i, service) in wizard.catalog().iter().enumerate() {
            println!("  {}: {}", i + 1, service.name(lang));
        }
        let choice = prompt_for_input("Enter service", None);
        match pick_index(&choice, ids.len()) {
            Some(i) => match wizard.select_service_by_id(&ids[i]) {
                Ok(()) => return,
                Err(e) => println!("{}", e),
            },
            None => println!("Invalid choice."),
        }
    }
}

fn walk_tree(wizard: &mut BookingWizard) {
    let lang = wizard.language();
    loop {
        let node = wizard.selector().current();
        println!("\n{}", node.question.get(lang));
        for (i, choice) in node.choices.iter().enumerate() {
            let marker = if choice.is_terminal() { "" } else { " >" };
            println!("  {}: {}{}", i + 1, choice.label.get(lang), marker);
        }
        if !wizard.selector().is_at_root() {
            println!("  0: Back");
        }
        let count = node.choices.len();
        let input = prompt_for_input("Enter choice", None);
        if input == "0" {
            if let Err(e) = wizard.tree_go_back() {
                exit_with_error(&e.to_string());
            }
            continue;
        }
        let Some(index) = pick_index(&input, count) else {
            println!("Invalid choice.");
            continue;
        };
        match wizard.select_tree_choice(index) {
            Ok(ChoiceOutcome::Resolved(service)) => {
                println!("-> {}", service.name(lang));
                return;
            }
            Ok(ChoiceOutcome::Advanced(_)) => {}
            Err(e) => println!("{}", e),
        }
    }
}

fn advance_or_exit(wizard: &mut BookingWizard) {
    if let Err(e) = wizard.advance() {
        exit_with_error(&e.to_string());
    }
}

/// Parses a 1-based menu choice into an index.
fn pick_index(input: &str, len: usize) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=len).contains(n))
        .map(|n| n - 1)
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    if io::stdout().flush().is_err() || io::stdin().read_line(&mut line).is_err() {
        exit_with_error("Failed to read from the terminal");
    }
    let trimmed = line.trim().to_string();

    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
