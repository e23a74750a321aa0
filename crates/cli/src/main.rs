use clap::{Parser, Subcommand};
use sidia_core::{
    analyze_symptoms, diagnose_strict, Catalog, CoreConfig, DiagnosisProvider, DiagnosisResult,
    HistoryLog, HistoryService, JsonFileStore, NonEmptyText, SymptomList, DEFAULT_HISTORY_DIR,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "sidia")]
#[command(about = "SIDIA symptom-to-disease lookup CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List every symptom known to the catalog
    Symptoms,
    /// List the diseases in the catalog
    Diseases,
    /// Rank catalog diseases by how many of their symptoms match
    Analyze {
        /// Symptoms, e.g. `demam batuk "sakit kepala"`
        #[arg(required = true)]
        symptoms: Vec<String>,
        /// Save the best match to history under this patient name
        #[arg(long)]
        save: Option<String>,
    },
    /// Find the first disease whose symptoms are all present
    Strict {
        #[arg(required = true)]
        symptoms: Vec<String>,
    },
    /// Ask the configured AI provider for a diagnosis
    Diagnose {
        #[arg(required = true)]
        symptoms: Vec<String>,
        /// Print the raw JSON result list
        #[arg(long)]
        json: bool,
    },
    /// Inspect or clear the diagnosis history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List all entries, newest first
    List,
    /// Search by patient name, disease name or date
    Search { query: String },
    /// Remove all entries
    Clear,
}

fn history_dir() -> PathBuf {
    std::env::var("SIDIA_HISTORY_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_HISTORY_DIR))
}

fn print_results(results: &[DiagnosisResult]) {
    if results.is_empty() {
        println!("No matching diseases.");
        return;
    }
    for (rank, result) in results.iter().enumerate() {
        let name = result.disease_name().unwrap_or("(no match)");
        println!(
            "{}. {} - {}/{} symptoms ({:.0}%)",
            rank + 1,
            name,
            result.match_count,
            result.total_symptoms,
            result.score() * 100.0
        );
        if let Some(advice) = result.disease.as_ref().map(|d| d.advice.as_str()) {
            if !advice.is_empty() {
                println!("   Saran: {}", advice);
            }
        }
    }
}

fn print_logs(logs: &[HistoryLog]) {
    if logs.is_empty() {
        println!("No history entries found.");
        return;
    }
    for log in logs {
        println!(
            "{} | {} | {} | {}",
            log.timestamp.format("%d/%m/%Y %H:%M"),
            log.patient_name,
            log.result.disease_name().unwrap_or("(no match)"),
            log.id
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let catalog = Catalog::builtin();

    match cli.command {
        Some(Commands::Symptoms) => {
            for symptom in catalog.all_symptoms() {
                println!("{}", symptom);
            }
        }
        Some(Commands::Diseases) => {
            for disease in catalog.diseases() {
                println!("{}: {}", disease.name, disease.all_symptoms.join(", "));
            }
        }
        Some(Commands::Analyze { symptoms, save }) => {
            let symptoms = SymptomList::new(symptoms)?.to_vec();
            let results = analyze_symptoms(catalog, &symptoms);
            print_results(&results);

            if let Some(patient) = save {
                let patient = NonEmptyText::new(patient)?;
                match results.into_iter().next() {
                    Some(best) => {
                        let store = JsonFileStore::create(history_dir())?;
                        let log = HistoryService::new(Arc::new(store)).append(best, &patient)?;
                        println!("Saved to history with ID: {}", log.id);
                    }
                    None => eprintln!("Nothing to save: no disease matched."),
                }
            }
        }
        Some(Commands::Strict { symptoms }) => {
            let symptoms = SymptomList::new(symptoms)?.to_vec();
            match diagnose_strict(catalog, &symptoms) {
                Some(disease) => println!("{}: {}\nSaran: {}", disease.name, disease.description, disease.advice),
                None => println!("No disease matches all of its symptoms."),
            }
        }
        Some(Commands::Diagnose { symptoms, json }) => {
            let symptoms = SymptomList::new(symptoms)?;
            let cfg = CoreConfig::from_lookup(|key| std::env::var(key).ok())?;
            let provider = DiagnosisProvider::from_settings(cfg.provider())?;
            match provider.request_diagnosis(&symptoms).await {
                Ok(results) if json => println!("{}", serde_json::to_string_pretty(&results)?),
                Ok(results) => print_results(&results),
                Err(e) => eprintln!("Error requesting diagnosis: {}", e),
            }
        }
        Some(Commands::History { action }) => {
            let service = HistoryService::new(Arc::new(JsonFileStore::new(history_dir())));
            match action {
                HistoryAction::List => match service.list_all() {
                    Ok(logs) => print_logs(&logs),
                    Err(e) => eprintln!("Error reading history: {}", e),
                },
                HistoryAction::Search { query } => match service.search(&query) {
                    Ok(logs) => print_logs(&logs),
                    Err(e) => eprintln!("Error searching history: {}", e),
                },
                HistoryAction::Clear => match service.clear() {
                    Ok(()) => println!("History cleared."),
                    Err(e) => eprintln!("Error clearing history: {}", e),
                },
            }
        }
        None => {
            println!("Use 'sidia --help' for commands");
        }
    }

    Ok(())
}
