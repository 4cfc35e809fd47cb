use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use smartbridge_core::{
    config::resolve_icd10_catalogue,
    constants::{DEFAULT_ICD10_SEARCH_LIMIT, MAX_ICD10_SEARCH_LIMIT},
    dispatch_intent, FieldUpdates, FileContextStore, VoiceIntentResult,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "smartbridge")]
#[command(about = "SmartBridge clinic record CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// ICD-10 coding
    Icd10 {
        #[command(subcommand)]
        command: Icd10Commands,
    },
    /// Dispatch a transcript offline, without calling the AI flow
    Intent {
        /// Transcribed voice command
        transcript: String,
        /// Field updates as a JSON object, e.g. '{"patient.heartRate": 72}'
        #[arg(long)]
        fields: Option<String>,
    },
    /// List patient ids under PATIENT_DATA_DIR
    Patients,
}

#[derive(Subcommand)]
enum Icd10Commands {
    /// Resolve a diagnosis phrase or code to one ICD-10 code
    Lookup {
        /// Diagnosis text or code
        text: String,
    },
    /// Search codes and descriptions
    Search {
        /// Substring to search for (omit to browse)
        query: Option<String>,
        /// Maximum number of results
        #[arg(long, default_value_t = DEFAULT_ICD10_SEARCH_LIMIT)]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Icd10 { command }) => {
            let catalogue = resolve_icd10_catalogue(
                std::env::var("SMARTBRIDGE_ICD10_PATH")
                    .ok()
                    .filter(|p| !p.trim().is_empty())
                    .map(PathBuf::from),
            )?;
            match command {
                Icd10Commands::Lookup { text } => {
                    match catalogue.lookup_entry(Some(text.as_str())) {
                        Some(entry) => println!("{}  {}", entry.code, entry.description),
                        None => println!("No ICD-10 match for \"{}\"", text),
                    }
                }
                Icd10Commands::Search { query, limit } => {
                    let entries = catalogue.search(
                        query.as_deref().unwrap_or_default(),
                        limit.min(MAX_ICD10_SEARCH_LIMIT),
                    );
                    if entries.is_empty() {
                        println!("No entries found.");
                    }
                    for entry in entries {
                        println!("{:<8}{}", entry.code, entry.description);
                    }
                }
            }
        }
        Some(Commands::Intent { transcript, fields }) => {
            let fields = parse_fields(fields.as_deref())?;
            for key in fields.unrecognised() {
                eprintln!("Ignoring unrecognised field: {}", key);
            }
            let decision = dispatch_intent(&transcript, &fields);
            let result = VoiceIntentResult::from_decision(decision, None);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Some(Commands::Patients) => {
            let dir = std::env::var("PATIENT_DATA_DIR")
                .unwrap_or_else(|_| smartbridge_core::DEFAULT_PATIENT_DATA_DIR.into());
            let patients = FileContextStore::new(dir).list_patients()?;
            if patients.is_empty() {
                println!("No patients found.");
            } else {
                for id in patients {
                    println!("{}", id);
                }
            }
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn parse_fields(raw: Option<&str>) -> anyhow::Result<FieldUpdates> {
    let Some(raw) = raw else {
        return Ok(FieldUpdates::new());
    };
    let map: Map<String, Value> =
        serde_json::from_str(raw).context("--fields must be a JSON object")?;
    Ok(FieldUpdates::from_map(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;
    use smartbridge_core::{FieldKey, VoiceAction};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_intent_with_fields() {
        let cli = Cli::parse_from([
            "smartbridge",
            "intent",
            "temperature is up",
            "--fields",
            r#"{"patient.temperature": 38.2}"#,
        ]);
        let Some(Commands::Intent { transcript, fields }) = cli.command else {
            panic!("expected intent command");
        };
        let fields = parse_fields(fields.as_deref()).expect("fields");
        assert_eq!(fields.get(FieldKey::Temperature), Some(&json!(38.2)));

        let decision = dispatch_intent(&transcript, &fields);
        assert_eq!(decision.action, VoiceAction::AddVitalSigns);
        assert_eq!(decision.payload, json!({"temp": 38.2}));
    }

    #[test]
    fn rejects_non_object_fields() {
        assert!(parse_fields(Some("[1, 2]")).is_err());
        assert!(parse_fields(None).expect("no fields").is_empty());
    }

    #[test]
    fn search_limit_defaults() {
        let cli = Cli::parse_from(["smartbridge", "icd10", "search"]);
        let Some(Commands::Icd10 {
            command: Icd10Commands::Search { query, limit },
        }) = cli.command
        else {
            panic!("expected icd10 search");
        };
        assert_eq!(query, None);
        assert_eq!(limit, DEFAULT_ICD10_SEARCH_LIMIT);
    }
}
