//! # SmartBridge Core
//!
//! Core logic for the SmartBridge clinic record backend.
//!
//! This crate contains:
//! - voice intent dispatch (`intent`): transcript + AI field updates to one application action
//! - the AI flow boundary (`flow`) and its Gemini client
//! - patient context snapshots for prompts (`context`)
//! - startup configuration (`config`)
//!
//! ICD-10 coding lives in the `icd10` crate; this crate only resolves which catalogue to load.
//!
//! **No API concerns**: HTTP servers, routing and OpenAPI docs belong in `api-rest` and
//! `api-shared`.

pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod flow;
pub mod intent;
pub mod service;

pub use config::{CoreConfig, GeminiConfig};
pub use constants::DEFAULT_PATIENT_DATA_DIR;
pub use context::{ContextSource, FileContextStore, SmartContext};
pub use error::{CoreError, CoreResult};
pub use flow::{FlowRequest, FlowResponse, GeminiFlow, VoiceCommandFlow};
pub use intent::{dispatch_intent, FieldKey, FieldUpdates, VoiceAction, VoiceIntentResult};
pub use service::VoiceCommandService;
