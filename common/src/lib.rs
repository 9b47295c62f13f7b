//! Ride-Along Checklist Common Library
//!
//! CLIとWeb(WASM)で共有される型とユーティリティ

pub mod outline;
pub mod state;
pub mod stats;
pub mod snapshot;
pub mod storage;
pub mod session;
pub mod report;
pub mod error;

pub use outline::{Outline, Section, OVERALL_NOTE_KEY};
pub use state::{Checklist, CompletionState, EvaluationMeta, MetaField, NotesState};
pub use stats::{SectionProgress, Statistics};
pub use snapshot::{PersistedSnapshot, SnapshotMeta};
pub use session::Session;
pub use storage::{KeyValueStore, MemoryStore, SnapshotStore, STORAGE_KEY};
pub use report::{export_file_name, format_report, mail_subject, mailto_link};
pub use error::{Error, Result};
