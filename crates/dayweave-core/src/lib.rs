//! # Dayweave Core Library
//!
//! This library provides the core business logic for the Dayweave task
//! assistant: deciding, for a given day, which pending memos deserve the
//! user's attention, how urgent and important each one is, how long a
//! working session should be, and which of the day's free-time gaps each
//! memo should be assigned to. It implements a CLI-first philosophy where
//! all operations are available via a standalone CLI binary, with any GUI
//! being a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Period Tracker**: lazy, idempotent day/period rollover of memo state
//! - **Need Calculator**: continuous urgency scores comparable across kinds
//! - **Duration Predictor**: adaptive expected-duration curves for deadline
//!   memos, learned from completed sessions
//! - **Suggestion Builder**: scored candidates with visibility/mandatory
//!   thresholds
//! - **Gap Allocator**: deterministic greedy best-fit of suggestions into
//!   the day's free-time gaps
//! - **Reactions**: accept/reject/complete/undo applied to memo state
//!
//! ## Key Components
//!
//! - [`SuggestionEngine`]: the scheduling pipeline over a memo store
//! - [`Memo`]: a tracked task with its kind-specific state record
//! - [`GapAllocator`]: suggestion-to-gap assignment
//! - [`MemoStore`]: persistence seam, with in-memory and SQLite backings

pub mod allocator;
pub mod config;
pub mod engine;
pub mod enrich;
pub mod error;
pub mod memo;
pub mod need;
pub mod period;
pub mod predictor;
pub mod reaction;
pub mod storage;
pub mod suggestion;

pub use allocator::{AllocationResult, Gap, GapAllocator, GapLocation, Placement};
pub use config::EngineConfig;
pub use engine::{DayPlan, GapProvider, ReactionOutcome, SuggestionEngine};
pub use enrich::{Enrichment, EnrichmentUnavailable, FallbackEnricher, MemoDraft, MemoEnricher};
pub use error::{EngineError, IntegrityError, InvalidReaction, StorageError};
pub use memo::{
    AcceptedSlot, BacklogState, DeadlineState, Importance, LastReaction, LocationPreference,
    Memo, MemoKind, MemoState, RecurrenceGoal, RecurrencePeriod, RoutineState,
};
pub use need::NeedCalculator;
pub use predictor::DurationPredictor;
pub use reaction::{Reaction, ReactionHandler};
pub use storage::{MemoDb, MemoStore, MemoryStore};
pub use suggestion::{Suggestion, SuggestionBuilder};
