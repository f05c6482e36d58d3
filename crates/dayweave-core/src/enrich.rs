//! Memo creation and field enrichment.
//!
//! New memos often arrive with only a title and a kind. The external
//! enrichment collaborator fills in genre, importance and duration
//! estimates; it is called once at creation, and a failure never blocks
//! the memo. Missing fields fall back to deterministic, kind-appropriate
//! defaults so a scheduling pass always has numbers to work with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::memo::{
    BacklogState, DeadlineState, Importance, LocationPreference, Memo, MemoKind, MemoState,
    RecurrenceGoal, RoutineState,
};

/// Fields the enrichment collaborator can supply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    pub genre: Option<String>,
    pub importance: Importance,
    pub session_minutes: u32,
    pub total_minutes_expected: u32,
}

/// External enrichment service.
///
/// Implementations may call out to a language model; the engine only sees
/// the result or the failure.
pub trait MemoEnricher {
    fn enrich(&self, draft: &MemoDraft) -> Result<Enrichment, EnrichmentUnavailable>;
}

/// The enrichment collaborator failed or timed out.
///
/// Recovered locally via fallback values; never surfaced to the user.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Enrichment unavailable: {reason}")]
pub struct EnrichmentUnavailable {
    pub reason: String,
}

/// Enricher that always answers with the deterministic defaults.
#[derive(Debug, Clone, Default)]
pub struct FallbackEnricher;

impl MemoEnricher for FallbackEnricher {
    fn enrich(&self, draft: &MemoDraft) -> Result<Enrichment, EnrichmentUnavailable> {
        Ok(fallback_enrichment(draft.kind))
    }
}

/// Kind-appropriate defaults used when enrichment fails or is absent.
pub fn fallback_enrichment(kind: MemoKind) -> Enrichment {
    match kind {
        MemoKind::Deadline => Enrichment {
            genre: None,
            importance: Importance::Medium,
            session_minutes: 30,
            total_minutes_expected: 150,
        },
        MemoKind::Routine => Enrichment {
            genre: None,
            importance: Importance::Medium,
            session_minutes: 25,
            total_minutes_expected: 25,
        },
        MemoKind::Backlog => Enrichment {
            genre: None,
            importance: Importance::Low,
            session_minutes: 25,
            total_minutes_expected: 50,
        },
    }
}

/// Input for creating a memo. Unset estimate fields are enriched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoDraft {
    pub title: String,
    pub kind: MemoKind,
    /// Required for deadline memos.
    pub deadline: Option<chrono::NaiveDate>,
    /// Required for routine memos.
    pub recurrence_goal: Option<RecurrenceGoal>,
    #[serde(default)]
    pub location: LocationPreference,
    pub session_minutes: Option<u32>,
    pub total_minutes_expected: Option<u32>,
    pub importance: Option<Importance>,
    #[serde(default)]
    pub genre: Option<String>,
}

impl MemoDraft {
    pub fn new(title: impl Into<String>, kind: MemoKind) -> Self {
        Self {
            title: title.into(),
            kind,
            deadline: None,
            recurrence_goal: None,
            location: LocationPreference::None,
            session_minutes: None,
            total_minutes_expected: None,
            importance: None,
            genre: None,
        }
    }

    /// Whether any field still needs the enrichment collaborator.
    pub fn needs_enrichment(&self) -> bool {
        self.session_minutes.is_none()
            || self.total_minutes_expected.is_none()
            || self.importance.is_none()
    }
}

/// Build a memo from a draft, consulting `enricher` for missing fields.
///
/// User-set draft fields always win over enrichment. An enrichment failure
/// is logged and absorbed by the defaults; creation never fails.
pub fn create_memo<E: MemoEnricher>(
    draft: MemoDraft,
    enricher: &E,
    now: DateTime<Utc>,
) -> Memo {
    let enrichment = if draft.needs_enrichment() {
        match enricher.enrich(&draft) {
            Ok(e) => e,
            Err(err) => {
                warn!(title = %draft.title, %err, "enrichment failed, using defaults");
                fallback_enrichment(draft.kind)
            }
        }
    } else {
        fallback_enrichment(draft.kind)
    };

    let session_minutes = draft
        .session_minutes
        .unwrap_or(enrichment.session_minutes)
        .max(1);
    let total_minutes_expected = draft
        .total_minutes_expected
        .unwrap_or(enrichment.total_minutes_expected)
        .max(session_minutes);
    let importance = draft.importance.unwrap_or(enrichment.importance);
    let genre = draft.genre.or(enrichment.genre);

    let today = now.date_naive();
    let state = match draft.kind {
        MemoKind::Deadline => {
            let deadline = draft.deadline.unwrap_or(today);
            MemoState::Deadline(DeadlineState::new(today, deadline.max(today), session_minutes))
        }
        MemoKind::Routine => {
            let period = draft
                .recurrence_goal
                .map(|g| g.period)
                .unwrap_or(crate::memo::RecurrencePeriod::Day);
            MemoState::Routine(RoutineState::new(period.start_of(today)))
        }
        MemoKind::Backlog => MemoState::Backlog(BacklogState::new()),
    };

    Memo {
        id: uuid::Uuid::new_v4().to_string(),
        title: draft.title,
        kind: draft.kind,
        created_at: now,
        deadline: draft.deadline.map(|d| d.max(today)),
        recurrence_goal: draft.recurrence_goal,
        location: draft.location,
        session_minutes,
        total_minutes_expected,
        importance,
        genre,
        last_activity: now,
        suggestion_available_from: None,
        state,
    }
}
