pub mod config;
pub mod error;
pub mod flow;
pub mod preferences;
pub mod presenter;
pub mod recommend;
pub mod session;

pub use error::{PreferenceStoreError, RecommendError};
pub use flow::{OutcomeDisposition, RequestGeneration, SubmitTicket, ViewPhase, ViewStateMachine};
pub use preferences::{PreferenceStore, PREFERENCES_STORAGE_KEY};
pub use presenter::ResultRow;
pub use recommend::{RecommendationClient, RecommendationOutcome, RecommendationService};
pub use session::{RecommendationSession, SessionEvent};
