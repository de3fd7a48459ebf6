pub mod constants;
pub mod pool;
pub mod reselection;
pub mod sampler;
pub mod weights;

pub use constants::*;
pub use pool::{build_candidate_pool, filter_candidates, recommend, top_tiers_shortlist};
pub use reselection::{Acceptance, Offer, ReselectionSession, ReselectionStep, StepOutcome};
pub use sampler::select_weighted;
pub use weights::{
    apply_weight_adjustment, effective_weight, is_recent, on_negative_feedback,
    on_positive_feedback, on_rejection, record_selection,
};
