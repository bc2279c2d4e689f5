pub mod forest_local_search;
pub mod fvs_state;
pub mod scoring;

pub use forest_local_search::{ForestLocalSearch, InvalidParams, Phase, SearchParams};
pub use fvs_state::{FlipOutcome, FvsState};
pub use scoring::{ConflictScoring, DegreeScoring, Scoring};
