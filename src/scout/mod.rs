pub mod filters;

pub use filters::{
    evaluate, prefilter, Candidate, StatsSummary, FIRST_HALF_SNIPER_CODE,
};
