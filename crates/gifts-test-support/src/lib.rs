//! Shared test doubles for the spiritual gifts assessment.

mod clock;
mod narrative;

pub use clock::FixedClock;
pub use narrative::{
    FailingNarrativeClient, GatedNarrativeClient, ScriptedNarrativeClient, sample_narrative,
};
