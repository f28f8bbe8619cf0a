//! Relevance scoring and selection
//!
//! Blacklisted postings are dropped, the rest receive a 0-100 score from
//! four keyword components plus an optional semantic bonus, and the
//! selection gate keeps those at or above the candidate's threshold.

pub mod components;
pub mod keywords;
pub mod profile;
pub mod scorer;
pub mod selection;
pub mod semantic;

pub use keywords::KeywordSet;
pub use profile::CandidateProfile;
pub use scorer::{is_disqualified, RelevanceScorer, ScoreBreakdown, ScoredPosting, ScoringOutcome};
pub use selection::{rank, select};
pub use semantic::{SemanticCapability, SemanticScorer};

/// Scored postings best first, plus the subset that clears the threshold
#[derive(Debug, Default)]
pub struct Selection {
    pub ranked: Vec<ScoredPosting>,
    pub selected: Vec<ScoredPosting>,
    pub disqualified: usize,
}

/// Score every posting and apply the selection gate
pub fn score_and_select(scorer: &RelevanceScorer, postings: Vec<crate::discovery::Posting>) -> Selection {
    let outcome = scorer.score_all(postings);
    let disqualified = outcome.disqualified.len();
    let ranked = rank(outcome.scored, |s| s.breakdown.final_score);
    let selected = select(ranked.clone(), scorer.profile().min_score(), |s| {
        s.breakdown.final_score
    });

    log::info!(
        "Jobs scored: {} | Disqualified: {} | Qualifying (>={}%): {}",
        ranked.len(),
        disqualified,
        scorer.profile().min_score(),
        selected.len()
    );

    Selection {
        ranked,
        selected,
        disqualified,
    }
}
