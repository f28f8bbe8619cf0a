//! Resume tailoring
//!
//! Each selected posting gets its own rewrite of the base resume: JD keywords
//! are extracted, matching skills are moved forward, project bullets are
//! rephrased and the result is scored for ATS keyword coverage. Every
//! generation step has a deterministic fallback, so a tailoring failure only
//! happens when the resume itself cannot be serialised.

pub mod base_resume;
pub mod keywords;
pub mod optimizer;

pub use base_resume::{BaseResume, Education, Project, ResumeHeader, SkillCategories};
pub use keywords::{extract_keywords, JdKeywords};
pub use optimizer::{ats_score, ResumeTailor, ResumeVersion};
