//! Skill coverage score: how much of a job's required skill set a candidate
//! declares. The score is directional (job requirements covered by the
//! candidate), case-insensitive, and 0 for a job that lists no skills.

use std::collections::HashSet;
use std::fmt;

use serde::{Serialize, Serializer};

/// Canonical form used for skill comparison; `None` for blank input.
pub fn normalize_skill(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

pub fn skill_set<I, S>(skills: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    skills
        .into_iter()
        .filter_map(|s| normalize_skill(s.as_ref()))
        .collect()
}

/// Percentage in `[0, 100]`, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct MatchScore(f64);

impl MatchScore {
    pub const ZERO: MatchScore = MatchScore(0.0);

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for MatchScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Reported as a two-decimal string, e.g. `"66.67"`.
impl Serialize for MatchScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub fn compute_match_score<J, A, S1, S2>(job_skills: J, applicant_skills: A) -> MatchScore
where
    J: IntoIterator<Item = S1>,
    A: IntoIterator<Item = S2>,
    S1: AsRef<str>,
    S2: AsRef<str>,
{
    let required = skill_set(job_skills);
    if required.is_empty() {
        return MatchScore::ZERO;
    }
    let declared = skill_set(applicant_skills);
    let covered = declared.iter().filter(|s| required.contains(*s)).count();

    let raw = covered as f64 / required.len() as f64 * 100.0;
    MatchScore((raw * 100.0).round() / 100.0)
}
