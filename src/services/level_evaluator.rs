//! Level evaluation - service layer

use crate::models::SkillLevel;

/// Highest correct count still classified as beginner
pub const BEGINNER_MAX_CORRECT: usize = 2;
/// Highest correct count still classified as intermediate
pub const INTERMEDIATE_MAX_CORRECT: usize = 4;

/// Classify quiz outcomes by number of correct answers
///
/// Order and question difficulty are ignored. The thresholds assume the
/// five-question quiz the generation prompt asks for.
pub fn evaluate(outcomes: &[bool]) -> SkillLevel {
    let correct = outcomes.iter().filter(|&&ok| ok).count();

    match correct {
        0..=BEGINNER_MAX_CORRECT => SkillLevel::Beginner,
        c if c <= INTERMEDIATE_MAX_CORRECT => SkillLevel::Intermediate,
        _ => SkillLevel::Advanced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(evaluate(&[false; 5]), SkillLevel::Beginner);
        assert_eq!(evaluate(&[true, true, false, false, false]), SkillLevel::Beginner);
        assert_eq!(evaluate(&[true, true, true, false, false]), SkillLevel::Intermediate);
        assert_eq!(evaluate(&[true, true, true, true, false]), SkillLevel::Intermediate);
        assert_eq!(evaluate(&[true; 5]), SkillLevel::Advanced);
    }

    #[test]
    fn test_order_does_not_matter() {
        assert_eq!(evaluate(&[false, true, false, true, true]), SkillLevel::Intermediate);
        assert_eq!(evaluate(&[false, false, true, true, true]), SkillLevel::Intermediate);
    }

    #[test]
    fn test_degenerate_lengths() {
        assert_eq!(evaluate(&[]), SkillLevel::Beginner);
        assert_eq!(evaluate(&[true; 7]), SkillLevel::Advanced);
    }
}
