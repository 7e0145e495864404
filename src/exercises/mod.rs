//! Multiple-choice grading. Each exercise accepts exactly one answer.

use tracing::debug;

use crate::core::{
    Exercise,
    LectioError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub selected: usize,
    pub correct: bool,
    pub correct_index: usize,
}

pub fn grade(exercise: &Exercise, selected: usize) -> Result<Outcome, LectioError> {
    if selected >= exercise.options.len() {
        return Err(LectioError::InvalidSelection { selected, options: exercise.options.len() });
    }

    Ok(Outcome { selected, correct: selected == exercise.correct, correct_index: exercise.correct })
}

/// Option letter as printed before each answer: A, B, C...
pub fn option_label(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map(|i| char::from(b'A' + i))
        .unwrap_or('?')
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub graded: usize,
    pub total: usize,
}

/// The exercises of one unit view together with their locks.
#[derive(Debug, Clone)]
pub struct ExerciseSession {
    exercises: Vec<Exercise>,
    outcomes: Vec<Option<Outcome>>,
}

impl ExerciseSession {
    pub fn new(exercises: Vec<Exercise>) -> Self {
        let outcomes = vec![None; exercises.len()];
        Self { exercises, outcomes }
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn grade(&mut self, index: usize, selected: usize) -> Result<Outcome, LectioError> {
        let exercise = self.exercises.get(index).ok_or(LectioError::ExerciseNotFound(index))?;

        if self.outcomes[index].is_some() {
            return Err(LectioError::AlreadyGraded(index));
        }

        let outcome = grade(exercise, selected)?;
        self.outcomes[index] = Some(outcome);

        debug!(exercise = index, selected, correct = outcome.correct, "exercise graded");
        Ok(outcome)
    }

    pub fn outcome(&self, index: usize) -> Option<Outcome> {
        self.outcomes.get(index).copied().flatten()
    }

    pub fn is_locked(&self, index: usize) -> bool {
        self.outcome(index).is_some()
    }

    pub fn score(&self) -> Score {
        let graded = self.outcomes.iter().flatten();
        Score {
            correct: graded.clone().filter(|outcome| outcome.correct).count(),
            graded: graded.count(),
            total: self.exercises.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum_exercise() -> Exercise {
        Exercise {
            question: "2+2?".to_string(),
            options: vec!["3".to_string(), "4".to_string(), "5".to_string()],
            correct: 1,
        }
    }

    #[test]
    fn test_grade_is_pure() {
        let exercise = sum_exercise();

        assert_eq!(
            grade(&exercise, 1).unwrap(),
            Outcome { selected: 1, correct: true, correct_index: 1 }
        );
        assert_eq!(
            grade(&exercise, 0).unwrap(),
            Outcome { selected: 0, correct: false, correct_index: 1 }
        );
        assert!(matches!(
            grade(&exercise, 3),
            Err(LectioError::InvalidSelection { selected: 3, options: 3 })
        ));
    }

    #[test]
    fn test_second_grade_is_rejected() {
        let mut session = ExerciseSession::new(vec![sum_exercise()]);

        let first = session.grade(0, 1).unwrap();
        assert!(first.correct);
        assert_eq!(first.correct_index, 1);

        assert!(matches!(session.grade(0, 0), Err(LectioError::AlreadyGraded(0))));
        assert_eq!(session.outcome(0), Some(first));
        assert!(session.is_locked(0));
    }

    #[test]
    fn test_invalid_selection_does_not_lock() {
        let mut session = ExerciseSession::new(vec![sum_exercise(), sum_exercise()]);

        assert!(session.grade(0, 7).is_err());
        assert!(!session.is_locked(0));

        assert!(!session.grade(1, 2).unwrap().correct);
        assert!(!session.is_locked(0));
        assert!(session.grade(0, 1).unwrap().correct);

        assert!(matches!(session.grade(5, 0), Err(LectioError::ExerciseNotFound(5))));
        assert_eq!(session.score(), Score { correct: 1, graded: 2, total: 2 });
    }

    #[test]
    fn test_option_labels() {
        assert_eq!(option_label(0), 'A');
        assert_eq!(option_label(2), 'C');
        assert_eq!(option_label(25), 'Z');
        assert_eq!(option_label(26), '?');
    }
}
