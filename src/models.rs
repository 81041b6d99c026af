//! Domain model for a single tracked student. The type stays a light-weight
//! data holder; the roster aggregates it and the store serializes it, so the
//! only rule enforced here is the grade range.

use std::fmt;

use thiserror::Error;

/// Lowest grade the tracker accepts.
pub const MIN_GRADE: i32 = 0;
/// Highest grade the tracker accepts.
pub const MAX_GRADE: i32 = 100;

/// Raised when a grade falls outside `MIN_GRADE..=MAX_GRADE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Grade must be between {} and {} (got {value}).", MIN_GRADE, MAX_GRADE)]
pub struct InvalidGradeError {
    /// The rejected input, echoed back in the message.
    pub value: i32,
}

/// Check a raw grade against the accepted range.
pub fn validate_grade(value: i32) -> Result<i32, InvalidGradeError> {
    if (MIN_GRADE..=MAX_GRADE).contains(&value) {
        Ok(value)
    } else {
        Err(InvalidGradeError { value })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A student and the grades recorded for them, oldest first.
pub struct Student {
    /// Display name. Case is preserved for rendering and storage, but lookups
    /// go through `matches_name` so "alice" finds "Alice".
    name: String,
    /// Grades in the order they were entered.
    grades: Vec<i32>,
}

impl Student {
    /// Create a student with no grades yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            grades: Vec::new(),
        }
    }

    /// Name exactly as entered, used for rendering and storage.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read-only view of the recorded grades. Writes go through `add_grade`
    /// so the range check cannot be bypassed.
    pub fn grades(&self) -> &[i32] {
        &self.grades
    }

    /// Append a grade after validating it. A rejected value leaves the grade
    /// list untouched.
    pub fn add_grade(&mut self, value: i32) -> Result<(), InvalidGradeError> {
        self.grades.push(validate_grade(value)?);
        Ok(())
    }

    /// Arithmetic mean of all grades, or `0.0` when none have been recorded.
    pub fn average_grade(&self) -> f64 {
        if self.grades.is_empty() {
            return 0.0;
        }
        let total: i64 = self.grades.iter().map(|&grade| i64::from(grade)).sum();
        total as f64 / self.grades.len() as f64
    }

    /// Case-insensitive name comparison used for lookup and removal.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// A student displays as their name, so it can be dropped straight into
/// status messages and log fields.
impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_of_recorded_grades() {
        let mut student = Student::new("Alice");
        for grade in [90, 80, 75] {
            student.add_grade(grade).unwrap();
        }
        assert!((student.average_grade() - 81.666_666).abs() < 1e-4);
    }

    #[test]
    fn test_average_without_grades_is_zero() {
        let student = Student::new("Bob");
        assert_eq!(student.average_grade(), 0.0);
        assert!(student.grades().is_empty());
    }

    #[test]
    fn test_add_grade_accepts_bounds() {
        let mut student = Student::new("Carol");
        student.add_grade(0).unwrap();
        student.add_grade(100).unwrap();
        assert_eq!(student.grades(), &[0, 100]);
    }

    #[test]
    fn test_add_grade_rejects_out_of_range() {
        let mut student = Student::new("Dan");
        student.add_grade(50).unwrap();

        assert_eq!(student.add_grade(-1), Err(InvalidGradeError { value: -1 }));
        assert_eq!(
            student.add_grade(101),
            Err(InvalidGradeError { value: 101 })
        );
        assert_eq!(student.grades(), &[50]);
    }

    #[test]
    fn test_matches_name_ignores_case() {
        let student = Student::new("Alice");
        assert!(student.matches_name("alice"));
        assert!(student.matches_name("ALICE"));
        assert!(!student.matches_name("Alicia"));
        assert_eq!(student.to_string(), "Alice");
    }

    #[test]
    fn test_invalid_grade_message() {
        let err = InvalidGradeError { value: 150 };
        assert_eq!(
            err.to_string(),
            "Grade must be between 0 and 100 (got 150)."
        );
    }
}
