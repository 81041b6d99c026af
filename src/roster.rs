//! The roster owns every student for a session and answers the class-wide
//! questions the UI asks: averages, extremes, and the plain-text reports shown
//! in the main view.

use std::fmt::Write as _;

use crate::models::{validate_grade, InvalidGradeError, Student};

/// Text rendered in place of the table when no students exist.
pub const NO_DATA_MESSAGE: &str = "No student data available.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Every student tracked in a session. The roster is the only owner of the
/// list; callers read it through `students()` and change it through the
/// methods below so grade validation cannot be bypassed.
pub struct Roster {
    /// Students in insertion order. Names may repeat; see `remove_student`.
    students: Vec<Student>,
}

impl Roster {
    /// Start an empty roster, as a fresh session or a missing data file does.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from an already ordered list, e.g. after decoding a file.
    pub fn from_students(students: Vec<Student>) -> Self {
        Self { students }
    }

    /// Read-only view of the students in insertion order.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// Number of entries, counting duplicate names separately.
    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Append a student. Names are not checked for uniqueness here.
    pub fn add_student(&mut self, student: Student) {
        self.students.push(student);
    }

    /// Remove every student whose name matches case-insensitively. Returns
    /// `true` when at least one entry was dropped.
    pub fn remove_student(&mut self, name: &str) -> bool {
        let before = self.students.len();
        self.students.retain(|student| !student.matches_name(name));
        self.students.len() != before
    }

    /// First student whose name matches case-insensitively.
    pub fn find_student(&self, name: &str) -> Option<&Student> {
        self.students.iter().find(|student| student.matches_name(name))
    }

    /// Mutable form of `find_student`, scoped to a single student.
    pub fn find_student_mut(&mut self, name: &str) -> Option<&mut Student> {
        self.students
            .iter_mut()
            .find(|student| student.matches_name(name))
    }

    /// Record a grade for `name`, creating the student on first use. The grade
    /// is validated before anything is created so a rejected entry never
    /// leaves an empty student behind.
    pub fn record_grade(&mut self, name: &str, value: i32) -> Result<&Student, InvalidGradeError> {
        let value = validate_grade(value)?;
        let idx = match self
            .students
            .iter()
            .position(|student| student.matches_name(name))
        {
            Some(idx) => idx,
            None => {
                self.students.push(Student::new(name));
                self.students.len() - 1
            }
        };
        let student = &mut self.students[idx];
        student.add_grade(value)?;
        Ok(&*student)
    }

    /// Mean of each graded student's own average. Students without grades do
    /// not count towards the denominator.
    pub fn overall_average(&self) -> f64 {
        let averages: Vec<f64> = self
            .students
            .iter()
            .filter(|student| !student.grades().is_empty())
            .map(Student::average_grade)
            .collect();

        if averages.is_empty() {
            0.0
        } else {
            averages.iter().sum::<f64>() / averages.len() as f64
        }
    }

    /// Highest individual grade across all students, or 0 without grades.
    pub fn highest_grade(&self) -> i32 {
        self.all_grades().max().unwrap_or(0)
    }

    /// Lowest individual grade across all students, or 0 without grades.
    pub fn lowest_grade(&self) -> i32 {
        self.all_grades().min().unwrap_or(0)
    }

    fn all_grades(&self) -> impl Iterator<Item = i32> + '_ {
        self.students
            .iter()
            .flat_map(|student| student.grades().iter().copied())
    }

    /// Fixed-width table with one line per student.
    pub fn render_roster(&self) -> String {
        if self.students.is_empty() {
            return NO_DATA_MESSAGE.to_string();
        }

        let mut report = String::new();
        for student in &self.students {
            let _ = writeln!(
                report,
                "Student: {:<15} | Grades: {:<20} | Average: {:.2}",
                student.name(),
                format_grades(student.grades()),
                round_half_up(student.average_grade())
            );
        }
        report
    }

    /// The roster table followed by the class statistics block. An empty
    /// roster yields only the no-data message.
    pub fn render_summary(&self) -> String {
        if self.students.is_empty() {
            return self.render_roster();
        }

        let mut report = self.render_roster();
        report.push_str("\n--- Overall Class Statistics ---\n");
        let _ = writeln!(
            report,
            "Overall Class Average: {:.2}",
            round_half_up(self.overall_average())
        );
        let _ = writeln!(report, "Highest Grade in Class: {}", self.highest_grade());
        let _ = writeln!(report, "Lowest Grade in Class: {}", self.lowest_grade());
        report.push_str("------------------------------------\n");
        report
    }
}

/// Round to two decimals with ties going up, so `{:.2}` never meets an exact
/// half and averages like 0.125 print as 0.13.
fn round_half_up(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render grades as `[90, 80]`.
fn format_grades(grades: &[i32]) -> String {
    let joined = grades
        .iter()
        .map(|grade| grade.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{joined}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(name: &str, grades: &[i32]) -> Student {
        let mut student = Student::new(name);
        for &grade in grades {
            student.add_grade(grade).unwrap();
        }
        student
    }

    fn roster(entries: &[(&str, &[i32])]) -> Roster {
        let mut roster = Roster::new();
        for (name, grades) in entries {
            roster.add_student(student(name, grades));
        }
        roster
    }

    #[test]
    fn test_overall_average_is_mean_of_means() {
        let roster = roster(&[
            ("A", &[70]),
            ("B", &[80, 80]),
            ("C", &[100, 80]),
            ("Empty", &[]),
        ]);
        assert!((roster.overall_average() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_overall_average_differs_from_flat_mean() {
        // Flat mean would be (100 + 50 + 50 + 50) / 4 = 62.5.
        let roster = roster(&[("A", &[100]), ("B", &[50, 50, 50])]);
        assert!((roster.overall_average() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_highest_and_lowest_use_raw_grades() {
        let roster = roster(&[("A", &[90, 80]), ("B", &[100, 60])]);
        assert_eq!(roster.highest_grade(), 100);
        assert_eq!(roster.lowest_grade(), 60);
    }

    #[test]
    fn test_statistics_without_grades() {
        let empty = Roster::new();
        assert_eq!(empty.overall_average(), 0.0);
        assert_eq!(empty.highest_grade(), 0);
        assert_eq!(empty.lowest_grade(), 0);

        let ungraded = roster(&[("A", &[]), ("B", &[])]);
        assert_eq!(ungraded.overall_average(), 0.0);
        assert_eq!(ungraded.highest_grade(), 0);
        assert_eq!(ungraded.lowest_grade(), 0);
    }

    #[test]
    fn test_remove_student_ignores_case_and_removes_duplicates() {
        let mut roster = roster(&[("Alice", &[90]), ("Bob", &[70]), ("ALICE", &[60])]);
        assert!(roster.remove_student("alice"));
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.students()[0].name(), "Bob");
    }

    #[test]
    fn test_remove_absent_student_is_noop() {
        let mut roster = roster(&[("Alice", &[90])]);
        let before = roster.clone();
        assert!(!roster.remove_student("Zed"));
        assert_eq!(roster, before);
    }

    #[test]
    fn test_add_student_keeps_duplicates_in_order() {
        let roster = roster(&[("Alice", &[1]), ("alice", &[2])]);
        let names: Vec<&str> = roster.students().iter().map(Student::name).collect();
        assert_eq!(names, vec!["Alice", "alice"]);
    }

    #[test]
    fn test_record_grade_creates_then_reuses_student() {
        let mut roster = Roster::new();
        roster.record_grade("Alice", 90).unwrap();
        let alice = roster.record_grade("alice", 70).unwrap();
        assert_eq!(alice.name(), "Alice");
        assert_eq!(alice.grades(), &[90, 70]);
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_record_grade_rejects_without_creating_student() {
        let mut roster = Roster::new();
        assert_eq!(
            roster.record_grade("Ghost", 120).unwrap_err(),
            InvalidGradeError { value: 120 }
        );
        assert!(roster.is_empty());
        assert!(roster.find_student("ghost").is_none());
    }

    #[test]
    fn test_find_student_mut_allows_adding_grades() {
        let mut roster = roster(&[("Alice", &[])]);
        roster
            .find_student_mut("ALICE")
            .unwrap()
            .add_grade(88)
            .unwrap();
        assert_eq!(roster.find_student("alice").unwrap().grades(), &[88]);
    }

    #[test]
    fn test_render_roster_layout() {
        let roster = roster(&[("Alice", &[90, 80]), ("Bob", &[])]);
        let expected = concat!(
            "Student: Alice           | Grades: [90, 80]             | Average: 85.00\n",
            "Student: Bob             | Grades: []                   | Average: 0.00\n",
        );
        assert_eq!(roster.render_roster(), expected);
    }

    #[test]
    fn test_render_roster_long_values_are_not_truncated() {
        let roster = roster(&[("Maximilian Longname", &[100, 100, 100, 100, 100])]);
        assert_eq!(
            roster.render_roster(),
            "Student: Maximilian Longname | Grades: [100, 100, 100, 100, 100] | Average: 100.00\n"
        );
    }

    #[test]
    fn test_averages_round_half_up() {
        let roster = roster(&[("Eve", &[1, 0, 0, 0, 0, 0, 0, 0])]);
        assert!(roster.render_roster().ends_with("| Average: 0.13\n"));
        assert!(roster
            .render_summary()
            .contains("Overall Class Average: 0.13\n"));

        // 645 / 8 = 80.625
        let finn = self::roster(&[("Finn", &[80, 80, 80, 80, 80, 80, 85, 80])]);
        assert!(finn.render_roster().ends_with("| Average: 80.63\n"));
    }

    #[test]
    fn test_render_summary_appends_statistics() {
        let roster = roster(&[("Alice", &[90, 80]), ("Bob", &[100, 60])]);
        let summary = roster.render_summary();
        assert!(summary.starts_with(&roster.render_roster()));
        assert!(summary.ends_with(concat!(
            "\n--- Overall Class Statistics ---\n",
            "Overall Class Average: 82.50\n",
            "Highest Grade in Class: 100\n",
            "Lowest Grade in Class: 60\n",
            "------------------------------------\n",
        )));
    }

    #[test]
    fn test_empty_roster_reports_sentinel_only() {
        let roster = Roster::new();
        assert_eq!(roster.render_roster(), NO_DATA_MESSAGE);
        assert_eq!(roster.render_summary(), NO_DATA_MESSAGE);
    }
}
