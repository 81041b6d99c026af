use thiserror::Error;

use crate::models::{InvalidGradeError, Student};

/// Separates the name from each grade on a record line. Names containing it
/// cannot be stored; the format has no escaping.
pub const DELIMITER: char = ',';

/// What was wrong with a single record line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordFault {
    #[error("record has no student name")]
    MissingName,
    #[error("grade {field:?} is not an integer")]
    NotAnInteger { field: String },
    #[error(transparent)]
    OutOfRange(#[from] InvalidGradeError),
}

/// A record line that could not be decoded. `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {fault}")]
pub struct MalformedRecordError {
    pub line: usize,
    pub fault: RecordFault,
}

/// Encode students as `name,grade,grade,...` lines, one per student.
pub fn serialize(students: &[Student]) -> String {
    let mut text = String::new();
    for student in students {
        text.push_str(student.name());
        for grade in student.grades() {
            text.push(DELIMITER);
            text.push_str(&grade.to_string());
        }
        text.push('\n');
    }
    text
}

/// Decode every record, failing on the first malformed line.
pub fn deserialize(text: &str) -> Result<Vec<Student>, MalformedRecordError> {
    records(text).collect()
}

/// Decode what can be decoded, returning the rejected lines alongside.
pub fn deserialize_lenient(text: &str) -> (Vec<Student>, Vec<MalformedRecordError>) {
    let mut students = Vec::new();
    let mut rejected = Vec::new();
    for record in records(text) {
        match record {
            Ok(student) => students.push(student),
            Err(err) => rejected.push(err),
        }
    }
    (students, rejected)
}

fn records(text: &str) -> impl Iterator<Item = Result<Student, MalformedRecordError>> + '_ {
    text.lines()
        .enumerate()
        // A line of nothing but delimiters holds no record at all.
        .filter(|(_, line)| !line.trim().trim_end_matches(DELIMITER).is_empty())
        .map(|(idx, line)| {
            parse_record(line).map_err(|fault| MalformedRecordError {
                line: idx + 1,
                fault,
            })
        })
}

fn parse_record(line: &str) -> Result<Student, RecordFault> {
    // Trailing delimiters carry no grades.
    let mut fields = line.trim_end_matches(DELIMITER).split(DELIMITER);
    let name = match fields.next() {
        Some(name) if !name.trim().is_empty() => name,
        _ => return Err(RecordFault::MissingName),
    };

    let mut student = Student::new(name);
    for field in fields {
        let grade = field
            .parse::<i32>()
            .map_err(|_| RecordFault::NotAnInteger {
                field: field.to_string(),
            })?;
        student.add_grade(grade)?;
    }
    Ok(student)
}
