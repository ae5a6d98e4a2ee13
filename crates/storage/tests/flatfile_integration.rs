use std::fs;

use pretty_assertions::assert_eq;
use quiz_core::model::{Question, StudentAccount};
use storage::repository::{QuestionRepository, StorageError, StudentRepository};
use storage::{FlatFileRepository, Storage};
use tempfile::TempDir;

fn repo_in(dir: &TempDir) -> FlatFileRepository {
    FlatFileRepository::new(
        dir.path().join("questions.txt"),
        dir.path().join("students.txt"),
    )
}

fn sample_bank() -> Vec<Question> {
    vec![
        Question::multiple_choice("2+2=?", vec!["3".into(), "4".into(), "5".into()], "4"),
        Question::multiple_choice("Largest planet?", vec!["Mars".into(), "Jupiter".into()], "Jupiter"),
        Question::true_false("Sky is blue", "True"),
        Question::true_false("Fire is cold", "False"),
    ]
}

#[test]
fn missing_files_load_as_empty() {
    let dir = TempDir::new().unwrap();
    let repo = repo_in(&dir);

    let loaded = repo.load_questions().unwrap();
    assert!(loaded.questions.is_empty());
    assert!(!loaded.truncated);
    assert!(loaded.interrupted.is_none());
    assert!(repo.load_students().unwrap().students.is_empty());
}

#[test]
fn loads_hand_written_bank_without_record_separators() {
    let dir = TempDir::new().unwrap();
    let repo = repo_in(&dir);
    fs::write(
        repo.questions_path(),
        "MCQ\n2+2=?\n3\n4\n5\n\n4\nTrueFalse\nSky is blue\nTrue\n",
    )
    .unwrap();

    let loaded = repo.load_questions().unwrap();
    assert_eq!(
        loaded.questions,
        vec![
            Question::multiple_choice("2+2=?", vec!["3".into(), "4".into(), "5".into()], "4"),
            Question::true_false("Sky is blue", "True"),
        ]
    );
}

#[test]
fn saved_bank_reloads_identically() {
    let dir = TempDir::new().unwrap();
    let repo = repo_in(&dir);

    repo.save_questions(&sample_bank()).unwrap();
    assert_eq!(repo.load_questions().unwrap().questions, sample_bank());
}

#[test]
fn removing_one_question_preserves_relative_order() {
    let dir = TempDir::new().unwrap();
    let repo = repo_in(&dir);
    repo.save_questions(&sample_bank()).unwrap();

    let mut questions = repo.load_questions().unwrap().questions;
    let removed = questions.remove(1);
    repo.save_questions(&questions).unwrap();

    let reloaded = repo.load_questions().unwrap().questions;
    assert_eq!(reloaded.len(), sample_bank().len() - 1);
    assert!(!reloaded.contains(&removed));
    assert_eq!(reloaded, questions);
}

#[test]
fn rewrite_truncates_previous_contents() {
    let dir = TempDir::new().unwrap();
    let repo = repo_in(&dir).with_atomic_writes(false);
    repo.save_questions(&sample_bank()).unwrap();

    repo.save_questions(&[Question::true_false("Only", "True")])
        .unwrap();
    assert_eq!(
        fs::read_to_string(repo.questions_path()).unwrap(),
        "TrueFalse\nOnly\nTrue\n"
    );
}

#[test]
fn appended_students_reload_in_order() {
    let dir = TempDir::new().unwrap();
    let repo = repo_in(&dir);
    let accounts = vec![
        StudentAccount::from_persisted("alice", "pw1", 0),
        StudentAccount::from_persisted("bob", "hunter2", 4),
        StudentAccount::from_persisted("alice", "pw1", 7),
    ];

    for account in &accounts {
        repo.append_student(account).unwrap();
    }

    assert_eq!(repo.load_students().unwrap().students, accounts);
}

#[test]
fn append_keeps_existing_records_byte_for_byte() {
    let dir = TempDir::new().unwrap();
    let repo = repo_in(&dir);
    let existing = "# kept\nUsername: old\nPassword: pw\nScore: 2\n\n";
    fs::write(repo.students_path(), existing).unwrap();

    repo.append_student(&StudentAccount::from_persisted("new", "pw", 0))
        .unwrap();

    let contents = fs::read_to_string(repo.students_path()).unwrap();
    assert!(contents.starts_with(existing));
    assert_eq!(repo.load_students().unwrap().students.len(), 2);
}

#[test]
fn malformed_score_is_a_decode_error() {
    let dir = TempDir::new().unwrap();
    let repo = repo_in(&dir);
    fs::write(
        repo.students_path(),
        "Username: a\nPassword: b\nScore: 1\n\nUsername: c\nPassword: d\nScore: lots\n\n",
    )
    .unwrap();

    let err = repo.load_students().unwrap_err();
    assert!(matches!(err, StorageError::Decode { .. }));
    assert!(err.to_string().contains("students.txt"));
}

#[test]
fn unreadable_line_keeps_students_before_it() {
    let dir = TempDir::new().unwrap();
    let repo = repo_in(&dir);
    let mut contents = b"Username: alice\nPassword: pw1\nScore: 5\n\n".to_vec();
    contents.extend_from_slice(b"Username: Jos\xe9\nPassword: pw\nScore: 1\n\n");
    fs::write(repo.students_path(), contents).unwrap();

    let loaded = repo.load_students().unwrap();
    assert_eq!(
        loaded.students,
        vec![StudentAccount::from_persisted("alice", "pw1", 5)]
    );
    assert!(matches!(loaded.interrupted, Some(StorageError::Read { .. })));
    assert!(!loaded.is_complete());
}

#[test]
fn unterminated_last_student_marks_load_incomplete() {
    let dir = TempDir::new().unwrap();
    let repo = repo_in(&dir);
    fs::write(
        repo.students_path(),
        "Username: alice\nPassword: pw\nScore: 5\n\nUsername: dave\nPassword: pw\nScore: 9\n",
    )
    .unwrap();

    let loaded = repo.load_students().unwrap();
    assert_eq!(loaded.students.len(), 1);
    assert!(loaded.unterminated_tail);
    assert!(loaded.interrupted.is_none());
    assert!(!loaded.is_complete());
}

#[test]
fn save_students_rewrites_scores() {
    let dir = TempDir::new().unwrap();
    let repo = repo_in(&dir);
    repo.append_student(&StudentAccount::from_persisted("alice", "pw1", 0))
        .unwrap();

    let mut students = repo.load_students().unwrap().students;
    students[0].add_score(3);
    repo.save_students(&students).unwrap();

    assert_eq!(repo.load_students().unwrap().students[0].score(), 3);
}

#[test]
fn failed_atomic_save_leaves_previous_file_untouched() {
    let dir = TempDir::new().unwrap();
    let blocked = dir.path().join("questions.txt");
    fs::create_dir(&blocked).unwrap();
    let repo = FlatFileRepository::new(&blocked, dir.path().join("students.txt"));

    let err = repo.save_questions(&sample_bank()).unwrap_err();
    assert!(matches!(err, StorageError::Write { .. }));
    assert!(blocked.is_dir());
}

#[test]
fn failed_in_place_save_is_reported() {
    let dir = TempDir::new().unwrap();
    let blocked = dir.path().join("questions.txt");
    fs::create_dir(&blocked).unwrap();
    let repo =
        FlatFileRepository::new(&blocked, dir.path().join("students.txt")).with_atomic_writes(false);

    let err = repo.save_questions(&sample_bank()).unwrap_err();
    assert!(matches!(err, StorageError::Write { .. }));
}

#[test]
fn storage_flat_file_wires_both_repositories() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::flat_file(repo_in(&dir));

    storage.questions.save_questions(&sample_bank()).unwrap();
    storage
        .students
        .append_student(&StudentAccount::from_persisted("a", "b", 0))
        .unwrap();

    assert_eq!(storage.questions.load_questions().unwrap().questions.len(), 4);
    assert_eq!(storage.students.load_students().unwrap().students.len(), 1);
}
