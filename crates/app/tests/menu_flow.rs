use std::fs;

use pretty_assertions::assert_eq;
use quiz_core::time::fixed_now;
use quizbank::{Console, Menu, MenuSettings};
use services::{AdminCredentials, Clock};
use storage::{FlatFileRepository, Storage};
use tempfile::TempDir;

const BANK: &str = "MCQ\n2+2=?\n3\n4\n5\n\n4\nTrueFalse\nSky is blue\nTrue\n";

struct Harness {
    _dir: TempDir,
    repo: FlatFileRepository,
}

impl Harness {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = FlatFileRepository::new(
            dir.path().join("questions.txt"),
            dir.path().join("students.txt"),
        );
        Self { _dir: dir, repo }
    }

    fn with_bank(bank: &str) -> Self {
        let harness = Self::new();
        fs::write(harness.repo.questions_path(), bank).unwrap();
        harness
    }

    fn run(&self, input: &str, settings: MenuSettings) -> String {
        self.run_bytes(input.as_bytes(), settings)
    }

    fn run_bytes(&self, input: &[u8], settings: MenuSettings) -> String {
        let storage = Storage::flat_file(self.repo.clone());
        let console = Console::new(input, Vec::new());
        let mut menu = Menu::open(console, &storage, settings).unwrap();
        menu.run().unwrap();
        String::from_utf8(menu.into_console().into_output()).unwrap()
    }

    fn questions_file(&self) -> String {
        fs::read_to_string(self.repo.questions_path()).unwrap()
    }

    fn students_file(&self) -> String {
        fs::read_to_string(self.repo.students_path()).unwrap()
    }
}

fn settings() -> MenuSettings {
    MenuSettings {
        clock: Clock::fixed(fixed_now()),
        ..MenuSettings::default()
    }
}

fn persisting() -> MenuSettings {
    MenuSettings {
        persist_scores: true,
        ..settings()
    }
}

#[test]
fn student_signs_up_and_takes_quiz() {
    let harness = Harness::with_bank(BANK);
    let output = harness.run("1\nalice\npw\n2\nalice\npw\n4\nfalse\n4\n", settings());

    assert!(output.starts_with("Welcome to the Quiz Management System\n"));
    assert!(output.contains("Student alice signed up successfully."));
    assert!(output.contains("Question 1/2 (0 answered):\n2+2=?\nA. 3\nB. 4\nC. 5\n"));
    assert!(output.contains("Question 2/2 (1 answered):\nSky is blue\n"));
    assert!(output.contains("Correct!"));
    assert!(output.contains("Incorrect. The correct answer is: True"));
    assert!(output.contains("Quiz Complete!\nYour Score: 1/2\n"));
    assert!(output.contains("Thank you, alice, for taking the quiz!"));
    assert!(output.ends_with("Exiting the Quiz Management System.\n"));

    assert_eq!(harness.students_file(), "Username: alice\nPassword: pw\nScore: 0\n\n");
}

#[test]
fn persisted_scores_rewrite_student_file() {
    let harness = Harness::with_bank(BANK);
    let settings = MenuSettings {
        persist_scores: true,
        ..settings()
    };
    harness.run("1\nalice\npw\n2\nalice\npw\n4\nTRUE\n4\n", settings);

    assert_eq!(harness.students_file(), "Username: alice\nPassword: pw\nScore: 2\n\n");
}

#[test]
fn bad_login_is_reported() {
    let harness = Harness::with_bank(BANK);
    let output = harness.run("2\nnobody\nnope\n4\n", settings());

    assert!(output.contains("Invalid username or password. Please check your credentials."));
    assert!(!output.contains("Quiz Complete!"));
}

#[test]
fn empty_bank_quiz_scores_zero() {
    let harness = Harness::new();
    let output = harness.run("1\nbob\npw\n2\nbob\npw\n4\n", settings());

    assert!(output.contains("No questions are available yet."));
    assert!(output.contains("Your Score: 0/0"));
}

#[test]
fn admin_adds_lists_and_removes_questions() {
    let harness = Harness::with_bank("TrueFalse\nOld\nFalse\n");
    let input = concat!(
        "3\nadmin\npassword\n",
        "1\n3+3=?\n6\ntrue\n 6 , 7 \n",
        "1\nSky is blue\nTrue\nmaybe\nfalse\n",
        "3\n",
        "2\n1\n",
        "4\n4\n",
    );
    let output = harness.run(input, settings());

    assert!(output.contains("Please answer true or false."));
    assert!(output.contains("Question added successfully!"));
    assert!(output.contains(
        "List of Questions:\n\
         1. [TrueFalse] Old (Answer: False)\n\
         2. [MCQ] 3+3=? (Answer: 6)\n\
         3. [TrueFalse] Sky is blue (Answer: True)\n"
    ));
    assert!(output.contains("Question removed successfully!"));
    assert!(output.contains("Logging out as admin."));

    assert_eq!(
        harness.questions_file(),
        "MCQ\n3+3=?\n6\n7\n\n6\nTrueFalse\nSky is blue\nTrue\n"
    );
}

#[test]
fn rejected_question_leaves_bank_unchanged() {
    let harness = Harness::with_bank(BANK);
    let output = harness.run("3\nadmin\npassword\n1\n   \nTrue\nfalse\n4\n4\n", settings());

    assert!(output.contains("Question not added:"));
    assert_eq!(harness.questions_file(), BANK);
}

#[test]
fn remove_with_bad_number_changes_nothing() {
    let harness = Harness::with_bank(BANK);
    let output = harness.run("3\nadmin\npassword\n2\n7\n4\n4\n", settings());

    assert!(output.contains("1. [MCQ] 2+2=?\n2. [TrueFalse] Sky is blue\n"));
    assert!(output.contains("Invalid choice. Please try again."));
    assert_eq!(harness.questions_file(), BANK);
}

#[test]
fn admin_credentials_come_from_settings() {
    let harness = Harness::with_bank(BANK);
    let settings = MenuSettings {
        admin: AdminCredentials::new("root", "s3cret"),
        ..settings()
    };
    let output = harness.run("3\nadmin\npassword\n3\nroot\ns3cret\n4\n4\n", settings);

    assert!(output.contains("Admin login failed. Please check your credentials."));
    assert!(output.contains("Logging out as admin."));
}

#[test]
fn invalid_choices_and_eof_exit_cleanly() {
    let harness = Harness::new();
    let output = harness.run("9\nabc\n1\nalice\n", settings());

    assert_eq!(output.matches("Invalid choice. Please try again.").count(), 2);
    assert!(!output.contains("signed up"));
    assert!(output.ends_with("Exiting the Quiz Management System.\n"));
    assert!(!harness.repo.students_path().exists());
}

#[test]
fn unreadable_student_file_is_reported() {
    let harness = Harness::with_bank(BANK);
    fs::write(
        harness.repo.students_path(),
        "Username: alice\nPassword: pw\nScore: lots\n\n",
    )
    .unwrap();
    let output = harness.run("2\nalice\npw\n4\n", settings());

    assert!(output.contains("Warning: could not load student records:"));
    assert!(output.contains("Invalid username or password."));
}

#[test]
fn persisted_score_never_overwrites_unloadable_roster() {
    let harness = Harness::with_bank(BANK);
    let original = "Username: alice\nPassword: pw\nScore: 5\n\n\
                    Username: bob\nPassword: pw\nScore: lots\n\n";
    fs::write(harness.repo.students_path(), original).unwrap();

    let output = harness.run("1\ncarol\npw\n2\ncarol\npw\n4\nTrue\n4\n", persisting());

    assert!(output.contains("Your Score: 2/2"));
    assert!(output.contains("Your score could not be saved: refusing to rewrite student roster"));
    assert_eq!(
        harness.students_file(),
        format!("{original}Username: carol\nPassword: pw\nScore: 0\n\n")
    );
}

#[test]
fn persisted_score_keeps_unterminated_last_record() {
    let harness = Harness::with_bank(BANK);
    let original = "Username: alice\nPassword: pw\nScore: 5\n\n\
                    Username: dave\nPassword: pw\nScore: 9\n";
    fs::write(harness.repo.students_path(), original).unwrap();

    let output = harness.run("2\nalice\npw\n4\nTrue\n4\n", persisting());

    assert!(output.contains("Your score could not be saved:"));
    assert_eq!(harness.students_file(), original);
}

#[test]
fn partially_readable_roster_keeps_earlier_students() {
    let harness = Harness::with_bank(BANK);
    let mut contents = b"Username: alice\nPassword: pw\nScore: 5\n\n".to_vec();
    contents.extend_from_slice(b"Username: Jos\xe9\nPassword: pw\nScore: 1\n\n");
    fs::write(harness.repo.students_path(), &contents).unwrap();

    let output = harness.run("2\nalice\npw\n4\nTrue\n4\n", settings());

    assert!(output.contains("Warning: student records only partially loaded:"));
    assert!(output.contains("Thank you, alice, for taking the quiz!"));
    assert_eq!(fs::read(harness.repo.students_path()).unwrap(), contents);
}

#[test]
fn non_utf8_input_is_an_invalid_choice() {
    let harness = Harness::new();
    let output = harness.run_bytes(b"\xff\xfe\n4\n", settings());

    assert!(output.contains("Invalid choice. Please try again."));
    assert!(output.ends_with("Exiting the Quiz Management System.\n"));
}
