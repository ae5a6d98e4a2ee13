use std::io::{self, BufRead, Write};
use std::sync::Arc;

use quiz_core::model::{QuestionDraft, parse_choice_list};
use services::{
    AdminCredentials, Clock, QuestionService, QuestionServiceError, QuizSession, StudentService,
    StudentServiceError, StudentSlot,
};
use storage::Storage;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::console::Console;

/// Knobs injected into the menu at construction.
#[derive(Debug, Clone, Default)]
pub struct MenuSettings {
    pub admin: AdminCredentials,
    pub persist_scores: bool,
    pub clock: Clock,
}

impl MenuSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            admin: config.admin.clone(),
            persist_scores: config.quiz.persist_scores,
            clock: Clock::system(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Reads the next answer or leaves the current flow at end of input.
macro_rules! ask {
    ($self:ident, $label:expr) => {
        match $self.console.prompt($label)? {
            Some(line) => line,
            None => return Ok(Flow::Exit),
        }
    };
}

/// The interactive quiz menu.
///
/// Storage problems are printed and the loop carries on; only console I/O errors end it.
pub struct Menu<R, W> {
    console: Console<R, W>,
    questions: QuestionService,
    students: StudentService,
    settings: MenuSettings,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    /// Load both stores and report any load problems on the console.
    ///
    /// # Errors
    ///
    /// Propagates console output failures.
    pub fn open(
        mut console: Console<R, W>,
        storage: &Storage,
        settings: MenuSettings,
    ) -> io::Result<Self> {
        let questions = QuestionService::load(Arc::clone(&storage.questions));
        if let Some(warning) = questions.load_warning() {
            console.say(format!("Warning: question bank only partially loaded: {warning}"))?;
        }

        let students = match StudentService::load(Arc::clone(&storage.students)) {
            Ok(students) => students,
            Err(err) => {
                warn!(error = %err, "student records unavailable; continuing with none loaded");
                console.say(format!("Warning: could not load student records: {err}"))?;
                StudentService::unread(Arc::clone(&storage.students))
            }
        };
        if let Some(warning) = students.load_warning() {
            console.say(format!("Warning: student records only partially loaded: {warning}"))?;
        }

        Ok(Self {
            console,
            questions,
            students,
            settings,
        })
    }

    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionService {
        &self.questions
    }

    #[must_use]
    pub fn students(&self) -> &StudentService {
        &self.students
    }

    /// Run the top-level menu until "Exit" or end of input.
    ///
    /// # Errors
    ///
    /// Propagates console I/O failures.
    pub fn run(&mut self) -> io::Result<()> {
        self.console.say("Welcome to the Quiz Management System")?;

        loop {
            self.console.say("Select your role:")?;
            self.console.say("1. Student Signup")?;
            self.console.say("2. Student Login")?;
            self.console.say("3. Admin")?;
            self.console.say("4. Exit")?;
            let Some(choice) = self.console.prompt("Enter your choice: ")? else {
                break;
            };

            let flow = match choice.trim() {
                "1" => self.signup()?,
                "2" => self.login()?,
                "3" => self.admin_login()?,
                "4" => Flow::Exit,
                _ => {
                    self.console.say("Invalid choice. Please try again.")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                break;
            }
        }

        self.console.say("Exiting the Quiz Management System.")
    }

    fn signup(&mut self) -> io::Result<Flow> {
        let name = ask!(self, "Enter your name: ");
        let password = ask!(self, "Enter a password: ");

        match self.students.signup(&name, &password) {
            Ok(_) => self
                .console
                .say(format!("Student {name} signed up successfully."))?,
            Err(StudentServiceError::Storage(err)) => self.console.say(format!(
                "Student {name} signed up for this session, but saving failed: {err}"
            ))?,
            Err(err) => self.console.say(format!("Signup failed: {err}"))?,
        }
        Ok(Flow::Continue)
    }

    fn login(&mut self) -> io::Result<Flow> {
        let name = ask!(self, "Enter your name: ");
        let password = ask!(self, "Enter your password: ");

        let Some(slot) = self.students.login(&name, &password) else {
            self.console
                .say("Invalid username or password. Please check your credentials.")?;
            return Ok(Flow::Continue);
        };

        info!(username = %name, "student logged in");
        if self.take_quiz(slot)? == Flow::Exit {
            return Ok(Flow::Exit);
        }
        self.console
            .say(format!("Thank you, {name}, for taking the quiz!"))?;
        Ok(Flow::Continue)
    }

    fn take_quiz(&mut self, slot: StudentSlot) -> io::Result<Flow> {
        let mut quiz = QuizSession::new(self.questions.questions(), self.settings.clock);
        if let Err(err) = quiz.start() {
            self.console.say(format!("Could not start the quiz: {err}"))?;
            return Ok(Flow::Continue);
        }
        if quiz.total_questions() == 0 {
            self.console.say("No questions are available yet.")?;
        }

        while let Some(view) = quiz.current_view() {
            let progress = quiz.progress();
            self.console.say(format!(
                "Question {}/{} ({} answered):",
                view.number, progress.total, progress.answered
            ))?;
            self.console.say(&view.text)?;
            for choice in &view.choices {
                self.console.say(format!("{}. {}", choice.label, choice.text))?;
            }

            let answer = ask!(self, "Your answer: ");
            match quiz.answer_current(&answer) {
                Ok(outcome) if outcome.correct => self.console.say("Correct!")?,
                Ok(outcome) => self.console.say(format!(
                    "Incorrect. The correct answer is: {}",
                    outcome.expected
                ))?,
                Err(err) => {
                    self.console.say(format!("Quiz stopped: {err}"))?;
                    return Ok(Flow::Continue);
                }
            }
        }

        let grade = match quiz.grade().and_then(|_| quiz.finish()) {
            Ok(grade) => grade,
            Err(err) => {
                self.console.say(format!("Quiz could not be graded: {err}"))?;
                return Ok(Flow::Continue);
            }
        };
        if let (Some(started), Some(graded)) = (quiz.started_at(), quiz.graded_at()) {
            info!(
                score = %grade,
                seconds = (graded - started).num_seconds(),
                "quiz graded"
            );
        }
        self.console.say("Quiz Complete!")?;
        self.console.say(format!("Your Score: {grade}"))?;

        if let Err(err) = self
            .students
            .record_grade(slot, &grade, self.settings.persist_scores)
        {
            self.console
                .say(format!("Your score could not be saved: {err}"))?;
        }
        Ok(Flow::Continue)
    }

    fn admin_login(&mut self) -> io::Result<Flow> {
        let username = ask!(self, "Admin Username: ");
        let password = ask!(self, "Admin Password: ");

        if !self.settings.admin.verify(&username, &password) {
            self.console
                .say("Admin login failed. Please check your credentials.")?;
            return Ok(Flow::Continue);
        }
        self.admin_menu()
    }

    fn admin_menu(&mut self) -> io::Result<Flow> {
        loop {
            self.console.say("")?;
            self.console.say("Admin Options:")?;
            self.console.say("1. Add Question")?;
            self.console.say("2. Remove Question")?;
            self.console.say("3. List Questions")?;
            self.console.say("4. Logout")?;
            let choice = ask!(self, "Enter your choice: ");

            let flow = match choice.trim() {
                "1" => self.add_question()?,
                "2" => self.remove_question()?,
                "3" => {
                    self.list_questions(true)?;
                    Flow::Continue
                }
                "4" => {
                    self.console.say("Logging out as admin.")?;
                    return Ok(Flow::Continue);
                }
                _ => {
                    self.console.say("Invalid choice. Please try again.")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                return Ok(Flow::Exit);
            }
        }
    }

    fn add_question(&mut self) -> io::Result<Flow> {
        let text = ask!(self, "Enter the question text: ");
        let answer = ask!(self, "Enter the answer: ");

        let is_mcq = loop {
            let raw = ask!(self, "Is it a Multiple Choice Question? (true/false): ");
            match parse_yes_no(&raw) {
                Some(value) => break value,
                None => self.console.say("Please answer true or false.")?,
            }
        };

        let draft = if is_mcq {
            let raw = ask!(self, "Enter the choices (comma-separated): ");
            QuestionDraft::multiple_choice(text, parse_choice_list(&raw), answer)
        } else {
            QuestionDraft::true_false(text, answer)
        };

        match self.questions.add_draft(draft) {
            Ok(_) => self.console.say("Question added successfully!")?,
            Err(QuestionServiceError::Storage(err)) => self.console.say(format!(
                "Question added, but saving the question bank failed: {err}"
            ))?,
            Err(err) => self.console.say(format!("Question not added: {err}"))?,
        }
        Ok(Flow::Continue)
    }

    fn remove_question(&mut self) -> io::Result<Flow> {
        if self.questions.is_empty() {
            self.console.say("There are no questions to remove.")?;
            return Ok(Flow::Continue);
        }

        self.console.say("Select a question to remove:")?;
        self.list_questions(false)?;
        let raw = ask!(self, "Enter the question number: ");

        let selected = raw
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|number| number.checked_sub(1))
            .and_then(|index| self.questions.list().get(index))
            .map(|entry| entry.id);
        let Some(id) = selected else {
            self.console.say("Invalid choice. Please try again.")?;
            return Ok(Flow::Continue);
        };

        match self.questions.remove(id) {
            Ok(_) => self.console.say("Question removed successfully!")?,
            Err(QuestionServiceError::Storage(err)) => self.console.say(format!(
                "Question removed, but saving the question bank failed: {err}"
            ))?,
            Err(err) => self.console.say(format!("Question not removed: {err}"))?,
        }
        Ok(Flow::Continue)
    }

    fn list_questions(&mut self, with_answers: bool) -> io::Result<()> {
        if with_answers {
            self.console.say("")?;
            self.console.say("List of Questions:")?;
            if self.questions.is_empty() {
                self.console.say("The question bank is empty.")?;
            }
        }

        let lines: Vec<String> = self
            .questions
            .list()
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let question = &entry.question;
                let mut line = format!("{}. [{}] {}", index + 1, question.kind(), question.text());
                if with_answers {
                    line.push_str(&format!(" (Answer: {})", question.answer()));
                }
                line
            })
            .collect();
        for line in lines {
            self.console.say(line)?;
        }
        Ok(())
    }
}

fn parse_yes_no(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" => Some(true),
        "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
