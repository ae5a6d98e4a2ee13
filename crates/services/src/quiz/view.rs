use quiz_core::model::Question;

/// A choice with its display label (`A`, `B`, …).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledChoice {
    pub label: String,
    pub text: String,
}

/// What the student sees for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// 1-based position in the quiz.
    pub number: usize,
    pub text: String,
    /// Empty for true/false questions.
    pub choices: Vec<LabeledChoice>,
}

impl QuestionView {
    #[must_use]
    pub fn new(number: usize, question: &Question) -> Self {
        let choices = question
            .choices()
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(index, text)| LabeledChoice {
                label: choice_label(index),
                text: text.clone(),
            })
            .collect();

        Self {
            number,
            text: question.text().to_owned(),
            choices,
        }
    }
}

/// Letter label for the choice at `index`: `A`..`Z`, then `AA`, `AB`, ….
#[must_use]
pub fn choice_label(index: usize) -> String {
    let mut label = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(b'A' + u8::try_from(rem).unwrap_or(0));
        n = (n - 1) / 26;
    }
    label.reverse();
    String::from_utf8(label).unwrap_or_default()
}
