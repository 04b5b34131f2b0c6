use thiserror::Error;

use crate::model::{Answer, Phase, Session};
use crate::score::{QuizScore, ScoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReportError {
    #[error("report requires a finished quiz, session is in the {phase:?} phase")]
    QuizNotFinished { phase: Phase },

    #[error("session has no document")]
    MissingDocument,

    #[error(transparent)]
    Score(#[from] ScoreError),
}

/// Markdown export of a finished quiz attempt, consumed by a download
/// action.
///
/// The body reproduces the summary verbatim, the aggregate counts and
/// percentage from [`QuizScore`], and one block per question with a
/// `✓` marker on the correct option, `✗` on a selected wrong option,
/// and a skipped/correct/incorrect outcome line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizReport {
    file_name: String,
    contents: String,
}

impl QuizReport {
    /// Render the report for a session in the `Results` phase.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::QuizNotFinished` before the quiz is done
    /// and `ReportError::MissingDocument` if no document name is set.
    pub fn from_session(session: &Session) -> Result<Self, ReportError> {
        if session.phase() != Phase::Results {
            return Err(ReportError::QuizNotFinished {
                phase: session.phase(),
            });
        }
        let document_name = session
            .document_name()
            .ok_or(ReportError::MissingDocument)?;

        let score = QuizScore::from_answers(session.questions().len(), session.answers())?;

        let mut contents = format!("# Summary and Quiz Results for {document_name}\n\n");

        contents.push_str("## Summary\n\n");
        for section in session.summary() {
            contents.push_str(&format!("### {}\n\n", section.title));
            for point in &section.points {
                contents.push_str(&format!("- {point}\n"));
            }
            contents.push('\n');
        }

        contents.push_str("## Quiz Results\n\n");
        contents.push_str(&format!(
            "Score: {}/{} ({}%)\n",
            score.correct(),
            score.total_questions(),
            score.percentage()
        ));
        contents.push_str(&format!("Correct answers: {}\n", score.correct()));
        contents.push_str(&format!("Incorrect answers: {}\n", score.incorrect()));
        contents.push_str(&format!("Skipped questions: {}\n\n", score.skipped()));

        contents.push_str("## Questions and Answers\n\n");
        for (index, question) in session.questions().iter().enumerate() {
            let answer = session
                .answers()
                .iter()
                .find(|a| a.question_index == index);

            contents.push_str(&format!("### Question {}: {}\n\n", index + 1, question.text()));

            for (option_index, option) in question.options().iter().enumerate() {
                let marker = option_marker(question.correct_option(), option_index, answer);
                let letter = option_letter(option_index);
                contents.push_str(&format!("{marker} {letter}. {option}\n"));
            }

            contents.push_str(&format!("\nExplanation: {}\n\n", question.explanation()));
            contents.push_str(&format!("{}\n\n", outcome_line(answer)));
            contents.push_str("---\n\n");
        }

        Ok(Self {
            file_name: report_file_name(document_name),
            contents,
        })
    }

    /// Download file name derived from the document name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn contents(&self) -> &str {
        &self.contents
    }

    #[must_use]
    pub fn into_contents(self) -> String {
        self.contents
    }
}

fn option_marker(correct: usize, option_index: usize, answer: Option<&Answer>) -> char {
    if option_index == correct {
        return '✓';
    }
    if answer.and_then(|a| a.selected) == Some(option_index) {
        return '✗';
    }
    ' '
}

fn option_letter(option_index: usize) -> char {
    // Option indices are validated to 0..4, so this stays within A-D.
    char::from(b'A' + u8::try_from(option_index).unwrap_or(0))
}

fn outcome_line(answer: Option<&Answer>) -> &'static str {
    match answer {
        Some(answer) if answer.is_correct => "Your answer was correct.",
        Some(answer) if !answer.is_skipped() => "Your answer was incorrect.",
        _ => "You skipped this question.",
    }
}

fn report_file_name(document_name: &str) -> String {
    let stem = document_name
        .strip_suffix(".pdf")
        .unwrap_or(document_name);
    format!("{stem}_summary_quiz.txt")
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerChoice, Question, SummarySection};
    use crate::time::fixed_now;

    fn build_question(id: usize, correct: usize) -> Question {
        Question::new(
            format!("Q{id}"),
            vec![
                "alpha".into(),
                "beta".into(),
                "gamma".into(),
                "delta".into(),
            ],
            correct,
            format!("E{id}"),
        )
        .unwrap()
    }

    fn finished_session() -> Session {
        let mut session = Session::new();
        session
            .apply_summary(
                "notes.pdf",
                "text",
                vec![SummarySection::new(
                    "Key Ideas",
                    vec!["first point".into(), "second point".into()],
                )],
            )
            .unwrap();
        session
            .start_quiz(
                vec![
                    build_question(0, 0),
                    build_question(1, 1),
                    build_question(2, 2),
                ],
                fixed_now(),
            )
            .unwrap();
        // Correct, skipped, correct: 2/3 = 67%.
        session
            .submit_answer(0, AnswerChoice::Selected(0), fixed_now())
            .unwrap();
        session
            .submit_answer(1, AnswerChoice::Skipped, fixed_now())
            .unwrap();
        session
            .submit_answer(2, AnswerChoice::Selected(2), fixed_now())
            .unwrap();
        session
    }

    #[test]
    fn report_requires_results_phase() {
        let session = Session::new();
        let err = QuizReport::from_session(&session).unwrap_err();
        assert_eq!(err, ReportError::QuizNotFinished { phase: Phase::Upload });
    }

    #[test]
    fn file_name_strips_pdf_suffix() {
        let report = QuizReport::from_session(&finished_session()).unwrap();
        assert_eq!(report.file_name(), "notes_summary_quiz.txt");
    }

    #[test]
    fn report_reproduces_counts_and_percentage() {
        let report = QuizReport::from_session(&finished_session()).unwrap();
        let contents = report.contents();

        assert!(contents.starts_with("# Summary and Quiz Results for notes.pdf\n"));
        assert!(contents.contains("Score: 2/3 (67%)\n"));
        assert!(contents.contains("Correct answers: 2\n"));
        assert!(contents.contains("Incorrect answers: 0\n"));
        assert!(contents.contains("Skipped questions: 1\n"));
    }

    #[test]
    fn report_reproduces_summary_verbatim() {
        let report = QuizReport::from_session(&finished_session()).unwrap();
        let contents = report.contents();

        assert!(contents.contains("### Key Ideas\n\n- first point\n- second point\n"));
    }

    #[test]
    fn correct_option_is_checkmarked() {
        let report = QuizReport::from_session(&finished_session()).unwrap();
        assert!(report.contents().contains("✓ A. alpha\n"));
        assert!(report.contents().contains("✓ B. beta\n"));
    }

    #[test]
    fn selected_wrong_option_is_cross_marked() {
        let mut session = Session::new();
        session.apply_summary("doc.pdf", "text", Vec::new()).unwrap();
        session
            .start_quiz(vec![build_question(0, 0)], fixed_now())
            .unwrap();
        session
            .submit_answer(0, AnswerChoice::Selected(3), fixed_now())
            .unwrap();

        let report = QuizReport::from_session(&session).unwrap();
        assert!(report.contents().contains("✓ A. alpha\n"));
        assert!(report.contents().contains("✗ D. delta\n"));
        assert!(report.contents().contains("Your answer was incorrect.\n"));
    }

    #[test]
    fn outcome_lines_match_answer_kinds() {
        let report = QuizReport::from_session(&finished_session()).unwrap();
        let contents = report.contents();

        assert!(contents.contains("Your answer was correct.\n"));
        assert!(contents.contains("You skipped this question.\n"));
    }
}
