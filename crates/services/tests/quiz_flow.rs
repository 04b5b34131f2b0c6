use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use gistify_core::model::{AnswerChoice, Phase, Question, Session, SummarySection};
use gistify_core::time::fixed_clock;
use services::{
    Document, ExtractionError, PlainTextExtractor, QuestionTimer, QuizGenerationError,
    QuizGenerator, QuizWorkflow, Resolution, Summarizer, SummarizationError, TextExtractor,
};

struct StubSummarizer;

#[async_trait]
impl Summarizer for StubSummarizer {
    async fn summarize(&self, _text: &str) -> Result<Vec<SummarySection>, SummarizationError> {
        Ok(vec![SummarySection::new(
            "Overview",
            vec!["one".into(), "two".into()],
        )])
    }
}

struct StubGenerator {
    count: usize,
}

#[async_trait]
impl QuizGenerator for StubGenerator {
    async fn generate_quiz(
        &self,
        _summary: &[SummarySection],
    ) -> Result<Vec<Question>, QuizGenerationError> {
        (0..self.count)
            .map(|id| {
                Question::new(
                    format!("Q{id}"),
                    vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    id % 4,
                    format!("E{id}"),
                )
                .map_err(QuizGenerationError::from)
            })
            .collect()
    }
}

struct FailingGenerator;

#[async_trait]
impl QuizGenerator for FailingGenerator {
    async fn generate_quiz(
        &self,
        _summary: &[SummarySection],
    ) -> Result<Vec<Question>, QuizGenerationError> {
        Err(QuizGenerationError::WrongQuestionCount {
            expected: 10,
            got: 3,
        })
    }
}

fn workflow(generator: Arc<dyn QuizGenerator>) -> QuizWorkflow {
    QuizWorkflow::new(
        fixed_clock(),
        Arc::new(PlainTextExtractor::new()),
        Arc::new(StubSummarizer),
        generator,
    )
}

fn upload() -> Document {
    Document::new("lecture.pdf", b"lecture transcript".to_vec())
}

#[tokio::test]
async fn full_flow_from_upload_to_report() {
    let workflow = workflow(Arc::new(StubGenerator { count: 3 }));
    let mut session = Session::new();

    let outcome = workflow.begin_upload(&session, upload()).await.unwrap();
    assert_eq!(
        workflow.apply_upload(&mut session, outcome).unwrap(),
        Resolution::Applied
    );
    assert_eq!(session.phase(), Phase::Summary);
    assert_eq!(session.document_name(), Some("lecture.pdf"));
    assert_eq!(session.summary().len(), 1);

    let questions = workflow.begin_quiz(&session).await.unwrap();
    assert_eq!(
        workflow.apply_quiz(&mut session, questions).unwrap(),
        Resolution::Applied
    );
    assert_eq!(session.phase(), Phase::Quiz);
    assert_eq!(session.questions().len(), 3);

    // Correct, skipped, correct: 2/3 = 67%.
    let first = workflow
        .answer(&mut session, 0, AnswerChoice::Selected(0))
        .unwrap();
    assert!(first.answer.is_correct);
    assert!(!first.is_complete);
    assert!(first.score.is_none());

    workflow
        .answer(&mut session, 1, AnswerChoice::Skipped)
        .unwrap();
    let last = workflow
        .answer(&mut session, 2, AnswerChoice::Selected(2))
        .unwrap();
    assert!(last.is_complete);

    let score = last.score.unwrap();
    assert_eq!(score.correct(), 2);
    assert_eq!(score.skipped(), 1);
    assert_eq!(score.incorrect(), 0);
    assert_eq!(score.percentage(), 67);

    let report = workflow.export(&session).unwrap();
    assert_eq!(report.file_name(), "lecture_summary_quiz.txt");
    assert!(report.contents().contains("Score: 2/3 (67%)"));
    assert!(report.contents().contains("### Overview"));
}

#[tokio::test]
async fn restart_keeps_questions_and_clears_answers() {
    let workflow = workflow(Arc::new(StubGenerator { count: 2 }));
    let mut session = Session::new();

    let outcome = workflow.begin_upload(&session, upload()).await.unwrap();
    workflow.apply_upload(&mut session, outcome).unwrap();
    let questions = workflow.begin_quiz(&session).await.unwrap();
    workflow.apply_quiz(&mut session, questions).unwrap();

    let before = session.questions().to_vec();
    workflow
        .answer(&mut session, 0, AnswerChoice::Skipped)
        .unwrap();
    workflow
        .answer(&mut session, 1, AnswerChoice::Skipped)
        .unwrap();
    assert!(session.is_complete());

    workflow.restart(&mut session).unwrap();
    assert_eq!(session.phase(), Phase::Quiz);
    assert!(session.answers().is_empty());
    assert_eq!(session.current_index(), 0);
    assert_eq!(session.questions(), before.as_slice());
}

#[tokio::test]
async fn stale_upload_result_is_discarded() {
    let workflow = workflow(Arc::new(StubGenerator { count: 2 }));
    let mut session = Session::new();

    let first = workflow.begin_upload(&session, upload()).await.unwrap();
    let second = first.clone();

    assert_eq!(
        workflow.apply_upload(&mut session, first).unwrap(),
        Resolution::Applied
    );
    assert_eq!(session.phase(), Phase::Summary);

    // The session moved on before the duplicate result landed.
    assert_eq!(
        workflow.apply_upload(&mut session, second).unwrap(),
        Resolution::Stale
    );
    assert_eq!(session.phase(), Phase::Summary);
}

#[tokio::test]
async fn stale_quiz_result_is_discarded_after_reset() {
    let workflow = workflow(Arc::new(StubGenerator { count: 2 }));
    let mut session = Session::new();

    let outcome = workflow.begin_upload(&session, upload()).await.unwrap();
    workflow.apply_upload(&mut session, outcome).unwrap();

    let questions = workflow.begin_quiz(&session).await.unwrap();
    session.reset();

    assert_eq!(
        workflow.apply_quiz(&mut session, questions).unwrap(),
        Resolution::Stale
    );
    assert_eq!(session.phase(), Phase::Upload);
    assert!(session.questions().is_empty());
}

#[tokio::test]
async fn generation_failure_leaves_session_in_summary() {
    let workflow = workflow(Arc::new(FailingGenerator));
    let mut session = Session::new();

    let outcome = workflow.begin_upload(&session, upload()).await.unwrap();
    workflow.apply_upload(&mut session, outcome).unwrap();

    let err = workflow.begin_quiz(&session).await.unwrap_err();
    assert!(matches!(
        err,
        services::WorkflowError::QuizGeneration(QuizGenerationError::WrongQuestionCount { .. })
    ));
    assert_eq!(session.phase(), Phase::Summary);
    assert!(session.questions().is_empty());
}

#[tokio::test]
async fn extraction_failure_leaves_session_in_upload() {
    let workflow = workflow(Arc::new(StubGenerator { count: 2 }));
    let session = Session::new();

    let empty = Document::new("empty.pdf", Vec::new());
    let err = workflow.begin_upload(&session, empty).await.unwrap_err();
    assert!(matches!(
        err,
        services::WorkflowError::Extraction(ExtractionError::NoText)
    ));
    assert_eq!(session.phase(), Phase::Upload);
}

#[tokio::test]
async fn timeout_for_the_current_question_records_a_skip_shaped_answer() {
    let workflow = workflow(Arc::new(StubGenerator { count: 2 }));
    let mut session = Session::new();

    let outcome = workflow.begin_upload(&session, upload()).await.unwrap();
    workflow.apply_upload(&mut session, outcome).unwrap();
    let questions = workflow.begin_quiz(&session).await.unwrap();
    workflow.apply_quiz(&mut session, questions).unwrap();

    let timer = QuestionTimer::new(Duration::from_millis(1));
    let armed = timer.arm(&session).unwrap();
    let event = armed.expired().await;

    assert_eq!(
        workflow.apply_timeout(&mut session, event).unwrap(),
        Resolution::Applied
    );
    assert_eq!(session.answers().len(), 1);
    assert_eq!(session.answers()[0].selected, None);
    assert!(!session.answers()[0].is_correct);
    assert_eq!(session.current_index(), 1);
}

#[tokio::test]
async fn timeout_for_an_already_answered_question_is_discarded() {
    let workflow = workflow(Arc::new(StubGenerator { count: 2 }));
    let mut session = Session::new();

    let outcome = workflow.begin_upload(&session, upload()).await.unwrap();
    workflow.apply_upload(&mut session, outcome).unwrap();
    let questions = workflow.begin_quiz(&session).await.unwrap();
    workflow.apply_quiz(&mut session, questions).unwrap();

    let timer = QuestionTimer::new(Duration::from_millis(1));
    let armed = timer.arm(&session).unwrap();

    // The user answers before the countdown fires.
    workflow
        .answer(&mut session, 0, AnswerChoice::Selected(0))
        .unwrap();

    let event = armed.expired().await;
    assert_eq!(
        workflow.apply_timeout(&mut session, event).unwrap(),
        Resolution::Stale
    );
    assert_eq!(session.answers().len(), 1);
    assert_eq!(session.current_index(), 1);
}

#[tokio::test]
async fn extractor_feeds_document_text_into_the_session() {
    let workflow = workflow(Arc::new(StubGenerator { count: 2 }));
    let mut session = Session::new();

    let document = Document::new("notes.txt", b"  raw document text  ".to_vec());
    let text = PlainTextExtractor::new()
        .extract_text(&document)
        .await
        .unwrap();
    assert_eq!(text, "raw document text");

    let outcome = workflow.begin_upload(&session, document).await.unwrap();
    workflow.apply_upload(&mut session, outcome).unwrap();
    assert_eq!(session.document_text(), Some("raw document text"));
}
