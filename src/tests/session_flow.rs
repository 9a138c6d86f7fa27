#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::Client;
    use serde_json::json;
    use tempfile::TempDir;
    use tracing::level_filters::LevelFilter;

    use crate::{
        client::quiz_api_client::QuizApiClient,
        config::config::AppConfig,
        prompt::models::Settings,
        quiz::{
            machine::{QuizEvent, QuizState},
            runner::QuizRunner,
            session::{Answer, QuestionPhase},
        },
        server::{app_state::AppState, router::app_router},
    };

    const CAPITALS: &str = r#"Here is your quiz: {"title":"Capitals","questions":[
        {"id":1,"type":"qcm","question":"Capital of Spain?","options":["A. Madrid","B. Paris","C. Rome"],"correct":"A","explanation":"Madrid.","hint":"Think of Real."},
        {"id":2,"type":"vf","question":"Paris is in Italy.","correct":"Falso","explanation":"It is in France."}
    ]} Good luck!"#;

    fn setup_logging() {
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(LevelFilter::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    }

    fn timed(timer: u32) -> Settings {
        Settings {
            timer,
            ..Settings::default()
        }
    }

    fn started_runner(timer: u32) -> QuizRunner {
        let mut runner = QuizRunner::new();
        runner.dispatch(QuizEvent::GenerationRequested(timed(timer)));
        runner.dispatch(QuizEvent::GenerationSucceeded(CAPITALS.into()));
        runner
    }

    /// Serves the real router on an ephemeral port with the provider mocked.
    async fn spawn_backend(groq_url: &str, upload_dir: &TempDir) -> String {
        let config = AppConfig::for_tests(groq_url, upload_dir.path().to_path_buf());
        let state = AppState::from_config(&config).unwrap();
        let app = app_router(state, &config.cors);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", address)
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_expires_question() {
        setup_logging();
        let mut runner = started_runner(30);
        assert_eq!(runner.countdown_question(), Some(0));

        for _ in 0..30 {
            assert!(runner.next_tick().await);
        }

        let session = runner.state().session().unwrap();
        assert_eq!(session.time_left(), 0);
        assert_eq!(session.phase(), QuestionPhase::Answered);
        assert!(session.current_answer().unwrap().answer.is_time_expired());
        assert!(!session.current_answer().unwrap().is_correct);
        assert_eq!(session.score(), 0);

        assert_eq!(runner.countdown_question(), None);
        assert!(!runner.next_tick().await);
    }

    #[tokio::test(start_paused = true)]
    async fn answering_stops_countdown_and_next_question_restarts_it() {
        setup_logging();
        let mut runner = started_runner(30);

        assert!(runner.next_tick().await);
        assert!(runner.next_tick().await);
        assert_eq!(runner.state().session().unwrap().time_left(), 28);

        runner.dispatch(QuizEvent::Submit(Answer::given("A")));
        assert_eq!(runner.countdown_question(), None);
        assert_eq!(runner.state().session().unwrap().score(), 1);

        // Time passing after an answer changes nothing.
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(runner.state().session().unwrap().time_left(), 28);

        runner.dispatch(QuizEvent::Advance);
        assert_eq!(runner.countdown_question(), Some(1));
        let session = runner.state().session().unwrap();
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.time_left(), 30);

        assert!(runner.next_tick().await);
        let session = runner.state().session().unwrap();
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.time_left(), 29);
    }

    #[tokio::test(start_paused = true)]
    async fn untimed_quiz_never_starts_countdown() {
        let mut runner = started_runner(0);

        assert_eq!(runner.countdown_question(), None);
        assert!(!runner.next_tick().await);

        runner.dispatch(QuizEvent::Submit(Answer::given("B")));
        runner.dispatch(QuizEvent::Advance);
        runner.dispatch(QuizEvent::Submit(Answer::given("Falso")));
        runner.dispatch(QuizEvent::Advance);

        let results = runner.state().results().unwrap();
        assert_eq!(results.score, 1);
        assert_eq!(results.total, 2);
        assert_eq!(results.percentage, 50);
        assert_eq!(runner.countdown_question(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_from_results_restarts_countdown() {
        let mut runner = started_runner(10);

        runner.dispatch(QuizEvent::Submit(Answer::given("A")));
        runner.dispatch(QuizEvent::Advance);
        runner.dispatch(QuizEvent::Submit(Answer::given("Falso")));
        runner.dispatch(QuizEvent::Advance);
        assert!(matches!(runner.state(), QuizState::Results(_)));
        assert_eq!(runner.countdown_question(), None);

        runner.dispatch(QuizEvent::Restart);
        let session = runner.state().session().unwrap();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.time_left(), 10);
        assert_eq!(runner.countdown_question(), Some(0));
    }

    #[tokio::test]
    async fn empty_content_is_rejected_before_any_request() {
        let api = QuizApiClient::new("http://127.0.0.1:1", Client::new());
        let mut runner = QuizRunner::new();

        let state = runner.generate(&api, "   ", Settings::default()).await;

        assert!(matches!(state, QuizState::Upload { .. }));
        assert_eq!(
            state.error(),
            Some("Add some content before generating a quiz")
        );
    }

    #[tokio::test]
    async fn generation_round_trip_through_backend() {
        setup_logging();
        let mut groq = mockito::Server::new_async().await;
        groq.mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(
                json!({
                    "choices": [{ "message": { "role": "assistant", "content": CAPITALS } }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let base_url = spawn_backend(&groq.url(), &dir).await;
        let api = QuizApiClient::new(base_url, Client::new());

        let document = api
            .parse_text("El verbo hablar significa parler en francés. Practicamos cada día.")
            .await
            .unwrap();
        assert_eq!(document.meta.word_count, 10);

        let mut runner = QuizRunner::new();
        let state = runner
            .generate(&api, &document.text, Settings::default())
            .await;

        let session = state.session().unwrap();
        assert_eq!(session.quiz().title, "Capitals");
        assert_eq!(session.quiz().len(), 2);
        assert_eq!(session.current_index(), 0);
        assert_eq!(runner.countdown_question(), None);

        runner.dispatch(QuizEvent::RevealHint);
        assert_eq!(
            runner.state().session().unwrap().phase(),
            QuestionPhase::HintShown
        );
    }

    #[tokio::test]
    async fn provider_failure_returns_to_upload_with_message() {
        setup_logging();
        let mut groq = mockito::Server::new_async().await;
        groq.mock("POST", "/chat/completions")
            .with_status(503)
            .with_body(json!({ "error": { "message": "Service unavailable" } }).to_string())
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let base_url = spawn_backend(&groq.url(), &dir).await;
        let api = QuizApiClient::new(base_url, Client::new());

        let mut runner = QuizRunner::new();
        let state = runner
            .generate(&api, "Some study material", Settings::default())
            .await;

        assert!(matches!(state, QuizState::Upload { .. }));
        assert!(state.error().unwrap().contains("Service unavailable"));
    }

    #[tokio::test]
    async fn unusable_model_output_returns_to_upload() {
        let mut groq = mockito::Server::new_async().await;
        groq.mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(
                json!({
                    "choices": [{ "message": { "role": "assistant", "content": "Sorry, I cannot help." } }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let base_url = spawn_backend(&groq.url(), &dir).await;
        let api = QuizApiClient::new(base_url, Client::new());

        let mut runner = QuizRunner::new();
        let state = runner
            .generate(&api, "Some study material", Settings::default())
            .await;

        assert!(matches!(state, QuizState::Upload { error: Some(_) }));
        assert!(!state.is_generating());
    }
}
