//! Session orchestrator.
//!
//! Wires the quota gate, the question generator, the assessment session,
//! the grader, the performance sink, and the report formatter together,
//! one orchestrator per user session. Every user-facing interaction is
//! processed as a discrete run-to-completion step; the only suspension
//! point is the generation round-trip, which is treated as one atomic
//! step (fully Active on success, still Setup on any failure).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use logeek_models::{QuestionGenerator, QuizRequest};

use crate::auth::CallerIdentity;
use crate::config::{AssessmentConfig, AssessmentLimits};
use crate::error::{ReportError, SessionError, StartError};
use crate::events::{EventBus, MindEvent};
use crate::perflog::{PerformanceRecord, PerformanceSink};
use crate::quota::GuestQuota;
use crate::report::{ReportFormatter, SessionSummary};

use super::grader::GradeReport;
use super::item::QuestionItem;
use super::session::{AssessmentSession, Stage};

/// Drives one caller's assessment sessions from setup to report.
///
/// The orchestrator owns the session value outright; event handlers
/// reach it through the orchestrator rather than any ambient state.
pub struct SessionOrchestrator {
    feature: String,
    caller: CallerIdentity,
    limits: AssessmentLimits,
    quota: GuestQuota,
    session: Option<AssessmentSession>,
    generating: bool,
    generator: Arc<dyn QuestionGenerator>,
    sink: Arc<dyn PerformanceSink>,
    formatter: Arc<dyn ReportFormatter>,
    event_bus: Arc<dyn EventBus>,
}

impl SessionOrchestrator {
    /// Create an orchestrator for one caller and one metered feature.
    pub fn new(
        feature: impl Into<String>,
        caller: CallerIdentity,
        limits: AssessmentLimits,
        generator: Arc<dyn QuestionGenerator>,
        sink: Arc<dyn PerformanceSink>,
        formatter: Arc<dyn ReportFormatter>,
        event_bus: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            feature: feature.into(),
            caller,
            limits,
            quota: GuestQuota::new(),
            session: None,
            generating: false,
            generator,
            sink,
            formatter,
            event_bus,
        }
    }

    /// The current session, if one has been started (or attempted).
    pub fn session(&self) -> Option<&AssessmentSession> {
        self.session.as_ref()
    }

    /// Current stage, None before the first start.
    pub fn stage(&self) -> Option<Stage> {
        self.session.as_ref().map(|s| s.stage())
    }

    /// Start an assessment: gate, generate, validate, activate.
    pub async fn start(&mut self, config: AssessmentConfig) -> Result<(), StartError> {
        self.start_at(config, Utc::now()).await
    }

    /// [`start`](Self::start) with an explicit clock, for tests.
    pub async fn start_at(
        &mut self,
        config: AssessmentConfig,
        now: DateTime<Utc>,
    ) -> Result<(), StartError> {
        // At most one outstanding generation request per session;
        // a rejected duplicate consumes no quota.
        if self.generating {
            return Err(StartError::GenerationInFlight);
        }
        if matches!(self.stage(), Some(Stage::Active) | Some(Stage::Finished)) {
            return Err(StartError::AlreadyStarted);
        }

        config
            .validate(&self.limits)
            .map_err(StartError::InvalidConfig)?;

        let limit = self.limits.guest_limit(&self.feature);
        if !self.quota.allow(&self.feature, limit, &self.caller) {
            info!(feature = %self.feature, limit, "guest quota denied");
            return Err(StartError::QuotaDenied {
                feature: self.feature.clone(),
                limit,
            });
        }

        let mut session = AssessmentSession::new(config.clone());
        let session_id = session.id().to_string();

        let request = QuizRequest::new(config.topic.clone(), config.question_count)
            .with_kind(config.kind)
            .with_difficulty(config.difficulty);

        self.generating = true;
        let outcome = self.generator.generate(&request).await;
        self.generating = false;

        let raw_questions = match outcome {
            Ok(questions) => questions,
            Err(e) => {
                warn!(feature = %self.feature, error = %e, "question generation failed");
                self.session = Some(session);
                self.event_bus
                    .publish(MindEvent::GenerationFailed {
                        session_id,
                        reason: e.to_string(),
                    })
                    .await;
                return Err(e.into());
            }
        };

        // Commit the items as one atomic step: any invalid question
        // rejects the whole batch and the session stays in Setup.
        let items = match Self::validate_items(raw_questions, config.question_count) {
            Ok(items) => items,
            Err(e) => {
                warn!(feature = %self.feature, error = %e, "generated questions rejected");
                self.session = Some(session);
                self.event_bus
                    .publish(MindEvent::GenerationFailed {
                        session_id,
                        reason: e.to_string(),
                    })
                    .await;
                return Err(e);
            }
        };

        session
            .activate(items, now)
            .map_err(|e| StartError::InvalidConfig(e.to_string()))?;
        self.session = Some(session);

        info!(
            session_id = %session_id,
            topic = %config.topic,
            questions = config.question_count,
            duration = config.duration_seconds,
            "assessment started"
        );
        self.event_bus
            .publish(MindEvent::StageChanged {
                session_id,
                stage: Stage::Active,
            })
            .await;
        Ok(())
    }

    fn validate_items(
        raw: Vec<logeek_models::RawQuestion>,
        expected: usize,
    ) -> Result<Vec<QuestionItem>, StartError> {
        if raw.len() != expected {
            return Err(StartError::Generation(
                logeek_models::GenerateError::Malformed(format!(
                    "requested {expected} questions, generator returned {}",
                    raw.len()
                )),
            ));
        }

        raw.into_iter()
            .map(|q| {
                QuestionItem::try_from(q).map_err(|e| {
                    StartError::Generation(logeek_models::GenerateError::Malformed(e.to_string()))
                })
            })
            .collect()
    }

    /// Record an answer, then evaluate the soft deadline.
    ///
    /// The answer is applied before the expiry check, so a last-moment
    /// selection delivered in the same step as the timeout observation
    /// is always counted.
    pub async fn select_answer(&mut self, index: usize, option: &str) -> Result<Stage, SessionError> {
        self.select_answer_at(index, option, Utc::now()).await
    }

    /// [`select_answer`](Self::select_answer) with an explicit clock.
    pub async fn select_answer_at(
        &mut self,
        index: usize,
        option: &str,
        now: DateTime<Utc>,
    ) -> Result<Stage, SessionError> {
        let session = self.session.as_mut().ok_or_else(no_session)?;
        session.select_answer(index, option)?;
        let session_id = session.id().to_string();

        debug!(session_id = %session_id, index, "answer recorded");
        self.event_bus
            .publish(MindEvent::AnswerRecorded { session_id, index })
            .await;

        Ok(self.observe_at(now).await.unwrap_or(Stage::Active))
    }

    /// Submit the assessment for grading.
    pub async fn submit(&mut self) -> Result<GradeReport, SessionError> {
        self.submit_at(Utc::now()).await
    }

    /// [`submit`](Self::submit) with an explicit clock.
    pub async fn submit_at(&mut self, now: DateTime<Utc>) -> Result<GradeReport, SessionError> {
        let session = self.session.as_mut().ok_or_else(no_session)?;
        let already_finished = session.stage() == Stage::Finished;
        let report = session.submit(now)?.clone();

        if !already_finished {
            self.after_finish(&report).await;
        }
        Ok(report)
    }

    /// Poll the exam clock, auto-submitting on expiry.
    ///
    /// None before the first start; otherwise the stage after the
    /// observation.
    pub async fn observe(&mut self) -> Option<Stage> {
        self.observe_at(Utc::now()).await
    }

    /// [`observe`](Self::observe) with an explicit clock.
    pub async fn observe_at(&mut self, now: DateTime<Utc>) -> Option<Stage> {
        let session = self.session.as_mut()?;
        let before = session.stage();
        let after = session.observe(now);

        if before == Stage::Active && after == Stage::Finished {
            debug!(session_id = %session.id(), "exam timer expired, auto-submitted");
            if let Some(report) = session.grade_report().cloned() {
                self.after_finish(&report).await;
            }
        }
        Some(after)
    }

    /// Side effects of the Active -> Finished transition: events, plus
    /// exactly one fire-and-forget performance record.
    async fn after_finish(&mut self, report: &GradeReport) {
        let session = match &self.session {
            Some(s) => s,
            None => return,
        };
        let session_id = session.id().to_string();

        info!(
            session_id = %session_id,
            score = report.score,
            total = report.total,
            letter = report.letter.as_str(),
            "assessment graded"
        );
        self.event_bus
            .publish(MindEvent::StageChanged {
                session_id: session_id.clone(),
                stage: Stage::Finished,
            })
            .await;
        self.event_bus
            .publish(MindEvent::Graded {
                session_id: session_id.clone(),
                score: report.score,
                total: report.total,
                letter: report.letter,
            })
            .await;

        let record = PerformanceRecord {
            user_id: self
                .caller
                .user_id()
                .unwrap_or("guest")
                .to_string(),
            feature: self.feature.clone(),
            score: report.score,
            total: report.total,
            percentage: report.percentage,
            created_at: Utc::now(),
        };

        // Non-fatal: the Finished state and the report never depend on
        // this write.
        match self.sink.append(record).await {
            Ok(()) => {
                self.event_bus
                    .publish(MindEvent::PerformanceLogged {
                        session_id,
                        feature: self.feature.clone(),
                    })
                    .await;
            }
            Err(e) => warn!(error = %e, "failed to append performance record"),
        }
    }

    /// Render the finished session's report for download.
    pub fn report(&self) -> Result<Vec<u8>, ReportError> {
        let session = self.session.as_ref().ok_or(ReportError::NotFinished)?;
        let summary = SessionSummary::from_session(session)?;
        self.formatter.format(&summary)
    }

    /// Suggested filename for the downloadable report.
    pub fn report_filename(&self) -> String {
        let topic = self
            .session
            .as_ref()
            .map(|s| s.config().topic.replace(' ', "_"))
            .unwrap_or_else(|| "assessment".to_string());
        format!("{topic}_results.{}", self.formatter.extension())
    }

    /// Discard the current session so a fresh one can be started.
    ///
    /// Returns the discarded session; the next start always constructs
    /// a brand-new session object rather than resetting this one.
    pub fn restart(&mut self) -> Option<AssessmentSession> {
        self.session.take()
    }
}

fn no_session() -> SessionError {
    SessionError::InvalidStage {
        expected: Stage::Active.as_str().to_string(),
        actual: "no session".to_string(),
    }
}

/// Drive an orchestrator's expiry check on a fixed interval until the
/// session finishes.
///
/// The poll interval bounds user-visible timer drift; keep it at or
/// under one second.
pub fn spawn_expiry_poller(
    orchestrator: Arc<Mutex<SessionOrchestrator>>,
    poll_interval: std::time::Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let mut orch = orchestrator.lock().await;
            if orch.observe().await == Some(Stage::Finished) {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemoryEventBus;
    use crate::perflog::MemorySink;
    use crate::report::MarkdownFormatter;
    use logeek_models::{GenerateError, MockGenerator};

    struct Harness {
        orchestrator: SessionOrchestrator,
        generator: Arc<MockGenerator>,
        sink: Arc<MemorySink>,
        event_bus: Arc<MemoryEventBus>,
    }

    fn harness(caller: CallerIdentity) -> Harness {
        let generator = Arc::new(MockGenerator::new());
        let sink = Arc::new(MemorySink::new());
        let event_bus = Arc::new(MemoryEventBus::new(64));

        let orchestrator = SessionOrchestrator::new(
            "smart_quiz",
            caller,
            AssessmentLimits::default(),
            generator.clone(),
            sink.clone(),
            Arc::new(MarkdownFormatter::new()),
            event_bus.clone(),
        );

        Harness {
            orchestrator,
            generator,
            sink,
            event_bus,
        }
    }

    fn config() -> AssessmentConfig {
        AssessmentConfig::new("Thermodynamics", 60, 5)
    }

    async fn started_harness(caller: CallerIdentity) -> Harness {
        let mut h = harness(caller);
        h.generator
            .queue_questions(MockGenerator::canned_questions(5));
        h.orchestrator.start(config()).await.unwrap();
        h
    }

    // ==================== Start Tests ====================

    #[tokio::test]
    async fn start_activates_session_with_generated_items() {
        let h = started_harness(CallerIdentity::authenticated("user-1")).await;

        assert_eq!(h.orchestrator.stage(), Some(Stage::Active));
        assert_eq!(h.orchestrator.session().unwrap().items().len(), 5);
    }

    #[tokio::test]
    async fn start_publishes_active_stage_event() {
        let h = started_harness(CallerIdentity::Guest).await;

        let session_id = h.orchestrator.session().unwrap().id().to_string();
        let events = h.event_bus.session_events(&session_id).await;
        assert!(events.iter().any(|(_, e)| matches!(
            e,
            MindEvent::StageChanged {
                stage: Stage::Active,
                ..
            }
        )));
    }

    #[tokio::test]
    async fn start_rejects_invalid_config_before_quota() {
        let mut h = harness(CallerIdentity::Guest);

        let bad = AssessmentConfig::new("Topic", 90, 5);
        let result = h.orchestrator.start(bad).await;
        assert!(matches!(result, Err(StartError::InvalidConfig(_))));

        // The rejected attempt must not have consumed guest quota
        h.generator
            .queue_questions(MockGenerator::canned_questions(5));
        h.orchestrator.start(config()).await.unwrap();
    }

    #[tokio::test]
    async fn start_while_active_is_rejected() {
        let mut h = started_harness(CallerIdentity::authenticated("user-1")).await;

        let result = h.orchestrator.start(config()).await;
        assert!(matches!(result, Err(StartError::AlreadyStarted)));
    }

    #[tokio::test]
    async fn start_while_generation_in_flight_is_rejected() {
        let mut h = harness(CallerIdentity::Guest);
        h.orchestrator.generating = true;

        let result = h.orchestrator.start(config()).await;
        assert!(matches!(result, Err(StartError::GenerationInFlight)));

        // No quota consumed by the rejected duplicate
        assert_eq!(h.orchestrator.quota.count("smart_quiz"), 0);
    }

    #[tokio::test]
    async fn generation_failure_leaves_session_in_setup() {
        let mut h = harness(CallerIdentity::authenticated("user-1"));
        h.generator
            .queue_error(GenerateError::Unavailable("high traffic".to_string()));

        let result = h.orchestrator.start(config()).await;
        assert!(matches!(
            result,
            Err(StartError::Generation(GenerateError::Unavailable(_)))
        ));

        let session = h.orchestrator.session().unwrap();
        assert_eq!(session.stage(), Stage::Setup);
        assert!(session.items().is_empty());
    }

    #[tokio::test]
    async fn generation_failure_publishes_event_and_allows_retry() {
        let mut h = harness(CallerIdentity::authenticated("user-1"));
        h.generator
            .queue_error(GenerateError::Malformed("bad json".to_string()));
        h.generator
            .queue_questions(MockGenerator::canned_questions(5));

        assert!(h.orchestrator.start(config()).await.is_err());

        let session_id = h.orchestrator.session().unwrap().id().to_string();
        let events = h.event_bus.session_events(&session_id).await;
        assert!(events
            .iter()
            .any(|(_, e)| matches!(e, MindEvent::GenerationFailed { .. })));

        // Re-clicking start retries from Setup
        h.orchestrator.start(config()).await.unwrap();
        assert_eq!(h.orchestrator.stage(), Some(Stage::Active));
    }

    #[tokio::test]
    async fn failure_event_attributes_the_preserved_setup_session() {
        let mut h = harness(CallerIdentity::authenticated("user-1"));
        h.generator.queue_error(GenerateError::QuotaExceeded);

        assert!(h.orchestrator.start(config()).await.is_err());

        // The session kept in Setup is the same one the event names
        let session_id = h.orchestrator.session().unwrap().id().to_string();
        let events = h.event_bus.session_events(&session_id).await;
        assert!(matches!(
            events.as_slice(),
            [(_, MindEvent::GenerationFailed { .. })]
        ));
    }

    #[tokio::test]
    async fn wrong_question_count_is_rejected_as_malformed() {
        let mut h = harness(CallerIdentity::authenticated("user-1"));
        h.generator
            .queue_questions(MockGenerator::canned_questions(3));

        let result = h.orchestrator.start(config()).await;
        assert!(matches!(
            result,
            Err(StartError::Generation(GenerateError::Malformed(_)))
        ));
        assert_eq!(h.orchestrator.stage(), Some(Stage::Setup));
    }

    // ==================== Quota Tests ====================

    #[tokio::test]
    async fn guest_quota_denies_second_start() {
        let mut h = harness(CallerIdentity::Guest);
        h.generator
            .queue_questions(MockGenerator::canned_questions(5));
        h.generator
            .queue_questions(MockGenerator::canned_questions(5));

        h.orchestrator.start(config()).await.unwrap();
        h.orchestrator.submit().await.unwrap();
        h.orchestrator.restart();

        let result = h.orchestrator.start(config()).await;
        assert!(matches!(result, Err(StartError::QuotaDenied { .. })));
    }

    #[tokio::test]
    async fn authenticated_caller_is_never_quota_denied() {
        let mut h = harness(CallerIdentity::authenticated("user-1"));

        for _ in 0..3 {
            h.generator
                .queue_questions(MockGenerator::canned_questions(5));
            h.orchestrator.start(config()).await.unwrap();
            h.orchestrator.submit().await.unwrap();
            h.orchestrator.restart();
        }
    }

    #[tokio::test]
    async fn quota_consumed_even_when_generation_fails() {
        // The gate runs before the generation round-trip, matching the
        // metering model of the original feature pages.
        let mut h = harness(CallerIdentity::Guest);
        h.generator.queue_error(GenerateError::QuotaExceeded);

        assert!(h.orchestrator.start(config()).await.is_err());
        assert_eq!(h.orchestrator.quota.count("smart_quiz"), 1);
    }

    // ==================== Answer & Submit Tests ====================

    #[tokio::test]
    async fn answers_flow_into_grade() {
        let mut h = started_harness(CallerIdentity::authenticated("user-1")).await;

        h.orchestrator.select_answer(0, "A").await.unwrap();
        h.orchestrator.select_answer(1, "B").await.unwrap();
        h.orchestrator.select_answer(2, "A").await.unwrap();

        let report = h.orchestrator.submit().await.unwrap();
        assert_eq!(report.score, 2);
        assert_eq!(report.total, 5);
    }

    #[tokio::test]
    async fn select_answer_publishes_event() {
        let mut h = started_harness(CallerIdentity::authenticated("user-1")).await;
        h.orchestrator.select_answer(0, "A").await.unwrap();

        let session_id = h.orchestrator.session().unwrap().id().to_string();
        let events = h.event_bus.session_events(&session_id).await;
        assert!(events
            .iter()
            .any(|(_, e)| matches!(e, MindEvent::AnswerRecorded { index: 0, .. })));
    }

    #[tokio::test]
    async fn submit_writes_one_performance_record() {
        let mut h = started_harness(CallerIdentity::authenticated("user-1")).await;
        h.orchestrator.select_answer(0, "A").await.unwrap();
        h.orchestrator.submit().await.unwrap();

        let records = h.sink.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id, "user-1");
        assert_eq!(records[0].feature, "smart_quiz");
        assert_eq!(records[0].score, 1);
        assert_eq!(records[0].total, 5);
    }

    #[tokio::test]
    async fn duplicate_submit_writes_no_second_record() {
        let mut h = started_harness(CallerIdentity::authenticated("user-1")).await;
        h.orchestrator.submit().await.unwrap();
        h.orchestrator.submit().await.unwrap();

        assert_eq!(h.sink.records().await.len(), 1);
    }

    #[tokio::test]
    async fn sink_failure_does_not_block_finished_state() {
        let mut h = started_harness(CallerIdentity::authenticated("user-1")).await;
        h.sink.fail_next_append().await;

        let report = h.orchestrator.submit().await.unwrap();
        assert_eq!(report.total, 5);
        assert_eq!(h.orchestrator.stage(), Some(Stage::Finished));
        assert!(h.orchestrator.report().is_ok());
        assert!(h.sink.records().await.is_empty());
    }

    #[tokio::test]
    async fn guest_records_use_guest_user_id() {
        let mut h = started_harness(CallerIdentity::Guest).await;
        h.orchestrator.submit().await.unwrap();

        assert_eq!(h.sink.records().await[0].user_id, "guest");
    }

    // ==================== Timer Tests ====================

    #[tokio::test]
    async fn observe_past_deadline_finishes_and_logs() {
        let start = Utc::now();
        let mut h = harness(CallerIdentity::authenticated("user-1"));
        h.generator
            .queue_questions(MockGenerator::canned_questions(5));
        h.orchestrator.start_at(config(), start).await.unwrap();

        let stage = h
            .orchestrator
            .observe_at(start + chrono::Duration::seconds(61))
            .await;

        assert_eq!(stage, Some(Stage::Finished));
        assert_eq!(h.sink.records().await.len(), 1);
    }

    #[tokio::test]
    async fn late_answer_in_expiry_step_is_counted() {
        let start = Utc::now();
        let mut h = harness(CallerIdentity::authenticated("user-1"));
        h.generator
            .queue_questions(MockGenerator::canned_questions(5));
        h.orchestrator.start_at(config(), start).await.unwrap();

        // Answer arrives in the same step that observes the timeout
        let late = start + chrono::Duration::seconds(61);
        let stage = h.orchestrator.select_answer_at(0, "A", late).await.unwrap();

        assert_eq!(stage, Stage::Finished);
        let report = h.orchestrator.session().unwrap().grade_report().unwrap();
        assert_eq!(report.score, 1);
    }

    #[tokio::test]
    async fn expiry_poller_finishes_session() {
        let mut h = harness(CallerIdentity::authenticated("user-1"));
        h.generator
            .queue_questions(MockGenerator::canned_questions(5));

        // Start in the past so the first poll observes an expired clock
        let started = Utc::now() - chrono::Duration::seconds(120);
        h.orchestrator.start_at(config(), started).await.unwrap();

        let orchestrator = Arc::new(Mutex::new(h.orchestrator));
        let handle = spawn_expiry_poller(
            orchestrator.clone(),
            std::time::Duration::from_millis(10),
        );
        handle.await.unwrap();

        assert_eq!(orchestrator.lock().await.stage(), Some(Stage::Finished));
    }

    // ==================== Report & Restart Tests ====================

    #[tokio::test]
    async fn report_unavailable_before_finish() {
        let h = started_harness(CallerIdentity::authenticated("user-1")).await;
        assert!(matches!(
            h.orchestrator.report(),
            Err(ReportError::NotFinished)
        ));
    }

    #[tokio::test]
    async fn report_renders_after_finish() {
        let mut h = started_harness(CallerIdentity::authenticated("user-1")).await;
        h.orchestrator.submit().await.unwrap();

        let bytes = h.orchestrator.report().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("Thermodynamics"));
        assert!(h.orchestrator.report_filename().ends_with(".md"));
    }

    #[tokio::test]
    async fn restart_yields_a_new_session_object() {
        let mut h = started_harness(CallerIdentity::authenticated("user-1")).await;
        h.orchestrator.submit().await.unwrap();

        let old = h.orchestrator.restart().unwrap();
        assert_eq!(old.stage(), Stage::Finished);

        h.generator
            .queue_questions(MockGenerator::canned_questions(5));
        h.orchestrator.start(config()).await.unwrap();

        let new = h.orchestrator.session().unwrap();
        assert_ne!(new.id(), old.id());
        // The finished session was discarded, not reset in place
        assert_eq!(old.stage(), Stage::Finished);
        assert_eq!(new.stage(), Stage::Active);
    }
}
