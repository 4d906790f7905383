use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::sync::{Mutex as AsyncMutex, broadcast};
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info, warn};

use crate::{
    config::ClientConfig,
    dao::progress_store::{ProgressAdapter, StoreKind},
    dto::{
        guess::{GuessRequest, GuessVerdict},
        notice::Notice,
        phase::VisiblePhase,
        snapshot::RoundSnapshot,
        stats::CurrentStats,
    },
    error::{ServiceError, SessionError},
    services::collaborators::{GuessSubmitter, StatsProvider},
    state::{
        ladder::{Advance, RevealLadder, Rung},
        notices::NoticeHub,
        round::{Answer, Conclusion, RoundKey, RoundState},
        score::ScoreRule,
        state_machine::{ActivePhase, Outcome, SessionEvent, SessionPhase, SessionStateMachine},
    },
};

const NOTICE_CAPACITY: usize = 32;

/// Services a round talks to.
pub struct SessionDeps {
    /// Scores guesses.
    pub submitter: Arc<dyn GuessSubmitter>,
    /// Completion check and statistics.
    pub stats: Arc<dyn StatsProvider>,
    /// Where reveal progress is kept.
    pub progress: ProgressAdapter,
}

/// Result of a guess or a skip, as shown to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The guess matched; the round is over.
    Correct {
        /// Final score.
        score: u32,
        /// Song of the round.
        answer: Answer,
    },
    /// The server already holds a scored guess for this round.
    AlreadyPlayed {
        /// Song of the round.
        answer: Answer,
        /// Server explanation, if any.
        message: Option<String>,
    },
    /// Every rung was used without a correct guess.
    Incorrect {
        /// Final score.
        score: u32,
        /// Song of the round.
        answer: Answer,
    },
    /// Wrong guess; `rung` is now playable and `score` is on offer.
    TryAgain {
        /// Newly playable rung.
        rung: Rung,
        /// Points now on offer.
        score: u32,
    },
    /// The player skipped ahead to `rung`.
    Revealed {
        /// Newly playable rung.
        rung: Rung,
        /// Points now on offer.
        score: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubmitMode {
    Guess,
    Skip,
}

struct SessionInner {
    machine: SessionStateMachine,
    ladder: RevealLadder,
    score: u32,
    answer: Option<Answer>,
    message: Option<String>,
    stats: Option<CurrentStats>,
}

/// Drives one round: reveal depth, scoring, guess submission and persistence.
pub struct SessionController {
    round_key: RoundKey,
    rule: ScoreRule,
    reveal_delay: Duration,
    notice_ttl: Duration,
    skip_sentinel: String,
    submitter: Arc<dyn GuessSubmitter>,
    stats: Arc<dyn StatsProvider>,
    progress: ProgressAdapter,
    notices: NoticeHub,
    submit_gate: AsyncMutex<()>,
    inner: Mutex<SessionInner>,
}

impl SessionController {
    /// Build a controller in the loading phase. Call [`start`](Self::start) next.
    pub fn new(
        round_key: RoundKey,
        rungs: Vec<Rung>,
        config: &ClientConfig,
        deps: SessionDeps,
    ) -> Result<Self, SessionError> {
        let ladder = RevealLadder::new(rungs)?;
        let rule = ScoreRule::new(config.max_score);

        Ok(Self {
            round_key,
            rule,
            reveal_delay: config.reveal_delay,
            notice_ttl: config.notice_ttl,
            skip_sentinel: config.skip_sentinel.clone(),
            submitter: deps.submitter,
            stats: deps.stats,
            progress: deps.progress,
            notices: NoticeHub::new(NOTICE_CAPACITY),
            submit_gate: AsyncMutex::new(()),
            inner: Mutex::new(SessionInner {
                machine: SessionStateMachine::new(),
                ladder,
                score: rule.score_for(0),
                answer: None,
                message: None,
                stats: None,
            }),
        })
    }

    /// Build a controller over the configured default ladder, for rounds without their own.
    pub fn from_config(
        round_key: RoundKey,
        config: &ClientConfig,
        deps: SessionDeps,
    ) -> Result<Self, SessionError> {
        Self::new(round_key, config.default_rungs.clone(), config, deps)
    }

    /// Round this controller plays.
    pub fn round_key(&self) -> &RoundKey {
        &self.round_key
    }

    /// Persistence variant picked for this round.
    pub fn progress_kind(&self) -> StoreKind {
        self.progress.kind()
    }

    /// Receive every notice published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    /// Same as [`subscribe`](Self::subscribe), as a stream.
    pub fn notice_stream(&self) -> BroadcastStream<Notice> {
        self.notices.stream()
    }

    /// Wait until every progress save issued so far has settled.
    pub async fn flush(&self) {
        self.progress.flush().await;
    }

    /// Restore saved progress and check whether the round was already played.
    ///
    /// Both lookups run concurrently. Either failing only costs the player
    /// their saved depth or the completion check; the round still starts.
    pub async fn start(&self) -> Result<RoundSnapshot, SessionError> {
        let (saved, stats) = tokio::join!(
            self.progress.load(&self.round_key),
            self.stats.current_stats()
        );

        {
            let mut inner = self.lock();
            let phase = inner.machine.apply(SessionEvent::Loaded)?;

            if let Some(progress) = saved {
                if let Some(last) = progress.last_revealed() {
                    if let Err(err) = inner.ladder.jump_to(last) {
                        warn!(round_key = %self.round_key, error = %err, "saved progress does not match ladder; starting from first rung");
                    }
                }
                self.progress.save(&self.round_key, inner.ladder.revealed());
            }
            inner.score = self.rule.score_for(inner.ladder.current_index());
            debug!(
                round_key = %self.round_key,
                index = inner.ladder.current_index(),
                score = inner.score,
                "round loaded"
            );
            self.publish_phase(phase);

            match stats {
                Ok(stats) => {
                    if stats.has_played_current {
                        info!(round_key = %self.round_key, "round already played; showing results");
                        self.conclude(&mut inner, Outcome::AlreadyPlayed)?;
                    }
                    inner.stats = Some(stats.clone());
                    self.notices.broadcast(Notice::StatsUpdated { stats });
                }
                Err(err) => {
                    warn!(round_key = %self.round_key, error = %err, "failed to check round completion");
                }
            }
        }

        Ok(self.snapshot())
    }

    /// Send `text` as a guess for the clearest visible rung.
    pub async fn submit_guess(&self, text: &str) -> Result<TurnOutcome, SessionError> {
        let _gate = self
            .submit_gate
            .try_lock()
            .map_err(|_| SessionError::SubmissionInFlight)?;
        self.submit(text.to_string(), SubmitMode::Guess).await
    }

    /// Reveal the next rung, or give up and fetch the answer when none is left.
    pub async fn reveal_next(&self) -> Result<TurnOutcome, SessionError> {
        let _gate = self
            .submit_gate
            .try_lock()
            .map_err(|_| SessionError::SubmissionInFlight)?;

        {
            let mut inner = self.lock();
            inner.machine.apply(SessionEvent::RevealNext)?;
            if let Advance::Revealed(rung) = inner.ladder.advance() {
                inner.score = self.rule.score_for(inner.ladder.current_index());
                self.progress.save(&self.round_key, inner.ladder.revealed());
                self.publish_rung(&inner, rung.clone());
                return Ok(TurnOutcome::Revealed {
                    rung,
                    score: inner.score,
                });
            }
        }

        debug!(round_key = %self.round_key, "skipping past the last rung");
        let sentinel = self.skip_sentinel.clone();
        self.submit(sentinel, SubmitMode::Skip).await
    }

    /// Read-only view for rendering.
    pub fn snapshot(&self) -> RoundSnapshot {
        let inner = self.lock();
        let phase = inner.machine.phase();
        let awaiting = phase == SessionPhase::Active(ActivePhase::AwaitingGuess);

        RoundSnapshot {
            round_key: self.round_key.clone(),
            phase: VisiblePhase::from(&phase),
            current_index: inner.ladder.current_index(),
            concluded: conclusion(phase),
            score: inner.score,
            revealed: inner.ladder.revealed().to_vec(),
            answer: inner.answer.clone(),
            message: inner.message.clone(),
            guess_controls_visible: matches!(phase, SessionPhase::Active(_)),
            submission_enabled: awaiting,
            can_reveal_more: awaiting && !inner.ladder.is_at_ceiling(),
            stats: inner.stats.clone(),
        }
    }

    /// Current index, outcome and score.
    pub fn round_state(&self) -> RoundState {
        let inner = self.lock();
        RoundState {
            current_index: inner.ladder.current_index(),
            concluded: conclusion(inner.machine.phase()),
            score: inner.score,
        }
    }

    async fn submit(&self, guess: String, mode: SubmitMode) -> Result<TurnOutcome, SessionError> {
        let difficulty_level = {
            let mut inner = self.lock();
            let phase = inner.machine.apply(SessionEvent::Submit)?;
            self.publish_phase(phase);
            inner.ladder.current_index()
        };

        let pending = PendingSubmission::new(self);
        let result = self
            .submitter
            .submit(GuessRequest {
                guess,
                difficulty_level,
            })
            .await;
        pending.settle();

        let verdict = match result {
            Ok(verdict) => verdict,
            Err(err) => return Err(self.fail_submission(err)),
        };

        let outcome = self.apply_verdict(verdict, difficulty_level, mode)?;
        if !matches!(outcome, TurnOutcome::TryAgain { .. }) {
            self.refresh_stats().await;
        }
        Ok(outcome)
    }

    fn apply_verdict(
        &self,
        verdict: GuessVerdict,
        index: usize,
        mode: SubmitMode,
    ) -> Result<TurnOutcome, SessionError> {
        let mut inner = self.lock();
        let answer = verdict.correct_answer;

        if verdict.already_played {
            inner.answer = Some(answer.clone());
            inner.message = verdict.message.clone();
            self.conclude(&mut inner, Outcome::AlreadyPlayed)?;
            return Ok(TurnOutcome::AlreadyPlayed {
                answer,
                message: verdict.message,
            });
        }

        if verdict.correct {
            inner.score = verdict.score.unwrap_or_else(|| self.rule.score_for(index));
            inner.answer = Some(answer.clone());
            self.conclude(&mut inner, Outcome::Correct)?;
            return Ok(TurnOutcome::Correct {
                score: inner.score,
                answer,
            });
        }

        if mode == SubmitMode::Skip || inner.ladder.is_at_ceiling() {
            if mode == SubmitMode::Guess {
                inner.score = self.rule.score_for(index + 1);
            }
            inner.answer = Some(answer.clone());
            self.conclude(&mut inner, Outcome::Incorrect)?;
            return Ok(TurnOutcome::Incorrect {
                score: inner.score,
                answer,
            });
        }

        let phase = inner.machine.apply(SessionEvent::WrongGuess)?;
        let rung = match inner.ladder.advance() {
            Advance::Revealed(rung) => rung,
            Advance::AtCeiling => inner.ladder.current_rung().clone(),
        };
        inner.score = self.rule.score_for(inner.ladder.current_index());
        self.progress.save(&self.round_key, inner.ladder.revealed());

        debug!(round_key = %self.round_key, rung = %rung, score = inner.score, "wrong guess");
        self.publish_phase(phase);
        self.publish_rung(&inner, rung.clone());
        self.notices.broadcast(Notice::IncorrectGuess {
            dismiss_after_ms: millis(self.notice_ttl),
        });

        Ok(TurnOutcome::TryAgain {
            rung,
            score: inner.score,
        })
    }

    fn fail_submission(&self, err: ServiceError) -> SessionError {
        warn!(round_key = %self.round_key, error = %err, "guess submission failed");
        {
            let mut inner = self.lock();
            match inner.machine.apply(SessionEvent::SubmitFailed) {
                Ok(phase) => self.publish_phase(phase),
                Err(invalid) => warn!(error = %invalid, "could not reopen guess form"),
            }
        }
        self.notices.broadcast(Notice::SubmissionFailed {
            message: err.to_string(),
        });
        SessionError::Submission(err)
    }

    /// Enter a terminal phase, reveal everything and persist the full ladder.
    fn conclude(&self, inner: &mut SessionInner, outcome: Outcome) -> Result<(), SessionError> {
        let phase = inner.machine.apply(SessionEvent::Conclude(outcome))?;
        inner.ladder.reveal_all();
        self.progress.save(&self.round_key, inner.ladder.revealed());

        info!(round_key = %self.round_key, ?outcome, score = inner.score, "round concluded");
        self.publish_phase(phase);
        self.notices.broadcast(Notice::Concluded {
            outcome: outcome.into(),
            score: inner.score,
            answer: inner.answer.clone(),
            message: inner.message.clone(),
        });
        Ok(())
    }

    async fn refresh_stats(&self) {
        match self.stats.current_stats().await {
            Ok(stats) => {
                self.lock().stats = Some(stats.clone());
                self.notices.broadcast(Notice::StatsUpdated { stats });
            }
            Err(err) => {
                warn!(round_key = %self.round_key, error = %err, "failed to refresh round stats");
            }
        }
    }

    fn publish_phase(&self, phase: SessionPhase) {
        self.notices.broadcast(Notice::PhaseChanged {
            phase: VisiblePhase::from(&phase),
        });
    }

    fn publish_rung(&self, inner: &SessionInner, rung: Rung) {
        self.notices.broadcast(Notice::RungRevealed {
            rung,
            index: inner.ladder.current_index(),
            score: inner.score,
            visible_after_ms: millis(self.reveal_delay),
        });
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Reopens the guess form if a submission future is dropped before the server answers.
struct PendingSubmission<'a> {
    controller: &'a SessionController,
    settled: bool,
}

impl<'a> PendingSubmission<'a> {
    fn new(controller: &'a SessionController) -> Self {
        Self {
            controller,
            settled: false,
        }
    }

    fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut inner = self.controller.lock();
        if let Ok(phase) = inner.machine.apply(SessionEvent::SubmitFailed) {
            debug!(round_key = %self.controller.round_key, "guess submission abandoned");
            self.controller.publish_phase(phase);
        }
    }
}

fn conclusion(phase: SessionPhase) -> Conclusion {
    match phase {
        SessionPhase::Concluded(outcome) => outcome.into(),
        SessionPhase::Init | SessionPhase::Active(_) => Conclusion::NotConcluded,
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use futures::{
        StreamExt,
        future::{self, BoxFuture},
    };
    use tokio::sync::Notify;

    use super::*;
    use crate::{
        dao::progress_store::{LocalProgressStore, MemoryStorage},
        error::ServiceResult,
    };

    fn answer() -> Answer {
        Answer {
            title: "Heroes".into(),
            artist: "David Bowie".into(),
        }
    }

    fn wrong() -> GuessVerdict {
        GuessVerdict {
            correct: false,
            already_played: false,
            correct_answer: answer(),
            score: None,
            message: None,
        }
    }

    #[derive(Default)]
    struct ScriptedSubmitter {
        verdicts: Mutex<VecDeque<ServiceResult<GuessVerdict>>>,
        requests: Mutex<Vec<GuessRequest>>,
        hold: Option<Arc<Notify>>,
        never_answer: bool,
    }

    impl ScriptedSubmitter {
        fn push(&self, verdict: ServiceResult<GuessVerdict>) {
            self.verdicts.lock().unwrap().push_back(verdict);
        }
    }

    impl GuessSubmitter for ScriptedSubmitter {
        fn submit(&self, request: GuessRequest) -> BoxFuture<'static, ServiceResult<GuessVerdict>> {
            self.requests.lock().unwrap().push(request);
            if self.never_answer {
                return Box::pin(future::pending());
            }
            let verdict = self
                .verdicts
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(wrong()));
            let hold = self.hold.clone();
            Box::pin(async move {
                if let Some(hold) = hold {
                    hold.notified().await;
                }
                verdict
            })
        }
    }

    struct NoStats;

    impl StatsProvider for NoStats {
        fn current_stats(&self) -> BoxFuture<'static, ServiceResult<CurrentStats>> {
            Box::pin(async { Err(ServiceError::rejected("current stats", "signed out")) })
        }
    }

    fn session(submitter: Arc<ScriptedSubmitter>) -> SessionController {
        let config = ClientConfig {
            max_score: 5,
            ..ClientConfig::default()
        };
        let store = LocalProgressStore::new(Arc::new(MemoryStorage::new()), "progress");
        SessionController::new(
            RoundKey::from("1@2026-10-15"),
            ["r0", "r1", "r2", "r3", "r4"].into_iter().map(Rung::from).collect(),
            &config,
            SessionDeps {
                submitter,
                stats: Arc::new(NoStats),
                progress: ProgressAdapter::new(Arc::new(store)),
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn default_ladder_comes_from_config() {
        let submitter = Arc::new(ScriptedSubmitter::default());
        let controller = SessionController::from_config(
            "round".into(),
            &ClientConfig::default(),
            SessionDeps {
                submitter: submitter.clone(),
                stats: Arc::new(NoStats),
                progress: ProgressAdapter::new(Arc::new(LocalProgressStore::new(
                    Arc::new(MemoryStorage::new()),
                    "progress",
                ))),
            },
        )
        .unwrap();

        let snapshot = controller.start().await.unwrap();
        assert_eq!(snapshot.revealed, vec![Rung::from("100")]);
        assert_eq!(snapshot.score, 8);

        for _ in 0..6 {
            controller.reveal_next().await.unwrap();
        }
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.current_index, 6);
        assert_eq!(snapshot.revealed.last(), Some(&Rung::from("7500")));
        assert!(!snapshot.can_reveal_more);
    }

    #[tokio::test]
    async fn notice_stream_follows_round_progress() {
        let controller = session(Arc::new(ScriptedSubmitter::default()));
        let mut stream = controller.notice_stream();

        controller.start().await.unwrap();
        controller.reveal_next().await.unwrap();

        assert_eq!(
            stream.next().await.unwrap().unwrap(),
            Notice::PhaseChanged {
                phase: VisiblePhase::Guessing
            }
        );
        assert_eq!(
            stream.next().await.unwrap().unwrap(),
            Notice::RungRevealed {
                rung: Rung::from("r1"),
                index: 1,
                score: 4,
                visible_after_ms: 1_000,
            }
        );
    }

    #[tokio::test]
    async fn empty_ladder_is_rejected() {
        let result = SessionController::new(
            "round".into(),
            Vec::new(),
            &ClientConfig::default(),
            SessionDeps {
                submitter: Arc::new(ScriptedSubmitter::default()),
                stats: Arc::new(NoStats),
                progress: ProgressAdapter::new(Arc::new(LocalProgressStore::new(
                    Arc::new(MemoryStorage::new()),
                    "progress",
                ))),
            },
        );
        assert!(matches!(result, Err(SessionError::Ladder(_))));
    }

    #[tokio::test]
    async fn guessing_requires_a_started_round() {
        let controller = session(Arc::new(ScriptedSubmitter::default()));
        let err = controller.submit_guess("anything").await.unwrap_err();
        assert_eq!(err.rejected_phase(), Some(SessionPhase::Init));

        controller.start().await.unwrap();
        assert!(matches!(
            controller.start().await,
            Err(SessionError::InvalidTransition(_))
        ));
    }

    #[tokio::test]
    async fn second_submission_while_first_in_flight_is_rejected() {
        let hold = Arc::new(Notify::new());
        let submitter = Arc::new(ScriptedSubmitter {
            hold: Some(hold.clone()),
            ..ScriptedSubmitter::default()
        });
        let controller = Arc::new(session(submitter.clone()));
        controller.start().await.unwrap();

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit_guess("first").await }
        });
        while controller.snapshot().phase != VisiblePhase::Submitting {
            tokio::task::yield_now().await;
        }
        assert!(!controller.snapshot().submission_enabled);

        assert!(matches!(
            controller.submit_guess("second").await,
            Err(SessionError::SubmissionInFlight)
        ));
        assert!(matches!(
            controller.reveal_next().await,
            Err(SessionError::SubmissionInFlight)
        ));

        hold.notify_one();
        let outcome = first.await.unwrap().unwrap();
        assert_eq!(
            outcome,
            TurnOutcome::TryAgain {
                rung: Rung::from("r1"),
                score: 4
            }
        );
        assert_eq!(submitter.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_submission_reopens_guess_form() {
        let submitter = Arc::new(ScriptedSubmitter {
            never_answer: true,
            ..ScriptedSubmitter::default()
        });
        let controller = session(submitter);
        controller.start().await.unwrap();

        let attempt = tokio::time::timeout(
            Duration::from_millis(50),
            controller.submit_guess("lost"),
        )
        .await;
        assert!(attempt.is_err());

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, VisiblePhase::Guessing);
        assert!(snapshot.submission_enabled);
        assert_eq!(
            controller.reveal_next().await.unwrap(),
            TurnOutcome::Revealed {
                rung: Rung::from("r1"),
                score: 4
            }
        );
    }

    #[tokio::test]
    async fn failed_submission_leaves_round_untouched_and_notifies() {
        let submitter = Arc::new(ScriptedSubmitter::default());
        submitter.push(Err(ServiceError::rejected("submit guess", "502")));
        let controller = session(submitter.clone());
        controller.start().await.unwrap();
        let mut notices = controller.subscribe();

        let before = controller.round_state();
        let err = controller.submit_guess("oops").await.unwrap_err();
        assert!(matches!(err, SessionError::Submission(_)));
        assert_eq!(controller.round_state(), before);

        let mut saw_failure = false;
        while let Ok(notice) = notices.try_recv() {
            saw_failure |= matches!(notice, Notice::SubmissionFailed { .. });
        }
        assert!(saw_failure);

        assert!(matches!(
            controller.submit_guess("retry").await.unwrap(),
            TurnOutcome::TryAgain { .. }
        ));
    }

    #[tokio::test]
    async fn wrong_guess_publishes_reveal_and_transient_notice() {
        let controller = session(Arc::new(ScriptedSubmitter::default()));
        controller.start().await.unwrap();
        let mut notices = controller.subscribe();

        controller.submit_guess("nope").await.unwrap();

        let received = std::iter::from_fn(|| notices.try_recv().ok()).collect::<Vec<_>>();
        assert!(received.contains(&Notice::RungRevealed {
            rung: Rung::from("r1"),
            index: 1,
            score: 4,
            visible_after_ms: 1_000,
        }));
        assert!(received.contains(&Notice::IncorrectGuess {
            dismiss_after_ms: 2_000
        }));
    }

    #[tokio::test]
    async fn correct_guess_uses_local_score_when_server_omits_it() {
        let submitter = Arc::new(ScriptedSubmitter::default());
        submitter.push(Ok(wrong()));
        submitter.push(Ok(GuessVerdict {
            correct: true,
            ..wrong()
        }));
        let controller = session(submitter.clone());
        controller.start().await.unwrap();

        controller.submit_guess("nope").await.unwrap();
        let outcome = controller.submit_guess("Heroes - David Bowie").await.unwrap();
        assert_eq!(
            outcome,
            TurnOutcome::Correct {
                score: 4,
                answer: answer()
            }
        );

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.concluded, Conclusion::Correct);
        assert_eq!(snapshot.current_index, 4);
        assert!(!snapshot.guess_controls_visible);

        let levels = submitter
            .requests
            .lock()
            .unwrap()
            .iter()
            .map(|request| request.difficulty_level)
            .collect::<Vec<_>>();
        assert_eq!(levels, vec![0, 1]);
    }

    #[tokio::test]
    async fn concluded_round_rejects_further_actions() {
        let submitter = Arc::new(ScriptedSubmitter::default());
        submitter.push(Ok(GuessVerdict {
            correct: true,
            score: Some(5),
            ..wrong()
        }));
        let controller = session(submitter);
        controller.start().await.unwrap();
        controller.submit_guess("right").await.unwrap();

        assert!(matches!(
            controller.submit_guess("again").await,
            Err(SessionError::InvalidTransition(_))
        ));
        assert!(matches!(
            controller.reveal_next().await,
            Err(SessionError::InvalidTransition(_))
        ));
        assert_eq!(controller.round_state().score, 5);
    }
}
