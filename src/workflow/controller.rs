use std::rc::Rc;
use std::time::Duration;

use super::clock::{Clock, TimerHandle};
use super::outcome::{badges_for, LanguageBadge, ResultOutcome, TranslatedArchive};
use super::progress::{ProgressState, RandomSource};
use super::selection::{SelectionState, ValidatedSelection, ValidationError};
use super::ticker::ProgressTicker;

/// Pause at 100% before the success view replaces the progress view.
pub const SUCCESS_REVEAL_DELAY: Duration = Duration::from_millis(500);

/// Presentation surface driven by the workflow. Implementations must not
/// call back into the workflow synchronously.
pub trait WorkflowView {
    fn show_validation_error(&self, error: &ValidationError);
    fn show_progress(&self, progress: &ProgressState);
    fn show_badges(&self, badges: &[LanguageBadge]);
    fn show_success(&self, archive: &TranslatedArchive);
    fn show_failure(&self, message: &str);
    /// Back to the empty form: no progress, result, badges or warnings.
    fn reset(&self);
}

/// Identifies one accepted submission. Outcomes carrying any other id are
/// stale and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionId(u64);

/// An accepted submission: what to send, and the id to report back with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: SubmissionId,
    pub selection: ValidatedSelection,
}

/// Upload → simulated progress → outcome, for one form.
pub struct UploadWorkflow {
    view: Rc<dyn WorkflowView>,
    clock: Rc<dyn Clock>,
    ticker: ProgressTicker,
    selection: SelectionState,
    next_id: u64,
    submitted: Option<(SubmissionId, ValidatedSelection)>,
    outcome: Option<ResultOutcome>,
    reveal_timer: Option<TimerHandle>,
}

impl UploadWorkflow {
    pub fn new(
        view: Rc<dyn WorkflowView>,
        clock: Rc<dyn Clock>,
        random: Box<dyn RandomSource>,
    ) -> Self {
        let progress_view = view.clone();
        let ticker = ProgressTicker::new(clock.clone(), random, move |state| {
            progress_view.show_progress(state)
        });
        Self {
            view,
            clock,
            ticker,
            selection: SelectionState::default(),
            next_id: 0,
            submitted: None,
            outcome: None,
            reveal_timer: None,
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    pub fn progress(&self) -> ProgressState {
        self.ticker.state()
    }

    /// True between a successful `begin_submission` and its `finish`.
    pub fn in_flight(&self) -> bool {
        self.submitted.is_some() && self.outcome.is_none()
    }

    /// Validate the form and, if it passes, start the progress animation.
    /// The caller sends the returned snapshot to the server and reports the
    /// result through `finish` with the returned id. On error the view has
    /// already been told.
    pub fn begin_submission(&mut self) -> Result<Submission, ValidationError> {
        let validated = if self.in_flight() {
            Err(ValidationError::InProgress)
        } else {
            self.selection.validate()
        };
        let validated = match validated {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Submission rejected: {e}");
                self.view.show_validation_error(&e);
                return Err(e);
            }
        };

        self.reveal_timer = None;
        self.outcome = None;
        self.view
            .show_badges(&badges_for(&validated.target_languages, None));
        self.next_id += 1;
        let id = SubmissionId(self.next_id);
        self.submitted = Some((id, validated.clone()));
        self.ticker.start();

        log::info!(
            "Submitting {} for {} language(s) as #{}",
            validated.file.name,
            validated.target_languages.len(),
            id.0
        );
        Ok(Submission {
            id,
            selection: validated,
        })
    }

    /// Present the server's answer to submission `id`. The progress timer is
    /// stopped before anything is shown.
    pub fn finish(&mut self, id: SubmissionId, outcome: ResultOutcome) {
        let Some((current, submitted)) = self.submitted.as_ref() else {
            log::warn!("Ignoring outcome with no submission in flight");
            return;
        };
        if *current != id {
            log::warn!("Ignoring stale outcome for #{} (current #{})", id.0, current.0);
            return;
        }
        if self.outcome.is_some() {
            log::warn!("Ignoring duplicate outcome");
            return;
        }
        let badges = badges_for(&submitted.target_languages, Some(&outcome));

        match &outcome {
            ResultOutcome::Success(archive) => {
                log::info!("Translation succeeded: {}", archive.filename);
                self.ticker.complete();
                self.view.show_badges(&badges);

                let view = self.view.clone();
                let ticker = self.ticker.clone();
                let archive = archive.clone();
                self.reveal_timer = Some(self.clock.schedule(
                    SUCCESS_REVEAL_DELAY,
                    Box::new(move || {
                        ticker.finish();
                        view.show_success(&archive);
                    }),
                ));
            }
            ResultOutcome::Failure { message } => {
                log::error!("Translation failed: {message}");
                self.ticker.finish();
                self.view.show_badges(&badges);
                self.view.show_failure(message);
            }
        }
        self.outcome = Some(outcome);
    }

    /// The archive from the last successful run, for saving to disk.
    pub fn download_payload(&self) -> Option<&TranslatedArchive> {
        match &self.outcome {
            Some(ResultOutcome::Success(archive)) => Some(archive),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn outcome(&self) -> Option<&ResultOutcome> {
        self.outcome.as_ref()
    }

    /// Drop everything: selection, progress, pending reveal and result.
    pub fn reset(&mut self) {
        self.reveal_timer = None;
        self.ticker.reset();
        self.selection = SelectionState::default();
        self.submitted = None;
        self.outcome = None;
        self.view.reset();
        log::info!("Form reset");
    }
}

impl Drop for UploadWorkflow {
    fn drop(&mut self) {
        self.reveal_timer = None;
        self.ticker.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::clock::manual::ManualClock;
    use crate::workflow::outcome::BadgeState;
    use crate::workflow::progress::{ProgressPhase, PROCESSING_CAP};
    use crate::workflow::selection::SelectedFile;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    enum Shown {
        Validation(ValidationError),
        Progress(ProgressState),
        Badges(Vec<LanguageBadge>),
        Success(String, Option<String>),
        Failure(String),
        Reset,
    }

    #[derive(Default)]
    struct RecordingView {
        shown: RefCell<Vec<Shown>>,
    }

    impl RecordingView {
        fn take(&self) -> Vec<Shown> {
            std::mem::take(&mut *self.shown.borrow_mut())
        }

        fn progress_updates(&self) -> usize {
            self.shown
                .borrow()
                .iter()
                .filter(|s| matches!(s, Shown::Progress(_)))
                .count()
        }
    }

    impl WorkflowView for RecordingView {
        fn show_validation_error(&self, error: &ValidationError) {
            self.shown.borrow_mut().push(Shown::Validation(*error));
        }
        fn show_progress(&self, progress: &ProgressState) {
            self.shown.borrow_mut().push(Shown::Progress(*progress));
        }
        fn show_badges(&self, badges: &[LanguageBadge]) {
            self.shown.borrow_mut().push(Shown::Badges(badges.to_vec()));
        }
        fn show_success(&self, archive: &TranslatedArchive) {
            self.shown
                .borrow_mut()
                .push(Shown::Success(archive.filename.clone(), archive.warnings.clone()));
        }
        fn show_failure(&self, message: &str) {
            self.shown.borrow_mut().push(Shown::Failure(message.to_string()));
        }
        fn reset(&self) {
            self.shown.borrow_mut().push(Shown::Reset);
        }
    }

    fn setup() -> (UploadWorkflow, Rc<RecordingView>, ManualClock) {
        let view = Rc::new(RecordingView::default());
        let clock = ManualClock::new();
        let workflow = UploadWorkflow::new(
            view.clone(),
            Rc::new(clock.clone()),
            Box::new(StdRng::seed_from_u64(42)),
        );
        (workflow, view, clock)
    }

    fn fill(workflow: &mut UploadWorkflow) {
        let s = workflow.selection_mut();
        s.set_file(Some(SelectedFile {
            path: "/tmp/deck.pptx".into(),
            name: "deck.pptx".into(),
            size_bytes: 4096,
        }));
        s.select_language("fr");
        s.select_language("ja");
        s.set_format("pptx", true);
        s.set_service("google");
    }

    fn archive(warnings: Option<&str>) -> ResultOutcome {
        ResultOutcome::Success(TranslatedArchive {
            bytes: b"PK".to_vec(),
            filename: "deck.zip".into(),
            warnings: warnings.map(str::to_string),
        })
    }

    #[test]
    fn each_missing_piece_shows_exactly_one_message() {
        let cases: [(fn(&mut SelectionState), ValidationError); 3] = [
            (|s| s.set_file(None), ValidationError::NoFile),
            (
                |s| {
                    s.deselect_language("fr");
                    s.deselect_language("ja");
                },
                ValidationError::NoLanguage,
            ),
            (|s| s.set_format("pptx", false), ValidationError::NoFormat),
        ];
        for (break_it, expected) in cases {
            let (mut wf, view, clock) = setup();
            fill(&mut wf);
            break_it(wf.selection_mut());

            assert_eq!(wf.begin_submission(), Err(expected));
            assert_eq!(view.take(), [Shown::Validation(expected)]);
            assert!(!wf.in_flight());
            assert_eq!(clock.pending(), 0);
        }
    }

    #[test]
    fn begin_marks_badges_pending_and_starts_progress() {
        let (mut wf, view, clock) = setup();
        fill(&mut wf);
        let submission = wf.begin_submission().unwrap();
        assert_eq!(submission.selection.target_languages, ["fr", "ja"]);
        assert!(wf.in_flight());
        assert_eq!(clock.pending(), 1);

        let shown = view.take();
        match &shown[0] {
            Shown::Badges(b) => assert!(b.iter().all(|b| b.state == BadgeState::Pending)),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            shown[1],
            Shown::Progress(ProgressState {
                phase: ProgressPhase::Uploading,
                ..
            })
        ));
    }

    #[test]
    fn second_submission_while_in_flight_is_rejected() {
        let (mut wf, view, _clock) = setup();
        fill(&mut wf);
        wf.begin_submission().unwrap();
        view.take();
        assert_eq!(wf.begin_submission(), Err(ValidationError::InProgress));
        assert_eq!(view.take(), [Shown::Validation(ValidationError::InProgress)]);
    }

    #[test]
    fn success_reveals_after_delay_and_freezes_progress() {
        let (mut wf, view, clock) = setup();
        fill(&mut wf);
        let id = wf.begin_submission().unwrap().id;
        clock.advance(Duration::from_secs(3));
        view.take();

        wf.finish(id, archive(Some("ja: partial")));
        assert_eq!(wf.progress().percent, 100.0);
        assert_eq!(wf.progress().phase, ProgressPhase::Completing);
        let shown = view.take();
        assert!(!shown.iter().any(|s| matches!(s, Shown::Success(..))));
        match shown.iter().find(|s| matches!(s, Shown::Badges(_))) {
            Some(Shown::Badges(b)) => assert!(b.iter().all(|b| b.state == BadgeState::Success)),
            _ => panic!("badges not shown"),
        }

        clock.advance(SUCCESS_REVEAL_DELAY);
        let shown = view.take();
        assert!(shown.contains(&Shown::Success(
            "deck.zip".into(),
            Some("ja: partial".into())
        )));
        assert_eq!(wf.progress().phase, ProgressPhase::Done);
        assert_eq!(wf.download_payload().map(|a| a.filename.as_str()), Some("deck.zip"));

        clock.advance(Duration::from_secs(60));
        assert_eq!(view.progress_updates(), 0);
        assert_eq!(wf.progress().percent, 100.0);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn failure_stops_ticker_and_marks_badges_error() {
        let (mut wf, view, clock) = setup();
        fill(&mut wf);
        let id = wf.begin_submission().unwrap().id;
        clock.advance(Duration::from_secs(120));
        assert_eq!(wf.progress().percent, PROCESSING_CAP);
        view.take();

        wf.finish(id, ResultOutcome::failure("boom"));
        let shown = view.take();
        assert!(shown.contains(&Shown::Failure("boom".into())));
        match shown.iter().find(|s| matches!(s, Shown::Badges(_))) {
            Some(Shown::Badges(b)) => assert!(b.iter().all(|b| b.state == BadgeState::Error)),
            _ => panic!("badges not shown"),
        }
        assert_eq!(wf.progress().phase, ProgressPhase::Done);
        assert!(wf.download_payload().is_none());

        clock.advance(Duration::from_secs(60));
        assert_eq!(view.progress_updates(), 0);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn response_before_upload_phase_ends() {
        let (mut wf, view, clock) = setup();
        fill(&mut wf);
        let id = wf.begin_submission().unwrap().id;
        clock.advance(Duration::from_millis(150));
        wf.finish(id, ResultOutcome::failure("refused"));
        view.take();
        clock.advance(Duration::from_secs(10));
        assert!(view.take().is_empty());
        assert_eq!(wf.progress().percent, 5.0);
    }

    #[test]
    fn outcome_is_accepted_only_once() {
        let (mut wf, view, clock) = setup();
        fill(&mut wf);
        let id = wf.begin_submission().unwrap().id;
        wf.finish(id, ResultOutcome::failure("first"));
        view.take();
        wf.finish(id, archive(None));
        assert!(view.take().is_empty());
        assert_eq!(wf.outcome(), Some(&ResultOutcome::failure("first")));
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn outcome_without_submission_is_ignored() {
        let (mut wf, view, _clock) = setup();
        wf.finish(SubmissionId(1), archive(None));
        assert!(view.take().is_empty());
        assert!(wf.outcome().is_none());
    }

    #[test]
    fn reset_returns_everything_to_initial() {
        for outcome in [archive(Some("w")), ResultOutcome::failure("x")] {
            let (mut wf, view, clock) = setup();
            fill(&mut wf);
            let id = wf.begin_submission().unwrap().id;
            clock.advance(Duration::from_secs(2));
            wf.finish(id, outcome);

            wf.reset();
            assert_eq!(view.take().last(), Some(&Shown::Reset));
            assert_eq!(*wf.selection(), SelectionState::default());
            assert_eq!(wf.progress(), ProgressState::default());
            assert!(wf.outcome().is_none());
            assert!(wf.download_payload().is_none());
            assert!(!wf.in_flight());
            assert_eq!(clock.pending(), 0);

            // Nothing left over fires later, including the success reveal.
            clock.advance(Duration::from_secs(5));
            assert!(view.take().is_empty());
        }
    }

    #[test]
    fn reset_mid_flight_cancels_progress() {
        let (mut wf, view, clock) = setup();
        fill(&mut wf);
        let id = wf.begin_submission().unwrap().id;
        clock.advance(Duration::from_millis(300));
        wf.reset();
        view.take();
        clock.advance(Duration::from_secs(5));
        assert!(view.take().is_empty());

        // A late response for the abandoned run is dropped.
        wf.finish(id, archive(None));
        assert!(view.take().is_empty());
    }

    #[test]
    fn late_reply_after_reset_does_not_land_on_next_submission() {
        let (mut wf, view, _clock) = setup();
        fill(&mut wf);
        let first = wf.begin_submission().unwrap().id;
        wf.reset();
        fill(&mut wf);
        let second = wf.begin_submission().unwrap().id;
        assert_ne!(first, second);
        view.take();

        wf.finish(first, ResultOutcome::failure("reply to the abandoned run"));
        assert!(view.take().is_empty());
        assert!(wf.in_flight());
        assert!(wf.outcome().is_none());

        wf.finish(second, archive(None));
        assert!(wf.outcome().is_some_and(ResultOutcome::is_success));
        assert!(!wf.in_flight());
    }

    #[test]
    fn resubmit_after_outcome() {
        let (mut wf, _view, clock) = setup();
        fill(&mut wf);
        let id = wf.begin_submission().unwrap().id;
        wf.finish(id, ResultOutcome::failure("first"));
        assert!(wf.begin_submission().is_ok());
        assert!(wf.outcome().is_none());
        assert_eq!(wf.progress().phase, ProgressPhase::Uploading);
        assert_eq!(clock.pending(), 1);
    }

    #[test]
    fn teardown_cancels_timers() {
        let (mut wf, _view, clock) = setup();
        fill(&mut wf);
        let id = wf.begin_submission().unwrap().id;
        wf.finish(id, archive(None));
        assert_eq!(clock.pending(), 1);
        drop(wf);
        assert_eq!(clock.pending(), 0);
    }
}
