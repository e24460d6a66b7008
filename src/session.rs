//! One game session
//!
//! Owns the single [`GameState`]. Input handlers and the frame callback both
//! go through `&mut Session`, so there is exactly one writer at a time.
//! Simulation events are turned into cues and score submissions here, which
//! keeps `sim` free of side effects.

use crate::renderer::{HudOptions, Surface, compose_frame};
use crate::scheduler::{FrameHost, FrameOutcome, FrameScheduler, SchedulerError, SchedulerPhase};
use crate::score_sink::{GAME_ID, ScoreSink};
use crate::sim::{GameEvent, GameState, Playfield, TickInput, tick};
use crate::theme::AssetProvider;
use crate::tuning::Tuning;

pub struct Session<H: FrameHost> {
    state: GameState,
    scheduler: FrameScheduler<H>,
    input: TickInput,
    assets: Box<dyn AssetProvider>,
    sinks: Vec<Box<dyn ScoreSink>>,
    hud: HudOptions,
}

impl<H: FrameHost> Session<H> {
    pub fn new(host: H, tuning: Tuning, playfield: Playfield, assets: Box<dyn AssetProvider>) -> Self {
        Self {
            state: GameState::new(0, playfield, tuning),
            scheduler: FrameScheduler::new(host),
            input: TickInput::default(),
            assets,
            sinks: Vec::new(),
            hud: HudOptions::default(),
        }
    }

    pub fn add_sink(&mut self, sink: Box<dyn ScoreSink>) {
        self.sinks.push(sink);
    }

    pub fn set_hud(&mut self, hud: HudOptions) {
        self.hud = hud;
    }

    /// Swap theme assets. Callers restart the run afterwards.
    pub fn set_assets(&mut self, assets: Box<dyn AssetProvider>) {
        self.assets.stop_all_cues();
        self.assets = assets;
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.scheduler.phase()
    }

    pub fn scheduler(&self) -> &FrameScheduler<H> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut FrameScheduler<H> {
        &mut self.scheduler
    }

    /// Fresh run on `playfield`, parked at "tap to start"
    pub fn start(&mut self, seed: u64, playfield: Playfield) -> Result<(), SchedulerError> {
        if self.scheduler.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }
        self.state.reset(seed, playfield);
        self.input = TickInput::default();
        self.assets.play_intro_cue();
        log::info!("New run (seed {seed}, {}x{})", playfield.width, playfield.height);
        self.scheduler.start()
    }

    /// Abandon whatever is running and start over
    pub fn restart(&mut self, seed: u64, playfield: Playfield) -> Result<(), SchedulerError> {
        self.scheduler.stop();
        self.start(seed, playfield)
    }

    /// Queue a jump for the next tick. Ignored unless a run is live.
    pub fn jump(&mut self) -> bool {
        if !self.scheduler.is_running() || self.state.is_terminal() {
            return false;
        }
        self.input.jump = true;
        true
    }

    /// End the run now with the current score
    pub fn abort(&mut self) -> bool {
        if !self.scheduler.is_running() {
            return false;
        }
        tick(
            &mut self.state,
            &TickInput {
                abort: true,
                ..Default::default()
            },
        );
        self.dispatch_events();
        self.scheduler.finish();
        true
    }

    /// Cancel the pending frame; the session can be dropped afterwards
    pub fn stop(&mut self) {
        self.scheduler.stop();
        self.assets.stop_all_cues();
    }

    /// Frame callback: one tick, events, one painted frame, then reschedule
    pub fn on_frame(&mut self, surface: &mut dyn Surface) -> Result<FrameOutcome, SchedulerError> {
        self.scheduler.begin_frame()?;

        let input = std::mem::take(&mut self.input);
        tick(&mut self.state, &input);
        self.dispatch_events();

        self.render(surface);
        Ok(self.scheduler.end_frame(self.state.is_terminal()))
    }

    /// Paint the current state without advancing it
    pub fn render(&self, surface: &mut dyn Surface) {
        let frame = compose_frame(&self.state, &self.assets.frame_images(), &self.hud);
        surface.present(&frame);
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::RunActivated => self.assets.stop_all_cues(),
                GameEvent::Jumped => self.assets.play_jump_cue(),
                GameEvent::GameOver { score } => {
                    self.assets.play_termination_cue();
                    for sink in &mut self.sinks {
                        sink.submit_score(GAME_ID, score);
                    }
                }
                GameEvent::Scored { .. } | GameEvent::LifeLost { .. } | GameEvent::LifeGained { .. } => {
                    log::trace!("{event:?}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessFrameHost;
    use crate::renderer::{ImageHandle, RecordingSurface};
    use crate::score_sink::{MemorySink, ScoreSubmission};
    use crate::sim::GamePhase;
    use std::cell::RefCell;
    use std::rc::Rc;

    type CueLog = Rc<RefCell<Vec<&'static str>>>;

    /// No images; records every cue call
    struct RecordingAssets {
        log: CueLog,
    }

    impl AssetProvider for RecordingAssets {
        fn avatar_image(&self) -> Option<ImageHandle> {
            None
        }
        fn obstacle_image(&self) -> Option<ImageHandle> {
            None
        }
        fn hazard_image(&self) -> Option<ImageHandle> {
            None
        }
        fn play_jump_cue(&mut self) {
            self.log.borrow_mut().push("jump");
        }
        fn play_termination_cue(&mut self) {
            self.log.borrow_mut().push("termination");
        }
        fn play_intro_cue(&mut self) {
            self.log.borrow_mut().push("intro");
        }
        fn stop_all_cues(&mut self) {
            self.log.borrow_mut().push("stop");
        }
    }

    struct Harness {
        session: Session<HeadlessFrameHost>,
        surface: RecordingSurface,
        sink: Rc<RefCell<MemorySink>>,
        cues: CueLog,
    }

    const FIELD: Playfield = Playfield {
        width: 1200.0,
        height: 800.0,
    };

    fn harness() -> Harness {
        let cues = CueLog::default();
        let sink = Rc::new(RefCell::new(MemorySink::default()));
        let mut session = Session::new(
            HeadlessFrameHost::default(),
            Tuning::default(),
            FIELD,
            Box::new(RecordingAssets { log: cues.clone() }),
        );
        session.add_sink(Box::new(sink.clone()));
        Harness {
            session,
            surface: RecordingSurface::default(),
            sink,
            cues,
        }
    }

    impl Harness {
        /// Deliver one animation frame
        fn frame(&mut self) -> Result<FrameOutcome, SchedulerError> {
            self.session.scheduler_mut().host_mut().fire();
            self.session.on_frame(&mut self.surface)
        }

        fn run_to_end(&mut self, max_frames: u32) -> u32 {
            for n in 1..=max_frames {
                if self.frame().unwrap() == FrameOutcome::Finished {
                    return n;
                }
            }
            panic!("run did not finish in {max_frames} frames");
        }

        fn submissions(&self) -> Vec<ScoreSubmission> {
            self.sink.borrow().submissions.clone()
        }
    }

    #[test]
    fn test_waits_for_first_jump() {
        let mut h = harness();
        h.session.start(1, FIELD).unwrap();
        for _ in 0..20 {
            assert_eq!(h.frame().unwrap(), FrameOutcome::Continue);
        }
        assert_eq!(h.session.state().run.phase, GamePhase::AwaitingInput);
        let frame = h.surface.last.as_ref().unwrap();
        assert!(frame.texts().any(|t| t == "TAP TO START"));
        assert_eq!(h.surface.frames_presented, 20);
    }

    #[test]
    fn test_single_jump_falls_to_game_over() {
        let mut h = harness();
        h.session.start(42, FIELD).unwrap();
        assert!(h.session.jump());
        h.run_to_end(1_000);

        assert_eq!(h.session.phase(), SchedulerPhase::Terminal);
        assert!(!h.session.scheduler().has_pending());
        assert!(h.session.scheduler().host().pending().is_empty());
        assert_eq!(
            h.submissions(),
            vec![ScoreSubmission {
                game_id: "flyingMeme".into(),
                score: 0
            }]
        );
        assert_eq!(
            *h.cues.borrow(),
            vec!["intro", "stop", "jump", "termination"]
        );

        // The game over frame was still painted
        assert!(h.surface.last.is_some());
        assert_eq!(
            h.frame(),
            Err(SchedulerError::NotRunning(SchedulerPhase::Terminal))
        );
        assert!(!h.session.jump());
        assert_eq!(h.submissions().len(), 1);
    }

    #[test]
    fn test_stop_mid_run_cancels_and_rejects_frames() {
        let mut h = harness();
        h.session.start(7, FIELD).unwrap();
        h.session.jump();
        for _ in 0..10 {
            h.frame().unwrap();
        }
        let before = h.session.state().run.clone();
        let presented = h.surface.frames_presented;

        h.session.stop();
        h.session.stop();
        assert_eq!(h.session.phase(), SchedulerPhase::Idle);
        assert!(!h.session.scheduler().has_pending());
        assert!(h.session.scheduler().host().pending().is_empty());
        assert_eq!(h.session.scheduler().host().cancelled.len(), 1);

        assert_eq!(
            h.session.on_frame(&mut h.surface),
            Err(SchedulerError::NotRunning(SchedulerPhase::Idle))
        );
        assert_eq!(h.session.state().run, before);
        assert_eq!(h.surface.frames_presented, presented);
        assert!(h.submissions().is_empty());
    }

    #[test]
    fn test_abort_submits_current_score_once() {
        let mut h = harness();
        h.session.start(9, FIELD).unwrap();
        h.session.jump();
        h.frame().unwrap();

        assert!(h.session.abort());
        assert!(!h.session.abort());
        assert_eq!(h.session.phase(), SchedulerPhase::Terminal);
        assert!(h.session.scheduler().host().pending().is_empty());
        assert_eq!(h.submissions().len(), 1);
        assert_eq!(h.cues.borrow().last(), Some(&"termination"));
    }

    #[test]
    fn test_start_while_running_is_rejected() {
        let mut h = harness();
        h.session.start(1, FIELD).unwrap();
        h.session.jump();
        h.frame().unwrap();
        let ticks = h.session.state().run.ticks;

        assert_eq!(h.session.start(2, FIELD), Err(SchedulerError::AlreadyRunning));
        assert_eq!(h.session.state().run.ticks, ticks);
        assert_eq!(h.session.scheduler().host().pending().len(), 1);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut h = harness();
        h.session.start(3, FIELD).unwrap();
        h.session.jump();
        h.run_to_end(1_000);

        h.session
            .restart(4, Playfield::new(900.0, 700.0))
            .unwrap();
        assert_eq!(h.session.phase(), SchedulerPhase::Running);
        assert_eq!(h.session.state().run.phase, GamePhase::AwaitingInput);
        assert_eq!(h.session.state().playfield.height, 700.0);
        assert!(h.session.state().obstacles.is_empty());

        h.session.jump();
        h.run_to_end(1_000);
        assert_eq!(h.submissions().len(), 2);
    }

    #[test]
    fn test_jump_before_start_is_ignored() {
        let mut h = harness();
        assert!(!h.session.jump());
        h.session.start(5, FIELD).unwrap();
        h.frame().unwrap();
        assert_eq!(h.session.state().run.phase, GamePhase::AwaitingInput);
    }

    #[test]
    fn test_only_player_input_flies_and_submits() {
        let mut h = harness();
        h.session.start(6, FIELD).unwrap();
        for _ in 0..5_000 {
            h.frame().unwrap();
        }
        assert_eq!(h.session.state().run.phase, GamePhase::AwaitingInput);
        assert_eq!(h.session.state().run.ticks, 0);
        assert!(h.submissions().is_empty());

        // Escape from the start screen reports the player's own (empty) run
        assert!(h.session.abort());
        assert_eq!(
            h.submissions(),
            vec![ScoreSubmission {
                game_id: "flyingMeme".into(),
                score: 0
            }]
        );
    }
}
