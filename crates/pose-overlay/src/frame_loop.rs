//! The frame loop controller.
//!
//! Every cycle pulls the latest frame from a [`FrameSource`], waits for the estimator to turn it
//! into a [`Pose`], redraws the overlay from that pose and publishes the hand detection state.
//! The next cycle starts once the [`Scheduler`] signals the next display refresh.

use std::io;

use itertools::Itertools;

use crate::{
    estimator::{EstimatorWorker, PoseEstimator},
    hand::hand_present,
    options::OverlayOptions,
    pose::Pose,
    render::{draw_keypoints, draw_lamp, draw_skeleton},
    schedule::{RefreshClock, Scheduler},
    source::FrameSource,
    surface::Surface,
    timer::{FpsCounter, Timer},
    topology::{PoseNetTopology, Topology},
    ui::{publish, Status, UiSinks},
};

/// Lifecycle state of a [`FrameLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No camera frame has been received yet.
    Idle,
    /// At least one frame was received. There is no way back to `Idle`.
    Running,
}

/// Result of a single [`FrameLoop::cycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A pose was estimated and drawn.
    Rendered {
        /// Number of keypoints above the confidence threshold.
        confident: usize,
        hand_detected: bool,
    },
    /// No frame or no pose was available. The surface was cleared and the UI shows the
    /// "no pose" state.
    Skipped,
}

/// Drives the overlay: estimate, draw, publish, wait, repeat.
pub struct FrameLoop<S: Surface> {
    state: LoopState,
    source: Box<dyn FrameSource>,
    estimator: EstimatorWorker,
    topology: Box<dyn Topology>,
    scheduler: Box<dyn Scheduler>,
    surface: S,
    sinks: UiSinks,
    options: OverlayOptions,
    t_estimate: Timer,
    t_render: Timer,
    t_publish: Timer,
    fps: FpsCounter,
}

impl<S: Surface> FrameLoop<S> {
    /// Creates a frame loop and spawns the estimator thread.
    ///
    /// The loop uses [`PoseNetTopology`] and a [`RefreshClock`] at the configured refresh rate;
    /// both can be replaced with [`FrameLoop::with_topology`] and [`FrameLoop::with_scheduler`].
    pub fn new<F, E>(
        source: F,
        estimator: E,
        surface: S,
        sinks: UiSinks,
        options: OverlayOptions,
    ) -> io::Result<Self>
    where
        F: FrameSource + 'static,
        E: PoseEstimator,
    {
        let estimator = EstimatorWorker::spawn(estimator)?;
        log::debug!("frame loop created with {:?}", options);
        Ok(Self {
            state: LoopState::Idle,
            source: Box::new(source),
            estimator,
            topology: Box::new(PoseNetTopology),
            scheduler: Box::new(RefreshClock::new(options.frames_per_second())),
            surface,
            sinks,
            options,
            t_estimate: Timer::new("estimate"),
            t_render: Timer::new("render"),
            t_publish: Timer::new("publish"),
            fps: FpsCounter::new("overlay"),
        })
    }

    /// Replaces the skeleton topology.
    pub fn with_topology(self, topology: impl Topology + 'static) -> Self {
        Self {
            topology: Box::new(topology),
            ..self
        }
    }

    /// Replaces the scheduler pacing [`FrameLoop::run`].
    pub fn with_scheduler(self, scheduler: impl Scheduler + 'static) -> Self {
        Self {
            scheduler: Box::new(scheduler),
            ..self
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Returns the surface the overlay is drawn on.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Runs the loop forever.
    pub fn run(&mut self) -> ! {
        self.run_with(|_, _| {})
    }

    /// Runs the loop forever, invoking `after_cycle` once each cycle has completed.
    pub fn run_with(&mut self, mut after_cycle: impl FnMut(&Self, CycleOutcome)) -> ! {
        loop {
            let outcome = self.cycle();
            after_cycle(self, outcome);
            self.scheduler.wait_for_refresh();
        }
    }

    /// Performs a single cycle of the loop.
    ///
    /// Failures of the frame source or the estimator never propagate: they are logged, the
    /// surface is cleared and the UI switches to the "no pose" state.
    pub fn cycle(&mut self) -> CycleOutcome {
        let pose = match self.next_pose() {
            Ok(pose) => pose,
            Err(e) => {
                log::warn!("skipping frame: {e:#}");
                self.surface.clear();
                self.sinks.publish_no_pose();
                return CycleOutcome::Skipped;
            }
        };

        let min_confidence = self.options.confidence_threshold();
        let style = self.options.overlay_style();
        let surface = &mut self.surface;
        let topology = &*self.topology;
        let (confident, hand_detected) = self.t_render.time(|| {
            surface.clear();
            draw_keypoints(surface, &pose, min_confidence, style);
            draw_skeleton(surface, &pose, min_confidence, topology, style);

            let hand_detected = hand_present(&pose, min_confidence);
            if self.options.lamp_enabled() {
                draw_lamp(surface, hand_detected);
            }
            (pose.count_confident(min_confidence), hand_detected)
        });

        log::trace!(
            "confident keypoints: [{}], hand detected: {}",
            pose.confident(min_confidence).map(|kp| kp.part()).join(", "),
            hand_detected,
        );

        let status = Status {
            confident,
            hand_detected,
        };
        self.t_publish.time(|| publish(&status, &mut self.sinks));

        self.fps
            .tick_with([&self.t_estimate, &self.t_render, &self.t_publish]);

        CycleOutcome::Rendered {
            confident,
            hand_detected,
        }
    }

    fn next_pose(&mut self) -> anyhow::Result<Pose> {
        let frame = self.source.latest()?;
        if self.state == LoopState::Idle {
            log::debug!("first frame received ({}), starting", frame.resolution());
            self.state = LoopState::Running;
            self.sinks.announce_ready();
        }

        let estimator = &mut self.estimator;
        self.t_estimate.time(|| estimator.estimate(frame))
    }
}
