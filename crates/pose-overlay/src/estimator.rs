//! Access to the external pose estimation model.
//!
//! The model is opaque: anything implementing [`PoseEstimator`] can be plugged into the frame
//! loop. Estimation runs on a dedicated worker thread, and the loop blocks until the pose for the
//! submitted frame is available, so only one estimation is ever in flight.

use std::{
    any::Any,
    error::Error,
    fmt, io,
    panic::{self, AssertUnwindSafe},
};

use overlay_image::Image;
use pawawwewism::{promise, Promise, Worker};

use crate::pose::Pose;

/// Estimates a single [`Pose`] from a camera frame.
pub trait PoseEstimator: Send + 'static {
    /// Runs the model on `frame`.
    ///
    /// The returned pose is expected to contain every body part the model knows about.
    fn estimate(&mut self, frame: &Image) -> anyhow::Result<Pose>;
}

impl<F> PoseEstimator for F
where
    F: FnMut(&Image) -> anyhow::Result<Pose> + Send + 'static,
{
    fn estimate(&mut self, frame: &Image) -> anyhow::Result<Pose> {
        self(frame)
    }
}

/// An estimator that ignores the frame and replays a fixed list of poses in a loop.
#[derive(Debug, Clone)]
pub struct ReplayEstimator {
    poses: Vec<Pose>,
    next: usize,
}

impl ReplayEstimator {
    pub fn new(poses: Vec<Pose>) -> Self {
        Self { poses, next: 0 }
    }
}

impl PoseEstimator for ReplayEstimator {
    fn estimate(&mut self, _frame: &Image) -> anyhow::Result<Pose> {
        if self.poses.is_empty() {
            anyhow::bail!("replay estimator has no poses");
        }
        let pose = self.poses[self.next].clone();
        self.next = (self.next + 1) % self.poses.len();
        Ok(pose)
    }
}

/// Error produced when the estimator thread dropped a request without answering it.
#[derive(Debug, Clone, Copy)]
pub struct EstimatorGone;

impl fmt::Display for EstimatorGone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("pose estimator exited without producing a pose")
    }
}

impl Error for EstimatorGone {}

struct EstimateParams {
    frame: Image,
    pose: Promise<anyhow::Result<Pose>>,
}

/// Runs a [`PoseEstimator`] on its own thread.
///
/// A panicking estimator fails only the estimate it panicked on. The thread stays alive and keeps
/// serving later requests with the same estimator.
pub(crate) struct EstimatorWorker {
    worker: Worker<EstimateParams>,
}

impl EstimatorWorker {
    pub(crate) fn spawn<E: PoseEstimator>(mut estimator: E) -> io::Result<Self> {
        let worker = Worker::builder()
            .name("pose estimator")
            .spawn(move |EstimateParams { frame, pose }| {
                let result = panic::catch_unwind(AssertUnwindSafe(|| estimator.estimate(&frame)))
                    .unwrap_or_else(|payload| {
                        Err(anyhow::anyhow!(
                            "pose estimator panicked: {}",
                            panic_message(&*payload)
                        ))
                    });
                pose.fulfill(result);
            })?;
        Ok(Self { worker })
    }

    /// Submits `frame` and waits for the estimated pose.
    pub(crate) fn estimate(&mut self, frame: Image) -> anyhow::Result<Pose> {
        let (pose, handle) = promise();
        self.worker.send(EstimateParams { frame, pose });
        match handle.block() {
            Ok(result) => result,
            Err(_dropped) => Err(EstimatorGone.into()),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "<non-string payload>"
    }
}

#[cfg(test)]
mod tests {
    use crate::pose::{BodyPart, Position};

    use super::*;

    #[test]
    fn replay_cycles() {
        let a = Pose::uniform(Position::default(), 0.1);
        let b = a.clone().with_score(BodyPart::Nose, 0.9);
        let mut replay = ReplayEstimator::new(vec![a.clone(), b.clone()]);
        let frame = Image::new(1, 1);

        assert_eq!(replay.estimate(&frame).unwrap(), a);
        assert_eq!(replay.estimate(&frame).unwrap(), b);
        assert_eq!(replay.estimate(&frame).unwrap(), a);
    }

    #[test]
    fn empty_replay_fails() {
        let mut replay = ReplayEstimator::new(Vec::new());
        assert!(replay.estimate(&Image::new(1, 1)).is_err());
    }

    #[test]
    fn worker_round_trip() {
        let mut worker = EstimatorWorker::spawn(|frame: &Image| -> anyhow::Result<Pose> {
            Ok(Pose::uniform(
                Position::new(frame.width() as f32, frame.height() as f32),
                1.0,
            ))
        })
        .unwrap();

        let pose = worker.estimate(Image::new(4, 3)).unwrap();
        assert_eq!(pose.score(BodyPart::Nose), 1.0);
        assert_eq!(
            pose.require(BodyPart::Nose).unwrap().position(),
            Position::new(4.0, 3.0)
        );
    }

    #[test]
    fn worker_forwards_errors() {
        let mut calls = 0;
        let mut worker = EstimatorWorker::spawn(move |_: &Image| -> anyhow::Result<Pose> {
            calls += 1;
            if calls == 1 {
                anyhow::bail!("model not ready");
            }
            Ok(Pose::default())
        })
        .unwrap();

        let err = worker.estimate(Image::new(1, 1)).unwrap_err();
        assert_eq!(err.to_string(), "model not ready");
        assert!(worker.estimate(Image::new(1, 1)).is_ok());
    }

    #[test]
    fn worker_survives_panics() {
        let mut calls = 0;
        let mut worker = EstimatorWorker::spawn(move |_: &Image| -> anyhow::Result<Pose> {
            calls += 1;
            if calls == 1 {
                panic!("model crashed");
            }
            Ok(Pose::uniform(Position::default(), 0.9))
        })
        .unwrap();

        let err = worker.estimate(Image::new(1, 1)).unwrap_err();
        assert_eq!(err.to_string(), "pose estimator panicked: model crashed");
        let pose = worker.estimate(Image::new(1, 1)).unwrap();
        assert_eq!(pose.score(BodyPart::Nose), 0.9);
    }
}
