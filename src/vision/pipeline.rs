use super::capture::{CaptureWorker, HandDetector};
use super::classifier::GestureClassifier;
use crate::game::Command;

/// Capture worker, detector and classifier wired together.
///
/// [`poll`](Self::poll) never blocks: it classifies whatever frame the
/// worker published last, or returns a neutral command if there is none.
pub struct GestureInput<D: HandDetector> {
    worker: CaptureWorker<D::Frame>,
    detector: D,
    classifier: GestureClassifier,
}

impl<D> GestureInput<D>
where
    D: HandDetector,
    D::Frame: Clone + Send + 'static,
{
    pub fn new(worker: CaptureWorker<D::Frame>, detector: D, classifier: GestureClassifier) -> Self {
        Self {
            worker,
            detector,
            classifier,
        }
    }

    pub fn poll(&mut self) -> Command {
        match self.worker.latest() {
            Some(frame) => {
                let landmarks = self.detector.detect(&frame);
                self.classifier.interpret(&landmarks)
            }
            None => Command::default(),
        }
    }

    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    pub fn stop(&mut self) {
        self.worker.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Direction;
    use crate::vision::{FrameSource, LANDMARK_COUNT, Landmark, PassthroughDetector};
    use std::thread;
    use std::time::{Duration, Instant};

    struct StillHand(Vec<Landmark>);

    impl FrameSource for StillHand {
        type Frame = Vec<Landmark>;

        fn read_frame(&mut self) -> Option<Vec<Landmark>> {
            Some(self.0.clone())
        }
    }

    fn pointing_left() -> Vec<Landmark> {
        let mut landmarks = vec![Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
        landmarks[8] = Landmark::new(0.3, 0.48, 0.0);
        landmarks
    }

    #[test]
    fn test_poll_before_first_frame_is_neutral() {
        struct Silent;
        impl FrameSource for Silent {
            type Frame = Vec<Landmark>;
            fn read_frame(&mut self) -> Option<Vec<Landmark>> {
                None
            }
        }

        let worker = CaptureWorker::spawn(Silent, Duration::from_millis(1)).expect("spawn");
        let mut input = GestureInput::new(worker, PassthroughDetector, GestureClassifier::default());
        assert_eq!(input.poll(), Command::default());
        input.stop();
    }

    #[test]
    fn test_poll_classifies_latest_frame() {
        let worker =
            CaptureWorker::spawn(StillHand(pointing_left()), Duration::from_millis(1)).expect("spawn");
        let mut input = GestureInput::new(worker, PassthroughDetector, GestureClassifier::default());

        let deadline = Instant::now() + Duration::from_secs(2);
        let mut command = input.poll();
        while command.offset.is_none() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
            command = input.poll();
        }

        assert_eq!(command.direction.direction(), Some(Direction::Left));
        assert_eq!(input.classifier().last_direction(), Some(Direction::Left));
        input.stop();
    }
}
