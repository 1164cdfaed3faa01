//! Scan choreography
//!
//! The camera looks at the South face. The cube is shown F, R, B, L by
//! whole-cube quarter turns, then tipped to show D, turned over to show U,
//! and finally put back in the canonical orientation.
//!
//! Only tracked primitives are used, so the facing map stays valid and is
//! checked against the face expected in front of the camera before every
//! capture.

use cranecuber_hal::{Clock, Motor};

use crate::error::{CollaboratorError, Fault};
use crate::motion::ActuatorSequencer;
use crate::orientation::{Direction, FaceLabel, FacingMap};
use crate::safety::CancelToken;

/// Order in which faces reach the camera
pub const SCAN_ORDER: [FaceLabel; 6] = [
    FaceLabel::F,
    FaceLabel::R,
    FaceLabel::B,
    FaceLabel::L,
    FaceLabel::D,
    FaceLabel::U,
];

/// Captures the face currently in front of the camera
pub trait FaceCamera {
    fn capture(&mut self, face: FaceLabel) -> Result<(), CollaboratorError>;
}

impl<K: FaceCamera + ?Sized> FaceCamera for &mut K {
    fn capture(&mut self, face: FaceLabel) -> Result<(), CollaboratorError> {
        (**self).capture(face)
    }
}

/// How a scan ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// All six faces captured, cube back in the canonical orientation
    Complete,
    /// Stopped between faces by the cancellation flag
    Cancelled,
}

/// Photograph all six faces
///
/// Must start from the canonical orientation with the elevator down.
pub fn scan<M, C, K, T>(
    sequencer: &mut ActuatorSequencer<M, C>,
    camera: &mut K,
    cancel: &T,
) -> Result<ScanOutcome, Fault>
where
    M: Motor,
    C: Clock,
    K: FaceCamera,
    T: CancelToken,
{
    let size = sequencer.profile().size;
    log::info!("scanning");

    sequencer.elevate(0)?;
    capture(sequencer, camera, FaceLabel::F)?;

    for face in [FaceLabel::R, FaceLabel::B, FaceLabel::L] {
        if cancel.is_cancelled() {
            return Ok(ScanOutcome::Cancelled);
        }
        sequencer.elevate(size)?;
        sequencer.rotate(true, 1)?;
        sequencer.elevate(0)?;
        capture(sequencer, camera, face)?;
    }

    if cancel.is_cancelled() {
        return Ok(ScanOutcome::Cancelled);
    }
    // Tip D toward the camera, then get the flipper out of the picture
    sequencer.flip()?;
    sequencer.elevate(size)?;
    sequencer.flip()?;
    sequencer.elevate(0)?;
    capture(sequencer, camera, FaceLabel::D)?;

    if cancel.is_cancelled() {
        return Ok(ScanOutcome::Cancelled);
    }
    sequencer.elevate(size)?;
    sequencer.rotate(true, 2)?;
    sequencer.elevate(0)?;
    capture(sequencer, camera, FaceLabel::U)?;

    if cancel.is_cancelled() {
        return Ok(ScanOutcome::Cancelled);
    }
    // Back to F facing the camera
    sequencer.flip()?;
    sequencer.elevate(size)?;
    sequencer.rotate(false, 1)?;
    sequencer.flip()?;
    sequencer.elevate(0)?;
    sequencer.flip_settle()?;

    let facing = *sequencer.facing();
    if facing != FacingMap::canonical() {
        return Err(Fault::InvariantViolation {
            expected: FaceLabel::U,
            actual: facing.up(),
        });
    }
    log::info!("scan complete");
    Ok(ScanOutcome::Complete)
}

fn capture<M: Motor, C: Clock, K: FaceCamera>(
    sequencer: &mut ActuatorSequencer<M, C>,
    camera: &mut K,
    face: FaceLabel,
) -> Result<(), Fault> {
    sequencer.flip_settle()?;
    let actual = sequencer.facing().face(Direction::South);
    if actual != face {
        return Err(Fault::InvariantViolation {
            expected: face,
            actual,
        });
    }
    log::info!("capturing {}", face);
    camera.capture(face)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safety::NeverCancel;
    use crate::testing::sequencer;
    use core::sync::atomic::AtomicBool;
    use std::vec::Vec;

    #[derive(Default)]
    struct RecordingCamera {
        faces: Vec<FaceLabel>,
        fail_on: Option<FaceLabel>,
    }

    impl FaceCamera for RecordingCamera {
        fn capture(&mut self, face: FaceLabel) -> Result<(), CollaboratorError> {
            if self.fail_on == Some(face) {
                return Err(CollaboratorError::ScanUnavailable);
            }
            self.faces.push(face);
            Ok(())
        }
    }

    #[test]
    fn test_scan_shows_every_face_and_restores_orientation() {
        let mut seq = sequencer(6);
        let mut camera = RecordingCamera::default();
        let outcome = scan(&mut seq, &mut camera, &NeverCancel).unwrap();

        assert_eq!(outcome, ScanOutcome::Complete);
        assert_eq!(camera.faces, SCAN_ORDER);
        assert_eq!(*seq.facing(), FacingMap::canonical());
        let state = seq.state();
        assert_eq!(state.rows_elevated, 0);
        assert!(state.flipper_at_init);
        assert_eq!(state.turntable_degrees % 420, 0);
    }

    #[test]
    fn test_scan_works_on_every_profile() {
        for size in 2..=7 {
            let mut seq = sequencer(size);
            let mut camera = RecordingCamera::default();
            assert_eq!(scan(&mut seq, &mut camera, &NeverCancel), Ok(ScanOutcome::Complete));
        }
    }

    #[test]
    fn test_scan_cancelled() {
        let mut seq = sequencer(6);
        let mut camera = RecordingCamera::default();
        let outcome = scan(&mut seq, &mut camera, &AtomicBool::new(true)).unwrap();
        assert_eq!(outcome, ScanOutcome::Cancelled);
        assert_eq!(camera.faces, [FaceLabel::F]);
    }

    #[test]
    fn test_camera_failure_is_fault() {
        let mut seq = sequencer(6);
        let mut camera = RecordingCamera {
            fail_on: Some(FaceLabel::D),
            ..Default::default()
        };
        let result = scan(&mut seq, &mut camera, &NeverCancel);
        assert_eq!(
            result,
            Err(Fault::Collaborator(CollaboratorError::ScanUnavailable))
        );
        assert_eq!(camera.faces.len(), 4);
    }
}
