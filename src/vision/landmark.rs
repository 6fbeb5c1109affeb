use serde::{Deserialize, Serialize};

/// Number of points a detector reports per hand
pub const LANDMARK_COUNT: usize = 21;

/// A tracked hand joint in normalized image space.
///
/// `x` and `y` lie in [0, 1] with `y` growing downward; `z` is relative depth.
/// Serialized as a plain `[x, y, z]` triple.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Offset from `origin` to this point in the image plane
    pub fn offset_from(&self, origin: &Landmark) -> (f32, f32) {
        (self.x - origin.x, self.y - origin.y)
    }

    /// Euclidean distance in the image plane. Depth is ignored because the
    /// detector reports it on a different scale.
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        let (dx, dy) = self.offset_from(other);
        dx.hypot(dy)
    }
}

impl From<[f32; 3]> for Landmark {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Landmark> for [f32; 3] {
    fn from(landmark: Landmark) -> Self {
        [landmark.x, landmark.y, landmark.z]
    }
}

/// Indices of the joints the classifier looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandJoint {
    Wrist = 0,
    ThumbTip = 4,
    IndexPip = 6,
    IndexTip = 8,
    MiddlePip = 10,
    MiddleTip = 12,
    RingPip = 14,
    RingTip = 16,
    PinkyPip = 18,
    PinkyTip = 20,
}

impl HandJoint {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// The four non-thumb fingers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    pub fn tip(self) -> HandJoint {
        match self {
            Finger::Index => HandJoint::IndexTip,
            Finger::Middle => HandJoint::MiddleTip,
            Finger::Ring => HandJoint::RingTip,
            Finger::Pinky => HandJoint::PinkyTip,
        }
    }

    /// Middle knuckle of the finger
    pub fn knuckle(self) -> HandJoint {
        match self {
            Finger::Index => HandJoint::IndexPip,
            Finger::Middle => HandJoint::MiddlePip,
            Finger::Ring => HandJoint::RingPip,
            Finger::Pinky => HandJoint::PinkyPip,
        }
    }
}

/// Borrowed view over one detected hand with joint lookup
#[derive(Debug, Clone, Copy)]
pub struct Hand<'a> {
    landmarks: &'a [Landmark],
}

impl<'a> Hand<'a> {
    /// `None` unless a full set of landmarks is present
    pub fn new(landmarks: &'a [Landmark]) -> Option<Self> {
        (landmarks.len() >= LANDMARK_COUNT).then_some(Self { landmarks })
    }

    pub fn joint(&self, joint: HandJoint) -> &Landmark {
        &self.landmarks[joint.index()]
    }
}
