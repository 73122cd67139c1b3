use glam::{IVec3, Vec3};

/// The six faces of a cube, in the order the mesher visits them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Face {
    NegX,
    PosX,
    NegY,
    PosY,
    NegZ,
    PosZ,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::NegX,
        Face::PosX,
        Face::NegY,
        Face::PosY,
        Face::NegZ,
        Face::PosZ,
    ];

    /// Unit step to the block (or chunk) across this face.
    pub fn offset(self) -> IVec3 {
        match self {
            Face::NegX => IVec3::NEG_X,
            Face::PosX => IVec3::X,
            Face::NegY => IVec3::NEG_Y,
            Face::PosY => IVec3::Y,
            Face::NegZ => IVec3::NEG_Z,
            Face::PosZ => IVec3::Z,
        }
    }

    pub fn normal(self) -> Vec3 {
        self.offset().as_vec3()
    }

    /// Quad corners relative to the block's minimum corner.
    ///
    /// Counter-clockwise seen from outside the block, so the triangles
    /// (0, 1, 2) and (0, 2, 3) face along [`Face::normal`].
    pub fn corners(self) -> [Vec3; 4] {
        match self {
            Face::NegX => [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(0.0, 1.0, 1.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            Face::PosX => [
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(1.0, 1.0, 1.0),
            ],
            Face::NegY => [
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 1.0),
            ],
            Face::PosY => [
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 1.0),
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(1.0, 1.0, 0.0),
            ],
            Face::NegZ => [
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
            ],
            Face::PosZ => [
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(0.0, 1.0, 1.0),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_wind_towards_normal() {
        for face in Face::ALL {
            let [v0, v1, v2, v3] = face.corners();
            let first = (v1 - v0).cross(v2 - v0);
            let second = (v2 - v0).cross(v3 - v0);
            assert_eq!(first.normalize(), face.normal(), "{face:?}");
            assert_eq!(second.normalize(), face.normal(), "{face:?}");
        }
    }

    #[test]
    fn corners_lie_on_the_face_plane() {
        for face in Face::ALL {
            let n = face.normal();
            // Positive faces sit at 1 along their axis, negative faces at 0
            let plane = if n.max_element() > 0.0 { 1.0 } else { 0.0 };
            for corner in face.corners() {
                assert_eq!(corner.dot(n.abs()), plane, "{face:?}");
            }
        }
    }
}
