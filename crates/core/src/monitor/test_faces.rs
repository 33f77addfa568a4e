//! Synthetic 478-point face meshes with controllable eye openness.

use crate::shared::constants::{
    FACE_LEFT_EDGE_INDEX, FACE_RIGHT_EDGE_INDEX, LEFT_EYE_INDICES, MOUTH_BOTTOM_INDEX,
    MOUTH_TOP_INDEX, RIGHT_EYE_INDICES,
};
use crate::shared::landmarks::{LandmarkFrame, LandmarkPoint};

const MESH_POINTS: usize = 478;
const EYE_WIDTH: f64 = 0.06;
const EYE_Y: f64 = 0.42;

/// Centered face, 0.30 wide, with the given EAR per eye.
pub fn face(left_ear: f64, right_ear: f64) -> LandmarkFrame {
    face_at(left_ear, right_ear, 0.0, 0.0)
}

/// Same as [`face`] but shifted by `(dx, dy)`.
pub fn face_at(left_ear: f64, right_ear: f64, dx: f64, dy: f64) -> LandmarkFrame {
    let mut pts = vec![LandmarkPoint::new(0.5, 0.48, 0.0); MESH_POINTS];
    pts[FACE_LEFT_EDGE_INDEX] = LandmarkPoint::new(0.35, 0.48, 0.0);
    pts[FACE_RIGHT_EDGE_INDEX] = LandmarkPoint::new(0.65, 0.48, 0.0);
    pts[10] = LandmarkPoint::new(0.5, 0.30, 0.0);
    pts[152] = LandmarkPoint::new(0.5, 0.66, 0.0);
    pts[MOUTH_TOP_INDEX] = LandmarkPoint::new(0.5, 0.58, 0.0);
    pts[MOUTH_BOTTOM_INDEX] = LandmarkPoint::new(0.5, 0.60, 0.0);
    place_eye(&mut pts, &LEFT_EYE_INDICES, 0.39, 1.0, left_ear);
    place_eye(&mut pts, &RIGHT_EYE_INDICES, 0.61, -1.0, right_ear);
    for p in &mut pts {
        p.x += dx;
        p.y += dy;
    }
    LandmarkFrame::new(pts)
}

/// Lays out `[p1..p6]` starting at corner `x0`, running in `dir`.
fn place_eye(pts: &mut [LandmarkPoint], idx: &[usize; 6], x0: f64, dir: f64, ear: f64) {
    let half = ear * EYE_WIDTH / 2.0;
    let x = |offset: f64| x0 + dir * offset;
    pts[idx[0]] = LandmarkPoint::new(x(0.0), EYE_Y, 0.0);
    pts[idx[1]] = LandmarkPoint::new(x(0.02), EYE_Y - half, 0.0);
    pts[idx[2]] = LandmarkPoint::new(x(0.04), EYE_Y - half, 0.0);
    pts[idx[3]] = LandmarkPoint::new(x(EYE_WIDTH), EYE_Y, 0.0);
    pts[idx[4]] = LandmarkPoint::new(x(0.04), EYE_Y + half, 0.0);
    pts[idx[5]] = LandmarkPoint::new(x(0.02), EYE_Y + half, 0.0);
}
