use dontblink_core::shared::constants::{
    FACE_LEFT_EDGE_INDEX, FACE_RIGHT_EDGE_INDEX, LEFT_EYE_INDICES, RIGHT_EYE_INDICES,
};
use dontblink_core::shared::landmarks::{LandmarkFrame, LandmarkPoint};

/// Centered 478-point face whose eyes measure the given EARs.
pub fn face(left_ear: f64, right_ear: f64) -> LandmarkFrame {
    let mut pts = vec![LandmarkPoint::new(0.5, 0.48, 0.0); 478];
    pts[FACE_LEFT_EDGE_INDEX] = LandmarkPoint::new(0.35, 0.48, 0.0);
    pts[FACE_RIGHT_EDGE_INDEX] = LandmarkPoint::new(0.65, 0.48, 0.0);
    pts[10] = LandmarkPoint::new(0.5, 0.30, 0.0);
    pts[152] = LandmarkPoint::new(0.5, 0.66, 0.0);
    eye(&mut pts, &LEFT_EYE_INDICES, 0.39, 1.0, left_ear);
    eye(&mut pts, &RIGHT_EYE_INDICES, 0.61, -1.0, right_ear);
    LandmarkFrame::new(pts)
}

fn eye(pts: &mut [LandmarkPoint], idx: &[usize; 6], x0: f64, dir: f64, ear: f64) {
    let half = ear * 0.06 / 2.0;
    let y = 0.42;
    pts[idx[0]] = LandmarkPoint::new(x0, y, 0.0);
    pts[idx[1]] = LandmarkPoint::new(x0 + dir * 0.02, y - half, 0.0);
    pts[idx[2]] = LandmarkPoint::new(x0 + dir * 0.04, y - half, 0.0);
    pts[idx[3]] = LandmarkPoint::new(x0 + dir * 0.06, y, 0.0);
    pts[idx[4]] = LandmarkPoint::new(x0 + dir * 0.04, y + half, 0.0);
    pts[idx[5]] = LandmarkPoint::new(x0 + dir * 0.02, y + half, 0.0);
}
