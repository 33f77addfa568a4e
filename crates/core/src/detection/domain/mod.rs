pub mod brightness;
pub mod ear_history;
pub mod expression;
pub mod eye_aspect_ratio;
pub mod face_zone;
pub mod landmark_source;
