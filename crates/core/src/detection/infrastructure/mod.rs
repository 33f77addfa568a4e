pub mod image_brightness;
pub mod jsonl_landmark_reader;
