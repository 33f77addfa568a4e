pub mod detection_config;
pub mod difficulty_scheduler;
pub mod lighting_policy;
