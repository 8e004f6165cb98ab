pub mod emotion_health;
pub mod scl90;
