pub mod http;
pub mod metadata;
pub mod scripted;
pub mod traits;

pub use http::HttpJudge;
pub use metadata::normalize_metadata;
pub use scripted::{Reply, ScriptedJudge};
pub use traits::{normalize_response, JudgeBackend};
