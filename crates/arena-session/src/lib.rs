pub mod message;
pub mod session;
pub mod state;

pub use message::{failure_message, GENERIC_FAILURE};
pub use session::Session;
pub use state::{ConsoleTab, Notice, NoticeLevel, Phase};
