mod queue;
mod worker;

pub use queue::{ChangeSender, ChangeToken};
pub use worker::{ChangeCallback, NotificationWorker};
