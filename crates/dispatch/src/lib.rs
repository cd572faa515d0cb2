mod dispatch_due_reminders;
mod error;
mod job_scheduler;
mod publisher;
mod render;
mod shared;
mod status;

pub use dispatch_due_reminders::{DispatchDueRemindersUseCase, DispatchReport};
pub use error::DispatchError;
pub use job_scheduler::{start_dispatch_job, DispatchJob};
pub use publisher::publish_envelope;
pub use render::render_targets;
pub use shared::usecase::{execute, UseCase};
pub use status::record_outcome;
