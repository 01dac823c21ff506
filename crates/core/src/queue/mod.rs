mod consumer;
mod error;
mod job;
mod producer;
mod traits;

pub use consumer::NotificationConsumer;
pub use error::{QueueError, Result};
pub use job::EmailJob;
pub use producer::NotificationProducer;
pub use traits::{Delivery, EmailError, EmailSender, JobQueue};
