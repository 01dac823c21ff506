//! Email delivery.

mod resend;

pub use resend::ResendEmailSender;
