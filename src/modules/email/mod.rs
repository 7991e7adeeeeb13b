pub mod error;
pub mod manager;
pub mod session;
mod smtp;
mod templates;

pub use error::MailerError;
pub use manager::Mailer;
pub use session::SmtpSession;
pub use smtp::{EmailJob, Security, SmtpCredentials};
pub use templates::compose_message;
