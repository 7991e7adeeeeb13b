// First, declare the modules folder itself
mod modules;

// Re-export everything from modules for easier access
pub use modules::{cli, email, utils};

// Re-export commonly used types
pub use modules::cli::Invocation;
pub use modules::email::{EmailJob, Mailer, MailerError, Security, SmtpCredentials};

// Constants
pub const PROGRAM_NAME: &str = "smtp-probe";
pub const SMTP_PORT: u16 = 587;
pub const DEFAULT_SMTP_SERVER: &str = "smtp.office365.com";
pub const TEST_SUBJECT: &str = "Test Email from Python (Outlook SMTP)";

/// Socket timeout handed to the SMTP client, same as lettre's transport default.
pub const SESSION_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);
