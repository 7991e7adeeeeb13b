//! Error type for a test-mail run

use lettre::transport::smtp::Error as SmtpError;

/// Every way a run can fail, one variant per session phase.
///
/// Nothing is retried or recovered: the first error ends the run.
#[derive(thiserror::Error, Debug)]
pub enum MailerError {
    /// Missing or malformed command-line input
    #[error("usage: {0}")]
    Usage(String),
    /// Sender or recipient could not be turned into an envelope address
    #[error("invalid envelope: {0}")]
    Envelope(String),
    /// DNS resolution, TCP connect, or the greeting/EHLO exchange failed
    #[error("connection to SMTP server failed: {0}")]
    Connection(#[source] SmtpError),
    /// STARTTLS was refused or the TLS handshake failed
    #[error("TLS negotiation failed: {0}")]
    Tls(#[source] SmtpError),
    /// The server rejected the credentials, or no mechanism is shared
    #[error("authentication failed: {0}")]
    Auth(#[source] SmtpError),
    /// The server rejected MAIL FROM, RCPT TO or the message data
    #[error("message rejected: {0}")]
    Protocol(#[source] SmtpError),
}

impl MailerError {
    /// Short phase name, used in session event logs.
    pub fn phase(&self) -> &'static str {
        match self {
            MailerError::Usage(_) => "usage",
            MailerError::Envelope(_) => "envelope",
            MailerError::Connection(_) => "connect",
            MailerError::Tls(_) => "starttls",
            MailerError::Auth(_) => "auth",
            MailerError::Protocol(_) => "send",
        }
    }
}
