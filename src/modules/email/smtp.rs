use std::fmt;

use lettre::address::{Address, Envelope};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;

use super::error::MailerError;
use crate::{DEFAULT_SMTP_SERVER, SMTP_PORT};

/// Username/password pair for SMTP authentication
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpCredentials {
    // The login name, usually the mailbox address
    pub username: String,
    // The password or app-specific password
    pub password: String,
}

impl SmtpCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Convert into the form the SMTP client authenticates with
    pub fn to_lettre(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }
}

// Keep the password out of debug logs
impl fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// How the session is protected before credentials are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Security {
    /// Connect in plaintext, then require a STARTTLS upgrade.
    #[default]
    StartTls,
    /// Never upgrade. Only meant for local test servers.
    Plaintext,
}

/// One test-mail run: everything needed to open a session and submit a message.
#[derive(Debug, Clone)]
pub struct EmailJob {
    pub credentials: SmtpCredentials,
    pub from_address: String,
    pub to_address: String,
    pub smtp_server: String,
    pub port: u16,
    pub body: String,
}

impl EmailJob {
    /// Create a job on the submission port
    pub fn new(
        credentials: SmtpCredentials,
        from_address: impl Into<String>,
        to_address: impl Into<String>,
        smtp_server: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            from_address: from_address.into(),
            to_address: to_address.into(),
            smtp_server: smtp_server.into(),
            port: SMTP_PORT,
            body: body.into(),
        }
    }

    /// Same as `new`, against the Outlook submission endpoint
    pub fn outlook(
        credentials: SmtpCredentials,
        from_address: impl Into<String>,
        to_address: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self::new(
            credentials,
            from_address,
            to_address,
            DEFAULT_SMTP_SERVER,
            body,
        )
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Build the MAIL FROM / RCPT TO envelope.
    ///
    /// The header lines are never checked; only the envelope has to satisfy
    /// the client library's address syntax.
    pub fn envelope(&self) -> Result<Envelope, MailerError> {
        let from = parse_address("sender", &self.from_address)?;
        let to = parse_address("recipient", &self.to_address)?;
        Envelope::new(Some(from), vec![to]).map_err(|e| MailerError::Envelope(e.to_string()))
    }
}

/// Bare address, or the address inside `Name <addr>`
fn parse_address(role: &str, raw: &str) -> Result<Address, MailerError> {
    let raw = raw.trim();
    raw.parse::<Address>()
        .or_else(|e| raw.parse::<Mailbox>().map(|mailbox| mailbox.email).map_err(|_| e))
        .map_err(|e| MailerError::Envelope(format!("{} `{}`: {}", role, raw, e)))
}
