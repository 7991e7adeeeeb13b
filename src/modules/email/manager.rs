use lettre::transport::smtp::extension::ClientId;
use lettre::transport::smtp::response::Response;
use log::info;

use super::error::MailerError;
use super::session::SmtpSession;
use super::smtp::{EmailJob, Security};
use super::templates::compose_message;
use crate::utils::logging::{format_sensitive, log_session_event};
use crate::TEST_SUBJECT;

/// Sends test messages, one SMTP session per call
pub struct Mailer {
    security: Security,
    // Name announced in EHLO
    hello_name: ClientId,
}

impl Mailer {
    /// Mailer that requires STARTTLS before authenticating
    pub fn new() -> Self {
        Self::with_security(Security::StartTls)
    }

    pub fn with_security(security: Security) -> Self {
        Self {
            security,
            hello_name: ClientId::default(),
        }
    }

    /// Override the EHLO name (defaults to the local hostname)
    pub fn hello_name(mut self, hello_name: ClientId) -> Self {
        self.hello_name = hello_name;
        self
    }

    pub fn security(&self) -> Security {
        self.security
    }

    /// Run one session: connect, EHLO, STARTTLS, EHLO, AUTH, send, QUIT.
    ///
    /// The first failure aborts the run and the session is torn down on the
    /// way out. Returns the server's reply to the message data.
    pub fn send_test_email(&self, job: &EmailJob) -> Result<Response, MailerError> {
        let user = job.credentials.username.as_str();

        info!(
            "Testing email configuration: server={}, port={}, username={}, security={:?}",
            job.smtp_server,
            job.port,
            format_sensitive(user),
            self.security
        );

        let envelope = job.envelope()?;
        let message = compose_message(&job.from_address, &job.to_address, TEST_SUBJECT, &job.body);

        let mut session = self
            .step("connect", user, || {
                SmtpSession::open(&job.smtp_server, job.port, self.hello_name.clone())
            })?;

        if self.security == Security::StartTls {
            self.step("starttls", user, || session.starttls(&job.smtp_server))?;
        }

        self.step("auth", user, || session.authenticate(&job.credentials))?;

        let response = self.step("send", user, || session.send(&envelope, message.as_bytes()))?;
        session.close();

        info!(
            "Message accepted: {} {}",
            response.code(),
            response.first_line().unwrap_or_default()
        );
        Ok(response)
    }

    // Run one phase and record its outcome
    fn step<T>(
        &self,
        phase: &str,
        user: &str,
        f: impl FnOnce() -> Result<T, MailerError>,
    ) -> Result<T, MailerError> {
        let result = f();
        match &result {
            Ok(_) => log_session_event(phase, user, true, None),
            Err(e) => log_session_event(phase, user, false, Some(&e.to_string())),
        }
        result
    }
}

impl Default for Mailer {
    fn default() -> Self {
        Self::new()
    }
}
