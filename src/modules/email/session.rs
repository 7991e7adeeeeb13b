use lettre::address::Envelope;
use lettre::transport::smtp::authentication::Mechanism;
use lettre::transport::smtp::client::{SmtpConnection, TlsParameters};
use lettre::transport::smtp::extension::ClientId;
use lettre::transport::smtp::response::Response;
use log::{debug, warn};

use super::error::MailerError;
use super::smtp::SmtpCredentials;
use crate::SESSION_TIMEOUT;

/// Mechanisms offered to the server, in order of preference
const AUTH_MECHANISMS: &[Mechanism] = &[Mechanism::Plain, Mechanism::Login];

/// One SMTP session, owned for its whole lifetime.
///
/// `close` ends it with QUIT. Dropping an unclosed session aborts the
/// connection, so every early return and error path still releases the
/// socket. After a failed STARTTLS upgrade the socket is released by
/// dropping the connection alone.
pub struct SmtpSession {
    conn: SmtpConnection,
    hello_name: ClientId,
    closed: bool,
}

impl SmtpSession {
    /// Connect in plaintext, read the greeting and send EHLO
    pub fn open(server: &str, port: u16, hello_name: ClientId) -> Result<Self, MailerError> {
        debug!("connecting to {}:{}", server, port);
        let conn = SmtpConnection::connect(
            (server, port),
            Some(SESSION_TIMEOUT),
            &hello_name,
            None,
            None,
        )
        .map_err(MailerError::Connection)?;
        debug!("server capabilities: {}", conn.server_info());

        Ok(Self {
            conn,
            hello_name,
            closed: false,
        })
    }

    /// Upgrade to TLS with the system trust roots, then EHLO again
    pub fn starttls(&mut self, domain: &str) -> Result<(), MailerError> {
        let tls_parameters =
            TlsParameters::new(domain.to_string()).map_err(MailerError::Tls)?;
        let advertised = self.conn.can_starttls();
        if let Err(e) = self.conn.starttls(&tls_parameters, &self.hello_name) {
            // Once the upgrade has started, lettre has either aborted already or
            // lost the socket in the handshake. Nothing is left to abort.
            if advertised {
                self.closed = true;
            }
            return Err(MailerError::Tls(e));
        }
        debug!("connection encrypted, capabilities: {}", self.conn.server_info());
        Ok(())
    }

    pub fn authenticate(&mut self, credentials: &SmtpCredentials) -> Result<Response, MailerError> {
        self.conn
            .auth(AUTH_MECHANISMS, &credentials.to_lettre())
            .map_err(MailerError::Auth)
    }

    /// MAIL FROM, RCPT TO and DATA for one message
    pub fn send(&mut self, envelope: &Envelope, message: &[u8]) -> Result<Response, MailerError> {
        self.conn
            .send(envelope, message)
            .map_err(MailerError::Protocol)
    }

    /// End the session with QUIT.
    ///
    /// The message has already been accepted at this point, so a failed QUIT
    /// is only worth a warning.
    pub fn close(mut self) {
        self.closed = true;
        if let Err(e) = self.conn.quit() {
            warn!("QUIT failed after message was accepted: {}", e);
            self.conn.abort();
        }
    }
}

impl Drop for SmtpSession {
    fn drop(&mut self) {
        if !self.closed {
            debug!("aborting SMTP session");
            self.conn.abort();
        }
    }
}
