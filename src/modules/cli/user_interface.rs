use clap::{Arg, ArgMatches, Command};
use log::debug;

use crate::email::{EmailJob, MailerError, SmtpCredentials};
use crate::{PROGRAM_NAME, SMTP_PORT};

/// Positional arguments, in command-line order
const POSITIONALS: [&str; 6] = ["username", "password", "from", "to", "server", "body"];

/// Positionals that must be present before anything but the usage line is shown.
/// One short of `POSITIONALS`: the usage line itself omits `<body>`.
const MIN_POSITIONALS: usize = 5;

/// Trailing arguments past the body, ignored
const EXTRA: &str = "extra";

/// What the command line asks for
#[derive(Debug)]
pub enum Invocation {
    /// Too few arguments: print `usage()` and exit with status 1
    ShowUsage,
    /// Send one test email
    Send(EmailJob),
}

/// The usage line printed when arguments are missing
pub fn usage() -> String {
    format!(
        "Usage: {} <username> <password> <from> <to> <server>",
        PROGRAM_NAME
    )
}

/// Help text for each entry of `POSITIONALS`
const POSITIONAL_HELP: [&str; 6] = [
    "SMTP login name",
    "SMTP password, or - to be prompted",
    "Envelope sender and From: header",
    "Envelope recipient and To: header",
    "SMTP server hostname, e.g. smtp.office365.com",
    "Message body text",
];

/// Define the command-line interface using clap.
///
/// Positionals take values starting with `-` literally, so `--port` has to
/// come before them. Anything after the body is accepted and ignored.
pub fn build_command() -> Command {
    let command = Command::new(PROGRAM_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Send one test email through an SMTP submission server (STARTTLS + AUTH)")
        .arg(
            Arg::new("port")
                .long("port")
                .help("SMTP submission port")
                .value_name("PORT")
                .default_value("587")
                .value_parser(clap::value_parser!(u16)),
        );

    POSITIONALS
        .iter()
        .zip(POSITIONAL_HELP)
        .enumerate()
        .fold(command, |command, (i, (name, help))| {
            command.arg(
                Arg::new(*name)
                    .help(help)
                    .index(i + 1)
                    .allow_hyphen_values(true),
            )
        })
        .arg(
            Arg::new(EXTRA)
                .index(POSITIONALS.len() + 1)
                .num_args(1..)
                .allow_hyphen_values(true)
                .hide(true),
        )
}

impl Invocation {
    /// Turn parsed arguments into an invocation, checking arity before use
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, MailerError> {
        let values: Vec<Option<&String>> = POSITIONALS
            .iter()
            .map(|name| matches.get_one::<String>(name))
            .collect();

        let present = values.iter().take_while(|v| v.is_some()).count();
        if present < MIN_POSITIONALS {
            return Ok(Invocation::ShowUsage);
        }

        let field = |index: usize| -> Result<String, MailerError> {
            values[index]
                .cloned()
                .ok_or_else(|| MailerError::Usage(format!("missing <{}> argument", POSITIONALS[index])))
        };

        let port = matches.get_one::<u16>("port").copied().unwrap_or(SMTP_PORT);

        if let Some(extra) = matches.get_many::<String>(EXTRA) {
            debug!("ignoring {} argument(s) after <body>", extra.count());
        }

        let job = EmailJob::new(
            SmtpCredentials::new(field(0)?, field(1)?),
            field(2)?,
            field(3)?,
            field(4)?,
            field(5)?,
        )
        .with_port(port);

        Ok(Invocation::Send(job))
    }
}

/// Parse a full argv (program name first). Clap's own errors, including
/// `--help` and `--version`, come back untouched for the caller to `exit()`.
pub fn parse_invocation<I, T>(argv: I) -> Result<Result<Invocation, MailerError>, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = build_command().try_get_matches_from(argv)?;
    Ok(Invocation::from_matches(&matches))
}
