use std::process;

use log::{debug, error, warn};

use smtp_probe::cli::{parse_invocation, usage, Invocation};
use smtp_probe::utils::io::{read_password, wants_prompt};
use smtp_probe::utils::logging::initialize_logging;
use smtp_probe::{EmailJob, Mailer, MailerError};

fn main() {
    if let Err(e) = initialize_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let invocation = match parse_invocation(std::env::args_os()) {
        Ok(invocation) => invocation,
        // --help, --version and malformed flags
        Err(e) => e.exit(),
    };

    let job = match invocation {
        Ok(Invocation::ShowUsage) => {
            println!("{}", usage());
            process::exit(1);
        }
        Ok(Invocation::Send(job)) => job,
        Err(e) => fail(e),
    };

    if let Err(e) = run(job) {
        fail(e);
    }
}

fn run(mut job: EmailJob) -> Result<(), MailerError> {
    if wants_prompt(&job.credentials.password) {
        job.credentials.password = read_password("SMTP password: ")
            .map_err(|e| MailerError::Usage(format!("failed to read password: {}", e)))?;
    }

    Mailer::new().send_test_email(&job)?;
    println!("Test email sent successfully to: {}", job.to_address);
    Ok(())
}

fn fail(e: MailerError) -> ! {
    error!("{} failed", e.phase());
    debug!("{:?}", e);
    if let MailerError::Auth(_) = e {
        warn!("Check the username and password (or app password) for this server");
    }
    eprintln!("Error: {}", e);
    process::exit(1);
}
