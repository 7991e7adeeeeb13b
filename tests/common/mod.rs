//! Scripted single-connection SMTP server for tests

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How the server answers each phase
#[derive(Clone, Debug)]
pub struct Script {
    pub ehlo_extensions: Vec<&'static str>,
    pub auth_reply: &'static str,
    pub mail_reply: &'static str,
    pub rcpt_reply: &'static str,
    /// Accept STARTTLS, then answer the ClientHello with garbage
    pub break_tls: bool,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            ehlo_extensions: vec!["AUTH PLAIN LOGIN", "STARTTLS"],
            auth_reply: "235 2.7.0 Authentication successful",
            mail_reply: "250 2.1.0 Sender OK",
            rcpt_reply: "250 2.1.5 Recipient OK",
            break_tls: false,
        }
    }
}

/// Everything the server saw on the one connection it accepted
#[derive(Debug, Default)]
pub struct Transcript {
    pub commands: Vec<String>,
    pub data: String,
    /// The client closed its end (EOF or reset) rather than the read timing out
    pub client_closed: bool,
}

impl Transcript {
    /// Commands whose verb matches, case-insensitively
    pub fn count(&self, verb: &str) -> usize {
        self.commands.iter().filter(|c| is_verb(c, verb)).count()
    }

    pub fn saw(&self, verb: &str) -> bool {
        self.count(verb) > 0
    }

    pub fn verbs(&self) -> Vec<String> {
        self.commands
            .iter()
            .map(|c| c.split_whitespace().next().unwrap_or("").to_ascii_uppercase())
            .collect()
    }
}

fn is_verb(command: &str, verb: &str) -> bool {
    command
        .split_whitespace()
        .next()
        .map_or(false, |v| v.eq_ignore_ascii_case(verb))
}

pub struct MockServer {
    pub addr: SocketAddr,
    handle: JoinHandle<Transcript>,
}

impl MockServer {
    pub fn start(script: Script) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            serve(stream, script)
        });
        Self { addr, handle }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Wait for the connection to finish and return what was seen
    pub fn finish(self) -> Transcript {
        self.handle.join().unwrap()
    }
}

/// A port that nothing is listening on
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn reply(stream: &mut TcpStream, line: &str) {
    let _ = stream.write_all(format!("{}\r\n", line).as_bytes());
}

/// Read until the client goes away; false if it never does
fn drain(reader: &mut BufReader<TcpStream>) -> bool {
    let mut buf = [0u8; 1024];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return true,
            Ok(_) => {}
            Err(e) => {
                return matches!(
                    e.kind(),
                    std::io::ErrorKind::ConnectionReset | std::io::ErrorKind::BrokenPipe
                )
            }
        }
    }
}

fn serve(stream: TcpStream, script: Script) -> Transcript {
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let mut writer = stream.try_clone().unwrap();
    let mut reader = BufReader::new(stream);
    let mut transcript = Transcript::default();

    reply(&mut writer, "220 mock.example.com ESMTP ready");

    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => {
                transcript.client_closed = true;
                break;
            }
            Ok(_) => {}
            Err(e) => {
                transcript.client_closed = matches!(
                    e.kind(),
                    std::io::ErrorKind::ConnectionReset | std::io::ErrorKind::BrokenPipe
                );
                break;
            }
        }

        let command = line.trim_end().to_string();
        transcript.commands.push(command.clone());

        if is_verb(&command, "EHLO") {
            let mut lines = vec!["250-mock.example.com".to_string()];
            for ext in &script.ehlo_extensions {
                lines.push(format!("250-{}", ext));
            }
            let last = lines.pop().unwrap().replacen("250-", "250 ", 1);
            lines.push(last);
            for l in lines {
                reply(&mut writer, &l);
            }
        } else if is_verb(&command, "STARTTLS") {
            reply(&mut writer, "220 2.0.0 Ready to start TLS");
            if script.break_tls {
                let mut client_hello = [0u8; 1024];
                let _ = reader.read(&mut client_hello);
                let _ = writer.write_all(b"this is not a TLS handshake\r\n");
                transcript.client_closed = drain(&mut reader);
                break;
            }
        } else if is_verb(&command, "AUTH") {
            reply(&mut writer, script.auth_reply);
        } else if is_verb(&command, "MAIL") {
            reply(&mut writer, script.mail_reply);
        } else if is_verb(&command, "RCPT") {
            reply(&mut writer, script.rcpt_reply);
        } else if is_verb(&command, "DATA") {
            reply(&mut writer, "354 Start mail input; end with <CRLF>.<CRLF>");
            let mut data = String::new();
            loop {
                let mut data_line = String::new();
                match reader.read_line(&mut data_line) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {}
                }
                if data_line == ".\r\n" {
                    break;
                }
                data.push_str(&data_line);
            }
            transcript.data = data;
            reply(&mut writer, "250 2.0.0 Queued as MOCK1");
        } else if is_verb(&command, "QUIT") {
            reply(&mut writer, "221 2.0.0 Bye");
        } else {
            reply(&mut writer, "502 5.5.2 Command not implemented");
        }
    }

    transcript
}
