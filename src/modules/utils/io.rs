use std::io;

/// Password argument that means "ask on the terminal instead"
pub const PROMPT_MARKER: &str = "-";

pub fn wants_prompt(password: &str) -> bool {
    password == PROMPT_MARKER
}

/// Helper function to read a password securely
pub fn read_password(prompt: &str) -> io::Result<String> {
    rpassword::prompt_password(prompt)
}
