use anyhow::{Result, bail};
use std::io::{self, BufRead, IsTerminal};
use zeroize::Zeroizing;

pub const PASSPHRASE_ENV: &str = "SEALKIT_PASSPHRASE";

/// Passphrase for decryption: env var, then piped stdin, then a TTY prompt.
pub fn read_passphrase() -> Result<Zeroizing<String>> {
    //  SEALKIT_PASSPHRASE="hunter2" sealkit decrypt notes.txt.skit
    if let Some(pw) = from_env() {
        return Ok(pw);
    }

    //  printf "%s" "$PW" | sealkit decrypt notes.txt.skit
    if !io::stdin().is_terminal() {
        let mut pw = Zeroizing::new(String::new());
        io::stdin().lock().read_line(&mut pw)?;
        trim_newline(&mut pw);
        if !pw.is_empty() {
            return Ok(pw);
        }
        bail!("no passphrase provided");
    }

    let pw = Zeroizing::new(rpassword::prompt_password("Passphrase: ")?);
    if pw.is_empty() {
        bail!("no passphrase provided");
    }
    Ok(pw)
}

/// Passphrase for encryption. Interactive and piped input must be typed twice.
pub fn read_new_passphrase() -> Result<Zeroizing<String>> {
    if let Some(pw) = from_env() {
        return Ok(pw);
    }

    let (pw1, pw2) = if io::stdin().is_terminal() {
        (
            Zeroizing::new(rpassword::prompt_password("New passphrase: ")?),
            Zeroizing::new(rpassword::prompt_password("Confirm passphrase: ")?),
        )
    } else {
        let stdin = io::stdin();
        let mut handle = stdin.lock();

        let mut pw1 = Zeroizing::new(String::new());
        let mut pw2 = Zeroizing::new(String::new());
        handle.read_line(&mut pw1)?;
        handle.read_line(&mut pw2)?;
        trim_newline(&mut pw1);
        trim_newline(&mut pw2);
        (pw1, pw2)
    };

    if pw1.is_empty() {
        bail!("passphrase cannot be empty");
    }
    if *pw1 != *pw2 {
        bail!("passphrases do not match");
    }
    Ok(pw1)
}

fn from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSPHRASE_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}
