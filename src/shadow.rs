//! Unix-style shadow files embedded in ECS containers.
//!
//! A shadow file is line-oriented with nine colon-separated fields per
//! line: username, hashed password, last-changed, minimum, maximum,
//! warn, inactive, expire and a reserved field. New passwords are
//! hashed with SHA-512 crypt (`$6$…`); verification dispatches on the
//! hash prefix. An empty password stores `!`, disabling the account.
//!
//! ## Examples
//!
//! ```rust
//! use mguard_cfg::ShadowFile;
//!
//! let mut users = ShadowFile::new();
//! users.add_user("root", "secret").unwrap();
//!
//! assert!(users.verify_password("root", "secret").unwrap());
//! assert!(!users.verify_password("root", "wrong").unwrap());
//! ```

use std::io::{Read, Write};

use sha_crypt::{sha512_check, sha512_simple, Sha512Params};

use crate::{Error, Result};

/// Expected number of fields in a shadow line.
const FIELD_COUNT: usize = 9;

/// Hash prefix of SHA-512 crypt.
const SHA512_PREFIX: &str = "$6$";

/// A parsed shadow file.
#[derive(Debug, Clone, Default)]
pub struct ShadowFile {
    lines: Vec<Line>,
}

#[derive(Debug, Clone)]
struct Line {
    username: String,
    password: String,
    last_changed: String,
    minimum: String,
    maximum: String,
    warn: String,
    inactive: String,
    expire: String,
    reserved: String,
}

impl Line {
    fn new(username: &str) -> Self {
        Line {
            username: username.to_string(),
            password: "!".to_string(),
            last_changed: "0".to_string(),
            minimum: "0".to_string(),
            maximum: "99999".to_string(),
            warn: "7".to_string(),
            inactive: String::new(),
            expire: String::new(),
            reserved: String::new(),
        }
    }

    fn parse(text: &str, line_no: usize) -> Result<Self> {
        let fields: Vec<&str> = text.split(':').collect();
        if fields.len() != FIELD_COUNT {
            return Err(Error::integrity(format!(
                "shadow line {line_no} has {} fields, expected {FIELD_COUNT}",
                fields.len()
            )));
        }

        Ok(Line {
            username: fields[0].to_string(),
            password: fields[1].to_string(),
            last_changed: fields[2].to_string(),
            minimum: fields[3].to_string(),
            maximum: fields[4].to_string(),
            warn: fields[5].to_string(),
            inactive: fields[6].to_string(),
            expire: fields[7].to_string(),
            reserved: fields[8].to_string(),
        })
    }

    fn render(&self) -> String {
        format!(
            "{}:{}:{}:{}:{}:{}:{}:{}:{}",
            self.username,
            self.password,
            self.last_changed,
            self.minimum,
            self.maximum,
            self.warn,
            self.inactive,
            self.expire,
            self.reserved
        )
    }

    fn set_password(&mut self, password: &str) -> Result<()> {
        if password.is_empty() {
            // disabled account
            self.password = "!".to_string();
            return Ok(());
        }

        let params = Sha512Params::default();
        self.password = sha512_simple(password, &params)
            .map_err(|err| Error::crypt(format!("{err:?}")))?;
        Ok(())
    }

    fn verify_password(&self, password: &str) -> Result<bool> {
        if self.password.is_empty() || self.password.starts_with('!') {
            return Ok(false);
        }
        if self.password.starts_with(SHA512_PREFIX) {
            return Ok(sha512_check(password, &self.password).is_ok());
        }
        Err(Error::crypt(format!(
            "unsupported hash scheme for user '{}'",
            self.username
        )))
    }
}

impl ShadowFile {
    /// Creates an empty shadow file.
    #[must_use]
    pub fn new() -> Self {
        ShadowFile::default()
    }

    /// Loads a shadow file from `reader`.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;

        let mut file = ShadowFile::new();
        for (index, line) in text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            file.lines.push(Line::parse(line, index + 1)?);
        }
        Ok(file)
    }

    /// Writes the shadow file to `writer`, one line per user.
    pub fn to_writer<W: Write>(&self, mut writer: W) -> Result<()> {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.render());
            out.push('\n');
        }
        writer.write_all(out.as_bytes())?;
        Ok(())
    }

    /// The usernames in the file, in order.
    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|line| line.username.as_str())
    }

    /// Returns `true` if the file contains the user.
    #[must_use]
    pub fn contains_user(&self, username: &str) -> bool {
        self.lines.iter().any(|line| line.username == username)
    }

    /// Adds a new user with the given password. An empty password
    /// disables the account.
    pub fn add_user(&mut self, username: &str, password: &str) -> Result<()> {
        if self.contains_user(username) {
            return Err(Error::integrity(format!(
                "user '{username}' already exists"
            )));
        }

        let mut line = Line::new(username);
        line.set_password(password)?;
        self.lines.push(line);
        Ok(())
    }

    /// Sets the password of an existing user.
    pub fn set_password(&mut self, username: &str, password: &str) -> Result<()> {
        let line = self
            .lines
            .iter_mut()
            .find(|line| line.username == username)
            .ok_or_else(|| Error::not_found("user", username))?;
        line.set_password(password)
    }

    /// Verifies a clear-text password against the stored hash.
    ///
    /// Returns `Ok(false)` for a wrong password or a disabled account;
    /// an unknown user or an unsupported hash scheme is an error.
    pub fn verify_password(&self, username: &str, password: &str) -> Result<bool> {
        let line = self
            .lines
            .iter()
            .find(|line| line.username == username)
            .ok_or_else(|| Error::not_found("user", username))?;
        line.verify_password(password)
    }
}
