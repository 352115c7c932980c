//! ECS containers: the gzip-tar bundles a device imports.
//!
//! An ECS container is a gzip-compressed tar archive holding the
//! directory `aca/` and four regular files:
//!
//! | member | content |
//! |---|---|
//! | `aca/cfg` | the ATV configuration document |
//! | `aca/users` | the shadow file |
//! | `aca/pass` | the literal `root\n` |
//! | `aca/snmpd` | a fixed snmpd bootstrap line |
//!
//! Member names and modes (directory `0700`, files `0600`) are part of
//! the wire contract. Loading parses the embedded ATV and shadow
//! documents; saving re-serializes both and rebuilds the archive with
//! current timestamps.
//!
//! Encryption is delegated: [`Container::to_encrypted_writer`] renders
//! the cleartext archive into a buffer and hands it, together with the
//! PEM-encoded device certificate, to an [`Encryptor`] implementation.

use std::io::{Read, Write};
use std::path::Path;

use chrono::Utc;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::debug;

use crate::document::Document;
use crate::shadow::ShadowFile;
use crate::{Error, Result};

const CFG_MEMBER: &str = "aca/cfg";
const USERS_MEMBER: &str = "aca/users";
const PASS_MEMBER: &str = "aca/pass";
const SNMPD_MEMBER: &str = "aca/snmpd";
const DIR_MEMBER: &str = "aca";

/// Default content of the `aca/pass` member.
const DEFAULT_PASS: &[u8] = b"root\n";

/// Default content of the `aca/snmpd` member.
const DEFAULT_SNMPD: &[u8] = b"createUser \"admin\" MD5 \"SnmpAdmin\" DES \"SnmpAdmin\"\n";

/// Encrypts a rendered ECS container to a device certificate.
///
/// Implementations typically shell out to an external cryptography
/// tool producing a PKCS#7/SMIME structure; the core only defines the
/// contract.
pub trait Encryptor {
    /// Encrypts `cleartext` to the certificate in `cert_pem`.
    fn encrypt(&self, cleartext: &[u8], cert_pem: &str) -> Result<Vec<u8>>;
}

/// An ECS container: an ATV document plus its companion files.
#[derive(Debug, Clone)]
pub struct Container {
    /// The embedded configuration document.
    pub atv: Document,
    /// The embedded shadow file.
    pub users: ShadowFile,
    pass: Vec<u8>,
    snmpd: Vec<u8>,
}

impl Container {
    /// Wraps an ATV document in a container with the default shadow
    /// file and companion blobs.
    ///
    /// The default shadow file carries the factory accounts: `root`
    /// (password `root`), `admin` (password `mGuard`) and the disabled
    /// accounts `user`, `netadmin`, `audit` and `userfwd`.
    pub fn from_atv(atv: Document) -> Result<Self> {
        let mut users = ShadowFile::new();
        users.add_user("root", "root")?;
        users.add_user("admin", "mGuard")?;
        users.add_user("user", "")?;
        users.add_user("netadmin", "")?;
        users.add_user("audit", "")?;
        users.add_user("userfwd", "")?;

        Ok(Container {
            atv,
            users,
            pass: DEFAULT_PASS.to_vec(),
            snmpd: DEFAULT_SNMPD.to_vec(),
        })
    }

    /// Reads a container from the gzip-tar stream in `reader`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut archive = tar::Archive::new(GzDecoder::new(reader));

        let mut cfg: Option<Vec<u8>> = None;
        let mut users: Option<Vec<u8>> = None;
        let mut pass = DEFAULT_PASS.to_vec();
        let mut snmpd = DEFAULT_SNMPD.to_vec();

        for entry in archive.entries()? {
            let mut entry = entry?;
            if !entry.header().entry_type().is_file() {
                continue;
            }

            let name = entry.path()?.to_string_lossy().into_owned();
            debug!(member = %name, "reading container member");

            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            match name.as_str() {
                CFG_MEMBER => cfg = Some(data),
                USERS_MEMBER => users = Some(data),
                PASS_MEMBER => pass = data,
                SNMPD_MEMBER => snmpd = data,
                _ => {}
            }
        }

        let cfg = cfg.ok_or_else(|| {
            Error::integrity(format!(
                "the container does not contain a configuration file at '{CFG_MEMBER}'"
            ))
        })?;
        let users = users.ok_or_else(|| {
            Error::integrity(format!(
                "the container does not contain a password file at '{USERS_MEMBER}'"
            ))
        })?;

        let cfg = String::from_utf8(cfg)
            .map_err(|_| Error::integrity(format!("'{CFG_MEMBER}' is not valid UTF-8")))?;
        let atv = Document::parse(&cfg)?;
        let users = ShadowFile::from_reader(users.as_slice())?;

        Ok(Container {
            atv,
            users,
            pass,
            snmpd,
        })
    }

    /// Reads a container from the file at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_reader(std::fs::File::open(path)?)
    }

    /// Writes the container as a gzip-tar stream to `writer`.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut cfg = Vec::new();
        self.atv.to_writer(&mut cfg)?;
        let mut users = Vec::new();
        self.users.to_writer(&mut users)?;

        let mtime = Utc::now().timestamp().max(0) as u64;
        let encoder = GzEncoder::new(writer, Compression::default());
        let mut builder = tar::Builder::new(encoder);

        let mut dir = tar::Header::new_gnu();
        dir.set_entry_type(tar::EntryType::Directory);
        dir.set_mode(0o700);
        dir.set_size(0);
        dir.set_mtime(mtime);
        builder.append_data(&mut dir, DIR_MEMBER, std::io::empty())?;

        for (name, data) in [
            (CFG_MEMBER, cfg.as_slice()),
            (PASS_MEMBER, self.pass.as_slice()),
            (SNMPD_MEMBER, self.snmpd.as_slice()),
            (USERS_MEMBER, users.as_slice()),
        ] {
            debug!(member = %name, "writing container member");
            let mut header = tar::Header::new_gnu();
            header.set_entry_type(tar::EntryType::Regular);
            header.set_mode(0o600);
            header.set_size(data.len() as u64);
            header.set_mtime(mtime);
            builder.append_data(&mut header, name, data)?;
        }

        let encoder = builder.into_inner()?;
        encoder.finish()?;
        Ok(())
    }

    /// Writes the container to the file at `path`, creating parent
    /// directories as needed.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // buffer first so a failing serialization commits nothing
        let mut buffer = Vec::new();
        self.to_writer(&mut buffer)?;
        std::fs::write(path, buffer)?;
        Ok(())
    }

    /// Writes the container encrypted to the device certificate in
    /// `cert_pem`, delegating the cryptography to `encryptor`.
    pub fn to_encrypted_writer<W: Write>(
        &self,
        mut writer: W,
        cert_pem: &str,
        encryptor: &dyn Encryptor,
    ) -> Result<()> {
        let mut cleartext = Vec::new();
        self.to_writer(&mut cleartext)?;

        let encrypted = encryptor.encrypt(&cleartext, cert_pem)?;
        writer.write_all(&encrypted)?;
        Ok(())
    }

    /// Content of the `aca/pass` member.
    #[must_use]
    pub fn pass(&self) -> &[u8] {
        &self.pass
    }

    /// Content of the `aca/snmpd` member.
    #[must_use]
    pub fn snmpd(&self) -> &[u8] {
        &self.snmpd
    }
}
