//! Certificate-backed file identities.
//!
//! Independent of the dispatch pipeline; the two subsystems merely share
//! this security layer. An identity owns a reference on the underlying file
//! resource, an optional raw certificate buffer, and a caller-supplied
//! certificate summary. Certificates are never parsed or verified here.

use std::fs::File;
use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity buffer allocation failed")]
    Alloc,
}

/// Caller-parsed certificate fields carried alongside the raw buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateSummary {
    pub subject: String,
    pub version: u32,
}

impl CertificateSummary {
    fn try_clone(&self) -> Result<Self, IdentityError> {
        let mut subject = String::new();
        subject
            .try_reserve_exact(self.subject.len())
            .map_err(|_| IdentityError::Alloc)?;
        subject.push_str(&self.subject);
        Ok(Self {
            subject,
            version: self.version,
        })
    }
}

/// A process identity. Holds its own reference on the file resource for as
/// long as it is initialized.
#[derive(Debug, Default)]
pub struct ProcessIdentity {
    file: Option<Arc<File>>,
    certificate: Option<Vec<u8>>,
    parsed: CertificateSummary,
}

impl ProcessIdentity {
    /// Initialize an identity, taking a new reference on `file`. The
    /// certificate buffer, when present, is moved in; the summary defaults
    /// to empty when the caller has not parsed one.
    pub fn new(file: Arc<File>, certificate: Option<Vec<u8>>, parsed: Option<CertificateSummary>) -> Self {
        Self {
            file: Some(file),
            certificate,
            parsed: parsed.unwrap_or_default(),
        }
    }

    /// Deep copy: a fresh reference on the file resource, an independent
    /// certificate buffer, an independent summary. On allocation failure
    /// everything acquired so far is released before the error returns.
    pub fn copy(&self) -> Result<Self, IdentityError> {
        let file = self.file.clone();

        let certificate = match &self.certificate {
            Some(src) => {
                let mut dst = Vec::new();
                dst.try_reserve_exact(src.len()).map_err(|_| IdentityError::Alloc)?;
                dst.extend_from_slice(src);
                Some(dst)
            }
            None => None,
        };

        let parsed = self.parsed.try_clone()?;

        Ok(Self {
            file,
            certificate,
            parsed,
        })
    }

    /// Release the certificate buffer and the file reference. Safe to call
    /// any number of times.
    pub fn deinit(&mut self) {
        self.parsed = CertificateSummary::default();
        self.certificate = None;
        self.file = None;
    }

    pub fn file(&self) -> Option<&Arc<File>> {
        self.file.as_ref()
    }

    pub fn certificate(&self) -> Option<&[u8]> {
        self.certificate.as_deref()
    }

    pub fn parsed(&self) -> &CertificateSummary {
        &self.parsed
    }
}
