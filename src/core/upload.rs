//! Student certificate upload and listing

use crate::core::error::{ValidationError, WorkflowError, WorkflowResult};
use crate::core::models::{Category, Certificate, CertificateStatus, NewCertificate, Profile, Role};
use crate::core::store::{Gateway, Query, Table};
use crate::{info, warn};
use chrono::Utc;
use std::path::Path;

/// Storage bucket for certificate files
pub const CERTIFICATE_BUCKET: &str = "certificates";

/// Upload form contents
#[derive(Debug, Clone)]
pub struct CertificateUpload {
    /// Title shown to reviewers
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Academic or co-curricular
    pub category: Category,
    /// Original file name
    pub file_name: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl CertificateUpload {
    /// Read the file at `path` into an upload
    ///
    /// # Errors
    /// Returns an error string if the file cannot be read.
    pub fn from_file(
        path: &Path,
        title: &str,
        category: Category,
        description: Option<String>,
    ) -> Result<Self, String> {
        let bytes = std::fs::read(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { title: title.to_string(), description, category, file_name, bytes })
    }

    /// Check required fields
    ///
    /// # Errors
    /// `MissingTitle` or `MissingFile`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if self.file_name.trim().is_empty() || self.bytes.is_empty() {
            return Err(ValidationError::MissingFile);
        }
        Ok(())
    }
}

/// Extension used in the storage path, `bin` when the name has none
#[must_use]
pub fn file_extension(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext,
        _ => "bin",
    }
}

/// Storage path `{user_id}/{unix_millis}.{ext}`
#[must_use]
pub fn storage_path(user_id: &str, unix_millis: i64, file_name: &str) -> String {
    format!("{user_id}/{unix_millis}.{}", file_extension(file_name))
}

/// A student's certificates split by status
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CertificateList {
    /// Every certificate, newest upload first
    pub all: Vec<Certificate>,
}

impl CertificateList {
    /// Certificates with the given status, in list order
    #[must_use]
    pub fn with_status(&self, status: CertificateStatus) -> Vec<&Certificate> {
        self.all.iter().filter(|c| c.status == status).collect()
    }
}

/// Upload the file, then insert the certificate row as pending
///
/// A failed insert leaves the uploaded file in place and logs its path.
///
/// # Errors
/// Validation before any store call; `AccessDenied` for non-students;
/// store failures.
pub async fn upload_certificate(
    gateway: &Gateway,
    student: &Profile,
    upload: CertificateUpload,
) -> WorkflowResult<Certificate> {
    upload.validate()?;
    if student.role != Role::Student {
        return Err(WorkflowError::AccessDenied("only students upload certificates".to_string()));
    }

    let owner = if student.user_id.is_empty() { &student.id } else { &student.user_id };
    let path = storage_path(owner, Utc::now().timestamp_millis(), &upload.file_name);
    let file_url = gateway.upload_file(CERTIFICATE_BUCKET, &path, upload.bytes).await?;

    let row = NewCertificate {
        student_id: student.id.clone(),
        title: upload.title.trim().to_string(),
        description: upload.description.filter(|d| !d.trim().is_empty()),
        category: upload.category,
        file_url,
        file_name: upload.file_name,
    };
    let certificate: Certificate = match gateway.insert(Table::Certificates, &row).await {
        Ok(certificate) => certificate,
        Err(e) => {
            warn!(
                "Certificate row insert failed; uploaded file left at {CERTIFICATE_BUCKET}/{path}"
            );
            return Err(e.into());
        }
    };
    info!("Certificate '{}' submitted for review", certificate.title);
    Ok(certificate)
}

/// The student's own certificates, newest upload first
///
/// # Errors
/// Store failures.
pub async fn student_certificates(
    gateway: &Gateway,
    student_id: &str,
) -> WorkflowResult<CertificateList> {
    let query = Query::new().eq("student_id", student_id).order_desc("uploaded_at");
    Ok(CertificateList { all: gateway.fetch_collection(Table::Certificates, &query).await? })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_after_last_dot() {
        assert_eq!(file_extension("scan.final.PDF"), "PDF");
        assert_eq!(file_extension("noext"), "bin");
        assert_eq!(file_extension("trailing."), "bin");
        assert_eq!(storage_path("user-1", 1_700_000_000_000, "a.png"), "user-1/1700000000000.png");
    }

    #[test]
    fn validation_requires_title_and_file() {
        let mut upload = CertificateUpload {
            title: "  ".to_string(),
            description: None,
            category: Category::Academic,
            file_name: "a.pdf".to_string(),
            bytes: vec![1],
        };
        assert_eq!(upload.validate(), Err(ValidationError::MissingTitle));
        upload.title = "Degree".to_string();
        upload.bytes.clear();
        assert_eq!(upload.validate(), Err(ValidationError::MissingFile));
        upload.bytes.push(1);
        assert_eq!(upload.validate(), Ok(()));
    }
}
