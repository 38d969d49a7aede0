//! Certificate review workflow
//!
//! Faculty move certificates from `pending` to `approved` or `rejected`,
//! always with a remark. Junior faculty only see and decide on students
//! assigned to them; senior faculty and admins see everyone.

use crate::core::analytics::StatusBreakdown;
use crate::core::error::{ValidationError, WorkflowError, WorkflowResult};
use crate::core::models::{Certificate, CertificateStatus, Profile, Role, StudentRef};
use crate::core::store::{Gateway, Query, Table};
use crate::{debug, info, warn};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Faculty decision on a pending certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionAction {
    /// Verify the certificate
    Approve,
    /// Decline the certificate
    Reject,
}

impl DecisionAction {
    /// Status the certificate ends up in
    #[must_use]
    pub const fn resulting_status(self) -> CertificateStatus {
        match self {
            Self::Approve => CertificateStatus::Approved,
            Self::Reject => CertificateStatus::Rejected,
        }
    }
}

impl fmt::Display for DecisionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        })
    }
}

/// A validated decision ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Approve or reject
    pub action: DecisionAction,
    /// Deciding faculty profile id
    pub reviewer_id: String,
    /// Remark as entered; never blank
    pub remark: String,
    /// Decision time
    pub decided_at: DateTime<Utc>,
}

impl Decision {
    /// Validate the remark and stamp the decision time
    ///
    /// Only the emptiness check trims; the remark is stored as entered.
    ///
    /// # Errors
    /// [`ValidationError::MissingRemark`] when the trimmed remark is empty.
    pub fn new(
        action: DecisionAction,
        reviewer_id: &str,
        remark: &str,
    ) -> Result<Self, ValidationError> {
        if remark.trim().is_empty() {
            return Err(ValidationError::MissingRemark);
        }
        Ok(Self {
            action,
            reviewer_id: reviewer_id.to_string(),
            remark: remark.to_string(),
            decided_at: Utc::now(),
        })
    }

    /// Fields written to the certificate row
    ///
    /// `rejection_reason` is only present for rejections so an approval
    /// leaves it untouched.
    #[must_use]
    pub fn patch(&self) -> Value {
        let mut patch = json!({
            "status": self.action.resulting_status(),
            "verified_by": self.reviewer_id,
            "verified_at": self.decided_at,
            "remark": self.remark,
        });
        if self.action == DecisionAction::Reject {
            patch["rejection_reason"] = json!(self.remark);
        }
        patch
    }
}

/// Certificate joined with its student
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewItem {
    /// The certificate
    pub certificate: Certificate,
    /// Owning student, or the `Unknown` placeholder
    pub student: StudentRef,
}

/// Reviewer's view split into open and decided certificates
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReviewQueue {
    /// Awaiting a decision, newest upload first
    pub pending: Vec<ReviewItem>,
    /// Approved or rejected, newest upload first
    pub processed: Vec<ReviewItem>,
}

impl ReviewQueue {
    /// Split joined items by status, keeping their order
    #[must_use]
    pub fn from_items(items: Vec<ReviewItem>) -> Self {
        let (pending, processed) =
            items.into_iter().partition(|item| item.certificate.is_pending());
        Self { pending, processed }
    }

    /// Whether the certificate is waiting in the pending list
    #[must_use]
    pub fn is_pending(&self, certificate_id: &str) -> bool {
        self.pending.iter().any(|i| i.certificate.id == certificate_id)
    }

    /// Whether the certificate is in the processed list
    #[must_use]
    pub fn is_processed(&self, certificate_id: &str) -> bool {
        self.processed.iter().any(|i| i.certificate.id == certificate_id)
    }
}

/// A visible student with their certificate counts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentStanding {
    /// Student profile
    pub student: Profile,
    /// Counts over the student's certificates
    pub certificates: StatusBreakdown,
}

impl StudentStanding {
    /// Approval rate in percent
    #[must_use]
    pub fn progress(&self) -> u32 {
        self.certificates.approval_rate()
    }
}

/// Ids with a decision currently being written
#[derive(Debug, Default, Clone)]
struct InFlight(Arc<Mutex<HashSet<String>>>);

impl InFlight {
    fn begin(&self, id: &str) -> Option<InFlightGuard> {
        let mut ids = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        ids.insert(id.to_string())
            .then(|| InFlightGuard { ids: Arc::clone(&self.0), id: id.to_string() })
    }
}

/// Releases the id on every exit path
struct InFlightGuard {
    ids: Arc<Mutex<HashSet<String>>>,
    id: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner).remove(&self.id);
    }
}

/// Review operations over a [`Gateway`]
#[derive(Debug, Clone)]
pub struct CertificateWorkflow {
    gateway: Gateway,
    in_flight: InFlight,
}

impl CertificateWorkflow {
    /// Workflow over the given gateway
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway, in_flight: InFlight::default() }
    }

    fn ensure_reviewer(reviewer: &Profile) -> WorkflowResult<()> {
        if reviewer.is_reviewer() {
            Ok(())
        } else {
            Err(WorkflowError::AccessDenied(format!(
                "{} accounts cannot review certificates",
                reviewer.role
            )))
        }
    }

    /// Approve or reject a pending certificate and return the updated record
    ///
    /// # Errors
    /// Validation before any store call; `InFlight` while another decision
    /// on the same id runs; `AlreadyDecided`/`NotAssigned` policy refusals;
    /// store failures.
    pub async fn decide(
        &self,
        reviewer: &Profile,
        certificate_id: &str,
        action: DecisionAction,
        remark: &str,
    ) -> WorkflowResult<Certificate> {
        let decision = Decision::new(action, &reviewer.id, remark)?;
        Self::ensure_reviewer(reviewer)?;

        let Some(_guard) = self.in_flight.begin(certificate_id) else {
            warn!("Ignoring duplicate {action} on {certificate_id}");
            return Err(WorkflowError::InFlight(certificate_id.to_string()));
        };

        let certificate: Certificate =
            self.gateway.fetch_one(Table::Certificates, certificate_id).await?;
        if !certificate.is_pending() {
            return Err(WorkflowError::AlreadyDecided {
                id: certificate.id,
                status: certificate.status.to_string(),
            });
        }

        if !reviewer.sees_all_students() {
            let student: Option<Profile> = self
                .gateway
                .fetch_collection(Table::Profiles, &Query::by_id(&certificate.student_id).limit(1))
                .await?
                .into_iter()
                .next();
            let assigned = student
                .and_then(|s| s.assigned_faculty_id)
                .is_some_and(|faculty| faculty == reviewer.id);
            if !assigned {
                return Err(WorkflowError::NotAssigned(certificate.id));
            }
        }

        self.gateway
            .update(Table::Certificates, certificate_id, decision.patch())
            .await?;
        info!(
            "{} marked certificate {certificate_id} {}",
            reviewer.full_name,
            action.resulting_status()
        );

        Ok(self.gateway.fetch_one(Table::Certificates, certificate_id).await?)
    }

    /// Student profiles this reviewer may see, by name
    ///
    /// # Errors
    /// `AccessDenied` for students; store failures.
    pub async fn assigned_students(&self, reviewer: &Profile) -> WorkflowResult<Vec<Profile>> {
        Self::ensure_reviewer(reviewer)?;
        let mut query = Query::new().eq("role", Role::Student.as_str());
        if !reviewer.sees_all_students() {
            query = query.eq("assigned_faculty_id", reviewer.id.as_str());
        }
        Ok(self
            .gateway
            .fetch_collection(Table::Profiles, &query.order_asc("full_name"))
            .await?)
    }

    /// Visible students with their certificate progress, by name
    ///
    /// # Errors
    /// `AccessDenied` for students; store failures.
    pub async fn student_standings(
        &self,
        reviewer: &Profile,
    ) -> WorkflowResult<Vec<StudentStanding>> {
        let students = self.assigned_students(reviewer).await?;
        if students.is_empty() {
            return Ok(Vec::new());
        }
        let query = Query::new().in_list("student_id", students.iter().map(|s| s.id.as_str()));
        let certificates: Vec<Certificate> =
            self.gateway.fetch_collection(Table::Certificates, &query).await?;
        Ok(students
            .into_iter()
            .map(|student| {
                let own: Vec<Certificate> = certificates
                    .iter()
                    .filter(|c| c.student_id == student.id)
                    .cloned()
                    .collect();
                StudentStanding { certificates: StatusBreakdown::of_certificates(&own), student }
            })
            .collect())
    }

    /// Pending and processed certificates visible to the reviewer
    ///
    /// A junior reviewer with no assigned students gets an empty queue.
    ///
    /// # Errors
    /// `AccessDenied` for students; store failures.
    pub async fn review_queue(&self, reviewer: &Profile) -> WorkflowResult<ReviewQueue> {
        let students = self.assigned_students(reviewer).await?;

        let mut query = Query::new();
        if !reviewer.sees_all_students() {
            if students.is_empty() {
                debug!("{} has no assigned students", reviewer.id);
                return Ok(ReviewQueue::default());
            }
            query = query.in_list("student_id", students.iter().map(|s| s.id.as_str()));
        }
        let certificates: Vec<Certificate> = self
            .gateway
            .fetch_collection(Table::Certificates, &query.order_desc("uploaded_at"))
            .await?;

        let by_id: HashMap<&str, &Profile> = students.iter().map(|s| (s.id.as_str(), s)).collect();
        let items = certificates
            .into_iter()
            .map(|certificate| {
                let student = by_id
                    .get(certificate.student_id.as_str())
                    .map_or_else(StudentRef::unknown, |p| StudentRef::from(*p));
                ReviewItem { certificate, student }
            })
            .collect();
        Ok(ReviewQueue::from_items(items))
    }
}
