//! Dashboard aggregation
//!
//! Pure functions of the record collections they are given: no counters are
//! kept between calls, empty input yields zeroes, and missing numbers count
//! as zero. The `load_*` helpers fetch the collections a view needs and hand
//! them to the pure part.

use crate::core::error::{WorkflowError, WorkflowResult};
use crate::core::models::{
    AcademicRecord, AchievementSummary, Activity, ActivityStatus, Category, Certificate,
    CertificateStatus, Profile, Role, StudentRef,
};
use crate::core::store::{Gateway, Query, Table};
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Rows on the analytics dashboard leaderboard
pub const DASHBOARD_LEADERBOARD: usize = 10;
/// Rows on the compact leaderboard widget
pub const WIDGET_LEADERBOARD: usize = 5;
/// Maximum number of recommendations shown
pub const MAX_RECOMMENDATIONS: usize = 6;

/// Record that moves through a review and can be charted
pub trait Reviewable {
    /// Timestamp used for month bucketing
    fn timestamp(&self) -> DateTime<Utc>;
    /// Whether the record has been approved
    fn is_approved(&self) -> bool;
    /// Academic or co-curricular
    fn category(&self) -> Category;
}

impl Reviewable for Certificate {
    fn timestamp(&self) -> DateTime<Utc> {
        self.uploaded_at
    }

    fn is_approved(&self) -> bool {
        self.status == CertificateStatus::Approved
    }

    fn category(&self) -> Category {
        self.category
    }
}

impl Reviewable for Activity {
    fn timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn is_approved(&self) -> bool {
        self.status == ActivityStatus::Approved
    }

    fn category(&self) -> Category {
        self.category
    }
}

/// Counts per review status
///
/// `approved + pending + rejected` equals `total` for certificates; for
/// activities drafts are only part of `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    /// Records considered
    pub total: usize,
    /// Approved records
    pub approved: usize,
    /// Records awaiting review
    pub pending: usize,
    /// Rejected records
    pub rejected: usize,
}

impl StatusBreakdown {
    /// Breakdown of certificates
    #[must_use]
    pub fn of_certificates(certificates: &[Certificate]) -> Self {
        let count =
            |status: CertificateStatus| certificates.iter().filter(|c| c.status == status).count();
        Self {
            total: certificates.len(),
            approved: count(CertificateStatus::Approved),
            pending: count(CertificateStatus::Pending),
            rejected: count(CertificateStatus::Rejected),
        }
    }

    /// Breakdown of activities; `submitted` counts as pending
    #[must_use]
    pub fn of_activities(activities: &[Activity]) -> Self {
        let count =
            |status: ActivityStatus| activities.iter().filter(|a| a.status == status).count();
        Self {
            total: activities.len(),
            approved: count(ActivityStatus::Approved),
            pending: count(ActivityStatus::Submitted),
            rejected: count(ActivityStatus::Rejected),
        }
    }

    /// Approved share in whole percent
    #[must_use]
    pub fn approval_rate(&self) -> u32 {
        approval_rate(self.approved, self.total)
    }
}

/// `round(approved / total * 100)`, 0 when `total` is 0
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn approval_rate(approved: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((approved as f64 / total as f64) * 100.0).round() as u32
}

/// Sum of `credits_earned`, null counted as 0
#[must_use]
pub fn total_credits(activities: &[Activity]) -> u32 {
    activities.iter().map(Activity::credits).sum()
}

/// Mean of `total_credits` across summarized students, 0 when empty
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_credits(summaries: &[AchievementSummary]) -> f64 {
    if summaries.is_empty() {
        return 0.0;
    }
    let sum: u32 = summaries.iter().map(AchievementSummary::credits).sum();
    f64::from(sum) / summaries.len() as f64
}

/// `YYYY-MM` bucket of a timestamp (UTC)
#[must_use]
pub fn month_key(timestamp: DateTime<Utc>) -> String {
    format!("{:04}-{:02}", timestamp.year(), timestamp.month())
}

/// Uploads and approvals in one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyPoint {
    /// `YYYY-MM`
    pub month: String,
    /// Records created in the month
    pub uploads: usize,
    /// Of those, approved
    pub approved: usize,
}

/// Academic and co-curricular records in one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryPoint {
    /// `YYYY-MM`
    pub month: String,
    /// Academic records
    pub academic: usize,
    /// Co-curricular records
    pub co_curricular: usize,
}

/// Month buckets with at least one record, ascending
#[must_use]
pub fn monthly_series<T: Reviewable>(records: &[T]) -> Vec<MonthlyPoint> {
    let mut buckets: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for record in records {
        let bucket = buckets.entry(month_key(record.timestamp())).or_default();
        bucket.0 += 1;
        if record.is_approved() {
            bucket.1 += 1;
        }
    }
    buckets
        .into_iter()
        .map(|(month, (uploads, approved))| MonthlyPoint { month, uploads, approved })
        .collect()
}

/// Month buckets split by category, ascending
#[must_use]
pub fn category_series<T: Reviewable>(records: &[T]) -> Vec<CategoryPoint> {
    let mut buckets: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for record in records {
        let bucket = buckets.entry(month_key(record.timestamp())).or_default();
        match record.category() {
            Category::Academic => bucket.0 += 1,
            Category::CoCurricular => bucket.1 += 1,
        }
    }
    buckets
        .into_iter()
        .map(|(month, (academic, co_curricular))| CategoryPoint { month, academic, co_curricular })
        .collect()
}

/// Count per certificate status in display order (approved, pending, rejected)
#[must_use]
pub fn status_counts(certificates: &[Certificate]) -> Vec<(CertificateStatus, usize)> {
    [CertificateStatus::Approved, CertificateStatus::Pending, CertificateStatus::Rejected]
        .into_iter()
        .map(|status| (status, certificates.iter().filter(|c| c.status == status).count()))
        .collect()
}

/// Count per category (academic, co-curricular)
#[must_use]
pub fn category_counts<T: Reviewable>(records: &[T]) -> Vec<(Category, usize)> {
    [Category::Academic, Category::CoCurricular]
        .into_iter()
        .map(|category| (category, records.iter().filter(|r| r.category() == category).count()))
        .collect()
}

/// Sort by total credits descending, keeping input order between ties, and
/// keep the first `n`
#[must_use]
pub fn leaderboard(summaries: &[AchievementSummary], n: usize) -> Vec<AchievementSummary> {
    let mut ranked = summaries.to_vec();
    ranked.sort_by(|a, b| b.credits().cmp(&a.credits()));
    ranked.truncate(n);
    ranked
}

/// Faculty student-detail page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentProgress {
    /// Student shown
    pub student: StudentRef,
    /// Certificate counts
    pub breakdown: StatusBreakdown,
    /// Approval rate in percent
    pub progress: u32,
    /// Uploads and approvals per month
    pub timeline: Vec<MonthlyPoint>,
    /// Academic vs co-curricular per month
    pub category_timeline: Vec<CategoryPoint>,
    /// Count per status
    pub status_counts: Vec<(CertificateStatus, usize)>,
    /// Count per category
    pub category_counts: Vec<(Category, usize)>,
}

impl StudentProgress {
    /// Derive every chart from the student's certificates
    #[must_use]
    pub fn compute(student: StudentRef, certificates: &[Certificate]) -> Self {
        let breakdown = StatusBreakdown::of_certificates(certificates);
        Self {
            student,
            progress: breakdown.approval_rate(),
            breakdown,
            timeline: monthly_series(certificates),
            category_timeline: category_series(certificates),
            status_counts: status_counts(certificates),
            category_counts: category_counts(certificates),
        }
    }
}

/// Load the detail page for one student
///
/// Junior reviewers may only open students assigned to them. A student whose
/// profile is missing is shown as `Unknown` to senior reviewers.
///
/// # Errors
/// `AccessDenied` outside the reviewer's scope; store failures.
pub async fn load_student_progress(
    gateway: &Gateway,
    viewer: &Profile,
    student_id: &str,
) -> WorkflowResult<StudentProgress> {
    if !viewer.is_reviewer() {
        return Err(WorkflowError::AccessDenied(
            "only faculty can open student progress".to_string(),
        ));
    }
    let profile: Option<Profile> = gateway
        .fetch_collection(Table::Profiles, &Query::by_id(student_id).limit(1))
        .await?
        .into_iter()
        .next();
    if !viewer.sees_all_students() {
        let assigned = profile
            .as_ref()
            .and_then(|p| p.assigned_faculty_id.as_deref())
            .is_some_and(|faculty| faculty == viewer.id);
        if !assigned {
            return Err(WorkflowError::AccessDenied(format!(
                "student '{student_id}' is not assigned to you"
            )));
        }
    }
    let student = profile.as_ref().map_or_else(StudentRef::unknown, StudentRef::from);
    let query = Query::new().eq("student_id", student_id).order_asc("uploaded_at");
    let certificates: Vec<Certificate> =
        gateway.fetch_collection(Table::Certificates, &query).await?;
    Ok(StudentProgress::compute(student, &certificates))
}

/// Institution-wide dashboard totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsOverview {
    /// Student profiles
    pub total_students: usize,
    /// Faculty profiles
    pub total_faculty: usize,
    /// Certificate counts
    pub certificates: StatusBreakdown,
    /// Activity counts
    pub activities: StatusBreakdown,
    /// Credits across every activity
    pub total_credits: u32,
    /// Mean credits per summarized student
    pub average_credits_per_student: f64,
}

impl AnalyticsOverview {
    /// Combine profile counts with record collections
    #[must_use]
    pub fn compute(
        total_students: usize,
        total_faculty: usize,
        certificates: &[Certificate],
        activities: &[Activity],
        summaries: &[AchievementSummary],
    ) -> Self {
        Self {
            total_students,
            total_faculty,
            certificates: StatusBreakdown::of_certificates(certificates),
            activities: StatusBreakdown::of_activities(activities),
            total_credits: total_credits(activities),
            average_credits_per_student: average_credits(summaries),
        }
    }
}

/// Overview plus leaderboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// Totals
    pub overview: AnalyticsOverview,
    /// Top students by credits
    pub leaderboard: Vec<AchievementSummary>,
    /// Short top-performers list for the summary card
    pub top_performers: Vec<AchievementSummary>,
}

/// Load the analytics dashboard (senior and admin faculty only)
///
/// # Errors
/// `AccessDenied` for other profiles; store failures.
pub async fn load_dashboard(
    gateway: &Gateway,
    viewer: &Profile,
    top: usize,
) -> WorkflowResult<Dashboard> {
    if !viewer.sees_all_students() {
        return Err(WorkflowError::AccessDenied(
            "analytics are available to senior faculty and admins".to_string(),
        ));
    }
    let total_students = gateway
        .count(Table::Profiles, &Query::new().eq("role", Role::Student.as_str()))
        .await?;
    let total_faculty = gateway
        .count(Table::Profiles, &Query::new().eq("role", Role::Faculty.as_str()))
        .await?;
    let certificates: Vec<Certificate> =
        gateway.fetch_collection(Table::Certificates, &Query::new()).await?;
    let activities: Vec<Activity> =
        gateway.fetch_collection(Table::Activities, &Query::new()).await?;
    let summaries: Vec<AchievementSummary> = gateway
        .fetch_collection(Table::StudentAchievementsSummary, &Query::new())
        .await?;

    Ok(Dashboard {
        overview: AnalyticsOverview::compute(
            total_students,
            total_faculty,
            &certificates,
            &activities,
            &summaries,
        ),
        leaderboard: leaderboard(&summaries, top),
        top_performers: leaderboard(&summaries, WIDGET_LEADERBOARD),
    })
}

/// Records sharing a grouping key
#[derive(Debug, Clone, PartialEq)]
pub struct Group<'a, T> {
    /// Grouping key
    pub key: String,
    /// Members in input order
    pub items: Vec<&'a T>,
}

impl Group<'_, AcademicRecord> {
    /// Credit hours in the group
    #[must_use]
    pub fn credits(&self) -> f64 {
        self.items.iter().map(|r| r.credits).sum()
    }
}

impl Group<'_, Activity> {
    /// Credits in the group
    #[must_use]
    pub fn credits(&self) -> u32 {
        self.items.iter().map(|a| a.credits()).sum()
    }
}

/// Groups in order of first appearance
fn group_by<'a, T>(items: &'a [T], key: impl Fn(&T) -> String) -> Vec<Group<'a, T>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group<'a, T>> = Vec::new();
    for item in items {
        let key = key(item);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(Group { key, items: Vec::new() });
            groups.len() - 1
        });
        groups[slot].items.push(item);
    }
    groups
}

/// Transcript totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AcademicStats {
    /// Sum of credit hours
    pub total_credits: f64,
    /// CGPA of the newest record, 0 when absent
    pub current_cgpa: f64,
    /// Subjects taken
    pub total_subjects: usize,
    /// Mean grade points, null counted as 0
    pub average_grade_points: f64,
}

impl AcademicStats {
    /// Totals over records ordered newest first
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(records: &[AcademicRecord]) -> Self {
        let total_subjects = records.len();
        let points: f64 = records.iter().map(|r| r.grade_points.unwrap_or(0.0)).sum();
        Self {
            total_credits: records.iter().map(|r| r.credits).sum(),
            current_cgpa: records.first().and_then(|r| r.cgpa).unwrap_or(0.0),
            total_subjects,
            average_grade_points: if total_subjects == 0 {
                0.0
            } else {
                points / total_subjects as f64
            },
        }
    }
}

/// Records grouped by academic year, newest year first
#[must_use]
pub fn group_by_academic_year(records: &[AcademicRecord]) -> Vec<Group<'_, AcademicRecord>> {
    let mut groups = group_by(records, |r| r.academic_year.clone());
    groups.sort_by(|a, b| b.key.cmp(&a.key));
    groups
}

/// Records grouped by `"{year} - {semester}"`, newest first
#[must_use]
pub fn group_by_semester(records: &[AcademicRecord]) -> Vec<Group<'_, AcademicRecord>> {
    let mut groups = group_by(records, |r| format!("{} - {}", r.academic_year, r.semester));
    groups.sort_by(|a, b| b.key.cmp(&a.key));
    groups
}

/// A student's transcript, newest year and semester first
///
/// # Errors
/// Store failures.
pub async fn load_academic_records(
    gateway: &Gateway,
    student_id: &str,
) -> WorkflowResult<Vec<AcademicRecord>> {
    let query = Query::new()
        .eq("student_id", student_id)
        .order_desc("academic_year")
        .order_desc("semester");
    Ok(gateway.fetch_collection(Table::AcademicRecords, &query).await?)
}

/// Approved co-curricular activity totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CoCurricularStats {
    /// Activities counted
    pub total_activities: usize,
    /// Credits earned
    pub total_credits: u32,
    /// Distinct activity types
    pub activity_types: usize,
    /// Mean credits per activity, 0 when empty
    pub average_credits: f64,
}

impl CoCurricularStats {
    /// Totals over the given activities
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(activities: &[Activity]) -> Self {
        let total_activities = activities.len();
        let total_credits = total_credits(activities);
        let activity_types =
            activities.iter().map(|a| a.activity_type).collect::<HashSet<_>>().len();
        Self {
            total_activities,
            total_credits,
            activity_types,
            average_credits: if total_activities == 0 {
                0.0
            } else {
                f64::from(total_credits) / total_activities as f64
            },
        }
    }
}

/// Activities grouped by type, largest group first
///
/// Groups of equal size keep the order in which their type first appears.
#[must_use]
pub fn group_by_activity_type(activities: &[Activity]) -> Vec<Group<'_, Activity>> {
    let mut groups = group_by(activities, |a| a.activity_type.to_string());
    groups.sort_by(|a, b| b.items.len().cmp(&a.items.len()));
    groups
}

/// Key used for activities without a start date
pub const UNKNOWN_YEAR: &str = "Unknown";

/// Activities grouped by start year, keys in descending text order
///
/// `Unknown` sorts above every numeric year and therefore comes first.
#[must_use]
pub fn group_by_start_year(activities: &[Activity]) -> Vec<Group<'_, Activity>> {
    let mut groups = group_by(activities, |a| {
        a.start_date
            .map_or_else(|| UNKNOWN_YEAR.to_string(), |d| d.year().to_string())
    });
    groups.sort_by(|a, b| b.key.cmp(&a.key));
    groups
}

/// A student's approved co-curricular activities, latest start first
///
/// # Errors
/// Store failures.
pub async fn load_co_curricular(
    gateway: &Gateway,
    student_id: &str,
) -> WorkflowResult<Vec<Activity>> {
    let query = Query::new()
        .eq("student_id", student_id)
        .eq("category", Category::CoCurricular.as_str())
        .eq("status", ActivityStatus::Approved.as_str())
        .order_desc("start_date");
    Ok(gateway.fetch_collection(Table::Activities, &query).await?)
}

/// Urgency of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Do this first
    High,
    /// Worth doing
    Medium,
    /// Nice to have
    Low,
}

impl Priority {
    /// Label shown in listings
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Suggested next step for a student
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    /// Headline
    pub title: &'static str,
    /// Explanation
    pub description: &'static str,
    /// Area it strengthens
    pub category: Category,
    /// Kind of opportunity (course, competition, ...)
    pub kind: &'static str,
    /// Urgency
    pub priority: Priority,
    /// Call to action
    pub action: &'static str,
}

const fn rec(
    title: &'static str,
    description: &'static str,
    category: Category,
    kind: &'static str,
    priority: Priority,
    action: &'static str,
) -> Recommendation {
    Recommendation { title, description, category, kind, priority, action }
}

/// Rule-based suggestions from approved certificate counts
#[must_use]
pub fn recommendations(certificates: &[Certificate]) -> Vec<Recommendation> {
    let approved = |category: Category| {
        certificates
            .iter()
            .filter(|c| c.status == CertificateStatus::Approved && c.category == category)
            .count()
    };
    let academic = approved(Category::Academic);
    let co_curricular = approved(Category::CoCurricular);
    let mut out = Vec::new();

    if academic >= 3 {
        out.push(rec(
            "Advanced Data Science Certification",
            "Based on your strong academic performance, consider pursuing advanced certifications \
             in emerging fields.",
            Category::Academic,
            "certification",
            Priority::High,
            "Learn More",
        ));
        out.push(rec(
            "Research Project Opportunities",
            "Join ongoing research projects to enhance your academic portfolio and gain practical \
             experience.",
            Category::Academic,
            "course",
            Priority::Medium,
            "Apply",
        ));
    } else if academic >= 1 {
        out.push(rec(
            "Programming Fundamentals Course",
            "Strengthen your technical foundation with comprehensive programming courses.",
            Category::Academic,
            "course",
            Priority::High,
            "Enroll",
        ));
    } else {
        out.push(rec(
            "Academic Writing Workshop",
            "Start building your academic portfolio with essential writing and research skills.",
            Category::Academic,
            "course",
            Priority::High,
            "Register",
        ));
    }

    if co_curricular >= 2 {
        out.push(rec(
            "Leadership Development Program",
            "Your active participation in co-curricular activities makes you a great candidate \
             for leadership roles.",
            Category::CoCurricular,
            "event",
            Priority::High,
            "Apply",
        ));
        out.push(rec(
            "Inter-University Competition",
            "Represent your institution in prestigious competitions and showcase your talents.",
            Category::CoCurricular,
            "competition",
            Priority::Medium,
            "Participate",
        ));
    } else if co_curricular >= 1 {
        out.push(rec(
            "Community Service Initiative",
            "Expand your co-curricular involvement through meaningful community service projects.",
            Category::CoCurricular,
            "volunteering",
            Priority::Medium,
            "Join",
        ));
    } else {
        out.push(rec(
            "Student Clubs & Organizations",
            "Start your co-curricular journey by joining clubs that align with your interests.",
            Category::CoCurricular,
            "club",
            Priority::High,
            "Explore",
        ));
    }

    out.push(rec(
        "Skill Assessment Workshop",
        "Identify your strengths and areas for improvement with comprehensive skill evaluation.",
        Category::Academic,
        "course",
        Priority::Low,
        "Schedule",
    ));

    out.truncate(MAX_RECOMMENDATIONS);
    out
}
