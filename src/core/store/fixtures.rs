//! Demo data set for the in-memory store
//!
//! Three students, a junior and a senior reviewer, and enough certificates,
//! activities and notifications to exercise every dashboard offline.

use super::Table;
use serde_json::{json, Value};

/// Junior reviewer assigned to Alice and Bob
pub const JUNIOR_FACULTY_ID: &str = "fac-1";
/// Senior reviewer assigned to Carol
pub const SENIOR_FACULTY_ID: &str = "fac-2";
/// Institution administrator
pub const ADMIN_ID: &str = "admin-1";
/// Student with the richest record set
pub const DEMO_STUDENT_ID: &str = "stu-1";

/// Every seeded table with its rows
#[must_use]
pub fn seed() -> Vec<(Table, Vec<Value>)> {
    vec![
        (Table::Profiles, profiles()),
        (Table::Certificates, certificates()),
        (Table::Activities, activities()),
        (Table::Notifications, notifications()),
        (Table::AcademicRecords, academic_records()),
        (Table::InstitutionalReports, institutional_reports()),
    ]
}

fn profiles() -> Vec<Value> {
    vec![
        json!({
            "id": JUNIOR_FACULTY_ID, "user_id": "user-fac-1", "full_name": "Dr. John Smith",
            "email": "j.smith@example.edu", "role": "faculty", "faculty_level": "junior",
            "student_id": null, "assigned_faculty_id": null,
            "created_at": "2023-06-01T09:00:00Z"
        }),
        json!({
            "id": SENIOR_FACULTY_ID, "user_id": "user-fac-2", "full_name": "Dr. Grace Hopper",
            "email": "g.hopper@example.edu", "role": "faculty", "faculty_level": "senior",
            "student_id": null, "assigned_faculty_id": null,
            "created_at": "2023-06-01T09:00:00Z"
        }),
        json!({
            "id": ADMIN_ID, "user_id": "user-admin-1", "full_name": "Registrar Office",
            "email": "registrar@example.edu", "role": "admin", "faculty_level": "admin",
            "student_id": null, "assigned_faculty_id": null,
            "created_at": "2023-06-01T09:00:00Z"
        }),
        json!({
            "id": DEMO_STUDENT_ID, "user_id": "user-stu-1", "full_name": "Alice Johnson",
            "email": "alice@example.edu", "role": "student", "faculty_level": null,
            "student_id": "2021-CSE-034", "assigned_faculty_id": JUNIOR_FACULTY_ID,
            "created_at": "2023-07-01T09:00:00Z"
        }),
        json!({
            "id": "stu-2", "user_id": "user-stu-2", "full_name": "Bob Smith",
            "email": "bob@example.edu", "role": "student", "faculty_level": null,
            "student_id": "2020-EEE-112", "assigned_faculty_id": JUNIOR_FACULTY_ID,
            "created_at": "2023-07-01T09:00:00Z"
        }),
        json!({
            "id": "stu-3", "user_id": "user-stu-3", "full_name": "Carol Danvers",
            "email": "carol@example.edu", "role": "student", "faculty_level": null,
            "student_id": "2019-MECH-076", "assigned_faculty_id": SENIOR_FACULTY_ID,
            "created_at": "2023-07-01T09:00:00Z"
        }),
    ]
}

#[allow(clippy::too_many_arguments)]
fn certificate(
    id: &str,
    student: &str,
    title: &str,
    description: &str,
    category: &str,
    status: &str,
    file_name: &str,
    uploaded_at: &str,
    decision: Option<(&str, &str)>,
) -> Value {
    let (verified_by, verified_at, remark, rejection_reason) = match decision {
        Some((reviewer, remark)) => (
            json!(reviewer),
            json!(uploaded_at),
            json!(remark),
            if status == "rejected" { json!(remark) } else { Value::Null },
        ),
        None => (Value::Null, Value::Null, Value::Null, Value::Null),
    };
    json!({
        "id": id,
        "student_id": student,
        "title": title,
        "description": description,
        "category": category,
        "status": status,
        "file_url": format!("https://example.com/{file_name}"),
        "file_name": file_name,
        "uploaded_at": uploaded_at,
        "verified_by": verified_by,
        "verified_at": verified_at,
        "remark": remark,
        "rejection_reason": rejection_reason,
    })
}

fn certificates() -> Vec<Value> {
    vec![
        certificate(
            "cert-1", DEMO_STUDENT_ID, "Python Programming Certificate",
            "Completed advanced Python programming course", "academic", "approved",
            "python_cert.pdf", "2023-11-12T10:00:00Z",
            Some((JUNIOR_FACULTY_ID, "Verified with issuer")),
        ),
        certificate(
            "cert-2", DEMO_STUDENT_ID, "Leadership Workshop",
            "Participated in leadership development workshop", "co_curricular", "pending",
            "leadership_cert.pdf", "2024-04-02T10:00:00Z", None,
        ),
        certificate(
            "m1", DEMO_STUDENT_ID, "Hackathon Winner", "First place", "co_curricular", "approved",
            "hack.pdf", "2024-01-05T10:00:00Z", Some((JUNIOR_FACULTY_ID, "Great work")),
        ),
        certificate(
            "m2", DEMO_STUDENT_ID, "Science Fair", "Participation", "co_curricular", "rejected",
            "sci.pdf", "2024-01-20T10:00:00Z", Some((JUNIOR_FACULTY_ID, "Illegible scan")),
        ),
        certificate(
            "m3", DEMO_STUDENT_ID, "B.Tech Degree", "Degree", "academic", "approved",
            "deg.pdf", "2024-03-01T10:00:00Z", Some((SENIOR_FACULTY_ID, "Verified by registrar")),
        ),
        certificate(
            "m4", DEMO_STUDENT_ID, "Workshop", "ML workshop", "academic", "pending",
            "ws.pdf", "2024-04-10T10:00:00Z", None,
        ),
        certificate(
            "mock-1", DEMO_STUDENT_ID, "National Science Fair", "Participation certificate",
            "co_curricular", "pending", "cert1.pdf", "2024-04-12T10:00:00Z", None,
        ),
        certificate(
            "mock-2", "stu-2", "B.Tech Degree", "Verified by registrar", "academic", "approved",
            "cert2.pdf", "2024-04-11T10:00:00Z", Some((JUNIOR_FACULTY_ID, "Excellent achievement")),
        ),
        certificate(
            "mock-3", "stu-3", "Hackathon Winner", "First place", "co_curricular", "rejected",
            "cert3.pdf", "2024-04-10T09:00:00Z", Some((SENIOR_FACULTY_ID, "Illegible scan")),
        ),
        certificate(
            "mock-4", "stu-3", "Robotics Olympiad", "Regional finalist", "co_curricular", "pending",
            "robotics.pdf", "2024-04-13T09:00:00Z", None,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn activity(
    id: &str,
    student: &str,
    title: &str,
    description: &str,
    activity_type: &str,
    status: &str,
    dates: (&str, &str),
    place: (&str, &str),
    credits: Option<u32>,
) -> Value {
    json!({
        "id": id,
        "student_id": student,
        "title": title,
        "description": description,
        "activity_type": activity_type,
        "category": "co_curricular",
        "status": status,
        "start_date": dates.0,
        "end_date": dates.1,
        "organization": place.0,
        "location": place.1,
        "credits_earned": credits,
        "created_at": format!("{}T12:00:00Z", dates.1),
    })
}

fn activities() -> Vec<Value> {
    vec![
        activity(
            "act-1", DEMO_STUDENT_ID, "Student Council President",
            "Led student council initiatives and represented student body",
            "leadership", "approved",
            ("2023-09-01", "2024-05-31"), ("University Student Council", "Campus"), Some(3),
        ),
        activity(
            "act-2", DEMO_STUDENT_ID, "Annual Tech Fest Volunteer",
            "Organized and managed technical events during the annual fest",
            "volunteering", "approved",
            ("2024-03-15", "2024-03-17"), ("Tech Fest Committee", "Main Auditorium"), Some(2),
        ),
        activity(
            "act-3", DEMO_STUDENT_ID, "Inter-University Basketball Championship",
            "Represented university in basketball tournament", "sports", "approved",
            ("2024-02-10", "2024-02-12"),
            ("University Sports Committee", "Sports Complex"),
            Some(2),
        ),
        activity(
            "act-4", DEMO_STUDENT_ID, "Cultural Dance Performance",
            "Performed traditional dance at cultural evening", "cultural", "approved",
            ("2024-01-20", "2024-01-20"), ("Cultural Committee", "Main Hall"), Some(1),
        ),
        activity(
            "act-5", "stu-2", "Coding Marathon", "24-hour inter-college coding contest",
            "competition", "submitted",
            ("2024-03-02", "2024-03-03"), ("ACM Chapter", "Lab Block"), None,
        ),
        activity(
            "act-6", "stu-3", "Blood Donation Drive", "Coordinated campus donation camp",
            "volunteering", "approved",
            ("2023-10-05", "2023-10-05"), ("NSS Unit", "Medical Centre"), Some(2),
        ),
    ]
}

fn notifications() -> Vec<Value> {
    vec![
        json!({
            "id": "notif-1", "user_id": DEMO_STUDENT_ID, "title": "Certificate Approved",
            "message": "Your Python Programming Certificate has been approved!",
            "type": "certificate_approved", "read_at": null,
            "created_at": "2024-04-14T09:00:00Z"
        }),
        json!({
            "id": "notif-2", "user_id": DEMO_STUDENT_ID, "title": "Activity Submitted",
            "message": "Your Leadership Workshop activity is under review.",
            "type": "activity_submitted", "read_at": null,
            "created_at": "2024-04-14T08:00:00Z"
        }),
        json!({
            "id": "notif-3", "user_id": DEMO_STUDENT_ID, "title": "New Message",
            "message": "You have a new message from Dr. Smith.",
            "type": "message", "read_at": "2024-04-14T07:00:00Z",
            "created_at": "2024-04-14T07:00:00Z"
        }),
        json!({
            "id": "notif-4", "user_id": JUNIOR_FACULTY_ID, "title": "New Submission",
            "message": "Alice Johnson uploaded National Science Fair.",
            "type": "certificate_submitted", "read_at": null,
            "created_at": "2024-04-12T10:00:00Z"
        }),
    ]
}

#[allow(clippy::too_many_arguments)]
fn academic_record(
    id: &str,
    semester: &str,
    code: &str,
    name: &str,
    credits: f64,
    grade: &str,
    points: f64,
    cgpa: f64,
    year: &str,
    created_at: &str,
) -> Value {
    json!({
        "id": id,
        "student_id": DEMO_STUDENT_ID,
        "semester": semester,
        "subject_code": code,
        "subject_name": name,
        "credits": credits,
        "grade": grade,
        "grade_points": points,
        "cgpa": cgpa,
        "academic_year": year,
        "created_at": created_at,
    })
}

fn academic_records() -> Vec<Value> {
    vec![
        academic_record(
            "rec-1", "Fall 2023", "CS101", "Introduction to Computer Science", 3.0, "A", 4.0, 3.8,
            "2023-24", "2024-01-10T09:00:00Z",
        ),
        academic_record(
            "rec-2", "Fall 2023", "MATH201", "Calculus II", 4.0, "B+", 3.3, 3.8,
            "2023-24", "2024-01-09T09:00:00Z",
        ),
        academic_record(
            "rec-3", "Spring 2023", "ENG101", "English Composition", 3.0, "A-", 3.7, 3.7,
            "2022-23", "2023-06-01T09:00:00Z",
        ),
    ]
}

fn institutional_reports() -> Vec<Value> {
    vec![json!({
        "id": "rep-1",
        "title": "NAAC Self Study 2023",
        "description": "Criterion 5 student support and progression",
        "report_type": "naac",
        "generated_by": SENIOR_FACULTY_ID,
        "parameters": {"academic_year": "2023-24"},
        "file_url": "https://example.com/reports/naac-2023.pdf",
        "status": "completed",
        "created_at": "2024-02-01T09:00:00Z",
        "completed_at": "2024-02-01T09:05:00Z",
    })]
}
