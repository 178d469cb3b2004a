use crate::auth::CredentialTable;
use crate::board::{self, StatusCounts, TaskQuery};
use crate::clock::{parse_date, Clock};
use crate::error::{BoardError, BoardResult};
use crate::model::{Course, Priority, Role, SessionUser, Student, Submission, Task, TaskStatus};
use crate::seed::Seed;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

/// Extensions the upload picker offers.
pub const ACCEPTED_EXTENSIONS: [&str; 4] = [".pdf", ".doc", ".docx", ".txt"];

pub const MAX_GRADE: u8 = 100;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub due_date: String,
    pub course: String,
    #[serde(default)]
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkDraft {
    pub task_id: String,
    pub file_name: String,
    #[serde(default)]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow {
    #[serde(flatten)]
    pub task: Task,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_count: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetail {
    #[serde(flatten)]
    pub row: TaskRow,
    pub submission: Option<Submission>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRow {
    #[serde(flatten)]
    pub submission: Submission,
    pub task_title: Option<String>,
    pub student_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitOutcome {
    pub submission: Submission,
    pub replaced: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Summary {
    #[serde(rename_all = "camelCase")]
    Teacher {
        tasks: usize,
        submissions: usize,
        students: usize,
        courses: usize,
    },
    #[serde(rename_all = "camelCase")]
    Student {
        total: usize,
        pending: usize,
        completed: usize,
        overdue: usize,
    },
}

fn non_blank(value: &str, field: &str) -> BoardResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BoardError::bad_params(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn has_accepted_extension(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    ACCEPTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Blank means cleared; anything else is kept exactly as typed.
fn normalize_comment(comment: Option<String>) -> Option<String> {
    comment.filter(|c| !c.trim().is_empty())
}

/// The whole application state. Handlers mutate it only through the named
/// commands below; status is derived on every read.
pub struct Board {
    tasks: Vec<Task>,
    submissions: Vec<Submission>,
    students: Vec<Student>,
    courses: Vec<Course>,
    credentials: CredentialTable,
    session: Option<SessionUser>,
    clock: Box<dyn Clock>,
}

impl Board {
    pub fn from_seed(seed: Seed, clock: Box<dyn Clock>) -> Self {
        let mut credentials = CredentialTable::default();
        for c in &seed.credentials {
            credentials.insert(&c.email, &c.password, c.role, &c.name);
        }
        Board {
            tasks: seed.tasks.into_iter().map(Task::from).collect(),
            submissions: seed.submissions.into_iter().map(Submission::from).collect(),
            students: seed.students,
            courses: seed.courses,
            credentials,
            session: None,
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn session(&self) -> Option<&SessionUser> {
        self.session.as_ref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn credential_count(&self) -> usize {
        self.credentials.len()
    }

    fn require_session(&self) -> BoardResult<&SessionUser> {
        self.session.as_ref().ok_or(BoardError::NoSession)
    }

    fn require_role(&self, role: Role, action: &'static str) -> BoardResult<&SessionUser> {
        let user = self.require_session()?;
        if user.role != role {
            return Err(BoardError::Forbidden {
                role: user.role,
                action,
            });
        }
        Ok(user)
    }

    // --- session ---

    pub fn login(&mut self, email: &str, password: &str) -> BoardResult<SessionUser> {
        match self.credentials.verify(email, password) {
            Ok(user) => {
                info!(email = %user.email, role = %user.role, "login");
                self.session = Some(user.clone());
                Ok(user)
            }
            Err(e) => {
                warn!(email, "login rejected");
                Err(e)
            }
        }
    }

    /// Accepts any input and starts a session right away. Only a non-blank
    /// email is remembered for later logins.
    pub fn register(&mut self, email: &str, password: &str, name: &str, role: Role) -> SessionUser {
        let added = !email.trim().is_empty()
            && self.credentials.insert_if_absent(email, password, role, name);
        let user = SessionUser {
            email: email.to_string(),
            role,
            name: name.to_string(),
        };
        info!(email, role = %role, new_credential = added, "register");
        self.session = Some(user.clone());
        user
    }

    pub fn logout(&mut self) -> bool {
        let had = self.session.take();
        if let Some(user) = &had {
            info!(email = %user.email, "logout");
        }
        had.is_some()
    }

    // --- reads ---

    fn row_for(&self, task: &Task, user: &SessionUser, now: DateTime<Utc>) -> TaskRow {
        match user.role {
            Role::Student => TaskRow {
                task: task.clone(),
                status: Some(board::classify_status(
                    task,
                    &self.submissions,
                    &user.email,
                    now,
                )),
                submission_count: None,
            },
            Role::Teacher => TaskRow {
                task: task.clone(),
                status: None,
                submission_count: Some(board::submission_count(&self.submissions, &task.id)),
            },
        }
    }

    pub fn list_tasks(&self, query: &TaskQuery, now: DateTime<Utc>) -> BoardResult<Vec<TaskRow>> {
        let user = self.require_session()?;
        Ok(
            board::filter_tasks(&self.tasks, &self.submissions, user, query, now)
                .into_iter()
                .map(|task| self.row_for(task, user, now))
                .collect(),
        )
    }

    pub fn task_detail(&self, task_id: &str, now: DateTime<Utc>) -> BoardResult<TaskDetail> {
        let user = self.require_session()?;
        let task = self
            .tasks
            .iter()
            .find(|t| t.id == task_id)
            .ok_or_else(|| BoardError::NotFound {
                kind: "task",
                id: task_id.to_string(),
            })?;
        let submission = match user.role {
            Role::Student => board::find_submission(&self.submissions, task_id, &user.email).cloned(),
            Role::Teacher => None,
        };
        Ok(TaskDetail {
            row: self.row_for(task, user, now),
            submission,
        })
    }

    /// Students only, like the `status` column of task rows.
    pub fn status_of(&self, task_id: &str, now: DateTime<Utc>) -> BoardResult<TaskStatus> {
        let user = self.require_role(Role::Student, "check task status")?;
        let task = self
            .tasks
            .iter()
            .find(|t| t.id == task_id)
            .ok_or_else(|| BoardError::NotFound {
                kind: "task",
                id: task_id.to_string(),
            })?;
        Ok(board::classify_status(task, &self.submissions, &user.email, now))
    }

    /// Teachers see every submission; students only their own.
    pub fn list_submissions(&self, task_id: Option<&str>) -> BoardResult<Vec<SubmissionRow>> {
        let user = self.require_session()?;
        Ok(self
            .submissions
            .iter()
            .filter(|s| user.role == Role::Teacher || s.student_email == user.email)
            .filter(|s| task_id.map(|id| s.task_id == id).unwrap_or(true))
            .map(|s| SubmissionRow {
                submission: s.clone(),
                task_title: self
                    .tasks
                    .iter()
                    .find(|t| t.id == s.task_id)
                    .map(|t| t.title.clone()),
                student_name: self
                    .students
                    .iter()
                    .find(|st| st.email == s.student_email)
                    .map(|st| st.name.clone()),
            })
            .collect())
    }

    pub fn roster(&self, term: &str) -> BoardResult<Vec<&Student>> {
        self.require_role(Role::Teacher, "browse the student roster")?;
        Ok(board::search_students(&self.students, term))
    }

    pub fn summary(&self, now: DateTime<Utc>) -> BoardResult<Summary> {
        let user = self.require_session()?;
        Ok(match user.role {
            Role::Teacher => Summary::Teacher {
                tasks: self.tasks.len(),
                submissions: self.submissions.len(),
                students: self.students.len(),
                courses: self.courses.len(),
            },
            Role::Student => {
                let counts: StatusCounts =
                    board::count_statuses(&self.tasks, &self.submissions, &user.email, now);
                Summary::Student {
                    total: counts.total(),
                    pending: counts.pending,
                    completed: counts.completed,
                    overdue: counts.overdue,
                }
            }
        })
    }

    // --- commands ---

    pub fn create_task(&mut self, draft: TaskDraft) -> BoardResult<Task> {
        let creator = self.require_role(Role::Teacher, "create tasks")?.email.clone();
        let title = non_blank(&draft.title, "title")?;
        let course = non_blank(&draft.course, "course")?;
        let due_date = parse_date(&draft.due_date).ok_or_else(|| {
            BoardError::bad_params(format!(
                "dueDate must be YYYY-MM-DD, got '{}'",
                draft.due_date
            ))
        })?;
        let priority = match draft.priority.as_deref() {
            None => Priority::default(),
            Some(raw) => Priority::parse(raw).ok_or_else(|| {
                BoardError::bad_params(format!("priority must be low|medium|high, got '{raw}'"))
            })?,
        };

        let task = Task {
            id: Uuid::new_v4().to_string(),
            title,
            description: draft
                .description
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            due_date,
            course,
            priority,
            created_by: creator,
        };
        info!(task_id = %task.id, course = %task.course, due = %task.due_date, "task created");
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// An existing submission for the same (task, student) pair is replaced.
    pub fn submit_work(&mut self, draft: WorkDraft) -> BoardResult<SubmitOutcome> {
        let student = self.require_role(Role::Student, "submit work")?.email.clone();
        if !self.tasks.iter().any(|t| t.id == draft.task_id) {
            return Err(BoardError::NotFound {
                kind: "task",
                id: draft.task_id,
            });
        }
        let file_name = non_blank(&draft.file_name, "fileName")?;
        if !has_accepted_extension(&file_name) {
            return Err(BoardError::bad_params(format!(
                "fileName must end in one of {}",
                ACCEPTED_EXTENSIONS.join(", ")
            )));
        }

        let before = self.submissions.len();
        self.submissions
            .retain(|s| !(s.task_id == draft.task_id && s.student_email == student));
        let replaced = self.submissions.len() != before;

        let submission = Submission {
            id: Uuid::new_v4().to_string(),
            task_id: draft.task_id,
            student_email: student,
            file_name,
            submitted_at: self.clock.today(),
            comments: normalize_comment(draft.comments),
            grade: None,
        };
        info!(
            submission_id = %submission.id,
            task_id = %submission.task_id,
            replaced,
            "work submitted"
        );
        self.submissions.push(submission.clone());
        Ok(SubmitOutcome {
            submission,
            replaced,
        })
    }

    /// Unknown ids are not an error; the collection is left untouched.
    pub fn delete_submission(&mut self, submission_id: &str) -> BoardResult<bool> {
        self.require_session()?;
        let before = self.submissions.len();
        self.submissions.retain(|s| s.id != submission_id);
        let deleted = self.submissions.len() != before;
        info!(submission_id, deleted, "submission delete");
        Ok(deleted)
    }

    pub fn set_comment(&mut self, submission_id: &str, comment: Option<String>) -> BoardResult<bool> {
        self.require_role(Role::Teacher, "comment on submissions")?;
        let Some(sub) = self.submissions.iter_mut().find(|s| s.id == submission_id) else {
            return Ok(false);
        };
        sub.comments = normalize_comment(comment);
        info!(submission_id, "comment set");
        Ok(true)
    }

    pub fn set_grade(&mut self, submission_id: &str, grade: Option<u8>) -> BoardResult<bool> {
        self.require_role(Role::Teacher, "grade submissions")?;
        if let Some(g) = grade {
            if g > MAX_GRADE {
                return Err(BoardError::bad_params(format!(
                    "grade must be between 0 and {MAX_GRADE}, got {g}"
                )));
            }
        }
        let Some(sub) = self.submissions.iter_mut().find(|s| s.id == submission_id) else {
            return Ok(false);
        };
        sub.grade = grade;
        info!(submission_id, ?grade, "grade set");
        Ok(true)
    }
}
