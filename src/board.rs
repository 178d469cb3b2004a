use crate::clock::start_of_day;
use crate::model::{Role, SessionUser, StatusFilter, Student, Submission, Task, TaskStatus};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub search: String,
    pub status: StatusFilter,
}

pub fn find_submission<'a>(
    submissions: &'a [Submission],
    task_id: &str,
    student_email: &str,
) -> Option<&'a Submission> {
    submissions
        .iter()
        .find(|s| s.task_id == task_id && s.student_email == student_email)
}

/// Completion wins over overdue: a late task with a submission is `completed`.
pub fn classify_status(
    task: &Task,
    submissions: &[Submission],
    user_email: &str,
    now: DateTime<Utc>,
) -> TaskStatus {
    if find_submission(submissions, &task.id, user_email).is_some() {
        return TaskStatus::Completed;
    }
    if start_of_day(task.due_date) < now {
        return TaskStatus::Overdue;
    }
    TaskStatus::Pending
}

fn contains_folded(haystack: &str, needle_folded: &str) -> bool {
    haystack.to_lowercase().contains(needle_folded)
}

fn task_matches(task: &Task, needle_folded: &str) -> bool {
    contains_folded(&task.title, needle_folded) || contains_folded(&task.description, needle_folded)
}

/// One pass over `tasks`, input order kept. Teachers never get a status filter.
pub fn filter_tasks<'a>(
    tasks: &'a [Task],
    submissions: &[Submission],
    user: &SessionUser,
    query: &TaskQuery,
    now: DateTime<Utc>,
) -> Vec<&'a Task> {
    let needle = query.search.to_lowercase();
    tasks
        .iter()
        .filter(|task| {
            if !task_matches(task, &needle) {
                return false;
            }
            match user.role {
                Role::Teacher => true,
                Role::Student => query
                    .status
                    .admits(classify_status(task, submissions, &user.email, now)),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub completed: usize,
    pub overdue: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.pending + self.completed + self.overdue
    }
}

pub fn count_statuses(
    tasks: &[Task],
    submissions: &[Submission],
    user_email: &str,
    now: DateTime<Utc>,
) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for task in tasks {
        match classify_status(task, submissions, user_email, now) {
            TaskStatus::Pending => counts.pending += 1,
            TaskStatus::Completed => counts.completed += 1,
            TaskStatus::Overdue => counts.overdue += 1,
        }
    }
    counts
}

pub fn submission_count(submissions: &[Submission], task_id: &str) -> usize {
    submissions.iter().filter(|s| s.task_id == task_id).count()
}

pub fn search_students<'a>(students: &'a [Student], term: &str) -> Vec<&'a Student> {
    let needle = term.to_lowercase();
    students
        .iter()
        .filter(|s| contains_folded(&s.name, &needle))
        .collect()
}
