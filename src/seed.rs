use crate::model::{Course, Priority, Role, Student, Submission, Task};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCredential {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedTask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: NaiveDate,
    pub course: String,
    #[serde(default)]
    pub priority: Priority,
    pub created_by: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedSubmission {
    pub id: String,
    pub task_id: String,
    pub student_email: String,
    pub file_name: String,
    pub submitted_at: NaiveDate,
    pub comments: Option<String>,
    pub grade: Option<u8>,
}

/// Startup data for the board. Dates are quoted `YYYY-MM-DD` strings in TOML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Seed {
    pub courses: Vec<Course>,
    pub students: Vec<Student>,
    pub credentials: Vec<SeedCredential>,
    pub tasks: Vec<SeedTask>,
    pub submissions: Vec<SeedSubmission>,
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

impl Seed {
    /// The built-in demo classroom.
    pub fn sample() -> Self {
        let teacher = "profesor@ejemplo.com";
        let student = "estudiante@ejemplo.com";
        Seed {
            courses: vec![
                Course {
                    id: "6-1".into(),
                    name: "6°1".into(),
                },
                Course {
                    id: "6-2".into(),
                    name: "6°2".into(),
                },
                Course {
                    id: "7-1".into(),
                    name: "7°1".into(),
                },
            ],
            students: vec![
                Student {
                    email: student.into(),
                    name: "Juan Pérez".into(),
                    course: "6°1".into(),
                },
                Student {
                    email: "maria@ejemplo.com".into(),
                    name: "María García".into(),
                    course: "6°1".into(),
                },
            ],
            credentials: vec![
                SeedCredential {
                    email: teacher.into(),
                    password: "123456".into(),
                    role: Role::Teacher,
                    name: "Profesor Ejemplo".into(),
                },
                SeedCredential {
                    email: student.into(),
                    password: "123456".into(),
                    role: Role::Student,
                    name: "Juan Pérez".into(),
                },
            ],
            tasks: vec![
                SeedTask {
                    id: "task-1".into(),
                    title: "Ensayo sobre el cuerpo humano".into(),
                    description: "Elabora un ensayo detallado sobre los sistemas del cuerpo humano"
                        .into(),
                    due_date: ymd(2024, 1, 15),
                    course: "Biología".into(),
                    priority: Priority::High,
                    created_by: teacher.into(),
                },
                SeedTask {
                    id: "task-2".into(),
                    title: "Análisis de datos estadísticos".into(),
                    description: "Realizar un análisis completo de los datos proporcionados".into(),
                    due_date: ymd(2024, 1, 20),
                    course: "Matemáticas".into(),
                    priority: Priority::Medium,
                    created_by: teacher.into(),
                },
            ],
            submissions: vec![SeedSubmission {
                id: "submission-1".into(),
                task_id: "task-1".into(),
                student_email: student.into(),
                file_name: "ensayo_biologia.pdf".into(),
                submitted_at: ymd(2024, 1, 10),
                comments: Some("Excelente trabajo, muy detallado.".into()),
                grade: Some(95),
            }],
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read seed file '{}'", path.display()))?;
        let seed: Seed = toml::from_str(&raw)
            .with_context(|| format!("failed to parse seed file '{}'", path.display()))?;
        seed.validate()
            .with_context(|| format!("invalid seed file '{}'", path.display()))?;
        Ok(seed)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let mut task_ids = HashSet::new();
        for t in &self.tasks {
            if t.title.trim().is_empty() {
                bail!("task {} has an empty title", t.id);
            }
            if !task_ids.insert(t.id.as_str()) {
                bail!("duplicate task id {}", t.id);
            }
        }

        let mut submission_ids = HashSet::new();
        let mut pairs = HashSet::new();
        for s in &self.submissions {
            if !submission_ids.insert(s.id.as_str()) {
                bail!("duplicate submission id {}", s.id);
            }
            if !task_ids.contains(s.task_id.as_str()) {
                bail!("submission {} references unknown task {}", s.id, s.task_id);
            }
            if !pairs.insert((s.task_id.as_str(), s.student_email.as_str())) {
                bail!(
                    "more than one submission for task {} by {}",
                    s.task_id,
                    s.student_email
                );
            }
            if let Some(g) = s.grade {
                if g > 100 {
                    bail!("submission {} has grade {} (max 100)", s.id, g);
                }
            }
        }

        let mut emails = HashSet::new();
        for c in &self.credentials {
            if !emails.insert(c.email.as_str()) {
                bail!("duplicate credential for {}", c.email);
            }
        }
        Ok(())
    }
}

impl From<SeedTask> for Task {
    fn from(t: SeedTask) -> Self {
        Task {
            id: t.id,
            title: t.title,
            description: t.description,
            due_date: t.due_date,
            course: t.course,
            priority: t.priority,
            created_by: t.created_by,
        }
    }
}

impl From<SeedSubmission> for Submission {
    fn from(s: SeedSubmission) -> Self {
        Submission {
            id: s.id,
            task_id: s.task_id,
            student_email: s.student_email,
            file_name: s.file_name,
            submitted_at: s.submitted_at,
            comments: s.comments,
            grade: s.grade,
        }
    }
}
