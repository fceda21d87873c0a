//! Demo data set loaded into an empty store at start-up.

use crate::{InMemStore, Inner};
use chrono::Utc;
use sched_core::credentials::hash_password;
use tracing::{info, warn};
use types::{
    Classroom, ClassroomId, Constraint, ConstraintId, ConstraintKind, Course, CourseId, Day,
    Notification, NotificationId, Preference, PreferenceId, PreferenceKind, Role, Severity,
    Subject, SubjectId, Teacher, TeacherId, TimeSlot, User, UserId,
};

const USERS: &[(&str, &str, Role, &str)] = &[
    ("admin", "admin", Role::Admin, "Amministratore"),
    ("rossi", "docente", Role::Docente, "Mario Rossi"),
    ("bianchi", "docente", Role::Docente, "Laura Bianchi"),
    ("verdi", "docente", Role::Docente, "Giuseppe Verdi"),
    ("neri", "docente", Role::Docente, "Anna Neri"),
    ("gialli", "docente", Role::Docente, "Francesco Gialli"),
    ("marroni", "docente", Role::Docente, "Elisa Marroni"),
];

const TEACHERS: &[(&str, &str, &[&str], u32)] = &[
    (
        "Mario Rossi",
        "rossi@uniparthenope.it",
        &[
            "Analisi Matematica I",
            "Algebra Lineare",
            "Fisica",
            "Matematica Generale",
            "Analisi Matematica Gestionale",
        ],
        18,
    ),
    (
        "Laura Bianchi",
        "bianchi@uniparthenope.it",
        &[
            "Programmazione I",
            "Algoritmi E Strutture Dati",
            "Sistemi Informativi Aziendali",
            "Basi Di Dati",
        ],
        18,
    ),
    (
        "Giuseppe Verdi",
        "verdi@uniparthenope.it",
        &[
            "Basi Di Dati",
            "Lingua Inglese",
            "Economia Aziendale",
            "Gestione Aziendale",
            "Matematica Generale",
        ],
        16,
    ),
    (
        "Anna Neri",
        "neri@uniparthenope.it",
        &["Economia Aziendale", "Matematica Generale", "Statistica"],
        16,
    ),
    (
        "Francesco Gialli",
        "gialli@uniparthenope.it",
        &["Diritto Pubblico", "Diritto Privato"],
        14,
    ),
    (
        "Elisa Marroni",
        "marroni@uniparthenope.it",
        &[
            "Gestione Aziendale",
            "Sistemi Informativi Aziendali",
            "Organizzazione Aziendale",
        ],
        15,
    ),
];

const COURSES: &[(&str, u32, u32)] = &[
    ("Informatica", 1, 85),
    ("Informatica", 2, 72),
    ("Ingegneria Informatica", 1, 95),
    ("Economia Aziendale", 1, 120),
    ("Ingegneria Gestionale", 1, 110),
];

// name, code, is_lab, weekly_hours, course_ref
const SUBJECTS: &[(&str, &str, bool, u32, &str)] = &[
    ("Analisi Matematica I", "MAT01", false, 4, "Informatica - 1"),
    ("Programmazione I", "INF01", true, 4, "Informatica - 1"),
    ("Algoritmi E Strutture Dati", "INF02", true, 4, "Informatica - 2"),
    ("Basi Di Dati", "INF03", true, 2, "Informatica - 2"),
    ("Lingua Inglese", "ENG", false, 2, "Informatica - 1"),
    ("Algebra Lineare", "MAT02", false, 2, "Informatica - 1"),
    ("Fisica", "PHY", true, 4, "Ingegneria Informatica - 1"),
    ("Matematica Generale", "ECO01", false, 4, "Economia Aziendale - 1"),
    ("Economia Aziendale", "ECO02", false, 6, "Economia Aziendale - 1"),
    ("Sistemi Informativi Aziendali", "ECO03", true, 4, "Economia Aziendale - 1"),
    ("Diritto Pubblico", "ECO04", false, 4, "Economia Aziendale - 1"),
    ("Statistica", "ECO05", false, 6, "Economia Aziendale - 1"),
    ("Gestione Aziendale", "ING01", false, 4, "Ingegneria Gestionale - 1"),
    ("Analisi Matematica Gestionale", "ING02", false, 6, "Ingegneria Gestionale - 1"),
    ("Organizzazione Aziendale", "ING03", false, 2, "Ingegneria Gestionale - 1"),
];

// name, floor, capacity, has_projector, has_pc
const CLASSROOMS: &[(&str, i32, u32, bool, bool)] = &[
    ("A1", 1, 30, true, false),
    ("A2", 2, 30, true, false),
    ("Lab Informatica 1", 2, 90, true, true),
    ("Lab Informatica 2", 3, 90, true, true),
    ("Aula Magna", 3, 150, true, false),
    ("B4", 3, 100, true, false),
];

const CONSTRAINTS: &[(&str, &str, &str)] = &[
    (
        "Nessuna sovrapposizione Docente",
        "Impedisce a un docente di avere due lezioni contemporanee.",
        "no_overlap_teacher",
    ),
    (
        "Nessuna sovrapposizione Aula",
        "Impedisce a un aula di ospitare due lezioni contemporanee.",
        "no_overlap_classroom",
    ),
];

const PREFERENCES: &[(&str, Day, TimeSlot, PreferenceKind)] = &[
    ("Mario Rossi", Day::Tuesday, TimeSlot::Fourteen, PreferenceKind::Unavailable),
    ("Mario Rossi", Day::Wednesday, TimeSlot::Nine, PreferenceKind::Preferred),
    ("Laura Bianchi", Day::Friday, TimeSlot::Fourteen, PreferenceKind::Unavailable),
    ("Laura Bianchi", Day::Monday, TimeSlot::Sixteen, PreferenceKind::Avoid),
    ("Giuseppe Verdi", Day::Tuesday, TimeSlot::Eleven, PreferenceKind::Preferred),
    ("Anna Neri", Day::Thursday, TimeSlot::Sixteen, PreferenceKind::Preferred),
    ("Francesco Gialli", Day::Monday, TimeSlot::Nine, PreferenceKind::Unavailable),
    ("Elisa Marroni", Day::Wednesday, TimeSlot::Fourteen, PreferenceKind::Avoid),
];

const WELCOME: &[(&str, &str, Severity, bool)] = &[
    (
        "Benvenuto nel Sistema",
        "Il sistema di notifica personale è attivo e funzionante. Le modifiche all'orario verranno notificate qui.",
        Severity::Info,
        false,
    ),
    (
        "Configurazione Iniziale",
        "I vincoli Rigidi e Flessibili e i dati di Docenti/Corsi sono stati caricati.",
        Severity::Warning,
        false,
    ),
    (
        "Test Creazione Orario",
        "Crea la tua prima lezione per innescare le notifiche per Docenti e Studenti.",
        Severity::Success,
        true,
    ),
];

/// Records added per collection by [`InMemStore::seed_demo`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub notifications: usize,
    pub teachers: usize,
    pub courses: usize,
    pub subjects: usize,
    pub classrooms: usize,
    pub constraints: usize,
    pub preferences: usize,
}

impl InMemStore {
    pub fn with_demo_data() -> Self {
        let store = Self::new();
        store.seed_demo();
        store
    }

    /// Fills every empty collection with the demo data set. Collections
    /// that already hold records are left untouched.
    pub fn seed_demo(&self) -> SeedSummary {
        let mut g = self.inner.write();
        let mut summary = SeedSummary::default();

        if g.users.is_empty() {
            g.users = USERS
                .iter()
                .filter_map(|&(username, password, role, name)| {
                    let password_hash = hash_password(password)
                        .map_err(|e| warn!(%username, error = %e, "demo user skipped"))
                        .ok()?;
                    Some(User {
                        id: UserId::generate(),
                        username: username.into(),
                        password_hash,
                        role,
                        name: name.into(),
                    })
                })
                .collect();
            summary.users = g.users.len();
        }

        if g.notifications.is_empty() {
            summary.notifications = seed_welcome(&mut g);
        }

        if g.teachers.is_empty() {
            g.teachers = TEACHERS
                .iter()
                .map(|&(name, email, subjects, max)| Teacher {
                    id: TeacherId::generate(),
                    name: name.into(),
                    email: email.into(),
                    subjects: subjects.iter().map(|s| s.to_string()).collect(),
                    max_weekly_hours: max,
                })
                .collect();
            summary.teachers = g.teachers.len();
        }

        if g.courses.is_empty() {
            g.courses = COURSES
                .iter()
                .map(|&(name, year, students_count)| Course {
                    id: CourseId::generate(),
                    name: name.into(),
                    year,
                    students_count,
                })
                .collect();
            summary.courses = g.courses.len();
        }

        if g.subjects.is_empty() {
            g.subjects = SUBJECTS
                .iter()
                .map(|&(name, code, is_lab, weekly_hours, course_ref)| Subject {
                    id: SubjectId::generate(),
                    name: name.into(),
                    code: code.into(),
                    is_lab,
                    weekly_hours,
                    course_ref: course_ref.into(),
                })
                .collect();
            summary.subjects = g.subjects.len();
        }

        if g.classrooms.is_empty() {
            g.classrooms = CLASSROOMS
                .iter()
                .map(|&(name, floor, capacity, has_projector, has_pc)| Classroom {
                    id: ClassroomId::generate(),
                    name: name.into(),
                    floor,
                    capacity,
                    has_projector,
                    has_pc,
                })
                .collect();
            summary.classrooms = g.classrooms.len();
        }

        if g.constraints.is_empty() {
            g.constraints = CONSTRAINTS
                .iter()
                .map(|&(name, description, tag)| Constraint {
                    id: ConstraintId::generate(),
                    name: name.into(),
                    description: description.into(),
                    kind: ConstraintKind::Hard,
                    tag: tag.into(),
                })
                .collect();
            summary.constraints = g.constraints.len();
        }

        if g.preferences.is_empty() {
            let mut preferences = Vec::with_capacity(PREFERENCES.len());
            for &(teacher, day, time_slot, kind) in PREFERENCES {
                let Some(t) = g.teachers.iter().find(|t| t.name == teacher) else {
                    warn!(teacher, "teacher not found, skipping seeded preference");
                    continue;
                };
                preferences.push(Preference {
                    id: PreferenceId::generate(),
                    teacher_id: t.id.clone(),
                    day,
                    time_slot,
                    kind,
                });
            }
            summary.preferences = preferences.len();
            g.preferences = preferences;
        }

        info!(?summary, "demo data seeded");
        summary
    }
}

fn seed_welcome(g: &mut Inner) -> usize {
    let Some(admin) = g.users.iter().find(|u| u.username == "admin") else {
        warn!("admin user not found, skipping welcome notifications");
        return 0;
    };
    let admin = admin.id.clone();
    let now = Utc::now();
    g.notifications.extend(WELCOME.iter().map(|&(title, message, severity, is_read)| Notification {
        id: NotificationId::generate(),
        target_user_id: admin.clone(),
        target_role: Role::Admin,
        title: title.into(),
        message: message.into(),
        severity,
        is_read,
        created_at: now,
        ref_id: None,
        ref_model: None,
    }));
    WELCOME.len()
}
