//! Notification fan-out for timetable changes.
//!
//! Delivery is best effort: a missing recipient or a failed write is logged
//! and never propagated to the operation that triggered it.

use crate::store::DomainStore;
use chrono::Utc;
use tracing::{debug, error};
use types::{
    EntryStatus, Notification, NotificationId, RefModel, Role, ScheduleEntry, Severity, User,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScheduleChange {
    Created,
    Updated,
    Deleted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub title: String,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeNotice {
    pub severity: Severity,
    pub admin: Message,
    pub teacher: Message,
}

pub fn compose(entry: &ScheduleEntry, change: ScheduleChange) -> ChangeNotice {
    let subject = &entry.subject_name;
    let course = entry.course_key();
    let msg = |title: &str, body: String| Message {
        title: title.to_string(),
        body,
    };
    match change {
        ScheduleChange::Created => ChangeNotice {
            severity: Severity::Success,
            admin: msg(
                "Nuova Lezione Creata",
                format!("La lezione di {subject} per {course} è stata aggiunta."),
            ),
            teacher: msg(
                "Nuovo Incarico di Lezione",
                format!(
                    "Ti è stata assegnata una lezione di {subject} il {} {}.",
                    entry.day, entry.time_slot
                ),
            ),
        },
        ScheduleChange::Updated => ChangeNotice {
            severity: Severity::Info,
            admin: msg(
                "Lezione Aggiornata",
                format!("La lezione di {subject} per {course} è stata modificata."),
            ),
            teacher: msg(
                "Modifica Orario Lezione",
                format!("La tua lezione di {subject} è stata modificata. Controlla i dettagli."),
            ),
        },
        ScheduleChange::Deleted => ChangeNotice {
            severity: Severity::Error,
            admin: msg(
                "Lezione Eliminata",
                format!("La lezione di {subject} per {course} è stata rimossa."),
            ),
            teacher: msg(
                "Lezione Cancellata",
                format!("La tua lezione di {subject} del {} è stata cancellata.", entry.day),
            ),
        },
    }
}

pub fn status_severity(status: EntryStatus) -> Severity {
    match status {
        EntryStatus::Confirmed => Severity::Success,
        EntryStatus::Conflict => Severity::Warning,
        EntryStatus::Pending => Severity::Info,
    }
}

/// Notifies every admin and the teacher named on `entry`.
pub async fn notify_schedule_change<S: DomainStore + ?Sized>(
    store: &S,
    entry: &ScheduleEntry,
    change: ScheduleChange,
) {
    let notice = compose(entry, change);

    match store.users_with_role(Role::Admin).await {
        Ok(admins) => {
            for admin in &admins {
                deliver(store, admin, Role::Admin, &notice.admin, notice.severity, entry).await;
            }
        }
        Err(e) => error!(?e, entry = %entry.id, "failed to look up admin users"),
    }

    match store.find_user_by_name(&entry.teacher_name).await {
        Ok(Some(teacher)) => {
            deliver(store, &teacher, Role::Docente, &notice.teacher, notice.severity, entry).await;
        }
        Ok(None) => debug!(teacher = %entry.teacher_name, "no user account for teacher"),
        Err(e) => error!(?e, teacher = %entry.teacher_name, "failed to look up teacher user"),
    }
}

/// Tells every admin that a teacher changed the status of `entry`.
pub async fn notify_status_change<S: DomainStore + ?Sized>(store: &S, entry: &ScheduleEntry) {
    let message = Message {
        title: "Stato lezione aggiornato".into(),
        body: format!(
            "Lo stato di una lezione è stato aggiornato a \"{}\" da un docente.",
            entry.status.label()
        ),
    };
    let severity = status_severity(entry.status);
    match store.users_with_role(Role::Admin).await {
        Ok(admins) => {
            for admin in &admins {
                deliver(store, admin, Role::Admin, &message, severity, entry).await;
            }
        }
        Err(e) => error!(?e, entry = %entry.id, "failed to look up admin users"),
    }
}

async fn deliver<S: DomainStore + ?Sized>(
    store: &S,
    user: &User,
    role: Role,
    message: &Message,
    severity: Severity,
    entry: &ScheduleEntry,
) {
    let notification = Notification {
        id: NotificationId::generate(),
        target_user_id: user.id.clone(),
        target_role: role,
        title: message.title.clone(),
        message: message.body.clone(),
        severity,
        is_read: false,
        created_at: Utc::now(),
        ref_id: Some(entry.id.0.clone()),
        ref_model: Some(RefModel::ScheduleEntry),
    };
    if let Err(e) = store.insert_notification(notification).await {
        error!(?e, user = %user.id, "notification save failed");
    }
}
