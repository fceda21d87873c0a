use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash,
            PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}
id_newtype!(SubjectId);
id_newtype!(TeacherId);
id_newtype!(ClassroomId);
id_newtype!(CourseId);
id_newtype!(ConstraintId);
id_newtype!(PreferenceId);
id_newtype!(EntryId);
id_newtype!(UserId);
id_newtype!(NotificationId);
id_newtype!(SnapshotId);

/// Every lesson unit occupies one slot of this many hours.
pub const HOURS_PER_SLOT: u32 = 2;

/// Weekly slot capacity of a classroom, used for usage percentages.
pub const CLASSROOM_WEEKLY_SLOTS: u32 = 20;

pub const DEFAULT_MAX_WEEKLY_HOURS: u32 = 18;

#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash,
    PartialOrd, Ord,
)]
pub enum Day {
    #[serde(rename = "Lunedì", alias = "Lunedi", alias = "monday")]
    Monday,
    #[serde(rename = "Martedì", alias = "Martedi", alias = "tuesday")]
    Tuesday,
    #[serde(rename = "Mercoledì", alias = "Mercoledi", alias = "wednesday")]
    Wednesday,
    #[serde(rename = "Giovedì", alias = "Giovedi", alias = "thursday")]
    Thursday,
    #[serde(rename = "Venerdì", alias = "Venerdi", alias = "friday")]
    Friday,
}

impl Day {
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Day::Monday => "Lunedì",
            Day::Tuesday => "Martedì",
            Day::Wednesday => "Mercoledì",
            Day::Thursday => "Giovedì",
            Day::Friday => "Venerdì",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Day {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fold = |v: &str| v.trim().replace('ì', "i").to_lowercase();
        let wanted = fold(s);
        Day::ALL
            .into_iter()
            .find(|d| fold(d.label()) == wanted)
            .ok_or_else(|| format!("unknown day: {s}"))
    }
}

/// The four fixed two-hour teaching slots of a day, in chronological order.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash,
    PartialOrd, Ord,
)]
pub enum TimeSlot {
    #[serde(rename = "09:00 - 11:00", alias = "09:00-11:00")]
    Nine,
    #[serde(rename = "11:00 - 13:00", alias = "11:00-13:00")]
    Eleven,
    #[serde(rename = "14:00 - 16:00", alias = "14:00-16:00")]
    Fourteen,
    #[serde(rename = "16:00 - 18:00", alias = "16:00-18:00")]
    Sixteen,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 4] = [
        TimeSlot::Nine,
        TimeSlot::Eleven,
        TimeSlot::Fourteen,
        TimeSlot::Sixteen,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeSlot::Nine => "09:00 - 11:00",
            TimeSlot::Eleven => "11:00 - 13:00",
            TimeSlot::Fourteen => "14:00 - 16:00",
            TimeSlot::Sixteen => "16:00 - 18:00",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn prev(self) -> Option<TimeSlot> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn next(self) -> Option<TimeSlot> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Slots starting at 14:00 or 16:00.
    pub fn is_afternoon(self) -> bool {
        matches!(self, TimeSlot::Fourteen | TimeSlot::Sixteen)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        TimeSlot::ALL
            .into_iter()
            .find(|t| t.label().replace(' ', "") == compact)
            .ok_or_else(|| format!("unknown time slot: {s}"))
    }
}

/// Course identity used by subjects (`course_ref`) and schedule entries.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash)]
pub struct CourseKey {
    pub name: String,
    pub year: u32,
}

impl CourseKey {
    pub fn new(name: impl Into<String>, year: u32) -> Self {
        Self {
            name: name.into(),
            year,
        }
    }

    /// Composite reference in the form `"Name - Year"`.
    pub fn reference(&self) -> String {
        format!("{} - {}", self.name, self.year)
    }
}

impl fmt::Display for CourseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.year)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub is_lab: bool,
    pub weekly_hours: u32,
    pub course_ref: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default = "default_max_weekly_hours")]
    pub max_weekly_hours: u32,
}

fn default_max_weekly_hours() -> u32 {
    DEFAULT_MAX_WEEKLY_HOURS
}

impl Teacher {
    pub fn teaches(&self, subject: &str) -> bool {
        self.subjects.iter().any(|s| s == subject)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
pub struct Classroom {
    pub id: ClassroomId,
    pub name: String,
    #[serde(default)]
    pub floor: i32,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default = "default_true")]
    pub has_projector: bool,
    #[serde(default)]
    pub has_pc: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub year: u32,
    #[serde(default)]
    pub students_count: u32,
}

impl Course {
    pub fn key(&self) -> CourseKey {
        CourseKey::new(self.name.clone(), self.year)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash)]
pub enum ConstraintKind {
    #[serde(rename = "Rigido")]
    Hard,
    #[serde(rename = "Flessibile")]
    Soft,
}

/// A stored scheduling rule. Only `tag` decides what the generator enforces.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
pub struct Constraint {
    pub id: ConstraintId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ConstraintKind,
    pub tag: String,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash)]
pub enum PreferenceKind {
    #[serde(rename = "Preferito")]
    Preferred,
    #[serde(rename = "Evitare")]
    Avoid,
    #[serde(rename = "Non Disponibile")]
    Unavailable,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
pub struct Preference {
    pub id: PreferenceId,
    pub teacher_id: TeacherId,
    pub day: Day,
    pub time_slot: TimeSlot,
    #[serde(rename = "type")]
    pub kind: PreferenceKind,
}

#[derive(
    Clone, Copy, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash,
)]
pub enum EntryStatus {
    #[default]
    #[serde(rename = "Confermato")]
    Confirmed,
    #[serde(rename = "In Attesa")]
    Pending,
    #[serde(rename = "Conflitto")]
    Conflict,
}

impl EntryStatus {
    pub fn label(self) -> &'static str {
        match self {
            EntryStatus::Confirmed => "Confermato",
            EntryStatus::Pending => "In Attesa",
            EntryStatus::Conflict => "Conflitto",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
pub struct ScheduleEntry {
    pub id: EntryId,
    pub course_name: String,
    pub course_year: u32,
    pub day: Day,
    pub time_slot: TimeSlot,
    pub subject_name: String,
    pub teacher_name: String,
    pub classroom_name: String,
    #[serde(default)]
    pub status: EntryStatus,
}

impl ScheduleEntry {
    pub fn belongs_to(&self, key: &CourseKey) -> bool {
        self.course_name == key.name && self.course_year == key.year
    }

    pub fn course_key(&self) -> CourseKey {
        CourseKey::new(self.course_name.clone(), self.course_year)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Docente,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub name: String,
}

#[derive(
    Clone, Copy, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    #[default]
    Info,
    Error,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash)]
pub enum RefModel {
    ScheduleEntry,
    Teacher,
    Course,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub target_user_id: UserId,
    pub target_role: Role,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub severity: Severity,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub ref_id: Option<String>,
    #[serde(default)]
    pub ref_model: Option<RefModel>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetrics {
    pub efficiency: i64,
    pub satisfaction: i64,
    pub total_hours: u32,
    pub total_required: u32,
    pub coverage_percent: f64,
    pub conflicts: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
pub struct ReportSnapshot {
    pub id: SnapshotId,
    pub timestamp: DateTime<Utc>,
    pub metrics: ReportMetrics,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Trends {
    pub efficiency: i64,
    pub satisfaction: i64,
    pub hours_diff: i64,
    pub conflicts_diff: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
pub struct ClassroomUsage {
    pub name: String,
    pub percent: u32,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
pub enum WorkloadStatus {
    #[serde(rename = "Ottimale")]
    Optimal,
    #[serde(rename = "Sovraccarico")]
    Overloaded,
    #[serde(rename = "Sotto carico")]
    Underloaded,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TeacherWorkload {
    pub name: String,
    pub hours: u32,
    pub max_hours: u32,
    pub status: WorkloadStatus,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub metrics: ReportMetrics,
    pub trends: Trends,
    pub classroom_usage: Vec<ClassroomUsage>,
    pub teacher_workload: Vec<TeacherWorkload>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub course: String,
    pub year: u32,
    #[serde(default)]
    pub optimization_type: String,
    #[serde(default)]
    pub respect_preferences: bool,
}

impl GenerateRequest {
    pub fn key(&self) -> CourseKey {
        CourseKey::new(self.course.clone(), self.year)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct GenerateResponse {
    pub success: bool,
    pub message: String,
    pub lessons: usize,
}

#[derive(Clone, Debug, Deserialize, ToSchema, JsonSchema)]
pub struct CourseInput {
    pub name: String,
    pub year: u32,
    #[serde(default)]
    pub students_count: u32,
}

#[derive(Clone, Debug, Deserialize, ToSchema, JsonSchema)]
pub struct SubjectInput {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub is_lab: bool,
    pub weekly_hours: u32,
    pub course_ref: String,
}

#[derive(Clone, Debug, Deserialize, ToSchema, JsonSchema)]
pub struct ClassroomInput {
    pub name: String,
    #[serde(default)]
    pub floor: i32,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub has_projector: Option<bool>,
    #[serde(default)]
    pub has_pc: Option<bool>,
}

/// Subject list as sent by clients: either an array or comma-separated text.
#[derive(Clone, Debug, Deserialize, ToSchema, JsonSchema)]
#[serde(untagged)]
pub enum SubjectList {
    List(Vec<String>),
    Text(String),
}

impl Default for SubjectList {
    fn default() -> Self {
        SubjectList::List(Vec::new())
    }
}

#[derive(Clone, Debug, Deserialize, ToSchema, JsonSchema)]
pub struct TeacherInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subjects: SubjectList,
    #[serde(default)]
    pub max_weekly_hours: Option<u32>,
}

#[derive(Clone, Debug, Deserialize, ToSchema, JsonSchema)]
pub struct ConstraintInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ConstraintKind,
    pub tag: String,
}

#[derive(Clone, Debug, Deserialize, ToSchema, JsonSchema)]
pub struct PreferenceInput {
    pub teacher_id: TeacherId,
    pub day: Day,
    pub time_slot: TimeSlot,
    #[serde(rename = "type")]
    pub kind: PreferenceKind,
}

#[derive(Clone, Debug, Deserialize, ToSchema, JsonSchema)]
pub struct EntryInput {
    pub course_name: String,
    pub course_year: u32,
    pub day: Day,
    pub time_slot: TimeSlot,
    pub subject_name: String,
    pub teacher_name: String,
    pub classroom_name: String,
    #[serde(default)]
    pub status: Option<EntryStatus>,
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema, JsonSchema)]
pub struct EntryPatch {
    pub course_name: Option<String>,
    pub course_year: Option<u32>,
    pub day: Option<Day>,
    pub time_slot: Option<TimeSlot>,
    pub subject_name: Option<String>,
    pub teacher_name: Option<String>,
    pub classroom_name: Option<String>,
    pub status: Option<EntryStatus>,
}

impl EntryPatch {
    pub fn apply(self, entry: &mut ScheduleEntry) {
        if let Some(v) = self.course_name {
            entry.course_name = v;
        }
        if let Some(v) = self.course_year {
            entry.course_year = v;
        }
        if let Some(v) = self.day {
            entry.day = v;
        }
        if let Some(v) = self.time_slot {
            entry.time_slot = v;
        }
        if let Some(v) = self.subject_name {
            entry.subject_name = v;
        }
        if let Some(v) = self.teacher_name {
            entry.teacher_name = v;
        }
        if let Some(v) = self.classroom_name {
            entry.classroom_name = v;
        }
        if let Some(v) = self.status {
            entry.status = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_slot_accepts_compact_and_spaced_forms() {
        assert_eq!("09:00-11:00".parse::<TimeSlot>(), Ok(TimeSlot::Nine));
        assert_eq!("16:00 - 18:00".parse::<TimeSlot>(), Ok(TimeSlot::Sixteen));
        assert!("13:00-14:00".parse::<TimeSlot>().is_err());

        let s: TimeSlot = serde_json::from_str("\"11:00-13:00\"").unwrap();
        assert_eq!(s, TimeSlot::Eleven);
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"11:00 - 13:00\"");
    }

    #[test]
    fn slot_neighbours_stay_within_the_day() {
        assert_eq!(TimeSlot::Nine.prev(), None);
        assert_eq!(TimeSlot::Nine.next(), Some(TimeSlot::Eleven));
        assert_eq!(TimeSlot::Fourteen.prev(), Some(TimeSlot::Eleven));
        assert_eq!(TimeSlot::Sixteen.next(), None);
        assert!(TimeSlot::Fourteen.is_afternoon());
        assert!(!TimeSlot::Eleven.is_afternoon());
    }

    #[test]
    fn days_use_italian_labels() {
        assert_eq!(serde_json::to_string(&Day::Wednesday).unwrap(), "\"Mercoledì\"");
        let d: Day = serde_json::from_str("\"Venerdì\"").unwrap();
        assert_eq!(d, Day::Friday);
        assert_eq!("giovedi".parse::<Day>(), Ok(Day::Thursday));
        assert_eq!("Lunedì".parse::<Day>(), Ok(Day::Monday));
    }

    #[test]
    fn course_key_reference() {
        assert_eq!(CourseKey::new("Informatica", 1).reference(), "Informatica - 1");
    }

    #[test]
    fn subject_list_accepts_text_or_array() {
        let t: TeacherInput =
            serde_json::from_str(r#"{"name":"A","email":"a@x.it","subjects":"Fisica, Basi Di Dati"}"#)
                .unwrap();
        assert!(matches!(t.subjects, SubjectList::Text(_)));
        let t: TeacherInput =
            serde_json::from_str(r#"{"name":"A","email":"a@x.it","subjects":["Fisica"]}"#).unwrap();
        assert!(matches!(t.subjects, SubjectList::List(ref v) if v.len() == 1));
    }

    #[test]
    fn generate_request_uses_camel_case() {
        let r: GenerateRequest = serde_json::from_str(
            r#"{"course":"Informatica","year":1,"optimizationType":"balanced","respectPreferences":true}"#,
        )
        .unwrap();
        assert!(r.respect_preferences);
        assert_eq!(r.key(), CourseKey::new("Informatica", 1));
    }
}
