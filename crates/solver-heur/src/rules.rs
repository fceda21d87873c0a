//! Hard rules and the registry of the ones active for a run.
//!
//! Every rule is a closed variant with its own evaluator. Rules run in three
//! stages: per (teacher, day), per (day, slot) and per full placement. Within
//! a stage they are evaluated in declaration order and the first violation
//! rejects the probe.

use crate::occupancy::Occupancy;
use std::collections::BTreeSet;
use tracing::debug;
use types::{Constraint, Day, PreferenceKind, TimeSlot};

/// A teacher may work at most this many distinct weekdays under `teacher_day_off`.
pub const MAX_TEACHER_DAYS: usize = 4;
/// Lessons per course per day under `max_daily_hours`.
pub const MAX_DAILY_LESSONS: u32 = 3;
/// Lessons of one subject per course per day under `max_consecutive_subject_hours`.
pub const MAX_SUBJECT_LESSONS_PER_DAY: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Day,
    Slot,
    Placement,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rule {
    TeacherDayOff,
    /// Always active: one lesson per course per slot.
    CourseSlotFree,
    MaxConsecutiveSubjectHours,
    MaxDailyHours,
    PreferredMornings,
    ConsecutiveSlots,
    /// Always active: `Non Disponibile` preferences are absolute.
    TeacherAvailable,
    NoOverlapClassroom,
    NoOverlapTeacher,
}

/// What a rule gets to look at. `slot` is `None` in the day stage and
/// `classroom` is `None` before the placement stage.
#[derive(Clone, Copy, Debug)]
pub struct Probe<'a> {
    pub occupancy: &'a Occupancy,
    pub subject: &'a str,
    pub teacher: &'a str,
    pub day: Day,
    pub slot: Option<TimeSlot>,
    pub classroom: Option<&'a str>,
    pub preference: Option<PreferenceKind>,
}

impl Rule {
    pub const BUILT_IN: [Rule; 2] = [Rule::CourseSlotFree, Rule::TeacherAvailable];

    pub const TAGGED: [Rule; 7] = [
        Rule::NoOverlapTeacher,
        Rule::NoOverlapClassroom,
        Rule::MaxDailyHours,
        Rule::MaxConsecutiveSubjectHours,
        Rule::PreferredMornings,
        Rule::ConsecutiveSlots,
        Rule::TeacherDayOff,
    ];

    pub fn tag(self) -> Option<&'static str> {
        match self {
            Rule::NoOverlapTeacher => Some("no_overlap_teacher"),
            Rule::NoOverlapClassroom => Some("no_overlap_classroom"),
            Rule::MaxDailyHours => Some("max_daily_hours"),
            Rule::MaxConsecutiveSubjectHours => Some("max_consecutive_subject_hours"),
            Rule::PreferredMornings => Some("preferred_mornings"),
            Rule::ConsecutiveSlots => Some("consecutive_slots"),
            Rule::TeacherDayOff => Some("teacher_day_off"),
            Rule::CourseSlotFree | Rule::TeacherAvailable => None,
        }
    }

    pub fn from_tag(tag: &str) -> Option<Rule> {
        Rule::TAGGED.into_iter().find(|r| r.tag() == Some(tag))
    }

    pub fn stage(self) -> Stage {
        match self {
            Rule::TeacherDayOff => Stage::Day,
            Rule::NoOverlapClassroom | Rule::NoOverlapTeacher => Stage::Placement,
            _ => Stage::Slot,
        }
    }

    /// True when the probe breaks this rule.
    pub fn violated(self, p: &Probe<'_>) -> bool {
        let occ = p.occupancy;
        match self {
            Rule::TeacherDayOff => {
                !occ.teacher_works_on(p.teacher, p.day)
                    && occ.teacher_day_count(p.teacher) >= MAX_TEACHER_DAYS
            }
            Rule::CourseSlotFree => p
                .slot
                .is_some_and(|slot| !occ.is_course_slot_free(p.day, slot)),
            Rule::MaxConsecutiveSubjectHours => {
                occ.subject_load(p.day, p.subject) >= MAX_SUBJECT_LESSONS_PER_DAY
            }
            Rule::MaxDailyHours => occ.course_load(p.day) >= MAX_DAILY_LESSONS,
            Rule::PreferredMornings => p.slot.is_some_and(TimeSlot::is_afternoon),
            Rule::ConsecutiveSlots => {
                let Some(slot) = p.slot else {
                    return false;
                };
                // The first lesson of a day may go anywhere.
                if occ.course_load(p.day) == 0 {
                    return false;
                }
                let taken = |s: Option<TimeSlot>| {
                    s.is_some_and(|s| !occ.is_course_slot_free(p.day, s))
                };
                !taken(slot.prev()) && !taken(slot.next())
            }
            Rule::TeacherAvailable => p.preference == Some(PreferenceKind::Unavailable),
            Rule::NoOverlapClassroom => match (p.slot, p.classroom) {
                (Some(slot), Some(room)) => !occ.is_classroom_free(p.day, slot, room),
                _ => false,
            },
            Rule::NoOverlapTeacher => p
                .slot
                .is_some_and(|slot| !occ.is_teacher_free(p.day, slot, p.teacher)),
        }
    }
}

/// Rules active for one generation run, split by stage.
#[derive(Clone, Debug)]
pub struct RuleSet {
    active: BTreeSet<Rule>,
    day: Vec<Rule>,
    slot: Vec<Rule>,
    placement: Vec<Rule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::from_rules(std::iter::empty())
    }
}

impl RuleSet {
    /// Built-in rules plus `rules`.
    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        let active: BTreeSet<Rule> = Rule::BUILT_IN.into_iter().chain(rules).collect();
        let of = |stage: Stage| -> Vec<Rule> {
            active.iter().copied().filter(|r| r.stage() == stage).collect()
        };
        Self {
            day: of(Stage::Day),
            slot: of(Stage::Slot),
            placement: of(Stage::Placement),
            active,
        }
    }

    /// Activates the rule behind each stored constraint's tag. Tags outside
    /// the known vocabulary are ignored.
    pub fn from_constraints(constraints: &[Constraint]) -> Self {
        let rules = constraints.iter().filter_map(|c| {
            let rule = Rule::from_tag(c.tag.trim());
            if rule.is_none() {
                debug!(tag = %c.tag, name = %c.name, "ignoring unknown constraint tag");
            }
            rule
        });
        Self::from_rules(rules)
    }

    pub fn is_active(&self, rule: Rule) -> bool {
        self.active.contains(&rule)
    }

    pub fn active(&self) -> impl Iterator<Item = Rule> + '_ {
        self.active.iter().copied()
    }

    fn admits(rules: &[Rule], probe: &Probe<'_>) -> bool {
        !rules.iter().any(|r| r.violated(probe))
    }

    pub fn admits_day(&self, probe: &Probe<'_>) -> bool {
        Self::admits(&self.day, probe)
    }

    pub fn admits_slot(&self, probe: &Probe<'_>) -> bool {
        Self::admits(&self.slot, probe)
    }

    pub fn admits_placement(&self, probe: &Probe<'_>) -> bool {
        Self::admits(&self.placement, probe)
    }

    #[cfg(test)]
    pub fn slot_rules(&self) -> &[Rule] {
        &self.slot
    }
}
