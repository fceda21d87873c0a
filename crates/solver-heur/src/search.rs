//! Candidate enumeration, scoring and near-best random selection.

use crate::lessons::Lesson;
use crate::occupancy::Occupancy;
use crate::rules::{Probe, RuleSet};
use rand::Rng;
use std::collections::HashMap;
use types::{Classroom, Day, Preference, PreferenceKind, Teacher, TeacherId, TimeSlot};

pub const PREFERRED_BONUS: f64 = 30.0;
pub const AVOID_PENALTY: f64 = 20.0;
pub const DAILY_LOAD_PENALTY: f64 = 5.0;
/// Scores get uniform noise in `[0, JITTER)`.
pub const JITTER: f64 = 5.0;
/// Candidates this close to the best score are equally eligible.
pub const NEAR_BEST_MARGIN: f64 = 2.0;

pub type PreferenceMap = HashMap<(TeacherId, Day, TimeSlot), PreferenceKind>;

/// Later preferences for the same teacher and slot override earlier ones.
pub fn preference_map(preferences: &[Preference]) -> PreferenceMap {
    preferences
        .iter()
        .map(|p| ((p.teacher_id.clone(), p.day, p.time_slot), p.kind))
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct Candidate<'a> {
    pub teacher: &'a str,
    pub classroom: &'a str,
    pub day: Day,
    pub slot: TimeSlot,
    pub score: f64,
}

pub struct SearchContext<'a> {
    pub rules: &'a RuleSet,
    pub teachers: &'a [Teacher],
    pub classrooms: &'a [Classroom],
    pub preferences: &'a PreferenceMap,
    pub respect_preferences: bool,
}

/// Deterministic part of a candidate's score.
pub fn base_score(preference: Option<PreferenceKind>, respect_preferences: bool, day_load: u32) -> f64 {
    let mut score = 0.0;
    if respect_preferences {
        match preference {
            Some(PreferenceKind::Preferred) => score += PREFERRED_BONUS,
            Some(PreferenceKind::Avoid) => score -= AVOID_PENALTY,
            _ => {}
        }
    }
    score - DAILY_LOAD_PENALTY * f64::from(day_load)
}

/// Every legal (teacher, day, slot, classroom) tuple for `lesson`, scored.
pub fn candidates<'a, R: Rng + ?Sized>(
    ctx: &SearchContext<'a>,
    lesson: &'a Lesson,
    occ: &Occupancy,
    rng: &mut R,
) -> Vec<Candidate<'a>> {
    let rooms: Vec<&Classroom> = ctx
        .classrooms
        .iter()
        .filter(|c| !lesson.is_lab || c.has_pc)
        .collect();
    let mut out = Vec::new();

    for teacher in ctx.teachers.iter().filter(|t| t.teaches(&lesson.subject)) {
        for day in Day::ALL {
            let mut probe = Probe {
                occupancy: occ,
                subject: &lesson.subject,
                teacher: &teacher.name,
                day,
                slot: None,
                classroom: None,
                preference: None,
            };
            if !ctx.rules.admits_day(&probe) {
                continue;
            }

            for slot in TimeSlot::ALL {
                probe.slot = Some(slot);
                probe.classroom = None;
                probe.preference = ctx
                    .preferences
                    .get(&(teacher.id.clone(), day, slot))
                    .copied();
                if !ctx.rules.admits_slot(&probe) {
                    continue;
                }
                let base = base_score(probe.preference, ctx.respect_preferences, occ.course_load(day));

                for &room in &rooms {
                    probe.classroom = Some(&room.name);
                    if !ctx.rules.admits_placement(&probe) {
                        continue;
                    }
                    out.push(Candidate {
                        teacher: &teacher.name,
                        classroom: &room.name,
                        day,
                        slot,
                        score: base + rng.gen_range(0.0..JITTER),
                    });
                }
            }
        }
    }
    out
}

/// Picks uniformly among candidates within [`NEAR_BEST_MARGIN`] of the best.
pub fn select<'a, R: Rng + ?Sized>(mut candidates: Vec<Candidate<'a>>, rng: &mut R) -> Option<Candidate<'a>> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    let best = candidates.first()?.score;
    let near = candidates.partition_point(|c| c.score >= best - NEAR_BEST_MARGIN);
    let pick = rng.gen_range(0..near);
    Some(candidates.swap_remove(pick))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rule;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use types::{ClassroomId, PreferenceId};

    fn teacher(name: &str, subjects: &[&str]) -> Teacher {
        Teacher {
            id: TeacherId(name.to_lowercase()),
            name: name.into(),
            email: format!("{}@uni.it", name.to_lowercase()),
            subjects: subjects.iter().map(|s| s.to_string()).collect(),
            max_weekly_hours: 18,
        }
    }

    fn room(name: &str, pc: bool) -> Classroom {
        Classroom {
            id: ClassroomId::generate(),
            name: name.into(),
            floor: 1,
            capacity: 90,
            has_projector: true,
            has_pc: pc,
        }
    }

    fn cand(score: f64) -> Candidate<'static> {
        Candidate {
            teacher: "Rossi",
            classroom: "A1",
            day: Day::Monday,
            slot: TimeSlot::Nine,
            score,
        }
    }

    #[test]
    fn base_score_weights() {
        assert_eq!(base_score(Some(PreferenceKind::Preferred), true, 0), 30.0);
        assert_eq!(base_score(Some(PreferenceKind::Avoid), true, 1), -25.0);
        assert_eq!(base_score(Some(PreferenceKind::Preferred), false, 2), -10.0);
        assert_eq!(base_score(None, true, 0), 0.0);
    }

    #[test]
    fn select_stays_near_the_best() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let picked = select(vec![cand(4.0), cand(10.0), cand(8.5), cand(7.9)], &mut rng).unwrap();
            assert!(picked.score >= 8.0, "picked {}", picked.score);
        }
        assert!(select(Vec::new(), &mut rng).is_none());
    }

    #[test]
    fn labs_only_use_pc_rooms_and_unqualified_teachers_are_skipped() {
        let rules = RuleSet::default();
        let teachers = vec![teacher("Bianchi", &["Programmazione I"]), teacher("Rossi", &["Fisica"])];
        let rooms = vec![room("A1", false), room("Lab Informatica 1", true)];
        let prefs = PreferenceMap::new();
        let ctx = SearchContext {
            rules: &rules,
            teachers: &teachers,
            classrooms: &rooms,
            preferences: &prefs,
            respect_preferences: false,
        };
        let lesson = Lesson {
            subject: "Programmazione I".into(),
            is_lab: true,
        };
        let occ = Occupancy::default();
        let found = candidates(&ctx, &lesson, &occ, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(found.len(), 5 * 4);
        assert!(found.iter().all(|c| c.classroom == "Lab Informatica 1" && c.teacher == "Bianchi"));
        assert!(found.iter().all(|c| (0.0..JITTER).contains(&c.score)));
    }

    #[test]
    fn unavailable_slots_never_appear_and_preferred_ones_score_higher() {
        let rules = RuleSet::from_rules([Rule::NoOverlapTeacher]);
        let teachers = vec![teacher("Rossi", &["Fisica"])];
        let rooms = vec![room("A1", false)];
        let prefs = preference_map(&[
            Preference {
                id: PreferenceId::generate(),
                teacher_id: TeacherId("rossi".into()),
                day: Day::Tuesday,
                time_slot: TimeSlot::Fourteen,
                kind: PreferenceKind::Unavailable,
            },
            Preference {
                id: PreferenceId::generate(),
                teacher_id: TeacherId("rossi".into()),
                day: Day::Wednesday,
                time_slot: TimeSlot::Nine,
                kind: PreferenceKind::Preferred,
            },
        ]);
        let ctx = SearchContext {
            rules: &rules,
            teachers: &teachers,
            classrooms: &rooms,
            preferences: &prefs,
            respect_preferences: true,
        };
        let lesson = Lesson {
            subject: "Fisica".into(),
            is_lab: false,
        };
        let occ = Occupancy::default();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let found = candidates(&ctx, &lesson, &occ, &mut rng);
        assert_eq!(found.len(), 19);
        assert!(!found
            .iter()
            .any(|c| c.day == Day::Tuesday && c.slot == TimeSlot::Fourteen));

        let best = select(found, &mut rng).unwrap();
        assert_eq!((best.day, best.slot), (Day::Wednesday, TimeSlot::Nine));
    }
}
