use rand::{seq::SliceRandom, Rng};
use types::{CourseKey, Subject, HOURS_PER_SLOT};

/// One two-hour occupation still to be placed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lesson {
    pub subject: String,
    pub is_lab: bool,
}

/// Expands each subject of `course` into `weekly_hours / 2` lessons, then
/// shuffles the queue so repeated runs on the same data differ.
pub fn build_queue<R: Rng + ?Sized>(course: &CourseKey, subjects: &[Subject], rng: &mut R) -> Vec<Lesson> {
    let course_ref = course.reference();
    let mut queue: Vec<Lesson> = subjects
        .iter()
        .filter(|s| s.course_ref == course_ref)
        .flat_map(|s| {
            (0..s.weekly_hours / HOURS_PER_SLOT).map(move |_| Lesson {
                subject: s.name.clone(),
                is_lab: s.is_lab,
            })
        })
        .collect();
    queue.shuffle(rng);
    queue
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use types::SubjectId;

    fn subject(name: &str, hours: u32, lab: bool, course_ref: &str) -> Subject {
        Subject {
            id: SubjectId::generate(),
            name: name.into(),
            code: name.to_uppercase(),
            is_lab: lab,
            weekly_hours: hours,
            course_ref: course_ref.into(),
        }
    }

    #[test]
    fn one_lesson_per_two_hours_of_the_course_only() {
        let subjects = vec![
            subject("Analisi Matematica I", 4, false, "Informatica - 1"),
            subject("Programmazione I", 4, true, "Informatica - 1"),
            subject("Lingua Inglese", 2, false, "Informatica - 1"),
            subject("Basi Di Dati", 2, true, "Informatica - 2"),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let queue = build_queue(&CourseKey::new("Informatica", 1), &subjects, &mut rng);

        assert_eq!(queue.len(), 5);
        assert_eq!(queue.iter().filter(|l| l.is_lab).count(), 2);
        assert!(queue.iter().all(|l| l.subject != "Basi Di Dati"));
    }

    #[test]
    fn shuffle_follows_the_rng() {
        let subjects: Vec<_> = ["A", "B", "C", "D", "E", "F"]
            .iter()
            .map(|n| subject(n, 2, false, "X - 1"))
            .collect();
        let key = CourseKey::new("X", 1);
        let a = build_queue(&key, &subjects, &mut ChaCha8Rng::seed_from_u64(1));
        let b = build_queue(&key, &subjects, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(a, b);
    }
}
