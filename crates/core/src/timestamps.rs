use crate::types::{MainConcept, Timestamp};

const MINUTES_PER_CONCEPT: f64 = 3.5;

/// Placeholder `M:SS` label for the concept at `index`.
///
/// There is no timing data behind this. Minutes are `floor(i * 3.5)`; the
/// seconds are the fractional minute times 60, printed as the shortest
/// decimal, left-padded with `0` to two characters and then cut to the first
/// two characters. The cut is kept as-is for compatibility with exported notes.
pub fn synthetic_time(index: usize) -> String {
    let offset = index as f64 * MINUTES_PER_CONCEPT;
    let minutes = offset.floor() as u64;
    let seconds = format!("{:0>2}", (offset % 1.0) * 60.0);
    let seconds: String = seconds.chars().take(2).collect();
    format!("{}:{}", minutes, seconds)
}

pub fn synthesize_timestamps(concepts: &[MainConcept]) -> Vec<Timestamp> {
    concepts
        .iter()
        .enumerate()
        .map(|(i, concept)| Timestamp {
            time: synthetic_time(i),
            topic: concept.topic.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concept(topic: &str) -> MainConcept {
        MainConcept {
            topic: topic.to_string(),
            content: String::new(),
        }
    }

    #[test]
    fn first_concepts_follow_the_three_and_a_half_minute_grid() {
        assert_eq!(synthetic_time(0), "0:00");
        assert_eq!(synthetic_time(1), "3:30");
        assert_eq!(synthetic_time(2), "7:00");
        assert_eq!(synthetic_time(3), "10:30");
        assert_eq!(synthetic_time(4), "14:00");
    }

    #[test]
    fn formula_holds_for_larger_indices() {
        for i in 0..500usize {
            let minutes = (i as f64 * 3.5).floor() as u64;
            let seconds = if i % 2 == 0 { "00" } else { "30" };
            assert_eq!(synthetic_time(i), format!("{minutes}:{seconds}"));
        }
    }

    #[test]
    fn one_timestamp_per_concept_in_order() {
        let concepts = [concept("Intro"), concept("Core idea"), concept("Wrap up")];
        let stamps = synthesize_timestamps(&concepts);

        assert_eq!(
            stamps,
            vec![
                Timestamp { time: "0:00".into(), topic: "Intro".into() },
                Timestamp { time: "3:30".into(), topic: "Core idea".into() },
                Timestamp { time: "7:00".into(), topic: "Wrap up".into() },
            ]
        );
    }

    #[test]
    fn no_concepts_no_timestamps() {
        assert!(synthesize_timestamps(&[]).is_empty());
    }
}
