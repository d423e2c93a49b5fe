use super::algorithm::{Alignment, AlignmentStatus, Segment};

/// Checks an alignment against the sequences it was computed from. Returns a
/// list of human-readable problems; an empty list means the result is sound.
pub fn validate(alignment: &Alignment, canonical: &[Segment], legacy: &[Segment]) -> Vec<String> {
    let mut errors = vec![];
    let sizes = [canonical.len(), legacy.len()];

    if alignment.canonical_len() != sizes[0] || alignment.legacy_len() != sizes[1] {
        errors.push(format!(
            "Alignment was computed for {}x{} segments, but the input has {}x{}",
            alignment.canonical_len(),
            alignment.legacy_len(),
            sizes[0],
            sizes[1]
        ));
    }

    // The steps of each side should cover 0..len in order, each index exactly once.
    for side in 0..2 {
        let side_name = ["canonical", "legacy"][side];
        let mut current_index = 0;
        for (step_index, step) in alignment.steps().iter().enumerate() {
            let range = step.range(side);
            if range.start != current_index {
                errors.push(format!(
                    "Step #{step_index} covers {side_name} {range:?}, but it should start at {current_index}"
                ));
            }
            if range.end < range.start {
                errors.push(format!("Step #{step_index} has a reversed {side_name} range {range:?}"));
                continue;
            }
            current_index = range.end;
        }
        if current_index != sizes[side] {
            errors.push(format!(
                "The {side_name} side ends at {current_index}, but it has {} segments",
                sizes[side]
            ));
        }
    }

    // Each status implies a shape.
    for (step_index, step) in alignment.steps().iter().enumerate() {
        let lens = [step.canonical.len(), step.legacy.len()];
        let shape_ok = match step.status {
            AlignmentStatus::Matched | AlignmentStatus::Ambiguous => lens == [1, 1],
            AlignmentStatus::Merged => lens[0] >= 2 && lens[1] == 1,
            AlignmentStatus::Split => lens[0] == 1 && lens[1] >= 2,
            AlignmentStatus::Deleted => lens[0] >= 1 && lens[1] == 0,
            AlignmentStatus::Inserted => lens[0] == 0 && lens[1] >= 1,
        };
        if !shape_ok {
            errors.push(format!(
                "Step #{step_index} is {} but covers {} canonical and {} legacy segments",
                step.status, lens[0], lens[1]
            ));
        }
    }

    // Gaps have no score; correspondences have one in [0, 1].
    for (step_index, step) in alignment.steps().iter().enumerate() {
        match (step.status.is_gap(), step.score) {
            (true, Some(score)) => errors.push(format!(
                "Step #{step_index} is {} but has score {score}",
                step.status
            )),
            (false, None) => errors.push(format!("Step #{step_index} is {} but has no score", step.status)),
            (false, Some(score)) if !(0.0..=1.0).contains(&score) => {
                errors.push(format!("Step #{step_index} has score {score} outside [0, 1]"))
            }
            _ => {}
        }
    }

    // Step ids should be the ids of the canonical segments it covers.
    for (step_index, step) in alignment.steps().iter().enumerate() {
        let Some(segments) = canonical.get(step.canonical.clone()) else {
            continue; // We already complained.
        };
        let expected: Vec<&str> = segments.iter().filter_map(Segment::id).collect();
        if !step.ids.iter().map(String::as_str).eq(expected.iter().copied()) {
            errors.push(format!(
                "Step #{step_index} lists ids {:?}, but covers {expected:?}",
                step.ids
            ));
        }
    }

    // Status counts should agree with the steps.
    for (status, count) in alignment.counts() {
        let actual = alignment.steps().iter().filter(|step| step.status == status).count();
        if actual != count {
            errors.push(format!("{status} is counted {count} times, but {actual} steps have it"));
        }
    }

    errors
}

pub fn print_errors(errors: &[String]) {
    if !errors.is_empty() {
        eprintln!("Alignment validation errors:");
        for error in errors {
            eprintln!("  {error}");
        }
    }
}
