use super::detection::Detection;
use super::geometry::overlaps;

/// Cuántos `dependents` solapan al menos una de las `references` por encima de `threshold`.
pub fn conditional_count(dependents: &[Detection], references: &[Detection], threshold: f64) -> usize {
    dependents
        .iter()
        .filter(|dep| references.iter().any(|r| overlaps(&dep.bbox, &r.bbox, threshold)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::detection::BoundingBox;

    fn det(label: &str, x1: f64, y1: f64, x2: f64, y2: f64) -> Detection {
        Detection::new(label, 0.8, BoundingBox::new(x1, y1, x2, y2).unwrap()).unwrap()
    }

    #[test]
    fn dependent_counts_once_even_when_inside_several_references() {
        let drains = vec![det("drain", 0.0, 0.0, 100.0, 100.0), det("drain", 0.0, 0.0, 50.0, 50.0)];
        let trash = vec![det("trash", 10.0, 10.0, 20.0, 20.0)];
        assert_eq!(conditional_count(&trash, &drains, 0.1), 1);
    }

    #[test]
    fn dependents_outside_every_reference_are_ignored() {
        let drains = vec![det("drain", 0.0, 0.0, 100.0, 100.0)];
        let obstructions = vec![
            det("trash", 10.0, 10.0, 20.0, 20.0),
            det("rocks", 200.0, 200.0, 220.0, 220.0),
            det("leaves", 95.0, 95.0, 195.0, 195.0), // cubierta al 0.25%
        ];
        assert_eq!(conditional_count(&obstructions, &drains, 0.1), 1);
    }

    #[test]
    fn no_references_means_zero() {
        let obstructions = vec![det("trash", 10.0, 10.0, 20.0, 20.0)];
        assert_eq!(conditional_count(&obstructions, &[], 0.1), 0);
        assert_eq!(conditional_count(&[], &obstructions, 0.1), 0);
    }

    #[test]
    fn count_is_monotone_in_both_inputs() {
        let mut drains = vec![det("drain", 0.0, 0.0, 50.0, 50.0)];
        let mut obstructions = vec![
            det("trash", 10.0, 10.0, 20.0, 20.0),
            det("rocks", 60.0, 60.0, 70.0, 70.0),
        ];

        let base = conditional_count(&obstructions, &drains, 0.1);
        assert_eq!(base, 1);

        drains.push(det("drain", 55.0, 55.0, 100.0, 100.0));
        let more_refs = conditional_count(&obstructions, &drains, 0.1);
        assert!(more_refs >= base);
        assert_eq!(more_refs, 2);

        obstructions.push(det("silt", 500.0, 500.0, 510.0, 510.0));
        let more_deps = conditional_count(&obstructions, &drains, 0.1);
        assert!(more_deps >= more_refs);

        obstructions.push(det("leaves", 1.0, 1.0, 5.0, 5.0));
        assert_eq!(conditional_count(&obstructions, &drains, 0.1), 3);
    }

    #[test]
    fn threshold_comparison_is_strict() {
        let drains = vec![det("drain", 9.0, 0.0, 20.0, 10.0)];
        let obstructions = vec![det("trash", 0.0, 0.0, 10.0, 10.0)];
        assert_eq!(conditional_count(&obstructions, &drains, 0.1), 0);
        assert_eq!(conditional_count(&obstructions, &drains, 0.09), 1);
    }
}
