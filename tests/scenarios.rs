use detection_assessor::domain::{
    aggregation::aggregate,
    detection::{BoundingBox, Detection},
    geometry::{overlap_ratio, DEFAULT_OVERLAP_THRESHOLD},
    profiles::{
        drainage_profile, drainage_rules, drainage_taxonomy, occupancy_profile, Assessor,
    },
    status::DrainageStatus,
};

fn det(label: &str, b: [f64; 4]) -> Detection {
    Detection::new(label, 0.8, BoundingBox::new(b[0], b[1], b[2], b[3]).unwrap()).unwrap()
}

const DRAIN: [f64; 4] = [0.0, 0.0, 100.0, 100.0];

#[test]
fn scenario_a_one_trash_inside_drain() {
    let profile = drainage_profile(DEFAULT_OVERLAP_THRESHOLD).unwrap();
    let a = profile.assess(&[det("drain", DRAIN), det("trash", [10.0, 10.0, 20.0, 20.0])]);

    assert_eq!(a.fields["drainage_count"], 1);
    assert_eq!(a.fields["obstruction_count"], 1);
    assert_eq!(a.status, "Partially Blocked");
}

#[test]
fn scenario_b_three_obstructions_clog_the_drain() {
    let profile = drainage_profile(DEFAULT_OVERLAP_THRESHOLD).unwrap();
    let a = profile.assess(&[
        det("drain", DRAIN),
        det("trash", [10.0, 10.0, 20.0, 20.0]),
        det("leaves", [40.0, 40.0, 45.0, 45.0]),
        det("rocks", [70.0, 10.0, 90.0, 30.0]),
    ]);
    assert_eq!(a.fields["obstruction_count"], 3);
    assert_eq!(a.status, "Clogged");
}

#[test]
fn scenario_c_two_people_one_bench_is_full() {
    let profile = occupancy_profile(DEFAULT_OVERLAP_THRESHOLD).unwrap();
    let a = profile.assess(&[
        det("person", [0.0, 0.0, 10.0, 30.0]),
        det("person", [20.0, 0.0, 30.0, 30.0]),
        det("bench", [0.0, 20.0, 40.0, 35.0]),
    ]);
    assert_eq!(a.fields["person_count"], 2);
    assert_eq!(a.fields["bench_count"], 1);
    assert_eq!(a.status, "Full");
}

#[test]
fn scenario_d_no_bench_is_empty_whatever_the_crowd() {
    let profile = occupancy_profile(DEFAULT_OVERLAP_THRESHOLD).unwrap();
    for people in [0usize, 1, 10] {
        let input: Vec<_> = (0..people)
            .map(|i| det("person", [i as f64, 0.0, i as f64 + 5.0, 5.0]))
            .collect();
        assert_eq!(profile.assess(&input).status, "Empty");
    }
}

#[test]
fn missing_drain_takes_precedence_over_obstructions() {
    let obstructions: Vec<_> = ["trash", "leaves", "rocks", "silt", "cracks"]
        .iter()
        .map(|l| det(l, [10.0, 10.0, 20.0, 20.0]))
        .collect();
    let result = aggregate(
        &obstructions,
        &drainage_taxonomy().unwrap(),
        &drainage_rules(),
        DEFAULT_OVERLAP_THRESHOLD,
    );
    assert_eq!(result.counts["drain"], 0);
    assert_eq!(result.groups["obstruction"].len(), 5);
    assert_eq!(result.status, DrainageStatus::NoDrainageDetected);
}

#[test]
fn overlap_is_measured_against_the_dependent_box() {
    let small = BoundingBox::new(10.0, 10.0, 20.0, 20.0).unwrap();
    let big = BoundingBox::new(0.0, 0.0, 100.0, 100.0).unwrap();
    assert_eq!(overlap_ratio(&small, &big), 1.0);
    assert!(overlap_ratio(&big, &small) < 1.0);
}

#[test]
fn partition_accounts_for_every_detection() {
    let input = vec![
        det("drain", DRAIN),
        det("Trash", [1.0, 1.0, 2.0, 2.0]),
        det("car", [1.0, 1.0, 2.0, 2.0]),
        det("manhole", [300.0, 300.0, 320.0, 320.0]),
        det("person", [5.0, 5.0, 6.0, 6.0]),
    ];
    let result = aggregate(
        &input,
        &drainage_taxonomy().unwrap(),
        &drainage_rules(),
        DEFAULT_OVERLAP_THRESHOLD,
    );

    let grouped: usize = result.groups.values().map(Vec::len).sum();
    assert_eq!(grouped + result.unrecognized.len(), input.len());
    assert_eq!(result.all, input);
    assert_eq!(result.unrecognized.len(), 2);
    // manhole queda fuera del desagüe: se agrupa pero no cuenta
    assert_eq!(result.groups["obstruction"].len(), 2);
    assert_eq!(result.counts["obstruction"], 1);
    assert_eq!(result.status, DrainageStatus::PartiallyBlocked);
}

#[test]
fn confidence_is_passed_through_untouched() {
    let profile = drainage_profile(DEFAULT_OVERLAP_THRESHOLD).unwrap();
    let low = Detection::new("trash", 0.01, BoundingBox::new(1.0, 1.0, 2.0, 2.0).unwrap()).unwrap();
    let a = profile.assess(&[det("drain", DRAIN), low]);
    assert_eq!(a.detections[1].confidence, 0.01);
    assert_eq!(a.fields["obstruction_count"], 1);
}

#[test]
fn overlap_boundary_survives_high_resolution_coordinates() {
    let profile = drainage_profile(DEFAULT_OVERLAP_THRESHOLD).unwrap();
    let a = profile.assess(&[
        det("drain", [4008.999999, 0.0, 5000.0, 10.0]),
        det("trash", [4000.0, 0.0, 4010.0, 10.0]),
    ]);
    assert_eq!(a.fields["obstruction_count"], 1);
    assert_eq!(a.status, "Partially Blocked");

    // Razón exactamente 0.1: no cuenta
    let a = profile.assess(&[
        det("drain", [4009.0, 0.0, 5000.0, 10.0]),
        det("trash", [4000.0, 0.0, 4010.0, 10.0]),
    ]);
    assert_eq!(a.fields["obstruction_count"], 0);
    assert_eq!(a.status, "Clear");
}
