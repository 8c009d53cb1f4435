//! Survey Chain Regression Tests
//!
//! Exercises the full computation path through the public API: raw stations
//! committed through the chain, then projection, quality verdicts, and
//! trajectory statistics over the committed surveys. The worked examples
//! carry hand-checked values.

use wellpath::analytics::aggregate;
use wellpath::projector::{project, DEFAULT_PROJECTION_HORIZON_FT};
use wellpath::quality::classify;
use wellpath::{RawSurvey, SurveyChain, SurveyError, SurveyStatus, WellPlan};

fn plan() -> WellPlan {
    WellPlan {
        proposed_direction: 175.0,
        sensor_offset: 15.0,
        target_tvd: 9_000.0,
        proposed_vertical_section: 1_600.0,
    }
}

/// Append rows in order; panics on rejection.
fn build_chain(rows: &[(f64, f64, f64)]) -> SurveyChain {
    let plan = plan();
    let mut chain = SurveyChain::new("REG-01");
    for &(md, inc, azi) in rows {
        chain
            .append(RawSurvey::new(md, inc, azi), &plan)
            .expect("in-order append should succeed");
    }
    chain
}

/// A 12-station build section: near-vertical lead-in, then ~1.5°/100ft
/// toward an azimuth of 175°.
fn build_section_rows() -> Vec<(f64, f64, f64)> {
    vec![
        (500.0, 0.4, 170.0),
        (600.0, 0.5, 182.0),
        (700.0, 0.6, 176.0),
        (800.0, 1.9, 175.2),
        (900.0, 3.4, 175.6),
        (1000.0, 5.1, 176.1),
        (1100.0, 6.8, 175.4),
        (1200.0, 8.3, 175.0),
        (1300.0, 10.1, 175.8),
        (1400.0, 11.9, 176.2),
        (1500.0, 13.4, 175.9),
        (1600.0, 15.2, 175.5),
    ]
}

/// Chain indices stay contiguous and MD-sorted through insert and delete.
#[test]
fn sequence_index_tracks_md_order_through_edits() {
    let plan = plan();
    let mut chain = build_chain(&build_section_rows());

    // Out-of-order arrival lands mid-chain, then an early station is dropped.
    chain
        .insert(RawSurvey::new(1050.0, 6.0, 175.7), &plan)
        .expect("insert should succeed");
    chain.delete(2, &plan).expect("delete should succeed");

    let surveys = chain.surveys();
    assert_eq!(surveys.len(), 12);
    for (i, s) in surveys.iter().enumerate() {
        assert_eq!(s.sequence_index, i + 1, "index gap at md {}", s.md);
    }
    assert!(
        surveys.windows(2).all(|w| w[0].md < w[1].md),
        "md order broken"
    );
}

/// A batch arriving in scrambled MD order derives the same chain as
/// stations appended in measured order.
#[test]
fn shuffled_batch_matches_sequential_build() {
    let plan = plan();
    let rows = build_section_rows();

    let sequential = build_chain(&rows);

    let mut shuffled: Vec<RawSurvey> = rows
        .iter()
        .map(|&(md, inc, azi)| RawSurvey::new(md, inc, azi))
        .collect();
    shuffled.swap(0, 11);
    shuffled.swap(3, 8);
    shuffled.swap(2, 6);

    let mut imported = SurveyChain::new("REG-01");
    let report = imported.import_batch(shuffled, &plan);
    assert_eq!(report.accepted, 12);
    assert!(report.rejected.is_empty());

    assert_eq!(imported.surveys().len(), sequential.surveys().len());
    for (a, b) in imported.surveys().iter().zip(sequential.surveys()) {
        assert_eq!(a.sequence_index, b.sequence_index);
        assert_eq!(a.md, b.md);
        assert_eq!(a.tvd, b.tvd, "tvd diverged at md {}", a.md);
        assert_eq!(a.north_south, b.north_south);
        assert_eq!(a.east_west, b.east_west);
        assert_eq!(a.vertical_section, b.vertical_section);
        assert_eq!(a.dogleg_severity, b.dogleg_severity);
    }
}

/// The first station anchors against the surface: TVD from its own
/// inclination over the full MD run, zero dogleg.
#[test]
fn first_station_anchors_from_surface() {
    let chain = build_chain(&[(1000.0, 60.0, 90.0)]);
    let s = chain.last().expect("one station");

    assert_eq!(s.sequence_index, 1);
    assert_eq!(s.dogleg_severity, 0.0);
    assert!((s.tvd - 500.0).abs() < 1e-9, "got {}", s.tvd);
    // A due-east course builds no northing.
    assert!(s.north_south.abs() < 1e-6, "got {}", s.north_south);
    assert!(s.is_east);
    assert!(
        (s.east_west - 1000.0 * 60.0_f64.to_radians().sin()).abs() < 1e-9,
        "got {}",
        s.east_west
    );

    let verdict = classify(s, None);
    assert_eq!(verdict.status, SurveyStatus::Passed);
    assert_eq!(verdict.trend_description, "N/A - first survey");
}

/// Hand-checked near-vertical pair: Δmd = 100.33 ft gives a build rate and
/// dogleg severity both near 0.93°/100ft.
#[test]
fn near_vertical_pair_worked_example() {
    let chain = build_chain(&[(1250.45, 1.25, 175.82), (1350.78, 2.18, 176.13)]);
    let last = chain.last().expect("two stations");

    assert!(
        (last.dogleg_severity - 0.93).abs() < 0.01,
        "got {}",
        last.dogleg_severity
    );

    let projection = project(chain.surveys(), DEFAULT_PROJECTION_HORIZON_FT);
    assert!(
        (projection.build_rate - 0.9269).abs() < 1e-3,
        "got {}",
        projection.build_rate
    );
    assert!(
        (projection.projected_inc - 3.1069).abs() < 1e-3,
        "got {}",
        projection.projected_inc
    );
    assert!(projection.is_above);
}

/// An append at or behind the current tail MD is rejected and leaves every
/// committed station untouched.
#[test]
fn stale_append_rejected_without_mutation() {
    let plan = plan();
    let mut chain = build_chain(&build_section_rows());
    let before = chain.surveys().to_vec();

    let err = chain
        .append(RawSurvey::new(1600.0, 15.0, 175.0), &plan)
        .expect_err("append at the tail md should be rejected");
    assert!(matches!(
        err,
        SurveyError::OutOfOrder { md, previous_md } if md == 1600.0 && previous_md == 1600.0
    ));
    assert_eq!(chain.surveys(), &before[..]);
}

/// Deleting a mid-chain station closes the index gap and re-derives every
/// later station against its new predecessor.
#[test]
fn delete_recomputes_against_new_predecessor() {
    let plan = plan();
    let rows = build_section_rows();
    let mut chain = build_chain(&rows);

    chain.delete(5, &plan).expect("delete should succeed");

    let mut remaining = rows;
    remaining.remove(4);
    let expected = build_chain(&remaining);

    assert_eq!(chain.surveys().len(), 11);
    for (a, e) in chain.surveys().iter().zip(expected.surveys()) {
        assert_eq!(a.sequence_index, e.sequence_index);
        assert_eq!(a.md, e.md);
        assert_eq!(a.tvd, e.tvd, "tvd diverged at md {}", a.md);
        assert_eq!(a.vertical_section, e.vertical_section);
        assert_eq!(a.dogleg_severity, e.dogleg_severity);
    }
}

/// Three stations building 1.25° → 2.18° → 3.85° over exact 100 ft spacing:
/// the projected inclination is the last station plus the average build rate.
#[test]
fn uniform_build_projects_average_rate() {
    let chain = build_chain(&[
        (1000.0, 1.25, 176.0),
        (1100.0, 2.18, 176.0),
        (1200.0, 3.85, 176.0),
    ]);
    let projection = project(chain.surveys(), DEFAULT_PROJECTION_HORIZON_FT);

    assert!(
        (projection.build_rate - 1.30).abs() < 1e-9,
        "got {}",
        projection.build_rate
    );
    assert!(
        (projection.projected_inc - 5.15).abs() < 1e-9,
        "got {}",
        projection.projected_inc
    );
    assert!(projection.turn_rate.abs() < 1e-9, "got {}", projection.turn_rate);
    assert!(!projection.is_left && !projection.is_right);
}

/// Re-deriving an untouched chain from scratch reproduces every committed
/// field; there is no hidden state in the cascade.
#[test]
fn recompute_from_scratch_is_stable() {
    let plan = plan();
    let mut chain = build_chain(&build_section_rows());
    let before = chain.surveys().to_vec();

    chain.recompute_all(&plan);

    assert_eq!(chain.surveys(), &before[..]);
}

/// The on-target score stays inside [0, 100] for smooth and pathologically
/// crooked chains alike.
#[test]
fn on_target_score_stays_bounded() {
    let plan = plan();

    let smooth = build_chain(&build_section_rows());

    // Alternating 5° and 12° every 50 ft racks up a violation per interval.
    let mut rough_rows = Vec::new();
    for i in 0..24 {
        let md = 1000.0 + i as f64 * 50.0;
        let inc = if i % 2 == 0 { 5.0 } else { 12.0 };
        rough_rows.push((md, inc, 175.0));
    }
    let rough = build_chain(&rough_rows);

    for chain in [&smooth, &rough] {
        let stats = aggregate(chain.surveys(), &plan);
        assert!(
            (0.0..=100.0).contains(&stats.on_target_score),
            "got {}",
            stats.on_target_score
        );
    }

    let rough_stats = aggregate(rough.surveys(), &plan);
    assert_eq!(rough_stats.on_target_score, 0.0);
    assert!(rough_stats.dls_violation_count >= 20, "got {}", rough_stats.dls_violation_count);
}

/// Verdicts over a committed chain: a gentle interval passes, an abrupt
/// dogleg on the final interval fails.
#[test]
fn quality_verdicts_across_committed_chain() {
    let chain = build_chain(&[
        (1000.0, 10.0, 175.0),
        (1100.0, 10.5, 175.3),
        (1200.0, 14.8, 176.0),
    ]);
    let surveys = chain.surveys();

    let second = classify(&surveys[1], Some(&surveys[0]));
    assert_eq!(second.status, SurveyStatus::Passed);

    let third = classify(&surveys[2], Some(&surveys[1]));
    assert_eq!(third.status, SurveyStatus::Failed);
    assert!(
        third.dogleg_description.contains("High"),
        "got {}",
        third.dogleg_description
    );
}

/// End-to-end sanity over a full build section: depth accumulates, every
/// derived field stays finite, and the aggregates agree with the chain.
#[test]
fn build_section_walkthrough_integrity() {
    let plan = plan();
    let chain = build_chain(&build_section_rows());
    let surveys = chain.surveys();

    assert_eq!(surveys[0].dogleg_severity, 0.0);
    for pair in surveys.windows(2) {
        assert!(pair[1].tvd > pair[0].tvd, "tvd stalled at md {}", pair[1].md);
    }
    for s in surveys {
        for v in [
            s.tvd,
            s.north_south,
            s.east_west,
            s.vertical_section,
            s.dogleg_severity,
        ] {
            assert!(v.is_finite(), "non-finite derived value at md {}", s.md);
        }
        assert!(s.dogleg_severity >= 0.0);
    }

    let stats = aggregate(surveys, &plan);
    assert!(stats.max_dls >= stats.avg_dls);
    assert!(stats.tortuosity > 0.0);
    assert_eq!(
        stats.dls_violation_count, 0,
        "a 1.5°/100ft build should stay within limits"
    );
    assert!((0.0..=100.0).contains(&stats.on_target_score));
}
