use approx::assert_relative_eq;
use decaytrack_actions::{
    Action, ActionChain, ActionRegistry, ActionStatus, CorrelateConfig, CorrelateImplantDecay,
    Correlation, RejectReason,
};
use decaytrack_core::{Cluster, EventRecord, Line, MergerData, TpcData, Voxel, XyzPoint};
use serde_json::json;

// Straight track with voxels deliberately stored out of order
fn track(id: i32, from: XyzPoint, to: XyzPoint) -> Cluster {
    let voxels = [0.75, 0.0, 1.0, 0.25, 0.5]
        .iter()
        .map(|&t| Voxel::new(from + (to - from) * t, 10.0))
        .collect();
    Cluster::new(id, Line::new(from, to - from), voxels)
}

fn beam() -> Cluster {
    track(0, XyzPoint::new(0.0, 0.0, -40.0), XyzPoint::new(0.0, 0.0, 10.0)).with_beam_like(true)
}

fn decay_at(id: i32, x: f64) -> Cluster {
    track(
        id,
        XyzPoint::new(x, 0.0, -5.0),
        XyzPoint::new(x + 30.0, 12.0, -5.0),
    )
}

fn correlator(threshold: f64) -> CorrelateImplantDecay {
    CorrelateImplantDecay::new(CorrelateConfig::new(threshold))
}

#[test]
fn test_no_clusters_rejected() {
    let mut tpc = TpcData::default();
    let result = correlator(1.0).apply(&mut tpc);
    assert_eq!(result, Correlation::Rejected(RejectReason::NoClusters));
    assert!(tpc.clusters.is_empty());
}

#[test]
fn test_single_cluster_rejected() {
    let mut tpc = TpcData::new(vec![beam()]);
    let result = correlator(1.0).apply(&mut tpc);
    assert_eq!(result, Correlation::Rejected(RejectReason::SingleCluster));
    assert!(tpc.clusters.is_empty());
}

#[test]
fn test_no_beam_like_rejected() {
    let mut tpc = TpcData::new(vec![decay_at(1, 0.5), decay_at(2, 0.2)]);
    let result = correlator(1.0).apply(&mut tpc);
    assert_eq!(result, Correlation::Rejected(RejectReason::NoBeamLike));
    assert!(tpc.clusters.is_empty());
}

#[test]
fn test_multiple_beam_like_rejected() {
    let mut second_beam = beam();
    second_beam.id = 5;
    let mut tpc = TpcData::new(vec![beam(), second_beam, decay_at(1, 0.5)]);
    let result = correlator(1.0).apply(&mut tpc);
    assert_eq!(result, Correlation::Rejected(RejectReason::MultipleBeamLike(2)));
    assert!(tpc.clusters.is_empty());
}

#[test]
fn test_empty_beam_rejected() {
    let empty_beam = Cluster::new(0, Line::default(), Vec::new()).with_beam_like(true);
    let mut tpc = TpcData::new(vec![empty_beam, decay_at(1, 0.5)]);
    let result = correlator(1.0).apply(&mut tpc);
    assert_eq!(result, Correlation::Rejected(RejectReason::EmptyBeam));
    assert!(tpc.clusters.is_empty());
}

#[test]
fn test_reaction_points_rejected_regardless_of_geometry() {
    let mut tpc = TpcData::new(vec![beam(), decay_at(1, 0.0)]);
    tpc.rps.push(XyzPoint::new(0.0, 0.0, 10.0));
    let result = correlator(100.0).apply(&mut tpc);
    assert_eq!(result, Correlation::Rejected(RejectReason::ReactionPoints(1)));
    assert!(tpc.clusters.is_empty());
    assert_eq!(tpc.rps.len(), 1);
}

#[test]
fn test_decay_within_threshold_accepted() {
    let mut tpc = TpcData::new(vec![beam(), decay_at(1, 0.5)]);
    let before = tpc.clone();

    let result = correlator(1.0).apply(&mut tpc);
    let decay = result.decay().copied().unwrap();

    assert_eq!(decay.decay_index, 1);
    assert_relative_eq!(decay.lxy, 0.5, epsilon = 1e-9);
    assert_relative_eq!(decay.beam_end.z, 10.0, epsilon = 1e-9);
    assert_relative_eq!(decay.decay_start.z, -5.0, epsilon = 1e-9);
    assert_relative_eq!(decay.dz(), 15.0, epsilon = 1e-9);
    // Accepted events are not reordered or re-sorted
    assert_eq!(tpc, before);
}

#[test]
fn test_decay_outside_threshold_rejected() {
    let mut tpc = TpcData::new(vec![beam(), decay_at(1, 0.5)]);
    let result = correlator(0.1).apply(&mut tpc);
    assert_eq!(result, Correlation::Rejected(RejectReason::NoDecay));
    assert!(tpc.clusters.is_empty());
}

#[test]
fn test_last_qualifying_candidate_wins() {
    // Cluster 1 is closer, cluster 2 comes later in the list
    let mut tpc = TpcData::new(vec![
        beam(),
        decay_at(1, 0.1),
        decay_at(2, 0.8),
        decay_at(3, 4.0),
    ]);
    let result = correlator(1.0).apply(&mut tpc);
    let decay = result.decay().unwrap();
    assert_eq!(decay.decay_index, 2);
    assert_relative_eq!(decay.lxy, 0.8, epsilon = 1e-9);
    assert_eq!(tpc.clusters.len(), 4);
}

#[test]
fn test_beam_position_in_list_does_not_matter() {
    let mut tpc = TpcData::new(vec![decay_at(1, 0.5), beam()]);
    let result = correlator(1.0).apply(&mut tpc);
    assert_eq!(result.decay().map(|d| d.decay_index), Some(0));
}

#[test]
fn test_disabled_action_leaves_event_untouched() {
    let mut action = CorrelateImplantDecay::new(CorrelateConfig::new(1.0).with_enabled(false));
    let mut tpc = TpcData::new(vec![beam()]);
    assert_eq!(action.run(&mut tpc), ActionStatus::Skipped);
    assert_eq!(tpc.clusters.len(), 1);
}

#[test]
fn test_action_status() {
    let mut action = correlator(1.0);
    let mut good = TpcData::new(vec![beam(), decay_at(1, 0.5)]);
    let mut bad = TpcData::new(vec![beam(), decay_at(1, 3.0)]);
    assert_eq!(action.run(&mut good), ActionStatus::Kept);
    assert_eq!(action.run(&mut bad), ActionStatus::Cleared);
}

#[test]
fn test_chain_over_events() {
    let registry = ActionRegistry::default();
    let config = json!({
        "CorrelateImplantDecay": { "IsEnabled": true, "MinLength": 1.0, "IsVerbose": true }
    });
    let mut chain = ActionChain::from_config(&registry, &config).unwrap();
    chain.set_verbose(false);

    let mut events = vec![
        EventRecord::new(
            MergerData::new(129, 0),
            TpcData::new(vec![beam(), decay_at(1, 0.5)]),
        ),
        EventRecord::new(
            MergerData::new(129, 1),
            TpcData::new(vec![beam(), decay_at(1, 2.0)]),
        ),
        EventRecord::new(MergerData::new(129, 2), TpcData::new(vec![beam()])),
    ];

    let stats = chain.run_all(events.iter_mut());
    assert_eq!(stats.events, 3);
    assert_eq!(stats.kept, 1);
    assert_eq!(stats.cleared, 2);
    assert!(!events[0].tpc.is_empty());
    assert!(events[1].tpc.is_empty());
    assert!(events[2].tpc.is_empty());
}
