//! Terrain generation and retention tests

use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use hill_drive::simulation::{Segment, SimConfig, Terrain, TerrainGenerator, Viewport};

fn assert_contiguous(segments: &[Segment]) {
    for window in segments.windows(2) {
        let (prev, next) = (&window[0], &window[1]);
        assert_eq!(prev.x2, next.x1, "Segments must share endpoints");
        assert_eq!(prev.y2, next.y1, "Segments must share endpoints");
        assert!(next.x2 > next.x1, "Segments must run left to right");
    }
}

#[test]
fn test_neutral_sample_keeps_ground_level() {
    let config = SimConfig::default();
    let mut generator = TerrainGenerator::new(&config, 0.0, 360.0, 720.0, None);

    // Halfway down the screen a draw of 0.5 has no bias at all
    let segment = generator.extend_with_sample(0.5, 20.0);
    assert_eq!(segment, Segment::new(0.0, 360.0, 20.0, 360.0));
    assert_eq!(generator.slope(), 0.0);
    assert_eq!(generator.last_endpoint(), (20.0, 360.0));
    assert_abs_diff_eq!(generator.difficulty(), 0.011, epsilon = 1e-12);
}

#[test]
fn test_slope_is_clamped() {
    let config = SimConfig {
        initial_difficulty: 10.0,
        ..SimConfig::default()
    };
    let mut generator = TerrainGenerator::new(&config, 0.0, 360.0, 720.0, None);

    // A huge positive swing saturates at +1, giving a full step of rise
    let up = generator.extend_with_sample(0.99, 20.0);
    assert_eq!(generator.slope(), 1.0);
    assert_eq!(up.y2, 380.0);

    // And a huge negative swing saturates at -1
    let down = generator.extend_with_sample(0.0, 20.0);
    assert_eq!(generator.slope(), -1.0);
    assert_eq!(down.y2, 360.0);
}

#[test]
fn test_heights_are_whole_numbers() {
    let config = SimConfig::default();
    let mut generator = TerrainGenerator::with_seed(&config, 0.0, 360.0, 720.0, 11);
    for _ in 0..500 {
        let segment = generator.extend(config.terrain_step);
        assert_eq!(segment.y2.fract(), 0.0);
    }
}

#[test]
fn test_difficulty_never_decreases() {
    let config = SimConfig::default();
    let mut generator = TerrainGenerator::with_seed(&config, 0.0, 360.0, 720.0, 3);
    let mut previous = generator.difficulty();
    for _ in 0..1000 {
        generator.extend(config.terrain_step);
        assert!(generator.difficulty() > previous);
        previous = generator.difficulty();
    }

    let flat_config = SimConfig {
        difficulty_increment: 0.0,
        ..SimConfig::default()
    };
    let mut generator = TerrainGenerator::with_seed(&flat_config, 0.0, 360.0, 720.0, 3);
    for _ in 0..100 {
        generator.extend(flat_config.terrain_step);
        assert_eq!(generator.difficulty(), flat_config.initial_difficulty);
    }
}

#[test]
fn test_generated_segments_are_contiguous() {
    let config = SimConfig::default();
    let mut generator = TerrainGenerator::with_seed(&config, 0.0, 360.0, 720.0, 42);
    let segments: Vec<Segment> = (0..300).map(|_| generator.extend(config.terrain_step)).collect();
    assert_contiguous(&segments);
    assert!(generator.slope().abs() <= 1.0);
}

#[test]
fn test_endpoints_lie_on_their_line() {
    let config = SimConfig::default();
    let mut generator = TerrainGenerator::with_seed(&config, 0.0, 360.0, 720.0, 5);
    for _ in 0..300 {
        let segment = generator.extend(config.terrain_step);
        let start = segment.distance_to(segment.x1, segment.y1).unwrap();
        let end = segment.distance_to(segment.x2, segment.y2).unwrap();
        assert_abs_diff_eq!(start, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(end, 0.0, epsilon = 1e-9);
    }
}

#[test]
fn test_initial_terrain_fills_the_screen() {
    let config = SimConfig::default();
    let viewport = Viewport::new(1280.0, 720.0);
    let terrain = Terrain::new(&config, viewport, Some(StdRng::seed_from_u64(1))).unwrap();

    assert_eq!(terrain.len(), 65);
    let first = terrain.segments().front().unwrap();
    assert_eq!((first.x1, first.y1), (0.0, 360.0));
    assert_eq!(terrain.segments().back().unwrap().x2, 1300.0);
    assert_eq!(terrain.max_segments(), 192);

    let segments: Vec<Segment> = terrain.segments().iter().copied().collect();
    assert_contiguous(&segments);
}

#[test]
fn test_same_seed_same_terrain() {
    let config = SimConfig::default();
    let viewport = Viewport::default();
    let a = Terrain::new(&config, viewport, Some(StdRng::seed_from_u64(99))).unwrap();
    let b = Terrain::new(&config, viewport, Some(StdRng::seed_from_u64(99))).unwrap();
    assert_eq!(a.segments(), b.segments());
}

#[test]
fn test_advance_follows_camera() {
    let config = SimConfig::default();
    let mut terrain = Terrain::new(&config, Viewport::default(), Some(StdRng::seed_from_u64(2))).unwrap();
    let initial = terrain.len();

    assert_eq!(terrain.advance_to(0.0), 0);
    assert_eq!(terrain.advance_to(45.0), 3);
    assert_eq!(terrain.advance_to(45.0), 0);
    assert_eq!(terrain.len(), initial + 3);
    assert_eq!(terrain.segments().back().unwrap().x2, 1360.0);
}

#[test]
fn test_prune_respects_capacity() {
    let config = SimConfig::default();
    let mut terrain = Terrain::new(&config, Viewport::default(), Some(StdRng::seed_from_u64(4))).unwrap();
    terrain.advance_to(5000.0);
    assert_eq!(terrain.len(), 315);

    let removed = terrain.prune(f64::INFINITY);
    assert_eq!(removed, 315 - 192);
    assert_eq!(terrain.len(), terrain.max_segments());

    // Under capacity nothing more goes
    assert_eq!(terrain.prune(f64::INFINITY), 0);
}

#[test]
fn test_prune_keeps_supporting_segments() {
    let config = SimConfig::default();
    let mut terrain = Terrain::new(&config, Viewport::default(), Some(StdRng::seed_from_u64(4))).unwrap();
    terrain.advance_to(5000.0);

    // A wheel whose left edge is at x=100 still needs the segment spanning it
    let removed = terrain.prune(100.0);
    assert_eq!(removed, 4);
    assert!(terrain.segments().iter().any(|s| s.contains_x(100.0)));
    assert_eq!(terrain.segments().front().unwrap().x1, 80.0);
}

#[test]
fn test_hand_made_track_is_kept_whole() {
    let config = SimConfig::default();
    let track = vec![
        Segment::new(-1000.0, 0.0, 0.0, 0.0),
        Segment::new(0.0, 0.0, 1000.0, -100.0),
    ];
    let mut terrain = Terrain::from_segments(&config, Viewport::default(), track.clone(), None).unwrap();
    assert_eq!(terrain.prune(f64::INFINITY), 0);
    assert_eq!(terrain.segments().iter().copied().collect::<Vec<_>>(), track);
    assert_eq!(terrain.height_at(500.0), Some(-50.0));
    assert_eq!(terrain.height_at(2000.0), None);
}

#[test]
fn test_capacity_saturates_instead_of_overflowing() {
    let config = SimConfig {
        retention_screens: usize::MAX,
        ..SimConfig::default()
    };
    let terrain = Terrain::new(&config, Viewport::default(), Some(StdRng::seed_from_u64(6))).unwrap();
    assert_eq!(terrain.max_segments(), usize::MAX);
    assert_eq!(terrain.len(), 65);
}

#[test]
fn test_unfillable_screen_is_rejected() {
    let config = SimConfig::default();
    assert!(Terrain::new(&config, Viewport::new(f64::INFINITY, 720.0), None).is_err());
    assert!(Terrain::from_segments(&config, Viewport::new(1e300, 720.0), Vec::new(), None).is_err());
}
