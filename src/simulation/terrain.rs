//! Procedural terrain
//!
//! The ground is a biased random walk over fixed-width segments. A scalar
//! "slope" state drifts with each new segment, pulled back toward the middle
//! of the screen by a soft mean-reversion term, and a "difficulty" scalar that
//! only ever grows scales how hard the walk can swing.

use anyhow::{ensure, Result};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

use super::config::SimConfig;
use super::segment::Segment;
use super::types::Viewport;

/// Produces new ground segments at the advancing edge
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    last_x: f64,
    last_y: f64,
    slope: f64,
    difficulty: f64,
    difficulty_increment: f64,
    irregularity: f64,
    screen_height: f64,

    /// Optional seeded RNG for reproducible terrain
    rng: Option<StdRng>,
}

impl TerrainGenerator {
    pub fn new(
        config: &SimConfig,
        start_x: f64,
        start_y: f64,
        screen_height: f64,
        rng: Option<StdRng>,
    ) -> Self {
        Self {
            last_x: start_x,
            last_y: start_y,
            slope: 0.0,
            difficulty: config.initial_difficulty,
            difficulty_increment: config.difficulty_increment,
            irregularity: config.irregularity,
            screen_height,
            rng,
        }
    }

    pub fn with_seed(
        config: &SimConfig,
        start_x: f64,
        start_y: f64,
        screen_height: f64,
        seed: u64,
    ) -> Self {
        Self::new(
            config,
            start_x,
            start_y,
            screen_height,
            Some(StdRng::seed_from_u64(seed)),
        )
    }

    /// Uniform sample in [0, 1), using the seeded RNG if available
    fn random_unit(&mut self) -> f64 {
        match &mut self.rng {
            Some(rng) => rng.random::<f64>(),
            None => rand::rng().random::<f64>(),
        }
    }

    /// Append one segment of width `step` after the previous endpoint
    pub fn extend(&mut self, step: f64) -> Segment {
        let r = self.random_unit();
        self.extend_with_sample(r, step)
    }

    /// Same as [`extend`](Self::extend) with the random draw supplied by the caller
    pub fn extend_with_sample(&mut self, r: f64, step: f64) -> Segment {
        let bias = if self.screen_height > 0.0 {
            self.last_y / self.screen_height
        } else {
            0.0
        };
        self.slope = (self.slope + (r - bias) * self.difficulty).clamp(-1.0, 1.0);

        let rise = self.slope * self.slope.abs().powf(self.irregularity) * step;
        let new_y = self.last_y + rise.round();
        let segment = Segment::new(self.last_x, self.last_y, self.last_x + step, new_y);

        self.last_x += step;
        self.last_y = new_y;
        self.difficulty += self.difficulty_increment;
        segment
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    pub fn last_endpoint(&self) -> (f64, f64) {
        (self.last_x, self.last_y)
    }
}

/// The retained window of ground, oldest segment first
#[derive(Debug, Clone)]
pub struct Terrain {
    segments: VecDeque<Segment>,
    generator: TerrainGenerator,
    step: f64,
    max_segments: usize,
    /// Camera position that triggered the most recent extension
    farthest_camera_x: f64,
}

/// Upper bound on segments generated for one screen width
pub const MAX_SEGMENTS_PER_SCREEN: usize = 100_000;

/// Number of whole segments across the viewport, rejecting windows too wide to fill
fn segments_per_screen(config: &SimConfig, viewport: Viewport) -> Result<usize> {
    ensure!(
        !viewport.is_degenerate(),
        "Viewport must have positive finite size, got {}x{}",
        viewport.width,
        viewport.height
    );
    ensure!(
        config.terrain_step.is_finite() && config.terrain_step > 0.0,
        "terrain_step must be positive, got {}",
        config.terrain_step
    );
    let per_screen = (viewport.width / config.terrain_step).floor();
    ensure!(
        per_screen <= MAX_SEGMENTS_PER_SCREEN as f64,
        "A {} wide screen needs {} segments of width {}, more than the limit of {}",
        viewport.width,
        per_screen,
        config.terrain_step,
        MAX_SEGMENTS_PER_SCREEN
    );
    Ok(per_screen as usize)
}

impl Terrain {
    /// Fill the first screen, starting at the left edge halfway down
    pub fn new(config: &SimConfig, viewport: Viewport, rng: Option<StdRng>) -> Result<Self> {
        let per_screen = segments_per_screen(config, viewport)?;
        let step = config.terrain_step;
        let generator = TerrainGenerator::new(config, 0.0, viewport.height / 2.0, viewport.height, rng);
        let mut terrain = Self {
            segments: VecDeque::new(),
            generator,
            step,
            max_segments: per_screen.saturating_mul(config.retention_screens).max(1),
            farthest_camera_x: 0.0,
        };

        let initial = ((viewport.width + step) / step).floor() as usize;
        for _ in 0..initial {
            let segment = terrain.generator.extend(step);
            terrain.segments.push_back(segment);
        }
        debug!(
            "Generated {} initial terrain segments up to x={}",
            terrain.segments.len(),
            terrain.generator.last_endpoint().0
        );
        Ok(terrain)
    }

    /// Build terrain from existing segments, e.g. a hand-made test track.
    /// Segments must run left to right and join end to end. Generation
    /// past the end of the track draws from `rng` when given.
    pub fn from_segments(
        config: &SimConfig,
        viewport: Viewport,
        segments: impl IntoIterator<Item = Segment>,
        rng: Option<StdRng>,
    ) -> Result<Self> {
        let per_screen = segments_per_screen(config, viewport)?;
        let segments: VecDeque<Segment> = segments.into_iter().collect();

        for (index, segment) in segments.iter().enumerate() {
            ensure!(
                [segment.x1, segment.y1, segment.x2, segment.y2]
                    .iter()
                    .all(|v| v.is_finite()),
                "Track segment {index} has a non-finite endpoint: {segment:?}"
            );
            ensure!(
                segment.x2 > segment.x1,
                "Track segment {index} must run left to right, got x1={} x2={}",
                segment.x1,
                segment.x2
            );
        }
        for (index, (prev, next)) in segments.iter().zip(segments.iter().skip(1)).enumerate() {
            ensure!(
                next.x1 == prev.x2 && next.y1 == prev.y2,
                "Track segment {} starts at ({}, {}) but segment {} ends at ({}, {})",
                index + 1,
                next.x1,
                next.y1,
                index,
                prev.x2,
                prev.y2
            );
        }

        let (start_x, start_y) = segments
            .back()
            .map(|s| (s.x2, s.y2))
            .unwrap_or((0.0, viewport.height / 2.0));
        let step = config.terrain_step;
        Ok(Self {
            max_segments: per_screen
                .saturating_mul(config.retention_screens)
                .max(1)
                .max(segments.len()),
            segments,
            generator: TerrainGenerator::new(config, start_x, start_y, viewport.height, rng),
            step,
            // Generation resumes once the camera nears the end of the supplied track
            farthest_camera_x: start_x - viewport.width - step,
        })
    }

    /// Extend until the ground has caught up with the camera.
    /// Returns the number of segments appended.
    pub fn advance_to(&mut self, camera_x: f64) -> usize {
        let mut added = 0;
        while camera_x > self.farthest_camera_x {
            self.farthest_camera_x += self.step;
            let segment = self.generator.extend(self.step);
            self.segments.push_back(segment);
            added += 1;
        }
        if added > 0 {
            debug!(
                "Extended terrain by {} segment(s), difficulty now {:.3}",
                added,
                self.generator.difficulty()
            );
        }
        added
    }

    /// Evict old segments from the front while over capacity. Nothing ending at
    /// or right of `keep_from_x` is removed. Returns the number evicted.
    pub fn prune(&mut self, keep_from_x: f64) -> usize {
        let mut removed = 0;
        while self.segments.len() > self.max_segments {
            match self.segments.front() {
                Some(front) if front.max_x() < keep_from_x => {
                    self.segments.pop_front();
                    removed += 1;
                }
                Some(front) => {
                    warn!(
                        "Terrain over capacity ({} > {}) but segment ending at x={} still supports a wheel",
                        self.segments.len(),
                        self.max_segments,
                        front.max_x()
                    );
                    break;
                }
                None => break,
            }
        }
        removed
    }

    pub fn segments(&self) -> &VecDeque<Segment> {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn max_segments(&self) -> usize {
        self.max_segments
    }

    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    /// Ground height under `x`, if any retained segment spans it
    pub fn height_at(&self, x: f64) -> Option<f64> {
        self.segments.iter().find_map(|s| s.height_at(x))
    }
}
