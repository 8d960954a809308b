//! Main simulation world that ties everything together
//!
//! This is the entry point for running the vehicle simulation
//! without any Bevy dependencies.

use anyhow::{bail, ensure, Context, Result};
use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::SimConfig;
use super::coupling::{self, WheelPair};
use super::segment::Segment;
use super::terrain::Terrain;
use super::types::{CameraOffset, DriveInput, ScreenCircle, Viewport, WheelId};
use super::wheel::Wheel;

/// Starting layout of the default vehicle
pub const DEFAULT_SPAWN_X: f64 = 100.0;
pub const DEFAULT_SPAWN_Y: f64 = 300.0;
pub const DEFAULT_WHEELBASE: f64 = 100.0;
pub const DEFAULT_WHEEL_RADIUS: f64 = 20.0;

/// A settled copy of everything a renderer needs
#[derive(Debug, Clone)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub viewport: Viewport,
    pub camera: CameraOffset,
    pub segments: Vec<Segment>,
    pub wheels: Vec<Wheel>,
}

impl WorldSnapshot {
    /// Screen endpoints of every segment on screen
    pub fn visible_segments(&self) -> Vec<[i32; 4]> {
        self.segments
            .iter()
            .filter_map(|s| s.query_bounds(0.0, 0.0, self.viewport.width, self.viewport.height, self.camera))
            .collect()
    }

    /// Screen circles of every wheel on screen
    pub fn visible_wheels(&self) -> Vec<(WheelId, ScreenCircle)> {
        self.wheels
            .iter()
            .enumerate()
            .filter_map(|(i, w)| {
                w.query_bounds(0.0, 0.0, self.viewport.width, self.viewport.height, self.camera)
                    .map(|c| (WheelId(i), c))
            })
            .collect()
    }
}

/// The main simulation world
#[derive(Clone)]
pub struct SimWorld {
    config: SimConfig,
    viewport: Viewport,

    /// Ground, oldest segment first
    pub terrain: Terrain,

    /// Wheel arena; a `WheelId` is an index into it
    wheels: Vec<Wheel>,

    /// Couplings between wheels in the arena
    pairs: Vec<WheelPair>,

    camera_x: f64,
    camera_y: f64,

    /// Ticks simulated so far
    pub ticks: u64,
}

impl SimWorld {
    fn new_internal(config: SimConfig, viewport: Viewport, terrain: Terrain) -> Self {
        Self {
            config,
            viewport,
            terrain,
            wheels: Vec::new(),
            pairs: Vec::new(),
            camera_x: 0.0,
            camera_y: 0.0,
            ticks: 0,
        }
    }

    fn check_setup(config: &SimConfig, viewport: Viewport) -> Result<()> {
        config.validate().context("Invalid simulation config")?;
        ensure!(
            !viewport.is_degenerate(),
            "Viewport must have positive finite size, got {}x{}",
            viewport.width,
            viewport.height
        );
        Ok(())
    }

    /// Create a world over freshly generated terrain
    pub fn new(config: SimConfig, viewport: Viewport) -> Result<Self> {
        Self::check_setup(&config, viewport)?;
        let terrain = Terrain::new(&config, viewport, None).context("Failed to generate terrain")?;
        Ok(Self::new_internal(config, viewport, terrain))
    }

    /// Create a world with a seeded RNG for reproducible terrain
    pub fn new_with_seed(config: SimConfig, viewport: Viewport, seed: u64) -> Result<Self> {
        Self::check_setup(&config, viewport)?;
        let terrain = Terrain::new(&config, viewport, Some(StdRng::seed_from_u64(seed)))
            .context("Failed to generate terrain")?;
        Ok(Self::new_internal(config, viewport, terrain))
    }

    /// Create a world over a fixed track
    pub fn with_track(
        config: SimConfig,
        viewport: Viewport,
        segments: impl IntoIterator<Item = Segment>,
    ) -> Result<Self> {
        Self::track_world(config, viewport, segments, None)
    }

    /// Create a world over a fixed track, seeding the terrain generated past its end
    pub fn with_track_and_seed(
        config: SimConfig,
        viewport: Viewport,
        segments: impl IntoIterator<Item = Segment>,
        seed: u64,
    ) -> Result<Self> {
        Self::track_world(config, viewport, segments, Some(StdRng::seed_from_u64(seed)))
    }

    fn track_world(
        config: SimConfig,
        viewport: Viewport,
        segments: impl IntoIterator<Item = Segment>,
        rng: Option<StdRng>,
    ) -> Result<Self> {
        Self::check_setup(&config, viewport)?;
        let terrain = Terrain::from_segments(&config, viewport, segments, rng).context("Invalid track")?;
        Ok(Self::new_internal(config, viewport, terrain))
    }

    /// Generated terrain with one vehicle dropped near the left edge
    pub fn create_default_world(config: SimConfig, viewport: Viewport, seed: Option<u64>) -> Result<Self> {
        let mut world = match seed {
            Some(seed) => Self::new_with_seed(config, viewport, seed)?,
            None => Self::new(config, viewport)?,
        };
        world.spawn_vehicle(
            DEFAULT_SPAWN_X,
            DEFAULT_SPAWN_Y,
            DEFAULT_WHEELBASE,
            DEFAULT_WHEEL_RADIUS,
        )?;
        Ok(world)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Add a free wheel to the arena
    pub fn add_wheel(&mut self, x: f64, y: f64, radius: f64) -> Result<WheelId> {
        let wheel = Wheel::new(x, y, radius)?;
        let id = WheelId(self.wheels.len());
        self.wheels.push(wheel);
        Ok(id)
    }

    /// Couple `partner` to `root`. The rest length is their current distance.
    pub fn attach(&mut self, root: WheelId, partner: WheelId) -> Result<()> {
        ensure!(root != partner, "Cannot attach wheel {:?} to itself", root);
        let root_wheel = self.wheels.get(root.0).context("Root wheel not found")?;
        let partner_wheel = self.wheels.get(partner.0).context("Partner wheel not found")?;

        if self.pairs.iter().any(|p| p.involves(partner)) {
            bail!("Wheel {:?} is already part of a pair", partner);
        }
        if self.pairs.iter().any(|p| p.partner == root) {
            bail!("Wheel {:?} is already a partner and cannot become a root", root);
        }

        let pair = WheelPair::attach(root, partner, root_wheel, partner_wheel);
        debug!(
            "Attached wheel {:?} to root {:?} with rest length {:.2}",
            partner, root, pair.rest_length()
        );
        self.pairs.push(pair);
        self.wheels[root.0].mark_root();
        Ok(())
    }

    /// Two wheels `wheelbase` apart, the rear one acting as root
    pub fn spawn_vehicle(&mut self, x: f64, y: f64, wheelbase: f64, radius: f64) -> Result<(WheelId, WheelId)> {
        let rear = self.add_wheel(x, y, radius)?;
        let front = self.add_wheel(x + wheelbase, y, radius)?;
        self.attach(rear, front)?;
        info!("Spawned vehicle at ({x}, {y}) with wheels {:?} and {:?}", rear, front);
        Ok((rear, front))
    }

    pub fn wheel(&self, id: WheelId) -> Option<&Wheel> {
        self.wheels.get(id.0)
    }

    /// Mutable access for setting up scenarios between ticks
    pub fn wheel_mut(&mut self, id: WheelId) -> Option<&mut Wheel> {
        self.wheels.get_mut(id.0)
    }

    pub fn wheels(&self) -> &[Wheel] {
        &self.wheels
    }

    pub fn pairs(&self) -> &[WheelPair] {
        &self.pairs
    }

    /// Offset that maps world coordinates onto the screen
    pub fn camera_offset(&self) -> CameraOffset {
        CameraOffset::new(-self.camera_x, self.camera_y)
    }

    fn update_camera(&mut self) {
        if self.wheels.is_empty() {
            return;
        }
        let count = self.wheels.len() as f64;
        let mean_x = self.wheels.iter().map(|w| w.x).sum::<f64>() / count;
        let mean_y = self.wheels.iter().map(|w| w.y).sum::<f64>() / count;
        self.camera_x = mean_x - self.config.camera_lead;
        self.camera_y = -mean_y + self.viewport.height / 2.0;
    }

    /// Left edge of the leftmost wheel; terrain right of this must survive pruning
    fn leftmost_wheel_edge(&self) -> Option<f64> {
        self.wheels.iter().map(|w| w.x - w.radius()).reduce(f64::min)
    }

    /// Advance the simulation by one fixed tick
    pub fn tick(&mut self, input: DriveInput) {
        self.ticks += 1;

        self.update_camera();
        self.terrain.advance_to(self.camera_x);
        if let Some(edge) = self.leftmost_wheel_edge() {
            let removed = self.terrain.prune(edge);
            if removed > 0 {
                debug!("Pruned {} terrain segment(s)", removed);
            }
        }

        for index in 0..self.wheels.len() {
            let wheel = &mut self.wheels[index];
            wheel.begin_tick();
            wheel.integrate(&self.config);
            wheel.collide(self.terrain.segments(), input, &self.config);
            if wheel.took_damage {
                info!(
                    "Wheel {} took a hard landing at ({:.1}, {:.1})",
                    index, wheel.x, wheel.y
                );
            }

            self.update_pairs(WheelId(index), input);
        }
    }

    /// Tilt and spring work for every pair rooted at `root`
    fn update_pairs(&mut self, root: WheelId, input: DriveInput) {
        let mut rotated = false;
        for pair_index in 0..self.pairs.len() {
            let pair = self.pairs[pair_index];
            if pair.root != root {
                continue;
            }
            let Some((root_wheel, partner_wheel)) = wheel_pair_mut(&mut self.wheels, pair.root, pair.partner) else {
                error!("Pair {:?} refers to a missing wheel", pair);
                debug_assert!(false, "pair {pair:?} refers to a missing wheel");
                continue;
            };

            // The root's tilt turns the body about its first partner only
            if !rotated {
                root_wheel.update_tilt(input, &self.config);
                let omega = root_wheel.omega;
                coupling::rotate_about_center(root_wheel, partner_wheel, omega);
                rotated = true;
            }
        }

        for pair_index in 0..self.pairs.len() {
            let pair = self.pairs[pair_index];
            if pair.root != root {
                continue;
            }
            if let Some((root_wheel, partner_wheel)) = wheel_pair_mut(&mut self.wheels, pair.root, pair.partner) {
                coupling::apply_spring(root_wheel, partner_wheel, pair.rest_length(), &self.config);
            }
        }
    }

    /// Copy of the settled state for renderers
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.ticks,
            viewport: self.viewport,
            camera: self.camera_offset(),
            segments: self.terrain.segments().iter().copied().collect(),
            wheels: self.wheels.clone(),
        }
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Vehicle Simulation Summary ===");
        println!("Tick: {}", self.ticks);
        println!(
            "Terrain segments: {}/{}, difficulty: {:.3}, slope: {:.3}",
            self.terrain.len(),
            self.terrain.max_segments(),
            self.terrain.generator().difficulty(),
            self.terrain.generator().slope()
        );
        for (index, wheel) in self.wheels.iter().enumerate() {
            println!(
                "  Wheel {}: position=({:.1}, {:.1}), velocity=({:.2}, {:.2}){}{}",
                index,
                wheel.x,
                wheel.y,
                wheel.vx,
                wheel.vy,
                if wheel.is_root() {
                    format!(", angle={:.3}, omega={:.4}", wheel.angle, wheel.omega)
                } else {
                    String::new()
                },
                if wheel.damage_cooldown_ticks > 0 {
                    format!(", cooldown={}", wheel.damage_cooldown_ticks)
                } else {
                    String::new()
                }
            );
        }
        for pair in &self.pairs {
            if let (Some(a), Some(b)) = (self.wheel(pair.root), self.wheel(pair.partner)) {
                println!(
                    "  Pair {:?}-{:?}: separation={:.2}, rest={:.2}",
                    pair.root.0,
                    pair.partner.0,
                    coupling::separation(a, b),
                    pair.rest_length()
                );
            }
        }
    }

    /// Draw the visible terrain and wheels in the terminal
    pub fn draw_profile(&self) {
        const COLUMNS: usize = 80;
        const ROWS: usize = 20;

        let offset = self.camera_offset();
        let cell_w = self.viewport.width / COLUMNS as f64;
        let cell_h = self.viewport.height / ROWS as f64;
        let mut grid = vec![vec![' '; COLUMNS]; ROWS];

        for col in 0..COLUMNS {
            let world_x = (col as f64 + 0.5) * cell_w - offset.x;
            let Some(ground) = self.terrain.height_at(world_x) else {
                continue;
            };
            let screen_y = ground + offset.y;
            let first = (screen_y / cell_h).floor().max(0.0) as usize;
            for row in grid.iter_mut().skip(first) {
                row[col] = '#';
            }
        }

        for circle in self.snapshot().visible_wheels().into_iter().map(|(_, c)| c) {
            let col = (circle.x as f64 / cell_w).floor();
            let row = (circle.y as f64 / cell_h).floor();
            if (0.0..COLUMNS as f64).contains(&col) && (0.0..ROWS as f64).contains(&row) {
                grid[row as usize][col as usize] = 'O';
            }
        }

        println!("+{}+", "-".repeat(COLUMNS));
        for row in grid {
            println!("|{}|", row.into_iter().collect::<String>());
        }
        println!("+{}+", "-".repeat(COLUMNS));
    }
}

/// Two distinct mutable wheels out of the arena
fn wheel_pair_mut(wheels: &mut [Wheel], a: WheelId, b: WheelId) -> Option<(&mut Wheel, &mut Wheel)> {
    if a == b || a.0 >= wheels.len() || b.0 >= wheels.len() {
        return None;
    }
    if a.0 < b.0 {
        let (low, high) = wheels.split_at_mut(b.0);
        Some((&mut low[a.0], &mut high[0]))
    } else {
        let (low, high) = wheels.split_at_mut(a.0);
        Some((&mut high[0], &mut low[b.0]))
    }
}
