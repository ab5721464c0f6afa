//! Sprite-strip animation driven by integer tick counters.
//!
//! A sprite sheet is laid out as horizontal strips: every row holds the frames
//! of one animation, all of the same size. A [`Cycle`] describes one strip and
//! remembers which frame it is showing. The [`Animator`] owns the cycles of
//! one entity plus a single tick counter shared by whichever cycle is active.
//!
//! Timing is counted in ticks (one call to [`Animator::step`] per fixed
//! simulation step), not in wall-clock time, so playback is identical on every
//! machine regardless of frame rate.
//!
//! The advance test is a strict `ticks > speed` and runs before the counter is
//! incremented. After a selection the first advance therefore lands on tick
//! `speed + 2`; later advances come every `speed + 1` ticks.

use crate::object::{Object, TextureKey, TextureLoader};
use crate::rect::Rect;

/// Index of a registered cycle. Ids are handed out in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CycleId(pub usize);

/// One horizontal strip in a sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cycle {
    /// Zero-based strip row.
    pub row: i32,
    pub frame_width: i32,
    pub frame_height: i32,
    pub frame_count: i32,
    /// Ticks to hold a frame before advancing (see module docs for the exact rule).
    pub speed: i32,
    pub current_frame: i32,
}

impl Cycle {
    /// Source crop of the frame this cycle is currently showing.
    pub fn source_rect(&self) -> Rect {
        Rect::new(
            self.frame_width.wrapping_mul(self.current_frame),
            self.frame_height.wrapping_mul(self.row),
            self.frame_width,
            self.frame_height,
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct Animator {
    cycles: Vec<Cycle>,
    active: Option<CycleId>,
    ticks_since_last_frame: i32,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a strip and return its id. `row` is one-based, matching how rows
    /// are counted when looking at a sheet; it is stored zero-based. Inputs
    /// are not validated, so odd sizes show up as odd rectangles. Rect
    /// arithmetic wraps like C `int` instead of panicking.
    pub fn register_cycle(
        &mut self,
        row: i32,
        frame_width: i32,
        frame_height: i32,
        frame_count: i32,
        speed: i32,
    ) -> CycleId {
        self.cycles.push(Cycle {
            row: row.wrapping_sub(1),
            frame_width,
            frame_height,
            frame_count,
            speed,
            current_frame: 0,
        });
        CycleId(self.cycles.len() - 1)
    }

    /// Make `id` the active cycle, restarting it from its first frame.
    pub fn select_cycle(&mut self, id: CycleId) -> Result<(), String> {
        let Some(cycle) = self.cycles.get_mut(id.0) else {
            return Err(format!(
                "Animation cycle {} is not registered ({} cycles)",
                id.0,
                self.cycles.len()
            ));
        };
        cycle.current_frame = 0;
        self.active = Some(id);
        self.ticks_since_last_frame = 0;
        Ok(())
    }

    pub fn active_cycle(&self) -> Option<CycleId> {
        self.active
    }

    pub fn cycle(&self, id: CycleId) -> Option<&Cycle> {
        self.cycles.get(id.0)
    }

    pub fn cycle_count(&self) -> usize {
        self.cycles.len()
    }

    pub fn ticks_since_last_frame(&self) -> i32 {
        self.ticks_since_last_frame
    }

    /// Run one animation tick. Returns the source rect to draw this tick, or
    /// `None` when no cycle has been selected yet.
    pub fn step(&mut self) -> Option<Rect> {
        let id = self.active?;
        let cycle = &mut self.cycles[id.0];

        let src = cycle.source_rect();

        if self.ticks_since_last_frame > cycle.speed {
            cycle.current_frame += 1;
            self.ticks_since_last_frame = 0;
        }

        self.ticks_since_last_frame = self.ticks_since_last_frame.saturating_add(1);

        if cycle.current_frame >= cycle.frame_count {
            cycle.current_frame = 0;
        }

        Some(src)
    }
}

/// An animated, drawable thing: an [`Object`] plus the animation that picks its
/// source crop.
#[derive(Debug, Clone, Default)]
pub struct Entity {
    object: Object,
    animator: Animator,
}

impl Entity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_cycle(
        &mut self,
        row: i32,
        frame_width: i32,
        frame_height: i32,
        frame_count: i32,
        speed: i32,
    ) -> CycleId {
        self.animator
            .register_cycle(row, frame_width, frame_height, frame_count, speed)
    }

    pub fn select_cycle(&mut self, id: CycleId) -> Result<(), String> {
        self.animator.select_cycle(id)
    }

    pub fn current_cycle(&self) -> Option<CycleId> {
        self.animator.active_cycle()
    }

    /// Advance the animation one tick and copy the frame crop into the object.
    pub fn update_animation(&mut self) {
        match self.animator.step() {
            Some(src) => self.object.set_src(src),
            None => log::trace!("update_animation called with no active cycle"),
        }
    }

    pub fn set_dest(&mut self, dest: Rect) {
        self.object.set_dest(dest);
    }

    pub fn dest(&self) -> Rect {
        self.object.dest()
    }

    pub fn src(&self) -> Rect {
        self.object.src()
    }

    pub fn texture(&self) -> Option<&TextureKey> {
        self.object.texture()
    }

    pub fn set_image(&mut self, path: &str, loader: &mut dyn TextureLoader) {
        self.object.set_image(path, loader);
    }

    pub fn object(&self) -> &Object {
        &self.object
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::tests::FakeLoader;

    fn frame_of(animator: &Animator) -> i32 {
        let id = animator.active_cycle().expect("active cycle");
        animator.cycle(id).expect("registered").current_frame
    }

    #[test]
    fn register_returns_sequential_ids_and_starts_at_frame_zero() {
        let mut animator = Animator::new();
        let a = animator.register_cycle(1, 32, 32, 4, 2);
        let b = animator.register_cycle(3, 16, 24, 6, 5);
        assert_eq!(a, CycleId(0));
        assert_eq!(b, CycleId(1));
        for id in [a, b] {
            assert_eq!(animator.cycle(id).unwrap().current_frame, 0);
        }
        // Rows are supplied one-based and stored zero-based.
        assert_eq!(animator.cycle(a).unwrap().row, 0);
        assert_eq!(animator.cycle(b).unwrap().row, 2);
    }

    #[test]
    fn register_accepts_degenerate_dimensions() {
        let mut animator = Animator::new();
        let id = animator.register_cycle(1, -8, 0, 3, 0);
        animator.select_cycle(id).unwrap();
        assert_eq!(animator.step(), Some(Rect::new(0, 0, -8, 0)));
    }

    #[test]
    fn huge_frame_width_wraps_instead_of_panicking() {
        let mut animator = Animator::new();
        let id = animator.register_cycle(1, i32::MAX, 32, 4, 0);
        animator.select_cycle(id).unwrap();
        let xs: Vec<i32> = (0..6).map(|_| animator.step().unwrap().x).collect();
        assert_eq!(
            xs,
            vec![
                0,
                0,
                i32::MAX,
                i32::MAX.wrapping_mul(2),
                i32::MAX.wrapping_mul(3),
                0,
            ]
        );
    }

    #[test]
    fn minimum_row_wraps_instead_of_panicking() {
        let mut animator = Animator::new();
        let id = animator.register_cycle(i32::MIN, 32, 32, 4, 0);
        assert_eq!(animator.cycle(id).unwrap().row, i32::MAX);
        animator.select_cycle(id).unwrap();
        let src = animator.step().unwrap();
        assert_eq!(src.y, 32i32.wrapping_mul(i32::MAX));
    }

    #[test]
    fn max_speed_saturates_tick_counter() {
        let mut animator = Animator::new();
        let id = animator.register_cycle(1, 32, 32, 4, i32::MAX);
        animator.select_cycle(id).unwrap();
        animator.ticks_since_last_frame = i32::MAX - 1;
        animator.step();
        animator.step();
        animator.step();
        assert_eq!(animator.ticks_since_last_frame(), i32::MAX);
        assert_eq!(frame_of(&animator), 0);
    }

    #[test]
    fn select_resets_tick_counter() {
        let mut animator = Animator::new();
        let idle = animator.register_cycle(1, 32, 32, 4, 10);
        let run = animator.register_cycle(2, 32, 32, 4, 10);
        animator.select_cycle(idle).unwrap();
        for _ in 0..5 {
            animator.step();
        }
        assert_eq!(animator.ticks_since_last_frame(), 5);

        animator.select_cycle(run).unwrap();
        assert_eq!(animator.ticks_since_last_frame(), 0);
        assert_eq!(animator.active_cycle(), Some(run));

        // Reselecting the same cycle also resets.
        animator.step();
        animator.select_cycle(run).unwrap();
        assert_eq!(animator.ticks_since_last_frame(), 0);
    }

    #[test]
    fn select_restarts_cycle_from_first_frame() {
        let mut animator = Animator::new();
        let idle = animator.register_cycle(1, 32, 32, 4, 0);
        let run = animator.register_cycle(2, 32, 32, 4, 0);
        animator.select_cycle(run).unwrap();
        for _ in 0..4 {
            animator.step();
        }
        assert_ne!(frame_of(&animator), 0);

        animator.select_cycle(idle).unwrap();
        animator.select_cycle(run).unwrap();
        assert_eq!(frame_of(&animator), 0);
    }

    #[test]
    fn select_unknown_cycle_is_rejected_without_side_effects() {
        let mut animator = Animator::new();
        let idle = animator.register_cycle(1, 32, 32, 4, 2);
        animator.select_cycle(idle).unwrap();
        animator.step();
        let err = animator.select_cycle(CycleId(7)).expect_err("unknown id");
        assert!(err.contains("not registered"));
        assert_eq!(animator.active_cycle(), Some(idle));
        assert_eq!(animator.ticks_since_last_frame(), 1);
    }

    #[test]
    fn step_without_selection_is_noop() {
        let mut animator = Animator::new();
        animator.register_cycle(1, 32, 32, 4, 2);
        assert_eq!(animator.step(), None);
        assert_eq!(animator.ticks_since_last_frame(), 0);
    }

    #[test]
    fn first_advance_happens_after_speed_plus_two_ticks() {
        let mut animator = Animator::new();
        let id = animator.register_cycle(1, 32, 32, 4, 2);
        animator.select_cycle(id).unwrap();

        for _ in 0..3 {
            animator.step();
            assert_eq!(frame_of(&animator), 0);
        }
        animator.step();
        assert_eq!(frame_of(&animator), 1);

        // Subsequent advances take speed + 1 ticks.
        animator.step();
        animator.step();
        assert_eq!(frame_of(&animator), 1);
        animator.step();
        assert_eq!(frame_of(&animator), 2);
    }

    #[test]
    fn source_rect_lags_frame_index_by_one_tick() {
        let mut animator = Animator::new();
        let id = animator.register_cycle(2, 32, 48, 4, 0);
        animator.select_cycle(id).unwrap();

        // speed 0: first advance on tick 2, then every tick.
        let rects: Vec<Rect> = (0..5).map(|_| animator.step().unwrap()).collect();
        let xs: Vec<i32> = rects.iter().map(|r| r.x).collect();
        assert_eq!(xs, vec![0, 0, 32, 64, 96]);
        for r in &rects {
            assert_eq!(r.y, 48);
            assert_eq!((r.w, r.h), (32, 48));
        }
    }

    #[test]
    fn frame_index_wraps_after_frame_count_advances() {
        let mut animator = Animator::new();
        let id = animator.register_cycle(1, 32, 32, 3, 0);
        animator.select_cycle(id).unwrap();

        let mut advances = 0;
        let mut last = frame_of(&animator);
        let mut saw_wrap = false;
        for _ in 0..20 {
            animator.step();
            let now = frame_of(&animator);
            if now != last {
                advances += 1;
                if advances == 3 {
                    assert_eq!(now, 0);
                    saw_wrap = true;
                    break;
                }
            }
            last = now;
        }
        assert!(saw_wrap, "cycle should wrap back to frame 0");
    }

    #[test]
    fn source_x_stays_within_strip() {
        let mut animator = Animator::new();
        let id = animator.register_cycle(1, 24, 24, 5, 1);
        animator.select_cycle(id).unwrap();
        for _ in 0..200 {
            let src = animator.step().unwrap();
            assert_eq!(src.x % 24, 0);
            assert!(src.x >= 0 && src.x <= 24 * 4, "x = {}", src.x);
            assert!(frame_of(&animator) < 5);
        }
    }

    #[test]
    fn entity_update_writes_source_into_object() {
        let mut entity = Entity::new();
        let run = entity.register_cycle(3, 32, 32, 4, 0);
        entity.select_cycle(run).unwrap();
        entity.set_dest(Rect::new(100, 50, 64, 64));

        entity.update_animation();
        assert_eq!(entity.src(), Rect::new(0, 64, 32, 32));
        entity.update_animation();
        entity.update_animation();
        assert_eq!(entity.src(), Rect::new(32, 64, 32, 32));
        assert_eq!(entity.dest(), Rect::new(100, 50, 64, 64));
        assert_eq!(entity.current_cycle(), Some(run));
    }

    #[test]
    fn entity_without_selection_keeps_source() {
        let mut entity = Entity::new();
        entity.register_cycle(1, 32, 32, 4, 0);
        entity.update_animation();
        assert_eq!(entity.src(), Rect::default());
    }

    #[test]
    fn entity_delegates_image_loading() {
        let mut loader = FakeLoader::with(&["sheet.png"]);
        let mut entity = Entity::new();
        entity.set_image("sheet.png", &mut loader);
        assert!(entity.texture().is_some());
        entity.set_image("nope.png", &mut loader);
        assert!(entity.texture().is_none());
    }
}
