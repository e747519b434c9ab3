//! Property tests for change scheduling and scroll animation.
//!
//! 1. **Idempotence**: scheduling the same bits in any order and
//!    multiplicity yields the same pass as scheduling their union once.
//! 2. **No lost bits**: bits reported while frozen all reach the single
//!    forced pass after unfreezing.
//! 3. **Animation termination**: an animated scroll finishes after exactly
//!    `steps + 1` ticks at the exact target, calling back once.

use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;
use vrender_core::{CharacterSize, Changes, RendererConfig};
use vrender_layout::testing::GridDocument;
use vrender_runtime::Renderer;

fn renderer(config: RendererConfig) -> Renderer<GridDocument> {
    let mut renderer = Renderer::new(config, CharacterSize::new(8.0, 16.0)).unwrap();
    renderer.set_document(GridDocument::uniform(200, 30));
    renderer.on_resize(false, Some(32.0), Some(480.0), Some(320.0));
    renderer.tick();
    renderer
}

fn change_bits() -> impl Strategy<Value = Changes> {
    (0u16..(1 << 11)).prop_map(Changes::from_bits_truncate)
}

proptest! {
    #[test]
    fn schedule_is_idempotent_and_commutative(
        reports in prop::collection::vec(change_bits(), 1..12),
        top in 0u32..3000,
    ) {
        let union = reports.iter().fold(Changes::empty(), |acc, bits| acc | *bits);

        let mut once = renderer(RendererConfig::default());
        once.scroll_to_y(f64::from(top));
        once.schedule(union);

        let mut many = renderer(RendererConfig::default());
        many.scroll_to_y(f64::from(top));
        for bits in reports.iter().rev().chain(reports.iter()) {
            many.schedule(*bits);
        }

        prop_assert_eq!(once.tick(), many.tick());
        prop_assert_eq!(once.layer_config(), many.layer_config());
        prop_assert_eq!(once.last_pass(), many.last_pass());
        prop_assert_eq!(once.scroll_top(), many.scroll_top());
    }

    #[test]
    fn frozen_bits_reach_the_forced_pass(
        reports in prop::collection::vec(change_bits(), 1..8),
    ) {
        let mut r = renderer(RendererConfig::default());
        let before = r.pass_count();
        r.freeze();
        let mut union = Changes::empty();
        for bits in &reports {
            r.schedule(*bits);
            union |= *bits;
        }
        prop_assert_eq!(r.tick(), 0);
        r.unfreeze();
        r.update_full(true);
        prop_assert_eq!(r.pass_count(), before + 1);
        prop_assert!(r.last_pass().contains(union | Changes::FULL));
        prop_assert_eq!(r.tick(), 0);
    }

    #[test]
    fn animation_terminates_at_target(
        line in 0usize..150,
        steps in 1usize..16,
    ) {
        let mut config = RendererConfig::default().with_animated_scroll(true);
        config.animation_steps = steps;
        let mut r = renderer(config);
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        r.scroll_to_line(line, false, true, Some(Box::new(move || counter.set(counter.get() + 1))));

        let mut ticks = 0;
        while r.tick_animation() {
            r.tick();
            ticks += 1;
            prop_assert!(ticks <= steps + 1);
        }
        r.tick();

        let expected = line as f64 * 16.0;
        if line == 0 {
            prop_assert_eq!(ticks, 0);
        } else {
            prop_assert_eq!(ticks, steps + 1);
        }
        prop_assert_eq!(r.scroll_top(), expected);
        prop_assert_eq!(fired.get(), 1);
        prop_assert!(!r.is_animating());
    }
}
