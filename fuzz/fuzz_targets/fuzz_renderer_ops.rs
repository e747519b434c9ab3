#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use vrender_core::{CharacterSize, DocumentPosition, RendererConfig};
use vrender_layout::DocumentMetrics;
use vrender_layout::testing::GridDocument;
use vrender_runtime::Renderer;

#[derive(Debug, Arbitrary)]
enum Op {
    Resize { width: u16, height: u16, gutter: u8 },
    ScrollBy { dx: i16, dy: i16 },
    ScrollToLine { line: u16, center: bool, animate: bool },
    Edit { first: u16, count: u8 },
    Insert { at: u16, count: u8 },
    Remove { at: u16, count: u8 },
    Fold { start: u16, len: u8 },
    Reveal { row: u16, column: u8 },
    Freeze,
    Unfreeze,
    AnimationTick,
    Tick,
}

#[derive(Debug, Arbitrary)]
struct Input {
    lines: u16,
    animated: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    if input.ops.len() > 256 {
        return;
    }
    let config = RendererConfig::default().with_animated_scroll(input.animated);
    let Ok(mut renderer) = Renderer::new(config, CharacterSize::new(7.0, 14.0)) else {
        return;
    };
    renderer.set_document(GridDocument::uniform(usize::from(input.lines % 4096), 40));
    renderer.on_resize(false, Some(32.0), Some(480.0), Some(320.0));

    for op in input.ops {
        match op {
            Op::Resize { width, height, gutter } => renderer.on_resize(
                false,
                Some(f64::from(gutter)),
                Some(f64::from(width)),
                Some(f64::from(height)),
            ),
            Op::ScrollBy { dx, dy } => renderer.scroll_by(f64::from(dx), f64::from(dy)),
            Op::ScrollToLine { line, center, animate } => {
                renderer.scroll_to_line(usize::from(line), center, animate, None);
            }
            Op::Edit { first, count } => {
                let first = usize::from(first);
                renderer.update_lines(first, Some(first + usize::from(count)), false);
            }
            Op::Insert { at, count } => {
                if let Some(doc) = renderer.document_mut() {
                    doc.insert_lines(usize::from(at), usize::from(count), 12);
                }
                renderer.update_full(false);
            }
            Op::Remove { at, count } => {
                if let Some(doc) = renderer.document_mut() {
                    doc.remove_lines(usize::from(at), usize::from(count));
                }
                renderer.update_full(false);
            }
            Op::Fold { start, len } => {
                let start = usize::from(start);
                if let Some(doc) = renderer.document_mut() {
                    doc.fold(start, start + usize::from(len));
                }
                renderer.update_full(false);
            }
            Op::Reveal { row, column } => {
                renderer.set_cursor(DocumentPosition::new(usize::from(row), usize::from(column)));
                renderer.scroll_cursor_into_view(0.0);
            }
            Op::Freeze => renderer.freeze(),
            Op::Unfreeze => renderer.unfreeze(),
            Op::AnimationTick => {
                renderer.tick_animation();
            }
            Op::Tick => {
                renderer.tick();
            }
        }
        assert!(renderer.scroll_top().is_finite());
        assert!(renderer.scroll_left().is_finite());
    }

    renderer.unfreeze();
    while renderer.tick_animation() {}
    renderer.tick();
    assert!(!renderer.is_animating());

    if renderer.pass_count() > 0 {
        let layer = *renderer.layer_config();
        let lines = renderer.document().map_or(1, DocumentMetrics::line_count);
        assert!(layer.first_row <= layer.last_row);
        assert!(layer.last_row < lines);
    }
});
