#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use vrender_core::{CharacterSize, RendererConfig};
use vrender_layout::testing::GridDocument;
use vrender_layout::{DocumentMetrics, LayoutEngine, ViewState};

#[derive(Debug, Arbitrary)]
struct Input {
    lines: Vec<u8>,
    folds: Vec<(u8, u8)>,
    wrap: Option<u8>,
    char_width: u8,
    line_height: u8,
    width: u16,
    height: u16,
    top: i32,
    scroll_past_end: bool,
}

fuzz_target!(|input: Input| {
    if input.lines.len() > 512 || input.folds.len() > 16 {
        return;
    }

    let past_end = if input.scroll_past_end { 0.5 } else { 0.0 };
    let config = RendererConfig::default().with_scroll_past_end(past_end);
    let lengths = input.lines.iter().map(|&len| usize::from(len)).collect();
    let mut doc = GridDocument::from_lengths(lengths);
    if let Some(limit) = input.wrap {
        doc = doc.with_wrap(usize::from(limit));
    }
    for &(start, len) in &input.folds {
        let start = usize::from(start);
        doc.fold(start, start + usize::from(len));
    }

    let mut state = ViewState::new(CharacterSize::new(
        f64::from(input.char_width),
        f64::from(input.line_height),
    ));
    state.update_cached_size(
        false,
        Some(0.0),
        f64::from(input.width),
        f64::from(input.height),
        &config,
        &mut doc,
    );
    state.scroll.set_top(f64::from(input.top));
    LayoutEngine::new(&config).compute(&mut state, &mut doc);

    // Unmeasured cells leave the window untouched.
    if !state.is_measured() {
        return;
    }
    let layer = state.layer;
    assert!(layer.first_row <= layer.last_row);
    assert!(layer.last_row < doc.line_count());
    let first = layer.first_row;
    assert!(doc.fold_start(first).is_none_or(|start| start == first));
    assert!(state.scroll.top.is_finite());
});
