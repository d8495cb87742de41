#![forbid(unsafe_code)]

//! Exit/enter timing through the full stack.

use std::collections::HashMap;
use std::time::Duration;

use vitrine_core::{ElementHandle, VisualState};
use vitrine_fx::ScrambleConfig;
use vitrine_harness::{Harness, MockPage};
use vitrine_runtime::SwitcherConfig;
use vitrine_runtime::config::{ENV_ENTER_STAGGER, ENV_OVERLAP, ENV_SCRAMBLE_SEED};

const FRAME_10MS: Duration = Duration::from_millis(10);

/// Frames (as rendered-slot sets) from `select` until settled.
fn switch(config: SwitcherConfig) -> Vec<Vec<String>> {
    let mut h = Harness::initialized(MockPage::tabs("tabs", &["a", "b"]), config)
        .with_frame(FRAME_10MS);
    h.run_until_settled().expect("settles");
    h.select("tabs", "b").unwrap();
    let mut frames = Vec::new();
    while !h.controller().is_settled() {
        h.run_frames(1);
        frames.push(h.rendered("tabs"));
        assert!(frames.len() < 10_000, "never settled");
    }
    frames
}

fn base() -> SwitcherConfig {
    SwitcherConfig::default()
        .scramble_on_enter(false)
        .scramble(ScrambleConfig::default().seed(21))
}

#[test]
fn sequential_never_renders_both() {
    let frames = switch(base());
    assert!(frames.iter().all(|f| f.len() <= 1), "{frames:?}");
    assert_eq!(frames.last().unwrap(), &["b"]);
}

#[test]
fn sequential_enter_starts_when_exit_ends() {
    let frames = switch(base());
    let first_b = frames.iter().position(|f| f == &["b"]).unwrap();
    // 0.3 s exit at 10 ms per frame.
    assert_eq!(first_b, 29);
}

#[test]
fn negative_overlap_crossfades() {
    let frames = switch(base().overlap_seconds(-0.1));
    assert!(frames.iter().any(|f| f.len() == 2), "both rendered at some point");
    assert_eq!(frames.last().unwrap(), &["b"]);
}

#[test]
fn positive_overlap_leaves_a_gap() {
    let frames = switch(base().overlap_seconds(0.1));
    assert!(frames.iter().any(Vec::is_empty), "nothing rendered during the gap");
    assert_eq!(frames.last().unwrap(), &["b"]);
}

#[test]
fn scramble_disabled_leaves_text_alone() {
    let mut h = Harness::initialized(MockPage::tabs("tabs", &["a", "b"]), base());
    h.run_until_settled().expect("settles");
    h.select("tabs", "b").unwrap();
    h.run_until_settled().expect("settles");
    for slot in ["a", "b"] {
        let heading = &h.page().regions("tabs", slot)[0];
        assert!(heading.text_writes().is_empty(), "{slot} heading untouched");
    }
}

#[test]
fn enter_offset_slides_in() {
    let config = base().enter_offset(-40);
    let mut h = Harness::initialized(MockPage::tabs("tabs", &["a"]), config);
    h.run_frames(1);
    let root = h.page().root("tabs", "a").unwrap().clone();
    assert!(root.visual().offset < 0);
    h.run_until_settled().expect("settles");
    assert_eq!(root.visual(), VisualState::SHOWN);
}

#[test]
fn lines_stagger_from_env_config() {
    let env: HashMap<&str, &str> = [
        (ENV_ENTER_STAGGER, "0.05"),
        (ENV_OVERLAP, "0"),
        (ENV_SCRAMBLE_SEED, "5"),
    ]
    .into_iter()
    .collect();
    let parsed = SwitcherConfig::from_env_with(|key| env.get(key).map(|v| v.to_string()));
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);

    let page = MockPage::new().group("tabs", |g| g.slot("a", &["Title"]).with_lines(4));
    let mut h = Harness::initialized(page, parsed.config).with_frame(FRAME_10MS);
    h.run_frames(6);
    let lines = h.page().root("tabs", "a").unwrap().subregions();
    assert_eq!(lines.len(), 4);

    h.run_until_settled().expect("settles");
    assert!(h.elapsed() >= Duration::from_millis(450), "last line waits 150 ms");
    assert_eq!(h.page().regions("tabs", "a")[0].text(), "Title");
}
