use garden_core::*;

const VH: f32 = 800.0;

fn make_spy(sections: usize) -> ScrollSpy {
    ScrollSpy::new(sections, 0, ScrollSpyConfig::default())
}

fn sample(index: usize, ratio: f32, top: f32, height: f32) -> SectionSample {
    SectionSample {
        index,
        intersecting: ratio > 0.0,
        intersection_ratio: ratio,
        top,
        height,
    }
}

#[test]
fn clear_winner_becomes_active() {
    let mut spy = make_spy(3);
    // Section 0 has scrolled mostly away; section 1 sits on the anchor line.
    let switched = spy.observe(
        &[sample(0, 0.1, -700.0, 760.0), sample(1, 0.9, 40.0, 400.0)],
        VH,
        1000.0,
    );
    assert_eq!(switched, Some(1));
    assert_eq!(spy.active(), 1);
}

#[test]
fn scores_prefer_sections_near_the_anchor() {
    let mut spy = make_spy(2);
    spy.observe(
        &[sample(0, 0.5, 0.0, 480.0), sample(1, 0.5, 600.0, 480.0)],
        VH,
        0.0,
    );
    assert!(spy.score(0) > spy.score(1));
}

#[test]
fn near_equal_sections_do_not_flicker() {
    let mut spy = make_spy(2);
    spy.observe(&[sample(0, 0.5, 0.0, 400.0)], VH, 0.0);
    let mut switches = 0;
    // Alternate tiny advantages between two sections every frame.
    for frame in 0..60 {
        let now = 16.0 * frame as f64;
        let (a, b) = if frame % 2 == 0 { (0.50, 0.52) } else { (0.52, 0.50) };
        let changed = spy.observe(
            &[sample(0, a, 0.0, 400.0), sample(1, b, 20.0, 400.0)],
            VH,
            now,
        );
        if changed.is_some() {
            switches += 1;
        }
    }
    assert_eq!(switches, 0);
    assert_eq!(spy.active(), 0);
}

#[test]
fn switches_respect_minimum_interval() {
    let config = ScrollSpyConfig::default();
    let mut spy = make_spy(2);
    let mut switch_times = Vec::new();
    // Two sections that trade a decisive lead every frame.
    for frame in 0..120 {
        let now = 16.0 * frame as f64;
        let samples = if frame % 2 == 0 {
            [sample(0, 1.0, 0.0, 480.0), sample(1, 0.05, 760.0, 480.0)]
        } else {
            [sample(0, 0.05, -440.0, 480.0), sample(1, 1.0, 0.0, 480.0)]
        };
        if spy.observe(&samples, VH, now).is_some() {
            switch_times.push(now);
        }
    }
    assert!(!switch_times.is_empty());
    for pair in switch_times.windows(2) {
        assert!(pair[1] - pair[0] >= config.min_switch_interval_ms);
    }
}

#[test]
fn tab_click_wins_over_scroll_until_quiet() {
    let mut spy = make_spy(3);
    let cmd = spy.select(2, 0.0);
    assert_eq!(cmd, Some(ScrollCommand { section: 2 }));
    assert_eq!(spy.active(), 2);
    assert!(spy.is_programmatic());

    // Smooth scroll passes through section 1; observer must not take over.
    spy.on_scroll(ScrollMetrics::default(), 50.0);
    let changed = spy.observe(&[sample(1, 1.0, 100.0, 400.0)], VH, 60.0);
    assert_eq!(changed, None);
    assert_eq!(spy.active(), 2);

    // Quiet for longer than the quiet period: organic mode resumes.
    spy.tick(50.0 + 151.0);
    assert!(!spy.is_programmatic());
}

#[test]
fn scroll_end_exits_programmatic_mode_early() {
    let mut spy = make_spy(3);
    spy.select(1, 0.0);
    spy.scroll_end();
    assert!(!spy.is_programmatic());
}

#[test]
fn out_of_range_and_repeated_tabs_are_ignored() {
    let mut spy = make_spy(3);
    assert_eq!(spy.select(7, 0.0), None);
    assert_eq!(spy.select(0, 0.0), None);
    assert_eq!(spy.active(), 0);
}

#[test]
fn reaching_the_bottom_activates_last_section() {
    let mut spy = make_spy(4);
    let metrics = ScrollMetrics {
        scroll_top: 2170.0,
        scroll_height: 3000.0,
        client_height: 800.0,
    };
    assert_eq!(spy.on_scroll(metrics, 1000.0), Some(3));
    assert!(spy.at_bottom());
}

#[test]
fn last_section_holds_at_bottom_across_observer_updates() {
    let mut spy = ScrollSpy::new(3, 1, ScrollSpyConfig::default());
    let bottom = ScrollMetrics {
        scroll_top: 2200.0,
        scroll_height: 3000.0,
        client_height: 800.0,
    };
    assert_eq!(spy.on_scroll(bottom, 1000.0), Some(2));

    // section 1 out-scores the short last section
    let samples = [sample(1, 1.0, -100.0, 700.0), sample(2, 0.3, 600.0, 200.0)];
    assert_eq!(spy.observe(&samples, VH, 1400.0), None);
    assert_eq!(spy.active(), 2);
    assert_eq!(spy.on_scroll(bottom, 1700.0), None);
    assert_eq!(spy.observe(&samples, VH, 2000.0), None);
    assert_eq!(spy.active(), 2);

    // scrolling back up releases the hold
    let up = ScrollMetrics {
        scroll_top: 1500.0,
        ..bottom
    };
    assert_eq!(spy.on_scroll(up, 2300.0), None);
    assert_eq!(spy.observe(&samples, VH, 2400.0), Some(1));
}

#[test]
fn debounced_tab_settles_after_delay() {
    let mut spy = make_spy(3);
    spy.select(1, 0.0);
    assert_eq!(spy.debounced_tab(), 0);
    assert_eq!(spy.tick(100.0), None);
    spy.scroll_end();
    spy.select(2, 150.0);
    assert_eq!(spy.tick(300.0), None);
    assert_eq!(spy.tick(351.0), Some(2));
    assert_eq!(spy.debounced_tab(), 2);
}

#[test]
fn keyboard_navigation_wraps() {
    assert_eq!(tab_for_key("Enter", 1, 3), Some(1));
    assert_eq!(tab_for_key(" ", 2, 3), Some(2));
    assert_eq!(tab_for_key("ArrowRight", 2, 3), Some(0));
    assert_eq!(tab_for_key("ArrowLeft", 0, 3), Some(2));
    assert_eq!(tab_for_key("End", 0, 3), Some(2));
    assert_eq!(tab_for_key("Home", 2, 3), Some(0));
    assert_eq!(tab_for_key("x", 0, 3), None);
    assert_eq!(tab_for_key("Enter", 0, 0), None);
}

#[test]
fn debounce_ignores_bounce_back() {
    let mut d = Debounced::new(0usize, 200.0);
    d.set(1, 0.0);
    d.set(0, 50.0);
    assert_eq!(d.poll(500.0), None);
    assert_eq!(*d.get(), 0);
}
