#[cfg(test)]
mod tests {
    use std::fmt::Write as _;

    use crate::prelude::*;
    use web_time::{Duration, Instant};

    fn leaf_column(s: &mut Scheduler, labels: &[&str]) -> Vec<WidgetId> {
        labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let id = s.ids.id(label);
                let rect = Rect::new(0.0, i as f32 * 30.0, 100.0, 24.0);
                s.focus.register(id, *label, rect, FocusCategory::Leaf);
                id
            })
            .collect()
    }

    fn summarize(data: &DrawData<'_>) -> String {
        let mut out = String::new();
        for (i, c) in data.commands.iter().enumerate() {
            let _ = writeln!(
                out,
                "cmd {i}: tex={} clip=({},{} {}x{}) vtx={} idx={} elems={}",
                c.texture.0,
                c.clip.x,
                c.clip.y,
                c.clip.w,
                c.clip.h,
                c.vtx_offset,
                c.idx_offset,
                c.elem_count
            );
        }
        out
    }

    struct Recorder {
        frames: Vec<DrawStats>,
        fail: bool,
    }

    impl RenderBackend for Recorder {
        fn configure_surface(&mut self, _width: u32, _height: u32) {}

        fn render(&mut self, data: &DrawData<'_>) -> Result<(), RenderError> {
            if self.fail {
                return Err(RenderError::SurfaceLost);
            }
            self.frames.push(data.stats());
            Ok(())
        }
    }

    #[test]
    fn test_ids_stable_across_scheduler_frames() {
        let mut sched = Scheduler::new();
        let mut seen = Vec::new();
        for _ in 0..3 {
            sched.frame(InputSnapshot::default(), |s| {
                seen.push(leaf_column(s, &["a", "b", "a"]));
            });
        }
        assert_eq!(seen[0], seen[1]);
        assert_eq!(seen[1], seen[2]);
        // Repeated label within a frame gets its own identity.
        assert_ne!(seen[0][0], seen[0][2]);
    }

    #[test]
    fn test_cache_eviction_follows_frames() {
        let mut sched = Scheduler::new();
        let cache: StateCache<i32> = sched.cache("values");
        let id = WidgetId(99);

        sched.begin_frame(InputSnapshot::default());
        cache.get(id, || 7);
        sched.end_frame();

        sched.begin_frame(InputSnapshot::default());
        assert!(cache.get_if_present(id).is_some());
        sched.end_frame();

        sched.begin_frame(InputSnapshot::default());
        assert!(cache.get_if_present(id).is_none());
        sched.end_frame();
    }

    #[test]
    fn test_quad_batching_and_texture_switch() {
        let mut sched = Scheduler::new();
        let data = sched.frame(InputSnapshot::default(), |s| {
            for i in 0..4 {
                s.draw
                    .add_rect(Rect::new(i as f32 * 20.0, 0.0, 10.0, 10.0), Color::WHITE);
            }
        });
        assert_eq!(data.commands.len(), 1);
        assert_eq!(data.commands[0].elem_count, 24);

        let data = sched.frame(InputSnapshot::default(), |s| {
            s.draw.add_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);
            s.draw.set_texture(TextureId(7));
            s.draw.add_rect(Rect::new(0.0, 20.0, 10.0, 10.0), Color::WHITE);
        });
        assert_eq!(data.commands.len(), 2);
    }

    #[test]
    fn test_registration_invisible_until_next_frame() {
        let mut sched = Scheduler::new();
        let mut ok = WidgetId::ROOT;
        sched.frame(InputSnapshot::default(), |s| {
            ok = leaf_column(s, &["ok"])[0];
            assert!(!s.focus.set_focus(ok));
            assert!(!s.focus.is_focused(ok));
            // Nothing registered last frame, so nothing to move to.
            assert!(!s.focus.navigate(Direction::Down));
        });
        sched.begin_frame(InputSnapshot::default());
        assert!(sched.focus.is_focused(ok));
    }

    #[test]
    fn test_navigation_stops_at_boundary() {
        let mut sched = Scheduler::new();
        let mut ids = Vec::new();
        sched.frame(InputSnapshot::default(), |s| {
            ids = leaf_column(s, &["a", "b", "c"]);
        });

        sched.begin_frame(InputSnapshot::default());
        assert_eq!(sched.focus.focused(), None);
        for expected in &ids {
            assert!(sched.focus.navigate(Direction::Down));
            assert_eq!(sched.focus.focused(), Some(*expected));
        }
        assert!(!sched.focus.navigate(Direction::Down));
        assert_eq!(sched.focus.focused(), Some(ids[2]));

        assert!(sched.focus.navigate(Direction::Up));
        assert_eq!(sched.focus.focused(), Some(ids[1]));
    }

    #[test]
    fn test_focus_bubbles_through_nested_scopes() {
        let mut focus = FocusRegistry::new();
        focus.reset_for_frame(1);
        focus.begin_scope(WidgetId(1), "A", FocusCategory::List, Rect::new(0.0, 0.0, 300.0, 400.0));
        focus.begin_scope(WidgetId(2), "B", FocusCategory::Section, Rect::new(0.0, 100.0, 300.0, 200.0));
        focus.register(WidgetId(3), "L", Rect::new(0.0, 120.0, 300.0, 20.0), FocusCategory::Leaf);
        focus.report_child_focus(120.0, 20.0);

        let b = focus.end_scope();
        assert!(b.has_focused_child);
        assert_eq!((b.child_y, b.child_height), (120.0, 20.0));

        let a = focus.end_scope();
        assert!(a.has_focused_child);
        assert_eq!(a.child_y, 120.0);
    }

    #[test]
    fn test_double_reset_same_frame_is_ignored() {
        let mut focus = FocusRegistry::new();
        assert!(focus.reset_for_frame(4));
        focus.register(WidgetId(1), "x", Rect::new(0.0, 0.0, 1.0, 1.0), FocusCategory::Leaf);
        assert!(!focus.reset_for_frame(4));
        assert_eq!(focus.current().len(), 1);
        assert!(focus.previous().is_empty());
    }

    fn three_rows(s: &mut Scheduler) {
        leaf_column(s, &["a", "b", "c"]);
    }

    fn registered(sched: &Scheduler) -> Vec<WidgetId> {
        sched.focus.current().iter().map(|f| f.id).collect()
    }

    #[test]
    fn test_keyboard_input_drives_focus() {
        let mut sched = Scheduler::new();
        sched.frame(InputSnapshot::default(), three_rows);
        let ids = registered(&sched);

        sched.frame(InputSnapshot::default().with_key(Key::Tab), three_rows);
        assert_eq!(sched.focus.focused(), Some(ids[0]));

        sched.frame(
            InputSnapshot::default()
                .with_key(Key::ArrowDown)
                .with_key(Key::ArrowDown),
            three_rows,
        );
        assert_eq!(sched.focus.focused(), Some(ids[2]));

        sched.frame(
            InputSnapshot::default().with_key_mods(Key::Tab, Modifiers::SHIFT),
            three_rows,
        );
        assert_eq!(sched.focus.focused(), Some(ids[1]));

        sched.frame(InputSnapshot::default().with_key(Key::Escape), three_rows);
        assert_eq!(sched.focus.focused(), None);
    }

    #[test]
    fn test_click_focuses_widget_under_pointer() {
        let mut sched = Scheduler::new();
        sched.frame(InputSnapshot::default(), three_rows);
        let ids = registered(&sched);
        let click = InputSnapshot::default()
            .with_pointer(Vec2::new(50.0, 40.0))
            .with_press(PointerButton::Primary);
        sched.frame(click, three_rows);
        assert_eq!(sched.focus.focused(), Some(ids[1]));
    }

    #[test]
    fn test_background_inserted_after_content() {
        let mut sched = Scheduler::new();
        let data = sched.frame(InputSnapshot::default(), |s| {
            s.draw.push_clip(Rect::new(10.0, 10.0, 200.0, 100.0));
            s.draw.set_texture(TextureId(3));
            s.draw.add_rect(Rect::new(20.0, 20.0, 10.0, 10.0), Color::WHITE);
            s.draw.add_rect(Rect::new(40.0, 20.0, 10.0, 10.0), Color::WHITE);
            s.draw.set_texture(TextureId::DEFAULT);
            s.draw.insert_at_front(|bg| {
                bg.add_rect(Rect::new(10.0, 10.0, 200.0, 40.0), Color::BLACK);
            });
            s.draw.pop_clip();
        });
        insta::assert_snapshot!(summarize(&data), @r"
        cmd 0: tex=0 clip=(10,10 200x100) vtx=0 idx=0 elems=6
        cmd 1: tex=3 clip=(10,10 200x100) vtx=4 idx=6 elems=12
        ");
    }

    #[test]
    fn test_present_reports_backend_errors() {
        let mut sched = Scheduler::new();
        let mut backend = Recorder {
            frames: Vec::new(),
            fail: false,
        };
        sched.begin_frame(InputSnapshot::default());
        sched.draw.add_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Color::WHITE);
        let stats = sched.present(&mut backend).unwrap();
        assert_eq!(stats.vertices, 4);
        assert_eq!(backend.frames.len(), 1);

        backend.fail = true;
        sched.begin_frame(InputSnapshot::default());
        let err = sched.present(&mut backend).unwrap_err();
        assert_eq!(err.to_string(), "render surface lost");
    }

    #[test]
    fn test_autoscroll_uses_config_cooldown() {
        let config = CoreConfig {
            auto_scroll_cooldown: Duration::from_millis(100),
            ..CoreConfig::default()
        };
        let mut scroll = AutoScroll::new(config.auto_scroll_cooldown);
        let t0 = Instant::now();
        scroll.note_manual_scroll(t0);
        assert!(scroll.cooling_down(t0 + Duration::from_millis(50)));
        assert!(!scroll.cooling_down(t0 + Duration::from_millis(150)));
    }

    #[test]
    fn test_clipboard_round_trip() {
        let mut sched = Scheduler::new();
        sched.set_clipboard(Box::new(MemoryClipboard::new()));
        if let Some(cb) = sched.clipboard.as_mut() {
            cb.set_text("copied");
        }
        let text = sched.clipboard.as_mut().and_then(|cb| cb.get_text());
        assert_eq!(text.as_deref(), Some("copied"));
    }
}
