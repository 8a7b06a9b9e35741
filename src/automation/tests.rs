// Tests for the capture-match-click loop and its worker
// Focus: match decision, click mapping, error handling per tick, cancellation

#[cfg(test)]
mod click_loop_tests {
    use crate::automation::{
        AutoClicker, AutomationCommand, AutomationEvent, ClickerWorker, LoopConfig, LoopState,
        create_automation_channels,
    };
    use crate::screen::mock::{RecordingPointer, StaticCapturer};
    use crate::screen::{ClickerError, ClickerResult, ScreenCapturer};
    use crate::template_matching::Template;
    use image::{GrayImage, Luma, Rgba, RgbaImage};
    use std::sync::Arc;
    use std::time::Duration;

    fn texture(x: u32, y: u32) -> u8 {
        let h = x.wrapping_mul(73_856_093) ^ y.wrapping_mul(19_349_663);
        (h.wrapping_mul(2_654_435_761) >> 24) as u8
    }

    fn gray_to_rgba(v: u8) -> Rgba<u8> {
        Rgba([v, v, v, 255])
    }

    /// Textured template plus a textured screen with the template pasted at `(x0, y0)`
    fn scene(w: u32, h: u32, x0: u32, y0: u32) -> (Arc<Template>, RgbaImage) {
        let tpl = GrayImage::from_fn(w, h, |x, y| Luma([texture(x + 500, y + 900)]));
        let mut screen = RgbaImage::from_fn(160, 120, |x, y| gray_to_rgba(texture(x, y)));
        for (x, y, p) in tpl.enumerate_pixels() {
            screen.put_pixel(x0 + x, y0 + y, gray_to_rgba(p[0]));
        }
        (Arc::new(Template::from_gray(tpl, "button.png").unwrap()), screen)
    }

    fn clicker(
        template: Arc<Template>,
        screen: RgbaImage,
        config: LoopConfig,
    ) -> (AutoClicker<StaticCapturer, RecordingPointer>, RecordingPointer) {
        let pointer = RecordingPointer::new();
        let clicker =
            AutoClicker::new(template, config, StaticCapturer::new(screen), pointer.clone())
                .unwrap();
        (clicker, pointer)
    }

    fn fast_config() -> LoopConfig {
        LoopConfig::new(Duration::from_millis(10), 0.8)
    }

    fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<AutomationEvent>) -> Vec<AutomationEvent> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            out.push(event);
        }
        out
    }

    fn states(events: &[AutomationEvent]) -> Vec<LoopState> {
        events
            .iter()
            .filter_map(|e| match e {
                AutomationEvent::StateChanged(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    fn ticks(events: &[AutomationEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, AutomationEvent::TickCompleted { .. }))
            .count()
    }

    // ============================================================
    // SINGLE TICK
    // ============================================================

    #[test]
    fn test_exact_copy_is_clicked_at_center() {
        let (template, screen) = scene(15, 10, 42, 57);
        let (mut clicker, pointer) = clicker(template, screen, LoopConfig::new(Duration::from_secs(1), 1.0));

        let result = clicker.find_and_click().unwrap();

        assert!(result.found, "Exact copy must match even at threshold 1.0");
        assert_eq!(result.location, Some((42 + 7, 57 + 5)));
        assert_eq!((result.candidate.x, result.candidate.y), (42, 57));
        assert_eq!(pointer.clicks(), vec![(49, 62)]);
    }

    #[test]
    fn test_color_template_file_matches_color_screen() {
        let color = |x: u32, y: u32| {
            Rgba([
                texture(x, y),
                texture(x + 211, y + 7),
                texture(x + 3, y + 409),
                255,
            ])
        };
        let tpl_rgb = image::RgbImage::from_fn(14, 9, |x, y| {
            let Rgba([r, g, b, _]) = color(x + 300, y + 300);
            image::Rgb([r, g, b])
        });
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("color_button.png");
        tpl_rgb.save(&path).unwrap();
        let template = Arc::new(Template::load(&path).unwrap());

        let (x0, y0) = (71, 33);
        let mut screen = RgbaImage::from_fn(160, 120, color);
        for (x, y, p) in tpl_rgb.enumerate_pixels() {
            screen.put_pixel(x0 + x, y0 + y, Rgba([p[0], p[1], p[2], 255]));
        }

        let (mut clicker, pointer) =
            clicker(template, screen, LoopConfig::new(Duration::from_secs(1), 1.0));
        let result = clicker.find_and_click().unwrap();

        assert!(result.found, "Same conversion on both sides gives a perfect score");
        assert_eq!(result.candidate.score, 1.0);
        assert_eq!(result.location, Some((x0 + 7, y0 + 4)));
        assert_eq!(pointer.clicks(), vec![(78, 37)]);
    }

    #[test]
    fn test_uniform_screen_does_not_match() {
        let (template, _) = scene(12, 12, 0, 0);
        let flat = RgbaImage::from_pixel(100, 80, Rgba([40, 90, 200, 255]));
        let (mut clicker, pointer) = clicker(template, flat, fast_config());

        let result = clicker.find_and_click().unwrap();

        assert!(!result.found);
        assert_eq!(result.location, None);
        assert!(pointer.clicks().is_empty(), "No click without a match");
    }

    #[test]
    fn test_threshold_gate_is_monotonic() {
        let (template, mut screen) = scene(16, 16, 30, 20);
        // Damage part of the pasted copy so the best score lands strictly between 0 and 1
        for x in 30..38 {
            for y in 20..24 {
                screen.put_pixel(x, y, gray_to_rgba(255 - texture(x, y)));
            }
        }

        let thresholds = [0.1f32, 0.3, 0.5, 0.7, 0.8, 0.9, 0.95, 0.99, 1.0];
        let found: Vec<bool> = thresholds
            .iter()
            .map(|&t| {
                let (mut c, _) = clicker(
                    template.clone(),
                    screen.clone(),
                    LoopConfig::new(Duration::from_secs(1), t),
                );
                c.find_and_click().unwrap().found
            })
            .collect();

        assert!(found[0], "Damaged copy still matches at a low threshold");
        assert!(!found[found.len() - 1], "Damaged copy cannot reach 1.0");
        for pair in found.windows(2) {
            assert!(pair[0] || !pair[1], "Raising the threshold created a match: {found:?}");
        }
    }

    #[test]
    fn test_oversized_template_fails_without_click() {
        let tpl = GrayImage::from_fn(50, 20, |x, y| Luma([texture(x, y)]));
        let template = Arc::new(Template::from_gray(tpl, "wide.png").unwrap());
        let small = RgbaImage::from_fn(40, 40, |x, y| gray_to_rgba(texture(x, y)));
        let (mut clicker, pointer) = clicker(template, small, fast_config());

        let err = clicker.find_and_click().unwrap_err();

        assert!(matches!(err, ClickerError::InvalidTemplateSize { .. }));
        assert!(pointer.clicks().is_empty());
    }

    #[test]
    fn test_static_screen_gives_identical_results() {
        let (template, screen) = scene(9, 9, 100, 3);
        let (mut clicker, _) = clicker(template, screen, fast_config());

        let first = clicker.find_and_click().unwrap();
        let second = clicker.find_and_click().unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_capture_denied_is_reported() {
        let (template, _) = scene(8, 8, 0, 0);
        let pointer = RecordingPointer::new();
        let mut clicker =
            AutoClicker::new(template, fast_config(), StaticCapturer::denied(), pointer.clone())
                .unwrap();

        let err = clicker.find_and_click().unwrap_err();

        assert!(matches!(err, ClickerError::CaptureUnavailable { .. }));
        assert!(err.is_per_tick());
        assert!(pointer.clicks().is_empty());
    }

    #[test]
    fn test_click_failure_is_reported() {
        let (template, screen) = scene(8, 8, 10, 10);
        let mut clicker = AutoClicker::new(
            template,
            fast_config(),
            StaticCapturer::new(screen),
            RecordingPointer::failing(),
        )
        .unwrap();

        let err = clicker.find_and_click().unwrap_err();
        assert!(matches!(err, ClickerError::ClickFailed { x: 14, y: 14, .. }));
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let (template, screen) = scene(8, 8, 0, 0);
        let result = AutoClicker::new(
            template,
            LoopConfig::new(Duration::ZERO, 0.8),
            StaticCapturer::new(screen),
            RecordingPointer::new(),
        );
        assert!(matches!(result, Err(ClickerError::InvalidConfig { .. })));
    }

    #[test]
    fn test_snapshot_written_on_match() {
        let dir = tempfile::tempdir().unwrap();
        let (template, screen) = scene(10, 10, 20, 30);
        let config = fast_config().with_snapshot_dir(dir.path().join("results"));
        let (mut clicker, _) = clicker(template, screen, config);

        let outcome = clicker.tick().unwrap();

        let path = outcome.snapshot.expect("snapshot path on match");
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("match_") && name.ends_with(".png"), "{name}");
        let saved = image::open(&path).unwrap().to_rgba8();
        assert_eq!(*saved.get_pixel(20, 30), Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn test_snapshot_failure_does_not_fail_tick() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let (template, screen) = scene(10, 10, 20, 30);
        let (mut clicker, pointer) =
            clicker(template, screen, fast_config().with_snapshot_dir(&blocker));

        let outcome = clicker.tick().unwrap();

        assert!(outcome.result.found);
        assert!(outcome.snapshot.is_none());
        assert_eq!(pointer.clicks().len(), 1);
    }

    // ============================================================
    // RUN LOOP
    // ============================================================

    #[tokio::test]
    async fn test_stop_interrupts_sleep() {
        let (template, screen) = scene(10, 10, 5, 5);
        let (mut clicker, pointer) =
            clicker(template, screen, LoopConfig::new(Duration::from_secs(3600), 0.8));
        let (cmd_tx, mut cmd_rx, event_tx, mut event_rx) = create_automation_channels();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = cmd_tx.send(AutomationCommand::Stop).await;
        });

        let finished = tokio::time::timeout(
            Duration::from_secs(5),
            clicker.run(&mut cmd_rx, &event_tx),
        )
        .await;

        assert!(finished.is_ok(), "Stop must not wait for the hour-long interval");
        assert_eq!(clicker.state(), LoopState::Idle);
        assert_eq!(pointer.clicks().len(), 1);
        let events = drain(&mut event_rx);
        assert_eq!(states(&events), vec![LoopState::Running, LoopState::Idle]);
        assert_eq!(ticks(&events), 1);
    }

    #[tokio::test]
    async fn test_queued_stop_prevents_first_tick() {
        let (template, screen) = scene(10, 10, 5, 5);
        let (mut clicker, pointer) = clicker(template, screen, fast_config());
        let (cmd_tx, mut cmd_rx, event_tx, mut event_rx) = create_automation_channels();

        cmd_tx.send(AutomationCommand::Stop).await.unwrap();
        clicker.run(&mut cmd_rx, &event_tx).await;

        assert!(pointer.clicks().is_empty());
        let events = drain(&mut event_rx);
        assert_eq!(ticks(&events), 0);
        assert_eq!(states(&events), vec![LoopState::Running, LoopState::Idle]);
    }

    #[tokio::test]
    async fn test_tick_now_skips_sleep() {
        let (template, screen) = scene(10, 10, 5, 5);
        let (mut clicker, _) =
            clicker(template, screen, LoopConfig::new(Duration::from_secs(3600), 0.8));
        let (cmd_tx, mut cmd_rx, event_tx, mut event_rx) = create_automation_channels();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            let _ = cmd_tx.send(AutomationCommand::TickNow).await;
            tokio::time::sleep(Duration::from_millis(100)).await;
            let _ = cmd_tx.send(AutomationCommand::Stop).await;
        });

        tokio::time::timeout(Duration::from_secs(5), clicker.run(&mut cmd_rx, &event_tx))
            .await
            .expect("loop should stop");

        assert_eq!(ticks(&drain(&mut event_rx)), 2);
    }

    #[tokio::test]
    async fn test_per_tick_errors_do_not_end_loop() {
        let (template, _) = scene(8, 8, 0, 0);
        let mut clicker = AutoClicker::new(
            template,
            fast_config(),
            StaticCapturer::denied(),
            RecordingPointer::new(),
        )
        .unwrap();
        let (cmd_tx, mut cmd_rx, event_tx, mut event_rx) = create_automation_channels();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            let _ = cmd_tx.send(AutomationCommand::Stop).await;
        });
        clicker.run(&mut cmd_rx, &event_tx).await;

        assert!(clicker.capturer().captures >= 2, "Loop kept ticking after failures");
        let events = drain(&mut event_rx);
        let errors = events
            .iter()
            .filter(|e| matches!(e, AutomationEvent::Error(_)))
            .count();
        assert!(errors >= 2);
        assert_eq!(states(&events).last(), Some(&LoopState::Idle));
    }

    #[tokio::test]
    async fn test_dropped_controller_ends_loop() {
        let (template, screen) = scene(10, 10, 5, 5);
        let (mut clicker, _) = clicker(template, screen, fast_config());
        let (cmd_tx, mut cmd_rx, event_tx, _event_rx) = create_automation_channels();
        drop(cmd_tx);

        tokio::time::timeout(Duration::from_secs(5), clicker.run(&mut cmd_rx, &event_tx))
            .await
            .expect("closed command channel ends the loop");
        assert_eq!(clicker.state(), LoopState::Idle);
    }

    // ============================================================
    // BACKGROUND WORKER
    // ============================================================

    struct PanickingCapturer;

    impl ScreenCapturer for PanickingCapturer {
        fn capture(&mut self) -> ClickerResult<RgbaImage> {
            panic!("display server went away");
        }
    }

    #[test]
    fn test_worker_reports_matches_and_stops() {
        let (template, screen) = scene(10, 10, 60, 40);
        let pointer = RecordingPointer::new();
        let worker_pointer = pointer.clone();

        let (worker, mut events) = ClickerWorker::spawn(move || {
            AutoClicker::new(template, fast_config(), StaticCapturer::new(screen), worker_pointer)
        })
        .unwrap();

        let mut saw_match = false;
        while let Some(event) = events.blocking_recv() {
            if let AutomationEvent::MatchFound { location, .. } = event {
                assert_eq!(location, (65, 45));
                saw_match = true;
                break;
            }
        }
        assert!(saw_match, "Worker should report a match");

        worker.stop_and_join();
        let clicks_after_join = pointer.clicks().len();
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(pointer.clicks().len(), clicks_after_join, "No clicks after join");

        let mut last_state = None;
        while let Some(event) = events.blocking_recv() {
            if let AutomationEvent::StateChanged(s) = event {
                last_state = Some(s);
            }
        }
        assert_eq!(last_state, Some(LoopState::Idle));
    }

    #[test]
    fn test_worker_stop_is_idempotent() {
        let (template, screen) = scene(10, 10, 0, 0);
        let (worker, _events) = ClickerWorker::spawn(move || {
            AutoClicker::new(template, fast_config(), StaticCapturer::new(screen), RecordingPointer::new())
        })
        .unwrap();

        worker.stop();
        worker.stop();
        while !worker.is_finished() {
            std::thread::sleep(Duration::from_millis(5));
        }
        // Already idle: another stop is a no-op
        worker.stop();
        worker.join();
    }

    #[test]
    fn test_worker_startup_failure_returns_to_idle() {
        let (template, screen) = scene(10, 10, 0, 0);
        let (worker, mut events) = ClickerWorker::spawn(move || {
            AutoClicker::new(
                template,
                LoopConfig::new(Duration::ZERO, 0.8),
                StaticCapturer::new(screen),
                RecordingPointer::new(),
            )
        })
        .unwrap();
        worker.join();

        let mut all = Vec::new();
        while let Some(event) = events.blocking_recv() {
            all.push(event);
        }
        assert!(all.iter().any(|e| matches!(e, AutomationEvent::Error(_))));
        assert_eq!(states(&all), vec![LoopState::Idle]);
    }

    #[test]
    fn test_worker_survives_panicking_tick() {
        let (template, _) = scene(10, 10, 0, 0);
        let (worker, mut events) = ClickerWorker::spawn(move || {
            AutoClicker::new(template, fast_config(), PanickingCapturer, RecordingPointer::new())
        })
        .unwrap();
        worker.join();

        let mut all = Vec::new();
        while let Some(event) = events.blocking_recv() {
            all.push(event);
        }
        let error = all.iter().find_map(|e| match e {
            AutomationEvent::Error(msg) => Some(msg.clone()),
            _ => None,
        });
        assert!(
            error.as_deref().is_some_and(|m| m.contains("display server went away")),
            "Panic should be reported as an error event: {error:?}"
        );
        assert_eq!(states(&all).last(), Some(&LoopState::Idle));
    }
}
