mod common;

use std::time::Duration;

use common::{catalog, drain, event_channel, names};
use tokio::time::sleep;
use vibes_lib::events::ViewerEvent;
use vibes_lib::playback::{ExitReason, PlaybackController, PlaybackState};
use vibes_lib::settings::ViewerSettings;
use vibes_lib::timeline::SegmentTimeline;

fn controller_for(author: &str) -> (PlaybackController, tokio::sync::mpsc::UnboundedReceiver<ViewerEvent>) {
    let (sink, rx) = event_channel();
    let timeline = SegmentTimeline::from_catalog(&catalog(), author);
    // 40ms ticks keep the sleeps below off tick boundaries.
    let settings = ViewerSettings {
        tick_interval_ms: 40,
        ..ViewerSettings::default()
    };
    (PlaybackController::new(timeline, &settings, sink), rx)
}

#[tokio::test(start_paused = true)]
async fn start_enters_first_segment() {
    let (controller, mut rx) = controller_for("ana");
    let snapshot = controller.start().await.unwrap();

    assert_eq!(snapshot.state, PlaybackState::Playing { index: 0, progress: 0.0 });
    assert_eq!(snapshot.segment_count, 3);
    assert_eq!(snapshot.progress_bars, vec![0.0, 0.0, 0.0]);

    let events = drain(&mut rx);
    assert_eq!(names(&events), vec!["segment-changed", "playback-state-changed"]);
    match &events[0] {
        ViewerEvent::SegmentChanged { index, total, segment, .. } => {
            assert_eq!((*index, *total), (0, 3));
            assert_eq!(segment.id, "S0");
        }
        other => panic!("unexpected event {other:?}"),
    }

    assert!(controller.start().await.is_err());
    controller.close().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn commands_before_start_are_rejected() {
    let (controller, _rx) = controller_for("ana");
    assert!(controller.advance().await.is_err());
    assert!(controller.pause().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn empty_timeline_reports_not_found() {
    let (controller, mut rx) = controller_for("nobody");
    let snapshot = controller.start().await.unwrap();
    assert_eq!(snapshot.state, PlaybackState::NotFound);

    let events = drain(&mut rx);
    assert_eq!(
        events[0],
        ViewerEvent::StoryNotFound {
            author_id: "nobody".to_string()
        }
    );

    assert_eq!(controller.advance().await.unwrap().state, PlaybackState::NotFound);
    sleep(Duration::from_secs(30)).await;
    assert_eq!(controller.get_state().await, PlaybackState::NotFound);

    let snapshot = controller.exit().await.unwrap();
    assert_eq!(snapshot.state, PlaybackState::Exited);
}

#[tokio::test(start_paused = true)]
async fn clock_auto_advances_and_starts_video() {
    let (controller, mut rx) = controller_for("ana");
    controller.start().await.unwrap();
    drain(&mut rx);

    sleep(Duration::from_millis(5025)).await;
    assert_eq!(
        controller.get_state().await,
        PlaybackState::Playing { index: 1, progress: 0.0 }
    );

    let events = drain(&mut rx);
    assert!(events.iter().any(|e| matches!(e, ViewerEvent::PlaybackHeartbeat { index: 0, .. })));
    assert!(events.contains(&ViewerEvent::StartMedia {
        segment_id: "S1".to_string(),
        media_ref: "https://cdn.example/S1".to_string(),
    }));

    controller.close().await.unwrap();
}

fn start_media_for(events: &[ViewerEvent]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|event| match event {
            ViewerEvent::StartMedia { segment_id, .. } => Some(segment_id.as_str()),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn reentering_video_segment_restarts_media() {
    let (controller, mut rx) = controller_for("ana");
    controller.start().await.unwrap();
    drain(&mut rx);

    controller.advance().await.unwrap();
    assert_eq!(start_media_for(&drain(&mut rx)), vec!["S1"]);

    controller.advance().await.unwrap();
    assert!(start_media_for(&drain(&mut rx)).is_empty());

    let snapshot = controller.retreat().await.unwrap();
    assert_eq!(snapshot.state, PlaybackState::Playing { index: 1, progress: 0.0 });
    assert_eq!(start_media_for(&drain(&mut rx)), vec!["S1"]);

    controller.close().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn photo_entry_does_not_start_media() {
    let (controller, mut rx) = controller_for("ana");
    controller.start().await.unwrap();
    let events = drain(&mut rx);
    assert!(start_media_for(&events).is_empty());

    controller.advance().await.unwrap();
    drain(&mut rx);
    controller.advance().await.unwrap();

    let events = drain(&mut rx);
    assert!(events.iter().any(|e| matches!(
        e,
        ViewerEvent::SegmentChanged { segment, .. } if segment.id == "S2"
    )));
    assert!(start_media_for(&events).is_empty());

    controller.close().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn runs_to_exit_without_input() {
    let (controller, mut rx) = controller_for("ana");
    controller.start().await.unwrap();

    sleep(Duration::from_millis(15_100)).await;
    assert_eq!(controller.get_state().await, PlaybackState::Exited);

    let events = drain(&mut rx);
    assert!(events.contains(&ViewerEvent::ViewerExited {
        reason: ExitReason::Finished
    }));
}

#[tokio::test(start_paused = true)]
async fn pause_freezes_progress_and_resume_continues() {
    let (controller, mut rx) = controller_for("ana");
    controller.start().await.unwrap();

    sleep(Duration::from_millis(1250)).await;
    let paused = controller.pause().await.unwrap();
    assert_eq!(paused.state, PlaybackState::Paused { index: 0, progress: 0.25 });
    drain(&mut rx);

    sleep(Duration::from_secs(20)).await;
    assert_eq!(controller.get_state().await, paused.state);
    assert!(drain(&mut rx).is_empty(), "a paused clock must not report");

    let resumed = controller.resume().await.unwrap();
    assert_eq!(resumed.state, PlaybackState::Playing { index: 0, progress: 0.25 });

    // 1250ms before the pause plus 3750ms after it use up the segment; the tick
    // that crosses the line lands 3760ms after resuming.
    sleep(Duration::from_millis(3740)).await;
    assert_eq!(controller.get_state().await.index(), Some(0));
    sleep(Duration::from_millis(40)).await;
    assert_eq!(controller.get_state().await.index(), Some(1));

    controller.close().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn pause_then_resume_without_ticks_keeps_progress() {
    let (controller, _rx) = controller_for("ana");
    controller.start().await.unwrap();
    sleep(Duration::from_millis(2500)).await;

    let paused = controller.pause().await.unwrap();
    let resumed = controller.resume().await.unwrap();
    assert_eq!(paused.state.progress(), resumed.state.progress());
    assert!(resumed.state.is_playing());

    controller.close().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn retreat_from_first_segment_exits() {
    let (controller, mut rx) = controller_for("ana");
    controller.start().await.unwrap();
    controller.advance().await.unwrap();

    sleep(Duration::from_millis(730)).await;
    let snapshot = controller.retreat().await.unwrap();
    assert_eq!(snapshot.state, PlaybackState::Playing { index: 0, progress: 0.0 });

    let snapshot = controller.retreat().await.unwrap();
    assert_eq!(snapshot.state, PlaybackState::Exited);
    assert!(drain(&mut rx).contains(&ViewerEvent::ViewerExited {
        reason: ExitReason::BeforeFirst
    }));
}

#[tokio::test(start_paused = true)]
async fn media_failure_skips_segment_and_stale_reports_are_ignored() {
    let (controller, _rx) = controller_for("ana");
    controller.start().await.unwrap();

    let snapshot = controller.media_failed("S2").await.unwrap();
    assert_eq!(snapshot.state.index(), Some(0));

    let snapshot = controller.media_failed("S0").await.unwrap();
    assert_eq!(snapshot.state, PlaybackState::Playing { index: 1, progress: 0.0 });

    let snapshot = controller.media_failed("unknown").await.unwrap();
    assert_eq!(snapshot.state.index(), Some(1));

    controller.media_ready("S1").await.unwrap();
    controller.close().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn like_toggles_per_segment() {
    let (controller, mut rx) = controller_for("ana");
    controller.start().await.unwrap();
    drain(&mut rx);

    assert!(controller.toggle_like().await.unwrap());
    assert!(!controller.toggle_like().await.unwrap());
    assert_eq!(
        drain(&mut rx),
        vec![
            ViewerEvent::LikeToggled {
                segment_id: "S0".to_string(),
                liked: true
            },
            ViewerEvent::LikeToggled {
                segment_id: "S0".to_string(),
                liked: false
            },
        ]
    );

    controller.close().await.unwrap();
    assert!(controller.toggle_like().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn close_cancels_the_clock() {
    let (controller, mut rx) = controller_for("ana");
    controller.start().await.unwrap();
    sleep(Duration::from_millis(1210)).await;

    let snapshot = controller.close().await.unwrap();
    assert_eq!(snapshot.state, PlaybackState::Exited);
    assert!(drain(&mut rx).contains(&ViewerEvent::ViewerExited {
        reason: ExitReason::Closed
    }));

    sleep(Duration::from_secs(30)).await;
    assert!(drain(&mut rx).is_empty());
    assert_eq!(controller.advance().await.unwrap().state, PlaybackState::Exited);
}
