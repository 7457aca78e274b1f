//! Integration tests for the async session actor.
//!
//! All tests run on a paused tokio clock, so a 25 minute countdown finishes
//! instantly while still going through the real one-second ticker.

use std::time::Duration;

use pomotrack_core::sound::RecordingPlayer;
use pomotrack_core::{
    Command, Event, ModeDurations, SessionBuilder, SoundEffect, TimerEngine, TimerMode,
    TimerPhase,
};

async fn advance_secs(secs: u64) {
    // Land half a second past the boundary so the last tick is delivered.
    tokio::time::sleep(Duration::from_millis(secs * 1000 + 500)).await;
}

#[tokio::test(start_paused = true)]
async fn focus_session_credits_active_task() {
    let player = RecordingPlayer::new();
    let session = SessionBuilder::new(TimerEngine::default())
        .player(player.clone())
        .spawn();
    let handle = session.handle.clone();

    handle
        .send(Command::AddTask {
            title: "Write spec".into(),
            estimated_pomodoros: 1,
        })
        .await
        .unwrap();
    let snap = handle.snapshot().await.unwrap();
    let id = snap.tasks[0].id.clone();
    assert_eq!(snap.active_task.as_ref(), Some(&id));

    handle.send(Command::SetActiveTask(id.clone())).await.unwrap();
    handle.send(Command::Start).await.unwrap();
    advance_secs(1500).await;

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.tasks[0].actual_pomodoros, 1);
    assert!(!snap.is_running);
    assert_eq!(snap.seconds_remaining, 0);
    assert_eq!(snap.phase, TimerPhase::Completed);
    assert_eq!(player.played(), vec![SoundEffect::Success]);

    // Nothing more happens while sitting at zero.
    advance_secs(120).await;
    assert_eq!(handle.snapshot().await.unwrap().tasks[0].actual_pomodoros, 1);
    assert_eq!(player.played().len(), 1);

    let engine = session.finish().await.unwrap();
    assert_eq!(engine.tasks().get(&id).unwrap().actual_pomodoros, 1);
}

#[tokio::test(start_paused = true)]
async fn partial_run_counts_down_once_per_second() {
    let session = SessionBuilder::new(TimerEngine::default()).spawn();
    let handle = session.handle.clone();

    handle.send(Command::Start).await.unwrap();
    advance_secs(42).await;

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.seconds_remaining, 1500 - 42);
    assert!(snap.is_running);
    session.finish().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn switching_mode_mid_focus_leaves_no_stale_ticks() {
    let session = SessionBuilder::new(TimerEngine::default()).spawn();
    let handle = session.handle.clone();

    handle.send(Command::Start).await.unwrap();
    tokio::time::sleep(Duration::from_millis(900_500)).await;
    assert_eq!(handle.snapshot().await.unwrap().seconds_remaining, 600);

    handle
        .send(Command::SwitchMode(TimerMode::ShortBreak))
        .await
        .unwrap();
    advance_secs(10).await;

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.mode, TimerMode::ShortBreak);
    assert_eq!(snap.seconds_remaining, 300);
    assert!(!snap.is_running);
    session.finish().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn pause_and_resume_restart_the_ticker() {
    let session = SessionBuilder::new(TimerEngine::default()).spawn();
    let handle = session.handle.clone();

    handle.send(Command::Start).await.unwrap();
    advance_secs(10).await;
    handle.send(Command::Pause).await.unwrap();
    advance_secs(30).await;
    assert_eq!(handle.snapshot().await.unwrap().seconds_remaining, 1490);

    // A fresh ticker waits a full second before its first tick.
    handle.send(Command::Start).await.unwrap();
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(handle.snapshot().await.unwrap().seconds_remaining, 1490);
    tokio::time::sleep(Duration::from_millis(700)).await;
    assert_eq!(handle.snapshot().await.unwrap().seconds_remaining, 1489);
    session.finish().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn reset_while_running_stops_countdown() {
    let session = SessionBuilder::new(TimerEngine::default()).spawn();
    let handle = session.handle.clone();

    handle.send(Command::Start).await.unwrap();
    advance_secs(5).await;
    let events = handle.send(Command::Reset).await.unwrap();
    assert!(matches!(
        events.as_slice(),
        [Event::TimerReset { remaining_secs: 1500, .. }]
    ));
    advance_secs(5).await;

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.seconds_remaining, 1500);
    assert_eq!(snap.phase, TimerPhase::Idle);
    session.finish().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn break_completion_streams_event_without_credit() {
    let durations = ModeDurations::new(25, 1, 15).unwrap();
    let mut session = SessionBuilder::new(TimerEngine::new(durations)).spawn();
    let handle = session.handle.clone();

    handle
        .send(Command::AddTask {
            title: "Read".into(),
            estimated_pomodoros: 2,
        })
        .await
        .unwrap();
    handle
        .send(Command::SwitchMode(TimerMode::ShortBreak))
        .await
        .unwrap();
    handle.send(Command::Start).await.unwrap();
    advance_secs(60).await;

    let mut completions = Vec::new();
    while let Ok(event) = session.events.try_recv() {
        if let Event::TimerCompleted {
            mode,
            credited_task,
            ..
        } = event
        {
            completions.push((mode, credited_task));
        }
    }
    assert_eq!(completions, vec![(TimerMode::ShortBreak, None)]);
    assert_eq!(handle.snapshot().await.unwrap().tasks[0].actual_pomodoros, 0);
    session.finish().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn failing_sound_does_not_disturb_session() {
    let player = RecordingPlayer::failing();
    let durations = ModeDurations::new(1, 1, 1).unwrap();
    let session = SessionBuilder::new(TimerEngine::new(durations))
        .player(player.clone())
        .spawn();
    let handle = session.handle.clone();

    handle.send(Command::Start).await.unwrap();
    advance_secs(60).await;

    assert_eq!(player.played(), vec![SoundEffect::Success]);
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.phase, TimerPhase::Completed);
    assert_eq!(snap.stats.completed_focus, 1);

    // The session keeps serving commands.
    handle.send(Command::Reset).await.unwrap();
    assert_eq!(handle.snapshot().await.unwrap().seconds_remaining, 60);
    session.finish().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn muted_session_plays_nothing() {
    let player = RecordingPlayer::new();
    let durations = ModeDurations::new(1, 1, 1).unwrap();
    let session = SessionBuilder::new(TimerEngine::new(durations).with_sound(false))
        .player(player.clone())
        .spawn();
    let handle = session.handle.clone();

    handle.send(Command::Start).await.unwrap();
    advance_secs(60).await;
    assert!(player.played().is_empty());
    assert!(!handle.snapshot().await.unwrap().is_running);
    session.finish().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn handle_fails_after_finish() {
    let session = SessionBuilder::new(TimerEngine::default()).spawn();
    let handle = session.handle.clone();
    session.finish().await.unwrap();

    assert!(handle.send(Command::Start).await.is_err());
    assert!(handle.snapshot().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn shutdown_applies_queued_commands_first() {
    let session = SessionBuilder::new(TimerEngine::default()).spawn();
    let handle = session.handle.clone();
    handle
        .send_nowait(Command::AddTask {
            title: "Queued".into(),
            estimated_pomodoros: 2,
        })
        .unwrap();
    handle
        .send_nowait(Command::SetDurations(ModeDurations::new(40, 5, 15).unwrap()))
        .unwrap();
    handle.shutdown().unwrap();

    let engine = session.finish().await.unwrap();
    assert_eq!(engine.tasks()[0].title, "Queued");
    assert_eq!(engine.seconds_remaining(), 40 * 60);
}

#[tokio::test(start_paused = true)]
async fn new_durations_refill_a_completed_countdown() {
    let engine = TimerEngine::new(ModeDurations::new(1, 1, 1).unwrap());
    let session = SessionBuilder::new(engine).spawn();
    let handle = session.handle.clone();

    handle.send(Command::Start).await.unwrap();
    advance_secs(60).await;
    assert_eq!(handle.snapshot().await.unwrap().phase, TimerPhase::Completed);

    handle
        .send(Command::SetDurations(ModeDurations::new(2, 1, 1).unwrap()))
        .await
        .unwrap();
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.seconds_remaining, 120);
    assert_eq!(snap.phase, TimerPhase::Idle);
    session.finish().await.unwrap();
}
