// tests/engine_manual_clock.rs

use std::error::Error;
use std::time::Duration;

use chrono::TimeDelta;
use tokio_util::sync::CancellationToken;

use announcer::engine::{
    status_channel, EngineOptions, EnginePhase, TriggerCore, TriggerEngine,
};
use announcer::playback::{PlaybackSerializer, PlaybackSummary};
use announcer::schedule::ScheduleTable;
use announcer_test_utils::builders::{jan_2024, EntryBuilder, ScheduleBuilder};
use announcer_test_utils::{init_tracing, within};
use announcer_test_utils::manual_clock::ManualClock;
use announcer_test_utils::recording_player::{finished, RecordingPlayer};

type TestResult = Result<(), Box<dyn Error>>;

struct Outcome {
    played: Vec<String>,
    summary: PlaybackSummary,
    dispatched: u64,
    phase: EnginePhase,
    alive: bool,
}

/// Run the engine against `clock` until it passes its horizon, then drain
/// the playback queue.
async fn run_engine(table: ScheduleTable, clock: ManualClock) -> Result<Outcome, Box<dyn Error>> {
    init_tracing();

    let player = RecordingPlayer::new(Duration::from_secs(20));
    let events = player.events();
    let serializer = PlaybackSerializer::spawn(player);
    let (reporter, status) = status_channel();

    let engine = TriggerEngine::new(
        TriggerCore::new(table.into()),
        clock,
        serializer.queue(),
        EngineOptions::default(),
        reporter,
    );

    // The manual clock never touches Tokio time; only a stuck loop trips this.
    within(Duration::from_secs(3600), engine.run(CancellationToken::new())).await?;

    let summary = serializer.drain().await?;
    let last = status.snapshot();

    Ok(Outcome {
        played: finished(&events),
        summary,
        dispatched: last.dispatched,
        phase: last.phase,
        alive: last.alive,
    })
}

#[tokio::test(start_paused = true)]
async fn everyday_entry_fires_exactly_once_at_its_minute() -> TestResult {
    let table = ScheduleBuilder::new()
        .with(EntryBuilder::new("fileA", "09:00").on("everyday").build())
        .build();
    let clock = ManualClock::new(jan_2024(1, 8, 59, 0), jan_2024(1, 9, 5, 0));

    let outcome = run_engine(table, clock.clone()).await?;

    assert_eq!(outcome.played, vec!["fileA"]);
    assert_eq!(outcome.dispatched, 1);

    // Woke one lead-second early, then again right on the minute.
    let deadlines = clock.deadlines();
    assert_eq!(deadlines[0], jan_2024(1, 8, 59, 59));
    assert_eq!(deadlines[1], jan_2024(1, 9, 0, 0));
    assert!(deadlines[2] > jan_2024(1, 9, 5, 0));

    assert!(!outcome.alive);
    assert_eq!(outcome.phase, EnginePhase::Stopped);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn weekly_entry_fires_again_next_week() -> TestResult {
    let table = ScheduleBuilder::new()
        .with(EntryBuilder::new("monday", "09:00").on("mon").build())
        .build();
    // Monday 08:00 to the following Monday 10:00.
    let clock = ManualClock::new(jan_2024(1, 8, 0, 0), jan_2024(8, 10, 0, 0));

    let outcome = run_engine(table, clock).await?;

    assert_eq!(outcome.played, vec!["monday", "monday"]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn shared_minute_entries_both_fire_in_table_order() -> TestResult {
    let table = ScheduleBuilder::new()
        .with(
            EntryBuilder::new("lunch", "12:00")
                .on("mon")
                .audio("/audio/chime.wav")
                .build(),
        )
        .with(
            EntryBuilder::new("lunch-reminder", "12:00")
                .on("everyday")
                .audio("/audio/chime.wav")
                .build(),
        )
        .build();
    let clock = ManualClock::new(jan_2024(1, 11, 0, 0), jan_2024(1, 13, 0, 0));

    let outcome = run_engine(table, clock).await?;

    assert_eq!(outcome.played, vec!["lunch", "lunch-reminder"]);
    assert_eq!(outcome.summary.played, 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn late_wakes_within_the_minute_neither_miss_nor_repeat() -> TestResult {
    let table = ScheduleBuilder::new()
        .with(EntryBuilder::new("fileA", "09:00").build())
        .build();
    // Every wake lands 58 seconds late.
    let clock = ManualClock::new(jan_2024(1, 8, 0, 0), jan_2024(3, 12, 0, 0))
        .with_wake_delay(TimeDelta::seconds(58));

    let outcome = run_engine(table, clock).await?;

    assert_eq!(outcome.played, vec!["fileA", "fileA", "fileA"]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn missed_occurrence_is_not_caught_up() -> TestResult {
    let table = ScheduleBuilder::new()
        .with(EntryBuilder::new("fileA", "09:00").on("mon").build())
        .build();
    // Start after Monday's slot; horizon before next Monday.
    let clock = ManualClock::new(jan_2024(1, 9, 1, 0), jan_2024(7, 23, 0, 0));

    let outcome = run_engine(table, clock).await?;

    assert!(outcome.played.is_empty());
    assert_eq!(outcome.dispatched, 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn empty_schedule_idles_until_shutdown() -> TestResult {
    let clock = ManualClock::new(jan_2024(1, 0, 0, 0), jan_2024(1, 5, 30, 0));

    let outcome = run_engine(ScheduleTable::default(), clock.clone()).await?;

    assert!(outcome.played.is_empty());
    // Hourly heartbeat: 01:00 .. 05:00 elapsed, 06:00 is past the horizon.
    assert_eq!(clock.wakes().len(), 5);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn cancelled_token_stops_before_any_check() -> TestResult {
    init_tracing();

    let table = ScheduleBuilder::new()
        .with(EntryBuilder::new("fileA", "09:00").build())
        .build();
    let clock = ManualClock::new(jan_2024(1, 9, 0, 0), jan_2024(9, 0, 0, 0));
    let serializer = PlaybackSerializer::spawn(RecordingPlayer::new(Duration::from_secs(1)));
    let (reporter, status) = status_channel();

    let engine = TriggerEngine::new(
        TriggerCore::new(table.into()),
        clock.clone(),
        serializer.queue(),
        EngineOptions::default(),
        reporter,
    );

    let shutdown = CancellationToken::new();
    shutdown.cancel();
    engine.run(shutdown).await?;

    assert!(clock.wakes().is_empty());
    assert_eq!(status.snapshot().dispatched, 0);
    assert!(!status.is_alive());

    let summary = serializer.shutdown().await?;
    assert_eq!(summary, PlaybackSummary::default());
    Ok(())
}
