/// Console tests
/// Drive the session through text commands and the headless engine
use cadence_console::{Command, Console, ConsoleConfig, ConsoleError, Mode, Outcome};
use cadence_playback::PlaybackState;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

fn create_console(track_length: f64) -> Console {
    let mut config = ConsoleConfig::default();
    config.engine.track_length = track_length;
    Console::new(&config).unwrap()
}

fn exec(console: &mut Console, line: &str) -> Outcome {
    let command = Command::parse(line).unwrap().unwrap();
    console.execute(command)
}

fn run_script(console: &mut Console, script: &str) -> Vec<PlaybackState> {
    let mut reports = Vec::new();
    console
        .run(Cursor::new(script), Mode::Script, |state| reports.push(state.clone()))
        .unwrap();
    reports
}

fn current_name(console: &Console) -> Option<String> {
    console
        .session()
        .state()
        .current_track
        .as_ref()
        .map(|t| t.name.clone())
}

#[test]
fn play_starts_after_pump() {
    let mut console = create_console(10.0);
    exec(&mut console, "play /music/a.mp3 /music/b.mp3");

    let state = console.session().get_state();
    assert!(state.is_playing);
    assert_eq!(state.current_index, Some(0));
    assert_eq!(state.duration, 10.0);
    assert_eq!(current_name(&console).as_deref(), Some("a.mp3"));
    assert_eq!(
        console.control().source().as_deref(),
        Some("http://127.0.0.1:8000/play-file/a.mp3")
    );
}

#[test]
fn track_end_advances_through_queue() {
    let mut console = create_console(10.0);
    let reports = run_script(
        &mut console,
        "play /music/a.mp3 /music/b.mp3\n\
         tick 4\n\
         state\n\
         tick 10\n\
         state\n\
         tick 10\n\
         state\n",
    );

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].current_time, 4.0);
    assert_eq!(reports[0].current_index, Some(0));

    assert!(reports[1].is_playing);
    assert_eq!(reports[1].current_index, Some(1));
    assert_eq!(reports[1].current_time, 0.0);

    // End of the last track stops without wrapping
    assert!(!reports[2].is_playing);
    assert_eq!(reports[2].current_index, Some(1));
}

#[test]
fn pause_and_resume_keep_position() {
    let mut console = create_console(60.0);
    run_script(&mut console, "play /music/a.mp3\ntick 12\npause\ntick 5\n");

    assert!(!console.session().state().is_playing);
    assert_eq!(console.control().position(), 12.0);

    exec(&mut console, "resume");
    let state = console.session().get_state();
    assert!(state.is_playing);
    assert_eq!(state.current_time, 12.0);
    assert_eq!(console.control().position(), 12.0);
}

#[test]
fn loop_replays_current_track() {
    let mut console = create_console(30.0);
    run_script(
        &mut console,
        "play /music/a.mp3 /music/b.mp3\nloop\ntick 20\nend\n",
    );

    let state = console.session().get_state();
    assert!(state.is_loop);
    assert!(state.is_playing);
    assert_eq!(state.current_index, Some(0));
    assert_eq!(state.current_time, 0.0);
    assert_eq!(console.control().position(), 0.0);
}

#[test]
fn end_of_queue_halts_engine() {
    let mut console = create_console(30.0);
    run_script(&mut console, "play /music/a.mp3\ntick 5\nnext\n");

    assert!(!console.session().state().is_playing);
    assert!(!console.control().is_playing());

    // A stopped deck produces no further time updates
    exec(&mut console, "tick 10");
    assert_eq!(console.control().position(), 5.0);
    assert_eq!(console.session().state().current_time, 5.0);
}

#[test]
fn engine_failure_stops_playback() {
    let mut console = create_console(30.0);
    run_script(&mut console, "play /music/a.mp3\nfail MEDIA_ERR_DECODE\n");

    assert!(!console.session().state().is_playing);
    assert_eq!(current_name(&console).as_deref(), Some("a.mp3"));
}

#[test]
fn sleep_timer_uses_simulated_clock() {
    let mut console = create_console(300.0);
    run_script(&mut console, "play /music/a.mp3\nsleep 30\ntick 20\n");
    assert!(console.session().state().is_playing);
    assert!(console.session().sleep_timer().is_some());

    exec(&mut console, "tick 20");
    assert!(!console.session().state().is_playing);
    assert!(console.session().sleep_timer().is_none());
}

#[test]
fn sleep_off_cancels_timer() {
    let mut console = create_console(300.0);
    run_script(&mut console, "play /music/a.mp3\nsleep 30\nsleep off\ntick 60\n");

    assert!(console.session().state().is_playing);
    assert!(console.session().sleep_timer().is_none());
}

#[test]
fn volume_and_mute_reach_engine() {
    let mut console = create_console(30.0);
    run_script(&mut console, "volume 20\nmute\n");

    assert!((console.control().gain() - 0.2).abs() < 1e-6);
    assert!(console.control().is_muted());
    assert_eq!(console.session().state().volume, 20);
}

#[test]
fn subscribers_see_every_snapshot() {
    let mut console = create_console(30.0);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _subscription = console.subscribe(move |state| sink.lock().unwrap().push(state.is_playing));

    exec(&mut console, "play /music/a.mp3");

    // play_track, metadata, play started
    assert_eq!(*seen.lock().unwrap(), vec![false, false, true]);
}

#[test]
fn script_mode_reports_bad_line() {
    let mut console = create_console(30.0);
    let err = console
        .run(
            Cursor::new("play /music/a.mp3\n\nvolume 400\nnext\n"),
            Mode::Script,
            |_| {},
        )
        .unwrap_err();

    assert!(matches!(err, ConsoleError::Script { line: 3, .. }));
}

#[test]
fn interactive_mode_skips_bad_lines() {
    let mut console = create_console(30.0);
    console
        .run(
            Cursor::new("rewind\nplay /music/a.mp3 /music/b.mp3\nnext\n"),
            Mode::Interactive,
            |_| {},
        )
        .unwrap();

    assert_eq!(current_name(&console).as_deref(), Some("b.mp3"));
}

#[test]
fn quit_stops_reading() {
    let mut console = create_console(30.0);
    run_script(&mut console, "quit\nplay /music/a.mp3\n");

    assert!(console.session().state().current_track.is_none());
    assert_eq!(exec(&mut console, "quit"), Outcome::Quit);
}
