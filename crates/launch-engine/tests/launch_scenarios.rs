use std::{path::PathBuf, sync::Arc, time::Duration};

use launch_engine::{
    Error, LaunchConfig, LaunchOutcome, LaunchRequest, LaunchState, Launcher, MAX_MOVES,
};
use launch_winops::{Display, MockWinOps, Point, Rect, WindowHandle, WindowInfo};
use tokio::time::{self, Instant};

fn two_displays() -> Vec<Display> {
    vec![
        Display {
            id: 1,
            bounds: Rect::new(0, 0, 1920, 1080),
            primary: true,
        },
        Display {
            id: 2,
            bounds: Rect::new(1920, 0, 1920, 1080),
            primary: false,
        },
    ]
}

fn launcher_with(config: LaunchConfig) -> (Launcher, MockWinOps) {
    let mock = MockWinOps::new();
    mock.set_displays(two_displays());
    (Launcher::new(Arc::new(mock.clone()), config), mock)
}

fn launcher() -> (Launcher, MockWinOps) {
    launcher_with(LaunchConfig::default())
}

#[tokio::test(start_paused = true)]
async fn places_window_on_target_display() {
    let (launcher, mock) = launcher();
    mock.set_main_window_after(Some(3));

    let report = launcher
        .launch(LaunchRequest::on_display("notes.exe", 2))
        .await;

    let LaunchOutcome::Placed(result) = &report.outcome else {
        panic!("expected placement, got {:?}", report.outcome);
    };
    assert!(result.success);
    assert_eq!(result.applied_origin, Some(Point { x: 1920, y: 0 }));
    assert_eq!(
        report.states,
        vec![
            LaunchState::Idle,
            LaunchState::Spawning,
            LaunchState::Discovering,
            LaunchState::Placing,
            LaunchState::Done,
        ]
    );

    let pid = mock.spawned_pids()[0];
    let handle = MockWinOps::handle_for_pid(pid);
    let origin = Point { x: 1920, y: 0 };
    assert_eq!(mock.moves(), vec![(handle, origin), (handle, origin)]);
    assert!(mock.opened().is_empty());
}

#[tokio::test(start_paused = true)]
async fn launch_on_display_reports_targeted_success() {
    let (launcher, mock) = launcher();
    mock.set_main_window_after(Some(1));
    assert!(launcher.launch_on_display("notes.exe", 2).await);
    assert!(mock.opened().is_empty());
}

#[tokio::test(start_paused = true)]
async fn spawn_failure_falls_back_once() {
    let (launcher, mock) = launcher();
    mock.set_missing("bad.exe");

    let report = launcher
        .launch(LaunchRequest::on_display("bad.exe", 2))
        .await;

    assert!(matches!(
        report.outcome,
        LaunchOutcome::Fallback {
            reason: Error::Spawn { .. },
            opened: true
        }
    ));
    assert_eq!(mock.opened(), vec![PathBuf::from("bad.exe")]);
    assert!(mock.moves().is_empty());
    assert_eq!(report.final_state(), LaunchState::Done);
    assert!(report.states.contains(&LaunchState::Fallback));
}

#[tokio::test(start_paused = true)]
async fn missing_window_times_out_then_falls_back() {
    let (launcher, mock) = launcher();
    let start = Instant::now();

    let ok = launcher.launch_on_display("ghost.exe", 2).await;

    assert!(!ok);
    assert_eq!(mock.main_window_polls(), 40);
    assert_eq!(mock.opened(), vec![PathBuf::from("ghost.exe")]);
    assert!(mock.moves().is_empty());
    assert!(start.elapsed() <= Duration::from_millis(20_500));
}

#[tokio::test(start_paused = true)]
async fn timeout_reason_carries_attempt_count() {
    let (launcher, _mock) = launcher_with(LaunchConfig {
        max_attempts: 5,
        ..LaunchConfig::default()
    });
    let report = launcher
        .launch(LaunchRequest::on_display("ghost.exe", 2))
        .await;
    match report.outcome {
        LaunchOutcome::Fallback {
            reason: Error::DiscoveryTimeout { attempts, .. },
            ..
        } => assert_eq!(attempts, 5),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn unknown_display_falls_back_without_spawning() {
    let (launcher, mock) = launcher();

    let report = launcher
        .launch(LaunchRequest::on_display("notes.exe", 99))
        .await;

    assert!(matches!(
        report.outcome,
        LaunchOutcome::Fallback {
            reason: Error::DisplayNotFound(99),
            opened: true
        }
    ));
    assert!(mock.spawned().is_empty());
    assert_eq!(mock.opened(), vec![PathBuf::from("notes.exe")]);
    assert_eq!(
        report.states,
        vec![LaunchState::Idle, LaunchState::Fallback, LaunchState::Done]
    );
}

#[tokio::test(start_paused = true)]
async fn display_query_failure_falls_back() {
    let (launcher, mock) = launcher();
    mock.set_fail_displays(true);
    assert!(!launcher.launch_on_display("notes.exe", 1).await);
    assert!(mock.spawned().is_empty());
    assert_eq!(mock.opened().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn sequential_launches_spawn_separate_processes() {
    let (launcher, mock) = launcher();
    mock.set_main_window_after(Some(1));

    assert!(launcher.launch_on_display("notes.exe", 2).await);
    assert!(launcher.launch_on_display("notes.exe", 2).await);

    let pids = mock.spawned_pids();
    assert_eq!(pids.len(), 2);
    assert_ne!(pids[0], pids[1]);
    assert_eq!(mock.moves().len(), 2 * MAX_MOVES as usize);
}

#[tokio::test(start_paused = true)]
async fn concurrent_launches_are_independent() {
    let (launcher, mock) = launcher();
    mock.set_main_window_after(Some(2));

    let a = launcher.spawn_launch(LaunchRequest::on_display("notes.exe", 1));
    let b = launcher.spawn_launch(LaunchRequest::on_display("paint.exe", 2));
    let (a, b) = (a.await.unwrap(), b.await.unwrap());

    assert!(a.outcome.is_targeted());
    assert!(b.outcome.is_targeted());
    assert_eq!(mock.spawned().len(), 2);
    assert!(mock.opened().is_empty());
}

#[tokio::test(start_paused = true)]
async fn placement_never_exceeds_two_moves() {
    let (launcher, mock) = launcher();
    mock.set_main_window_after(Some(1));
    mock.set_fail_move(true);

    let report = launcher
        .launch(LaunchRequest::on_display("notes.exe", 2))
        .await;

    let LaunchOutcome::Placed(result) = &report.outcome else {
        panic!("expected placement, got {:?}", report.outcome);
    };
    assert!(!result.success);
    assert_eq!(result.moves, MAX_MOVES);
    let attempted = mock.calls().iter().filter(|c| c.starts_with("move:")).count();
    assert_eq!(attempted, 2);
    // Placement failures do not reopen the application.
    assert!(mock.opened().is_empty());
}

#[tokio::test(start_paused = true)]
async fn window_from_relaunched_process_is_placed() {
    let (launcher, mock) = launcher();
    mock.add_named_window(
        "notes",
        WindowInfo {
            handle: WindowHandle(0x77),
            pid: 4242,
            title: "Notes".into(),
        },
    );

    assert!(launcher.launch_on_display("C:/apps/notes.exe", 2).await);
    assert_eq!(mock.moves()[0], (WindowHandle(0x77), Point { x: 1920, y: 0 }));
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_waiting_request() {
    let (launcher, mock) = launcher();
    let handle = launcher.spawn_launch(LaunchRequest::on_display("ghost.exe", 2));

    time::sleep(Duration::from_millis(1200)).await;
    launcher.shutdown();
    let report = handle.await.unwrap();

    assert!(matches!(report.outcome, LaunchOutcome::Cancelled));
    assert_eq!(report.final_state(), LaunchState::Cancelled);
    assert!(mock.opened().is_empty());
    assert!(mock.moves().is_empty());
    assert!(mock.main_window_polls() < 40);
}

#[tokio::test(start_paused = true)]
async fn shutdown_during_settle_delay_cancels_without_moving() {
    let (launcher, mock) = launcher();
    mock.set_main_window_after(Some(1));

    let task = launcher.spawn_launch(LaunchRequest::on_display("notes.exe", 2));
    time::sleep(Duration::from_millis(50)).await;
    launcher.shutdown();
    let report = task.await.unwrap();

    assert!(matches!(report.outcome, LaunchOutcome::Cancelled));
    assert!(!report.outcome.is_targeted());
    assert_eq!(
        report.states,
        vec![
            LaunchState::Idle,
            LaunchState::Spawning,
            LaunchState::Discovering,
            LaunchState::Placing,
            LaunchState::Cancelled,
        ]
    );
    assert!(mock.moves().is_empty());
    assert!(mock.opened().is_empty());
}

#[tokio::test(start_paused = true)]
async fn launch_on_display_is_false_when_cancelled_before_first_move() {
    let (launcher, mock) = launcher();
    mock.set_main_window_after(Some(1));

    let (ok, ()) = tokio::join!(launcher.launch_on_display("notes.exe", 2), async {
        time::sleep(Duration::from_millis(50)).await;
        launcher.shutdown();
    });

    assert!(!ok);
    assert!(mock.moves().is_empty());
    assert!(mock.opened().is_empty());
}

#[tokio::test(start_paused = true)]
async fn shutdown_during_reapply_delay_keeps_first_move() {
    let (launcher, mock) = launcher();
    mock.set_main_window_after(Some(1));

    let (ok, ()) = tokio::join!(launcher.launch_on_display("notes.exe", 2), async {
        // 200 ms settle, then inside the 1000 ms re-apply delay.
        time::sleep(Duration::from_millis(700)).await;
        launcher.shutdown();
    });

    assert!(ok);
    assert_eq!(mock.moves().len(), 1);
    assert_eq!(mock.moves()[0].1, Point { x: 1920, y: 0 });
    assert!(mock.opened().is_empty());

    let report = launcher
        .launch(LaunchRequest::on_display("notes.exe", 2))
        .await;
    // The shutdown token stays cancelled; a new request stops before moving.
    assert!(matches!(report.outcome, LaunchOutcome::Cancelled));
    assert_eq!(report.final_state(), LaunchState::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn reapply_interruption_is_reported_on_the_result() {
    let (launcher, mock) = launcher();
    mock.set_main_window_after(Some(1));

    let task = launcher.spawn_launch(LaunchRequest::on_display("notes.exe", 2));
    time::sleep(Duration::from_millis(700)).await;
    launcher.shutdown();
    let report = task.await.unwrap();

    let LaunchOutcome::Placed(result) = &report.outcome else {
        panic!("expected placement, got {:?}", report.outcome);
    };
    assert!(result.interrupted);
    assert!(result.success);
    assert_eq!(result.moves, 1);
    assert_eq!(report.final_state(), LaunchState::Done);
}

#[tokio::test(start_paused = true)]
async fn plain_launch_opens_directly() {
    let (launcher, mock) = launcher();
    assert!(launcher.launch_plain("readme.txt").await);
    assert_eq!(mock.opened(), vec![PathBuf::from("readme.txt")]);
    assert!(mock.spawned().is_empty());
    assert!(!mock.calls().iter().any(|c| c == "displays"));
}

#[tokio::test(start_paused = true)]
async fn plain_launch_reports_open_failure() {
    let (launcher, mock) = launcher();
    mock.set_fail_open(true);
    assert!(!launcher.launch_plain("readme.txt").await);
    assert_eq!(mock.opened().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn disabled_targeting_degrades_to_plain_open() {
    let (launcher, mock) = launcher_with(LaunchConfig {
        targeted_placement: false,
        ..LaunchConfig::default()
    });
    mock.set_main_window_after(Some(1));

    let report = launcher
        .launch(LaunchRequest::on_display("notes.exe", 2))
        .await;

    assert!(matches!(report.outcome, LaunchOutcome::Plain { opened: true }));
    assert!(mock.spawned().is_empty());
    assert_eq!(mock.opened().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn degenerate_inputs_do_not_panic() {
    let (launcher, mock) = launcher_with(LaunchConfig {
        max_attempts: 2,
        ..LaunchConfig::default()
    });
    assert!(!launcher.launch_on_display("", 2).await);
    assert!(!launcher.launch_on_display("notes.exe", -1).await);
    assert!(!launcher.launch_on_display("notes.exe", i64::MAX).await);
    assert_eq!(mock.opened().len(), 3);
}
