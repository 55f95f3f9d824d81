use laserkit_communication::firmware::grbl::{HandshakeState, LOCK_NOTICE};
use laserkit_communication::{ControllerModel, DriverConfig, GrblDriver, ScriptedTransport};
use laserkit_core::{ConnectionError, Error, NoOpProgress, RecordingProgress};

const BANNER: &str = "Grbl 1.1h ['$' for help]";

fn lock_line() -> String {
    format!("[MSG:{}", LOCK_NOTICE)
}

fn without_auto_home(mut driver: GrblDriver) -> GrblDriver {
    driver
        .set_attribute("Automatically home laser cutter", false)
        .unwrap();
    driver
}

#[test]
fn test_grbl_connects_without_lock() {
    let driver = GrblDriver::grbl().unwrap();
    let handle = ScriptedTransport::new().reply(["", BANNER]);
    let mut progress = RecordingProgress::default();

    let mut session = driver.open(handle.clone());
    session.connect(&mut progress).unwrap();

    assert_eq!(session.state(), HandshakeState::Ready);
    assert_eq!(handle.sent_lines(), vec!["\u{18}"]);
    assert_eq!(
        progress.tasks,
        vec!["Sending soft reset", "Waiting for identification (1/1)"]
    );
}

#[test]
fn test_stale_input_is_discarded_before_reset() {
    let driver = GrblDriver::grbl().unwrap();
    let handle = ScriptedTransport::new()
        .with_pending(["ok", "error:9", BANNER])
        .reply([BANNER]);

    let mut session = driver.open(handle.clone());
    session.connect(&mut NoOpProgress).unwrap();

    assert_eq!(session.state(), HandshakeState::Ready);
    assert!(handle.unread().is_empty());
}

#[test]
fn test_grbl_identity_mismatch_reports_last_line() {
    let driver = GrblDriver::grbl().unwrap();
    let handle = ScriptedTransport::new().reply(["Smoothie", BANNER]);

    let mut session = driver.open(handle.clone());
    let err = session.connect(&mut NoOpProgress).unwrap_err();

    assert_eq!(session.state(), HandshakeState::Error);
    match err {
        Error::Connection(ConnectionError::IdentityMismatch { expected, received }) => {
            assert_eq!(expected, "Grbl");
            assert_eq!(received, "Smoothie");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(handle.sent_commands().is_empty());
}

#[test]
fn test_falcon2_scans_four_lines_for_banner() {
    let driver = GrblDriver::falcon2().unwrap();
    let lock = lock_line();
    let handle = ScriptedTransport::new()
        .reply(["boot", "wifi: off", "[VER:1.1]", BANNER, lock.as_str()])
        .reply(["ok"]);
    let mut progress = RecordingProgress::default();

    let mut session = driver.open(handle.clone());
    session.connect(&mut progress).unwrap();

    assert_eq!(session.state(), HandshakeState::Ready);
    assert_eq!(handle.sent_commands(), vec!["$H"]);
    assert!(progress
        .tasks
        .contains(&"Waiting for identification (4/4)".to_string()));
    assert_eq!(progress.tasks.last().map(String::as_str), Some("Homing"));
}

#[test]
fn test_falcon2_gives_up_after_four_lines() {
    let driver = GrblDriver::falcon2().unwrap();
    let handle = ScriptedTransport::new().reply(["a", "b", "c", "d", BANNER]);

    let mut session = driver.open(handle.clone());
    let err = session.connect(&mut NoOpProgress).unwrap_err();

    assert!(matches!(
        err,
        Error::Connection(ConnectionError::IdentityMismatch { ref received, .. }) if received == "d"
    ));
    assert_eq!(handle.unread(), vec![BANNER]);
}

#[test]
fn test_locked_without_auto_home_issues_no_home_command() {
    for driver in [GrblDriver::grbl().unwrap(), GrblDriver::falcon2().unwrap()] {
        let driver = without_auto_home(driver);
        let lock = lock_line();
        let handle = ScriptedTransport::new().reply([BANNER, lock.as_str()]);

        let mut session = driver.open(handle.clone());
        let err = session.connect(&mut NoOpProgress).unwrap_err();

        assert!(matches!(
            err,
            Error::Connection(ConnectionError::ControllerLocked)
        ));
        assert_eq!(err.to_string(), "Grbl is locked");
        assert_eq!(session.state(), HandshakeState::Error);
        assert!(handle.sent_commands().is_empty());
    }
}

#[test]
fn test_homing_accepts_caution_then_ok() {
    let driver = GrblDriver::grbl().unwrap();
    let lock = lock_line();
    let handle = ScriptedTransport::new()
        .reply([BANNER, lock.as_str()])
        .reply(["[MSG:Caution: Unlocked]", "ok"]);

    let mut session = driver.open(handle.clone());
    session.connect(&mut NoOpProgress).unwrap();

    assert_eq!(session.state(), HandshakeState::Ready);
    assert_eq!(handle.sent_lines(), vec!["\u{18}", "$H"]);
    assert_eq!(handle.written().last(), Some(&b'\n'));
}

#[test]
fn test_homing_fails_after_two_responses() {
    let driver = GrblDriver::grbl().unwrap();
    let lock = lock_line();
    let handle = ScriptedTransport::new()
        .reply([BANNER, lock.as_str()])
        .reply(["error:9", "ALARM:1", "ok"]);

    let mut session = driver.open(handle.clone());
    let err = session.connect(&mut NoOpProgress).unwrap_err();

    match err {
        Error::Connection(ConnectionError::HomingFailed { response }) => {
            assert_eq!(response, "ALARM:1")
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(handle.unread(), vec!["ok"]);
}

#[test]
fn test_grbl_skips_lock_check_without_buffered_input() {
    let driver = without_auto_home(GrblDriver::grbl().unwrap());
    let lock = lock_line();
    // the lock notice only arrives with the next flush
    let handle = ScriptedTransport::new()
        .reply([BANNER])
        .reply([lock.as_str()]);

    let mut session = driver.open(handle.clone());
    session.connect(&mut NoOpProgress).unwrap();
    assert_eq!(session.state(), HandshakeState::Ready);
}

#[test]
fn test_falcon2_without_lock_notice_connects() {
    let driver = without_auto_home(GrblDriver::falcon2().unwrap());
    let handle = ScriptedTransport::new().reply([BANNER]).reply(["ok"]);

    let mut session = driver.open(handle.clone());
    session.connect(&mut NoOpProgress).unwrap();

    assert_eq!(session.state(), HandshakeState::Ready);
    assert!(handle.sent_commands().is_empty());
}

#[test]
fn test_falcon2_homes_whenever_auto_home_is_set() {
    // stock GRBL only homes after a lock notice
    let grbl = GrblDriver::grbl().unwrap();
    let handle = ScriptedTransport::new().reply([BANNER]).reply(["ok"]);
    grbl.open(handle.clone()).connect(&mut NoOpProgress).unwrap();
    assert!(handle.sent_commands().is_empty());

    let falcon = GrblDriver::falcon2().unwrap();
    let handle = ScriptedTransport::new().reply([BANNER]).reply(["ok"]);
    let mut session = falcon.open(handle.clone());
    session.connect(&mut NoOpProgress).unwrap();

    assert_eq!(session.state(), HandshakeState::Ready);
    assert_eq!(handle.sent_commands(), vec!["$H"]);
}

#[test]
fn test_empty_identification_line_skips_banner_check() {
    let mut config = DriverConfig::grbl();
    config.identification_line.clear();
    let driver = GrblDriver::with_config(ControllerModel::Grbl, config).unwrap();
    let handle = ScriptedTransport::new();

    let mut session = driver.open(handle.clone());
    session.connect(&mut NoOpProgress).unwrap();

    assert_eq!(session.state(), HandshakeState::Ready);
    assert_eq!(handle.sent_lines(), vec!["\u{18}"]);
}

#[test]
fn test_failed_handshake_keeps_transport_open() {
    let driver = GrblDriver::grbl().unwrap();
    let handle = ScriptedTransport::new().reply(["Marlin"]).reply(["ok"]);

    let mut session = driver.open(handle.clone());
    assert!(session.connect(&mut NoOpProgress).is_err());

    // the caller can still talk over the same session
    session.send_line("M5").unwrap();
    assert_eq!(handle.sent_commands(), vec!["M5"]);
}
