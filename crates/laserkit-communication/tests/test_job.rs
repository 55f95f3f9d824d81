use laserkit_communication::{GrblDriver, ScriptedTransport};
use laserkit_core::{
    ConnectionError, Error, JobError, LaserJob, NoOpProgress, PowerSpeedFocusFrequencyProperty,
    RecordingProgress, VectorPart,
};

const BANNER: &str = "Grbl 1.1h ['$' for help]";
const DPI: f64 = 25.4;

fn square_job() -> LaserJob {
    let property = PowerSpeedFocusFrequencyProperty {
        power: 80.0,
        speed: 20.0,
        ..Default::default()
    };
    LaserJob::new("square").with_part(
        VectorPart::new(DPI)
            .set_property(property)
            .move_to(10.0, 10.0)
            .line_to(20.0, 10.0)
            .line_to(20.0, 20.0),
    )
}

#[test]
fn test_send_job_runs_handshake_then_stream() {
    let driver = GrblDriver::grbl().unwrap();
    let handle = ScriptedTransport::acknowledging().reply([BANNER]);
    let mut progress = RecordingProgress::default();

    let returned = driver
        .send_job(handle.clone(), &square_job(), &mut progress)
        .unwrap();

    assert_eq!(
        returned.sent_lines(),
        vec![
            "\u{18}",
            "G21",
            "G90",
            "M3",
            "G0X10.000000Y10.000000S0",
            "G1X20.000000Y10.000000S800.000000F600",
            "G1X20.000000Y20.000000",
            "M5",
            "G0X0Y0",
        ]
    );
    assert_eq!(
        progress.tasks,
        vec![
            "checking job",
            "connecting",
            "Sending soft reset",
            "Waiting for identification (1/1)",
            "sending",
            "sent.",
        ]
    );
    assert_eq!(progress.percent, 100);
}

#[test]
fn test_falcon2_post_job_turns_ventilation_off() {
    let driver = GrblDriver::falcon2().unwrap();
    let lock = "[MSG:'$H'|'$X' to unlock]";
    let handle = ScriptedTransport::acknowledging().reply([BANNER, lock]);
    let job = LaserJob::new("vent").with_part(
        VectorPart::new(DPI)
            .set_property(driver.default_vector_property())
            .line_to(1.0, 1.0),
    );

    driver.send_job(handle.clone(), &job, &mut NoOpProgress).unwrap();

    let commands = handle.sent_commands();
    assert_eq!(commands[0], "$H");
    assert_eq!(&commands[1..5], ["G21", "G90", "M3", "M8"]);
    assert_eq!(&commands[commands.len() - 3..], ["M9", "M5", "G0X0Y0"]);
}

#[test]
fn test_out_of_bounds_job_is_rejected_before_connecting() {
    let driver = GrblDriver::grbl().unwrap();
    let handle = ScriptedTransport::acknowledging().reply([BANNER]);
    let job = LaserJob::new("too wide").with_part(VectorPart::new(DPI).line_to(251.0, 0.0));

    let err = driver
        .send_job(handle.clone(), &job, &mut NoOpProgress)
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Job(JobError::OutOfBounds { width, .. }) if width == 250.0
    ));
    assert!(handle.written().is_empty());
}

#[test]
fn test_empty_job_is_rejected() {
    let driver = GrblDriver::grbl().unwrap();
    assert_eq!(
        driver.validate_job(&LaserJob::new("nothing")),
        Err(JobError::EmptyJob)
    );
    assert!(driver.validate_job(&square_job()).is_ok());
}

#[test]
fn test_send_job_surfaces_handshake_failure() {
    let driver = GrblDriver::grbl().unwrap();
    let handle = ScriptedTransport::acknowledging().reply(["Marlin 2.1"]);

    let err = driver
        .send_job(handle.clone(), &square_job(), &mut NoOpProgress)
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Connection(ConnectionError::IdentityMismatch { .. })
    ));
    assert_eq!(handle.sent_lines(), vec!["\u{18}"]);
}

#[test]
fn test_save_job_writes_stream_without_handshake() {
    let driver = GrblDriver::grbl().unwrap();
    let output = driver.save_job(Vec::new(), &square_job()).unwrap();

    let text = String::from_utf8(output).unwrap();
    assert_eq!(
        text,
        "G21\r\nG90\r\nM3\r\nG0X10.000000Y10.000000S0\r\n\
         G1X20.000000Y10.000000S800.000000F600\r\nG1X20.000000Y20.000000\r\n\
         M5\r\nG0X0Y0\r\n"
    );
}

#[test]
fn test_repeated_jobs_start_from_empty_cache() {
    let driver = GrblDriver::grbl().unwrap();
    let first = driver.save_job(Vec::new(), &square_job()).unwrap();
    let second = driver.save_job(Vec::new(), &square_job()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_cloned_driver_is_independent() {
    let original = GrblDriver::falcon2().unwrap();
    let mut copy = original.clone();
    copy.set_attribute("Laserbed width", 300.0).unwrap();
    copy.set_attribute("Pre-Job GCode (comma separated)", "G21").unwrap();

    assert_eq!(original.config().bed_width, 400.0);
    assert_eq!(original.config().pre_job_gcode, "G21,G90,M3");
    assert_eq!(copy.config().bed_width, 300.0);
    assert_eq!(copy.model(), original.model());

    let job = LaserJob::new("edge").with_part(VectorPart::new(DPI).line_to(350.0, 0.0));
    assert!(original.validate_job(&job).is_ok());
    assert!(copy.validate_job(&job).is_err());
}
