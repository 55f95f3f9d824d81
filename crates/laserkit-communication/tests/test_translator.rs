use laserkit_communication::{GrblDriver, ScriptedTransport};
use laserkit_core::{
    Error, JobError, LaosCutterProperty, LaserJob, LaserProperty, PowerSpeedFocusFrequencyProperty,
    VectorCommand, VectorPart,
};

/// One pixel per millimeter
const DPI: f64 = 25.4;

fn power_speed(power: f64, speed: f64) -> LaserProperty {
    PowerSpeedFocusFrequencyProperty {
        power,
        speed,
        ..Default::default()
    }
    .into()
}

fn laos(power: f64, speed: f64, ventilation: bool) -> LaserProperty {
    LaosCutterProperty {
        power,
        speed,
        ventilation,
        ..Default::default()
    }
    .into()
}

fn emit(driver: &GrblDriver, part: VectorPart) -> Vec<String> {
    let handle = ScriptedTransport::acknowledging();
    let mut session = driver.open(handle.clone());
    session.emit(&part.commands, part.resolution).unwrap();
    handle.sent_commands()
}

#[test]
fn test_empty_command_list_writes_nothing() {
    let driver = GrblDriver::grbl().unwrap();
    let handle = ScriptedTransport::acknowledging();
    let mut session = driver.open(handle.clone());

    session.emit(&[], DPI).unwrap();

    assert!(handle.written().is_empty());
    assert_eq!(handle.flush_count(), 0);
}

#[test]
fn test_power_is_resent_after_blanked_rapid() {
    let driver = GrblDriver::grbl().unwrap();
    let part = VectorPart::new(DPI)
        .set_property(power_speed(50.0, 50.0))
        .move_to(1.0, 2.0)
        .line_to(10.0, 2.0)
        .line_to(10.0, 20.0)
        .move_to(30.0, 30.0)
        .line_to(40.0, 30.0);

    assert_eq!(
        emit(&driver, part),
        vec![
            "G0X1.000000Y2.000000S0",
            "G1X10.000000Y2.000000S500.000000F1500",
            "G1X10.000000Y20.000000",
            "G0X30.000000Y30.000000S0",
            "G1X40.000000Y30.000000S500.000000F1500",
        ]
    );
}

#[test]
fn test_feed_matching_travel_speed_is_sent_after_rapid() {
    let driver = GrblDriver::grbl().unwrap();
    let part = VectorPart::new(DPI)
        .set_property(power_speed(100.0, 100.0))
        .move_to(0.0, 0.0)
        .line_to(5.0, 5.0)
        .line_to(6.0, 5.0)
        .move_to(9.0, 9.0)
        .line_to(10.0, 9.0);

    assert_eq!(
        emit(&driver, part),
        vec![
            "G0X0.000000Y0.000000S0",
            "G1X5.000000Y5.000000S1000.000000F3000",
            "G1X6.000000Y5.000000",
            "G0X9.000000Y9.000000S0",
            "G1X10.000000Y9.000000S1000.000000F3000",
        ]
    );
}

#[test]
fn test_default_property_job_states_feed_on_first_cut() {
    for driver in [GrblDriver::grbl().unwrap(), GrblDriver::falcon2().unwrap()] {
        let part = VectorPart::new(DPI)
            .set_property(driver.default_vector_property())
            .move_to(1.0, 1.0)
            .line_to(5.0, 5.0);
        let gcode = driver
            .save_job(Vec::new(), &LaserJob::new("feed").with_part(part))
            .unwrap();
        let gcode = String::from_utf8(gcode).unwrap();

        let first_cut = gcode.lines().find(|l| l.starts_with("G1")).unwrap();
        assert!(first_cut.contains('F'), "{}: {}", driver.model_name(), first_cut);
    }
}

#[test]
fn test_rapids_without_blanking_keep_power() {
    let mut driver = GrblDriver::grbl().unwrap();
    driver
        .set_attribute("Force laser off during G0 moves", false)
        .unwrap();
    let part = VectorPart::new(DPI)
        .set_property(power_speed(20.0, 10.0))
        .line_to(1.0, 1.0)
        .move_to(2.0, 2.0)
        .line_to(3.0, 3.0);

    assert_eq!(
        emit(&driver, part),
        vec![
            "G1X1.000000Y1.000000S200.000000F300",
            "G0X2.000000Y2.000000",
            "G1X3.000000Y3.000000F300",
        ]
    );
}

#[test]
fn test_property_change_updates_targets() {
    let driver = GrblDriver::grbl().unwrap();
    let part = VectorPart::new(DPI)
        .set_property(power_speed(10.0, 10.0))
        .line_to(1.0, 0.0)
        .set_property(power_speed(20.0, 10.0))
        .line_to(2.0, 0.0);

    assert_eq!(
        emit(&driver, part),
        vec![
            "G1X1.000000Y0.000000S100.000000F300",
            "G1X2.000000Y0.000000S200.000000",
        ]
    );
}

#[test]
fn test_falcon2_mirrors_y_against_bed_height() {
    let driver = GrblDriver::falcon2().unwrap();
    let part = VectorPart::new(DPI)
        .set_property(laos(100.0, 100.0, false))
        .move_to(10.0, 15.0)
        .line_to(400.0, 0.0);

    assert_eq!(
        emit(&driver, part),
        vec![
            "M9",
            "G0X10.000000Y400.000000S0",
            "G1X400.000000Y415.000000S1000.000000F6000",
        ]
    );
}

#[test]
fn test_ventilation_toggles_only_on_change() {
    let driver = GrblDriver::falcon2().unwrap();
    let handle = ScriptedTransport::acknowledging();
    let mut session = driver.open(handle.clone());

    let commands = [
        VectorCommand::SetProperty(laos(50.0, 50.0, true)),
        VectorCommand::SetProperty(laos(60.0, 50.0, true)),
        VectorCommand::SetProperty(laos(60.0, 50.0, false)),
        VectorCommand::SetProperty(laos(60.0, 50.0, false)),
        VectorCommand::SetProperty(laos(60.0, 50.0, true)),
    ];
    session.emit(&commands, DPI).unwrap();

    assert_eq!(handle.sent_commands(), vec!["M8", "M9", "M8"]);
    assert_eq!(session.cache().ventilation, Some(true));
}

#[test]
fn test_ventilation_needs_capability() {
    let mut driver = GrblDriver::falcon2().unwrap();
    driver.set_attribute("Supports ventilation", false).unwrap();
    let part = VectorPart::new(DPI)
        .set_property(laos(50.0, 50.0, true))
        .line_to(1.0, 1.0);

    let lines = emit(&driver, part);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("G1"));
}

#[test]
fn test_cache_reset_forces_resend() {
    let driver = GrblDriver::falcon2().unwrap();
    let handle = ScriptedTransport::acknowledging();
    let mut session = driver.open(handle.clone());
    let commands = [VectorCommand::SetProperty(laos(50.0, 50.0, true))];

    session.emit(&commands, DPI).unwrap();
    session.reset_cache();
    session.emit(&commands, DPI).unwrap();

    assert_eq!(handle.sent_commands(), vec!["M8", "M8"]);
}

#[test]
fn test_property_kind_mismatch_is_rejected() {
    let grbl = GrblDriver::grbl().unwrap();
    let handle = ScriptedTransport::acknowledging();
    let err = grbl
        .open(handle.clone())
        .emit(&[VectorCommand::SetProperty(laos(50.0, 50.0, true))], DPI)
        .unwrap_err();
    match err {
        Error::Job(JobError::ContractViolation { expected, received }) => {
            assert_eq!(expected, "PowerSpeedFocusFrequency");
            assert_eq!(received, "LaosCutter");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(handle.written().is_empty());

    let falcon = GrblDriver::falcon2().unwrap();
    let err = falcon
        .open(ScriptedTransport::acknowledging())
        .emit(&[VectorCommand::SetProperty(power_speed(50.0, 50.0))], DPI)
        .unwrap_err();
    assert!(matches!(err, Error::Job(JobError::ContractViolation { .. })));
}

#[test]
fn test_resolution_scales_coordinates() {
    let driver = GrblDriver::grbl().unwrap();
    let part = VectorPart::new(500.0).move_to(500.0, 1000.0);
    assert_eq!(emit(&driver, part), vec!["G0X25.400000Y50.800000S0"]);
}
