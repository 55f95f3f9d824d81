use laserkit_communication::{GrblDriver, ScriptedTransport};
use laserkit_core::units::flip_axis;
use laserkit_core::{LaosCutterProperty, NoOpProgress, VectorCommand};
use proptest::prelude::*;

const BANNER: &str = "Grbl 1.1h ['$' for help]";
const LOCK: &str = "[MSG:'$H'|'$X' to unlock]";

proptest! {
    #[test]
    fn flip_twice_is_identity(value in -1.0e4f64..1.0e4, dimension in 0.0f64..1.0e4) {
        let back = flip_axis(flip_axis(value, dimension), dimension);
        prop_assert!((back - value).abs() < 1e-9);
    }

    #[test]
    fn ventilation_toggles_once_per_change(states in prop::collection::vec(any::<bool>(), 0..24)) {
        let driver = GrblDriver::falcon2().unwrap();
        let handle = ScriptedTransport::acknowledging();
        let mut session = driver.open(handle.clone());

        let commands: Vec<VectorCommand> = states
            .iter()
            .map(|&ventilation| {
                VectorCommand::SetProperty(
                    LaosCutterProperty { ventilation, ..Default::default() }.into(),
                )
            })
            .collect();
        session.emit(&commands, 500.0).unwrap();

        let changes = states
            .iter()
            .enumerate()
            .filter(|(i, state)| *i == 0 || states[i - 1] != **state)
            .count();
        let toggles = handle.sent_commands();
        prop_assert_eq!(toggles.len(), changes);
        prop_assert!(toggles.windows(2).all(|pair| pair[0] != pair[1]));
    }

    #[test]
    fn banner_found_within_retry_bound(noise in 0usize..8) {
        for driver in [GrblDriver::grbl().unwrap(), GrblDriver::falcon2().unwrap()] {
            let mut lines: Vec<String> = (0..noise).map(|i| format!("noise {}", i)).collect();
            lines.push(BANNER.to_string());
            lines.push(LOCK.to_string());
            let handle = ScriptedTransport::new().reply(lines).reply(["ok"]);

            let mut session = driver.open(handle);
            let outcome = session.connect(&mut NoOpProgress);

            let bound = usize::from(driver.profile().identity_attempts());
            prop_assert_eq!(outcome.is_ok(), noise + 1 <= bound);
        }
    }
}
