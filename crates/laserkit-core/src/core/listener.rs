//! Progress listener interface
//!
//! Drivers report user-visible phases ("Sending soft reset", "Homing", ...)
//! and job progress through this trait.

/// Listener for driver progress
///
/// `source` is the model name of the reporting driver.
pub trait ProgressListener {
    /// Called when the driver enters a new phase
    fn task_changed(&mut self, source: &str, task: &str);

    /// Called when job progress advances
    fn progress_changed(&mut self, _source: &str, _percent: u8) {}
}

/// Listener that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgress;

impl ProgressListener for NoOpProgress {
    fn task_changed(&mut self, _source: &str, _task: &str) {}
}

/// Adapter turning a closure into a listener
pub struct FnProgress<F>(pub F);

impl<F> ProgressListener for FnProgress<F>
where
    F: FnMut(&str, &str),
{
    fn task_changed(&mut self, source: &str, task: &str) {
        (self.0)(source, task)
    }
}

/// Listener that records every phase, handy for UIs and tests
#[derive(Debug, Clone, Default)]
pub struct RecordingProgress {
    /// Phases in the order they were reported
    pub tasks: Vec<String>,
    /// Last reported progress
    pub percent: u8,
}

impl ProgressListener for RecordingProgress {
    fn task_changed(&mut self, _source: &str, task: &str) {
        self.tasks.push(task.to_string());
    }

    fn progress_changed(&mut self, _source: &str, percent: u8) {
        self.percent = percent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_listener() {
        let mut seen = Vec::new();
        {
            let mut listener =
                FnProgress(|source: &str, task: &str| seen.push(format!("{source}: {task}")));
            listener.task_changed("Grbl Gcode Driver", "Homing");
        }
        assert_eq!(seen, vec!["Grbl Gcode Driver: Homing".to_string()]);
    }

    #[test]
    fn test_recording_listener() {
        let mut listener = RecordingProgress::default();
        listener.task_changed("x", "Sending soft reset");
        listener.progress_changed("x", 20);
        assert_eq!(listener.tasks, vec!["Sending soft reset"]);
        assert_eq!(listener.percent, 20);
    }
}
