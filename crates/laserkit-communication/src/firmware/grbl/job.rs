//! Job execution
//!
//! A job is the pre-job command list, every vector part in order, then the
//! post-job list. Sending runs the handshake first; saving writes the same
//! stream to a sink without acknowledgments.

use super::driver::GrblDriver;
use super::session::GrblSession;
use crate::communication::{LineTransport, WriterTransport};
use laserkit_core::units::px_to_mm;
use laserkit_core::{JobError, LaserJob, ProgressListener, Result};
use std::io::Write;

impl GrblDriver {
    /// Check that a job fits on the bed
    pub fn validate_job(&self, job: &LaserJob) -> std::result::Result<(), JobError> {
        if job.parts.is_empty() {
            return Err(JobError::EmptyJob);
        }
        let (width, height) = (self.config().bed_width, self.config().bed_height);
        for part in &job.parts {
            for (x, y) in part.commands.iter().filter_map(|c| c.target()) {
                let (x, y) = (px_to_mm(x, part.resolution), px_to_mm(y, part.resolution));
                let inside = (0.0..=width).contains(&x) && (0.0..=height).contains(&y);
                if !inside {
                    return Err(JobError::OutOfBounds {
                        x,
                        y,
                        width,
                        height,
                    });
                }
            }
        }
        Ok(())
    }

    /// Connect and send a job, handing the transport back afterwards
    pub fn send_job<T: LineTransport>(
        &self,
        transport: T,
        job: &LaserJob,
        progress: &mut dyn ProgressListener,
    ) -> Result<T> {
        let source = self.model_name();
        progress.progress_changed(source, 0);

        progress.task_changed(source, "checking job");
        self.validate_job(job)?;

        progress.task_changed(source, "connecting");
        let mut session = self.open(transport);
        session.connect(progress)?;

        progress.task_changed(source, "sending");
        tracing::info!("Sending job '{}' ({} commands)", job.title, job.command_count());
        session.run_job(job)?;

        progress.task_changed(source, "sent.");
        progress.progress_changed(source, 100);
        tracing::info!("Job '{}' sent", job.title);
        Ok(session.into_transport())
    }

    /// Write a job's command stream to `writer`
    pub fn save_job<W: Write>(&self, writer: W, job: &LaserJob) -> Result<W> {
        self.validate_job(job)?;
        let mut session = GrblSession::new(self, WriterTransport::new(writer), false);
        session.run_job(job)?;
        tracing::info!("Job '{}' saved", job.title);
        Ok(session.into_transport().into_inner())
    }
}

impl<T: LineTransport> GrblSession<'_, T> {
    /// Send pre-job commands, every part, then post-job commands
    pub fn run_job(&mut self, job: &LaserJob) -> Result<()> {
        let driver = self.driver;
        self.reset_cache();
        self.send_commands(&driver.config().pre_job_commands())?;
        for part in &job.parts {
            self.emit(&part.commands, part.resolution)?;
        }
        self.send_commands(&driver.config().post_job_commands())
    }
}
