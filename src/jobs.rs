use crate::command::ExitCode;
use crate::external::exit_code;
use std::process::Child;

/// A background child together with the segment slot that started it.
#[derive(Debug)]
pub struct PendingJob {
    pub child: Child,
    pub slot: usize,
}

/// Background children started by the current line.
///
/// Every job must be waited on before the next line is read. [`PendingJobs::drain`]
/// does that explicitly; dropping the set drains whatever is left so a child can
/// never be abandoned as a zombie, even on an early return.
#[derive(Debug, Default)]
pub struct PendingJobs {
    jobs: Vec<PendingJob>,
}

impl PendingJobs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, child: Child, slot: usize) {
        log::trace!("deferring wait for pid {} (slot {})", child.id(), slot);
        self.jobs.push(PendingJob { child, slot });
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Wait for every pending job, in launch order.
    ///
    /// Returns `(slot, exit code)` pairs. A job whose wait fails is reported with
    /// exit code -1.
    pub fn drain(&mut self) -> Vec<(usize, ExitCode)> {
        self.jobs
            .drain(..)
            .map(|mut job| {
                let code = match job.child.wait() {
                    Ok(status) => exit_code(status),
                    Err(err) => {
                        log::debug!("wait for pid {} failed: {}", job.child.id(), err);
                        -1
                    }
                };
                log::trace!("slot {} finished with {}", job.slot, code);
                (job.slot, code)
            })
            .collect()
    }
}

impl Drop for PendingJobs {
    fn drop(&mut self) {
        if !self.jobs.is_empty() {
            log::debug!("draining {} background job(s) on drop", self.jobs.len());
            self.drain();
        }
    }
}
