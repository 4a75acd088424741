//! Background delivery of submissions so the UI keeps drawing while a
//! request is in flight.
//!
//! The worker owns a current-thread tokio runtime on its own OS thread and
//! handles one [`Submission`] at a time, in arrival order. The UI thread
//! dispatches jobs and polls for [`Delivered`] outcomes between key events.

use std::thread;

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::model::Submission;
use crate::webhook::{EnquirySink, WebhookError};

/// A finished delivery, ready for [`FormController::finish_submit`](crate::model::FormController::finish_submit).
#[derive(Debug)]
pub struct Delivered {
    pub submission: Submission,
    pub outcome: Result<(), WebhookError>,
}

/// Handle to the delivery thread.
///
/// Dropping the handle closes the job channel; the thread exits once any
/// in-flight request finishes.
#[derive(Debug)]
pub struct DeliveryWorker {
    jobs: UnboundedSender<Submission>,
    outcomes: UnboundedReceiver<Delivered>,
}

impl DeliveryWorker {
    /// Starts a worker thread that delivers through `sink`.
    pub fn spawn<S>(sink: S) -> std::io::Result<Self>
    where
        S: EnquirySink + Send + 'static,
    {
        let (jobs, mut job_rx) = unbounded_channel::<Submission>();
        let (outcome_tx, outcomes) = unbounded_channel();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("delivery".into())
            .spawn(move || {
                tracing::info!("delivery worker started");
                runtime.block_on(async move {
                    while let Some(submission) = job_rx.recv().await {
                        let outcome = sink.deliver(submission.form()).await;
                        if outcome_tx.send(Delivered { submission, outcome }).is_err() {
                            break;
                        }
                    }
                });
                tracing::info!("delivery worker stopped");
            })?;

        Ok(Self { jobs, outcomes })
    }

    /// Queues `submission` for delivery.
    ///
    /// Hands the submission back if the worker has stopped.
    pub fn dispatch(&self, submission: Submission) -> Result<(), Submission> {
        self.jobs.send(submission).map_err(|e| e.0)
    }

    /// Returns a finished delivery without blocking, if one is ready.
    ///
    /// Fails with [`WebhookError::WorkerStopped`] once the worker thread has
    /// exited and every outcome it sent has been taken.
    pub fn try_outcome(&mut self) -> Result<Option<Delivered>, WebhookError> {
        match self.outcomes.try_recv() {
            Ok(delivered) => Ok(Some(delivered)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(WebhookError::WorkerStopped),
        }
    }

    /// Blocks until the next delivery finishes.
    ///
    /// Must not be called from inside an async runtime.
    #[cfg(test)]
    pub(crate) fn wait_outcome(&mut self) -> Option<Delivered> {
        self.outcomes.blocking_recv()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use chrono::NaiveDate;

    use super::*;
    use crate::model::{BranchSalesLookup, EnquiryField, EnquiryFormData, FormController};
    use crate::webhook::test_transport_error;

    /// Sink that counts deliveries and fails when told to.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct CountingSink {
        pub(crate) calls: Arc<AtomicUsize>,
        pub(crate) fail: bool,
    }

    impl EnquirySink for CountingSink {
        async fn deliver(&self, _form: &EnquiryFormData) -> Result<(), WebhookError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(test_transport_error())
            } else {
                Ok(())
            }
        }
    }

    fn submission(branch: &str) -> Submission {
        let mut ctl = FormController::with_clock(BranchSalesLookup::default(), || {
            NaiveDate::from_ymd_opt(2026, 2, 3).unwrap()
        });
        ctl.select_branch(branch);
        let person = ctl.sales_people()[0].clone();
        ctl.select_sales_person(person);
        ctl.set_enquiry_field(0, EnquiryField::CustomerName, "C".into());
        ctl.set_enquiry_field(0, EnquiryField::Enquiry, "E".into());
        ctl.begin_submit().unwrap()
    }

    #[test]
    fn delivers_and_reports_outcome() {
        let sink = CountingSink::default();
        let calls = Arc::clone(&sink.calls);
        let mut worker = DeliveryWorker::spawn(sink).unwrap();

        worker.dispatch(submission("Surat")).unwrap();
        let delivered = worker.wait_outcome().unwrap();

        assert!(delivered.outcome.is_ok());
        assert_eq!(delivered.submission.form().branch_name, "Surat");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reports_transport_failure() {
        let sink = CountingSink {
            fail: true,
            ..CountingSink::default()
        };
        let mut worker = DeliveryWorker::spawn(sink).unwrap();

        worker.dispatch(submission("Delhi")).unwrap();
        let delivered = worker.wait_outcome().unwrap();

        assert!(matches!(
            delivered.outcome,
            Err(WebhookError::Transport(_))
        ));
    }

    #[test]
    fn outcomes_arrive_in_dispatch_order() {
        let mut worker = DeliveryWorker::spawn(CountingSink::default()).unwrap();
        worker.dispatch(submission("Jaipur")).unwrap();
        worker.dispatch(submission("Kolkata")).unwrap();

        let first = worker.wait_outcome().unwrap();
        let second = worker.wait_outcome().unwrap();
        assert_eq!(first.submission.form().branch_name, "Jaipur");
        assert_eq!(second.submission.form().branch_name, "Kolkata");
    }

    /// Sink whose delivery kills the worker thread.
    #[derive(Debug, Clone, Copy, Default)]
    pub(crate) struct PanickingSink;

    impl EnquirySink for PanickingSink {
        async fn deliver(&self, _form: &EnquiryFormData) -> Result<(), WebhookError> {
            panic!("sink exploded");
        }
    }

    /// Polls `worker` until it yields something other than `Ok(None)`.
    fn poll_until_ready(worker: &mut DeliveryWorker) -> Result<Option<Delivered>, WebhookError> {
        for _ in 0..500 {
            match worker.try_outcome() {
                Ok(None) => thread::sleep(Duration::from_millis(10)),
                other => return other,
            }
        }
        Ok(None)
    }

    #[test]
    fn try_outcome_is_empty_before_dispatch() {
        let mut worker = DeliveryWorker::spawn(CountingSink::default()).unwrap();
        assert!(matches!(worker.try_outcome(), Ok(None)));
    }

    #[test]
    fn try_outcome_returns_finished_delivery() {
        let mut worker = DeliveryWorker::spawn(CountingSink::default()).unwrap();
        worker.dispatch(submission("Tirupur")).unwrap();
        let delivered = poll_until_ready(&mut worker).unwrap().unwrap();
        assert_eq!(delivered.submission.form().branch_name, "Tirupur");
    }

    #[test]
    fn dead_worker_is_reported() {
        let mut worker = DeliveryWorker::spawn(PanickingSink).unwrap();
        worker.dispatch(submission("Ahmedabad")).unwrap();
        assert!(matches!(
            poll_until_ready(&mut worker),
            Err(WebhookError::WorkerStopped)
        ));
    }
}
