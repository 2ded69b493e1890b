//! Print workflow
//!
//! Drives one print through the DYMO Connect protocol:
//!
//! 1. `StatusConnected` must answer `true`
//! 2. `GetPrinters` picks the target printer (or the service default)
//! 3. `PrintLabel` is posted once per requested copy
//!
//! Every step's failure ends the attempt. There are no retries.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use shared::ADD_NEW_SENTINEL;
use tracing::{debug, info, instrument, warn};

use crate::discovery::{self, Discovery, PrinterTarget};
use crate::error::{PrintError, PrintResult, ValidationError};
use crate::service::{PrintJob, PrinterServiceClient, ServiceResponse};
use crate::template::LabelTemplate;

/// Largest number of copies accepted for one request
pub const MAX_COPIES: u8 = 99;

/// Default pause between two copies of the same label
pub const DEFAULT_COPY_DELAY: Duration = Duration::from_millis(500);

/// Error body fragments that mean the label document was rejected
const INVALID_XML_INDICATORS: [&str; 2] = ["Invalid parameter in stream", "labelXml"];

/// A validated print request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintRequest {
    category: String,
    sku: String,
    copies: u8,
}

impl PrintRequest {
    /// Validate raw selector and SKU input for a single copy.
    pub fn new(category: &str, sku: &str) -> PrintResult<Self> {
        let category = category.trim();
        if category.is_empty() || category == ADD_NEW_SENTINEL {
            return Err(ValidationError::NoCategory.into());
        }

        let sku = sku.trim();
        if sku.is_empty() {
            return Err(ValidationError::NoSku.into());
        }

        Ok(Self {
            category: category.to_string(),
            sku: sku.to_string(),
            copies: 1,
        })
    }

    /// Set the number of copies (1..=99).
    pub fn with_copies(mut self, copies: u32) -> PrintResult<Self> {
        match u8::try_from(copies) {
            Ok(n) if (1..=MAX_COPIES).contains(&n) => {
                self.copies = n;
                Ok(self)
            }
            _ => Err(ValidationError::Copies {
                requested: copies,
                max: MAX_COPIES,
            }
            .into()),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn copies(&self) -> u8 {
        self.copies
    }
}

/// Progress notifications emitted while a print runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintProgress {
    /// Checking that DYMO Connect is up
    Connecting,
    /// Submitting copy `copy` of `of`
    Printing { copy: u8, of: u8 },
}

impl std::fmt::Display for PrintProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connecting => write!(f, "Connecting to DYMO Connect..."),
            Self::Printing { of: 1, .. } => write!(f, "Printing label..."),
            Self::Printing { copy, of } => write!(f, "Printing label {} of {}...", copy, of),
        }
    }
}

/// A successful print
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOutcome {
    pub category: String,
    pub sku: String,
    pub copies: u8,
    pub target: PrinterTarget,
}

impl PrintOutcome {
    /// User-facing success message
    pub fn message(&self) -> String {
        if self.copies == 1 {
            format!("Label printed successfully! ({} - {})", self.category, self.sku)
        } else {
            format!(
                "{} labels printed successfully! ({} - {})",
                self.copies, self.category, self.sku
            )
        }
    }
}

/// Print workflow controller
///
/// Holds the injected service client and refuses to start a second print
/// while one is still in flight.
pub struct PrintWorkflow {
    client: Arc<dyn PrinterServiceClient>,
    template: LabelTemplate,
    copy_delay: Duration,
    in_flight: AtomicBool,
}

impl PrintWorkflow {
    pub fn new(client: Arc<dyn PrinterServiceClient>) -> Self {
        Self {
            client,
            template: LabelTemplate::default(),
            copy_delay: DEFAULT_COPY_DELAY,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Use a different template (e.g. with XML escaping)
    pub fn with_template(mut self, template: LabelTemplate) -> Self {
        self.template = template;
        self
    }

    /// Set the pause between copies
    pub fn with_copy_delay(mut self, delay: Duration) -> Self {
        self.copy_delay = delay;
        self
    }

    /// Whether a print is currently running
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Print one label for the raw selector value and SKU.
    pub async fn print_label(&self, category: &str, sku: &str) -> PrintResult<PrintOutcome> {
        let request = PrintRequest::new(category, sku)?;
        self.print(&request).await
    }

    /// Print a validated request.
    pub async fn print(&self, request: &PrintRequest) -> PrintResult<PrintOutcome> {
        self.print_with_progress(request, |_| {}).await
    }

    /// Print a validated request, reporting each stage to `on_progress`.
    #[instrument(
        skip(self, request, on_progress),
        fields(category = %request.category, sku = %request.sku, copies = request.copies)
    )]
    pub async fn print_with_progress<F>(
        &self,
        request: &PrintRequest,
        mut on_progress: F,
    ) -> PrintResult<PrintOutcome>
    where
        F: FnMut(PrintProgress) + Send,
    {
        let _guard = self.begin().ok_or(PrintError::Busy)?;

        let label_xml = self.template.render(&request.category, &request.sku);

        on_progress(PrintProgress::Connecting);
        self.check_connection().await?;

        let target = self.resolve_printer().await?;
        info!(printer = %target, "Using printer");

        let job = PrintJob::new(target.printer_name(), label_xml);
        for copy in 1..=request.copies {
            on_progress(PrintProgress::Printing {
                copy,
                of: request.copies,
            });

            if let Err(e) = self.submit(&job).await {
                let printed = copy - 1;
                warn!(kind = e.kind(), printed, "Print stopped");
                if printed == 0 {
                    return Err(e);
                }
                return Err(PrintError::Incomplete {
                    printed,
                    requested: request.copies,
                    source: Box::new(e),
                });
            }

            if copy < request.copies && !self.copy_delay.is_zero() {
                tokio::time::sleep(self.copy_delay).await;
            }
        }

        info!("Print job completed");
        Ok(PrintOutcome {
            category: request.category.clone(),
            sku: request.sku.clone(),
            copies: request.copies,
            target,
        })
    }

    /// Step A: the service must be reachable and report `true`.
    async fn check_connection(&self) -> PrintResult<()> {
        let response = self.client.check_status().await.map_err(|e| {
            warn!(error = %e, "Status check failed");
            PrintError::ServiceUnavailable(e.to_string())
        })?;

        debug!(status = response.status, body = %response.body.trim(), "Status response");

        if !response.is_success() {
            return Err(PrintError::ServiceUnavailable(format!(
                "DYMO Connect not available ({})",
                response.status
            )));
        }
        if !response.is_true() {
            return Err(PrintError::ServiceNotReady);
        }
        Ok(())
    }

    /// Step B: pick the printer, or fall back to the service default.
    async fn resolve_printer(&self) -> PrintResult<PrinterTarget> {
        let response = self.client.list_printers().await.map_err(|e| {
            warn!(error = %e, "Printer listing failed");
            PrintError::EnumerationError(e.to_string())
        })?;

        if !response.is_success() {
            return Err(PrintError::EnumerationError(response.status.to_string()));
        }

        match discovery::discover(&response.body) {
            Discovery::NoPrinters => {
                warn!("No printers detected by DYMO Connect");
                Err(PrintError::NoPrintersFound)
            }
            Discovery::Found(target) => Ok(target),
        }
    }

    /// Step C: post the job and classify the answer.
    async fn submit(&self, job: &PrintJob) -> PrintResult<()> {
        let response = self.client.submit_job(job).await.map_err(|e| {
            warn!(error = %e, "Print request failed");
            PrintError::SubmissionError {
                body: e.to_string(),
            }
        })?;

        classify_submission(response)
    }

    fn begin(&self) -> Option<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(&self.in_flight))
    }
}

/// Map a `PrintLabel` response to the workflow result.
fn classify_submission(response: ServiceResponse) -> PrintResult<()> {
    if !response.is_success() {
        warn!(status = response.status, body = %response.body, "Print rejected");
        if INVALID_XML_INDICATORS
            .iter()
            .any(|marker| response.body.contains(marker))
        {
            return Err(PrintError::InvalidLabelXml);
        }
        return Err(PrintError::SubmissionError {
            body: response.body,
        });
    }

    if response.is_true() {
        Ok(())
    } else {
        Err(PrintError::UnexpectedResponse(response.body))
    }
}

/// Clears the in-flight flag when the print finishes, whatever the outcome
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Status,
        Printers,
        Submit,
    }

    type Reply = Result<ServiceResponse, TransportError>;

    struct FakeService {
        status: Reply,
        printers: Reply,
        submits: Mutex<VecDeque<Reply>>,
        calls: Mutex<Vec<Call>>,
        jobs: Mutex<Vec<PrintJob>>,
        gate: Option<(Arc<Notify>, Arc<Notify>)>,
    }

    impl FakeService {
        fn new() -> Self {
            Self {
                status: Ok(ServiceResponse::ok("true")),
                printers: Ok(ServiceResponse::ok(
                    r#"<Printers><Printer Name="DYMO LabelWriter 450"/></Printers>"#,
                )),
                submits: Mutex::new(VecDeque::new()),
                calls: Mutex::new(Vec::new()),
                jobs: Mutex::new(Vec::new()),
                gate: None,
            }
        }

        fn status(mut self, reply: Reply) -> Self {
            self.status = reply;
            self
        }

        fn printers(mut self, reply: Reply) -> Self {
            self.printers = reply;
            self
        }

        fn submit(self, reply: Reply) -> Self {
            self.submits.lock().unwrap().push_back(reply);
            self
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn jobs(&self) -> Vec<PrintJob> {
            self.jobs.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PrinterServiceClient for FakeService {
        async fn check_status(&self) -> Result<ServiceResponse, TransportError> {
            self.calls.lock().unwrap().push(Call::Status);
            if let Some((entered, release)) = &self.gate {
                entered.notify_one();
                release.notified().await;
            }
            self.status.clone()
        }

        async fn list_printers(&self) -> Result<ServiceResponse, TransportError> {
            self.calls.lock().unwrap().push(Call::Printers);
            self.printers.clone()
        }

        async fn submit_job(&self, job: &PrintJob) -> Result<ServiceResponse, TransportError> {
            self.calls.lock().unwrap().push(Call::Submit);
            self.jobs.lock().unwrap().push(job.clone());
            self.submits
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ServiceResponse::ok("true")))
        }
    }

    fn workflow(fake: &Arc<FakeService>) -> PrintWorkflow {
        PrintWorkflow::new(fake.clone()).with_copy_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_validation_makes_no_calls() {
        let fake = Arc::new(FakeService::new());
        let wf = workflow(&fake);

        for category in ["", "   ", ADD_NEW_SENTINEL] {
            let err = wf.print_label(category, "123").await.unwrap_err();
            assert!(matches!(
                err,
                PrintError::Validation(ValidationError::NoCategory)
            ));
        }
        for sku in ["", "  \t "] {
            let err = wf.print_label("CPU", sku).await.unwrap_err();
            assert!(matches!(err, PrintError::Validation(ValidationError::NoSku)));
        }
        assert!(fake.calls().is_empty());
    }

    #[test]
    fn test_copies_range() {
        let req = PrintRequest::new("CPU", " 42 ").unwrap();
        assert_eq!(req.sku(), "42");
        assert_eq!(req.clone().with_copies(99).unwrap().copies(), 99);
        assert!(req.clone().with_copies(0).unwrap_err().is_validation());
        assert!(req.clone().with_copies(100).unwrap_err().is_validation());
        assert!(req.with_copies(300).unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_success_uses_listed_printer() {
        let fake = Arc::new(FakeService::new());
        let wf = workflow(&fake);

        let outcome = wf.print_label("CPU", "SKU-1").await.unwrap();
        assert_eq!(
            outcome.target,
            PrinterTarget::Named("DYMO LabelWriter 450".into())
        );
        assert_eq!(outcome.message(), "Label printed successfully! (CPU - SKU-1)");
        assert_eq!(fake.calls(), vec![Call::Status, Call::Printers, Call::Submit]);

        let jobs = fake.jobs();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].printer_name, "DYMO LabelWriter 450");
        assert!(jobs[0].label_xml.contains("<Text>SKU-1</Text>"));
        assert!(jobs[0].label_xml.contains("<String>CPU</String>"));
        assert_eq!(jobs[0].print_params_xml, "");
        assert_eq!(jobs[0].label_set_xml, "");
    }

    #[tokio::test]
    async fn test_status_not_true_is_not_ready() {
        let fake = Arc::new(FakeService::new().status(Ok(ServiceResponse::ok("false"))));
        let wf = workflow(&fake);

        let err = wf.print_label("CPU", "1").await.unwrap_err();
        assert!(matches!(err, PrintError::ServiceNotReady));
        assert_eq!(fake.calls(), vec![Call::Status]);
    }

    #[tokio::test]
    async fn test_status_http_failure_is_unavailable() {
        let fake = Arc::new(FakeService::new().status(Ok(ServiceResponse::new(503, ""))));
        let wf = workflow(&fake);

        let err = wf.print_label("CPU", "1").await.unwrap_err();
        assert!(matches!(err, PrintError::ServiceUnavailable(ref m) if m.contains("503")));
        assert_eq!(fake.calls(), vec![Call::Status]);
    }

    #[tokio::test]
    async fn test_connection_refused_carries_transport_message() {
        let fake = Arc::new(
            FakeService::new().status(Err(TransportError::new("connection refused"))),
        );
        let wf = workflow(&fake);

        let err = wf.print_label("CPU", "1").await.unwrap_err();
        assert!(matches!(err, PrintError::ServiceUnavailable(ref m) if m == "connection refused"));
        assert_eq!(
            err.to_string(),
            "DYMO Connect is not running or not accessible: connection refused"
        );
    }

    #[tokio::test]
    async fn test_enumeration_failure() {
        let fake = Arc::new(FakeService::new().printers(Ok(ServiceResponse::new(500, "boom"))));
        let wf = workflow(&fake);

        let err = wf.print_label("CPU", "1").await.unwrap_err();
        assert!(matches!(err, PrintError::EnumerationError(_)));
        assert_eq!(fake.calls(), vec![Call::Status, Call::Printers]);
    }

    #[tokio::test]
    async fn test_empty_listing_makes_no_submission() {
        let fake = Arc::new(
            FakeService::new().printers(Ok(ServiceResponse::ok(discovery::EMPTY_PRINTERS_XML))),
        );
        let wf = workflow(&fake);

        let err = wf.print_label("CPU", "1").await.unwrap_err();
        assert!(matches!(err, PrintError::NoPrintersFound));
        assert_eq!(fake.calls(), vec![Call::Status, Call::Printers]);
    }

    #[tokio::test]
    async fn test_unknown_schema_submits_to_default() {
        let fake = Arc::new(
            FakeService::new().printers(Ok(ServiceResponse::ok("<Devices><Device/></Devices>"))),
        );
        let wf = workflow(&fake);

        let outcome = wf.print_label("MOBO", "9").await.unwrap();
        assert_eq!(outcome.target, PrinterTarget::Default);
        assert_eq!(fake.jobs()[0].printer_name, "");
    }

    #[tokio::test]
    async fn test_invalid_label_xml() {
        let fake = Arc::new(FakeService::new().submit(Ok(ServiceResponse::new(
            500,
            "Invalid parameter in stream: labelXml",
        ))));
        let wf = workflow(&fake);

        let err = wf.print_label("CPU", "1").await.unwrap_err();
        assert!(matches!(err, PrintError::InvalidLabelXml));
    }

    #[tokio::test]
    async fn test_other_submission_failure_keeps_body() {
        let fake = Arc::new(
            FakeService::new().submit(Ok(ServiceResponse::new(500, "Printer is offline"))),
        );
        let wf = workflow(&fake);

        let err = wf.print_label("CPU", "1").await.unwrap_err();
        assert!(matches!(err, PrintError::SubmissionError { ref body } if body == "Printer is offline"));
    }

    #[tokio::test]
    async fn test_unexpected_success_body() {
        let fake = Arc::new(FakeService::new().submit(Ok(ServiceResponse::ok("false"))));
        let wf = workflow(&fake);

        let err = wf.print_label("CPU", "1").await.unwrap_err();
        assert!(matches!(err, PrintError::UnexpectedResponse(ref b) if b == "false"));
    }

    #[tokio::test]
    async fn test_copies_check_once_submit_each() {
        let fake = Arc::new(FakeService::new());
        let wf = workflow(&fake);

        let request = PrintRequest::new("CPU", "7").unwrap().with_copies(3).unwrap();
        let mut progress = Vec::new();
        let outcome = wf
            .print_with_progress(&request, |p| progress.push(p))
            .await
            .unwrap();

        assert_eq!(outcome.message(), "3 labels printed successfully! (CPU - 7)");
        assert_eq!(
            fake.calls(),
            vec![Call::Status, Call::Printers, Call::Submit, Call::Submit, Call::Submit]
        );
        assert_eq!(
            progress,
            vec![
                PrintProgress::Connecting,
                PrintProgress::Printing { copy: 1, of: 3 },
                PrintProgress::Printing { copy: 2, of: 3 },
                PrintProgress::Printing { copy: 3, of: 3 },
            ]
        );
    }

    #[tokio::test]
    async fn test_copies_stop_on_first_failure() {
        let fake = Arc::new(
            FakeService::new()
                .submit(Ok(ServiceResponse::ok("true")))
                .submit(Ok(ServiceResponse::ok("false"))),
        );
        let wf = workflow(&fake);

        let request = PrintRequest::new("CPU", "7").unwrap().with_copies(4).unwrap();
        let err = wf.print(&request).await.unwrap_err();
        match err {
            PrintError::Incomplete {
                printed,
                requested,
                source,
            } => {
                assert_eq!((printed, requested), (1, 4));
                assert!(matches!(*source, PrintError::UnexpectedResponse(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fake.jobs().len(), 2);
    }

    #[tokio::test]
    async fn test_second_print_while_busy_is_refused() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let mut fake = FakeService::new();
        fake.gate = Some((entered.clone(), release.clone()));
        let fake = Arc::new(fake);
        let wf = Arc::new(workflow(&fake));

        let first = {
            let wf = wf.clone();
            tokio::spawn(async move { wf.print_label("CPU", "1").await })
        };

        entered.notified().await;
        assert!(wf.is_busy());
        let err = wf.print_label("CPU", "2").await.unwrap_err();
        assert!(matches!(err, PrintError::Busy));

        release.notify_one();
        first.await.unwrap().unwrap();
        assert!(!wf.is_busy());
        assert_eq!(fake.jobs().len(), 1);
    }

    #[tokio::test]
    async fn test_guard_released_after_failure() {
        let fake = Arc::new(FakeService::new().status(Ok(ServiceResponse::ok("false"))));
        let wf = workflow(&fake);

        assert!(wf.print_label("CPU", "1").await.is_err());
        assert!(!wf.is_busy());
        assert!(matches!(
            wf.print_label("CPU", "1").await,
            Err(PrintError::ServiceNotReady)
        ));
    }
}
