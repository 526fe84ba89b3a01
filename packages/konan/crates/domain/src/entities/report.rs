use crate::error::{KonanError, Result};
use std::fmt;

/// Endpoints exercised against a freshly started model service, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Root,
    Liveness,
    Predict,
    Docs,
}

impl Probe {
    pub const SEQUENCE: [Probe; 4] = [Probe::Root, Probe::Liveness, Probe::Predict, Probe::Docs];

    pub fn path(&self) -> &'static str {
        match self {
            Probe::Root => "/",
            Probe::Liveness => "/healthz",
            Probe::Predict => "/predict",
            Probe::Docs => "/docs",
        }
    }

    /// The root probe only checks connectivity; every other probe needs a 200.
    pub fn requires_ok(&self) -> bool {
        !matches!(self, Probe::Root)
    }
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Passed { status: u16 },
    Failed { status: u16 },
    Unreachable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub probe: Probe,
    pub outcome: ProbeOutcome,
}

impl ProbeResult {
    pub fn passed(&self) -> bool {
        matches!(self.outcome, ProbeOutcome::Passed { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestState {
    NotStarted,
    Running,
    Passed,
    Failed,
}

/// Outcome of one smoke test invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmokeTestReport {
    pub image: String,
    pub state: TestState,
    pub probes: Vec<ProbeResult>,
    pub warnings: Vec<String>,
    /// Set when the run stopped before or outside the probe sequence.
    pub failure: Option<String>,
    pub cleaned_up: bool,
}

impl SmokeTestReport {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            state: TestState::NotStarted,
            probes: Vec::new(),
            warnings: Vec::new(),
            failure: None,
            cleaned_up: false,
        }
    }

    pub fn start(&mut self) {
        if self.state == TestState::NotStarted {
            self.state = TestState::Running;
        }
    }

    /// Records a probe result; returns whether the sequence may continue.
    pub fn record(&mut self, result: ProbeResult) -> bool {
        let passed = result.passed();
        self.probes.push(result);
        if !passed {
            self.state = TestState::Failed;
        }
        passed
    }

    pub fn abort(&mut self, reason: impl Into<String>) {
        self.state = TestState::Failed;
        self.failure = Some(reason.into());
    }

    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Moves a run that got through every probe into `Passed`.
    pub fn finish(&mut self) {
        if self.state == TestState::Running {
            self.state = TestState::Passed;
        }
    }

    pub fn passed(&self) -> bool {
        self.state == TestState::Passed
    }

    /// Converts a failed report into the error describing its first failure.
    pub fn into_result(self) -> Result<Self> {
        if self.passed() {
            return Ok(self);
        }

        let first_failure = self.probes.iter().find(|p| !p.passed());
        match first_failure.map(|p| (p.probe, &p.outcome)) {
            Some((probe, ProbeOutcome::Failed { status })) => Err(KonanError::ProbeFailure {
                endpoint: probe.path().to_string(),
                status: *status,
            }),
            Some((probe, ProbeOutcome::Unreachable(reason))) => Err(KonanError::SmokeTest(
                format!("{} unreachable: {}", probe, reason),
            )),
            _ => Err(KonanError::SmokeTest(
                self.failure
                    .unwrap_or_else(|| "the test did not complete".to_string()),
            )),
        }
    }
}
