//! # Capture Loop
//!
//! The scanning session as an explicit state machine:
//!
//! ```text
//! CONNECTING ──open──▶ STREAMING ◀──reopen── AWAITING_INPUT
//!      │                 │   │                     ▲
//!      └──no source──▶ TERMINATED ◀──q / lost──┘   └── 'a' with a scanned code
//! ```
//!
//! [`Scanner::step`] performs exactly one transition, so the point where the
//! loop hands control to the operator is a state of its own rather than a
//! blocking call buried in the frame loop. [`Scanner::run`] drives `step` until
//! the session terminates.
//!
//! ## Streaming Iteration
//!
//! 1. Flush buffered frames, then read one. A failed read, or a source that
//!    closed on its own, releases and reopens the active source in place; when
//!    that fails too the session ends.
//! 2. Build the reduced grayscale detection frame and decode it.
//! 3. Draw the guides, then every detection scaled back to full resolution.
//! 4. Debounce each decoded code; a new scan event looks the code up and draws
//!    the found / not-found messages.
//! 5. Fit the annotated frame to the display bound, show it and poll a key.
//!
//! Faults inside an iteration are logged and the loop moves on, unless they are
//! fatal (see [`crate::error::classify::is_fatal`]).
//!
//! The store is borrowed for the lifetime of the session; every add is written
//! to disk before the next frame is read.

use tracing::{debug, error, info, trace, warn};

use crate::capture::{FrameSource, SourceSpec};
use crate::cli::ProductPrompt;
use crate::config::ScannerConfig;
use crate::detect::{BarcodeDecoder, BarcodeRegion, Rect};
use crate::display::{Display, Key};
use crate::error::{HasRecoverySuggestion, ScanResult, classify};
use crate::overlay::{self, Canvas, Overlay};
use crate::processing::FrameScaler;
use crate::store::{ProductRecord, ProductStore};

pub mod debounce;

pub use debounce::Debouncer;

/// Capture loop states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Connecting,
    Streaming,
    AwaitingInput,
    Terminated,
}

/// Outcome of a debounced scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    Found { code: String, record: ProductRecord },
    NotFound { code: String },
}

impl ScanEvent {
    pub fn code(&self) -> &str {
        match self {
            ScanEvent::Found { code, .. } | ScanEvent::NotFound { code } => code,
        }
    }
}

/// What one streaming iteration decoded and drew.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    /// Decoder output, in detection-frame coordinates.
    pub detections: Vec<BarcodeRegion>,
    /// Scan events that passed the debouncer.
    pub events: Vec<ScanEvent>,
    /// Everything drawn on the full-resolution frame, in order.
    pub overlays: Vec<Overlay>,
}

impl FrameReport {
    /// Captions drawn on the frame.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.overlays.iter().filter_map(Overlay::text)
    }
}

/// A scanning session over one store and one set of collaborators.
pub struct Scanner<'a, S, D, B, P> {
    config: ScannerConfig,
    store: &'a mut ProductStore,
    source: S,
    display: D,
    decoder: B,
    prompt: P,
    state: LoopState,
    active: Option<SourceSpec>,
    debouncer: Debouncer,
    scaler: FrameScaler,
    last_report: Option<FrameReport>,
}

impl<'a, S, D, B, P> Scanner<'a, S, D, B, P>
where
    S: FrameSource,
    D: Display,
    B: BarcodeDecoder,
    P: ProductPrompt,
{
    pub fn new(
        config: ScannerConfig,
        store: &'a mut ProductStore,
        source: S,
        display: D,
        decoder: B,
        prompt: P,
    ) -> Self {
        let debouncer = Debouncer::new(config.debounce_frames);
        let scaler = FrameScaler::new(config.detect_scale, config.max_display);
        Self {
            config,
            store,
            source,
            display,
            decoder,
            prompt,
            state: LoopState::Connecting,
            active: None,
            debouncer,
            scaler,
            last_report: None,
        }
    }

    /// Drive the session until it terminates.
    ///
    /// # Errors
    ///
    /// Fatal faults (store write failure, closed operator input). The source
    /// and display are released before the error is returned.
    pub fn run(&mut self) -> ScanResult<()> {
        info!(source = %self.config.primary_source(), "scanner session starting");
        while self.state != LoopState::Terminated {
            self.step()?;
        }
        info!("scanner session ended");
        Ok(())
    }

    /// Perform one state transition and return the new state.
    pub fn step(&mut self) -> ScanResult<LoopState> {
        let result = match self.state {
            LoopState::Connecting => Ok(self.connect()),
            LoopState::Streaming => self.stream(),
            LoopState::AwaitingInput => self.await_input(),
            LoopState::Terminated => Ok(LoopState::Terminated),
        };

        let next = match result {
            Ok(next) => next,
            Err(err) => {
                error!(
                    error = %err,
                    context = ?err.context(),
                    state = ?self.state,
                    "fatal error, stopping scanner"
                );
                self.state = LoopState::Terminated;
                self.teardown();
                return Err(err);
            }
        };

        if next != self.state {
            debug!(from = ?self.state, to = ?next, "state transition");
        }
        self.state = next;
        if next == LoopState::Terminated {
            self.teardown();
        }
        Ok(next)
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Report of the most recent frame that was read successfully.
    pub fn last_report(&self) -> Option<&FrameReport> {
        self.last_report.as_ref()
    }

    /// Code the add-product key would register.
    pub fn last_code(&self) -> Option<&str> {
        self.debouncer.last_code()
    }

    /// Source currently in use (primary or fallback).
    pub fn active_source(&self) -> Option<&SourceSpec> {
        self.active.as_ref()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn decoder(&self) -> &B {
        &self.decoder
    }

    fn connect(&mut self) -> LoopState {
        let primary = self.config.primary_source();
        println!("Connecting to {}...", primary);
        match self.source.open(&primary) {
            Ok(()) => return self.connected(primary),
            Err(err) => {
                warn!(error = %err, "primary source unavailable, trying fallback");
                println!("Could not connect to the phone camera. Trying the local camera...");
            }
        }

        let fallback = self.config.fallback_source();
        match self.source.open(&fallback) {
            Ok(()) => self.connected(fallback),
            Err(err) => {
                error!(error = %err, "no video source available");
                println!("Could not open any camera. Exiting.");
                LoopState::Terminated
            }
        }
    }

    fn connected(&mut self, spec: SourceSpec) -> LoopState {
        info!(source = %spec, "video source opened");
        println!("Connected to {}", spec);
        self.active = Some(spec);
        print_hints();
        LoopState::Streaming
    }

    fn stream(&mut self) -> ScanResult<LoopState> {
        match self.process_frame() {
            Ok(next) => Ok(next),
            Err(err) if classify::is_fatal(&err) => Err(err),
            Err(err) => {
                warn!(
                    error = %err,
                    category = err.category(),
                    suggestion = err.recovery_suggestion().unwrap_or_default(),
                    "frame iteration failed"
                );
                println!("Error during execution: {}", err);
                Ok(LoopState::Streaming)
            }
        }
    }

    fn process_frame(&mut self) -> ScanResult<LoopState> {
        if !self.source.is_opened() {
            warn!(source = ?self.active, "video source closed");
            return Ok(self.reconnect());
        }

        for _ in 0..self.config.flush_frames {
            if let Err(err) = self.source.grab() {
                trace!(error = %err, "flush grab failed");
                break;
            }
        }

        let mut frame = match self.source.read() {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(self.reconnect()),
            Err(err) => {
                warn!(error = %err, "frame read failed");
                return Ok(self.reconnect());
            }
        };

        // Detection sees the raw frame, before any overlay is drawn.
        let detection_frame = self.scaler.detection_frame(&frame)?;
        let detections = self.decoder.decode(&detection_frame)?;
        let factor = self.scaler.detect_scale();

        let mut report = FrameReport::default();
        let mut canvas = Canvas::new(&mut frame);
        overlay::draw_guides(&mut canvas);
        for region in &detections {
            let rect = region.rect.scaled(factor);
            overlay::draw_detection(&mut canvas, rect, &region.format, &region.text);
            if self.debouncer.should_fire(&region.text) {
                let event = self.lookup(&mut canvas, rect, &region.text);
                report.events.push(event);
            }
        }
        report.overlays = canvas.into_overlays();
        report.detections = detections;
        self.debouncer.tick();
        self.last_report = Some(report);

        let shown = self.scaler.display_frame(frame)?;
        self.display.show(&self.config.window_title, &shown)?;

        match self.display.poll_key(self.config.key_wait_ms)? {
            Some(Key::Quit) => {
                info!("quit requested");
                Ok(LoopState::Terminated)
            }
            Some(Key::AddProduct) if self.debouncer.last_code().is_some() => {
                // Nothing is buffered while the operator types.
                self.source.release();
                self.display.close();
                Ok(LoopState::AwaitingInput)
            }
            _ => Ok(LoopState::Streaming),
        }
    }

    fn lookup(&self, canvas: &mut Canvas<'_>, rect: Rect, code: &str) -> ScanEvent {
        match self.store.get(code) {
            Some(record) => {
                info!(code, "product found");
                println!("\n=== PRODUCT FOUND ===");
                for (field, value) in record.iter() {
                    println!("{}: {}", field, value);
                }
                println!("=====================\n");
                overlay::draw_found(
                    canvas,
                    rect,
                    record.name().unwrap_or_default(),
                    self.config.name_display_chars,
                );
                ScanEvent::Found {
                    code: code.to_string(),
                    record: record.clone(),
                }
            }
            None => {
                info!(code, "product not found");
                println!("\nERROR: Product with code {} not found in the database.", code);
                println!("Press 'a' to add this product.\n");
                overlay::draw_not_found(canvas, rect, code);
                ScanEvent::NotFound {
                    code: code.to_string(),
                }
            }
        }
    }

    fn reconnect(&mut self) -> LoopState {
        println!("Error reading frame. Trying to reconnect...");
        self.source.release();
        if self.reopen() {
            LoopState::Streaming
        } else {
            println!("Could not reconnect to the camera. Exiting.");
            LoopState::Terminated
        }
    }

    fn await_input(&mut self) -> ScanResult<LoopState> {
        if let Some(code) = self.debouncer.last_code().map(str::to_string) {
            let record = self.prompt.collect_product(&code)?;
            self.store.add(code, record)?;
        }

        if self.reopen() {
            print_hints();
            Ok(LoopState::Streaming)
        } else {
            println!("Error reopening the camera. Exiting.");
            Ok(LoopState::Terminated)
        }
    }

    fn reopen(&mut self) -> bool {
        let Some(spec) = self.active.clone() else {
            return false;
        };
        match self.source.open(&spec) {
            Ok(()) => {
                debug!(source = %spec, "video source reopened");
                true
            }
            Err(err) => {
                error!(error = %err, source = %spec, "video source reopen failed");
                false
            }
        }
    }

    fn teardown(&mut self) {
        self.source.release();
        self.display.close();
    }
}

fn print_hints() {
    println!("Press 'q' to quit");
    println!("Press 'a' to register the last scanned code");
}
