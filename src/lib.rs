//! # Barcode Scanner
//!
//! Scans barcodes from a live video stream (typically a phone running the IP
//! Webcam app), looks them up in a local JSON product store and lets the
//! operator register unknown products without leaving the session.
//!
//! ## Architecture
//!
//! - `store`: file-backed barcode → product record mapping
//! - `capture`: video sources (HTTP MJPEG, and OpenCV behind the `opencv` feature)
//! - `detect`: barcode decoding on reduced grayscale frames
//! - `processing`: detection and display resize steps
//! - `overlay`: guides and scan messages drawn on the frame
//! - `display`: window (minifb, or highgui with `opencv`) and key polling
//! - `scanner`: the capture loop state machine
//! - `cli`: interactive prompts
//! - `config`: session configuration and address handling
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::io;
//! use std::time::Duration;
//!
//! use barcode_scanner::{
//!     Console, MjpegSource, ProductStore, RxingDecoder, Scanner, ScannerConfig, WindowDisplay,
//! };
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScannerConfig::default();
//! let mut store = ProductStore::load(&config.store_path)?;
//! let console = Console::new(io::stdin().lock(), io::stdout());
//!
//! let mut scanner = Scanner::new(
//!     config,
//!     &mut store,
//!     MjpegSource::new(Duration::from_secs(10))?,
//!     WindowDisplay::new(),
//!     RxingDecoder::new(),
//!     console,
//! );
//! scanner.run()?;
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod cli;
pub mod config;
pub mod detect;
pub mod display;
pub mod error;
pub mod overlay;
pub mod processing;
pub mod scanner;
pub mod store;

pub use capture::{FrameSource, MjpegSource, SourceSpec};
#[cfg(feature = "opencv")]
pub use capture::OpenCvSource;
pub use cli::{Console, ProductPrompt};
pub use config::ScannerConfig;
pub use detect::{BarcodeDecoder, BarcodeRegion, Rect, RxingDecoder};
#[cfg(feature = "opencv")]
pub use display::HighGuiDisplay;
pub use display::{Display, HeadlessDisplay, Key, WindowDisplay};
pub use error::{
    ErrorContext, ErrorSeverity, HasRecoverySuggestion, HasSeverity, Recoverable, ScanError,
    ScanResult,
};
pub use scanner::{FrameReport, LoopState, ScanEvent, Scanner};
pub use store::{ProductRecord, ProductStore};
