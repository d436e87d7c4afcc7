use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use scan_scale::presets::QualityTier;
use tracing_subscriber::EnvFilter;

use barcode_scanner::config::config::DEFAULT_STORE_PATH;
use barcode_scanner::{Console, ProductStore, RxingDecoder, Scanner, ScannerConfig, SourceSpec};

/// Scan barcodes from a phone camera and look them up in a local product store.
///
/// The camera address is asked interactively, and so is the stream quality
/// unless `--quality` is given.
#[derive(Parser, Debug)]
#[command(name = "scanner")]
#[command(about = "📦 Barcode scanner over a phone camera stream")]
struct Args {
    /// Product store file
    #[arg(long, default_value = DEFAULT_STORE_PATH, help = "JSON file holding the product records")]
    store: PathBuf,

    /// Source used when the stream cannot be opened
    #[arg(
        long,
        default_value = "0",
        help = "Fallback source: camera index, /dev/videoN or a stream URL"
    )]
    fallback_device: SourceSpec,

    /// Stream quality tier, skips the menu
    #[arg(long, value_enum, help = "Stream quality (skips the quality menu)")]
    quality: Option<QualityTier>,

    /// Run without a window
    #[arg(long, help = "Do not open a window (no key input: stop with Ctrl-C)")]
    headless: bool,

    /// Log filter
    #[arg(long, default_value = "info", help = "Log filter, e.g. info or barcode_scanner=debug")]
    log: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log));
    // Logs go to stderr so they do not interleave with the prompts.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut store = ProductStore::load(&args.store)?;

    let mut console = Console::new(io::stdin().lock(), io::stdout());
    let source_url = console.ask_address()?;
    let tier = match args.quality {
        Some(tier) => tier,
        None => console.ask_quality()?,
    };

    let mut config = ScannerConfig::new(source_url, tier.quality(), args.store);
    config.fallback = args.fallback_device;
    config.validate()?;

    println!(
        "\nConnecting to {} with quality {}%...",
        config.source_url,
        tier.quality()
    );

    run_session(config, &mut store, console, args.headless)
}

#[cfg(feature = "opencv")]
fn run_session<P: barcode_scanner::ProductPrompt>(
    config: ScannerConfig,
    store: &mut ProductStore,
    prompt: P,
    headless: bool,
) -> Result<()> {
    use barcode_scanner::{HeadlessDisplay, HighGuiDisplay, OpenCvSource};

    let source = OpenCvSource::new();
    if headless {
        Scanner::new(config, store, source, HeadlessDisplay::new(), RxingDecoder::new(), prompt)
            .run()?;
    } else {
        Scanner::new(config, store, source, HighGuiDisplay::new(), RxingDecoder::new(), prompt)
            .run()?;
    }
    Ok(())
}

#[cfg(not(feature = "opencv"))]
fn run_session<P: barcode_scanner::ProductPrompt>(
    config: ScannerConfig,
    store: &mut ProductStore,
    prompt: P,
    headless: bool,
) -> Result<()> {
    use std::time::Duration;

    use barcode_scanner::{HeadlessDisplay, MjpegSource, WindowDisplay};

    if let SourceSpec::Device(index) = config.fallback {
        tracing::debug!(index, "local cameras need the opencv feature, fallback will fail");
    }
    let source = MjpegSource::new(Duration::from_secs(10))?;
    if headless {
        Scanner::new(config, store, source, HeadlessDisplay::new(), RxingDecoder::new(), prompt)
            .run()?;
    } else {
        Scanner::new(config, store, source, WindowDisplay::new(), RxingDecoder::new(), prompt)
            .run()?;
    }
    Ok(())
}
