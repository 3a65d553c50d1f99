use capture_runtime::Launch;
use clap::{ArgAction, Parser};
use log::LevelFilter;
use miette::Result;

mod driver;

#[derive(Parser)]
#[command(name = "capture")]
#[command(
    author,
    version,
    about = "Run deferred tasks whose source holder is destroyed before they finish"
)]
struct Cli {
    /// When each task starts running
    #[arg(long, value_enum, default_value = "eager")]
    launch: LaunchArg,

    /// Log more to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum LaunchArg {
    /// Start each task on its own thread immediately
    Eager,
    /// Run each task on the main thread when its result is requested
    Lazy,
}

impl From<LaunchArg> for Launch {
    fn from(arg: LaunchArg) -> Self {
        match arg {
            LaunchArg::Eager => Launch::Eager,
            LaunchArg::Lazy => Launch::Lazy,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    // RUST_LOG, when set, takes precedence over -v.
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let launch = Launch::from(cli.launch);
    log::debug!("running scenarios with {} launch", launch);

    let stdout = std::io::stdout();
    driver::run_all(launch, &mut stdout.lock())
}
