use screen_auto_clicker::automation::{DEFAULT_INTERVAL_SECS, DEFAULT_SNAPSHOT_DIR, DEFAULT_THRESHOLD};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Gui,
    Run {
        template: PathBuf,
        interval_secs: u64,
    },
}

#[derive(Debug, PartialEq)]
pub struct Args {
    pub mode: Mode,
    pub threshold: f32,
    pub snapshot_dir: Option<PathBuf>,
    pub debug_mode: bool,
    /// Problems that did not stop parsing; logged once the logger is up.
    pub warnings: Vec<String>,
}

impl Args {
    /// `Ok(None)` means help or version was printed and the program should exit cleanly.
    pub fn parse() -> Result<Option<Self>, String> {
        Self::parse_from(env::args().skip(1))
    }

    pub fn parse_from<I, S>(args: I) -> Result<Option<Self>, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut gui = false;
        let mut debug_mode = false;
        let mut threshold = DEFAULT_THRESHOLD;
        let mut snapshot_dir: Option<PathBuf> = None;
        let mut positional: Vec<String> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();

        for arg in args {
            let arg = arg.as_ref();
            if arg == "--help" || arg == "-h" {
                print_help();
                return Ok(None);
            } else if arg == "--version" || arg == "-v" {
                println!(
                    "Screen Auto Clicker v{} (built {})",
                    env!("APP_VERSION_DISPLAY"),
                    env!("APP_BUILD_DATE")
                );
                return Ok(None);
            } else if arg == "--debug" {
                debug_mode = true;
            } else if arg == "--gui" {
                gui = true;
            } else if arg == "--save-matches" {
                snapshot_dir = Some(PathBuf::from(DEFAULT_SNAPSHOT_DIR));
            } else if let Some(dir) = arg.strip_prefix("--save-matches=") {
                if dir.is_empty() {
                    return Err("--save-matches= needs a directory".to_string());
                }
                snapshot_dir = Some(PathBuf::from(dir));
            } else if let Some(val) = arg.strip_prefix("--threshold=") {
                threshold = match val.parse::<f32>() {
                    Ok(t) if t.is_finite() => t,
                    _ => return Err(format!("Invalid threshold value: {val}")),
                };
            } else if is_flag(arg) {
                return Err(format!("Unknown argument: {arg}"));
            } else {
                positional.push(arg.to_string());
            }
        }

        let mode = if gui {
            Mode::Gui
        } else {
            let mut positional = positional.into_iter();
            let template = positional
                .next()
                .map(PathBuf::from)
                .ok_or_else(|| "Missing template image path".to_string())?;
            let interval_secs = positional
                .next()
                .map(|raw| {
                    parse_interval(&raw).unwrap_or_else(|warning| {
                        warnings.push(warning);
                        DEFAULT_INTERVAL_SECS
                    })
                })
                .unwrap_or(DEFAULT_INTERVAL_SECS);
            if let Some(extra) = positional.next() {
                return Err(format!("Unexpected argument: {extra}"));
            }
            Mode::Run {
                template,
                interval_secs,
            }
        };

        Ok(Some(Args {
            mode,
            threshold,
            snapshot_dir,
            debug_mode,
            warnings,
        }))
    }
}

/// Negative numbers are positional so they reach the interval fallback.
fn is_flag(arg: &str) -> bool {
    arg.strip_prefix('-')
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| !c.is_ascii_digit())
}

/// Non-integer or zero intervals are rejected with the warning to log.
fn parse_interval(raw: &str) -> Result<u64, String> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(format!(
            "Invalid interval '{}', using default of {} seconds",
            raw, DEFAULT_INTERVAL_SECS
        )),
    }
}

pub fn print_help() {
    println!("🖱️ Screen Auto Clicker");
    println!();
    println!("USAGE:");
    println!("    screen-auto-clicker <template-image> [interval-seconds] [FLAGS]");
    println!("    screen-auto-clicker --gui");
    println!();
    println!("ARGS:");
    println!("    <template-image>      Image to look for on screen (png, jpg, bmp)");
    println!(
        "    [interval-seconds]    Seconds between checks (default: {})",
        DEFAULT_INTERVAL_SECS
    );
    println!();
    println!("FLAGS:");
    println!(
        "    --threshold=T         Minimum match score, 0.0-1.0 (default: {})",
        DEFAULT_THRESHOLD
    );
    println!(
        "    --save-matches[=DIR]  Save annotated screenshots of matches (default dir: {})",
        DEFAULT_SNAPSHOT_DIR
    );
    println!("    --gui                 Launch GUI interface");
    println!("    --debug               Enable debug output");
    println!("    --help, -h            Show this help message");
    println!("    --version, -v         Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    screen-auto-clicker button.png");
    println!("    screen-auto-clicker button.png 10 --threshold=0.9");
    println!("    screen-auto-clicker ok.png 5 --save-matches=debug");
    println!("    screen-auto-clicker --gui");
}
