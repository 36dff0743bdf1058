//! Command-line handling, including the screensaver host conventions (`/s`, `/c`, `/p`).

use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Plain windowed run.
    Run,
    /// Started by the screensaver host; runs fullscreen.
    Screensaver,
    /// Settings dialog requested; there is none, so the scene runs windowed.
    Configure,
    /// Preview inside a host-owned window, which is unsupported.
    Preview,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub mode: LaunchMode,
    pub fullscreen: bool,
    pub config_path: Option<PathBuf>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            mode: LaunchMode::Run,
            fullscreen: false,
            config_path: None,
        }
    }
}

/// Parse arguments, excluding the program name. Unknown arguments are logged and ignored.
pub fn parse_args<I, S>(args: I) -> LaunchOptions
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = LaunchOptions::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let arg = arg.as_ref();
        let lower = arg.to_ascii_lowercase();
        // Hosts pass the window handle either as "/c:1234" or as a separate argument.
        let flag = lower.split(':').next().unwrap_or_default();
        match flag {
            "/s" | "-s" => {
                options.mode = LaunchMode::Screensaver;
                options.fullscreen = true;
            }
            "/c" | "-c" => options.mode = LaunchMode::Configure,
            "/p" | "-p" => {
                options.mode = LaunchMode::Preview;
                // Skip the parent window handle.
                args.next();
            }
            "--fullscreen" => options.fullscreen = true,
            "--config" => match args.next() {
                Some(path) => options.config_path = Some(PathBuf::from(path.as_ref())),
                None => log::warn!("--config needs a path, ignoring"),
            },
            _ => log::warn!("Ignoring unknown argument {:?}", arg),
        }
    }
    options
}
