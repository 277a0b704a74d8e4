/*!
 * System clipboard access
 *
 * Text is piped into whichever clipboard helper command the platform
 * provides. Helpers are tried in order of preference until one succeeds.
 */

use std::env;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use thiserror::Error;
use tracing::{debug, warn};

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// The command is not available on the system
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Failed to execute the command
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// No suitable clipboard mechanism was found
    #[error("No suitable clipboard mechanism found")]
    NoClipboardFound,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Something that can replace the clipboard content
pub trait Clipboard {
    /// Make `text` the sole clipboard content
    fn copy_to_clipboard(&self, text: &str) -> Result<()>;
}

/// Clipboard helper commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardProvider {
    /// tmux paste buffer, forwarded to the terminal clipboard
    Tmux,
    /// X11 clipboard with xclip
    Xclip,
    /// X11 clipboard with xsel
    Xsel,
    /// Wayland clipboard
    Wayland,
    /// macOS pasteboard
    MacOS,
    /// Windows clipboard, natively or from WSL
    Windows,
    /// Termux clipboard
    Termux,
}

impl ClipboardProvider {
    /// Program and arguments reading the new content from stdin
    fn command(self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Tmux => ("tmux", &["load-buffer", "-w", "-"]),
            Self::Xclip => ("xclip", &["-selection", "clipboard", "-in"]),
            Self::Xsel => ("xsel", &["-b", "-i"]),
            Self::Wayland => ("wl-copy", &[]),
            Self::MacOS => ("pbcopy", &[]),
            Self::Windows => ("clip.exe", &[]),
            Self::Termux => ("termux-clipboard-set", &[]),
        }
    }
}

impl Clipboard for ClipboardProvider {
    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        let (cmd, args) = self.command();
        execute_clipboard_command(cmd, args, text)
    }
}

/// The platform clipboard, trying every available helper in turn
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    providers: Vec<ClipboardProvider>,
}

impl SystemClipboard {
    /// Detect the helpers installed on this system
    pub fn detect() -> Result<Self> {
        let providers = determine_clipboard_providers();
        if providers.is_empty() {
            return Err(ClipboardError::NoClipboardFound);
        }

        debug!("Clipboard providers: {:?}", providers);
        Ok(Self { providers })
    }
}

impl Clipboard for SystemClipboard {
    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        let mut last_error = ClipboardError::NoClipboardFound;

        for provider in &self.providers {
            match provider.copy_to_clipboard(text) {
                Ok(()) => {
                    debug!("Copied {} bytes with {:?}", text.len(), provider);
                    return Ok(());
                }
                Err(e) => {
                    warn!("Clipboard provider {:?} failed: {}", provider, e);
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}

/// Copy text to the system clipboard
///
/// # Examples
/// ```no_run
/// use filescopier::clipboard::copy_to_clipboard;
///
/// if let Err(e) = copy_to_clipboard("Hello, clipboard!") {
///     eprintln!("Failed to copy to clipboard: {}", e);
/// }
/// ```
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    SystemClipboard::detect()?.copy_to_clipboard(text)
}

/// Check if a command exists on the system
pub fn command_exists(command: &str) -> bool {
    if let Some(paths) = env::var_os("PATH") {
        if env::split_paths(&paths).any(|dir| dir.join(command).is_file()) {
            return true;
        }
    }

    // Fall back to running it, for shells that resolve commands elsewhere
    Command::new(command)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// Spawn `cmd`, write `text` to its stdin and wait for it to exit
fn execute_clipboard_command(cmd: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ClipboardError::CommandNotFound(cmd.to_string()),
            _ => ClipboardError::CommandFailed(format!("Failed to spawn {}: {}", cmd, e)),
        })?;

    {
        let mut stdin = child.stdin.take().ok_or_else(|| {
            ClipboardError::CommandFailed(format!("Failed to open stdin for {}", cmd))
        })?;
        if let Err(e) = stdin.write_all(text.as_bytes()) {
            drop(stdin);
            let _ = child.kill();
            let _ = child.wait();
            return Err(ClipboardError::CommandFailed(format!(
                "Failed to write to {}: {}",
                cmd, e
            )));
        }
        // stdin is dropped here so the helper sees EOF
    }

    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::CommandFailed(format!(
            "{} exited with status: {}",
            cmd, status
        )))
    }
}

static PLATFORM: OnceLock<&'static str> = OnceLock::new();

/// Determine the platform (cached)
fn get_platform() -> &'static str {
    PLATFORM.get_or_init(|| {
        if cfg!(target_os = "macos") {
            "macos"
        } else if cfg!(target_os = "windows") {
            "windows"
        } else if cfg!(target_os = "android") {
            "android"
        } else if cfg!(target_os = "linux") {
            if env::var("WSL_DISTRO_NAME").is_ok() {
                "wsl"
            } else {
                "linux"
            }
        } else {
            "unknown"
        }
    })
}

/// Helpers to try on this platform, most preferred first
fn determine_clipboard_providers() -> Vec<ClipboardProvider> {
    let mut providers = Vec::with_capacity(3);

    // Inside a tmux session the tmux buffer reaches the terminal clipboard
    if env::var("TMUX").is_ok() && command_exists("tmux") {
        providers.push(ClipboardProvider::Tmux);
    }

    let candidates: &[ClipboardProvider] = match get_platform() {
        "macos" => &[ClipboardProvider::MacOS],
        "windows" | "wsl" => &[ClipboardProvider::Windows],
        "linux" => {
            if env::var("WAYLAND_DISPLAY").is_ok() {
                &[
                    ClipboardProvider::Wayland,
                    ClipboardProvider::Xsel,
                    ClipboardProvider::Xclip,
                ]
            } else {
                &[ClipboardProvider::Xsel, ClipboardProvider::Xclip]
            }
        }
        "android" => &[ClipboardProvider::Termux],
        _ => &[],
    };

    providers.extend(
        candidates
            .iter()
            .copied()
            .filter(|provider| command_exists(provider.command().0)),
    );

    providers
}
