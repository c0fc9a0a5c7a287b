// signal.rs - Process-wide quit/resize flags fed by OS signals

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Flags raised asynchronously and consumed by the scheduler's poll loop.
///
/// Listeners only ever set a flag. The poll loop reads `quit` and
/// reads-and-clears `resize`.
#[derive(Debug, Default)]
pub struct SignalFlags {
    quit: AtomicBool,
    resize: AtomicBool,
}

impl SignalFlags {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn request_quit(&self) {
        self.quit.store(true, Ordering::SeqCst);
    }

    pub fn request_resize(&self) {
        self.resize.store(true, Ordering::SeqCst);
    }

    pub fn quit_requested(&self) -> bool {
        self.quit.load(Ordering::SeqCst)
    }

    pub fn take_resize(&self) -> bool {
        self.resize.swap(false, Ordering::SeqCst)
    }
}

/// Spawns listener tasks on the current tokio runtime: interrupt, terminate
/// and quit raise `quit`; window changes raise `resize`.
#[cfg(unix)]
pub fn listen(flags: Arc<SignalFlags>) -> io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    for (kind, name) in [
        (SignalKind::interrupt(), "SIGINT"),
        (SignalKind::terminate(), "SIGTERM"),
        (SignalKind::quit(), "SIGQUIT"),
    ] {
        let mut stream = signal(kind)?;
        let flags = Arc::clone(&flags);
        tokio::spawn(async move {
            while stream.recv().await.is_some() {
                log::info!("{name} received, quitting");
                flags.request_quit();
            }
        });
    }

    let mut winch = signal(SignalKind::window_change())?;
    tokio::spawn(async move {
        while winch.recv().await.is_some() {
            flags.request_resize();
        }
    });

    Ok(())
}

#[cfg(not(unix))]
pub fn listen(flags: Arc<SignalFlags>) -> io::Result<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Ctrl-C received, quitting");
            flags.request_quit();
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_stays_raised() {
        let flags = SignalFlags::new();
        assert!(!flags.quit_requested());
        flags.request_quit();
        assert!(flags.quit_requested());
        assert!(flags.quit_requested());
    }

    #[test]
    fn resize_is_cleared_when_taken() {
        let flags = SignalFlags::new();
        assert!(!flags.take_resize());
        flags.request_resize();
        assert!(flags.take_resize());
        assert!(!flags.take_resize());
    }

    #[tokio::test]
    async fn listeners_install_inside_a_runtime() {
        let flags = SignalFlags::new();
        listen(Arc::clone(&flags)).expect("signal listeners");
        assert!(!flags.quit_requested());
    }
}
