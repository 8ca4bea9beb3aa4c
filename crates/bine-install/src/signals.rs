//! Relaying signals received by bine to a child started with `run`

#[cfg(unix)]
pub use unix::SignalForwarder;

#[cfg(not(unix))]
pub use fallback::SignalForwarder;

#[cfg(unix)]
mod unix {
    use std::io;
    use tokio::signal::unix::{signal, SignalKind};
    use tokio::sync::mpsc;
    use tokio::task::JoinHandle;
    use tracing::debug;

    /// Signals relayed to the child; everything else keeps its default action
    const FORWARDED: &[libc::c_int] = &[
        libc::SIGINT,
        libc::SIGTERM,
        libc::SIGHUP,
        libc::SIGQUIT,
        libc::SIGUSR1,
        libc::SIGUSR2,
        libc::SIGWINCH,
    ];

    /// Listens for the forwarded signals until dropped
    pub struct SignalForwarder {
        pid: libc::pid_t,
        received: mpsc::UnboundedReceiver<libc::c_int>,
        listeners: Vec<JoinHandle<()>>,
    }

    impl SignalForwarder {
        pub fn install(pid: u32) -> io::Result<Self> {
            let pid = libc::pid_t::try_from(pid).map_err(io::Error::other)?;
            let (tx, received) = mpsc::unbounded_channel();

            let mut listeners = Vec::with_capacity(FORWARDED.len());
            for &signo in FORWARDED {
                let mut stream = signal(SignalKind::from_raw(signo))?;
                let tx = tx.clone();
                listeners.push(tokio::spawn(async move {
                    while stream.recv().await.is_some() {
                        if tx.send(signo).is_err() {
                            break;
                        }
                    }
                }));
            }

            Ok(Self {
                pid,
                received,
                listeners,
            })
        }

        /// Wait for the next signal and send it to the child
        pub async fn relay(&mut self) -> io::Result<()> {
            let Some(signo) = self.received.recv().await else {
                return std::future::pending().await;
            };
            debug!(signal = signo, pid = self.pid, "forwarding signal to child");

            // SAFETY: kill(2) only reads its arguments; pid is our own child.
            let rc = unsafe { libc::kill(self.pid, signo) };
            if rc == 0 {
                return Ok(());
            }
            let err = io::Error::last_os_error();
            // The child may already have exited.
            if err.raw_os_error() == Some(libc::ESRCH) {
                Ok(())
            } else {
                Err(err)
            }
        }
    }

    impl Drop for SignalForwarder {
        fn drop(&mut self) {
            for listener in &self.listeners {
                listener.abort();
            }
        }
    }
}

#[cfg(not(unix))]
mod fallback {
    use std::io;

    /// Ctrl-C is delivered to the whole console group, so there is nothing to relay
    pub struct SignalForwarder;

    impl SignalForwarder {
        pub fn install(_pid: u32) -> io::Result<Self> {
            Ok(Self)
        }

        pub async fn relay(&mut self) -> io::Result<()> {
            tokio::signal::ctrl_c().await
        }
    }
}
