//! Reference-counted background scroll lock
//!
//! Overlays (menus, modals) that want the page behind them to stay put
//! acquire the lock and release it when they close. The host is told to lock
//! on the first acquire and to unlock only after the last release, so nested
//! overlays cannot unlock each other early.

/// Whatever actually stops the page from scrolling
pub trait ScrollHost {
    fn set_scroll_locked(&mut self, locked: bool);
}

#[derive(Debug)]
pub struct ScrollLock<H> {
    host: H,
    holders: usize,
}

impl<H: ScrollHost> ScrollLock<H> {
    pub fn new(host: H) -> Self {
        Self { host, holders: 0 }
    }

    pub fn acquire(&mut self) {
        self.holders += 1;
        if self.holders == 1 {
            self.host.set_scroll_locked(true);
        }
    }

    /// Release one hold; extra releases are ignored
    pub fn release(&mut self) {
        match self.holders {
            0 => tracing::warn!("scroll lock released more often than acquired"),
            1 => {
                self.holders = 0;
                self.host.set_scroll_locked(false);
            }
            _ => self.holders -= 1,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.holders > 0
    }

    pub fn holders(&self) -> usize {
        self.holders
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}
