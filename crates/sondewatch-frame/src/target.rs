//! Display targets: where the current map URL gets pointed.

/// Something that can be redirected to a new source URL. The embedding
/// decides what "display" means — a browser tab, a line on stdout, a
/// recording sink in tests.
pub trait DisplayTarget: Send {
    fn set_source(&mut self, url: &str);
}

impl<T: DisplayTarget + ?Sized> DisplayTarget for Box<T> {
    fn set_source(&mut self, url: &str) {
        (**self).set_source(url);
    }
}

/// Opens each new URL in the system default browser.
pub struct BrowserTarget;

impl DisplayTarget for BrowserTarget {
    fn set_source(&mut self, url: &str) {
        if let Err(e) = open::that_detached(url) {
            tracing::warn!("failed to open {url} in browser: {e}");
        }
    }
}

/// Prints each new URL on its own line. Useful for piping into other
/// tooling or when no browser is available.
pub struct StdoutTarget;

impl DisplayTarget for StdoutTarget {
    fn set_source(&mut self, url: &str) {
        println!("{url}");
    }
}
