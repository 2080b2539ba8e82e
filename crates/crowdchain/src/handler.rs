use eyre::EyreHandler;
use itertools::Itertools;
use std::{error::Error, fmt, panic::Location};

/// Error reporter for the `crowdchain` binary.
///
/// `Display` prints the deduplicated causes on one line, `Debug` one cause per line. With
/// `CROWDCHAIN_DEBUG` set, `Debug` defers to the verbose `color-eyre` report instead.
pub struct Handler {
    verbose: Option<Box<dyn EyreHandler>>,
}

impl EyreHandler for Handler {
    fn display(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", dedup_chain(error).iter().format("; "))
    }

    fn debug(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(verbose) = &self.verbose {
            return verbose.debug(error, f);
        }

        let causes = dedup_chain(error);
        let mut causes = causes.iter();
        if let Some(error) = causes.next() {
            f.write_str(error)?;
        }
        for cause in causes {
            write!(f, "\n  caused by: {cause}")?;
        }
        Ok(())
    }

    fn track_caller(&mut self, location: &'static Location<'static>) {
        if let Some(verbose) = &mut self.verbose {
            verbose.track_caller(location);
        }
    }
}

/// Collects the messages of `error` and its sources, dropping a cause whose message is
/// already part of the previous one (`msg1: msg2; msg2` becomes `msg1: msg2`).
pub fn dedup_chain(error: &(dyn Error + 'static)) -> Vec<String> {
    let mut causes: Vec<String> =
        eyre::Chain::new(error).map(|cause| cause.to_string().trim().to_string()).collect();
    causes.dedup_by(|b, a| a.contains(b.as_str()));
    causes
}

/// Installs the eyre and panic hooks. Panics always get the verbose `color-eyre` report.
pub fn install() {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .panic_section("This is a bug. Consider reporting it to the CrowdChain maintainers.")
        .into_hooks();
    panic_hook.install();

    let eyre_hook = eyre_hook.into_eyre_hook();
    let verbose = std::env::var_os("CROWDCHAIN_DEBUG").is_some();
    let hook = move |error: &(dyn Error + 'static)| -> Box<dyn EyreHandler> {
        Box::new(Handler { verbose: verbose.then(|| eyre_hook(error)) })
    };
    if let Err(err) = eyre::set_hook(Box::new(hook)) {
        debug!(%err, "eyre hook already installed");
    }
}
