//! Per-request scrape collection.
//!
//! A scrape discovers the sensors on the bus, reads every one of them
//! concurrently and gathers the successful readings into a session that
//! the exposition layer serializes:
//!
//! ```text
//! listing → one worker per sensor → emitter → session sink
//!                                      ↓
//!                     join all workers, then drain the sink
//! ```
//!
//! A failing sensor only removes itself from the result; a failing
//! listing produces an empty result. Neither fails the request.

mod emitter;
mod scraper;
mod session;

pub use emitter::{emit, TemperatureSample};
pub use scraper::{Scraper, ScraperConfig, HELP, LABEL_NAMES};
pub use session::{ReadingSink, ScrapeSession};
