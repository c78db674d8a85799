//! Browser adapters for the seams `gatehouse-auth` leaves open.

pub(crate) mod delay;
pub(crate) mod logging;
pub(crate) mod storage;
pub(crate) mod transport;

pub(crate) use delay::TimerDelay;
pub(crate) use storage::BrowserStore;
pub(crate) use transport::FetchTransport;
