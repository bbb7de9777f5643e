//! Integration tests for gpsync
//!
//! Uses wiremock to simulate the media listing and archive endpoints and
//! verifies end-to-end behavior of the HTTP client and the sync engine.

mod common;

mod test_listing;
mod test_sync;
