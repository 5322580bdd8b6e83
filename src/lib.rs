// Palisade: content moderation behind an HTTP endpoint.
//
// This is the library root. Each module corresponds to a subsystem of the
// service: the injected classifier, the moderation orchestration plus its
// process-wide lifecycle, the request-rate tracker, and the web boundary.

pub mod classifier;
pub mod config;
pub mod rate;
pub mod service;
pub mod web;
