// Composition root.
//
// Responsibilities
// - Read settings from defaults, file and environment.
// - Instantiate the record store and wire it into use case handlers.
// - Spawn background workers (evaluation reconciler, projection repair).
// - Expose the HTTP router.

pub mod config;
pub mod http;
pub mod state;
pub mod workers;
