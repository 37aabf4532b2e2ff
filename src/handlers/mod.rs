// handlers/mod.rs - Two-tier handler layout
//
// Public (no identity required) → Protected (caller identity required)
//
// Protected handlers receive the caller as an explicit `Caller` extractor and
// check it first, before the payload is validated or the store is touched.
pub mod public;
pub mod protected;
