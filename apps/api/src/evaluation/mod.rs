// Evaluation runs: the in-memory session (registered JDs + last results), the batch runner
// that turns uploaded résumés into ranked best records, and the HTTP handlers on top.
// Batch scoring is CPU-bound (embeddings) and runs inside tokio::task::spawn_blocking.

pub mod batch;
pub mod handlers;
pub mod session;
