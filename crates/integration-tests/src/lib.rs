//! End-to-end HTTP tests for the chat server live under `tests/`.
