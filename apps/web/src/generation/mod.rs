// Generation: one POST to the run endpoint, body consumed as a text stream.
// The form session only sees the `Generator` trait, never reqwest directly.

pub mod client;
pub mod decode;
