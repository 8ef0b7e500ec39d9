//! # nn: minimal dense-network toolkit
//!
//! Just enough machinery to train small multi-layer perceptrons on the CPU:
//! a flat [`Tensor`] type, a [`Layer`] trait with hand-written gradients, a
//! [`Sequential`] container, and an [`Adam`] optimizer. There is no
//! autodiff tape and no GPU path; every layer knows how to push a gradient
//! back through itself, which is all the policy networks in this workspace
//! need.

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::cast_precision_loss, clippy::must_use_candidate)]

pub mod layers;
pub mod optim;
pub mod tensor;

pub use layers::{softmax, Dense, Layer, Relu, Sequential};
pub use optim::Adam;
pub use tensor::Tensor;
