//! Visual question answering over HTTP.
//!
//! A single pretrained vision-language model is loaded once at startup and
//! owned by a [`VqaEngine`]. The [`server::router`] exposes `POST /vqa/`,
//! which takes a multipart upload (`image` + `question`) and replies with
//! `{"answer": "..."}`.

pub mod config;
pub mod decode;
pub mod engine;
pub mod error;
pub mod loader;
pub mod model;
pub mod server;

pub use engine::{EngineResponse, EngineState, VqaEngine};
pub use error::VqaError;
pub use model::{VqaAnswer, VqaModel, VqaRequest};
