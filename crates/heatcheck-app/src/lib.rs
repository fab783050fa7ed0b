// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod autocomplete;
pub mod error;
pub mod favorites;
pub mod model;
pub mod route;
pub mod services;
pub mod state;
pub mod stats;

pub use autocomplete::*;
pub use error::*;
pub use favorites::*;
pub use model::*;
pub use route::*;
pub use services::*;
pub use state::*;
pub use stats::*;
