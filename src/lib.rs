pub mod error;

pub mod config {
    pub mod config;
    pub mod ports;
    pub mod settings;
}

pub mod models {
    pub mod batch;
    pub mod conversion;
    pub mod format;
}

pub mod strategy {
    pub mod traits {
        pub mod i_strategy;
    }
    pub mod audio;
    pub mod data;
    pub mod document;
    pub mod raster;
    pub mod registry;
    pub mod video;
}

pub mod service {
    pub mod traits {
        pub mod i_service;
    }
    pub mod config_service;
    pub mod conversion_service;
    pub mod file;
    pub mod pcm;
    pub mod process;
    pub mod xml;
}

pub mod facade {
    pub mod traits {
        pub mod i_conversion;
    }
    pub mod conversion_facade;
}

pub mod action {
    pub mod cli;
    pub mod interactive;
}

pub mod utils {
    pub mod utils;
}

pub use error::{ConversionError, Result};
pub use models::conversion::ConversionRequest;
pub use models::format::{Format, FormatPair};
pub use strategy::registry::{StrategyKind, StrategyRegistry};
pub use strategy::traits::i_strategy::ConversionStrategy;
