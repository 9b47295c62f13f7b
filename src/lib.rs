//! ride-along ライブラリ
//!
//! 統合テストから各モジュールにアクセスするためのライブラリクレート

pub mod autosave;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod interactive;
pub mod logging;
pub mod session;
pub mod store;
pub mod view;
